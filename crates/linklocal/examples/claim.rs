//! Claims a link-local address on a simulated device through the command
//! front end and prints the resulting configuration.
//!
//! Run with the default interface:
//! - cargo run -p linklocal --example claim
//!
//! Or pass the command's own arguments through:
//! - cargo run -p linklocal --example claim -- net0
//! - cargo run -p linklocal --example claim -- --gateway 169.254.0.1 net0 dns 1.1.1.1
//!
//! The run uses the real clock, so expect a few seconds of probe and
//! announcement waits.

use std::env;

use linklocal::{
    execute,
    mock::{MemoryRoutes, MemoryStore, MockDevice},
    Autoconf, DeviceList,
};

fn main() {
    // Args are passed straight to the command parser
    let mut args: Vec<String> = env::args().skip(1).collect();
    if args.is_empty() {
        args.push("net0".to_string());
    }

    let mut registry = DeviceList::new();
    registry.add(MockDevice::ethernet(
        "net0",
        [0x02, 0x1A, 0x7E, 0x9C, 0x55, 0x01],
    ));
    let mut routes = MemoryRoutes::new();
    let mut store = MemoryStore::new();
    let mut engine = Autoconf::new();

    println!("claiming a link-local address ({})...", args.join(" "));
    match execute(&mut registry, &mut routes, &mut store, &mut engine, &args) {
        Ok(configured) => {
            println!(
                "claimed {} netmask {}",
                configured.address, configured.netmask
            );
            if let Some(gateway) = configured.gateway {
                println!("gateway {}", gateway);
            }
            for route in &routes.installed {
                println!(
                    "route: {} -> {}/{}",
                    route.device, route.address, route.netmask
                );
            }
            for (name, value) in &store.values {
                println!("stored: {} = {}", name, value);
            }
        }
        Err(err) => {
            eprintln!("error: {}", err);
            std::process::exit(err.exit_code());
        }
    }
}
