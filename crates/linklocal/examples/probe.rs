//! Walks one candidate through conflict probing on a manual clock,
//! showing the probe schedule and what a conflicting answer changes.
//!
//! - cargo run -p linklocal --example probe
//!
//! Runs instantly; the manual clock records the sleeps instead of
//! waiting them out.

use std::net::Ipv4Addr;

use linklocal::{
    candidate_address,
    mock::{FixedJitter, ManualClock, MockDevice},
    probe_candidate, ArpFrame, ArpOp, ProbeVerdict,
};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let mac = [0x02, 0x00, 0x00, 0x00, 0x00, 0x01];
    let first = candidate_address(&mac, 0);

    // Quiet link: nobody answers for the candidate
    let clock = ManualClock::new();
    let mut jitter = FixedJitter::ZERO;
    let mut device = MockDevice::ethernet("net0", mac);

    let verdict = probe_candidate(&mut device, &clock, &mut jitter, &mac, first);
    println!("candidate {}: {:?}", first, verdict);
    println!("probes sent: {}", device.sent().len());
    for (index, sleep) in clock.sleeps().iter().enumerate() {
        println!("  wait {}: {:?}", index, sleep);
    }

    // Defended link: another host claims the candidate after our first probe
    let mut device = MockDevice::ethernet("net0", mac);
    let defender = [0xAA, 0xBB, 0xCC, 0x00, 0x11, 0x22];
    let answer = ArpFrame::new(ArpOp::Reply, &defender, first, &mac, Ipv4Addr::UNSPECIFIED)
        .encode()?;
    device.inject_after(1, answer);

    match probe_candidate(&mut device, &clock, &mut jitter, &mac, first) {
        ProbeVerdict::Conflict => println!(
            "candidate {} is defended; the next attempt would try {}",
            first,
            candidate_address(&mac, 1)
        ),
        other => println!("unexpected verdict: {:?}", other),
    }

    Ok(())
}
