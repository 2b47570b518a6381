//! The autoconfiguration command: argument parsing and execution.
//!
//! Usage: `[--gateway|-g <gateway>] [<interface>] [<setting> <value>]...`
//!
//! Options are recognized only before the first positional argument; from
//! there on, everything is positional. The first positional names the
//! interface, the rest are extra settings to persist with the claim. With
//! no interface argument, the most recently added open device is used.

use std::net::Ipv4Addr;

use linklocal_core::device::{RouteTable, SettingsStore};
use linklocal_engine::{Autoconf, ClaimRequest, ConfiguredAddress};

use crate::{error::CommandError, registry::DeviceRegistry};

/// A parsed autoconfiguration command line.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AutoconfCommand {
    /// Gateway to install and persist.
    pub gateway: Option<Ipv4Addr>,
    /// Interface to configure; `None` selects the default device.
    pub interface: Option<String>,
    /// Extra settings to persist, as (name, value) pairs.
    pub settings: Vec<(String, String)>,
}

impl AutoconfCommand {
    /// Parses command arguments (without the command name itself).
    pub fn parse(args: &[String]) -> Result<AutoconfCommand, CommandError> {
        let mut gateway_arg: Option<String> = None;
        let mut positionals: Vec<&String> = Vec::new();

        let mut iter = args.iter();
        while let Some(arg) = iter.next() {
            // Option scanning stops at the first positional argument
            if positionals.is_empty() {
                match arg.as_str() {
                    "--gateway" | "-g" => {
                        let value = iter
                            .next()
                            .ok_or_else(|| CommandError::MissingValue(arg.clone()))?;
                        gateway_arg = Some(value.clone());
                        continue;
                    }
                    text if text.starts_with("--gateway=") => {
                        gateway_arg = Some(text["--gateway=".len()..].to_string());
                        continue;
                    }
                    text if text.starts_with('-') && text.len() > 1 => {
                        return Err(CommandError::UnknownOption(arg.clone()));
                    }
                    _ => {}
                }
            }
            positionals.push(arg);
        }

        let gateway = match gateway_arg {
            Some(text) => Some(
                text.parse()
                    .map_err(|_| CommandError::InvalidGateway(text))?,
            ),
            None => None,
        };

        let mut positionals = positionals.into_iter();
        let interface = positionals.next().cloned();
        let rest: Vec<&String> = positionals.collect();
        if rest.len() % 2 != 0 {
            return Err(CommandError::OddSettings);
        }

        let mut settings = Vec::with_capacity(rest.len() / 2);
        for pair in rest.chunks(2) {
            let name = pair[0];
            if name.is_empty() || name.chars().any(char::is_whitespace) {
                return Err(CommandError::InvalidSettingName(name.clone()));
            }
            settings.push((name.clone(), pair[1].clone()));
        }

        Ok(AutoconfCommand {
            gateway,
            interface,
            settings,
        })
    }
}

/// Parses `args` and runs autoconfiguration on the selected device.
///
/// Argument errors surface before any device is looked up or touched.
pub fn execute<R: DeviceRegistry>(
    registry: &mut R,
    routes: &mut dyn RouteTable,
    store: &mut dyn SettingsStore,
    engine: &mut Autoconf,
    args: &[String],
) -> Result<ConfiguredAddress, CommandError> {
    let AutoconfCommand {
        gateway,
        interface,
        settings,
    } = AutoconfCommand::parse(args)?;

    let device = match &interface {
        Some(name) => registry
            .find(name)
            .ok_or_else(|| CommandError::NoSuchDevice(name.clone()))?,
        None => registry.last_opened().ok_or(CommandError::NoDefaultDevice)?,
    };

    let request = ClaimRequest { gateway, settings };
    Ok(engine.run(device, routes, store, &request)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use linklocal_core::mock::{FixedJitter, ManualClock, MemoryRoutes, MemoryStore, MockDevice};

    use crate::registry::DeviceList;

    const MAC: [u8; 6] = [0x02, 0x00, 0x00, 0x00, 0x00, 0x01];

    fn args(parts: &[&str]) -> Vec<String> {
        parts.iter().map(|part| part.to_string()).collect()
    }

    fn make_engine() -> Autoconf {
        Autoconf::with_sources(Arc::new(ManualClock::new()), Box::new(FixedJitter::ZERO))
    }

    #[test]
    fn test_parse_empty() {
        let command = AutoconfCommand::parse(&[]).unwrap();
        assert_eq!(command, AutoconfCommand::default());
    }

    #[test]
    fn test_parse_interface_only() {
        let command = AutoconfCommand::parse(&args(&["net0"])).unwrap();
        assert_eq!(command.interface.as_deref(), Some("net0"));
        assert_eq!(command.gateway, None);
        assert!(command.settings.is_empty());
    }

    #[test]
    fn test_parse_gateway_forms() {
        for form in [
            &["--gateway", "192.168.1.1", "net0"][..],
            &["-g", "192.168.1.1", "net0"][..],
            &["--gateway=192.168.1.1", "net0"][..],
        ] {
            let command = AutoconfCommand::parse(&args(form)).unwrap();
            assert_eq!(command.gateway, Some(Ipv4Addr::new(192, 168, 1, 1)));
            assert_eq!(command.interface.as_deref(), Some("net0"));
        }
    }

    #[test]
    fn test_parse_settings_pairs() {
        let command = AutoconfCommand::parse(&args(&[
            "net0", "dns", "1.1.1.1", "hostname", "pxe-7",
        ]))
        .unwrap();
        assert_eq!(command.interface.as_deref(), Some("net0"));
        assert_eq!(
            command.settings,
            vec![
                ("dns".to_string(), "1.1.1.1".to_string()),
                ("hostname".to_string(), "pxe-7".to_string()),
            ]
        );
    }

    #[test]
    fn test_first_positional_is_always_the_interface() {
        // Without an interface argument the pair is taken apart: "dns"
        // names the interface and "1.1.1.1" is an unpaired setting
        let err = AutoconfCommand::parse(&args(&["dns", "1.1.1.1"])).unwrap_err();
        assert!(matches!(err, CommandError::OddSettings));
    }

    #[test]
    fn test_options_after_a_positional_are_positionals() {
        let command =
            AutoconfCommand::parse(&args(&["net0", "--gateway", "10.0.0.1"])).unwrap();
        assert_eq!(command.gateway, None);
        assert_eq!(command.interface.as_deref(), Some("net0"));
        assert_eq!(
            command.settings,
            vec![("--gateway".to_string(), "10.0.0.1".to_string())]
        );
    }

    #[test]
    fn test_parse_rejects_missing_gateway_value() {
        for form in [&["--gateway"][..], &["-g"][..]] {
            let err = AutoconfCommand::parse(&args(form)).unwrap_err();
            assert!(matches!(err, CommandError::MissingValue(_)));
        }
    }

    #[test]
    fn test_parse_rejects_unknown_option() {
        let err = AutoconfCommand::parse(&args(&["-x", "net0"])).unwrap_err();
        match err {
            CommandError::UnknownOption(option) => assert_eq!(option, "-x"),
            other => panic!("expected UnknownOption, got {other:?}"),
        }
    }

    #[test]
    fn test_parse_rejects_malformed_gateway() {
        for bad in ["not-an-ip", "10.0.0.1.5", "300.1.1.1", ""] {
            let err = AutoconfCommand::parse(&args(&["--gateway", bad, "net0"])).unwrap_err();
            assert!(matches!(err, CommandError::InvalidGateway(_)), "{bad:?}");
        }
    }

    #[test]
    fn test_parse_rejects_whitespace_setting_name() {
        let err =
            AutoconfCommand::parse(&args(&["net0", "bad name", "value"])).unwrap_err();
        assert!(matches!(err, CommandError::InvalidSettingName(_)));
    }

    #[test]
    fn test_execute_on_named_device() {
        let mut registry = DeviceList::new();
        registry.add(MockDevice::ethernet("net0", MAC));
        let mut routes = MemoryRoutes::new();
        let mut store = MemoryStore::new();
        let mut engine = make_engine();

        let configured = execute(
            &mut registry,
            &mut routes,
            &mut store,
            &mut engine,
            &args(&["net0"]),
        )
        .unwrap();

        assert_eq!(configured.address, Ipv4Addr::new(169, 254, 1, 3));
        assert_eq!(routes.installed.len(), 1);
    }

    #[test]
    fn test_execute_uses_default_device_when_unnamed() {
        let mut registry = DeviceList::new();
        registry.add(MockDevice::ethernet("net0", MAC));
        let mut open_device = MockDevice::ethernet("net1", [0x02, 0, 0, 0, 0, 2]);
        open_device.set_open(true);
        registry.add(open_device);
        let mut routes = MemoryRoutes::new();
        let mut store = MemoryStore::new();
        let mut engine = make_engine();

        execute(&mut registry, &mut routes, &mut store, &mut engine, &[]).unwrap();

        assert_eq!(routes.installed[0].device, "net1");
    }

    #[test]
    fn test_execute_without_any_open_device() {
        let mut registry = DeviceList::new();
        registry.add(MockDevice::ethernet("net0", MAC));
        let mut routes = MemoryRoutes::new();
        let mut store = MemoryStore::new();
        let mut engine = make_engine();

        let err = execute(&mut registry, &mut routes, &mut store, &mut engine, &[])
            .unwrap_err();

        assert!(matches!(err, CommandError::NoDefaultDevice));
    }

    #[test]
    fn test_execute_unknown_device_touches_nothing() {
        let mut registry = DeviceList::new();
        registry.add(MockDevice::ethernet("net0", MAC));
        registry.add(MockDevice::ethernet("net1", MAC));
        let mut routes = MemoryRoutes::new();
        let mut store = MemoryStore::new();
        let mut engine = make_engine();

        let err = execute(
            &mut registry,
            &mut routes,
            &mut store,
            &mut engine,
            &args(&["net7"]),
        )
        .unwrap_err();

        assert!(matches!(err, CommandError::NoSuchDevice(_)));
        for device in registry.devices() {
            assert_eq!(device.transmit_calls(), 0);
        }
        assert!(routes.installed.is_empty());
        assert!(store.values.is_empty());
    }

    #[test]
    fn test_execute_usage_error_touches_nothing() {
        let mut registry = DeviceList::new();
        registry.add(MockDevice::ethernet("net0", MAC));
        let mut routes = MemoryRoutes::new();
        let mut store = MemoryStore::new();
        let mut engine = make_engine();

        let err = execute(
            &mut registry,
            &mut routes,
            &mut store,
            &mut engine,
            &args(&["--gateway", "nope", "net0"]),
        )
        .unwrap_err();
        assert!(matches!(err, CommandError::InvalidGateway(_)));

        let err = execute(
            &mut registry,
            &mut routes,
            &mut store,
            &mut engine,
            &args(&["net0", "dns"]),
        )
        .unwrap_err();
        assert!(matches!(err, CommandError::OddSettings));

        assert_eq!(registry.devices()[0].transmit_calls(), 0);
        assert!(routes.installed.is_empty());
        assert!(store.values.is_empty());
    }

    #[test]
    fn test_execute_carries_gateway_and_settings() {
        let mut registry = DeviceList::new();
        registry.add(MockDevice::ethernet("net0", MAC));
        let mut routes = MemoryRoutes::new();
        let mut store = MemoryStore::new();
        let mut engine = make_engine();

        execute(
            &mut registry,
            &mut routes,
            &mut store,
            &mut engine,
            &args(&["-g", "192.168.1.1", "net0", "dns", "1.1.1.1"]),
        )
        .unwrap();

        assert_eq!(
            routes.installed[0].gateway,
            Some(Ipv4Addr::new(192, 168, 1, 1))
        );
        assert_eq!(
            store.values.last(),
            Some(&("dns".to_string(), "1.1.1.1".to_string()))
        );
    }

    #[test]
    fn test_run_failure_maps_to_exit_code() {
        let mut registry = DeviceList::new();
        let mut device = MockDevice::ethernet("net0", MAC);
        device.set_link_up(false);
        registry.add(device);
        let mut routes = MemoryRoutes::new();
        let mut store = MemoryStore::new();
        let mut engine = make_engine();

        let err = execute(
            &mut registry,
            &mut routes,
            &mut store,
            &mut engine,
            &args(&["net0"]),
        )
        .unwrap_err();

        assert_eq!(err.exit_code(), 3);
    }
}
