//! Command failures and their exit codes.

use linklocal_core::error::AutoconfError;
use thiserror::Error;

/// Failures of the autoconfiguration command.
///
/// Usage errors are detected before any device is touched; a command that
/// fails to parse transmits nothing.
#[derive(Error, Debug)]
pub enum CommandError {
    /// The gateway argument is not a dotted-quad IPv4 address.
    #[error("invalid gateway address: {0}")]
    InvalidGateway(String),

    /// Setting arguments did not come in (name, value) pairs.
    #[error("settings must be given as <setting> <value> pairs")]
    OddSettings,

    /// A setting name is empty or contains whitespace.
    #[error("invalid setting name: '{0}'")]
    InvalidSettingName(String),

    /// An unrecognized option was given before the first positional.
    #[error("unknown option: {0}")]
    UnknownOption(String),

    /// An option that requires a value was given without one.
    #[error("option {0} requires a value")]
    MissingValue(String),

    /// No device with the requested interface name exists.
    #[error("no such device: {0}")]
    NoSuchDevice(String),

    /// No interface name was given and no open device can serve as the
    /// default.
    #[error("no device specified and no default available")]
    NoDefaultDevice,

    /// The autoconfiguration run itself failed.
    #[error(transparent)]
    Autoconf(#[from] AutoconfError),
}

impl CommandError {
    /// Maps the failure onto a process exit code, grouped by class.
    ///
    /// 1 usage, 2 device selection or readiness, 3 link down, 4 address
    /// space exhausted, 5 route installation, 6 announcement, 7 settings
    /// persistence.
    pub fn exit_code(&self) -> i32 {
        match self {
            CommandError::InvalidGateway(_)
            | CommandError::OddSettings
            | CommandError::InvalidSettingName(_)
            | CommandError::UnknownOption(_)
            | CommandError::MissingValue(_) => 1,
            CommandError::NoSuchDevice(_) | CommandError::NoDefaultDevice => 2,
            CommandError::Autoconf(err) => match err {
                AutoconfError::DeviceUnready { .. } | AutoconfError::OpenFailed { .. } => 2,
                AutoconfError::LinkDown { .. } => 3,
                AutoconfError::AddressInUse { .. } => 4,
                AutoconfError::InstallFailed { .. } => 5,
                AutoconfError::AnnounceFailed { .. } => 6,
                AutoconfError::PersistFailed { .. } => 7,
            },
        }
    }
}
