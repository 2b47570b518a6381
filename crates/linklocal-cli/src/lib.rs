#![warn(missing_docs)]

//! linklocal-cli: command parsing and execution for autoconfiguration.

/// The autoconfiguration command: argument parsing and execution.
pub mod command;
/// Command failures and their exit codes.
pub mod error;
/// Device lookup for command execution.
pub mod registry;

pub use command::{execute, AutoconfCommand};
pub use error::CommandError;
pub use registry::{DeviceList, DeviceRegistry};
