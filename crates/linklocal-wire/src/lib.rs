#![warn(missing_docs)]

//! linklocal-wire: ARP frame encoding and validation.

/// ARP frame building and inspection.
pub mod arp;

pub use arp::{ArpFrame, ArpOp, ArpView, WireError};
