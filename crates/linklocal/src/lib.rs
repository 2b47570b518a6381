#![warn(missing_docs)]

//! Linklocal: a small public API facade for the workspace.
//!
//! This crate provides a clean, stable surface that re-exports the most
//! commonly used types for claiming IPv4 link-local addresses (RFC 3927):
//!
//! - The controller and its inputs (`Autoconf`, `ClaimRequest`)
//! - Device, route and settings contracts (`LinkDevice`, `RouteTable`,
//!   `SettingsStore`)
//! - The command front end (`execute`, `DeviceList`)
//!
//! Example
//! ```ignore
//! use linklocal::{Autoconf, ClaimRequest, LinkDevice};
//! use linklocal::mock::{MemoryRoutes, MemoryStore, MockDevice};
//!
//! let mut device = MockDevice::ethernet("net0", [0x02, 0, 0, 0, 0, 0x01]);
//! let mut routes = MemoryRoutes::new();
//! let mut store = MemoryStore::new();
//!
//! let mut engine = Autoconf::new();
//! let configured = engine
//!     .run(&mut device, &mut routes, &mut store, &ClaimRequest::default())
//!     .unwrap();
//!
//! // The address lies in 169.254.1.0 - 169.254.254.255
//! println!("claimed {}", configured.address);
//! ```

// Core contracts, constants and errors
pub use linklocal_core::constants;
pub use linklocal_core::device::{InboundQueue, LinkDevice, LinkParams, RouteTable, SettingsStore};
pub use linklocal_core::error::{AutoconfError, AutoconfResult};
pub use linklocal_core::jitter::{JitterSource, ThreadJitter};
pub use linklocal_core::mock;
pub use linklocal_core::time::{Clock, SystemClock};
// Engine: candidate derivation, probing, claiming
pub use linklocal_engine::{
    announce_claim, candidate_address, probe_candidate, Autoconf, ClaimRequest, ClaimState,
    ConfiguredAddress, ProbeVerdict,
};
// Wire: ARP frames
pub use linklocal_wire::{ArpFrame, ArpOp, ArpView, WireError};
// Command front end
pub use linklocal_cli::{execute, AutoconfCommand, CommandError, DeviceList, DeviceRegistry};

/// Convenience prelude with the most commonly used items.
pub mod prelude {
    pub use crate::{
        Autoconf, AutoconfError, AutoconfResult, ClaimRequest, ClaimState, ConfiguredAddress,
        InboundQueue, LinkDevice, LinkParams, RouteTable, SettingsStore,
    };
}
