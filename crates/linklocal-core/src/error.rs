//! Error types for autoconfiguration runs.

use std::{io, net::Ipv4Addr};

use thiserror::Error;

/// Result type for autoconfiguration operations.
pub type AutoconfResult<T> = std::result::Result<T, AutoconfError>;

/// Failures an autoconfiguration run can end with.
///
/// The first three variants fire before any probing starts. The remaining
/// ones fire after a candidate address was already claimed; none of them
/// roll back earlier side effects, so an address may stay installed with
/// its settings only partially stored.
#[derive(Error, Debug)]
pub enum AutoconfError {
    /// The device has no link-layer address to derive candidates from.
    #[error("{device}: no link-layer address available")]
    DeviceUnready {
        /// Interface name.
        device: String,
    },

    /// The device was closed and could not be opened.
    #[error("could not open {device}: {source}")]
    OpenFailed {
        /// Interface name.
        device: String,
        /// Underlying open error.
        #[source]
        source: io::Error,
    },

    /// The physical link is down, so no probe can reach the network.
    #[error("{device}: link is down")]
    LinkDown {
        /// Interface name.
        device: String,
    },

    /// Every candidate attempt ended without a clear probe verdict.
    #[error("{device}: no available link-local address after {attempts} attempts")]
    AddressInUse {
        /// Interface name.
        device: String,
        /// Number of candidates tried.
        attempts: u32,
    },

    /// The route table rejected the claimed address.
    #[error("could not install {address} on {device}: {source}")]
    InstallFailed {
        /// Interface name.
        device: String,
        /// The address that was being installed.
        address: Ipv4Addr,
        /// Underlying route-table error.
        #[source]
        source: io::Error,
    },

    /// A gratuitous ARP announcement could not be transmitted.
    ///
    /// The address remains installed.
    #[error("failed to announce {address}: {source}")]
    AnnounceFailed {
        /// The claimed address.
        address: Ipv4Addr,
        /// Underlying transmit error.
        #[source]
        source: io::Error,
    },

    /// A settings-store write failed.
    ///
    /// The address remains installed and earlier stores remain applied.
    #[error("failed to store setting '{setting}': {source}")]
    PersistFailed {
        /// Identifier of the setting that failed.
        setting: String,
        /// Underlying store error.
        #[source]
        source: io::Error,
    },
}
