#![warn(missing_docs)]

//! linklocal-core: foundational contracts for IPv4 link-local autoconfiguration.
//!
//! This crate provides the minimal set of shared pieces used by the other layers:
//! - Protocol constants (address range, probe and announcement schedule)
//! - Error types
//! - Device, route-table and settings-store contracts
//! - Clock and jitter abstractions
//! - In-memory test doubles
//!
//! Protocol behaviour lives in specialized crates:
//! - `linklocal-wire`: ARP frame building and inspection
//! - `linklocal-engine`: candidate generation, conflict probing, claiming
//! - `linklocal-cli`: command parsing and device registry

/// Protocol constants shared across layers.
pub mod constants {
    use std::time::Duration;

    /// Base of the IPv4 link-local network, 169.254.0.0, in host byte order.
    pub const LINK_LOCAL_BASE: u32 = (169 << 24) | (254 << 16);
    /// Netmask of the link-local network, 255.255.0.0.
    pub const LINK_LOCAL_NETMASK: u32 = 0xFFFF_0000;
    /// Lowest usable link-local address, 169.254.1.0.
    ///
    /// The first /24 of 169.254.0.0/16 is reserved and never assigned.
    pub const ADDR_MIN: u32 = LINK_LOCAL_BASE | (1 << 8);
    /// Highest usable link-local address, 169.254.254.255.
    ///
    /// The last /24 of 169.254.0.0/16 is reserved and never assigned.
    pub const ADDR_MAX: u32 = LINK_LOCAL_BASE | (254 << 8) | 255;
    /// Number of ARP probes sent for each candidate address.
    pub const PROBE_COUNT: u32 = 3;
    /// Wait after each probe transmission before inspecting replies.
    pub const PROBE_WAIT: Duration = Duration::from_millis(200);
    /// Fixed floor of the delay between successive probes.
    ///
    /// A random offset below [`JITTER_BOUND`] is added on top, giving the
    /// 1-2 second spacing RFC 3927 section 2.2.1 asks for.
    pub const PROBE_GAP_FLOOR: Duration = Duration::from_millis(1000);
    /// Exclusive upper bound of the random jitter added to delays.
    ///
    /// Used both for the one-off delay before the first probe (RFC 3927
    /// section 2.1) and for the inter-probe spacing offset.
    pub const JITTER_BOUND: Duration = Duration::from_millis(1000);
    /// Maximum number of candidate addresses tried in one run.
    pub const MAX_ATTEMPTS: u32 = 10;
    /// Multiplier applied to the attempt index when deriving a candidate.
    ///
    /// 65537 is a Fermat prime, spreading successive attempts far apart
    /// under the modulo reduction onto the usable range.
    pub const ATTEMPT_MULTIPLIER: u32 = 65537;
    /// Number of gratuitous ARP announcements sent after a claim.
    pub const ANNOUNCE_COUNT: u32 = 2;
    /// Wait before every announcement after the first.
    pub const ANNOUNCE_GAP: Duration = Duration::from_millis(2000);
    /// Upper bound on the link-layer address length the seed fold reads.
    ///
    /// Large enough for any supported link layer; longer addresses are
    /// truncated when snapshotted.
    pub const MAX_LINK_ADDR_LEN: usize = 32;
    /// Settings-store identifier for the assigned address.
    pub const SETTING_ADDRESS: &str = "ip";
    /// Settings-store identifier for the netmask.
    pub const SETTING_NETMASK: &str = "netmask";
    /// Settings-store identifier for the gateway.
    pub const SETTING_GATEWAY: &str = "gateway";
}

/// Device, route-table and settings-store contracts.
pub mod device;
/// Error types for autoconfiguration runs.
pub mod error;
/// Randomized delay source abstraction.
pub mod jitter;
/// In-memory test doubles for the contracts in this crate.
pub mod mock;
/// Clock abstraction for timing and testability.
pub mod time;
