#![warn(missing_docs)]

//! linklocal-engine: candidate derivation, conflict probing, and claiming.

/// Gratuitous announcements for claimed addresses.
pub mod announce;
/// The autoconfiguration controller.
pub mod autoconf;
/// Deterministic candidate address derivation.
pub mod candidate;
/// Claim lifecycle states.
pub mod claim_state;
/// Conflict probing for candidate addresses.
pub mod probe;

pub use announce::announce_claim;
pub use autoconf::{Autoconf, ClaimRequest, ConfiguredAddress};
pub use candidate::candidate_address;
pub use claim_state::ClaimState;
pub use probe::{probe_candidate, ProbeVerdict};
