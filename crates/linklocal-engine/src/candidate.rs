//! Candidate address derivation.
//!
//! Each device identity maps to a deterministic walk over the usable
//! link-local range: the link-layer address is folded into a 32-bit seed,
//! the attempt index scaled by a Fermat prime is added, and the sum is
//! reduced onto 169.254.1.0 through 169.254.254.255. A device therefore
//! asks for the same addresses in the same order on every run, while
//! distinct identities spread across the range.

use std::net::Ipv4Addr;

use linklocal_core::constants;

/// Derives the candidate address for `attempt` from a link-layer address.
///
/// Deterministic, and consecutive attempts for one identity never collide.
/// The result always lies in the usable link-local range, for any identity
/// length including zero.
pub fn candidate_address(link_addr: &[u8], attempt: u32) -> Ipv4Addr {
    let len = link_addr.len();
    let mut seed: u32 = 0;

    // Fold the tail of the identity in, lowest byte first
    for i in 0..len.min(4) {
        seed |= u32::from(link_addr[len - 1 - i]) << (8 * i);
    }
    // XOR the head over the same byte lanes
    for i in 0..len.min(4) {
        seed ^= u32::from(link_addr[i]) << (8 * i);
    }

    seed = seed.wrapping_add(attempt.wrapping_mul(constants::ATTEMPT_MULTIPLIER));

    let range = constants::ADDR_MAX - constants::ADDR_MIN + 1;
    Ipv4Addr::from(constants::ADDR_MIN + seed % range)
}
