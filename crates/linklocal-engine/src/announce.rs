//! Gratuitous announcements for a claimed address.

use std::{io, net::Ipv4Addr};

use linklocal_core::{constants, device::LinkDevice, time::Clock};
use linklocal_wire::ArpFrame;

/// Announces a claimed address with gratuitous ARP broadcasts.
///
/// RFC 3927 section 2.3: sends [`constants::ANNOUNCE_COUNT`] requests with
/// sender and target protocol address both set to `address`, waiting
/// [`constants::ANNOUNCE_GAP`] before every announcement after the first.
/// Stops at the first transmission failure; announcements already sent
/// stand.
pub fn announce_claim<D: LinkDevice>(
    device: &mut D,
    clock: &dyn Clock,
    link_addr: &[u8],
    address: Ipv4Addr,
) -> io::Result<()> {
    let frame = ArpFrame::announcement(link_addr, address).encode()?;

    for announcement in 0..constants::ANNOUNCE_COUNT {
        if announcement > 0 {
            clock.sleep(constants::ANNOUNCE_GAP);
        }
        device.transmit(&frame)?;
        tracing::trace!(
            "{} sent announcement {}/{}",
            device.name(),
            announcement + 1,
            constants::ANNOUNCE_COUNT
        );
    }

    Ok(())
}
