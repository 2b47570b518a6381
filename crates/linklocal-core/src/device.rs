//! Device, route-table and settings-store contracts.

use std::{io::Result, net::Ipv4Addr};

/// Fixed framing parameters of a link layer.
///
/// Describes how frames on a device are laid out: how long the link header
/// is and how long a hardware address is. The link protocol field is
/// expected in the last two bytes of the header (Ethernet II layout).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LinkParams {
    /// Length of the link-layer frame header in bytes.
    pub header_len: usize,
    /// Length of one hardware address on this link in bytes.
    pub addr_len: usize,
}

impl LinkParams {
    /// Ethernet II framing: 14-byte header, 6-byte hardware addresses.
    pub const ETHERNET: LinkParams = LinkParams {
        header_len: 14,
        addr_len: 6,
    };
}

/// Read access to a device's inbound frame queue, plus its drain trigger.
///
/// The queue is owned by the surrounding network stack. Callers may peek at
/// the entries currently queued but must never remove them directly; frames
/// leave the queue only through [`poll`](InboundQueue::poll), which hands
/// them to the stack for normal processing.
pub trait InboundQueue {
    /// Returns the number of frames currently queued.
    fn queued_len(&self) -> usize;

    /// Borrows the raw bytes of the queued frame at `index`, oldest first.
    ///
    /// Returns `None` when `index` is out of range.
    fn frame(&self, index: usize) -> Option<&[u8]>;

    /// Processes and removes all queued frames.
    fn poll(&mut self);
}

/// A configurable network device.
///
/// This trait carries exactly what an autoconfiguration run consumes:
/// identity, open state, link state, and raw frame transmission. The device
/// knows nothing about ARP; callers hand it fully framed bytes. Closing the
/// device stays with the surrounding system.
pub trait LinkDevice: InboundQueue {
    /// Returns the interface name, used in diagnostics.
    fn name(&self) -> &str;

    /// Returns the link-layer address, or `None` when the device has none.
    fn link_addr(&self) -> Option<&[u8]>;

    /// Returns the framing parameters of this device's link layer.
    fn link_params(&self) -> LinkParams;

    /// Returns whether the device is currently open.
    fn is_open(&self) -> bool;

    /// Opens the device.
    fn open(&mut self) -> Result<()>;

    /// Returns whether the physical link is up.
    fn is_link_up(&self) -> bool;

    /// Transmits one fully framed link-layer frame.
    fn transmit(&mut self, frame: &[u8]) -> Result<()>;
}

/// The IPv4 route and address table.
pub trait RouteTable {
    /// Installs and activates `address`/`netmask` on the named device, with
    /// an optional default gateway.
    fn install(
        &mut self,
        device: &str,
        address: Ipv4Addr,
        netmask: Ipv4Addr,
        gateway: Option<Ipv4Addr>,
    ) -> Result<()>;
}

/// The configuration-setting persistence store.
pub trait SettingsStore {
    /// Persists one named setting as a string value.
    ///
    /// Identifiers may be predefined (see the `SETTING_*` constants) or
    /// caller-named, in which case the store is expected to create them.
    fn store(&mut self, name: &str, value: &str) -> Result<()>;
}
