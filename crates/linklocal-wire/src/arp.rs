//! ARP frame building and inspection.
//!
//! Address autoconfiguration only ever sends one shape of frame (a broadcast
//! ARP request) and only ever reads one field of inbound frames (the sender
//! protocol address), so this module provides exactly that: an owned
//! [`ArpFrame`] builder for outbound traffic and a borrowed [`ArpView`] that
//! validates an inbound frame against the link's framing parameters without
//! copying it.

use std::{
    io::{self, Write},
    net::Ipv4Addr,
};

use byteorder::{BigEndian, WriteBytesExt};
use thiserror::Error;

use linklocal_core::device::LinkParams;

/// EtherType carried in the link protocol field for ARP frames.
pub const ETHERTYPE_ARP: u16 = 0x0806;
/// ARP hardware type for Ethernet.
pub const HARDWARE_ETHERNET: u16 = 1;
/// ARP protocol type for IPv4.
pub const PROTOCOL_IPV4: u16 = 0x0800;
/// Length of the fixed ARP header preceding the variable address fields.
pub const ARP_HEADER_LEN: usize = 8;

/// ARP operation code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArpOp {
    /// Who-has request; also used for gratuitous announcements.
    Request,
    /// Is-at reply.
    Reply,
}

impl ArpOp {
    /// Returns the wire value of this operation.
    pub fn to_u16(self) -> u16 {
        match self {
            ArpOp::Request => 1,
            ArpOp::Reply => 2,
        }
    }

    /// Maps a wire value back to an operation, if known.
    pub fn from_u16(value: u16) -> Option<ArpOp> {
        match value {
            1 => Some(ArpOp::Request),
            2 => Some(ArpOp::Reply),
            _ => None,
        }
    }
}

/// Reasons an inbound frame is not usable as an ARP frame on this link.
///
/// None of these are errors to a conflict scan; frames that fail to parse
/// simply carry no evidence and are skipped.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum WireError {
    /// The frame ends before a required field.
    #[error("frame too short: {len} bytes, need {need}")]
    Truncated {
        /// Actual frame length.
        len: usize,
        /// Minimum length required.
        need: usize,
    },

    /// The link protocol field does not carry ARP.
    #[error("not an ARP frame (link protocol {0:#06x})")]
    NotArp(u16),

    /// The hardware-address length differs from the link's.
    #[error("hardware address length {actual} does not match the link's {expected}")]
    HardwareLength {
        /// Hardware-address length of this link.
        expected: usize,
        /// Length announced by the frame.
        actual: usize,
    },

    /// The protocol-address length is not IPv4's.
    #[error("protocol address length {0} is not IPv4")]
    ProtocolLength(u8),
}

/// An owned ARP frame, encodable with Ethernet II broadcast framing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArpFrame {
    /// Operation code.
    pub op: ArpOp,
    /// Sender hardware address.
    pub sender_hw: Vec<u8>,
    /// Sender protocol address.
    pub sender_ip: Ipv4Addr,
    /// Target hardware address; all-zero when unknown.
    pub target_hw: Vec<u8>,
    /// Target protocol address.
    pub target_ip: Ipv4Addr,
}

impl ArpFrame {
    /// Creates a frame from explicit fields.
    ///
    /// Both hardware addresses must have the same length; the encoded
    /// hardware-address length is taken from `sender_hw`.
    pub fn new(
        op: ArpOp,
        sender_hw: &[u8],
        sender_ip: Ipv4Addr,
        target_hw: &[u8],
        target_ip: Ipv4Addr,
    ) -> Self {
        ArpFrame {
            op,
            sender_hw: sender_hw.to_vec(),
            sender_ip,
            target_hw: target_hw.to_vec(),
            target_ip,
        }
    }

    /// Creates an address probe: a request whose sender protocol address is
    /// 0.0.0.0, asking who holds `candidate`.
    pub fn probe(sender_hw: &[u8], candidate: Ipv4Addr) -> Self {
        let target_hw = vec![0; sender_hw.len()];
        ArpFrame {
            op: ArpOp::Request,
            sender_hw: sender_hw.to_vec(),
            sender_ip: Ipv4Addr::UNSPECIFIED,
            target_hw,
            target_ip: candidate,
        }
    }

    /// Creates a gratuitous announcement: a request with sender and target
    /// protocol address both set to the claimed `address`.
    pub fn announcement(sender_hw: &[u8], address: Ipv4Addr) -> Self {
        let target_hw = vec![0; sender_hw.len()];
        ArpFrame {
            op: ArpOp::Request,
            sender_hw: sender_hw.to_vec(),
            sender_ip: address,
            target_hw,
            target_ip: address,
        }
    }

    /// Encodes the frame with a broadcast link header.
    pub fn encode(&self) -> io::Result<Vec<u8>> {
        let hardware_len = self.sender_hw.len();
        let mut buffer =
            Vec::with_capacity(2 * hardware_len + 2 + ARP_HEADER_LEN + 2 * hardware_len + 8);

        // Link header: broadcast destination, sender source, ARP protocol
        buffer.resize(hardware_len, 0xFF);
        buffer.write_all(&self.sender_hw)?;
        buffer.write_u16::<BigEndian>(ETHERTYPE_ARP)?;

        // Fixed ARP header
        buffer.write_u16::<BigEndian>(HARDWARE_ETHERNET)?;
        buffer.write_u16::<BigEndian>(PROTOCOL_IPV4)?;
        buffer.write_u8(hardware_len as u8)?;
        buffer.write_u8(4)?;
        buffer.write_u16::<BigEndian>(self.op.to_u16())?;

        // Variable address fields
        buffer.write_all(&self.sender_hw)?;
        buffer.write_all(&self.sender_ip.octets())?;
        buffer.write_all(&self.target_hw)?;
        buffer.write_all(&self.target_ip.octets())?;

        Ok(buffer)
    }
}

/// A validated, borrowed view over one inbound ARP frame.
///
/// Parsing guarantees the frame extends through the sender protocol
/// address; the target fields may be missing on truncated frames and are
/// exposed as options.
#[derive(Debug, Clone, Copy)]
pub struct ArpView<'a> {
    payload: &'a [u8],
    hardware_len: usize,
}

impl<'a> ArpView<'a> {
    /// Validates `frame` against the link's framing parameters.
    ///
    /// Checks, in order: the frame covers the link header, the link
    /// protocol field (last two header bytes) carries ARP, the fixed ARP
    /// header is present, the announced hardware-address length equals the
    /// link's and the protocol-address length is IPv4's, and the frame
    /// extends through the sender protocol address. Hardware and protocol
    /// type values are not validated, only lengths; the types stay readable
    /// through the accessors.
    pub fn parse(frame: &'a [u8], link: LinkParams) -> Result<ArpView<'a>, WireError> {
        let header_len = link.header_len;
        if header_len < 2 || frame.len() < header_len {
            return Err(WireError::Truncated {
                len: frame.len(),
                need: header_len.max(2),
            });
        }

        let link_proto = u16::from_be_bytes([frame[header_len - 2], frame[header_len - 1]]);
        if link_proto != ETHERTYPE_ARP {
            return Err(WireError::NotArp(link_proto));
        }

        let payload = &frame[header_len..];
        if payload.len() < ARP_HEADER_LEN {
            return Err(WireError::Truncated {
                len: frame.len(),
                need: header_len + ARP_HEADER_LEN,
            });
        }

        let hardware_len = payload[4] as usize;
        let protocol_len = payload[5] as usize;
        if hardware_len != link.addr_len {
            return Err(WireError::HardwareLength {
                expected: link.addr_len,
                actual: hardware_len,
            });
        }
        if protocol_len != 4 {
            return Err(WireError::ProtocolLength(payload[5]));
        }

        let need = ARP_HEADER_LEN + hardware_len + protocol_len;
        if payload.len() < need {
            return Err(WireError::Truncated {
                len: frame.len(),
                need: header_len + need,
            });
        }

        Ok(ArpView {
            payload,
            hardware_len,
        })
    }

    /// Returns the hardware type field.
    pub fn hardware_type(&self) -> u16 {
        u16::from_be_bytes([self.payload[0], self.payload[1]])
    }

    /// Returns the protocol type field.
    pub fn protocol_type(&self) -> u16 {
        u16::from_be_bytes([self.payload[2], self.payload[3]])
    }

    /// Returns the raw operation code.
    pub fn op(&self) -> u16 {
        u16::from_be_bytes([self.payload[6], self.payload[7]])
    }

    /// Returns the sender hardware address.
    pub fn sender_hw(&self) -> &'a [u8] {
        &self.payload[ARP_HEADER_LEN..ARP_HEADER_LEN + self.hardware_len]
    }

    /// Returns the sender protocol address.
    pub fn sender_ip(&self) -> Ipv4Addr {
        let start = ARP_HEADER_LEN + self.hardware_len;
        Ipv4Addr::new(
            self.payload[start],
            self.payload[start + 1],
            self.payload[start + 2],
            self.payload[start + 3],
        )
    }

    /// Returns the target hardware address, when the frame carries it.
    pub fn target_hw(&self) -> Option<&'a [u8]> {
        let start = ARP_HEADER_LEN + self.hardware_len + 4;
        let end = start + self.hardware_len;
        if self.payload.len() < end {
            return None;
        }
        Some(&self.payload[start..end])
    }

    /// Returns the target protocol address, when the frame carries it.
    pub fn target_ip(&self) -> Option<Ipv4Addr> {
        let start = ARP_HEADER_LEN + 2 * self.hardware_len + 4;
        if self.payload.len() < start + 4 {
            return None;
        }
        Some(Ipv4Addr::new(
            self.payload[start],
            self.payload[start + 1],
            self.payload[start + 2],
            self.payload[start + 3],
        ))
    }
}
