//! Conflict probing for candidate addresses.
//!
//! RFC 3927 section 2.2.1: before claiming a candidate, broadcast ARP
//! requests with an unspecified sender address and watch for any inbound
//! ARP frame whose sender protocol address equals the candidate. Any such
//! frame, request or reply, means another host already holds the address.

use std::{io, net::Ipv4Addr};

use linklocal_core::{constants, device::LinkDevice, jitter::JitterSource, time::Clock};
use linklocal_wire::{ArpFrame, ArpView};

/// Outcome of probing one candidate address.
#[derive(Debug)]
pub enum ProbeVerdict {
    /// No host answered for the candidate; it is free to claim
    Clear,

    /// Another host already uses the candidate
    Conflict,

    /// A probe could not be transmitted
    TransmitFailed(io::Error),
}

impl ProbeVerdict {
    /// Returns true when the candidate survived every probe
    pub fn is_clear(&self) -> bool {
        matches!(self, ProbeVerdict::Clear)
    }
}

/// Probes `candidate` for conflicts with [`constants::PROBE_COUNT`] probes.
///
/// Each cycle flushes stale inbound frames, broadcasts one probe, waits
/// [`constants::PROBE_WAIT`] for answers, and scans the queue before
/// handing its frames back to the stack. Cycles after the first start
/// [`constants::PROBE_GAP_FLOOR`] plus a jitter offset apart. The scan
/// itself never consumes frames; the stack processes them normally through
/// the poll that follows.
pub fn probe_candidate<D: LinkDevice>(
    device: &mut D,
    clock: &dyn Clock,
    jitter: &mut dyn JitterSource,
    link_addr: &[u8],
    candidate: Ipv4Addr,
) -> ProbeVerdict {
    tracing::debug!("{} probing {}", device.name(), candidate);

    let frame = match ArpFrame::probe(link_addr, candidate).encode() {
        Ok(frame) => frame,
        Err(err) => return ProbeVerdict::TransmitFailed(err),
    };

    for cycle in 0..constants::PROBE_COUNT {
        // Flush frames left over from earlier cycles before transmitting
        device.poll();

        if let Err(err) = device.transmit(&frame) {
            tracing::warn!("{} probe transmission failed: {}", device.name(), err);
            return ProbeVerdict::TransmitFailed(err);
        }
        tracing::trace!(
            "{} sent probe {}/{}",
            device.name(),
            cycle + 1,
            constants::PROBE_COUNT
        );

        clock.sleep(constants::PROBE_WAIT);

        if conflict_in_queue(device, candidate) {
            // Hand the queued frames to the stack before reporting
            device.poll();
            return ProbeVerdict::Conflict;
        }
        device.poll();

        if cycle < constants::PROBE_COUNT - 1 {
            clock.sleep(constants::PROBE_GAP_FLOOR + jitter.sample(constants::JITTER_BOUND));
        }
    }

    ProbeVerdict::Clear
}

/// Scans the inbound queue for an ARP frame claiming `candidate`.
///
/// Frames that fail validation carry no evidence and are skipped.
fn conflict_in_queue<D: LinkDevice>(device: &D, candidate: Ipv4Addr) -> bool {
    let params = device.link_params();
    for index in 0..device.queued_len() {
        let frame = match device.frame(index) {
            Some(frame) => frame,
            None => continue,
        };
        let view = match ArpView::parse(frame, params) {
            Ok(view) => view,
            Err(_) => continue,
        };
        if view.sender_ip() == candidate {
            tracing::debug!("{} conflict: ARP from {}", device.name(), candidate);
            return true;
        }
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    use linklocal_core::{
        device::{InboundQueue, LinkParams},
        mock::{FixedJitter, ManualClock, MockDevice},
    };
    use linklocal_wire::ArpOp;

    const MAC: [u8; 6] = [0x02, 0x00, 0x00, 0x00, 0x00, 0x01];

    fn conflict_frame(claimed: Ipv4Addr) -> Vec<u8> {
        let other = [0xAA, 0xBB, 0xCC, 0x00, 0x11, 0x22];
        ArpFrame::new(ArpOp::Reply, &other, claimed, &MAC, Ipv4Addr::UNSPECIFIED)
            .encode()
            .unwrap()
    }

    fn probe_on(device: &mut MockDevice, candidate: Ipv4Addr) -> ProbeVerdict {
        let clock = ManualClock::new();
        let mut jitter = FixedJitter::ZERO;
        probe_candidate(device, &clock, &mut jitter, &MAC, candidate)
    }

    #[test]
    fn test_clear_candidate_sends_three_probes() {
        let mut device = MockDevice::ethernet("net0", MAC);
        let clock = ManualClock::new();
        let mut jitter = FixedJitter::ZERO;
        let candidate = Ipv4Addr::new(169, 254, 1, 3);

        let verdict = probe_candidate(&mut device, &clock, &mut jitter, &MAC, candidate);

        assert!(verdict.is_clear());
        assert_eq!(device.sent().len(), 3);
        for frame in device.sent() {
            let view = ArpView::parse(frame, LinkParams::ETHERNET).unwrap();
            assert_eq!(view.sender_ip(), Ipv4Addr::UNSPECIFIED);
            assert_eq!(view.target_ip(), Some(candidate));
            assert_eq!(view.sender_hw(), &MAC);
        }
        assert_eq!(
            clock.sleeps(),
            vec![
                Duration::from_millis(200),
                Duration::from_millis(1000),
                Duration::from_millis(200),
                Duration::from_millis(1000),
                Duration::from_millis(200),
            ]
        );
    }

    #[test]
    fn test_gap_carries_jitter_offset() {
        let mut device = MockDevice::ethernet("net0", MAC);
        let clock = ManualClock::new();
        let mut jitter = FixedJitter(Duration::from_millis(500));

        let verdict = probe_candidate(
            &mut device,
            &clock,
            &mut jitter,
            &MAC,
            Ipv4Addr::new(169, 254, 1, 3),
        );

        assert!(verdict.is_clear());
        assert_eq!(
            clock.sleeps(),
            vec![
                Duration::from_millis(200),
                Duration::from_millis(1500),
                Duration::from_millis(200),
                Duration::from_millis(1500),
                Duration::from_millis(200),
            ]
        );
    }

    #[test]
    fn test_conflicting_reply_stops_probing() {
        let candidate = Ipv4Addr::new(169, 254, 1, 3);
        let mut device = MockDevice::ethernet("net0", MAC);
        device.inject_after(1, conflict_frame(candidate));

        let verdict = probe_on(&mut device, candidate);

        assert!(matches!(verdict, ProbeVerdict::Conflict));
        assert_eq!(device.sent().len(), 1);
        // The queue was handed back to the stack after detection
        assert_eq!(device.queued_len(), 0);
    }

    #[test]
    fn test_conflict_on_second_cycle() {
        let candidate = Ipv4Addr::new(169, 254, 1, 3);
        let mut device = MockDevice::ethernet("net0", MAC);
        device.inject_after(2, conflict_frame(candidate));

        let verdict = probe_on(&mut device, candidate);

        assert!(matches!(verdict, ProbeVerdict::Conflict));
        assert_eq!(device.sent().len(), 2);
    }

    #[test]
    fn test_unrelated_arp_traffic_is_ignored() {
        let mut device = MockDevice::ethernet("net0", MAC);
        device.inject_after(1, conflict_frame(Ipv4Addr::new(169, 254, 77, 77)));

        let verdict = probe_on(&mut device, Ipv4Addr::new(169, 254, 1, 3));

        assert!(verdict.is_clear());
        assert_eq!(device.sent().len(), 3);
    }

    #[test]
    fn test_malformed_frames_carry_no_evidence() {
        let candidate = Ipv4Addr::new(169, 254, 1, 3);
        let mut device = MockDevice::ethernet("net0", MAC);

        // Same sender address everywhere, but none of these should parse:
        // a truncated frame, a non-ARP EtherType, a foreign hardware
        // length, and a foreign protocol length.
        let good = conflict_frame(candidate);
        device.inject_after(1, good[..20].to_vec());
        let mut wrong_proto = good.clone();
        wrong_proto[12] = 0x08;
        wrong_proto[13] = 0x00;
        device.inject_after(1, wrong_proto);
        let mut wrong_hlen = good.clone();
        wrong_hlen[18] = 8;
        device.inject_after(1, wrong_hlen);
        let mut wrong_plen = good;
        wrong_plen[19] = 6;
        device.inject_after(1, wrong_plen);

        let verdict = probe_on(&mut device, candidate);

        assert!(verdict.is_clear());
        assert_eq!(device.sent().len(), 3);
    }

    #[test]
    fn test_stale_frames_are_flushed_before_probing() {
        let candidate = Ipv4Addr::new(169, 254, 1, 3);
        let mut device = MockDevice::ethernet("net0", MAC);
        // Queued before any probe went out, so not an answer to one
        device.push_frame(conflict_frame(candidate));

        let verdict = probe_on(&mut device, candidate);

        assert!(verdict.is_clear());
        assert!(device.drained() >= 1);
    }

    #[test]
    fn test_transmit_failure_aborts_probing() {
        let mut device = MockDevice::ethernet("net0", MAC);
        device.fail_transmit_call(0);
        let clock = ManualClock::new();
        let mut jitter = FixedJitter::ZERO;

        let verdict = probe_candidate(
            &mut device,
            &clock,
            &mut jitter,
            &MAC,
            Ipv4Addr::new(169, 254, 1, 3),
        );

        assert!(matches!(verdict, ProbeVerdict::TransmitFailed(_)));
        assert!(device.sent().is_empty());
        assert!(clock.sleeps().is_empty());
    }
}
