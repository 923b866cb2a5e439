//! Duplicate Address Detection, RFC 4862 section 5.4.
//!
//! One Neighbor Solicitation from the unspecified address, then a bounded
//! wait for anyone defending or also claiming the same target.
//! A duplicate is final. Picking another address is up to the caller.

use super::{Packet, Socket};
use crate::iface::Error;
use crate::phy::Device;
use crate::time::Duration;
use crate::wire::{Ipv6Address, NdiscRepr};

/// Result of checking a tentative address.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Outcome {
    /// Nobody answered within the timeout.
    Unique,
    /// Another node owns, or is also claiming, the address.
    Duplicate,
}

/// Solicit `target` and wait up to `timeout` for a conflict.
///
/// Fails with [Error::InvalidAddress] when `target` is not unicast, and
/// with [Error::Transmit] when the solicitation cannot be sent.
pub fn detect<D: Device>(
    socket: &mut Socket<'_, D>,
    target: Ipv6Address,
    timeout: Duration,
) -> Result<Outcome, Error> {
    if !target.is_unicast() {
        net_debug!("DAD: {} is not unicast", target);
        return Err(Error::InvalidAddress);
    }
    net_debug!("DAD: checking {}", target);

    let solicit = NdiscRepr::NeighborSolicit {
        target_addr: target,
        lladdr: None,
    };
    socket.send_ndisc(Ipv6Address::UNSPECIFIED, target.solicited_node(), &solicit)?;

    let deadline = socket.now() + timeout;
    let conflict = socket.recv_until(deadline, |packet| match packet {
        Packet::Ndisc(ip_repr, NdiscRepr::NeighborAdvert { target_addr, .. })
            if target_addr == target =>
        {
            net_debug!("DAD: {} is defended by {}", target, ip_repr.src_addr);
            Some(())
        }
        Packet::Ndisc(ip_repr, NdiscRepr::NeighborSolicit { target_addr, .. })
            if target_addr == target && ip_repr.src_addr.is_unspecified() =>
        {
            net_debug!("DAD: another node is claiming {}", target);
            Some(())
        }
        _ => None,
    });

    match conflict {
        Some(()) => Ok(Outcome::Duplicate),
        None => {
            net_debug!("DAD: {} is unique", target);
            Ok(Outcome::Unique)
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::tests::{frames, MockDevice, MAC};
    use crate::wire::NdiscRepr;

    fn link_local() -> Ipv6Address {
        Ipv6Address::new(0xfe80, 0, 0, 0, 0, 0xff, 0xfe00, 1)
    }

    #[test]
    fn test_silence_is_unique() {
        let mut device = MockDevice::new();
        let mut socket = Socket::new(&mut device, MAC);
        let start = socket.now();
        let outcome = detect(&mut socket, link_local(), Duration::from_secs(1));
        assert_eq!(outcome, Ok(Outcome::Unique));
        assert_eq!(socket.now() - start, Duration::from_secs(1));

        let sent = device.sent();
        assert_eq!(sent.len(), 1);
        let (ip_repr, repr) = frames::parse_ndisc(&sent[0]).unwrap();
        assert_eq!(ip_repr.src_addr, Ipv6Address::UNSPECIFIED);
        assert_eq!(ip_repr.dst_addr, link_local().solicited_node());
        assert_eq!(
            repr,
            NdiscRepr::NeighborSolicit {
                target_addr: link_local(),
                lladdr: None
            }
        );
    }

    #[test]
    fn test_advert_is_duplicate() {
        let mut device = MockDevice::new();
        device.respond(|frame, _| match frames::parse_ndisc(frame) {
            Some((_, NdiscRepr::NeighborSolicit { target_addr, .. })) => {
                vec![frames::neighbor_advert(
                    frames::ROUTER_MAC,
                    target_addr,
                    target_addr,
                )]
            }
            _ => vec![],
        });
        let mut socket = Socket::new(&mut device, MAC);
        let outcome = detect(&mut socket, link_local(), Duration::from_secs(1));
        assert_eq!(outcome, Ok(Outcome::Duplicate));
    }

    #[test]
    fn test_advert_for_other_target_ignored() {
        let other = Ipv6Address::new(0xfe80, 0, 0, 0, 0, 0, 0, 0x99);
        let mut device = MockDevice::new();
        device.push(frames::neighbor_advert(frames::ROUTER_MAC, other, other));
        let mut socket = Socket::new(&mut device, MAC);
        let outcome = detect(&mut socket, link_local(), Duration::from_secs(1));
        assert_eq!(outcome, Ok(Outcome::Unique));
    }

    #[test]
    fn test_concurrent_claim_is_duplicate() {
        let mut device = MockDevice::new();
        device.push(frames::dad_solicit(frames::ROUTER_MAC, link_local()));
        let mut socket = Socket::new(&mut device, MAC);
        let outcome = detect(&mut socket, link_local(), Duration::from_secs(1));
        assert_eq!(outcome, Ok(Outcome::Duplicate));
    }

    #[test]
    fn test_transmit_failure() {
        let mut device = MockDevice::new();
        device.fail_transmit(true);
        let mut socket = Socket::new(&mut device, MAC);
        let outcome = detect(&mut socket, link_local(), Duration::from_secs(1));
        assert_eq!(outcome, Err(Error::Transmit));
    }

    #[test]
    fn test_multicast_target_rejected() {
        let mut device = MockDevice::new();
        let mut socket = Socket::new(&mut device, MAC);
        let target = Ipv6Address::new(0xff02, 0, 0, 0, 0, 0xff, 0xfe00, 1);
        assert_eq!(
            detect(&mut socket, target, Duration::from_secs(1)),
            Err(Error::InvalidAddress)
        );
        assert_eq!(
            detect(&mut socket, Ipv6Address::UNSPECIFIED, Duration::from_secs(1)),
            Err(Error::InvalidAddress)
        );
        assert!(device.sent().is_empty());
    }
}
