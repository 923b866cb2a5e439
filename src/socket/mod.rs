/*! Protocol engines.

Each engine runs one exchange to completion over a [Socket], the thin frame
helper that wraps a [Device](crate::phy::Device):

 * [dad] checks whether a tentative address is already in use.
 * [slaac] solicits a router and derives a global address from its
   advertisement.
 * [dhcpv6] obtains configuration from a DHCPv6 server and keeps a
   stateful lease alive.

The engines never touch chip registers. The [iface](crate::iface) module
decides what to commit.
*/

pub mod dad;
pub mod dhcpv6;
pub mod slaac;

use crate::iface::Error;
use crate::phy::{Device, MAX_FRAME_LEN};
use crate::time::Instant;
use crate::wire::{
    Dhcpv6Packet, Dhcpv6Repr, EthernetAddress, EthernetFrame, EthernetProtocol, EthernetRepr,
    Icmpv6Packet, IpProtocol, Ipv6Address, Ipv6InterfaceId, Ipv6Packet, Ipv6Repr, NdiscRepr,
    UdpPacket, UdpRepr, DHCPV6_CLIENT_PORT, DHCPV6_SERVER_PORT, ETHERNET_HEADER_LEN,
    IPV6_HEADER_LEN, UDP_HEADER_LEN,
};

cfg_if::cfg_if! {
    if #[cfg(feature = "verbose")] {
        macro_rules! frame_trace {
            ($($arg:expr),*) => (net_trace!($($arg),*));
        }
    } else {
        macro_rules! frame_trace {
            ($($arg:expr),*) => {{ $( let _ = &$arg; )* }};
        }
    }
}

/// Hop limit required on every neighbor discovery message.
pub const NDISC_HOP_LIMIT: u8 = 255;
/// Hop limit used for DHCPv6 messages.
pub const DHCPV6_HOP_LIMIT: u8 = 1;

/// A packet the engines care about, decoded from a received frame.
#[derive(Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub(crate) enum Packet<'a> {
    Ndisc(Ipv6Repr, NdiscRepr),
    Dhcpv6(Ipv6Repr, Dhcpv6Repr<'a>),
}

/// Frame helper shared by the engines.
///
/// Owns the transmit and receive buffers, so that one exchange never needs
/// more memory than two maximum-size frames.
pub struct Socket<'d, D: Device> {
    device: &'d mut D,
    hardware_addr: EthernetAddress,
    tx_buffer: [u8; MAX_FRAME_LEN],
    rx_buffer: [u8; MAX_FRAME_LEN],
}

impl<'d, D: Device> Socket<'d, D> {
    pub fn new(device: &'d mut D, hardware_addr: EthernetAddress) -> Self {
        Socket {
            device,
            hardware_addr,
            tx_buffer: [0; MAX_FRAME_LEN],
            rx_buffer: [0; MAX_FRAME_LEN],
        }
    }

    /// The current time on the device clock.
    pub fn now(&self) -> Instant {
        self.device.now()
    }

    pub fn hardware_addr(&self) -> EthernetAddress {
        self.hardware_addr
    }

    /// The EUI-64 link-local address of this interface.
    pub fn link_local_addr(&self) -> Ipv6Address {
        Ipv6Address::link_local(Ipv6InterfaceId::from_ethernet(self.hardware_addr))
    }

    /// Send a neighbor discovery message.
    pub fn send_ndisc(
        &mut self,
        src_addr: Ipv6Address,
        dst_addr: Ipv6Address,
        repr: &NdiscRepr,
    ) -> Result<(), Error> {
        let ip_repr = Ipv6Repr {
            src_addr,
            dst_addr,
            next_header: IpProtocol::Icmpv6,
            payload_len: repr.buffer_len(),
            hop_limit: NDISC_HOP_LIMIT,
        };
        frame_trace!("sending {:?} to {}", repr, dst_addr);

        self.dispatch(ip_repr, |payload| {
            let mut packet = Icmpv6Packet::new_unchecked(payload);
            repr.emit(&mut packet);
            packet.fill_checksum(&src_addr, &dst_addr);
            Ok(())
        })
    }

    /// Send a DHCPv6 message from `src_addr` to All_DHCP_Relay_Agents_and_Servers.
    pub fn send_dhcpv6(&mut self, src_addr: Ipv6Address, repr: &Dhcpv6Repr) -> Result<(), Error> {
        let dst_addr = Ipv6Address::LINK_LOCAL_ALL_DHCP_SERVERS;
        let udp_repr = UdpRepr {
            src_port: DHCPV6_CLIENT_PORT,
            dst_port: DHCPV6_SERVER_PORT,
        };
        let dhcp_len = repr.buffer_len();
        let ip_repr = Ipv6Repr {
            src_addr,
            dst_addr,
            next_header: IpProtocol::Udp,
            payload_len: UDP_HEADER_LEN + dhcp_len,
            hop_limit: DHCPV6_HOP_LIMIT,
        };
        frame_trace!("sending {} to {}", repr, dst_addr);

        self.dispatch(ip_repr, |payload| {
            let mut packet = UdpPacket::new_unchecked(payload);
            let mut result = Ok(());
            udp_repr.emit(&mut packet, &src_addr, &dst_addr, dhcp_len, |buf| {
                result = repr.emit(&mut Dhcpv6Packet::new_unchecked(buf));
            });
            result.map_err(|_| Error::Transmit)
        })
    }

    fn dispatch<F>(&mut self, ip_repr: Ipv6Repr, emit_payload: F) -> Result<(), Error>
    where
        F: FnOnce(&mut [u8]) -> Result<(), Error>,
    {
        let total_len = ETHERNET_HEADER_LEN + IPV6_HEADER_LEN + ip_repr.payload_len;
        if total_len > MAX_FRAME_LEN {
            net_debug!("frame of {} octets does not fit, dropping", total_len);
            return Err(Error::Transmit);
        }

        let dst_hardware_addr = if ip_repr.dst_addr.is_multicast() {
            ip_repr.dst_addr.multicast_ethernet_addr()
        } else {
            EthernetAddress::BROADCAST
        };
        let eth_repr = EthernetRepr {
            src_addr: self.hardware_addr,
            dst_addr: dst_hardware_addr,
            ethertype: EthernetProtocol::Ipv6,
        };

        let mut frame = EthernetFrame::new_unchecked(&mut self.tx_buffer[..total_len]);
        eth_repr.emit(&mut frame);
        let mut packet = Ipv6Packet::new_unchecked(frame.payload_mut());
        ip_repr.emit(&mut packet);
        emit_payload(packet.payload_mut())?;

        self.device
            .transmit(&self.tx_buffer[..total_len])
            .map_err(|_| Error::Transmit)
    }

    /// Receive frames until `f` accepts one or `deadline` passes.
    ///
    /// Frames that do not decode to a neighbor discovery or DHCPv6 message
    /// addressed to this interface are dropped silently.
    pub(crate) fn recv_until<R, F>(&mut self, deadline: Instant, mut f: F) -> Option<R>
    where
        F: FnMut(Packet<'_>) -> Option<R>,
    {
        loop {
            let now = self.device.now();
            if now >= deadline {
                return None;
            }
            let len = match self.device.receive(&mut self.rx_buffer, deadline - now) {
                Some(len) => len.min(MAX_FRAME_LEN),
                None => continue,
            };
            if let Some(packet) = parse_frame(self.hardware_addr, &self.rx_buffer[..len]) {
                if let Some(result) = f(packet) {
                    return Some(result);
                }
            }
        }
    }
}

fn parse_frame(hardware_addr: EthernetAddress, buffer: &[u8]) -> Option<Packet<'_>> {
    let frame = EthernetFrame::new_checked(buffer).ok()?;
    let eth_repr = EthernetRepr::parse(&frame).ok()?;
    if eth_repr.src_addr == hardware_addr {
        // our own multicast, looped back
        return None;
    }
    if eth_repr.dst_addr != hardware_addr && !eth_repr.dst_addr.is_multicast() {
        return None;
    }
    if eth_repr.ethertype != EthernetProtocol::Ipv6 {
        return None;
    }

    let ipv6_packet = Ipv6Packet::new_checked(frame.payload()).ok()?;
    let ip_repr = Ipv6Repr::parse(&ipv6_packet).ok()?;

    match ip_repr.next_header {
        IpProtocol::Icmpv6 => {
            let packet = Icmpv6Packet::new_checked(ipv6_packet.payload()).ok()?;
            if !packet.msg_type().is_ndisc() {
                return None;
            }
            if !packet.verify_checksum(&ip_repr.src_addr, &ip_repr.dst_addr) {
                net_debug!("ICMPv6 from {}: bad checksum", ip_repr.src_addr);
                return None;
            }
            if ip_repr.hop_limit != NDISC_HOP_LIMIT {
                net_debug!(
                    "{} from {}: hop limit {}, dropping",
                    packet.msg_type(),
                    ip_repr.src_addr,
                    ip_repr.hop_limit
                );
                return None;
            }
            match NdiscRepr::parse(&packet) {
                Ok(repr) => {
                    frame_trace!("received {:?} from {}", repr, ip_repr.src_addr);
                    Some(Packet::Ndisc(ip_repr, repr))
                }
                Err(e) => {
                    net_debug!("{} from {}: {}", packet.msg_type(), ip_repr.src_addr, e);
                    None
                }
            }
        }
        IpProtocol::Udp => {
            let packet = UdpPacket::new_checked(ipv6_packet.payload()).ok()?;
            if packet.dst_port() != DHCPV6_CLIENT_PORT || packet.src_port() != DHCPV6_SERVER_PORT
            {
                return None;
            }
            if UdpRepr::parse(&packet, &ip_repr.src_addr, &ip_repr.dst_addr).is_err() {
                net_debug!("UDP from {}: bad checksum", ip_repr.src_addr);
                return None;
            }
            let dhcp_packet = match Dhcpv6Packet::new_checked(packet.payload()) {
                Ok(dhcp_packet) => dhcp_packet,
                Err(e) => {
                    net_debug!("DHCPv6 from {}: {}", ip_repr.src_addr, e);
                    return None;
                }
            };
            match Dhcpv6Repr::parse(&dhcp_packet) {
                Ok(repr) => {
                    frame_trace!("received {} from {}", repr, ip_repr.src_addr);
                    Some(Packet::Dhcpv6(ip_repr, repr))
                }
                Err(e) => {
                    net_debug!("DHCPv6 from {}: {}", ip_repr.src_addr, e);
                    None
                }
            }
        }
        _ => None,
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::tests::{frames, MockDevice, MAC};
    use crate::time::Duration;
    use crate::wire::{Dhcpv6MessageType, NdiscNeighborFlags};

    #[test]
    fn test_ndisc_frame_layout() {
        let mut device = MockDevice::new();
        let mut socket = Socket::new(&mut device, MAC);
        let target = socket.link_local_addr();
        let repr = NdiscRepr::NeighborSolicit {
            target_addr: target,
            lladdr: None,
        };
        socket
            .send_ndisc(Ipv6Address::UNSPECIFIED, target.solicited_node(), &repr)
            .unwrap();

        let sent = device.sent();
        assert_eq!(sent.len(), 1);
        let frame = EthernetFrame::new_checked(&sent[0][..]).unwrap();
        assert_eq!(frame.dst_addr(), EthernetAddress([0x33, 0x33, 0xff, 0x00, 0x00, 0x01]));
        assert_eq!(frame.src_addr(), MAC);
        let packet = Ipv6Packet::new_checked(frame.payload()).unwrap();
        assert_eq!(packet.hop_limit(), 255);
        assert_eq!(packet.payload_len(), 24);
        let icmp = Icmpv6Packet::new_checked(packet.payload()).unwrap();
        assert!(icmp.verify_checksum(&packet.src_addr(), &packet.dst_addr()));
    }

    #[test]
    fn test_dhcpv6_frame_layout() {
        let mut device = MockDevice::new();
        let mut socket = Socket::new(&mut device, MAC);
        let src_addr = socket.link_local_addr();
        let repr = Dhcpv6Repr {
            message_type: Dhcpv6MessageType::InformationRequest,
            transaction_id: 0x123456,
            client_id: Some(&[0, 3, 0, 1, 2, 0, 0, 0, 0, 1]),
            server_id: None,
            elapsed_time: Some(0),
            request_options: None,
            ia_na: None,
            dns_servers: None,
            status_code: None,
        };
        socket.send_dhcpv6(src_addr, &repr).unwrap();

        let sent = device.sent();
        let (ip_repr, dhcp) = frames::parse_dhcpv6(&sent[0]).unwrap();
        assert_eq!(ip_repr.dst_addr, Ipv6Address::LINK_LOCAL_ALL_DHCP_SERVERS);
        assert_eq!(dhcp.transaction_id, 0x123456);
        assert_eq!(dhcp.message_type, Dhcpv6MessageType::InformationRequest);
    }

    #[test]
    fn test_recv_filters_foreign_unicast() {
        let mut device = MockDevice::new();
        let target = Ipv6Address::new(0xfe80, 0, 0, 0, 0, 0xff, 0xfe00, 1);
        let foreign = EthernetAddress([0x02, 0, 0, 0, 0, 0x77]);
        let mut frame = frames::neighbor_advert(frames::ROUTER_MAC, target, target);
        frame[0..6].copy_from_slice(foreign.as_bytes());
        device.push(frame);
        device.push(frames::neighbor_advert(frames::ROUTER_MAC, target, target));

        let mut socket = Socket::new(&mut device, MAC);
        let deadline = socket.now() + Duration::from_secs(1);
        let mut seen = 0;
        let result = socket.recv_until(deadline, |packet| match packet {
            Packet::Ndisc(_, NdiscRepr::NeighborAdvert { flags, .. }) => {
                seen += 1;
                Some(flags)
            }
            _ => None,
        });
        assert_eq!(result, Some(NdiscNeighborFlags::OVERRIDE));
        assert_eq!(seen, 1);
    }

    #[test]
    fn test_recv_times_out() {
        let mut device = MockDevice::new();
        let mut socket = Socket::new(&mut device, MAC);
        let start = socket.now();
        let deadline = start + Duration::from_millis(1500);
        assert_eq!(socket.recv_until(deadline, |_| Some(())), None);
        assert_eq!(socket.now(), deadline);
    }
}
