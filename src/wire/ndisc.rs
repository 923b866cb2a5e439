use bitflags::bitflags;
use byteorder::{ByteOrder, NetworkEndian};
use heapless::Vec;

use super::icmpv6::{field, Message, Packet};
use super::{
    EthernetAddress, Ipv6Address, NdiscOption, NdiscOptionRepr, NdiscPrefixInformation,
    NdiscRecursiveDnsServer,
};
use super::{Error, Result};
use crate::time::Duration;

/// Prefix information options kept from a single router advertisement.
pub const MAX_PREFIX_INFO: usize = 4;

bitflags! {
    #[cfg_attr(feature = "defmt", derive(defmt::Format))]
    pub struct RouterFlags: u8 {
        const MANAGED = 0b10000000;
        const OTHER   = 0b01000000;
    }
}

bitflags! {
    #[cfg_attr(feature = "defmt", derive(defmt::Format))]
    pub struct NeighborFlags: u8 {
        const ROUTER    = 0b10000000;
        const SOLICITED = 0b01000000;
        const OVERRIDE  = 0b00100000;
    }
}

/// Getters for the Router Advertisement message header.
/// See [RFC 4861 § 4.2].
///
/// [RFC 4861 § 4.2]: https://tools.ietf.org/html/rfc4861#section-4.2
impl<T: AsRef<[u8]>> Packet<T> {
    /// Return the current hop limit field.
    #[inline]
    pub fn current_hop_limit(&self) -> u8 {
        let data = self.buffer.as_ref();
        data[field::CUR_HOP_LIMIT]
    }

    /// Return the Router Advertisement flags.
    #[inline]
    pub fn router_flags(&self) -> RouterFlags {
        let data = self.buffer.as_ref();
        RouterFlags::from_bits_truncate(data[field::ROUTER_FLAGS])
    }

    /// Return the router lifetime field.
    #[inline]
    pub fn router_lifetime(&self) -> Duration {
        let data = self.buffer.as_ref();
        Duration::from_secs(NetworkEndian::read_u16(&data[field::ROUTER_LT]) as u64)
    }

    /// Return the reachable time field.
    #[inline]
    pub fn reachable_time(&self) -> Duration {
        let data = self.buffer.as_ref();
        Duration::from_millis(NetworkEndian::read_u32(&data[field::REACHABLE_TM]) as u64)
    }

    /// Return the retransmit time field.
    #[inline]
    pub fn retrans_time(&self) -> Duration {
        let data = self.buffer.as_ref();
        Duration::from_millis(NetworkEndian::read_u32(&data[field::RETRANS_TM]) as u64)
    }
}

/// Common getters for the [Neighbor Solicitation], [Neighbor Advertisement]
/// and [Redirect] message types.
///
/// [Neighbor Solicitation]: https://tools.ietf.org/html/rfc4861#section-4.3
/// [Neighbor Advertisement]: https://tools.ietf.org/html/rfc4861#section-4.4
/// [Redirect]: https://tools.ietf.org/html/rfc4861#section-4.5
impl<T: AsRef<[u8]>> Packet<T> {
    /// Return the target address field.
    #[inline]
    pub fn target_addr(&self) -> Ipv6Address {
        let data = self.buffer.as_ref();
        Ipv6Address::from_bytes(&data[field::TARGET_ADDR])
    }

    /// Return the Neighbor Advertisement flags.
    #[inline]
    pub fn neighbor_flags(&self) -> NeighborFlags {
        let data = self.buffer.as_ref();
        NeighborFlags::from_bits_truncate(data[field::NEIGH_FLAGS])
    }
}

impl<'a, T: AsRef<[u8]> + ?Sized> Packet<&'a T> {
    /// Return the options following the fixed message header.
    #[inline]
    pub fn ndisc_options(&self) -> &'a [u8] {
        let start = self.header_len();
        let data = self.buffer.as_ref();
        &data[start..]
    }
}

impl<T: AsRef<[u8]> + AsMut<[u8]>> Packet<T> {
    /// Set the current hop limit field.
    #[inline]
    pub fn set_current_hop_limit(&mut self, value: u8) {
        let data = self.buffer.as_mut();
        data[field::CUR_HOP_LIMIT] = value;
    }

    /// Set the Router Advertisement flags.
    #[inline]
    pub fn set_router_flags(&mut self, flags: RouterFlags) {
        self.buffer.as_mut()[field::ROUTER_FLAGS] = flags.bits();
    }

    /// Set the router lifetime field.
    #[inline]
    pub fn set_router_lifetime(&mut self, value: Duration) {
        let data = self.buffer.as_mut();
        NetworkEndian::write_u16(&mut data[field::ROUTER_LT], value.secs() as u16);
    }

    /// Set the reachable time field.
    #[inline]
    pub fn set_reachable_time(&mut self, time: Duration) {
        let data = self.buffer.as_mut();
        NetworkEndian::write_u32(&mut data[field::REACHABLE_TM], time.total_millis() as u32);
    }

    /// Set the retransmit time field.
    #[inline]
    pub fn set_retrans_time(&mut self, time: Duration) {
        let data = self.buffer.as_mut();
        NetworkEndian::write_u32(&mut data[field::RETRANS_TM], time.total_millis() as u32);
    }

    /// Set the target address field.
    #[inline]
    pub fn set_target_addr(&mut self, value: Ipv6Address) {
        let data = self.buffer.as_mut();
        data[field::TARGET_ADDR].copy_from_slice(value.as_bytes());
    }

    /// Set the Neighbor Advertisement flags, clearing the reserved bits.
    #[inline]
    pub fn set_neighbor_flags(&mut self, flags: NeighborFlags) {
        self.clear_reserved();
        self.buffer.as_mut()[field::NEIGH_FLAGS] = flags.bits();
    }
}

/// A high-level representation of a Neighbor Discovery packet header.
#[derive(Debug, PartialEq, Eq, Clone)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Repr {
    RouterSolicit {
        lladdr: Option<EthernetAddress>,
    },
    RouterAdvert {
        hop_limit: u8,
        flags: RouterFlags,
        router_lifetime: Duration,
        reachable_time: Duration,
        retrans_time: Duration,
        lladdr: Option<EthernetAddress>,
        mtu: Option<u32>,
        prefix_info: Vec<NdiscPrefixInformation, MAX_PREFIX_INFO>,
        rdnss: Option<NdiscRecursiveDnsServer>,
    },
    NeighborSolicit {
        target_addr: Ipv6Address,
        lladdr: Option<EthernetAddress>,
    },
    NeighborAdvert {
        flags: NeighborFlags,
        target_addr: Ipv6Address,
        lladdr: Option<EthernetAddress>,
    },
}

/// Walk a run of NDISC options, stopping at the first malformed one.
fn for_each_option<'a, F>(mut data: &'a [u8], mut f: F) -> Result<()>
where
    F: FnMut(NdiscOptionRepr<'a>),
{
    while !data.is_empty() {
        let opt = NdiscOption::new_checked(data)?;
        let len = opt.total_len();
        f(NdiscOptionRepr::parse(&opt)?);
        data = &data[len..];
    }
    Ok(())
}

impl Repr {
    /// Parse an NDISC packet and return a high-level representation of the
    /// packet.
    pub fn parse<T>(packet: &Packet<&T>) -> Result<Repr>
    where
        T: AsRef<[u8]> + ?Sized,
    {
        packet.check_len()?;
        if packet.msg_code() != 0 {
            return Err(Error);
        }

        match packet.msg_type() {
            Message::RouterSolicit => {
                let mut lladdr = None;
                for_each_option(packet.ndisc_options(), |opt| {
                    if let NdiscOptionRepr::SourceLinkLayerAddr(addr) = opt {
                        lladdr = Some(addr);
                    }
                })?;
                Ok(Repr::RouterSolicit { lladdr })
            }
            Message::RouterAdvert => {
                let mut lladdr = None;
                let mut mtu = None;
                let mut prefix_info = Vec::new();
                let mut rdnss = None;
                for_each_option(packet.ndisc_options(), |opt| match opt {
                    NdiscOptionRepr::SourceLinkLayerAddr(addr) => lladdr = Some(addr),
                    NdiscOptionRepr::Mtu(val) => mtu = Some(val),
                    NdiscOptionRepr::PrefixInformation(info) => {
                        if prefix_info.push(info).is_err() {
                            net_debug!("ndisc: dropping prefix {}", info.prefix);
                        }
                    }
                    // Only the first RDNSS option is kept.
                    NdiscOptionRepr::RecursiveDnsServer(servers) if rdnss.is_none() => {
                        rdnss = Some(servers)
                    }
                    _ => {}
                })?;
                Ok(Repr::RouterAdvert {
                    hop_limit: packet.current_hop_limit(),
                    flags: packet.router_flags(),
                    router_lifetime: packet.router_lifetime(),
                    reachable_time: packet.reachable_time(),
                    retrans_time: packet.retrans_time(),
                    lladdr,
                    mtu,
                    prefix_info,
                    rdnss,
                })
            }
            Message::NeighborSolicit => {
                let target_addr = packet.target_addr();
                if target_addr.is_multicast() {
                    return Err(Error);
                }
                let mut lladdr = None;
                for_each_option(packet.ndisc_options(), |opt| {
                    if let NdiscOptionRepr::SourceLinkLayerAddr(addr) = opt {
                        lladdr = Some(addr);
                    }
                })?;
                Ok(Repr::NeighborSolicit {
                    target_addr,
                    lladdr,
                })
            }
            Message::NeighborAdvert => {
                let target_addr = packet.target_addr();
                if target_addr.is_multicast() {
                    return Err(Error);
                }
                let mut lladdr = None;
                for_each_option(packet.ndisc_options(), |opt| {
                    if let NdiscOptionRepr::TargetLinkLayerAddr(addr) = opt {
                        lladdr = Some(addr);
                    }
                })?;
                Ok(Repr::NeighborAdvert {
                    flags: packet.neighbor_flags(),
                    target_addr,
                    lladdr,
                })
            }
            _ => Err(Error),
        }
    }

    const fn fixed_len(&self) -> usize {
        match self {
            Repr::RouterSolicit { .. } => field::UNUSED.end,
            Repr::RouterAdvert { .. } => field::RETRANS_TM.end,
            Repr::NeighborSolicit { .. } | Repr::NeighborAdvert { .. } => field::TARGET_ADDR.end,
        }
    }

    /// Return the length of a packet that will be emitted from this high-level representation.
    pub fn buffer_len(&self) -> usize {
        let lladdr_len = |lladdr: &Option<EthernetAddress>| match lladdr {
            Some(addr) => NdiscOptionRepr::SourceLinkLayerAddr(*addr).buffer_len(),
            None => 0,
        };
        let options_len = match self {
            Repr::RouterSolicit { lladdr }
            | Repr::NeighborSolicit { lladdr, .. }
            | Repr::NeighborAdvert { lladdr, .. } => lladdr_len(lladdr),
            Repr::RouterAdvert {
                lladdr,
                mtu,
                prefix_info,
                rdnss,
                ..
            } => {
                let mut len = lladdr_len(lladdr);
                if let Some(mtu) = mtu {
                    len += NdiscOptionRepr::Mtu(*mtu).buffer_len();
                }
                for info in prefix_info.iter() {
                    len += NdiscOptionRepr::PrefixInformation(*info).buffer_len();
                }
                if let Some(rdnss) = rdnss {
                    len += NdiscOptionRepr::RecursiveDnsServer(rdnss.clone()).buffer_len();
                }
                len
            }
        };
        self.fixed_len() + options_len
    }

    /// Emit a high-level representation into an NDISC packet.
    ///
    /// The checksum is left for the caller to fill in, as it depends on
    /// the enclosing IPv6 header.
    pub fn emit<T>(&self, packet: &mut Packet<&mut T>)
    where
        T: AsRef<[u8]> + AsMut<[u8]> + ?Sized,
    {
        let mut options: Vec<NdiscOptionRepr, { 3 + MAX_PREFIX_INFO }> = Vec::new();

        match self {
            Repr::RouterSolicit { lladdr } => {
                packet.set_msg_type(Message::RouterSolicit);
                packet.set_msg_code(0);
                packet.clear_reserved();
                if let Some(addr) = lladdr {
                    let _ = options.push(NdiscOptionRepr::SourceLinkLayerAddr(*addr));
                }
            }
            Repr::RouterAdvert {
                hop_limit,
                flags,
                router_lifetime,
                reachable_time,
                retrans_time,
                lladdr,
                mtu,
                prefix_info,
                rdnss,
            } => {
                packet.set_msg_type(Message::RouterAdvert);
                packet.set_msg_code(0);
                packet.set_current_hop_limit(*hop_limit);
                packet.set_router_flags(*flags);
                packet.set_router_lifetime(*router_lifetime);
                packet.set_reachable_time(*reachable_time);
                packet.set_retrans_time(*retrans_time);
                if let Some(addr) = lladdr {
                    let _ = options.push(NdiscOptionRepr::SourceLinkLayerAddr(*addr));
                }
                if let Some(mtu) = mtu {
                    let _ = options.push(NdiscOptionRepr::Mtu(*mtu));
                }
                for info in prefix_info.iter() {
                    let _ = options.push(NdiscOptionRepr::PrefixInformation(*info));
                }
                if let Some(rdnss) = rdnss {
                    let _ = options.push(NdiscOptionRepr::RecursiveDnsServer(rdnss.clone()));
                }
            }
            Repr::NeighborSolicit {
                target_addr,
                lladdr,
            } => {
                packet.set_msg_type(Message::NeighborSolicit);
                packet.set_msg_code(0);
                packet.clear_reserved();
                packet.set_target_addr(*target_addr);
                if let Some(addr) = lladdr {
                    let _ = options.push(NdiscOptionRepr::SourceLinkLayerAddr(*addr));
                }
            }
            Repr::NeighborAdvert {
                flags,
                target_addr,
                lladdr,
            } => {
                packet.set_msg_type(Message::NeighborAdvert);
                packet.set_msg_code(0);
                packet.set_neighbor_flags(*flags);
                packet.set_target_addr(*target_addr);
                if let Some(addr) = lladdr {
                    let _ = options.push(NdiscOptionRepr::TargetLinkLayerAddr(*addr));
                }
            }
        }

        let mut offset = self.fixed_len();
        let data: &mut [u8] = packet.buffer.as_mut();
        for opt in options.iter() {
            let len = opt.buffer_len();
            opt.emit(&mut NdiscOption::new_unchecked(&mut data[offset..offset + len]));
            offset += len;
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::wire::{Icmpv6Packet, NdiscPrefixInfoFlags};

    const ROUTER: Ipv6Address = Ipv6Address::new(0xfe80, 0, 0, 0, 0, 0, 0, 1);
    const HOST: Ipv6Address = Ipv6Address::new(0xfe80, 0, 0, 0, 0, 0xff, 0xfe00, 1);

    static ROUTER_ADVERT_BYTES: [u8; 56] = [
        0x86, 0x00, 0x00, 0x00, 0x40, 0x80, 0x07, 0x08, 0x00, 0x00, 0x03, 0x84, 0x00, 0x00, 0x03,
        0x84, 0x01, 0x01, 0x52, 0x54, 0x00, 0x12, 0x34, 0x56, 0x03, 0x04, 0x40, 0xc0, 0x00, 0x00,
        0x0e, 0x10, 0x00, 0x00, 0x07, 0x08, 0x00, 0x00, 0x00, 0x00, 0x20, 0x01, 0x0d, 0xb8, 0x00,
        0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
    ];

    fn router_advert_repr() -> Repr {
        let mut prefix_info = Vec::new();
        prefix_info
            .push(NdiscPrefixInformation {
                prefix_len: 64,
                flags: NdiscPrefixInfoFlags::ON_LINK | NdiscPrefixInfoFlags::ADDRCONF,
                valid_lifetime: Duration::from_secs(3600),
                preferred_lifetime: Duration::from_secs(1800),
                prefix: Ipv6Address::new(0x2001, 0xdb8, 0, 0, 0, 0, 0, 0),
            })
            .unwrap();
        Repr::RouterAdvert {
            hop_limit: 64,
            flags: RouterFlags::MANAGED,
            router_lifetime: Duration::from_secs(1800),
            reachable_time: Duration::from_millis(900),
            retrans_time: Duration::from_millis(900),
            lladdr: Some(EthernetAddress([0x52, 0x54, 0x00, 0x12, 0x34, 0x56])),
            mtu: None,
            prefix_info,
            rdnss: None,
        }
    }

    #[test]
    fn test_router_advert_deconstruct() {
        let packet = Packet::new_checked(&ROUTER_ADVERT_BYTES[..]).unwrap();
        assert_eq!(packet.msg_type(), Message::RouterAdvert);
        assert_eq!(packet.current_hop_limit(), 64);
        assert_eq!(packet.router_flags(), RouterFlags::MANAGED);
        assert_eq!(packet.router_lifetime(), Duration::from_secs(1800));
        assert_eq!(packet.reachable_time(), Duration::from_millis(900));
        assert_eq!(packet.retrans_time(), Duration::from_millis(900));
    }

    #[test]
    fn test_router_advert_repr_parse() {
        let packet = Packet::new_unchecked(&ROUTER_ADVERT_BYTES[..]);
        assert_eq!(Repr::parse(&packet).unwrap(), router_advert_repr());
    }

    #[test]
    fn test_router_advert_repr_emit() {
        let repr = router_advert_repr();
        assert_eq!(repr.buffer_len(), ROUTER_ADVERT_BYTES.len());
        let mut bytes = vec![0xa5; repr.buffer_len()];
        let mut packet = Packet::new_unchecked(&mut bytes[..]);
        repr.emit(&mut packet);
        packet.set_checksum(0);
        assert_eq!(&bytes[..], &ROUTER_ADVERT_BYTES[..]);
    }

    #[test]
    fn test_neighbor_solicit_roundtrip_with_checksum() {
        let repr = Repr::NeighborSolicit {
            target_addr: HOST,
            lladdr: None,
        };
        let mut bytes = vec![0xa5; repr.buffer_len()];
        let mut packet = Icmpv6Packet::new_unchecked(&mut bytes[..]);
        repr.emit(&mut packet);
        packet.fill_checksum(&Ipv6Address::UNSPECIFIED, &HOST.solicited_node());

        let packet = Icmpv6Packet::new_checked(&bytes[..]).unwrap();
        assert!(packet.verify_checksum(&Ipv6Address::UNSPECIFIED, &HOST.solicited_node()));
        assert_eq!(Repr::parse(&packet).unwrap(), repr);
    }

    #[test]
    fn test_neighbor_advert_flags() {
        let repr = Repr::NeighborAdvert {
            flags: NeighborFlags::SOLICITED | NeighborFlags::OVERRIDE,
            target_addr: HOST,
            lladdr: Some(EthernetAddress([0x02, 0, 0, 0, 0, 2])),
        };
        let mut bytes = vec![0xff; repr.buffer_len()];
        repr.emit(&mut Packet::new_unchecked(&mut bytes[..]));
        assert_eq!(&bytes[4..8], &[0x60, 0x00, 0x00, 0x00]);
        assert_eq!(bytes[24], 0x02);
        let packet = Packet::new_checked(&bytes[..]).unwrap();
        assert_eq!(Repr::parse(&packet).unwrap(), repr);
    }

    #[test]
    fn test_router_solicit_with_lladdr() {
        let repr = Repr::RouterSolicit {
            lladdr: Some(EthernetAddress([0x02, 0, 0, 0, 0, 1])),
        };
        assert_eq!(repr.buffer_len(), 16);
        let mut bytes = vec![0u8; 16];
        let mut packet = Packet::new_unchecked(&mut bytes[..]);
        repr.emit(&mut packet);
        packet.fill_checksum(&HOST, &Ipv6Address::LINK_LOCAL_ALL_ROUTERS);
        let packet = Packet::new_checked(&bytes[..]).unwrap();
        assert!(packet.verify_checksum(&HOST, &Ipv6Address::LINK_LOCAL_ALL_ROUTERS));
        assert_eq!(Repr::parse(&packet).unwrap(), repr);
    }

    #[test]
    fn test_malformed_option_rejected() {
        let mut bytes = [0u8; 16];
        bytes[0] = 0x85;
        bytes[8] = 0x01; // SLLA with a zero length
        let packet = Packet::new_checked(&bytes[..]).unwrap();
        assert_eq!(Repr::parse(&packet), Err(Error));
    }

    #[test]
    fn test_multicast_target_rejected() {
        let repr = Repr::NeighborSolicit {
            target_addr: ROUTER,
            lladdr: None,
        };
        let mut bytes = vec![0u8; repr.buffer_len()];
        repr.emit(&mut Packet::new_unchecked(&mut bytes[..]));
        bytes[8] = 0xff;
        let packet = Packet::new_checked(&bytes[..]).unwrap();
        assert_eq!(Repr::parse(&packet), Err(Error));
    }
}
