use bitflags::bitflags;
use byteorder::{ByteOrder, NetworkEndian};
use core::fmt;
use heapless::Vec;

use super::{Error, EthernetAddress, Ipv6Address, Result};
use crate::time::Duration;

/// Recursive DNS server addresses kept from a single RDNSS option.
pub const MAX_RDNSS_ADDRESSES: usize = 3;

enum_with_unknown! {
    /// NDISC Option Type
    pub enum Type(u8) {
        /// Source Link-layer Address
        SourceLinkLayerAddr = 0x1,
        /// Target Link-layer Address
        TargetLinkLayerAddr = 0x2,
        /// Prefix Information
        PrefixInformation   = 0x3,
        /// Redirected Header
        RedirectedHeader    = 0x4,
        /// MTU
        Mtu                 = 0x5,
        /// Recursive DNS Server (RFC 8106)
        RecursiveDnsServer  = 0x19,
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Type::SourceLinkLayerAddr => write!(f, "source link-layer address"),
            Type::TargetLinkLayerAddr => write!(f, "target link-layer address"),
            Type::PrefixInformation => write!(f, "prefix information"),
            Type::RedirectedHeader => write!(f, "redirected header"),
            Type::Mtu => write!(f, "mtu"),
            Type::RecursiveDnsServer => write!(f, "recursive dns server"),
            Type::Unknown(id) => write!(f, "{id}"),
        }
    }
}

bitflags! {
    #[cfg_attr(feature = "defmt", derive(defmt::Format))]
    pub struct PrefixInfoFlags: u8 {
        const ON_LINK  = 0b10000000;
        const ADDRCONF = 0b01000000;
    }
}

/// A read/write wrapper around an [NDISC Option].
///
/// [NDISC Option]: https://tools.ietf.org/html/rfc4861#section-4.6
#[derive(Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct NdiscOption<T: AsRef<[u8]>> {
    buffer: T,
}

// Format of an NDISC Option
//
// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
// |     Type      |    Length     |              ...              |
// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
// ~                              ...                              ~
// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
//
// See https://tools.ietf.org/html/rfc4861#section-4.6 for details.
mod field {
    #![allow(non_snake_case)]

    use crate::wire::field::*;

    // 8-bit identifier of the type of option.
    pub const TYPE: usize = 0;
    // 8-bit unsigned integer. Length of the option, in units of 8 octets.
    pub const LENGTH: usize = 1;
    // Minimum length of an option.
    pub const MIN_OPT_LEN: usize = 8;
    // Variable-length field. Option-Type-specific data.
    pub const fn DATA(length: u8) -> Field {
        2..length as usize * 8
    }

    // Source/Target Link-layer Option fields.
    pub const LL_ADDR: Field = 2..8;

    // Prefix Information Option fields.
    //
    //  0                   1                   2                   3
    //  0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1
    // +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
    // |     Type      |    Length     | Prefix Length |L|A| Reserved1 |
    // +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
    // |                         Valid Lifetime                        |
    // +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
    // |                       Preferred Lifetime                      |
    // +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
    // |                           Reserved2                           |
    // +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
    // |                                                               |
    // +                                                               +
    // |                                                               |
    // +                            Prefix                             +
    // |                                                               |
    // +                                                               +
    // |                                                               |
    // +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+

    // Prefix length.
    pub const PREFIX_LEN: usize = 2;
    // Flags field of prefix header.
    pub const FLAGS: usize = 3;
    // Valid lifetime.
    pub const VALID_LT: Field = 4..8;
    // Preferred lifetime.
    pub const PREF_LT: Field = 8..12;
    // Reserved bits
    pub const PREF_RESERVED: Field = 12..16;
    // Prefix
    pub const PREFIX: Field = 16..32;

    // MTU Option fields
    pub const MTU: Field = 4..8;

    // Recursive DNS Server Option fields (RFC 8106 section 5.1).
    //
    //  0                   1                   2                   3
    //  0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1
    // +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
    // |     Type      |     Length    |           Reserved            |
    // +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
    // |                           Lifetime                            |
    // +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
    // :            Addresses of IPv6 Recursive DNS Servers            :
    // +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
    pub const RDNSS_RESERVED: Field = 2..4;
    pub const RDNSS_LIFETIME: Field = 4..8;
    pub const RDNSS_ADDRS: usize = 8;
}

/// Core getter methods relevant to any type of NDISC option.
impl<T: AsRef<[u8]>> NdiscOption<T> {
    /// Create a raw octet buffer with an NDISC Option structure.
    pub const fn new_unchecked(buffer: T) -> NdiscOption<T> {
        NdiscOption { buffer }
    }

    /// Shorthand for a combination of [new_unchecked] and [check_len].
    ///
    /// [new_unchecked]: #method.new_unchecked
    /// [check_len]: #method.check_len
    pub fn new_checked(buffer: T) -> Result<NdiscOption<T>> {
        let opt = Self::new_unchecked(buffer);
        opt.check_len()?;
        Ok(opt)
    }

    /// Ensure that no accessor method will panic if called.
    /// Returns `Err(Error)` if the buffer is too short.
    ///
    /// The result of this check is invalidated by calling [set_data_len].
    ///
    /// [set_data_len]: #method.set_data_len
    pub fn check_len(&self) -> Result<()> {
        let data = self.buffer.as_ref();
        let len = data.len();

        if len < field::MIN_OPT_LEN {
            return Err(Error);
        }
        let data_range = field::DATA(data[field::LENGTH]);
        if len < data_range.end || data_range.end < field::MIN_OPT_LEN {
            return Err(Error);
        }
        match self.option_type() {
            Type::SourceLinkLayerAddr | Type::TargetLinkLayerAddr | Type::Mtu => Ok(()),
            Type::PrefixInformation if data_range.end >= field::PREFIX.end => Ok(()),
            Type::RecursiveDnsServer if data_range.end >= field::RDNSS_ADDRS + 16 => Ok(()),
            Type::PrefixInformation | Type::RecursiveDnsServer => Err(Error),
            Type::RedirectedHeader | Type::Unknown(_) => Ok(()),
        }
    }

    /// Consume the NDISC option, returning the underlying buffer.
    pub fn into_inner(self) -> T {
        self.buffer
    }

    /// Return the option type.
    #[inline]
    pub fn option_type(&self) -> Type {
        let data = self.buffer.as_ref();
        Type::from(data[field::TYPE])
    }

    /// Return the length of the data, in units of 8 octets.
    #[inline]
    pub fn data_len(&self) -> u8 {
        let data = self.buffer.as_ref();
        data[field::LENGTH]
    }

    /// Return the total length of the option in octets.
    #[inline]
    pub fn total_len(&self) -> usize {
        self.data_len() as usize * 8
    }
}

/// Getter methods only relevant for Source/Target Link-layer Address options.
impl<T: AsRef<[u8]>> NdiscOption<T> {
    /// Return the Source/Target Link-layer Address.
    #[inline]
    pub fn link_layer_addr(&self) -> EthernetAddress {
        let data = self.buffer.as_ref();
        EthernetAddress::from_bytes(&data[field::LL_ADDR])
    }
}

/// Getter methods only relevant for the MTU option.
impl<T: AsRef<[u8]>> NdiscOption<T> {
    /// Return the MTU value.
    #[inline]
    pub fn mtu(&self) -> u32 {
        let data = self.buffer.as_ref();
        NetworkEndian::read_u32(&data[field::MTU])
    }
}

/// Getter methods only relevant for the Prefix Information option.
impl<T: AsRef<[u8]>> NdiscOption<T> {
    /// Return the prefix length.
    #[inline]
    pub fn prefix_len(&self) -> u8 {
        self.buffer.as_ref()[field::PREFIX_LEN]
    }

    /// Return the prefix information flags.
    #[inline]
    pub fn prefix_flags(&self) -> PrefixInfoFlags {
        PrefixInfoFlags::from_bits_truncate(self.buffer.as_ref()[field::FLAGS])
    }

    /// Return the valid lifetime of the prefix.
    #[inline]
    pub fn valid_lifetime(&self) -> Duration {
        let data = self.buffer.as_ref();
        Duration::from_secs(NetworkEndian::read_u32(&data[field::VALID_LT]) as u64)
    }

    /// Return the preferred lifetime of the prefix.
    #[inline]
    pub fn preferred_lifetime(&self) -> Duration {
        let data = self.buffer.as_ref();
        Duration::from_secs(NetworkEndian::read_u32(&data[field::PREF_LT]) as u64)
    }

    /// Return the prefix.
    #[inline]
    pub fn prefix(&self) -> Ipv6Address {
        let data = self.buffer.as_ref();
        Ipv6Address::from_bytes(&data[field::PREFIX])
    }
}

/// Getter methods only relevant for the Recursive DNS Server option.
impl<T: AsRef<[u8]>> NdiscOption<T> {
    /// Return the RDNSS lifetime.
    #[inline]
    pub fn rdnss_lifetime(&self) -> Duration {
        let data = self.buffer.as_ref();
        Duration::from_secs(NetworkEndian::read_u32(&data[field::RDNSS_LIFETIME]) as u64)
    }
}

impl<'a, T: AsRef<[u8]> + ?Sized> NdiscOption<&'a T> {
    /// Return the option data.
    #[inline]
    pub fn data(&self) -> &'a [u8] {
        let len = self.data_len();
        let data = self.buffer.as_ref();
        &data[field::DATA(len)]
    }

    /// Return the raw RDNSS address list.
    #[inline]
    pub fn rdnss_addresses(&self) -> &'a [u8] {
        let end = self.total_len();
        let data = self.buffer.as_ref();
        &data[field::RDNSS_ADDRS..end]
    }
}

/// Core setter methods relevant to any type of NDISC option.
impl<T: AsRef<[u8]> + AsMut<[u8]>> NdiscOption<T> {
    /// Set the option type.
    #[inline]
    pub fn set_option_type(&mut self, value: Type) {
        let data = self.buffer.as_mut();
        data[field::TYPE] = value.into();
    }

    /// Set the option data length, in units of 8 octets.
    #[inline]
    pub fn set_data_len(&mut self, value: u8) {
        let data = self.buffer.as_mut();
        data[field::LENGTH] = value;
    }

    /// Set the Source/Target Link-layer Address.
    #[inline]
    pub fn set_link_layer_addr(&mut self, addr: EthernetAddress) {
        let data = self.buffer.as_mut();
        data[field::LL_ADDR].copy_from_slice(addr.as_bytes())
    }

    /// Set the MTU value, clearing the reserved field.
    #[inline]
    pub fn set_mtu(&mut self, value: u32) {
        let data = self.buffer.as_mut();
        NetworkEndian::write_u16(&mut data[2..4], 0);
        NetworkEndian::write_u32(&mut data[field::MTU], value);
    }

    /// Set the prefix length.
    #[inline]
    pub fn set_prefix_len(&mut self, value: u8) {
        self.buffer.as_mut()[field::PREFIX_LEN] = value;
    }

    /// Set the prefix information flags.
    #[inline]
    pub fn set_prefix_flags(&mut self, flags: PrefixInfoFlags) {
        self.buffer.as_mut()[field::FLAGS] = flags.bits();
    }

    /// Set the valid lifetime of the prefix.
    #[inline]
    pub fn set_valid_lifetime(&mut self, time: Duration) {
        let data = self.buffer.as_mut();
        NetworkEndian::write_u32(&mut data[field::VALID_LT], time.secs() as u32);
    }

    /// Set the preferred lifetime of the prefix.
    #[inline]
    pub fn set_preferred_lifetime(&mut self, time: Duration) {
        let data = self.buffer.as_mut();
        NetworkEndian::write_u32(&mut data[field::PREF_LT], time.secs() as u32);
    }

    /// Clear the reserved bits of a prefix information option.
    #[inline]
    pub fn clear_prefix_reserved(&mut self) {
        let data = self.buffer.as_mut();
        NetworkEndian::write_u32(&mut data[field::PREF_RESERVED], 0);
    }

    /// Set the prefix.
    #[inline]
    pub fn set_prefix(&mut self, addr: Ipv6Address) {
        let data = self.buffer.as_mut();
        data[field::PREFIX].copy_from_slice(addr.as_bytes());
    }

    /// Set the RDNSS lifetime, clearing the reserved field.
    #[inline]
    pub fn set_rdnss_lifetime(&mut self, time: Duration) {
        let data = self.buffer.as_mut();
        NetworkEndian::write_u16(&mut data[field::RDNSS_RESERVED], 0);
        NetworkEndian::write_u32(&mut data[field::RDNSS_LIFETIME], time.secs() as u32);
    }

    /// Write one RDNSS address at position `index`.
    #[inline]
    pub fn set_rdnss_address(&mut self, index: usize, addr: Ipv6Address) {
        let start = field::RDNSS_ADDRS + index * 16;
        let data = self.buffer.as_mut();
        data[start..start + 16].copy_from_slice(addr.as_bytes());
    }
}

impl<'a, T: AsRef<[u8]> + ?Sized> fmt::Display for NdiscOption<&'a T> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match Repr::parse(self) {
            Ok(repr) => write!(f, "{repr}"),
            Err(err) => {
                write!(f, "NDISC Option ({err})")?;
                Ok(())
            }
        }
    }
}

/// The content of a Prefix Information option.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PrefixInformation {
    pub prefix_len: u8,
    pub flags: PrefixInfoFlags,
    pub valid_lifetime: Duration,
    pub preferred_lifetime: Duration,
    pub prefix: Ipv6Address,
}

impl PrefixInformation {
    /// Whether a host may build an address from this prefix: it has to be
    /// on-link, marked for autonomous configuration, and exactly /64 long
    /// so a 64-bit interface identifier completes it. Link-local and
    /// multicast prefixes never qualify (RFC 4862 section 5.5.3).
    pub fn is_autoconfigurable(&self) -> bool {
        self.flags
            .contains(PrefixInfoFlags::ON_LINK | PrefixInfoFlags::ADDRCONF)
            && self.prefix_len == 64
            && self.valid_lifetime != Duration::ZERO
            && !self.prefix.is_link_local()
            && !self.prefix.is_multicast()
    }
}

/// The content of a Recursive DNS Server option.
#[derive(Debug, PartialEq, Eq, Clone)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RecursiveDnsServer {
    pub lifetime: Duration,
    pub servers: Vec<Ipv6Address, MAX_RDNSS_ADDRESSES>,
}

/// A high-level representation of an NDISC Option.
#[derive(Debug, PartialEq, Eq, Clone)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Repr<'a> {
    SourceLinkLayerAddr(EthernetAddress),
    TargetLinkLayerAddr(EthernetAddress),
    PrefixInformation(PrefixInformation),
    Mtu(u32),
    RecursiveDnsServer(RecursiveDnsServer),
    Unknown {
        type_: u8,
        length: u8,
        data: &'a [u8],
    },
}

impl<'a> Repr<'a> {
    /// Parse an NDISC Option and return a high-level representation.
    pub fn parse<T>(opt: &NdiscOption<&'a T>) -> Result<Repr<'a>>
    where
        T: AsRef<[u8]> + ?Sized,
    {
        opt.check_len()?;
        match opt.option_type() {
            Type::SourceLinkLayerAddr => {
                if opt.data_len() == 1 {
                    Ok(Repr::SourceLinkLayerAddr(opt.link_layer_addr()))
                } else {
                    Err(Error)
                }
            }
            Type::TargetLinkLayerAddr => {
                if opt.data_len() == 1 {
                    Ok(Repr::TargetLinkLayerAddr(opt.link_layer_addr()))
                } else {
                    Err(Error)
                }
            }
            Type::PrefixInformation => {
                if opt.data_len() == 4 {
                    Ok(Repr::PrefixInformation(PrefixInformation {
                        prefix_len: opt.prefix_len(),
                        flags: opt.prefix_flags(),
                        valid_lifetime: opt.valid_lifetime(),
                        preferred_lifetime: opt.preferred_lifetime(),
                        prefix: opt.prefix(),
                    }))
                } else {
                    Err(Error)
                }
            }
            Type::Mtu => {
                if opt.data_len() == 1 {
                    Ok(Repr::Mtu(opt.mtu()))
                } else {
                    Err(Error)
                }
            }
            Type::RecursiveDnsServer => {
                // The length is 1 + 2 * number of addresses, always odd.
                if opt.data_len() % 2 == 0 {
                    return Err(Error);
                }
                let mut servers = Vec::new();
                for chunk in opt.rdnss_addresses().chunks_exact(16) {
                    // Addresses past our capacity are dropped.
                    let _ = servers.push(Ipv6Address::from_bytes(chunk));
                }
                Ok(Repr::RecursiveDnsServer(RecursiveDnsServer {
                    lifetime: opt.rdnss_lifetime(),
                    servers,
                }))
            }
            Type::RedirectedHeader | Type::Unknown(_) => Ok(Repr::Unknown {
                type_: opt.option_type().into(),
                length: opt.data_len(),
                data: opt.data(),
            }),
        }
    }

    /// Return the length of a header that will be emitted from this high-level representation.
    pub fn buffer_len(&self) -> usize {
        match self {
            &Repr::SourceLinkLayerAddr(_) | &Repr::TargetLinkLayerAddr(_) | &Repr::Mtu(_) => 8,
            &Repr::PrefixInformation(_) => field::PREFIX.end,
            Repr::RecursiveDnsServer(rdnss) => field::RDNSS_ADDRS + rdnss.servers.len() * 16,
            &Repr::Unknown { length, .. } => field::DATA(length).end,
        }
    }

    /// Emit a high-level representation into an NDISC Option.
    pub fn emit<T>(&self, opt: &mut NdiscOption<&'a mut T>)
    where
        T: AsRef<[u8]> + AsMut<[u8]> + ?Sized,
    {
        match self {
            Repr::SourceLinkLayerAddr(addr) => {
                opt.set_option_type(Type::SourceLinkLayerAddr);
                opt.set_data_len(1);
                opt.set_link_layer_addr(*addr);
            }
            Repr::TargetLinkLayerAddr(addr) => {
                opt.set_option_type(Type::TargetLinkLayerAddr);
                opt.set_data_len(1);
                opt.set_link_layer_addr(*addr);
            }
            Repr::PrefixInformation(info) => {
                opt.set_option_type(Type::PrefixInformation);
                opt.set_data_len(4);
                opt.set_prefix_len(info.prefix_len);
                opt.set_prefix_flags(info.flags);
                opt.set_valid_lifetime(info.valid_lifetime);
                opt.set_preferred_lifetime(info.preferred_lifetime);
                opt.clear_prefix_reserved();
                opt.set_prefix(info.prefix);
            }
            Repr::Mtu(mtu) => {
                opt.set_option_type(Type::Mtu);
                opt.set_data_len(1);
                opt.set_mtu(*mtu);
            }
            Repr::RecursiveDnsServer(rdnss) => {
                opt.set_option_type(Type::RecursiveDnsServer);
                opt.set_data_len(1 + 2 * rdnss.servers.len() as u8);
                opt.set_rdnss_lifetime(rdnss.lifetime);
                for (index, server) in rdnss.servers.iter().enumerate() {
                    opt.set_rdnss_address(index, *server);
                }
            }
            Repr::Unknown {
                type_: id,
                length,
                data,
            } => {
                opt.set_option_type(Type::Unknown(*id));
                opt.set_data_len(*length);
                let range = field::DATA(*length);
                let buf: &mut [u8] = opt.buffer.as_mut();
                buf[range].copy_from_slice(data);
            }
        }
    }
}

impl<'a> fmt::Display for Repr<'a> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "NDISC Option: ")?;
        match self {
            Repr::SourceLinkLayerAddr(addr) => write!(f, "SourceLinkLayer addr={addr}"),
            Repr::TargetLinkLayerAddr(addr) => write!(f, "TargetLinkLayer addr={addr}"),
            Repr::PrefixInformation(info) => write!(
                f,
                "PrefixInformation prefix={}/{} flags={:?}",
                info.prefix, info.prefix_len, info.flags
            ),
            Repr::Mtu(mtu) => write!(f, "MTU mtu={mtu}"),
            Repr::RecursiveDnsServer(rdnss) => {
                write!(f, "RDNSS lifetime={}", rdnss.lifetime)?;
                for server in rdnss.servers.iter() {
                    write!(f, " addr={server}")?;
                }
                Ok(())
            }
            Repr::Unknown { type_: id, length, .. } => {
                write!(f, "Unknown({id}) length={length}")
            }
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    static PREFIX_OPT_BYTES: [u8; 32] = [
        0x03, 0x04, 0x40, 0xc0, 0x00, 0x00, 0x03, 0x84, 0x00, 0x00, 0x03, 0xe8, 0x00, 0x00, 0x00,
        0x00, 0xfe, 0x80, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
        0x00, 0x01,
    ];

    #[test]
    fn test_deconstruct_prefix() {
        let opt = NdiscOption::new_checked(&PREFIX_OPT_BYTES[..]).unwrap();
        assert_eq!(opt.option_type(), Type::PrefixInformation);
        assert_eq!(opt.data_len(), 4);
        assert_eq!(opt.prefix_len(), 64);
        assert_eq!(
            opt.prefix_flags(),
            PrefixInfoFlags::ON_LINK | PrefixInfoFlags::ADDRCONF
        );
        assert_eq!(opt.valid_lifetime(), Duration::from_secs(900));
        assert_eq!(opt.preferred_lifetime(), Duration::from_secs(1000));
        assert_eq!(opt.prefix(), Ipv6Address::new(0xfe80, 0, 0, 0, 0, 0, 0, 1));
    }

    #[test]
    fn test_short_packet() {
        assert_eq!(NdiscOption::new_checked(&[0x00, 0x00]).err(), Some(Error));
        let bytes = [0x03, 0x01, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00];
        assert_eq!(NdiscOption::new_checked(&bytes).err(), Some(Error));
    }

    #[test]
    fn test_zero_length_rejected() {
        let bytes = [0x01, 0x00, 0x02, 0x00, 0x00, 0x00, 0x00, 0x01];
        assert_eq!(NdiscOption::new_checked(&bytes).err(), Some(Error));
    }

    #[test]
    fn test_repr_parse_link_layer_opt() {
        let bytes = [0x01, 0x01, 0x54, 0x52, 0x00, 0x12, 0x23, 0x34];
        let addr = EthernetAddress([0x54, 0x52, 0x00, 0x12, 0x23, 0x34]);
        assert_eq!(
            Repr::parse(&NdiscOption::new_unchecked(&bytes)),
            Ok(Repr::SourceLinkLayerAddr(addr))
        );
    }

    #[test]
    fn test_repr_parse_prefix_info() {
        let repr = PrefixInformation {
            prefix_len: 64,
            flags: PrefixInfoFlags::ON_LINK | PrefixInfoFlags::ADDRCONF,
            valid_lifetime: Duration::from_secs(900),
            preferred_lifetime: Duration::from_secs(1000),
            prefix: Ipv6Address::new(0xfe80, 0, 0, 0, 0, 0, 0, 1),
        };
        assert_eq!(
            Repr::parse(&NdiscOption::new_unchecked(&PREFIX_OPT_BYTES)),
            Ok(Repr::PrefixInformation(repr))
        );
        assert!(repr.is_autoconfigurable());
    }

    #[test]
    fn test_prefix_info_not_autoconfigurable() {
        let mut info = PrefixInformation {
            prefix_len: 64,
            flags: PrefixInfoFlags::ON_LINK,
            valid_lifetime: Duration::from_secs(900),
            preferred_lifetime: Duration::from_secs(900),
            prefix: Ipv6Address::new(0x2001, 0xdb8, 0, 0, 0, 0, 0, 0),
        };
        assert!(!info.is_autoconfigurable());
        info.flags |= PrefixInfoFlags::ADDRCONF;
        info.prefix_len = 48;
        assert!(!info.is_autoconfigurable());
        info.prefix_len = 64;
        assert!(info.is_autoconfigurable());
    }

    #[test]
    fn test_prefix_info_scope() {
        let mut info = PrefixInformation {
            prefix_len: 64,
            flags: PrefixInfoFlags::ON_LINK | PrefixInfoFlags::ADDRCONF,
            valid_lifetime: Duration::from_secs(900),
            preferred_lifetime: Duration::from_secs(900),
            prefix: Ipv6Address::new(0xfe80, 0, 0, 0, 0, 0, 0, 0),
        };
        assert!(!info.is_autoconfigurable());
        info.prefix = Ipv6Address::new(0xff02, 0, 0, 0, 0, 0, 0, 0);
        assert!(!info.is_autoconfigurable());
    }

    #[test]
    fn test_rdnss_roundtrip() {
        let mut servers = Vec::new();
        servers
            .push(Ipv6Address::new(0x2001, 0xdb8, 0, 0, 0, 0, 0, 0x53))
            .unwrap();
        let repr = Repr::RecursiveDnsServer(RecursiveDnsServer {
            lifetime: Duration::from_secs(600),
            servers,
        });
        assert_eq!(repr.buffer_len(), 24);

        let mut bytes = [0u8; 24];
        repr.emit(&mut NdiscOption::new_unchecked(&mut bytes[..]));
        assert_eq!(&bytes[0..2], &[0x19, 0x03]);
        assert_eq!(Repr::parse(&NdiscOption::new_unchecked(&bytes[..])), Ok(repr));
    }
}
