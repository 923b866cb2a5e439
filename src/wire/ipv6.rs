#![deny(missing_docs)]

use byteorder::{ByteOrder, NetworkEndian};
use core::fmt;

use super::ip::Protocol;
use super::{Error, EthernetAddress, Result};

/// Size of IPv6 adderess in octets.
pub const ADDR_SIZE: usize = 16;

/// A sixteen-octet IPv6 address.
#[derive(Debug, Hash, PartialEq, Eq, PartialOrd, Ord, Clone, Copy, Default)]
pub struct Address(pub [u8; ADDR_SIZE]);

impl Address {
    /// The [unspecified address].
    ///
    /// [unspecified address]: https://tools.ietf.org/html/rfc4291#section-2.5.2
    pub const UNSPECIFIED: Address = Address([0x00; ADDR_SIZE]);

    /// The link-local [all nodes multicast address].
    ///
    /// [all nodes multicast address]: https://tools.ietf.org/html/rfc4291#section-2.7.1
    pub const LINK_LOCAL_ALL_NODES: Address = Address::new(0xff02, 0, 0, 0, 0, 0, 0, 1);

    /// The link-local [all routers multicast address].
    ///
    /// [all routers multicast address]: https://tools.ietf.org/html/rfc4291#section-2.7.1
    pub const LINK_LOCAL_ALL_ROUTERS: Address = Address::new(0xff02, 0, 0, 0, 0, 0, 0, 2);

    /// The link-local [All_DHCP_Relay_Agents_and_Servers] multicast address.
    ///
    /// [All_DHCP_Relay_Agents_and_Servers]: https://tools.ietf.org/html/rfc8415#section-7.1
    pub const LINK_LOCAL_ALL_DHCP_SERVERS: Address = Address::new(0xff02, 0, 0, 0, 0, 0, 1, 2);

    /// Construct an IPv6 address from parts.
    #[allow(clippy::too_many_arguments)]
    pub const fn new(a0: u16, a1: u16, a2: u16, a3: u16, a4: u16, a5: u16, a6: u16, a7: u16) -> Address {
        Address([
            (a0 >> 8) as u8,
            a0 as u8,
            (a1 >> 8) as u8,
            a1 as u8,
            (a2 >> 8) as u8,
            a2 as u8,
            (a3 >> 8) as u8,
            a3 as u8,
            (a4 >> 8) as u8,
            a4 as u8,
            (a5 >> 8) as u8,
            a5 as u8,
            (a6 >> 8) as u8,
            a6 as u8,
            (a7 >> 8) as u8,
            a7 as u8,
        ])
    }

    /// Construct an IPv6 address from a sequence of octets, in big-endian.
    ///
    /// # Panics
    /// The function panics if `data` is not sixteen octets long.
    pub fn from_bytes(data: &[u8]) -> Address {
        let mut bytes = [0; ADDR_SIZE];
        bytes.copy_from_slice(data);
        Address(bytes)
    }

    /// Construct an IPv6 address from a sequence of words, in big-endian.
    ///
    /// # Panics
    /// The function panics if `data` is not 8 words long.
    pub fn from_parts(data: &[u16]) -> Address {
        assert!(data.len() >= 8);
        let mut bytes = [0; ADDR_SIZE];
        for (word_idx, chunk) in bytes.chunks_mut(2).enumerate() {
            NetworkEndian::write_u16(chunk, data[word_idx]);
        }
        Address(bytes)
    }

    /// Write a IPv6 address to the given slice.
    ///
    /// # Panics
    /// The function panics if `data` is not 8 words long.
    pub fn write_parts(&self, data: &mut [u16]) {
        assert!(data.len() >= 8);
        for (i, chunk) in self.0.chunks(2).enumerate() {
            data[i] = NetworkEndian::read_u16(chunk);
        }
    }

    /// Return an IPv6 address as a sequence of octets, in big-endian.
    pub const fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Query whether the IPv6 address is an [unicast address].
    ///
    /// [unicast address]: https://tools.ietf.org/html/rfc4291#section-2.5
    pub fn is_unicast(&self) -> bool {
        !(self.is_multicast() || self.is_unspecified())
    }

    /// Query whether the IPv6 address is a [multicast address].
    ///
    /// [multicast address]: https://tools.ietf.org/html/rfc4291#section-2.7
    pub const fn is_multicast(&self) -> bool {
        self.0[0] == 0xff
    }

    /// Query whether the IPv6 address is the [unspecified address].
    ///
    /// [unspecified address]: https://tools.ietf.org/html/rfc4291#section-2.5.2
    pub fn is_unspecified(&self) -> bool {
        self.0 == [0x00; ADDR_SIZE]
    }

    /// Query whether the IPv6 address is in the [link-local] scope.
    ///
    /// [link-local]: https://tools.ietf.org/html/rfc4291#section-2.5.6
    pub fn is_link_local(&self) -> bool {
        self.0[0..8] == [0xfe, 0x80, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00]
    }

    /// The link-local address `fe80::/64` completed with an interface identifier.
    pub fn link_local(iid: InterfaceId) -> Address {
        Self::from_prefix(&Address::new(0xfe80, 0, 0, 0, 0, 0, 0, 0), iid)
    }

    /// Combine the upper 64 bits of `prefix` with an interface identifier.
    pub fn from_prefix(prefix: &Address, iid: InterfaceId) -> Address {
        let mut bytes = [0; ADDR_SIZE];
        bytes[0..8].copy_from_slice(&prefix.0[0..8]);
        bytes[8..16].copy_from_slice(&iid.0);
        Address(bytes)
    }

    /// The netmask covering the first `prefix_len` bits.
    ///
    /// Lengths above 128 saturate to an all-ones mask.
    pub fn mask(prefix_len: u8) -> Address {
        let mut bytes = [0u8; ADDR_SIZE];
        let mut remaining = prefix_len.min(128) as usize;
        for byte in bytes.iter_mut() {
            let bits = remaining.min(8);
            *byte = !(0xffu16 >> bits) as u8;
            remaining -= bits;
        }
        Address(bytes)
    }

    /// Whether `self` and `other` share the first `prefix_len` bits.
    pub fn same_prefix(&self, other: &Address, prefix_len: u8) -> bool {
        let mask = Self::mask(prefix_len);
        self.0
            .iter()
            .zip(other.0.iter())
            .zip(mask.0.iter())
            .all(|((a, b), m)| a & m == b & m)
    }

    /// The [solicited node] multicast address for this unicast address.
    ///
    /// # Panics
    /// This function panics if the given address is not unicast.
    ///
    /// [solicited node]: https://tools.ietf.org/html/rfc4291#section-2.7.1
    pub fn solicited_node(&self) -> Address {
        assert!(self.is_unicast());
        let mut bytes = [
            0xff, 0x02, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x01, 0xff, 0x00,
            0x00, 0x00,
        ];
        bytes[13..].copy_from_slice(&self.0[13..]);
        Address(bytes)
    }

    /// The Ethernet group address a multicast IPv6 destination maps to
    /// (`33:33` followed by the low 32 bits), per RFC 2464 section 7.
    ///
    /// # Panics
    /// This function panics if the given address is not multicast.
    pub fn multicast_ethernet_addr(&self) -> EthernetAddress {
        assert!(self.is_multicast());
        EthernetAddress([0x33, 0x33, self.0[12], self.0[13], self.0[14], self.0[15]])
    }
}

#[cfg(feature = "std")]
impl From<::std::net::Ipv6Addr> for Address {
    fn from(x: ::std::net::Ipv6Addr) -> Address {
        Address(x.octets())
    }
}

#[cfg(feature = "std")]
impl From<Address> for ::std::net::Ipv6Addr {
    fn from(Address(x): Address) -> ::std::net::Ipv6Addr {
        x.into()
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let mut words = [0u16; 8];
        self.write_parts(&mut words);

        // Find the longest run of zero words (at least two) for "::" elision,
        // picking the first one on ties as RFC 5952 asks.
        let mut best = (0usize, 0usize);
        let mut run_start = 0;
        let mut run_len = 0;
        for (idx, &word) in words.iter().enumerate() {
            if word == 0 {
                if run_len == 0 {
                    run_start = idx;
                }
                run_len += 1;
                if run_len > best.1 {
                    best = (run_start, run_len);
                }
            } else {
                run_len = 0;
            }
        }

        if best.1 < 2 {
            for (idx, word) in words.iter().enumerate() {
                if idx > 0 {
                    write!(f, ":")?;
                }
                write!(f, "{word:x}")?;
            }
            return Ok(());
        }

        let (start, len) = best;
        for (idx, word) in words[..start].iter().enumerate() {
            if idx > 0 {
                write!(f, ":")?;
            }
            write!(f, "{word:x}")?;
        }
        write!(f, "::")?;
        for (idx, word) in words[start + len..].iter().enumerate() {
            if idx > 0 {
                write!(f, ":")?;
            }
            write!(f, "{word:x}")?;
        }
        Ok(())
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for Address {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(f, "{=[u8]:02x}", self.0)
    }
}

/// A 64-bit interface identifier.
#[derive(Debug, Hash, PartialEq, Eq, Clone, Copy, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct InterfaceId(pub [u8; 8]);

impl InterfaceId {
    /// The modified EUI-64 identifier of an Ethernet address
    /// ([RFC 4291 appendix A]): the universal/local bit is inverted
    /// and `ff:fe` is inserted in the middle.
    ///
    /// [RFC 4291 appendix A]: https://tools.ietf.org/html/rfc4291#appendix-A
    pub fn from_ethernet(addr: EthernetAddress) -> InterfaceId {
        let mac = addr.0;
        InterfaceId([
            mac[0] ^ 0x02,
            mac[1],
            mac[2],
            0xff,
            0xfe,
            mac[3],
            mac[4],
            mac[5],
        ])
    }
}

/// A read/write wrapper around an Internet Protocol version 6 packet buffer.
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct Packet<T: AsRef<[u8]>> {
    buffer: T,
}

// Ipv6 Packet Format
//
//    +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
//    |Version| Traffic Class |           Flow Label                  |
//    +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
//    |         Payload Length        |  Next Header  |   Hop Limit   |
//    +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
//    |                                                               |
//    +                                                               +
//    |                         Source Address                        |
//    +                                                               +
//    |                                                               |
//    +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
//    |                                                               |
//    +                                                               +
//    |                      Destination Address                      |
//    +                                                               +
//    |                                                               |
//    +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
//
// See https://tools.ietf.org/html/rfc2460#section-3 for details.
mod field {
    use crate::wire::field::*;
    // 4-bit version number, 8-bit traffic class, and the
    // 20-bit flow label.
    pub const VER_TC_FLOW: Field = 0..4;
    // 16-bit value representing the length of the payload.
    // Note: Options are included in this length.
    pub const LENGTH: Field = 4..6;
    // 8-bit value identifying the type of header following this
    // one. Note: The same numbers are used in IPv4.
    pub const NXT_HDR: usize = 6;
    // 8-bit value decremented by each node that forwards this
    // packet. The packet is discarded when the value is 0.
    pub const HOP_LIMIT: usize = 7;
    // IPv6 address of the source node.
    pub const SRC_ADDR: Field = 8..24;
    // IPv6 address of the destination node.
    pub const DST_ADDR: Field = 24..40;
}

/// Length of an IPv6 header.
pub const HEADER_LEN: usize = field::DST_ADDR.end;

impl<T: AsRef<[u8]>> Packet<T> {
    /// Create a raw octet buffer with an IPv6 packet structure.
    #[inline]
    pub const fn new_unchecked(buffer: T) -> Packet<T> {
        Packet { buffer }
    }

    /// Shorthand for a combination of [new_unchecked] and [check_len].
    ///
    /// [new_unchecked]: #method.new_unchecked
    /// [check_len]: #method.check_len
    #[inline]
    pub fn new_checked(buffer: T) -> Result<Packet<T>> {
        let packet = Self::new_unchecked(buffer);
        packet.check_len()?;
        Ok(packet)
    }

    /// Ensure that no accessor method will panic if called.
    /// Returns `Err(Error)` if the buffer is too short.
    ///
    /// The result of this check is invalidated by calling [set_payload_len].
    ///
    /// [set_payload_len]: #method.set_payload_len
    #[inline]
    pub fn check_len(&self) -> Result<()> {
        let len = self.buffer.as_ref().len();
        if len < field::DST_ADDR.end || len < self.total_len() {
            Err(Error)
        } else {
            Ok(())
        }
    }

    /// Consume the packet, returning the underlying buffer.
    #[inline]
    pub fn into_inner(self) -> T {
        self.buffer
    }

    /// Return the header length.
    #[inline]
    pub const fn header_len(&self) -> usize {
        // This is not a strictly necessary function, but it makes
        // code more readable.
        field::DST_ADDR.end
    }

    /// Return the version field.
    #[inline]
    pub fn version(&self) -> u8 {
        let data = self.buffer.as_ref();
        data[field::VER_TC_FLOW.start] >> 4
    }

    /// Return the payload length field.
    #[inline]
    pub fn payload_len(&self) -> u16 {
        let data = self.buffer.as_ref();
        NetworkEndian::read_u16(&data[field::LENGTH])
    }

    /// Return the payload length added to the known header length.
    #[inline]
    pub fn total_len(&self) -> usize {
        self.header_len() + self.payload_len() as usize
    }

    /// Return the next header field.
    #[inline]
    pub fn next_header(&self) -> Protocol {
        let data = self.buffer.as_ref();
        Protocol::from(data[field::NXT_HDR])
    }

    /// Return the hop limit field.
    #[inline]
    pub fn hop_limit(&self) -> u8 {
        let data = self.buffer.as_ref();
        data[field::HOP_LIMIT]
    }

    /// Return the source address field.
    #[inline]
    pub fn src_addr(&self) -> Address {
        let data = self.buffer.as_ref();
        Address::from_bytes(&data[field::SRC_ADDR])
    }

    /// Return the destination address field.
    #[inline]
    pub fn dst_addr(&self) -> Address {
        let data = self.buffer.as_ref();
        Address::from_bytes(&data[field::DST_ADDR])
    }
}

impl<'a, T: AsRef<[u8]> + ?Sized> Packet<&'a T> {
    /// Return a pointer to the payload.
    #[inline]
    pub fn payload(&self) -> &'a [u8] {
        let data = self.buffer.as_ref();
        let range = self.header_len()..self.total_len();
        &data[range]
    }
}

impl<T: AsRef<[u8]> + AsMut<[u8]>> Packet<T> {
    /// Set the version field, clearing traffic class and flow label.
    #[inline]
    pub fn set_version(&mut self, value: u8) {
        let data = self.buffer.as_mut();
        NetworkEndian::write_u32(&mut data[field::VER_TC_FLOW], (value as u32) << 28);
    }

    /// Set the payload length field.
    #[inline]
    pub fn set_payload_len(&mut self, value: u16) {
        let data = self.buffer.as_mut();
        NetworkEndian::write_u16(&mut data[field::LENGTH], value);
    }

    /// Set the next header field.
    #[inline]
    pub fn set_next_header(&mut self, value: Protocol) {
        let data = self.buffer.as_mut();
        data[field::NXT_HDR] = value.into();
    }

    /// Set the hop limit field.
    #[inline]
    pub fn set_hop_limit(&mut self, value: u8) {
        let data = self.buffer.as_mut();
        data[field::HOP_LIMIT] = value;
    }

    /// Set the source address field.
    #[inline]
    pub fn set_src_addr(&mut self, value: Address) {
        let data = self.buffer.as_mut();
        data[field::SRC_ADDR].copy_from_slice(value.as_bytes());
    }

    /// Set the destination address field.
    #[inline]
    pub fn set_dst_addr(&mut self, value: Address) {
        let data = self.buffer.as_mut();
        data[field::DST_ADDR].copy_from_slice(value.as_bytes());
    }

    /// Return a mutable pointer to the payload.
    #[inline]
    pub fn payload_mut(&mut self) -> &mut [u8] {
        let range = self.header_len()..self.total_len();
        let data = self.buffer.as_mut();
        &mut data[range]
    }
}

impl<T: AsRef<[u8]>> fmt::Display for Packet<&T> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match Repr::parse(self) {
            Ok(repr) => write!(f, "{repr}"),
            Err(err) => write!(f, "IPv6 ({err})"),
        }
    }
}

/// A high-level representation of an Internet Protocol version 6 packet header.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Repr {
    /// IPv6 address of the source node.
    pub src_addr: Address,
    /// IPv6 address of the destination node.
    pub dst_addr: Address,
    /// Protocol contained in the next header.
    pub next_header: Protocol,
    /// Length of the payload including the extension headers.
    pub payload_len: usize,
    /// The 8-bit hop limit field.
    pub hop_limit: u8,
}

impl Repr {
    /// Parse an Internet Protocol version 6 packet and return
    /// a high-level representation.
    pub fn parse<T: AsRef<[u8]> + ?Sized>(packet: &Packet<&T>) -> Result<Repr> {
        packet.check_len()?;
        if packet.version() != 6 {
            return Err(Error);
        }
        Ok(Repr {
            src_addr: packet.src_addr(),
            dst_addr: packet.dst_addr(),
            next_header: packet.next_header(),
            payload_len: packet.payload_len() as usize,
            hop_limit: packet.hop_limit(),
        })
    }

    /// Return the length of a header that will be emitted from this high-level representation.
    pub const fn buffer_len(&self) -> usize {
        // This function is not strictly necessary, but it can make client code more readable.
        field::DST_ADDR.end
    }

    /// Emit a high-level representation into an Internet Protocol version 6 packet.
    pub fn emit<T: AsRef<[u8]> + AsMut<[u8]>>(&self, packet: &mut Packet<T>) {
        // Make no assumptions about the original state of the packet buffer.
        // Make sure to set every byte.
        packet.set_version(6);
        packet.set_payload_len(self.payload_len as u16);
        packet.set_hop_limit(self.hop_limit);
        packet.set_next_header(self.next_header);
        packet.set_src_addr(self.src_addr);
        packet.set_dst_addr(self.dst_addr);
    }
}

impl fmt::Display for Repr {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "IPv6 src={} dst={} nxt_hdr={} hop_limit={}",
            self.src_addr, self.dst_addr, self.next_header, self.hop_limit
        )
    }
}

#[cfg(test)]
mod test {
    use super::*;

    const MAC: EthernetAddress = EthernetAddress([0x02, 0x00, 0x00, 0x00, 0x00, 0x01]);

    #[test]
    fn test_eui64_interface_id() {
        let iid = InterfaceId::from_ethernet(MAC);
        assert_eq!(iid.0, [0x00, 0x00, 0x00, 0xff, 0xfe, 0x00, 0x00, 0x01]);
    }

    #[test]
    fn test_link_local_from_mac() {
        let addr = Address::link_local(InterfaceId::from_ethernet(MAC));
        assert_eq!(addr, Address::new(0xfe80, 0, 0, 0, 0, 0x00ff, 0xfe00, 0x0001));
        assert!(addr.is_link_local());
        assert!(addr.is_unicast());
    }

    #[test]
    fn test_global_from_prefix() {
        let prefix = Address::new(0x2001, 0xdb8, 0, 0, 0, 0, 0, 0);
        let addr = Address::from_prefix(&prefix, InterfaceId::from_ethernet(MAC));
        assert_eq!(addr, Address::new(0x2001, 0xdb8, 0, 0, 0, 0x00ff, 0xfe00, 0x0001));
        assert!(!addr.is_link_local());
    }

    #[test]
    fn test_mask() {
        assert_eq!(
            Address::mask(64),
            Address::new(0xffff, 0xffff, 0xffff, 0xffff, 0, 0, 0, 0)
        );
        assert_eq!(Address::mask(0), Address::UNSPECIFIED);
        assert_eq!(
            Address::mask(12),
            Address::new(0xfff0, 0, 0, 0, 0, 0, 0, 0)
        );
        assert_eq!(Address::mask(200), Address([0xff; 16]));
    }

    #[test]
    fn test_same_prefix() {
        let a = Address::new(0x2001, 0xdb8, 0, 0, 0, 0, 0, 1);
        let b = Address::new(0x2001, 0xdb8, 0, 0, 0xffff, 0, 0, 2);
        assert!(a.same_prefix(&b, 64));
        assert!(!a.same_prefix(&b, 80));
    }

    #[test]
    fn test_solicited_node() {
        let addr = Address::new(0xfe80, 0, 0, 0, 0, 0x00ff, 0xfe12, 0x3456);
        assert_eq!(
            addr.solicited_node(),
            Address::new(0xff02, 0, 0, 0, 0, 1, 0xff12, 0x3456)
        );
        assert_eq!(
            addr.solicited_node().multicast_ethernet_addr(),
            EthernetAddress([0x33, 0x33, 0xff, 0x12, 0x34, 0x56])
        );
    }

    #[test]
    fn test_display() {
        assert_eq!(
            format!("{}", Address::new(0x2001, 0xdb8, 0, 0, 0, 0, 0, 0x10)),
            "2001:db8::10"
        );
        assert_eq!(format!("{}", Address::UNSPECIFIED), "::");
        assert_eq!(format!("{}", Address::LINK_LOCAL_ALL_DHCP_SERVERS), "ff02::1:2");
        assert_eq!(
            format!("{}", Address::new(1, 0, 2, 0, 0, 3, 0, 0)),
            "1:0:2::3:0:0"
        );
        assert_eq!(
            format!("{}", Address::new(1, 2, 3, 4, 5, 6, 7, 8)),
            "1:2:3:4:5:6:7:8"
        );
    }

    static REPR_PACKET_BYTES: [u8; 52] = [
        0x60, 0x00, 0x00, 0x00, 0x00, 0x0c, 0x11, 0x40, 0xfe, 0x80, 0x00, 0x00, 0x00, 0x00, 0x00,
        0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x01, 0xff, 0x02, 0x00, 0x00, 0x00, 0x00,
        0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x01, 0x00, 0x01, 0x00, 0x02, 0x00,
        0x0c, 0x02, 0x4e, 0xff, 0xff, 0xff, 0xff,
    ];

    fn packet_repr() -> Repr {
        Repr {
            src_addr: Address::new(0xfe80, 0, 0, 0, 0, 0, 0, 1),
            dst_addr: Address::LINK_LOCAL_ALL_NODES,
            next_header: Protocol::Udp,
            payload_len: 12,
            hop_limit: 64,
        }
    }

    #[test]
    fn test_repr_parse() {
        let packet = Packet::new_checked(&REPR_PACKET_BYTES[..]).unwrap();
        assert_eq!(Repr::parse(&packet), Ok(packet_repr()));
        assert_eq!(packet.payload().len(), 12);
    }

    #[test]
    fn test_repr_parse_bad_version() {
        let mut bytes = REPR_PACKET_BYTES;
        bytes[0] = 0x40;
        let packet = Packet::new_unchecked(&bytes[..]);
        assert_eq!(Repr::parse(&packet), Err(Error));
    }

    #[test]
    fn test_repr_parse_truncated_payload() {
        let packet = Packet::new_unchecked(&REPR_PACKET_BYTES[..48]);
        assert_eq!(Repr::parse(&packet), Err(Error));
    }

    #[test]
    fn test_repr_emit() {
        let mut bytes = [0xffu8; 52];
        let mut packet = Packet::new_unchecked(&mut bytes[..]);
        packet_repr().emit(&mut packet);
        assert_eq!(&bytes[..40], &REPR_PACKET_BYTES[..40]);
    }
}
