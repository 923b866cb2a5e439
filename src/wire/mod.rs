/*! Low-level packet access and construction.

The `wire` module deals with the packet *representation*. It provides two levels
of functionality.

 * First, it provides functions to extract fields from sequences of octets,
   and to insert fields into sequences of octets. This happens `Packet` family of
   structures, e.g. [EthernetFrame] or [Ipv6Packet].
 * Second, in cases where the space of valid field values is much smaller than the space
   of possible field values, it provides a compact, high-level representation
   of packet data that can be parsed from and emitted into a sequence of octets.
   This happens through the `Repr` family of structs and enums, e.g. [NdiscRepr]
   or [Dhcpv6Repr].

Only the subset of Ethernet, IPv6, ICMPv6 and DHCPv6 that address
autoconfiguration needs is implemented here: extension headers, fragmentation
and most DHCPv6 options are parsed over and ignored.

The `Packet` family of data structures guarantees that, if the `Packet::check_len()` method
returned `Ok(())`, then no accessor or setter method will panic; however, the guarantee
provided by `Packet::check_len()` may no longer hold after changing certain fields,
which are listed in the documentation for the specific packet.

The `Packet::new_checked` method is a shorthand for a combination of `Packet::new_unchecked`
and `Packet::check_len`.
When parsing untrusted input, it is *necessary* to use `Packet::new_checked()`;
so long as the buffer is not modified, no accessor will fail.
When emitting output, though, it is *incorrect* to use `Packet::new_checked()`;
the length check is likely to succeed on a zeroed buffer, but fail on a buffer
filled with data from a previous packet, such as when reusing buffers, resulting
in nondeterministic panics with some network devices but not others.
The buffer length for emission is not calculated by the `Packet` layer.
*/

mod field {
    pub type Field = ::core::ops::Range<usize>;
    pub type Rest = ::core::ops::RangeFrom<usize>;
}

pub mod dhcpv6;
mod ethernet;
mod icmpv6;
mod ip;
mod ipv4;
mod ipv6;
mod ndisc;
mod ndiscoption;
mod udp;

use core::fmt;

pub use self::ethernet::{
    Address as EthernetAddress, EtherType as EthernetProtocol, Frame as EthernetFrame,
    Repr as EthernetRepr, HEADER_LEN as ETHERNET_HEADER_LEN,
};

pub use self::ip::{checksum, Protocol as IpProtocol};

pub use self::ipv4::Address as Ipv4Address;

pub use self::ipv6::{
    Address as Ipv6Address, InterfaceId as Ipv6InterfaceId, Packet as Ipv6Packet,
    Repr as Ipv6Repr, HEADER_LEN as IPV6_HEADER_LEN,
};

pub use self::icmpv6::{Message as Icmpv6Message, Packet as Icmpv6Packet};

pub use self::ndisc::{
    NeighborFlags as NdiscNeighborFlags, Repr as NdiscRepr, RouterFlags as NdiscRouterFlags,
    MAX_PREFIX_INFO,
};

pub use self::ndiscoption::{
    NdiscOption, PrefixInfoFlags as NdiscPrefixInfoFlags,
    PrefixInformation as NdiscPrefixInformation, RecursiveDnsServer as NdiscRecursiveDnsServer,
    Repr as NdiscOptionRepr, Type as NdiscOptionType, MAX_RDNSS_ADDRESSES,
};

pub use self::udp::{Packet as UdpPacket, Repr as UdpRepr, HEADER_LEN as UDP_HEADER_LEN};

pub use self::dhcpv6::{
    Dhcpv6Option, MessageType as Dhcpv6MessageType, Packet as Dhcpv6Packet, Repr as Dhcpv6Repr,
    ReprDnsServers as Dhcpv6ReprDnsServers, ReprIaAddr as Dhcpv6ReprIaAddr,
    ReprIaNa as Dhcpv6ReprIaNa, ReprStatusCode as Dhcpv6ReprStatusCode,
    StatusCode as Dhcpv6StatusCode, CLIENT_PORT as DHCPV6_CLIENT_PORT,
    MAX_DNS_ADDRESSES as DHCP_MAX_DNS_SERVER_COUNT, SERVER_PORT as DHCPV6_SERVER_PORT,
};

/// Parsing a packet failed.
///
/// Either it is malformed, or it is not supported by this crate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Error;

#[cfg(feature = "std")]
impl std::error::Error for Error {}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "wire::Error")
    }
}

pub type Result<T> = core::result::Result<T, Error>;
