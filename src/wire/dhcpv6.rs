// See https://datatracker.ietf.org/doc/html/rfc8415 for the DHCPv6 specification.

use byteorder::{ByteOrder, NetworkEndian};
use core::{fmt, iter};
use heapless::Vec;

use super::{Error, Ipv6Address, Result};

pub const SERVER_PORT: u16 = 547;
pub const CLIENT_PORT: u16 = 546;
pub const MAX_REQUEST_OPTIONS: usize = 8;
pub const MAX_IA_ADDRESSES: usize = 4;
pub const MAX_DNS_ADDRESSES: usize = 4;

/// Lifetime value meaning "infinity" in IA_NA and IAADDR options.
pub const INFINITY: u32 = 0xffff_ffff;

enum_with_unknown! {
    /// The possible message types of a DHCP packet.
    pub enum MessageType(u8) {
        Solicit = 1,
        Advertise = 2,
        Request = 3,
        Confirm = 4,
        Renew = 5,
        Rebind = 6,
        Reply = 7,
        Release = 8,
        Decline = 9,
        Reconfigure = 10,
        InformationRequest = 11,
        RelayForw = 12,
        RelayRepl = 13
    }
}

impl fmt::Display for MessageType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            Self::Solicit => write!(f, "solicit"),
            Self::Advertise => write!(f, "advertise"),
            Self::Request => write!(f, "request"),
            Self::Confirm => write!(f, "confirm"),
            Self::Renew => write!(f, "renew"),
            Self::Rebind => write!(f, "rebind"),
            Self::Reply => write!(f, "reply"),
            Self::Release => write!(f, "release"),
            Self::Decline => write!(f, "decline"),
            Self::Reconfigure => write!(f, "reconfigure"),
            Self::InformationRequest => write!(f, "information-request"),
            Self::RelayForw => write!(f, "relay-forw"),
            Self::RelayRepl => write!(f, "relay-repl"),
            Self::Unknown(a) => write!(f, "unknown({a})"),
        }
    }
}

/// A buffer for DHCP options.
#[derive(Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Dhcpv6OptionWriter<'a> {
    /// The underlying buffer, directly from the DHCP packet representation.
    buffer: &'a mut [u8],
}

impl<'a> Dhcpv6OptionWriter<'a> {
    pub fn new(buffer: &'a mut [u8]) -> Self {
        Self { buffer }
    }

    /// Emit a [`Dhcpv6Option`] into a [`Dhcpv6OptionWriter`].
    pub fn emit(&mut self, option: Dhcpv6Option<'_>) -> Result<()> {
        if option.data.len() > u16::MAX as _ {
            return Err(Error);
        }
        self.emit_header(option.kind, option.data.len())?;
        self.emit_bytes(option.data)
    }

    /// Emit only the code and length of an option whose data is written
    /// piecewise afterwards, as encapsulated options are.
    pub fn emit_header(&mut self, kind: u16, data_len: usize) -> Result<()> {
        if data_len > u16::MAX as _ {
            return Err(Error);
        }
        let mut header = [0u8; 4];
        NetworkEndian::write_u16(&mut header[0..2], kind);
        NetworkEndian::write_u16(&mut header[2..4], data_len as u16);
        self.emit_bytes(&header)
    }

    /// Append raw octets.
    pub fn emit_bytes(&mut self, data: &[u8]) -> Result<()> {
        if self.buffer.len() < data.len() {
            return Err(Error);
        }
        let (buf, rest) = core::mem::take(&mut self.buffer).split_at_mut(data.len());
        buf.copy_from_slice(data);
        self.buffer = rest;
        Ok(())
    }

    /// Return the number of octets still free.
    pub fn remaining(&self) -> usize {
        self.buffer.len()
    }
}

// The format of DHCP options is:
//
// 0                   1                   2                   3
// 0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1
// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
// |          option-code          |           option-len          |
// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
// |                          option-data                          |
// |                      (option-len octets)                      |
// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
//
// Options are scoped by encapsulation: IA_NA carries IAADDR and
// STATUS_CODE options of its own, and so does IAADDR.
//
/// A representation of a single DHCP option.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Dhcpv6Option<'a> {
    pub kind: u16,
    pub data: &'a [u8],
}

/// A read/write wrapper around a Dynamic Host Configuration Protocol packet buffer.
#[derive(Debug, PartialEq, Eq, Copy, Clone)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Packet<T: AsRef<[u8]>> {
    buffer: T,
}

pub(crate) mod field {
    #![allow(non_snake_case)]
    #![allow(unused)]

    use crate::wire::field::*;

    pub const MTYPE: usize = 0;
    pub const XID: Field = 1..4;
    pub const OPTIONS: Rest = 4..;

    // DUID of the client.
    pub const OPT_CLIENTID: u16 = 1;
    // DUID of the server.
    pub const OPT_SERVERID: u16 = 2;
    // Identity Association for Non-temporary Addresses.
    //
    //     0                   1                   2                   3
    //     0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1
    //    +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
    //    |          OPTION_IA_NA         |          option-len           |
    //    +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
    //    |                        IAID (4 octets)                        |
    //    +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
    //    |                              T1                               |
    //    +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
    //    |                              T2                               |
    //    +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
    //    .                         IA_NA-options                         .
    //    +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
    pub const OPT_IA_NA: u16 = 3;
    pub const IA_NA_LEN: usize = 12;
    // Identity Association for Temporary Addresses. Never requested.
    pub const OPT_IA_TA: u16 = 4;
    // IA Address, only valid inside IA_NA or IA_TA.
    //
    //     0                   1                   2                   3
    //     0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1
    //    +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
    //    |          OPTION_IAADDR        |          option-len           |
    //    +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
    //    |                         IPv6-address                          |
    //    |                          (16 octets)                          |
    //    +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
    //    |                      preferred-lifetime                       |
    //    +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
    //    |                        valid-lifetime                         |
    //    +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
    //    .                        IAaddr-options                         .
    //    +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
    pub const OPT_IA_ADDR: u16 = 5;
    pub const IA_ADDR_LEN: usize = 24;
    // Option Request, a list of 2-octet option codes.
    pub const OPT_ORO: u16 = 6;
    pub const OPT_PREFERENCE: u16 = 7;
    // Elapsed time since the start of the exchange, in hundredths of a second.
    pub const OPT_ELAPSED_TIME: u16 = 8;
    pub const OPT_STATUS_CODE: u16 = 13;
    pub const OPT_RAPID_COMMIT: u16 = 14;
    // RFC 3646 DNS recursive name servers.
    pub const OPT_DNS_SERVERS: u16 = 23;
    pub const OPT_DOMAIN_LIST: u16 = 24;
}

impl<T: AsRef<[u8]>> Packet<T> {
    /// Imbue a raw octet buffer with DHCP packet structure.
    pub const fn new_unchecked(buffer: T) -> Packet<T> {
        Packet { buffer }
    }

    /// Shorthand for a combination of [new_unchecked] and [check_len].
    ///
    /// [new_unchecked]: #method.new_unchecked
    /// [check_len]: #method.check_len
    pub fn new_checked(buffer: T) -> Result<Packet<T>> {
        let packet = Self::new_unchecked(buffer);
        packet.check_len()?;
        Ok(packet)
    }

    /// Ensure that no accessor method will panic if called.
    /// Returns `Err(Error)` if the buffer is too short.
    pub fn check_len(&self) -> Result<()> {
        let len = self.buffer.as_ref().len();
        if len < field::OPTIONS.start {
            Err(Error)
        } else {
            Ok(())
        }
    }

    /// Consume the packet, returning the underlying buffer.
    pub fn into_inner(self) -> T {
        self.buffer
    }

    /// Returns the message type.
    pub fn message_type(&self) -> MessageType {
        MessageType::from(self.buffer.as_ref()[field::MTYPE])
    }

    /// Returns the transaction ID.
    ///
    /// The transaction ID (called `xid` in the specification) is a random number used to
    /// associate messages and responses between client and server. The number is chosen by
    /// the client.
    pub fn transaction_id(&self) -> u32 {
        let field = &self.buffer.as_ref()[field::XID];
        NetworkEndian::read_u24(field)
    }
}

impl<'a, T: AsRef<[u8]> + ?Sized> Packet<&'a T> {
    /// Return an iterator over the options.
    #[inline]
    pub fn options(&self) -> impl Iterator<Item = Result<Dhcpv6Option<'a>>> + 'a {
        let data = self.buffer.as_ref();
        parse_options(&data[field::OPTIONS])
    }
}

/// Return an iterator over a run of options.
///
/// A truncated option yields one `Err` and ends the iteration.
pub fn parse_options(mut buf: &[u8]) -> impl Iterator<Item = Result<Dhcpv6Option<'_>>> + '_ {
    iter::from_fn(move || {
        if buf.is_empty() {
            return None;
        }
        if buf.len() < 4 {
            buf = &[];
            return Some(Err(Error));
        }
        let kind = NetworkEndian::read_u16(&buf[0..2]);
        let len = NetworkEndian::read_u16(&buf[2..4]) as usize;
        if buf.len() < 4 + len {
            buf = &[];
            return Some(Err(Error));
        }
        let opt = Dhcpv6Option {
            kind,
            data: &buf[4..4 + len],
        };
        buf = &buf[4 + len..];
        Some(Ok(opt))
    })
}

impl<T: AsRef<[u8]> + AsMut<[u8]>> Packet<T> {
    /// Sets the message type.
    pub fn set_message_type(&mut self, value: MessageType) {
        let field = &mut self.buffer.as_mut()[field::MTYPE];
        *field = value.into();
    }

    /// Sets the transaction ID.
    ///
    /// Only the low 24 bits are kept.
    pub fn set_transaction_id(&mut self, value: u32) {
        let value = value & 0xff_ffff;
        let field = &mut self.buffer.as_mut()[field::XID];
        NetworkEndian::write_u24(field, value)
    }
}

impl<'a, T: AsRef<[u8]> + AsMut<[u8]> + ?Sized> Packet<&'a mut T> {
    /// Return a pointer to the options.
    #[inline]
    pub fn options_mut(&mut self) -> Dhcpv6OptionWriter<'_> {
        Dhcpv6OptionWriter::new(&mut self.buffer.as_mut()[field::OPTIONS])
    }
}

// All DHCP messages sent between clients and servers share an identical
// fixed-format header and a variable-format area for options.
//
//     0                   1                   2                   3
//     0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1
//    +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
//    |    msg-type   |               transaction-id                  |
//    +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
//    |                                                               |
//    .                            options                            .
//    .                 (variable number and length)                  .
//    |                                                               |
//    +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
#[derive(Debug, PartialEq, Eq, Clone)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Repr<'a> {
    /// Indicates the type of DHCP message this packet represents.
    pub message_type: MessageType,
    /// This field is also known as `xid` in the RFC. It is a random number chosen by the client,
    /// used by the client and server to associate messages and responses between a client and a
    /// server.
    /// Note: Only the first 24bits of this ID are actually used
    pub transaction_id: u32,
    /// DUID of the client
    pub client_id: Option<&'a [u8]>,
    /// DUID of the server
    pub server_id: Option<&'a [u8]>,
    /// The elapsed time in hundreds of a second
    pub elapsed_time: Option<u16>,
    /// Used for the clients to request a certain set of options from the DHCPv6 server
    pub request_options: Option<Vec<u16, MAX_REQUEST_OPTIONS>>,
    /// Non-temporary addresses
    pub ia_na: Option<ReprIaNa<'a>>,
    /// DNS Servers
    pub dns_servers: Option<ReprDnsServers>,
    /// Status of the whole message, as opposed to one IA
    pub status_code: Option<ReprStatusCode<'a>>,
}

impl<'a> Repr<'a> {
    /// Return the length of a packet that will be emitted from this high-level representation.
    pub fn buffer_len(&self) -> usize {
        let mut len = field::OPTIONS.start;

        if let Some(id) = self.client_id {
            len += 4 + id.len();
        }
        if let Some(id) = self.server_id {
            len += 4 + id.len();
        }
        if self.elapsed_time.is_some() {
            len += 4 + 2;
        }
        if let Some(ia) = self.ia_na.as_ref() {
            len += 4 + ia.data_len();
        }
        if let Some(dns) = self.dns_servers.as_ref() {
            len += 4 + dns.data_len();
        }
        if let Some(status) = self.status_code.as_ref() {
            len += 4 + status.data_len();
        }
        if let Some(options) = self.request_options.as_ref() {
            len += 4 + options.len() * 2;
        }

        len
    }

    /// Parse a DHCP packet and return a high-level representation.
    pub fn parse<T>(packet: &Packet<&'a T>) -> Result<Self>
    where
        T: AsRef<[u8]> + ?Sized,
    {
        packet.check_len()?;

        let mut client_id = None;
        let mut server_id = None;
        let mut elapsed_time = None;
        let mut ia_na = None;
        let mut dns_servers = None;
        let mut status_code = None;
        let mut request_options = None;

        for option in packet.options() {
            let option = option?;
            let data = option.data;
            match (option.kind, data.len()) {
                (field::OPT_CLIENTID, _) => client_id = Some(data),
                (field::OPT_SERVERID, _) => server_id = Some(data),
                (field::OPT_ELAPSED_TIME, 2) => {
                    elapsed_time = Some(NetworkEndian::read_u16(data));
                }
                // Only the first IA_NA is used, the client only ever asks for one.
                (field::OPT_IA_NA, _) if ia_na.is_none() => {
                    ia_na = Some(ReprIaNa::parse(data)?);
                }
                (field::OPT_DNS_SERVERS, _) => {
                    dns_servers = Some(ReprDnsServers::parse(data)?);
                }
                (field::OPT_STATUS_CODE, _) => {
                    status_code = Some(ReprStatusCode::parse(data)?);
                }
                (field::OPT_ORO, len) if len % 2 == 0 => {
                    let mut options = Vec::new();
                    for chunk in data.chunks_exact(2) {
                        options.push(NetworkEndian::read_u16(chunk)).ok();
                    }
                    request_options = Some(options);
                }
                _ => {}
            }
        }

        Ok(Repr {
            message_type: packet.message_type(),
            transaction_id: packet.transaction_id(),
            client_id,
            server_id,
            elapsed_time,
            request_options,
            ia_na,
            dns_servers,
            status_code,
        })
    }

    /// Emit a high-level representation into a Dynamic Host
    /// Configuration Protocol packet.
    pub fn emit<T>(&self, packet: &mut Packet<&mut T>) -> Result<()>
    where
        T: AsRef<[u8]> + AsMut<[u8]> + ?Sized,
    {
        packet.check_len()?;
        packet.set_message_type(self.message_type);
        packet.set_transaction_id(self.transaction_id);

        let mut dhcp_options = packet.options_mut();

        if let Some(val) = self.client_id {
            dhcp_options.emit(Dhcpv6Option {
                kind: field::OPT_CLIENTID,
                data: val,
            })?;
        }

        if let Some(val) = self.server_id {
            dhcp_options.emit(Dhcpv6Option {
                kind: field::OPT_SERVERID,
                data: val,
            })?;
        }

        if let Some(val) = self.elapsed_time {
            dhcp_options.emit(Dhcpv6Option {
                kind: field::OPT_ELAPSED_TIME,
                data: &val.to_be_bytes(),
            })?;
        }

        if let Some(val) = &self.ia_na {
            val.emit(&mut dhcp_options)?;
        }

        if let Some(dns) = &self.dns_servers {
            dns.emit(&mut dhcp_options)?;
        }

        if let Some(status) = &self.status_code {
            status.emit(&mut dhcp_options)?;
        }

        if let Some(request_options) = &self.request_options {
            dhcp_options.emit_header(field::OPT_ORO, request_options.len() * 2)?;
            for opt in request_options.iter() {
                dhcp_options.emit_bytes(&opt.to_be_bytes())?;
            }
        }

        Ok(())
    }

    pub fn add_request_option(&mut self, option: u16) {
        self.request_options
            .get_or_insert_with(Vec::new)
            .push(option)
            .ok();
    }
}

impl<'a, T: AsRef<[u8]> + ?Sized> fmt::Display for Packet<&'a T> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match Repr::parse(self) {
            Ok(repr) => write!(f, "{repr}"),
            Err(err) => write!(f, "DHCPv6 ({err})"),
        }
    }
}

impl<'a> fmt::Display for Repr<'a> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "DHCPv6 msg-type={} trans-id={:06x}",
            self.message_type, self.transaction_id
        )?;

        if let Some(server_id) = self.server_id {
            write!(f, " server-id={server_id:02x?}")?;
        }
        if let Some(client_id) = self.client_id {
            write!(f, " client-id={client_id:02x?}")?;
        }
        if let Some(elapsed_time) = self.elapsed_time {
            write!(f, " elapsed-time={elapsed_time}/100s")?;
        }
        if let Some(request_options) = self.request_options.as_ref() {
            write!(f, " ops=")?;
            for opt in request_options.iter() {
                write!(f, "{opt},")?;
            }
        }
        if let Some(ia_na) = self.ia_na.as_ref() {
            write!(f, " {ia_na}")?;
        }
        if let Some(dns_servers) = self.dns_servers.as_ref() {
            write!(f, " {dns_servers}")?;
        }
        if let Some(status) = self.status_code.as_ref() {
            write!(f, " status={status}")?;
        }
        Ok(())
    }
}

#[derive(Debug, PartialEq, Eq, Clone)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ReprIaNa<'a> {
    /// The unique identifier for this IA_NA
    pub iaid: u32,
    /// Seconds until the client contacts the server that granted the addresses
    pub t1: u32,
    /// Seconds until the client contacts any server
    pub t2: u32,
    /// Addresses attached to this option
    pub addresses: Vec<ReprIaAddr<'a>, MAX_IA_ADDRESSES>,
    /// Represents a status code applied to this IA
    pub status_code: Option<ReprStatusCode<'a>>,
}

impl<'a> ReprIaNa<'a> {
    pub fn data_len(&self) -> usize {
        let mut len = field::IA_NA_LEN;
        for addr in self.addresses.iter() {
            len += 4 + addr.data_len();
        }
        if let Some(status_code) = self.status_code.as_ref() {
            len += 4 + status_code.data_len()
        }
        len
    }

    pub fn parse(data: &'a [u8]) -> Result<Self> {
        if data.len() < field::IA_NA_LEN {
            return Err(Error);
        }
        let iaid = NetworkEndian::read_u32(&data[0..4]);
        let t1 = NetworkEndian::read_u32(&data[4..8]);
        let t2 = NetworkEndian::read_u32(&data[8..12]);

        let mut addresses = Vec::new();
        let mut status_code = None;
        for option in parse_options(&data[field::IA_NA_LEN..]) {
            let option = option?;
            match option.kind {
                field::OPT_IA_ADDR => {
                    if addresses.push(ReprIaAddr::parse(option.data)?).is_err() {
                        net_trace!("DHCPv6 IA_NA: too many addresses, ignoring the rest");
                    }
                }
                field::OPT_STATUS_CODE => {
                    status_code = Some(ReprStatusCode::parse(option.data)?);
                }
                _ => {}
            }
        }

        Ok(Self {
            iaid,
            t1,
            t2,
            addresses,
            status_code,
        })
    }

    pub fn emit(&self, dhcp_options: &mut Dhcpv6OptionWriter<'_>) -> Result<()> {
        dhcp_options.emit_header(field::OPT_IA_NA, self.data_len())?;
        dhcp_options.emit_bytes(&self.iaid.to_be_bytes())?;
        dhcp_options.emit_bytes(&self.t1.to_be_bytes())?;
        dhcp_options.emit_bytes(&self.t2.to_be_bytes())?;

        for addr in self.addresses.iter() {
            addr.emit(dhcp_options)?;
        }

        if let Some(status_code) = self.status_code.as_ref() {
            status_code.emit(dhcp_options)?;
        }

        Ok(())
    }
}

impl<'a> fmt::Display for ReprIaNa<'a> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "ia-na iaid={} t1={} t2={}", self.iaid, self.t1, self.t2)?;
        for addr in self.addresses.iter() {
            write!(f, " addr={addr}")?;
        }
        if let Some(s) = self.status_code.as_ref() {
            write!(f, " status={s}")?;
        }
        Ok(())
    }
}

#[derive(Debug, PartialEq, Eq, Clone)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ReprIaAddr<'a> {
    /// The address thats represented here
    pub addr: Ipv6Address,
    pub preferred_lifetime: u32,
    pub valid_lifetime: u32,
    /// Status of this single address
    pub status_code: Option<ReprStatusCode<'a>>,
}

impl<'a> ReprIaAddr<'a> {
    pub fn data_len(&self) -> usize {
        let mut len = field::IA_ADDR_LEN;
        if let Some(status_code) = self.status_code.as_ref() {
            len += 4 + status_code.data_len()
        }
        len
    }

    pub fn parse(data: &'a [u8]) -> Result<Self> {
        if data.len() < field::IA_ADDR_LEN {
            return Err(Error);
        }
        let addr = Ipv6Address::from_bytes(&data[0..16]);
        let preferred_lifetime = NetworkEndian::read_u32(&data[16..20]);
        let valid_lifetime = NetworkEndian::read_u32(&data[20..24]);

        let mut status_code = None;
        for option in parse_options(&data[field::IA_ADDR_LEN..]) {
            let option = option?;
            if option.kind == field::OPT_STATUS_CODE {
                status_code = Some(ReprStatusCode::parse(option.data)?);
            }
        }

        Ok(Self {
            addr,
            preferred_lifetime,
            valid_lifetime,
            status_code,
        })
    }

    pub fn emit(&self, dhcp_options: &mut Dhcpv6OptionWriter<'_>) -> Result<()> {
        dhcp_options.emit_header(field::OPT_IA_ADDR, self.data_len())?;
        dhcp_options.emit_bytes(self.addr.as_bytes())?;
        dhcp_options.emit_bytes(&self.preferred_lifetime.to_be_bytes())?;
        dhcp_options.emit_bytes(&self.valid_lifetime.to_be_bytes())?;
        if let Some(status_code) = self.status_code.as_ref() {
            status_code.emit(dhcp_options)?;
        }
        Ok(())
    }
}

impl<'a> fmt::Display for ReprIaAddr<'a> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "{}(preferred-lifetime={} valid-lifetime={})",
            self.addr, self.preferred_lifetime, self.valid_lifetime
        )
    }
}

enum_with_unknown! {
    pub enum StatusCode(u16) {
        Success = 0,
        UnspecFail = 1,
        NoAddrsAvail = 2,
        NoBinding = 3,
        NotOnLink = 4,
        UseMulticast = 5,
        NoPrefixAvail = 6
    }
}

impl fmt::Display for StatusCode {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            Self::Success => write!(f, "success"),
            Self::UnspecFail => write!(f, "unspec-fail"),
            Self::NoAddrsAvail => write!(f, "no-addrs-avail"),
            Self::NoBinding => write!(f, "no-binding"),
            Self::NotOnLink => write!(f, "not-on-link"),
            Self::UseMulticast => write!(f, "use-multicast"),
            Self::NoPrefixAvail => write!(f, "no-prefix-avail"),
            Self::Unknown(a) => write!(f, "unknown({a})"),
        }
    }
}

//     0                   1                   2                   3
//     0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1
//    +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
//    |       OPTION_STATUS_CODE      |         option-len            |
//    +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
//    |          status-code          |                               |
//    +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+                               |
//    .                        status-message                         .
//    +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ReprStatusCode<'a> {
    pub status_code: StatusCode,
    /// UTF-8 text for humans. Left empty when the server sent invalid UTF-8.
    pub status_message: &'a str,
}

impl<'a> ReprStatusCode<'a> {
    pub fn data_len(&self) -> usize {
        2 + self.status_message.len()
    }

    pub fn parse(data: &'a [u8]) -> Result<Self> {
        if data.len() < 2 {
            return Err(Error);
        }
        let status_code = StatusCode::from(NetworkEndian::read_u16(&data[0..2]));
        let status_message = core::str::from_utf8(&data[2..]).unwrap_or("");

        Ok(Self {
            status_code,
            status_message,
        })
    }

    pub fn emit(&self, dhcp_options: &mut Dhcpv6OptionWriter<'_>) -> Result<()> {
        let status_code: u16 = self.status_code.into();
        dhcp_options.emit_header(field::OPT_STATUS_CODE, self.data_len())?;
        dhcp_options.emit_bytes(&status_code.to_be_bytes())?;
        dhcp_options.emit_bytes(self.status_message.as_bytes())
    }
}

impl<'a> fmt::Display for ReprStatusCode<'a> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}(msg='{}')", self.status_code, self.status_message)
    }
}

#[derive(Debug, PartialEq, Eq, Clone)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ReprDnsServers {
    /// IPv6 addresses of DNS servers
    pub addresses: Vec<Ipv6Address, MAX_DNS_ADDRESSES>,
}

impl ReprDnsServers {
    pub fn data_len(&self) -> usize {
        self.addresses.len() * 16
    }

    pub fn parse(data: &[u8]) -> Result<Self> {
        if data.len() % 16 != 0 {
            return Err(Error);
        }
        let mut addresses = Vec::new();
        for chunk in data.chunks_exact(16) {
            addresses.push(Ipv6Address::from_bytes(chunk)).ok();
        }
        Ok(Self { addresses })
    }

    pub fn emit(&self, dhcp_options: &mut Dhcpv6OptionWriter<'_>) -> Result<()> {
        dhcp_options.emit_header(field::OPT_DNS_SERVERS, self.data_len())?;
        for addr in self.addresses.iter() {
            dhcp_options.emit_bytes(addr.as_bytes())?;
        }
        Ok(())
    }
}

impl fmt::Display for ReprDnsServers {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "dns-servers")?;
        for addr in self.addresses.iter() {
            write!(f, " addr={addr}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    const CLIENT_DUID: [u8; 10] = [0x00, 0x03, 0x00, 0x01, 0x02, 0x00, 0x00, 0x00, 0x00, 0x01];
    const SERVER_DUID: [u8; 10] = [0x00, 0x03, 0x00, 0x01, 0x52, 0x54, 0x00, 0x00, 0x00, 0x02];
    const LEASED: Ipv6Address = Ipv6Address::new(0x2001, 0xdb8, 0, 0, 0, 0, 0, 0x10);
    const DNS: Ipv6Address = Ipv6Address::new(0x2001, 0xdb8, 0, 0, 0, 0, 0, 0x53);

    static SOLICIT_BYTES: [u8; 46] = [
        0x01, 0xab, 0xcd, 0xef, // solicit, xid
        0x00, 0x01, 0x00, 0x0a, 0x00, 0x03, 0x00, 0x01, 0x02, 0x00, 0x00, 0x00, 0x00, 0x01,
        0x00, 0x08, 0x00, 0x02, 0x00, 0x00, // elapsed time
        0x00, 0x03, 0x00, 0x0c, 0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
        0x00, 0x00, // ia_na
        0x00, 0x06, 0x00, 0x02, 0x00, 0x17, // oro
    ];

    fn solicit_repr() -> Repr<'static> {
        let mut repr = Repr {
            message_type: MessageType::Solicit,
            transaction_id: 0xabcdef,
            client_id: Some(&CLIENT_DUID),
            server_id: None,
            elapsed_time: Some(0),
            request_options: None,
            ia_na: Some(ReprIaNa {
                iaid: 1,
                t1: 0,
                t2: 0,
                addresses: Vec::new(),
                status_code: None,
            }),
            dns_servers: None,
            status_code: None,
        };
        repr.add_request_option(field::OPT_DNS_SERVERS);
        repr
    }

    fn reply_repr() -> Repr<'static> {
        let mut addresses = Vec::new();
        addresses
            .push(ReprIaAddr {
                addr: LEASED,
                preferred_lifetime: 2000,
                valid_lifetime: 3600,
                status_code: None,
            })
            .unwrap();
        let mut dns = Vec::new();
        dns.push(DNS).unwrap();
        Repr {
            message_type: MessageType::Reply,
            transaction_id: 0x123456,
            client_id: Some(&CLIENT_DUID),
            server_id: Some(&SERVER_DUID),
            elapsed_time: None,
            request_options: None,
            ia_na: Some(ReprIaNa {
                iaid: 1,
                t1: 1000,
                t2: 1600,
                addresses,
                status_code: None,
            }),
            dns_servers: Some(ReprDnsServers { addresses: dns }),
            status_code: None,
        }
    }

    #[test]
    fn test_emit_solicit() {
        let repr = solicit_repr();
        assert_eq!(repr.buffer_len(), SOLICIT_BYTES.len());
        let mut bytes = vec![0xa5; repr.buffer_len()];
        let mut packet = Packet::new_unchecked(&mut bytes[..]);
        repr.emit(&mut packet).unwrap();
        assert_eq!(&bytes[..], &SOLICIT_BYTES[..]);
    }

    #[test]
    fn test_parse_solicit() {
        let packet = Packet::new_checked(&SOLICIT_BYTES[..]).unwrap();
        assert_eq!(packet.message_type(), MessageType::Solicit);
        assert_eq!(packet.transaction_id(), 0xabcdef);
        assert_eq!(Repr::parse(&packet).unwrap(), solicit_repr());
    }

    #[test]
    fn test_reply_iaaddr_option_code() {
        let repr = reply_repr();
        let mut bytes = vec![0u8; repr.buffer_len()];
        repr.emit(&mut Packet::new_unchecked(&mut bytes[..])).unwrap();

        // msg header, client id and server id come first, then IA_NA
        let ia_na = 4 + 14 + 14;
        assert_eq!(&bytes[ia_na..ia_na + 2], &[0x00, 0x03]);
        assert_eq!(&bytes[ia_na + 16..ia_na + 18], &[0x00, 0x05]);

        let packet = Packet::new_checked(&bytes[..]).unwrap();
        assert_eq!(Repr::parse(&packet).unwrap(), repr);
    }

    #[test]
    fn test_emit_too_small_buffer() {
        let repr = reply_repr();
        let mut bytes = vec![0u8; repr.buffer_len() - 1];
        assert_eq!(
            repr.emit(&mut Packet::new_unchecked(&mut bytes[..])),
            Err(Error)
        );
    }

    #[test]
    fn test_truncated_ia_na() {
        let bytes = [
            0x07, 0x00, 0x00, 0x01, 0x00, 0x03, 0x00, 0x08, 0x00, 0x00, 0x00, 0x01, 0x00, 0x00,
            0x00, 0x00,
        ];
        let packet = Packet::new_checked(&bytes[..]).unwrap();
        assert_eq!(Repr::parse(&packet), Err(Error));
    }

    #[test]
    fn test_truncated_option() {
        let bytes = [0x07, 0x00, 0x00, 0x01, 0x00, 0x01, 0x00, 0x0a, 0x00, 0x03];
        let packet = Packet::new_checked(&bytes[..]).unwrap();
        assert_eq!(Repr::parse(&packet), Err(Error));
    }

    #[test]
    fn test_status_code_in_ia() {
        let bytes = [
            0x07, 0x00, 0x00, 0x01, // reply
            0x00, 0x03, 0x00, 0x16, 0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
            0x00, 0x00, // ia_na header
            0x00, 0x0d, 0x00, 0x06, 0x00, 0x02, b'n', b'o', b'n', b'e',
        ];
        let packet = Packet::new_checked(&bytes[..]).unwrap();
        let repr = Repr::parse(&packet).unwrap();
        let ia_na = repr.ia_na.unwrap();
        assert!(ia_na.addresses.is_empty());
        assert_eq!(
            ia_na.status_code,
            Some(ReprStatusCode {
                status_code: StatusCode::NoAddrsAvail,
                status_message: "none",
            })
        );
    }

    #[test]
    fn test_status_code_invalid_utf8() {
        let repr = ReprStatusCode::parse(&[0x00, 0x01, 0xff, 0xfe]).unwrap();
        assert_eq!(repr.status_code, StatusCode::UnspecFail);
        assert_eq!(repr.status_message, "");
    }

    #[test]
    fn test_dns_servers_bad_len() {
        assert_eq!(ReprDnsServers::parse(&[0u8; 17]), Err(Error));
    }
}
