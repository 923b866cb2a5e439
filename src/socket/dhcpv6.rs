use heapless::Vec;

use super::{Packet, Socket};
use crate::iface::Error;
use crate::phy::Device;
use crate::rand::Rand;
use crate::time::{Duration, Instant};
use crate::wire::dhcpv6::{self, StatusCode, INFINITY};
use crate::wire::{
    Dhcpv6MessageType, Dhcpv6Repr, Dhcpv6ReprIaAddr, Dhcpv6ReprIaNa, EthernetAddress,
    Ipv6Address, Ipv6Repr, DHCP_MAX_DNS_SERVER_COUNT,
};

/// Longest server DUID the client keeps.
pub const MAX_IDENTIFIER_LEN: usize = 32;

/// DUID-LL: type 3, hardware type 1 (Ethernet), then the MAC.
const DUID_LEN: usize = 10;

/// Which DHCPv6 exchange to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Mode {
    /// Information-Request / Reply. The address comes from SLAAC.
    Stateless,
    /// Solicit / Advertise / Request / Reply. The server grants the address.
    Stateful,
}

/// Information on how to reach a DHCPv6 server.
#[derive(Debug, Clone, Eq, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ServerInfo {
    /// Link-local address the server answered from.
    pub address: Ipv6Address,
    /// Server DUID, echoed in Request and Renew.
    pub identifier: Vec<u8, MAX_IDENTIFIER_LEN>,
}

/// Configuration obtained from a DHCPv6 server.
///
/// Timers are relative to `acquired_at`. `Duration::MAX` stands for the
/// protocol's infinity.
#[derive(Debug, Clone, Eq, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Lease {
    /// Whether the server granted an address, as opposed to options only.
    pub stateful: bool,
    pub address: Option<Ipv6Address>,
    pub dns_servers: Vec<Ipv6Address, DHCP_MAX_DNS_SERVER_COUNT>,
    pub t1: Duration,
    pub t2: Duration,
    pub preferred_lifetime: Duration,
    pub valid_lifetime: Duration,
    /// When the Reply carrying this lease arrived.
    pub acquired_at: Instant,
    pub server: Option<ServerInfo>,
}

impl Lease {
    fn at(&self, offset: Duration) -> Option<Instant> {
        if offset == Duration::MAX {
            None
        } else {
            Some(self.acquired_at + offset)
        }
    }

    /// When to start renewing, or `None` to never renew.
    pub fn renew_at(&self) -> Option<Instant> {
        self.at(self.t1)
    }

    /// When to give up on the granting server and rebind with any server.
    pub fn rebind_at(&self) -> Option<Instant> {
        self.at(self.t2)
    }

    /// When the address stops being valid, or `None` for never.
    pub fn expires_at(&self) -> Option<Instant> {
        self.at(self.valid_lifetime)
    }

    /// Fail with [Error::LeaseExpired] once the valid lifetime ran out.
    pub fn check(&self, now: Instant) -> Result<(), Error> {
        match self.expires_at() {
            Some(expires_at) if now >= expires_at => Err(Error::LeaseExpired),
            _ => Ok(()),
        }
    }

    pub fn dns_server(&self) -> Option<Ipv6Address> {
        self.dns_servers.first().copied()
    }
}

/// Address and timers taken from an accepted IA_NA.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Binding {
    address: Ipv6Address,
    t1: Duration,
    t2: Duration,
    preferred_lifetime: Duration,
    valid_lifetime: Duration,
}

#[derive(Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
enum ClientState {
    /// Nothing obtained yet, or the lease was lost.
    Init,
    /// Configured. After a failed renew or rebind, `retry_at` holds the
    /// next attempt back.
    Bound {
        lease: Lease,
        retry_at: Option<Instant>,
    },
}

/// Timeout and retry configuration.
#[derive(Debug, PartialEq, Eq, Copy, Clone)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RetryConfig {
    /// The retransmission timeout doubles every 2 tries.
    pub initial_request_timeout: Duration,
    /// Retransmissions after the first message, per exchange.
    pub request_retries: u16,
    /// Shortest wait between two failed renew or rebind attempts.
    pub min_renew_timeout: Duration,
    /// Cap on the server-provided valid lifetime. Useful to react faster to
    /// configuration changes and to test whether renews work correctly.
    pub max_lease_duration: Option<Duration>,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            initial_request_timeout: Duration::from_secs(1),
            request_retries: 5,
            min_renew_timeout: Duration::from_secs(60),
            max_lease_duration: None,
        }
    }
}

/// Return value of [Client::maintain].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Event {
    /// No timer was due.
    NoAction,
    /// A Renew went unanswered or was refused. The lease is kept.
    RenewFailed,
    /// The granting server extended the lease.
    RenewedOk,
    /// A Rebind went unanswered or was refused. The lease is kept.
    RebindFailed,
    /// Some server extended, or replaced, the lease.
    RebindOk,
    /// The valid lifetime ran out. Configuration has to start over.
    Expired,
}

/// DHCPv6 client.
///
/// Runs one exchange per call over a [Socket] and keeps the resulting
/// lease for later [maintain](Client::maintain) calls.
#[derive(Debug)]
pub struct Client {
    state: ClientState,
    retry_config: RetryConfig,
    rand: Rand,
    duid: [u8; DUID_LEN],
    iaid: u32,
    response_timeout: Duration,
}

impl Client {
    /// Create a client identified by `hardware_addr`. `seed` feeds the
    /// transaction id generator.
    pub fn new(hardware_addr: EthernetAddress, retry_config: RetryConfig, seed: u64) -> Self {
        let mac = hardware_addr.0;
        let mut duid = [0; DUID_LEN];
        duid[..4].copy_from_slice(&[0x00, 0x03, 0x00, 0x01]);
        duid[4..].copy_from_slice(&mac);

        let mac_bits = mac.iter().fold(0u64, |acc, b| (acc << 8) | *b as u64);

        Client {
            state: ClientState::Init,
            retry_config,
            rand: Rand::new(seed ^ mac_bits),
            duid,
            iaid: u32::from_be_bytes([mac[2], mac[3], mac[4], mac[5]]),
            response_timeout: Duration::from_secs(4),
        }
    }

    /// The DUID-LL sent as client identifier.
    pub fn duid(&self) -> &[u8] {
        &self.duid
    }

    /// Identity association id, the low four bytes of the MAC.
    pub fn iaid(&self) -> u32 {
        self.iaid
    }

    pub fn retry_config(&self) -> RetryConfig {
        self.retry_config
    }

    /// Set the retry/timeouts configuration.
    pub fn set_retry_config(&mut self, config: RetryConfig) {
        self.retry_config = config;
    }

    /// The lease from the last successful exchange.
    pub fn lease(&self) -> Option<&Lease> {
        match &self.state {
            ClientState::Bound { lease, .. } => Some(lease),
            ClientState::Init => None,
        }
    }

    /// Drop the lease.
    pub fn reset(&mut self) {
        net_trace!("DHCPv6 reset");
        self.state = ClientState::Init;
    }

    /// Run a complete exchange and keep the resulting lease.
    ///
    /// `timeout` bounds the Information-Request or Solicit phase and
    /// `response_timeout` bounds every Request, Renew and Rebind.
    pub fn negotiate<D: Device>(
        &mut self,
        socket: &mut Socket<'_, D>,
        mode: Mode,
        timeout: Duration,
        response_timeout: Duration,
    ) -> Result<Lease, Error> {
        self.response_timeout = response_timeout;
        self.reset();

        let lease = match mode {
            Mode::Stateless => self.information_request(socket, timeout)?,
            Mode::Stateful => {
                let (server, offer) = self.solicit(socket, timeout)?;
                self.request(socket, server, offer)?
            }
        };
        net_debug!(
            "DHCPv6 bound: address={:?} dns={:?} t1={} t2={} valid={}",
            lease.address,
            lease.dns_server(),
            lease.t1,
            lease.t2,
            lease.valid_lifetime
        );

        self.state = ClientState::Bound {
            lease: lease.clone(),
            retry_at: None,
        };
        Ok(lease)
    }

    /// Drive renew and rebind. Performs at most one exchange per call and
    /// returns immediately when no timer is due.
    ///
    /// Only stateful leases are maintained.
    pub fn maintain<D: Device>(&mut self, socket: &mut Socket<'_, D>) -> Event {
        let now = socket.now();
        let (lease, retry_at) = match &self.state {
            ClientState::Bound { lease, retry_at } if lease.stateful => (lease, *retry_at),
            _ => return Event::NoAction,
        };

        if let Err(e) = lease.check(now) {
            net_info!("DHCPv6: {}", e);
            self.reset();
            return Event::Expired;
        }
        match lease.renew_at() {
            Some(renew_at) if now >= renew_at => (),
            _ => return Event::NoAction,
        }
        if matches!(retry_at, Some(retry_at) if now < retry_at) {
            return Event::NoAction;
        }

        let rebinding = matches!(lease.rebind_at(), Some(rebind_at) if now >= rebind_at);
        let (message_type, boundary, server) = if rebinding {
            (Dhcpv6MessageType::Rebind, lease.expires_at(), None)
        } else {
            (
                Dhcpv6MessageType::Renew,
                lease.rebind_at(),
                lease.server.clone(),
            )
        };
        let address = match lease.address {
            Some(address) => address,
            None => return Event::NoAction,
        };

        match self.extend(socket, message_type, address, server, boundary) {
            Ok(lease) => {
                net_debug!(
                    "DHCPv6 {} ok: address={:?} t1={} t2={} valid={}",
                    message_type,
                    lease.address,
                    lease.t1,
                    lease.t2,
                    lease.valid_lifetime
                );
                self.state = ClientState::Bound {
                    lease,
                    retry_at: None,
                };
                if rebinding {
                    Event::RebindOk
                } else {
                    Event::RenewedOk
                }
            }
            Err(e) => {
                let now = socket.now();
                let next = match boundary {
                    Some(boundary) if boundary > now => {
                        let wait = self
                            .retry_config
                            .min_renew_timeout
                            .max((boundary - now) / 2);
                        (now + wait).min(boundary)
                    }
                    Some(boundary) => boundary,
                    None => now + self.retry_config.min_renew_timeout,
                };
                net_debug!("DHCPv6 {} failed: {}, next attempt at {}", message_type, e, next);
                if let ClientState::Bound { retry_at, .. } = &mut self.state {
                    *retry_at = Some(next);
                }
                if rebinding {
                    Event::RebindFailed
                } else {
                    Event::RenewFailed
                }
            }
        }
    }

    fn message(&self, message_type: Dhcpv6MessageType, transaction_id: u32) -> Dhcpv6Repr<'_> {
        let mut repr = Dhcpv6Repr {
            message_type,
            transaction_id,
            client_id: Some(&self.duid[..]),
            server_id: None,
            elapsed_time: Some(0),
            request_options: None,
            ia_na: None,
            dns_servers: None,
            status_code: None,
        };
        repr.add_request_option(dhcpv6::field::OPT_DNS_SERVERS);
        repr
    }

    fn information_request<D: Device>(
        &mut self,
        socket: &mut Socket<'_, D>,
        timeout: Duration,
    ) -> Result<Lease, Error> {
        let transaction_id = self.rand.rand_xid();
        let deadline = socket.now() + timeout;
        let duid = self.duid;
        let mut repr = self.message(Dhcpv6MessageType::InformationRequest, transaction_id);

        let dns_servers = exchange(
            socket,
            &self.retry_config,
            &mut repr,
            deadline,
            |ip_repr, reply| {
                if !is_reply_for(reply, &duid, ip_repr) {
                    return None;
                }
                if let Some(code) = failure_status(reply) {
                    return Some(Err(Error::DhcpServerFailureStatus(code)));
                }
                Some(Ok(dns_servers(reply)))
            },
        )?;

        Ok(Lease {
            stateful: false,
            address: None,
            dns_servers,
            t1: Duration::MAX,
            t2: Duration::MAX,
            preferred_lifetime: Duration::MAX,
            valid_lifetime: Duration::MAX,
            acquired_at: socket.now(),
            server: None,
        })
    }

    fn solicit<D: Device>(
        &mut self,
        socket: &mut Socket<'_, D>,
        timeout: Duration,
    ) -> Result<(ServerInfo, Binding), Error> {
        let transaction_id = self.rand.rand_xid();
        let deadline = socket.now() + timeout;
        let duid = self.duid;
        let iaid = self.iaid;
        let max_lease_duration = self.retry_config.max_lease_duration;

        let mut repr = self.message(Dhcpv6MessageType::Solicit, transaction_id);
        repr.ia_na = Some(Dhcpv6ReprIaNa {
            iaid,
            t1: 0,
            t2: 0,
            addresses: Vec::new(),
            status_code: None,
        });

        exchange(
            socket,
            &self.retry_config,
            &mut repr,
            deadline,
            |ip_repr, advert| {
                if advert.message_type != Dhcpv6MessageType::Advertise
                    || advert.client_id != Some(&duid[..])
                {
                    return None;
                }
                if let Some(code) = failure_status(advert) {
                    net_debug!("DHCPv6 ignoring advertise with status {}", code);
                    return None;
                }
                let server_id = match advert.server_id {
                    Some(server_id) => server_id,
                    None => {
                        net_debug!("DHCPv6 ignoring advertise because its missing a server identifier");
                        return None;
                    }
                };
                let ia_na = match &advert.ia_na {
                    Some(ia_na) => ia_na,
                    None => {
                        net_debug!("DHCPv6 ignoring advertise because its missing an IA_NA section");
                        return None;
                    }
                };
                let binding = match parse_ia_na(iaid, ia_na, max_lease_duration) {
                    Ok(Some(binding)) => binding,
                    Ok(None) => return None,
                    Err(code) => {
                        net_debug!("DHCPv6 ignoring advertise with IA_NA status {}", code);
                        return None;
                    }
                };
                let mut identifier = Vec::new();
                if identifier.extend_from_slice(server_id).is_err() {
                    net_debug!("DHCPv6 ignoring advertise because its server identifier is too long");
                    return None;
                }

                net_debug!(
                    "DHCPv6 advertise from {}: {}",
                    ip_repr.src_addr,
                    binding.address
                );
                Some(Ok((
                    ServerInfo {
                        address: ip_repr.src_addr,
                        identifier,
                    },
                    binding,
                )))
            },
        )
    }

    fn request<D: Device>(
        &mut self,
        socket: &mut Socket<'_, D>,
        server: ServerInfo,
        offer: Binding,
    ) -> Result<Lease, Error> {
        let transaction_id = self.rand.rand_xid();
        let deadline = socket.now() + self.response_timeout;
        let duid = self.duid;
        let iaid = self.iaid;
        let max_lease_duration = self.retry_config.max_lease_duration;

        let mut repr = self.message(Dhcpv6MessageType::Request, transaction_id);
        repr.server_id = Some(&server.identifier[..]);
        repr.ia_na = Some(ia_na_for(iaid, offer.address));

        let (binding, dns_servers) = exchange(
            socket,
            &self.retry_config,
            &mut repr,
            deadline,
            |ip_repr, reply| {
                if !is_reply_for(reply, &duid, ip_repr)
                    || reply.server_id != Some(&server.identifier[..])
                {
                    return None;
                }
                parse_reply(iaid, reply, max_lease_duration)
            },
        )?;

        Ok(lease_from(
            binding,
            dns_servers,
            socket.now(),
            Some(server.clone()),
        ))
    }

    /// Send a Renew (with `server`) or Rebind (without) for `address`.
    fn extend<D: Device>(
        &mut self,
        socket: &mut Socket<'_, D>,
        message_type: Dhcpv6MessageType,
        address: Ipv6Address,
        server: Option<ServerInfo>,
        boundary: Option<Instant>,
    ) -> Result<Lease, Error> {
        let transaction_id = self.rand.rand_xid();
        let mut deadline = socket.now() + self.response_timeout;
        if let Some(boundary) = boundary {
            deadline = deadline.min(boundary);
        }
        let duid = self.duid;
        let iaid = self.iaid;
        let max_lease_duration = self.retry_config.max_lease_duration;

        let mut repr = self.message(message_type, transaction_id);
        repr.server_id = server.as_ref().map(|s| &s.identifier[..]);
        repr.ia_na = Some(ia_na_for(iaid, address));

        let (binding, dns_servers, new_server) = exchange(
            socket,
            &self.retry_config,
            &mut repr,
            deadline,
            |ip_repr, reply| {
                if !is_reply_for(reply, &duid, ip_repr) {
                    return None;
                }
                let server_id = reply.server_id?;
                if let Some(server) = &server {
                    if server_id != &server.identifier[..] {
                        return None;
                    }
                }
                let mut identifier = Vec::new();
                identifier.extend_from_slice(server_id).ok()?;
                let new_server = ServerInfo {
                    address: ip_repr.src_addr,
                    identifier,
                };
                parse_reply(iaid, reply, max_lease_duration).map(|result| {
                    result.map(|(binding, dns_servers)| (binding, dns_servers, new_server))
                })
            },
        )?;

        Ok(lease_from(
            binding,
            dns_servers,
            socket.now(),
            Some(new_server),
        ))
    }
}

/// Send `repr` and retransmit it until `accept` takes a response with the
/// same transaction id, the retry budget is spent, or `deadline` passes.
fn exchange<D, R, F>(
    socket: &mut Socket<'_, D>,
    retry_config: &RetryConfig,
    repr: &mut Dhcpv6Repr<'_>,
    deadline: Instant,
    mut accept: F,
) -> Result<R, Error>
where
    D: Device,
    F: FnMut(&Ipv6Repr, &Dhcpv6Repr<'_>) -> Option<Result<R, Error>>,
{
    let src_addr = socket.link_local_addr();
    let transaction_id = repr.transaction_id;
    let started_at = socket.now();
    let mut retry: u16 = 0;

    loop {
        let now = socket.now();
        if now >= deadline {
            net_debug!("DHCPv6 {} timed out", repr.message_type);
            return Err(Error::NoDhcpResponse);
        }

        repr.elapsed_time = Some(elapsed_time(now - started_at));
        net_debug!(
            "DHCPv6 send {} xid={:06x} attempt {}",
            repr.message_type,
            transaction_id,
            retry + 1
        );
        socket.send_dhcpv6(src_addr, repr)?;

        // Exponential backoff: Double every 2 retries, up to a maximum of 8 times.
        let timeout = retry_config.initial_request_timeout << (retry.min(16) as u32 / 2);
        let wait_until = deadline.min(now + timeout);

        let received = socket.recv_until(wait_until, |packet| match packet {
            Packet::Dhcpv6(ip_repr, dhcp_repr) => {
                if dhcp_repr.transaction_id != transaction_id {
                    return None;
                }
                net_debug!(
                    "DHCPv6 recv {} from {}",
                    dhcp_repr.message_type,
                    ip_repr.src_addr
                );
                accept(&ip_repr, &dhcp_repr)
            }
            _ => None,
        });
        if let Some(result) = received {
            return result;
        }

        if retry >= retry_config.request_retries {
            net_debug!("DHCPv6 {} retries exceeded", repr.message_type);
            return Err(Error::NoDhcpResponse);
        }
        retry += 1;
    }
}

/// Elapsed time option value, in hundredths of a second.
fn elapsed_time(elapsed: Duration) -> u16 {
    (elapsed.total_millis() / 10).min(0xffff) as u16
}

fn lifetime(secs: u32) -> Duration {
    if secs == INFINITY {
        Duration::MAX
    } else {
        Duration::from_secs(secs as u64)
    }
}

fn is_reply_for(reply: &Dhcpv6Repr, duid: &[u8], ip_repr: &Ipv6Repr) -> bool {
    if reply.message_type != Dhcpv6MessageType::Reply {
        return false;
    }
    if reply.client_id != Some(duid) {
        net_debug!(
            "DHCPv6 ignoring reply from {}: client identifier does not match",
            ip_repr.src_addr
        );
        return false;
    }
    true
}

fn failure_status(repr: &Dhcpv6Repr) -> Option<StatusCode> {
    match repr.status_code {
        Some(status) if status.status_code != StatusCode::Success => {
            net_debug!("DHCPv6 status {}", status);
            Some(status.status_code)
        }
        _ => None,
    }
}

fn dns_servers(repr: &Dhcpv6Repr) -> Vec<Ipv6Address, DHCP_MAX_DNS_SERVER_COUNT> {
    let mut dns_servers = Vec::new();
    repr.dns_servers
        .iter()
        .flat_map(|s| s.addresses.iter())
        .filter(|s| s.is_unicast())
        .for_each(|a| {
            dns_servers.push(*a).ok();
        });
    dns_servers
}

fn ia_na_for(iaid: u32, address: Ipv6Address) -> Dhcpv6ReprIaNa<'static> {
    let mut addresses = Vec::new();
    addresses
        .push(Dhcpv6ReprIaAddr {
            addr: address,
            preferred_lifetime: 0,
            valid_lifetime: 0,
            status_code: None,
        })
        .ok();
    Dhcpv6ReprIaNa {
        iaid,
        t1: 0,
        t2: 0,
        addresses,
        status_code: None,
    }
}

/// Pick the usable address of an IA_NA and resolve its timers.
///
/// Returns `Ok(None)` for an IA that has to be discarded, and the status
/// code of an IA the server refused.
fn parse_ia_na(
    iaid: u32,
    ia_na: &Dhcpv6ReprIaNa,
    max_lease_duration: Option<Duration>,
) -> Result<Option<Binding>, StatusCode> {
    if ia_na.iaid != iaid {
        net_debug!("DHCPv6 ignoring IA_NA {:08x}: not ours", ia_na.iaid);
        return Ok(None);
    }
    if let Some(status) = ia_na.status_code {
        if status.status_code != StatusCode::Success {
            return Err(status.status_code);
        }
    }
    if ia_na.t1 != 0 && ia_na.t2 != 0 && ia_na.t1 > ia_na.t2 {
        net_debug!("DHCPv6 ignoring IA_NA: T1 {} > T2 {}", ia_na.t1, ia_na.t2);
        return Ok(None);
    }

    let addr = ia_na.addresses.iter().find(|a| {
        a.valid_lifetime != 0
            && a.preferred_lifetime <= a.valid_lifetime
            && a.status_code
                .map_or(true, |s| s.status_code == StatusCode::Success)
    });
    let addr = match addr {
        Some(addr) => addr,
        None => {
            net_debug!("DHCPv6 ignoring IA_NA: no usable address");
            return Ok(None);
        }
    };

    let mut valid_lifetime = lifetime(addr.valid_lifetime);
    let mut preferred_lifetime = lifetime(addr.preferred_lifetime);
    if let Some(max_lease_duration) = max_lease_duration {
        valid_lifetime = valid_lifetime.min(max_lease_duration);
        preferred_lifetime = preferred_lifetime.min(valid_lifetime);
    }

    // Zero leaves T1 and T2 to the client: 0.5 and 0.8 times the preferred lifetime.
    let t1 = match ia_na.t1 {
        0 if preferred_lifetime == Duration::MAX => Duration::MAX,
        0 => preferred_lifetime / 2,
        t1 => lifetime(t1),
    };
    let t2 = match ia_na.t2 {
        0 if preferred_lifetime == Duration::MAX => Duration::MAX,
        0 => preferred_lifetime * 4 / 5,
        t2 => lifetime(t2),
    };
    let t2 = t2.min(valid_lifetime);
    let t1 = t1.min(t2);

    Ok(Some(Binding {
        address: addr.addr,
        t1,
        t2,
        preferred_lifetime,
        valid_lifetime,
    }))
}

/// Evaluate a Reply to Request, Renew or Rebind. `None` means keep waiting.
fn parse_reply(
    iaid: u32,
    reply: &Dhcpv6Repr,
    max_lease_duration: Option<Duration>,
) -> Option<Result<(Binding, Vec<Ipv6Address, DHCP_MAX_DNS_SERVER_COUNT>), Error>> {
    if let Some(code) = failure_status(reply) {
        return Some(Err(Error::DhcpServerFailureStatus(code)));
    }
    let ia_na = match &reply.ia_na {
        Some(ia_na) => ia_na,
        None => {
            net_debug!("DHCPv6 ignoring reply because its missing an IA_NA section");
            return None;
        }
    };
    match parse_ia_na(iaid, ia_na, max_lease_duration) {
        Ok(Some(binding)) => Some(Ok((binding, dns_servers(reply)))),
        Ok(None) => None,
        Err(code) => Some(Err(Error::DhcpServerFailureStatus(code))),
    }
}

fn lease_from(
    binding: Binding,
    dns_servers: Vec<Ipv6Address, DHCP_MAX_DNS_SERVER_COUNT>,
    acquired_at: Instant,
    server: Option<ServerInfo>,
) -> Lease {
    Lease {
        stateful: true,
        address: Some(binding.address),
        dns_servers,
        t1: binding.t1,
        t2: binding.t2,
        preferred_lifetime: binding.preferred_lifetime,
        valid_lifetime: binding.valid_lifetime,
        acquired_at,
        server,
    }
}
