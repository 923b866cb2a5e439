use super::{
    Chip, Config, Error, HardwareStatus, Ipv4Register, Ipv6Register, LinkStatus, Maintenance,
};
use crate::phy::Device;
use crate::socket::dhcpv6::{Client, Lease, Mode};
use crate::socket::slaac::{self, AddressAutoConfigResult, RouterInfo};
use crate::socket::Socket;
use crate::time::Duration;
use crate::wire::{EthernetAddress, Ipv4Address, Ipv6Address};

/// Largest retransmission timeout the chip register holds, in milliseconds.
const MAX_RETRANSMISSION_TIMEOUT_MS: u16 = 6553;

/// Committed interface configuration, as written to the chip.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct InterfaceConfig {
    pub mac_address: EthernetAddress,
    pub local_ip: Ipv4Address,
    pub subnet_mask: Ipv4Address,
    pub gateway_ip: Ipv4Address,
    pub link_local_address: Ipv6Address,
    pub global_unicast_address: Ipv6Address,
    pub subnet_mask6: Ipv6Address,
    pub gateway6: Ipv6Address,
    pub dns_server: Ipv6Address,
}

impl InterfaceConfig {
    /// Apply what a router advertisement provides.
    fn apply_router(&mut self, router: &RouterInfo) {
        self.global_unicast_address = router.global_addr.unwrap_or(Ipv6Address::UNSPECIFIED);
        self.subnet_mask6 = router.subnet_mask().unwrap_or(Ipv6Address::UNSPECIFIED);
        self.gateway6 = router.gateway().unwrap_or(Ipv6Address::UNSPECIFIED);
    }

    /// Drop everything learned past the link-local address.
    fn clear_global(&mut self) {
        self.global_unicast_address = Ipv6Address::UNSPECIFIED;
        self.subnet_mask6 = Ipv6Address::UNSPECIFIED;
        self.gateway6 = Ipv6Address::UNSPECIFIED;
        self.dns_server = Ipv6Address::UNSPECIFIED;
    }
}

/// Manual configuration for [Ethernet::begin_static].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct StaticConfig {
    pub local_ip: Ipv4Address,
    pub subnet_mask: Ipv4Address,
    pub gateway_ip: Ipv4Address,
    pub link_local_address: Ipv6Address,
    pub global_unicast_address: Ipv6Address,
    pub subnet_mask6: Ipv6Address,
    pub gateway6: Ipv6Address,
    pub dns_server: Ipv6Address,
}

/// Write every register of `next`, then publish it as the committed snapshot.
fn commit<C: Chip>(chip: &mut C, current: &mut InterfaceConfig, next: InterfaceConfig) {
    chip.set_mac_address(next.mac_address);
    chip.set_ipv4(Ipv4Register::LocalIp, next.local_ip);
    chip.set_ipv4(Ipv4Register::SubnetMask, next.subnet_mask);
    chip.set_ipv4(Ipv4Register::Gateway, next.gateway_ip);
    chip.set_ipv6(Ipv6Register::LinkLocal, next.link_local_address);
    chip.set_ipv6(Ipv6Register::GlobalUnicast, next.global_unicast_address);
    chip.set_ipv6(Ipv6Register::SubnetMask, next.subnet_mask6);
    chip.set_ipv6(Ipv6Register::Gateway, next.gateway6);
    chip.set_ipv6(Ipv6Register::DnsServer, next.dns_server);
    net_debug!(
        "commit: link-local={} global={} gateway={} dns={}",
        next.link_local_address,
        next.global_unicast_address,
        next.gateway6,
        next.dns_server
    );
    *current = next;
}

/// An Ethernet interface brought up over IPv6.
///
/// Owns the chip registers and the raw frame channel. Nothing happens in the
/// background: [begin](Ethernet::begin) blocks until configuration is done,
/// and [maintain](Ethernet::maintain) has to be polled by the caller.
#[derive(Debug)]
pub struct Ethernet<C: Chip, D: Device> {
    chip: C,
    device: D,
    config: Config,
    iface: InterfaceConfig,
    dhcp: Option<Client>,
}

impl<C: Chip, D: Device> Ethernet<C, D> {
    pub fn new(chip: C, device: D) -> Self {
        Self::with_config(chip, device, Config::default())
    }

    pub fn with_config(chip: C, device: D, config: Config) -> Self {
        Ethernet {
            chip,
            device,
            config,
            iface: InterfaceConfig::default(),
            dhcp: None,
        }
    }

    pub fn chip(&self) -> &C {
        &self.chip
    }

    pub fn chip_mut(&mut self) -> &mut C {
        &mut self.chip
    }

    pub fn device(&self) -> &D {
        &self.device
    }

    pub fn device_mut(&mut self) -> &mut D {
        &mut self.device
    }

    /// Timeouts and retry budgets used by [begin](Ethernet::begin).
    pub fn timeouts(&self) -> Config {
        self.config
    }

    pub fn set_timeouts(&mut self, config: Config) {
        self.config = config;
        if let Some(client) = self.dhcp.as_mut() {
            client.set_retry_config(config.dhcp);
        }
    }

    /// Bring the interface up: run DAD on the link-local address, solicit a
    /// router, and run DHCPv6 when the router asks for it.
    ///
    /// `timeout` bounds the first DHCPv6 phase, `response_timeout` each
    /// later DHCPv6 exchange. On failure the committed configuration keeps
    /// whatever earlier phases already wrote.
    pub fn begin(
        &mut self,
        mac: EthernetAddress,
        timeout: Duration,
        response_timeout: Duration,
    ) -> Result<InterfaceConfig, Error> {
        self.dhcp = None;
        if !self.chip.init() {
            net_info!("chip did not respond");
            return Err(Error::HardwareInitFailure);
        }
        self.chip.set_mac_address(mac);

        let config = self.config;
        let mut socket = Socket::new(&mut self.device, mac);

        let mut next = InterfaceConfig {
            mac_address: mac,
            ..InterfaceConfig::default()
        };
        let chip = &mut self.chip;
        let iface = &mut self.iface;
        let result = slaac::autoconfigure(&mut socket, &config, |link_local| {
            next.link_local_address = link_local;
            commit(chip, iface, next);
        });

        let (mode, router) = match result {
            AddressAutoConfigResult::Complete(router) => {
                next.apply_router(&router);
                next.dns_server = router.dns_server.unwrap_or(Ipv6Address::UNSPECIFIED);
                commit(&mut self.chip, &mut self.iface, next);
                net_info!("configured by SLAAC: {}", next.global_unicast_address);
                return Ok(self.iface);
            }
            AddressAutoConfigResult::NeedStatelessDhcp(router) => {
                next.apply_router(&router);
                commit(&mut self.chip, &mut self.iface, next);
                (Mode::Stateless, router)
            }
            AddressAutoConfigResult::NeedStatefulDhcp(router) => (Mode::Stateful, router),
            AddressAutoConfigResult::Failed(e) => {
                net_info!("SLAAC failed: {}", e);
                return Err(e);
            }
        };

        let seed = socket.now().total_micros() as u64;
        let mut client = Client::new(mac, config.dhcp, seed);
        let lease = match client.negotiate(&mut socket, mode, timeout, response_timeout) {
            Ok(lease) => lease,
            Err(e) => {
                net_info!("DHCPv6 {:?} failed: {}", mode, e);
                return Err(e);
            }
        };

        match mode {
            Mode::Stateless => {
                if let Some(dns_server) = lease.dns_server() {
                    next.dns_server = dns_server;
                }
            }
            Mode::Stateful => {
                next.global_unicast_address = lease.address.unwrap_or(Ipv6Address::UNSPECIFIED);
                next.subnet_mask6 = router
                    .subnet_mask()
                    .unwrap_or_else(|| Ipv6Address::mask(64));
                next.gateway6 = router.gateway().unwrap_or(Ipv6Address::UNSPECIFIED);
                next.dns_server = lease
                    .dns_server()
                    .or(router.dns_server)
                    .unwrap_or(Ipv6Address::UNSPECIFIED);
                self.chip
                    .seed_port_rand(socket.now().total_micros() as u64);
            }
        }
        commit(&mut self.chip, &mut self.iface, next);
        net_info!(
            "configured by DHCPv6 ({:?}): {}",
            mode,
            next.global_unicast_address
        );

        self.dhcp = Some(client);
        Ok(self.iface)
    }

    /// Configure every field by hand, without any traffic.
    pub fn begin_static(
        &mut self,
        mac: EthernetAddress,
        config: StaticConfig,
    ) -> Result<InterfaceConfig, Error> {
        self.dhcp = None;
        if !self.chip.init() {
            net_info!("chip did not respond");
            return Err(Error::HardwareInitFailure);
        }
        let next = InterfaceConfig {
            mac_address: mac,
            local_ip: config.local_ip,
            subnet_mask: config.subnet_mask,
            gateway_ip: config.gateway_ip,
            link_local_address: config.link_local_address,
            global_unicast_address: config.global_unicast_address,
            subnet_mask6: config.subnet_mask6,
            gateway6: config.gateway6,
            dns_server: config.dns_server,
        };
        commit(&mut self.chip, &mut self.iface, next);
        Ok(self.iface)
    }

    /// Renew or rebind a stateful lease when its timers are due.
    ///
    /// Returns [Maintenance::NoAction] right away when nothing is due, and
    /// always for SLAAC-only and stateless configurations. After
    /// [Maintenance::Expired] the global configuration is cleared and
    /// [begin](Ethernet::begin) has to run again.
    pub fn maintain(&mut self) -> Maintenance {
        let client = match self.dhcp.as_mut() {
            Some(client) => client,
            None => return Maintenance::NoAction,
        };
        let mut socket = Socket::new(&mut self.device, self.iface.mac_address);
        let event = client.maintain(&mut socket);

        match event {
            Maintenance::RenewedOk | Maintenance::RebindOk => {
                let mut next = self.iface;
                if let Some(lease) = client.lease() {
                    if let Some(address) = lease.address {
                        next.global_unicast_address = address;
                    }
                    if let Some(dns_server) = lease.dns_server() {
                        next.dns_server = dns_server;
                    }
                }
                if next != self.iface {
                    commit(&mut self.chip, &mut self.iface, next);
                }
            }
            Maintenance::Expired => {
                let mut next = self.iface;
                next.clear_global();
                commit(&mut self.chip, &mut self.iface, next);
                self.dhcp = None;
            }
            Maintenance::NoAction | Maintenance::RenewFailed | Maintenance::RebindFailed => (),
        }
        event
    }

    /// The committed configuration snapshot.
    pub fn config(&self) -> InterfaceConfig {
        self.iface
    }

    /// The DHCPv6 lease, when the last [begin](Ethernet::begin) ran DHCPv6.
    pub fn lease(&self) -> Option<&Lease> {
        self.dhcp.as_ref().and_then(|client| client.lease())
    }

    pub fn mac_address(&self) -> EthernetAddress {
        self.iface.mac_address
    }

    pub fn local_ip(&self) -> Ipv4Address {
        self.iface.local_ip
    }

    pub fn subnet_mask(&self) -> Ipv4Address {
        self.iface.subnet_mask
    }

    pub fn gateway_ip(&self) -> Ipv4Address {
        self.iface.gateway_ip
    }

    pub fn link_local_address(&self) -> Ipv6Address {
        self.iface.link_local_address
    }

    pub fn global_unicast_address(&self) -> Ipv6Address {
        self.iface.global_unicast_address
    }

    pub fn subnet_mask6(&self) -> Ipv6Address {
        self.iface.subnet_mask6
    }

    pub fn gateway6(&self) -> Ipv6Address {
        self.iface.gateway6
    }

    pub fn dns_server_ip(&self) -> Ipv6Address {
        self.iface.dns_server
    }

    pub fn set_mac_address(&mut self, addr: EthernetAddress) {
        self.chip.set_mac_address(addr);
        self.iface.mac_address = addr;
    }

    pub fn set_local_ip(&mut self, addr: Ipv4Address) {
        self.chip.set_ipv4(Ipv4Register::LocalIp, addr);
        self.iface.local_ip = addr;
    }

    pub fn set_subnet_mask(&mut self, addr: Ipv4Address) {
        self.chip.set_ipv4(Ipv4Register::SubnetMask, addr);
        self.iface.subnet_mask = addr;
    }

    pub fn set_gateway_ip(&mut self, addr: Ipv4Address) {
        self.chip.set_ipv4(Ipv4Register::Gateway, addr);
        self.iface.gateway_ip = addr;
    }

    pub fn set_link_local_address(&mut self, addr: Ipv6Address) {
        self.chip.set_ipv6(Ipv6Register::LinkLocal, addr);
        self.iface.link_local_address = addr;
    }

    pub fn set_global_unicast_address(&mut self, addr: Ipv6Address) {
        self.chip.set_ipv6(Ipv6Register::GlobalUnicast, addr);
        self.iface.global_unicast_address = addr;
    }

    pub fn set_subnet_mask6(&mut self, addr: Ipv6Address) {
        self.chip.set_ipv6(Ipv6Register::SubnetMask, addr);
        self.iface.subnet_mask6 = addr;
    }

    pub fn set_gateway6(&mut self, addr: Ipv6Address) {
        self.chip.set_ipv6(Ipv6Register::Gateway, addr);
        self.iface.gateway6 = addr;
    }

    pub fn set_dns_server_ip(&mut self, addr: Ipv6Address) {
        self.chip.set_ipv6(Ipv6Register::DnsServer, addr);
        self.iface.dns_server = addr;
    }

    /// Set the chip's TCP retransmission timeout. Values above 6553 ms
    /// are clamped.
    pub fn set_retransmission_timeout(&mut self, millis: u16) {
        let millis = millis.min(MAX_RETRANSMISSION_TIMEOUT_MS);
        self.chip.set_retransmission_time(millis * 10);
    }

    pub fn set_retransmission_count(&mut self, count: u8) {
        self.chip.set_retransmission_count(count);
    }

    pub fn link_status(&self) -> LinkStatus {
        LinkStatus::from(self.chip.link_up())
    }

    pub fn hardware_status(&self) -> HardwareStatus {
        HardwareStatus::from(self.chip.chip_id())
    }
}
