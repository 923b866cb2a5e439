//! Router Solicitation driven stateless address autoconfiguration.
//!
//! The engine solicits a router, derives a global address from the first
//! autoconfigurable /64 prefix it advertises, runs DAD on that address, and then
//! reads the managed/other flags to decide whether DHCPv6 has to follow.

use super::{dad, Packet, Socket};
use crate::iface::{Config, Error};
use crate::phy::Device;
use crate::time::Duration;
use crate::wire::{
    Ipv6Address, Ipv6InterfaceId, NdiscPrefixInfoFlags, NdiscPrefixInformation, NdiscRepr,
    NdiscRouterFlags,
};

/// What a router advertisement told us.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RouterInfo {
    /// Link-local source of the advertisement.
    pub router: Ipv6Address,
    pub router_lifetime: Duration,
    pub flags: NdiscRouterFlags,
    /// The prefix the interface lives on, if any was advertised on-link.
    pub prefix: Option<NdiscPrefixInformation>,
    /// Address derived from `prefix` and the interface identifier. Only
    /// present for an autoconfigurable prefix.
    pub global_addr: Option<Ipv6Address>,
    /// First recursive DNS server advertised.
    pub dns_server: Option<Ipv6Address>,
    pub mtu: Option<u32>,
}

impl RouterInfo {
    fn from_advert(router: Ipv6Address, repr: NdiscRepr, iid: Ipv6InterfaceId) -> Option<Self> {
        let NdiscRepr::RouterAdvert {
            flags,
            router_lifetime,
            mtu,
            prefix_info,
            rdnss,
            ..
        } = repr
        else {
            return None;
        };

        let autoconf = prefix_info.iter().find(|p| p.is_autoconfigurable()).copied();
        let prefix = autoconf.or_else(|| {
            prefix_info
                .iter()
                .find(|p| {
                    p.flags.contains(NdiscPrefixInfoFlags::ON_LINK)
                        && !p.prefix.is_link_local()
                        && !p.prefix.is_multicast()
                })
                .copied()
        });
        let global_addr = autoconf.map(|p| Ipv6Address::from_prefix(&p.prefix, iid));
        let dns_server = rdnss
            .filter(|r| r.lifetime != Duration::ZERO)
            .and_then(|r| r.servers.first().copied());

        Some(RouterInfo {
            router,
            router_lifetime,
            flags,
            prefix,
            global_addr,
            dns_server,
            mtu,
        })
    }

    /// The default router, if the advertisement offered to be one.
    pub fn gateway(&self) -> Option<Ipv6Address> {
        if self.router_lifetime == Duration::ZERO {
            None
        } else {
            Some(self.router)
        }
    }

    /// Netmask of the advertised on-link prefix.
    pub fn subnet_mask(&self) -> Option<Ipv6Address> {
        self.prefix.map(|p| Ipv6Address::mask(p.prefix_len))
    }
}

/// How far stateless autoconfiguration got, and what has to run next.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum AddressAutoConfigResult {
    /// The router advertisement alone configured the interface.
    Complete(RouterInfo),
    /// DNS and other options have to come from a DHCPv6 Information-Request.
    NeedStatelessDhcp(RouterInfo),
    /// DHCPv6 has to grant the address too.
    NeedStatefulDhcp(RouterInfo),
    Failed(Error),
}

impl AddressAutoConfigResult {
    /// Classify a router advertisement by its managed and other flags.
    pub fn from_router(info: RouterInfo) -> Self {
        if info.flags.contains(NdiscRouterFlags::MANAGED) {
            AddressAutoConfigResult::NeedStatefulDhcp(info)
        } else if info.flags.contains(NdiscRouterFlags::OTHER) {
            AddressAutoConfigResult::NeedStatelessDhcp(info)
        } else {
            AddressAutoConfigResult::Complete(info)
        }
    }
}

/// Run DAD on the link-local address, then solicit a router.
///
/// `on_link_local` runs once the link-local address passed DAD, before the
/// first solicitation goes out.
pub fn autoconfigure<D, F>(
    socket: &mut Socket<'_, D>,
    config: &Config,
    on_link_local: F,
) -> AddressAutoConfigResult
where
    D: Device,
    F: FnOnce(Ipv6Address),
{
    let link_local = socket.link_local_addr();
    match dad::detect(socket, link_local, config.dad_timeout) {
        Ok(dad::Outcome::Unique) => {
            on_link_local(link_local);
            solicit(socket, config)
        }
        Ok(dad::Outcome::Duplicate) => AddressAutoConfigResult::Failed(Error::DuplicateAddress),
        Err(e) => AddressAutoConfigResult::Failed(e),
    }
}

/// Solicit a router from the (already verified) link-local address.
///
/// Sends at most `router_solicit_retries` solicitations, each followed by a
/// wait of `router_solicit_timeout`.
pub fn solicit<D: Device>(socket: &mut Socket<'_, D>, config: &Config) -> AddressAutoConfigResult {
    let link_local = socket.link_local_addr();
    let iid = Ipv6InterfaceId::from_ethernet(socket.hardware_addr());
    let solicitation = NdiscRepr::RouterSolicit {
        lladdr: Some(socket.hardware_addr()),
    };
    let attempts = config.router_solicit_retries.max(1);

    let mut advert = None;
    for attempt in 1..=attempts {
        net_debug!("SLAAC: router solicitation {}/{}", attempt, attempts);
        if let Err(e) = socket.send_ndisc(
            link_local,
            Ipv6Address::LINK_LOCAL_ALL_ROUTERS,
            &solicitation,
        ) {
            return AddressAutoConfigResult::Failed(e);
        }

        let deadline = socket.now() + config.router_solicit_timeout;
        advert = socket.recv_until(deadline, |packet| match packet {
            Packet::Ndisc(ip_repr, repr @ NdiscRepr::RouterAdvert { .. }) => {
                if !ip_repr.src_addr.is_link_local() {
                    net_debug!(
                        "SLAAC: ignoring advertisement from non link-local {}",
                        ip_repr.src_addr
                    );
                    return None;
                }
                RouterInfo::from_advert(ip_repr.src_addr, repr, iid)
            }
            _ => None,
        });
        if advert.is_some() {
            break;
        }
    }

    let info = match advert {
        Some(info) => info,
        None => {
            net_debug!("SLAAC: no router answered");
            return AddressAutoConfigResult::Failed(Error::NoRouterResponse);
        }
    };
    net_debug!(
        "SLAAC: advertisement from {} flags={:?} prefix={:?}",
        info.router,
        info.flags,
        info.prefix.map(|p| p.prefix)
    );

    if let Some(global_addr) = info.global_addr {
        match dad::detect(socket, global_addr, config.dad_timeout) {
            Ok(dad::Outcome::Unique) => (),
            Ok(dad::Outcome::Duplicate) => {
                return AddressAutoConfigResult::Failed(Error::DuplicateAddress)
            }
            Err(e) => return AddressAutoConfigResult::Failed(e),
        }
    }

    AddressAutoConfigResult::from_router(info)
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::tests::{frames, MockDevice, Network, GLOBAL, MAC};

    fn run(network: Network) -> (AddressAutoConfigResult, MockDevice) {
        let mut device = MockDevice::with_network(network);
        let result = {
            let mut socket = Socket::new(&mut device, MAC);
            autoconfigure(&mut socket, &Config::default(), |_| ())
        };
        (result, device)
    }

    fn router_info(flags: NdiscRouterFlags) -> RouterInfo {
        let (result, _) = run(Network::with_router(frames::advert(flags)));
        match result {
            AddressAutoConfigResult::Complete(info)
            | AddressAutoConfigResult::NeedStatelessDhcp(info)
            | AddressAutoConfigResult::NeedStatefulDhcp(info) => info,
            AddressAutoConfigResult::Failed(e) => panic!("failed: {e}"),
        }
    }

    #[test]
    fn test_flag_table() {
        let cases = [
            (NdiscRouterFlags::empty(), "complete"),
            (NdiscRouterFlags::OTHER, "stateless"),
            (NdiscRouterFlags::MANAGED, "stateful"),
            (NdiscRouterFlags::MANAGED | NdiscRouterFlags::OTHER, "stateful"),
        ];
        for (flags, expected) in cases {
            let (result, _) = run(Network::with_router(frames::advert(flags)));
            let kind = match result {
                AddressAutoConfigResult::Complete(_) => "complete",
                AddressAutoConfigResult::NeedStatelessDhcp(_) => "stateless",
                AddressAutoConfigResult::NeedStatefulDhcp(_) => "stateful",
                AddressAutoConfigResult::Failed(_) => "failed",
            };
            assert_eq!(kind, expected, "flags {flags:?}");
        }
    }

    #[test]
    fn test_global_address_derived() {
        let info = router_info(NdiscRouterFlags::empty());
        assert_eq!(info.router, frames::ROUTER_LL);
        assert_eq!(info.global_addr, Some(GLOBAL));
        assert_eq!(info.gateway(), Some(frames::ROUTER_LL));
        assert_eq!(
            info.subnet_mask(),
            Some(Ipv6Address::new(0xffff, 0xffff, 0xffff, 0xffff, 0, 0, 0, 0))
        );
        assert_eq!(info.dns_server, Some(frames::RDNSS));
    }

    #[test]
    fn test_on_link_only_prefix() {
        let mut advert = frames::advert(NdiscRouterFlags::empty());
        if let NdiscRepr::RouterAdvert { prefix_info, .. } = &mut advert {
            prefix_info[0].flags = NdiscPrefixInfoFlags::ON_LINK;
        }
        let (result, device) = run(Network::with_router(advert));
        let info = match result {
            AddressAutoConfigResult::Complete(info) => info,
            other => panic!("unexpected {other:?}"),
        };
        assert_eq!(info.global_addr, None);
        assert!(info.prefix.is_some());
        // link-local DAD, one solicitation, no global DAD
        assert_eq!(device.sent().len(), 2);
    }

    #[test]
    fn test_zero_router_lifetime_no_gateway() {
        let mut advert = frames::advert(NdiscRouterFlags::empty());
        if let NdiscRepr::RouterAdvert {
            router_lifetime, ..
        } = &mut advert
        {
            *router_lifetime = Duration::ZERO;
        }
        let (result, _) = run(Network::with_router(advert));
        match result {
            AddressAutoConfigResult::Complete(info) => assert_eq!(info.gateway(), None),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_no_router() {
        let (result, device) = run(Network::default());
        assert_eq!(
            result,
            AddressAutoConfigResult::Failed(Error::NoRouterResponse)
        );
        let solicitations = device
            .sent()
            .iter()
            .filter(|f| {
                matches!(
                    frames::parse_ndisc(f),
                    Some((_, NdiscRepr::RouterSolicit { .. }))
                )
            })
            .count();
        assert_eq!(solicitations, 3);
        // 1s DAD wait plus three 4s solicitation intervals
        assert_eq!(device.now(), crate::time::Instant::from_secs(13));
    }

    #[test]
    fn test_duplicate_link_local() {
        let mut network = Network::with_router(frames::advert(NdiscRouterFlags::empty()));
        network.defended.push(crate::tests::LINK_LOCAL);
        let (result, device) = run(network);
        assert_eq!(result, AddressAutoConfigResult::Failed(Error::DuplicateAddress));
        assert_eq!(device.sent().len(), 1);
    }

    #[test]
    fn test_duplicate_global() {
        let mut network = Network::with_router(frames::advert(NdiscRouterFlags::empty()));
        network.defended.push(GLOBAL);
        let (result, _) = run(network);
        assert_eq!(result, AddressAutoConfigResult::Failed(Error::DuplicateAddress));
    }

    #[test]
    fn test_late_router() {
        let mut network = Network::with_router(frames::advert(NdiscRouterFlags::OTHER));
        network.ignore_solicits = 2;
        let (result, device) = run(network);
        assert!(matches!(
            result,
            AddressAutoConfigResult::NeedStatelessDhcp(_)
        ));
        // link-local DAD, three solicitations, global DAD
        assert_eq!(device.sent().len(), 5);
    }

    fn advert_with_prefix(prefix: Ipv6Address) -> NdiscRepr {
        let mut advert = frames::advert(NdiscRouterFlags::empty());
        if let NdiscRepr::RouterAdvert { prefix_info, .. } = &mut advert {
            prefix_info[0].prefix = prefix;
        }
        advert
    }

    #[test]
    fn test_multicast_prefix_ignored() {
        let prefix = Ipv6Address::new(0xff02, 0, 0, 0, 0, 0, 0, 0);
        let (result, device) = run(Network::with_router(advert_with_prefix(prefix)));
        let info = match result {
            AddressAutoConfigResult::Complete(info) => info,
            other => panic!("unexpected {other:?}"),
        };
        assert_eq!(info.global_addr, None);
        assert_eq!(info.prefix, None);
        assert_eq!(info.subnet_mask(), None);
        assert_eq!(device.sent().len(), 2);
    }

    #[test]
    fn test_link_local_prefix_ignored() {
        let prefix = Ipv6Address::new(0xfe80, 0, 0, 0, 0, 0, 0, 0);
        let (result, _) = run(Network::with_router(advert_with_prefix(prefix)));
        let info = match result {
            AddressAutoConfigResult::Complete(info) => info,
            other => panic!("unexpected {other:?}"),
        };
        assert_eq!(info.global_addr, None);
        assert_eq!(info.prefix, None);
    }

    #[test]
    fn test_link_local_hook() {
        let mut device =
            MockDevice::with_network(Network::with_router(frames::advert(NdiscRouterFlags::empty())));
        let mut committed = None;
        let result = {
            let mut socket = Socket::new(&mut device, MAC);
            autoconfigure(&mut socket, &Config::default(), |addr| committed = Some(addr))
        };
        assert!(matches!(result, AddressAutoConfigResult::Complete(_)));
        assert_eq!(committed, Some(crate::tests::LINK_LOCAL));

        let mut network = Network::with_router(frames::advert(NdiscRouterFlags::empty()));
        network.defended.push(crate::tests::LINK_LOCAL);
        let mut device = MockDevice::with_network(network);
        let mut committed = None;
        let result = {
            let mut socket = Socket::new(&mut device, MAC);
            autoconfigure(&mut socket, &Config::default(), |addr| committed = Some(addr))
        };
        assert_eq!(result, AddressAutoConfigResult::Failed(Error::DuplicateAddress));
        assert_eq!(committed, None);
    }
}
