use crate::wire::{EthernetAddress, Ipv4Address, Ipv6Address};

/// Legacy IPv4 registers, kept for dual-stack chips.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Ipv4Register {
    LocalIp,
    SubnetMask,
    Gateway,
}

/// IPv6 address registers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Ipv6Register {
    LinkLocal,
    GlobalUnicast,
    SubnetMask,
    Gateway,
    DnsServer,
}

/// Register access to the network chip.
///
/// Every setter writes a single register; nothing is transactional across
/// registers.
pub trait Chip {
    /// Reset and detect the chip. `false` when it does not respond.
    fn init(&mut self) -> bool;

    /// Chip identity code: 51, 52, 55 or 61 for the W5100, W5200, W5500
    /// and W6100. Anything else means no supported chip.
    fn chip_id(&self) -> u8;

    /// PHY link state, `None` when the chip cannot tell.
    fn link_up(&self) -> Option<bool>;

    fn set_mac_address(&mut self, addr: EthernetAddress);

    fn set_ipv4(&mut self, register: Ipv4Register, addr: Ipv4Address);

    fn set_ipv6(&mut self, register: Ipv6Register, addr: Ipv6Address);

    /// Retransmission timeout in units of 100 us.
    fn set_retransmission_time(&mut self, value: u16);

    fn set_retransmission_count(&mut self, count: u8);

    /// Seed ephemeral source port selection for later sockets.
    fn seed_port_rand(&mut self, seed: u64);
}

impl<T: Chip + ?Sized> Chip for &mut T {
    fn init(&mut self) -> bool {
        (**self).init()
    }

    fn chip_id(&self) -> u8 {
        (**self).chip_id()
    }

    fn link_up(&self) -> Option<bool> {
        (**self).link_up()
    }

    fn set_mac_address(&mut self, addr: EthernetAddress) {
        (**self).set_mac_address(addr)
    }

    fn set_ipv4(&mut self, register: Ipv4Register, addr: Ipv4Address) {
        (**self).set_ipv4(register, addr)
    }

    fn set_ipv6(&mut self, register: Ipv6Register, addr: Ipv6Address) {
        (**self).set_ipv6(register, addr)
    }

    fn set_retransmission_time(&mut self, value: u16) {
        (**self).set_retransmission_time(value)
    }

    fn set_retransmission_count(&mut self, count: u8) {
        (**self).set_retransmission_count(count)
    }

    fn seed_port_rand(&mut self, seed: u64) {
        (**self).seed_port_rand(seed)
    }
}

/// Ethernet cable state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LinkStatus {
    Unknown,
    LinkOn,
    LinkOff,
}

impl From<Option<bool>> for LinkStatus {
    fn from(link_up: Option<bool>) -> Self {
        match link_up {
            Some(true) => LinkStatus::LinkOn,
            Some(false) => LinkStatus::LinkOff,
            None => LinkStatus::Unknown,
        }
    }
}

/// Which chip is fitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum HardwareStatus {
    NoHardware,
    W5100,
    W5200,
    W5500,
    W6100,
}

impl From<u8> for HardwareStatus {
    fn from(chip_id: u8) -> Self {
        match chip_id {
            51 => HardwareStatus::W5100,
            52 => HardwareStatus::W5200,
            55 => HardwareStatus::W5500,
            61 => HardwareStatus::W6100,
            _ => HardwareStatus::NoHardware,
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_hardware_status() {
        assert_eq!(HardwareStatus::from(55), HardwareStatus::W5500);
        assert_eq!(HardwareStatus::from(61), HardwareStatus::W6100);
        assert_eq!(HardwareStatus::from(0), HardwareStatus::NoHardware);
    }

    #[test]
    fn test_link_status() {
        assert_eq!(LinkStatus::from(Some(true)), LinkStatus::LinkOn);
        assert_eq!(LinkStatus::from(Some(false)), LinkStatus::LinkOff);
        assert_eq!(LinkStatus::from(None), LinkStatus::Unknown);
    }
}
