/*! Interface bring-up.

The `iface` module commits what the protocol engines learn to the chip
registers. [Ethernet] sequences duplicate address detection, SLAAC and DHCPv6
in [begin](Ethernet::begin), and keeps a stateful lease alive in
[maintain](Ethernet::maintain).
*/

mod chip;
mod ethernet;

use core::fmt;

use crate::socket::dhcpv6::RetryConfig;
use crate::time::Duration;
use crate::wire::Dhcpv6StatusCode;

pub use self::chip::{Chip, HardwareStatus, Ipv4Register, Ipv6Register, LinkStatus};
pub use self::ethernet::{Ethernet, InterfaceConfig, StaticConfig};
pub use crate::socket::dhcpv6::Event as Maintenance;

/// Why bringing up the interface failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error {
    /// The chip did not come out of reset.
    HardwareInitFailure,
    /// Another node uses the link-local or derived global address.
    DuplicateAddress,
    /// No router advertisement after every solicitation.
    NoRouterResponse,
    /// A DHCPv6 exchange ran out of time or retransmissions.
    NoDhcpResponse,
    /// A DHCPv6 server refused with this status.
    DhcpServerFailureStatus(Dhcpv6StatusCode),
    /// The DHCPv6 lease ran past its valid lifetime.
    LeaseExpired,
    /// The transport refused a frame.
    Transmit,
    /// An address that has to be unicast was not.
    InvalidAddress,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::HardwareInitFailure => write!(f, "hardware initialization failed"),
            Error::DuplicateAddress => write!(f, "duplicate address detected"),
            Error::NoRouterResponse => write!(f, "no router advertisement received"),
            Error::NoDhcpResponse => write!(f, "no DHCPv6 response received"),
            Error::DhcpServerFailureStatus(code) => {
                write!(f, "DHCPv6 server failure status: {code}")
            }
            Error::LeaseExpired => write!(f, "DHCPv6 lease expired"),
            Error::Transmit => write!(f, "frame transmission failed"),
            Error::InvalidAddress => write!(f, "address is not unicast"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for Error {}

impl From<crate::phy::TxError> for Error {
    fn from(_: crate::phy::TxError) -> Self {
        Error::Transmit
    }
}

/// Timeouts and retry budgets for every phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Config {
    /// How long to wait for a conflict after a DAD solicitation.
    pub dad_timeout: Duration,
    /// Wait after each router solicitation.
    pub router_solicit_timeout: Duration,
    /// Router solicitations sent before giving up.
    pub router_solicit_retries: u8,
    pub dhcp: RetryConfig,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            dad_timeout: Duration::from_secs(1),
            router_solicit_timeout: Duration::from_secs(4),
            router_solicit_retries: 3,
            dhcp: RetryConfig::default(),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_error_display() {
        assert_eq!(
            Error::DhcpServerFailureStatus(Dhcpv6StatusCode::NoAddrsAvail).to_string(),
            "DHCPv6 server failure status: no-addrs-avail"
        );
        assert_eq!(Error::from(crate::phy::TxError), Error::Transmit);
    }

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.dad_timeout, Duration::from_secs(1));
        assert_eq!(config.router_solicit_retries, 3);
        assert_eq!(config.dhcp.request_retries, 5);
        assert_eq!(config.dhcp.max_lease_duration, None);
    }
}
