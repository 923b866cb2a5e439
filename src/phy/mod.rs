/*! Access to the raw frame channel.

The `phy` module describes the single hardware socket the protocol engines
talk through. An implementation only moves whole Ethernet II frames; every
header is built and parsed by this crate.

# Examples

A [Device] backed by a chip in MACRAW mode could look like this:

```rust,ignore
use autoconf6::phy::{Device, TxError};
use autoconf6::time::{Duration, Instant};

struct MacRaw { /* ... */ }

impl Device for MacRaw {
    fn transmit(&mut self, frame: &[u8]) -> Result<(), TxError> {
        // copy `frame` into the TX buffer and issue SEND
        Ok(())
    }

    fn receive(&mut self, buffer: &mut [u8], timeout: Duration) -> Option<usize> {
        // poll RX_RSR until data shows up or `timeout` runs out
        None
    }

    fn now(&self) -> Instant {
        Instant::from_micros(0)
    }
}
```
*/

use core::fmt;

use crate::time::{Duration, Instant};

/// Largest Ethernet II frame the engines emit or accept, without FCS.
pub const MAX_FRAME_LEN: usize = 1514;

/// The transport refused a frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TxError;

impl fmt::Display for TxError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "frame transmission failed")
    }
}

#[cfg(feature = "std")]
impl std::error::Error for TxError {}

/// A raw Ethernet frame channel with a monotonic clock.
pub trait Device {
    /// Send one complete Ethernet II frame.
    fn transmit(&mut self, frame: &[u8]) -> Result<(), TxError>;

    /// Wait up to `timeout` for one frame and copy it into `buffer`,
    /// returning its length.
    ///
    /// Returns `None` once `timeout` has elapsed on the [now](Device::now)
    /// clock without a frame. Frames larger than `buffer` are dropped.
    fn receive(&mut self, buffer: &mut [u8], timeout: Duration) -> Option<usize>;

    /// The current time. Must never go backwards.
    fn now(&self) -> Instant;
}

impl<T: Device + ?Sized> Device for &mut T {
    fn transmit(&mut self, frame: &[u8]) -> Result<(), TxError> {
        (**self).transmit(frame)
    }

    fn receive(&mut self, buffer: &mut [u8], timeout: Duration) -> Option<usize> {
        (**self).receive(buffer, timeout)
    }

    fn now(&self) -> Instant {
        (**self).now()
    }
}
