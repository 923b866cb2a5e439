#![cfg_attr(not(any(test, feature = "std")), no_std)]
#![deny(unsafe_code)]

//! The _autoconf6_ library brings up IPv6 on a small Ethernet device that
//! owns a single raw frame channel, such as a hardwired TCP/IP chip in
//! MACRAW mode.
//!
//! # Layers
//!
//! The crate is layered the way a protocol stack is:
//!
//!  * The [wire] module encodes and decodes the frames involved: Ethernet,
//!    IPv6, ICMPv6 neighbor discovery, UDP and DHCPv6.
//!  * The [phy] module defines the [Device](phy::Device) trait, the only way
//!    frames enter and leave, together with the clock every timer reads.
//!  * The [socket] module holds the protocol engines: duplicate address
//!    detection, router solicitation driven SLAAC and the DHCPv6 client.
//!  * The [iface] module sequences the engines and commits their results to
//!    the chip registers through [Ethernet](iface::Ethernet).
//!
//! Everything is blocking and single-threaded: a call returns only when its
//! exchange is finished or its timeout ran out, as measured on the
//! [Device](phy::Device) clock.
//!
//! # Feature flags
//!
//!  * `std` implements `std::error::Error` and conversions to `std::net` types.
//!  * `log` / `defmt` pick the logging backend. Without either, logging
//!    compiles to nothing.
//!  * `verbose` adds a trace line for every frame sent and received.

#[cfg(all(feature = "log", feature = "defmt"))]
compile_error!("You must enable at most one of the following features: defmt, log");

#[macro_use]
mod macros;
mod rand;

pub mod iface;
pub mod phy;
pub mod socket;
pub mod time;
pub mod wire;


pub use self::iface::Error;
