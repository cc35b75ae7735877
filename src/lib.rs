//! A library for controlling the Logitech Z906 5.1 amplifier over its
//! console serial port.
//!
//! The amplifier speaks a small binary protocol on a half-duplex UART
//! (57600 baud, 8O1): single-byte commands, checksummed status frames that are
//! read and written back to change registers, and a temperature probe.
//!
//! This crate provides two ways to drive it:
//!
//! 1.  **[`client::Z906`]**: the blocking driver. It owns the serial link, the
//!     last validated status snapshot and the flags derived from issued
//!     commands.
//! 2.  **[`safe_client::SafeClient`]**: a cloneable, thread-safe handle that
//!     serializes all access to one driver. Use this when several consumers
//!     (e.g. request handlers) share one amplifier.
//!
//! ## Features
//!
//! - **Protocol Implementation**: Opcodes, status and temperature frame
//!   codecs and the LRC checksum in [`protocol`].
//! - **Bounded Waits**: Every request fails with [`Error::Timeout`] instead of
//!   blocking forever.
//! - **Stable Snapshot**: A failed poll never alters the last good status.
//! - **Strongly-Typed API**: [`protocol::Input`], [`protocol::Effect`],
//!   [`protocol::Channel`] and [`protocol::Field`] instead of magic numbers.
//!
//! ## Quick Start
//!
//! ```no_run
//! use z906_lib::{client::Config, protocol::Field};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut amp = z906_lib::serial::open("/dev/ttyUSB0", Config::default())?;
//!     let version = amp.read_field(Field::Version)?;
//!     println!("Firmware version: {version}");
//!     Ok(())
//! }
//! ```

pub mod client;
pub mod error;
pub mod protocol;
pub mod report;
pub mod safe_client;
pub mod transport;

#[cfg_attr(docsrs, doc(cfg(feature = "serial")))]
#[cfg(feature = "serial")]
pub mod serial;

pub use error::{Error, Result};
