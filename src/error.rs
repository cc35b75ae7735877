//! Error type shared by all driver operations.
//!
//! Every failure is reported through [`Result`]; the driver never retries and
//! never leaves a partially updated status snapshot behind.
use crate::protocol as proto;
use std::time::Duration;

/// Represents all possible errors that can occur while talking to the amplifier.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// The expected number of bytes did not arrive within the timeout.
    #[error("Timed out after {waited:?} waiting for {expected} byte(s)")]
    Timeout { waited: Duration, expected: usize },

    /// A response failed the start marker, model, length or checksum check.
    #[error("Invalid frame: {0}")]
    FrameInvalid(#[from] proto::Error),

    /// The amplifier did not answer the firmware version probe.
    #[error("Device unreachable")]
    DeviceUnreachable,

    /// The serial port itself failed (unplugged adapter, permission, ...).
    #[error("Serial transport error: {0}")]
    Transport(#[from] std::io::Error),

    /// A raw field or register offset lies outside the status frame.
    #[error("Offset {offset:#04x} is outside the usable range of a {len} byte status frame")]
    OffsetOutOfRange { offset: u8, len: usize },
}

impl Error {
    pub fn is_timeout(&self) -> bool {
        matches!(self, Error::Timeout { .. })
    }
}

/// The result type for driver operations.
pub type Result<T> = std::result::Result<T, Error>;
