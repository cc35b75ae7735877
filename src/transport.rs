//! Byte-level access to the half-duplex console link.
//!
//! [`SerialIo`] is the minimal set of port operations the driver needs; it is
//! implemented for real serial ports in [`crate::serial`]. [`Transport`] adds
//! the link discipline on top: every transmission is preceded by a flush that
//! waits out the deadtime and drops stale input, and every wait for response
//! bytes is bounded by a timeout measured from the request.
use crate::error::{Error, Result};
use log::trace;
use std::io;
use std::thread;
use std::time::{Duration, Instant};

/// Interval between two checks of the receive buffer while waiting.
const POLL_INTERVAL: Duration = Duration::from_millis(1);

/// Raw byte channel to the amplifier.
pub trait SerialIo {
    /// Sends all bytes and blocks until they are handed to the line.
    fn send(&mut self, bytes: &[u8]) -> io::Result<()>;

    /// Number of received bytes that can be read without blocking.
    fn available(&mut self) -> io::Result<usize>;

    /// Reads exactly `buf.len()` already received bytes.
    fn receive(&mut self, buf: &mut [u8]) -> io::Result<()>;

    /// Drops everything in the receive buffer.
    fn clear_input(&mut self) -> io::Result<()>;
}

/// Serial link with deadtime and bounded waits.
pub struct Transport<P> {
    port: P,
    deadtime: Duration,
}

impl<P: SerialIo> Transport<P> {
    pub fn new(port: P, deadtime: Duration) -> Self {
        Self { port, deadtime }
    }

    pub fn deadtime(&self) -> Duration {
        self.deadtime
    }

    pub fn set_deadtime(&mut self, deadtime: Duration) {
        self.deadtime = deadtime;
    }

    /// Waits out the deadtime, then discards all pending input.
    ///
    /// Any unread answer to an earlier request is lost.
    pub fn flush(&mut self) -> Result<()> {
        thread::sleep(self.deadtime);
        self.port.clear_input()?;
        Ok(())
    }

    /// Flushes, then sends `bytes` verbatim.
    pub fn write(&mut self, bytes: &[u8]) -> Result<()> {
        self.flush()?;
        trace!("tx {bytes:02X?}");
        self.port.send(bytes)?;
        Ok(())
    }

    /// Blocks until at least `count` bytes are buffered.
    ///
    /// Fails with [`Error::Timeout`] once `timeout` has passed since `started`.
    pub fn wait_for(&mut self, count: usize, started: Instant, timeout: Duration) -> Result<()> {
        loop {
            if self.port.available()? >= count {
                return Ok(());
            }
            let waited = started.elapsed();
            if waited >= timeout {
                return Err(Error::Timeout {
                    waited,
                    expected: count,
                });
            }
            thread::sleep(POLL_INTERVAL.min(timeout - waited));
        }
    }

    /// Reads bytes that [`Transport::wait_for`] reported as available.
    pub fn read(&mut self, buf: &mut [u8]) -> Result<()> {
        self.port.receive(buf)?;
        trace!("rx {buf:02X?}");
        Ok(())
    }
}
