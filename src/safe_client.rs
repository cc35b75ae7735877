//! Thread-safe handle to a [`Z906`] driver.
//!
//! The amplifier accepts one request at a time and the driver keeps shared
//! state (status snapshot, cached flags), so all access goes through a single
//! mutex around the whole driver. Cloning a `SafeClient` shares the driver.
//!
//! ## Example
//!
//! ```no_run
//! use z906_lib::{client::Config, protocol::Channel, safe_client::SafeClient};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let amp = SafeClient::new(z906_lib::serial::open("/dev/ttyUSB0", Config::default())?);
//!
//!     let worker = amp.clone();
//!     std::thread::spawn(move || worker.set_volume(Channel::Main, 100)).join().unwrap()?;
//!
//!     // poll and read the snapshot under one lock
//!     let report = amp.with(|driver| driver.poll().map(|_| driver.status_report()))?;
//!     println!("{report:?}");
//!     Ok(())
//! }
//! ```

use crate::client::Z906;
use crate::error::Result;
use crate::protocol::{Channel, Command, Effect, Field, Input, Register, StatusFrame};
use crate::report::StatusReport;
use crate::transport::SerialIo;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Shared, serialized access to one amplifier.
pub struct SafeClient<P> {
    driver: Arc<Mutex<Z906<P>>>,
}

impl<P> Clone for SafeClient<P> {
    fn clone(&self) -> Self {
        Self {
            driver: Arc::clone(&self.driver),
        }
    }
}

impl<P: SerialIo> SafeClient<P> {
    /// Creates a new `SafeClient` owning `driver`.
    pub fn new(driver: Z906<P>) -> Self {
        Self {
            driver: Arc::new(Mutex::new(driver)),
        }
    }

    /// Creates a new `SafeClient` from an already shared driver.
    pub fn from_shared(driver: Arc<Mutex<Z906<P>>>) -> Self {
        Self { driver }
    }

    /// Clones the shared driver.
    pub fn clone_shared(&self) -> Arc<Mutex<Z906<P>>> {
        self.driver.clone()
    }

    fn lock(&self) -> MutexGuard<'_, Z906<P>> {
        // the snapshot is only ever replaced whole, so a poisoned driver is
        // still consistent
        self.driver.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Runs `f` with exclusive access, e.g. for poll-then-read sequences.
    pub fn with<R>(&self, f: impl FnOnce(&mut Z906<P>) -> R) -> R {
        f(&mut self.lock())
    }

    pub fn poll(&self) -> Result<StatusFrame> {
        self.lock().poll()
    }

    pub fn send_command(&self, opcode: u8) -> Result<u8> {
        self.lock().send_command(opcode)
    }

    pub fn command(&self, command: Command) -> Result<u8> {
        self.lock().command(command)
    }

    pub fn write_register(&self, register: impl Into<Register>, value: u8) -> Result<()> {
        self.lock().write_register(register, value)
    }

    pub fn set_volume(&self, channel: Channel, value: u8) -> Result<()> {
        self.lock().set_volume(channel, value)
    }

    pub fn read_field(&self, field: impl Into<Field>) -> Result<u16> {
        self.lock().read_field(field)
    }

    pub fn volume(&self, channel: Channel) -> Result<u8> {
        self.lock().volume(channel)
    }

    pub fn power(&self, on: bool) -> Result<()> {
        self.lock().power(on)
    }

    pub fn select_input(&self, input: Input, effect: Option<Effect>) -> Result<()> {
        self.lock().select_input(input, effect)
    }

    pub fn temperature(&self) -> Result<u8> {
        self.lock().temperature()
    }

    pub fn initialize(&self) -> Result<()> {
        self.lock().initialize()
    }

    pub fn check_connection(&self) -> Result<u16> {
        self.lock().check_connection()
    }

    pub fn muted(&self) -> bool {
        self.lock().muted()
    }

    pub fn decode_mode(&self) -> bool {
        self.lock().decode_mode()
    }

    pub fn current_effect(&self) -> Option<Effect> {
        self.lock().current_effect()
    }

    pub fn snapshot(&self) -> Option<StatusFrame> {
        self.lock().snapshot()
    }

    pub fn status_report(&self) -> Option<StatusReport> {
        self.lock().status_report()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::Config;
    use crate::protocol::{test_frame, REQUEST_STATUS, STATUS_MAIN_LEVEL};
    use crate::transport::mock::MockPort;
    use std::thread;
    use std::time::Duration;

    fn client() -> (SafeClient<MockPort>, MockPort) {
        let port = MockPort::new();
        let config = Config {
            timeout: Duration::from_millis(50),
            deadtime: Duration::ZERO,
        };
        (SafeClient::new(Z906::with_config(port.clone(), config)), port)
    }

    #[test]
    fn clones_share_one_driver() {
        let (amp, port) = client();
        port.reply([0x01]);
        let other = amp.clone();
        thread::spawn(move || other.command(Command::MuteOn))
            .join()
            .unwrap()
            .unwrap();
        assert!(amp.muted());
        assert!(Arc::ptr_eq(&amp.clone_shared(), &amp.driver));
    }

    #[test]
    fn concurrent_requests_do_not_interleave() {
        let (amp, port) = client();
        for _ in 0..8 {
            port.reply(test_frame(|f| f[STATUS_MAIN_LEVEL as usize] = 43));
        }
        let workers: Vec<_> = (0..8)
            .map(|_| {
                let amp = amp.clone();
                thread::spawn(move || amp.volume(Channel::Main))
            })
            .collect();
        for worker in workers {
            assert_eq!(worker.join().unwrap().unwrap(), 255);
        }
        assert_eq!(port.sent(), vec![vec![REQUEST_STATUS]; 8]);
    }

    #[test]
    fn with_holds_the_lock_across_calls() {
        let (amp, port) = client();
        port.reply(test_frame(|f| f[STATUS_MAIN_LEVEL as usize] = 5));
        let report = amp
            .with(|driver| driver.poll().map(|_| driver.status_report()))
            .unwrap()
            .unwrap();
        assert_eq!(report.main_level, 5);
        assert_eq!(amp.snapshot().map(|s| s.main_level()), Some(5));
    }
}
