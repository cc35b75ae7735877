//! Blocking driver for the Logitech Z906 amplifier.
//!
//! [`Z906`] owns the serial link and the only mutable device state: the last
//! validated [`StatusFrame`] and the muted/decode flags inferred from issued
//! commands. Every method blocks until the expected answer arrived or the
//! configured timeout expired. Exactly one request is in flight at a time;
//! use [`crate::safe_client::SafeClient`] to share a driver between threads.
//!
//! ## Example
//!
//! ```no_run
//! use z906_lib::client::Config;
//! use z906_lib::protocol::{Channel, Input};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut amp = z906_lib::serial::open("/dev/ttyUSB0", Config::default())?;
//!     amp.check_connection()?;
//!
//!     amp.select_input(Input::Optical1, None)?;
//!     amp.write_register(Channel::Main, 128)?;
//!     println!("Main level: {}", amp.volume(Channel::Main)?);
//!     Ok(())
//! }
//! ```

use crate::error::{Error, Result};
use crate::protocol::{
    self as proto, Channel, Command, Effect, Field, Input, Register, StatusFrame,
    TemperatureFrame,
};
use crate::report::StatusReport;
use crate::transport::{SerialIo, Transport};
use log::{debug, warn};
use std::time::{Duration, Instant};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Link timing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Config {
    /// Upper bound for every wait on the device, measured from the request.
    #[cfg_attr(feature = "serde", serde(with = "humantime_serde"))]
    pub timeout: Duration,
    /// Pause before each transmission.
    #[cfg_attr(feature = "serde", serde(with = "humantime_serde"))]
    pub deadtime: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            timeout: proto::DEFAULT_TIMEOUT,
            deadtime: proto::DEFAULT_DEADTIME,
        }
    }
}

/// Driver for one amplifier on one serial link.
pub struct Z906<P> {
    transport: Transport<P>,
    timeout: Duration,
    status: Option<StatusFrame>,
    muted: bool,
    decode_mode: bool,
}

impl<P: SerialIo> Z906<P> {
    /// Creates a driver with the default [`Config`].
    pub fn new(port: P) -> Self {
        Self::with_config(port, Config::default())
    }

    pub fn with_config(port: P, config: Config) -> Self {
        Self {
            transport: Transport::new(port, config.deadtime),
            timeout: config.timeout,
            status: None,
            muted: false,
            decode_mode: true,
        }
    }

    /// Sets the timeout for every blocking wait.
    pub fn set_timeout(&mut self, timeout: Duration) {
        self.timeout = timeout;
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Sets the pause inserted before each transmission.
    pub fn set_deadtime(&mut self, deadtime: Duration) {
        self.transport.set_deadtime(deadtime);
    }

    pub fn deadtime(&self) -> Duration {
        self.transport.deadtime()
    }

    /// Requests a fresh status frame.
    ///
    /// On success the snapshot is replaced and returned. On any failure the
    /// previous snapshot stays untouched.
    pub fn poll(&mut self) -> Result<StatusFrame> {
        self.transport.write(&[proto::REQUEST_STATUS])?;
        let started = Instant::now();
        match self.receive_status(started) {
            Ok(frame) => {
                debug!("Status frame received: {frame}");
                self.status = Some(frame);
                Ok(frame)
            }
            Err(error) => {
                warn!("Status poll failed: {error}");
                Err(error)
            }
        }
    }

    fn receive_status(&mut self, started: Instant) -> Result<StatusFrame> {
        let mut buffer = [0u8; proto::STATUS_BUFFER_SIZE];
        let header_size = proto::STATUS_HEADER_SIZE;

        self.transport.wait_for(header_size, started, self.timeout)?;
        self.transport.read(&mut buffer[..header_size])?;
        let total_len = StatusFrame::total_len(&buffer[..header_size])?;

        self.transport
            .wait_for(total_len - header_size, started, self.timeout)?;
        self.transport.read(&mut buffer[header_size..total_len])?;

        Ok(StatusFrame::decode(&buffer[..total_len])?)
    }

    /// Sends a single-byte command and returns the one-byte answer.
    ///
    /// Mute on/off and 5.1 decode on/off update the cached flags as soon as
    /// the command is sent, regardless of the answer.
    pub fn send_command(&mut self, opcode: u8) -> Result<u8> {
        self.transport.write(&[opcode])?;
        let started = Instant::now();
        self.remember(opcode);

        self.transport.wait_for(1, started, self.timeout)?;
        let mut response = [0u8; 1];
        self.transport.read(&mut response)?;
        debug!("Command {opcode:#04x} answered with {:#04x}", response[0]);
        Ok(response[0])
    }

    /// Typed form of [`Z906::send_command`].
    pub fn command(&mut self, command: Command) -> Result<u8> {
        self.send_command(command.opcode())
    }

    fn remember(&mut self, opcode: u8) {
        match Command::try_from(opcode) {
            Ok(Command::MuteOn) => self.muted = true,
            Ok(Command::MuteOff) => self.muted = false,
            Ok(Command::EnableDecode) => self.decode_mode = true,
            Ok(Command::DisableDecode) => self.decode_mode = false,
            _ => {}
        }
    }

    /// Writes one register by sending back a modified status frame.
    ///
    /// A fresh poll comes first; if it fails nothing is transmitted. Volume
    /// registers take the external 0..=255 range and are scaled to device
    /// units. The device acknowledgment is discarded. If the frame cannot be
    /// sent, the snapshot keeps the freshly polled state.
    pub fn write_register(&mut self, register: impl Into<Register>, value: u8) -> Result<()> {
        let register = register.into();
        let mut frame = self.poll()?;
        let offset = register.offset();
        let len = frame.len();
        frame
            .write(offset, register.encode(value))
            .map_err(|_| Error::OffsetOutOfRange { offset, len })?;

        debug!("Writing register {offset:#04x} = {value}");
        self.transport.write(frame.as_bytes())?;
        // only a transmitted frame may replace the polled snapshot
        self.status = Some(frame);
        self.transport.flush()
    }

    /// Sets a volume level, `value` in 0..=255.
    pub fn set_volume(&mut self, channel: Channel, value: u8) -> Result<()> {
        self.write_register(Register::Level(channel), value)
    }

    /// Polls and resolves `field` from the fresh frame.
    pub fn read_field(&mut self, field: impl Into<Field>) -> Result<u16> {
        let field = field.into();
        let frame = self.poll()?;
        Ok(match field {
            Field::Version => frame.version(),
            Field::Power => frame.is_powered_on() as u16,
            Field::CurrentInput => frame.current_input() as u16,
            Field::Level(channel) => proto::volume_from_device(frame.level(channel)) as u16,
            Field::Offset(offset) => frame.get(offset).ok_or(Error::OffsetOutOfRange {
                offset,
                len: frame.len(),
            })? as u16,
        })
    }

    /// Volume level in the external 0..=255 range.
    pub fn volume(&mut self, channel: Channel) -> Result<u8> {
        let frame = self.poll()?;
        Ok(proto::volume_from_device(frame.level(channel)))
    }

    /// Switches power. Neither direction waits for an answer.
    ///
    /// Powering off also resets the power-up timer and saves the settings to
    /// EEPROM, like the console does.
    pub fn power(&mut self, on: bool) -> Result<()> {
        if on {
            return self.transport.write(&[Command::PowerOn.opcode()]);
        }
        self.transport.write(&[Command::PowerOff.opcode()])?;
        self.transport.write(&proto::POWER_OFF_SEQUENCE)?;
        self.transport.flush()
    }

    /// Switches to `input`, muted around the switch to avoid a pop.
    ///
    /// Without an explicit effect the input's default is used, see
    /// [`Input::default_effect`].
    pub fn select_input(&mut self, input: Input, effect: Option<Effect>) -> Result<()> {
        let effect = effect.unwrap_or_else(|| input.default_effect());
        debug!("Selecting input {input} with effect {effect}");
        self.transport.write(&[
            Command::MuteOn.opcode(),
            input.command().opcode(),
            effect.command().opcode(),
            Command::MuteOff.opcode(),
        ])?;
        self.transport.flush()
    }

    /// Reads the main temperature sensor.
    pub fn temperature(&mut self) -> Result<u8> {
        self.transport.write(&[proto::REQUEST_TEMPERATURE])?;
        let started = Instant::now();
        self.transport
            .wait_for(proto::TEMPERATURE_FRAME_SIZE, started, self.timeout)?;
        let mut frame = [0u8; proto::TEMPERATURE_FRAME_SIZE];
        self.transport.read(&mut frame)?;
        Ok(TemperatureFrame::decode(&frame)?.temperature())
    }

    /// Puts the amplifier into a known state: 5.1 decode on, unmuted and
    /// inputs unblocked.
    pub fn initialize(&mut self) -> Result<()> {
        for command in [
            Command::EnableDecode,
            Command::MuteOff,
            Command::UnblockInputs,
        ] {
            self.command(command)?;
        }
        Ok(())
    }

    /// Liveness probe: reads the firmware version.
    pub fn check_connection(&mut self) -> Result<u16> {
        match self.read_field(Field::Version) {
            Ok(0) => Err(Error::DeviceUnreachable),
            Ok(version) => Ok(version),
            Err(error) => {
                debug!("Liveness probe failed: {error}");
                Err(Error::DeviceUnreachable)
            }
        }
    }

    /// Muted flag as implied by the last mute command.
    pub fn muted(&self) -> bool {
        self.muted
    }

    /// 5.1 decode flag as implied by the last decode command.
    pub fn decode_mode(&self) -> bool {
        self.decode_mode
    }

    /// Effect of the current input according to the last snapshot.
    pub fn current_effect(&self) -> Option<Effect> {
        self.status.as_ref().and_then(StatusFrame::current_effect)
    }

    /// Copy of the last validated status frame.
    pub fn snapshot(&self) -> Option<StatusFrame> {
        self.status
    }

    /// Read-only view of the last snapshot combined with the cached flags.
    pub fn status_report(&self) -> Option<StatusReport> {
        self.status
            .as_ref()
            .map(|frame| StatusReport::new(frame, self.muted, self.decode_mode))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::{
        test_frame, MODEL_STATUS, MODEL_TEMPERATURE, REQUEST_CURRENT_INPUT, REQUEST_STATUS,
        REQUEST_TEMPERATURE, REQUEST_VERSION, START_MARKER, STATUS_AUTO_STANDBY,
        STATUS_CURRENT_INPUT, STATUS_FX_INPUT_4, STATUS_LENGTH, STATUS_MAIN_LEVEL, STATUS_MODEL,
        STATUS_REAR_LEVEL, STATUS_SPDIF_STATUS, STATUS_STANDBY, STATUS_SUB_LEVEL,
        STATUS_VERSION_A, STATUS_VERSION_B, STATUS_VERSION_C, TEMPERATURE_FRAME_SIZE,
        TEMPERATURE_MODEL, TEMPERATURE_VALUE,
    };
    use crate::transport::mock::MockPort;
    use assert_matches::assert_matches;
    use std::io;

    const TIMEOUT: Duration = Duration::from_millis(50);

    fn driver() -> (Z906<MockPort>, MockPort) {
        let port = MockPort::new();
        let config = Config {
            timeout: TIMEOUT,
            deadtime: Duration::ZERO,
        };
        (Z906::with_config(port.clone(), config), port)
    }

    fn status(fill: impl FnOnce(&mut [u8])) -> Vec<u8> {
        test_frame(|f| {
            f[STATUS_VERSION_A as usize] = 2;
            f[STATUS_VERSION_B as usize] = 0;
            f[STATUS_VERSION_C as usize] = 7;
            fill(f);
        })
    }

    fn temperature_frame(model: u8, value: u8) -> Vec<u8> {
        let mut frame = vec![0u8; TEMPERATURE_FRAME_SIZE];
        frame[0] = START_MARKER;
        frame[TEMPERATURE_MODEL] = model;
        frame[TEMPERATURE_VALUE] = value;
        frame
    }

    #[test]
    fn poll_replaces_snapshot() {
        let (mut amp, port) = driver();
        assert_eq!(amp.snapshot(), None);
        let bytes = status(|f| f[STATUS_MAIN_LEVEL as usize] = 20);
        port.reply(bytes.clone());

        let frame = amp.poll().unwrap();
        assert_eq!(frame.as_bytes(), bytes.as_slice());
        assert_eq!(amp.snapshot(), Some(frame));
        assert_eq!(port.sent(), vec![vec![REQUEST_STATUS]]);
    }

    #[test]
    fn main_level_is_scaled_to_external_range() {
        let (mut amp, port) = driver();
        port.reply(status(|f| f[STATUS_MAIN_LEVEL as usize] = 20));
        assert_eq!(amp.read_field(Channel::Main).unwrap(), 118);
        port.reply(status(|f| f[STATUS_SUB_LEVEL as usize] = 43));
        assert_eq!(amp.read_field(STATUS_SUB_LEVEL).unwrap(), 255);
    }

    #[test]
    fn read_field_resolves_special_codes() {
        let (mut amp, port) = driver();
        let bytes = status(|f| {
            f[STATUS_CURRENT_INPUT as usize] = 4;
            f[STATUS_STANDBY as usize] = 1;
            f[STATUS_SPDIF_STATUS as usize] = 0x5A;
        });
        for _ in 0..5 {
            port.reply(bytes.clone());
        }
        assert_eq!(amp.read_field(REQUEST_VERSION).unwrap(), 207);
        assert_eq!(amp.read_field(REQUEST_STATUS).unwrap(), 0);
        assert_eq!(amp.read_field(REQUEST_CURRENT_INPUT).unwrap(), 4);
        assert_eq!(amp.read_field(STATUS_SPDIF_STATUS).unwrap(), 0x5A);
        assert_matches!(
            amp.read_field(0x40u8),
            Err(Error::OffsetOutOfRange { offset: 0x40, len: 32 })
        );
    }

    #[test]
    fn powered_on_reads_as_one() {
        let (mut amp, port) = driver();
        port.reply(status(|_| {}));
        assert_eq!(amp.read_field(Field::Power).unwrap(), 1);
    }

    #[test]
    fn silent_device_times_out_without_touching_snapshot() {
        let (mut amp, port) = driver();
        port.reply(status(|_| {}));
        let s0 = amp.poll().unwrap();

        port.silence();
        let started = Instant::now();
        assert_matches!(amp.poll(), Err(Error::Timeout { expected: 3, .. }));
        assert!(started.elapsed() >= TIMEOUT);
        assert_eq!(amp.snapshot(), Some(s0));

        port.silence();
        assert_matches!(amp.read_field(Field::Version), Err(Error::Timeout { .. }));
    }

    #[test]
    fn truncated_payload_times_out() {
        let (mut amp, port) = driver();
        let bytes = status(|_| {});
        port.reply(bytes[..20].to_vec());
        assert_matches!(amp.poll(), Err(Error::Timeout { expected: 29, .. }));
        assert_eq!(amp.snapshot(), None);
    }

    #[test]
    fn payload_deadline_counts_from_the_request() {
        let (mut amp, port) = driver();
        let bytes = status(|f| f[STATUS_MAIN_LEVEL as usize] = 20);

        // header in time, payload after the bound: a deadline restarted at
        // the header would still accept this one
        port.reply_in_parts(vec![
            (Duration::from_millis(30), bytes[..3].to_vec()),
            (Duration::from_millis(75), bytes[3..].to_vec()),
        ]);
        assert_matches!(amp.poll(), Err(Error::Timeout { expected: 29, .. }));
        assert_eq!(amp.snapshot(), None);
    }

    #[test]
    fn staged_answer_within_the_bound_succeeds() {
        let (mut amp, port) = driver();
        let bytes = status(|f| f[STATUS_MAIN_LEVEL as usize] = 20);
        port.reply_in_parts(vec![
            (Duration::from_millis(10), bytes[..3].to_vec()),
            (Duration::from_millis(35), bytes[3..].to_vec()),
        ]);
        assert_eq!(amp.read_field(Channel::Main).unwrap(), 118);
    }

    #[test]
    fn invalid_frames_keep_snapshot() {
        let (mut amp, port) = driver();
        port.reply(status(|f| f[STATUS_MAIN_LEVEL as usize] = 1));
        let s0 = amp.poll().unwrap();

        let mut corrupt = status(|f| f[STATUS_MAIN_LEVEL as usize] = 2);
        corrupt[STATUS_REAR_LEVEL as usize] ^= 0xFF;
        port.reply(corrupt);
        assert_matches!(
            amp.poll(),
            Err(Error::FrameInvalid(proto::Error::Checksum { .. }))
        );

        let mut wrong_marker = status(|_| {});
        wrong_marker[0] = 0x55;
        port.reply(wrong_marker);
        assert_matches!(
            amp.poll(),
            Err(Error::FrameInvalid(proto::Error::StartMarker(0x55)))
        );

        port.reply(status(|f| f[STATUS_MODEL as usize] = MODEL_TEMPERATURE));
        assert_matches!(
            amp.poll(),
            Err(Error::FrameInvalid(proto::Error::Model { .. }))
        );

        port.reply([START_MARKER, MODEL_STATUS, 0xF0]);
        assert_matches!(
            amp.poll(),
            Err(Error::FrameInvalid(proto::Error::Length(244)))
        );

        assert_eq!(amp.snapshot(), Some(s0));
    }

    #[test]
    fn slow_but_complete_answer_succeeds() {
        let (mut amp, port) = driver();
        amp.set_timeout(Duration::from_millis(300));
        port.reply_after(Duration::from_millis(40), status(|_| {}));
        assert!(amp.poll().is_ok());
    }

    #[test]
    fn stale_input_is_discarded_before_a_command() {
        let (mut amp, port) = driver();
        port.inject(&[0x99, 0x98]);
        port.reply([0x01]);
        assert_eq!(amp.send_command(0x08).unwrap(), 0x01);
        assert_eq!(port.sent(), vec![vec![0x08]]);
    }

    #[test]
    fn mute_and_decode_commands_update_cache() {
        let (mut amp, port) = driver();
        assert!(!amp.muted());
        assert!(amp.decode_mode());

        port.reply([0x01]);
        amp.command(Command::MuteOn).unwrap();
        assert!(amp.muted());

        // unrelated commands leave both flags alone
        port.reply([0x01]);
        amp.command(Command::MainLevelUp).unwrap();
        assert!(amp.muted());
        assert!(amp.decode_mode());

        port.reply([0x01]);
        amp.command(Command::DisableDecode).unwrap();
        assert!(!amp.decode_mode());
        assert!(amp.muted());

        port.reply([0x01]);
        amp.command(Command::MuteOff).unwrap();
        assert!(!amp.muted());

        port.reply([0x01]);
        amp.command(Command::EnableDecode).unwrap();
        assert!(amp.decode_mode());
    }

    #[test]
    fn command_timeout_still_updates_cache() {
        let (mut amp, port) = driver();
        port.silence();
        let started = Instant::now();
        assert_matches!(
            amp.send_command(Command::MuteOn.opcode()),
            Err(Error::Timeout { expected: 1, .. })
        );
        assert!(started.elapsed() >= TIMEOUT);
        assert!(amp.muted());
    }

    #[test]
    fn write_register_scales_volume_and_sends_frame() {
        let (mut amp, port) = driver();
        let bytes = status(|f| f[STATUS_MAIN_LEVEL as usize] = 10);
        port.reply(bytes.clone());
        port.reply([0x00, 0x00, 0x00, 0x00, 0x00]);

        amp.write_register(Channel::Main, 255).unwrap();

        let sent = port.sent();
        assert_eq!(sent.len(), 2);
        assert_eq!(sent[0], vec![REQUEST_STATUS]);
        let written = StatusFrame::decode(&sent[1]).unwrap();
        assert_eq!(written.main_level(), 43);
        assert_eq!(&sent[1][..3], &bytes[..3]);
        assert_eq!(&sent[1][4..31], &bytes[4..31]);
        assert_eq!(amp.snapshot(), Some(written));
        // acknowledgment was flushed away
        assert_eq!(port.pending_input(), 0);
    }

    #[test]
    fn write_register_raw_offset_is_not_scaled() {
        let (mut amp, port) = driver();
        port.reply(status(|_| {}));
        amp.write_register(STATUS_AUTO_STANDBY, 1).unwrap();
        let written = StatusFrame::decode(&port.sent()[1]).unwrap();
        assert_eq!(written.auto_standby(), 1);

        port.reply(status(|_| {}));
        amp.set_volume(Channel::Rear, 128).unwrap();
        let written = StatusFrame::decode(&port.sent()[3]).unwrap();
        assert_eq!(written.rear_level(), 21);
    }

    #[test]
    fn write_register_sends_nothing_after_failed_poll() {
        let (mut amp, port) = driver();
        port.silence();
        assert_matches!(
            amp.write_register(Channel::Sub, 100),
            Err(Error::Timeout { .. })
        );
        assert_eq!(port.sent(), vec![vec![REQUEST_STATUS]]);
    }

    #[test]
    fn write_register_keeps_polled_snapshot_when_send_fails() {
        let (mut amp, port) = driver();
        port.reply(status(|f| f[STATUS_MAIN_LEVEL as usize] = 10));
        port.fail_send_after(1, io::ErrorKind::BrokenPipe);
        assert_matches!(
            amp.write_register(Channel::Main, 255),
            Err(Error::Transport(e)) if e.kind() == io::ErrorKind::BrokenPipe
        );
        assert_eq!(amp.snapshot().map(|s| s.main_level()), Some(10));
        assert_eq!(port.sent(), vec![vec![REQUEST_STATUS]]);
    }

    #[test]
    fn write_register_rejects_header_and_checksum() {
        let (mut amp, port) = driver();
        port.reply(status(|_| {}));
        assert_matches!(
            amp.write_register(STATUS_LENGTH, 1),
            Err(Error::OffsetOutOfRange { offset: 2, len: 32 })
        );
        port.reply(status(|_| {}));
        assert_matches!(
            amp.write_register(31u8, 1),
            Err(Error::OffsetOutOfRange { offset: 31, .. })
        );
        assert_eq!(port.sent().len(), 2);
    }

    #[test]
    fn select_input_defaults_effect_per_input() {
        let (mut amp, port) = driver();
        amp.select_input(Input::Aux, None).unwrap();
        amp.select_input(Input::Rca20, None).unwrap();
        amp.select_input(Input::Optical1, None).unwrap();
        amp.select_input(Input::Trs51, None).unwrap();
        amp.select_input(Input::Coaxial, Some(Effect::FourOne)).unwrap();
        assert_eq!(
            port.sent(),
            vec![
                vec![0x38, 0x07, 0x14, 0x39],
                vec![0x38, 0x05, 0x14, 0x39],
                vec![0x38, 0x03, 0x35, 0x39],
                vec![0x38, 0x02, 0x35, 0x39],
                vec![0x38, 0x06, 0x15, 0x39],
            ]
        );
    }

    #[test]
    fn power_sequences() {
        let (mut amp, port) = driver();
        amp.power(true).unwrap();
        amp.power(false).unwrap();
        assert_eq!(
            port.sent(),
            vec![vec![0x11], vec![0x10], vec![0x30, 0x37, 0x36]]
        );
    }

    #[test]
    fn temperature_probe() {
        let (mut amp, port) = driver();
        port.reply(temperature_frame(MODEL_TEMPERATURE, 38));
        assert_eq!(amp.temperature().unwrap(), 38);
        assert_eq!(port.sent(), vec![vec![REQUEST_TEMPERATURE]]);

        port.reply(temperature_frame(MODEL_STATUS, 38));
        assert_matches!(
            amp.temperature(),
            Err(Error::FrameInvalid(proto::Error::Model { .. }))
        );

        port.reply(temperature_frame(MODEL_TEMPERATURE, 38)[..9].to_vec());
        assert_matches!(
            amp.temperature(),
            Err(Error::Timeout { expected: 10, .. })
        );
    }

    #[test]
    fn initialize_sends_baseline_commands() {
        let (mut amp, port) = driver();
        for _ in 0..5 {
            port.reply([0x01]);
        }
        amp.command(Command::MuteOn).unwrap();
        amp.command(Command::DisableDecode).unwrap();
        assert!(amp.muted());
        assert!(!amp.decode_mode());

        amp.initialize().unwrap();
        assert!(!amp.muted());
        assert!(amp.decode_mode());
        assert_eq!(
            &port.sent()[2..],
            &[vec![0x23], vec![0x39], vec![0x33]]
        );
    }

    #[test]
    fn liveness_probe() {
        let (mut amp, port) = driver();
        port.reply(status(|_| {}));
        assert_eq!(amp.check_connection().unwrap(), 207);

        port.silence();
        assert_matches!(amp.check_connection(), Err(Error::DeviceUnreachable));

        port.reply(status(|f| {
            f[STATUS_VERSION_A as usize] = 0;
            f[STATUS_VERSION_C as usize] = 0;
        }));
        assert_matches!(amp.check_connection(), Err(Error::DeviceUnreachable));
    }

    #[test]
    fn current_effect_follows_snapshot() {
        let (mut amp, port) = driver();
        assert_eq!(amp.current_effect(), None);
        port.reply(status(|f| {
            f[STATUS_CURRENT_INPUT as usize] = Input::Optical2.index();
            f[STATUS_FX_INPUT_4 as usize] = Effect::TwoOne.status_code();
        }));
        amp.poll().unwrap();
        assert_eq!(amp.current_effect(), Some(Effect::TwoOne));

        port.reply(status(|f| f[STATUS_CURRENT_INPUT as usize] = 9));
        amp.poll().unwrap();
        assert_eq!(amp.current_effect(), None);
    }

    #[test]
    fn transport_errors_are_reported() {
        let (mut amp, port) = driver();
        port.fail_next_send(io::ErrorKind::NotConnected);
        assert_matches!(amp.poll(), Err(Error::Transport(_)));
    }
}
