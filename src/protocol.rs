//! Wire-level definitions for the Logitech Z906 console protocol.
//!
//! The Z906 control console talks to the amplifier over a half-duplex UART at
//! 57600 baud, 8 data bits, odd parity and 1 stop bit. The protocol is tiny:
//!
//! - **Single-byte commands** ([`Command`]) trigger an action (power, mute,
//!   input selection, effects, ...). The amplifier answers with one byte.
//! - **Status frames** ([`StatusFrame`]) carry the complete device state. A
//!   status frame is requested with [`REQUEST_STATUS`] and written back
//!   (modified) to change registers such as the volume levels.
//! - **Temperature frames** ([`TemperatureFrame`]) are fixed 10-byte answers
//!   to [`REQUEST_TEMPERATURE`].
//!
//! Everything in this module is pure data handling without any I/O; see
//! [`crate::client`] for the driver that puts it on the wire.

use std::fmt;
use std::time::Duration;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Codec-level errors.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("Unexpected start marker {0:#04x}, expected 0xaa")]
    StartMarker(u8),
    #[error("Unexpected model identifier {actual:#04x}, expected {expected:#04x}")]
    Model { expected: u8, actual: u8 },
    #[error("Checksum mismatch: frame carries {actual:#04x}, computed {expected:#04x}")]
    Checksum { expected: u8, actual: u8 },
    #[error("Invalid frame length {0}")]
    Length(usize),
    #[error("Unknown command opcode {0:#04x}")]
    UnknownCommand(u8),
    #[error("Unknown input {0}, expected 0 to 5")]
    UnknownInput(u8),
    #[error("Unknown effect '{0}'")]
    UnknownEffect(String),
    #[error("Unknown channel '{0}'")]
    UnknownChannel(String),
    #[error("Offset {offset:#04x} cannot be written in a frame of {len} bytes")]
    ReadOnlyOffset { offset: u8, len: usize },
}

/// Serial line speed of the console port.
pub const BAUD_RATE: u32 = 57600;

/// Default upper bound for every blocking wait on the device.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_millis(1000);

/// Default pause before each transmission. The amplifier needs a few
/// milliseconds to turn the half-duplex line around.
pub const DEFAULT_DEADTIME: Duration = Duration::from_millis(5);

/// Start-of-frame marker of every response frame.
pub const START_MARKER: u8 = 0xAA;
/// Model identifier of a status frame.
pub const MODEL_STATUS: u8 = 0x0A;
/// Model identifier of a temperature frame.
pub const MODEL_TEMPERATURE: u8 = 0x0C;

/// Capacity of the status buffer, header and checksum included.
pub const STATUS_BUFFER_SIZE: usize = 0x20;
/// Number of header bytes preceding the status payload.
pub const STATUS_HEADER_SIZE: usize = 3;
/// Header plus checksum; `total_len = payload_len + STATUS_OVERHEAD`.
pub const STATUS_OVERHEAD: usize = 4;
/// Shortest status frame that still holds every named field and the checksum.
pub const STATUS_MIN_SIZE: usize = STATUS_AUTO_STANDBY as usize + 2;

pub const STATUS_START: u8 = 0x00;
pub const STATUS_MODEL: u8 = 0x01;
pub const STATUS_LENGTH: u8 = 0x02;
pub const STATUS_MAIN_LEVEL: u8 = 0x03;
pub const STATUS_REAR_LEVEL: u8 = 0x04;
pub const STATUS_CENTER_LEVEL: u8 = 0x05;
pub const STATUS_SUB_LEVEL: u8 = 0x06;
pub const STATUS_CURRENT_INPUT: u8 = 0x07;
pub const STATUS_MUTED: u8 = 0x08;
pub const STATUS_FX_INPUT_4: u8 = 0x09;
pub const STATUS_FX_INPUT_5: u8 = 0x0A;
pub const STATUS_FX_INPUT_2: u8 = 0x0B;
pub const STATUS_FX_INPUT_AUX: u8 = 0x0C;
pub const STATUS_FX_INPUT_1: u8 = 0x0D;
pub const STATUS_FX_INPUT_3: u8 = 0x0E;
pub const STATUS_SPDIF_STATUS: u8 = 0x0F;
pub const STATUS_SIGNAL_STATUS: u8 = 0x10;
pub const STATUS_VERSION_A: u8 = 0x11;
pub const STATUS_VERSION_B: u8 = 0x12;
pub const STATUS_VERSION_C: u8 = 0x13;
pub const STATUS_STANDBY: u8 = 0x14;
pub const STATUS_AUTO_STANDBY: u8 = 0x15;

/// Fixed size of a temperature frame.
pub const TEMPERATURE_FRAME_SIZE: usize = 10;
pub const TEMPERATURE_MODEL: usize = 2;
pub const TEMPERATURE_VALUE: usize = 7;

/// Highest volume level the amplifier accepts.
pub const MAX_VOLUME: u8 = 43;

pub const REQUEST_VERSION: u8 = 0xF0;
pub const REQUEST_CURRENT_INPUT: u8 = 0xF1;
pub const REQUEST_INPUT_GAIN: u8 = 0x2F;
pub const REQUEST_TEMPERATURE: u8 = 0x25;
pub const REQUEST_POWER_UP_TIME: u8 = 0x31;
pub const REQUEST_STATUS: u8 = 0x34;

/// Sent after power-off: reset the power-up timer and persist to EEPROM.
pub const POWER_OFF_SEQUENCE: [u8; 3] = [
    Command::ResetPowerUpTime as u8,
    0x37,
    Command::EepromSave as u8,
];

/// Longitudinal redundancy check over `frame[1..len-1]`.
///
/// The first byte (start marker) and the last byte (checksum slot) are
/// excluded. The accumulator starts at zero and every byte is subtracted with
/// 8-bit wraparound.
pub fn lrc(frame: &[u8]) -> u8 {
    if frame.len() < 2 {
        return 0;
    }
    frame[1..frame.len() - 1]
        .iter()
        .fold(0u8, |acc, byte| acc.wrapping_sub(*byte))
}

/// Scales an external volume (0..=255) to device units (0..=43), truncating.
pub fn volume_to_device(value: u8) -> u8 {
    (value as u16 * MAX_VOLUME as u16 / u8::MAX as u16) as u8
}

/// Scales a device volume (0..=43) to the external range (0..=255), truncating.
///
/// Levels above [`MAX_VOLUME`] saturate at 255.
pub fn volume_from_device(value: u8) -> u8 {
    (value as u16 * u8::MAX as u16 / MAX_VOLUME as u16).min(u8::MAX as u16) as u8
}

/// Single-byte commands understood by the amplifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[repr(u8)]
pub enum Command {
    SelectTrs51 = 0x02,
    SelectOptical1 = 0x03,
    SelectOptical2 = 0x04,
    SelectRca20 = 0x05,
    SelectCoaxial = 0x06,
    SelectAux = 0x07,
    MainLevelUp = 0x08,
    MainLevelDown = 0x09,
    SubLevelUp = 0x0A,
    SubLevelDown = 0x0B,
    CenterLevelUp = 0x0C,
    CenterLevelDown = 0x0D,
    RearLevelUp = 0x0E,
    RearLevelDown = 0x0F,
    PowerOff = 0x10,
    PowerOn = 0x11,
    Effect3D = 0x14,
    Effect41 = 0x15,
    Effect21 = 0x16,
    BlockInputs = 0x22,
    EnableDecode = 0x23,
    DisableDecode = 0x24,
    ResetPowerUpTime = 0x30,
    UnblockInputs = 0x33,
    EffectOff = 0x35,
    EepromSave = 0x36,
    MuteOn = 0x38,
    MuteOff = 0x39,
}

impl Command {
    pub fn opcode(self) -> u8 {
        self as u8
    }
}

impl From<Command> for u8 {
    fn from(command: Command) -> u8 {
        command as u8
    }
}

impl TryFrom<u8> for Command {
    type Error = Error;

    fn try_from(opcode: u8) -> Result<Self, Self::Error> {
        use Command::*;
        Ok(match opcode {
            0x02 => SelectTrs51,
            0x03 => SelectOptical1,
            0x04 => SelectOptical2,
            0x05 => SelectRca20,
            0x06 => SelectCoaxial,
            0x07 => SelectAux,
            0x08 => MainLevelUp,
            0x09 => MainLevelDown,
            0x0A => SubLevelUp,
            0x0B => SubLevelDown,
            0x0C => CenterLevelUp,
            0x0D => CenterLevelDown,
            0x0E => RearLevelUp,
            0x0F => RearLevelDown,
            0x10 => PowerOff,
            0x11 => PowerOn,
            0x14 => Effect3D,
            0x15 => Effect41,
            0x16 => Effect21,
            0x22 => BlockInputs,
            0x23 => EnableDecode,
            0x24 => DisableDecode,
            0x30 => ResetPowerUpTime,
            0x33 => UnblockInputs,
            0x35 => EffectOff,
            0x36 => EepromSave,
            0x38 => MuteOn,
            0x39 => MuteOff,
            _ => return Err(Error::UnknownCommand(opcode)),
        })
    }
}

/// The six physical inputs, in the order the status frame indexes them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Input {
    /// Input 1, TRS 5.1 (three 3.5 mm jacks).
    Trs51,
    /// Input 2, RCA stereo.
    Rca20,
    /// Input 3, optical 1.
    Optical1,
    /// Input 4, optical 2.
    Optical2,
    /// Input 5, coaxial.
    Coaxial,
    /// Console auxiliary jack.
    Aux,
}

impl Input {
    pub const ALL: [Input; 6] = [
        Input::Trs51,
        Input::Rca20,
        Input::Optical1,
        Input::Optical2,
        Input::Coaxial,
        Input::Aux,
    ];

    /// Selector value as stored in the status frame.
    pub fn index(self) -> u8 {
        match self {
            Input::Trs51 => 0,
            Input::Rca20 => 1,
            Input::Optical1 => 2,
            Input::Optical2 => 3,
            Input::Coaxial => 4,
            Input::Aux => 5,
        }
    }

    pub fn command(self) -> Command {
        match self {
            Input::Trs51 => Command::SelectTrs51,
            Input::Rca20 => Command::SelectRca20,
            Input::Optical1 => Command::SelectOptical1,
            Input::Optical2 => Command::SelectOptical2,
            Input::Coaxial => Command::SelectCoaxial,
            Input::Aux => Command::SelectAux,
        }
    }

    /// Status frame offset of this input's effect slot.
    pub fn effect_offset(self) -> u8 {
        match self {
            Input::Trs51 => STATUS_FX_INPUT_1,
            Input::Rca20 => STATUS_FX_INPUT_2,
            Input::Optical1 => STATUS_FX_INPUT_3,
            Input::Optical2 => STATUS_FX_INPUT_4,
            Input::Coaxial => STATUS_FX_INPUT_5,
            Input::Aux => STATUS_FX_INPUT_AUX,
        }
    }

    /// Effect applied when switching to this input without naming one.
    ///
    /// Matches the console: the two stereo inputs get the 3D surround effect,
    /// everything else plays unprocessed.
    pub fn default_effect(self) -> Effect {
        match self {
            Input::Rca20 | Input::Aux => Effect::ThreeD,
            _ => Effect::Off,
        }
    }
}

impl TryFrom<u8> for Input {
    type Error = Error;

    fn try_from(index: u8) -> Result<Self, Self::Error> {
        Input::ALL
            .get(index as usize)
            .copied()
            .ok_or(Error::UnknownInput(index))
    }
}

impl fmt::Display for Input {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Input::Trs51 => "TRS 5.1",
            Input::Rca20 => "RCA 2.0",
            Input::Optical1 => "Optical 1",
            Input::Optical2 => "Optical 2",
            Input::Coaxial => "Coaxial",
            Input::Aux => "Aux",
        };
        write!(f, "{} ({name})", self.index())
    }
}

/// Surround effects that can be applied per input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Effect {
    ThreeD,
    TwoOne,
    FourOne,
    Off,
}

impl Effect {
    pub fn command(self) -> Command {
        match self {
            Effect::ThreeD => Command::Effect3D,
            Effect::TwoOne => Command::Effect21,
            Effect::FourOne => Command::Effect41,
            Effect::Off => Command::EffectOff,
        }
    }

    /// Code stored in the per-input effect slots of the status frame.
    pub fn status_code(self) -> u8 {
        match self {
            Effect::ThreeD => 0x00,
            Effect::TwoOne => 0x01,
            Effect::FourOne => 0x02,
            Effect::Off => 0x03,
        }
    }

    pub fn from_status_code(code: u8) -> Option<Self> {
        match code {
            0x00 => Some(Effect::ThreeD),
            0x01 => Some(Effect::TwoOne),
            0x02 => Some(Effect::FourOne),
            0x03 => Some(Effect::Off),
            _ => None,
        }
    }
}

impl std::str::FromStr for Effect {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "3d" => Ok(Effect::ThreeD),
            "2.1" | "21" => Ok(Effect::TwoOne),
            "4.1" | "41" => Ok(Effect::FourOne),
            "none" | "off" => Ok(Effect::Off),
            _ => Err(Error::UnknownEffect(s.to_string())),
        }
    }
}

impl fmt::Display for Effect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Effect::ThreeD => "3D",
            Effect::TwoOne => "2.1",
            Effect::FourOne => "4.1",
            Effect::Off => "none",
        })
    }
}

/// Volume channels. The discriminant is both the write opcode and the
/// status frame offset of the level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[repr(u8)]
pub enum Channel {
    Main = STATUS_MAIN_LEVEL,
    Rear = STATUS_REAR_LEVEL,
    Center = STATUS_CENTER_LEVEL,
    Sub = STATUS_SUB_LEVEL,
}

impl Channel {
    pub const ALL: [Channel; 4] = [Channel::Main, Channel::Rear, Channel::Center, Channel::Sub];

    pub fn offset(self) -> u8 {
        self as u8
    }

    pub fn from_offset(offset: u8) -> Option<Self> {
        Channel::ALL.into_iter().find(|c| c.offset() == offset)
    }

    pub fn up(self) -> Command {
        match self {
            Channel::Main => Command::MainLevelUp,
            Channel::Rear => Command::RearLevelUp,
            Channel::Center => Command::CenterLevelUp,
            Channel::Sub => Command::SubLevelUp,
        }
    }

    pub fn down(self) -> Command {
        match self {
            Channel::Main => Command::MainLevelDown,
            Channel::Rear => Command::RearLevelDown,
            Channel::Center => Command::CenterLevelDown,
            Channel::Sub => Command::SubLevelDown,
        }
    }
}

impl std::str::FromStr for Channel {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "main" => Ok(Channel::Main),
            "rear" => Ok(Channel::Rear),
            "center" => Ok(Channel::Center),
            "sub" | "subwoofer" => Ok(Channel::Sub),
            _ => Err(Error::UnknownChannel(s.to_string())),
        }
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Channel::Main => "main",
            Channel::Rear => "rear",
            Channel::Center => "center",
            Channel::Sub => "sub",
        })
    }
}

/// A value that can be queried from the status frame.
///
/// The device protocol overloads numeric codes: the request opcodes for
/// version, power state and current input are special, the volume opcodes
/// double as frame offsets, and every other code is a plain byte offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    /// Firmware version as `c + 10 * b + 100 * a`.
    Version,
    /// 1 when the amplifier is powered on (inverted standby flag).
    Power,
    /// Raw input selector.
    CurrentInput,
    /// Volume level in the external 0..=255 range.
    Level(Channel),
    /// Raw byte at this frame offset.
    Offset(u8),
}

impl Field {
    pub fn code(self) -> u8 {
        match self {
            Field::Version => REQUEST_VERSION,
            Field::Power => REQUEST_STATUS,
            Field::CurrentInput => REQUEST_CURRENT_INPUT,
            Field::Level(channel) => channel.offset(),
            Field::Offset(offset) => offset,
        }
    }
}

impl From<Channel> for Field {
    fn from(channel: Channel) -> Self {
        Field::Level(channel)
    }
}

impl From<u8> for Field {
    fn from(code: u8) -> Self {
        match code {
            REQUEST_VERSION => Field::Version,
            REQUEST_STATUS => Field::Power,
            REQUEST_CURRENT_INPUT => Field::CurrentInput,
            code => match Channel::from_offset(code) {
                Some(channel) => Field::Level(channel),
                None => Field::Offset(code),
            },
        }
    }
}

/// A writable location inside the status frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Register {
    /// Volume level, given in the external 0..=255 range.
    Level(Channel),
    /// Raw byte at this frame offset.
    Offset(u8),
}

impl Register {
    pub fn offset(self) -> u8 {
        match self {
            Register::Level(channel) => channel.offset(),
            Register::Offset(offset) => offset,
        }
    }

    /// Converts an external value into the byte stored in the frame.
    pub fn encode(self, value: u8) -> u8 {
        match self {
            Register::Level(_) => volume_to_device(value),
            Register::Offset(_) => value,
        }
    }
}

impl From<Channel> for Register {
    fn from(channel: Channel) -> Self {
        Register::Level(channel)
    }
}

impl From<u8> for Register {
    fn from(opcode: u8) -> Self {
        match Channel::from_offset(opcode) {
            Some(channel) => Register::Level(channel),
            None => Register::Offset(opcode),
        }
    }
}

/// A validated status frame.
///
/// Instances only exist for frames that passed the start marker, model and
/// checksum checks, or were derived from one through [`StatusFrame::write`].
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct StatusFrame {
    buffer: [u8; STATUS_BUFFER_SIZE],
    len: usize,
}

impl StatusFrame {
    /// Total frame length announced by a status header.
    pub fn total_len(header: &[u8]) -> Result<usize, Error> {
        let payload_len = *header
            .get(STATUS_LENGTH as usize)
            .ok_or(Error::Length(header.len()))? as usize;
        let total = payload_len + STATUS_OVERHEAD;
        if !(STATUS_MIN_SIZE..=STATUS_BUFFER_SIZE).contains(&total) {
            return Err(Error::Length(total));
        }
        Ok(total)
    }

    /// Validates a complete status frame.
    pub fn decode(frame: &[u8]) -> Result<Self, Error> {
        let len = Self::total_len(frame)?;
        if frame.len() != len {
            return Err(Error::Length(frame.len()));
        }
        if frame[STATUS_START as usize] != START_MARKER {
            return Err(Error::StartMarker(frame[STATUS_START as usize]));
        }
        if frame[STATUS_MODEL as usize] != MODEL_STATUS {
            return Err(Error::Model {
                expected: MODEL_STATUS,
                actual: frame[STATUS_MODEL as usize],
            });
        }
        let expected = lrc(frame);
        let actual = frame[len - 1];
        if expected != actual {
            return Err(Error::Checksum { expected, actual });
        }
        let mut buffer = [0u8; STATUS_BUFFER_SIZE];
        buffer[..len].copy_from_slice(frame);
        Ok(Self { buffer, len })
    }

    /// Stores `value` at `offset` and refreshes the checksum.
    ///
    /// Header bytes and the checksum slot itself are not writable.
    pub fn write(&mut self, offset: u8, value: u8) -> Result<(), Error> {
        let index = offset as usize;
        if index < STATUS_HEADER_SIZE || index >= self.len - 1 {
            return Err(Error::ReadOnlyOffset {
                offset,
                len: self.len,
            });
        }
        self.buffer[index] = value;
        self.buffer[self.len - 1] = lrc(self.as_bytes());
        Ok(())
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.buffer[..self.len]
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Raw byte at `offset`, if inside the frame.
    pub fn get(&self, offset: u8) -> Option<u8> {
        self.as_bytes().get(offset as usize).copied()
    }

    fn byte(&self, offset: u8) -> u8 {
        self.buffer[offset as usize]
    }

    pub fn checksum(&self) -> u8 {
        self.buffer[self.len - 1]
    }

    /// Volume level in device units (0..=43).
    pub fn level(&self, channel: Channel) -> u8 {
        self.byte(channel.offset())
    }

    pub fn main_level(&self) -> u8 {
        self.level(Channel::Main)
    }

    pub fn rear_level(&self) -> u8 {
        self.level(Channel::Rear)
    }

    pub fn center_level(&self) -> u8 {
        self.level(Channel::Center)
    }

    pub fn sub_level(&self) -> u8 {
        self.level(Channel::Sub)
    }

    /// Raw input selector.
    pub fn current_input(&self) -> u8 {
        self.byte(STATUS_CURRENT_INPUT)
    }

    pub fn input(&self) -> Option<Input> {
        Input::try_from(self.current_input()).ok()
    }

    pub fn is_muted(&self) -> bool {
        self.byte(STATUS_MUTED) != 0
    }

    /// Raw effect code stored for `input`.
    pub fn effect_code(&self, input: Input) -> u8 {
        self.byte(input.effect_offset())
    }

    /// Effect of the currently selected input.
    pub fn current_effect(&self) -> Option<Effect> {
        self.input()
            .and_then(|input| Effect::from_status_code(self.effect_code(input)))
    }

    pub fn spdif_status(&self) -> u8 {
        self.byte(STATUS_SPDIF_STATUS)
    }

    pub fn signal_status(&self) -> u8 {
        self.byte(STATUS_SIGNAL_STATUS)
    }

    /// Firmware version digits combined as `c + 10 * b + 100 * a`.
    pub fn version(&self) -> u16 {
        self.byte(STATUS_VERSION_C) as u16
            + 10 * self.byte(STATUS_VERSION_B) as u16
            + 100 * self.byte(STATUS_VERSION_A) as u16
    }

    pub fn standby(&self) -> u8 {
        self.byte(STATUS_STANDBY)
    }

    pub fn auto_standby(&self) -> u8 {
        self.byte(STATUS_AUTO_STANDBY)
    }

    pub fn is_powered_on(&self) -> bool {
        self.standby() == 0
    }
}

impl fmt::Debug for StatusFrame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "StatusFrame[{self}]")
    }
}

/// Space separated upper-case hex, e.g. `AA 0A 1C ...`.
impl fmt::Display for StatusFrame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, byte) in self.as_bytes().iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{byte:02X}")?;
        }
        Ok(())
    }
}

/// Response to [`REQUEST_TEMPERATURE`]. It carries no checksum; only the
/// model byte is checked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TemperatureFrame([u8; TEMPERATURE_FRAME_SIZE]);

impl TemperatureFrame {
    pub fn decode(frame: &[u8; TEMPERATURE_FRAME_SIZE]) -> Result<Self, Error> {
        if frame[TEMPERATURE_MODEL] != MODEL_TEMPERATURE {
            return Err(Error::Model {
                expected: MODEL_TEMPERATURE,
                actual: frame[TEMPERATURE_MODEL],
            });
        }
        Ok(Self(*frame))
    }

    /// Reading of the main temperature sensor.
    pub fn temperature(&self) -> u8 {
        self.0[TEMPERATURE_VALUE]
    }
}

/// Builds a status frame for tests: 28 payload bytes, checksum filled in.
#[cfg(test)]
pub(crate) fn test_frame(fill: impl FnOnce(&mut [u8])) -> Vec<u8> {
    let mut frame = vec![0u8; STATUS_BUFFER_SIZE];
    frame[0] = START_MARKER;
    frame[1] = MODEL_STATUS;
    frame[2] = (STATUS_BUFFER_SIZE - STATUS_OVERHEAD) as u8;
    fill(&mut frame);
    let last = frame.len() - 1;
    frame[last] = lrc(&frame);
    frame
}
