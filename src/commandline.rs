use clap::{Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use std::path::PathBuf;
use std::time::Duration;
use z906_lib::protocol as proto;

fn parse_input(s: &str) -> Result<proto::Input, String> {
    let index = s
        .parse::<u8>()
        .map_err(|e| format!("Invalid input number format: {e}"))?;
    proto::Input::try_from(index).map_err(|e| e.to_string())
}

fn parse_effect(s: &str) -> Result<proto::Effect, String> {
    s.parse::<proto::Effect>().map_err(|e| e.to_string())
}

fn parse_channel(s: &str) -> Result<proto::Channel, String> {
    s.parse::<proto::Channel>().map_err(|e| e.to_string())
}

fn parse_byte(s: &str) -> Result<u8, String> {
    clap_num::maybe_hex::<u8>(s).map_err(|e| format!("Invalid byte value: {e}"))
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Toggle {
    On,
    Off,
    State,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Switch {
    On,
    Off,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum VolumeAction {
    /// Print the level (0 to 255).
    Get,
    /// Set the level (0 to 255, scaled to the amplifier's 43 steps).
    Set {
        #[arg(value_parser = parse_byte)]
        value: u8,
    },
    /// Raise the level by one amplifier step.
    Up,
    /// Lower the level by one amplifier step.
    Down,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum CliCommands {
    /// Run in daemon mode: continuously poll the status and print it.
    Daemon {
        /// Interval for polling the status (e.g., "10s", "1m")
        #[arg(value_parser = humantime::parse_duration, short, long, default_value = "60sec")]
        poll_interval: Duration,

        /// Print each status as a JSON line.
        #[arg(long)]
        json: bool,
    },

    /// Read and display the full amplifier status.
    Status {
        /// Print the status as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Print the raw status frame as hex.
    Dump,

    /// Print the firmware version.
    Version,

    /// Switch the amplifier on or off, or show the power state.
    /// Switching off also resets the power-up timer and saves to EEPROM.
    #[clap(verbatim_doc_comment)]
    Power {
        #[arg(value_enum, default_value_t = Toggle::State)]
        action: Toggle,
    },

    /// Mute or unmute, or show the mute state.
    Mute {
        #[arg(value_enum, default_value_t = Toggle::State)]
        action: Toggle,
    },

    /// Enable or disable 5.1 decoding.
    Decode {
        #[arg(value_enum)]
        action: Switch,
    },

    /// Unblock (on) or block (off) the physical inputs.
    Inputs {
        #[arg(value_enum)]
        action: Switch,
    },

    /// Select an input, or show the current one.
    /// Inputs: 0 TRS 5.1, 1 RCA 2.0, 2 Optical 1, 3 Optical 2, 4 Coaxial, 5 Aux.
    /// Without --effect, RCA 2.0 and Aux get 3D, all others no effect.
    #[clap(verbatim_doc_comment)]
    Input {
        #[arg(value_parser = parse_input)]
        input: Option<proto::Input>,

        /// Effect to apply: 3d, 2.1, 4.1 or none.
        #[arg(short, long, value_parser = parse_effect)]
        effect: Option<proto::Effect>,
    },

    /// Apply an effect to the current input, or show the current effect.
    Effect {
        /// Effect to apply: 3d, 2.1, 4.1 or none.
        #[arg(value_parser = parse_effect)]
        effect: Option<proto::Effect>,
    },

    /// Read or change a volume level.
    Volume {
        /// Channel: main, rear, center or sub.
        #[arg(value_parser = parse_channel)]
        channel: proto::Channel,

        #[command(subcommand)]
        action: Option<VolumeAction>,
    },

    /// Read the amplifier temperature.
    Temperature,

    /// Send a raw single-byte command and print the answer.
    /// Can be specified in decimal or hexadecimal (e.g., "0x38").
    #[clap(verbatim_doc_comment)]
    Command {
        #[arg(value_parser = parse_byte)]
        opcode: u8,
    },

    /// Read a field by code: 0xF0 version, 0x34 power, 0xF1 input,
    /// 0x03..0x06 volume levels, anything else is a raw status frame offset.
    #[clap(verbatim_doc_comment)]
    Read {
        #[arg(value_parser = parse_byte)]
        field: u8,
    },

    /// Write a register through the status frame.
    /// 0x03..0x06 are volume levels (0 to 255), anything else is a raw offset.
    #[clap(verbatim_doc_comment)]
    Write {
        #[arg(value_parser = parse_byte)]
        register: u8,
        #[arg(value_parser = parse_byte)]
        value: u8,
    },

    /// Save the current settings to the amplifier's EEPROM.
    Save,

    /// Enable 5.1 decoding, unmute and unblock the inputs.
    Init,
}

const fn about_text() -> &'static str {
    "Z906 control CLI - Drive a Logitech Z906 amplifier through its console serial port."
}

#[derive(Parser, Debug)]
#[command(name="z906ctl", author, version, about=about_text(), long_about = None, propagate_version = true)]
pub struct CliArgs {
    /// Configure verbosity of logging output.
    /// -v for info, -vv for debug, -vvv for trace. Default is warn.
    #[command(flatten)]
    pub verbose: Verbosity<WarnLevel>,

    /// Serial port device name.
    /// Examples: "/dev/ttyUSB0" (Linux), "COM3" (Windows).
    #[arg(global = true, short, long, verbatim_doc_comment)]
    pub device: Option<String>,

    /// YAML file providing device, timeout and deadtime.
    /// Command line options take precedence.
    #[arg(global = true, long, verbatim_doc_comment)]
    pub config_file: Option<PathBuf>,

    /// Upper bound for waiting on an answer.
    /// Examples: "1s", "500ms".
    #[arg(global = true, long, value_parser = humantime::parse_duration, verbatim_doc_comment)]
    pub timeout: Option<Duration>,

    /// Pause before each transmission, needed by the amplifier to turn the
    /// half-duplex line around.
    /// Examples: "5ms", "10ms".
    #[arg(global = true, long, value_parser = humantime::parse_duration, verbatim_doc_comment)]
    pub deadtime: Option<Duration>,

    #[command(subcommand)]
    pub command: CliCommands,
}
