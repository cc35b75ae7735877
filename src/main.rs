//! Z906 control CLI
//!
//! A command-line interface (CLI) application for driving a Logitech Z906
//! 5.1 amplifier through the serial console port of its control unit.
//!
//! This tool allows users to:
//! - Read the full status, the raw status frame, the firmware version and the
//!   temperature.
//! - Switch power, mute, 5.1 decoding and input blocking.
//! - Select inputs and effects.
//! - Read and change the volume levels of all channels.
//! - Send raw commands and read or write raw status frame registers.
//! - Save the settings to the amplifier's EEPROM.
//! - Run in a continuous daemon mode printing the status.
//!
//! The CLI leverages the `z906_lib` crate for protocol definitions and client operations.

use anyhow::{Context, Result};
use clap::Parser;
use dialoguer::Confirm;
use flexi_logger::{Logger, LoggerHandle};
use log::*;
use std::panic;
use z906_lib::{client::Z906, protocol as proto, report::StatusReport, serial::SerialPort};

mod commandline;
mod config;

use commandline::{CliCommands, Switch, Toggle, VolumeAction};

type Amplifier = Z906<SerialPort>;

fn logging_init(loglevel: LevelFilter) -> LoggerHandle {
    let log_handle = Logger::try_with_env_or_str(loglevel.as_str())
        .expect("Cannot init logging")
        .start()
        .expect("Cannot start logging");

    panic::set_hook(Box::new(|panic_info| {
        let (filename, line, column) = panic_info
            .location()
            .map(|loc| (loc.file(), loc.line(), loc.column()))
            .unwrap_or(("<unknown_file>", 0, 0));

        let cause_str = if let Some(s) = panic_info.payload().downcast_ref::<&str>() {
            *s
        } else if let Some(s) = panic_info.payload().downcast_ref::<String>() {
            s.as_str()
        } else {
            "<unknown_panic_cause>"
        };

        error!(
            target: "panic",
            "Thread '{}' panicked at '{}': {}:{} - Cause: {}",
            std::thread::current().name().unwrap_or("<unnamed>"),
            filename,
            line,
            column,
            cause_str
        );
    }));
    log_handle
}

fn on_off(value: bool) -> &'static str {
    if value { "on" } else { "off" }
}

fn read_report(amp: &mut Amplifier) -> Result<StatusReport> {
    let frame = amp.poll().with_context(|| "Cannot read status")?;
    Ok(StatusReport::new(&frame, amp.muted(), amp.decode_mode()))
}

fn print_report(report: &StatusReport, json: bool) -> Result<()> {
    if json {
        println!(
            "{}",
            serde_json::to_string(report).context("Cannot serialize status")?
        );
    } else {
        println!("{report}");
    }
    Ok(())
}

macro_rules! print_command {
    ($device:expr, $command:expr, $what:expr) => {
        $device
            .command($command)
            .with_context(|| format!("Cannot {}", $what))?;
        println!("Done: {}", $what);
    };
}

/// Handles the save command.
///
/// Writing the EEPROM wears it, so the user has to confirm.
fn handle_save(amp: &mut Amplifier) -> Result<()> {
    info!("Executing: Save to EEPROM");
    if !Confirm::new()
        .with_prompt("Write the current settings to the amplifier's EEPROM?")
        .default(false)
        .show_default(true)
        .interact()
        .context("Failed to get user confirmation.")?
    {
        info!("Save aborted by user.");
        return Ok(());
    }
    print_command!(amp, proto::Command::EepromSave, "save settings to EEPROM");
    Ok(())
}

fn handle_volume(
    amp: &mut Amplifier,
    channel: proto::Channel,
    action: Option<VolumeAction>,
) -> Result<()> {
    match action.unwrap_or(VolumeAction::Get) {
        VolumeAction::Get => {
            info!("Executing: Read {channel} volume");
            let level = amp
                .volume(channel)
                .with_context(|| format!("Cannot read {channel} volume"))?;
            println!("{channel} volume: {level}");
        }
        VolumeAction::Set { value } => {
            info!("Executing: Set {channel} volume to {value}");
            amp.set_volume(channel, value)
                .with_context(|| format!("Failed to set {channel} volume to {value}"))?;
            println!("{channel} volume set to {value}.");
        }
        VolumeAction::Up => {
            print_command!(amp, channel.up(), format!("raise {channel} volume"));
        }
        VolumeAction::Down => {
            print_command!(amp, channel.down(), format!("lower {channel} volume"));
        }
    }
    Ok(())
}

fn run_daemon(amp: &mut Amplifier, poll_interval: std::time::Duration, json: bool) -> Result<()> {
    let interval = poll_interval.max(amp.deadtime());
    info!("Starting daemon mode: json={json}, interval={interval:?}");
    loop {
        debug!("Daemon: Reading status...");
        match read_report(amp) {
            Ok(report) => print_report(&report, json)?,
            // the snapshot stays valid, try again on the next round
            Err(error) => warn!("Daemon: {error:#}"),
        }
        std::thread::sleep(interval);
    }
}

fn main() -> Result<()> {
    let args = commandline::CliArgs::parse();

    // 1. Initialize logging as early as possible
    let _log_handle = logging_init(args.verbose.log_level_filter());
    info!(
        "Z906 CLI started. Log level: {}",
        args.verbose.log_level_filter()
    );

    // 2. Resolve connection settings and open the port
    let settings = config::Settings::resolve(&args)?;
    info!(
        "Opening {} (timeout {:?}, deadtime {:?})...",
        settings.device, settings.link.timeout, settings.link.deadtime
    );
    let mut amp = z906_lib::serial::open(&settings.device, settings.link)
        .with_context(|| format!("Cannot open serial port {}", settings.device))?;

    // 3. Liveness probe, the daemon tolerates a sleeping amplifier
    if !matches!(args.command, CliCommands::Daemon { .. }) {
        let version = amp
            .check_connection()
            .with_context(|| format!("No Z906 amplifier answering on {}", settings.device))?;
        info!("Amplifier found, firmware version {version}");
    }

    // 4. Execute the command
    match args.command {
        CliCommands::Daemon {
            poll_interval,
            json,
        } => run_daemon(&mut amp, poll_interval, json)?,
        CliCommands::Status { json } => {
            info!("Executing: Read Status");
            print_report(&read_report(&mut amp)?, json)?;
        }
        CliCommands::Dump => {
            info!("Executing: Dump Status Frame");
            let frame = amp.poll().with_context(|| "Cannot read status")?;
            println!("{frame}");
        }
        CliCommands::Version => {
            let version = amp
                .read_field(proto::Field::Version)
                .with_context(|| "Cannot read firmware version")?;
            println!("Firmware version: {version}");
        }
        CliCommands::Power { action } => match action {
            Toggle::On => {
                info!("Executing: Power On");
                amp.power(true).with_context(|| "Failed to power on")?;
                println!("Amplifier switched on.");
            }
            Toggle::Off => {
                info!("Executing: Power Off");
                amp.power(false).with_context(|| "Failed to power off")?;
                println!("Amplifier switched off.");
            }
            Toggle::State => {
                let powered = amp
                    .read_field(proto::Field::Power)
                    .with_context(|| "Cannot read power state")?;
                println!("Power: {}", if powered != 0 { "on" } else { "standby" });
            }
        },
        CliCommands::Mute { action } => match action {
            Toggle::On => {
                print_command!(amp, proto::Command::MuteOn, "mute");
            }
            Toggle::Off => {
                print_command!(amp, proto::Command::MuteOff, "unmute");
            }
            Toggle::State => {
                let frame = amp.poll().with_context(|| "Cannot read status")?;
                println!("Muted: {}", on_off(frame.is_muted()));
            }
        },
        CliCommands::Decode { action } => match action {
            Switch::On => {
                print_command!(amp, proto::Command::EnableDecode, "enable 5.1 decoding");
            }
            Switch::Off => {
                print_command!(amp, proto::Command::DisableDecode, "disable 5.1 decoding");
            }
        },
        CliCommands::Inputs { action } => match action {
            Switch::On => {
                print_command!(amp, proto::Command::UnblockInputs, "unblock inputs");
            }
            Switch::Off => {
                print_command!(amp, proto::Command::BlockInputs, "block inputs");
            }
        },
        CliCommands::Input {
            input: Some(input),
            effect,
        } => {
            info!("Executing: Select Input {input} (effect {effect:?})");
            amp.select_input(input, effect)
                .with_context(|| format!("Failed to select input {input}"))?;
            println!("Input {input} selected.");
        }
        CliCommands::Input { input: None, .. } => {
            let index = amp
                .read_field(proto::Field::CurrentInput)
                .with_context(|| "Cannot read current input")?;
            match u8::try_from(index).ok().map(proto::Input::try_from) {
                Some(Ok(input)) => println!("Current input: {input}"),
                _ => println!("Current input: unknown ({index})"),
            }
        }
        CliCommands::Effect {
            effect: Some(effect),
        } => {
            print_command!(amp, effect.command(), format!("apply effect {effect}"));
        }
        CliCommands::Effect { effect: None } => {
            amp.poll().with_context(|| "Cannot read status")?;
            match amp.current_effect() {
                Some(effect) => println!("Current effect: {effect}"),
                None => println!("Current effect: unknown"),
            }
        }
        CliCommands::Volume { channel, action } => handle_volume(&mut amp, channel, action)?,
        CliCommands::Temperature => {
            let temperature = amp
                .temperature()
                .with_context(|| "Cannot read temperature")?;
            println!("Temperature: {temperature}");
        }
        CliCommands::Command { opcode } => {
            info!("Executing: Raw Command {opcode:#04x}");
            let answer = amp
                .send_command(opcode)
                .with_context(|| format!("Command {opcode:#04x} failed"))?;
            println!("Command {opcode:#04x} answered {answer:#04x}");
        }
        CliCommands::Read { field } => {
            let field = proto::Field::from(field);
            let value = amp
                .read_field(field)
                .with_context(|| format!("Cannot read field {:#04x}", field.code()))?;
            println!("Field {:#04x}: {value}", field.code());
        }
        CliCommands::Write { register, value } => {
            info!("Executing: Write Register {register:#04x} = {value}");
            amp.write_register(register, value)
                .with_context(|| format!("Failed to write register {register:#04x}"))?;
            println!("Register {register:#04x} set to {value}.");
        }
        CliCommands::Save => handle_save(&mut amp)?,
        CliCommands::Init => {
            info!("Executing: Initialize");
            amp.initialize().with_context(|| "Failed to initialize")?;
            println!("Amplifier initialized: 5.1 decoding on, unmuted.");
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn on_off_labels() {
        assert_eq!(on_off(true), "on");
        assert_eq!(on_off(false), "off");
    }
}
