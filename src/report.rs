//! Read-only status view handed to remote clients.
use crate::protocol::{Input, StatusFrame};
use std::fmt;

#[cfg(feature = "serde")]
use serde::Serialize;

/// Decoded status frame plus the driver's cached mute and decode flags.
///
/// Levels are in device units (0..=43), effect slots are raw effect codes.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct StatusReport {
    pub main_level: u8,
    pub center_level: u8,
    pub rear_level: u8,
    pub sub_level: u8,
    pub current_input: u8,
    /// Effect code of the current input, `None` for an unknown selector.
    pub current_fx: Option<u8>,
    pub muted: bool,
    pub decode_mode: bool,
    pub fx_input_1: u8,
    pub fx_input_2: u8,
    pub fx_input_3: u8,
    pub fx_input_4: u8,
    pub fx_input_5: u8,
    pub fx_input_aux: u8,
    pub spdif_status: u8,
    pub signal_status: u8,
    pub stby: u8,
    pub auto_stby: u8,
}

impl StatusReport {
    pub fn new(frame: &StatusFrame, muted: bool, decode_mode: bool) -> Self {
        Self {
            main_level: frame.main_level(),
            center_level: frame.center_level(),
            rear_level: frame.rear_level(),
            sub_level: frame.sub_level(),
            current_input: frame.current_input(),
            current_fx: frame.input().map(|input| frame.effect_code(input)),
            muted,
            decode_mode,
            fx_input_1: frame.effect_code(Input::Trs51),
            fx_input_2: frame.effect_code(Input::Rca20),
            fx_input_3: frame.effect_code(Input::Optical1),
            fx_input_4: frame.effect_code(Input::Optical2),
            fx_input_5: frame.effect_code(Input::Coaxial),
            fx_input_aux: frame.effect_code(Input::Aux),
            spdif_status: frame.spdif_status(),
            signal_status: frame.signal_status(),
            stby: frame.standby(),
            auto_stby: frame.auto_standby(),
        }
    }
}

impl fmt::Display for StatusReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let input = Input::try_from(self.current_input)
            .map(|input| input.to_string())
            .unwrap_or_else(|_| format!("unknown ({})", self.current_input));
        writeln!(f, "Power:         {}", if self.stby == 0 { "on" } else { "standby" })?;
        writeln!(f, "Input:         {input}")?;
        match self.current_fx {
            Some(code) => writeln!(f, "Effect:        {code}")?,
            None => writeln!(f, "Effect:        -")?,
        }
        writeln!(
            f,
            "Levels:        main {} / rear {} / center {} / sub {}",
            self.main_level, self.rear_level, self.center_level, self.sub_level
        )?;
        writeln!(f, "Muted:         {}", self.muted)?;
        writeln!(f, "Decode 5.1:    {}", self.decode_mode)?;
        writeln!(
            f,
            "Effect slots:  {} {} {} {} {} {}",
            self.fx_input_1,
            self.fx_input_2,
            self.fx_input_3,
            self.fx_input_4,
            self.fx_input_5,
            self.fx_input_aux
        )?;
        writeln!(f, "S/PDIF status: {}", self.spdif_status)?;
        writeln!(f, "Signal status: {}", self.signal_status)?;
        write!(f, "Auto standby:  {}", self.auto_stby)
    }
}
