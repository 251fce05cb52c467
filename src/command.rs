//! Input commands accepted by the controller.

use serde::{Deserialize, Serialize};

use crate::types::{ColorRGBW, Effect};

/// One discrete user or remote intent.
///
/// The vocabulary is closed; commands are tagged by name when serialized so
/// producers in other processes can speak it:
///
/// ```
/// use rgbw_light_controller::Command;
///
/// let command: Command =
///     serde_json::from_str(r#"{"command": "adjust_brightness", "value": -20}"#).unwrap();
/// assert_eq!(command, Command::AdjustBrightness(-20));
///
/// let command: Command = serde_json::from_str(r#"{"command": "toggle_power"}"#).unwrap();
/// assert_eq!(command, Command::TogglePower);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "command", content = "value", rename_all = "snake_case")]
pub enum Command {
    /// Raise brightness by the configured step
    IncreaseBrightness,
    /// Lower brightness by the configured step
    DecreaseBrightness,
    /// Change brightness by a signed amount
    AdjustBrightness(i32),
    /// Set brightness outright; clamped to 0-255
    SetBrightness(i32),
    TogglePower,
    SetPower(bool),
    /// Cycle to the following effect of the light's effect set
    NextEffect,
    /// Activate an effect by name; unknown names are ignored
    SelectEffect(String),
    SetColor(ColorRGBW),
}

impl Command {
    pub fn select_effect(effect: Effect) -> Self {
        Command::SelectEffect(effect.to_string())
    }
}
