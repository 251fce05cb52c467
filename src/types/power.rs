//! Power state for light control.

use serde::{Deserialize, Serialize};

/// Power state as exchanged with the bridge.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "UPPERCASE")]
pub enum PowerMode {
    /// The light is emitting
    On,
    /// The light is dark
    Off,
}

impl PowerMode {
    pub fn is_on(&self) -> bool {
        matches!(self, PowerMode::On)
    }
}

impl From<bool> for PowerMode {
    fn from(on: bool) -> Self {
        if on { PowerMode::On } else { PowerMode::Off }
    }
}
