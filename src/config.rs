//! Controller and bridge configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Settings for the control loop.
///
/// ```
/// use rgbw_light_controller::ControllerConfig;
///
/// let config: ControllerConfig = serde_json::from_str(r#"{"tick_ms": 10}"#).unwrap();
/// assert_eq!(config.tick_period().as_millis(), 10);
/// assert_eq!(config.brightness_step, ControllerConfig::DEFAULT_BRIGHTNESS_STEP);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ControllerConfig {
    /// Fixed tick period in milliseconds.
    pub tick_ms: u64,
    /// Brightness change applied by one increment/decrement command.
    pub brightness_step: u8,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            tick_ms: Self::DEFAULT_TICK_MS,
            brightness_step: Self::DEFAULT_BRIGHTNESS_STEP,
        }
    }
}

impl ControllerConfig {
    pub const DEFAULT_TICK_MS: u64 = 20;
    pub const DEFAULT_BRIGHTNESS_STEP: u8 = 8;

    /// The tick period; never zero.
    pub fn tick_period(&self) -> Duration {
        Duration::from_millis(self.tick_ms.max(1))
    }
}

/// Connection parameters of the smart-home bridge.
///
/// The controller never interprets these beyond deriving default topic names;
/// they are handed through to whatever transport carries bridge messages.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BridgeConfig {
    pub host: String,
    pub port: u16,
    pub device_id: Uuid,
    pub state_topic: Option<String>,
    pub command_topic: Option<String>,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            host: String::from("localhost"),
            port: Self::DEFAULT_PORT,
            device_id: Uuid::new_v4(),
            state_topic: None,
            command_topic: None,
        }
    }
}

impl BridgeConfig {
    pub const DEFAULT_PORT: u16 = 1883;

    pub fn new(host: &str, port: u16) -> Self {
        Self {
            host: host.to_string(),
            port,
            ..Self::default()
        }
    }

    pub fn state_topic(&self) -> String {
        self.state_topic
            .clone()
            .unwrap_or_else(|| format!("rgbw/{}/state", self.device_id))
    }

    pub fn command_topic(&self) -> String {
        self.command_topic
            .clone()
            .unwrap_or_else(|| format!("rgbw/{}/set", self.device_id))
    }
}
