//! Smart-home bridge adapter.
//!
//! Translates JSON command messages into controller commands and renders the
//! light's state for publishing. The message transport itself lives outside
//! this crate; it hands payloads in and takes payloads out.

use log::debug;
use serde::{Deserialize, Serialize};
use tokio::sync::watch;

use crate::command::Command;
use crate::config::BridgeConfig;
use crate::errors::Error;
use crate::light::Light;
use crate::queue::CommandSender;
use crate::status::LightStatus;
use crate::types::{ColorRGBW, PowerMode};

type Result<T> = std::result::Result<T, Error>;

/// Color as sent by the bridge; channels may be out of range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BridgeColor {
    pub r: i64,
    pub g: i64,
    pub b: i64,
    #[serde(default)]
    pub w: i64,
}

/// A command message received from the bridge.
///
/// Every field is optional; present fields are applied color first, then
/// brightness, then effect, and power last so a light switched on shows the
/// requested look immediately.
///
/// ```
/// use rgbw_light_controller::{BridgeCommand, Command};
///
/// let message: BridgeCommand =
///     serde_json::from_str(r#"{"state": "ON", "brightness": 300, "effect": "Breath"}"#).unwrap();
/// assert_eq!(
///     message.into_commands(),
///     vec![
///         Command::SetBrightness(255),
///         Command::SelectEffect("Breath".into()),
///         Command::SetPower(true),
///     ]
/// );
/// ```
#[serde_with::skip_serializing_none]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BridgeCommand {
    pub state: Option<PowerMode>,
    pub brightness: Option<i64>,
    pub color: Option<BridgeColor>,
    pub effect: Option<String>,
}

impl BridgeCommand {
    pub fn into_commands(self) -> Vec<Command> {
        let mut commands = Vec::new();
        if let Some(c) = self.color {
            commands.push(Command::SetColor(ColorRGBW::clamped(c.r, c.g, c.b, c.w)));
        }
        if let Some(brightness) = self.brightness {
            commands.push(Command::SetBrightness(
                brightness.clamp(0, u8::MAX as i64) as i32
            ));
        }
        if let Some(effect) = self.effect {
            commands.push(Command::SelectEffect(effect));
        }
        if let Some(state) = self.state {
            commands.push(Command::SetPower(state.is_on()));
        }
        commands
    }
}

/// Connects one bridge to the controller.
///
/// It can only enqueue commands and read snapshots; it never touches the
/// light directly, so a missing bridge leaves local control unaffected.
#[derive(Debug)]
pub struct BridgeAdapter {
    config: BridgeConfig,
    commands: CommandSender,
    status: watch::Receiver<Light>,
}

impl BridgeAdapter {
    pub fn new(
        config: BridgeConfig,
        commands: CommandSender,
        status: watch::Receiver<Light>,
    ) -> Self {
        Self {
            config,
            commands,
            status,
        }
    }

    pub fn config(&self) -> &BridgeConfig {
        &self.config
    }

    /// Parse a command message and queue what it asks for.
    ///
    /// Returns how many commands were queued.
    pub fn handle_message(&self, payload: &[u8]) -> Result<usize> {
        let message: BridgeCommand = serde_json::from_slice(payload).map_err(Error::JsonLoad)?;
        debug!("Bridge message: {message:?}");
        let commands = message.into_commands();
        let count = commands.len();
        for command in commands {
            self.commands.enqueue(command)?;
        }
        Ok(count)
    }

    /// Snapshot of the light as of the last completed tick.
    pub fn status(&self) -> LightStatus {
        LightStatus::from(&*self.status.borrow())
    }

    /// The status encoded for the state topic.
    pub fn state_payload(&self) -> Result<Vec<u8>> {
        serde_json::to_vec(&self.status()).map_err(Error::JsonDump)
    }

    /// Wait until the light changes, then return the new status.
    pub async fn changed(&mut self) -> Result<LightStatus> {
        self.status
            .changed()
            .await
            .map_err(|_| Error::ChannelClosed("status"))?;
        Ok(LightStatus::from(&*self.status.borrow_and_update()))
    }
}
