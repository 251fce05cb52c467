//! Read-only status snapshots for outward reporting.

use serde::{Deserialize, Serialize};

use crate::light::Light;
use crate::types::{ColorRGBW, Effect, PowerMode};

/// The light's state in the shape the bridge publishes.
#[serde_with::skip_serializing_none]
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct LightStatus {
    state: PowerMode,
    brightness: u8,
    color: ColorRGBW,
    effect: Option<Effect>,
    effect_list: Vec<Effect>,
}

impl LightStatus {
    /// Check if the light is emitting.
    pub fn emitting(&self) -> bool {
        self.state.is_on()
    }

    pub fn state(&self) -> PowerMode {
        self.state
    }

    pub fn brightness(&self) -> u8 {
        self.brightness
    }

    pub fn color(&self) -> &ColorRGBW {
        &self.color
    }

    pub fn effect(&self) -> Option<Effect> {
        self.effect
    }

    /// Effects the light accepts, in cycling order.
    pub fn effect_list(&self) -> &[Effect] {
        &self.effect_list
    }
}

impl From<&Light> for LightStatus {
    fn from(light: &Light) -> Self {
        LightStatus {
            state: PowerMode::from(light.power()),
            brightness: light.brightness(),
            color: light.color(),
            effect: light.active_effect(),
            effect_list: light.effects().iter().copied().collect(),
        }
    }
}
