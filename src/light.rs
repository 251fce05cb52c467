//! The fixture's authoritative state.

use std::collections::BTreeSet;

use log::debug;
use serde::Serialize;
use strum::IntoEnumIterator;

use crate::serial::SerialCommand;
use crate::types::{ColorRGBW, Effect, clamp_channel};

/// Represents one RGBW fixture.
///
/// Channel values and brightness are always within 0-255; every setter that
/// takes a wider integer clamps. Brightness is applied only when a
/// [`SerialCommand`] is built, so the stored color survives dimming.
///
/// Two lights are equal only if every field matches, including the effect
/// set; the controller relies on this to skip redundant hardware writes.
///
/// # Example
///
/// ```
/// use rgbw_light_controller::{ColorRGBW, Light};
///
/// let mut light = Light::new();
/// light.set_color(&ColorRGBW::new(255, 0, 0, 0));
/// light.set_brightness(128);
/// light.set_power(true);
///
/// let command = light.serial_command();
/// assert_eq!(command.channels(), [128, 0, 0, 0]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Light {
    color: ColorRGBW,
    brightness: u8,
    power: bool,
    active_effect: Option<Effect>,
    effects: BTreeSet<Effect>,
}

impl Default for Light {
    fn default() -> Self {
        Self::new()
    }
}

impl Light {
    /// A dark light with full white stored and every effect available.
    pub fn new() -> Self {
        Light {
            color: ColorRGBW::new(0, 0, 0, u8::MAX),
            brightness: u8::MAX,
            power: false,
            active_effect: None,
            effects: Effect::iter().collect(),
        }
    }

    pub fn color(&self) -> ColorRGBW {
        self.color
    }

    pub fn brightness(&self) -> u8 {
        self.brightness
    }

    pub fn power(&self) -> bool {
        self.power
    }

    pub fn active_effect(&self) -> Option<Effect> {
        self.active_effect
    }

    pub fn effects(&self) -> &BTreeSet<Effect> {
        &self.effects
    }

    pub fn set_color(&mut self, color: &ColorRGBW) {
        self.color = *color;
    }

    pub fn set_brightness(&mut self, brightness: i64) {
        self.brightness = clamp_channel(brightness);
    }

    pub fn adjust_brightness(&mut self, delta: i64) {
        self.set_brightness(self.brightness as i64 + delta);
    }

    pub fn set_power(&mut self, on: bool) {
        self.power = on;
    }

    pub fn toggle_power(&mut self) {
        self.power = !self.power;
    }

    /// Activate the effect called `name`.
    ///
    /// Returns `false`, leaving the light untouched, if the name is unknown
    /// or not part of this light's effect set.
    pub fn select_effect(&mut self, name: &str) -> bool {
        match name.parse::<Effect>() {
            Ok(effect) if self.effects.contains(&effect) => {
                self.active_effect = Some(effect);
                true
            }
            _ => {
                debug!("ignoring unsupported effect {name:?}");
                false
            }
        }
    }

    /// Move to the following effect of the set, wrapping around.
    ///
    /// An unset effect behaves like [`Effect::Solid`].
    pub fn next_effect(&mut self) {
        let current = self.active_effect.unwrap_or(Effect::Solid);
        let next = self
            .effects
            .range((std::ops::Bound::Excluded(current), std::ops::Bound::Unbounded))
            .next()
            .or_else(|| self.effects.iter().next());
        if let Some(effect) = next {
            self.active_effect = Some(*effect);
        }
    }

    /// A copy of this light showing `color` instead of the stored color.
    pub(crate) fn with_color(&self, color: ColorRGBW) -> Light {
        Light {
            color,
            ..self.clone()
        }
    }

    /// The intensities to put on the wire: brightness-scaled, or all zero
    /// while powered off.
    pub fn serial_command(&self) -> SerialCommand {
        if !self.power {
            return SerialCommand::OFF;
        }
        let [red, green, blue, white] = self.color.scale(self.brightness).channels();
        SerialCommand::new(red, green, blue, white)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::hash_map::DefaultHasher;
    use std::hash::{Hash, Hasher};

    fn hash_of(light: &Light) -> u64 {
        let mut hasher = DefaultHasher::new();
        light.hash(&mut hasher);
        hasher.finish()
    }

    #[test]
    fn test_defaults() {
        let light = Light::new();
        assert_eq!(light.color(), ColorRGBW::new(0, 0, 0, 255));
        assert_eq!(light.brightness(), 255);
        assert!(!light.power());
        assert_eq!(light.active_effect(), None);
        assert_eq!(light.effects().len(), 6);
    }

    #[test]
    fn test_brightness_scaling_truncates() {
        let mut light = Light::new();
        light.set_color(&ColorRGBW::new(255, 200, 3, 0));
        light.set_brightness(128);
        light.set_power(true);
        assert_eq!(light.serial_command().channels(), [128, 100, 1, 0]);
    }

    #[test]
    fn test_power_off_zeroes_output() {
        let mut light = Light::new();
        light.set_color(&ColorRGBW::new(10, 20, 30, 40));
        light.set_power(true);
        light.toggle_power();
        assert_eq!(light.serial_command(), SerialCommand::OFF);
    }

    #[test]
    fn test_brightness_is_clamped() {
        let mut light = Light::new();
        light.adjust_brightness(500);
        assert_eq!(light.brightness(), 255);
        light.set_brightness(-3);
        assert_eq!(light.brightness(), 0);
        light.adjust_brightness(-1);
        assert_eq!(light.brightness(), 0);
    }

    #[test]
    fn test_unknown_effect_is_noop() {
        let mut light = Light::new();
        assert!(light.select_effect("Rainbow"));
        assert!(!light.select_effect("not-a-real-effect"));
        assert_eq!(light.active_effect(), Some(Effect::Rainbow));
    }

    #[test]
    fn test_next_effect_cycles_in_order() {
        let mut light = Light::new();
        let mut seen = Vec::new();
        for _ in 0..7 {
            light.next_effect();
            seen.push(light.active_effect().unwrap());
        }
        assert_eq!(
            seen,
            vec![
                Effect::Rainbow,
                Effect::Breath,
                Effect::ColorfadeSlow,
                Effect::ColorfadeFast,
                Effect::Flash,
                Effect::Solid,
                Effect::Rainbow,
            ]
        );
    }

    #[test]
    fn test_equality_covers_every_field() {
        let base = Light::new();
        assert_eq!(base, Light::new());
        assert_eq!(hash_of(&base), hash_of(&Light::new()));

        let mut changed = base.clone();
        changed.set_color(&ColorRGBW::new(1, 0, 0, 255));
        assert_ne!(base, changed);

        let mut changed = base.clone();
        changed.set_brightness(254);
        assert_ne!(base, changed);

        let mut changed = base.clone();
        changed.toggle_power();
        assert_ne!(base, changed);

        let mut changed = base.clone();
        changed.select_effect("Solid");
        assert_ne!(base, changed);

        let mut changed = base.clone();
        changed.effects.remove(&Effect::Flash);
        assert_ne!(base, changed);
    }
}
