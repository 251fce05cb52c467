//! Time-driven rendering of the animated effects.
//!
//! Effects are evaluated per tick rather than per millisecond, so their speed
//! follows the controller's tick period. Rendering never touches the stored
//! color; it produces a copy of the light showing the frame for `tick`.

use crate::light::Light;
use crate::types::{ColorRGBW, Effect};

/// Ticks for one full pass around the color wheel.
const RAINBOW_PERIOD: u64 = 300;
/// Ticks for one dim-bright-dim breath.
const BREATH_PERIOD: u64 = 150;
/// Ticks spent fading from one palette color to the next.
const COLORFADE_SLOW_SEGMENT: u64 = 200;
const COLORFADE_FAST_SEGMENT: u64 = 50;
/// Ticks the flash stays on, then off.
const FLASH_HALF_PERIOD: u64 = 25;

const FADE_PALETTE: [ColorRGBW; 4] = [
    ColorRGBW::new(255, 0, 0, 0),
    ColorRGBW::new(0, 255, 0, 0),
    ColorRGBW::new(0, 0, 255, 0),
    ColorRGBW::new(0, 0, 0, 255),
];

/// The light as it should appear on `tick`.
///
/// Dark lights and static effects render as themselves.
pub fn render(light: &Light, tick: u64) -> Light {
    let effect = match light.active_effect() {
        Some(effect) if light.power() && effect.is_animated() => effect,
        _ => return light.clone(),
    };
    let color = match effect {
        Effect::Solid => light.color(),
        Effect::Rainbow => rainbow(tick),
        Effect::Breath => light.color().scale(breath_level(tick)),
        Effect::ColorfadeSlow => colorfade(tick, COLORFADE_SLOW_SEGMENT),
        Effect::ColorfadeFast => colorfade(tick, COLORFADE_FAST_SEGMENT),
        Effect::Flash => flash(light.color(), tick),
    };
    light.with_color(color)
}

/// Position 0-255 around the red-green-blue wheel.
fn wheel(pos: u8) -> ColorRGBW {
    match pos {
        0..=84 => ColorRGBW::new(255 - pos * 3, pos * 3, 0, 0),
        85..=169 => {
            let p = pos - 85;
            ColorRGBW::new(0, 255 - p * 3, p * 3, 0)
        }
        _ => {
            let p = pos - 170;
            ColorRGBW::new(p * 3, 0, 255 - p * 3, 0)
        }
    }
}

fn rainbow(tick: u64) -> ColorRGBW {
    wheel((tick % RAINBOW_PERIOD * 256 / RAINBOW_PERIOD) as u8)
}

/// Triangle wave from 0 up to 255 and back over one period.
fn breath_level(tick: u64) -> u8 {
    let half = BREATH_PERIOD / 2;
    let phase = tick % BREATH_PERIOD;
    let rising = if phase < half { phase } else { BREATH_PERIOD - phase };
    (rising * 255 / half).min(255) as u8
}

/// Linear blend, `amount` 0 keeps `a`, 255 gives `b`.
fn blend8(a: u8, b: u8, amount: u8) -> u8 {
    let delta = b as i32 - a as i32;
    (a as i32 + delta * amount as i32 / 255) as u8
}

fn colorfade(tick: u64, segment: u64) -> ColorRGBW {
    let index = (tick / segment) as usize % FADE_PALETTE.len();
    let from = FADE_PALETTE[index];
    let to = FADE_PALETTE[(index + 1) % FADE_PALETTE.len()];
    let amount = (tick % segment * 255 / segment) as u8;
    ColorRGBW::new(
        blend8(from.red, to.red, amount),
        blend8(from.green, to.green, amount),
        blend8(from.blue, to.blue, amount),
        blend8(from.white, to.white, amount),
    )
}

fn flash(color: ColorRGBW, tick: u64) -> ColorRGBW {
    if (tick / FLASH_HALF_PERIOD) % 2 == 0 {
        color
    } else {
        ColorRGBW::BLACK
    }
}
