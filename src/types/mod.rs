//! Value types for light control parameters.

mod color;
mod effect;
mod power;

pub(crate) use color::clamp_channel;
pub use color::ColorRGBW;
pub use effect::Effect;
pub use power::PowerMode;
