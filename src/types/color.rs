//! RGBW channel values.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::errors::Error;

/// Clamp any integer input into a valid 0-255 channel value.
pub(crate) fn clamp_channel(value: i64) -> u8 {
    value.clamp(0, u8::MAX as i64) as u8
}

/// An RGBW color (RGB + white, 0-255 each).
#[derive(Default, Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ColorRGBW {
    #[serde(rename = "r")]
    pub red: u8,
    #[serde(rename = "g")]
    pub green: u8,
    #[serde(rename = "b")]
    pub blue: u8,
    #[serde(rename = "w")]
    pub white: u8,
}

impl ColorRGBW {
    pub const BLACK: ColorRGBW = ColorRGBW::new(0, 0, 0, 0);

    pub const fn new(red: u8, green: u8, blue: u8, white: u8) -> Self {
        Self {
            red,
            green,
            blue,
            white,
        }
    }

    /// Build a color from unchecked inputs, clamping each channel to 0-255.
    ///
    /// ```
    /// use rgbw_light_controller::ColorRGBW;
    ///
    /// let color = ColorRGBW::clamped(300, -4, 128, 255);
    /// assert_eq!(color, ColorRGBW::new(255, 0, 128, 255));
    /// ```
    pub fn clamped(red: i64, green: i64, blue: i64, white: i64) -> Self {
        Self::new(
            clamp_channel(red),
            clamp_channel(green),
            clamp_channel(blue),
            clamp_channel(white),
        )
    }

    pub fn channels(&self) -> [u8; 4] {
        [self.red, self.green, self.blue, self.white]
    }

    /// Multiply every channel by `level / 255`, truncating.
    pub fn scale(&self, level: u8) -> Self {
        let scale = |c: u8| (c as u16 * level as u16 / u8::MAX as u16) as u8;
        Self::new(
            scale(self.red),
            scale(self.green),
            scale(self.blue),
            scale(self.white),
        )
    }
}

impl FromStr for ColorRGBW {
    type Err = Error;

    /// Parse from comma-separated string (e.g., "255,128,0,0"); values are clamped.
    fn from_str(s: &str) -> Result<Self, Error> {
        let parts = s
            .split(',')
            .map(|c| c.trim().parse::<i64>())
            .collect::<Result<Vec<_>, _>>()
            .map_err(|_| Error::InvalidColorString(s.to_string()))?;
        match parts.as_slice() {
            [r, g, b, w] => Ok(Self::clamped(*r, *g, *b, *w)),
            _ => Err(Error::InvalidColorString(s.to_string())),
        }
    }
}
