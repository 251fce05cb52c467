//! Named lighting effects.

use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumIter, EnumString};

/// The closed set of effects a fixture can run.
///
/// Names parse and print exactly as the bridge exchanges them:
///
/// ```
/// use std::str::FromStr;
/// use rgbw_light_controller::Effect;
///
/// assert_eq!(Effect::from_str("colorfade_slow").unwrap(), Effect::ColorfadeSlow);
/// assert_eq!(Effect::Flash.to_string(), "flash");
/// assert!(Effect::from_str("strobe").is_err());
/// ```
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    EnumIter,
    EnumString,
    Display,
)]
pub enum Effect {
    Solid,
    Rainbow,
    Breath,
    #[strum(serialize = "colorfade_slow")]
    #[serde(rename = "colorfade_slow")]
    ColorfadeSlow,
    #[strum(serialize = "colorfade_fast")]
    #[serde(rename = "colorfade_fast")]
    ColorfadeFast,
    #[strum(serialize = "flash")]
    #[serde(rename = "flash")]
    Flash,
}

impl Effect {
    /// Whether the effect changes output over time.
    pub fn is_animated(&self) -> bool {
        !matches!(self, Effect::Solid)
    }
}
