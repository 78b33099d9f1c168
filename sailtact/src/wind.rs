//! True wind input.
//!
//! The sailor enters wind either as a true wind direction (TWD, compass
//! bearing the wind blows from) or as a true wind angle (TWA, relative to
//! the bow). TWA needs the current heading and a sign convention to become
//! a TWD:
//!
//! ```text
//! twa_positive_starboard = true   →  TWD = heading + TWA
//! twa_positive_starboard = false  →  TWD = heading − TWA
//! ```
//!
//! Both results are normalized to `[0, 360)`.

use std::fmt;
use std::str::FromStr;

use crate::angle::{normalize_unsigned, parse_angle};

/// How the wind value was entered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WindInputMode {
    /// Absolute true wind direction.
    #[default]
    Direction,
    /// True wind angle relative to the bow.
    Angle,
}

impl fmt::Display for WindInputMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WindInputMode::Direction => write!(f, "TWD"),
            WindInputMode::Angle => write!(f, "TWA"),
        }
    }
}

/// A wind value as entered by the sailor.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum WindInput {
    /// True wind direction in degrees.
    Direction(f64),
    /// True wind angle in degrees, sign per the configured convention.
    Angle(f64),
}

impl WindInput {
    /// Parse textual input for the given mode.
    ///
    /// Unparsable text yields `None`, which downstream code treats exactly
    /// like "no wind entered".
    pub fn parse(mode: WindInputMode, text: &str) -> Option<Self> {
        let value = parse_angle(text)?;
        Some(match mode {
            WindInputMode::Direction => WindInput::Direction(value),
            WindInputMode::Angle => WindInput::Angle(value),
        })
    }

    /// The mode this input was entered in.
    pub fn mode(&self) -> WindInputMode {
        match self {
            WindInput::Direction(_) => WindInputMode::Direction,
            WindInput::Angle(_) => WindInputMode::Angle,
        }
    }

    /// Resolve to a true wind direction in `[0, 360)`.
    ///
    /// A TWA input needs a heading; without one the result is `None`.
    pub fn true_wind_direction(
        &self,
        heading_deg: Option<f64>,
        twa_positive_starboard: bool,
    ) -> Option<f64> {
        match *self {
            WindInput::Direction(twd) => Some(normalize_unsigned(twd)),
            WindInput::Angle(twa) => {
                heading_deg.map(|h| twd_from_twa(h, twa, twa_positive_starboard))
            }
        }
    }
}

impl FromStr for WindInputMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "twd" | "direction" => Ok(WindInputMode::Direction),
            "twa" | "angle" => Ok(WindInputMode::Angle),
            _ => Err(format!("unknown wind input mode '{}'", s)),
        }
    }
}

/// Convert a true wind angle to a true wind direction.
#[inline]
pub fn twd_from_twa(heading_deg: f64, twa_deg: f64, twa_positive_starboard: bool) -> f64 {
    let raw = if twa_positive_starboard {
        heading_deg + twa_deg
    } else {
        heading_deg - twa_deg
    };
    normalize_unsigned(raw)
}
