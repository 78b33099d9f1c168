//! Velocity made good and tack geometry.
//!
//! VMG is the component of boat speed along the wind axis:
//!
//! ```text
//! VMG = SOG × cos(δ)      δ = signed_delta(heading, twd)
//! ```
//!
//! Positive VMG is progress toward the wind source (upwind), negative is
//! progress away from it (downwind).

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::angle::{normalize_unsigned, signed_delta};

/// Which side of the boat the wind strikes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TackSide {
    Port,
    Starboard,
}

impl TackSide {
    /// Tack for a given heading and true wind direction.
    ///
    /// Port when the wind lies clockwise of the heading (δ > 0), otherwise
    /// starboard. Head-to-wind (δ = 0) counts as starboard.
    pub fn from_heading(heading_deg: f64, twd_deg: f64) -> Self {
        Self::from_delta(signed_delta(heading_deg, twd_deg))
    }

    /// Tack for a precomputed signed delta from heading to TWD.
    pub fn from_delta(delta_deg: f64) -> Self {
        if delta_deg > 0.0 {
            TackSide::Port
        } else {
            TackSide::Starboard
        }
    }

    /// The other tack.
    pub fn opposite(self) -> Self {
        match self {
            TackSide::Port => TackSide::Starboard,
            TackSide::Starboard => TackSide::Port,
        }
    }

    /// Lowercase name for logging and storage keys.
    pub fn as_str(&self) -> &'static str {
        match self {
            TackSide::Port => "port",
            TackSide::Starboard => "starboard",
        }
    }
}

impl fmt::Display for TackSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// True wind angle magnitude in `[0, 180]` for a heading/TWD pair.
#[inline]
pub fn twa_magnitude(heading_deg: f64, twd_deg: f64) -> f64 {
    signed_delta(heading_deg, twd_deg).abs()
}

/// Velocity made good in the unit of `sog`.
#[inline]
pub fn vmg(sog: f64, heading_deg: f64, twd_deg: f64) -> f64 {
    sog * signed_delta(heading_deg, twd_deg).to_radians().cos()
}

/// Heading mirrored across the wind axis and its VMG at the same speed.
///
/// Assumes symmetric performance on both tacks. Kept as a reference
/// computation; the evaluator predicts from learned speeds instead.
pub fn predicted_alt_vmg(sog: f64, heading_deg: f64, twd_deg: f64) -> (f64, f64) {
    let alt_heading = normalize_unsigned(2.0 * twd_deg - heading_deg);
    (alt_heading, vmg(sog, alt_heading, twd_deg))
}

#[cfg(test)]
mod tests {
    use super::*;

    // ─────────────────────────────────────────────────────────────────────────
    // VMG sign conventions
    // ─────────────────────────────────────────────────────────────────────────

    #[test]
    fn test_upwind_vmg_positive() {
        assert!(vmg(5.0, 0.0, 10.0) > 0.0);
    }

    #[test]
    fn test_downwind_vmg_negative() {
        assert!(vmg(4.0, 180.0, 0.0) < 0.0);
    }

    #[test]
    fn test_beam_reach_vmg_zero() {
        assert!(vmg(3.0, 90.0, 0.0).abs() < 1e-3);
    }

    #[test]
    fn test_vmg_dead_upwind_equals_sog() {
        assert!((vmg(6.0, 350.0, 350.0) - 6.0).abs() < 1e-12);
    }

    #[test]
    fn test_symmetric_alt_vmg() {
        let (sog, heading, twd) = (5.0, 45.0, 0.0);
        let current = vmg(sog, heading, twd);
        let (alt_heading, alt_vmg) = predicted_alt_vmg(sog, heading, twd);

        assert!((current - alt_vmg).abs() < 1e-3);
        assert_eq!(alt_heading, normalize_unsigned(2.0 * twd - heading));
        assert!((alt_heading - 315.0).abs() < 1e-9);
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Tack side
    // ─────────────────────────────────────────────────────────────────────────

    #[test]
    fn test_tack_side() {
        // Wind clockwise of the heading is port.
        assert_eq!(TackSide::from_heading(0.0, 10.0), TackSide::Port);
        assert_eq!(TackSide::from_heading(0.0, 350.0), TackSide::Starboard);
        assert_eq!(TackSide::from_heading(300.0, 20.0), TackSide::Port);
    }

    #[test]
    fn test_tack_side_boundaries() {
        assert_eq!(TackSide::from_heading(45.0, 45.0), TackSide::Starboard);
        assert_eq!(TackSide::from_heading(0.0, 180.0), TackSide::Port);
    }

    #[test]
    fn test_tack_opposite_and_display() {
        assert_eq!(TackSide::Port.opposite(), TackSide::Starboard);
        assert_eq!(TackSide::Starboard.opposite(), TackSide::Port);
        assert_eq!(format!("{}", TackSide::Port), "port");
    }

    #[test]
    fn test_twa_magnitude() {
        assert!((twa_magnitude(0.0, 350.0) - 10.0).abs() < 1e-9);
        assert!((twa_magnitude(90.0, 270.0) - 180.0).abs() < 1e-9);
    }
}
