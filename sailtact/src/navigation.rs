//! Navigation fixes and the current navigation state.
//!
//! Position fixes and device heading arrive independently from the
//! positioning source. Source sentinels (negative speed or course) are
//! translated to `None` here, before anything reaches the decision core:
//! an unknown speed must never be mistaken for a stopped boat.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::angle::normalize_unsigned;
use crate::geo::Coordinate;

/// Metres per second in one knot.
pub const MPS_PER_KNOT: f64 = 0.514444;

/// Convert metres per second to knots.
#[inline]
pub fn mps_to_knots(mps: f64) -> f64 {
    mps / MPS_PER_KNOT
}

/// Convert knots to metres per second.
#[inline]
pub fn knots_to_mps(knots: f64) -> f64 {
    knots * MPS_PER_KNOT
}

/// A raw position fix as reported by the positioning source.
///
/// `sog_mps` and `cog_deg` may carry the source's negative "invalid"
/// sentinel; use [`NavigationFix::sanitized`] before storing.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NavigationFix {
    pub coordinate: Option<Coordinate>,
    pub sog_mps: Option<f64>,
    pub cog_deg: Option<f64>,
    pub timestamp: Option<DateTime<Utc>>,
}

impl NavigationFix {
    /// Translate source sentinels (negative or non-finite) to absent values.
    pub fn sanitized(self) -> Self {
        Self {
            coordinate: self
                .coordinate
                .filter(|c| c.latitude.is_finite() && c.longitude.is_finite()),
            sog_mps: self.sog_mps.filter(|v| v.is_finite() && *v >= 0.0),
            cog_deg: self
                .cog_deg
                .filter(|v| v.is_finite() && *v >= 0.0)
                .map(normalize_unsigned),
            timestamp: self.timestamp,
        }
    }
}

/// A device heading reading.
///
/// True heading is preferred; a negative true heading means it is
/// unavailable (no declination yet) and the magnetic heading is used.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HeadingReading {
    pub true_deg: f64,
    pub magnetic_deg: f64,
}

impl HeadingReading {
    /// The heading to use, or `None` if neither value is valid.
    pub fn resolve(&self) -> Option<f64> {
        if self.true_deg.is_finite() && self.true_deg >= 0.0 {
            Some(normalize_unsigned(self.true_deg))
        } else if self.magnetic_deg.is_finite() && self.magnetic_deg >= 0.0 {
            Some(normalize_unsigned(self.magnetic_deg))
        } else {
            None
        }
    }
}

/// An update delivered by the navigation collaborator.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NavigationUpdate {
    /// New position fix.
    Fix(NavigationFix),
    /// New device heading.
    Heading(HeadingReading),
}

/// Distance and bearing from the boat to the start waypoint.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct WaypointInfo {
    pub waypoint: Coordinate,
    pub distance_m: f64,
    pub bearing_deg: f64,
}

/// Latest known navigation values.
///
/// Immutable snapshot: the advisor builds a new one for every update and
/// publishes it to subscribers.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct NavigationState {
    pub coordinate: Option<Coordinate>,
    pub sog_mps: Option<f64>,
    pub cog_deg: Option<f64>,
    pub heading_deg: Option<f64>,
    pub timestamp: Option<DateTime<Utc>>,
    pub waypoint: Option<WaypointInfo>,
}

impl NavigationState {
    /// Device heading, falling back to course over ground.
    pub fn effective_heading(&self) -> Option<f64> {
        self.heading_deg.or(self.cog_deg)
    }

    /// Speed over ground in knots, if known.
    pub fn sog_knots(&self) -> Option<f64> {
        self.sog_mps.map(mps_to_knots)
    }

    /// New state with a (sanitized) position fix applied.
    ///
    /// Every field of the fix replaces the previous value, including
    /// absent ones: a fix without speed means speed is now unknown.
    pub fn with_fix(&self, fix: NavigationFix) -> Self {
        let fix = fix.sanitized();
        Self {
            coordinate: fix.coordinate,
            sog_mps: fix.sog_mps,
            cog_deg: fix.cog_deg,
            timestamp: fix.timestamp.or(self.timestamp),
            ..*self
        }
    }

    /// New state with a device heading applied.
    pub fn with_heading(&self, reading: HeadingReading) -> Self {
        Self {
            heading_deg: reading.resolve(),
            ..*self
        }
    }

    /// New state with refreshed waypoint information.
    pub fn with_waypoint(&self, waypoint: Option<WaypointInfo>) -> Self {
        Self { waypoint, ..*self }
    }
}
