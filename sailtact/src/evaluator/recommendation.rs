//! Recommendation events produced by the evaluator.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::Serialize;

/// Kind of maneuver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ManeuverKind {
    /// Bow through the wind (sailing upwind).
    Tack,
    /// Stern through the wind (sailing downwind).
    Jibe,
}

impl ManeuverKind {
    /// Upwind (VMG ≥ 0) maneuvers are tacks, downwind ones are jibes.
    pub fn for_vmg(current_vmg: f64) -> Self {
        if current_vmg >= 0.0 {
            ManeuverKind::Tack
        } else {
            ManeuverKind::Jibe
        }
    }
}

impl fmt::Display for ManeuverKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ManeuverKind::Tack => write!(f, "Tack"),
            ManeuverKind::Jibe => write!(f, "Jibe"),
        }
    }
}

/// Direction to turn the helm.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum TurnDirection {
    Left,
    Right,
}

impl TurnDirection {
    /// Right for a clockwise (positive) heading change, otherwise left.
    pub fn from_delta(delta_deg: f64) -> Self {
        if delta_deg > 0.0 {
            TurnDirection::Right
        } else {
            TurnDirection::Left
        }
    }

    pub fn arrow(&self) -> &'static str {
        match self {
            TurnDirection::Left => "←",
            TurnDirection::Right => "→",
        }
    }
}

/// A single "maneuver now" advisory.
///
/// Ephemeral: created on a qualifying tick and handed to subscribers.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ManeuverRecommendation {
    pub kind: ManeuverKind,
    pub turn_direction: TurnDirection,
    /// `"<Tack|Jibe> now <←|→>"`
    pub message: String,
    pub emitted_at: DateTime<Utc>,
}

impl ManeuverRecommendation {
    pub fn new(kind: ManeuverKind, turn_direction: TurnDirection, emitted_at: DateTime<Utc>) -> Self {
        Self {
            kind,
            turn_direction,
            message: format!("{} now {}", kind, turn_direction.arrow()),
            emitted_at,
        }
    }
}

impl fmt::Display for ManeuverRecommendation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}
