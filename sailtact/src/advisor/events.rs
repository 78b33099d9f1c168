//! Events broadcast to advisor subscribers.

use serde::Serialize;

use crate::evaluator::ManeuverRecommendation;
use crate::navigation::NavigationState;

/// Capacity of the advisor event channel.
///
/// Slow subscribers that fall further behind than this skip events
/// (`RecvError::Lagged`) rather than stalling ingestion.
pub const EVENT_CHANNEL_CAPACITY: usize = 64;

/// Something a subscriber may want to react to.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum AdvisorEvent {
    /// Navigation state changed after a fix or heading update.
    StateChanged(NavigationState),
    /// The evaluator recommends a maneuver.
    Recommendation(ManeuverRecommendation),
}

impl AdvisorEvent {
    pub fn as_recommendation(&self) -> Option<&ManeuverRecommendation> {
        match self {
            AdvisorEvent::Recommendation(rec) => Some(rec),
            AdvisorEvent::StateChanged(_) => None,
        }
    }
}
