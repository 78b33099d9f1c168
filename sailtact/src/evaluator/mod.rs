//! Maneuver evaluator.
//!
//! On each tick the evaluator compares the VMG currently being made with
//! the VMG predicted after a tack or jibe, using the learned speed for the
//! tack the boat would end up on.
//!
//! # Algorithm
//!
//! ```text
//! current_vmg  = vmg(sog, heading, twd)
//! current_tack = Port if signed_delta(heading, twd) > 0 else Starboard
//! kind         = Tack if current_vmg ≥ 0 else Jibe
//! turn_sign    = toward the wind for a tack, away from it for a jibe
//! alt_heading  = normalize(heading + turn_sign × turn_angle)
//! alt_twa      = |signed_delta(alt_heading, twd)|
//! predicted    = learned(alt_twa, opposite tack) or sog
//! alt_vmg      = vmg(predicted, alt_heading, twd)
//! emit if alt_vmg > current_vmg + threshold
//! ```
//!
//! Missing heading, wind or speed skips the tick silently. The evaluator
//! holds no state of its own between ticks.

mod recommendation;

pub use recommendation::{ManeuverKind, ManeuverRecommendation, TurnDirection};

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, info};

use crate::angle::{normalize_unsigned, signed_delta};
use crate::config::AdvisorSettings;
use crate::performance::PerformanceModel;
use crate::vmg::{vmg, TackSide};

/// Values the evaluator needs for one tick.
///
/// Any `None` means the tick is skipped.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct EvaluationInput {
    pub heading_deg: Option<f64>,
    pub twd_deg: Option<f64>,
    pub sog_mps: Option<f64>,
}

/// Full result of one evaluation, whether or not it recommends anything.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ManeuverAssessment {
    pub heading_deg: f64,
    pub twd_deg: f64,
    pub current_tack: TackSide,
    pub current_vmg: f64,
    pub kind: ManeuverKind,
    pub alt_heading_deg: f64,
    pub alt_twa_deg: f64,
    pub predicted_sog_mps: f64,
    /// Whether `predicted_sog_mps` came from the performance model rather
    /// than the current speed.
    pub learned: bool,
    pub alt_vmg: f64,
    pub turn_direction: TurnDirection,
}

impl ManeuverAssessment {
    /// Predicted VMG gain of the maneuver.
    pub fn gain(&self) -> f64 {
        self.alt_vmg - self.current_vmg
    }

    /// Whether the gain clears the threshold.
    pub fn is_worthwhile(&self, threshold_mps: f64) -> bool {
        self.alt_vmg > self.current_vmg + threshold_mps
    }
}

/// Turns navigation state plus the learned model into recommendations.
#[derive(Debug, Clone)]
pub struct ManeuverEvaluator {
    model: Arc<PerformanceModel>,
}

impl ManeuverEvaluator {
    pub fn new(model: Arc<PerformanceModel>) -> Self {
        Self { model }
    }

    pub fn model(&self) -> &Arc<PerformanceModel> {
        &self.model
    }

    /// Compute the maneuver assessment for one tick.
    ///
    /// Returns `None` when heading, wind or speed is unavailable.
    pub fn assess(
        &self,
        input: EvaluationInput,
        settings: &AdvisorSettings,
    ) -> Option<ManeuverAssessment> {
        let (heading, twd, sog) = match (input.heading_deg, input.twd_deg, input.sog_mps) {
            (Some(h), Some(w), Some(s)) => (h, w, s),
            _ => {
                debug!(
                    has_heading = input.heading_deg.is_some(),
                    has_twd = input.twd_deg.is_some(),
                    has_sog = input.sog_mps.is_some(),
                    "Evaluation skipped: missing input"
                );
                return None;
            }
        };

        let current_vmg = vmg(sog, heading, twd);
        let current_tack = TackSide::from_delta(signed_delta(heading, twd));
        let kind = ManeuverKind::for_vmg(current_vmg);

        let alt_heading = normalize_unsigned(
            heading + turn_sign(kind, current_tack) * settings.preferred_turn_angle_deg,
        );
        let alt_twa = signed_delta(alt_heading, twd).abs();

        let learned_sog = self.model.average_speed(alt_twa, current_tack.opposite());
        let predicted_sog = learned_sog.unwrap_or(sog);
        let alt_vmg = vmg(predicted_sog, alt_heading, twd);

        Some(ManeuverAssessment {
            heading_deg: heading,
            twd_deg: twd,
            current_tack,
            current_vmg,
            kind,
            alt_heading_deg: alt_heading,
            alt_twa_deg: alt_twa,
            predicted_sog_mps: predicted_sog,
            learned: learned_sog.is_some(),
            alt_vmg,
            turn_direction: TurnDirection::from_delta(signed_delta(heading, alt_heading)),
        })
    }

    /// Run one tick and return a recommendation if the maneuver pays off.
    pub fn evaluate(
        &self,
        input: EvaluationInput,
        settings: &AdvisorSettings,
        now: DateTime<Utc>,
    ) -> Option<ManeuverRecommendation> {
        let assessment = self.assess(input, settings)?;

        if !assessment.is_worthwhile(settings.threshold_mps) {
            debug!(
                current_vmg = format!("{:.2}", assessment.current_vmg),
                alt_vmg = format!("{:.2}", assessment.alt_vmg),
                learned = assessment.learned,
                "No maneuver: predicted gain below threshold"
            );
            return None;
        }

        let recommendation =
            ManeuverRecommendation::new(assessment.kind, assessment.turn_direction, now);
        info!(
            kind = %assessment.kind,
            tack = %assessment.current_tack,
            current_vmg = format!("{:.2}", assessment.current_vmg),
            alt_vmg = format!("{:.2}", assessment.alt_vmg),
            alt_heading = format!("{:.0}", assessment.alt_heading_deg),
            learned = assessment.learned,
            "{}", recommendation.message
        );
        Some(recommendation)
    }
}

/// Sign of the heading change that puts the wind on the other side.
///
/// Port tack has the wind clockwise of the bow, so a tack turns clockwise
/// (into the wind) and a jibe turns counter-clockwise (away from it).
/// Starboard is the mirror image.
///
/// The sign depends on the maneuver as well as the tack. A fixed "port
/// turns counter-clockwise" rule would take a port-tack boat tacking at
/// heading 0° with wind from 10° round to 270°, still on port, and the
/// opposite-tack speed it looks up would describe a heading it never
/// reaches.
fn turn_sign(kind: ManeuverKind, tack: TackSide) -> f64 {
    match (kind, tack) {
        (ManeuverKind::Tack, TackSide::Port) | (ManeuverKind::Jibe, TackSide::Starboard) => 1.0,
        (ManeuverKind::Tack, TackSide::Starboard) | (ManeuverKind::Jibe, TackSide::Port) => -1.0,
    }
}
