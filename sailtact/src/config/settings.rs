//! Advisor settings, their ranges and defaults.
//!
//! Every externally settable option lives in [`AdvisorSettings`]. Values
//! outside the documented range are clamped (with a warning) rather than
//! rejected, so a slider or a hand-edited config file can never put the
//! advisor into an invalid state.

use std::time::Duration;

// =============================================================================
// Defaults and ranges
// =============================================================================

/// Default minimum predicted VMG gain (m/s) before recommending a maneuver.
pub const DEFAULT_THRESHOLD_MPS: f64 = 0.1;
pub const MIN_THRESHOLD_MPS: f64 = 0.0;
pub const MAX_THRESHOLD_MPS: f64 = 2.0;

/// Default evaluation ticker period (seconds).
pub const DEFAULT_EVAL_INTERVAL_SECS: u64 = 30;
pub const MIN_EVAL_INTERVAL_SECS: u64 = 10;
pub const MAX_EVAL_INTERVAL_SECS: u64 = 120;

/// Default heading change assumed for a tack or jibe (degrees).
pub const DEFAULT_TURN_ANGLE_DEG: f64 = 90.0;
pub const MIN_TURN_ANGLE_DEG: f64 = 10.0;
pub const MAX_TURN_ANGLE_DEG: f64 = 180.0;

/// Default TWA bucket width for the performance model (degrees).
pub const DEFAULT_BIN_WIDTH_DEG: f64 = 5.0;
pub const MIN_BIN_WIDTH_DEG: f64 = 1.0;
pub const MAX_BIN_WIDTH_DEG: f64 = 20.0;

/// Default bounded history length per performance bin.
pub const DEFAULT_MAX_SAMPLES_PER_BIN: usize = 50;
pub const MIN_MAX_SAMPLES_PER_BIN: usize = 5;
pub const MAX_MAX_SAMPLES_PER_BIN: usize = 500;

/// Position fixes closer together than this are dropped (milliseconds).
pub const DEFAULT_MIN_FIX_INTERVAL_MS: u64 = 800;
pub const MAX_MIN_FIX_INTERVAL_MS: u64 = 10_000;

// =============================================================================
// Settings
// =============================================================================

/// All tunable advisor options.
///
/// Cheap to clone; readers take a snapshot so one operation always sees a
/// consistent set of values (see [`super::SharedSettings`]).
#[derive(Debug, Clone, PartialEq)]
pub struct AdvisorSettings {
    /// Minimum predicted VMG gain (m/s) that triggers a recommendation.
    pub threshold_mps: f64,

    /// Period of the evaluation ticker.
    pub eval_interval: Duration,

    /// Assumed heading change magnitude on a tack or jibe (degrees).
    pub preferred_turn_angle_deg: f64,

    /// TWA bucket width for the performance model (degrees).
    pub bin_width_deg: f64,

    /// Bounded history length per performance bin.
    pub max_samples_per_bin: usize,

    /// TWA sign convention: `true` means positive TWA is wind to starboard,
    /// so `TWD = heading + TWA`.
    pub twa_positive_starboard: bool,

    /// Minimum spacing between accepted position fixes.
    pub min_fix_interval: Duration,
}

impl Default for AdvisorSettings {
    fn default() -> Self {
        Self {
            threshold_mps: DEFAULT_THRESHOLD_MPS,
            eval_interval: Duration::from_secs(DEFAULT_EVAL_INTERVAL_SECS),
            preferred_turn_angle_deg: DEFAULT_TURN_ANGLE_DEG,
            bin_width_deg: DEFAULT_BIN_WIDTH_DEG,
            max_samples_per_bin: DEFAULT_MAX_SAMPLES_PER_BIN,
            twa_positive_starboard: true,
            min_fix_interval: Duration::from_millis(DEFAULT_MIN_FIX_INTERVAL_MS),
        }
    }
}

impl AdvisorSettings {
    /// Set the recommendation threshold (clamped to 0-2 m/s).
    pub fn set_threshold_mps(&mut self, value: f64) {
        if let Some(v) = clamp_f64("threshold_mps", value, MIN_THRESHOLD_MPS, MAX_THRESHOLD_MPS) {
            self.threshold_mps = v;
        }
    }

    /// Set the evaluation interval (clamped to 10-120 s).
    pub fn set_eval_interval_secs(&mut self, secs: u64) {
        let secs = clamp_u64(
            "eval_interval_secs",
            secs,
            MIN_EVAL_INTERVAL_SECS,
            MAX_EVAL_INTERVAL_SECS,
        );
        self.eval_interval = Duration::from_secs(secs);
    }

    /// Set the assumed turn angle (clamped to 10-180°).
    pub fn set_preferred_turn_angle_deg(&mut self, value: f64) {
        if let Some(v) = clamp_f64(
            "preferred_turn_angle_deg",
            value,
            MIN_TURN_ANGLE_DEG,
            MAX_TURN_ANGLE_DEG,
        ) {
            self.preferred_turn_angle_deg = v;
        }
    }

    /// Set the performance bin width (clamped to 1-20°).
    pub fn set_bin_width_deg(&mut self, value: f64) {
        if let Some(v) = clamp_f64("bin_width_deg", value, MIN_BIN_WIDTH_DEG, MAX_BIN_WIDTH_DEG) {
            self.bin_width_deg = v;
        }
    }

    /// Set the per-bin history length (clamped to 5-500).
    pub fn set_max_samples_per_bin(&mut self, value: usize) {
        self.max_samples_per_bin = clamp_u64(
            "max_samples_per_bin",
            value as u64,
            MIN_MAX_SAMPLES_PER_BIN as u64,
            MAX_MAX_SAMPLES_PER_BIN as u64,
        ) as usize;
    }

    /// Set the minimum spacing between accepted position fixes (max 10 s).
    pub fn set_min_fix_interval_ms(&mut self, ms: u64) {
        let ms = clamp_u64("min_fix_interval_ms", ms, 0, MAX_MIN_FIX_INTERVAL_MS);
        self.min_fix_interval = Duration::from_millis(ms);
    }

    /// Builder: recommendation threshold.
    pub fn with_threshold_mps(mut self, value: f64) -> Self {
        self.set_threshold_mps(value);
        self
    }

    /// Builder: evaluation interval in seconds.
    pub fn with_eval_interval_secs(mut self, secs: u64) -> Self {
        self.set_eval_interval_secs(secs);
        self
    }

    /// Builder: assumed turn angle.
    pub fn with_preferred_turn_angle_deg(mut self, value: f64) -> Self {
        self.set_preferred_turn_angle_deg(value);
        self
    }

    /// Builder: performance bin width.
    pub fn with_bin_width_deg(mut self, value: f64) -> Self {
        self.set_bin_width_deg(value);
        self
    }

    /// Builder: per-bin history length.
    pub fn with_max_samples_per_bin(mut self, value: usize) -> Self {
        self.set_max_samples_per_bin(value);
        self
    }

    /// Builder: TWA sign convention.
    pub fn with_twa_positive_starboard(mut self, value: bool) -> Self {
        self.twa_positive_starboard = value;
        self
    }

    /// Builder: minimum spacing between accepted fixes.
    pub fn with_min_fix_interval_ms(mut self, ms: u64) -> Self {
        self.set_min_fix_interval_ms(ms);
        self
    }
}

// =============================================================================
// Clamping helpers
// =============================================================================

/// Clamps a float setting into range and logs a warning if clamped.
///
/// Non-finite values are rejected (`None`) so the caller keeps its current
/// value.
pub(crate) fn clamp_f64(name: &str, value: f64, min: f64, max: f64) -> Option<f64> {
    if !value.is_finite() {
        tracing::warn!(setting = name, value, "ignoring non-finite setting value");
        return None;
    }
    if value < min || value > max {
        let clamped = value.clamp(min, max);
        tracing::warn!(
            setting = name,
            requested = value,
            min,
            max,
            "{} out of range, clamping to {}",
            name,
            clamped
        );
        return Some(clamped);
    }
    Some(value)
}

/// Clamps an integer setting into range and logs a warning if clamped.
pub(crate) fn clamp_u64(name: &str, value: u64, min: u64, max: u64) -> u64 {
    if value < min || value > max {
        let clamped = value.clamp(min, max);
        tracing::warn!(
            setting = name,
            requested = value,
            min,
            max,
            "{} out of range, clamping to {}",
            name,
            clamped
        );
        return clamped;
    }
    value
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = AdvisorSettings::default();
        assert_eq!(settings.threshold_mps, 0.1);
        assert_eq!(settings.eval_interval, Duration::from_secs(30));
        assert_eq!(settings.preferred_turn_angle_deg, 90.0);
        assert_eq!(settings.bin_width_deg, 5.0);
        assert_eq!(settings.max_samples_per_bin, 50);
        assert!(settings.twa_positive_starboard);
        assert_eq!(settings.min_fix_interval, Duration::from_millis(800));
    }

    #[test]
    fn test_builder_within_range() {
        let settings = AdvisorSettings::default()
            .with_threshold_mps(0.5)
            .with_eval_interval_secs(60)
            .with_preferred_turn_angle_deg(100.0)
            .with_bin_width_deg(10.0)
            .with_max_samples_per_bin(200)
            .with_twa_positive_starboard(false);

        assert_eq!(settings.threshold_mps, 0.5);
        assert_eq!(settings.eval_interval, Duration::from_secs(60));
        assert_eq!(settings.preferred_turn_angle_deg, 100.0);
        assert_eq!(settings.bin_width_deg, 10.0);
        assert_eq!(settings.max_samples_per_bin, 200);
        assert!(!settings.twa_positive_starboard);
    }

    #[test]
    fn test_out_of_range_values_are_clamped() {
        let settings = AdvisorSettings::default()
            .with_threshold_mps(5.0)
            .with_eval_interval_secs(1)
            .with_preferred_turn_angle_deg(270.0)
            .with_bin_width_deg(0.0)
            .with_max_samples_per_bin(10_000)
            .with_min_fix_interval_ms(60_000);

        assert_eq!(settings.threshold_mps, MAX_THRESHOLD_MPS);
        assert_eq!(settings.eval_interval, Duration::from_secs(MIN_EVAL_INTERVAL_SECS));
        assert_eq!(settings.preferred_turn_angle_deg, MAX_TURN_ANGLE_DEG);
        assert_eq!(settings.bin_width_deg, MIN_BIN_WIDTH_DEG);
        assert_eq!(settings.max_samples_per_bin, MAX_MAX_SAMPLES_PER_BIN);
        assert_eq!(
            settings.min_fix_interval,
            Duration::from_millis(MAX_MIN_FIX_INTERVAL_MS)
        );
    }

    #[test]
    fn test_non_finite_keeps_previous_value() {
        let settings = AdvisorSettings::default()
            .with_threshold_mps(0.3)
            .with_threshold_mps(f64::NAN)
            .with_bin_width_deg(f64::INFINITY);

        assert_eq!(settings.threshold_mps, 0.3);
        assert_eq!(settings.bin_width_deg, DEFAULT_BIN_WIDTH_DEG);
    }
}
