//! INI serialization logic for converting `AdvisorSettings` → INI string.

use super::settings::AdvisorSettings;

/// Convert settings to a commented INI string for saving.
pub(super) fn to_config_string(settings: &AdvisorSettings) -> String {
    format!(
        r#"[alerts]
; Minimum predicted VMG gain (m/s) before a tack/jibe is recommended (0 - 2)
threshold_mps = {}
; Seconds between maneuver evaluations (10 - 120)
interval_secs = {}

[tack]
; Heading change assumed when tacking or jibing, in degrees (10 - 180)
turn_angle_deg = {}

[learning]
; Width of each true wind angle bucket, in degrees (1 - 20)
bin_width_deg = {}
; Most recent speed samples kept per bucket and tack (5 - 500)
max_samples_per_bin = {}

[wind]
; true: positive TWA means wind to starboard (TWD = heading + TWA)
; false: positive TWA means wind to port (TWD = heading - TWA)
twa_positive_starboard = {}

[navigation]
; Position fixes closer together than this are ignored (milliseconds)
min_fix_interval_ms = {}
"#,
        settings.threshold_mps,
        settings.eval_interval.as_secs(),
        settings.preferred_turn_angle_deg,
        settings.bin_width_deg,
        settings.max_samples_per_bin,
        settings.twa_positive_starboard,
        settings.min_fix_interval.as_millis(),
    )
}
