//! INI parsing logic for converting `Ini` → `AdvisorSettings`.
//!
//! This is the single place where INI key names are mapped to settings
//! fields. Out-of-range numbers are clamped by the settings setters;
//! values that don't parse at all are errors.

use ini::Ini;
use std::str::FromStr;

use super::file::ConfigFileError;
use super::settings::AdvisorSettings;

/// Parse an `Ini` object into `AdvisorSettings`.
///
/// Starts from `AdvisorSettings::default()` and overlays any values found.
pub(super) fn parse_ini(ini: &Ini) -> Result<AdvisorSettings, ConfigFileError> {
    let mut settings = AdvisorSettings::default();

    // [alerts] section
    if let Some(section) = ini.section(Some("alerts")) {
        if let Some(v) = section.get("threshold_mps") {
            settings.set_threshold_mps(parse_value(
                "alerts",
                "threshold_mps",
                v,
                "must be a number between 0 and 2 (m/s)",
            )?);
        }
        if let Some(v) = section.get("interval_secs") {
            settings.set_eval_interval_secs(parse_value(
                "alerts",
                "interval_secs",
                v,
                "must be a whole number of seconds between 10 and 120",
            )?);
        }
    }

    // [tack] section
    if let Some(section) = ini.section(Some("tack")) {
        if let Some(v) = section.get("turn_angle_deg") {
            settings.set_preferred_turn_angle_deg(parse_value(
                "tack",
                "turn_angle_deg",
                v,
                "must be a number of degrees between 10 and 180",
            )?);
        }
    }

    // [learning] section
    if let Some(section) = ini.section(Some("learning")) {
        if let Some(v) = section.get("bin_width_deg") {
            settings.set_bin_width_deg(parse_value(
                "learning",
                "bin_width_deg",
                v,
                "must be a number of degrees between 1 and 20",
            )?);
        }
        if let Some(v) = section.get("max_samples_per_bin") {
            settings.set_max_samples_per_bin(parse_value(
                "learning",
                "max_samples_per_bin",
                v,
                "must be a whole number between 5 and 500",
            )?);
        }
    }

    // [wind] section
    if let Some(section) = ini.section(Some("wind")) {
        if let Some(v) = section.get("twa_positive_starboard") {
            settings.twa_positive_starboard =
                parse_bool(v).ok_or_else(|| ConfigFileError::InvalidValue {
                    section: "wind".to_string(),
                    key: "twa_positive_starboard".to_string(),
                    value: v.to_string(),
                    reason: "must be true or false".to_string(),
                })?;
        }
    }

    // [navigation] section
    if let Some(section) = ini.section(Some("navigation")) {
        if let Some(v) = section.get("min_fix_interval_ms") {
            settings.set_min_fix_interval_ms(parse_value(
                "navigation",
                "min_fix_interval_ms",
                v,
                "must be a whole number of milliseconds",
            )?);
        }
    }

    Ok(settings)
}

fn parse_value<T: FromStr>(
    section: &str,
    key: &str,
    value: &str,
    reason: &str,
) -> Result<T, ConfigFileError> {
    value
        .trim()
        .parse()
        .map_err(|_| ConfigFileError::InvalidValue {
            section: section.to_string(),
            key: key.to_string(),
            value: value.to_string(),
            reason: reason.to_string(),
        })
}

/// Parse a boolean the way users tend to write it in INI files.
pub(super) fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "true" | "yes" | "on" | "1" => Some(true),
        "false" | "no" | "off" | "0" => Some(false),
        _ => None,
    }
}
