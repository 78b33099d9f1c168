//! Configuration key access and validation.
//!
//! Type-safe get/set of individual settings by `section.key` name, used by
//! the `config` CLI commands.

use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use super::parser::parse_bool;
use super::settings::AdvisorSettings;

/// Errors that can occur when getting or setting configuration values.
#[derive(Debug, Error)]
pub enum ConfigKeyError {
    /// Unknown configuration key.
    #[error("Unknown configuration key '{0}'")]
    UnknownKey(String),

    /// Validation failed for the value.
    #[error("Invalid value for {key}: {reason}")]
    ValidationFailed { key: String, reason: String },
}

/// Supported configuration keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigKey {
    AlertsThresholdMps,
    AlertsIntervalSecs,
    TackTurnAngleDeg,
    LearningBinWidthDeg,
    LearningMaxSamplesPerBin,
    WindTwaPositiveStarboard,
    NavigationMinFixIntervalMs,
}

impl FromStr for ConfigKey {
    type Err = ConfigKeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "alerts.threshold_mps" => Ok(ConfigKey::AlertsThresholdMps),
            "alerts.interval_secs" => Ok(ConfigKey::AlertsIntervalSecs),
            "tack.turn_angle_deg" => Ok(ConfigKey::TackTurnAngleDeg),
            "learning.bin_width_deg" => Ok(ConfigKey::LearningBinWidthDeg),
            "learning.max_samples_per_bin" => Ok(ConfigKey::LearningMaxSamplesPerBin),
            "wind.twa_positive_starboard" => Ok(ConfigKey::WindTwaPositiveStarboard),
            "navigation.min_fix_interval_ms" => Ok(ConfigKey::NavigationMinFixIntervalMs),
            _ => Err(ConfigKeyError::UnknownKey(s.to_string())),
        }
    }
}

impl fmt::Display for ConfigKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl ConfigKey {
    /// Every key, in file order.
    pub fn all() -> &'static [ConfigKey] {
        &[
            ConfigKey::AlertsThresholdMps,
            ConfigKey::AlertsIntervalSecs,
            ConfigKey::TackTurnAngleDeg,
            ConfigKey::LearningBinWidthDeg,
            ConfigKey::LearningMaxSamplesPerBin,
            ConfigKey::WindTwaPositiveStarboard,
            ConfigKey::NavigationMinFixIntervalMs,
        ]
    }

    /// The `section.key` name.
    pub fn name(&self) -> &'static str {
        match self {
            ConfigKey::AlertsThresholdMps => "alerts.threshold_mps",
            ConfigKey::AlertsIntervalSecs => "alerts.interval_secs",
            ConfigKey::TackTurnAngleDeg => "tack.turn_angle_deg",
            ConfigKey::LearningBinWidthDeg => "learning.bin_width_deg",
            ConfigKey::LearningMaxSamplesPerBin => "learning.max_samples_per_bin",
            ConfigKey::WindTwaPositiveStarboard => "wind.twa_positive_starboard",
            ConfigKey::NavigationMinFixIntervalMs => "navigation.min_fix_interval_ms",
        }
    }

    /// Current value as a string.
    pub fn get(&self, settings: &AdvisorSettings) -> String {
        match self {
            ConfigKey::AlertsThresholdMps => settings.threshold_mps.to_string(),
            ConfigKey::AlertsIntervalSecs => settings.eval_interval.as_secs().to_string(),
            ConfigKey::TackTurnAngleDeg => settings.preferred_turn_angle_deg.to_string(),
            ConfigKey::LearningBinWidthDeg => settings.bin_width_deg.to_string(),
            ConfigKey::LearningMaxSamplesPerBin => settings.max_samples_per_bin.to_string(),
            ConfigKey::WindTwaPositiveStarboard => settings.twa_positive_starboard.to_string(),
            ConfigKey::NavigationMinFixIntervalMs => {
                settings.min_fix_interval.as_millis().to_string()
            }
        }
    }

    /// Parse and apply a value. Numbers outside the range are clamped.
    pub fn set(&self, settings: &mut AdvisorSettings, value: &str) -> Result<(), ConfigKeyError> {
        let value = value.trim();
        match self {
            ConfigKey::AlertsThresholdMps => {
                settings.set_threshold_mps(self.parse_finite(value)?);
            }
            ConfigKey::AlertsIntervalSecs => {
                settings.set_eval_interval_secs(self.parse_whole(value)?);
            }
            ConfigKey::TackTurnAngleDeg => {
                settings.set_preferred_turn_angle_deg(self.parse_finite(value)?);
            }
            ConfigKey::LearningBinWidthDeg => {
                settings.set_bin_width_deg(self.parse_finite(value)?);
            }
            ConfigKey::LearningMaxSamplesPerBin => {
                settings.set_max_samples_per_bin(self.parse_whole(value)? as usize);
            }
            ConfigKey::WindTwaPositiveStarboard => {
                settings.twa_positive_starboard =
                    parse_bool(value).ok_or_else(|| ConfigKeyError::ValidationFailed {
                        key: self.name().to_string(),
                        reason: "must be true or false".to_string(),
                    })?;
            }
            ConfigKey::NavigationMinFixIntervalMs => {
                settings.set_min_fix_interval_ms(self.parse_whole(value)?);
            }
        }
        Ok(())
    }

    fn parse_finite(&self, value: &str) -> Result<f64, ConfigKeyError> {
        value
            .parse::<f64>()
            .ok()
            .filter(|v| v.is_finite())
            .ok_or_else(|| ConfigKeyError::ValidationFailed {
                key: self.name().to_string(),
                reason: format!("'{}' is not a number", value),
            })
    }

    fn parse_whole(&self, value: &str) -> Result<u64, ConfigKeyError> {
        value
            .parse::<u64>()
            .map_err(|_| ConfigKeyError::ValidationFailed {
                key: self.name().to_string(),
                reason: format!("'{}' is not a whole number", value),
            })
    }
}
