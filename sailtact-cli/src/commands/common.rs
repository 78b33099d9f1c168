//! Common types and utilities shared across CLI commands.

use chrono::{DateTime, Utc};
use clap::Args;
use serde::Deserialize;
use tracing::warn;

use sailtact::config::AdvisorSettings;
use sailtact::geo::Coordinate;
use sailtact::navigation::{HeadingReading, NavigationFix, NavigationUpdate};
use sailtact::wind::{WindInput, WindInputMode};

use crate::error::CliError;

/// Wind input arguments.
#[derive(Debug, Clone, Args)]
pub struct WindArgs {
    /// True wind direction in degrees (where the wind blows from)
    #[arg(long, conflicts_with = "twa", allow_hyphen_values = true)]
    pub twd: Option<String>,

    /// True wind angle in degrees relative to the bow
    #[arg(long, allow_hyphen_values = true)]
    pub twa: Option<String>,
}

impl WindArgs {
    /// Parse the wind argument. Unparsable text is an error here since
    /// the user typed it on the command line.
    pub fn to_wind_input(&self) -> Result<Option<WindInput>, CliError> {
        let (mode, text) = match (&self.twd, &self.twa) {
            (Some(text), _) => (WindInputMode::Direction, text),
            (None, Some(text)) => (WindInputMode::Angle, text),
            (None, None) => return Ok(None),
        };
        WindInput::parse(mode, text).map(Some).ok_or_else(|| {
            CliError::InvalidArgument(format!("{} '{}' is not a valid angle", mode, text))
        })
    }
}

/// Optional overrides of the configured advisor settings.
#[derive(Debug, Clone, Default, Args)]
pub struct TuningArgs {
    /// Minimum predicted VMG gain in m/s (0 - 2)
    #[arg(long)]
    pub threshold: Option<f64>,

    /// Seconds between evaluations (10 - 120)
    #[arg(long)]
    pub interval: Option<u64>,

    /// Assumed heading change on a tack or jibe, in degrees (10 - 180)
    #[arg(long)]
    pub turn_angle: Option<f64>,

    /// TWA bucket width in degrees (1 - 20)
    #[arg(long)]
    pub bin_width: Option<f64>,

    /// Samples kept per bucket (5 - 500)
    #[arg(long)]
    pub max_samples: Option<usize>,

    /// Treat positive TWA as wind to port (TWD = heading - TWA)
    #[arg(long)]
    pub twa_port: bool,
}

impl TuningArgs {
    /// Load settings from the config file and apply overrides.
    pub fn resolve(&self) -> Result<AdvisorSettings, CliError> {
        let settings = AdvisorSettings::load()?;
        Ok(self.apply(settings))
    }

    pub fn apply(&self, mut settings: AdvisorSettings) -> AdvisorSettings {
        if let Some(v) = self.threshold {
            settings.set_threshold_mps(v);
        }
        if let Some(v) = self.interval {
            settings.set_eval_interval_secs(v);
        }
        if let Some(v) = self.turn_angle {
            settings.set_preferred_turn_angle_deg(v);
        }
        if let Some(v) = self.bin_width {
            settings.set_bin_width_deg(v);
        }
        if let Some(v) = self.max_samples {
            settings.set_max_samples_per_bin(v);
        }
        if self.twa_port {
            settings.twa_positive_starboard = false;
        }
        settings
    }
}

/// One line of a JSON-lines navigation log.
///
/// ```json
/// {"time":"2024-06-01T10:00:00Z","lat":50.8,"lon":-1.3,"sog":5.1,"cog":44.0,"heading":47.0}
/// ```
///
/// Speeds are m/s. Negative `sog`/`cog` mean "invalid" as reported by the
/// device. `heading` is true heading; `magnetic_heading` is used when it
/// is missing or negative.
#[derive(Debug, Clone, Deserialize)]
pub struct NavigationRecord {
    pub time: Option<DateTime<Utc>>,
    pub lat: Option<f64>,
    pub lon: Option<f64>,
    pub sog: Option<f64>,
    pub cog: Option<f64>,
    pub heading: Option<f64>,
    pub magnetic_heading: Option<f64>,
}

impl NavigationRecord {
    /// Parse one line; blank lines and `#` comments yield `None`.
    pub fn parse_line(line: &str, line_no: usize) -> Option<Self> {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            return None;
        }
        match serde_json::from_str(trimmed) {
            Ok(record) => Some(record),
            Err(e) => {
                warn!(line = line_no, error = %e, "Skipping unparsable record");
                None
            }
        }
    }

    /// Updates to feed to the advisor: heading first, then the fix.
    pub fn updates(&self) -> Vec<NavigationUpdate> {
        let mut updates = Vec::with_capacity(2);

        if self.heading.is_some() || self.magnetic_heading.is_some() {
            updates.push(NavigationUpdate::Heading(HeadingReading {
                true_deg: self.heading.unwrap_or(-1.0),
                magnetic_deg: self.magnetic_heading.unwrap_or(-1.0),
            }));
        }

        let coordinate = match (self.lat, self.lon) {
            (Some(lat), Some(lon)) => Some(Coordinate::new(lat, lon)),
            _ => None,
        };
        if coordinate.is_some() || self.sog.is_some() || self.cog.is_some() {
            updates.push(NavigationUpdate::Fix(NavigationFix {
                coordinate,
                sog_mps: self.sog,
                cog_deg: self.cog,
                timestamp: self.time,
            }));
        }

        updates
    }
}
