//! Configuration file handling for ~/.sailtact/config.ini.
//!
//! Loads and saves [`AdvisorSettings`] with sensible defaults. Parsing
//! lives in [`super::parser`], serialization in [`super::writer`].
//! Learned performance data is never written here.

use ini::Ini;
use std::path::{Path, PathBuf};
use thiserror::Error;

use super::settings::AdvisorSettings;

/// Configuration file errors.
#[derive(Debug, Error)]
pub enum ConfigFileError {
    /// Failed to read config file
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] ini::Error),

    /// Failed to write config file
    #[error("Failed to write config file: {0}")]
    WriteError(String),

    /// Invalid configuration value
    #[error("Invalid configuration: {section}.{key} = '{value}' - {reason}")]
    InvalidValue {
        section: String,
        key: String,
        value: String,
        reason: String,
    },

    /// Failed to create config directory
    #[error("Failed to create config directory: {0}")]
    DirectoryError(std::io::Error),
}

impl AdvisorSettings {
    /// Load settings from the default path (~/.sailtact/config.ini).
    pub fn load() -> Result<Self, ConfigFileError> {
        Self::load_from(&config_file_path())
    }

    /// Load settings from a specific path.
    ///
    /// If the file doesn't exist, returns defaults.
    pub fn load_from(path: &Path) -> Result<Self, ConfigFileError> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let ini = Ini::load_from_file(path)?;
        super::parser::parse_ini(&ini)
    }

    /// Save settings to the default path (~/.sailtact/config.ini).
    pub fn save(&self) -> Result<(), ConfigFileError> {
        self.save_to(&config_file_path())
    }

    /// Save settings to a specific path.
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigFileError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(ConfigFileError::DirectoryError)?;
        }

        let content = super::writer::to_config_string(self);
        std::fs::write(path, content).map_err(|e| ConfigFileError::WriteError(e.to_string()))
    }
}

/// Get the path to the config directory (~/.sailtact).
pub fn config_directory() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".sailtact")
}

/// Get the path to the config file (~/.sailtact/config.ini).
pub fn config_file_path() -> PathBuf {
    config_directory().join("config.ini")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_load_nonexistent_returns_defaults() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let config_path = temp_dir.path().join("nonexistent.ini");

        let settings = AdvisorSettings::load_from(&config_path).unwrap();
        assert_eq!(settings, AdvisorSettings::default());
    }

    #[test]
    fn test_save_then_load_preserves_values() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let config_path = temp_dir.path().join("nested").join("config.ini");

        let settings = AdvisorSettings::default()
            .with_threshold_mps(0.25)
            .with_eval_interval_secs(45)
            .with_preferred_turn_angle_deg(100.0)
            .with_bin_width_deg(10.0)
            .with_max_samples_per_bin(120)
            .with_twa_positive_starboard(false)
            .with_min_fix_interval_ms(500);

        settings.save_to(&config_path).unwrap();
        let loaded = AdvisorSettings::load_from(&config_path).unwrap();

        assert_eq!(loaded, settings);
        assert_eq!(loaded.eval_interval, Duration::from_secs(45));
    }

    #[test]
    fn test_invalid_value_is_reported() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let config_path = temp_dir.path().join("config.ini");
        std::fs::write(&config_path, "[tack]\nturn_angle_deg = sideways\n").unwrap();

        let err = AdvisorSettings::load_from(&config_path).unwrap_err();
        match err {
            ConfigFileError::InvalidValue { section, key, .. } => {
                assert_eq!(section, "tack");
                assert_eq!(key, "turn_angle_deg");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_config_file_path_ends_with_ini() {
        let path = config_file_path();
        assert!(path.ends_with(".sailtact/config.ini"));
    }
}
