//! Configuration management CLI commands.
//!
//! Provides `config get`, `config set`, `config list`, and `config path` commands
//! for viewing and modifying configuration settings from the command line.

use clap::Subcommand;
use sailtact::config::{config_file_path, AdvisorSettings, ConfigKey};

use crate::error::CliError;

/// Config subcommands.
#[derive(Debug, Subcommand)]
pub enum ConfigCommands {
    /// Get a configuration value
    Get {
        /// Configuration key in format section.key (e.g., alerts.threshold_mps)
        key: String,
    },

    /// Set a configuration value
    Set {
        /// Configuration key in format section.key (e.g., tack.turn_angle_deg)
        key: String,

        /// Value to set
        #[arg(allow_hyphen_values = true)]
        value: String,
    },

    /// List all configuration settings
    List,

    /// Show the configuration file path
    Path,
}

/// Run a config subcommand.
pub fn run(command: ConfigCommands) -> Result<(), CliError> {
    match command {
        ConfigCommands::Get { key } => run_get(&key),
        ConfigCommands::Set { key, value } => run_set(&key, &value),
        ConfigCommands::List => run_list(),
        ConfigCommands::Path => run_path(),
    }
}

fn parse_key(key: &str) -> Result<ConfigKey, CliError> {
    key.parse().map_err(|_| {
        CliError::Config(format!(
            "Unknown configuration key '{}'. Use 'sailtact config list' to see available keys.",
            key
        ))
    })
}

/// Get a configuration value.
fn run_get(key: &str) -> Result<(), CliError> {
    let config_key = parse_key(key)?;
    let settings = AdvisorSettings::load()?;
    println!("{}", config_key.get(&settings));
    Ok(())
}

/// Set a configuration value.
///
/// Out-of-range numbers are clamped; the stored value is echoed back.
fn run_set(key: &str, value: &str) -> Result<(), CliError> {
    let config_key = parse_key(key)?;

    let mut settings = AdvisorSettings::load()?;
    config_key
        .set(&mut settings, value)
        .map_err(|e| CliError::Config(e.to_string()))?;
    settings.save()?;

    println!("Set {} = {}", config_key.name(), config_key.get(&settings));
    Ok(())
}

/// List all configuration settings.
fn run_list() -> Result<(), CliError> {
    let settings = AdvisorSettings::load()?;

    println!("Configuration Settings");
    println!("======================");
    println!();

    let mut current_section = "";
    for key in ConfigKey::all() {
        let (section, name) = key.name().split_once('.').unwrap_or(("", key.name()));

        if section != current_section {
            if !current_section.is_empty() {
                println!();
            }
            println!("[{}]", section);
            current_section = section;
        }
        println!("  {} = {}", name, key.get(&settings));
    }

    Ok(())
}

/// Show the configuration file path.
fn run_path() -> Result<(), CliError> {
    println!("{}", config_file_path().display());
    Ok(())
}
