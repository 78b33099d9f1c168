//! CLI error handling with user-friendly messages.
//!
//! Centralizes error handling for the CLI, providing consistent formatting
//! and appropriate exit codes.

use std::fmt;
use std::process;

use sailtact::config::{config_file_path, ConfigFileError};

/// CLI-specific errors with user-friendly messages.
#[derive(Debug)]
pub enum CliError {
    /// Failed to initialize logging
    LoggingInit(String),
    /// Configuration error
    Config(String),
    /// Configuration file could not be read or written
    ConfigFile(ConfigFileError),
    /// Failed to read a navigation log
    Input { path: String, error: std::io::Error },
    /// Async runtime or stdin failure
    Runtime(std::io::Error),
    /// Ctrl-C handler could not be installed
    Signal(ctrlc::Error),
    /// Invalid command-line arguments
    InvalidArgument(String),
}

impl CliError {
    /// Exit the process with an appropriate error message and code.
    pub fn exit(&self) -> ! {
        eprintln!("Error: {}", self);

        if let CliError::ConfigFile(ConfigFileError::InvalidValue { .. }) = self {
            eprintln!();
            eprintln!("Fix or remove the value in {}", config_file_path().display());
            eprintln!("or reset it with: sailtact config set <key> <value>");
        }

        process::exit(1)
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::LoggingInit(msg) => write!(f, "Failed to initialize logging: {}", msg),
            CliError::Config(msg) => write!(f, "Configuration error: {}", msg),
            CliError::ConfigFile(e) => write!(f, "{}", e),
            CliError::Input { path, error } => {
                write!(f, "Failed to read '{}': {}", path, error)
            }
            CliError::Runtime(e) => write!(f, "Runtime error: {}", e),
            CliError::Signal(e) => write!(f, "Failed to set signal handler: {}", e),
            CliError::InvalidArgument(msg) => write!(f, "{}", msg),
        }
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CliError::ConfigFile(e) => Some(e),
            CliError::Input { error, .. } => Some(error),
            CliError::Runtime(e) => Some(e),
            CliError::Signal(e) => Some(e),
            _ => None,
        }
    }
}

impl From<ConfigFileError> for CliError {
    fn from(e: ConfigFileError) -> Self {
        CliError::ConfigFile(e)
    }
}
