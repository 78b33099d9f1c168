//! Advisor configuration.
//!
//! # Module Structure
//!
//! - [`settings`] - `AdvisorSettings`, defaults, ranges and clamping
//! - [`shared`] - `SharedSettings` for concurrent readers and writers
//! - [`file`] - INI file load/save and default paths
//! - [`keys`] - `ConfigKey` get/set by `section.key` name
//!
//! # Example Configuration (INI)
//!
//! ```ini
//! [alerts]
//! threshold_mps = 0.1
//! interval_secs = 30
//!
//! [tack]
//! turn_angle_deg = 90
//!
//! [learning]
//! bin_width_deg = 5
//! max_samples_per_bin = 50
//!
//! [wind]
//! twa_positive_starboard = true
//! ```

mod file;
mod keys;
mod parser;
mod settings;
mod shared;
mod writer;

pub use file::{config_directory, config_file_path, ConfigFileError};
pub use keys::{ConfigKey, ConfigKeyError};
pub use settings::*;
pub use shared::SharedSettings;
