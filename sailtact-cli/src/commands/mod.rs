//! CLI command implementations.
//!
//! Each subcommand has its own module with argument definitions and handlers.
//!
//! # Command Modules
//!
//! - [`config`] - Configuration management (get, set, list, path)
//! - [`follow`] - Live advice from JSON lines on stdin
//! - [`replay`] - Replay a recorded navigation log
//! - [`vmg`] - One-shot VMG calculation

pub mod common;
pub mod config;
pub mod follow;
pub mod replay;
pub mod vmg;
