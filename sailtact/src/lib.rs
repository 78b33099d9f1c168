//! SailTact - tack and jibe advisor for sailing.
//!
//! Learns how fast the boat actually sails on each tack at each true wind
//! angle and periodically checks whether tacking or jibing would improve
//! velocity made good (VMG).
//!
//! # Modules
//!
//! - [`angle`], [`geo`], [`vmg`] - circular angle math, geodesy, VMG
//! - [`wind`], [`navigation`] - inputs from the sailor and the positioning source
//! - [`performance`] - learned per-tack speed model
//! - [`evaluator`] - per-tick maneuver decision
//! - [`ticker`], [`advisor`] - scheduling and session orchestration
//! - [`config`], [`logging`] - settings file and tracing setup

pub mod advisor;
pub mod angle;
pub mod config;
pub mod evaluator;
pub mod geo;
pub mod logging;
pub mod navigation;
pub mod performance;
pub mod ticker;
pub mod vmg;
pub mod wind;

pub use advisor::{Advisor, AdvisorEvent};
pub use config::AdvisorSettings;
pub use evaluator::{ManeuverEvaluator, ManeuverKind, ManeuverRecommendation, TurnDirection};
pub use navigation::{NavigationFix, NavigationState, NavigationUpdate};
pub use performance::PerformanceModel;
pub use vmg::TackSide;
pub use wind::WindInput;
