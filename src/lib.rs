//! Day planner and habit tracker engine: day-type templates, weighted task
//! completion, goal trackers with manual overrides, and time-bucketed statistics.

pub mod app;
pub mod config;
pub mod domain;
pub mod error;
pub mod logging;
pub mod persistence;
pub mod planner;
pub mod report;
pub mod stats;

pub use app::AppState;
pub use error::{PlannerError, Result};
