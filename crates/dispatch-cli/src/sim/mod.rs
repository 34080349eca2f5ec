//! Built-in planning scenarios.

pub mod scenarios;

pub use scenarios::{scenario_by_name, SCENARIO_NAMES};
