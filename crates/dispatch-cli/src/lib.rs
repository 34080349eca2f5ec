//! Dispatch CLI - command line front end for the delivery planner.
//!
//! The `dispatch` binary exposes:
//! - plan: plan trips for a JSON request
//! - simulate: battery replay of an explicit route
//! - demo: plan one of the built-in scenarios

pub mod config;
pub mod input;
pub mod report;
pub mod sim;

pub use config::Config;
pub use input::{parse_priority, parse_route, PlanRequest, Scene};
pub use report::{PlanReport, SimulationReport, TripReport};
