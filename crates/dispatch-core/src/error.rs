//! Error types for the planning engine.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum PlanError {
    #[error("drone {id} needs positive capacity and flight time (capacity_kg={capacity_kg}, flight_hours={flight_hours})")]
    InvalidDrone {
        id: String,
        capacity_kg: f64,
        flight_hours: f64,
    },

    #[error("invalid order: {reason}")]
    InvalidOrder { reason: String },

    #[error("obstacle radius must be positive and finite, got {radius}")]
    InvalidObstacle { radius: f64 },

    #[error("undefined point at route index {index}")]
    UndefinedPoint { index: usize },

    #[error("point ({x}, {y}) has a non-finite coordinate")]
    UndefinedCoordinate { x: f64, y: f64 },

    #[error("invalid route: {reason}")]
    InvalidRoute { reason: String },
}

pub type PlanResult<T> = Result<T, PlanError>;
