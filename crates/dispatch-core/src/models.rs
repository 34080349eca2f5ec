//! Core data models for delivery planning.

use crate::error::{PlanError, PlanResult};
use crate::geometry::{Point, DEPOT};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Delivery urgency. Higher weight is more urgent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    High,
    Medium,
    Low,
}

impl Priority {
    pub fn weight(self) -> u32 {
        match self {
            Priority::High => 3,
            Priority::Medium => 2,
            Priority::Low => 1,
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Priority::High => write!(f, "high"),
            Priority::Medium => write!(f, "medium"),
            Priority::Low => write!(f, "low"),
        }
    }
}

pub type OrderId = u64;

/// A pending delivery.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Order {
    id: OrderId,
    destination: Point,
    weight_kg: f64,
    priority: Priority,
    arrived_at: DateTime<Utc>,
}

impl Order {
    /// Create an order with a caller-supplied id.
    ///
    /// `arrived_at` defaults to now when absent.
    pub fn new(
        id: OrderId,
        destination: Point,
        weight_kg: f64,
        priority: Priority,
        arrived_at: Option<DateTime<Utc>>,
    ) -> PlanResult<Self> {
        if !destination.is_defined() {
            return Err(PlanError::InvalidOrder {
                reason: format!("order {id} has an undefined destination"),
            });
        }
        if !weight_kg.is_finite() || weight_kg <= 0.0 {
            return Err(PlanError::InvalidOrder {
                reason: format!("order {id} weight must be positive, got {weight_kg}"),
            });
        }
        Ok(Self {
            id,
            destination,
            weight_kg,
            priority,
            arrived_at: arrived_at.unwrap_or_else(Utc::now),
        })
    }

    pub fn id(&self) -> OrderId {
        self.id
    }

    pub fn destination(&self) -> Point {
        self.destination
    }

    pub fn weight_kg(&self) -> f64 {
        self.weight_kg
    }

    pub fn priority(&self) -> Priority {
        self.priority
    }

    pub fn arrived_at(&self) -> DateTime<Utc> {
        self.arrived_at
    }

    /// Straight-line distance from the depot to the destination.
    pub fn distance_from_depot(&self) -> f64 {
        DEPOT.distance_to(&self.destination)
    }
}

/// Monotonic order id allocator, owned by whoever builds a planning run.
#[derive(Debug, Clone)]
pub struct OrderIds {
    next: OrderId,
}

impl Default for OrderIds {
    fn default() -> Self {
        Self::new()
    }
}

impl OrderIds {
    pub fn new() -> Self {
        Self::starting_at(1)
    }

    pub fn starting_at(first: OrderId) -> Self {
        Self { next: first }
    }

    pub fn next_id(&mut self) -> OrderId {
        let id = self.next;
        self.next += 1;
        id
    }

    /// Create an order with the next id in the sequence.
    ///
    /// The id is only consumed when the order is valid.
    pub fn order(
        &mut self,
        destination: Point,
        weight_kg: f64,
        priority: Priority,
        arrived_at: Option<DateTime<Utc>>,
    ) -> PlanResult<Order> {
        let order = Order::new(self.next, destination, weight_kg, priority, arrived_at)?;
        self.next += 1;
        Ok(order)
    }
}

/// A delivery drone.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Drone {
    id: String,
    capacity_kg: f64,
    flight_hours: f64,
}

impl Drone {
    /// Both capacity and flight time per charge must be positive.
    pub fn new(id: impl Into<String>, capacity_kg: f64, flight_hours: f64) -> PlanResult<Self> {
        let id = id.into();
        let valid = |value: f64| value.is_finite() && value > 0.0;
        if !valid(capacity_kg) || !valid(flight_hours) {
            return Err(PlanError::InvalidDrone {
                id,
                capacity_kg,
                flight_hours,
            });
        }
        Ok(Self {
            id,
            capacity_kg,
            flight_hours,
        })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn capacity_kg(&self) -> f64 {
        self.capacity_kg
    }

    /// Flight time on one full charge, in hours.
    pub fn flight_hours(&self) -> f64 {
        self.flight_hours
    }

    /// Distance the drone covers on one full charge.
    pub fn range_km(&self) -> f64 {
        self.capacity_kg * self.flight_hours
    }
}
