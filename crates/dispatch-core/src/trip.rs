//! A single drone outing and the orders loaded onto it.

use crate::geometry::{Point, DEPOT};
use crate::models::{Drone, Order, OrderId};
use serde::Serialize;

/// Floating tolerance for weight and distance limits.
pub const TOLERANCE: f64 = 1e-6;

/// One drone's planned outing.
///
/// `total_weight_kg` is cached and kept equal to the sum of member weights by
/// every mutation.
#[derive(Debug, Clone, Serialize)]
pub struct Trip<'a> {
    drone: &'a Drone,
    orders: Vec<Order>,
    total_weight_kg: f64,
    route: Vec<Point>,
    distance_km: f64,
    time_hours: f64,
}

impl<'a> Trip<'a> {
    pub fn new(drone: &'a Drone) -> Self {
        Self {
            drone,
            orders: Vec::new(),
            total_weight_kg: 0.0,
            route: Vec::new(),
            distance_km: 0.0,
            time_hours: 0.0,
        }
    }

    pub fn drone(&self) -> &'a Drone {
        self.drone
    }

    pub fn orders(&self) -> &[Order] {
        &self.orders
    }

    pub fn order_ids(&self) -> Vec<OrderId> {
        self.orders.iter().map(Order::id).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.orders.is_empty()
    }

    pub fn total_weight_kg(&self) -> f64 {
        self.total_weight_kg
    }

    /// Whether `order` still fits the drone's remaining payload.
    pub fn fits(&self, order: &Order) -> bool {
        self.total_weight_kg + order.weight_kg() <= self.drone.capacity_kg() + TOLERANCE
    }

    pub fn add_order(&mut self, order: Order) {
        self.total_weight_kg += order.weight_kg();
        self.orders.push(order);
    }

    /// Remove the order with `id`, returning it if it was on board.
    pub fn remove_order(&mut self, id: OrderId) -> Option<Order> {
        let index = self.orders.iter().position(|order| order.id() == id)?;
        let order = self.orders.remove(index);
        self.total_weight_kg -= order.weight_kg();
        if self.orders.is_empty() {
            // Drop accumulated rounding error.
            self.total_weight_kg = 0.0;
        }
        Some(order)
    }

    /// Destinations in loading order.
    pub fn destinations(&self) -> Vec<Point> {
        self.orders.iter().map(Order::destination).collect()
    }

    pub(crate) fn finalize(&mut self, route: Vec<Point>, distance_km: f64, time_hours: f64) {
        self.route = route;
        self.distance_km = distance_km;
        self.time_hours = time_hours;
    }

    /// Finalized route, empty until the trip is planned.
    pub fn route(&self) -> &[Point] {
        &self.route
    }

    pub fn distance_km(&self) -> f64 {
        self.distance_km
    }

    pub fn time_hours(&self) -> f64 {
        self.time_hours
    }

    pub fn is_finalized(&self) -> bool {
        self.route.len() >= 2
    }

    /// Whether the finalized route starts and ends at the depot.
    pub fn is_closed_at_depot(&self) -> bool {
        matches!(
            (self.route.first(), self.route.last()),
            (Some(first), Some(last)) if *first == DEPOT && *last == DEPOT
        )
    }

    pub fn exceeds_capacity(&self) -> bool {
        self.total_weight_kg > self.drone.capacity_kg() + TOLERANCE
    }

    pub fn exceeds_range(&self) -> bool {
        self.distance_km > self.drone.range_km() + TOLERANCE
    }
}
