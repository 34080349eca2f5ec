//! JSON request decoding into validated planning inputs.

use anyhow::{bail, Context, Result};
use chrono::{DateTime, Utc};
use dispatch_core::{Drone, Obstacle, Order, OrderIds, Point, Priority};
use serde::Deserialize;

/// Raw planning request as read from disk or stdin.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PlanRequest {
    #[serde(default)]
    pub drones: Vec<DroneInput>,
    #[serde(default)]
    pub orders: Vec<OrderInput>,
    #[serde(default)]
    pub obstacles: Vec<ObstacleInput>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DroneInput {
    pub id: String,
    pub capacity_kg: f64,
    pub flight_hours: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OrderInput {
    pub x: f64,
    pub y: f64,
    pub weight_kg: f64,
    #[serde(default)]
    pub priority: Option<String>,
    #[serde(default)]
    pub arrived_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ObstacleInput {
    pub x: f64,
    pub y: f64,
    pub radius: f64,
}

/// Validated inputs for one planning run.
#[derive(Debug, Clone)]
pub struct Scene {
    pub name: String,
    pub drones: Vec<Drone>,
    pub orders: Vec<Order>,
    pub obstacles: Vec<Obstacle>,
}

impl PlanRequest {
    pub fn from_json(text: &str) -> Result<Self> {
        serde_json::from_str(text).context("Failed to parse plan request")
    }

    /// Validate every entry, assigning order ids from `ids` in input order.
    pub fn into_scene(self, name: impl Into<String>, ids: &mut OrderIds) -> Result<Scene> {
        let drones = self
            .drones
            .into_iter()
            .enumerate()
            .map(|(idx, d)| {
                Drone::new(d.id, d.capacity_kg, d.flight_hours)
                    .with_context(|| format!("drones[{idx}]"))
            })
            .collect::<Result<Vec<_>>>()?;

        let orders = self
            .orders
            .into_iter()
            .enumerate()
            .map(|(idx, o)| {
                let priority = match o.priority.as_deref() {
                    Some(raw) => parse_priority(raw),
                    None => Ok(Priority::Medium),
                }
                .with_context(|| format!("orders[{idx}]"))?;
                ids.order(Point::new(o.x, o.y), o.weight_kg, priority, o.arrived_at)
                    .with_context(|| format!("orders[{idx}]"))
            })
            .collect::<Result<Vec<_>>>()?;

        let obstacles = self
            .obstacles
            .into_iter()
            .enumerate()
            .map(|(idx, o)| {
                Obstacle::new(o.x, o.y, o.radius).with_context(|| format!("obstacles[{idx}]"))
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Scene {
            name: name.into(),
            drones,
            orders,
            obstacles,
        })
    }
}

/// Case-insensitive priority name, including the Portuguese aliases.
pub fn parse_priority(raw: &str) -> Result<Priority> {
    match raw.trim().to_lowercase().as_str() {
        "high" | "alta" => Ok(Priority::High),
        "medium" | "media" | "média" => Ok(Priority::Medium),
        "low" | "baixa" => Ok(Priority::Low),
        other => bail!("Unknown priority '{other}'"),
    }
}

/// Parse `"x,y x,y ..."` into route points.
pub fn parse_route(raw: &str) -> Result<Vec<Point>> {
    raw.split_whitespace()
        .map(|pair| {
            let (x, y) = pair
                .split_once(',')
                .with_context(|| format!("Expected 'x,y', got '{pair}'"))?;
            let x: f64 = x.trim().parse().with_context(|| format!("Bad x in '{pair}'"))?;
            let y: f64 = y.trim().parse().with_context(|| format!("Bad y in '{pair}'"))?;
            Ok(Point::new(x, y))
        })
        .collect()
}
