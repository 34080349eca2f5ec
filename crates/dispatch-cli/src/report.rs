//! Serializable views of a plan for output.

use anyhow::Result;
use dispatch_core::{simulate_trip, BatterySimulation, BatteryStep, Drone, OrderId, Trip};
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct PlanReport {
    pub scene: String,
    pub trip_count: usize,
    /// Sum of all trip times.
    pub total_time_hours: f64,
    pub trips: Vec<TripReport>,
}

#[derive(Debug, Clone, Serialize)]
pub struct TripReport {
    pub drone_id: String,
    pub order_ids: Vec<OrderId>,
    pub total_weight_kg: f64,
    pub distance_km: f64,
    pub time_hours: f64,
    pub exceeds_capacity: bool,
    pub exceeds_range: bool,
    pub route: Vec<[f64; 2]>,
    pub battery: BatteryReport,
}

#[derive(Debug, Clone, Serialize)]
pub struct BatteryReport {
    pub completed: bool,
    pub final_charge_pct: f64,
    pub steps: Vec<BatteryStep>,
}

impl From<&BatterySimulation<'_>> for BatteryReport {
    fn from(sim: &BatterySimulation<'_>) -> Self {
        Self {
            completed: sim.completed,
            final_charge_pct: sim.final_charge_pct(),
            steps: sim.steps.clone(),
        }
    }
}

/// Output of the `simulate` command.
#[derive(Debug, Clone, Serialize)]
pub struct SimulationReport {
    pub drone_id: String,
    pub range_km: f64,
    pub total_distance_km: f64,
    pub total_time_hours: f64,
    pub battery: BatteryReport,
}

impl SimulationReport {
    pub fn new(drone: &Drone, sim: &BatterySimulation<'_>) -> Self {
        Self {
            drone_id: drone.id().to_string(),
            range_km: drone.range_km(),
            total_distance_km: sim.total_distance_km,
            total_time_hours: sim.total_time_hours,
            battery: BatteryReport::from(sim),
        }
    }
}

impl TripReport {
    pub fn from_trip(trip: &Trip<'_>) -> Result<Self> {
        let sim = simulate_trip(trip)?;
        Ok(Self {
            drone_id: trip.drone().id().to_string(),
            order_ids: trip.order_ids(),
            total_weight_kg: trip.total_weight_kg(),
            distance_km: trip.distance_km(),
            time_hours: trip.time_hours(),
            exceeds_capacity: trip.exceeds_capacity(),
            exceeds_range: trip.exceeds_range(),
            route: trip.route().iter().map(|p| [p.x, p.y]).collect(),
            battery: BatteryReport::from(&sim),
        })
    }
}

impl PlanReport {
    pub fn from_trips(scene: impl Into<String>, trips: &[Trip<'_>]) -> Result<Self> {
        let trips = trips
            .iter()
            .map(TripReport::from_trip)
            .collect::<Result<Vec<_>>>()?;
        Ok(Self {
            scene: scene.into(),
            trip_count: trips.len(),
            total_time_hours: trips.iter().map(|t| t.time_hours).sum(),
            trips,
        })
    }
}
