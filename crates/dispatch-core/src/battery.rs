//! Segment-by-segment battery replay of a planned route.

use crate::error::{PlanError, PlanResult};
use crate::geometry::{distance, route_distance, Point};
use crate::models::Drone;
use crate::trip::Trip;
use serde::Serialize;

/// Floor for the range used as a divisor.
const MIN_RANGE_KM: f64 = 1e-6;

/// Charge state after flying one leg.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BatteryStep {
    pub segment_km: f64,
    pub cumulative_km: f64,
    pub segment_hours: f64,
    pub cumulative_hours: f64,
    /// Remaining charge in percent, 0-100.
    pub remaining_charge_pct: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct BatterySimulation<'a> {
    pub drone: &'a Drone,
    pub steps: Vec<BatteryStep>,
    pub total_distance_km: f64,
    pub total_time_hours: f64,
    /// False when the charge ran out before the final leg.
    pub completed: bool,
}

impl BatterySimulation<'_> {
    pub fn final_charge_pct(&self) -> f64 {
        self.steps
            .last()
            .map(|step| step.remaining_charge_pct)
            .unwrap_or(100.0)
    }
}

/// Replay `route` leg by leg starting from a full charge.
///
/// Each leg consumes `segment / range * 100` percent. If the charge reaches
/// zero before the last leg the replay stops there and is marked incomplete;
/// running dry exactly on the last leg still completes the route.
pub fn simulate<'a>(drone: &'a Drone, route: &[Point]) -> PlanResult<BatterySimulation<'a>> {
    route_distance(route)?;

    if route.len() < 2 {
        return Ok(BatterySimulation {
            drone,
            steps: Vec::new(),
            total_distance_km: 0.0,
            total_time_hours: 0.0,
            completed: true,
        });
    }

    let range_km = drone.range_km().max(MIN_RANGE_KM);
    let flight_hours = drone.flight_hours();
    let last_leg = route.len() - 2;

    let mut steps = Vec::with_capacity(route.len() - 1);
    let mut cumulative_km = 0.0;
    let mut cumulative_hours = 0.0;
    let mut charge_pct = 100.0_f64;
    let mut completed = true;

    for (idx, leg) in route.windows(2).enumerate() {
        let segment_km = distance(leg[0], leg[1]);
        cumulative_km += segment_km;

        let consumption_pct = segment_km / range_km * 100.0;
        charge_pct = (charge_pct - consumption_pct).max(0.0);

        let segment_hours = flight_hours * (segment_km / range_km);
        cumulative_hours += segment_hours;

        steps.push(BatteryStep {
            segment_km,
            cumulative_km,
            segment_hours,
            cumulative_hours,
            remaining_charge_pct: charge_pct,
        });

        if charge_pct <= 0.0 && idx < last_leg {
            completed = false;
            break;
        }
    }

    Ok(BatterySimulation {
        drone,
        steps,
        total_distance_km: cumulative_km,
        total_time_hours: cumulative_hours,
        completed,
    })
}

/// Battery replay of a finalized trip.
pub fn simulate_trip<'a>(trip: &Trip<'a>) -> PlanResult<BatterySimulation<'a>> {
    if !trip.is_finalized() {
        return Err(PlanError::InvalidRoute {
            reason: format!("trip for drone {} has no planned route", trip.drone().id()),
        });
    }
    simulate(trip.drone(), trip.route())
}
