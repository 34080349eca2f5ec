//! Pre-defined planning scenarios for demos and smoke tests.

use crate::input::Scene;
use anyhow::{bail, Result};
use dispatch_core::{Drone, Obstacle, OrderIds, Point, Priority};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

pub const SCENARIO_NAMES: [&str; 4] = ["capacity-split", "autonomy", "obstacle", "random"];

/// Three orders that cannot share one 5 kg drone.
pub fn create_capacity_split_scenario(ids: &mut OrderIds) -> Result<Scene> {
    let drones = vec![Drone::new("D1", 5.0, 10.0)?, Drone::new("D2", 5.0, 10.0)?];
    let orders = vec![
        ids.order(Point::new(2.0, 2.0), 3.0, Priority::High, None)?,
        ids.order(Point::new(4.0, 3.0), 3.0, Priority::Medium, None)?,
        ids.order(Point::new(1.0, 5.0), 2.0, Priority::Low, None)?,
    ];

    Ok(Scene {
        name: "capacity-split".to_string(),
        drones,
        orders,
        obstacles: Vec::new(),
    })
}

/// Two orders on one line whose combined route exceeds the 20 km range.
pub fn create_autonomy_scenario(ids: &mut OrderIds) -> Result<Scene> {
    let drones = vec![Drone::new("D1", 10.0, 2.0)?];
    let orders = vec![
        ids.order(Point::new(6.0, 0.0), 4.0, Priority::High, None)?,
        ids.order(Point::new(12.0, 0.0), 4.0, Priority::Low, None)?,
    ];

    Ok(Scene {
        name: "autonomy".to_string(),
        drones,
        orders,
        obstacles: Vec::new(),
    })
}

/// One delivery straight through a no-fly disc.
pub fn create_obstacle_scenario(ids: &mut OrderIds) -> Result<Scene> {
    let drones = vec![Drone::new("D1", 10.0, 3.0)?];
    let orders = vec![ids.order(Point::new(10.0, 0.0), 1.0, Priority::Medium, None)?];
    let obstacles = vec![Obstacle::new(5.0, 0.0, 1.0)?];

    Ok(Scene {
        name: "obstacle".to_string(),
        drones,
        orders,
        obstacles,
    })
}

/// Seeded random city: three drones, `order_count` orders and two obstacles
/// inside a 20 km square around the depot.
pub fn create_random_scenario(ids: &mut OrderIds, order_count: usize, seed: u64) -> Result<Scene> {
    let mut rng = StdRng::seed_from_u64(seed);

    let drones = vec![
        Drone::new("D1", 8.0, 4.0)?,
        Drone::new("D2", 5.0, 6.0)?,
        Drone::new("D3", 12.0, 2.5)?,
    ];

    let mut orders = Vec::with_capacity(order_count);
    for _ in 0..order_count {
        let destination = Point::new(rng.random_range(-10.0..10.0), rng.random_range(-10.0..10.0));
        let weight_kg = rng.random_range(0.5..4.0);
        let priority = match rng.random_range(0..3) {
            0 => Priority::High,
            1 => Priority::Medium,
            _ => Priority::Low,
        };
        orders.push(ids.order(destination, weight_kg, priority, None)?);
    }

    // Keep discs off the depot so every leg starts in open air.
    let obstacles = (0..2)
        .map(|_| {
            let x = rng.random_range(2.0..8.0) * if rng.random_bool(0.5) { 1.0 } else { -1.0 };
            let y = rng.random_range(-8.0..8.0);
            Obstacle::new(x, y, rng.random_range(0.5..1.5))
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Scene {
        name: format!("random-{seed}"),
        drones,
        orders,
        obstacles,
    })
}

pub fn scenario_by_name(
    name: &str,
    ids: &mut OrderIds,
    order_count: usize,
    seed: u64,
) -> Result<Scene> {
    match name {
        "capacity-split" => create_capacity_split_scenario(ids),
        "autonomy" => create_autonomy_scenario(ids),
        "obstacle" => create_obstacle_scenario(ids),
        "random" => create_random_scenario(ids, order_count, seed),
        other => bail!(
            "Unknown scenario '{other}', expected one of: {}",
            SCENARIO_NAMES.join(", ")
        ),
    }
}
