//! End-to-end planning tests.
//!
//! Run with: cargo test -p dispatch-core --test planning_test

use chrono::{DateTime, Duration, TimeZone, Utc};
use dispatch_core::{
    plan, plan_without_obstacles, simulate_trip, Drone, Obstacle, Order, OrderId, OrderIds,
    Point, Priority, Trip, DEPOT, TOLERANCE,
};
use std::collections::HashMap;

const EPS: f64 = 1e-6;

fn at(minutes: i64) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 5, 1, 8, 0, 0).unwrap() + Duration::minutes(minutes)
}

fn fleet(specs: &[(&str, f64, f64)]) -> Vec<Drone> {
    specs
        .iter()
        .map(|(id, capacity_kg, flight_hours)| Drone::new(*id, *capacity_kg, *flight_hours).unwrap())
        .collect()
}

/// A spread of orders on a fixed grid with mixed priorities and weights.
fn city_orders(count: usize) -> Vec<Order> {
    let mut ids = OrderIds::new();
    (0..count)
        .map(|i| {
            let x = ((i * 7) % 11) as f64 - 5.0;
            let y = ((i * 5) % 9) as f64 - 4.0;
            let weight_kg = 0.5 + (i % 4) as f64;
            let priority = match i % 3 {
                0 => Priority::High,
                1 => Priority::Medium,
                _ => Priority::Low,
            };
            ids.order(Point::new(x, y), weight_kg, priority, Some(at(i as i64)))
                .unwrap()
        })
        .collect()
}

fn assert_each_order_once(trips: &[Trip<'_>], orders: &[Order]) {
    let mut seen: HashMap<OrderId, usize> = HashMap::new();
    for trip in trips {
        for id in trip.order_ids() {
            *seen.entry(id).or_default() += 1;
        }
    }
    assert_eq!(seen.len(), orders.len());
    for order in orders {
        assert_eq!(seen.get(&order.id()), Some(&1), "order {}", order.id());
    }
}

#[test]
fn test_capacity_split_uses_two_trips() {
    let drones = fleet(&[("D1", 5.0, 10.0), ("D2", 5.0, 10.0)]);
    let mut ids = OrderIds::new();
    let orders = vec![
        ids.order(Point::new(2.0, 2.0), 3.0, Priority::High, Some(at(0))).unwrap(),
        ids.order(Point::new(4.0, 3.0), 3.0, Priority::Medium, Some(at(1))).unwrap(),
        ids.order(Point::new(1.0, 5.0), 2.0, Priority::Low, Some(at(2))).unwrap(),
    ];

    let trips = plan_without_obstacles(&drones, &orders).unwrap();

    assert_eq!(trips.len(), 2);
    for trip in &trips {
        assert!(trip.total_weight_kg() <= 5.0 + TOLERANCE);
        assert!(trip.is_closed_at_depot());
    }
    assert_eq!(trips[0].drone().id(), "D1");
    assert_eq!(trips[1].drone().id(), "D2");
    let mut first = trips[0].order_ids();
    first.sort_unstable();
    assert_eq!(first, vec![1, 3]);
    assert_eq!(trips[1].order_ids(), vec![2]);
    assert_each_order_once(&trips, &orders);
}

#[test]
fn test_range_limit_splits_far_orders() {
    // Range 20 km.
    let drones = fleet(&[("D1", 10.0, 2.0)]);
    let mut ids = OrderIds::new();
    let orders = vec![
        ids.order(Point::new(6.0, 0.0), 4.0, Priority::High, Some(at(0))).unwrap(),
        ids.order(Point::new(12.0, 0.0), 4.0, Priority::Low, Some(at(1))).unwrap(),
    ];

    let trips = plan_without_obstacles(&drones, &orders).unwrap();

    assert_eq!(trips.len(), 2);
    assert_eq!(trips[0].order_ids(), vec![1]);
    assert!((trips[0].distance_km() - 12.0).abs() < EPS);
    assert!((trips[0].time_hours() - 1.2).abs() < EPS);
    assert!(!trips[0].exceeds_range());

    // A lone order beyond range is still delivered, flagged.
    assert_eq!(trips[1].order_ids(), vec![2]);
    assert!((trips[1].distance_km() - 24.0).abs() < EPS);
    assert!(trips[1].exceeds_range());
}

#[test]
fn test_obstacle_detour_in_planned_route() {
    let drones = fleet(&[("D1", 10.0, 3.0)]);
    let mut ids = OrderIds::new();
    let orders = vec![ids.order(Point::new(10.0, 0.0), 1.0, Priority::Medium, None).unwrap()];
    let obstacles = vec![Obstacle::new(5.0, 0.0, 1.0).unwrap()];

    let trips = plan(&drones, &orders, &obstacles).unwrap();

    assert_eq!(trips.len(), 1);
    let route = trips[0].route();
    assert_eq!(route.len(), 7);
    assert_eq!(route[1], Point::new(0.0, 1.5));
    assert_eq!(route[2], Point::new(10.0, 1.5));
    assert!(route.iter().any(|p| (p.y - 1.5).abs() < EPS));
    assert!((trips[0].distance_km() - 26.0).abs() < EPS);
    assert!(trips[0].is_closed_at_depot());
}

#[test]
fn test_planned_trip_battery_replay() {
    let drones = fleet(&[("D1", 5.0, 2.0)]);
    let mut ids = OrderIds::new();
    let orders = vec![ids.order(Point::new(3.0, 4.0), 1.0, Priority::High, None).unwrap()];

    let trips = plan_without_obstacles(&drones, &orders).unwrap();
    let sim = simulate_trip(&trips[0]).unwrap();

    assert!(sim.completed);
    assert_eq!(sim.steps.len(), 2);
    assert!((sim.total_distance_km - trips[0].distance_km()).abs() < EPS);
    assert!((sim.total_time_hours - trips[0].time_hours()).abs() < EPS);
    assert!(sim.final_charge_pct().abs() < EPS);
}

#[test]
fn test_overweight_order_gets_its_own_trip() {
    let drones = fleet(&[("D1", 5.0, 10.0)]);
    let mut ids = OrderIds::new();
    let orders = vec![
        ids.order(Point::new(1.0, 1.0), 8.0, Priority::High, Some(at(0))).unwrap(),
        ids.order(Point::new(2.0, 1.0), 2.0, Priority::Low, Some(at(1))).unwrap(),
    ];

    let trips = plan_without_obstacles(&drones, &orders).unwrap();

    assert_eq!(trips.len(), 2);
    let heavy = trips.iter().find(|t| t.order_ids() == vec![1]).unwrap();
    assert!(heavy.exceeds_capacity());
    assert_each_order_once(&trips, &orders);
}

#[test]
fn test_every_order_planned_exactly_once() {
    let drones = fleet(&[("D1", 6.0, 4.0), ("D2", 4.0, 5.0), ("D3", 8.0, 2.0)]);
    let orders = city_orders(30);
    let obstacles = vec![
        Obstacle::new(2.0, 1.0, 0.8).unwrap(),
        Obstacle::new(-3.0, -2.0, 1.2).unwrap(),
    ];

    let trips = plan(&drones, &orders, &obstacles).unwrap();

    assert_each_order_once(&trips, &orders);
    for trip in &trips {
        assert!(!trip.is_empty());
        assert!(trip.is_closed_at_depot());
        assert!(trip.distance_km() >= 0.0);
        if trip.orders().len() > 1 {
            assert!(!trip.exceeds_capacity());
            assert!(!trip.exceeds_range());
        }
        let expected = trip.distance_km() / trip.drone().range_km() * trip.drone().flight_hours();
        assert!((trip.time_hours() - expected).abs() < EPS);
    }
}

#[test]
fn test_drones_rotate_round_robin() {
    let drones = fleet(&[("A", 1.0, 20.0), ("B", 1.0, 20.0), ("C", 1.0, 20.0)]);
    let orders = city_orders(7)
        .into_iter()
        .map(|o| Order::new(o.id(), o.destination(), 1.0, o.priority(), Some(o.arrived_at())).unwrap())
        .collect::<Vec<_>>();

    let trips = plan_without_obstacles(&drones, &orders).unwrap();

    let used: Vec<&str> = trips.iter().map(|t| t.drone().id()).collect();
    assert_eq!(used, vec!["A", "B", "C", "A", "B", "C", "A"]);
}

#[test]
fn test_planning_is_deterministic() {
    let drones = fleet(&[("D1", 6.0, 4.0), ("D2", 4.0, 5.0)]);
    let orders = city_orders(18);
    let obstacles = vec![Obstacle::new(1.0, 2.0, 0.7).unwrap()];

    let first = plan(&drones, &orders, &obstacles).unwrap();
    let second = plan(&drones, &orders, &obstacles).unwrap();

    fn summary(trips: &[Trip<'_>]) -> Vec<(String, Vec<OrderId>, Vec<Point>)> {
        trips
            .iter()
            .map(|t| (t.drone().id().to_string(), t.order_ids(), t.route().to_vec()))
            .collect()
    }
    assert_eq!(summary(&first), summary(&second));
}

#[test]
fn test_empty_inputs() {
    let drones = fleet(&[("D1", 5.0, 1.0)]);
    assert!(plan_without_obstacles(&drones, &[]).unwrap().is_empty());

    let orders = city_orders(3);
    assert!(plan_without_obstacles(&[], &orders).unwrap().is_empty());
}

#[test]
fn test_depot_destination_round_trip_is_zero() {
    let drones = fleet(&[("D1", 5.0, 1.0)]);
    let orders = vec![Order::new(1, DEPOT, 1.0, Priority::Low, None).unwrap()];

    let trips = plan_without_obstacles(&drones, &orders).unwrap();

    assert_eq!(trips.len(), 1);
    assert_eq!(trips[0].distance_km(), 0.0);
    assert_eq!(trips[0].time_hours(), 0.0);
}
