//! Trip assignment: drains the order backlog into per-drone trips.
//!
//! Each iteration takes the next drone round-robin, searches the most urgent
//! orders for the best load that fits the drone's payload and range, then
//! trims the trip if its final route is still too long.

use crate::error::{PlanError, PlanResult};
use crate::geometry::{route_distance, Point};
use crate::models::{Drone, Order, OrderId};
use crate::obstacle::Obstacle;
use crate::route::build_route;
use crate::trip::{Trip, TOLERANCE};
use chrono::{DateTime, Utc};
use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashSet};

/// Upper bound on orders considered per trip.
///
/// The combination search visits up to 2^CANDIDATE_LIMIT subsets (4096 at
/// 12); raising it grows the per-trip cost exponentially.
pub const CANDIDATE_LIMIT: usize = 12;

/// Cruise speed assumed when a drone has no usable range or flight time.
pub const FALLBACK_SPEED_KMH: f64 = 40.0;

/// Urgency ordering: `Greater` means `a` should be served before `b`.
///
/// Higher priority first, then earlier arrival, then lower id.
pub fn urgency_cmp(a: &Order, b: &Order) -> Ordering {
    a.priority()
        .weight()
        .cmp(&b.priority().weight())
        .then_with(|| b.arrived_at().cmp(&a.arrived_at()))
        .then_with(|| b.id().cmp(&a.id()))
}

#[derive(Debug, Clone)]
struct Pending(Order);

impl PartialEq for Pending {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Pending {}

impl PartialOrd for Pending {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Pending {
    fn cmp(&self, other: &Self) -> Ordering {
        urgency_cmp(&self.0, &other.0)
    }
}

/// Orders not yet assigned to a trip, most urgent on top.
#[derive(Debug, Clone, Default)]
pub struct Backlog {
    heap: BinaryHeap<Pending>,
}

impl Backlog {
    pub fn new(orders: impl IntoIterator<Item = Order>) -> Self {
        Self {
            heap: orders.into_iter().map(Pending).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.heap.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    pub fn push(&mut self, order: Order) {
        self.heap.push(Pending(order));
    }

    pub fn pop_most_urgent(&mut self) -> Option<Order> {
        self.heap.pop().map(|pending| pending.0)
    }

    /// Up to `limit` most urgent orders, most urgent first. Does not remove them.
    pub fn candidates(&self, limit: usize) -> Vec<Order> {
        if limit == 0 {
            return Vec::new();
        }
        let most_urgent_first = |a: &&Order, b: &&Order| urgency_cmp(b, a);
        let mut pending: Vec<&Order> = self.heap.iter().map(|pending| &pending.0).collect();
        if pending.len() > limit {
            pending.select_nth_unstable_by(limit - 1, most_urgent_first);
            pending.truncate(limit);
        }
        pending.sort_by(most_urgent_first);
        pending.into_iter().cloned().collect()
    }

    /// Remove the orders with the given ids, returned in `ids` order.
    ///
    /// Ids not in the backlog are ignored.
    pub fn remove_all(&mut self, ids: &[OrderId]) -> Vec<Order> {
        let mut pending = std::mem::take(&mut self.heap).into_vec();
        let mut removed = Vec::with_capacity(ids.len());
        for id in ids {
            if let Some(pos) = pending.iter().position(|entry| entry.0.id() == *id) {
                removed.push(pending.swap_remove(pos).0);
            }
        }
        self.heap = BinaryHeap::from(pending);
        removed
    }
}

/// Ranking of a feasible candidate load.
#[derive(Debug, Clone, Copy)]
struct CombinationScore {
    priority_sum: u32,
    order_count: usize,
    capacity_use: f64,
    range_use: f64,
    earliest_arrival: DateTime<Utc>,
    distance_km: f64,
}

impl CombinationScore {
    /// `Greater` means `self` is the better load.
    fn compare(&self, other: &Self) -> Ordering {
        self.priority_sum
            .cmp(&other.priority_sum)
            .then_with(|| self.order_count.cmp(&other.order_count))
            .then_with(|| self.capacity_use.total_cmp(&other.capacity_use))
            .then_with(|| self.range_use.total_cmp(&other.range_use))
            .then_with(|| other.earliest_arrival.cmp(&self.earliest_arrival))
            .then_with(|| other.distance_km.total_cmp(&self.distance_km))
    }
}

/// Exhaustive include/exclude search over a bounded candidate pool.
struct CombinationSearch<'s> {
    candidates: &'s [Order],
    drone: &'s Drone,
    obstacles: &'s [Obstacle],
    current: Vec<usize>,
    best: Option<(Vec<usize>, CombinationScore)>,
    evaluated: usize,
}

impl<'s> CombinationSearch<'s> {
    fn new(candidates: &'s [Order], drone: &'s Drone, obstacles: &'s [Obstacle]) -> Self {
        Self {
            candidates,
            drone,
            obstacles,
            current: Vec::with_capacity(candidates.len()),
            best: None,
            evaluated: 0,
        }
    }

    fn explore(&mut self, index: usize, weight_kg: f64) -> PlanResult<()> {
        if index >= self.candidates.len() {
            return self.evaluate(weight_kg);
        }

        let with_next = weight_kg + self.candidates[index].weight_kg();
        if with_next <= self.drone.capacity_kg() + TOLERANCE {
            self.current.push(index);
            self.explore(index + 1, with_next)?;
            self.current.pop();
        }

        self.explore(index + 1, weight_kg)
    }

    fn evaluate(&mut self, weight_kg: f64) -> PlanResult<()> {
        if self.current.is_empty() {
            return Ok(());
        }
        let capacity_kg = self.drone.capacity_kg();
        if weight_kg > capacity_kg + TOLERANCE {
            return Ok(());
        }
        self.evaluated += 1;

        let destinations: Vec<Point> = self
            .current
            .iter()
            .map(|&idx| self.candidates[idx].destination())
            .collect();
        let route = build_route(&destinations, self.obstacles);
        let distance_km = route_distance(&route)?;

        let range_km = self.drone.range_km();
        if range_km > 0.0 && distance_km > range_km + TOLERANCE {
            return Ok(());
        }

        let mut priority_sum = 0;
        let mut earliest_arrival = self.candidates[self.current[0]].arrived_at();
        for &idx in &self.current {
            let order = &self.candidates[idx];
            priority_sum += order.priority().weight();
            earliest_arrival = earliest_arrival.min(order.arrived_at());
        }

        let score = CombinationScore {
            priority_sum,
            order_count: self.current.len(),
            capacity_use: weight_kg / capacity_kg,
            range_use: if range_km == 0.0 {
                0.0
            } else {
                distance_km / range_km
            },
            earliest_arrival,
            distance_km,
        };

        let replace = self
            .best
            .as_ref()
            .map(|(_, best)| score.compare(best) == Ordering::Greater)
            .unwrap_or(true);
        if replace {
            self.best = Some((self.current.clone(), score));
        }
        Ok(())
    }
}

/// Ids of the best load for `drone` among the most urgent backlog orders.
///
/// Empty when no non-empty subset fits both payload and range.
pub fn select_best_combination(
    drone: &Drone,
    backlog: &Backlog,
    obstacles: &[Obstacle],
) -> PlanResult<Vec<OrderId>> {
    if backlog.is_empty() {
        return Ok(Vec::new());
    }

    let candidates = backlog.candidates(CANDIDATE_LIMIT);
    let mut search = CombinationSearch::new(&candidates, drone, obstacles);
    search.explore(0, 0.0)?;

    tracing::trace!(
        drone_id = %drone.id(),
        candidates = candidates.len(),
        evaluated = search.evaluated,
        "combination search finished"
    );

    Ok(search
        .best
        .map(|(indices, _)| indices.iter().map(|&idx| candidates[idx].id()).collect())
        .unwrap_or_default())
}

/// Plan trips for every order in `orders`.
///
/// Drones are used round-robin, one new trip per iteration, until the backlog
/// is empty. An empty fleet yields no trips.
pub fn plan<'a>(
    drones: &'a [Drone],
    orders: &[Order],
    obstacles: &[Obstacle],
) -> PlanResult<Vec<Trip<'a>>> {
    if drones.is_empty() {
        if !orders.is_empty() {
            tracing::warn!(orders = orders.len(), "no drones available, nothing planned");
        }
        return Ok(Vec::new());
    }
    ensure_unique_ids(orders)?;

    let mut backlog = Backlog::new(orders.iter().cloned());
    let mut trips = Vec::new();

    for drone in drones.iter().cycle() {
        if backlog.is_empty() {
            break;
        }

        let mut trip = Trip::new(drone);
        let selected = select_best_combination(drone, &backlog, obstacles)?;
        if selected.is_empty() {
            if let Some(order) = backlog.pop_most_urgent() {
                tracing::debug!(
                    drone_id = %drone.id(),
                    order_id = order.id(),
                    "no feasible load, taking most urgent order alone"
                );
                trip.add_order(order);
            }
        } else {
            for order in backlog.remove_all(&selected) {
                trip.add_order(order);
            }
        }

        if trip.is_empty() {
            continue;
        }

        let route = fit_to_range(&mut trip, &mut backlog, obstacles)?;
        let distance_km = route_distance(&route)?;
        let time_hours = flight_time_hours(distance_km, drone);
        trip.finalize(route, distance_km, time_hours);

        if trip.exceeds_range() || trip.exceeds_capacity() {
            tracing::warn!(
                drone_id = %drone.id(),
                orders = ?trip.order_ids(),
                distance_km,
                range_km = drone.range_km(),
                weight_kg = trip.total_weight_kg(),
                capacity_kg = drone.capacity_kg(),
                "order cannot be delivered within drone limits"
            );
        }
        tracing::debug!(
            drone_id = %drone.id(),
            orders = ?trip.order_ids(),
            distance_km,
            time_hours,
            "trip planned"
        );
        trips.push(trip);
    }

    tracing::info!(
        trips = trips.len(),
        orders = orders.len(),
        "planning complete"
    );
    Ok(trips)
}

/// [`plan`] with open airspace.
pub fn plan_without_obstacles<'a>(
    drones: &'a [Drone],
    orders: &[Order],
) -> PlanResult<Vec<Trip<'a>>> {
    plan(drones, orders, &[])
}

fn ensure_unique_ids(orders: &[Order]) -> PlanResult<()> {
    let mut seen = HashSet::with_capacity(orders.len());
    for order in orders {
        if !seen.insert(order.id()) {
            return Err(PlanError::InvalidOrder {
                reason: format!("duplicate order id {}", order.id()),
            });
        }
    }
    Ok(())
}

/// Drop least critical orders back into the backlog until the route fits the
/// drone's range. The last order on a trip is never dropped.
fn fit_to_range(
    trip: &mut Trip<'_>,
    backlog: &mut Backlog,
    obstacles: &[Obstacle],
) -> PlanResult<Vec<Point>> {
    let range_km = trip.drone().range_km();
    loop {
        let route = build_route(&trip.destinations(), obstacles);
        let distance_km = route_distance(&route)?;
        if distance_km <= range_km + TOLERANCE {
            return Ok(route);
        }

        let Some(id) = least_critical(trip.orders()) else {
            return Ok(route);
        };
        if let Some(order) = trip.remove_order(id) {
            tracing::debug!(
                drone_id = %trip.drone().id(),
                order_id = id,
                distance_km,
                range_km,
                "route too long, re-queueing order"
            );
            backlog.push(order);
        }
    }
}

/// Lowest priority, and among those the destination farthest from the depot.
fn least_critical(orders: &[Order]) -> Option<OrderId> {
    if orders.len() < 2 {
        return None;
    }
    orders
        .iter()
        .min_by(|a, b| {
            a.priority()
                .weight()
                .cmp(&b.priority().weight())
                .then_with(|| b.distance_from_depot().total_cmp(&a.distance_from_depot()))
        })
        .map(Order::id)
}

fn flight_time_hours(distance_km: f64, drone: &Drone) -> f64 {
    let range_km = drone.range_km();
    let flight_hours = drone.flight_hours();
    if range_km > 0.0 && flight_hours > 0.0 {
        distance_km / range_km * flight_hours
    } else {
        // Unreachable for drones built through `Drone::new`.
        distance_km / FALLBACK_SPEED_KMH
    }
}
