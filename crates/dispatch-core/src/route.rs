//! Closed route construction from the depot through a set of destinations.
//!
//! Destinations are sequenced greedily by nearest neighbour, then each leg is
//! checked against the obstacle list and bent around the first obstacle it
//! crosses.

use crate::geometry::{distance, Point, DEPOT};
use crate::obstacle::Obstacle;

/// Build a route that starts and ends at the depot and visits every
/// destination once.
pub fn build_route(destinations: &[Point], obstacles: &[Obstacle]) -> Vec<Point> {
    let sequenced = nearest_neighbor_sequence(destinations);
    apply_obstacles(&sequenced, obstacles)
}

/// Depot, then repeatedly the closest remaining destination, then depot.
///
/// Ties go to the destination that appears first in `destinations`.
pub fn nearest_neighbor_sequence(destinations: &[Point]) -> Vec<Point> {
    let mut remaining: Vec<Point> = destinations.to_vec();
    let mut route = Vec::with_capacity(remaining.len() + 2);
    let mut current = DEPOT;
    route.push(current);

    while let Some(index) = nearest_index(current, &remaining) {
        current = remaining.remove(index);
        route.push(current);
    }

    route.push(DEPOT);
    route
}

fn nearest_index(from: Point, candidates: &[Point]) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;
    for (idx, candidate) in candidates.iter().enumerate() {
        let dist = distance(from, *candidate);
        let replace = best.map(|(_, best_dist)| dist < best_dist).unwrap_or(true);
        if replace {
            best = Some((idx, dist));
        }
    }
    best.map(|(idx, _)| idx)
}

/// Insert detour waypoints for legs that cross an obstacle.
///
/// Obstacles are tested in input order and only the first one crossed by a
/// leg contributes a detour. A waypoint equal to the point just before it is
/// skipped.
pub fn apply_obstacles(route: &[Point], obstacles: &[Obstacle]) -> Vec<Point> {
    if route.len() < 2 || obstacles.is_empty() {
        return route.to_vec();
    }

    let mut adjusted = Vec::with_capacity(route.len() * 3);
    for leg in route.windows(2) {
        let (origin, destination) = (leg[0], leg[1]);
        adjusted.push(origin);

        let Some(obstacle) = obstacles
            .iter()
            .find(|obstacle| obstacle.intersects(origin, destination))
        else {
            continue;
        };

        for waypoint in obstacle.detour(origin, destination) {
            if adjusted.last() != Some(&waypoint) {
                adjusted.push(waypoint);
            }
        }
    }

    if let Some(last) = route.last() {
        adjusted.push(*last);
    }
    adjusted
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::route_distance;

    #[test]
    fn empty_destinations_give_depot_round_trip() {
        let route = build_route(&[], &[]);
        assert_eq!(route, vec![DEPOT, DEPOT]);
        assert_eq!(route_distance(&route).unwrap(), 0.0);
    }

    #[test]
    fn visits_nearest_first() {
        let far = Point::new(10.0, 0.0);
        let near = Point::new(1.0, 0.0);
        let mid = Point::new(4.0, 0.0);
        let route = build_route(&[far, near, mid], &[]);
        assert_eq!(route, vec![DEPOT, near, mid, far, DEPOT]);
    }

    #[test]
    fn ties_go_to_first_listed() {
        let a = Point::new(0.0, 2.0);
        let b = Point::new(2.0, 0.0);
        assert_eq!(nearest_neighbor_sequence(&[a, b])[1], a);
        assert_eq!(nearest_neighbor_sequence(&[b, a])[1], b);
    }

    #[test]
    fn crossing_leg_gets_detour_on_both_directions() {
        let obstacle = Obstacle::new(5.0, 0.0, 1.0).unwrap();
        let route = build_route(&[Point::new(10.0, 0.0)], &[obstacle]);

        assert_eq!(
            route,
            vec![
                DEPOT,
                Point::new(0.0, 1.5),
                Point::new(10.0, 1.5),
                Point::new(10.0, 0.0),
                Point::new(10.0, -1.5),
                Point::new(0.0, -1.5),
                DEPOT,
            ]
        );
    }

    #[test]
    fn only_first_crossed_obstacle_applies() {
        let first = Obstacle::new(3.0, 0.0, 1.0).unwrap();
        let second = Obstacle::new(7.0, 0.0, 1.0).unwrap();
        let base = vec![DEPOT, Point::new(10.0, 0.0)];
        let adjusted = apply_obstacles(&base, &[first, second]);
        assert_eq!(adjusted.len(), 4);
        assert!((adjusted[1].y - first.clearance()).abs() < 1e-12);
    }

    #[test]
    fn clear_legs_are_untouched() {
        let obstacle = Obstacle::new(50.0, 50.0, 1.0).unwrap();
        let base = vec![DEPOT, Point::new(3.0, 4.0), DEPOT];
        assert_eq!(apply_obstacles(&base, &[obstacle]), base);
    }

    #[test]
    fn zero_length_leg_inside_obstacle_is_left_alone() {
        let obstacle = Obstacle::new(0.0, 0.0, 1.0).unwrap();
        let base = vec![DEPOT, DEPOT];
        assert!(obstacle.intersects(DEPOT, DEPOT));
        assert_eq!(apply_obstacles(&base, &[obstacle]), base);
    }
}
