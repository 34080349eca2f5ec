//! Planar geometry for route planning.
//!
//! Coordinates are flat (x, y) pairs in kilometres with the depot at the
//! origin. A point with a non-finite coordinate is treated as undefined.

use crate::error::{PlanError, PlanResult};
use serde::{Deserialize, Serialize};

/// A 2D coordinate in kilometres.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

/// Fixed depot every trip starts from and returns to.
pub const DEPOT: Point = Point { x: 0.0, y: 0.0 };

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Build a point, rejecting NaN or infinite coordinates.
    pub fn checked(x: f64, y: f64) -> PlanResult<Self> {
        let point = Self { x, y };
        if point.is_defined() {
            Ok(point)
        } else {
            Err(PlanError::UndefinedCoordinate { x, y })
        }
    }

    pub fn is_defined(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }

    pub fn distance_to(&self, other: &Point) -> f64 {
        distance(*self, *other)
    }

    pub fn is_depot(&self) -> bool {
        *self == DEPOT
    }
}

impl From<(f64, f64)> for Point {
    fn from((x, y): (f64, f64)) -> Self {
        Self { x, y }
    }
}

/// Euclidean distance between two points.
pub fn distance(a: Point, b: Point) -> f64 {
    let dx = a.x - b.x;
    let dy = a.y - b.y;
    (dx * dx + dy * dy).sqrt()
}

/// Distance from `point` to the closest point of segment `a -> b`.
///
/// The projection parameter is clamped to [0, 1], so the result is the
/// distance to the segment rather than to the infinite line. A degenerate
/// segment (a == b) reduces to point distance.
pub fn segment_distance(point: Point, a: Point, b: Point) -> f64 {
    let sx = b.x - a.x;
    let sy = b.y - a.y;
    let seg_len_sq = sx * sx + sy * sy;

    if seg_len_sq == 0.0 {
        return distance(point, a);
    }

    // t = ((P-A) . (B-A)) / |B-A|^2
    let t = (((point.x - a.x) * sx + (point.y - a.y) * sy) / seg_len_sq).clamp(0.0, 1.0);
    let closest = Point::new(a.x + t * sx, a.y + t * sy);
    distance(point, closest)
}

/// Total length of a route, summing consecutive legs.
///
/// Routes with fewer than two points have zero length. An undefined point
/// anywhere in the route is rejected.
pub fn route_distance(route: &[Point]) -> PlanResult<f64> {
    if let Some(index) = route.iter().position(|point| !point.is_defined()) {
        return Err(PlanError::UndefinedPoint { index });
    }
    Ok(route
        .windows(2)
        .map(|leg| distance(leg[0], leg[1]))
        .sum())
}
