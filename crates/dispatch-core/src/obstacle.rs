//! Circular keep-out zones and single-leg detours around them.

use crate::error::{PlanError, PlanResult};
use crate::geometry::{segment_distance, Point};
use serde::Serialize;

/// Extra clearance added to the radius when placing detour waypoints.
pub const CLEARANCE_MARGIN: f64 = 0.5;

/// A circular obstacle the route must not cross.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Obstacle {
    center: Point,
    radius: f64,
}

impl Obstacle {
    pub fn new(x: f64, y: f64, radius: f64) -> PlanResult<Self> {
        if !radius.is_finite() || radius <= 0.0 {
            return Err(PlanError::InvalidObstacle { radius });
        }
        let center = Point::checked(x, y)?;
        Ok(Self { center, radius })
    }

    pub fn center(&self) -> Point {
        self.center
    }

    pub fn radius(&self) -> f64 {
        self.radius
    }

    /// Radius plus the clearance margin.
    pub fn clearance(&self) -> f64 {
        self.radius + CLEARANCE_MARGIN
    }

    /// Whether the segment `a -> b` passes strictly inside the obstacle.
    pub fn intersects(&self, a: Point, b: Point) -> bool {
        segment_distance(self.center, a, b) < self.radius
    }

    /// Two waypoints that shift the leg `origin -> destination` sideways, clear
    /// of the obstacle.
    ///
    /// The offset runs along the unit perpendicular of the leg, on the side of
    /// the leg midpoint relative to the obstacle center. A zero-length leg has
    /// no perpendicular and yields no waypoints.
    pub fn detour(&self, origin: Point, destination: Point) -> Vec<Point> {
        let dx = destination.x - origin.x;
        let dy = destination.y - origin.y;
        let length = dx.hypot(dy);
        if length == 0.0 {
            return Vec::new();
        }

        let mut px = -dy / length;
        let mut py = dx / length;

        let mid_x = (origin.x + destination.x) * 0.5;
        let mid_y = (origin.y + destination.y) * 0.5;
        let dot = (mid_x - self.center.x) * px + (mid_y - self.center.y) * py;
        if dot < 0.0 {
            px = -px;
            py = -py;
        }

        let clearance = self.clearance();
        vec![
            Point::new(origin.x + px * clearance, origin.y + py * clearance),
            Point::new(destination.x + px * clearance, destination.y + py * clearance),
        ]
    }
}
