pub mod battery;
pub mod error;
pub mod geometry;
pub mod models;
pub mod obstacle;
pub mod route;
pub mod scheduler;
pub mod trip;

pub use battery::{simulate, simulate_trip, BatterySimulation, BatteryStep};
pub use error::{PlanError, PlanResult};
pub use geometry::{distance, route_distance, segment_distance, Point, DEPOT};
pub use models::{Drone, Order, OrderId, OrderIds, Priority};
pub use obstacle::{Obstacle, CLEARANCE_MARGIN};
pub use route::{apply_obstacles, build_route, nearest_neighbor_sequence};
pub use scheduler::{
    plan, plan_without_obstacles, select_best_combination, urgency_cmp, Backlog,
    CANDIDATE_LIMIT, FALLBACK_SPEED_KMH,
};
pub use trip::{Trip, TOLERANCE};
