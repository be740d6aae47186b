pub mod analytics;
pub mod geometry;
pub mod planner;
pub mod rotation;

pub use planner::RotationPlanner;
