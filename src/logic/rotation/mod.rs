//! Crop rotation reasoning: classify crops into rotation groups, validate a
//! succession, rank follow-up crops and score a field's history.
//!
//! Everything here is pure and infallible.

pub mod classifier;
pub mod scorer;
pub mod suggester;
pub mod validator;

pub use classifier::classify_rotation_group;
pub use scorer::score_rotation_compliance;
pub use suggester::{ideal_successors, suggest_next_crops, IdealSuccessors};
pub use validator::check_rotation;
