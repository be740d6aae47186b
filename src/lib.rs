//! Farm field management: crop rotation rules, compliance scoring and
//! multi-year rotation planning over a YAML-described farm.

pub mod config;
pub mod error;
pub mod logic;
pub mod models;

pub use error::{FieldMapError, Result};
