//! NutriLog Library
//!
//! Free-text meal logging with a rule-based nutrition estimator.

pub mod build_info;
pub mod db;
pub mod estimator;
pub mod mcp;
pub mod models;
pub mod tools;

pub use estimator::estimate;
pub use models::{FoodComponent, NutritionEstimate};
