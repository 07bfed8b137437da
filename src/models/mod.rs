//! Data models
//!
//! Rust structs for estimates and the entities stored in SQLite.

mod estimate;
mod meal;
mod nutrition;
mod settings;
mod template;

pub use estimate::{FoodComponent, NutritionEstimate};
pub use meal::{Meal, MealCreate, MealUpdate};
pub use nutrition::{clamp_macro, Macros};
pub use settings::{Goals, Setting, GOALS_KEY, LAST_BACKUP_KEY};
pub use template::{MealTemplate, MealTemplateCreate};
