//! Estimate output types
//!
//! What the estimator hands back for a meal description.

use serde::{Deserialize, Serialize};

use super::Macros;

/// One matched ingredient or dish part contributing nutrition
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FoodComponent {
    pub name: String,
    pub calories: u32,
    pub protein: u32,
    pub fats: u32,
    pub carbs: u32,
}

impl FoodComponent {
    pub fn macros(&self) -> Macros {
        Macros::new(
            f64::from(self.calories),
            f64::from(self.protein),
            f64::from(self.fats),
            f64::from(self.carbs),
        )
    }
}

/// Structured nutrition estimate for a free-text meal description
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NutritionEstimate {
    pub calories: u32,
    pub protein: u32,
    pub fats: u32,
    pub carbs: u32,
    pub name: String,
    pub assumptions: Vec<String>,
    pub components: Vec<FoodComponent>,
}

impl NutritionEstimate {
    /// Build an estimate from accumulated totals, rounding at this boundary.
    pub fn new(
        name: String,
        totals: Macros,
        assumptions: Vec<String>,
        components: Vec<FoodComponent>,
    ) -> Self {
        let totals = totals.round();
        Self {
            // f64 -> u32 casts saturate, totals are never negative
            calories: totals.calories as u32,
            protein: totals.protein as u32,
            fats: totals.fats as u32,
            carbs: totals.carbs as u32,
            name,
            assumptions,
            components,
        }
    }

    pub fn macros(&self) -> Macros {
        Macros::new(
            f64::from(self.calories),
            f64::from(self.protein),
            f64::from(self.fats),
            f64::from(self.carbs),
        )
    }
}
