//! Shared macro-nutrient data structure
//!
//! Used for estimate accumulation, day totals, goals and remaining budgets.

use serde::{Deserialize, Deserializer, Serialize};

/// Clamp an entered macro value into the stored range; negatives become 0
pub fn clamp_macro(value: i64) -> u32 {
    value.clamp(0, i64::from(u32::MAX)) as u32
}

/// Deserialize a stored macro leniently: any integer, clamped like user input
pub fn deserialize_clamped<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    i64::deserialize(deserializer).map(clamp_macro)
}

/// Calories plus the three tracked macros (grams)
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Macros {
    pub calories: f64,
    pub protein: f64, // grams
    pub fats: f64,    // grams
    pub carbs: f64,   // grams
}

impl Macros {
    pub const fn new(calories: f64, protein: f64, fats: f64, carbs: f64) -> Self {
        Self {
            calories,
            protein,
            fats,
            carbs,
        }
    }

    /// Create a new Macros with all zeros
    pub fn zero() -> Self {
        Self::default()
    }

    /// Add another set of macros to this one
    pub fn add(&self, other: &Macros) -> Self {
        Self {
            calories: self.calories + other.calories,
            protein: self.protein + other.protein,
            fats: self.fats + other.fats,
            carbs: self.carbs + other.carbs,
        }
    }

    /// Subtract another set of macros from this one (may go negative)
    pub fn sub(&self, other: &Macros) -> Self {
        Self {
            calories: self.calories - other.calories,
            protein: self.protein - other.protein,
            fats: self.fats - other.fats,
            carbs: self.carbs - other.carbs,
        }
    }

    /// Round every value to the nearest whole number
    pub fn round(&self) -> Self {
        Self {
            calories: self.calories.round(),
            protein: self.protein.round(),
            fats: self.fats.round(),
            carbs: self.carbs.round(),
        }
    }
}

impl std::ops::Add for Macros {
    type Output = Macros;

    fn add(self, other: Macros) -> Macros {
        Macros::add(&self, &other)
    }
}

impl std::ops::AddAssign for Macros {
    fn add_assign(&mut self, other: Macros) {
        *self = Macros::add(self, &other);
    }
}

impl std::iter::Sum for Macros {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Macros::zero(), |acc, n| acc + n)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sum() {
        let a = Macros::new(100.0, 10.0, 5.0, 20.0);
        let b = Macros::new(50.0, 1.0, 0.0, 10.0);
        let total: Macros = vec![a, b].into_iter().sum();
        assert_eq!(total, Macros::new(150.0, 11.0, 5.0, 30.0));
        assert_eq!(a + b, total);
    }

    #[test]
    fn test_clamp_macro() {
        assert_eq!(clamp_macro(-5), 0);
        assert_eq!(clamp_macro(350), 350);
        assert_eq!(clamp_macro(i64::MAX), u32::MAX);
    }

    #[test]
    fn test_sub_can_go_negative() {
        let goal = Macros::new(2000.0, 100.0, 50.0, 200.0);
        let eaten = Macros::new(2100.0, 90.0, 50.0, 10.0);
        let remaining = goal.sub(&eaten);
        assert_eq!(remaining.calories, -100.0);
        assert_eq!(remaining.protein, 10.0);
        assert_eq!(remaining.fats, 0.0);
    }

    #[test]
    fn test_round() {
        let m = Macros::new(199.5, 10.4, 0.6, 3.49);
        assert_eq!(m.round(), Macros::new(200.0, 10.0, 1.0, 3.0));
    }
}
