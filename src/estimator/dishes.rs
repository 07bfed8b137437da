//! Compound dish overrides
//!
//! Dishes with a fixed composition. A matching dish replaces the generic
//! rule scan entirely, so a burger is never also counted as beef and bread.

use crate::models::{FoodComponent, Macros, NutritionEstimate};

use super::quantity::{count_before, CountedUnit};
use super::rules::Serving;
use super::ScanText;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dish {
    Pizza,
    Burger,
    Sandwich,
    Shake,
}

/// Positive triggers and negative keywords selecting a dish
struct DishGuard {
    dish: Dish,
    triggers: &'static [&'static str],
    excludes: &'static [&'static str],
}

/// Checked in order; the first guard that passes wins.
static DISH_GUARDS: &[DishGuard] = &[
    DishGuard {
        dish: Dish::Pizza,
        triggers: &["pizza"],
        excludes: &["bread"],
    },
    DishGuard {
        dish: Dish::Burger,
        triggers: &["burger", "hamburger"],
        excludes: &["bun"],
    },
    DishGuard {
        dish: Dish::Sandwich,
        triggers: &["sandwich"],
        excludes: &["burger"],
    },
    DishGuard {
        dish: Dish::Shake,
        triggers: &["protein shake", "shake"],
        excludes: &[],
    },
];

pub const PIZZA_SLICE: Serving = Serving::new(285, 12, 10, 36);

const BURGER_PARTS: &[(&str, Serving)] = &[
    ("Beef Patty (1/4 lb)", Serving::new(290, 25, 20, 0)),
    ("Burger Bun", Serving::new(150, 5, 2, 28)),
    ("Cheese Slice", Serving::new(70, 3, 5, 1)),
    ("Condiments & Toppings", Serving::new(30, 1, 1, 11)),
];

const BURGER_ASSUMPTIONS: &[&str] = &[
    "Standard 1/4 lb (113g) beef patty",
    "Sesame seed bun, 1 cheese slice",
    "Lettuce, tomato, onion, pickles, mayo/sauce",
];

const SANDWICH_PARTS: &[(&str, Serving)] = &[
    ("2 Slices Bread", Serving::new(160, 6, 2, 30)),
    ("3oz Deli Meat", Serving::new(120, 12, 3, 2)),
    ("Cheese Slice", Serving::new(70, 3, 5, 1)),
    ("Vegetables & Condiments", Serving::new(20, 1, 2, 12)),
];

const SANDWICH_ASSUMPTIONS: &[&str] = &[
    "Turkey or ham deli meat (3oz)",
    "Lettuce, tomato, mustard or light mayo",
];

const SHAKE_PARTS: &[(&str, Serving)] = &[
    ("Whey Protein Powder (1 scoop)", Serving::new(120, 25, 1, 3)),
    ("Liquid Base (water/milk)", Serving::new(130, 15, 2, 12)),
];

const SHAKE_ASSUMPTIONS: &[&str] = &[
    "1 scoop (30g) whey protein powder",
    "8oz water or unsweetened almond milk",
];

impl DishGuard {
    fn passes(&self, text: &ScanText) -> bool {
        text.contains_any(self.triggers) && !text.contains_any(self.excludes)
    }
}

/// Pick the compound dish for a description, if any.
pub fn select_dish(text: &ScanText) -> Option<Dish> {
    DISH_GUARDS
        .iter()
        .find(|guard| guard.passes(text))
        .map(|guard| guard.dish)
}

impl Dish {
    pub fn name(self) -> &'static str {
        match self {
            Dish::Pizza => "Pizza",
            Dish::Burger => "Burger",
            Dish::Sandwich => "Sandwich",
            Dish::Shake => "Protein Shake",
        }
    }

    pub fn estimate(self, text: &ScanText) -> NutritionEstimate {
        match self {
            Dish::Pizza => estimate_pizza(text),
            Dish::Burger => fixed_dish(self.name(), BURGER_PARTS, BURGER_ASSUMPTIONS),
            Dish::Sandwich => fixed_dish(self.name(), SANDWICH_PARTS, SANDWICH_ASSUMPTIONS),
            Dish::Shake => fixed_dish(self.name(), SHAKE_PARTS, SHAKE_ASSUMPTIONS),
        }
    }
}

fn estimate_pizza(text: &ScanText) -> NutritionEstimate {
    let slices = count_before(text.original(), CountedUnit::Slice);
    let component = PIZZA_SLICE
        .times(slices)
        .component(format!("{} Pizza Slices (Cheese)", slices));

    let assumptions = vec![
        format!("{} slices from 14-inch pizza (1/8 of pie per slice)", slices),
        "~30g mozzarella cheese per slice".to_string(),
        "Tomato sauce and regular crust".to_string(),
        "Add 50-100 cal/slice for meat toppings".to_string(),
    ];

    NutritionEstimate::new(
        format!("Pizza ({} slices)", slices),
        component.macros(),
        assumptions,
        vec![component],
    )
}

fn fixed_dish(
    name: &str,
    parts: &[(&str, Serving)],
    assumptions: &[&str],
) -> NutritionEstimate {
    let components: Vec<FoodComponent> = parts
        .iter()
        .map(|(part, serving)| serving.component(*part))
        .collect();
    let totals: Macros = components.iter().map(FoodComponent::macros).sum();

    NutritionEstimate::new(
        name.to_string(),
        totals,
        assumptions.iter().map(|a| a.to_string()).collect(),
        components,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dish_for(text: &str) -> Option<Dish> {
        select_dish(&ScanText::new(text))
    }

    #[test]
    fn test_guard_order_and_exclusions() {
        assert_eq!(dish_for("pepperoni pizza"), Some(Dish::Pizza));
        assert_eq!(dish_for("pizza with garlic bread"), None);
        assert_eq!(dish_for("Hamburger"), Some(Dish::Burger));
        assert_eq!(dish_for("burger with extra bun"), None);
        assert_eq!(dish_for("burger sandwich"), Some(Dish::Burger));
        assert_eq!(dish_for("burger sandwich on a bun"), None);
        assert_eq!(dish_for("ham sandwich"), Some(Dish::Sandwich));
        assert_eq!(dish_for("chocolate shake"), Some(Dish::Shake));
        assert_eq!(dish_for("pizza and a shake"), Some(Dish::Pizza));
        assert_eq!(dish_for("chicken and rice"), None);
    }

    #[test]
    fn test_pizza_default_slices() {
        let est = Dish::Pizza.estimate(&ScanText::new("pizza"));
        assert_eq!(est.name, "Pizza (2 slices)");
        assert_eq!(est.calories, 570);
        assert_eq!(est.protein, 24);
        assert_eq!(est.fats, 20);
        assert_eq!(est.carbs, 72);
        assert_eq!(est.components.len(), 1);
        assert_eq!(est.components[0].name, "2 Pizza Slices (Cheese)");
        assert_eq!(est.assumptions.len(), 4);
        assert!(est.assumptions[3].contains("meat toppings"));
    }

    #[test]
    fn test_pizza_counted_slices() {
        let est = Dish::Pizza.estimate(&ScanText::new("3 Slices of Pizza"));
        assert_eq!(est.name, "Pizza (3 slices)");
        assert_eq!(est.calories, 855);
        assert_eq!(
            est.assumptions[0],
            "3 slices from 14-inch pizza (1/8 of pie per slice)"
        );
    }

    #[test]
    fn test_burger_totals() {
        let est = Dish::Burger.estimate(&ScanText::new("burger"));
        assert_eq!(est.name, "Burger");
        assert_eq!(est.components.len(), 4);
        assert_eq!(est.calories, 540);
        assert_eq!(est.protein, 34);
        assert_eq!(est.fats, 28);
        assert_eq!(est.carbs, 40);
        assert_eq!(est.assumptions.len(), 3);
    }

    #[test]
    fn test_sandwich_totals() {
        let est = Dish::Sandwich.estimate(&ScanText::new("sandwich"));
        assert_eq!(est.name, "Sandwich");
        assert_eq!(est.components.len(), 4);
        assert_eq!(est.calories, 370);
        assert_eq!(est.protein, 22);
        assert_eq!(est.fats, 12);
        assert_eq!(est.carbs, 45);
        assert_eq!(est.assumptions.len(), 2);
    }

    #[test]
    fn test_shake_totals() {
        let est = Dish::Shake.estimate(&ScanText::new("protein shake"));
        assert_eq!(est.name, "Protein Shake");
        assert_eq!(est.components.len(), 2);
        assert_eq!(est.calories, 250);
        assert_eq!(est.protein, 40);
        assert_eq!(est.fats, 3);
        assert_eq!(est.carbs, 15);
    }
}
