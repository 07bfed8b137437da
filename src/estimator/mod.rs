//! Text-to-nutrition estimation engine
//!
//! Turns a free-text meal description ("2 eggs and toast") into a
//! [`NutritionEstimate`]. Compound dishes are checked first and short-circuit;
//! otherwise every ingredient rule is tested and the matches are summed.
//!
//! The engine is pure: no I/O, no shared mutable state, and it never fails.
//! Descriptions that match nothing get a flagged generic estimate.

mod dishes;
mod quantity;
mod rules;

pub use dishes::{select_dish, Dish};
pub use quantity::{count_before, CountedUnit};
pub use rules::{Rule, RuleKind, RuleMatch, Serving, RULES};

use crate::models::{FoodComponent, Macros, NutritionEstimate};

/// Longest estimate name before it is replaced by the truncated description
pub const MAX_NAME_CHARS: usize = 50;
const TRUNCATED_PREFIX_CHARS: usize = 47;
const ELLIPSIS: &str = "...";

pub const FALLBACK_NAME: &str = "General Meal Estimate";
pub const FALLBACK_SERVING: Serving = Serving::new(400, 25, 15, 45);

const FALLBACK_ASSUMPTIONS: &[&str] = &[
    "⚠️ GENERIC ESTIMATE - Not brand-specific!",
    "Based on average portion sizes from USDA database",
    "Recommend checking product packaging for accurate values",
];

const ESTIMATE_DISCLAIMER: &str = "⚠️ These are ESTIMATES based on generic food data";
const LABEL_REMINDER: &str = "Check product labels for brand-specific nutrition info";

/// A description prepared for keyword matching
#[derive(Debug, Clone)]
pub struct ScanText<'a> {
    original: &'a str,
    lower: String,
}

impl<'a> ScanText<'a> {
    pub fn new(original: &'a str) -> Self {
        Self {
            original,
            lower: original.to_lowercase(),
        }
    }

    /// The description as typed
    pub fn original(&self) -> &'a str {
        self.original
    }

    /// Case-insensitive substring test; `needle` must be lower-case
    pub fn contains(&self, needle: &str) -> bool {
        self.lower.contains(needle)
    }

    pub fn contains_any(&self, needles: &[&str]) -> bool {
        needles.iter().any(|n| self.contains(n))
    }
}

/// Estimate nutrition for a meal description.
pub fn estimate(description: &str) -> NutritionEstimate {
    let text = ScanText::new(description);

    if let Some(dish) = select_dish(&text) {
        tracing::debug!("Description matched compound dish {:?}", dish);
        return dish.estimate(&text);
    }

    let mut totals = Macros::zero();
    let mut assumptions: Vec<String> = Vec::new();
    let mut components: Vec<FoodComponent> = Vec::new();

    for rule_match in RULES.iter().filter_map(|rule| rule.apply(&text)) {
        totals += rule_match.component.macros();
        assumptions.extend(rule_match.assumptions);
        components.push(rule_match.component);
    }

    if components.is_empty() {
        tracing::debug!("No food rules matched, using generic estimate");
        let component = FALLBACK_SERVING.component(FALLBACK_NAME);
        totals = component.macros();
        assumptions = FALLBACK_ASSUMPTIONS.iter().map(|a| a.to_string()).collect();
        components.push(component);
    } else {
        assumptions.insert(0, ESTIMATE_DISCLAIMER.to_string());
        assumptions.push(LABEL_REMINDER.to_string());
    }

    let name = estimate_name(&components, description);
    NutritionEstimate::new(name, totals, assumptions, components)
}

/// Single component name, or all names joined with " + ".
///
/// Joined names longer than [`MAX_NAME_CHARS`] fall back to the start of the
/// description as typed, with an ellipsis.
fn estimate_name(components: &[FoodComponent], description: &str) -> String {
    let name = components
        .iter()
        .map(|c| c.name.as_str())
        .collect::<Vec<_>>()
        .join(" + ");

    if name.chars().count() > MAX_NAME_CHARS {
        let mut truncated: String = description.chars().take(TRUNCATED_PREFIX_CHARS).collect();
        truncated.push_str(ELLIPSIS);
        truncated
    } else {
        name
    }
}
