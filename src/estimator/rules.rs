//! Generic ingredient rule table
//!
//! Each rule is independent: a description can match any number of them.
//! Table order is the order components appear in the estimate.

use crate::models::FoodComponent;

use super::quantity::{count_before, CountedUnit};
use super::ScanText;

/// Fixed per-serving nutrition values
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Serving {
    pub calories: u32,
    pub protein: u32,
    pub fats: u32,
    pub carbs: u32,
}

impl Serving {
    pub const fn new(calories: u32, protein: u32, fats: u32, carbs: u32) -> Self {
        Self {
            calories,
            protein,
            fats,
            carbs,
        }
    }

    /// Scale linearly by a count
    pub fn times(self, count: u32) -> Self {
        Self {
            calories: self.calories.saturating_mul(count),
            protein: self.protein.saturating_mul(count),
            fats: self.fats.saturating_mul(count),
            carbs: self.carbs.saturating_mul(count),
        }
    }

    pub fn component(self, name: impl Into<String>) -> FoodComponent {
        FoodComponent {
            name: name.into(),
            calories: self.calories,
            protein: self.protein,
            fats: self.fats,
            carbs: self.carbs,
        }
    }
}

/// How a matched rule turns into a component
#[derive(Debug, Clone, Copy)]
pub enum RuleKind {
    /// Single fixed serving
    Fixed {
        name: &'static str,
        serving: Serving,
        assumption: &'static str,
    },
    /// "<N> sausage", scaled per sausage
    Sausages,
    /// "<N> egg", per-egg values depend on "fried"
    Eggs,
    /// Two slices; bread type inferred from the text
    Bread,
}

/// Keyword triggers plus the component they produce
#[derive(Debug, Clone, Copy)]
pub struct Rule {
    pub triggers: &'static [&'static str],
    pub kind: RuleKind,
}

/// A matched rule's contribution
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleMatch {
    pub component: FoodComponent,
    pub assumptions: Vec<String>,
}

pub const SAUSAGE: Serving = Serving::new(150, 12, 13, 1);
pub const EGG_COOKED: Serving = Serving::new(70, 6, 5, 1);
pub const EGG_FRIED: Serving = Serving::new(90, 6, 7, 1);
pub const BREAD_TWO_SLICES: Serving = Serving::new(160, 6, 2, 30);

const fn fixed(
    triggers: &'static [&'static str],
    name: &'static str,
    serving: Serving,
    assumption: &'static str,
) -> Rule {
    Rule {
        triggers,
        kind: RuleKind::Fixed {
            name,
            serving,
            assumption,
        },
    }
}

pub static RULES: &[Rule] = &[
    // Protein
    fixed(
        &["chicken", "turkey"],
        "Grilled Chicken/Turkey Breast",
        Serving::new(300, 45, 8, 0),
        "6oz (170g) grilled chicken breast or turkey, skinless",
    ),
    fixed(
        &["beef", "steak"],
        "Sirloin Steak",
        Serving::new(400, 40, 20, 0),
        "6oz (170g) sirloin steak, lean cut",
    ),
    fixed(
        &["fish", "salmon", "tuna"],
        "Salmon Fillet",
        Serving::new(280, 40, 12, 0),
        "6oz (170g) salmon fillet or tuna steak",
    ),
    Rule {
        triggers: &["sausage"],
        kind: RuleKind::Sausages,
    },
    Rule {
        triggers: &["egg"],
        kind: RuleKind::Eggs,
    },
    // Carbs
    fixed(
        &["rice"],
        "Cooked White Rice",
        Serving::new(200, 4, 0, 45),
        "1 cup (158g) cooked white rice, steamed",
    ),
    fixed(
        &["pasta"],
        "Cooked Pasta",
        Serving::new(220, 8, 1, 43),
        "1 cup (140g) cooked pasta, no sauce",
    ),
    Rule {
        triggers: &["bread", "toast"],
        kind: RuleKind::Bread,
    },
    fixed(
        &["potato"],
        "Baked Potato",
        Serving::new(130, 3, 0, 30),
        "1 medium potato (150g), baked/boiled, no toppings",
    ),
    fixed(
        &["oats", "oatmeal"],
        "Oatmeal",
        Serving::new(150, 5, 3, 27),
        "1/2 cup (40g) dry oats, cooked in water",
    ),
    // Vegetables
    fixed(
        &["broccoli", "vegetables", "salad"],
        "Mixed Vegetables",
        Serving::new(50, 3, 0, 10),
        "1 cup mixed vegetables or salad greens",
    ),
    // Fats
    fixed(
        &["avocado"],
        "Avocado",
        Serving::new(160, 2, 15, 9),
        "1/2 medium avocado (~68g)",
    ),
    fixed(
        &["oil", "butter"],
        "Cooking Oil/Butter",
        Serving::new(120, 0, 14, 0),
        "1 tablespoon (14g) oil or butter",
    ),
    fixed(
        &["nuts", "peanut butter"],
        "Peanut Butter",
        Serving::new(180, 7, 16, 6),
        "2 tablespoons peanut butter or 1oz mixed nuts",
    ),
];

impl Rule {
    pub fn matches(&self, text: &ScanText) -> bool {
        text.contains_any(self.triggers)
    }

    /// Produce this rule's contribution, or None when no trigger is present.
    pub fn apply(&self, text: &ScanText) -> Option<RuleMatch> {
        if !self.matches(text) {
            return None;
        }

        let rule_match = match self.kind {
            RuleKind::Fixed {
                name,
                serving,
                assumption,
            } => RuleMatch {
                component: serving.component(name),
                assumptions: vec![assumption.to_string()],
            },
            RuleKind::Sausages => {
                let count = count_before(text.original(), CountedUnit::Sausage);
                RuleMatch {
                    component: SAUSAGE
                        .times(count)
                        .component(format!("{} Pork Sausages", count)),
                    assumptions: vec![format!(
                        "{} standard pork sausages (~50g each)",
                        count
                    )],
                }
            }
            RuleKind::Eggs => {
                let count = count_before(text.original(), CountedUnit::Egg);
                let fried = text.contains("fried");
                let (cooking, per_egg, suffix) = if fried {
                    ("Fried", EGG_FRIED, ", fried in oil")
                } else {
                    ("Cooked", EGG_COOKED, "")
                };
                RuleMatch {
                    component: per_egg
                        .times(count)
                        .component(format!("{} {} Eggs", count, cooking)),
                    assumptions: vec![format!("{} large eggs (50g each){}", count, suffix)],
                }
            }
            RuleKind::Bread => {
                let bread_type = if text.contains("white") {
                    "White"
                } else if text.contains("sourdough") {
                    "Sourdough"
                } else {
                    "Whole Wheat"
                };
                RuleMatch {
                    component: BREAD_TWO_SLICES
                        .component(format!("2 Slices {} Bread", bread_type)),
                    assumptions: vec![format!(
                        "2 slices {} bread (~60g total)",
                        bread_type.to_lowercase()
                    )],
                }
            }
        };

        Some(rule_match)
    }
}
