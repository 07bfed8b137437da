//! Quantity extraction
//!
//! Finds a count written immediately before a food keyword ("3 eggs",
//! "4sausages", "2 slices").

use std::sync::LazyLock;

use regex::Regex;

/// Countable foods with a "<N> keyword" pattern
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CountedUnit {
    Sausage,
    Egg,
    Slice,
}

// Stored as Option so a bad pattern degrades to the default count instead of panicking
static SAUSAGE_COUNT: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"(?i)([0-9]+)\s*sausage").ok());

static EGG_COUNT: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"(?i)([0-9]+)\s*egg").ok());

static SLICE_COUNT: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"(?i)([0-9]+)\s*slice").ok());

impl CountedUnit {
    fn pattern(self) -> Option<&'static Regex> {
        match self {
            CountedUnit::Sausage => SAUSAGE_COUNT.as_ref(),
            CountedUnit::Egg => EGG_COUNT.as_ref(),
            CountedUnit::Slice => SLICE_COUNT.as_ref(),
        }
    }

    /// Count assumed when the description has no number before the keyword
    pub fn default_count(self) -> u32 {
        2
    }
}

/// Extract the count preceding `unit` in `text`, or the unit's default.
///
/// Only the first occurrence is considered. Digit runs too large for a
/// `u32` saturate rather than falling back to the default.
pub fn count_before(text: &str, unit: CountedUnit) -> u32 {
    let Some(captures) = unit.pattern().and_then(|re| re.captures(text)) else {
        return unit.default_count();
    };

    let digits = captures.get(1).map(|m| m.as_str()).unwrap_or_default();
    match digits.parse::<u32>() {
        Ok(n) => n,
        Err(_) => {
            tracing::warn!(
                "Quantity '{}' for {:?} is out of range, saturating",
                digits,
                unit
            );
            u32::MAX
        }
    }
}
