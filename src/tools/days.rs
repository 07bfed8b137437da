//! Day and Goal MCP Tools
//!
//! Daily totals against goals, monthly history, and goal settings.

use std::collections::BTreeMap;

use chrono::{Months, NaiveDate};
use serde::Serialize;

use crate::db::Database;
use crate::models::{clamp_macro, Goals, Macros, Meal};

use super::meals::normalize_date;

/// Percent of each goal reached, capped at 100
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Progress {
    pub calories: f64,
    pub protein: f64,
    pub fats: f64,
    pub carbs: f64,
}

/// One day's meals measured against the goals
#[derive(Debug, Serialize)]
pub struct DaySummary {
    pub date: String,
    pub meals: Vec<Meal>,
    pub totals: Macros,
    pub goals: Goals,
    /// goal - total; negative means over
    pub remaining: Macros,
    pub progress: Progress,
}

/// Per-day rollup inside a month
#[derive(Debug, Clone, Serialize)]
pub struct DayTotals {
    pub date: String,
    pub meal_count: usize,
    pub totals: Macros,
}

#[derive(Debug, Serialize)]
pub struct MonthHistory {
    pub month: String,
    pub days: Vec<DayTotals>,
    pub meal_count: usize,
    pub totals: Macros,
}

fn percent_of(current: f64, goal: f64) -> f64 {
    if goal <= 0.0 {
        return 0.0;
    }
    (current * 100.0 / goal).min(100.0)
}

impl Progress {
    pub fn new(totals: &Macros, goals: &Macros) -> Self {
        Self {
            calories: percent_of(totals.calories, goals.calories),
            protein: percent_of(totals.protein, goals.protein),
            fats: percent_of(totals.fats, goals.fats),
            carbs: percent_of(totals.carbs, goals.carbs),
        }
    }
}

/// Sum of the meals' macros
pub fn calculate_totals(meals: &[Meal]) -> Macros {
    meals.iter().map(Meal::macros).sum()
}

/// First and last date of a "YYYY-MM" month
pub fn month_bounds(month: &str) -> Result<(NaiveDate, NaiveDate), String> {
    let invalid = || format!("Invalid month '{}', expected YYYY-MM", month);

    if month.len() != 7 {
        return Err(invalid());
    }
    let first = NaiveDate::parse_from_str(&format!("{}-01", month), "%Y-%m-%d")
        .map_err(|_| invalid())?;
    let last = first
        .checked_add_months(Months::new(1))
        .and_then(|next| next.pred_opt())
        .ok_or_else(invalid)?;
    Ok((first, last))
}

pub fn get_day_summary(db: &Database, date: &str) -> Result<DaySummary, String> {
    let date = normalize_date(date)?;

    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;

    let meals = Meal::list_for_date(&conn, &date)
        .map_err(|e| format!("Failed to list meals: {}", e))?;
    let goals = Goals::load(&conn).map_err(|e| format!("Failed to load goals: {}", e))?;

    let totals = calculate_totals(&meals);
    let goal_macros = goals.macros();

    Ok(DaySummary {
        date,
        remaining: goal_macros.sub(&totals),
        progress: Progress::new(&totals, &goal_macros),
        meals,
        totals,
        goals,
    })
}

/// Per-day totals for every logged day in a month, ascending by date
pub fn get_month_history(db: &Database, month: &str) -> Result<MonthHistory, String> {
    let (first, last) = month_bounds(month)?;

    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;

    let meals = Meal::list_for_range(
        &conn,
        &first.format("%Y-%m-%d").to_string(),
        &last.format("%Y-%m-%d").to_string(),
    )
    .map_err(|e| format!("Failed to list meals: {}", e))?;

    let mut by_day: BTreeMap<String, DayTotals> = BTreeMap::new();
    for meal in &meals {
        let day = by_day.entry(meal.date.clone()).or_insert_with(|| DayTotals {
            date: meal.date.clone(),
            meal_count: 0,
            totals: Macros::zero(),
        });
        day.meal_count += 1;
        day.totals += meal.macros();
    }

    Ok(MonthHistory {
        month: month.to_string(),
        days: by_day.into_values().collect(),
        meal_count: meals.len(),
        totals: calculate_totals(&meals),
    })
}

pub fn get_goals(db: &Database) -> Result<Goals, String> {
    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;

    Goals::load(&conn).map_err(|e| format!("Failed to load goals: {}", e))
}

/// Replace the daily goals; omitted fields keep their current value
pub fn update_goals(
    db: &Database,
    calories: Option<i64>,
    protein: Option<i64>,
    fats: Option<i64>,
    carbs: Option<i64>,
) -> Result<Goals, String> {
    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;

    let current = Goals::load(&conn).map_err(|e| format!("Failed to load goals: {}", e))?;
    let goals = Goals {
        calories: calories.map(clamp_macro).unwrap_or(current.calories),
        protein: protein.map(clamp_macro).unwrap_or(current.protein),
        fats: fats.map(clamp_macro).unwrap_or(current.fats),
        carbs: carbs.map(clamp_macro).unwrap_or(current.carbs),
    };

    goals
        .save(&conn)
        .map_err(|e| format!("Failed to save goals: {}", e))?;

    tracing::info!(
        "Goals updated: {} cal, {}g protein, {}g fats, {}g carbs",
        goals.calories,
        goals.protein,
        goals.fats,
        goals.carbs
    );
    Ok(goals)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::meals::log_meal;

    #[test]
    fn test_month_bounds() {
        let (first, last) = month_bounds("2024-02").unwrap();
        assert_eq!(first, NaiveDate::from_ymd_opt(2024, 2, 1).unwrap());
        assert_eq!(last, NaiveDate::from_ymd_opt(2024, 2, 29).unwrap());

        let (_, dec_last) = month_bounds("2025-12").unwrap();
        assert_eq!(dec_last, NaiveDate::from_ymd_opt(2025, 12, 31).unwrap());

        assert!(month_bounds("2025-13").is_err());
        assert!(month_bounds("2025-1").is_err());
        assert!(month_bounds("January").is_err());
    }

    #[test]
    fn test_progress_capped_and_zero_goal() {
        let totals = Macros::new(3000.0, 50.0, 0.0, 10.0);
        let goals = Macros::new(2500.0, 100.0, 0.0, 40.0);
        let progress = Progress::new(&totals, &goals);
        assert_eq!(progress.calories, 100.0);
        assert_eq!(progress.protein, 50.0);
        assert_eq!(progress.fats, 0.0);
        assert_eq!(progress.carbs, 25.0);
    }

    #[test]
    fn test_day_summary_against_default_goals() {
        let db = Database::in_memory().unwrap();
        log_meal(&db, "2025-01-09", "chicken and rice", None).unwrap();
        log_meal(&db, "2025-01-09", "4 sausages", None).unwrap();
        log_meal(&db, "2025-01-10", "steak", None).unwrap();

        let summary = get_day_summary(&db, "2025-01-09").unwrap();
        assert_eq!(summary.meals.len(), 2);
        assert_eq!(summary.totals, Macros::new(1100.0, 97.0, 60.0, 49.0));
        assert_eq!(summary.goals, Goals::default());
        assert_eq!(summary.remaining.calories, 1400.0);
        assert_eq!(summary.remaining.fats, 57.0);
        assert_eq!(summary.progress.calories, 44.0);
    }

    #[test]
    fn test_day_summary_over_goal_is_negative() {
        let db = Database::in_memory().unwrap();
        update_goals(&db, Some(500), None, None, None).unwrap();
        log_meal(&db, "2025-01-09", "pizza", None).unwrap();
        log_meal(&db, "2025-01-09", "burger", None).unwrap();

        let summary = get_day_summary(&db, "2025-01-09").unwrap();
        assert_eq!(summary.remaining.calories, 500.0 - 1110.0);
        assert_eq!(summary.progress.calories, 100.0);
    }

    #[test]
    fn test_month_history_groups_by_day() {
        let db = Database::in_memory().unwrap();
        log_meal(&db, "2025-01-10", "rice", None).unwrap();
        log_meal(&db, "2025-01-09", "pasta", None).unwrap();
        log_meal(&db, "2025-01-10", "potato", None).unwrap();
        log_meal(&db, "2025-02-01", "oatmeal", None).unwrap();

        let history = get_month_history(&db, "2025-01").unwrap();
        assert_eq!(history.meal_count, 3);
        assert_eq!(history.days.len(), 2);
        assert_eq!(history.days[0].date, "2025-01-09");
        assert_eq!(history.days[1].meal_count, 2);
        assert_eq!(history.days[1].totals.calories, 330.0);
        assert_eq!(history.totals.calories, 550.0);
    }

    #[test]
    fn test_update_goals_partial() {
        let db = Database::in_memory().unwrap();
        let goals = update_goals(&db, None, Some(200), None, Some(-10)).unwrap();
        assert_eq!(goals.calories, 2500);
        assert_eq!(goals.protein, 200);
        assert_eq!(goals.carbs, 0);
        assert_eq!(get_goals(&db).unwrap(), goals);
    }
}
