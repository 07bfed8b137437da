//! Meal MCP Tools
//!
//! Estimate descriptions and log, edit, and delete meals.

use chrono::{NaiveDate, Utc};
use serde::Serialize;

use crate::db::Database;
use crate::estimator;
use crate::models::{clamp_macro, Meal, MealCreate, MealTemplate, MealUpdate, NutritionEstimate};

/// Response for delete_meal
#[derive(Debug, Serialize)]
pub struct DeleteMealResponse {
    pub id: i64,
    pub deleted: bool,
}

#[derive(Debug, Serialize)]
pub struct ClearMealsResponse {
    pub deleted: usize,
}

/// Parse an ISO date and return it zero-padded ("2025-1-9" -> "2025-01-09")
pub fn normalize_date(date: &str) -> Result<String, String> {
    NaiveDate::parse_from_str(date.trim(), "%Y-%m-%d")
        .map(|parsed| parsed.format("%Y-%m-%d").to_string())
        .map_err(|_| format!("Invalid date '{}', expected YYYY-MM-DD", date))
}

/// Trimmed description, rejecting empty input
pub fn clean_description(description: &str) -> Result<&str, String> {
    let trimmed = description.trim();
    if trimmed.is_empty() {
        return Err("Meal description cannot be empty".to_string());
    }
    Ok(trimmed)
}

/// Estimate nutrition without storing anything
pub fn estimate_nutrition(description: &str) -> Result<NutritionEstimate, String> {
    let description = clean_description(description)?;
    Ok(estimator::estimate(description))
}

/// Estimate a description and store it as a meal
pub fn log_meal(
    db: &Database,
    date: &str,
    description: &str,
    name: Option<&str>,
) -> Result<Meal, String> {
    let date = normalize_date(date)?;
    let description = clean_description(description)?;

    let estimate = estimator::estimate(description);
    let data = MealCreate::from_estimate(&date, description, name, estimate, Utc::now().to_rfc3339());

    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;
    let meal = Meal::create(&conn, &data).map_err(|e| format!("Failed to save meal: {}", e))?;

    tracing::info!("Meal logged: {} ({} cal) on {}", meal.name, meal.calories, meal.date);
    Ok(meal)
}

/// Log a saved template as a meal; no breakdown is copied
pub fn log_meal_from_template(db: &Database, template_id: i64, date: &str) -> Result<Meal, String> {
    let date = normalize_date(date)?;

    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;

    let template = MealTemplate::get_by_id(&conn, template_id)
        .map_err(|e| format!("Failed to get template: {}", e))?
        .ok_or_else(|| format!("Template not found with id: {}", template_id))?;

    let data = MealCreate {
        date,
        name: template.name,
        description: template.description,
        calories: template.calories,
        protein: template.protein,
        fats: template.fats,
        carbs: template.carbs,
        assumptions: Vec::new(),
        components: Vec::new(),
        timestamp: Utc::now().to_rfc3339(),
    };

    let meal = Meal::create(&conn, &data).map_err(|e| format!("Failed to save meal: {}", e))?;

    tracing::info!("Meal logged from template {}: {}", template_id, meal.name);
    Ok(meal)
}

pub fn get_meal(db: &Database, id: i64) -> Result<Option<Meal>, String> {
    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;

    Meal::get_by_id(&conn, id).map_err(|e| format!("Failed to get meal: {}", e))
}

/// Meals logged for a date
pub fn list_meals(db: &Database, date: &str) -> Result<Vec<Meal>, String> {
    let date = normalize_date(date)?;
    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;

    Meal::list_for_date(&conn, &date).map_err(|e| format!("Failed to list meals: {}", e))
}

/// Override a meal's name or macros. Negative values are stored as 0.
pub fn update_meal(
    db: &Database,
    id: i64,
    name: Option<String>,
    calories: Option<i64>,
    protein: Option<i64>,
    fats: Option<i64>,
    carbs: Option<i64>,
) -> Result<Option<Meal>, String> {
    let name = match name {
        Some(n) if n.trim().is_empty() => return Err("Meal name cannot be empty".to_string()),
        Some(n) => Some(n.trim().to_string()),
        None => None,
    };

    let data = MealUpdate {
        name,
        calories: calories.map(clamp_macro),
        protein: protein.map(clamp_macro),
        fats: fats.map(clamp_macro),
        carbs: carbs.map(clamp_macro),
    };

    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;

    let updated = Meal::update(&conn, id, &data)
        .map_err(|e| format!("Failed to update meal: {}", e))?;

    if let Some(ref meal) = updated {
        tracing::info!("Meal {} updated: {} ({} cal)", meal.id, meal.name, meal.calories);
    }
    Ok(updated)
}

pub fn delete_meal(db: &Database, id: i64) -> Result<DeleteMealResponse, String> {
    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;

    let deleted = Meal::delete(&conn, id).map_err(|e| format!("Failed to delete meal: {}", e))?;
    if deleted {
        tracing::info!("Meal {} deleted", id);
    }
    Ok(DeleteMealResponse { id, deleted })
}

/// Delete every logged meal; templates and goals are kept
pub fn clear_meals(db: &Database) -> Result<ClearMealsResponse, String> {
    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;

    let deleted = Meal::clear_all(&conn).map_err(|e| format!("Failed to clear meals: {}", e))?;
    tracing::info!("Cleared {} meals", deleted);
    Ok(ClearMealsResponse { deleted })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::MealTemplateCreate;

    fn db() -> Database {
        Database::in_memory().unwrap()
    }

    #[test]
    fn test_log_meal_uses_estimate() {
        let db = db();
        let meal = log_meal(&db, "2025-01-09", "  2 eggs, fried  ", None).unwrap();
        assert_eq!(meal.description, "2 eggs, fried");
        assert_eq!(meal.name, "2 Fried Eggs");
        assert_eq!(meal.calories, 180);
        assert_eq!(meal.components.len(), 1);
        assert!(!meal.timestamp.is_empty());
    }

    #[test]
    fn test_log_meal_custom_name() {
        let db = db();
        let meal = log_meal(&db, "2025-01-09", "pizza", Some("Friday pizza")).unwrap();
        assert_eq!(meal.name, "Friday pizza");
        assert_eq!(meal.calories, 570);
    }

    #[test]
    fn test_log_meal_rejects_bad_input() {
        let db = db();
        assert!(log_meal(&db, "2025-01-09", "   ", None).is_err());
        assert!(log_meal(&db, "09/01/2025", "rice", None).is_err());
        assert!(estimate_nutrition("").is_err());
    }

    #[test]
    fn test_unpadded_date_is_stored_zero_padded() {
        let db = db();
        let meal = log_meal(&db, "2025-1-9", "rice", None).unwrap();
        assert_eq!(meal.date, "2025-01-09");

        let listed = list_meals(&db, "2025-01-09").unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(list_meals(&db, "2025-1-9").unwrap(), listed);

        let summary = crate::tools::days::get_day_summary(&db, "2025-01-09").unwrap();
        assert_eq!(summary.totals.calories, 200.0);
        let history = crate::tools::days::get_month_history(&db, "2025-01").unwrap();
        assert_eq!(history.meal_count, 1);
    }

    #[test]
    fn test_update_meal_clamps_negative_values() {
        let db = db();
        let meal = log_meal(&db, "2025-01-09", "steak", None).unwrap();
        let updated = update_meal(&db, meal.id, Some("Ribeye".to_string()), Some(650), Some(-5), None, None)
            .unwrap()
            .unwrap();
        assert_eq!(updated.name, "Ribeye");
        assert_eq!(updated.calories, 650);
        assert_eq!(updated.protein, 0);
        assert_eq!(updated.fats, 20);

        assert!(update_meal(&db, meal.id, Some("  ".to_string()), None, None, None, None).is_err());
    }

    #[test]
    fn test_log_from_template() {
        let db = db();
        let template = db
            .with_conn(|conn| {
                MealTemplate::create(
                    conn,
                    &MealTemplateCreate::from_estimate(
                        "Usual breakfast",
                        "oatmeal with nuts",
                        &estimator::estimate("oatmeal with nuts"),
                    ),
                )
            })
            .unwrap();

        let meal = log_meal_from_template(&db, template.id, "2025-01-10").unwrap();
        assert_eq!(meal.name, "Usual breakfast");
        assert_eq!(meal.description, "oatmeal with nuts");
        assert_eq!(meal.calories, 330);
        assert!(meal.components.is_empty());
        assert!(meal.assumptions.is_empty());

        assert!(log_meal_from_template(&db, 999, "2025-01-10").is_err());
    }

    #[test]
    fn test_delete_meal() {
        let db = db();
        let meal = log_meal(&db, "2025-01-09", "rice", None).unwrap();
        assert!(delete_meal(&db, meal.id).unwrap().deleted);
        assert!(!delete_meal(&db, meal.id).unwrap().deleted);
        assert!(get_meal(&db, meal.id).unwrap().is_none());
    }

    #[test]
    fn test_clear_meals_keeps_templates() {
        let db = db();
        log_meal(&db, "2025-01-09", "rice", None).unwrap();
        log_meal(&db, "2025-01-10", "pasta", None).unwrap();
        crate::tools::templates::save_template(&db, "oatmeal", "Breakfast").unwrap();

        assert_eq!(clear_meals(&db).unwrap().deleted, 2);
        assert!(list_meals(&db, "2025-01-09").unwrap().is_empty());
        assert_eq!(crate::tools::templates::list_templates(&db).unwrap().len(), 1);
    }
}
