//! Meal model
//!
//! A logged meal: the description the user typed, its estimate, and the day
//! it belongs to.

use rusqlite::types::Type;
use rusqlite::{params, Connection, Row};
use serde::{Deserialize, Serialize};

use crate::db::DbResult;
use super::nutrition::deserialize_clamped;
use super::{FoodComponent, Macros, NutritionEstimate};

/// A logged meal
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Meal {
    pub id: i64,
    pub date: String, // ISO date: "2025-01-09"
    pub name: String,
    pub description: String,
    #[serde(deserialize_with = "deserialize_clamped")]
    pub calories: u32,
    #[serde(deserialize_with = "deserialize_clamped")]
    pub protein: u32,
    #[serde(deserialize_with = "deserialize_clamped")]
    pub fats: u32,
    #[serde(deserialize_with = "deserialize_clamped")]
    pub carbs: u32,
    #[serde(default)]
    pub assumptions: Vec<String>,
    #[serde(default)]
    pub components: Vec<FoodComponent>,
    #[serde(default)]
    pub timestamp: String,
}

/// Data for creating a meal
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MealCreate {
    pub date: String,
    pub name: String,
    pub description: String,
    pub calories: u32,
    pub protein: u32,
    pub fats: u32,
    pub carbs: u32,
    pub assumptions: Vec<String>,
    pub components: Vec<FoodComponent>,
    pub timestamp: String,
}

/// Manual overrides for an estimated meal
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MealUpdate {
    pub name: Option<String>,
    pub calories: Option<u32>,
    pub protein: Option<u32>,
    pub fats: Option<u32>,
    pub carbs: Option<u32>,
}

impl MealCreate {
    /// Meal from an estimate; the custom name wins over the generated one
    pub fn from_estimate(
        date: &str,
        description: &str,
        custom_name: Option<&str>,
        estimate: NutritionEstimate,
        timestamp: String,
    ) -> Self {
        let name = custom_name
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .map(str::to_string)
            .unwrap_or(estimate.name);

        Self {
            date: date.to_string(),
            name,
            description: description.to_string(),
            calories: estimate.calories,
            protein: estimate.protein,
            fats: estimate.fats,
            carbs: estimate.carbs,
            assumptions: estimate.assumptions,
            components: estimate.components,
            timestamp,
        }
    }
}

fn json_column<T: serde::de::DeserializeOwned>(row: &Row, column: &str) -> rusqlite::Result<T> {
    let raw: String = row.get(column)?;
    serde_json::from_str(&raw).map_err(|e| {
        let idx = row.as_ref().column_index(column).unwrap_or(0);
        rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e))
    })
}

impl Meal {
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get("id")?,
            date: row.get("date")?,
            name: row.get("name")?,
            description: row.get("description")?,
            calories: row.get("calories")?,
            protein: row.get("protein")?,
            fats: row.get("fats")?,
            carbs: row.get("carbs")?,
            assumptions: json_column(row, "assumptions")?,
            components: json_column(row, "components")?,
            timestamp: row.get("timestamp")?,
        })
    }

    pub fn macros(&self) -> Macros {
        Macros::new(
            f64::from(self.calories),
            f64::from(self.protein),
            f64::from(self.fats),
            f64::from(self.carbs),
        )
    }

    /// Create a new meal
    pub fn create(conn: &Connection, data: &MealCreate) -> DbResult<Self> {
        conn.execute(
            r#"
            INSERT INTO meals (date, name, description, calories, protein, fats, carbs,
                               assumptions, components, timestamp)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)
            "#,
            params![
                data.date,
                data.name,
                data.description,
                data.calories,
                data.protein,
                data.fats,
                data.carbs,
                serde_json::to_string(&data.assumptions)?,
                serde_json::to_string(&data.components)?,
                data.timestamp,
            ],
        )?;

        let id = conn.last_insert_rowid();
        Self::get_by_id(conn, id)?.ok_or_else(|| {
            crate::db::DbError::Sqlite(rusqlite::Error::QueryReturnedNoRows)
        })
    }

    /// Insert or replace a meal keeping its id (backup restore)
    pub fn upsert(conn: &Connection, meal: &Meal) -> DbResult<()> {
        conn.execute(
            r#"
            INSERT OR REPLACE INTO meals (id, date, name, description, calories, protein,
                                          fats, carbs, assumptions, components, timestamp)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)
            "#,
            params![
                meal.id,
                meal.date,
                meal.name,
                meal.description,
                meal.calories,
                meal.protein,
                meal.fats,
                meal.carbs,
                serde_json::to_string(&meal.assumptions)?,
                serde_json::to_string(&meal.components)?,
                meal.timestamp,
            ],
        )?;
        Ok(())
    }

    /// Get a meal by ID
    pub fn get_by_id(conn: &Connection, id: i64) -> DbResult<Option<Self>> {
        let mut stmt = conn.prepare("SELECT * FROM meals WHERE id = ?1")?;

        let result = stmt.query_row([id], Self::from_row);
        match result {
            Ok(meal) => Ok(Some(meal)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Meals logged for a date, in logging order
    pub fn list_for_date(conn: &Connection, date: &str) -> DbResult<Vec<Self>> {
        let mut stmt = conn.prepare("SELECT * FROM meals WHERE date = ?1 ORDER BY id")?;
        let meals = stmt
            .query_map([date], Self::from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(meals)
    }

    /// Meals with `start <= date <= end`, ordered by date then logging order
    pub fn list_for_range(conn: &Connection, start: &str, end: &str) -> DbResult<Vec<Self>> {
        let mut stmt = conn.prepare(
            "SELECT * FROM meals WHERE date >= ?1 AND date <= ?2 ORDER BY date, id",
        )?;
        let meals = stmt
            .query_map(params![start, end], Self::from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(meals)
    }

    pub fn list_all(conn: &Connection) -> DbResult<Vec<Self>> {
        let mut stmt = conn.prepare("SELECT * FROM meals ORDER BY date, id")?;
        let meals = stmt
            .query_map([], Self::from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(meals)
    }

    pub fn count(conn: &Connection) -> DbResult<i64> {
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM meals", [], |row| row.get(0))?;
        Ok(count)
    }

    /// Apply manual overrides; untouched fields keep their value
    pub fn update(conn: &Connection, id: i64, data: &MealUpdate) -> DbResult<Option<Self>> {
        let Some(existing) = Self::get_by_id(conn, id)? else {
            return Ok(None);
        };

        conn.execute(
            r#"
            UPDATE meals SET
                name = ?1,
                calories = ?2,
                protein = ?3,
                fats = ?4,
                carbs = ?5,
                updated_at = datetime('now')
            WHERE id = ?6
            "#,
            params![
                data.name.as_ref().unwrap_or(&existing.name),
                data.calories.unwrap_or(existing.calories),
                data.protein.unwrap_or(existing.protein),
                data.fats.unwrap_or(existing.fats),
                data.carbs.unwrap_or(existing.carbs),
                id,
            ],
        )?;

        Self::get_by_id(conn, id)
    }

    /// Delete a meal
    pub fn delete(conn: &Connection, id: i64) -> DbResult<bool> {
        let rows = conn.execute("DELETE FROM meals WHERE id = ?1", [id])?;
        Ok(rows > 0)
    }

    /// Delete every meal, returning how many were removed
    pub fn clear_all(conn: &Connection) -> DbResult<usize> {
        let rows = conn.execute("DELETE FROM meals", [])?;
        Ok(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::migrations::run_migrations;
    use crate::estimator::estimate;

    fn setup() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        run_migrations(&conn).unwrap();
        conn
    }

    fn create_from(conn: &Connection, date: &str, description: &str) -> Meal {
        let data = MealCreate::from_estimate(
            date,
            description,
            None,
            estimate(description),
            "2025-01-09T08:00:00+00:00".to_string(),
        );
        Meal::create(conn, &data).unwrap()
    }

    #[test]
    fn test_create_round_trips_breakdown() {
        let conn = setup();
        let meal = create_from(&conn, "2025-01-09", "2 eggs and toast");
        assert_eq!(meal.name, "2 Cooked Eggs + 2 Slices Whole Wheat Bread");
        assert_eq!(meal.calories, 300);
        assert_eq!(meal.components.len(), 2);
        assert_eq!(meal.assumptions.len(), 4);

        let loaded = Meal::get_by_id(&conn, meal.id).unwrap().unwrap();
        assert_eq!(loaded, meal);
    }

    #[test]
    fn test_custom_name_wins_unless_blank() {
        let est = estimate("rice");
        let named = MealCreate::from_estimate("2025-01-09", "rice", Some(" Lunch "), est.clone(), String::new());
        assert_eq!(named.name, "Lunch");
        let blank = MealCreate::from_estimate("2025-01-09", "rice", Some("   "), est, String::new());
        assert_eq!(blank.name, "Cooked White Rice");
    }

    #[test]
    fn test_list_for_date_in_logging_order() {
        let conn = setup();
        create_from(&conn, "2025-01-09", "oatmeal");
        create_from(&conn, "2025-01-10", "steak");
        create_from(&conn, "2025-01-09", "salad");

        let meals = Meal::list_for_date(&conn, "2025-01-09").unwrap();
        let names: Vec<&str> = meals.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(names, vec!["Oatmeal", "Mixed Vegetables"]);

        let range = Meal::list_for_range(&conn, "2025-01-01", "2025-01-31").unwrap();
        assert_eq!(range.len(), 3);
        assert_eq!(range[2].date, "2025-01-10");
    }

    #[test]
    fn test_update_overrides_only_given_fields() {
        let conn = setup();
        let meal = create_from(&conn, "2025-01-09", "chicken");
        let updated = Meal::update(
            &conn,
            meal.id,
            &MealUpdate {
                calories: Some(350),
                ..Default::default()
            },
        )
        .unwrap()
        .unwrap();
        assert_eq!(updated.calories, 350);
        assert_eq!(updated.protein, 45);
        assert_eq!(updated.name, "Grilled Chicken/Turkey Breast");
        assert_eq!(updated.components, meal.components);

        assert!(Meal::update(&conn, 9999, &MealUpdate::default()).unwrap().is_none());
    }

    #[test]
    fn test_upsert_keeps_id_and_replaces() {
        let conn = setup();
        let mut meal = create_from(&conn, "2025-01-09", "pasta");
        meal.id = 1_736_409_600_000;
        Meal::upsert(&conn, &meal).unwrap();
        meal.name = "Renamed".to_string();
        Meal::upsert(&conn, &meal).unwrap();

        let loaded = Meal::get_by_id(&conn, meal.id).unwrap().unwrap();
        assert_eq!(loaded.name, "Renamed");
        assert_eq!(Meal::count(&conn).unwrap(), 2);
    }

    #[test]
    fn test_delete_and_clear() {
        let conn = setup();
        let a = create_from(&conn, "2025-01-09", "rice");
        create_from(&conn, "2025-01-09", "pasta");
        assert!(Meal::delete(&conn, a.id).unwrap());
        assert!(!Meal::delete(&conn, a.id).unwrap());
        assert_eq!(Meal::clear_all(&conn).unwrap(), 1);
        assert_eq!(Meal::count(&conn).unwrap(), 0);
    }
}
