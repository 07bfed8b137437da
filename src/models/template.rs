//! Meal template model
//!
//! A saved meal: description plus its estimated totals, without the
//! component breakdown.

use rusqlite::{params, Connection, Row};
use serde::{Deserialize, Serialize};

use crate::db::DbResult;
use super::nutrition::deserialize_clamped;
use super::NutritionEstimate;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MealTemplate {
    pub id: i64,
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
}

/// Data for creating a template
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MealTemplateCreate {
    pub name: String,
    pub description: String,
    pub calories: u32,
    pub protein: u32,
    pub fats: u32,
    pub carbs: u32,
}

impl MealTemplateCreate {
    pub fn from_estimate(name: &str, description: &str, estimate: &NutritionEstimate) -> Self {
        Self {
            name: name.to_string(),
            description: description.to_string(),
            calories: estimate.calories,
            protein: estimate.protein,
            fats: estimate.fats,
            carbs: estimate.carbs,
        }
    }
}

impl MealTemplate {
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get("id")?,
            name: row.get("name")?,
            description: row.get("description")?,
            calories: row.get("calories")?,
            protein: row.get("protein")?,
            fats: row.get("fats")?,
            carbs: row.get("carbs")?,
        })
    }

    pub fn create(conn: &Connection, data: &MealTemplateCreate) -> DbResult<Self> {
        conn.execute(
            r#"
            INSERT INTO meal_templates (name, description, calories, protein, fats, carbs)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            "#,
            params![
                data.name,
                data.description,
                data.calories,
                data.protein,
                data.fats,
                data.carbs,
            ],
        )?;

        let id = conn.last_insert_rowid();
        Self::get_by_id(conn, id)?.ok_or_else(|| {
            crate::db::DbError::Sqlite(rusqlite::Error::QueryReturnedNoRows)
        })
    }

    /// Insert or replace keeping the template's id (backup restore)
    pub fn upsert(conn: &Connection, template: &MealTemplate) -> DbResult<()> {
        conn.execute(
            r#"
            INSERT OR REPLACE INTO meal_templates (id, name, description, calories, protein, fats, carbs)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            "#,
            params![
                template.id,
                template.name,
                template.description,
                template.calories,
                template.protein,
                template.fats,
                template.carbs,
            ],
        )?;
        Ok(())
    }

    pub fn get_by_id(conn: &Connection, id: i64) -> DbResult<Option<Self>> {
        let mut stmt = conn.prepare("SELECT * FROM meal_templates WHERE id = ?1")?;

        let result = stmt.query_row([id], Self::from_row);
        match result {
            Ok(template) => Ok(Some(template)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// All templates in creation order
    pub fn list(conn: &Connection) -> DbResult<Vec<Self>> {
        let mut stmt = conn.prepare("SELECT * FROM meal_templates ORDER BY id")?;
        let templates = stmt
            .query_map([], Self::from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(templates)
    }

    pub fn delete(conn: &Connection, id: i64) -> DbResult<bool> {
        let rows = conn.execute("DELETE FROM meal_templates WHERE id = ?1", [id])?;
        Ok(rows > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::migrations::run_migrations;
    use crate::estimator::estimate;

    #[test]
    fn test_template_keeps_totals_only() {
        let conn = Connection::open_in_memory().unwrap();
        run_migrations(&conn).unwrap();

        let est = estimate("protein shake");
        let template = MealTemplate::create(
            &conn,
            &MealTemplateCreate::from_estimate("Post-gym", "protein shake", &est),
        )
        .unwrap();

        assert_eq!(template.name, "Post-gym");
        assert_eq!(template.calories, 250);
        assert_eq!(template.protein, 40);
        assert_eq!(MealTemplate::list(&conn).unwrap(), vec![template.clone()]);

        assert!(MealTemplate::delete(&conn, template.id).unwrap());
        assert!(MealTemplate::get_by_id(&conn, template.id).unwrap().is_none());
    }
}
