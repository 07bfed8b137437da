//! Meal Template MCP Tools

use serde::Serialize;

use crate::db::Database;
use crate::estimator;
use crate::models::{MealTemplate, MealTemplateCreate};

use super::meals::clean_description;

#[derive(Debug, Serialize)]
pub struct DeleteTemplateResponse {
    pub id: i64,
    pub deleted: bool,
}

/// Estimate a description and save it under a name for quick re-logging
pub fn save_template(db: &Database, description: &str, name: &str) -> Result<MealTemplate, String> {
    let description = clean_description(description)?;
    let name = name.trim();
    if name.is_empty() {
        return Err("Template name cannot be empty".to_string());
    }

    let estimate = estimator::estimate(description);
    let data = MealTemplateCreate::from_estimate(name, description, &estimate);

    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;
    let template = MealTemplate::create(&conn, &data)
        .map_err(|e| format!("Failed to save template: {}", e))?;

    tracing::info!("Template saved: {} ({} cal)", template.name, template.calories);
    Ok(template)
}

pub fn list_templates(db: &Database) -> Result<Vec<MealTemplate>, String> {
    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;

    MealTemplate::list(&conn).map_err(|e| format!("Failed to list templates: {}", e))
}

pub fn delete_template(db: &Database, id: i64) -> Result<DeleteTemplateResponse, String> {
    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;

    let deleted = MealTemplate::delete(&conn, id)
        .map_err(|e| format!("Failed to delete template: {}", e))?;
    if deleted {
        tracing::info!("Template {} deleted", id);
    }
    Ok(DeleteTemplateResponse { id, deleted })
}
