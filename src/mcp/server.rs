//! NutriLog MCP Server Implementation
//!
//! Implements the MCP server with all NutriLog tools.

use std::path::PathBuf;
use std::sync::Arc;

use chrono::{Local, Utc};
use rmcp::handler::server::router::tool::ToolRouter;
use rmcp::handler::server::wrapper::Parameters;
use rmcp::model::{
    CallToolResult, Content, Implementation, ProtocolVersion, ServerCapabilities, ServerInfo,
};
use rmcp::{schemars, tool, tool_handler, tool_router, ErrorData as McpError, ServerHandler};
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;

use crate::db::Database;
use crate::tools::status::StatusTracker;
use crate::tools::{backup, days, meals, templates};

/// NutriLog MCP Service
#[derive(Clone)]
pub struct NutrilogService {
    status_tracker: Arc<Mutex<StatusTracker>>,
    database: Database,
    tool_router: ToolRouter<NutrilogService>,
}

impl NutrilogService {
    pub fn new(database_path: PathBuf, database: Database) -> Self {
        Self {
            status_tracker: Arc::new(Mutex::new(StatusTracker::new(database_path))),
            database,
            tool_router: Self::tool_router(),
        }
    }
}

fn to_json<T: Serialize>(value: &T) -> Result<CallToolResult, McpError> {
    let json = serde_json::to_string_pretty(value)
        .map_err(|e| McpError::internal_error(format!("Serialization error: {}", e), None))?;
    Ok(CallToolResult::success(vec![Content::text(json)]))
}

fn not_found(kind: &str, id: i64) -> Result<CallToolResult, McpError> {
    Ok(CallToolResult::success(vec![Content::text(format!(
        r#"{{"error": "{} not found", "id": {}}}"#,
        kind, id
    ))]))
}

// ============================================================================
// Parameter Structs
// ============================================================================

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct EstimateNutritionParams {
    /// Free-text meal description, e.g. "2 eggs and toast"
    pub description: String,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct LogMealParams {
    /// Date (ISO format: YYYY-MM-DD)
    pub date: String,
    /// Free-text meal description, e.g. "chicken and rice with broccoli"
    pub description: String,
    /// Custom meal name (defaults to the generated name)
    pub name: Option<String>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct MealIdParams {
    /// Meal ID
    pub id: i64,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct DateParams {
    /// Date (ISO format: YYYY-MM-DD)
    pub date: String,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct UpdateMealParams {
    /// Meal ID
    pub id: i64,
    /// New name
    pub name: Option<String>,
    /// Calories (negative values are stored as 0)
    pub calories: Option<i64>,
    /// Protein grams
    pub protein: Option<i64>,
    /// Fat grams
    pub fats: Option<i64>,
    /// Carbohydrate grams
    pub carbs: Option<i64>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct MonthParams {
    /// Month (format: YYYY-MM)
    pub month: String,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct SaveTemplateParams {
    /// Free-text meal description to estimate
    pub description: String,
    /// Template name
    pub name: String,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct TemplateIdParams {
    /// Template ID
    pub id: i64,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct LogMealFromTemplateParams {
    /// Template ID
    pub template_id: i64,
    /// Date (ISO format: YYYY-MM-DD)
    pub date: String,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct UpdateGoalsParams {
    /// Daily calorie goal
    pub calories: Option<i64>,
    /// Daily protein goal (grams)
    pub protein: Option<i64>,
    /// Daily fat goal (grams)
    pub fats: Option<i64>,
    /// Daily carbohydrate goal (grams)
    pub carbs: Option<i64>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct ImportBackupParams {
    /// Backup JSON exactly as produced by export_backup
    pub json: String,
}

// ============================================================================
// Tool Implementations
// ============================================================================

#[tool_router]
impl NutrilogService {
    // --- Status ---

    #[tool(description = "Get the current status of the NutriLog service including build info, database status, and process information")]
    async fn nutrilog_status(&self) -> Result<CallToolResult, McpError> {
        let tracker = self.status_tracker.lock().await;
        let status = tracker.get_status(&self.database);
        to_json(&status)
    }

    #[tool(description = "Get instructions for logging meals with NutriLog. Call this when starting a food logging session.")]
    fn meal_instructions(&self) -> Result<CallToolResult, McpError> {
        use crate::tools::status::MEAL_INSTRUCTIONS;
        Ok(CallToolResult::success(vec![Content::text(MEAL_INSTRUCTIONS)]))
    }

    // --- Estimation ---

    #[tool(description = "Estimate calories, protein, fats and carbs for a free-text meal description without saving it. Returns components and the assumptions used.")]
    fn estimate_nutrition(&self, Parameters(p): Parameters<EstimateNutritionParams>) -> Result<CallToolResult, McpError> {
        let result = meals::estimate_nutrition(&p.description).map_err(|e| McpError::invalid_params(e, None))?;
        to_json(&result)
    }

    // --- Meals ---

    #[tool(description = "Estimate a free-text meal description and log it for a date")]
    fn log_meal(&self, Parameters(p): Parameters<LogMealParams>) -> Result<CallToolResult, McpError> {
        let result = meals::log_meal(&self.database, &p.date, &p.description, p.name.as_deref())
            .map_err(|e| McpError::internal_error(e, None))?;
        to_json(&result)
    }

    #[tool(description = "Get a logged meal with its component breakdown and assumptions")]
    fn get_meal(&self, Parameters(p): Parameters<MealIdParams>) -> Result<CallToolResult, McpError> {
        let result = meals::get_meal(&self.database, p.id).map_err(|e| McpError::internal_error(e, None))?;
        match result {
            Some(meal) => to_json(&meal),
            None => not_found("Meal", p.id),
        }
    }

    #[tool(description = "List meals logged for a date, in logging order")]
    fn list_meals(&self, Parameters(p): Parameters<DateParams>) -> Result<CallToolResult, McpError> {
        let result = meals::list_meals(&self.database, &p.date).map_err(|e| McpError::internal_error(e, None))?;
        to_json(&result)
    }

    #[tool(description = "Override a meal's name or nutrition values (e.g. from a product label)")]
    fn update_meal(&self, Parameters(p): Parameters<UpdateMealParams>) -> Result<CallToolResult, McpError> {
        let result = meals::update_meal(&self.database, p.id, p.name, p.calories, p.protein, p.fats, p.carbs)
            .map_err(|e| McpError::internal_error(e, None))?;
        match result {
            Some(meal) => to_json(&meal),
            None => not_found("Meal", p.id),
        }
    }

    #[tool(description = "Delete a logged meal")]
    fn delete_meal(&self, Parameters(p): Parameters<MealIdParams>) -> Result<CallToolResult, McpError> {
        let result = meals::delete_meal(&self.database, p.id).map_err(|e| McpError::internal_error(e, None))?;
        to_json(&result)
    }

    #[tool(description = "Delete ALL logged meals. Templates and goals are kept. Export a backup first.")]
    fn clear_meals(&self) -> Result<CallToolResult, McpError> {
        let result = meals::clear_meals(&self.database).map_err(|e| McpError::internal_error(e, None))?;
        to_json(&result)
    }

    // --- Days ---

    #[tool(description = "Get a day's meals, totals, goals, remaining amounts (negative = over) and progress percentages")]
    fn get_day_summary(&self, Parameters(p): Parameters<DateParams>) -> Result<CallToolResult, McpError> {
        let result = days::get_day_summary(&self.database, &p.date).map_err(|e| McpError::internal_error(e, None))?;
        to_json(&result)
    }

    #[tool(description = "Get per-day nutrition totals for a month (YYYY-MM)")]
    fn get_month_history(&self, Parameters(p): Parameters<MonthParams>) -> Result<CallToolResult, McpError> {
        let result = days::get_month_history(&self.database, &p.month).map_err(|e| McpError::internal_error(e, None))?;
        to_json(&result)
    }

    // --- Templates ---

    #[tool(description = "Estimate a description and save it as a reusable meal template")]
    fn save_template(&self, Parameters(p): Parameters<SaveTemplateParams>) -> Result<CallToolResult, McpError> {
        let result = templates::save_template(&self.database, &p.description, &p.name)
            .map_err(|e| McpError::internal_error(e, None))?;
        to_json(&result)
    }

    #[tool(description = "List saved meal templates")]
    fn list_templates(&self) -> Result<CallToolResult, McpError> {
        let result = templates::list_templates(&self.database).map_err(|e| McpError::internal_error(e, None))?;
        to_json(&result)
    }

    #[tool(description = "Delete a saved meal template")]
    fn delete_template(&self, Parameters(p): Parameters<TemplateIdParams>) -> Result<CallToolResult, McpError> {
        let result = templates::delete_template(&self.database, p.id).map_err(|e| McpError::internal_error(e, None))?;
        to_json(&result)
    }

    #[tool(description = "Log a saved template as a meal for a date")]
    fn log_meal_from_template(&self, Parameters(p): Parameters<LogMealFromTemplateParams>) -> Result<CallToolResult, McpError> {
        let result = meals::log_meal_from_template(&self.database, p.template_id, &p.date)
            .map_err(|e| McpError::internal_error(e, None))?;
        to_json(&result)
    }

    // --- Goals ---

    #[tool(description = "Get the daily calorie and macro goals")]
    fn get_goals(&self) -> Result<CallToolResult, McpError> {
        let result = days::get_goals(&self.database).map_err(|e| McpError::internal_error(e, None))?;
        to_json(&result)
    }

    #[tool(description = "Update daily goals; omitted values are kept")]
    fn update_goals(&self, Parameters(p): Parameters<UpdateGoalsParams>) -> Result<CallToolResult, McpError> {
        let result = days::update_goals(&self.database, p.calories, p.protein, p.fats, p.carbs)
            .map_err(|e| McpError::internal_error(e, None))?;
        to_json(&result)
    }

    // --- Backup ---

    #[tool(description = "Export all meals, templates and goals as backup JSON. Records the backup time.")]
    fn export_backup(&self) -> Result<CallToolResult, McpError> {
        let json = backup::export_backup(&self.database, Utc::now()).map_err(|e| McpError::internal_error(e, None))?;
        Ok(CallToolResult::success(vec![Content::text(json)]))
    }

    #[tool(description = "Restore from backup JSON. Replaces ALL existing meals; templates are merged by id.")]
    fn import_backup(&self, Parameters(p): Parameters<ImportBackupParams>) -> Result<CallToolResult, McpError> {
        let result = backup::import_backup(&self.database, &p.json).map_err(|e| McpError::invalid_params(e, None))?;
        to_json(&result)
    }

    #[tool(description = "Check whether a backup reminder is due (urgent, tonight, warning or none)")]
    fn backup_status(&self) -> Result<CallToolResult, McpError> {
        let result = backup::backup_status(&self.database, Local::now()).map_err(|e| McpError::internal_error(e, None))?;
        to_json(&result)
    }
}

// ============================================================================
// Server Handler
// ============================================================================

#[tool_handler]
impl ServerHandler for NutrilogService {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::LATEST,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: "nutrilog".into(),
                version: crate::build_info::VERSION.into(),
                title: Some("NutriLog".into()),
                icons: None,
                website_url: None,
            },
            instructions: Some(
                "NutriLog - free-text meal logging with rule-based nutrition estimates. \
                 IMPORTANT: Call meal_instructions before logging food. \
                 Estimate: estimate_nutrition. \
                 Meals: log_meal/get_meal/list_meals/update_meal/delete_meal/clear_meals. \
                 Days: get_day_summary, get_month_history. \
                 Templates: save_template/list_templates/delete_template/log_meal_from_template. \
                 Goals: get_goals/update_goals. \
                 Backup: backup_status, export_backup, import_backup (replaces all meals). \
                 Status: nutrilog_status."
                    .into(),
            ),
        }
    }
}
