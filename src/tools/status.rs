//! NutriLog Status Tool
//!
//! Provides runtime status information about the NutriLog service.

use serde::Serialize;
use std::path::PathBuf;
use std::time::Instant;
use sysinfo::{Pid, ProcessesToUpdate, System};

use crate::build_info::BuildInfo;
use crate::db::{migrations, Database};
use crate::models::Meal;

/// Meal logging instructions for AI assistants
pub const MEAL_INSTRUCTIONS: &str = r#"
# NutriLog Meal Logging Instructions

NutriLog estimates nutrition from a plain-text meal description. There is no
food database to search: describe what was eaten and the estimator does the rest.

## Logging a meal

1. Get today's date in YYYY-MM-DD form.
2. Call `log_meal(date, description)` with what the user ate, e.g.
   `log_meal(date: "2026-01-13", description: "3 eggs, fried, with white toast")`.
3. Optionally pass `name` to override the generated meal name.
4. Show the user the returned calories/protein/fats/carbs and the assumptions.

Use `estimate_nutrition(description)` to preview without saving.

## Writing good descriptions

- Put counts right before the food: "3 eggs", "4 sausages", "2 slices pizza".
  Without a number, eggs, sausages and pizza slices default to 2.
- Mention "fried" for fried eggs (more calories and fat).
- Bread defaults to whole wheat; say "white" or "sourdough" to change it.
- Pizza, burgers, sandwiches and shakes are estimated as whole dishes.
  "pizza with bread" and "burger with a bun" are NOT treated as whole dishes.
- Anything unrecognised gets a flagged generic estimate (400 cal). Suggest
  correcting it with `update_meal` when the user knows the real values.

## Correcting an estimate

`update_meal(id, calories?, protein?, fats?, carbs?, name?)` overrides values.

## Templates

- `save_template(description, name)` stores a meal for reuse.
- `log_meal_from_template(template_id, date)` logs it again.

## Daily progress and history

- `get_day_summary(date)` shows meals, totals, goals, remaining and progress.
- `get_month_history(month: "YYYY-MM")` shows per-day totals.
- `get_goals` / `update_goals` manage the daily targets
  (defaults: 2500 cal, 175g protein, 117g fats, 218g carbs).

## Backups

Call `backup_status` at the start of a session. If a reminder is returned,
offer to run `export_backup` and have the user keep the JSON somewhere safe.
`import_backup(json)` replaces all meals with the backup's meals.
"#;

/// Runtime status of the NutriLog service
#[derive(Debug, Clone, Serialize)]
pub struct NutrilogStatus {
    /// Build information
    pub build_number: u64,
    pub build_timestamp: &'static str,
    pub version: &'static str,

    /// Database information
    pub database_path: String,
    pub database_size_bytes: Option<u64>,
    pub schema_version: Option<i32>,
    pub meal_count: Option<i64>,

    /// Process information
    pub uptime_seconds: u64,
    pub process_id: u32,
    pub memory_usage_bytes: u64,
}

/// Status tracker for collecting runtime information
pub struct StatusTracker {
    start_time: Instant,
    database_path: PathBuf,
}

impl StatusTracker {
    pub fn new(database_path: PathBuf) -> Self {
        Self {
            start_time: Instant::now(),
            database_path,
        }
    }

    /// Get the current status
    pub fn get_status(&self, db: &Database) -> NutrilogStatus {
        let build_info = BuildInfo::current();

        let database_size_bytes = std::fs::metadata(&self.database_path)
            .ok()
            .map(|m| m.len());

        // Database problems are reported as missing values, not errors
        let schema_version = db.with_conn(migrations::get_schema_version).ok();
        let meal_count = db.with_conn(Meal::count).ok();

        let pid = std::process::id();
        let mut sys = System::new();
        sys.refresh_processes(ProcessesToUpdate::Some(&[Pid::from_u32(pid)]));

        let memory_usage_bytes = sys
            .process(Pid::from_u32(pid))
            .map(|p| p.memory())
            .unwrap_or(0);

        NutrilogStatus {
            build_number: build_info.build_number,
            build_timestamp: build_info.build_timestamp,
            version: build_info.version,
            database_path: self.database_path.display().to_string(),
            database_size_bytes,
            schema_version,
            meal_count,
            uptime_seconds: self.start_time.elapsed().as_secs(),
            process_id: pid,
            memory_usage_bytes,
        }
    }
}
