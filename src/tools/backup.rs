//! Backup MCP Tools
//!
//! Full JSON export/import of meals, templates and goals, plus the reminder
//! that nags when the last backup is stale.

use chrono::{DateTime, Local, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::db::{Database, DbResult};
use crate::models::{Goals, Meal, MealTemplate, Setting, LAST_BACKUP_KEY};

pub const BACKUP_VERSION: &str = "1.0";

/// Everything needed to restore a NutriLog database
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Backup {
    #[serde(default)]
    pub meals: Vec<Meal>,
    #[serde(default)]
    pub templates: Vec<MealTemplate>,
    pub goals: Option<Goals>,
    #[serde(rename = "exportDate", default)]
    pub export_date: String,
    #[serde(default)]
    pub version: String,
}

#[derive(Debug, Serialize)]
pub struct ImportBackupResponse {
    pub meals: usize,
    pub templates: usize,
    pub goals_restored: bool,
    pub meals_replaced: usize,
}

/// How loudly to remind about backups
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ReminderLevel {
    Urgent,
    Tonight,
    Warning,
}

impl ReminderLevel {
    pub fn title(self) -> &'static str {
        match self {
            ReminderLevel::Urgent => "URGENT: Backup Your Data!",
            ReminderLevel::Tonight => "End of Day - Time to Backup!",
            ReminderLevel::Warning => "Backup Recommended",
        }
    }

    pub fn message(self, meal_count: i64) -> String {
        match self {
            ReminderLevel::Urgent => {
                "You haven't backed up in over 24 hours. You could lose all your meal data!"
                    .to_string()
            }
            ReminderLevel::Tonight => {
                "Don't forget to backup before bed. Takes 10 seconds!".to_string()
            }
            ReminderLevel::Warning => format!(
                "You have {} meals logged. Backup to save your progress!",
                meal_count
            ),
        }
    }
}

/// Response for backup_status
#[derive(Debug, Serialize)]
pub struct BackupStatus {
    pub meal_count: i64,
    pub last_backup_time: Option<String>,
    pub reminder: Option<ReminderLevel>,
    pub title: Option<&'static str>,
    pub message: Option<String>,
}

/// Evening hour (local) from which the end-of-day reminder applies
const EVENING_HOUR: u32 = 20;

/// Decide whether to remind, from local wall-clock times.
pub fn backup_reminder(
    meal_count: i64,
    last_backup: Option<NaiveDateTime>,
    now: NaiveDateTime,
) -> Option<ReminderLevel> {
    use chrono::Timelike;

    if meal_count == 0 {
        return None;
    }

    let evening = now.hour() >= EVENING_HOUR;

    match last_backup {
        Some(last) => {
            let hours_since = (now - last).num_seconds() as f64 / 3600.0;
            let backed_up_today = last.date() == now.date();

            if hours_since >= 24.0 {
                Some(ReminderLevel::Urgent)
            } else if evening && !backed_up_today {
                Some(ReminderLevel::Tonight)
            } else if !backed_up_today && meal_count >= 5 {
                Some(ReminderLevel::Warning)
            } else {
                None
            }
        }
        None => {
            if meal_count >= 5 {
                Some(ReminderLevel::Urgent)
            } else if evening && meal_count >= 3 {
                Some(ReminderLevel::Tonight)
            } else if meal_count >= 3 {
                Some(ReminderLevel::Warning)
            } else {
                None
            }
        }
    }
}

fn collect_backup(conn: &rusqlite::Connection, now: DateTime<Utc>) -> DbResult<Backup> {
    Ok(Backup {
        meals: Meal::list_all(conn)?,
        templates: MealTemplate::list(conn)?,
        goals: Some(Goals::load(conn)?),
        export_date: now.to_rfc3339(),
        version: BACKUP_VERSION.to_string(),
    })
}

/// Export everything as pretty JSON and record the backup time
pub fn export_backup(db: &Database, now: DateTime<Utc>) -> Result<String, String> {
    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;

    let backup = collect_backup(&conn, now).map_err(|e| format!("Failed to collect backup: {}", e))?;
    let json = serde_json::to_string_pretty(&backup)
        .map_err(|e| format!("Failed to serialize backup: {}", e))?;

    Setting::set(&conn, LAST_BACKUP_KEY, &backup.export_date)
        .map_err(|e| format!("Failed to record backup time: {}", e))?;

    tracing::info!(
        "Backup exported: {} meals, {} templates",
        backup.meals.len(),
        backup.templates.len()
    );
    Ok(json)
}

/// Restore from an exported backup.
///
/// All existing meals are replaced; templates are merged by id. Nothing is
/// touched when the JSON does not parse.
pub fn import_backup(db: &Database, json: &str) -> Result<ImportBackupResponse, String> {
    let json = json.trim();
    if json.is_empty() {
        return Err("Backup data is empty".to_string());
    }

    let backup: Backup =
        serde_json::from_str(json).map_err(|e| format!("Invalid backup data: {}", e))?;

    if !backup.version.is_empty() && backup.version != BACKUP_VERSION {
        tracing::warn!("Importing backup version {} (expected {})", backup.version, BACKUP_VERSION);
    }

    let response = db
        .with_conn_mut(|conn| {
            let tx = conn.transaction()?;

            let meals_replaced = Meal::clear_all(&tx)?;
            for meal in &backup.meals {
                Meal::upsert(&tx, meal)?;
            }
            for template in &backup.templates {
                MealTemplate::upsert(&tx, template)?;
            }
            if let Some(goals) = &backup.goals {
                goals.save(&tx)?;
            }

            tx.commit()?;

            Ok(ImportBackupResponse {
                meals: backup.meals.len(),
                templates: backup.templates.len(),
                goals_restored: backup.goals.is_some(),
                meals_replaced,
            })
        })
        .map_err(|e| format!("Failed to import backup: {}", e))?;

    tracing::info!(
        "Backup imported: {} meals, {} templates",
        response.meals,
        response.templates
    );
    Ok(response)
}

/// Current reminder state, evaluated in local time
pub fn backup_status(db: &Database, now: DateTime<Local>) -> Result<BackupStatus, String> {
    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;

    let meal_count = Meal::count(&conn).map_err(|e| format!("Failed to count meals: {}", e))?;
    let last_backup_time: Option<String> = Setting::get(&conn, LAST_BACKUP_KEY)
        .map_err(|e| format!("Failed to read last backup time: {}", e))?;

    let last_backup = match last_backup_time.as_deref() {
        Some(raw) => match DateTime::parse_from_rfc3339(raw) {
            Ok(parsed) => Some(parsed.with_timezone(&Local).naive_local()),
            Err(e) => {
                tracing::warn!("Ignoring unparseable last backup time '{}': {}", raw, e);
                None
            }
        },
        None => None,
    };

    let reminder = backup_reminder(meal_count, last_backup, now.naive_local());

    Ok(BackupStatus {
        meal_count,
        last_backup_time,
        reminder,
        title: reminder.map(ReminderLevel::title),
        message: reminder.map(|r| r.message(meal_count)),
    })
}
