//! Database migrations
//!
//! Schema creation and migration logic.

use rusqlite::Connection;

use super::connection::DbResult;

/// Current schema version
const SCHEMA_VERSION: i32 = 1;

/// Run all migrations to bring the database up to the current schema version
pub fn run_migrations(conn: &Connection) -> DbResult<()> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS schema_migrations (
            version INTEGER PRIMARY KEY,
            applied_at TEXT NOT NULL DEFAULT (datetime('now'))
        )",
        [],
    )?;

    let current_version = get_schema_version(conn)?;
    if current_version >= SCHEMA_VERSION {
        return Ok(());
    }

    if current_version < 1 {
        migrate_v1(conn)?;
        conn.execute("INSERT INTO schema_migrations (version) VALUES (1)", [])?;
        tracing::info!("Applied schema migration v1");
    }

    Ok(())
}

/// Migration v1: Initial schema
fn migrate_v1(conn: &Connection) -> DbResult<()> {
    conn.execute_batch(
        r#"
        -- ============================================
        -- MEALS
        -- Logged meals with their nutrition estimate
        -- ============================================
        CREATE TABLE meals (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            date TEXT NOT NULL,                  -- ISO date: "2025-01-09"
            name TEXT NOT NULL,
            description TEXT NOT NULL,

            calories INTEGER NOT NULL DEFAULT 0 CHECK(calories >= 0),
            protein INTEGER NOT NULL DEFAULT 0 CHECK(protein >= 0),   -- grams
            fats INTEGER NOT NULL DEFAULT 0 CHECK(fats >= 0),         -- grams
            carbs INTEGER NOT NULL DEFAULT 0 CHECK(carbs >= 0),       -- grams

            -- Estimate breakdown as JSON arrays; empty for template meals
            assumptions TEXT NOT NULL DEFAULT '[]',
            components TEXT NOT NULL DEFAULT '[]',

            timestamp TEXT NOT NULL,             -- RFC 3339, when logged
            updated_at TEXT NOT NULL DEFAULT (datetime('now'))
        );

        CREATE INDEX idx_meals_date ON meals(date);

        -- ============================================
        -- MEAL TEMPLATES
        -- Saved meals for quick re-logging
        -- ============================================
        CREATE TABLE meal_templates (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL,
            description TEXT NOT NULL,
            calories INTEGER NOT NULL DEFAULT 0,
            protein INTEGER NOT NULL DEFAULT 0,
            fats INTEGER NOT NULL DEFAULT 0,
            carbs INTEGER NOT NULL DEFAULT 0,
            created_at TEXT NOT NULL DEFAULT (datetime('now'))
        );

        CREATE INDEX idx_meal_templates_name ON meal_templates(name);

        -- ============================================
        -- SETTINGS
        -- Key/value store, values are JSON
        -- ============================================
        CREATE TABLE settings (
            key TEXT PRIMARY KEY,
            value TEXT NOT NULL,
            updated_at TEXT NOT NULL DEFAULT (datetime('now'))
        );
        "#,
    )?;

    Ok(())
}

/// Get the current schema version
pub fn get_schema_version(conn: &Connection) -> DbResult<i32> {
    let version: i32 = conn
        .query_row(
            "SELECT COALESCE(MAX(version), 0) FROM schema_migrations",
            [],
            |row| row.get(0),
        )
        .unwrap_or(0);
    Ok(version)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_migrations_are_idempotent() {
        let conn = Connection::open_in_memory().unwrap();
        assert_eq!(get_schema_version(&conn).unwrap(), 0);
        run_migrations(&conn).unwrap();
        run_migrations(&conn).unwrap();
        assert_eq!(get_schema_version(&conn).unwrap(), SCHEMA_VERSION);
    }
}
