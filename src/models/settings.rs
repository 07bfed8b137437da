//! Settings model
//!
//! JSON values stored by key: daily goals and the last backup time.

use rusqlite::{params, Connection};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::db::DbResult;
use super::Macros;

pub const GOALS_KEY: &str = "goals";
pub const LAST_BACKUP_KEY: &str = "last_backup_time";

/// Daily nutrition targets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Goals {
    pub calories: u32,
    pub protein: u32,
    pub fats: u32,
    pub carbs: u32,
}

impl Default for Goals {
    fn default() -> Self {
        Self {
            calories: 2500,
            protein: 175,
            fats: 117,
            carbs: 218,
        }
    }
}

impl Goals {
    pub fn macros(&self) -> Macros {
        Macros::new(
            f64::from(self.calories),
            f64::from(self.protein),
            f64::from(self.fats),
            f64::from(self.carbs),
        )
    }

    /// Stored goals, or the defaults when none were saved
    pub fn load(conn: &Connection) -> DbResult<Self> {
        Ok(Setting::get(conn, GOALS_KEY)?.unwrap_or_default())
    }

    pub fn save(&self, conn: &Connection) -> DbResult<()> {
        Setting::set(conn, GOALS_KEY, self)
    }
}

/// Typed access to the settings table
pub struct Setting;

impl Setting {
    pub fn get<T: DeserializeOwned>(conn: &Connection, key: &str) -> DbResult<Option<T>> {
        let result = conn.query_row(
            "SELECT value FROM settings WHERE key = ?1",
            [key],
            |row| row.get::<_, String>(0),
        );
        match result {
            Ok(raw) => Ok(Some(serde_json::from_str(&raw)?)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    pub fn set<T: Serialize + ?Sized>(conn: &Connection, key: &str, value: &T) -> DbResult<()> {
        conn.execute(
            r#"
            INSERT INTO settings (key, value) VALUES (?1, ?2)
            ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = datetime('now')
            "#,
            params![key, serde_json::to_string(value)?],
        )?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::migrations::run_migrations;

    fn setup() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        run_migrations(&conn).unwrap();
        conn
    }

    #[test]
    fn test_goals_default_when_unset() {
        let conn = setup();
        assert_eq!(Goals::load(&conn).unwrap(), Goals::default());
        assert_eq!(Goals::default().calories, 2500);
    }

    #[test]
    fn test_goals_save_and_overwrite() {
        let conn = setup();
        let goals = Goals {
            calories: 2000,
            protein: 150,
            fats: 70,
            carbs: 200,
        };
        goals.save(&conn).unwrap();
        assert_eq!(Goals::load(&conn).unwrap(), goals);

        let lower = Goals { calories: 1800, ..goals };
        lower.save(&conn).unwrap();
        assert_eq!(Goals::load(&conn).unwrap().calories, 1800);
    }

    #[test]
    fn test_setting_string_value() {
        let conn = setup();
        assert_eq!(Setting::get::<String>(&conn, LAST_BACKUP_KEY).unwrap(), None);
        Setting::set(&conn, LAST_BACKUP_KEY, "2025-01-09T20:00:00+00:00").unwrap();
        assert_eq!(
            Setting::get::<String>(&conn, LAST_BACKUP_KEY).unwrap().as_deref(),
            Some("2025-01-09T20:00:00+00:00")
        );
    }
}
