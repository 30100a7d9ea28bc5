//! SQLite-based habit storage.
//!
//! Provides persistent storage for:
//! - The habit list, with each check-in log as a JSON array of
//!   `YYYY-MM-DD` strings and the derived streak fields as a display cache
//! - Key-value store for the rollover state

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection};

use super::{data_dir, HabitStore};
use crate::calendar::CalendarDate;
use crate::error::StorageError;
use crate::habit::{CheckInLog, Habit};

const LAST_RECONCILED_KEY: &str = "last_reconciled_date";

/// SQLite database for the habit list.
///
/// Persisted streak fields are a display cache; callers must refresh them
/// through the streak engine after loading.
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Get a reference to the underlying SQLite connection.
    pub fn conn(&self) -> &Connection {
        &self.conn
    }

    /// Open the database at `~/.config/habitual/habitual.db`.
    ///
    /// Creates the database file and schema if they don't exist.
    ///
    /// # Errors
    /// Returns an error if the database cannot be opened or migrated.
    pub fn open() -> Result<Self, StorageError> {
        let dir = data_dir().map_err(|e| StorageError::Unavailable(e.to_string()))?;
        Self::open_at(dir.join("habitual.db"))
    }

    /// Open a database at an explicit path.
    pub fn open_at(path: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let path = path.into();
        let conn =
            Connection::open(&path).map_err(|source| StorageError::OpenFailed { path, source })?;
        let db = Self { conn };
        db.migrate()?;
        Ok(db)
    }

    /// Open an in-memory database (for tests).
    pub fn open_memory() -> Result<Self, StorageError> {
        let conn = Connection::open_in_memory()?;
        let db = Self { conn };
        db.migrate()?;
        Ok(db)
    }

    fn migrate(&self) -> Result<(), StorageError> {
        self.conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS habits (
                id             TEXT PRIMARY KEY,
                name           TEXT NOT NULL,
                check_ins      TEXT NOT NULL DEFAULT '[]',
                current_streak INTEGER NOT NULL DEFAULT 0,
                longest_streak INTEGER NOT NULL DEFAULT 0,
                created_at     TEXT NOT NULL,
                updated_at     TEXT NOT NULL
            );

            CREATE TABLE IF NOT EXISTS kv (
                key   TEXT PRIMARY KEY,
                value TEXT NOT NULL
            );

            CREATE INDEX IF NOT EXISTS idx_habits_created_at ON habits(created_at);",
        )?;
        Ok(())
    }

    /// Load every habit in creation order.
    ///
    /// Check-in entries are normalized one at a time; a corrupt entry is
    /// dropped rather than invalidating the habit's whole log.
    ///
    /// # Errors
    /// Returns an error if the query fails.
    pub fn load_habits(&self) -> Result<Vec<Habit>, StorageError> {
        let mut stmt = self.conn.prepare(
            "SELECT id, name, check_ins, current_streak, longest_streak, created_at, updated_at
             FROM habits ORDER BY created_at, id",
        )?;
        let rows = stmt.query_map([], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, String>(2)?,
                row.get::<_, u32>(3)?,
                row.get::<_, u32>(4)?,
                row.get::<_, String>(5)?,
                row.get::<_, String>(6)?,
            ))
        })?;

        let mut habits = Vec::new();
        for row in rows {
            let (id, name, raw_check_ins, current_streak, longest_streak, created_at, updated_at) =
                row?;
            let entries: Vec<String> = serde_json::from_str(&raw_check_ins).unwrap_or_default();
            let (check_ins, _dropped) = CheckInLog::from_raw_entries(&entries);
            habits.push(Habit {
                id,
                name,
                check_ins,
                current_streak,
                longest_streak,
                created_at: parse_timestamp(&created_at),
                updated_at: parse_timestamp(&updated_at),
            });
        }
        Ok(habits)
    }

    /// Replace the stored habit list with `habits`, atomically.
    ///
    /// # Errors
    /// Returns an error if serialization or any statement fails.
    pub fn save_habits(&self, habits: &[Habit]) -> Result<(), StorageError> {
        let tx = self.conn.unchecked_transaction()?;
        tx.execute("DELETE FROM habits", [])?;
        {
            let mut stmt = tx.prepare(
                "INSERT INTO habits
                   (id, name, check_ins, current_streak, longest_streak, created_at, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            )?;
            for habit in habits {
                let check_ins = serde_json::to_string(&habit.check_ins)
                    .map_err(|e| StorageError::QueryFailed(e.to_string()))?;
                stmt.execute(params![
                    habit.id,
                    habit.name,
                    check_ins,
                    habit.current_streak,
                    habit.longest_streak,
                    habit.created_at.to_rfc3339(),
                    habit.updated_at.to_rfc3339(),
                ])?;
            }
        }
        tx.commit()?;
        Ok(())
    }

    /// Load the last reconciled date.
    ///
    /// A missing or corrupt value reads as "never reconciled", so the next
    /// startup reconciliation re-derives everything.
    pub fn load_last_reconciled(&self) -> Result<Option<CalendarDate>, StorageError> {
        match self.get_meta(LAST_RECONCILED_KEY)? {
            Some(raw) => Ok(CalendarDate::parse(&raw).ok()),
            None => Ok(None),
        }
    }

    /// Persist the last reconciled date.
    pub fn save_last_reconciled(&self, date: CalendarDate) -> Result<(), StorageError> {
        self.set_meta(LAST_RECONCILED_KEY, &date.to_string())
    }

    fn get_meta(&self, key: &str) -> Result<Option<String>, StorageError> {
        let mut stmt = self.conn.prepare("SELECT value FROM kv WHERE key = ?1")?;
        let mut rows = stmt.query(params![key])?;
        match rows.next()? {
            Some(row) => Ok(Some(row.get(0)?)),
            None => Ok(None),
        }
    }

    fn set_meta(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.conn.execute(
            "INSERT INTO kv (key, value) VALUES (?1, ?2)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value",
            params![key, value],
        )?;
        Ok(())
    }
}

impl HabitStore for Database {
    type Error = StorageError;

    fn load_habits(&self) -> Result<Vec<Habit>, Self::Error> {
        Database::load_habits(self)
    }

    fn save_habits(&self, habits: &[Habit]) -> Result<(), Self::Error> {
        Database::save_habits(self, habits)
    }

    fn load_last_reconciled(&self) -> Result<Option<CalendarDate>, Self::Error> {
        Database::load_last_reconciled(self)
    }

    fn save_last_reconciled(&self, date: CalendarDate) -> Result<(), Self::Error> {
        Database::save_last_reconciled(self, date)
    }
}

fn parse_timestamp(raw: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or(DateTime::<Utc>::UNIX_EPOCH)
}
