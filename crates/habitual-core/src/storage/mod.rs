//! Persistence for the habit list, rollover state, and configuration.

mod config;
pub mod database;

pub use config::{Config, DisplayConfig, ReconcileConfig};
pub use database::Database;

use std::path::PathBuf;

use crate::calendar::CalendarDate;
use crate::habit::Habit;

/// Returns `~/.config/habitual[-dev]/` based on HABITUAL_ENV.
///
/// Set HABITUAL_ENV=dev to use the development data directory.
///
/// # Errors
/// Returns an error if the home directory cannot be determined or if
/// creating the config directory fails.
pub fn data_dir() -> Result<PathBuf, Box<dyn std::error::Error>> {
    let base_dir = dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config");

    let env = std::env::var("HABITUAL_ENV").unwrap_or_else(|_| "production".to_string());

    let dir = if env == "dev" {
        base_dir.join("habitual-dev")
    } else {
        base_dir.join("habitual")
    };

    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}

/// Storage collaborator contract for habit persistence.
///
/// This trait abstracts the operations the rollover monitor and tracker
/// need, allowing them to work with different storage backends. Persisted
/// streak fields are a display cache only: loaders must recompute them via
/// the streak engine before display.
pub trait HabitStore {
    /// Error type for storage operations.
    type Error: std::fmt::Display;

    /// Load the full habit list. May be empty.
    fn load_habits(&self) -> Result<Vec<Habit>, Self::Error>;

    /// Persist the full habit list, including derived streak fields.
    fn save_habits(&self, habits: &[Habit]) -> Result<(), Self::Error>;

    /// Load the last reconciled date, `None` when never reconciled.
    fn load_last_reconciled(&self) -> Result<Option<CalendarDate>, Self::Error>;

    /// Persist the last reconciled date.
    fn save_last_reconciled(&self, date: CalendarDate) -> Result<(), Self::Error>;
}
