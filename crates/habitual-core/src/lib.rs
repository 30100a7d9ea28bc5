//! # Habitual Core Library
//!
//! This library provides the core business logic for the Habitual daily
//! habit tracker. It is a UI-embedded engine: a GUI shell owns a
//! [`HabitTracker`] and drives it, while everything with actual logic
//! (date arithmetic, streak derivation, rollover reconciliation) lives
//! here behind injectable `today` parameters so it can be tested without a
//! wall clock.
//!
//! ## Architecture
//!
//! - **Calendar**: day-granularity local dates (`YYYY-MM-DD`), the only
//!   place the system clock is read
//! - **Streak Engine**: derives `{current, longest}` streaks from a
//!   check-in log; derived values are never stored authoritatively
//! - **Rollover Monitor**: detects the calendar day advancing past the
//!   last reconciled date and re-derives every habit's streaks
//! - **Storage**: SQLite habit list and TOML-based configuration
//!
//! ## Key Components
//!
//! - [`HabitTracker`]: embedding surface for a GUI host
//! - [`streak::compute`]: single source of truth for displayed streaks
//! - [`RolloverMonitor`]: startup and periodic reconciliation
//! - [`Database`]: habit list persistence

pub mod calendar;
pub mod error;
pub mod events;
pub mod habit;
pub mod rollover;
pub mod storage;
pub mod streak;
pub mod tracker;

pub use calendar::CalendarDate;
pub use error::{ConfigError, CoreError, DateError, StorageError, ValidationError};
pub use events::HabitEvent;
pub use habit::{CheckInLog, Habit};
pub use rollover::{RolloverMonitor, RolloverState, RolloverSummary};
pub use storage::{Config, Database, HabitStore};
pub use streak::StreakSummary;
pub use tracker::HabitTracker;
