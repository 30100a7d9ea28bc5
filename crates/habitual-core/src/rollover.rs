//! Date-rollover detection and streak reconciliation.
//!
//! Streak fields are derived from a check-in log *and* the current calendar
//! day, so they go stale the moment the day advances even when no log
//! changed (a current streak anchored on "today" can drop to zero
//! overnight). This module detects that the day moved past the last
//! reconciled date and re-derives every habit's streaks.
//!
//! ## Usage
//! ```rust,ignore
//! use habitual_core::rollover::{RolloverMonitor, RolloverState};
//!
//! let monitor = RolloverMonitor::new();
//! let summary = monitor.check_and_reconcile(&mut habits, &mut state, today);
//! for id in &summary.changed_habit_ids {
//!     println!("habit {id} needs a redraw");
//! }
//! ```
//!
//! Run once at process start (a day may have passed while the app was
//! closed) and thereafter on the host's timer. Any polling interval up to
//! 24h is correct; a slow poll only delays the UI refresh, never corrupts a
//! stored streak, because streaks are always recomputed from the log.

use serde::{Deserialize, Serialize};

use crate::calendar::CalendarDate;
use crate::habit::Habit;
use crate::storage::HabitStore;

/// Default reconciliation poll interval in minutes.
pub const DEFAULT_POLL_INTERVAL_MINUTES: u64 = 1;

/// Maximum poll interval allowed; anything longer could skip a whole
/// calendar day between checks.
pub const MAX_POLL_INTERVAL_MINUTES: u64 = 1440;

/// Minimum poll interval allowed.
pub const MIN_POLL_INTERVAL_MINUTES: u64 = 1;

/// Tracks the last calendar day streaks were reconciled against.
///
/// Passed explicitly into the monitor rather than living in a global, so
/// reconciliation is testable without a wall clock.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RolloverState {
    /// `None` means reconciliation has never run.
    pub last_reconciled: Option<CalendarDate>,
}

impl RolloverState {
    /// Create a never-reconciled state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether `today` differs from the last reconciled day.
    pub fn is_stale(&self, today: CalendarDate) -> bool {
        self.last_reconciled != Some(today)
    }
}

/// Outcome of a reconciliation check.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RolloverSummary {
    /// Whether reconciliation ran at all (false when the day had not
    /// changed since the last run).
    pub ran: bool,
    /// The day reconciled against.
    pub today: CalendarDate,
    /// Ids of habits whose streak values actually changed.
    pub changed_habit_ids: Vec<String>,
}

impl RolloverSummary {
    fn noop(today: CalendarDate) -> Self {
        Self {
            ran: false,
            today,
            changed_habit_ids: Vec::new(),
        }
    }

    /// Whether any habit's displayed streaks changed.
    pub fn has_changes(&self) -> bool {
        !self.changed_habit_ids.is_empty()
    }

    /// Get a human-readable summary message.
    pub fn message(&self) -> String {
        if !self.ran {
            "Streaks already reconciled for today.".to_string()
        } else if self.changed_habit_ids.is_empty() {
            format!("Reconciled streaks for {}; no habit changed.", self.today)
        } else {
            format!(
                "Reconciled streaks for {}; {} habit(s) changed.",
                self.today,
                self.changed_habit_ids.len()
            )
        }
    }
}

/// Detects calendar-day rollover and re-derives streaks for every habit.
#[derive(Debug, Clone, Default)]
pub struct RolloverMonitor;

impl RolloverMonitor {
    /// Create a new monitor.
    pub fn new() -> Self {
        Self
    }

    /// Check for a day change and reconcile if one happened.
    ///
    /// When `state` has never reconciled or last reconciled on a different
    /// day, every habit is recomputed against the current `today` (a fresh
    /// day can zero a current streak even when no individual log changed)
    /// and `state` is stamped with `today`. Otherwise this is a no-op
    /// returning `ran = false`.
    ///
    /// There is no special case for "last check-in was exactly yesterday":
    /// full recomputation from the log subsumes it.
    pub fn check_and_reconcile(
        &self,
        habits: &mut [Habit],
        state: &mut RolloverState,
        today: CalendarDate,
    ) -> RolloverSummary {
        if !state.is_stale(today) {
            return RolloverSummary::noop(today);
        }

        let mut changed_habit_ids = Vec::new();
        for habit in habits.iter_mut() {
            if habit.refresh_streaks(today) {
                changed_habit_ids.push(habit.id.clone());
            }
        }

        state.last_reconciled = Some(today);
        RolloverSummary {
            ran: true,
            today,
            changed_habit_ids,
        }
    }

    /// Run a reconciliation check against a store: load the habit list and
    /// state, reconcile, and persist when anything ran.
    ///
    /// Returns a summary of the reconciliation.
    pub fn reconcile_with_store<S: HabitStore>(
        &self,
        store: &S,
        today: CalendarDate,
    ) -> Result<RolloverSummary, String> {
        let mut habits = store.load_habits().map_err(|e| e.to_string())?;
        let mut state = RolloverState {
            last_reconciled: store.load_last_reconciled().map_err(|e| e.to_string())?,
        };

        let summary = self.check_and_reconcile(&mut habits, &mut state, today);

        if summary.ran {
            store.save_habits(&habits).map_err(|e| e.to_string())?;
            store
                .save_last_reconciled(today)
                .map_err(|e| e.to_string())?;
        }
        Ok(summary)
    }
}

/// Clamp a configured poll interval into the supported range.
pub fn clamp_poll_interval(minutes: u64) -> u64 {
    minutes.clamp(MIN_POLL_INTERVAL_MINUTES, MAX_POLL_INTERVAL_MINUTES)
}
