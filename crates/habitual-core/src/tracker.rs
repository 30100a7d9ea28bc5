//! Embeddable habit-tracking facade.
//!
//! A GUI host owns one [`HabitTracker`] and drives it the way the rest of
//! the crate expects: mutate through the CRUD methods, call [`tick`] on a
//! timer (and implicitly at startup) so streaks survive the date rolling
//! over, and drain [`events`] to know what to redraw. All clock reads stay
//! at this boundary; the `_at` variants take an explicit `today` so the
//! whole facade is testable on a pinned date.
//!
//! Persistence is a display cache. If the store is unavailable the tracker
//! keeps working on an in-memory list for the session instead of failing
//! (streak computation needs no persistence to be correct).
//!
//! [`tick`]: HabitTracker::tick
//! [`events`]: HabitTracker::take_events

use std::time::Duration;

use chrono::Utc;

use crate::calendar::CalendarDate;
use crate::error::{CoreError, Result, ValidationError};
use crate::events::HabitEvent;
use crate::habit::Habit;
use crate::rollover::{RolloverMonitor, RolloverState, RolloverSummary};
use crate::storage::{Config, Database};

/// Habit list, rollover state, and storage behind one embedding surface.
pub struct HabitTracker {
    db: Option<Database>,
    config: Config,
    habits: Vec<Habit>,
    rollover: RolloverState,
    monitor: RolloverMonitor,
    events: Vec<HabitEvent>,
}

impl HabitTracker {
    /// Open the tracker against the default database and config.
    ///
    /// A storage failure degrades to an empty in-memory list rather than
    /// failing. Runs the startup reconciliation before returning, so loaded
    /// streaks are already consistent with the current date.
    pub fn open() -> Self {
        let config = Config::load_or_default();
        match Database::open() {
            Ok(db) => Self::with_database(db, config),
            Err(_) => Self::unpersisted(config),
        }
    }

    /// Open the tracker against an explicit database (tests use
    /// `Database::open_memory()`).
    pub fn with_database(db: Database, config: Config) -> Self {
        match db.load_habits() {
            Ok(mut habits) => {
                // Persisted streak fields are not trusted; re-derive before
                // anything is displayed.
                let today = CalendarDate::today();
                for habit in &mut habits {
                    habit.refresh_streaks(today);
                }
                let rollover = RolloverState {
                    last_reconciled: db.load_last_reconciled().ok().flatten(),
                };
                let mut tracker = Self {
                    db: Some(db),
                    config,
                    habits,
                    rollover,
                    monitor: RolloverMonitor::new(),
                    events: Vec::new(),
                };
                tracker.tick_at(today);
                tracker
            }
            Err(_) => Self::unpersisted(config),
        }
    }

    /// Open a tracker with no storage backend at all.
    pub fn unpersisted(config: Config) -> Self {
        let mut tracker = Self {
            db: None,
            config,
            habits: Vec::new(),
            rollover: RolloverState::new(),
            monitor: RolloverMonitor::new(),
            events: Vec::new(),
        };
        tracker.tick_at(CalendarDate::today());
        tracker
    }

    /// Whether the tracker is operating without a usable store.
    pub fn is_degraded(&self) -> bool {
        self.db.is_none()
    }

    /// The current habit list, streaks already consistent with the last
    /// reconciled date.
    pub fn habits(&self) -> &[Habit] {
        &self.habits
    }

    /// Look up a habit by id.
    pub fn habit(&self, id: &str) -> Option<&Habit> {
        self.habits.iter().find(|h| h.id == id)
    }

    /// The active configuration.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// The current rollover state.
    pub fn rollover_state(&self) -> &RolloverState {
        &self.rollover
    }

    /// How often the host should call [`HabitTracker::tick`].
    pub fn poll_interval(&self) -> Duration {
        self.config.poll_interval()
    }

    /// Drain buffered events for the GUI.
    pub fn take_events(&mut self) -> Vec<HabitEvent> {
        std::mem::take(&mut self.events)
    }

    /// Periodic poll entry point; also runs once during construction.
    pub fn tick(&mut self) -> RolloverSummary {
        self.tick_at(CalendarDate::today())
    }

    /// [`HabitTracker::tick`] against an injected `today`.
    pub fn tick_at(&mut self, today: CalendarDate) -> RolloverSummary {
        let summary = self.reconcile(today);
        if summary.ran {
            self.persist();
        }
        summary
    }

    /// Create a habit with an empty log; returns its id.
    pub fn create_habit(&mut self, name: &str) -> Result<String> {
        self.create_habit_at(name, CalendarDate::today())
    }

    pub fn create_habit_at(&mut self, name: &str, today: CalendarDate) -> Result<String> {
        let name = validated_name(name)?;
        let habit = Habit::new(name);
        let id = habit.id.clone();
        self.events.push(HabitEvent::HabitCreated {
            habit_id: id.clone(),
            name: habit.name.clone(),
            at: Utc::now(),
        });
        self.habits.push(habit);
        self.touch_and_persist(today);
        Ok(id)
    }

    /// Rename a habit. Streaks are untouched.
    pub fn rename_habit(&mut self, id: &str, name: &str) -> Result<()> {
        let name = validated_name(name)?;
        let habit = self.habit_mut(id)?;
        habit.name = name.to_string();
        habit.updated_at = Utc::now();
        let event = HabitEvent::HabitRenamed {
            habit_id: habit.id.clone(),
            name: habit.name.clone(),
            at: Utc::now(),
        };
        self.events.push(event);
        self.touch_and_persist(CalendarDate::today());
        Ok(())
    }

    /// Delete a habit, returning the removed record.
    pub fn delete_habit(&mut self, id: &str) -> Result<Habit> {
        let index = self
            .habits
            .iter()
            .position(|h| h.id == id)
            .ok_or_else(|| CoreError::UnknownHabit(id.to_string()))?;
        let habit = self.habits.remove(index);
        self.events.push(HabitEvent::HabitDeleted {
            habit_id: habit.id.clone(),
            at: Utc::now(),
        });
        self.touch_and_persist(CalendarDate::today());
        Ok(habit)
    }

    /// Toggle today's check-in for a habit.
    pub fn toggle_today(&mut self, id: &str) -> Result<bool> {
        let today = CalendarDate::today();
        self.toggle_check_in_at(id, today, today)
    }

    /// Toggle a check-in for an arbitrary date.
    pub fn toggle_check_in(&mut self, id: &str, date: CalendarDate) -> Result<bool> {
        self.toggle_check_in_at(id, date, CalendarDate::today())
    }

    /// Toggle against an injected `today`. Returns whether the date is
    /// checked in afterwards.
    pub fn toggle_check_in_at(
        &mut self,
        id: &str,
        date: CalendarDate,
        today: CalendarDate,
    ) -> Result<bool> {
        let habit = self.habit_mut(id)?;
        let checked = habit.toggle_check_in(date, today);
        let event = HabitEvent::CheckInToggled {
            habit_id: habit.id.clone(),
            date,
            checked,
            current_streak: habit.current_streak,
            longest_streak: habit.longest_streak,
            at: Utc::now(),
        };
        self.events.push(event);
        self.touch_and_persist(today);
        Ok(checked)
    }

    /// "Last checked in" label for a habit, using the configured format.
    pub fn last_checked_in_label(&self, id: &str) -> Result<String> {
        self.last_checked_in_label_at(id, CalendarDate::today())
    }

    pub fn last_checked_in_label_at(&self, id: &str, today: CalendarDate) -> Result<String> {
        let habit = self
            .habit(id)
            .ok_or_else(|| CoreError::UnknownHabit(id.to_string()))?;
        Ok(habit.last_checked_in_label(today, &self.config.display.date_format))
    }

    fn habit_mut(&mut self, id: &str) -> Result<&mut Habit> {
        self.habits
            .iter_mut()
            .find(|h| h.id == id)
            .ok_or_else(|| CoreError::UnknownHabit(id.to_string()))
    }

    /// Run the rollover check, emitting a redraw event when streaks moved.
    fn reconcile(&mut self, today: CalendarDate) -> RolloverSummary {
        let summary = self
            .monitor
            .check_and_reconcile(&mut self.habits, &mut self.rollover, today);
        if summary.has_changes() {
            self.events.push(HabitEvent::DayRolledOver {
                date: today,
                changed_habit_ids: summary.changed_habit_ids.clone(),
                at: Utc::now(),
            });
        }
        summary
    }

    /// Every persisting mutation is also a reconciliation point: a mutation
    /// on a stale day re-derives everything first, and the rollover state
    /// is stamped with today on every normal save.
    fn touch_and_persist(&mut self, today: CalendarDate) {
        self.reconcile(today);
        self.rollover.last_reconciled = Some(today);
        self.persist();
    }

    /// Best-effort save. A failing store drops the tracker into degraded
    /// mode; the in-memory session stays intact.
    fn persist(&mut self) {
        let Some(db) = &self.db else {
            return;
        };
        if db.save_habits(&self.habits).is_err() {
            self.db = None;
            return;
        }
        if let Some(date) = self.rollover.last_reconciled {
            if db.save_last_reconciled(date).is_err() {
                self.db = None;
            }
        }
    }
}

fn validated_name(name: &str) -> Result<&str> {
    let name = name.trim();
    if name.is_empty() {
        return Err(ValidationError::EmptyName.into());
    }
    Ok(name)
}
