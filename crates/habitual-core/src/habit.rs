//! Habit records and their check-in logs.

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::calendar::CalendarDate;
use crate::streak::{self, StreakSummary};

/// The set of calendar dates a habit was checked in on.
///
/// At most one entry per day; insertion order is irrelevant. Streak
/// computation walks the descending (most-recent-first) view.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CheckInLog {
    dates: BTreeSet<CalendarDate>,
}

impl CheckInLog {
    /// Create an empty log.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a log from raw persisted entries.
    ///
    /// Each entry is normalized to its calendar-date form (trailing time
    /// components stripped, duplicates collapsed). Entries that do not parse
    /// are dropped rather than failing the whole log, so one corrupt entry
    /// cannot invalidate a habit's streak history. Returns the log and the
    /// number of dropped entries.
    pub fn from_raw_entries<I, S>(entries: I) -> (Self, usize)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut log = Self::new();
        let mut dropped = 0;
        for entry in entries {
            match CalendarDate::parse(entry.as_ref()) {
                Ok(date) => {
                    log.insert(date);
                }
                Err(_) => dropped += 1,
            }
        }
        (log, dropped)
    }

    /// Number of distinct check-in dates.
    pub fn len(&self) -> usize {
        self.dates.len()
    }

    /// Whether the log holds no check-ins.
    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    /// Whether `date` is checked in.
    pub fn contains(&self, date: CalendarDate) -> bool {
        self.dates.contains(&date)
    }

    /// Insert a check-in. Inserting an already-present date is a no-op;
    /// returns whether the log changed.
    pub fn insert(&mut self, date: CalendarDate) -> bool {
        self.dates.insert(date)
    }

    /// Remove a check-in; returns whether the date was present.
    pub fn remove(&mut self, date: CalendarDate) -> bool {
        self.dates.remove(&date)
    }

    /// Toggle a check-in: remove the date when present, insert it when
    /// absent. Returns whether the date is checked in afterwards.
    pub fn toggle(&mut self, date: CalendarDate) -> bool {
        if self.dates.remove(&date) {
            false
        } else {
            self.dates.insert(date);
            true
        }
    }

    /// Most-recent-first view of the check-in dates.
    pub fn iter_descending(&self) -> impl Iterator<Item = CalendarDate> + '_ {
        self.dates.iter().rev().copied()
    }

    /// The most recent check-in date, if any.
    pub fn latest(&self) -> Option<CalendarDate> {
        self.dates.iter().next_back().copied()
    }
}

impl FromIterator<CalendarDate> for CheckInLog {
    fn from_iter<I: IntoIterator<Item = CalendarDate>>(iter: I) -> Self {
        Self {
            dates: iter.into_iter().collect(),
        }
    }
}

/// A tracked daily habit.
///
/// `current_streak` and `longest_streak` are derived display caches: they
/// must always equal `streak::compute(&check_ins, today)` and are recomputed
/// whole whenever the log or the calendar day changes, never patched
/// incrementally.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Habit {
    pub id: String,
    pub name: String,
    pub check_ins: CheckInLog,
    pub current_streak: u32,
    pub longest_streak: u32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Habit {
    /// Create a habit with an empty log and zero streaks.
    pub fn new(name: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            name: name.into(),
            check_ins: CheckInLog::new(),
            current_streak: 0,
            longest_streak: 0,
            created_at: now,
            updated_at: now,
        }
    }

    /// The derived streak fields as a summary value.
    pub fn streaks(&self) -> StreakSummary {
        StreakSummary {
            current: self.current_streak,
            longest: self.longest_streak,
        }
    }

    /// Recompute the derived streak fields from the log against `today`.
    /// Returns whether either value changed.
    pub fn refresh_streaks(&mut self, today: CalendarDate) -> bool {
        let summary = streak::compute(&self.check_ins, today);
        let changed = summary != self.streaks();
        self.current_streak = summary.current;
        self.longest_streak = summary.longest;
        changed
    }

    /// Toggle a check-in for `date` and refresh the derived fields.
    /// Returns whether the date is checked in afterwards.
    pub fn toggle_check_in(&mut self, date: CalendarDate, today: CalendarDate) -> bool {
        let checked = self.check_ins.toggle(date);
        self.refresh_streaks(today);
        self.updated_at = Utc::now();
        checked
    }

    /// The most recent check-in date, if any.
    pub fn last_checked_in(&self) -> Option<CalendarDate> {
        self.check_ins.latest()
    }

    /// "Last checked in" display label: "Today", "Yesterday", a formatted
    /// date, or "Never" for an empty log.
    pub fn last_checked_in_label(&self, today: CalendarDate, date_format: &str) -> String {
        match self.last_checked_in() {
            Some(date) => date.label_relative_to(today, date_format),
            None => "Never".to_string(),
        }
    }
}
