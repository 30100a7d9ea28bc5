//! Calendar-date utilities.
//!
//! A [`CalendarDate`] is a day-granularity point in local time, canonically
//! the ISO `YYYY-MM-DD` string. Equality, ordering, and hashing all follow
//! the calendar day; time-of-day never participates, and any time component
//! embedded in an input string is stripped before parsing.
//!
//! The only wall-clock reads in the crate live here ([`CalendarDate::today`]
//! and friends). Streak computation and rollover reconciliation take `today`
//! as an explicit parameter so tests can pin the date.

use std::fmt;
use std::str::FromStr;

use chrono::{Duration, Local, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::DateError;

/// Canonical serialization format for calendar dates.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// A local calendar day.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(try_from = "String", into = "String")]
pub struct CalendarDate(NaiveDate);

impl CalendarDate {
    /// Parse a calendar date from its canonical `YYYY-MM-DD` form.
    ///
    /// A trailing time component (`2024-03-01T08:30:00Z`, `2024-03-01 08:30`)
    /// is stripped; only the day part is compared anywhere in the crate.
    pub fn parse(input: &str) -> Result<Self, DateError> {
        let trimmed = input.trim();
        let day_part = trimmed.split(['T', ' ']).next().unwrap_or(trimmed);
        NaiveDate::parse_from_str(day_part, DATE_FORMAT)
            .map(Self)
            .map_err(|_| DateError::InvalidFormat {
                input: input.to_string(),
            })
    }

    /// The local system date, no time component.
    pub fn today() -> Self {
        Self(Local::now().date_naive())
    }

    /// `today()` minus one day.
    pub fn yesterday() -> Self {
        Self::today().predecessor()
    }

    /// The calendar date one day before this one.
    pub fn predecessor(self) -> Self {
        Self(self.0 - Duration::days(1))
    }

    /// The calendar date one day after this one.
    pub fn successor(self) -> Self {
        Self(self.0 + Duration::days(1))
    }

    /// This date shifted `days` whole days into the past.
    pub fn minus_days(self, days: u64) -> Self {
        Self(self.0 - Duration::days(days as i64))
    }

    /// Absolute number of calendar days separating two dates.
    ///
    /// Symmetric; `d.days_between(d) == 0`.
    pub fn days_between(self, other: Self) -> u64 {
        (self.0 - other.0).num_days().unsigned_abs()
    }

    /// Whether this date equals the local system date.
    pub fn is_today(self) -> bool {
        self == Self::today()
    }

    /// Whether this date equals the day before the local system date.
    pub fn is_yesterday(self) -> bool {
        self == Self::yesterday()
    }

    /// Display label relative to an injected `today`: "Today", "Yesterday",
    /// or the date formatted with `date_format` (strftime syntax).
    pub fn label_relative_to(self, today: Self, date_format: &str) -> String {
        if self == today {
            "Today".to_string()
        } else if self == today.predecessor() {
            "Yesterday".to_string()
        } else {
            self.0.format(date_format).to_string()
        }
    }
}

impl fmt::Display for CalendarDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format(DATE_FORMAT))
    }
}

impl FromStr for CalendarDate {
    type Err = DateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for CalendarDate {
    type Error = DateError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<CalendarDate> for String {
    fn from(date: CalendarDate) -> Self {
        date.to_string()
    }
}
