use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::calendar::CalendarDate;

/// Every mutation of the habit list produces a HabitEvent.
/// The GUI drains these to know what to redraw.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum HabitEvent {
    HabitCreated {
        habit_id: String,
        name: String,
        at: DateTime<Utc>,
    },
    HabitRenamed {
        habit_id: String,
        name: String,
        at: DateTime<Utc>,
    },
    HabitDeleted {
        habit_id: String,
        at: DateTime<Utc>,
    },
    CheckInToggled {
        habit_id: String,
        date: CalendarDate,
        /// Whether the date is checked in after the toggle.
        checked: bool,
        current_streak: u32,
        longest_streak: u32,
        at: DateTime<Utc>,
    },
    /// The calendar day advanced and streaks were re-derived; only habits
    /// whose values actually changed are listed.
    DayRolledOver {
        date: CalendarDate,
        changed_habit_ids: Vec<String>,
        at: DateTime<Utc>,
    },
}
