//! Streak computation over a habit's check-in log.
//!
//! Two statistics are derived from a log and never stored authoritatively:
//! - **Current streak**: consecutive check-in days ending at `today`. Zero
//!   unless today itself is checked in; an unbroken run that stops at
//!   yesterday counts for nothing.
//! - **Longest streak**: the maximum run of consecutive check-in days
//!   anywhere in history, independent of `today`.
//!
//! The two are computed by separate passes on purpose: the current streak
//! has an anchor condition (must include today) that the longest streak
//! must not inherit.

use serde::{Deserialize, Serialize};

use crate::calendar::CalendarDate;
use crate::habit::CheckInLog;

/// Derived streak statistics for a single habit.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreakSummary {
    /// Consecutive check-in days ending today; zero when today is unchecked.
    pub current: u32,
    /// Longest run of consecutive check-in days anywhere in history.
    pub longest: u32,
}

/// Compute both streak statistics for a check-in log against `today`.
///
/// Total over any log; an empty log yields `{0, 0}`. Idempotent: the same
/// inputs always produce the same summary.
pub fn compute(log: &CheckInLog, today: CalendarDate) -> StreakSummary {
    if log.is_empty() {
        return StreakSummary::default();
    }
    StreakSummary {
        current: current_streak(log, today),
        longest: longest_streak(log),
    }
}

/// Walk backwards from `today`, counting strictly consecutive days.
///
/// Stops at the first gap; no look-ahead past it. Future-dated entries are
/// skipped: they can never anchor or extend a run ending today.
fn current_streak(log: &CheckInLog, today: CalendarDate) -> u32 {
    if !log.contains(today) {
        return 0;
    }
    let mut streak = 1;
    let mut expected = today.predecessor();
    for date in log.iter_descending() {
        if date >= today {
            continue;
        }
        if date == expected {
            streak += 1;
            expected = expected.predecessor();
        } else {
            break;
        }
    }
    streak
}

/// Full descending scan, tracking the best consecutive-day run.
fn longest_streak(log: &CheckInLog) -> u32 {
    let mut longest = 0;
    let mut run = 0;
    let mut previous: Option<CalendarDate> = None;
    for date in log.iter_descending() {
        run = match previous {
            Some(prev) if prev.days_between(date) == 1 => run + 1,
            _ => {
                longest = longest.max(run);
                1
            }
        };
        previous = Some(date);
    }
    longest.max(run)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> CalendarDate {
        CalendarDate::parse(s).unwrap()
    }

    fn log_of(today: CalendarDate, offsets: &[u64]) -> CheckInLog {
        offsets.iter().map(|&off| today.minus_days(off)).collect()
    }

    const TODAY: &str = "2026-03-15";

    #[test]
    fn empty_log_yields_zeroes() {
        let today = date(TODAY);
        assert_eq!(
            compute(&CheckInLog::new(), today),
            StreakSummary { current: 0, longest: 0 }
        );
    }

    #[test]
    fn unbroken_run_ending_today() {
        // {today, yesterday, today-2}
        let today = date(TODAY);
        let log = log_of(today, &[0, 1, 2]);
        assert_eq!(
            compute(&log, today),
            StreakSummary { current: 3, longest: 3 }
        );
    }

    #[test]
    fn missing_today_zeroes_current_streak() {
        // {yesterday, today-2}: the run is intact but does not reach today.
        let today = date(TODAY);
        let log = log_of(today, &[1, 2]);
        assert_eq!(
            compute(&log, today),
            StreakSummary { current: 0, longest: 2 }
        );
    }

    #[test]
    fn single_skipped_day_breaks_the_streak() {
        // {today, today-2}: gap at yesterday.
        let today = date(TODAY);
        let log = log_of(today, &[0, 2]);
        assert_eq!(
            compute(&log, today),
            StreakSummary { current: 1, longest: 1 }
        );
    }

    #[test]
    fn longest_streak_ignores_recency() {
        // {today, yesterday, today-5, today-4, today-3}: current run is 2,
        // but the older three-day run is the longest.
        let today = date(TODAY);
        let log = log_of(today, &[0, 1, 3, 4, 5]);
        assert_eq!(
            compute(&log, today),
            StreakSummary { current: 2, longest: 3 }
        );
    }

    #[test]
    fn single_entry_log_has_longest_one() {
        let today = date(TODAY);
        let log = log_of(today, &[7]);
        assert_eq!(
            compute(&log, today),
            StreakSummary { current: 0, longest: 1 }
        );
    }

    #[test]
    fn no_lookahead_past_first_gap() {
        // A long run hiding behind a gap must not extend the current streak.
        let today = date(TODAY);
        let log = log_of(today, &[0, 1, 4, 5, 6, 7]);
        assert_eq!(
            compute(&log, today),
            StreakSummary { current: 2, longest: 4 }
        );
    }

    #[test]
    fn future_dates_never_anchor_current_streak() {
        // Clock skew left an entry past today. It counts as an ordinary
        // date for the longest pass only.
        let today = date(TODAY);
        let mut log = log_of(today, &[0, 1]);
        log.insert(today.successor());
        assert_eq!(
            compute(&log, today),
            StreakSummary { current: 2, longest: 3 }
        );

        // Only a future entry: nothing anchors on today.
        let mut lone = CheckInLog::new();
        lone.insert(today.successor());
        assert_eq!(
            compute(&lone, today),
            StreakSummary { current: 0, longest: 1 }
        );
    }

    #[test]
    fn run_crossing_month_boundary() {
        let today = date("2026-03-02");
        let log: CheckInLog = ["2026-03-02", "2026-03-01", "2026-02-28", "2026-02-27"]
            .iter()
            .map(|s| date(s))
            .collect();
        assert_eq!(
            compute(&log, today),
            StreakSummary { current: 4, longest: 4 }
        );
    }

    #[test]
    fn compute_is_pure() {
        let today = date(TODAY);
        let log = log_of(today, &[0, 1, 2, 5]);
        assert_eq!(compute(&log, today), compute(&log, today));
    }
}

#[cfg(test)]
mod properties {
    use proptest::prelude::*;

    use super::*;

    fn anchor() -> CalendarDate {
        CalendarDate::parse("2026-03-15").unwrap()
    }

    fn arb_log() -> impl Strategy<Value = CheckInLog> {
        proptest::collection::btree_set(0u64..420, 0..48)
            .prop_map(|offsets| offsets.into_iter().map(|off| anchor().minus_days(off)).collect())
    }

    proptest! {
        #[test]
        fn compute_is_idempotent(log in arb_log()) {
            let today = anchor();
            prop_assert_eq!(compute(&log, today), compute(&log, today));
        }

        #[test]
        fn longest_bounds_current(log in arb_log()) {
            let summary = compute(&log, anchor());
            prop_assert!(summary.current == 0 || summary.current <= summary.longest);
            if !log.is_empty() {
                prop_assert!(summary.longest >= 1);
            }
        }

        #[test]
        fn toggling_twice_restores_streaks(log in arb_log(), offset in 0u64..420) {
            let today = anchor();
            let probe = today.minus_days(offset);
            let before = compute(&log, today);

            let mut mutated = log.clone();
            mutated.toggle(probe);
            mutated.toggle(probe);

            prop_assert_eq!(mutated, log.clone());
            prop_assert_eq!(compute(&log, today), before);
        }

        #[test]
        fn timestamped_duplicates_are_insensitive(offsets in proptest::collection::vec(0u64..120, 0..24)) {
            let today = anchor();
            let plain: Vec<String> =
                offsets.iter().map(|&off| today.minus_days(off).to_string()).collect();
            let mut noisy: Vec<String> = plain.clone();
            noisy.extend(offsets.iter().map(|&off| {
                format!("{}T12:34:56Z", today.minus_days(off))
            }));

            let (log_plain, _) = CheckInLog::from_raw_entries(&plain);
            let (log_noisy, _) = CheckInLog::from_raw_entries(&noisy);
            prop_assert_eq!(
                compute(&log_plain, today),
                compute(&log_noisy, today)
            );
        }
    }
}
