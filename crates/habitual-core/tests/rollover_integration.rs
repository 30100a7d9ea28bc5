//! Integration tests for rollover reconciliation against real storage.
//!
//! Drives `RolloverMonitor::reconcile_with_store` with an in-memory
//! database: habits are persisted with streaks derived on an earlier day,
//! then reconciled after the date has moved on.

use habitual_core::{CalendarDate, CheckInLog, Database, Habit, HabitStore, RolloverMonitor};

fn date(s: &str) -> CalendarDate {
    CalendarDate::parse(s).unwrap()
}

fn seeded_habit(name: &str, derived_on: CalendarDate, offsets: &[u64]) -> Habit {
    let mut habit = Habit::new(name);
    habit.check_ins = offsets
        .iter()
        .map(|&off| derived_on.minus_days(off))
        .collect::<CheckInLog>();
    habit.refresh_streaks(derived_on);
    habit
}

#[test]
fn stale_state_zeroes_streaks_and_stamps_the_store() {
    let yesterday = date("2026-03-14");
    let today = date("2026-03-15");
    let db = Database::open_memory().unwrap();

    // Most recent check-in is today-2. The cached streak of 2 dates from
    // when that entry was still "today"; the state last reconciled
    // yesterday.
    let habit = seeded_habit("Read", date("2026-03-13"), &[0, 1]);
    let habit_id = habit.id.clone();
    assert_eq!(habit.current_streak, 2);
    db.save_habits(&[habit]).unwrap();
    db.save_last_reconciled(yesterday).unwrap();

    // Loaded streaks still reflect yesterday's derivation.
    assert_eq!(db.load_habits().unwrap()[0].current_streak, 2);

    let summary = RolloverMonitor::new()
        .reconcile_with_store(&db, today)
        .unwrap();

    assert!(summary.ran);
    assert_eq!(summary.changed_habit_ids, vec![habit_id]);

    let reloaded = db.load_habits().unwrap();
    assert_eq!(reloaded[0].current_streak, 0);
    assert_eq!(reloaded[0].longest_streak, 2);
    assert_eq!(db.load_last_reconciled().unwrap(), Some(today));
}

#[test]
fn fresh_state_forces_a_first_reconciliation() {
    let today = date("2026-03-15");
    let db = Database::open_memory().unwrap();
    db.save_habits(&[seeded_habit("Read", today, &[0])]).unwrap();

    assert_eq!(db.load_last_reconciled().unwrap(), None);
    let summary = RolloverMonitor::new()
        .reconcile_with_store(&db, today)
        .unwrap();

    assert!(summary.ran);
    assert!(!summary.has_changes());
    assert_eq!(db.load_last_reconciled().unwrap(), Some(today));
}

#[test]
fn same_day_reconciliation_is_a_noop_and_writes_nothing() {
    let today = date("2026-03-15");
    let db = Database::open_memory().unwrap();

    let habit = seeded_habit("Read", today, &[0, 1]);
    db.save_habits(&[habit]).unwrap();
    db.save_last_reconciled(today).unwrap();

    let summary = RolloverMonitor::new()
        .reconcile_with_store(&db, today)
        .unwrap();

    assert!(!summary.ran);
    assert!(!summary.has_changes());
    assert_eq!(db.load_habits().unwrap()[0].current_streak, 2);
}

#[test]
fn multi_day_absence_is_one_reconciliation() {
    // The app was closed for a week; startup reconciliation jumps the
    // state straight to the current date.
    let derived_on = date("2026-03-08");
    let today = date("2026-03-15");
    let db = Database::open_memory().unwrap();

    let habit = seeded_habit("Read", derived_on, &[0, 1, 2, 3]);
    assert_eq!(habit.current_streak, 4);
    db.save_habits(&[habit]).unwrap();
    db.save_last_reconciled(derived_on).unwrap();

    let summary = RolloverMonitor::new()
        .reconcile_with_store(&db, today)
        .unwrap();

    assert!(summary.ran);
    assert_eq!(summary.changed_habit_ids.len(), 1);

    let reloaded = db.load_habits().unwrap();
    assert_eq!(reloaded[0].current_streak, 0);
    assert_eq!(reloaded[0].longest_streak, 4);
    assert_eq!(db.load_last_reconciled().unwrap(), Some(today));
}

#[test]
fn reconcile_via_trait_object_bound() {
    // The monitor only needs the HabitStore contract, not Database itself.
    fn run<S: HabitStore>(store: &S, today: CalendarDate) -> bool {
        RolloverMonitor::new()
            .reconcile_with_store(store, today)
            .unwrap()
            .ran
    }

    let db = Database::open_memory().unwrap();
    assert!(run(&db, date("2026-03-15")));
}
