// Author: Dustin Pilgrim
// License: MIT

use std::fs;

use tempfile::TempDir;

use crate::core::journal::{Journal, local_day_start};
use crate::core::state::TrackerState;

// An arbitrary fixed instant; tests build timestamps around its local
// midnight so they hold in any timezone.
const FIXED_INSTANT: i64 = 1_700_000_000;

fn day_base() -> i64 {
    local_day_start(FIXED_INSTANT)
}

fn journal_with(dir: &TempDir, contents: &str) -> Journal {
    let path = dir.path().join("journal.log");
    fs::write(&path, contents).unwrap();
    Journal::open(&path).unwrap()
}

fn idle_state() -> TrackerState {
    TrackerState::new()
}

#[test]
fn append_writes_one_line_per_interval() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("journal.log");

    let mut journal = Journal::open(&path).unwrap();
    journal.append_closed(1000, 4000).unwrap();
    journal.append_closed(5000, 6000).unwrap();

    let contents = fs::read_to_string(&path).unwrap();
    assert_eq!(contents, "1000 - 4000\n5000 - 6000\n");
}

#[test]
fn open_creates_missing_parent_directories() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("nested").join("deeper").join("journal.log");

    let journal = Journal::open(&path).unwrap();
    assert_eq!(journal.path(), path);
    assert!(path.exists());
}

#[test]
fn sums_closed_intervals_within_today() {
    let base = day_base();
    let dir = TempDir::new().unwrap();

    let journal = journal_with(
        &dir,
        &format!(
            "{} - {}\n{} - {}\n",
            base + 1000,
            base + 4000,
            base + 5000,
            base + 5500,
        ),
    );

    let total = journal
        .total_active_seconds(base + 7200, &idle_state())
        .unwrap();
    assert_eq!(total, 3500);
}

#[test]
fn clips_an_interval_straddling_midnight() {
    let base = day_base();
    let dir = TempDir::new().unwrap();

    // 23:00 yesterday to 01:00 today counts for one hour, not two.
    let journal = journal_with(&dir, &format!("{} - {}\n", base - 3600, base + 3600));

    let total = journal
        .total_active_seconds(base + 7200, &idle_state())
        .unwrap();
    assert_eq!(total, 3600);
}

#[test]
fn skips_intervals_that_ended_before_today() {
    let base = day_base();
    let dir = TempDir::new().unwrap();

    let journal = journal_with(
        &dir,
        &format!(
            "{} - {}\n{} - {}\n",
            base - 7200,
            base - 3600,
            base + 100,
            base + 200,
        ),
    );

    let total = journal
        .total_active_seconds(base + 7200, &idle_state())
        .unwrap();
    assert_eq!(total, 100);
}

#[test]
fn open_interval_is_counted_from_state_alone() {
    let base = day_base();
    let dir = TempDir::new().unwrap();

    let journal = journal_with(&dir, "");

    let now = base + 7200;
    let mut state = TrackerState::new();
    state.start(now - 600);

    let total = journal.total_active_seconds(now, &state).unwrap();
    assert_eq!(total, 600);
}

#[test]
fn tolerates_malformed_and_bare_start_lines() {
    let base = day_base();
    let dir = TempDir::new().unwrap();

    // A legacy open marker, plain garbage, and a blank line must not
    // contribute or abort the scan.
    let journal = journal_with(
        &dir,
        &format!(
            "{} - \nnot a record\n\n{} - {}\n",
            base + 50,
            base + 1000,
            base + 4000,
        ),
    );

    let total = journal
        .total_active_seconds(base + 7200, &idle_state())
        .unwrap();
    assert_eq!(total, 3000);
}

#[test]
fn tolerates_separator_drift() {
    let base = day_base();
    let dir = TempDir::new().unwrap();

    // Token extraction must not depend on the exact " - " separator.
    let journal = journal_with(&dir, &format!("{}  -{}\n", base + 1000, base + 1500));

    let total = journal
        .total_active_seconds(base + 7200, &idle_state())
        .unwrap();
    assert_eq!(total, 500);
}

#[test]
fn aggregation_is_repeatable() {
    let base = day_base();
    let dir = TempDir::new().unwrap();

    let journal = journal_with(&dir, &format!("{} - {}\n", base + 1000, base + 4000));

    let now = base + 7200;
    let first = journal.total_active_seconds(now, &idle_state()).unwrap();
    let second = journal.total_active_seconds(now, &idle_state()).unwrap();
    assert_eq!(first, second);
}

#[test]
fn missing_journal_fails_the_query() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("journal.log");

    let journal = Journal::open(&path).unwrap();
    fs::remove_file(&path).unwrap();

    let res = journal.total_active_seconds(FIXED_INSTANT, &idle_state());
    assert!(res.is_err());
}

#[test]
fn totals_truncate_to_hours_and_minutes() {
    let base = day_base();
    let dir = TempDir::new().unwrap();

    // 3000 seconds is 50 minutes, 0 hours after truncation.
    let journal = journal_with(&dir, &format!("{} - {}\n", base + 1000, base + 4000));

    let (hours, minutes) = journal
        .total_time_today(base + 7200, &idle_state())
        .unwrap();
    assert_eq!((hours, minutes), (0, 50));
}

#[test]
fn appended_lines_show_up_in_the_next_read() {
    let base = day_base();
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("journal.log");

    let mut journal = Journal::open(&path).unwrap();

    let before = journal
        .total_active_seconds(base + 7200, &idle_state())
        .unwrap();
    assert_eq!(before, 0);

    journal.append_closed(base + 1000, base + 1300).unwrap();

    let after = journal
        .total_active_seconds(base + 7200, &idle_state())
        .unwrap();
    assert_eq!(after, 300);
}
