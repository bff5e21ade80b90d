// Author: Dustin Pilgrim
// License: MIT

use std::fs::{self, File, OpenOptions};
use std::io::{self, BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

use chrono::{Local, LocalResult, TimeZone, Timelike};
use once_cell::sync::Lazy;
use regex::Regex;

use crate::core::state::TrackerState;

static NUMBER: Lazy<Regex> = Lazy::new(|| Regex::new(r"\d+").expect("number pattern"));

/// Append-only journal of completed active intervals.
///
/// One record per line, `"<start> - <end>"` in epoch seconds. The append
/// handle is opened once and held for the life of the session; reads open the
/// file independently per call, so the total always reflects lines appended
/// since the last query.
#[derive(Debug)]
pub struct Journal {
    path: PathBuf,
    file: File,
}

impl Journal {
    /// Open (creating the file and its parent directory if absent) for
    /// appending. Failure here is fatal to the session.
    pub fn open(path: &Path) -> io::Result<Self> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let file = OpenOptions::new().create(true).append(true).open(path)?;

        Ok(Self {
            path: path.to_path_buf(),
            file,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Write one closed-interval record and flush.
    ///
    /// Open-interval (bare start) lines are never written: a completed line
    /// lands atomically when idle is detected, and the in-progress interval
    /// is always derived from `TrackerState` at read time instead.
    pub fn append_closed(&mut self, start: i64, end: i64) -> io::Result<()> {
        writeln!(self.file, "{start} - {end}")?;
        self.file.flush()
    }

    /// Total active seconds for the local calendar day containing `now`,
    /// including the in-progress interval from `state` if one is open.
    pub fn total_active_seconds(&self, now: i64, state: &TrackerState) -> io::Result<i64> {
        let day_start = local_day_start(now);

        // Fresh read each call; the journal grows between queries.
        let reader = BufReader::new(File::open(&self.path)?);

        let mut total = 0i64;

        for line in reader.lines() {
            let line = line?;

            // Extract the numeric tokens rather than splitting on the exact
            // separator, tolerating formatting drift and skipping lines that
            // carry fewer than two numbers (legacy open markers, corruption).
            let mut numbers = NUMBER
                .find_iter(&line)
                .filter_map(|m| m.as_str().parse::<i64>().ok());

            let (Some(start), Some(end)) = (numbers.next(), numbers.next()) else {
                continue;
            };

            // Entirely before today: skip. Straddling midnight: count only
            // the portion inside today.
            let clipped = start.max(day_start);
            if end > clipped {
                total += end - clipped;
            }
        }

        if let Some(active_at) = state.active_at() {
            total += (now - active_at).max(0);
        }

        Ok(total)
    }

    /// `total_active_seconds` truncated to whole hours and minutes.
    pub fn total_time_today(&self, now: i64, state: &TrackerState) -> io::Result<(i64, i64)> {
        let secs = self.total_active_seconds(now, state)?;
        Ok((secs / 3600, (secs % 3600) / 60))
    }
}

/// Midnight (local time) of the calendar day containing `now`.
pub fn local_day_start(now: i64) -> i64 {
    let at = match Local.timestamp_opt(now, 0) {
        LocalResult::Single(dt) | LocalResult::Ambiguous(dt, _) => dt,
        LocalResult::None => return now,
    };

    let Some(naive_midnight) = at.date_naive().and_hms_opt(0, 0, 0) else {
        return now;
    };

    match Local.from_local_datetime(&naive_midnight) {
        LocalResult::Single(dt) | LocalResult::Ambiguous(dt, _) => dt.timestamp(),
        // A DST gap swallowed midnight itself; approximate by rewinding the
        // wall-clock offset from `now`.
        LocalResult::None => now - i64::from(at.time().num_seconds_from_midnight()),
    }
}
