// Author: Dustin Pilgrim
// License: MIT

use std::path::PathBuf;

use chrono::{Local, LocalResult, TimeZone};

use crate::core::utils::format_total;

/// Snapshot returned from the daemon for `tally info` / `tally total`.
#[derive(Debug, Clone)]
pub struct InfoSnapshot {
    /// True while an active interval is open.
    pub active: bool,

    /// Transition timestamp that opened the current status.
    pub since: i64,

    /// Total active seconds for today, in-progress interval included.
    pub total_secs: i64,

    pub idle_wait_secs: i64,
    pub journal_path: PathBuf,
}

impl InfoSnapshot {
    pub fn status_label(&self) -> &'static str {
        if self.active { "active" } else { "idle" }
    }

    /// CLI-facing output for `tally info`.
    pub fn pretty(&self) -> String {
        let mut out = String::new();

        out.push_str("◆ STATUS\n");
        out.push_str(&format!("State: {}\n", self.status_label()));
        out.push_str(&format!("Since: {}\n", Self::local_clock(self.since)));
        out.push_str(&format!("Today: {}\n", format_total(self.total_secs)));
        out.push_str("◆ CONFIGURATION\n");
        out.push_str(&format!("Idle Threshold: {}s\n", self.idle_wait_secs));
        out.push_str(&format!("Journal: {}\n", self.journal_path.display()));

        out.trim_end().to_string()
    }

    /// Wall-clock rendering of the current status' transition instant.
    fn local_clock(at: i64) -> String {
        match Local.timestamp_opt(at, 0) {
            LocalResult::Single(dt) | LocalResult::Ambiguous(dt, _) => {
                dt.format("%H:%M:%S").to_string()
            }
            LocalResult::None => at.to_string(),
        }
    }

    /// Status-bar JSON contract (text/alt/tooltip).
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::json!({
            "text": format_total(self.total_secs),
            "alt": self.status_label(),
            "tooltip": format!(
                "{} today ({})",
                format_total(self.total_secs),
                self.status_label(),
            ),
        })
    }
}
