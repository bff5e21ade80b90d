// Author: Dustin Pilgrim
// License: MIT

mod actions;
mod run;

use crate::config::Config;
use crate::core::{
    action::Action,
    error::Error,
    events::Event,
    info::InfoSnapshot,
    journal::Journal,
    state::TrackerState,
    tracker::Tracker,
    utils::format_total,
};

use std::io;

type AnyError = Box<dyn std::error::Error + Send + Sync>;

pub struct Daemon {
    tracker: Tracker,
    state: TrackerState,
    journal: Journal,

    notify_on_query: bool,
}

impl Daemon {
    pub fn new(cfg: &Config, journal: Journal) -> Self {
        tracing::debug!(
            "daemon: idle_wait_secs={}, notify_on_query={}, journal={}",
            cfg.idle_wait_secs,
            cfg.notify_on_query,
            journal.path().display(),
        );

        Self {
            tracker: Tracker::new(cfg.idle_wait_secs),
            state: TrackerState::new(),
            journal,
            notify_on_query: cfg.notify_on_query,
        }
    }

    fn handle_one_event(&mut self, event: Event) -> Vec<Action> {
        let was_active = self.state.is_active();

        let actions = self
            .tracker
            .handle_event(&mut self.state, event)
            .unwrap_or_else(|e| {
                Self::log_handle_event_error(&e);
                Vec::new()
            });

        if was_active != self.state.is_active() {
            tracing::info!(
                "state: {}",
                if self.state.is_active() { "active" } else { "idle" }
            );
        }

        actions
    }

    fn log_handle_event_error(e: &Error) {
        tracing::error!("handle_event failed: {e}");
    }

    fn total_today(&self, now: i64) -> io::Result<(i64, i64)> {
        self.journal.total_time_today(now, &self.state)
    }

    fn snapshot(&self, now: i64) -> io::Result<InfoSnapshot> {
        let total_secs = self.journal.total_active_seconds(now, &self.state)?;

        let since = self
            .state
            .active_at()
            .or(self.state.idled_at())
            .unwrap_or(now);

        Ok(InfoSnapshot {
            active: self.state.is_active(),
            since,
            total_secs,
            idle_wait_secs: self.tracker.idle_wait_secs(),
            journal_path: self.journal.path().to_path_buf(),
        })
    }

    /// Optional popup raised alongside a query response.
    fn query_notification(&self, total_secs: i64) -> Option<Action> {
        if !self.notify_on_query {
            return None;
        }

        Some(Action::Notify {
            message: format!("{} of active time today", format_total(total_secs)),
        })
    }
}
