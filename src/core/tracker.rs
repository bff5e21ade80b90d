// Author: Dustin Pilgrim
// License: MIT

use crate::core::action::Action;
use crate::core::error::Error;
use crate::core::events::Event;
use crate::core::state::TrackerState;

/// The active/idle state machine.
///
/// Consumes events with explicit timestamps, mutates `TrackerState`, and
/// returns the journal writes the daemon should perform. Holds only the
/// configured idle threshold; everything else lives in the state.
#[derive(Debug, Clone, Copy)]
pub struct Tracker {
    idle_wait_secs: i64,
}

impl Tracker {
    pub fn new(idle_wait_secs: i64) -> Self {
        Self { idle_wait_secs }
    }

    pub fn idle_wait_secs(&self) -> i64 {
        self.idle_wait_secs
    }

    pub fn handle_event(
        &self,
        state: &mut TrackerState,
        event: Event,
    ) -> Result<Vec<Action>, Error> {
        match event {
            Event::Tick { now, idle_secs } => self.on_tick(state, now, idle_secs),
            Event::Stop { now, idle_secs } => self.on_stop(state, now, idle_secs),
        }
    }

    fn on_tick(
        &self,
        state: &mut TrackerState,
        now: i64,
        idle_secs: i64,
    ) -> Result<Vec<Action>, Error> {
        match (state.active_at(), state.idled_at()) {
            (Some(active_at), None) => {
                if idle_secs > self.idle_wait_secs {
                    Ok(vec![Self::close_interval(state, active_at, now, idle_secs)])
                } else {
                    Ok(Vec::new())
                }
            }

            (None, Some(idled_at)) => {
                // The sensor only reports how long input has been absent. If
                // more time has elapsed since we marked idle than the sensor
                // currently reports, input must have resumed in between. The
                // exact resume instant is not recoverable from one sample, so
                // the detection instant becomes the new interval start.
                if now - idled_at > idle_secs {
                    state.mark_active(now);
                }
                Ok(Vec::new())
            }

            (None, None) => Err(Error::NotStarted),
            (Some(_), Some(_)) => Err(Error::DualStatus),
        }
    }

    fn on_stop(
        &self,
        state: &mut TrackerState,
        now: i64,
        idle_secs: i64,
    ) -> Result<Vec<Action>, Error> {
        match (state.active_at(), state.idled_at()) {
            // Close the final partial interval so it is not lost.
            (Some(active_at), None) => {
                Ok(vec![Self::close_interval(state, active_at, now, idle_secs)])
            }

            (None, Some(_)) => Ok(Vec::new()),

            (None, None) => Err(Error::NotStarted),
            (Some(_), Some(_)) => Err(Error::DualStatus),
        }
    }

    /// Idling began when input stopped (`now - idle_secs`), not when the
    /// threshold was crossed, clamped so it never precedes the interval's own
    /// start (clock anomalies, oversized sensor samples).
    fn close_interval(state: &mut TrackerState, active_at: i64, now: i64, idle_secs: i64) -> Action {
        let idled_at = (now - idle_secs).max(active_at);
        state.mark_idle(idled_at);

        Action::AppendClosed {
            start: active_at,
            end: idled_at,
        }
    }
}
