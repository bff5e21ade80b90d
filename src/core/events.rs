// Author: Dustin Pilgrim
// License: MIT

/// Inputs to the tracker. Timestamps are integer Unix epoch seconds supplied
/// by the caller; the core never reads a clock itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    /// Periodic sample: current wall-clock time plus seconds elapsed since
    /// the last input event, as reported by the idle sensor.
    Tick {
        now: i64,
        idle_secs: i64,
    },

    /// Session shutdown. Carries a final sensor sample so an open active
    /// interval can be closed with the same backdating as a normal idle
    /// transition.
    Stop {
        now: i64,
        idle_secs: i64,
    },
}
