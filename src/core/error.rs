// Author: Dustin Pilgrim
// License: MIT

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// An event arrived before the state was seeded by `TrackerState::start`.
    NotStarted,

    /// Both the active and idle marks were set at once, which the transition
    /// rules can never produce.
    DualStatus,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::NotStarted => write!(f, "tracker not started"),
            Error::DualStatus => write!(f, "tracker state is both active and idle"),
        }
    }
}

impl std::error::Error for Error {}
