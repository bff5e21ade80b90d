// Author: Dustin Pilgrim
// License: MIT

use tokio::sync::oneshot;

use crate::core::{events::Event, info::InfoSnapshot};

#[derive(Debug)]
pub enum TrackerMsg {
    Event(Event),

    /// Today's total, truncated to (hours, minutes).
    GetTotal {
        reply: oneshot::Sender<Result<(i64, i64), String>>,
    },

    GetInfo {
        reply: oneshot::Sender<Result<InfoSnapshot, String>>,
    },

    StopDaemon {
        reply: oneshot::Sender<Result<String, String>>,
    },
}
