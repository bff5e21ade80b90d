// Author: Dustin Pilgrim
// License: MIT

use std::sync::Arc;

use tokio::sync::mpsc::Sender;
use tokio::time::{Duration, sleep};

use crate::core::events::Event;
use crate::core::tracker_msg::TrackerMsg;
use crate::core::utils::now_secs;
use crate::services::idle::IdleSensor;

const TICK_INTERVAL: Duration = Duration::from_secs(2);

/// Fixed-cadence sampling loop. Each tick pairs one wall-clock read with one
/// sensor read; the daemon's single consumer loop keeps ticks and queries
/// from ever overlapping.
pub async fn run_ticker(tx: Sender<TrackerMsg>, sensor: Arc<dyn IdleSensor>) {
    tracing::info!("ticker started");

    loop {
        sleep(TICK_INTERVAL).await;

        let now = now_secs();
        let idle_secs = sensor.idle_seconds() as i64;

        // If the daemon is gone, stop.
        if tx
            .send(TrackerMsg::Event(Event::Tick { now, idle_secs }))
            .await
            .is_err()
        {
            tracing::warn!("ticker stopping (receiver dropped)");
            break;
        }
    }
}
