// Author: Dustin Pilgrim
// License: MIT

use std::sync::Arc;

use tokio::sync::{mpsc, watch};

use crate::core::{events::Event, tracker_msg::TrackerMsg, utils::now_secs};
use crate::services::idle::{ActivityClock, IdleSensor};

use super::{AnyError, Daemon};

impl Daemon {
    pub async fn run(
        &mut self,
        mut shutdown: watch::Receiver<bool>,
        shutdown_tx: watch::Sender<bool>,
    ) -> Result<(), AnyError> {
        tracing::info!("daemon starting");

        let (tx, mut rx) = mpsc::channel::<TrackerMsg>(256);

        if let Err(e) = crate::ipc::server::spawn_ipc_server(tx.clone()).await {
            tracing::warn!("ipc: failed to start: {}", e);
        }

        let clock = ActivityClock::new();

        if let Err(e) =
            crate::services::idle::run_idle_listener(Arc::clone(&clock), shutdown.clone()).await
        {
            // Degraded mode must be visible: without the sensor every tick
            // reads zero idle and the day counts as fully active.
            tracing::warn!("idle listener unavailable ({e}); assuming always active");
        }

        let sensor: Arc<dyn IdleSensor> = clock;
        tokio::spawn(crate::services::ticker::run_ticker(
            tx.clone(),
            Arc::clone(&sensor),
        ));

        self.state.start(now_secs());
        tracing::info!("tracking started");

        loop {
            tokio::select! {
                _ = shutdown.changed() => {
                    if *shutdown.borrow() {
                        tracing::info!("daemon stopping (shutdown requested)");
                        break self.close_out(&sensor);
                    }
                }

                maybe = rx.recv() => {
                    let Some(msg) = maybe else {
                        tracing::info!("daemon stopping (event channel closed)");
                        break self.close_out(&sensor);
                    };

                    match msg {
                        TrackerMsg::Event(event) => {
                            for action in self.handle_one_event(event) {
                                if let Err(e) = self.exec_action(action) {
                                    // A failed append silently loses tracked
                                    // time; treat it as fatal to the session.
                                    tracing::error!("journal write failed: {e}");
                                    let _ = shutdown_tx.send(true);
                                    return Err(Box::new(e));
                                }
                            }
                        }

                        TrackerMsg::GetTotal { reply } => {
                            let out = self.total_today(now_secs()).map_err(|e| e.to_string());

                            if let Ok((hours, minutes)) = out {
                                self.notify_query_result(hours * 3600 + minutes * 60);
                            }

                            let _ = reply.send(out);
                        }

                        TrackerMsg::GetInfo { reply } => {
                            let out = self.snapshot(now_secs()).map_err(|e| e.to_string());

                            if let Ok(snap) = &out {
                                self.notify_query_result(snap.total_secs);
                            }

                            let _ = reply.send(out);
                        }

                        TrackerMsg::StopDaemon { reply } => {
                            tracing::info!("daemon stopping (stop requested via IPC)");
                            let res = self.close_out(&sensor);
                            let _ = reply.send(Ok("Stopping tally daemon".to_string()));
                            let _ = shutdown_tx.send(true);
                            break res;
                        }
                    }
                }
            }
        }
    }

    /// Close the open interval (if any) with a final sensor sample and flush
    /// it to the journal. Runs on every exit path.
    fn close_out(&mut self, sensor: &Arc<dyn IdleSensor>) -> Result<(), AnyError> {
        let now = now_secs();
        let idle_secs = sensor.idle_seconds() as i64;

        for action in self.handle_one_event(Event::Stop { now, idle_secs }) {
            self.exec_action(action)
                .map_err(|e| Box::new(e) as AnyError)?;
        }

        Ok(())
    }

    fn notify_query_result(&mut self, total_secs: i64) {
        if let Some(action) = self.query_notification(total_secs) {
            // Popup failure is cosmetic; never fail the query over it.
            let _ = self.exec_action(action);
        }
    }
}
