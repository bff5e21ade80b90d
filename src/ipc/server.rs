// Author: Dustin Pilgrim
// License: MIT

use std::io;

use tokio::{
    io::{AsyncReadExt, AsyncWriteExt},
    net::{UnixListener, UnixStream},
    sync::{mpsc, oneshot},
    time::{Duration, timeout},
};

use crate::core::tracker_msg::TrackerMsg;
use crate::core::utils::format_total;

/// Binds the command socket and spawns the accept loop. The daemon's single
/// consumer loop serializes everything routed through `tx`, so connections
/// never observe a half-applied transition.
pub async fn spawn_ipc_server(tx: mpsc::Sender<TrackerMsg>) -> io::Result<()> {
    let path = socket_or_io_err()?;

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    // The instance lock guarantees we are the only daemon; any socket file
    // left at this path is stale.
    let _ = std::fs::remove_file(&path);

    let listener = UnixListener::bind(&path)?;
    tracing::info!("ipc: listening on {}", path.display());

    tokio::spawn(async move {
        loop {
            match listener.accept().await {
                Ok((mut stream, _addr)) => {
                    let tx = tx.clone();

                    tokio::spawn(async move {
                        let result = timeout(Duration::from_secs(10), async {
                            if let Err(e) = handle_connection(&mut stream, tx).await {
                                tracing::error!("ipc: connection error: {}", e);
                            }
                        })
                        .await;

                        if result.is_err() {
                            tracing::error!("ipc: connection timed out");
                        }

                        let _ = stream.shutdown().await;
                    });
                }
                Err(e) => tracing::error!("ipc: accept failed: {}", e),
            }
        }
    });

    Ok(())
}

fn socket_or_io_err() -> io::Result<std::path::PathBuf> {
    super::socket_path().map_err(io::Error::other)
}

async fn handle_connection(
    stream: &mut UnixStream,
    tx: mpsc::Sender<TrackerMsg>,
) -> io::Result<()> {
    let mut buf = vec![0u8; 256];
    let n = stream.read(&mut buf).await?;

    if n == 0 {
        return Ok(());
    }

    let cmd = String::from_utf8_lossy(&buf[..n]).trim().to_string();
    tracing::debug!("ipc: received command: {}", cmd);

    let response = route_command(&cmd, &tx).await;

    stream.write_all(response.as_bytes()).await?;
    stream.flush().await?;

    Ok(())
}

async fn route_command(cmd: &str, tx: &mpsc::Sender<TrackerMsg>) -> String {
    match cmd {
        "total" => {
            let (reply, rx) = oneshot::channel();
            request(tx, TrackerMsg::GetTotal { reply }, rx, |(hours, minutes)| {
                format_total(hours * 3600 + minutes * 60)
            })
            .await
        }

        "total --json" => {
            let (reply, rx) = oneshot::channel();
            request(tx, TrackerMsg::GetInfo { reply }, rx, |snap| {
                snap.to_json().to_string()
            })
            .await
        }

        "info" => {
            let (reply, rx) = oneshot::channel();
            request(tx, TrackerMsg::GetInfo { reply }, rx, |snap| snap.pretty()).await
        }

        "info --json" => {
            let (reply, rx) = oneshot::channel();
            request(tx, TrackerMsg::GetInfo { reply }, rx, |snap| {
                snap.to_json().to_string()
            })
            .await
        }

        "stop" => {
            let (reply, rx) = oneshot::channel();
            request(tx, TrackerMsg::StopDaemon { reply }, rx, |msg| msg).await
        }

        other => format!("ERROR: unknown command: {other}"),
    }
}

async fn request<T>(
    tx: &mpsc::Sender<TrackerMsg>,
    msg: TrackerMsg,
    rx: oneshot::Receiver<Result<T, String>>,
    render: impl FnOnce(T) -> String,
) -> String {
    if tx.send(msg).await.is_err() {
        return "ERROR: daemon is shutting down".to_string();
    }

    match rx.await {
        Ok(Ok(value)) => render(value),
        Ok(Err(e)) => format!("ERROR: {e}"),
        Err(_) => "ERROR: daemon dropped the request".to_string(),
    }
}
