// Author: Dustin Pilgrim
// License: MIT

use std::io;
use std::path::PathBuf;

use crate::cli::Args;
use crate::core::journal::Journal;
use crate::daemon::Daemon;

type AnyError = Box<dyn std::error::Error + Send + Sync>;

pub async fn run(args: Args) -> Result<(), AnyError> {
    // single-instance
    let _instance_lock = crate::app::platform::acquire_single_instance_lock().map_err(|e| {
        eprintln!("{e}");
        io::Error::new(io::ErrorKind::AlreadyExists, e)
    })?;

    // resolve config path
    let config_path: PathBuf = match args.config.as_deref() {
        Some(p) => p.to_path_buf(),
        None => crate::config::resolve_default_config_path(),
    };

    // config loads before the subscriber so its debug toggle can shape it
    let cfg = crate::config::load_from_path(&config_path).map_err(|e| {
        eprintln!("tally: {e}");
        e
    })?;

    tracing_subscriber::fmt()
        .with_max_level(if args.verbose || cfg.debug {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        })
        .with_target(false)
        .init();

    tracing::info!("tally starting");
    tracing::debug!("config: {}", config_path.display());

    // The journal opens before anything is tracked; an unwritable journal is
    // a configuration error, not a condition to limp through.
    let journal = Journal::open(&cfg.journal_path).map_err(|e| {
        tracing::error!(
            "cannot open journal {}: {e}",
            cfg.journal_path.display()
        );
        e
    })?;

    // shutdown
    let (shutdown_tx, shutdown_rx) = tokio::sync::watch::channel(false);

    let mut daemon = Daemon::new(&cfg, journal);

    let mut daemon_task = tokio::spawn({
        let shutdown_tx = shutdown_tx.clone();
        async move { daemon.run(shutdown_rx, shutdown_tx).await }
    });

    tokio::select! {
        res = &mut daemon_task => {
            match res {
                Ok(Ok(())) => Ok(()),
                Ok(Err(e)) => Err(e),
                Err(join_err) => Err(Box::new(join_err) as AnyError),
            }
        }

        _ = tokio::signal::ctrl_c() => {
            tracing::info!("received Ctrl+C, shutting down");
            let _ = shutdown_tx.send(true);

            match daemon_task.await {
                Ok(Ok(())) => Ok(()),
                Ok(Err(e)) => Err(e),
                Err(join_err) => Err(Box::new(join_err)),
            }
        }
    }
}
