// Author: Dustin Pilgrim
// License: MIT

use std::path::{Path, PathBuf};

use eyre::{Result, WrapErr};
use rune_cfg::RuneConfig;

pub const DEFAULT_IDLE_WAIT_SECS: i64 = 300;

/// Session configuration with defaults applied eagerly at load time; no
/// fallback chaining at use sites.
#[derive(Debug, Clone)]
pub struct Config {
    /// Append-only interval journal location.
    pub journal_path: PathBuf,

    /// Seconds of input inactivity before the tracker flips to idle.
    pub idle_wait_secs: i64,

    /// Raise a desktop notification with the total whenever a query arrives.
    pub notify_on_query: bool,

    /// Verbose diagnostics; the `--verbose` flag also enables this.
    pub debug: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            journal_path: default_journal_path(),
            idle_wait_secs: DEFAULT_IDLE_WAIT_SECS,
            notify_on_query: false,
            debug: false,
        }
    }
}

pub fn default_journal_path() -> PathBuf {
    match dirs::home_dir() {
        Some(mut path) => {
            path.push(".local/share/tally/journal.log");
            path
        }
        None => PathBuf::from("tally-journal.log"),
    }
}

/// Determine default config path
pub fn resolve_default_config_path() -> PathBuf {
    match dirs::home_dir() {
        Some(mut path) => {
            path.push(".config/tally/tally.rune");
            path
        }
        None => PathBuf::from("tally.rune"),
    }
}

/// Load configuration from `path`. A missing file yields pure defaults (no
/// config is required to run); an unreadable or malformed one is a startup
/// error.
pub fn load_from_path(path: &Path) -> Result<Config> {
    if !path.exists() {
        return Ok(Config::default());
    }

    let config = RuneConfig::from_file(path)
        .wrap_err_with(|| format!("failed to load config from {}", path.display()))?;

    let journal_path = config
        .get::<String>("tally.journal_path")
        .or_else(|_| config.get::<String>("tally.journal-path"))
        .map(PathBuf::from)
        .unwrap_or_else(|_| default_journal_path());

    let idle_wait_secs = config
        .get::<u64>("tally.idle_wait_seconds")
        .or_else(|_| config.get::<u64>("tally.idle-wait-seconds"))
        .map(|v| v as i64)
        .unwrap_or(DEFAULT_IDLE_WAIT_SECS);

    let notify_on_query = config
        .get::<bool>("tally.notify_on_query")
        .or_else(|_| config.get::<bool>("tally.notify-on-query"))
        .unwrap_or(false);

    let debug = config.get::<bool>("tally.debug").unwrap_or(false);

    Ok(Config {
        journal_path,
        idle_wait_secs,
        notify_on_query,
        debug,
    })
}
