// Author: Dustin Pilgrim
// License: MIT

use std::io;
use std::os::unix::net::{UnixListener, UnixStream};
use std::path::PathBuf;

// ---------------- single-instance lock ----------------

fn runtime_dir() -> Result<PathBuf, String> {
    std::env::var_os("XDG_RUNTIME_DIR")
        .map(PathBuf::from)
        .ok_or_else(|| "XDG_RUNTIME_DIR is not set (cannot create instance lock)".to_string())
}

fn lock_path() -> Result<PathBuf, String> {
    Ok(runtime_dir()?.join("tally").join("tally.lock"))
}

/// Two daemons appending to one journal would interleave intervals, so the
/// lock is mandatory, not advisory.
pub fn acquire_single_instance_lock() -> Result<UnixListener, String> {
    let path = lock_path()?;
    if let Some(parent) = path.parent() {
        let _ = std::fs::create_dir_all(parent);
    }

    match UnixListener::bind(&path) {
        Ok(l) => Ok(l),
        Err(e) if e.kind() == io::ErrorKind::AddrInUse => {
            match UnixStream::connect(&path) {
                Ok(_) => Err(format!(
                    "tally is already running (another instance holds {})",
                    path.display()
                )),
                Err(_) => {
                    let _ = std::fs::remove_file(&path);
                    UnixListener::bind(&path).map_err(|e| {
                        format!("failed to bind instance lock {}: {e}", path.display())
                    })
                }
            }
        }
        Err(e) => Err(format!(
            "failed to bind instance lock {}: {e}",
            path.display()
        )),
    }
}
