//! Working-copy creation for history databases.
//!
//! A running browser keeps its history database locked, so queries always
//! run against a snapshot copied into the output location first.

use std::path::Path;
use std::process::Command;

use anyhow::Result;
use tracing::{debug, warn};

/// Copy `src` to `dst`, overwriting any previous snapshot. When the plain
/// file copy fails (typically a lock held by the browser), fall back once
/// to the sqlite3 `.backup` command. Failure of the fallback itself is
/// logged but not surfaced; opening the snapshot reports it instead.
pub fn snapshot_db(src: &Path, dst: &Path) -> Result<()> {
    match std::fs::copy(src, dst) {
        Ok(bytes) => {
            debug!("copied {} bytes to {}", bytes, dst.display());
            Ok(())
        }
        Err(err) => {
            warn!("direct copy failed ({err}), retrying with sqlite3 .backup");
            let status = Command::new("sqlite3")
                .arg(src)
                .arg(format!(".backup {}", dst.display()))
                .status();
            match status {
                Ok(status) if status.success() => Ok(()),
                Ok(status) => {
                    warn!("sqlite3 .backup exited with {status}");
                    Ok(())
                }
                Err(err) => {
                    warn!("could not invoke sqlite3: {err}");
                    Ok(())
                }
            }
        }
    }
}
