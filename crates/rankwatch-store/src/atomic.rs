//! Atomic write primitives
//!
//! Uses temp→fsync→rename so readers see either the old or the new file

use crate::errors::{io_error, Result};
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Temp path next to `target`: `main.json` → `main.json.tmp`.
///
/// Same directory as the target, so the final rename never crosses a
/// filesystem boundary.
pub fn temp_path_for(target_path: &Path) -> PathBuf {
    let mut name = target_path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(".tmp");
    target_path.with_file_name(name)
}

/// Atomically replace `target_path` with `content`
pub fn atomic_write(target_path: &Path, content: &[u8]) -> Result<()> {
    if let Some(parent) = target_path.parent() {
        fs::create_dir_all(parent).map_err(|e| io_error("create_state_dir", e))?;
    }

    let temp_path = temp_path_for(target_path);
    if let Err(err) = write_synced(&temp_path, content) {
        fs::remove_file(&temp_path).ok();
        return Err(err);
    }

    fs::rename(&temp_path, target_path).map_err(|e| {
        fs::remove_file(&temp_path).ok();
        io_error("rename_snapshot_temp", e)
    })?;

    Ok(())
}

fn write_synced(path: &Path, content: &[u8]) -> Result<()> {
    let mut file = File::create(path).map_err(|e| io_error("create_snapshot_temp", e))?;
    file.write_all(content)
        .map_err(|e| io_error("write_snapshot_temp", e))?;
    file.sync_all()
        .map_err(|e| io_error("sync_snapshot_temp", e))?;
    Ok(())
}
