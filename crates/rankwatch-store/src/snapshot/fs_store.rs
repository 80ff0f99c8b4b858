//! Filesystem-backed snapshot store
//!
//! One JSON document per list type at `<root>/<list_type>.json`, replaced
//! atomically on every save.

use crate::atomic::atomic_write;
use crate::errors::{io_error, persistence_error, serialization_error, Result};
use crate::snapshot::document::{decode, encode};
use chrono::{DateTime, Utc};
use rankwatch_core::errors::{ExError, ExErrorKind};
use rankwatch_core::model::{validate_list_type, Snapshot};
use rankwatch_core::ports::{SnapshotStore, StoredSnapshot};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// Prefix of the cache files the earlier watcher script kept in its
/// working directory (`.cache_main.json`)
pub const LEGACY_CACHE_PREFIX: &str = ".cache_";

/// Snapshot store rooted at a state directory
#[derive(Debug, Clone)]
pub struct FsSnapshotStore {
    root: PathBuf,
}

impl FsSnapshotStore {
    /// Create a store at the given root directory (created lazily on save)
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path of the document for `list_type`
    ///
    /// # Errors
    ///
    /// `InvalidInput` if the list type is not a safe file stem.
    pub fn snapshot_path(&self, list_type: &str) -> Result<PathBuf> {
        validate_list_type(list_type)?;
        Ok(self.root.join(format!("{list_type}.json")))
    }

    /// Candidate legacy cache paths: inside the state directory, then next
    /// to it (the earlier script wrote into its working directory, which
    /// is the parent of the default `.rankwatch` state directory).
    fn legacy_paths(&self, list_type: &str) -> Vec<PathBuf> {
        let name = format!("{LEGACY_CACHE_PREFIX}{list_type}.json");
        let mut paths = vec![self.root.join(&name)];
        if let Some(parent) = self.root.parent() {
            let parent = if parent.as_os_str().is_empty() {
                Path::new(".")
            } else {
                parent
            };
            paths.push(parent.join(&name));
        }
        paths
    }

    /// Read a file, mapping "not found" to `None`
    fn read_optional(path: &Path) -> Result<Option<(Vec<u8>, DateTime<Utc>)>> {
        match fs::read(path) {
            Ok(bytes) => {
                let modified = fs::metadata(path)
                    .and_then(|m| m.modified())
                    .map(DateTime::<Utc>::from)
                    .unwrap_or_else(|_| Utc::now());
                Ok(Some((bytes, modified)))
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(io_error("read_snapshot", e)),
        }
    }
}

impl SnapshotStore for FsSnapshotStore {
    fn load(&self, list_type: &str) -> Result<StoredSnapshot> {
        let path = self.snapshot_path(list_type)?;

        let mut found = Self::read_optional(&path)?.map(|found| (path, found));
        if found.is_none() {
            for legacy in self.legacy_paths(list_type) {
                if let Some(bytes) = Self::read_optional(&legacy)? {
                    found = Some((legacy, bytes));
                    break;
                }
            }
        }

        let Some((path, (bytes, modified))) = found else {
            tracing::debug!(list_type, root = %self.root.display(), "No stored snapshot");
            return Ok(StoredSnapshot::Absent);
        };

        match decode(&bytes, list_type, modified) {
            Ok(snapshot) => {
                tracing::debug!(
                    list_type,
                    path = %path.display(),
                    entry_count = snapshot.len(),
                    "Loaded stored snapshot"
                );
                Ok(StoredSnapshot::Present(snapshot))
            }
            Err(err) => Ok(StoredSnapshot::Corrupt {
                reason: format!("{}: {}", path.display(), err),
            }),
        }
    }

    fn save(&self, list_type: &str, snapshot: &Snapshot) -> Result<()> {
        let path = self.snapshot_path(list_type)?;
        if snapshot.list_type() != list_type {
            return Err(ExError::new(ExErrorKind::InvalidInput)
                .with_op("save_snapshot")
                .with_list_type(list_type)
                .with_message(format!(
                    "Snapshot of list {} cannot be stored as {}",
                    snapshot.list_type(),
                    list_type
                )));
        }

        let bytes = encode(snapshot).map_err(|e| serialization_error(list_type, e))?;
        atomic_write(&path, &bytes).map_err(|e| persistence_error(list_type, e))?;

        tracing::debug!(
            list_type,
            path = %path.display(),
            entry_count = snapshot.len(),
            size_bytes = bytes.len(),
            "Persisted snapshot"
        );
        Ok(())
    }
}
