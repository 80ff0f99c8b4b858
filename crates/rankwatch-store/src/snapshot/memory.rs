//! In-memory snapshot store
//!
//! Used by dry runs (nothing touches disk) and by tests, which can seed a
//! corrupt entry or make saves fail.

use crate::errors::Result;
use rankwatch_core::errors::{ExError, ExErrorKind};
use rankwatch_core::model::Snapshot;
use rankwatch_core::ports::{SnapshotStore, StoredSnapshot};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard};

#[derive(Debug, Default)]
pub struct MemorySnapshotStore {
    entries: Mutex<HashMap<String, StoredSnapshot>>,
    fail_saves: AtomicBool,
    saves: AtomicUsize,
}

impl MemorySnapshotStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a previously stored snapshot
    pub fn with_snapshot(self, snapshot: Snapshot) -> Self {
        self.lock().insert(
            snapshot.list_type().to_string(),
            StoredSnapshot::Present(snapshot),
        );
        self
    }

    /// Seed an unreadable entry for `list_type`
    pub fn with_corrupt(self, list_type: &str, reason: &str) -> Self {
        self.lock().insert(
            list_type.to_string(),
            StoredSnapshot::Corrupt {
                reason: reason.to_string(),
            },
        );
        self
    }

    /// Copy the stored state of `list_types` out of another store.
    ///
    /// Dry runs read the real state directory through this and then write
    /// only to memory. Entries that fail to load are left absent.
    pub fn seeded_from<S, I, L>(other: &S, list_types: I) -> Self
    where
        S: SnapshotStore + ?Sized,
        I: IntoIterator<Item = L>,
        L: AsRef<str>,
    {
        let store = Self::new();
        {
            let mut entries = store.lock();
            for list_type in list_types {
                let list_type = list_type.as_ref();
                match other.load(list_type) {
                    Ok(StoredSnapshot::Absent) => {}
                    Ok(stored) => {
                        entries.insert(list_type.to_string(), stored);
                    }
                    Err(err) => {
                        tracing::warn!(list_type, error = %err, "Could not seed dry-run state");
                    }
                }
            }
        }
        store
    }

    /// Make every subsequent `save` fail with a persistence error
    pub fn set_fail_saves(&self, fail: bool) {
        self.fail_saves.store(fail, Ordering::SeqCst);
    }

    /// Snapshot currently held for `list_type`, if any
    pub fn snapshot(&self, list_type: &str) -> Option<Snapshot> {
        match self.lock().get(list_type) {
            Some(StoredSnapshot::Present(snapshot)) => Some(snapshot.clone()),
            _ => None,
        }
    }

    /// Number of successful saves
    pub fn save_count(&self) -> usize {
        self.saves.load(Ordering::SeqCst)
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, StoredSnapshot>> {
        // Entries are replaced whole, so a poisoned map is still consistent
        self.entries
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl SnapshotStore for MemorySnapshotStore {
    fn load(&self, list_type: &str) -> Result<StoredSnapshot> {
        Ok(self
            .lock()
            .get(list_type)
            .cloned()
            .unwrap_or(StoredSnapshot::Absent))
    }

    fn save(&self, list_type: &str, snapshot: &Snapshot) -> Result<()> {
        if self.fail_saves.load(Ordering::SeqCst) {
            return Err(ExError::new(ExErrorKind::Persistence)
                .with_op("save_snapshot")
                .with_list_type(list_type)
                .with_message("save disabled on in-memory store"));
        }
        self.lock().insert(
            list_type.to_string(),
            StoredSnapshot::Present(snapshot.clone()),
        );
        self.saves.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}
