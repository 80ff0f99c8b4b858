//! Boundaries to the outside world.
//!
//! The run controller only talks to these traits. Concrete adapters live in
//! `rankwatch-store` (snapshot persistence) and `rankwatch-engine::remote`
//! (HTTP list source, webhook notifier); tests use in-memory fakes.

use crate::errors::Result;
use crate::model::Snapshot;
use async_trait::async_trait;

/// Per-entity metadata fetched from the list source
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EntityMetadata {
    /// `None` when the source has no usable label; callers fall back to the key
    pub display_name: Option<String>,
}

impl EntityMetadata {
    pub fn named(display_name: impl Into<String>) -> Self {
        Self {
            display_name: Some(display_name.into()),
        }
    }
}

/// Remote source of a ranked list
#[async_trait]
pub trait ListSource: Send + Sync {
    /// Ordered keys of the list, rank 1 first.
    ///
    /// # Errors
    ///
    /// `SourceUnavailable` on network or parse failure.
    async fn ordered_keys(&self, list_type: &str) -> Result<Vec<String>>;

    /// Metadata for one entry. Fails independently of other keys.
    ///
    /// # Errors
    ///
    /// `MetadataUnavailable` when this key's metadata cannot be fetched.
    async fn entity_metadata(&self, list_type: &str, key: &str) -> Result<EntityMetadata>;
}

/// Result of reading the previous snapshot.
///
/// `Corrupt` is kept distinct from `Absent`: both lead to a baseline-only
/// run, but a corrupt store must never look like a first run in the logs.
#[derive(Debug, Clone, PartialEq)]
pub enum StoredSnapshot {
    Absent,
    Present(Snapshot),
    Corrupt { reason: String },
}

/// Persistence of the last observed snapshot per list type
pub trait SnapshotStore {
    /// # Errors
    ///
    /// `Io` when the store cannot be read at all (permissions, device errors).
    fn load(&self, list_type: &str) -> Result<StoredSnapshot>;

    /// Replace the stored snapshot atomically: readers see either the old
    /// or the new snapshot, never a partial write.
    ///
    /// # Errors
    ///
    /// `Persistence` / `Io` / `Serialization` when the write fails.
    fn save(&self, list_type: &str, snapshot: &Snapshot) -> Result<()>;
}

/// Delivery of formatted change text to an external channel
#[async_trait]
pub trait Notifier: Send + Sync {
    /// # Errors
    ///
    /// `Delivery` (or `Timeout`) when the message was not accepted.
    async fn send(&self, list_type: &str, text: &str) -> Result<()>;
}
