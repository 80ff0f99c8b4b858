//! On-disk snapshot document.
//!
//! ```json
//! {
//!   "format_version": 1,
//!   "list_type": "main",
//!   "captured_at": "2026-03-01T12:00:00Z",
//!   "entries": [{ "key": "acu", "rank": 1, "display_name": "Acu" }]
//! }
//! ```
//!
//! Caches written by the earlier watcher script (a bare array of
//! `{"path", "game"}` objects in rank order) are still readable, so an
//! existing deployment does not lose its history on upgrade.

use chrono::{DateTime, Utc};
use rankwatch_core::errors::SnapshotError;
use rankwatch_core::model::{single_line, Entity, Snapshot};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Current document format version
pub const FORMAT_VERSION: u32 = 1;

/// Why a stored document could not be turned back into a snapshot
#[derive(Error, Debug)]
pub enum DocumentError {
    #[error("Malformed snapshot document: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("Unsupported format version {found} (expected {})", FORMAT_VERSION)]
    UnsupportedVersion { found: u32 },

    #[error("Document belongs to list {found}, loaded as {expected}")]
    ListTypeMismatch { expected: String, found: String },

    #[error("Stored entries violate the snapshot invariant: {0}")]
    Invalid(#[from] SnapshotError),
}

/// Versioned persisted form of a [`Snapshot`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SnapshotDocument {
    pub format_version: u32,
    pub list_type: String,
    pub captured_at: DateTime<Utc>,
    pub entries: Vec<Entity>,
}

#[derive(Deserialize)]
struct LegacyEntry {
    path: String,
    #[serde(default)]
    game: Option<String>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum AnyDocument {
    Current(SnapshotDocument),
    Legacy(Vec<LegacyEntry>),
}

impl SnapshotDocument {
    pub fn from_snapshot(snapshot: &Snapshot) -> Self {
        Self {
            format_version: FORMAT_VERSION,
            list_type: snapshot.list_type().to_string(),
            captured_at: snapshot.captured_at(),
            entries: snapshot.entities().to_vec(),
        }
    }

    /// Validate and rebuild the snapshot for `expected_list_type`.
    ///
    /// # Errors
    ///
    /// `UnsupportedVersion`, `ListTypeMismatch` or `Invalid` when the
    /// document cannot be trusted as the previous state of this list.
    pub fn into_snapshot(self, expected_list_type: &str) -> Result<Snapshot, DocumentError> {
        if self.format_version != FORMAT_VERSION {
            return Err(DocumentError::UnsupportedVersion {
                found: self.format_version,
            });
        }
        if self.list_type != expected_list_type {
            return Err(DocumentError::ListTypeMismatch {
                expected: expected_list_type.to_string(),
                found: self.list_type,
            });
        }
        Ok(Snapshot::from_ranked(
            self.list_type,
            self.captured_at,
            self.entries,
        )?)
    }
}

/// Serialize a snapshot as a pretty-printed document
///
/// # Errors
///
/// Returns the underlying `serde_json` error.
pub fn encode(snapshot: &Snapshot) -> Result<Vec<u8>, serde_json::Error> {
    serde_json::to_vec_pretty(&SnapshotDocument::from_snapshot(snapshot))
}

/// Parse stored bytes into a snapshot of `list_type`.
///
/// `legacy_captured_at` stamps legacy caches, which carry no timestamp.
///
/// # Errors
///
/// Any [`DocumentError`]; callers treat all of them as a corrupt store.
pub fn decode(
    bytes: &[u8],
    list_type: &str,
    legacy_captured_at: DateTime<Utc>,
) -> Result<Snapshot, DocumentError> {
    match serde_json::from_slice::<AnyDocument>(bytes) {
        Ok(AnyDocument::Current(doc)) => doc.into_snapshot(list_type),
        Ok(AnyDocument::Legacy(entries)) => {
            let entities = entries
                .into_iter()
                .zip(1u32..)
                .map(|(e, rank)| match e.game.filter(|g| !single_line(g).is_empty()) {
                    Some(name) => Entity::new(e.path, rank, name),
                    None => Entity::with_key_as_name(e.path, rank),
                })
                .collect();
            Ok(Snapshot::from_ranked(list_type, legacy_captured_at, entities)?)
        }
        // Untagged errors say nothing useful; re-parse for the real cause
        Err(_) => match serde_json::from_slice::<SnapshotDocument>(bytes) {
            Ok(doc) => doc.into_snapshot(list_type),
            Err(err) => Err(DocumentError::Malformed(err)),
        },
    }
}
