//! rankwatch core - ranked-list snapshots and the ordered-list diff engine
//!
//! This crate holds everything that is pure and deterministic:
//! - Entity and Snapshot models with their invariants
//! - The LCS-based diff engine that separates genuine re-ranks from shifts
//! - The change formatter producing notification lines
//! - Port traits for the list source, snapshot store and notifier
//! - The error and logging facilities shared by the other crates

pub mod diff;
pub mod errors;
pub mod logging_facility;
pub mod model;
pub mod ports;

pub use rankwatch_core_types as core_types;

// Re-export commonly used types
pub use diff::{compute_diff, render_notification, ChangeRecord, ChangeSet};
pub use errors::{ExError, ExErrorKind, Result, SnapshotError};
pub use model::{Entity, Snapshot};
pub use ports::{EntityMetadata, ListSource, Notifier, SnapshotStore, StoredSnapshot};
