//! rankwatch store - persistence of the last observed snapshot per list type
//!
//! Provides:
//! - Atomic replace of on-disk files (temp file, fsync, rename)
//! - The versioned JSON snapshot document
//! - `FsSnapshotStore`, one document per list type under a state directory
//! - `MemorySnapshotStore` for tests and dry runs

pub mod atomic;
pub mod errors;
pub mod snapshot;

// Re-export key types
pub use errors::Result;
pub use snapshot::{FsSnapshotStore, MemorySnapshotStore, SnapshotDocument};
