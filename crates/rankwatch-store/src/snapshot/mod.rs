//! Snapshot store adapters

pub mod document;
pub mod fs_store;
pub mod memory;

pub use document::{DocumentError, SnapshotDocument, FORMAT_VERSION};
pub use fs_store::FsSnapshotStore;
pub use memory::MemorySnapshotStore;
