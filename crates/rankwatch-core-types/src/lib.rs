//! Core types shared across rankwatch crates
//!
//! - **Correlation**: `RunId` stamped on every watcher run
//! - **Sensitive data**: `Sensitive<T>` marker for automatic redaction
//! - **Schema constants**: canonical field keys and event names for logging

pub mod correlation;
pub mod schema;
pub mod sensitive;

pub use correlation::RunId;
pub use sensitive::Sensitive;
