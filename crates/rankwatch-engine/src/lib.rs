//! rankwatch engine - orchestration of a watcher run
//!
//! Coordinates the list source, the diff engine, the notifier and the
//! snapshot store for every configured list type, and provides the concrete
//! remote adapters (HTTP list source, Discord webhook, stdout).

pub mod commands;
pub mod remote;

pub use commands::capture::{capture_snapshot, CaptureOptions, CapturedList, MetadataPolicy};
pub use commands::run::{run_once, ListRunOutcome, ListRunStatus, RunOptions, RunReport};
