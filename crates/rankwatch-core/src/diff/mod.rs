//! Ordered-list diff engine.
//!
//! Compares two snapshots of the same list type and classifies every key as
//! added, removed, moved or unchanged, then renders the change set as
//! notification lines.
//!
//! ## Entry point
//!
//! ```
//! use chrono::Utc;
//! use rankwatch_core::diff::{compute_diff, render_notification};
//! use rankwatch_core::Snapshot;
//!
//! let prev = Snapshot::from_ordered("main", Utc::now(), [("a", "A"), ("b", "B"), ("c", "C")]).unwrap();
//! let cur = Snapshot::from_ordered("main", Utc::now(), [("a", "A"), ("c", "C"), ("b", "B")]).unwrap();
//!
//! let changes = compute_diff(&prev, &cur);
//! assert_eq!(render_notification(&changes), "B moved down from #2 to #3.");
//! ```
//!
//! ## Guarantees
//!
//! - **Determinism**: identical inputs produce an identical change set.
//! - **Partition**: every key of either snapshot lands in exactly one of
//!   added, removed, moved or unchanged.
//! - **Shift absorption**: rank changes caused only by insertions or removals
//!   elsewhere are never reported as moves.

pub mod engine;
pub mod formatter;
pub mod model;

pub use engine::{compute_diff, longest_common_subsequence};
pub use formatter::{format_changes, format_record, render_notification};
pub use model::{ChangeRecord, ChangeSet, ChangeSummary, MoveDirection};
