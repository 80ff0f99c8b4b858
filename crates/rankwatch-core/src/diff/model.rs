//! Diff output types.

use serde::{Deserialize, Serialize};

/// A single reportable change between two snapshots.
///
/// Unchanged entities are never represented as records.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ChangeRecord {
    /// Key present only in the current snapshot
    Added {
        key: String,
        display_name: String,
        new_rank: u32,
    },
    /// Key present only in the previous snapshot
    Removed {
        key: String,
        display_name: String,
        old_rank: u32,
    },
    /// Key present in both and genuinely reordered relative to its neighbours.
    /// `old_rank != new_rank` always holds.
    Moved {
        key: String,
        display_name: String,
        old_rank: u32,
        new_rank: u32,
    },
}

/// Direction of a move, from the list's point of view (#1 is the top)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveDirection {
    Up,
    Down,
}

impl MoveDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            MoveDirection::Up => "up",
            MoveDirection::Down => "down",
        }
    }
}

impl ChangeRecord {
    pub fn key(&self) -> &str {
        match self {
            ChangeRecord::Added { key, .. }
            | ChangeRecord::Removed { key, .. }
            | ChangeRecord::Moved { key, .. } => key,
        }
    }

    pub fn display_name(&self) -> &str {
        match self {
            ChangeRecord::Added { display_name, .. }
            | ChangeRecord::Removed { display_name, .. }
            | ChangeRecord::Moved { display_name, .. } => display_name,
        }
    }

    /// `Some` only for `Moved`; a smaller new rank is a move up.
    pub fn direction(&self) -> Option<MoveDirection> {
        match self {
            ChangeRecord::Moved {
                old_rank, new_rank, ..
            } => Some(if new_rank < old_rank {
                MoveDirection::Up
            } else {
                MoveDirection::Down
            }),
            _ => None,
        }
    }
}

/// Per-category counts of a diff
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeSummary {
    pub added: usize,
    pub removed: usize,
    pub moved: usize,
    pub unchanged: usize,
}

impl ChangeSummary {
    /// Number of records that will be reported
    pub fn reported(&self) -> usize {
        self.added + self.removed + self.moved
    }
}

/// The classified result of diffing two snapshots.
///
/// `records` is ordered: all `Removed` (ascending old rank), then all
/// `Added` (ascending new rank), then all `Moved` (ascending new rank).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeSet {
    pub records: Vec<ChangeRecord>,
    /// Keys present in both snapshots that are not reported, in current order
    pub unchanged_keys: Vec<String>,
    pub summary: ChangeSummary,
}

impl ChangeSet {
    /// True when there is nothing to notify about
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ChangeRecord> {
        self.records.iter()
    }
}

impl<'a> IntoIterator for &'a ChangeSet {
    type Item = &'a ChangeRecord;
    type IntoIter = std::slice::Iter<'a, ChangeRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}
