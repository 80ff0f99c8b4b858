//! Snapshot diff computation engine.
//!
//! The entry point is [`compute_diff`]. Classification runs in three steps:
//!
//! 1. **Set partition** by key into added / removed / common.
//! 2. **Alignment** of the common keys in previous order against the common
//!    keys in current order with a longest common subsequence.
//! 3. **Move classification**: common keys outside the LCS moved; keys on
//!    the LCS kept their place relative to each other and are unchanged even
//!    if their absolute rank shifted.
//!
//! ## LCS tie-break
//!
//! When several alignments of equal length exist, reconstruction prefers to
//! consume the previous ordering first (`dp[i+1][j] >= dp[i][j+1]` advances
//! `i`). In `[A,B,C] -> [C,A,B]` this keeps `A,B` on the LCS and reports
//! `C` as moved up, rather than reporting both `A` and `B` as moved down.

use crate::diff::model::{ChangeRecord, ChangeSet, ChangeSummary};
use crate::model::Snapshot;
use std::collections::HashSet;

/// Compute the longest common subsequence of two sequences.
///
/// Classic O(n·m) dynamic programme over suffixes: `dp[i][j]` is the LCS
/// length of `a[i..]` and `b[j..]`. Returns the aligned index pairs
/// `(i, j)` with `a[i] == b[j]`, in increasing order of both indices.
///
/// On a mismatch with equal sub-results the walk advances along `a`.
pub fn longest_common_subsequence<T: PartialEq>(a: &[T], b: &[T]) -> Vec<(usize, usize)> {
    let n = a.len();
    let m = b.len();
    let width = m + 1;

    // Flat (n+1) x (m+1) table; row n and column m stay zero.
    let mut dp = vec![0u32; (n + 1) * width];
    for i in (0..n).rev() {
        for j in (0..m).rev() {
            dp[i * width + j] = if a[i] == b[j] {
                dp[(i + 1) * width + j + 1] + 1
            } else {
                dp[(i + 1) * width + j].max(dp[i * width + j + 1])
            };
        }
    }

    let mut pairs = Vec::with_capacity(dp[0] as usize);
    let (mut i, mut j) = (0, 0);
    while i < n && j < m {
        if a[i] == b[j] {
            pairs.push((i, j));
            i += 1;
            j += 1;
        } else if dp[(i + 1) * width + j] >= dp[i * width + j + 1] {
            i += 1;
        } else {
            j += 1;
        }
    }
    pairs
}

/// Compute the classified change set between two snapshots of one list type.
///
/// Matching list types is the caller's responsibility; the engine compares
/// keys only. Keys are matched exactly (case-sensitive).
///
/// Records are ordered Removed, then Added, then Moved; within each
/// category by ascending rank in the snapshot that rank refers to.
pub fn compute_diff(previous: &Snapshot, current: &Snapshot) -> ChangeSet {
    // Fast path: same keys in the same order
    if previous.same_key_order(current) {
        return ChangeSet {
            records: Vec::new(),
            unchanged_keys: current.keys().map(str::to_string).collect(),
            summary: ChangeSummary {
                unchanged: current.len(),
                ..ChangeSummary::default()
            },
        };
    }

    let prev_keys: HashSet<&str> = previous.key_set();
    let cur_keys: HashSet<&str> = current.key_set();

    // Step 1: set partition
    let removed: Vec<ChangeRecord> = previous
        .entities()
        .iter()
        .filter(|e| !cur_keys.contains(e.key.as_str()))
        .map(|e| ChangeRecord::Removed {
            key: e.key.clone(),
            display_name: e.display_name.clone(),
            old_rank: e.rank,
        })
        .collect();

    let added: Vec<ChangeRecord> = current
        .entities()
        .iter()
        .filter(|e| !prev_keys.contains(e.key.as_str()))
        .map(|e| ChangeRecord::Added {
            key: e.key.clone(),
            display_name: e.display_name.clone(),
            new_rank: e.rank,
        })
        .collect();

    // Step 2: align common keys
    let prev_common: Vec<&str> = previous
        .keys()
        .filter(|k| cur_keys.contains(k))
        .collect();
    let cur_common: Vec<&str> = current.keys().filter(|k| prev_keys.contains(k)).collect();

    let mut on_lcs = vec![false; cur_common.len()];
    for (_, j) in longest_common_subsequence(&prev_common, &cur_common) {
        on_lcs[j] = true;
    }

    // Step 3: classify common keys in current order
    let mut moved = Vec::new();
    let mut unchanged_keys = Vec::new();
    for (j, key) in cur_common.iter().enumerate() {
        let (Some(old_rank), Some(entity)) = (previous.rank_of(key), current.get(key)) else {
            continue;
        };
        // Off the LCS but back on the same absolute rank: nothing to report.
        if on_lcs[j] || old_rank == entity.rank {
            unchanged_keys.push(entity.key.clone());
        } else {
            moved.push(ChangeRecord::Moved {
                key: entity.key.clone(),
                display_name: entity.display_name.clone(),
                old_rank,
                new_rank: entity.rank,
            });
        }
    }

    let summary = ChangeSummary {
        added: added.len(),
        removed: removed.len(),
        moved: moved.len(),
        unchanged: unchanged_keys.len(),
    };

    let mut records = removed;
    records.extend(added);
    records.extend(moved);

    ChangeSet {
        records,
        unchanged_keys,
        summary,
    }
}
