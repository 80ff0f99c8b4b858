//! Scenario tests for the ordered-list diff engine.
//!
//! All tests are pure: snapshots in, change set out.

mod common;

use common::snap;
use rankwatch_core::diff::{compute_diff, ChangeRecord};

fn moved(key: &str, old_rank: u32, new_rank: u32) -> ChangeRecord {
    ChangeRecord::Moved {
        key: key.to_string(),
        display_name: key.to_uppercase(),
        old_rank,
        new_rank,
    }
}

// Single entry moved to the back: only it is reported
#[test]
fn test_moved_to_back_reports_only_mover() {
    let diff = compute_diff(&snap(&["a", "b", "c", "d"]), &snap(&["a", "c", "d", "b"]));

    assert_eq!(diff.records, vec![moved("b", 2, 4)]);
    assert_eq!(diff.unchanged_keys, vec!["a", "c", "d"]);
}

// Insertion shifts later entries without moving them
#[test]
fn test_insertion_is_absorbed() {
    let diff = compute_diff(&snap(&["a", "b", "c"]), &snap(&["a", "x", "b", "c"]));

    assert_eq!(
        diff.records,
        vec![ChangeRecord::Added {
            key: "x".to_string(),
            display_name: "X".to_string(),
            new_rank: 2,
        }]
    );
    assert_eq!(diff.summary.moved, 0);
    assert_eq!(diff.summary.unchanged, 3);
}

// Removal shifts later entries up without moving them
#[test]
fn test_removal_is_absorbed() {
    let diff = compute_diff(&snap(&["a", "b", "c"]), &snap(&["b", "c"]));

    assert_eq!(
        diff.records,
        vec![ChangeRecord::Removed {
            key: "a".to_string(),
            display_name: "A".to_string(),
            old_rank: 1,
        }]
    );
    assert_eq!(diff.unchanged_keys, vec!["b", "c"]);
}

#[test]
fn test_identical_snapshots_yield_empty_diff() {
    let s = snap(&["a", "b", "c"]);
    assert!(compute_diff(&s, &s.clone()).is_empty());
}

// Renaming an entry is not a change
#[test]
fn test_display_name_change_is_not_a_move() {
    let prev = snap(&["a", "b"]);
    let cur = rankwatch_core::Snapshot::from_ordered(
        "main",
        common::fixed_time(),
        [("a", "Renamed A"), ("b", "B")],
    )
    .unwrap();
    assert!(compute_diff(&prev, &cur).is_empty());
}

// Added/removed names come from the snapshot that holds them
#[test]
fn test_record_names_come_from_owning_snapshot() {
    let prev = rankwatch_core::Snapshot::from_ordered(
        "main",
        common::fixed_time(),
        [("old", "Old Level"), ("keep", "Keep")],
    )
    .unwrap();
    let cur = rankwatch_core::Snapshot::from_ordered(
        "main",
        common::fixed_time(),
        [("keep", "Keep"), ("new", "New Level")],
    )
    .unwrap();

    let diff = compute_diff(&prev, &cur);
    let names: Vec<&str> = diff.iter().map(|r| r.display_name()).collect();
    assert_eq!(names, vec!["Old Level", "New Level"]);
}

#[test]
fn test_mixed_changes_are_ordered_by_category_then_rank() {
    // prev: a b c d e ; cur: e f a c g d  (b removed; f, g added; e moved up)
    let diff = compute_diff(
        &snap(&["a", "b", "c", "d", "e"]),
        &snap(&["e", "f", "a", "c", "g", "d"]),
    );

    let keys: Vec<&str> = diff.iter().map(|r| r.key()).collect();
    assert_eq!(keys, vec!["b", "f", "g", "e"]);
    assert_eq!(diff.records[3], moved("e", 5, 1));
    assert_eq!(diff.summary.added, 2);
    assert_eq!(diff.summary.removed, 1);
    assert_eq!(diff.summary.moved, 1);
    assert_eq!(diff.summary.unchanged, 3);
}

#[test]
fn test_full_reversal_moves_all_but_anchor_and_middle() {
    // [a,b,c,d,e] -> [e,d,c,b,a]: LCS keeps one key; c stays at #3
    let diff = compute_diff(&snap(&["a", "b", "c", "d", "e"]), &snap(&["e", "d", "c", "b", "a"]));
    assert_eq!(diff.summary.moved, 3);
    assert_eq!(diff.summary.unchanged, 2);
    assert!(diff.unchanged_keys.contains(&"c".to_string()));
    for record in &diff {
        if let ChangeRecord::Moved {
            old_rank, new_rank, ..
        } = record
        {
            assert_ne!(old_rank, new_rank);
        }
    }
}

#[test]
fn test_complete_replacement() {
    let diff = compute_diff(&snap(&["a", "b"]), &snap(&["c", "d"]));
    assert_eq!(diff.summary.removed, 2);
    assert_eq!(diff.summary.added, 2);
    assert_eq!(diff.summary.moved, 0);
    assert!(diff.unchanged_keys.is_empty());
}

#[test]
fn test_from_empty_and_to_empty() {
    let grown = compute_diff(&snap(&[]), &snap(&["a", "b"]));
    assert_eq!(grown.summary.added, 2);

    let emptied = compute_diff(&snap(&["a", "b"]), &snap(&[]));
    assert_eq!(emptied.summary.removed, 2);
}

#[test]
fn test_keys_match_case_sensitively() {
    let diff = compute_diff(&snap(&["acu"]), &snap(&["Acu"]));
    assert_eq!(diff.summary.removed, 1);
    assert_eq!(diff.summary.added, 1);
}
