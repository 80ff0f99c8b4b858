//! Human-readable notification lines for a change set.
//!
//! Phrasing is fixed and deterministic so golden-output tests can compare
//! bytes. No localization.

use crate::diff::model::{ChangeRecord, ChangeSet, MoveDirection};
use crate::model::single_line;

/// Render one change record as a single line (no trailing newline).
///
/// Line breaks inside the display name are collapsed to spaces.
pub fn format_record(record: &ChangeRecord) -> String {
    let name = single_line(record.display_name());
    match record {
        ChangeRecord::Added { new_rank, .. } => {
            format!("{name} added to the list at #{new_rank}.")
        }
        ChangeRecord::Removed { old_rank, .. } => {
            format!("{name} removed from the list (was #{old_rank}).")
        }
        ChangeRecord::Moved {
            old_rank, new_rank, ..
        } => {
            let direction = record
                .direction()
                .as_ref()
                .map_or("down", MoveDirection::as_str);
            format!("{name} moved {direction} from #{old_rank} to #{new_rank}.")
        }
    }
}

/// Render every record of a change set, preserving its order.
pub fn format_changes(changes: &ChangeSet) -> Vec<String> {
    changes.iter().map(format_record).collect()
}

/// Notification body: the formatted lines joined with `\n`.
///
/// Empty for an empty change set.
pub fn render_notification(changes: &ChangeSet) -> String {
    format_changes(changes).join("\n")
}
