use serde::{Deserialize, Serialize};

/// One ranked item of a list at snapshot time
///
/// Identity is `key` alone. `rank` and `display_name` are display
/// attributes: a renamed entry is still the same entity, and a changed rank
/// is only a move if the diff engine says so.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entity {
    /// Stable identifier from the list source (case-sensitive, opaque)
    pub key: String,

    /// 1-based position in the snapshot
    pub rank: u32,

    /// Human-readable label on a single line; falls back to `key` when
    /// metadata is missing
    pub display_name: String,

    /// Set when `display_name` is the key standing in for missing metadata
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub fallback_name: bool,
}

impl Entity {
    pub fn new(key: impl Into<String>, rank: u32, display_name: impl AsRef<str>) -> Self {
        Self {
            key: key.into(),
            rank,
            display_name: single_line(display_name.as_ref()),
            fallback_name: false,
        }
    }

    /// Build an entity whose display name degraded to its key
    pub fn with_key_as_name(key: impl Into<String>, rank: u32) -> Self {
        let key = key.into();
        Self {
            display_name: single_line(&key),
            key,
            rank,
            fallback_name: true,
        }
    }

    /// True when no metadata-provided name was available
    pub fn has_fallback_name(&self) -> bool {
        self.fallback_name
    }
}

/// Collapse control characters and whitespace runs into single spaces.
///
/// Display names end up inside one-line notification records.
pub fn single_line(name: &str) -> String {
    name.split(|c: char| c.is_whitespace() || c.is_control())
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}
