//! Correlation identifiers for watcher runs
//!
//! A run processes every configured list type once; all log events emitted
//! during that run carry the same `RunId` through the run span.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Identifier for one invocation of the run controller
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RunId(String);

impl RunId {
    /// Generate a new time-ordered RunId (UUIDv7)
    pub fn new() -> Self {
        Self(Uuid::now_v7().to_string())
    }

    /// Get the string representation
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Wrap an existing identifier (e.g. one supplied by a scheduler)
    pub fn from_string(s: String) -> Self {
        Self(s)
    }
}

impl Default for RunId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for RunId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}
