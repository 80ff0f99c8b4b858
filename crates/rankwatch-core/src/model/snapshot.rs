//! Immutable ordered capture of one ranked list.
//!
//! ## Invariants
//!
//! - keys are non-empty and unique within the snapshot
//! - ranks are exactly `1..=len` in sequence order
//!
//! Both constructors enforce these; a `Snapshot` value that exists is valid.

use crate::errors::SnapshotError;
use crate::model::entity::{single_line, Entity};
use chrono::{DateTime, Utc};
use sha2::{Digest, Sha256};
use std::collections::{HashMap, HashSet};

/// Check that a list type is usable as a namespace and as a file stem.
///
/// Accepts ASCII letters, digits, `-` and `_`.
///
/// # Errors
///
/// Returns `SnapshotError::InvalidListType` for empty or unsafe names.
pub fn validate_list_type(list_type: &str) -> Result<(), SnapshotError> {
    let ok = !list_type.is_empty()
        && list_type
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
    if ok {
        Ok(())
    } else {
        Err(SnapshotError::InvalidListType {
            list_type: list_type.to_string(),
        })
    }
}

/// An ordered sequence of entities for one list type at one point in time
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    list_type: String,
    captured_at: DateTime<Utc>,
    entities: Vec<Entity>,
    index: HashMap<String, usize>,
}

impl Snapshot {
    /// Build a snapshot from `(key, display_name)` pairs in source order.
    ///
    /// Ranks are assigned from position (first entry is rank 1).
    ///
    /// # Errors
    ///
    /// - `InvalidListType` if `list_type` is not a valid name
    /// - `EmptyKey` / `DuplicateKey` if the key invariant is violated
    pub fn from_ordered<I, K, N>(
        list_type: impl Into<String>,
        captured_at: DateTime<Utc>,
        entries: I,
    ) -> Result<Self, SnapshotError>
    where
        I: IntoIterator<Item = (K, N)>,
        K: Into<String>,
        N: Into<String>,
    {
        let entities = entries
            .into_iter()
            .enumerate()
            .map(|(pos, (key, name))| Entity::new(key, pos as u32 + 1, name.into()))
            .collect();
        Self::from_ranked(list_type, captured_at, entities)
    }

    /// Build a snapshot from entities that already carry ranks.
    ///
    /// Used when rehydrating a persisted snapshot: the recorded ranks must
    /// agree with sequence position.
    ///
    /// # Errors
    ///
    /// - `InvalidListType`, `EmptyKey`, `DuplicateKey` as for `from_ordered`
    /// - `RankMismatch` if any rank differs from its 1-based position
    pub fn from_ranked(
        list_type: impl Into<String>,
        captured_at: DateTime<Utc>,
        mut entities: Vec<Entity>,
    ) -> Result<Self, SnapshotError> {
        let list_type = list_type.into();
        validate_list_type(&list_type)?;

        // Rehydrated documents bypass `Entity::new`
        for entity in &mut entities {
            entity.display_name = single_line(&entity.display_name);
        }

        let mut index = HashMap::with_capacity(entities.len());
        for (pos, entity) in entities.iter().enumerate() {
            if entity.key.is_empty() {
                return Err(SnapshotError::EmptyKey {
                    list_type,
                    position: pos + 1,
                });
            }
            let expected = pos as u32 + 1;
            if entity.rank != expected {
                return Err(SnapshotError::RankMismatch {
                    list_type,
                    key: entity.key.clone(),
                    expected,
                    found: entity.rank,
                });
            }
            if index.insert(entity.key.clone(), pos).is_some() {
                return Err(SnapshotError::DuplicateKey {
                    list_type,
                    key: entity.key.clone(),
                });
            }
        }

        Ok(Self {
            list_type,
            captured_at,
            entities,
            index,
        })
    }

    pub fn list_type(&self) -> &str {
        &self.list_type
    }

    pub fn captured_at(&self) -> DateTime<Utc> {
        self.captured_at
    }

    /// Entities in rank order
    pub fn entities(&self) -> &[Entity] {
        &self.entities
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// Keys in rank order
    pub fn keys(&self) -> impl Iterator<Item = &str> + '_ {
        self.entities.iter().map(|e| e.key.as_str())
    }

    pub fn contains(&self, key: &str) -> bool {
        self.index.contains_key(key)
    }

    pub fn get(&self, key: &str) -> Option<&Entity> {
        self.index.get(key).map(|&pos| &self.entities[pos])
    }

    pub fn rank_of(&self, key: &str) -> Option<u32> {
        self.get(key).map(|e| e.rank)
    }

    /// Set of keys, for membership tests against another snapshot
    pub fn key_set(&self) -> HashSet<&str> {
        self.keys().collect()
    }

    /// True when both snapshots list exactly the same keys in the same order.
    ///
    /// Display names and timestamps are ignored.
    pub fn same_key_order(&self, other: &Snapshot) -> bool {
        self.len() == other.len() && self.keys().eq(other.keys())
    }

    /// SHA-256 over the ordered key list (hex, 64 chars).
    ///
    /// Order-sensitive and independent of display names and `captured_at`;
    /// logged with every run so two runs can be compared at a glance.
    pub fn key_order_digest(&self) -> String {
        let keys: Vec<&str> = self.keys().collect();
        let canonical = serde_json::to_string(&keys).unwrap_or_default();
        let mut hasher = Sha256::new();
        hasher.update(canonical.as_bytes());
        hex::encode(hasher.finalize())
    }
}
