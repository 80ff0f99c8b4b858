//! Snapshot construction from a list source.
//!
//! Ranks always come from the order of `ordered_keys`; metadata lookups only
//! supply display names. Lookups may complete in any order, the buffered
//! stream hands results back in source order.

use chrono::{DateTime, Utc};
use futures::stream::{self, StreamExt};
use rankwatch_core::core_types::schema::EVENT_METADATA_FALLBACK;
use rankwatch_core::errors::{Result, SnapshotError};
use rankwatch_core::model::{single_line, Entity, Snapshot};
use rankwatch_core::ports::ListSource;
use std::collections::HashSet;
use std::str::FromStr;

/// Where display names come from for keys already seen last run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MetadataPolicy {
    /// Reuse names from the previous snapshot; fetch only new keys
    #[default]
    ReuseKnown,
    /// Fetch metadata for every key, picking up renames
    AlwaysFetch,
}

impl FromStr for MetadataPolicy {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "reuse-known" | "reuse_known" => Ok(MetadataPolicy::ReuseKnown),
            "always-fetch" | "always_fetch" => Ok(MetadataPolicy::AlwaysFetch),
            other => Err(format!(
                "unknown metadata policy {other:?} (expected reuse-known or always-fetch)"
            )),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CaptureOptions {
    pub metadata_policy: MetadataPolicy,
    /// Upper bound on in-flight metadata lookups (values below 1 count as 1)
    pub metadata_concurrency: usize,
}

impl Default for CaptureOptions {
    fn default() -> Self {
        Self {
            metadata_policy: MetadataPolicy::ReuseKnown,
            metadata_concurrency: 4,
        }
    }
}

/// A captured snapshot plus the keys whose name fell back to the key itself
#[derive(Debug, Clone)]
pub struct CapturedList {
    pub snapshot: Snapshot,
    pub fallback_keys: Vec<String>,
}

/// Fetch the current state of `list_type` and build a snapshot.
///
/// Per-key metadata failures never abort the capture: the key is used as
/// display name and a `metadata_fallback` warning is logged.
///
/// # Errors
///
/// - whatever `ordered_keys` returns (normally `SourceUnavailable`)
/// - `InvalidSnapshot` if the source lists a key twice or an empty key
pub async fn capture_snapshot(
    source: &dyn ListSource,
    list_type: &str,
    previous: Option<&Snapshot>,
    options: &CaptureOptions,
    captured_at: DateTime<Utc>,
) -> Result<CapturedList> {
    let keys = source.ordered_keys(list_type).await?;
    reject_duplicates(list_type, &keys)?;

    let policy = options.metadata_policy;
    let names: Vec<(String, Option<String>)> = stream::iter(keys)
        .map(|key| async move {
            let known = match policy {
                MetadataPolicy::ReuseKnown => previous
                    .and_then(|p| p.get(&key))
                    .filter(|e| !e.has_fallback_name())
                    .map(|e| e.display_name.clone()),
                MetadataPolicy::AlwaysFetch => None,
            };
            if known.is_some() {
                return (key, known);
            }
            let name = resolve_name(source, list_type, &key).await;
            (key, name)
        })
        .buffered(options.metadata_concurrency.max(1))
        .collect()
        .await;

    let fallback_keys: Vec<String> = names
        .iter()
        .filter(|(_, name)| name.is_none())
        .map(|(key, _)| key.clone())
        .collect();

    let entities = names
        .into_iter()
        .zip(1u32..)
        .map(|((key, name), rank)| match name {
            Some(name) => Entity::new(key, rank, name),
            None => Entity::with_key_as_name(key, rank),
        })
        .collect();
    let snapshot = Snapshot::from_ranked(list_type, captured_at, entities)?;

    Ok(CapturedList {
        snapshot,
        fallback_keys,
    })
}

async fn resolve_name(source: &dyn ListSource, list_type: &str, key: &str) -> Option<String> {
    match source.entity_metadata(list_type, key).await {
        Ok(meta) => {
            let name = meta
                .display_name
                .map(|n| single_line(&n))
                .filter(|n| !n.is_empty());
            if name.is_none() {
                tracing::warn!(
                    event = EVENT_METADATA_FALLBACK,
                    list_type,
                    entity_key = key,
                    "Metadata has no display name, using key"
                );
            }
            name
        }
        Err(err) => {
            tracing::warn!(
                event = EVENT_METADATA_FALLBACK,
                list_type,
                entity_key = key,
                err_code = err.code(),
                error = %err,
                "Metadata unavailable, using key"
            );
            None
        }
    }
}

fn reject_duplicates(list_type: &str, keys: &[String]) -> std::result::Result<(), SnapshotError> {
    let mut seen = HashSet::with_capacity(keys.len());
    match keys.iter().find(|k| !seen.insert(k.as_str())) {
        Some(dup) => Err(SnapshotError::DuplicateKey {
            list_type: list_type.to_string(),
            key: dup.clone(),
        }),
        None => Ok(()),
    }
}
