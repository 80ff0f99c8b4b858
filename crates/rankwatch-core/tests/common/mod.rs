use chrono::{DateTime, Utc};
use rankwatch_core::Snapshot;

/// Fixed capture time so snapshots built in tests compare equal
#[allow(dead_code)]
pub fn fixed_time() -> DateTime<Utc> {
    DateTime::parse_from_rfc3339("2026-01-01T00:00:00Z")
        .unwrap()
        .with_timezone(&Utc)
}

/// Snapshot of `main` whose display names are the keys in upper case
#[allow(dead_code)]
pub fn snap(keys: &[&str]) -> Snapshot {
    Snapshot::from_ordered(
        "main",
        fixed_time(),
        keys.iter().map(|k| (k.to_string(), k.to_uppercase())),
    )
    .unwrap()
}

/// Snapshot from owned keys (used by property tests)
#[allow(dead_code)]
pub fn snap_owned(keys: &[String]) -> Snapshot {
    Snapshot::from_ordered(
        "main",
        fixed_time(),
        keys.iter().map(|k| (k.clone(), k.clone())),
    )
    .unwrap()
}
