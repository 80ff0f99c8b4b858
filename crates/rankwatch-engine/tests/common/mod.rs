// Shared in-memory fakes for run controller tests

#![allow(dead_code)]

use async_trait::async_trait;
use rankwatch_core::errors::{ExError, ExErrorKind, Result};
use rankwatch_core::ports::{EntityMetadata, ListSource, Notifier};
use std::collections::{HashMap, HashSet};
use std::sync::Mutex;
use std::time::Duration;

/// List source serving lists set by the test.
///
/// Display names are the uppercased key, so a fallback (the key itself)
/// is easy to spot.
#[derive(Default)]
pub struct FakeListSource {
    lists: Mutex<HashMap<String, Vec<String>>>,
    failing_lists: Mutex<HashSet<String>>,
    failing_keys: Mutex<HashSet<String>>,
    renamed: Mutex<HashMap<String, String>>,
    delays_ms: Mutex<HashMap<String, u64>>,
    metadata_calls: Mutex<Vec<String>>,
}

impl FakeListSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_list(&self, list_type: &str, keys: &[&str]) {
        self.lists.lock().unwrap().insert(
            list_type.to_string(),
            keys.iter().map(|k| k.to_string()).collect(),
        );
    }

    pub fn fail_list(&self, list_type: &str) {
        self.failing_lists
            .lock()
            .unwrap()
            .insert(list_type.to_string());
    }

    pub fn fail_metadata(&self, key: &str) {
        self.failing_keys.lock().unwrap().insert(key.to_string());
    }

    pub fn rename(&self, key: &str, name: &str) {
        self.renamed
            .lock()
            .unwrap()
            .insert(key.to_string(), name.to_string());
    }

    pub fn delay_metadata(&self, key: &str, ms: u64) {
        self.delays_ms.lock().unwrap().insert(key.to_string(), ms);
    }

    pub fn metadata_calls(&self) -> Vec<String> {
        self.metadata_calls.lock().unwrap().clone()
    }

    pub fn reset_calls(&self) {
        self.metadata_calls.lock().unwrap().clear();
    }
}

#[async_trait]
impl ListSource for FakeListSource {
    async fn ordered_keys(&self, list_type: &str) -> Result<Vec<String>> {
        if self.failing_lists.lock().unwrap().contains(list_type) {
            return Err(ExError::new(ExErrorKind::SourceUnavailable)
                .with_op("ordered_keys")
                .with_list_type(list_type)
                .with_message("HTTP 503"));
        }
        Ok(self
            .lists
            .lock()
            .unwrap()
            .get(list_type)
            .cloned()
            .unwrap_or_default())
    }

    async fn entity_metadata(&self, list_type: &str, key: &str) -> Result<EntityMetadata> {
        self.metadata_calls.lock().unwrap().push(key.to_string());

        let delay = self.delays_ms.lock().unwrap().get(key).copied();
        if let Some(ms) = delay {
            tokio::time::sleep(Duration::from_millis(ms)).await;
        }

        if self.failing_keys.lock().unwrap().contains(key) {
            return Err(ExError::new(ExErrorKind::MetadataUnavailable)
                .with_list_type(list_type)
                .with_entity_key(key));
        }
        let renamed = self.renamed.lock().unwrap().get(key).cloned();
        Ok(EntityMetadata::named(
            renamed.unwrap_or_else(|| key.to_uppercase()),
        ))
    }
}

/// Notifier that records every message, optionally failing
#[derive(Default)]
pub struct RecordingNotifier {
    sent: Mutex<Vec<(String, String)>>,
    failing: Mutex<bool>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_failing(&self, failing: bool) {
        *self.failing.lock().unwrap() = failing;
    }

    pub fn sent(&self) -> Vec<(String, String)> {
        self.sent.lock().unwrap().clone()
    }

    pub fn sent_for(&self, list_type: &str) -> Vec<String> {
        self.sent()
            .into_iter()
            .filter(|(lt, _)| lt == list_type)
            .map(|(_, text)| text)
            .collect()
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn send(&self, list_type: &str, text: &str) -> Result<()> {
        if *self.failing.lock().unwrap() {
            return Err(ExError::new(ExErrorKind::Delivery)
                .with_op("send")
                .with_list_type(list_type)
                .with_message("HTTP 500 Internal Server Error"));
        }
        self.sent
            .lock()
            .unwrap()
            .push((list_type.to_string(), text.to_string()));
        Ok(())
    }
}
