//! HTTP list source
//!
//! Layout served under `base_url`:
//! - `{base_url}/{list_type}/_list.json`: JSON array of keys, rank 1 first
//! - `{base_url}/{list_type}/{key}.json`: one entry; its label is `game`,
//!   else `name`

use crate::remote::{http_client, transport_cause};
use async_trait::async_trait;
use rankwatch_core::errors::{ExError, ExErrorKind, Result};
use rankwatch_core::model::single_line;
use rankwatch_core::ports::{EntityMetadata, ListSource};
use serde_json::Value;
use std::time::Duration;

/// Fields tried, in order, for an entry's display name
const NAME_FIELDS: [&str; 2] = ["game", "name"];

#[derive(Debug, Clone)]
pub struct HttpListSource {
    client: reqwest::Client,
    base_url: String,
}

impl HttpListSource {
    /// # Errors
    ///
    /// `Internal` if the HTTP client cannot be built.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        Ok(Self::with_client(http_client(timeout)?, base_url))
    }

    pub fn with_client(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { client, base_url }
    }

    pub fn list_url(&self, list_type: &str) -> String {
        format!("{}/{}/_list.json", self.base_url, list_type)
    }

    pub fn entry_url(&self, list_type: &str, key: &str) -> String {
        format!("{}/{}/{}.json", self.base_url, list_type, key)
    }

    /// GET a JSON document; the error is the low-level cause
    async fn get_json(&self, op: &str, url: &str) -> std::result::Result<Value, ExError> {
        tracing::debug!(url, "Fetching");

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| transport_cause(op, &e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ExError::new(ExErrorKind::Io)
                .with_op(op)
                .with_message(format!("HTTP {} when fetching {}", status, url)));
        }

        response.json::<Value>().await.map_err(|e| {
            ExError::new(ExErrorKind::Serialization)
                .with_op(op)
                .with_message(format!("Invalid JSON from {}: {}", url, e))
        })
    }
}

#[async_trait]
impl ListSource for HttpListSource {
    async fn ordered_keys(&self, list_type: &str) -> Result<Vec<String>> {
        let url = self.list_url(list_type);
        let unavailable = |cause: ExError| {
            ExError::new(ExErrorKind::SourceUnavailable)
                .with_op("ordered_keys")
                .with_list_type(list_type)
                .with_message(format!("Could not load {}", url))
                .with_source(cause)
        };

        let value = self
            .get_json("fetch_list", &url)
            .await
            .map_err(unavailable)?;
        parse_key_list(&value).map_err(|reason| {
            unavailable(
                ExError::new(ExErrorKind::Serialization)
                    .with_op("parse_list")
                    .with_message(reason),
            )
        })
    }

    async fn entity_metadata(&self, list_type: &str, key: &str) -> Result<EntityMetadata> {
        let url = self.entry_url(list_type, key);
        let value = self.get_json("fetch_entry", &url).await.map_err(|cause| {
            ExError::new(ExErrorKind::MetadataUnavailable)
                .with_op("entity_metadata")
                .with_list_type(list_type)
                .with_entity_key(key)
                .with_source(cause)
        })?;

        Ok(EntityMetadata {
            display_name: display_name_from_entry(&value),
        })
    }
}

/// Parse the `_list.json` body: an array of key strings.
///
/// # Errors
///
/// A reason string if the body is not an array of strings.
pub fn parse_key_list(value: &Value) -> std::result::Result<Vec<String>, String> {
    let items = value
        .as_array()
        .ok_or_else(|| format!("expected a JSON array of keys, got {}", kind_of(value)))?;

    items
        .iter()
        .enumerate()
        .map(|(pos, item)| {
            item.as_str().map(str::to_string).ok_or_else(|| {
                format!("entry #{} is {}, expected a string key", pos + 1, kind_of(item))
            })
        })
        .collect()
}

/// Display name of an entry document: first non-blank of `game`, `name`,
/// collapsed onto one line
pub fn display_name_from_entry(value: &Value) -> Option<String> {
    NAME_FIELDS
        .iter()
        .filter_map(|field| value.get(field).and_then(Value::as_str))
        .map(single_line)
        .find(|name| !name.is_empty())
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_urls() {
        let source = HttpListSource::with_client(reqwest::Client::new(), "https://example.test/data/");
        assert_eq!(
            source.list_url("main"),
            "https://example.test/data/main/_list.json"
        );
        assert_eq!(
            source.entry_url("bonus", "kenos"),
            "https://example.test/data/bonus/kenos.json"
        );
    }

    #[test]
    fn test_parse_key_list() {
        let keys = parse_key_list(&json!(["acu", "tidal-wave"])).unwrap();
        assert_eq!(keys, vec!["acu", "tidal-wave"]);
        assert!(parse_key_list(&json!([])).unwrap().is_empty());
    }

    #[test]
    fn test_parse_key_list_rejects_non_strings() {
        let err = parse_key_list(&json!(["acu", 7])).unwrap_err();
        assert!(err.contains("entry #2"));
        assert!(parse_key_list(&json!({"list": []})).is_err());
    }

    #[test]
    fn test_display_name_prefers_game() {
        let entry = json!({"game": "Tidal Wave", "name": "tidal", "id": 1});
        assert_eq!(display_name_from_entry(&entry).as_deref(), Some("Tidal Wave"));
    }

    #[test]
    fn test_display_name_falls_back_to_name() {
        assert_eq!(
            display_name_from_entry(&json!({"game": "  ", "name": "Acheron"})).as_deref(),
            Some("Acheron")
        );
        assert_eq!(display_name_from_entry(&json!({"id": 3})), None);
        assert_eq!(display_name_from_entry(&json!({"game": 12})), None);
    }

    #[test]
    fn test_display_name_is_collapsed_to_one_line() {
        let entry = json!({"game": "Evil\n@everyone pinged", "name": "evil"});
        assert_eq!(
            display_name_from_entry(&entry).as_deref(),
            Some("Evil @everyone pinged")
        );
        let blank = json!({"game": "\r\n\t", "name": "Backup"});
        assert_eq!(display_name_from_entry(&blank).as_deref(), Some("Backup"));
    }
}
