//! Discord webhook notifier
//!
//! Posts the change text as embed descriptions. Discord caps a description
//! at 4096 characters, so long change lists are split on line boundaries
//! and sent as consecutive messages.

use crate::remote::{http_client, transport_cause};
use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use rankwatch_core::core_types::Sensitive;
use rankwatch_core::errors::{ExError, ExErrorKind, Result};
use rankwatch_core::ports::Notifier;
use serde::Serialize;
use std::time::Duration;

/// Embed sidebar colour
pub const EMBED_COLOR: u32 = 0x2b2d31;

/// Maximum characters in one embed description
pub const MAX_DESCRIPTION_CHARS: usize = 4096;

#[derive(Debug, Serialize)]
pub struct WebhookPayload {
    pub embeds: Vec<Embed>,
}

#[derive(Debug, Serialize)]
pub struct Embed {
    pub title: String,
    pub description: String,
    pub color: u32,
    pub timestamp: String,
}

/// Build the payloads for one notification, one per description chunk
pub fn build_payloads(list_type: &str, text: &str, at: DateTime<Utc>) -> Vec<WebhookPayload> {
    let timestamp = at.to_rfc3339_opts(SecondsFormat::Millis, true);
    let chunks = split_description(text, MAX_DESCRIPTION_CHARS);
    let total = chunks.len();

    chunks
        .into_iter()
        .enumerate()
        .map(|(i, description)| {
            let mut title = format!("Ranked list changes — {}", list_type);
            if total > 1 {
                title.push_str(&format!(" ({}/{})", i + 1, total));
            }
            WebhookPayload {
                embeds: vec![Embed {
                    title,
                    description,
                    color: EMBED_COLOR,
                    timestamp: timestamp.clone(),
                }],
            }
        })
        .collect()
}

/// Split `text` into chunks of at most `max_chars` characters, breaking
/// between lines. A single line longer than `max_chars` is cut.
pub fn split_description(text: &str, max_chars: usize) -> Vec<String> {
    let mut chunks = Vec::new();
    let mut current = String::new();
    let mut current_len = 0;

    for line in text.lines() {
        let line: String = line.chars().take(max_chars).collect();
        let line_len = line.chars().count();
        let needed = if current.is_empty() { line_len } else { current_len + 1 + line_len };

        if needed > max_chars && !current.is_empty() {
            chunks.push(std::mem::take(&mut current));
            current_len = 0;
        }
        if !current.is_empty() {
            current.push('\n');
            current_len += 1;
        }
        current.push_str(&line);
        current_len += line_len;
    }
    if !current.is_empty() || chunks.is_empty() {
        chunks.push(current);
    }
    chunks
}

pub struct DiscordWebhookNotifier {
    client: reqwest::Client,
    webhook_url: Sensitive<String>,
}

impl DiscordWebhookNotifier {
    /// # Errors
    ///
    /// `Internal` if the HTTP client cannot be built.
    pub fn new(webhook_url: Sensitive<String>, timeout: Duration) -> Result<Self> {
        Ok(Self::with_client(http_client(timeout)?, webhook_url))
    }

    pub fn with_client(client: reqwest::Client, webhook_url: Sensitive<String>) -> Self {
        Self {
            client,
            webhook_url,
        }
    }

    async fn post(&self, list_type: &str, payload: &WebhookPayload) -> Result<()> {
        let delivery_error = || {
            ExError::new(ExErrorKind::Delivery)
                .with_op("send_webhook")
                .with_list_type(list_type)
        };

        let response = self
            .client
            .post(self.webhook_url.expose().as_str())
            .json(payload)
            .send()
            .await
            .map_err(|e| {
                // reqwest errors embed the URL, which carries the webhook token
                transport_cause("send_webhook", &e.without_url())
            })
            .map_err(|cause| {
                delivery_error()
                    .with_message("Webhook request failed")
                    .with_source(cause)
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(delivery_error().with_message(format!(
                "Webhook rejected the message: HTTP {} {}",
                status,
                body.trim()
            )));
        }
        Ok(())
    }
}

impl std::fmt::Debug for DiscordWebhookNotifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DiscordWebhookNotifier")
            .field("webhook_url", &self.webhook_url)
            .finish()
    }
}

#[async_trait]
impl Notifier for DiscordWebhookNotifier {
    async fn send(&self, list_type: &str, text: &str) -> Result<()> {
        let payloads = build_payloads(list_type, text, Utc::now());
        for payload in &payloads {
            self.post(list_type, payload).await?;
        }
        tracing::debug!(list_type, messages = payloads.len(), "Webhook accepted notification");
        Ok(())
    }
}
