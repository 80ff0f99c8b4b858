//! Concrete adapters for the list source and notifier ports

pub mod discord;
pub mod http_source;
pub mod stdout;

pub use discord::DiscordWebhookNotifier;
pub use http_source::HttpListSource;
pub use stdout::StdoutNotifier;

use rankwatch_core::errors::{ExError, ExErrorKind};
use std::time::Duration;

/// Build the shared HTTP client with a per-request timeout
///
/// # Errors
///
/// `Internal` if the TLS backend cannot be initialised.
pub fn http_client(timeout: Duration) -> Result<reqwest::Client, ExError> {
    reqwest::Client::builder()
        .timeout(timeout)
        .user_agent(concat!("rankwatch/", env!("CARGO_PKG_VERSION")))
        .build()
        .map_err(|e| {
            ExError::new(ExErrorKind::Internal)
                .with_op("http_client")
                .with_message(format!("Failed to build HTTP client: {}", e))
        })
}

/// Classify a transport error: timeouts keep their own kind as the cause
pub(crate) fn transport_cause(op: &str, err: &reqwest::Error) -> ExError {
    let kind = if err.is_timeout() {
        ExErrorKind::Timeout
    } else {
        ExErrorKind::Io
    };
    ExError::new(kind).with_op(op).with_message(err.to_string())
}
