//! Notifier that prints to stdout, for dry runs

use async_trait::async_trait;
use rankwatch_core::errors::{ExError, ExErrorKind, Result};
use rankwatch_core::ports::Notifier;
use std::io::Write;

#[derive(Debug, Default, Clone, Copy)]
pub struct StdoutNotifier;

impl StdoutNotifier {
    pub fn new() -> Self {
        Self
    }
}

/// Text block printed for one notification
pub fn render_block(list_type: &str, text: &str) -> String {
    format!("== {} ==\n{}\n", list_type, text)
}

#[async_trait]
impl Notifier for StdoutNotifier {
    async fn send(&self, list_type: &str, text: &str) -> Result<()> {
        let mut out = std::io::stdout().lock();
        out.write_all(render_block(list_type, text).as_bytes())
            .and_then(|()| out.flush())
            .map_err(|e| {
                ExError::new(ExErrorKind::Delivery)
                    .with_op("print_notification")
                    .with_list_type(list_type)
                    .with_message(e.to_string())
            })
    }
}
