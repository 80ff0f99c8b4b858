//! Sensitive configuration values
//!
//! Webhook URLs embed their own credentials, so they are carried in
//! `Sensitive<T>` from the moment they are read and never reach a log line.

use serde::{Deserialize, Deserializer};
use std::fmt;

const REDACTED: &str = "***REDACTED***";

/// Wrapper that redacts its value in Debug and Display
///
/// # Example
///
/// ```
/// use rankwatch_core_types::Sensitive;
///
/// let webhook = Sensitive::new("https://discord.com/api/webhooks/1/secret");
/// assert_eq!(format!("{webhook}"), "***REDACTED***");
/// assert!(webhook.expose().ends_with("secret"));
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct Sensitive<T>(T);

impl<T> Sensitive<T> {
    pub fn new(value: T) -> Self {
        Self(value)
    }

    /// Expose the underlying value. Only call this at the point of use.
    pub fn expose(&self) -> &T {
        &self.0
    }

    pub fn into_inner(self) -> T {
        self.0
    }
}

impl<T> fmt::Debug for Sensitive<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(REDACTED)
    }
}

impl<T> fmt::Display for Sensitive<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(REDACTED)
    }
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for Sensitive<T> {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        T::deserialize(deserializer).map(Sensitive)
    }
}
