//! Logging initialization

use std::str::FromStr;
use std::sync::Once;
use tracing_subscriber::{util::SubscriberInitExt, EnvFilter};

/// Logging profile
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Profile {
    /// Human-readable output at debug level
    Development,
    /// JSON lines at info level, for schedulers that ship logs
    Production,
    /// Nothing installed here; tests use `init_test_capture()`
    Test,
}

impl FromStr for Profile {
    type Err = String;

    /// Accepts the `log_format` config values: `pretty`, `json`, `test`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pretty" | "development" | "dev" => Ok(Profile::Development),
            "json" | "production" | "prod" => Ok(Profile::Production),
            "test" => Ok(Profile::Test),
            other => Err(format!(
                "unknown log format {other:?} (expected pretty or json)"
            )),
        }
    }
}

static INIT_ONCE: Once = Once::new();

/// Initialize the global subscriber once; later calls are no-ops.
///
/// `RUST_LOG` overrides the profile's default filter.
pub fn init(profile: Profile) {
    INIT_ONCE.call_once(|| match profile {
        Profile::Development => {
            tracing_subscriber::fmt()
                .with_env_filter(
                    EnvFilter::try_from_default_env()
                        .unwrap_or_else(|_| EnvFilter::new("rankwatch=debug")),
                )
                .with_writer(std::io::stderr)
                .finish()
                .try_init()
                .ok();
        }
        Profile::Production => {
            tracing_subscriber::fmt()
                .json()
                .with_env_filter(
                    EnvFilter::try_from_default_env()
                        .unwrap_or_else(|_| EnvFilter::new("rankwatch=info")),
                )
                .with_writer(std::io::stderr)
                .finish()
                .try_init()
                .ok();
        }
        Profile::Test => {}
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_idempotent() {
        init(Profile::Test);
        init(Profile::Test);
    }

    #[test]
    fn test_profile_parsing() {
        assert_eq!("json".parse::<Profile>(), Ok(Profile::Production));
        assert_eq!("Pretty".parse::<Profile>(), Ok(Profile::Development));
        assert!("xml".parse::<Profile>().is_err());
    }
}
