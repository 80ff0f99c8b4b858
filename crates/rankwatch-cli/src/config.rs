//! Run configuration
//!
//! Layers, lowest precedence first:
//! 1. built-in defaults
//! 2. TOML file given with `--config`
//! 3. environment (a `.env` file is loaded into it by `main`)
//! 4. command-line flags

use crate::cli::Cli;
use rankwatch_core::core_types::Sensitive;
use rankwatch_core::errors::{ExError, ExErrorKind};
use rankwatch_core::logging_facility::Profile;
use rankwatch_core::model::validate_list_type;
use rankwatch_engine::{CaptureOptions, MetadataPolicy};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

pub const DEFAULT_BASE_URL: &str = "https://pmml.pages.dev/data";
pub const DEFAULT_LIST_TYPES: [&str; 2] = ["main", "bonus"];
pub const DEFAULT_STATE_DIR: &str = ".rankwatch";
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_METADATA_CONCURRENCY: usize = 4;

pub const ENV_WEBHOOK: &str = "RANKWATCH_WEBHOOK";
/// Name used by the earlier watcher script
pub const ENV_WEBHOOK_LEGACY: &str = "WEBHOOK";
pub const ENV_BASE_URL: &str = "RANKWATCH_BASE_URL";
pub const ENV_LIST_TYPES: &str = "RANKWATCH_LIST_TYPES";
pub const ENV_STATE_DIR: &str = "RANKWATCH_STATE_DIR";
pub const ENV_TIMEOUT_SECS: &str = "RANKWATCH_TIMEOUT_SECS";
pub const ENV_LOG_FORMAT: &str = "RANKWATCH_LOG_FORMAT";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Invalid config file {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("Invalid value for {name}: {reason}")]
    InvalidValue { name: &'static str, reason: String },

    #[error(
        "No webhook configured: set RANKWATCH_WEBHOOK, `webhook` in the config file or \
         --webhook (or use --dry-run)"
    )]
    MissingWebhook,

    #[error("No list types configured")]
    NoListTypes,
}

impl From<ConfigError> for ExError {
    fn from(err: ConfigError) -> Self {
        ExError::new(ExErrorKind::MissingConfig)
            .with_op("load_config")
            .with_message(err.to_string())
    }
}

/// Contents of the `--config` file; every key is optional
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    pub webhook: Option<Sensitive<String>>,
    pub base_url: Option<String>,
    pub list_types: Option<Vec<String>>,
    pub state_dir: Option<PathBuf>,
    pub request_timeout_secs: Option<u64>,
    pub metadata_concurrency: Option<usize>,
    pub metadata_policy: Option<String>,
    pub log_format: Option<String>,
}

impl FileConfig {
    /// # Errors
    ///
    /// `Read` or `Parse` if the file cannot be used.
    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }
}

/// Fully resolved configuration for one run
#[derive(Debug, Clone)]
pub struct RunConfig {
    /// Always `Some` unless `dry_run`
    pub webhook: Option<Sensitive<String>>,
    pub base_url: String,
    pub list_types: Vec<String>,
    pub state_dir: PathBuf,
    pub request_timeout: Duration,
    pub capture: CaptureOptions,
    pub log_profile: Profile,
    pub dry_run: bool,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            webhook: None,
            base_url: DEFAULT_BASE_URL.to_string(),
            list_types: DEFAULT_LIST_TYPES.iter().map(|s| s.to_string()).collect(),
            state_dir: PathBuf::from(DEFAULT_STATE_DIR),
            request_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            capture: CaptureOptions {
                metadata_policy: MetadataPolicy::ReuseKnown,
                metadata_concurrency: DEFAULT_METADATA_CONCURRENCY,
            },
            log_profile: Profile::Development,
            dry_run: false,
        }
    }
}

impl RunConfig {
    /// Resolve the configuration from all layers.
    ///
    /// `env` looks up one environment variable; `main` passes the process
    /// environment, tests pass a map.
    ///
    /// # Errors
    ///
    /// Any [`ConfigError`]; the process exits with status 2.
    pub fn load<F>(cli: &Cli, env: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = RunConfig::default();

        if let Some(path) = &cli.config {
            config.apply_file(FileConfig::from_path(path)?)?;
        }
        config.apply_env(&env)?;
        config.apply_cli(cli)?;
        config.validate()?;
        Ok(config)
    }

    fn apply_file(&mut self, file: FileConfig) -> Result<(), ConfigError> {
        if let Some(webhook) = file.webhook {
            self.webhook = Some(webhook);
        }
        if let Some(base_url) = file.base_url {
            self.base_url = base_url;
        }
        if let Some(list_types) = file.list_types {
            self.list_types = list_types;
        }
        if let Some(state_dir) = file.state_dir {
            self.state_dir = state_dir;
        }
        if let Some(secs) = file.request_timeout_secs {
            self.request_timeout = Duration::from_secs(secs);
        }
        if let Some(n) = file.metadata_concurrency {
            self.capture.metadata_concurrency = n;
        }
        if let Some(policy) = &file.metadata_policy {
            self.capture.metadata_policy = parse_policy(policy)?;
        }
        if let Some(format) = &file.log_format {
            self.log_profile = parse_profile(format)?;
        }
        Ok(())
    }

    fn apply_env<F>(&mut self, env: &F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| env(name).filter(|v| !v.trim().is_empty());

        if let Some(webhook) = get(ENV_WEBHOOK).or_else(|| get(ENV_WEBHOOK_LEGACY)) {
            self.webhook = Some(Sensitive::new(webhook));
        }
        if let Some(base_url) = get(ENV_BASE_URL) {
            self.base_url = base_url;
        }
        if let Some(list_types) = get(ENV_LIST_TYPES) {
            self.list_types = split_list(&list_types);
        }
        if let Some(state_dir) = get(ENV_STATE_DIR) {
            self.state_dir = PathBuf::from(state_dir);
        }
        if let Some(secs) = get(ENV_TIMEOUT_SECS) {
            let secs = secs.trim().parse::<u64>().map_err(|e| ConfigError::InvalidValue {
                name: ENV_TIMEOUT_SECS,
                reason: e.to_string(),
            })?;
            self.request_timeout = Duration::from_secs(secs);
        }
        if let Some(format) = get(ENV_LOG_FORMAT) {
            self.log_profile = parse_profile(&format)?;
        }
        Ok(())
    }

    fn apply_cli(&mut self, cli: &Cli) -> Result<(), ConfigError> {
        if let Some(webhook) = &cli.webhook {
            self.webhook = Some(Sensitive::new(webhook.clone()));
        }
        if let Some(base_url) = &cli.base_url {
            self.base_url = base_url.clone();
        }
        if let Some(list_types) = &cli.list_types {
            self.list_types = list_types
                .iter()
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect();
        }
        if let Some(state_dir) = &cli.state_dir {
            self.state_dir = state_dir.clone();
        }
        if let Some(secs) = cli.timeout_secs {
            self.request_timeout = Duration::from_secs(secs);
        }
        if let Some(n) = cli.metadata_concurrency {
            self.capture.metadata_concurrency = n;
        }
        if let Some(policy) = &cli.metadata_policy {
            self.capture.metadata_policy = parse_policy(policy)?;
        }
        if let Some(format) = &cli.log_format {
            self.log_profile = parse_profile(format)?;
        }
        self.dry_run = cli.dry_run;
        Ok(())
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.list_types.is_empty() {
            return Err(ConfigError::NoListTypes);
        }
        for list_type in &self.list_types {
            validate_list_type(list_type).map_err(|e| ConfigError::InvalidValue {
                name: "list_types",
                reason: e.to_string(),
            })?;
        }
        if self.request_timeout.is_zero() {
            return Err(ConfigError::InvalidValue {
                name: "request_timeout_secs",
                reason: "must be at least 1".to_string(),
            });
        }
        if self.capture.metadata_concurrency == 0 {
            return Err(ConfigError::InvalidValue {
                name: "metadata_concurrency",
                reason: "must be at least 1".to_string(),
            });
        }
        if !self.base_url.starts_with("http://") && !self.base_url.starts_with("https://") {
            return Err(ConfigError::InvalidValue {
                name: "base_url",
                reason: format!("{:?} is not an http(s) URL", self.base_url),
            });
        }
        match &self.webhook {
            None if !self.dry_run => Err(ConfigError::MissingWebhook),
            Some(url) if !self.dry_run && !url.expose().starts_with("https://") => {
                Err(ConfigError::InvalidValue {
                    name: "webhook",
                    reason: "must be an https URL".to_string(),
                })
            }
            _ => Ok(()),
        }
    }
}

fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

fn parse_policy(raw: &str) -> Result<MetadataPolicy, ConfigError> {
    raw.parse().map_err(|reason| ConfigError::InvalidValue {
        name: "metadata_policy",
        reason,
    })
}

fn parse_profile(raw: &str) -> Result<Profile, ConfigError> {
    raw.parse().map_err(|reason| ConfigError::InvalidValue {
        name: "log_format",
        reason,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tempfile::TempDir;

    fn env_of(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    const HOOK: &str = "https://discord.test/api/webhooks/1/token";

    #[test]
    fn test_defaults_with_webhook_from_env() {
        let config = RunConfig::load(&Cli::default(), env_of(&[(ENV_WEBHOOK, HOOK)])).unwrap();

        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.list_types, vec!["main", "bonus"]);
        assert_eq!(config.state_dir, PathBuf::from(".rankwatch"));
        assert_eq!(config.request_timeout, Duration::from_secs(10));
        assert_eq!(config.capture, CaptureOptions::default());
        assert_eq!(config.webhook.as_ref().map(|w| w.expose().as_str()), Some(HOOK));
    }

    #[test]
    fn test_legacy_webhook_variable() {
        let config = RunConfig::load(&Cli::default(), env_of(&[(ENV_WEBHOOK_LEGACY, HOOK)])).unwrap();
        assert!(config.webhook.is_some());
    }

    #[test]
    fn test_missing_webhook_is_an_error() {
        let err = RunConfig::load(&Cli::default(), env_of(&[])).unwrap_err();
        assert!(matches!(err, ConfigError::MissingWebhook));
        assert_eq!(ExError::from(err).code(), "ERR_MISSING_CONFIG");
    }

    #[test]
    fn test_dry_run_needs_no_webhook() {
        let cli = Cli {
            dry_run: true,
            ..Cli::default()
        };
        let config = RunConfig::load(&cli, env_of(&[])).unwrap();
        assert!(config.dry_run);
        assert!(config.webhook.is_none());
    }

    #[test]
    fn test_precedence_file_env_cli() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("rankwatch.toml");
        std::fs::write(
            &path,
            r#"
            webhook = "https://discord.test/api/webhooks/from-file"
            base_url = "https://file.test/data"
            list_types = ["main"]
            state_dir = "/var/lib/rankwatch"
            request_timeout_secs = 30
            metadata_policy = "always-fetch"
            "#,
        )
        .unwrap();

        let cli = Cli {
            config: Some(path),
            timeout_secs: Some(5),
            ..Cli::default()
        };
        let env = env_of(&[
            (ENV_BASE_URL, "https://env.test/data"),
            (ENV_TIMEOUT_SECS, "20"),
        ]);
        let config = RunConfig::load(&cli, env).unwrap();

        assert_eq!(config.base_url, "https://env.test/data");
        assert_eq!(config.request_timeout, Duration::from_secs(5));
        assert_eq!(config.list_types, vec!["main"]);
        assert_eq!(config.state_dir, PathBuf::from("/var/lib/rankwatch"));
        assert_eq!(config.capture.metadata_policy, MetadataPolicy::AlwaysFetch);
        assert!(config.webhook.is_some());
    }

    #[test]
    fn test_env_list_types_are_split() {
        let env = env_of(&[(ENV_WEBHOOK, HOOK), (ENV_LIST_TYPES, " main , extended,, ")]);
        let config = RunConfig::load(&Cli::default(), env).unwrap();
        assert_eq!(config.list_types, vec!["main", "extended"]);
    }

    #[test]
    fn test_invalid_values_rejected() {
        let bad_timeout = env_of(&[(ENV_WEBHOOK, HOOK), (ENV_TIMEOUT_SECS, "soon")]);
        assert!(matches!(
            RunConfig::load(&Cli::default(), bad_timeout),
            Err(ConfigError::InvalidValue { name: ENV_TIMEOUT_SECS, .. })
        ));

        let bad_list = env_of(&[(ENV_WEBHOOK, HOOK), (ENV_LIST_TYPES, "main,../etc")]);
        assert!(matches!(
            RunConfig::load(&Cli::default(), bad_list),
            Err(ConfigError::InvalidValue { name: "list_types", .. })
        ));

        let plain_http = env_of(&[(ENV_WEBHOOK, "http://discord.test/hook")]);
        assert!(RunConfig::load(&Cli::default(), plain_http).is_err());
    }

    #[test]
    fn test_unknown_file_keys_rejected() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("bad.toml");
        std::fs::write(&path, "webhok = \"typo\"\n").unwrap();

        let cli = Cli {
            config: Some(path),
            dry_run: true,
            ..Cli::default()
        };
        assert!(matches!(
            RunConfig::load(&cli, env_of(&[])),
            Err(ConfigError::Parse { .. })
        ));
    }

    #[test]
    fn test_webhook_never_in_debug_output() {
        let config = RunConfig::load(&Cli::default(), env_of(&[(ENV_WEBHOOK, HOOK)])).unwrap();
        assert!(!format!("{:?}", config).contains("token"));
    }
}
