//! CLI integration tests
//!
//! Run the built binary in a scratch directory with a scrubbed environment.

use std::fs;
use std::process::{Command, Output};
use tempfile::TempDir;

const SCRUBBED_ENV: [&str; 8] = [
    "RANKWATCH_WEBHOOK",
    "WEBHOOK",
    "RANKWATCH_BASE_URL",
    "RANKWATCH_LIST_TYPES",
    "RANKWATCH_STATE_DIR",
    "RANKWATCH_TIMEOUT_SECS",
    "RANKWATCH_LOG_FORMAT",
    "RUST_LOG",
];

fn rankwatch(dir: &TempDir, args: &[&str]) -> Output {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_rankwatch"));
    cmd.current_dir(dir.path()).args(args);
    for name in SCRUBBED_ENV {
        cmd.env_remove(name);
    }
    cmd.output().unwrap()
}

#[test]
fn test_missing_webhook_exits_with_config_status() {
    let dir = TempDir::new().unwrap();

    let output = rankwatch(&dir, &[]);

    assert_eq!(output.status.code(), Some(2));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("No webhook configured"), "stderr: {}", stderr);
}

#[test]
fn test_webhook_from_dotenv_file() {
    let dir = TempDir::new().unwrap();
    fs::write(
        dir.path().join(".env"),
        "RANKWATCH_WEBHOOK=not-a-url\n",
    )
    .unwrap();

    // The .env value is picked up (and rejected as not https)
    let output = rankwatch(&dir, &[]);

    assert_eq!(output.status.code(), Some(2));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("webhook"), "stderr: {}", stderr);
    assert!(!stderr.contains("not-a-url"));
}

#[test]
fn test_invalid_config_file_exits_with_config_status() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("rankwatch.toml"), "list_types = 3\n").unwrap();

    let output = rankwatch(&dir, &["--config", "rankwatch.toml", "--dry-run"]);

    assert_eq!(output.status.code(), Some(2));
}

#[test]
fn test_unreachable_source_still_exits_zero() {
    let dir = TempDir::new().unwrap();

    // Nothing listens on the discard port; every list type is skipped
    let output = rankwatch(
        &dir,
        &[
            "--dry-run",
            "--base-url",
            "http://127.0.0.1:9/data",
            "--timeout-secs",
            "2",
            "--log-format",
            "json",
        ],
    );

    assert_eq!(output.status.code(), Some(0));
    assert!(output.stdout.is_empty());
    assert!(!dir.path().join(".rankwatch").exists());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("ERR_SOURCE_UNAVAILABLE"), "stderr: {}", stderr);
}
