//! rankwatch CLI
//!
//! One invocation = one pass over every configured list type. Meant to be
//! run from cron or a CI schedule.

use clap::Parser;
use rankwatch_core::errors::ExError;
use rankwatch_core::logging_facility;
use rankwatch_core::ports::{Notifier, SnapshotStore};
use rankwatch_engine::remote::{DiscordWebhookNotifier, HttpListSource, StdoutNotifier};
use rankwatch_engine::{run_once, ListRunOutcome, RunOptions, RunReport};
use rankwatch_store::{FsSnapshotStore, MemorySnapshotStore};
use std::process::ExitCode;

mod cli;
mod config;

use cli::Cli;
use config::RunConfig;

/// Exit status for missing or invalid configuration
const EXIT_CONFIG: u8 = 2;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let config = match RunConfig::load(&cli, |name| std::env::var(name).ok()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::from(EXIT_CONFIG);
        }
    };
    logging_facility::init(config.log_profile);

    match execute(&config).await {
        Ok(report) => {
            log_report(&report);
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::error!(err_code = e.code(), error = %e, "Run could not start");
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

async fn execute(config: &RunConfig) -> Result<RunReport, ExError> {
    let source = HttpListSource::new(config.base_url.clone(), config.request_timeout)?;
    let fs_store = FsSnapshotStore::new(config.state_dir.clone());

    let (store, notifier): (Box<dyn SnapshotStore>, Box<dyn Notifier>) = if config.dry_run {
        (
            Box::new(MemorySnapshotStore::seeded_from(&fs_store, &config.list_types)),
            Box::new(StdoutNotifier::new()),
        )
    } else {
        let webhook = config
            .webhook
            .clone()
            .ok_or_else(|| ExError::from(config::ConfigError::MissingWebhook))?;
        (
            Box::new(fs_store),
            Box::new(DiscordWebhookNotifier::new(webhook, config.request_timeout)?),
        )
    };

    let options = RunOptions::new(config.list_types.iter().cloned()).with_capture(config.capture);
    tracing::info!(
        run_id = %options.run_id,
        base_url = %config.base_url,
        state_dir = %config.state_dir.display(),
        dry_run = config.dry_run,
        "Starting run"
    );

    Ok(run_once(&source, store.as_ref(), notifier.as_ref(), &options).await)
}

fn log_report(report: &RunReport) {
    for outcome in &report.outcomes {
        log_outcome(outcome);
    }
    tracing::info!(
        run_id = %report.run_id,
        lists = report.outcomes.len(),
        clean = report.is_clean(),
        "Run finished"
    );
}

fn log_outcome(outcome: &ListRunOutcome) {
    let errors: Vec<&str> = [
        &outcome.load_error,
        &outcome.source_error,
        &outcome.delivery_error,
        &outcome.persist_error,
    ]
    .into_iter()
    .flatten()
    .map(|e| e.code())
    .collect();

    tracing::info!(
        list_type = %outcome.list_type,
        status = outcome.status.as_str(),
        entries = outcome.entry_count,
        added = outcome.summary.added,
        removed = outcome.summary.removed,
        moved = outcome.summary.moved,
        notified = outcome.notified,
        fallback_names = outcome.fallback_keys.len(),
        errors = ?errors,
        "List processed"
    );
}
