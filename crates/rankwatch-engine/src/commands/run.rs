//! One watcher pass over every configured list type.
//!
//! ## Per list type, in order
//! 1. Load the previous snapshot (absent / present / corrupt / unreadable)
//! 2. Capture the current snapshot from the list source
//! 3. No usable previous snapshot: persist current as baseline, stop
//! 4. Diff, and if anything changed, format and notify
//! 5. Persist current, whether or not delivery succeeded
//!
//! List types run sequentially and independently: a failure in one is
//! recorded in its outcome and the run moves on to the next.
//!
//! ## Logging
//! - `log_op_start!` / `log_op_end!` around every list type
//! - `log_op_error!` when the list type is skipped
//! - distinct events for absent, corrupt and unreadable stores, failed
//!   delivery and failed persistence

use crate::commands::capture::{capture_snapshot, CaptureOptions, CapturedList};
use chrono::Utc;
use rankwatch_core::core_types::schema::{
    EVENT_BASELINE, EVENT_DELIVERY_FAILED, EVENT_PERSIST_FAILED, EVENT_STORE_ABSENT,
    EVENT_STORE_CORRUPT, EVENT_STORE_UNREADABLE,
};
use rankwatch_core::core_types::RunId;
use rankwatch_core::diff::{compute_diff, render_notification, ChangeSummary};
use rankwatch_core::errors::{ExError, ExErrorKind};
use rankwatch_core::model::Snapshot;
use rankwatch_core::ports::{ListSource, Notifier, SnapshotStore, StoredSnapshot};
use rankwatch_core::{log_op_end, log_op_error, log_op_start};
use serde::Serialize;
use std::time::Instant;
use tracing::Instrument;

/// Options for one run
#[derive(Debug, Clone)]
pub struct RunOptions {
    pub run_id: RunId,
    /// Processed in this order
    pub list_types: Vec<String>,
    pub capture: CaptureOptions,
}

impl RunOptions {
    pub fn new<I, L>(list_types: I) -> Self
    where
        I: IntoIterator<Item = L>,
        L: Into<String>,
    {
        Self {
            run_id: RunId::new(),
            list_types: list_types.into_iter().map(Into::into).collect(),
            capture: CaptureOptions::default(),
        }
    }

    pub fn with_capture(mut self, capture: CaptureOptions) -> Self {
        self.capture = capture;
        self
    }
}

/// What happened to one list type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ListRunStatus {
    /// No usable previous snapshot; current stored without notifying
    Baseline,
    /// Nothing to report
    Unchanged,
    /// Changes were found (see `notified` for delivery)
    Changed,
    /// The current list could not be captured; nothing was stored
    Skipped,
}

impl ListRunStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ListRunStatus::Baseline => "baseline",
            ListRunStatus::Unchanged => "unchanged",
            ListRunStatus::Changed => "changed",
            ListRunStatus::Skipped => "skipped",
        }
    }
}

#[derive(Debug, Clone)]
pub struct ListRunOutcome {
    pub list_type: String,
    pub status: ListRunStatus,
    pub summary: ChangeSummary,
    pub entry_count: usize,
    /// Notification text, when changes were found
    pub notification: Option<String>,
    pub notified: bool,
    /// Keys whose display name fell back to the key
    pub fallback_keys: Vec<String>,
    /// Previous snapshot was corrupt or unreadable
    pub load_error: Option<ExError>,
    pub source_error: Option<ExError>,
    pub delivery_error: Option<ExError>,
    pub persist_error: Option<ExError>,
}

impl ListRunOutcome {
    fn new(list_type: &str, status: ListRunStatus) -> Self {
        Self {
            list_type: list_type.to_string(),
            status,
            summary: ChangeSummary::default(),
            entry_count: 0,
            notification: None,
            notified: false,
            fallback_keys: Vec::new(),
            load_error: None,
            source_error: None,
            delivery_error: None,
            persist_error: None,
        }
    }

    /// True when every step that applied to this list type succeeded
    pub fn is_clean(&self) -> bool {
        self.load_error.is_none()
            && self.source_error.is_none()
            && self.delivery_error.is_none()
            && self.persist_error.is_none()
    }
}

/// Outcome of a whole run, one entry per list type in configured order
#[derive(Debug, Clone)]
pub struct RunReport {
    pub run_id: RunId,
    pub outcomes: Vec<ListRunOutcome>,
}

impl RunReport {
    pub fn outcome(&self, list_type: &str) -> Option<&ListRunOutcome> {
        self.outcomes.iter().find(|o| o.list_type == list_type)
    }

    pub fn is_clean(&self) -> bool {
        self.outcomes.iter().all(ListRunOutcome::is_clean)
    }

    pub fn count(&self, status: ListRunStatus) -> usize {
        self.outcomes.iter().filter(|o| o.status == status).count()
    }
}

/// Run the watcher once over `options.list_types`.
///
/// Never fails as a whole: per-list errors are carried in the report.
pub async fn run_once(
    source: &dyn ListSource,
    store: &dyn SnapshotStore,
    notifier: &dyn Notifier,
    options: &RunOptions,
) -> RunReport {
    let span = tracing::info_span!("run", run_id = %options.run_id);
    async {
        log_op_start!("run", list_count = options.list_types.len());
        let start = Instant::now();

        let mut outcomes = Vec::with_capacity(options.list_types.len());
        for list_type in &options.list_types {
            let outcome = process_list(source, store, notifier, list_type, &options.capture)
                .instrument(tracing::info_span!("list", list_type = %list_type))
                .await;
            outcomes.push(outcome);
        }

        let report = RunReport {
            run_id: options.run_id.clone(),
            outcomes,
        };
        log_op_end!(
            "run",
            duration_ms = start.elapsed().as_millis() as u64,
            baseline = report.count(ListRunStatus::Baseline),
            unchanged = report.count(ListRunStatus::Unchanged),
            changed = report.count(ListRunStatus::Changed),
            skipped = report.count(ListRunStatus::Skipped)
        );
        report
    }
    .instrument(span)
    .await
}

async fn process_list(
    source: &dyn ListSource,
    store: &dyn SnapshotStore,
    notifier: &dyn Notifier,
    list_type: &str,
    capture: &CaptureOptions,
) -> ListRunOutcome {
    log_op_start!("process_list", list_type = list_type);
    let start = Instant::now();

    let (previous, load_error) = load_previous(store, list_type);

    let captured =
        match capture_snapshot(source, list_type, previous.as_ref(), capture, Utc::now()).await {
            Ok(captured) => captured,
            Err(err) => {
                log_op_error!(
                    "process_list",
                    err,
                    duration_ms = start.elapsed().as_millis() as u64,
                    list_type = list_type
                );
                let mut outcome = ListRunOutcome::new(list_type, ListRunStatus::Skipped);
                outcome.load_error = load_error;
                outcome.source_error = Some(err);
                return outcome;
            }
        };
    let CapturedList {
        snapshot: current,
        fallback_keys,
    } = captured;

    tracing::debug!(
        list_type,
        entry_count = current.len(),
        key_digest = %current.key_order_digest(),
        "Captured current snapshot"
    );

    let mut outcome = match &previous {
        None => {
            tracing::info!(
                event = EVENT_BASELINE,
                list_type,
                entry_count = current.len(),
                "Recording baseline snapshot, no notification"
            );
            ListRunOutcome::new(list_type, ListRunStatus::Baseline)
        }
        Some(previous) => notify_changes(notifier, list_type, previous, &current).await,
    };
    outcome.entry_count = current.len();
    outcome.fallback_keys = fallback_keys;
    outcome.load_error = load_error;

    if let Err(err) = store.save(list_type, &current) {
        tracing::error!(
            event = EVENT_PERSIST_FAILED,
            list_type,
            err_code = err.code(),
            error = %err,
            "Failed to persist current snapshot"
        );
        outcome.persist_error = Some(err);
    }

    log_op_end!(
        "process_list",
        duration_ms = start.elapsed().as_millis() as u64,
        list_type = list_type,
        status = outcome.status.as_str(),
        added = outcome.summary.added,
        removed = outcome.summary.removed,
        moved = outcome.summary.moved
    );
    outcome
}

/// Load the previous snapshot; `None` means this run records a baseline.
fn load_previous(store: &dyn SnapshotStore, list_type: &str) -> (Option<Snapshot>, Option<ExError>) {
    match store.load(list_type) {
        Ok(StoredSnapshot::Present(snapshot)) => (Some(snapshot), None),
        Ok(StoredSnapshot::Absent) => {
            tracing::info!(
                event = EVENT_STORE_ABSENT,
                list_type,
                "No previous snapshot"
            );
            (None, None)
        }
        Ok(StoredSnapshot::Corrupt { reason }) => {
            let err = ExError::new(ExErrorKind::StoreCorrupt)
                .with_op("load_previous")
                .with_list_type(list_type)
                .with_message(reason);
            tracing::error!(
                event = EVENT_STORE_CORRUPT,
                list_type,
                err_code = err.code(),
                error = %err,
                "Stored snapshot is corrupt, replacing it with a new baseline"
            );
            (None, Some(err))
        }
        Err(err) => {
            tracing::warn!(
                event = EVENT_STORE_UNREADABLE,
                list_type,
                err_code = err.code(),
                error = %err,
                "Stored snapshot could not be read, recording a new baseline"
            );
            (None, Some(err))
        }
    }
}

async fn notify_changes(
    notifier: &dyn Notifier,
    list_type: &str,
    previous: &Snapshot,
    current: &Snapshot,
) -> ListRunOutcome {
    let changes = compute_diff(previous, current);
    if changes.is_empty() {
        let mut outcome = ListRunOutcome::new(list_type, ListRunStatus::Unchanged);
        outcome.summary = changes.summary;
        return outcome;
    }

    let text = render_notification(&changes);
    let mut outcome = ListRunOutcome::new(list_type, ListRunStatus::Changed);
    outcome.summary = changes.summary;

    match notifier.send(list_type, &text).await {
        Ok(()) => outcome.notified = true,
        Err(err) => {
            tracing::error!(
                event = EVENT_DELIVERY_FAILED,
                list_type,
                err_code = err.code(),
                error = %err,
                "Notification not delivered; snapshot is still persisted"
            );
            outcome.delivery_error = Some(err);
        }
    }
    outcome.notification = Some(text);
    outcome
}
