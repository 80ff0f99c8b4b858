// Log events emitted by the run controller, asserted via test capture.
// The capture is shared by every test in this binary, so each test uses
// its own list type and filters on it.

mod common;

use common::{FakeListSource, RecordingNotifier};
use rankwatch_core::core_types::schema::{
    FIELD_DURATION_MS, FIELD_ERR_CODE, FIELD_LIST_TYPE, FIELD_STATUS,
};
use rankwatch_core::logging_facility::init_test_capture;
use rankwatch_engine::{run_once, RunOptions};
use rankwatch_store::MemorySnapshotStore;
use tracing::Level;

#[tokio::test]
async fn test_corrupt_store_logged_distinctly_from_absent() {
    let capture = init_test_capture();
    let source = FakeListSource::new();
    source.set_list("corrupt-list", &["a"]);
    source.set_list("fresh-list", &["a"]);
    let store = MemorySnapshotStore::new().with_corrupt("corrupt-list", "bad bytes");

    run_once(
        &source,
        &store,
        &RecordingNotifier::new(),
        &RunOptions::new(["corrupt-list", "fresh-list"]),
    )
    .await;

    let corrupt = capture.events_with(FIELD_LIST_TYPE, "corrupt-list");
    let corrupt_event = corrupt
        .iter()
        .find(|e| e.event.as_deref() == Some("store_corrupt"))
        .expect("store_corrupt event");
    assert_eq!(corrupt_event.level, Level::ERROR);
    assert_eq!(corrupt_event.field(FIELD_ERR_CODE), Some("ERR_STORE_CORRUPT"));
    assert!(!corrupt
        .iter()
        .any(|e| e.event.as_deref() == Some("store_absent")));

    let fresh = capture.events_with(FIELD_LIST_TYPE, "fresh-list");
    let absent_event = fresh
        .iter()
        .find(|e| e.event.as_deref() == Some("store_absent"))
        .expect("store_absent event");
    assert_eq!(absent_event.level, Level::INFO);
    assert!(fresh.iter().any(|e| e.event.as_deref() == Some("baseline")));
}

#[tokio::test]
async fn test_process_list_start_and_end_events() {
    let capture = init_test_capture();
    let source = FakeListSource::new();
    source.set_list("ops-list", &["a", "b"]);
    let store = MemorySnapshotStore::new();

    run_once(&source, &store, &RecordingNotifier::new(), &RunOptions::new(["ops-list"])).await;

    let events = capture.events_with(FIELD_LIST_TYPE, "ops-list");
    let ops: Vec<(&str, &str)> = events
        .iter()
        .filter_map(|e| Some((e.op.as_deref()?, e.event.as_deref()?)))
        .filter(|(op, _)| *op == "process_list")
        .collect();
    assert_eq!(ops, vec![("process_list", "start"), ("process_list", "end")]);

    let end = events
        .iter()
        .find(|e| e.event.as_deref() == Some("end"))
        .unwrap();
    assert_eq!(end.field(FIELD_STATUS), Some("baseline"));
    assert!(end.field(FIELD_DURATION_MS).is_some());
}

#[tokio::test]
async fn test_skipped_list_logs_error_with_code() {
    let capture = init_test_capture();
    let source = FakeListSource::new();
    source.fail_list("down-list");
    let store = MemorySnapshotStore::new();

    run_once(&source, &store, &RecordingNotifier::new(), &RunOptions::new(["down-list"])).await;

    let errors: Vec<_> = capture
        .events_with(FIELD_LIST_TYPE, "down-list")
        .into_iter()
        .filter(|e| e.event.as_deref() == Some("end_error"))
        .collect();
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].op.as_deref(), Some("process_list"));
    assert_eq!(errors[0].field(FIELD_ERR_CODE), Some("ERR_SOURCE_UNAVAILABLE"));
}

#[tokio::test]
async fn test_delivery_failure_logged() {
    let capture = init_test_capture();
    let source = FakeListSource::new();
    source.set_list("noisy-list", &["a", "b"]);
    let store = MemorySnapshotStore::new();
    run_once(&source, &store, &RecordingNotifier::new(), &RunOptions::new(["noisy-list"])).await;

    let notifier = RecordingNotifier::new();
    notifier.set_failing(true);
    source.set_list("noisy-list", &["b", "a"]);
    run_once(&source, &store, &notifier, &RunOptions::new(["noisy-list"])).await;

    assert_eq!(
        capture.count_events(|e| {
            e.event.as_deref() == Some("delivery_failed")
                && e.field(FIELD_LIST_TYPE) == Some("noisy-list")
        }),
        1
    );
}
