//! Canonical schema constants for structured logging
//!
//! Field keys and event names shared by the logging macros, the run
//! controller and the test capture layer.

// Canonical field keys. Tracing macros take field names as identifiers,
// so emitters spell these out; readers of captured events use the constants.
pub const FIELD_COMPONENT: &str = "component";
pub const FIELD_OP: &str = "op";
pub const FIELD_EVENT: &str = "event";
pub const FIELD_DURATION_MS: &str = "duration_ms";
pub const FIELD_LIST_TYPE: &str = "list_type";
pub const FIELD_STATUS: &str = "status";

// Error fields
pub const FIELD_ERR_KIND: &str = "err_kind";
pub const FIELD_ERR_CODE: &str = "err_code";

// Canonical event names
pub const EVENT_START: &str = "start";
pub const EVENT_END: &str = "end";
pub const EVENT_END_ERROR: &str = "end_error";

// Run-controller outcome events
pub const EVENT_BASELINE: &str = "baseline";
pub const EVENT_STORE_ABSENT: &str = "store_absent";
pub const EVENT_STORE_CORRUPT: &str = "store_corrupt";
pub const EVENT_STORE_UNREADABLE: &str = "store_unreadable";
pub const EVENT_DELIVERY_FAILED: &str = "delivery_failed";
pub const EVENT_PERSIST_FAILED: &str = "persist_failed";
pub const EVENT_METADATA_FALLBACK: &str = "metadata_fallback";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_names_are_distinct() {
        let events = [
            EVENT_START,
            EVENT_END,
            EVENT_END_ERROR,
            EVENT_BASELINE,
            EVENT_STORE_ABSENT,
            EVENT_STORE_CORRUPT,
            EVENT_STORE_UNREADABLE,
            EVENT_DELIVERY_FAILED,
            EVENT_PERSIST_FAILED,
            EVENT_METADATA_FALLBACK,
        ];
        for (i, a) in events.iter().enumerate() {
            for b in &events[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }

    #[test]
    fn test_store_corrupt_is_not_absent() {
        assert_ne!(EVENT_STORE_CORRUPT, EVENT_STORE_ABSENT);
    }
}
