//! Error handling for rankwatch-store
//!
//! Wraps rankwatch-core ExError with store-specific helpers

use rankwatch_core::errors::{ExError, ExErrorKind};

/// Result type alias using ExError
pub type Result<T> = std::result::Result<T, ExError>;

/// Create an IO error
pub fn io_error(operation: &str, err: std::io::Error) -> ExError {
    ExError::new(ExErrorKind::Io)
        .with_op(operation.to_string())
        .with_message(err.to_string())
}

/// Create a persistence error wrapping a lower-level cause
pub fn persistence_error(list_type: &str, cause: ExError) -> ExError {
    ExError::new(ExErrorKind::Persistence)
        .with_op("save_snapshot")
        .with_list_type(list_type)
        .with_message("Failed to replace stored snapshot")
        .with_source(cause)
}

/// Create a serialization error for a snapshot document
pub fn serialization_error(list_type: &str, err: serde_json::Error) -> ExError {
    ExError::new(ExErrorKind::Serialization)
        .with_op("encode_snapshot")
        .with_list_type(list_type)
        .with_message(format!("Failed to serialize snapshot: {}", err))
}
