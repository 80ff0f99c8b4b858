//! Structured logging facility
//!
//! - Single initialization point via `init(profile)`
//! - Operation boundary macros (`log_op_start!`, `log_op_end!`, `log_op_error!`)
//! - In-memory test capture for asserting on emitted events
//!
//! # Usage
//!
//! ```rust
//! use rankwatch_core::logging_facility::{init, Profile};
//!
//! init(Profile::Development);
//! ```

pub mod init;
pub mod macros;
pub mod test_capture;

pub use init::{init, Profile};
pub use test_capture::{init_test_capture, CapturedEvent, TestCapture};
