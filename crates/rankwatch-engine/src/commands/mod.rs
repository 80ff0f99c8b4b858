//! Command orchestration layer.
//!
//! `capture` turns the list source's answer into a validated snapshot;
//! `run` drives one watcher pass over all list types.

pub mod capture;
pub mod run;
