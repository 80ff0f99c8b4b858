//! Ranked-list domain model

pub mod entity;
pub mod snapshot;

pub use entity::{single_line, Entity};
pub use snapshot::{validate_list_type, Snapshot};
