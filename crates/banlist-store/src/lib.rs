//! Storage layer: dated snapshot files, raw source artifacts, pointer symlinks.

mod error;
pub use error::StoreError;

mod snapshots;
pub use snapshots::{Pointer, Publish, SnapshotStore};

pub mod validate;
pub use validate::{ValidationReport, ValueRule, validate_tree};
