//! Store boundary for the gear transform.
//!
//! The transform reads one raw catalogue document from a source collection
//! and replaces a target collection with the flattened records. This crate
//! defines that boundary ([`DocumentStore`]), two implementations of it, and
//! the clear-fetch-transform-insert pipeline that drives a run.

pub mod loader;
pub mod pipeline;
pub mod store;

pub use loader::{Format, StoreError};
pub use pipeline::{
    DryRun, PipelineError, RunSummary, TransformConfig, TransformOutcome, dry_run, run_transform,
};
pub use store::{DirStore, DocumentStore, MemoryStore};
