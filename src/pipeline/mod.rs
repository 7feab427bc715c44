//! Acquisition pipeline: search, dedup, probe, write

mod coordinator;
mod dedup;
mod summary;

pub use coordinator::{run_harvest, Pipeline, PipelineSettings, TargetOutcome};
pub use dedup::{KnownPlaces, PageFilter, StagedIds};
pub use summary::RunSummary;
