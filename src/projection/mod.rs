//! Projection engine for compound-interest calculators

mod state;
mod engine;
mod points;

pub use state::{BucketState, contribution_shares};
pub use engine::{
    project, project_buckets, Bucket, BucketConfig, BucketRates, ProjectionConfig, ProjectionEngine,
};
pub use points::{
    effective_annual_rate, BucketOutcome, ProjectionPoint, ProjectionResult, ProjectionSummary,
};
