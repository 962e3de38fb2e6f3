//! zg-pipeline - End-to-end lineage runs for zonegraph
//!
//! [`LineagePipeline`] fetches each term through a locator, extracts its
//! edges, aggregates them into one [`zg_core::LineageGraph`] with a
//! [`zg_core::FailureReport`], and hands the result to the output step
//! selected by [`RunMode`].

pub mod error;
pub mod export;
pub mod pipeline;

pub use error::{PipelineError, PipelineResult};
pub use export::{
    write_failures_csv, write_plan_csv, FailureRow, PlanRow, FAILURE_HEADERS, PLAN_HEADERS,
};
pub use pipeline::{CatalogAccess, LineagePipeline, RunMode, RunOutcome, RunOutput, RUN_TERM};
