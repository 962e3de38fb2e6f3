//! Error types for zg-pipeline

use thiserror::Error;
use zg_graph::GraphError;
use zg_locate::LocateError;

/// Pipeline setup and output errors.
///
/// Per-term problems are never errors; they land in the failure report.
#[derive(Error, Debug)]
pub enum PipelineError {
    /// P001: Graph sink rejected the upsert
    #[error("[P001] Graph sink write failed: {0}")]
    Sink(#[from] GraphError),

    /// P002: CSV export failed
    #[error("[P002] Failed to write '{path}': {source}")]
    Export { path: String, source: csv::Error },

    /// P003: Output directory could not be prepared
    #[error("[P003] Failed to prepare '{path}': {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    /// P004: Locator could not be set up
    #[error("[P004] Locator setup failed: {0}")]
    Locator(#[from] LocateError),
}

/// Result type alias for PipelineError
pub type PipelineResult<T> = Result<T, PipelineError>;
