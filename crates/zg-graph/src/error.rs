//! Error types for zg-graph

use thiserror::Error;

/// Graph store errors
#[derive(Error, Debug)]
pub enum GraphError {
    /// G001: Failed to open or create the graph store
    #[error("[G001] Graph store connection failed: {0}")]
    ConnectionError(String),

    /// G002: Schema migration failed
    #[error("[G002] Graph store migration failed: {0}")]
    MigrationError(String),

    /// G003: Statement failed inside the graph store
    #[error("[G003] Graph store write failed: {0}")]
    WriteError(String),

    /// G004: Transaction management error
    #[error("[G004] Graph store transaction failed: {0}")]
    TransactionError(String),

    /// G005: Script file could not be written
    #[error("[G005] Failed to write '{path}': {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    /// G006: DuckDB driver error with preserved source chain
    #[error("[G006] DuckDB error")]
    DuckDb(#[source] duckdb::Error),
}

/// Result type alias for GraphError
pub type GraphResult<T> = Result<T, GraphError>;

impl From<duckdb::Error> for GraphError {
    fn from(err: duckdb::Error) -> Self {
        GraphError::DuckDb(err)
    }
}
