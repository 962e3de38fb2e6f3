//! Error types for zg-locate

use thiserror::Error;

/// Term lookup errors
#[derive(Error, Debug)]
pub enum LocateError {
    /// L001: A mirrored term file could not be read
    #[error("[L001] Failed to read term file '{path}': {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    /// L002: A mirrored term file is not valid JSON
    #[error("[L002] Term file '{path}' is not valid JSON: {source}")]
    MalformedJson {
        path: String,
        source: serde_json::Error,
    },

    /// L003: Catalog request could not be sent or returned an error status
    #[error("[L003] Catalog request failed: {0}")]
    Network(String),

    /// L004: Catalog answered with a body we cannot interpret
    #[error("[L004] Unexpected catalog response: {0}")]
    InvalidResponse(String),

    /// L005: Terms CSV does not exist
    #[error("[L005] Terms CSV not found: {path}")]
    TermsCsvNotFound { path: String },

    /// L006: Terms CSV lacks the term column
    #[error("[L006] Terms CSV '{path}' is missing the '{column}' column")]
    MissingTermColumn { path: String, column: String },

    /// L007: Terms CSV could not be parsed
    #[error("[L007] Failed to read terms CSV '{path}': {source}")]
    Csv { path: String, source: csv::Error },

    /// L008: Listing pattern is not a valid glob
    #[error("[L008] Invalid listing pattern '{pattern}': {message}")]
    InvalidPattern { pattern: String, message: String },
}

/// Result type alias for LocateError
pub type LocateResult<T> = Result<T, LocateError>;
