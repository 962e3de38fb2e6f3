//! zg-sql - SQL layer for zonegraph
//!
//! Recovers the tables a SQL fragment reads and writes. Input is sanitized
//! for NiFi expression language and vendor noise, parsed with sqlparser-rs
//! through a configurable dialect chain, and recovered statement by statement
//! with a regex fallback when no dialect accepts it.

pub mod dialect;
pub mod error;
pub mod extractor;
pub mod fallback;
pub mod parser;
pub mod sanitize;
pub mod split;

pub use dialect::{ConfiguredDialect, SqlDialect};
pub use error::{SqlError, SqlResult};
pub use parser::{ParseOutcome, SchemaContext, SqlStatementParser, TableExtraction};
pub use sanitize::{restore_placeholders, sanitize};
