//! zg-graph - Lineage graph persistence for zonegraph
//!
//! Every store implements [`GraphSink`]: an idempotent upsert of a whole
//! [`zg_core::LineageGraph`], plus an explicit wipe.

pub mod cypher;
pub mod duckdb_sink;
pub mod error;
pub mod memory;
mod schema;
pub mod traits;

pub use cypher::CypherScriptSink;
pub use duckdb_sink::DuckDbGraphSink;
pub use error::{GraphError, GraphResult};
pub use memory::MemoryGraphSink;
pub use traits::{GraphSink, UpsertSummary};
