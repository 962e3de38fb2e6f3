//! Graph sink trait definition

use crate::error::GraphResult;
use zg_core::LineageGraph;

/// What an upsert changed in the store.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UpsertSummary {
    /// Identifier of the run that performed the upsert, when the store tracks runs
    pub run_id: Option<String>,
    /// Nodes that did not exist before
    pub nodes_created: usize,
    /// Edges that did not exist before
    pub edges_created: usize,
    /// Nodes in the upserted graph
    pub nodes_seen: usize,
    /// Edges in the upserted graph
    pub edges_seen: usize,
}

/// Destination for a lineage graph.
///
/// `upsert` is match-or-create: running it twice with the same graph leaves
/// the store unchanged the second time. Existing edges keep their original
/// provenance.
pub trait GraphSink: Send {
    /// Persist every node and edge of `graph`
    fn upsert(&mut self, graph: &LineageGraph) -> GraphResult<UpsertSummary>;

    /// Remove every node and edge from the store
    fn wipe(&mut self) -> GraphResult<()>;

    /// Sink identifier for logging
    fn name(&self) -> &'static str;
}
