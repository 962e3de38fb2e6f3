//! Set-backed graph sink for tests and dry runs.

use crate::error::GraphResult;
use crate::traits::{GraphSink, UpsertSummary};
use std::collections::{BTreeMap, BTreeSet};
use zg_core::{LineageGraph, TableRef, TermId};

/// Keeps the persisted graph in memory with the same match-or-create
/// semantics as the durable stores.
#[derive(Debug, Default, Clone)]
pub struct MemoryGraphSink {
    nodes: BTreeSet<TableRef>,
    edges: BTreeMap<(TableRef, TableRef), TermId>,
    upserts: usize,
}

impl MemoryGraphSink {
    /// Create an empty sink
    pub fn new() -> Self {
        Self::default()
    }

    /// Stored nodes, sorted
    pub fn nodes(&self) -> impl Iterator<Item = &TableRef> {
        self.nodes.iter()
    }

    /// Number of stored nodes
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Number of stored edges
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Number of upserts performed
    pub fn upsert_count(&self) -> usize {
        self.upserts
    }

    /// Stored provenance of the `source -> target` edge
    pub fn provenance(&self, source: &TableRef, target: &TableRef) -> Option<&TermId> {
        self.edges.get(&(source.clone(), target.clone()))
    }
}

impl GraphSink for MemoryGraphSink {
    fn upsert(&mut self, graph: &LineageGraph) -> GraphResult<UpsertSummary> {
        let nodes_created = graph
            .nodes()
            .filter(|table| self.nodes.insert((*table).clone()))
            .count();

        let mut edges_created = 0;
        for edge in graph.edges() {
            let key = (edge.source, edge.target);
            if !self.edges.contains_key(&key) {
                self.edges.insert(key, edge.provenance);
                edges_created += 1;
            }
        }
        self.upserts += 1;

        Ok(UpsertSummary {
            run_id: None,
            nodes_created,
            edges_created,
            nodes_seen: graph.node_count(),
            edges_seen: graph.edge_count(),
        })
    }

    fn wipe(&mut self) -> GraphResult<()> {
        self.nodes.clear();
        self.edges.clear();
        Ok(())
    }

    fn name(&self) -> &'static str {
        "memory"
    }
}
