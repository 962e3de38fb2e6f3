//! Aggregated lineage graph

use crate::lineage::LineageEdge;
use crate::table::TableRef;
use crate::term::TermId;
use petgraph::graph::{DiGraph, EdgeIndex, NodeIndex};
use petgraph::visit::EdgeRef;
use petgraph::Direction;
use std::collections::HashMap;

/// Directed graph of zoned tables joined by "feeds" edges.
///
/// Nodes are keyed by [`TableRef`] identity and edges by the
/// `(source, target)` pair. Inserting an edge that already exists keeps the
/// first provenance. Iteration follows insertion order.
#[derive(Debug, Default)]
pub struct LineageGraph {
    /// The underlying graph; edge weights carry provenance
    graph: DiGraph<TableRef, TermId>,

    /// Map from table reference to node index
    node_map: HashMap<TableRef, NodeIndex>,

    /// Map from (source, target) node pair to edge index
    edge_map: HashMap<(NodeIndex, NodeIndex), EdgeIndex>,
}

impl LineageGraph {
    /// Create a new empty graph
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a table node, returning its index (existing or new)
    pub fn add_node(&mut self, table: &TableRef) -> NodeIndex {
        if let Some(&idx) = self.node_map.get(table) {
            return idx;
        }
        let idx = self.graph.add_node(table.clone());
        self.node_map.insert(table.clone(), idx);
        idx
    }

    /// Add an edge. Returns `true` if the (source, target) pair was new.
    ///
    /// Edges violating the zone-ordering rule are refused.
    pub fn add_edge(&mut self, edge: &LineageEdge) -> bool {
        if !edge.is_admissible() {
            log::warn!("Refusing non-admissible edge {}", edge);
            return false;
        }

        let (source, target) = edge.identity();
        let from = self.add_node(source);
        let to = self.add_node(target);
        if self.edge_map.contains_key(&(from, to)) {
            return false;
        }
        let idx = self.graph.add_edge(from, to, edge.provenance.clone());
        self.edge_map.insert((from, to), idx);
        true
    }

    /// Add every edge from an iterator, returning how many were new
    pub fn extend<'a>(&mut self, edges: impl IntoIterator<Item = &'a LineageEdge>) -> usize {
        edges.into_iter().filter(|e| self.add_edge(e)).count()
    }

    /// Merge another graph into this one (this graph's provenance wins)
    pub fn merge(&mut self, other: &LineageGraph) -> usize {
        for table in other.nodes() {
            self.add_node(table);
        }
        self.extend(other.edges().iter())
    }

    /// Number of table nodes
    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    /// Number of distinct edges
    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Whether the graph has no nodes
    pub fn is_empty(&self) -> bool {
        self.graph.node_count() == 0
    }

    /// Table nodes in insertion order
    pub fn nodes(&self) -> impl Iterator<Item = &TableRef> {
        self.graph.node_weights()
    }

    /// Edges in insertion order
    pub fn edges(&self) -> Vec<LineageEdge> {
        self.graph
            .edge_references()
            .map(|e| {
                LineageEdge::new(
                    self.graph[e.source()].clone(),
                    self.graph[e.target()].clone(),
                    e.weight().clone(),
                )
            })
            .collect()
    }

    /// Whether the graph contains the given table
    pub fn contains_node(&self, table: &TableRef) -> bool {
        self.node_map.contains_key(table)
    }

    /// Whether `source` feeds `target`
    pub fn contains_edge(&self, source: &TableRef, target: &TableRef) -> bool {
        self.provenance(source, target).is_some()
    }

    /// Provenance of the `source -> target` edge, if present
    pub fn provenance(&self, source: &TableRef, target: &TableRef) -> Option<&TermId> {
        let from = self.node_map.get(source)?;
        let to = self.node_map.get(target)?;
        let idx = self.edge_map.get(&(*from, *to))?;
        self.graph.edge_weight(*idx)
    }

    /// Tables that directly feed `target`, sorted
    pub fn sources_of(&self, target: &TableRef) -> Vec<&TableRef> {
        let Some(&idx) = self.node_map.get(target) else {
            return Vec::new();
        };
        let mut sources: Vec<&TableRef> = self
            .graph
            .neighbors_directed(idx, Direction::Incoming)
            .map(|n| &self.graph[n])
            .collect();
        sources.sort();
        sources
    }
}

#[cfg(test)]
#[path = "graph_test.rs"]
mod tests;
