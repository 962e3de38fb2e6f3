//! Cypher script writer for loading lineage into Neo4j.
//!
//! The sink does not talk to a database. It appends idempotent `MERGE`
//! statements to a script that `cypher-shell` can replay: tables become
//! `Tabla` nodes, landing files `Archivo` nodes, and every edge an
//! `ALIMENTA_A` relationship keyed on `(nombre, zona)`.

use crate::error::{GraphError, GraphResult};
use crate::traits::{GraphSink, UpsertSummary};
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use zg_core::{LineageEdge, LineageGraph, NodeKind, TableRef};

const CONSTRAINTS: &[&str] = &[
    "CREATE CONSTRAINT tabla_node_key IF NOT EXISTS FOR (t:Tabla) REQUIRE (t.nombre, t.zona) IS NODE KEY;",
    "CREATE CONSTRAINT archivo_node_key IF NOT EXISTS FOR (a:Archivo) REQUIRE (a.nombre, a.zona) IS NODE KEY;",
    "CREATE INDEX tabla_nombre_idx IF NOT EXISTS FOR (t:Tabla) ON (t.nombre);",
];

const WIPE: &str = "MATCH (n) DETACH DELETE n;";

/// Appends Cypher statements to a script file.
#[derive(Debug, Clone)]
pub struct CypherScriptSink {
    path: PathBuf,
}

impl CypherScriptSink {
    /// Write to `path`, creating it (and its parent directories) on first use.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Script location
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn append(&self, statements: &[String]) -> GraphResult<()> {
        let io_err = |source: std::io::Error| GraphError::Io {
            path: self.path.display().to_string(),
            source,
        };

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(io_err)?;
        }
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(io_err)?;

        let mut script = statements.join("\n");
        script.push('\n');
        file.write_all(script.as_bytes()).map_err(io_err)
    }
}

fn label(kind: NodeKind) -> &'static str {
    match kind {
        NodeKind::Table => "Tabla",
        NodeKind::File => "Archivo",
    }
}

/// Quote a value as a Cypher string literal.
fn literal(value: &str) -> String {
    format!("'{}'", value.replace('\\', "\\\\").replace('\'', "\\'"))
}

fn node_pattern(var: &str, table: &TableRef) -> String {
    format!(
        "({}:{} {{nombre: {}, zona: {}}})",
        var,
        label(table.kind()),
        literal(&table.name),
        literal(table.zone.as_str())
    )
}

fn merge_node(table: &TableRef) -> String {
    format!(
        "MERGE {} SET n.clave = {};",
        node_pattern("n", table),
        literal(&table.key())
    )
}

fn merge_edge(edge: &LineageEdge) -> String {
    format!(
        "MATCH {} MATCH {} MERGE (src)-[r:ALIMENTA_A]->(dst) ON CREATE SET r.termino = {};",
        node_pattern("src", &edge.source),
        node_pattern("dst", &edge.target),
        literal(&edge.provenance)
    )
}

impl GraphSink for CypherScriptSink {
    fn upsert(&mut self, graph: &LineageGraph) -> GraphResult<UpsertSummary> {
        let edges = graph.edges();
        let statements: Vec<String> = CONSTRAINTS
            .iter()
            .map(|c| c.to_string())
            .chain(graph.nodes().map(merge_node))
            .chain(edges.iter().map(merge_edge))
            .collect();
        self.append(&statements)?;

        log::info!(
            "Wrote {} Cypher statements to {}",
            statements.len(),
            self.path.display()
        );

        // MERGE decides creation at replay time; the script reports what it carries.
        Ok(UpsertSummary {
            run_id: None,
            nodes_created: graph.node_count(),
            edges_created: edges.len(),
            nodes_seen: graph.node_count(),
            edges_seen: edges.len(),
        })
    }

    fn wipe(&mut self) -> GraphResult<()> {
        self.append(&[WIPE.to_string()])
    }

    fn name(&self) -> &'static str {
        "cypher"
    }
}

#[cfg(test)]
#[path = "cypher_test.rs"]
mod tests;
