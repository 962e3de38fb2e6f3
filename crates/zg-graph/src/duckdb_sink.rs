//! DuckDB-backed property graph store.

use crate::error::{GraphError, GraphResult};
use crate::schema;
use crate::traits::{GraphSink, UpsertSummary};
use duckdb::Connection;
use std::path::Path;
use uuid::Uuid;
use zg_core::{LineageGraph, TableRef};

const INSERT_NODE: &str = "INSERT INTO zg_graph.nodes (name, zone, zone_rank, kind, first_run_id)
     VALUES (?, ?, ?, ?, ?)
     ON CONFLICT DO NOTHING";

const INSERT_FEED: &str =
    "INSERT INTO zg_graph.feeds (source_name, source_zone, target_name, target_zone, provenance, first_run_id)
     VALUES (?, ?, ?, ?, ?, ?)
     ON CONFLICT DO NOTHING";

/// Lineage graph persisted in the `zg_graph` schema of a DuckDB file.
///
/// Nodes live in `zg_graph.nodes`, edges in `zg_graph.feeds` and each upsert
/// leaves a row in `zg_graph.runs`. Upserts run in a single transaction.
pub struct DuckDbGraphSink {
    conn: Connection,
}

impl DuckDbGraphSink {
    /// Open (or create) the store at `path` and upgrade its schema.
    pub fn open(path: &Path) -> GraphResult<Self> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|source| GraphError::Io {
                path: parent.display().to_string(),
                source,
            })?;
        }
        let conn = Connection::open(path)
            .map_err(|e| GraphError::ConnectionError(format!("{e}: {}", path.display())))?;
        schema::upgrade(&conn)?;
        Ok(Self { conn })
    }

    /// In-memory store at the current schema version.
    pub fn open_memory() -> GraphResult<Self> {
        let conn =
            Connection::open_in_memory().map_err(|e| GraphError::ConnectionError(e.to_string()))?;
        schema::upgrade(&conn)?;
        Ok(Self { conn })
    }

    /// Schema version recorded in the store.
    pub fn schema_version(&self) -> GraphResult<i32> {
        schema::applied_version(&self.conn)
    }

    /// Stored nodes
    pub fn node_count(&self) -> GraphResult<usize> {
        count_rows(&self.conn, "zg_graph.nodes")
    }

    /// Stored edges
    pub fn edge_count(&self) -> GraphResult<usize> {
        count_rows(&self.conn, "zg_graph.feeds")
    }

    /// Recorded upserts
    pub fn run_count(&self) -> GraphResult<usize> {
        count_rows(&self.conn, "zg_graph.runs")
    }

    /// Stored provenance of the `source -> target` edge.
    pub fn provenance(&self, source: &TableRef, target: &TableRef) -> GraphResult<Option<String>> {
        let mut stmt = self.conn.prepare(
            "SELECT provenance FROM zg_graph.feeds
             WHERE source_name = ? AND source_zone = ? AND target_name = ? AND target_zone = ?",
        )?;
        let mut rows = stmt.query(duckdb::params![
            source.name.as_str(),
            source.zone.as_str(),
            target.name.as_str(),
            target.zone.as_str(),
        ])?;
        match rows.next()? {
            Some(row) => Ok(Some(row.get(0)?)),
            None => Ok(None),
        }
    }

    /// Execute `body` within `BEGIN` / `COMMIT`, rolling back on error.
    fn transaction<F, T>(&self, body: F) -> GraphResult<T>
    where
        F: FnOnce(&Connection) -> GraphResult<T>,
    {
        self.conn
            .execute_batch("BEGIN TRANSACTION")
            .map_err(|e| GraphError::TransactionError(format!("BEGIN failed: {e}")))?;

        let result = body(&self.conn);

        match &result {
            Ok(_) => {
                if let Err(commit_err) = self.conn.execute_batch("COMMIT") {
                    let _ = self.conn.execute_batch("ROLLBACK");
                    return Err(GraphError::TransactionError(format!(
                        "COMMIT failed: {commit_err}"
                    )));
                }
            }
            Err(_) => {
                let _ = self.conn.execute_batch("ROLLBACK");
            }
        }
        result
    }
}

fn count_rows(conn: &Connection, table: &str) -> GraphResult<usize> {
    let count: i64 = conn.query_row(&format!("SELECT COUNT(*) FROM {table}"), [], |row| {
        row.get(0)
    })?;
    Ok(count as usize)
}

fn insert_graph(conn: &Connection, graph: &LineageGraph, run_id: &str) -> GraphResult<()> {
    let mut nodes = conn.prepare(INSERT_NODE)?;
    for table in graph.nodes() {
        nodes
            .execute(duckdb::params![
                table.name.as_str(),
                table.zone.as_str(),
                i32::from(table.zone.rank()),
                table.kind().as_str(),
                run_id,
            ])
            .map_err(|e| GraphError::WriteError(format!("node {table}: {e}")))?;
    }

    let mut feeds = conn.prepare(INSERT_FEED)?;
    for edge in graph.edges() {
        feeds
            .execute(duckdb::params![
                edge.source.name.as_str(),
                edge.source.zone.as_str(),
                edge.target.name.as_str(),
                edge.target.zone.as_str(),
                edge.provenance.as_str(),
                run_id,
            ])
            .map_err(|e| GraphError::WriteError(format!("edge {edge}: {e}")))?;
    }
    Ok(())
}

impl GraphSink for DuckDbGraphSink {
    fn upsert(&mut self, graph: &LineageGraph) -> GraphResult<UpsertSummary> {
        let run_id = Uuid::new_v4().to_string();

        let summary = self.transaction(|conn| {
            let nodes_before = count_rows(conn, "zg_graph.nodes")?;
            let edges_before = count_rows(conn, "zg_graph.feeds")?;

            insert_graph(conn, graph, &run_id)?;

            let summary = UpsertSummary {
                run_id: Some(run_id.clone()),
                nodes_created: count_rows(conn, "zg_graph.nodes")? - nodes_before,
                edges_created: count_rows(conn, "zg_graph.feeds")? - edges_before,
                nodes_seen: graph.node_count(),
                edges_seen: graph.edge_count(),
            };

            conn.execute(
                "INSERT INTO zg_graph.runs (run_id, nodes_seen, edges_seen, nodes_created, edges_created)
                 VALUES (?, ?, ?, ?, ?)",
                duckdb::params![
                    run_id,
                    summary.nodes_seen as i64,
                    summary.edges_seen as i64,
                    summary.nodes_created as i64,
                    summary.edges_created as i64,
                ],
            )
            .map_err(|e| GraphError::WriteError(format!("run record: {e}")))?;

            Ok(summary)
        })?;

        log::info!(
            "Upserted lineage into DuckDB (run {}): {} new nodes, {} new edges",
            run_id,
            summary.nodes_created,
            summary.edges_created
        );
        Ok(summary)
    }

    fn wipe(&mut self) -> GraphResult<()> {
        self.transaction(|conn| {
            conn.execute_batch("DELETE FROM zg_graph.feeds; DELETE FROM zg_graph.nodes;")
                .map_err(|e| GraphError::WriteError(format!("wipe failed: {e}")))
        })?;
        log::warn!("Wiped every node and edge from the DuckDB graph store");
        Ok(())
    }

    fn name(&self) -> &'static str {
        "duckdb"
    }
}

#[cfg(test)]
#[path = "duckdb_sink_test.rs"]
mod tests;
