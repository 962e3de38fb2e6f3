//! Graph store schema: embedded DDL steps and the version ledger.
//!
//! `zg_graph.schema_version` holds one row per applied step. A step and its
//! ledger row commit together, and a store written by a newer build is
//! refused rather than touched.

use crate::error::{GraphError, GraphResult};
use duckdb::Connection;

struct SchemaStep {
    version: i32,
    name: &'static str,
    sql: &'static str,
}

const STEPS: &[SchemaStep] = &[
    SchemaStep {
        version: 1,
        name: "initial",
        sql: include_str!("ddl/v001_initial.sql"),
    },
    SchemaStep {
        version: 2,
        name: "feed_indexes",
        sql: include_str!("ddl/v002_feed_indexes.sql"),
    },
];

/// Schema version this build writes.
pub(crate) const SCHEMA_VERSION: i32 = STEPS[STEPS.len() - 1].version;

const LEDGER_DDL: &str = "CREATE SCHEMA IF NOT EXISTS zg_graph;
CREATE TABLE IF NOT EXISTS zg_graph.schema_version (
    version    INTEGER PRIMARY KEY,
    name       VARCHAR NOT NULL,
    applied_at TIMESTAMP NOT NULL DEFAULT now()
);";

/// Highest version recorded in the ledger, 0 for a fresh store.
pub(crate) fn applied_version(conn: &Connection) -> GraphResult<i32> {
    conn.query_row(
        "SELECT COALESCE(MAX(version), 0) FROM zg_graph.schema_version",
        [],
        |row| row.get(0),
    )
    .map_err(|e| GraphError::MigrationError(format!("cannot read schema ledger: {e}")))
}

/// Bring the store up to [`SCHEMA_VERSION`], returning how many steps ran.
pub(crate) fn upgrade(conn: &Connection) -> GraphResult<usize> {
    conn.execute_batch(LEDGER_DDL)
        .map_err(|e| GraphError::MigrationError(format!("cannot create schema ledger: {e}")))?;

    let applied = applied_version(conn)?;
    if applied > SCHEMA_VERSION {
        return Err(GraphError::MigrationError(format!(
            "store is at schema v{applied:03} but this build only knows v{SCHEMA_VERSION:03}"
        )));
    }

    let pending: Vec<&SchemaStep> = STEPS.iter().filter(|s| s.version > applied).collect();
    for step in &pending {
        apply(conn, step)?;
    }
    if !pending.is_empty() {
        log::info!(
            "Graph store schema upgraded from v{:03} to v{:03}",
            applied,
            SCHEMA_VERSION
        );
    }
    Ok(pending.len())
}

fn apply(conn: &Connection, step: &SchemaStep) -> GraphResult<()> {
    log::debug!("Applying schema step v{:03} ({})", step.version, step.name);
    let batch = format!(
        "BEGIN TRANSACTION;\n{}\nINSERT INTO zg_graph.schema_version (version, name) VALUES ({}, '{}');\nCOMMIT;",
        step.sql, step.version, step.name
    );
    conn.execute_batch(&batch).map_err(|e| {
        let _ = conn.execute_batch("ROLLBACK");
        GraphError::MigrationError(format!(
            "step v{:03} ({}) failed: {e}",
            step.version, step.name
        ))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fresh_store_runs_every_step_once() {
        let conn = Connection::open_in_memory().unwrap();
        assert_eq!(upgrade(&conn).unwrap(), STEPS.len());
        assert_eq!(applied_version(&conn).unwrap(), SCHEMA_VERSION);
        assert_eq!(upgrade(&conn).unwrap(), 0);

        let names: Vec<String> = conn
            .prepare("SELECT name FROM zg_graph.schema_version ORDER BY version")
            .unwrap()
            .query_map([], |row| row.get(0))
            .unwrap()
            .collect::<Result<_, _>>()
            .unwrap();
        assert_eq!(names, ["initial", "feed_indexes"]);
    }

    #[test]
    fn test_partially_upgraded_store_resumes() {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch(LEDGER_DDL).unwrap();
        apply(&conn, &STEPS[0]).unwrap();

        assert_eq!(upgrade(&conn).unwrap(), STEPS.len() - 1);
        assert_eq!(applied_version(&conn).unwrap(), SCHEMA_VERSION);
    }

    #[test]
    fn test_newer_store_is_refused() {
        let conn = Connection::open_in_memory().unwrap();
        upgrade(&conn).unwrap();
        conn.execute(
            "INSERT INTO zg_graph.schema_version (version, name) VALUES (?, 'future')",
            duckdb::params![SCHEMA_VERSION + 1],
        )
        .unwrap();

        let err = upgrade(&conn).unwrap_err();
        assert!(matches!(err, GraphError::MigrationError(_)));
        assert!(err.to_string().contains("[G002]"));
    }

    #[test]
    fn test_failed_step_leaves_no_ledger_row() {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch(LEDGER_DDL).unwrap();
        let broken = SchemaStep {
            version: 1,
            name: "broken",
            sql: "CREATE TABLE zg_graph.t (a INTEGER); SELECT * FROM missing_table;",
        };

        assert!(apply(&conn, &broken).is_err());
        assert_eq!(applied_version(&conn).unwrap(), 0);
    }
}
