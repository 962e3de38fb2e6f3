//! Cross-sink behaviour: every store agrees on what an upsert creates.

use tempfile::TempDir;
use zg_core::{LineageEdge, LineageGraph, TableName, TableRef, TermId, Zone};
use zg_graph::{DuckDbGraphSink, GraphSink, MemoryGraphSink};

fn t(name: &str, zone: Zone) -> TableRef {
    TableRef::new(TableName::new(name), zone)
}

fn graph() -> LineageGraph {
    let mut graph = LineageGraph::new();
    for (src, tgt, term) in [
        (t("origen.pagos", Zone::Origen), t("raw.pagos", Zone::Raw), "ING_PAGOS"),
        (t("raw.pagos", Zone::Raw), t("curado.pagos", Zone::Curado), "CUR_PAGOS"),
        (t("curado.pagos", Zone::Curado), t("datamart_riesgo.pagos", Zone::Datamart), "DM_PAGOS"),
        (
            t("datamart_riesgo.pagos", Zone::Datamart),
            t("datamart_riesgo.pagos_resumen", Zone::Datamart),
            "DM_RESUMEN",
        ),
    ] {
        graph.add_edge(&LineageEdge::new(src, tgt, TermId::new(term)));
    }
    graph
}

fn upsert_twice(sink: &mut dyn GraphSink) -> (usize, usize) {
    let first = sink.upsert(&graph()).unwrap();
    let second = sink.upsert(&graph()).unwrap();
    assert_eq!(second.nodes_created, 0, "{} re-created nodes", sink.name());
    assert_eq!(second.edges_created, 0, "{} re-created edges", sink.name());
    (first.nodes_created, first.edges_created)
}

#[test]
fn test_duckdb_and_memory_agree() {
    let dir = TempDir::new().unwrap();
    let mut duck = DuckDbGraphSink::open(&dir.path().join("graph.duckdb")).unwrap();
    let mut memory = MemoryGraphSink::new();

    assert_eq!(upsert_twice(&mut duck), (5, 4));
    assert_eq!(upsert_twice(&mut memory), (5, 4));
    assert_eq!(duck.edge_count().unwrap(), memory.edge_count());
}

#[test]
fn test_duckdb_store_survives_reopen() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("graph.duckdb");

    {
        let mut sink = DuckDbGraphSink::open(&path).unwrap();
        sink.upsert(&graph()).unwrap();
    }

    let mut sink = DuckDbGraphSink::open(&path).unwrap();
    assert_eq!(sink.edge_count().unwrap(), 4);
    let again = sink.upsert(&graph()).unwrap();
    assert_eq!(again.edges_created, 0);
}
