use super::*;
use crate::table::TableName;
use crate::zone::Zone;

fn t(name: &str, zone: Zone) -> TableRef {
    TableRef::new(TableName::new(name), zone)
}

fn edge(src: TableRef, tgt: TableRef, term: &str) -> LineageEdge {
    LineageEdge::new(src, tgt, TermId::new(term))
}

#[test]
fn test_empty_graph() {
    let graph = LineageGraph::new();
    assert!(graph.is_empty());
    assert_eq!(graph.node_count(), 0);
    assert_eq!(graph.edge_count(), 0);
    assert!(graph.edges().is_empty());
}

#[test]
fn test_add_edge_creates_nodes() {
    let mut graph = LineageGraph::new();
    let raw = t("orders_staging", Zone::Raw);
    let cur = t("orders", Zone::Curado);

    assert!(graph.add_edge(&edge(raw.clone(), cur.clone(), "T1")));
    assert_eq!(graph.node_count(), 2);
    assert_eq!(graph.edge_count(), 1);
    assert!(graph.contains_node(&raw));
    assert!(graph.contains_edge(&raw, &cur));
    assert!(!graph.contains_edge(&cur, &raw));
}

#[test]
fn test_duplicate_pair_keeps_first_provenance() {
    let mut graph = LineageGraph::new();
    let raw = t("a", Zone::Raw);
    let cur = t("b", Zone::Curado);

    assert!(graph.add_edge(&edge(raw.clone(), cur.clone(), "first")));
    assert!(!graph.add_edge(&edge(raw.clone(), cur.clone(), "second")));

    assert_eq!(graph.edge_count(), 1);
    assert_eq!(graph.provenance(&raw, &cur).unwrap().as_str(), "first");
}

#[test]
fn test_same_name_different_zone_are_distinct_nodes() {
    let mut graph = LineageGraph::new();
    graph.add_edge(&edge(t("orders", Zone::Raw), t("orders", Zone::Curado), "T"));
    assert_eq!(graph.node_count(), 2);
}

#[test]
fn test_non_admissible_edge_refused() {
    let mut graph = LineageGraph::new();
    assert!(!graph.add_edge(&edge(t("a", Zone::Curado), t("b", Zone::Raw), "T")));
    assert!(!graph.add_edge(&edge(t("a", Zone::Raw), t("b", Zone::Raw), "T")));
    assert!(graph.is_empty());
}

#[test]
fn test_datamart_to_datamart_accepted() {
    let mut graph = LineageGraph::new();
    assert!(graph.add_edge(&edge(
        t("ventas.base", Zone::Datamart),
        t("ventas.resumen", Zone::Datamart),
        "T"
    )));
}

#[test]
fn test_edges_in_insertion_order() {
    let mut graph = LineageGraph::new();
    graph.add_edge(&edge(t("c", Zone::Raw), t("d", Zone::Curado), "1"));
    graph.add_edge(&edge(t("a", Zone::Landing), t("b", Zone::Raw), "2"));

    let edges = graph.edges();
    assert_eq!(edges[0].provenance.as_str(), "1");
    assert_eq!(edges[1].provenance.as_str(), "2");
}

#[test]
fn test_merge() {
    let mut left = LineageGraph::new();
    left.add_edge(&edge(t("a", Zone::Raw), t("b", Zone::Curado), "L"));

    let mut right = LineageGraph::new();
    right.add_edge(&edge(t("a", Zone::Raw), t("b", Zone::Curado), "R"));
    right.add_edge(&edge(t("b", Zone::Curado), t("c", Zone::Refinado), "R"));

    let added = left.merge(&right);
    assert_eq!(added, 1);
    assert_eq!(left.edge_count(), 2);
    assert_eq!(left.node_count(), 3);
    assert_eq!(
        left.provenance(&t("a", Zone::Raw), &t("b", Zone::Curado))
            .unwrap()
            .as_str(),
        "L"
    );
}

#[test]
fn test_sources_of() {
    let mut graph = LineageGraph::new();
    let target = t("fact", Zone::Consumo);
    graph.add_edge(&edge(t("z", Zone::Refinado), target.clone(), "T"));
    graph.add_edge(&edge(t("a", Zone::Curado), target.clone(), "T"));

    let sources = graph.sources_of(&target);
    assert_eq!(sources.len(), 2);
    assert_eq!(sources[0].name, "a");
    assert!(graph.sources_of(&t("missing", Zone::Raw)).is_empty());
}
