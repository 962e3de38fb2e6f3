use super::*;
use sqlparser::dialect::GenericDialect;
use sqlparser::parser::Parser;

fn tables(sql: &str) -> StatementTables {
    let stmts = Parser::parse_sql(&GenericDialect {}, sql).unwrap();
    statement_tables(&stmts[0])
}

#[test]
fn test_select_has_no_target() {
    let t = tables("SELECT * FROM raw.orders o JOIN raw.clients c ON o.id = c.id");
    assert!(t.target.is_none());
    assert!(t.relations.contains(&"raw.orders".to_string()));
    assert!(t.relations.contains(&"raw.clients".to_string()));
}

#[test]
fn test_insert_target() {
    let t = tables("INSERT INTO curado.orders SELECT * FROM raw.orders_staging");
    assert_eq!(
        t.target,
        Some(("curado.orders".to_string(), TargetKind::Write))
    );
    assert!(t.relations.contains(&"raw.orders_staging".to_string()));
}

#[test]
fn test_create_table_as() {
    let t = tables("CREATE TABLE ref.resumen AS SELECT * FROM cur.detalle");
    assert_eq!(t.target, Some(("ref.resumen".to_string(), TargetKind::Write)));
    assert!(t.relations.contains(&"cur.detalle".to_string()));
}

#[test]
fn test_update_target_is_first_relation() {
    let t = tables("UPDATE ref.saldos SET monto = 0 WHERE id IN (SELECT id FROM cur.bajas)");
    assert_eq!(t.target, Some(("ref.saldos".to_string(), TargetKind::Write)));
    assert!(t.relations.contains(&"cur.bajas".to_string()));
}

#[test]
fn test_merge_target() {
    let t = tables(
        "MERGE INTO con.clientes t USING ref.clientes s ON t.id = s.id \
         WHEN MATCHED THEN UPDATE SET t.nombre = s.nombre",
    );
    assert_eq!(t.target, Some(("con.clientes".to_string(), TargetKind::Write)));
    assert!(t.relations.contains(&"ref.clientes".to_string()));
}

#[test]
fn test_delete_target() {
    let t = tables("DELETE FROM con.saldos WHERE fecha = '2024-01-01'");
    assert_eq!(t.target, Some(("con.saldos".to_string(), TargetKind::Delete)));
}

#[test]
fn test_cte_names_collected() {
    let t = tables(
        "WITH base AS (SELECT * FROM raw.movs), agg AS (SELECT * FROM base) \
         SELECT * FROM agg",
    );
    assert!(t.ctes.contains("base"));
    assert!(t.ctes.contains("agg"));
    assert!(t.relations.contains(&"raw.movs".to_string()));
}

#[test]
fn test_with_insert_target() {
    let t = tables(
        "WITH base AS (SELECT * FROM raw.movs) INSERT INTO cur.movs SELECT * FROM base",
    );
    assert_eq!(t.target, Some(("cur.movs".to_string(), TargetKind::Write)));
    assert!(t.ctes.contains("base"));
}

#[test]
fn test_quoted_identifiers_unquoted() {
    let t = tables("SELECT * FROM \"Raw\".\"Orders\"");
    assert_eq!(t.relations, vec!["Raw.Orders".to_string()]);
}
