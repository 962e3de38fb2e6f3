use super::*;

#[test]
fn test_strips_comments() {
    let out = sanitize("SELECT a /* block\ncomment */ FROM t -- trailing\nWHERE x = 1");
    assert!(!out.contains("block"));
    assert!(!out.contains("trailing"));
    assert!(out.contains("WHERE x = 1"));
}

#[test]
fn test_nifi_el_becomes_placeholder() {
    let out = sanitize("INSERT INTO ${ENTIDAD}_raw.movimientos SELECT 1");
    assert!(out.contains("zgvar_ENTIDAD_raw.movimientos"));
}

#[test]
fn test_nifi_el_with_function() {
    let out = sanitize("SELECT * FROM ${ENTORNO:substring(0,2)}_cur.t");
    assert!(out.contains("zgvar_ENTORNO_cur.t"));
}

#[test]
fn test_nested_el_resolved_inside_out() {
    let out = sanitize("SELECT * FROM ${prefix:append(${SUFFIX})}.t");
    assert!(!out.contains('{'));
    assert!(!out.contains('}'));
    assert!(out.contains("zgvar_prefix.t"));
}

#[test]
fn test_bare_dollar_variable() {
    let out = sanitize("SELECT * FROM $ENTIDAD_3ref.clientes");
    assert!(out.contains("zgvar_ENTIDAD_3ref.clientes"));
}

#[test]
fn test_insert_statement_marker_removed() {
    let out = sanitize("$INSERT_STATEMENT SELECT 1");
    assert!(!out.to_lowercase().contains("insert_statement"));
}

#[test]
fn test_upsert_rewritten() {
    let out = sanitize("upsert into consumo.saldos SELECT * FROM ref.saldos");
    assert!(out.starts_with("INSERT INTO consumo.saldos"));
}

#[test]
fn test_select_top_removed() {
    let out = sanitize("SELECT TOP 100 * FROM dbo.clientes");
    assert_eq!(out, "SELECT * FROM dbo.clientes");
}

#[test]
fn test_operator_placeholder_becomes_equals() {
    let out = sanitize("SELECT * FROM t WHERE fecha ${FILTRO} CAST('2024-01-01' AS DATE)");
    assert!(out.contains("fecha = CAST("));
}

#[test]
fn test_operator_placeholder_after_keyword_kept() {
    let out = sanitize("SELECT * FROM t WHERE ${COL} (1)");
    assert!(out.contains("WHERE zgvar_COL (1)"));
}

#[test]
fn test_partition_clause_removed() {
    let out = sanitize("INSERT INTO raw.t PARTITION (fecha='2024') SELECT * FROM land.t");
    assert!(!out.to_uppercase().contains("PARTITION"));
}

#[test]
fn test_impala_statements_removed() {
    let out = sanitize("INSERT INTO a SELECT * FROM b; COMPUTE STATS a; INVALIDATE METADATA a;");
    assert!(!out.contains("COMPUTE"));
    assert!(!out.contains("INVALIDATE"));
    assert!(out.contains("INSERT INTO a"));
}

#[test]
fn test_spaced_operators_collapsed() {
    let out = sanitize("SELECT * FROM t WHERE a > = 1 AND b < = 2 AND c ! = 3");
    assert!(out.contains("a >= 1"));
    assert!(out.contains("b <= 2"));
    assert!(out.contains("c != 3"));
}

#[test]
fn test_restore_placeholders() {
    assert_eq!(
        restore_placeholders("zgvar_entidad_raw.movimientos"),
        "$entidad_raw.movimientos"
    );
    assert_eq!(restore_placeholders("plain.table"), "plain.table");
}
