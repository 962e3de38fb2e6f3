use super::*;

#[test]
fn test_insert_select() {
    let r = recover_tables(
        "INSERT INTO curado.orders SELECT * FROM raw.orders o JOIN raw.clients c ON o.id = c.id",
    );
    assert_eq!(r.write.as_deref(), Some("curado.orders"));
    assert_eq!(
        r.reads.iter().map(String::as_str).collect::<Vec<_>>(),
        ["raw.clients", "raw.orders"]
    );
}

#[test]
fn test_cte_names_excluded() {
    let r = recover_tables(
        "WITH base AS (SELECT * FROM raw.x) INSERT INTO cur.y SELECT * FROM base",
    );
    assert_eq!(r.write.as_deref(), Some("cur.y"));
    assert!(r.reads.contains("raw.x"));
    assert!(!r.reads.contains("base"));
}

#[test]
fn test_quotes_stripped_and_lowercased() {
    let r = recover_tables("UPDATE `Ref`.`Saldos` SET a = 1 FROM \"Raw\".\"Movs\"");
    assert_eq!(r.write.as_deref(), Some("ref.saldos"));
    assert!(r.reads.contains("raw.movs"));
}

#[test]
fn test_delete_is_separate() {
    let r = recover_tables("DELETE FROM consumo.saldos WHERE fecha IN (SELECT f FROM ref.fechas)");
    assert_eq!(r.delete.as_deref(), Some("consumo.saldos"));
    assert!(r.write.is_none());
    assert!(!r.reads.contains("consumo.saldos"));
    assert!(r.reads.contains("ref.fechas"));
}

#[test]
fn test_nothing_recovered() {
    assert!(recover_tables("lorem ipsum dolor").is_empty());
}
