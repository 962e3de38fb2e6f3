use super::*;
use serde_json::json;

fn route(key: &str, value: &str) -> AttributeRoute {
    route_attribute(&ZoneClassifier::new(), key, value)
}

#[test]
fn test_pre_and_post_queries() {
    assert_eq!(
        route("Pre-Query", "DELETE FROM con.saldos WHERE 1 = 1"),
        AttributeRoute::PreDelete
    );
    assert_eq!(
        route("post-query", "UPDATE datamart_x.t SET a = 1"),
        AttributeRoute::PostUpdate
    );
    // a pre-query without DELETE falls through to the generic SQL rule
    assert_eq!(
        route("pre-query", "SELECT * FROM raw.t"),
        AttributeRoute::Sql { hint: None }
    );
}

#[test]
fn test_connection_and_schema_keys() {
    assert_eq!(
        route("Conexion", "jdbc:oracle:thin:@db:1521/CORE"),
        AttributeRoute::Connection(Some(Zone::Origen))
    );
    assert_eq!(route("esquema", "bsc_2cur"), AttributeRoute::Schema);
}

#[test]
fn test_hbase_lane() {
    assert_eq!(route("InsertHBase Tabla", "ns:clientes"), AttributeRoute::HBaseTarget);
    assert_eq!(
        route("InsertHBase Query", "SELECT * FROM ref.clientes"),
        AttributeRoute::HBaseSql
    );
}

#[test]
fn test_origen_query() {
    assert_eq!(
        route("Origen Query", "SELECT * FROM dbo.clientes"),
        AttributeRoute::Sql {
            hint: Some(Zone::Origen)
        }
    );
}

#[test]
fn test_landing_keys() {
    assert_eq!(route("Ruta Archivo", "/data/in/clientes.csv"), AttributeRoute::LandingFile);
    assert_eq!(route("landing_path", "clientes"), AttributeRoute::LandingFile);
    assert_eq!(route("file encoding", "UTF-8"), AttributeRoute::Ignored);
}

#[test]
fn test_ing_keys() {
    assert_eq!(
        route("ING Tabla RAW", "raw.clientes"),
        AttributeRoute::Targets {
            hint: Some(Zone::Raw)
        }
    );
    assert_eq!(
        route("ing_query_3ref:", "INSERT INTO x SELECT * FROM y"),
        AttributeRoute::Sql {
            hint: Some(Zone::Refinado)
        }
    );
    assert_eq!(
        route("ING Tabla XYZ", "t"),
        AttributeRoute::Targets { hint: None }
    );
}

#[test]
fn test_insert_query_keys() {
    assert_eq!(
        route("Query Insertar", "INSERT INTO a SELECT * FROM b"),
        AttributeRoute::Sql { hint: None }
    );
    assert_eq!(
        route("InsertKudu Query", "UPSERT INTO a SELECT * FROM b"),
        AttributeRoute::Sql {
            hint: Some(Zone::Consumo)
        }
    );
}

#[test]
fn test_destination_and_source_keys() {
    assert_eq!(
        route("Tabla Destino Raw", "raw.a"),
        AttributeRoute::Targets {
            hint: Some(Zone::Raw)
        }
    );
    assert_eq!(
        route("destino", "cur.a"),
        AttributeRoute::Targets { hint: None }
    );
    assert_eq!(
        route("tabla_origen", "raw.a, raw.b"),
        AttributeRoute::Sources { hint: None }
    );
}

#[test]
fn test_value_based_rules() {
    assert_eq!(
        route("misc", "select a\nfrom raw.t"),
        AttributeRoute::Sql { hint: None }
    );
    assert_eq!(route("misc", "/apps/landing/in"), AttributeRoute::LandingFile);
    assert_eq!(route("misc", "just text"), AttributeRoute::Ignored);
    assert_eq!(route("misc", "   "), AttributeRoute::Ignored);
}

#[test]
fn test_looks_like_path() {
    assert!(looks_like_path("/data/in/file.csv"));
    assert!(looks_like_path("./relative/dir"));
    assert!(looks_like_path("folder/file.txt"));
    assert!(looks_like_path(r"\\server\share\dir"));
    assert!(!looks_like_path("raw.orders"));
    assert!(!looks_like_path("plain"));
}

#[test]
fn test_value_text() {
    assert_eq!(value_text(&json!("a")), "a");
    assert_eq!(value_text(&json!(["a", "", "b"])), "a\nb");
    assert_eq!(value_text(&json!(3)), "3");
    assert_eq!(value_text(&json!(null)), "");
    assert_eq!(value_text(&json!({"k": "v"})), "");
}
