use super::*;
use serde_json::json;

#[test]
fn test_term_query_escapes_quotes() {
    assert_eq!(
        term_query("O'Brien feed"),
        "from AtlasGlossaryTerm where name = 'O''Brien feed'"
    );
}

#[test]
fn test_first_hit_prefers_attribute_name() {
    let payload = json!({
        "entities": [
            {"guid": "g-1", "displayText": "shown", "attributes": {"name": "ING_VENTAS"}},
            {"guid": "g-2"}
        ]
    });
    let hit = first_hit(&payload, "fallback").unwrap();
    assert_eq!(hit.guid, "g-1");
    assert_eq!(hit.name, "ING_VENTAS");
}

#[test]
fn test_first_hit_name_fallbacks() {
    let display = json!({"entities": [{"guid": "g", "displayText": "shown"}]});
    assert_eq!(first_hit(&display, "term").unwrap().name, "shown");

    let bare = json!({"entities": [{"guid": "g"}]});
    assert_eq!(first_hit(&bare, "term").unwrap().name, "term");
}

#[test]
fn test_first_hit_requires_guid() {
    assert!(first_hit(&json!({"entities": []}), "t").is_none());
    assert!(first_hit(&json!({}), "t").is_none());
    assert!(first_hit(&json!({"entities": [{"guid": ""}]}), "t").is_none());
}

#[test]
fn test_classification_list_shapes() {
    let wrapped = json!({"list": [{"typeName": "A"}, "junk", {"typeName": "B"}]});
    assert_eq!(classification_list(&wrapped).len(), 2);

    let bare = json!([{"typeName": "A"}]);
    assert_eq!(classification_list(&bare).len(), 1);

    assert!(classification_list(&json!({"other": 1})).is_empty());
    assert!(classification_list(&json!("nope")).is_empty());
}

#[test]
fn test_merge_prefers_fetched_classifications() {
    let mut entity = json!({"classifications": [{"typeName": "Embedded"}]});
    merge_classifications(&mut entity, vec![json!({"typeName": "Fetched"})]);
    assert_eq!(entity["classifications"][0]["typeName"], "Fetched");
}

#[test]
fn test_merge_keeps_embedded_when_fetch_empty() {
    let mut entity = json!({"classifications": [{"typeName": "Embedded"}]});
    merge_classifications(&mut entity, Vec::new());
    assert_eq!(entity["classifications"][0]["typeName"], "Embedded");

    let mut bare = json!({"guid": "g"});
    merge_classifications(&mut bare, Vec::new());
    assert_eq!(bare["classifications"], json!([]));
}

#[test]
fn test_base_url_trailing_slash_trimmed() {
    let locator =
        AtlasLocator::new("http://atlas:21000/api/atlas/v2/", None, Duration::from_secs(5)).unwrap();
    assert_eq!(locator.base_url(), "http://atlas:21000/api/atlas/v2");
    assert_eq!(locator.name(), "atlas");
}

#[test]
fn test_credentials_debug_hides_password() {
    let creds = AtlasCredentials {
        username: "svc".to_string(),
        password: "s3cret".to_string(),
    };
    let shown = format!("{:?}", creds);
    assert!(shown.contains("svc"));
    assert!(!shown.contains("s3cret"));
}

#[tokio::test]
async fn test_unreachable_catalog_is_network_error() {
    let locator = AtlasLocator::new("http://127.0.0.1:9", None, Duration::from_secs(2)).unwrap();
    let err = locator.fetch(&TermId::new("ANY")).await.unwrap_err();
    assert!(matches!(err, LocateError::Network(_)));
}

#[tokio::test]
async fn test_blank_term_is_miss_without_request() {
    let locator = AtlasLocator::new("http://127.0.0.1:9", None, Duration::from_secs(2)).unwrap();
    assert!(locator.fetch(&TermId::new("   ")).await.unwrap().is_none());
}
