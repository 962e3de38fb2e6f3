use super::*;
use std::fs;
use tempfile::TempDir;

fn write(dir: &Path, rel: &str, content: &str) -> PathBuf {
    let path = dir.join(rel);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(&path, content).unwrap();
    path
}

#[test]
fn test_missing_directory_is_empty() {
    let dir = TempDir::new().unwrap();
    let locator = MirrorLocator::open(dir.path().join("nope")).unwrap();
    assert!(locator.is_empty());
    assert!(locator.find("anything").is_none());
}

#[test]
fn test_indexes_nested_json_only() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "Prod/flows/ALPHA.json", "{}");
    write(dir.path(), "Prod/other/deep/BETA.json", "{}");
    write(dir.path(), "Prod/flows/README.md", "notes");

    let locator = MirrorLocator::open(dir.path()).unwrap();
    assert_eq!(locator.len(), 2);
}

#[test]
fn test_exact_match_preferred_over_case_insensitive() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "a/term_x.json", "{}");
    let exact = write(dir.path(), "b/Term_X.json", "{}");

    let locator = MirrorLocator::open(dir.path()).unwrap();
    assert_eq!(locator.find("Term_X"), Some(exact.as_path()));
}

#[test]
fn test_case_insensitive_fallback_and_trim() {
    let dir = TempDir::new().unwrap();
    let path = write(dir.path(), "Prod/f/Ingesta_Ventas.json", "{}");

    let locator = MirrorLocator::open(dir.path()).unwrap();
    assert_eq!(locator.find("  ingesta_ventas "), Some(path.as_path()));
    assert!(locator.find("   ").is_none());
}

#[tokio::test]
async fn test_fetch_builds_mirror_record() {
    let dir = TempDir::new().unwrap();
    let path = write(
        dir.path(),
        "Prod/f/VENTAS.json",
        r#"{"ing_table": "raw_bsc.ventas"}"#,
    );

    let locator = MirrorLocator::open(dir.path()).unwrap();
    let record = locator
        .fetch(&TermId::new("VENTAS"))
        .await
        .unwrap()
        .unwrap();

    assert_eq!(record.id, TermId::new("VENTAS"));
    assert_eq!(record.origin, TermOrigin::Mirror);
    assert_eq!(record.display_name, path.display().to_string());
    assert_eq!(record.body["ing_table"], "raw_bsc.ventas");
    assert!(record.guid.is_none());
}

#[tokio::test]
async fn test_fetch_miss_is_none() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "x.json", "{}");

    let locator = MirrorLocator::open(dir.path()).unwrap();
    let found = locator.fetch(&TermId::new("missing")).await.unwrap();
    assert!(found.is_none());
}

#[tokio::test]
async fn test_fetch_malformed_json_is_error() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "broken.json", "{ not json");

    let locator = MirrorLocator::open(dir.path()).unwrap();
    let err = locator.fetch(&TermId::new("broken")).await.unwrap_err();
    assert!(matches!(err, LocateError::MalformedJson { .. }));
    assert!(err.to_string().contains("[L002]"));
}

#[tokio::test(flavor = "current_thread")]
async fn test_concurrent_fetches_on_single_thread_runtime() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "a/ONE.json", r#"{"n": 1}"#);
    write(dir.path(), "b/TWO.json", r#"{"n": 2}"#);

    let locator = MirrorLocator::open(dir.path()).unwrap();
    let id_one = TermId::new("ONE");
    let id_two = TermId::new("TWO");
    let (one, two) = tokio::join!(locator.fetch(&id_one), locator.fetch(&id_two));
    assert_eq!(one.unwrap().unwrap().body["n"], 1);
    assert_eq!(two.unwrap().unwrap().body["n"], 2);
}
