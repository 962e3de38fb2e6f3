//! Integration tests for the `zg` binary.

use std::fs;
use std::path::Path;
use std::process::Command;
use tempfile::TempDir;

/// Path to the compiled zg binary
fn zg_bin() -> String {
    env!("CARGO_BIN_EXE_zg").to_string()
}

/// Run `zg` in `project` and return (stdout, stderr, exit code).
fn run_zg(project: &Path, args: &[&str]) -> (String, String, Option<i32>) {
    let output = Command::new(zg_bin())
        .arg("--project-dir")
        .arg(project)
        .args(args)
        .env_remove("ATLAS_URL")
        .env_remove("ATLAS_USERNAME")
        .env_remove("ATLAS_PASSWORD")
        .env("RUST_LOG", "warn")
        .output()
        .unwrap_or_else(|e| panic!("Failed to execute zg with args {:?}: {}", args, e));
    (
        String::from_utf8_lossy(&output.stdout).to_string(),
        String::from_utf8_lossy(&output.stderr).to_string(),
        output.status.code(),
    )
}

/// A project on default settings: one CSV term, one mirrored term, one missing term.
fn sample_project() -> TempDir {
    let dir = TempDir::new().unwrap();
    fs::write(
        dir.path().join("terms.csv"),
        "atlas_term,owner\nING_ORDERS,ana\nMISSING_TERM,luis\n",
    )
    .unwrap();

    let flows = dir.path().join("nifi-flows-repo").join("Prod").join("orders");
    fs::create_dir_all(&flows).unwrap();
    fs::write(
        flows.join("ING_ORDERS.json"),
        r#"{"query insert": "INSERT INTO curado.orders SELECT * FROM raw.orders_staging"}"#,
    )
    .unwrap();
    fs::write(
        flows.join("CUR_PAYMENTS.json"),
        r#"{"query insert": "INSERT INTO refinado.payments SELECT * FROM curado.payments"}"#,
    )
    .unwrap();
    dir
}

#[test]
fn test_terms_lists_csv_then_mirror() {
    let project = sample_project();
    let (stdout, _, code) = run_zg(project.path(), &["terms"]);

    assert_eq!(code, Some(0));
    let terms: Vec<&str> = stdout.lines().collect();
    assert_eq!(terms, vec!["ING_ORDERS", "MISSING_TERM", "CUR_PAYMENTS"]);
}

#[test]
fn test_plan_only_run_writes_plan_and_failures() {
    let project = sample_project();
    let (stdout, stderr, code) = run_zg(project.path(), &["run", "--plan-only"]);
    assert_eq!(code, Some(0), "stdout: {stdout}\nstderr: {stderr}");

    let plan = fs::read_to_string(project.path().join("target/lineage_plan.csv")).unwrap();
    assert!(plan.contains("orders_staging,Raw,orders,Curado,ING_ORDERS"));
    assert!(plan.contains("payments,Curado,payments,Refinado,CUR_PAYMENTS"));

    let failures = fs::read_to_string(project.path().join("target/failures.csv")).unwrap();
    assert!(failures.contains("MISSING_TERM,LocatorNotFound"));
    assert!(!project.path().join("target/zonegraph.duckdb").exists());
}

#[test]
fn test_persist_run_then_wipe() {
    let project = sample_project();
    let (_, stderr, code) = run_zg(project.path(), &["run"]);
    assert_eq!(code, Some(0), "stderr: {stderr}");
    assert!(project.path().join("target/zonegraph.duckdb").exists());

    let (_, _, code) = run_zg(project.path(), &["run"]);
    assert_eq!(code, Some(0));

    let (_, _, code) = run_zg(project.path(), &["wipe", "--yes"]);
    assert_eq!(code, Some(0));
}

#[test]
fn test_wipe_requires_confirmation() {
    let project = sample_project();
    let (_, stderr, code) = run_zg(project.path(), &["wipe"]);
    assert_eq!(code, Some(2));
    assert!(stderr.contains("--yes"));
}

#[test]
fn test_cypher_sink_writes_script() {
    let project = sample_project();
    let (_, _, code) = run_zg(project.path(), &["run", "--sink", "cypher", "--terms", "ING_ORDERS"]);
    assert_eq!(code, Some(0));

    let script = fs::read_to_string(project.path().join("target/zonegraph.cypher")).unwrap();
    assert!(script.contains("ALIMENTA_A"));
}

#[test]
fn test_failed_output_exits_non_zero() {
    let project = sample_project();
    // A directory where the plan file should go makes the export fail.
    fs::create_dir_all(project.path().join("blocked.csv")).unwrap();

    let (_, stderr, code) = run_zg(
        project.path(),
        &["run", "--plan-only", "--output", project.path().join("blocked.csv").to_str().unwrap()],
    );
    assert_eq!(code, Some(1));
    assert!(stderr.contains("Output step failed"));

    let failures = fs::read_to_string(project.path().join("target/failures.csv")).unwrap();
    assert!(failures.contains("*,SinkWriteFailure"));
}

#[test]
fn test_extract_json_output() {
    let project = sample_project();
    let file = project
        .path()
        .join("nifi-flows-repo/Prod/orders/ING_ORDERS.json");
    let (stdout, _, code) = run_zg(
        project.path(),
        &["extract", file.to_str().unwrap(), "--format", "json"],
    );
    assert_eq!(code, Some(0));

    let rendered: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(rendered["edges"][0]["provenance"], "ING_ORDERS");
}
