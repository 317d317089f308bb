//! End-to-end CLI tests over a temporary dataset file.

use assert_cmd::Command;
use predicates::prelude::*;

const DATASET: &str = r#"{
    "products": [
        {"id": "p1", "sku": "ARN-30C-001", "name": "Arnica Montana 30C",
         "hsn_code": "3004", "gst_rate": 12.0}
    ],
    "vendor_mappings": [],
    "lines": [
        {"id": "l1", "invoice_id": "inv-1", "vendor_id": "v1",
         "raw_text": "ARN-30C-001 Arnica 10ml", "parsed_description": "Arnica Montana 30C"},
        {"id": "l2", "invoice_id": "inv-1", "vendor_id": "v1",
         "raw_text": "mystery item", "parsed_description": "mystery item"}
    ]
}"#;

fn write_dataset(dir: &tempfile::TempDir) -> std::path::PathBuf {
    let path = dir.path().join("dataset.json");
    std::fs::write(&path, DATASET).unwrap();
    path
}

#[test]
fn test_help() {
    Command::cargo_bin("enrich")
        .unwrap()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Enrich a single invoice"));
}

#[test]
fn test_run_without_ai() {
    let dir = tempfile::tempdir().unwrap();
    let dataset = write_dataset(&dir);

    Command::cargo_bin("enrich")
        .unwrap()
        .args(["run", "inv-1", "--no-ai", "--format", "json", "--dataset"])
        .arg(&dataset)
        .assert()
        .success()
        .stdout(predicate::str::contains("\"sku\""))
        .stdout(predicate::str::contains("\"p1\""));
}

#[test]
fn test_run_unknown_invoice_fails() {
    let dir = tempfile::tempdir().unwrap();
    let dataset = write_dataset(&dir);

    Command::cargo_bin("enrich")
        .unwrap()
        .args(["run", "inv-missing", "--no-ai", "--dataset"])
        .arg(&dataset)
        .assert()
        .failure()
        .stderr(predicate::str::contains("inv-missing"));
}

#[test]
fn test_run_missing_dataset_fails() {
    Command::cargo_bin("enrich")
        .unwrap()
        .args(["run", "inv-1", "--no-ai", "--dataset", "/nonexistent/dataset.json"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not found"));
}

#[test]
fn test_batch_without_ai() {
    let dir = tempfile::tempdir().unwrap();
    let dataset = write_dataset(&dir);
    let out_dir = dir.path().join("out");

    Command::cargo_bin("enrich")
        .unwrap()
        .args(["batch"])
        .arg(&dataset)
        .args(["--no-ai", "--output-dir"])
        .arg(&out_dir)
        .assert()
        .success()
        .stdout(predicate::str::contains("Enriched 1 invoices"));

    assert!(out_dir.join("inv-1.json").exists());
}
