//! Smoke tests to verify command wiring

use assert_cmd::Command;
use predicates::prelude::*;

#[test]
fn test_tables_help() {
    let mut cmd = Command::cargo_bin("gpkgctl").unwrap();
    cmd.arg("tables").arg("--help");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("Path to the GeoPackage container"));
}

#[test]
fn test_fields_help() {
    let mut cmd = Command::cargo_bin("gpkgctl").unwrap();
    cmd.arg("fields").arg("--help");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("Table to list fields for"));
}

#[test]
fn test_domains_help() {
    let mut cmd = Command::cargo_bin("gpkgctl").unwrap();
    cmd.arg("domains").arg("--help");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("Show one domain with its rows"));
}

#[test]
fn test_describe_help() {
    let mut cmd = Command::cargo_bin("gpkgctl").unwrap();
    cmd.arg("describe").arg("--help");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("Field to describe"));
}

#[test]
fn test_validate_help() {
    let mut cmd = Command::cargo_bin("gpkgctl").unwrap();
    cmd.arg("validate").arg("--help");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("Table to validate against"));
}

#[test]
fn test_browse_help() {
    let mut cmd = Command::cargo_bin("gpkgctl").unwrap();
    cmd.arg("browse").arg("--help");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("interactively"));
}

#[test]
fn test_completions_bash() {
    let mut cmd = Command::cargo_bin("gpkgctl").unwrap();
    cmd.arg("completions").arg("bash");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("gpkgctl"));
}

#[test]
fn test_missing_container_fails() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("absent.gpkg");

    let mut cmd = Command::cargo_bin("gpkgctl").unwrap();
    cmd.arg("tables").arg("--db").arg(&path);

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("failed to open container"));
}
