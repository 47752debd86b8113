//! Integration tests for `devfleet plan`.
//!
//! Every test runs in a temp directory with `DEVFLEET_CONFIG` pointing into
//! it, so the default `resource_exports.json` is never read from the repo.

#![allow(clippy::expect_used, clippy::unwrap_used)]

use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn devfleet(dir: &Path) -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("devfleet"));
    cmd.current_dir(dir)
        .env("DEVFLEET_CONFIG", dir.join("devfleet.yaml"))
        .env("NO_COLOR", "1")
        .env_remove("RUST_LOG");
    cmd
}

fn write_snapshot(dir: &Path, json: &str) {
    std::fs::write(dir.join("resource_exports.json"), json).expect("write snapshot");
}

fn plan_json(dir: &Path, extra: &[&str]) -> serde_json::Value {
    let output = devfleet(dir)
        .args(["--json", "plan"])
        .args(extra)
        .output()
        .expect("run");
    assert!(output.status.success(), "plan failed: {output:?}");
    serde_json::from_slice(&output.stdout).expect("valid JSON")
}

#[test]
fn test_plan_without_snapshot_creates_everything() {
    let dir = TempDir::new().expect("temp dir");
    devfleet(dir.path())
        .arg("plan")
        .assert()
        .success()
        .stdout(predicate::str::contains("No snapshot"))
        .stdout(predicate::str::contains("dev-fleet-containers"))
        .stdout(predicate::str::contains("import").not());
}

#[test]
fn test_plan_imports_repository_from_snapshot() {
    let dir = TempDir::new().expect("temp dir");
    write_snapshot(
        dir.path(),
        r#"{"ecr_repositories": ["dev-fleet-containers"], "efs_filesystems": {}, "ecs_clusters": []}"#,
    );
    devfleet(dir.path())
        .arg("plan")
        .assert()
        .success()
        .stdout(predicate::str::contains("import dev-fleet-containers"));
}

#[test]
fn test_plan_json_reports_filesystem_id() {
    let dir = TempDir::new().expect("temp dir");
    write_snapshot(
        dir.path(),
        r#"{"efs_filesystems": {"dev-fleet-persistent-storage": "fs-0abc1234"}}"#,
    );

    let doc = plan_json(dir.path(), &[]);

    assert_eq!(doc["snapshot_found"], true);
    let entries = doc["entries"].as_array().expect("entries");
    assert_eq!(entries.len(), 3);
    assert_eq!(entries[1]["category"], "file_system");
    assert_eq!(entries[1]["decision"]["action"], "import");
    assert_eq!(entries[1]["decision"]["id"], "fs-0abc1234");
    assert_eq!(entries[0]["decision"]["action"], "create");
}

#[test]
fn test_plan_uses_configured_names() {
    let dir = TempDir::new().expect("temp dir");
    std::fs::write(
        dir.path().join("devfleet.yaml"),
        "cluster:\n  name: team-cluster\n",
    )
    .expect("write config");
    write_snapshot(dir.path(), r#"{"ecs_clusters": ["team-cluster"]}"#);

    let doc = plan_json(dir.path(), &[]);

    assert_eq!(doc["entries"][2]["name"], "team-cluster");
    assert_eq!(doc["entries"][2]["decision"]["action"], "import");
}

#[test]
fn test_plan_snapshot_flag_overrides_config() {
    let dir = TempDir::new().expect("temp dir");
    let other = dir.path().join("elsewhere.json");
    std::fs::write(&other, r#"{"ecr_repositories": ["dev-fleet-containers"]}"#)
        .expect("write snapshot");

    let doc = plan_json(dir.path(), &["--snapshot", other.to_str().unwrap()]);

    assert_eq!(doc["entries"][0]["decision"]["action"], "import");
}

#[test]
fn test_plan_wrong_shaped_keys_read_as_empty() {
    let dir = TempDir::new().expect("temp dir");
    write_snapshot(
        dir.path(),
        r#"{"ecr_repositories": "not-a-list", "efs_filesystems": [1, 2], "ecs_clusters": ["dev-fleet-cluster"]}"#,
    );

    let doc = plan_json(dir.path(), &[]);

    assert_eq!(doc["entries"][0]["decision"]["action"], "create");
    assert_eq!(doc["entries"][1]["decision"]["action"], "create");
    assert_eq!(doc["entries"][2]["decision"]["action"], "import");
}

#[test]
fn test_plan_malformed_snapshot_is_tolerated_fail_open() {
    let dir = TempDir::new().expect("temp dir");
    write_snapshot(dir.path(), "{ this is not json");

    let doc = plan_json(dir.path(), &[]);

    assert_eq!(doc["snapshot_found"], false);
}

#[test]
fn test_plan_malformed_snapshot_fails_closed() {
    let dir = TempDir::new().expect("temp dir");
    write_snapshot(dir.path(), "{ this is not json");

    let output = devfleet(dir.path())
        .args(["--json", "plan", "--policy", "fail-closed"])
        .output()
        .expect("run");

    assert!(!output.status.success());
    let doc: serde_json::Value = serde_json::from_slice(&output.stdout).expect("JSON error");
    assert_eq!(doc["error"], true);
    assert_eq!(doc["code"], "COMMAND_FAILED");
}
