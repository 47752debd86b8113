//! Integration tests for `devfleet config`.
//!
//! All filesystem-touching tests set `DEVFLEET_CONFIG` to a temp path so they
//! never read or write a `devfleet.yaml` in the working tree.

#![allow(clippy::expect_used, clippy::unwrap_used)]

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn devfleet() -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("devfleet"));
    cmd.env("NO_COLOR", "1");
    cmd
}

/// Returns a `TempDir` and the path string for a config file inside it.
fn temp_config_path() -> (TempDir, String) {
    let dir = TempDir::new().expect("temp dir");
    let path = dir
        .path()
        .join("devfleet.yaml")
        .to_string_lossy()
        .into_owned();
    (dir, path)
}

// ---------------------------------------------------------------------------
// Subcommand registration
// ---------------------------------------------------------------------------

#[test]
fn test_config_help_shows_show_and_set_subcommands() {
    devfleet()
        .args(["config", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("show"))
        .stdout(predicate::str::contains("set"));
}

// ---------------------------------------------------------------------------
// `devfleet config show`
// ---------------------------------------------------------------------------

#[test]
fn test_config_show_without_file_prints_defaults() {
    let (_dir, path) = temp_config_path();
    devfleet()
        .args(["config", "show"])
        .env("DEVFLEET_CONFIG", &path)
        .assert()
        .success()
        .stdout(predicate::str::contains("DevFleetStack"))
        .stdout(predicate::str::contains("qdev.ngdegtm.com"))
        .stdout(predicate::str::contains("dev-fleet-persistent-storage"))
        .stdout(predicate::str::contains("fail-open"));
}

#[test]
fn test_config_show_json_lists_every_key() {
    let (_dir, path) = temp_config_path();
    let output = devfleet()
        .args(["--json", "config", "show"])
        .env("DEVFLEET_CONFIG", &path)
        .output()
        .expect("run");
    assert!(output.status.success());

    let doc: serde_json::Value = serde_json::from_slice(&output.stdout).expect("valid JSON");
    assert_eq!(doc["path"], path.as_str());
    let settings = doc["settings"].as_object().expect("settings");
    assert_eq!(settings.len(), 12);
    assert_eq!(settings["registry.repository_name"], "dev-fleet-containers");
    assert_eq!(settings["dns.wildcard_certificate_arn"], "");
}

// ---------------------------------------------------------------------------
// `devfleet config set`
// ---------------------------------------------------------------------------

#[test]
fn test_config_set_persists_value() {
    let (_dir, path) = temp_config_path();
    devfleet()
        .args(["config", "set", "cluster.name", "team-cluster"])
        .env("DEVFLEET_CONFIG", &path)
        .assert()
        .success()
        .stdout(predicate::str::contains("Set cluster.name = team-cluster"));

    let content = std::fs::read_to_string(&path).expect("config written");
    assert!(content.contains("team-cluster"));

    devfleet()
        .args(["config", "show"])
        .env("DEVFLEET_CONFIG", &path)
        .assert()
        .success()
        .stdout(predicate::str::contains("team-cluster"));
}

#[test]
fn test_config_set_certificate_arn() {
    let (_dir, path) = temp_config_path();
    let arn = "arn:aws:acm:us-east-1:123456789012:certificate/0f3e9a61-2b7c-4d8e-9f10-aabbccddeeff";
    devfleet()
        .args(["config", "set", "dns.wildcard_certificate_arn", arn])
        .env("DEVFLEET_CONFIG", &path)
        .assert()
        .success();

    let content = std::fs::read_to_string(&path).expect("config written");
    assert!(content.contains(arn));
}

#[test]
fn test_config_set_unknown_key_fails() {
    let (_dir, path) = temp_config_path();
    devfleet()
        .args(["config", "set", "stack.colour", "blue"])
        .env("DEVFLEET_CONFIG", &path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown setting: stack.colour"));

    assert!(!std::path::Path::new(&path).exists());
}

#[test]
fn test_config_set_invalid_value_fails() {
    let (_dir, path) = temp_config_path();
    devfleet()
        .args(["config", "set", "policy.failure", "sometimes"])
        .env("DEVFLEET_CONFIG", &path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid value for policy.failure"));
}

#[test]
fn test_config_set_invalid_value_json_error_code() {
    let (_dir, path) = temp_config_path();
    let output = devfleet()
        .args(["--json", "config", "set", "stack.region", "mars-north"])
        .env("DEVFLEET_CONFIG", &path)
        .output()
        .expect("run");

    assert!(!output.status.success());
    let doc: serde_json::Value = serde_json::from_slice(&output.stdout).expect("JSON error");
    assert_eq!(doc["code"], "CONFIG_INVALID");
}

#[test]
fn test_config_malformed_file_fails() {
    let (_dir, path) = temp_config_path();
    std::fs::write(&path, "stack: [unclosed").expect("write");
    devfleet()
        .args(["config", "show"])
        .env("DEVFLEET_CONFIG", &path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("cannot parse"));
}
