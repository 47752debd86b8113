//! Top-level CLI surface: help, version, argument errors.

#![allow(clippy::expect_used, clippy::unwrap_used)]

use assert_cmd::Command;
use predicates::prelude::*;

fn devfleet() -> Command {
    Command::new(assert_cmd::cargo::cargo_bin!("devfleet"))
}

#[test]
fn test_help_lists_all_commands() {
    let output = devfleet().arg("--help").output().expect("run");
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    for command in ["lookup", "synth", "plan", "config", "version"] {
        assert!(stdout.contains(command), "help is missing {command}:\n{stdout}");
    }
}

#[test]
fn test_no_arguments_prints_help_and_fails() {
    devfleet()
        .assert()
        .failure()
        .stderr(predicate::str::contains("Usage"));
}

#[test]
fn test_version_flag() {
    devfleet()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_version_command_human() {
    devfleet()
        .arg("version")
        .assert()
        .success()
        .stdout(predicate::str::contains(format!(
            "devfleet {}",
            env!("CARGO_PKG_VERSION")
        )));
}

#[test]
fn test_version_command_json() {
    let output = devfleet()
        .args(["--json", "version"])
        .output()
        .expect("run");
    assert!(output.status.success());
    let doc: serde_json::Value = serde_json::from_slice(&output.stdout).expect("valid JSON");
    assert_eq!(doc["version"], env!("CARGO_PKG_VERSION"));
}

#[test]
fn test_unknown_command_fails() {
    devfleet()
        .arg("deploy")
        .assert()
        .failure()
        .stderr(predicate::str::contains("unrecognized subcommand"));
}

#[test]
fn test_synth_help_documents_flags() {
    devfleet()
        .args(["synth", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--skip-lookup"))
        .stdout(predicate::str::contains("--snapshot"))
        .stdout(predicate::str::contains("--policy"))
        .stdout(predicate::str::contains("--region"));
}

#[test]
fn test_invalid_policy_is_rejected_by_parser() {
    devfleet()
        .args(["plan", "--policy", "sometimes"])
        .assert()
        .failure();
}
