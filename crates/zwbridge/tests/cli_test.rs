//! Integration tests for the `zwbridge` CLI binary.
//!
//! Scenarios are written to a temp dir and replayed through the
//! in-memory controller; config tests point `--config` at temp files.
#![allow(clippy::unwrap_used)]

use std::path::{Path, PathBuf};

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;

// ── Helpers ─────────────────────────────────────────────────────────

/// Build a [`Command`] for the `zwbridge` binary with env isolation.
///
/// Clears `ZWBRIDGE_*` env vars and points config directories at a
/// nonexistent path so tests never touch the user's real configuration.
fn zwbridge_cmd() -> assert_cmd::Command {
    let mut cmd = cargo_bin_cmd!("zwbridge");
    cmd.env("HOME", "/tmp/zwbridge-cli-test-nonexistent")
        .env("XDG_CONFIG_HOME", "/tmp/zwbridge-cli-test-nonexistent")
        .env("NO_COLOR", "1")
        .env_remove("RUST_LOG")
        .env_remove("ZWBRIDGE_CONFIG")
        .env_remove("ZWBRIDGE_DEVICE")
        .env_remove("ZWBRIDGE_OUTPUT");
    cmd
}

const SCENARIO: &str = r#"{
    "network": {
        "home_id": 100,
        "nodes": [
            {
                "node_id": 5,
                "manufacturer": "Aeotec",
                "neighbors": [1],
                "values": [
                    { "command_class": 38, "type": "byte", "data": 7 },
                    { "command_class": 37, "type": "bool", "data": false }
                ]
            }
        ]
    },
    "steps": [
        { "step": "notify", "kind": "driver-ready" },
        { "step": "notify", "kind": "node-added", "node_id": 5 },
        { "step": "update", "node_id": 5, "command_class": 38, "data": 42 }
    ],
    "commands": [
        { "command": "get-node-neighbors", "node_id": 5 }
    ]
}"#;

fn write_scenario(dir: &Path, body: &str) -> PathBuf {
    let path = dir.join("scenario.json");
    std::fs::write(&path, body).unwrap();
    path
}

fn demo_scenario() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("../../demos/living-room.json")
}

// ── Basic invocation ────────────────────────────────────────────────

#[test]
fn test_no_args_shows_help() {
    let output = zwbridge_cmd().output().unwrap();
    assert_eq!(output.status.code(), Some(2), "Expected exit code 2");
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Usage"), "Expected 'Usage' in:\n{stderr}");
}

#[test]
fn test_help_lists_commands() {
    zwbridge_cmd().arg("--help").assert().success().stdout(
        predicate::str::contains("replay").and(predicate::str::contains("config")),
    );
}

#[test]
fn test_invalid_output_format() {
    zwbridge_cmd()
        .args(["-o", "yaml", "config", "path"])
        .assert()
        .failure()
        .code(2);
}

// ── Replay ──────────────────────────────────────────────────────────

#[test]
fn test_replay_plain_event_stream() {
    let dir = tempfile::tempdir().unwrap();
    let scenario = write_scenario(dir.path(), SCENARIO);

    let output = zwbridge_cmd()
        .args(["-o", "plain", "replay"])
        .arg(&scenario)
        .output()
        .unwrap();
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    let lines: Vec<&str> = stdout.lines().collect();
    assert_eq!(lines[0], "connected");
    assert_eq!(lines[1], "driver ready 100");
    assert_eq!(lines[2], "node added 5");
    assert!(lines[3].starts_with("value changed 5 38 {"));
    assert!(lines[3].contains("\"value\":42"));
    assert_eq!(lines[4], "neighbors 5 [1]");
    assert_eq!(lines.len(), 5);
}

#[test]
fn test_replay_json_compact_lines() {
    let dir = tempfile::tempdir().unwrap();
    let scenario = write_scenario(dir.path(), SCENARIO);

    let output = zwbridge_cmd()
        .args(["-o", "json-compact", "replay"])
        .arg(&scenario)
        .output()
        .unwrap();
    assert!(output.status.success());

    let names: Vec<String> = String::from_utf8_lossy(&output.stdout)
        .lines()
        .map(|l| {
            let doc: serde_json::Value = serde_json::from_str(l).unwrap();
            doc["event"].as_str().unwrap().to_owned()
        })
        .collect();
    assert_eq!(
        names,
        vec![
            "connected",
            "driver ready",
            "node added",
            "value changed",
            "neighbors"
        ]
    );
}

#[test]
fn test_replay_table_and_nodes() {
    let dir = tempfile::tempdir().unwrap();
    let scenario = write_scenario(dir.path(), SCENARIO);

    zwbridge_cmd()
        .args(["replay", "--nodes"])
        .arg(&scenario)
        .assert()
        .success()
        .stdout(
            predicate::str::contains("Event")
                .and(predicate::str::contains("driver ready"))
                .and(predicate::str::contains("Polling"))
                .and(predicate::str::contains("0x00000064")),
        );
}

#[test]
fn test_replay_table_names_the_node_of_each_event() {
    let dir = tempfile::tempdir().unwrap();
    let scenario = write_scenario(dir.path(), SCENARIO);

    zwbridge_cmd()
        .arg("replay")
        .arg(&scenario)
        .assert()
        .success()
        .stdout(
            predicate::str::contains("Node")
                .and(predicate::str::contains("node added"))
                .and(predicate::str::contains("Polling").not()),
        );
}

#[test]
fn test_replay_demo_scenario() {
    zwbridge_cmd()
        .args(["-o", "plain", "replay"])
        .arg(demo_scenario())
        .assert()
        .success()
        .stdout(
            predicate::str::contains("scan complete")
                .and(predicate::str::contains("scenes list [{\"sceneid\":1,\"label\":\"Movie\"}]"))
                .and(predicate::str::contains("scene values list"))
                .and(predicate::str::contains("notification 6 3"))
                .and(predicate::str::contains("neighbors 4 [1,6]")),
        );
}

#[test]
fn test_replay_missing_scenario() {
    zwbridge_cmd()
        .args(["replay", "/tmp/zwbridge-cli-test-nonexistent/none.json"])
        .assert()
        .failure()
        .code(4)
        .stderr(predicate::str::contains("Could not read"));
}

#[test]
fn test_replay_malformed_scenario() {
    let dir = tempfile::tempdir().unwrap();
    let scenario = write_scenario(dir.path(), r#"{ "steps": [] }"#);

    zwbridge_cmd()
        .arg("replay")
        .arg(&scenario)
        .assert()
        .failure()
        .code(2)
        .stderr(predicate::str::contains("Invalid scenario"));
}

#[test]
fn test_replay_update_of_unknown_value_fails() {
    let dir = tempfile::tempdir().unwrap();
    let scenario = write_scenario(
        dir.path(),
        r#"{
            "network": { "home_id": 1 },
            "steps": [ { "step": "update", "node_id": 9, "command_class": 38, "data": 1 } ]
        }"#,
    );

    zwbridge_cmd()
        .arg("replay")
        .arg(&scenario)
        .assert()
        .failure()
        .code(2)
        .stderr(predicate::str::contains("Invalid scenario"));
}

// ── Config ──────────────────────────────────────────────────────────

#[test]
fn test_config_path_honours_flag() {
    zwbridge_cmd()
        .args(["config", "path", "--config", "/tmp/custom-zwbridge.toml"])
        .assert()
        .success()
        .stdout(predicate::str::contains("/tmp/custom-zwbridge.toml"));
}

#[test]
fn test_config_init_then_show() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");

    zwbridge_cmd()
        .args(["config", "init", "--config"])
        .arg(&path)
        .assert()
        .success();
    assert!(path.exists());

    zwbridge_cmd()
        .args(["config", "init", "--config"])
        .arg(&path)
        .assert()
        .failure()
        .code(6);

    zwbridge_cmd()
        .args(["-o", "json", "config", "show", "--config"])
        .arg(&path)
        .assert()
        .success()
        .stdout(
            predicate::str::contains("\"poll_interval\": 30000")
                .and(predicate::str::contains("/dev/ttyUSB0")),
        );
}

#[test]
fn test_config_show_rejects_zero_poll_interval() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(&path, "[options]\npoll_interval = 0\n").unwrap();

    zwbridge_cmd()
        .args(["config", "show", "--config"])
        .arg(&path)
        .assert()
        .failure()
        .code(2)
        .stderr(predicate::str::contains("poll_interval"));
}
