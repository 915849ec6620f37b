//! Basic CLI E2E tests.
//!
//! Tests invoke CLI commands via cargo run against the dev data
//! directory and verify exit codes and output shapes.

use std::process::Command;

/// Run a CLI command and return (stdout, stderr, exit code).
fn run_cli(args: &[&str]) -> (String, String, i32) {
    let output = Command::new("cargo")
        .args(["run", "-p", "classlog-cli", "--"])
        .args(args)
        .env("CLASSLOG_ENV", "dev")
        .output()
        .expect("Failed to execute CLI command");

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    let code = output.status.code().unwrap_or(-1);

    (stdout, stderr, code)
}

#[test]
fn test_session_status() {
    let (stdout, _, code) = run_cli(&["session", "status"]);
    assert_eq!(code, 0, "session status failed");
    let parsed: serde_json::Value =
        serde_json::from_str(&stdout).expect("status output is not JSON");
    assert!(parsed.get("active").is_some());
    assert!(parsed.get("modes").is_some());
}

#[test]
fn test_session_lifecycle() {
    let (stdout, _, code) = run_cli(&["session", "start", "--subject", "CLI Smoke Test"]);
    assert_eq!(code, 0, "session start failed");
    assert!(stdout.contains("session_started"));

    let (stdout, _, code) = run_cli(&["mode", "toggle", "lecture"]);
    assert_eq!(code, 0, "mode toggle failed");
    assert!(stdout.contains("mode_toggled"));

    let (stdout, _, code) = run_cli(&["action", "record", "question"]);
    assert_eq!(code, 0, "action record failed");
    assert!(stdout.contains("action_recorded"));

    let (stdout, _, code) = run_cli(&["engage", "score", "80"]);
    assert_eq!(code, 0, "engage score failed");
    assert!(stdout.contains("engagement_scored"));

    let (stdout, _, code) = run_cli(&["session", "export"]);
    assert_eq!(code, 0, "session export failed");
    assert!(stdout.contains("Subject: CLI Smoke Test"));
    assert!(stdout.contains("Teaching modes:"));

    let (_, _, code) = run_cli(&["session", "stop"]);
    assert_eq!(code, 0, "session stop failed");
}

#[test]
fn test_mode_list() {
    let (stdout, _, code) = run_cli(&["mode", "list"]);
    assert_eq!(code, 0, "mode list failed");
    let parsed: serde_json::Value = serde_json::from_str(&stdout).expect("not JSON");
    assert!(parsed.as_array().is_some());
}

#[test]
fn test_mode_toggle_unknown_id_fails() {
    let (_, stderr, code) = run_cli(&["mode", "toggle", "recess"]);
    assert_ne!(code, 0, "unknown mode unexpectedly succeeded");
    assert!(stderr.contains("unknown mode"));
}

#[test]
fn test_engage_score_out_of_range_is_rejected() {
    let (_, _, code) = run_cli(&["engage", "score", "101"]);
    assert_ne!(code, 0, "out-of-range score unexpectedly accepted");
}

#[test]
fn test_config_show() {
    let (stdout, _, code) = run_cli(&["config", "show"]);
    assert_eq!(code, 0, "config show failed");
    assert!(stdout.contains("[reminder]"));
    assert!(stdout.contains("[report]"));
}

#[test]
fn test_config_get() {
    let (stdout, _, code) = run_cli(&["config", "get", "reminder.poll_secs"]);
    assert_eq!(code, 0, "config get failed");
    assert!(!stdout.trim().is_empty());
}

#[test]
fn test_session_list() {
    let (stdout, _, code) = run_cli(&["session", "list"]);
    assert_eq!(code, 0, "session list failed");
    let parsed: serde_json::Value = serde_json::from_str(&stdout).expect("not JSON");
    assert!(parsed.as_array().is_some());
}
