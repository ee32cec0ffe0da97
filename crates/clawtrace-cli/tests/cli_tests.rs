use assert_cmd::Command;
use clawtrace_testing::LogDir;
use predicates::prelude::*;
use serde_json::json;
use tempfile::TempDir;

fn seeded_logs() -> LogDir {
    let logs = LogDir::new().unwrap();
    logs.append(
        "2025-01-15",
        &[
            clawtrace_testing::lines::tool_start(
                "abc12345",
                "exec",
                json!({"command": "ls"}),
                "2025-01-15T10:00:00Z",
            ),
            clawtrace_testing::lines::tool_end(
                "abc12345",
                "exec",
                "file.txt",
                12,
                "2025-01-15T10:00:01Z",
            ),
            clawtrace_testing::lines::turn_end("abc12345", "2025-01-15T10:00:02Z"),
        ],
    )
    .unwrap();
    logs
}

fn clawtrace() -> Command {
    Command::cargo_bin("clawtrace").unwrap()
}

#[test]
fn test_sessions_lists_seeded_session() {
    let logs = seeded_logs();
    let data = TempDir::new().unwrap();

    clawtrace()
        .args(["--log-dir"])
        .arg(logs.path())
        .arg("--data-dir")
        .arg(data.path())
        .arg("sessions")
        .assert()
        .success()
        .stdout(predicate::str::contains("abc12345"));
}

#[test]
fn test_trace_json_is_valid_event_array() {
    let logs = seeded_logs();
    let data = TempDir::new().unwrap();

    let output = clawtrace()
        .args(["--log-dir"])
        .arg(logs.path())
        .arg("--data-dir")
        .arg(data.path())
        .args(["trace", "abc", "--json"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let events: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let events = events.as_array().unwrap();
    assert_eq!(events.len(), 2);
    assert_eq!(events[0]["kind"], json!("tool_start"));
    assert_eq!(events[1]["kind"], json!("tool_end"));
    assert_eq!(events[1]["input"]["command"], json!("ls"));
}

#[test]
fn test_index_reports_session_count() {
    let logs = seeded_logs();
    let data = TempDir::new().unwrap();

    clawtrace()
        .args(["--data-dir"])
        .arg(data.path())
        .arg("index")
        .arg(logs.file("2025-01-15"))
        .assert()
        .success()
        .stdout(predicate::str::contains("1 sessions"));
}

#[test]
fn test_trace_unknown_session_reports_empty() {
    let logs = seeded_logs();
    let data = TempDir::new().unwrap();

    clawtrace()
        .args(["--log-dir"])
        .arg(logs.path())
        .arg("--data-dir")
        .arg(data.path())
        .args(["trace", "nope"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No events"));
}

#[test]
fn test_sessions_on_empty_dir() {
    let logs = LogDir::new().unwrap();
    let data = TempDir::new().unwrap();

    clawtrace()
        .args(["--log-dir"])
        .arg(logs.path())
        .arg("--data-dir")
        .arg(data.path())
        .arg("sessions")
        .assert()
        .success()
        .stdout(predicate::str::contains("No sessions found"));
}
