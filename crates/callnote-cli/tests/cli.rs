use assert_cmd::cargo::cargo_bin_cmd;
use serde_json::Value;
use std::fs;
use std::path::Path;
use std::process::Output;
use tempfile::TempDir;

const SUMMARY: &str = "Patient was stable and alert during visit today.";

fn run_cmd(temp: &Path, args: &[&str]) -> Output {
    let log_path = temp.join("validation_failures.log");
    cargo_bin_cmd!("callnote")
        .env("XDG_CONFIG_HOME", temp.join("config"))
        .env("XDG_DATA_HOME", temp.join("data"))
        // Nothing listens on the discard port, so every remote call fails fast.
        .env("AXISCARE_BASE_URL", "http://127.0.0.1:9/api")
        .env_remove("AXISCARE_API_TOKEN")
        .env_remove("AXISCARE_SITE_ID")
        .env_remove("CALLNOTE_BIND")
        .env_remove("RUST_LOG")
        .args(["--log-path", log_path.to_str().expect("log path")])
        .args(args)
        .output()
        .expect("run command")
}

fn write_event(temp: &Path, summary: &str) -> String {
    let path = temp.join("event.json");
    let body = serde_json::json!({
        "callId": "c1",
        "summary": summary,
        "from_number": "(512) 555-1234",
        "to_number": "5125559999",
        "timestamp": "2024-01-01T00:00:00Z"
    });
    fs::write(&path, body.to_string()).expect("write event");
    path.to_str().expect("event path").to_string()
}

#[test]
fn logs_without_failures_prints_placeholder() {
    let temp = TempDir::new().expect("temp dir");

    let output = run_cmd(temp.path(), &["logs"]);

    assert!(output.status.success(), "command failed: {:?}", output);
    assert_eq!(
        String::from_utf8(output.stdout).expect("utf8"),
        "No validation failures logged.\n"
    );
}

#[test]
fn process_rejects_short_summary_and_logs_it() {
    let temp = TempDir::new().expect("temp dir");
    let event = write_event(temp.path(), "too short");

    let output = run_cmd(temp.path(), &["--json", "process", &event]);

    assert_eq!(output.status.code(), Some(3));
    let outcome: Value = serde_json::from_slice(&output.stdout).expect("parse json");
    assert_eq!(outcome["status"], "failure");
    assert_eq!(outcome["kind"], "invalid_summary");

    let output = run_cmd(temp.path(), &["logs"]);
    assert!(output.status.success());
    let log = String::from_utf8(output.stdout).expect("utf8");
    assert!(log.starts_with("[VALIDATION FAILURE]"));
    assert!(log.contains("Call ID: c1, From: (512) 555-1234, To: 5125559999, Summary Length: 9"));
}

#[test]
fn process_with_unreachable_remote_reports_caregiver_not_found() {
    let temp = TempDir::new().expect("temp dir");
    let event = write_event(temp.path(), SUMMARY);

    let output = run_cmd(temp.path(), &["--json", "process", &event]);

    assert_eq!(output.status.code(), Some(2));
    let outcome: Value = serde_json::from_slice(&output.stdout).expect("parse json");
    assert_eq!(outcome["kind"], "caregiver_not_found");
    assert_eq!(outcome["detail"], "Caregiver not found");

    let output = run_cmd(temp.path(), &["--json", "logs"]);
    assert!(output.status.success());
    let report: Value = serde_json::from_slice(&output.stdout).expect("parse json");
    let contents = report["contents"].as_str().expect("contents");
    assert!(contents.contains("[PHONE NOT FOUND]"));
    assert!(contents.contains("Phone: 1-512-555-1234"));
}

#[test]
fn process_rejects_malformed_event() {
    let temp = TempDir::new().expect("temp dir");
    let path = temp.path().join("event.json");
    fs::write(&path, "{\"callId\": \"c1\"}").expect("write event");

    let output = run_cmd(temp.path(), &["process", path.to_str().expect("path")]);

    assert_eq!(output.status.code(), Some(3));
    let stderr = String::from_utf8(output.stderr).expect("utf8");
    assert!(stderr.contains("parse call summary event"));
}

#[test]
fn completions_cover_subcommands() {
    let temp = TempDir::new().expect("temp dir");

    let output = run_cmd(temp.path(), &["completions", "bash"]);

    assert!(output.status.success(), "command failed: {:?}", output);
    let script = String::from_utf8(output.stdout).expect("utf8");
    assert!(script.contains("callnote"));
    assert!(script.contains("process"));
    assert!(script.contains("serve"));
}
