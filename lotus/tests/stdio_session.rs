//! End-to-end tests for `lotus serve` and the config commands.
//!
//! Spawns the lotus binary, writes JSON-RPC lines to stdin, closes it, and
//! inspects the response lines on stdout.

use std::io::Write;
use std::process::{Command, Stdio};

use serde_json::{Value, json};

use lotus::exit_codes;
use lotus::io::config::{LotusConfig, load_config};
use lotus::test_support::{step_json, tool_call_line};

fn serve(dir: &std::path::Path, lines: &[String], debug: bool) -> (Vec<Value>, String) {
    let mut command = Command::new(env!("CARGO_BIN_EXE_lotus"));
    command
        .current_dir(dir)
        .arg("serve")
        .env_remove("RUST_LOG")
        .env_remove("PORT")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped());
    if debug {
        command.env("LOTUS_DEBUG", "true");
    } else {
        command.env_remove("LOTUS_DEBUG");
    }
    let mut child = command.spawn().expect("spawn lotus serve");

    {
        let mut stdin = child.stdin.take().expect("stdin");
        for line in lines {
            writeln!(stdin, "{line}").expect("write request");
        }
    }

    let output = child.wait_with_output().expect("wait");
    assert_eq!(output.status.code(), Some(exit_codes::OK));
    let responses = String::from_utf8(output.stdout)
        .expect("utf8 stdout")
        .lines()
        .map(|line| serde_json::from_str(line).expect("json response line"))
        .collect();
    let stderr = String::from_utf8(output.stderr).expect("utf8 stderr");
    (responses, stderr)
}

fn handshake() -> Vec<String> {
    vec![
        json!({
            "jsonrpc": "2.0",
            "id": 0,
            "method": "initialize",
            "params": {"protocolVersion": "2024-11-05", "capabilities": {}}
        })
        .to_string(),
        json!({"jsonrpc": "2.0", "method": "notifications/initialized"}).to_string(),
    ]
}

fn payload(response: &Value) -> Value {
    let text = response["result"]["content"][0]["text"]
        .as_str()
        .expect("text content");
    serde_json::from_str(text).expect("payload json")
}

#[test]
fn full_journey_over_stdio() {
    let temp = tempfile::tempdir().expect("tempdir");
    let mut lines = handshake();
    lines.push(json!({"jsonrpc": "2.0", "id": 1, "method": "tools/list"}).to_string());
    lines.push(tool_call_line(2, "lotuswisdom", json!({"label": "begin"})));
    lines.push(tool_call_line(3, "lotuswisdom", step_json("open", 1, 3, true)));
    lines.push(tool_call_line(
        4,
        "lotuswisdom",
        json!({
            "label": "meditate",
            "content": "sit",
            "stepNumber": 2,
            "totalSteps": 3,
            "nextStepNeeded": true,
            "isPause": true
        }),
    ));
    lines.push(tool_call_line(5, "lotuswisdom", step_json("express", 3, 3, false)));
    lines.push(tool_call_line(6, "lotuswisdom_summary", json!({})));

    let (responses, _) = serve(temp.path(), &lines, false);
    assert_eq!(responses.len(), 7, "notification must not be answered");

    assert_eq!(responses[0]["result"]["serverInfo"]["name"], "lotus-wisdom");
    assert_eq!(
        responses[1]["result"]["tools"]
            .as_array()
            .expect("tools")
            .len(),
        3
    );
    assert_eq!(payload(&responses[2])["status"], "FRAMEWORK_RECEIVED");
    assert_eq!(payload(&responses[3])["status"], "processing");

    let pause = payload(&responses[4]);
    assert_eq!(pause["status"], "PAUSE_COMPLETE");
    assert_eq!(pause["duration"], 3);

    let done = payload(&responses[5]);
    assert_eq!(done["status"], "WISDOM_READY");
    assert_eq!(done["journeyLength"], 3);

    let summary = payload(&responses[6]);
    assert_eq!(summary["journeyLength"], 3);
    assert_eq!(
        summary["categoryJourney"],
        "process_flow → meditation → process_flow"
    );
}

#[test]
fn invalid_step_keeps_serving() {
    let temp = tempfile::tempdir().expect("tempdir");
    let mut lines = handshake();
    lines.push(tool_call_line(1, "lotuswisdom", step_json("unknown_tag", 1, 2, true)));
    lines.push(tool_call_line(2, "no_such_tool", json!({})));
    lines.push(tool_call_line(3, "lotuswisdom_summary", json!({})));

    let (responses, _) = serve(temp.path(), &lines, false);
    assert_eq!(responses.len(), 4);

    assert_eq!(responses[1]["result"]["isError"], true);
    assert_eq!(payload(&responses[1])["status"], "failed");

    assert_eq!(responses[2]["result"]["isError"], true);
    assert_eq!(
        responses[2]["result"]["content"][0]["text"],
        "Unknown tool: no_such_tool"
    );

    assert_eq!(payload(&responses[3])["journeyLength"], 0);
}

#[test]
fn debug_env_echoes_steps_to_stderr() {
    let temp = tempfile::tempdir().expect("tempdir");
    let mut lines = handshake();
    lines.push(tool_call_line(1, "lotuswisdom", step_json("examine", 1, 2, true)));

    let (responses, stderr) = serve(temp.path(), &lines, true);
    assert_eq!(responses.len(), 2);
    assert!(stderr.contains("[META-COGNITIVE: EXAMINE] Step 1/2"));
}

#[test]
fn init_then_check_succeeds() {
    let temp = tempfile::tempdir().expect("tempdir");

    let status = Command::new(env!("CARGO_BIN_EXE_lotus"))
        .current_dir(temp.path())
        .arg("init")
        .status()
        .expect("lotus init");
    assert_eq!(status.code(), Some(exit_codes::OK));
    let cfg = load_config(&temp.path().join("lotus.toml")).expect("load");
    assert_eq!(cfg, LotusConfig::default());

    let status = Command::new(env!("CARGO_BIN_EXE_lotus"))
        .current_dir(temp.path())
        .arg("init")
        .status()
        .expect("lotus init again");
    assert_eq!(status.code(), Some(exit_codes::INVALID));

    let output = Command::new(env!("CARGO_BIN_EXE_lotus"))
        .current_dir(temp.path())
        .env_remove("PORT")
        .arg("check")
        .output()
        .expect("lotus check");
    assert_eq!(output.status.code(), Some(exit_codes::OK));
    assert_eq!(String::from_utf8_lossy(&output.stdout).trim(), "ok");
}

#[test]
fn check_rejects_invalid_config() {
    let temp = tempfile::tempdir().expect("tempdir");
    std::fs::write(temp.path().join("lotus.toml"), "brief_chars = 0\n").expect("write");

    let output = Command::new(env!("CARGO_BIN_EXE_lotus"))
        .current_dir(temp.path())
        .env_remove("PORT")
        .arg("check")
        .output()
        .expect("lotus check");
    assert_eq!(output.status.code(), Some(exit_codes::INVALID));
    assert!(String::from_utf8_lossy(&output.stderr).contains("brief_chars"));
}
