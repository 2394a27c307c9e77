use std::fs;

use pigsty::{Action, GroomOptions, PigstyOptions, run_main};
use pretty_assertions::assert_eq;
use tempfile::tempdir;

fn fixture_trace() -> &'static str {
    "Error: request failed\n    at Client.send (client.js:40:11)\n    at retry (retry.js:12:3)\n    at /srv/app/index.js:3:1\n"
}

fn write_fixture() -> (tempfile::TempDir, String) {
    let dir = tempdir().expect("tempdir");
    let file_path = dir.path().join("trace.txt");
    fs::write(&file_path, fixture_trace()).expect("write fixture");
    (dir, file_path.display().to_string())
}

#[test]
fn parse_reports_message_and_call_sites() {
    let (_dir, file) = write_fixture();
    let opts = PigstyOptions {
        input: Some(file),
        action: Action::Parse,
    };
    let output = run_main(&opts).expect("parse run");
    let value: serde_json::Value = serde_json::from_str(&output).expect("json output");

    assert_eq!(value["message"], "Error: request failed");
    assert_eq!(value["lines"].as_array().map(Vec::len), Some(3));
    assert_eq!(
        value["callSites"][0],
        serde_json::json!({
            "module": "client.js",
            "line": 40,
            "column": 11,
            "context": "Client",
            "method": "send"
        })
    );
    assert_eq!(
        value["callSites"][2],
        serde_json::json!({ "module": "/srv/app/index.js", "line": 3, "column": 1 })
    );
}

#[test]
fn groom_drops_and_truncates() {
    let (_dir, file) = write_fixture();
    let opts = PigstyOptions {
        input: Some(file),
        action: Action::Groom(GroomOptions::new().with_drop_count(1).with_max_lines(1)),
    };
    assert_eq!(run_main(&opts).expect("groom run"), "at retry (retry.js:12:3)");
}

#[test]
fn line_parses_single_call_site() {
    let opts = PigstyOptions {
        input: None,
        action: Action::Line("at f (x.js:1:2)".to_string()),
    };
    let output = run_main(&opts).expect("line run");
    let value: serde_json::Value = serde_json::from_str(&output).expect("json output");
    assert_eq!(value["method"], "f");
    assert_eq!(value["column"], 2);
}

#[test]
fn line_rejects_garbage() {
    let opts = PigstyOptions {
        input: None,
        action: Action::Line("not a trace".to_string()),
    };
    let err = run_main(&opts).expect_err("garbage must fail");
    let chain = format!("{err:#}");
    assert!(
        chain.contains("unable to parse \"not a trace\""),
        "unexpected error: {chain}"
    );
}

#[test]
fn missing_file_is_reported() {
    let dir = tempdir().expect("tempdir");
    let missing = dir.path().join("absent.txt").display().to_string();
    let opts = PigstyOptions {
        input: Some(missing.clone()),
        action: Action::Parse,
    };
    let err = run_main(&opts).expect_err("missing file must fail");
    assert!(err.to_string().contains(&missing));
}
