use std::io::Write;

use assert_cmd::Command;
use assert_fs::prelude::*;
use serde_json::Value;

const SCHEMA: &str = include_str!("../../instrument-spec/tests/fixtures/clinic_schema.json");
const VALUE: &str = include_str!("../../instrument-spec/tests/fixtures/clinic_value.json");

fn cli() -> Command {
    Command::cargo_bin("instrument-resolve").expect("binary")
}

fn inputs(temp: &assert_fs::TempDir) -> (String, String) {
    let schema = temp.child("schema.json");
    schema.write_str(SCHEMA).expect("write schema");
    let value = temp.child("value.json");
    value.write_str(VALUE).expect("write value");
    (
        schema.path().display().to_string(),
        value.path().display().to_string(),
    )
}

#[test]
fn resolve_prints_text_lines() {
    let temp = assert_fs::TempDir::new().expect("tempdir");
    let (schema, value) = inputs(&temp);

    let output = cli()
        .args(["resolve", "--schema", schema.as_str(), "--value", value.as_str()])
        .args(["name", "visits.weight", "symptoms.cough"])
        .output()
        .expect("run");

    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).expect("utf8");
    assert!(stdout.contains(r#"name = string "hello""#));
    assert!(stdout.contains("visits.weight = list [number 70, number 82]"));
    assert!(stdout.contains("symptoms.cough = boolean false"));
}

#[test]
fn resolve_json_marks_missing_identifiers_and_fails() {
    let temp = assert_fs::TempDir::new().expect("tempdir");
    let (schema, value) = inputs(&temp);

    let output = cli()
        .args(["resolve", "--schema", schema.as_str(), "--value", value.as_str()])
        .args(["--format", "json", "symptoms.fever", "visits"])
        .output()
        .expect("run");

    assert!(!output.status.success());
    let parsed: Value = serde_json::from_slice(&output.stdout).expect("json");
    assert_eq!(parsed["symptoms.fever"]["type"], "boolean");
    assert_eq!(parsed["symptoms.fever"]["value"], true);
    assert!(parsed["visits"].is_null());
    let stderr = String::from_utf8(output.stderr).expect("utf8");
    assert!(stderr.contains("1 identifier(s) not found"));
}

#[test]
fn resolve_reads_parameters_and_instants() {
    let temp = assert_fs::TempDir::new().expect("tempdir");
    let (schema, _) = inputs(&temp);
    let mut params = tempfile::NamedTempFile::new().expect("params file");
    write!(params, r#"{{ "patientAge": 42 }}"#).expect("write params");
    let params_path = params.path().display().to_string();

    let output = cli()
        .args(["resolve", "--schema", schema.as_str()])
        .args(["--params", params_path.as_str()])
        .args(["--instant", "now=2024-05-01T08:30:00Z", "--format", "json"])
        .args(["patientAge", "now", "name"])
        .output()
        .expect("run");

    assert!(output.status.success());
    let parsed: Value = serde_json::from_slice(&output.stdout).expect("json");
    assert_eq!(parsed["patientAge"]["type"], "number");
    assert_eq!(parsed["patientAge"]["value"], 42);
    assert_eq!(parsed["now"]["type"], "date_time");
    assert_eq!(parsed["now"]["value"], "2024-05-01T08:30:00+00:00");
    // no value tree: the field exists but is empty
    assert_eq!(parsed["name"]["type"], "string");
    assert!(parsed["name"]["value"].is_null());
}

#[test]
fn opaque_record_lists_are_not_addressable() {
    let temp = assert_fs::TempDir::new().expect("tempdir");
    let (schema, value) = inputs(&temp);

    let output = cli()
        .args(["resolve", "--schema", schema.as_str(), "--value", value.as_str()])
        .args(["--record-lists", "opaque", "visits.weight"])
        .output()
        .expect("run");

    assert!(!output.status.success());
    let stdout = String::from_utf8(output.stdout).expect("utf8");
    assert!(stdout.contains("visits.weight: not found"));
}

#[test]
fn fields_lists_addressable_identifiers() {
    let temp = assert_fs::TempDir::new().expect("tempdir");
    let (schema, _) = inputs(&temp);

    let output = cli()
        .args(["fields", "--schema", schema.as_str()])
        .output()
        .expect("run");

    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).expect("utf8");
    let lines: Vec<&str> = stdout.lines().collect();
    assert!(lines.contains(&"height"));
    assert!(lines.contains(&"symptoms.fever"));
    assert!(lines.contains(&"visits.seen_on"));
    assert!(!lines.contains(&"visits"));
}

#[test]
fn schema_command_emits_json_schema() {
    let output = cli().arg("schema").output().expect("run");
    assert!(output.status.success());
    let parsed: Value = serde_json::from_slice(&output.stdout).expect("json");
    assert!(parsed["properties"]["children"].is_object());
    assert!(parsed["properties"]["field"].is_object());
}
