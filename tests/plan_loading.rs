// tests/plan_loading.rs

mod common;
use crate::common::plan_file;

use std::path::Path;

use multirun::errors::MultirunError;
use multirun::plan::{load_and_validate, load_from_path};
use multirun::types::ExecutionMode;

#[test]
fn loads_a_complete_plan() {
    let file = plan_file(
        r#"{
  "commands": [
    {"tag": "//app:server", "path": "_main/app/server", "args": ["--port", "8080"], "env": {"MODE": "dev"}},
    {"tag": "//app:worker", "path": "_main/app/worker", "args": [], "env": {}}
  ],
  "jobs": 1,
  "print_command": true,
  "keep_going": true,
  "buffer_output": false,
  "verbose": false
}"#,
    );

    let plan = load_and_validate(file.path()).unwrap();
    assert_eq!(plan.mode(), ExecutionMode::Serial);
    assert!(plan.print_command);
    assert!(plan.keep_going);
    assert!(!plan.buffer_output);
    assert_eq!(plan.commands.len(), 2);
    assert_eq!(plan.commands[0].tag, "//app:server");
    assert_eq!(plan.commands[0].args, vec!["--port", "8080"]);
    assert_eq!(plan.commands[0].env["MODE"], "dev");
    assert_eq!(plan.commands[1].path, "_main/app/worker");
}

#[test]
fn missing_fields_default_to_parallel_with_flags_off() {
    let file = plan_file(r#"{"commands": [{"path": "_main/a"}]}"#);
    let plan = load_and_validate(file.path()).unwrap();
    assert_eq!(plan.jobs, 0);
    assert_eq!(plan.mode(), ExecutionMode::Parallel);
    assert!(!plan.print_command && !plan.keep_going && !plan.buffer_output && !plan.verbose);
}

#[test]
fn missing_file_is_a_read_error() {
    match load_and_validate(Path::new("/nonexistent/multirun/plan.json")) {
        Err(MultirunError::PlanRead { path, .. }) => {
            assert_eq!(path, Path::new("/nonexistent/multirun/plan.json"));
        }
        other => panic!("expected PlanRead, got {other:?}"),
    }
}

#[test]
fn malformed_json_is_a_parse_error() {
    let file = plan_file(r#"{"commands": [ {"path": "a"} "#);
    match load_from_path(file.path()) {
        Err(MultirunError::PlanParse { .. }) => {}
        other => panic!("expected PlanParse, got {other:?}"),
    }
}

#[test]
fn wrong_field_type_is_a_parse_error() {
    let file = plan_file(r#"{"commands": [], "jobs": "four"}"#);
    assert!(matches!(
        load_and_validate(file.path()),
        Err(MultirunError::PlanParse { .. })
    ));
}

#[test]
fn invalid_commands_are_rejected() {
    let file = plan_file(r#"{"commands": [{"tag": "a", "path": ""}]}"#);
    match load_and_validate(file.path()) {
        Err(MultirunError::InvalidPlan(msg)) => assert!(msg.contains("'a'"), "{msg}"),
        other => panic!("expected InvalidPlan, got {other:?}"),
    }
}

#[test]
fn error_messages_name_the_file() {
    let file = plan_file("not json");
    let err = load_and_validate(file.path()).unwrap_err();
    let msg = err.to_string();
    assert!(msg.contains("failed to parse plan file"), "{msg}");
    assert!(msg.contains(&file.path().display().to_string()), "{msg}");
}
