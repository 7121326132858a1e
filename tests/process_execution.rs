// tests/process_execution.rs
//
// Runs real child processes through `/bin/sh`.

#![cfg(unix)]

mod common;
use crate::common::{init_tracing, with_timeout, CaptureBuffer, CommandBuilder, PlanBuilder};

use std::path::Path;

use multirun::exec::Engine;
use tempfile::TempDir;

fn engine() -> (Engine, CaptureBuffer) {
    let out = CaptureBuffer::new();
    (Engine::new().with_output(out.writer()), out)
}

/// Script that leaves a marker file behind and exits with `code`.
fn touch_and_exit(tag: &str, dir: &Path, code: i32) -> CommandBuilder {
    let marker = dir.join(tag);
    CommandBuilder::sh(tag, &format!("touch '{}'; exit {code}", marker.display()))
}

#[tokio::test]
async fn serial_stops_before_later_commands() {
    init_tracing();
    let dir = TempDir::new().unwrap();
    let plan = PlanBuilder::new()
        .jobs(1)
        .command(touch_and_exit("A", dir.path(), 0).build())
        .command(touch_and_exit("B", dir.path(), 1).build())
        .command(touch_and_exit("C", dir.path(), 0).build())
        .build();

    let (engine, _out) = engine();
    assert!(!with_timeout(engine.run(plan)).await);

    assert!(dir.path().join("A").exists());
    assert!(dir.path().join("B").exists());
    assert!(!dir.path().join("C").exists(), "C must never start");
}

#[tokio::test]
async fn serial_keep_going_runs_everything() {
    init_tracing();
    let dir = TempDir::new().unwrap();
    let plan = PlanBuilder::new()
        .jobs(1)
        .keep_going(true)
        .command(touch_and_exit("A", dir.path(), 0).build())
        .command(touch_and_exit("B", dir.path(), 1).build())
        .command(touch_and_exit("C", dir.path(), 0).build())
        .build();

    let (engine, _out) = engine();
    assert!(!with_timeout(engine.run(plan)).await);

    for tag in ["A", "B", "C"] {
        assert!(dir.path().join(tag).exists(), "{tag} did not run");
    }
}

#[tokio::test]
async fn parallel_buffered_output_stays_together() {
    init_tracing();
    let mut builder = PlanBuilder::new().jobs(0).buffer_output(true).print_command(true);
    for i in 0..6 {
        let tag = format!("job{i}");
        let script = format!(
            "for n in 1 2 3 4 5; do echo {tag}-$n; sleep 0.01; done; echo {tag}-err >&2"
        );
        builder = builder.command(CommandBuilder::sh(&tag, &script).build());
    }

    let (engine, out) = engine();
    assert!(with_timeout(engine.run(builder.build())).await);

    let text = out.contents();
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines.len(), 6 * 7, "{text}");
    for block in lines.chunks(7) {
        let tag = block[0];
        for line in &block[1..] {
            assert!(line.starts_with(&format!("{tag}-")), "split block: {text}");
        }
        assert!(block.contains(&format!("{tag}-err").as_str()), "{text}");
    }
}

#[tokio::test]
async fn parallel_reports_missing_executable_and_runs_the_rest() {
    init_tracing();
    let dir = TempDir::new().unwrap();
    let plan = PlanBuilder::new()
        .jobs(4)
        .command(CommandBuilder::new("missing", "/nonexistent/multirun-test-binary").build())
        .command(touch_and_exit("B", dir.path(), 0).build())
        .build();

    let (engine, _out) = engine();
    assert!(!with_timeout(engine.run(plan)).await);
    assert!(dir.path().join("B").exists());
}

#[tokio::test]
async fn env_overlay_reaches_the_child() {
    init_tracing();
    let plan = PlanBuilder::new()
        .jobs(0)
        .buffer_output(true)
        .command(
            CommandBuilder::sh("env", "echo \"$MULTIRUN_OVERLAY\"; test -n \"$PATH\"")
                .env("MULTIRUN_OVERLAY", "from-plan")
                .build(),
        )
        .build();

    let (engine, out) = engine();
    assert!(with_timeout(engine.run(plan)).await);
    assert_eq!(out.contents(), "from-plan\n");
}

#[tokio::test]
async fn signal_terminated_child_is_a_failure() {
    init_tracing();
    let plan = PlanBuilder::new()
        .jobs(1)
        .command(CommandBuilder::sh("killed", "kill -9 $$").build())
        .build();

    let (engine, _out) = engine();
    assert!(!with_timeout(engine.run(plan)).await);
}
