// tests/serial_mode.rs

mod common;
use crate::common::{fake_engine, init_tracing, with_timeout, FakeRunner, PlanBuilder};

use multirun::exec::OutputMode;
use multirun::types::ExecutionMode;

fn abc() -> PlanBuilder {
    PlanBuilder::new().jobs(1).fake("A").fake("B").fake("C")
}

#[tokio::test]
async fn stops_at_first_failure_without_keep_going() {
    init_tracing();
    let runner = FakeRunner::new().exit("B", 1);
    let (engine, _out) = fake_engine(&runner);

    let plan = abc().keep_going(false).build();
    assert_eq!(plan.mode(), ExecutionMode::Serial);

    let success = with_timeout(engine.run(plan)).await;

    assert!(!success);
    assert_eq!(runner.started(), vec!["A", "B"]);
}

#[tokio::test]
async fn keep_going_runs_everything_but_still_fails() {
    init_tracing();
    let runner = FakeRunner::new().exit("B", 1);
    let (engine, _out) = fake_engine(&runner);

    let success = with_timeout(engine.run(abc().keep_going(true).build())).await;

    assert!(!success, "a later success must not reset the aggregate");
    assert_eq!(runner.started(), vec!["A", "B", "C"]);
}

#[tokio::test]
async fn launch_failure_counts_as_failure() {
    init_tracing();
    let runner = FakeRunner::new().launch_error("A");
    let (engine, _out) = fake_engine(&runner);

    let success = with_timeout(engine.run(abc().build())).await;
    assert!(!success);
    assert_eq!(runner.started(), vec!["A"]);

    let runner = FakeRunner::new().launch_error("A");
    let (engine, _out) = fake_engine(&runner);
    let success = with_timeout(engine.run(abc().keep_going(true).build())).await;
    assert!(!success);
    assert_eq!(runner.started(), vec!["A", "B", "C"]);
}

#[tokio::test]
async fn all_successful_commands_succeed_in_order() {
    init_tracing();
    let runner = FakeRunner::new();
    let (engine, _out) = fake_engine(&runner);

    assert!(with_timeout(engine.run(abc().build())).await);
    assert_eq!(runner.started(), vec!["A", "B", "C"]);
    assert_eq!(runner.max_in_flight(), 1);
}

#[tokio::test]
async fn never_captures_output_even_when_buffering_is_requested() {
    init_tracing();
    let runner = FakeRunner::new().output("A", "hidden\n");
    let (engine, out) = fake_engine(&runner);

    assert!(with_timeout(engine.run(abc().buffer_output(true).build())).await);

    assert!(runner
        .output_modes()
        .iter()
        .all(|(_, mode)| *mode == OutputMode::Inherit));
    assert!(!out.contents().contains("hidden"));
}

#[tokio::test]
async fn prints_each_tag_before_its_command() {
    init_tracing();
    let runner = FakeRunner::new().exit("B", 2);
    let (engine, out) = fake_engine(&runner);

    let plan = abc().print_command(true).keep_going(false).build();
    assert!(!with_timeout(engine.run(plan)).await);

    // C never starts, so its tag is never printed.
    assert_eq!(out.contents(), "A\nB\n");
}

#[tokio::test]
async fn verbose_prints_command_lines_without_changing_the_result() {
    init_tracing();
    let runner = FakeRunner::new().exit("C", 1);
    let (engine, out) = fake_engine(&runner);

    let plan = abc().verbose(true).keep_going(true).build();
    assert!(!with_timeout(engine.run(plan)).await);

    let text = out.contents();
    assert!(text.starts_with("serial: 3 commands\n"), "{text}");
    assert!(text.contains("Command line: /fake/A\n"), "{text}");
    assert!(text.contains("Command line: /fake/C\n"), "{text}");
    assert_eq!(runner.started(), vec!["A", "B", "C"]);
}

#[tokio::test]
async fn empty_serial_plan_succeeds() {
    let runner = FakeRunner::new();
    let (engine, _out) = fake_engine(&runner);
    assert!(engine.run(PlanBuilder::new().jobs(1).build()).await);
    assert!(runner.started().is_empty());
}
