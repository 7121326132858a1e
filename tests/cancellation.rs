// tests/cancellation.rs

mod common;
use crate::common::{fake_engine, init_tracing, with_timeout, FakeRunner, PlanBuilder};

use std::time::Duration;

use multirun::cancel::CancellationController;
use multirun::run_until_done;

#[tokio::test]
async fn cancellation_waits_for_running_commands() {
    init_tracing();
    let runner = FakeRunner::new()
        .delay("A", Duration::from_millis(300))
        .delay("B", Duration::from_millis(300));
    let (engine, _out) = fake_engine(&runner);
    let controller = CancellationController::new();

    let plan = PlanBuilder::new().parallel().fake("A").fake("B").build();
    let canceller = controller.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert!(canceller.cancel());
    });

    let success = with_timeout(run_until_done(&engine, plan, &controller)).await;

    assert!(controller.is_cancelled());
    assert!(success, "commands were not terminated and both exited 0");
    assert_eq!(runner.finished().len(), 2);
}

#[tokio::test]
async fn cancellation_does_not_abort_a_serial_run() {
    init_tracing();
    let runner = FakeRunner::new()
        .delay("A", Duration::from_millis(100))
        .exit("C", 3);
    let (engine, _out) = fake_engine(&runner);
    let controller = CancellationController::new();
    controller.cancel();

    let plan = PlanBuilder::new().jobs(1).fake("A").fake("B").fake("C").build();
    let success = with_timeout(run_until_done(&engine, plan, &controller)).await;

    assert!(!success);
    assert_eq!(runner.started(), vec!["A", "B", "C"]);
}

#[tokio::test]
async fn repeated_cancellation_is_ignored() {
    let controller = CancellationController::new();
    let results: Vec<bool> = (0..5).map(|_| controller.cancel()).collect();
    assert_eq!(results, vec![true, false, false, false, false]);
}
