#![allow(dead_code)]

use std::io::Write;

use tempfile::NamedTempFile;

pub use multirun_test_utils::builders::{CommandBuilder, PlanBuilder};
pub use multirun_test_utils::fake_runner::FakeRunner;
pub use multirun_test_utils::{init_tracing, with_timeout, CaptureBuffer};

use multirun::exec::Engine;

/// Engine wired to a fake runner and an in-memory output buffer.
pub fn fake_engine(runner: &FakeRunner) -> (Engine<FakeRunner>, CaptureBuffer) {
    let out = CaptureBuffer::new();
    let engine = Engine::with_runner(runner.clone()).with_output(out.writer());
    (engine, out)
}

/// Write `json` into a temporary `.json` file.
pub fn plan_file(json: &str) -> NamedTempFile {
    let mut file = tempfile::Builder::new()
        .suffix(".json")
        .tempfile()
        .unwrap();
    write!(file, "{json}").unwrap();
    file
}
