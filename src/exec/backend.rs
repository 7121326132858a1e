// src/exec/backend.rs

//! Pluggable command runner abstraction.
//!
//! The engine talks to a `CommandRunner` instead of spawning processes
//! itself. Production code uses [`ProcessRunner`]; tests provide a runner
//! that records invocations and returns scripted outcomes.

use std::future::Future;
use std::pin::Pin;

use crate::errors::Result;
use crate::plan::Command;

use super::task_runner::run_process;

/// Where a child's stdout/stderr go.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    /// Connected straight to our own stdout/stderr.
    Inherit,
    /// Collected into one combined buffer and returned in the outcome.
    Capture,
}

/// Result of a command that was launched and ran to completion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandOutcome {
    /// Exit code, or `-1` if the child was terminated by a signal.
    pub exit_code: i32,
    /// Combined stdout/stderr; empty unless run with `OutputMode::Capture`.
    pub output: Vec<u8>,
}

impl CommandOutcome {
    pub fn success(&self) -> bool {
        self.exit_code == 0
    }
}

/// Trait abstracting how one command is executed.
///
/// `Err` means the command could not be launched at all (missing
/// executable, permission denied, ...). A command that ran and exited
/// nonzero is an `Ok` outcome.
pub trait CommandRunner: Send + Sync + 'static {
    fn run<'a>(
        &'a self,
        command: &'a Command,
        output: OutputMode,
    ) -> Pin<Box<dyn Future<Output = Result<CommandOutcome>> + Send + 'a>>;
}

/// Runner that spawns real OS processes.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessRunner;

impl CommandRunner for ProcessRunner {
    fn run<'a>(
        &'a self,
        command: &'a Command,
        output: OutputMode,
    ) -> Pin<Box<dyn Future<Output = Result<CommandOutcome>> + Send + 'a>> {
        Box::pin(run_process(command, output))
    }
}
