// src/exec/engine.rs

//! Runs a resolved plan and reduces it to a single success flag.
//!
//! Parallel mode starts every command at once, one Tokio task each, and
//! waits for all of them; a failure never stops the others. Serial mode
//! runs the commands in declaration order and, unless `keep_going` is set,
//! stops at the first failure.

use std::sync::{Arc, Mutex, PoisonError};

use tokio::task::JoinSet;
use tracing::{debug, error, info};

use crate::exec::backend::{CommandRunner, OutputMode, ProcessRunner};
use crate::exec::output::SharedWriter;
use crate::plan::{Command, ExecutionPlan};
use crate::types::ExecutionMode;

#[derive(Debug)]
pub struct Engine<R: CommandRunner = ProcessRunner> {
    runner: Arc<R>,
    output: SharedWriter,
}

impl Default for Engine<ProcessRunner> {
    fn default() -> Self {
        Self::new()
    }
}

impl Engine<ProcessRunner> {
    pub fn new() -> Self {
        Self::with_runner(ProcessRunner)
    }
}

impl<R: CommandRunner> Engine<R> {
    pub fn with_runner(runner: R) -> Self {
        Self {
            runner: Arc::new(runner),
            output: SharedWriter::stdout(),
        }
    }

    /// Send tags, captured output and verbose lines to `output` instead of
    /// stdout. Children in inherit mode still write to the real stdout.
    pub fn with_output(mut self, output: SharedWriter) -> Self {
        self.output = output;
        self
    }

    /// Execute `plan`. Returns `true` iff every command that ran exited 0.
    pub async fn run(&self, plan: ExecutionPlan) -> bool {
        let mode = plan.mode();
        info!(%mode, commands = plan.commands.len(), "running plan");
        if plan.verbose {
            self.output
                .write_line(&format!("{mode}: {} commands", plan.commands.len()));
        }

        let success = match mode {
            ExecutionMode::Parallel => self.run_parallel(plan).await,
            ExecutionMode::Serial => self.run_serial(plan).await,
        };

        info!(success, "plan finished");
        success
    }

    async fn run_parallel(&self, plan: ExecutionPlan) -> bool {
        let success = Arc::new(Mutex::new(true));
        let output_mode = if plan.buffer_output {
            OutputMode::Capture
        } else {
            OutputMode::Inherit
        };
        // Tags are only printed together with captured output.
        let print_tag = plan.print_command && plan.buffer_output;

        let mut tasks = JoinSet::new();
        for command in plan.commands {
            if plan.verbose {
                self.print_command_line(&command);
            }

            let runner = Arc::clone(&self.runner);
            let output = self.output.clone();
            let success = Arc::clone(&success);

            tasks.spawn(async move {
                match runner.run(&command, output_mode).await {
                    Ok(outcome) => {
                        if output_mode == OutputMode::Capture {
                            let tag = print_tag.then_some(command.tag.as_str());
                            output.write_block(tag, &outcome.output);
                        }
                        if !outcome.success() {
                            debug!(tag = %command.tag, exit_code = outcome.exit_code, "command failed");
                            mark_failed(&success);
                        }
                    }
                    Err(err) => {
                        error!(tag = %command.tag, path = %command.path, error = %err, "error running command");
                        mark_failed(&success);
                    }
                }
            });
        }

        while let Some(joined) = tasks.join_next().await {
            if let Err(e) = joined {
                error!(error = %e, "command task did not complete");
                mark_failed(&success);
            }
        }

        *success.lock().unwrap_or_else(PoisonError::into_inner)
    }

    async fn run_serial(&self, plan: ExecutionPlan) -> bool {
        let mut success = true;

        for command in &plan.commands {
            if plan.print_command {
                self.output.write_line(&command.tag);
            }
            if plan.verbose {
                self.print_command_line(command);
            }

            // Serial mode never captures, whatever `buffer_output` says.
            let ok = match self.runner.run(command, OutputMode::Inherit).await {
                Ok(outcome) => {
                    if !outcome.success() {
                        debug!(tag = %command.tag, exit_code = outcome.exit_code, "command failed");
                    }
                    outcome.success()
                }
                Err(err) => {
                    error!(tag = %command.tag, path = %command.path, error = %err, "error running command");
                    false
                }
            };

            if !ok {
                if plan.keep_going {
                    success = false;
                } else {
                    debug!(tag = %command.tag, "stopping after failed command");
                    return false;
                }
            }
        }

        success
    }

    fn print_command_line(&self, command: &Command) {
        self.output
            .write_line(&format!("Command line: {}", command.command_line()));
    }
}

fn mark_failed(success: &Mutex<bool>) {
    *success.lock().unwrap_or_else(PoisonError::into_inner) = false;
}
