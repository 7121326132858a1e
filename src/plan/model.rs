// src/plan/model.rs

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::types::ExecutionMode;

/// One subprocess invocation.
///
/// ```json
/// { "tag": "//app:server", "path": "_main/app/server", "args": ["--port=80"], "env": {"MODE": "dev"} }
/// ```
///
/// Every field is optional in the file; missing ones take their zero value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Command {
    /// Display label. Never used for identity or ordering.
    pub tag: String,

    /// Executable path. Runfiles-relative until the resolver has seen it,
    /// absolute afterwards.
    pub path: String,

    /// Positional arguments.
    pub args: Vec<String>,

    /// Overlay on the inherited process environment.
    pub env: BTreeMap<String, String>,
}

impl Command {
    /// `path` followed by the arguments, space separated.
    pub fn command_line(&self) -> String {
        let mut line = self.path.clone();
        for arg in &self.args {
            line.push(' ');
            line.push_str(arg);
        }
        line
    }
}

/// Plan as read from the JSON file, before validation.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawPlan {
    pub commands: Vec<Command>,
    pub jobs: i64,
    pub print_command: bool,
    pub keep_going: bool,
    pub buffer_output: bool,
    pub verbose: bool,
}

/// A validated plan, ready for resolution and execution.
///
/// Construct it through `ExecutionPlan::try_from(RawPlan)` (see
/// `validate.rs`) so the invariants hold.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExecutionPlan {
    pub commands: Vec<Command>,
    pub jobs: i64,
    pub print_command: bool,
    pub keep_going: bool,
    pub buffer_output: bool,
    pub verbose: bool,
}

impl ExecutionPlan {
    pub(crate) fn new_unchecked(raw: RawPlan) -> Self {
        Self {
            commands: raw.commands,
            jobs: raw.jobs,
            print_command: raw.print_command,
            keep_going: raw.keep_going,
            buffer_output: raw.buffer_output,
            verbose: raw.verbose,
        }
    }

    pub fn mode(&self) -> ExecutionMode {
        ExecutionMode::from_jobs(self.jobs)
    }

    /// Append `extra` to every command's arguments.
    pub fn append_args(&mut self, extra: &[String]) {
        if extra.is_empty() {
            return;
        }
        for command in &mut self.commands {
            command.args.extend(extra.iter().cloned());
        }
    }
}
