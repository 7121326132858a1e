#![allow(dead_code)]

use multirun::plan::{Command, ExecutionPlan, RawPlan};

/// Builder for `ExecutionPlan` to simplify test setup.
pub struct PlanBuilder {
    plan: RawPlan,
}

impl PlanBuilder {
    /// Starts out serial (`jobs = 1`) with every flag off.
    pub fn new() -> Self {
        Self {
            plan: RawPlan {
                jobs: 1,
                ..RawPlan::default()
            },
        }
    }

    pub fn jobs(mut self, jobs: i64) -> Self {
        self.plan.jobs = jobs;
        self
    }

    pub fn parallel(self) -> Self {
        self.jobs(0)
    }

    pub fn print_command(mut self, val: bool) -> Self {
        self.plan.print_command = val;
        self
    }

    pub fn keep_going(mut self, val: bool) -> Self {
        self.plan.keep_going = val;
        self
    }

    pub fn buffer_output(mut self, val: bool) -> Self {
        self.plan.buffer_output = val;
        self
    }

    pub fn verbose(mut self, val: bool) -> Self {
        self.plan.verbose = val;
        self
    }

    pub fn command(mut self, command: Command) -> Self {
        self.plan.commands.push(command);
        self
    }

    /// Add a command whose tag is `tag` and whose path is a dummy
    /// `/fake/<tag>`; meant for the fake runner, which keys on tags.
    pub fn fake(self, tag: &str) -> Self {
        self.command(CommandBuilder::new(tag, &format!("/fake/{tag}")).build())
    }

    pub fn build(self) -> ExecutionPlan {
        ExecutionPlan::try_from(self.plan).expect("Failed to build valid plan from builder")
    }
}

impl Default for PlanBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for `Command`.
pub struct CommandBuilder {
    command: Command,
}

impl CommandBuilder {
    pub fn new(tag: &str, path: &str) -> Self {
        Self {
            command: Command {
                tag: tag.to_string(),
                path: path.to_string(),
                args: vec![],
                env: Default::default(),
            },
        }
    }

    /// `/bin/sh -c <script>`
    pub fn sh(tag: &str, script: &str) -> Self {
        Self::new(tag, "/bin/sh").arg("-c").arg(script)
    }

    pub fn arg(mut self, arg: &str) -> Self {
        self.command.args.push(arg.to_string());
        self
    }

    pub fn env(mut self, key: &str, value: &str) -> Self {
        self.command.env.insert(key.to_string(), value.to_string());
        self
    }

    pub fn build(self) -> Command {
        self.command
    }
}
