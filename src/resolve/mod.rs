// src/resolve/mod.rs

//! Turns the logical command paths written into the plan into executables
//! the engine can spawn.
//!
//! - [`runfiles`] finds the real location of a runfiles-relative path.
//! - [`shell`] decides whether a resolved path needs a shell interpreter on
//!   the current platform.
//!
//! The engine never sees an unresolved command: every command goes through
//! [`Resolver::resolve`] first, and one failure aborts the whole invocation.

pub mod runfiles;
pub mod shell;

use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use tracing::{debug, warn};

use crate::errors::{MultirunError, Result};
use crate::fs::{FileSystem, RealFileSystem};
use crate::plan::{Command, ExecutionPlan};

pub use runfiles::{Runfiles, RunfilesConfig, RunfilesSource};
pub use shell::ShellStrategy;

/// Whether `path` has to be looked up in the runfiles at all.
pub fn needs_lookup(path: &str) -> bool {
    !Path::new(path).is_absolute()
}

#[derive(Debug)]
pub struct Resolver<F: FileSystem = RealFileSystem> {
    fs: F,
    runfiles: Option<Runfiles>,
    exported_env: Option<(String, String)>,
    shell: ShellStrategy,
    interpreter: OnceLock<PathBuf>,
}

impl<F: FileSystem> Resolver<F> {
    /// A resolver that only accepts absolute paths until
    /// [`with_runfiles`](Self::with_runfiles) is called.
    pub fn new(fs: F, shell: ShellStrategy) -> Self {
        Self {
            fs,
            runfiles: None,
            exported_env: None,
            shell,
            interpreter: OnceLock::new(),
        }
    }

    pub fn with_runfiles(mut self, config: &RunfilesConfig) -> Result<Self> {
        self.runfiles = Some(Runfiles::open(config, &self.fs)?);
        self.exported_env = config.exported_env();
        Ok(self)
    }

    /// Use `path` as the shell interpreter instead of searching `PATH`.
    pub fn with_interpreter(self, path: impl Into<PathBuf>) -> Self {
        let _ = self.interpreter.set(path.into());
        self
    }

    /// Resolve every command of `plan`, stopping at the first failure.
    pub fn resolve_all(&self, mut plan: ExecutionPlan) -> Result<ExecutionPlan> {
        plan.commands = plan
            .commands
            .into_iter()
            .map(|cmd| self.resolve(cmd))
            .collect::<Result<Vec<_>>>()?;
        Ok(plan)
    }

    pub fn resolve(&self, mut command: Command) -> Result<Command> {
        let real = self.locate(&command.path)?;
        debug!(tag = %command.tag, logical = %command.path, real = %real.display(), "resolved command path");
        command.path = real.display().to_string();

        if let Some((key, value)) = &self.exported_env {
            command
                .env
                .entry(key.clone())
                .or_insert_with(|| value.clone());
        }

        if self.shell.needs_shell(&command.path) {
            let interpreter = self.interpreter()?;
            command = self.shell.wrap(command, &interpreter);
        }

        Ok(command)
    }

    fn locate(&self, path: &str) -> Result<PathBuf> {
        if !needs_lookup(path) {
            return Ok(PathBuf::from(path));
        }

        let Some(runfiles) = &self.runfiles else {
            return Err(MultirunError::RunfilesNotFound(format!(
                "cannot resolve relative path '{path}'"
            )));
        };

        // `../repo/...` points into an external repository.
        let logical = path.strip_prefix("../").unwrap_or(path);
        if let Some(real) = runfiles.rlocation(logical, &self.fs) {
            return Ok(real);
        }

        // Retry without the leading workspace name.
        let Some((_, stripped)) = logical.split_once('/') else {
            warn!(path, "runfile not found");
            return Err(MultirunError::RunfileNotFound {
                path: path.to_string(),
                tried: None,
            });
        };
        match runfiles.rlocation(stripped, &self.fs) {
            Some(real) => Ok(real),
            None => {
                warn!(path, stripped, "runfile not found");
                Err(MultirunError::RunfileNotFound {
                    path: path.to_string(),
                    tried: Some(stripped.to_string()),
                })
            }
        }
    }

    fn interpreter(&self) -> Result<PathBuf> {
        if let Some(path) = self.interpreter.get() {
            return Ok(path.clone());
        }
        let name = self.shell.interpreter_name();
        let found = which::which(name)
            .map_err(|_| MultirunError::InterpreterNotFound(name.to_string()))?;
        debug!(interpreter = %found.display(), "located shell interpreter");
        Ok(self.interpreter.get_or_init(|| found).clone())
    }
}
