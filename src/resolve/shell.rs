// src/resolve/shell.rs

use std::path::Path;

use crate::plan::Command;
use crate::types::Platform;

/// File suffixes that cannot be executed directly where a shell is needed.
const SCRIPT_SUFFIXES: &[&str] = &[".bash", ".sh"];

/// Decides whether a resolved executable has to go through a shell
/// interpreter, and rewrites the command when it does.
///
/// On Windows, shell scripts produced by the build are not directly
/// executable, so they run as `bash.exe -c '<script> "$@"' -- <args>`.
/// Unix executes them as-is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShellStrategy {
    platform: Platform,
}

impl ShellStrategy {
    pub fn new(platform: Platform) -> Self {
        Self { platform }
    }

    pub fn current() -> Self {
        Self::new(Platform::current())
    }

    /// Name of the interpreter binary to look up in `PATH`.
    pub fn interpreter_name(&self) -> &'static str {
        "bash.exe"
    }

    pub fn needs_shell(&self, path: &str) -> bool {
        match self.platform {
            Platform::Windows => SCRIPT_SUFFIXES.iter().any(|s| path.ends_with(s)),
            Platform::Unix => false,
        }
    }

    /// Route `command` through `interpreter`, keeping its arguments after a
    /// `--` separator so they reach the script as `$@`.
    pub fn wrap(&self, mut command: Command, interpreter: &Path) -> Command {
        let script = command.path.replace('\\', "/");
        let mut args = vec![
            "-c".to_string(),
            format!("{script} \"$@\""),
            "--".to_string(),
        ];
        args.append(&mut command.args);

        command.args = args;
        command.path = interpreter.display().to_string();
        command
    }
}
