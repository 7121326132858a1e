// src/invocation.rs

//! Everything derived from how the process was started.
//!
//! `multirun` is reached through a fixed-name symlink written by the build
//! step, and the plan file sits next to that symlink. argv[0] is therefore
//! used as-is on Unix instead of `current_exe()`, which would resolve the
//! symlink and point at the shared binary instead.

use std::env;
use std::path::{Path, PathBuf};

use crate::errors::Result;
use crate::resolve::runfiles::{DIR_ENV, MANIFEST_ENV};
use crate::types::Platform;

/// Any non-empty value turns on verbose diagnostics.
pub const VERBOSE_ENV: &str = "MULTIRUN_VERBOSE";
/// Log level override (`error`, `warn`, `info`, `debug`, `trace`).
pub const LOG_ENV: &str = "MULTIRUN_LOG";

/// Prefixes of the environment variables shown in verbose diagnostics.
const DIAGNOSTIC_ENV_PREFIXES: &[&str] = &["RUNFILES_", "BUILD_", "TEST_"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub argv0: String,
    /// Path the process was invoked through.
    pub exe: PathBuf,
    /// Plan file next to `exe`.
    pub plan_path: PathBuf,
    /// Verbose requested through the environment.
    pub verbose: bool,
    pub runfiles_manifest: Option<PathBuf>,
    pub runfiles_dir: Option<PathBuf>,
}

impl Invocation {
    /// Capture the invocation from the real process environment.
    pub fn from_env() -> Result<Self> {
        let argv0 = env::args_os()
            .next()
            .map(|a| a.to_string_lossy().into_owned())
            .unwrap_or_default();
        let cwd = match env::var_os("PWD").filter(|p| !p.is_empty()) {
            Some(pwd) => PathBuf::from(pwd),
            None => env::current_dir()?,
        };
        let current_exe = match Platform::current() {
            Platform::Windows => Some(env::current_exe()?),
            Platform::Unix => None,
        };

        let exe = invoking_exe(&argv0, &cwd, current_exe.as_deref());
        Ok(Self {
            plan_path: plan_path_for(&exe),
            exe,
            argv0,
            verbose: env_flag(VERBOSE_ENV),
            runfiles_manifest: env::var_os(MANIFEST_ENV).map(PathBuf::from),
            runfiles_dir: env::var_os(DIR_ENV).map(PathBuf::from),
        })
    }
}

/// Path of the executable the user invoked.
///
/// `current_exe` wins when given (Windows); otherwise an absolute argv[0] is
/// used directly and a relative one is joined onto `cwd`.
pub fn invoking_exe(argv0: &str, cwd: &Path, current_exe: Option<&Path>) -> PathBuf {
    if let Some(exe) = current_exe {
        return exe.to_path_buf();
    }
    let argv0 = Path::new(argv0);
    if argv0.is_absolute() {
        argv0.to_path_buf()
    } else {
        cwd.join(argv0)
    }
}

/// `<exe without .exe>.json`
pub fn plan_path_for(exe: &Path) -> PathBuf {
    let exe = exe.to_string_lossy();
    let base = exe.strip_suffix(".exe").unwrap_or(&*exe);
    PathBuf::from(format!("{base}.json"))
}

pub fn env_flag(name: &str) -> bool {
    env::var_os(name).is_some_and(|v| !v.is_empty())
}

/// Environment variables worth showing when debugging runfiles problems.
pub fn diagnostic_env() -> Vec<(String, String)> {
    let mut vars: Vec<_> = env::vars()
        .filter(|(k, _)| DIAGNOSTIC_ENV_PREFIXES.iter().any(|p| k.starts_with(p)))
        .collect();
    vars.sort();
    vars
}
