// src/types.rs

use std::fmt;

/// How the engine walks the plan.
///
/// Only `jobs == 1` selects `Serial`. Every other value, including zero and
/// negative numbers, selects `Parallel`; the magnitude is not a pool size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecutionMode {
    /// One command at a time, in declaration order.
    Serial,
    /// All commands at once, no concurrency cap.
    Parallel,
}

impl ExecutionMode {
    pub fn from_jobs(jobs: i64) -> Self {
        if jobs == 1 {
            ExecutionMode::Serial
        } else {
            ExecutionMode::Parallel
        }
    }

    pub fn is_parallel(self) -> bool {
        self == ExecutionMode::Parallel
    }
}

impl fmt::Display for ExecutionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExecutionMode::Serial => f.write_str("serial"),
            ExecutionMode::Parallel => f.write_str("parallel"),
        }
    }
}

/// Target platform, as far as command resolution cares.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    Windows,
    Unix,
}

impl Platform {
    pub fn current() -> Self {
        if cfg!(windows) {
            Platform::Windows
        } else {
            Platform::Unix
        }
    }
}
