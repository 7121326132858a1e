// src/exec/mod.rs

//! Process execution layer.
//!
//! This module runs the commands of a resolved plan using
//! `tokio::process::Command` and folds their results into one aggregate
//! success flag.
//!
//! - [`engine`] owns the parallel and serial execution strategies.
//! - [`backend`] provides the `CommandRunner` trait and the production
//!   `ProcessRunner`; tests swap in a scripted fake.
//! - [`task_runner`] spawns a single child process and optionally captures
//!   its combined stdout/stderr.
//! - [`output`] is the shared writer the engine prints tags and captured
//!   output through.

pub mod backend;
pub mod engine;
pub mod output;
pub mod task_runner;

pub use backend::{CommandOutcome, CommandRunner, OutputMode, ProcessRunner};
pub use engine::Engine;
pub use output::SharedWriter;
