// src/errors.rs

//! Crate-wide error type and result alias.
//!
//! Everything in here is fatal to the invocation: it is reported on stderr
//! and the process exits with status 1 before any command runs. Per-command
//! failures never show up as errors; they are folded into the engine's
//! aggregate success flag instead.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum MultirunError {
    #[error("failed to read plan file {path:?}: {source}")]
    PlanRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse plan file {path:?} as JSON: {source}")]
    PlanParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid arguments: {0}")]
    InvalidArguments(#[from] clap::Error),

    #[error("invalid plan: {0}")]
    InvalidPlan(String),

    #[error("no runfiles found: {0}")]
    RunfilesNotFound(String),

    #[error("failed to look up runfile for {path}{}", tried_suffix(.tried))]
    RunfileNotFound { path: String, tried: Option<String> },

    #[error("{0} not found in PATH")]
    InterpreterNotFound(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

fn tried_suffix(tried: &Option<String>) -> String {
    match tried {
        Some(t) => format!(" (also tried {t})"),
        None => String::new(),
    }
}

pub type Result<T> = std::result::Result<T, MultirunError>;
