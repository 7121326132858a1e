// src/plan/loader.rs

use std::fs;
use std::path::Path;

use crate::errors::{MultirunError, Result};
use crate::plan::model::{ExecutionPlan, RawPlan};

/// Load a plan file from a given path and return the raw `RawPlan`.
///
/// This only performs JSON deserialization; it does **not** check the plan
/// invariants. Use [`load_and_validate`] for that.
pub fn load_from_path(path: impl AsRef<Path>) -> Result<RawPlan> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path).map_err(|source| MultirunError::PlanRead {
        path: path.to_path_buf(),
        source,
    })?;

    serde_json::from_str(&contents).map_err(|source| MultirunError::PlanParse {
        path: path.to_path_buf(),
        source,
    })
}

/// Load a plan file from path and validate it.
///
/// This is the entry point the rest of the application uses. The returned
/// plan still carries unresolved command paths; run it through
/// [`crate::resolve::Resolver::resolve_all`] before execution.
pub fn load_and_validate(path: impl AsRef<Path>) -> Result<ExecutionPlan> {
    let raw = load_from_path(&path)?;
    ExecutionPlan::try_from(raw)
}
