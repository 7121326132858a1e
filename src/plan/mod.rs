// src/plan/mod.rs

//! The execution plan: what to run and how.
//!
//! Responsibilities:
//! - Define the JSON-backed data model (`model.rs`).
//! - Load a plan file from disk (`loader.rs`).
//! - Validate the invariants the engine relies on (`validate.rs`).

pub mod loader;
pub mod model;
pub mod validate;

pub use loader::{load_and_validate, load_from_path};
pub use model::{Command, ExecutionPlan, RawPlan};
