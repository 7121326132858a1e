// src/plan/validate.rs

use crate::errors::{MultirunError, Result};
use crate::plan::model::{Command, ExecutionPlan, RawPlan};

impl TryFrom<RawPlan> for ExecutionPlan {
    type Error = MultirunError;

    fn try_from(raw: RawPlan) -> std::result::Result<Self, Self::Error> {
        validate_raw_plan(&raw)?;
        Ok(ExecutionPlan::new_unchecked(raw))
    }
}

fn validate_raw_plan(plan: &RawPlan) -> Result<()> {
    for (index, command) in plan.commands.iter().enumerate() {
        validate_command(index, command)?;
    }
    Ok(())
}

fn validate_command(index: usize, cmd: &Command) -> Result<()> {
    let label = if cmd.tag.is_empty() {
        format!("command #{index}")
    } else {
        format!("command #{index} ('{}')", cmd.tag)
    };

    if cmd.path.is_empty() {
        return Err(MultirunError::InvalidPlan(format!("{label} has an empty path")));
    }
    if cmd.path.contains('\0') {
        return Err(MultirunError::InvalidPlan(format!("{label} path contains a NUL byte")));
    }
    if cmd.args.iter().any(|a| a.contains('\0')) {
        return Err(MultirunError::InvalidPlan(format!(
            "{label} has an argument containing a NUL byte"
        )));
    }

    for (key, value) in cmd.env.iter() {
        if key.is_empty() {
            return Err(MultirunError::InvalidPlan(format!(
                "{label} has an empty environment variable name"
            )));
        }
        if key.contains('=') || key.contains('\0') {
            return Err(MultirunError::InvalidPlan(format!(
                "{label} has an invalid environment variable name '{key}'"
            )));
        }
        if value.contains('\0') {
            return Err(MultirunError::InvalidPlan(format!(
                "{label} environment variable '{key}' contains a NUL byte"
            )));
        }
    }
    Ok(())
}
