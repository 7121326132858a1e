// src/cli.rs

//! Command-line parsing using `clap`.
//!
//! `multirun` defines no flags of its own. Whatever follows argv[0] is
//! forwarded to every command in the plan, so `--help` and friends reach
//! the commands instead of being interpreted here.

use clap::Parser;

use crate::errors::Result;

#[derive(Debug, Clone, Default, Parser)]
#[command(
    name = "multirun",
    about = "Run the commands of an adjacent plan file, in parallel or in sequence.",
    disable_help_flag = true,
    disable_version_flag = true
)]
pub struct CliArgs {
    /// Arguments appended to every command in the plan.
    #[arg(trailing_var_arg = true, allow_hyphen_values = true, num_args = 0..)]
    pub extra_args: Vec<String>,
}

/// Parse the process arguments.
///
/// Unlike `CliArgs::parse()` this never exits on its own, so a bad argument
/// is reported like any other setup error.
pub fn parse() -> Result<CliArgs> {
    Ok(CliArgs::try_parse()?)
}
