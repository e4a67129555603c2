//! Command-line interface definitions for the `paws` binary.
//!
//! This module centralises the clap parser structures so both the main binary
//! and the build script can reuse them when generating the manual page.

use clap::Parser;

/// Top-level CLI for the `paws` binary.
#[derive(Debug, Parser)]
#[command(
    name = "paws",
    about = "Declare a VPC against an in-memory engine and print the resulting plan",
    arg_required_else_help = true
)]
pub(crate) enum Cli {
    /// Declare the configured VPC, simulate apply and print the plan.
    #[command(
        name = "plan",
        about = "Declare the configured VPC, simulate apply and print the plan"
    )]
    Plan(PlanCommand),
}

/// Arguments for the `paws plan` subcommand.
#[derive(Debug, Parser)]
pub(crate) struct PlanCommand {
    /// Write the JSON plan to this file instead of standard output.
    ///
    /// The file is created or replaced; its parent directory must exist.
    #[arg(long, value_name = "PATH")]
    pub(crate) output: Option<String>,
}
