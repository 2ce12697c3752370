//! Command-line interface for the lastmile route optimiser.
#![forbid(unsafe_code)]

use clap::{Parser, Subcommand};

mod error;
mod plan;

pub use error::CliError;

/// Run the lastmile CLI with the current process arguments.
///
/// # Errors
/// Returns [`CliError`] when argument parsing, scenario loading or
/// optimisation fails.
pub fn run() -> Result<(), CliError> {
    let cli = Cli::try_parse().map_err(CliError::ArgumentParsing)?;
    match cli.command {
        Command::Plan(args) => plan::run(&args),
    }
}

#[derive(Debug, Parser)]
#[command(
    name = "lastmile",
    about = "Plan and evaluate delivery routes from a scenario file",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Plan routes for a JSON scenario and print the result as JSON.
    Plan(plan::PlanArgs),
}
