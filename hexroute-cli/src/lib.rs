//! Command-line interface for hexroute.
//!
//! The `build` subcommand resolves a cell set, computes travel durations for
//! every pair of cells within the configured k-disk radius through an OSRM
//! server, and prints a JSON summary. Durations are memoized in a CSV cache so
//! an interrupted run resumes where it stopped.
#![forbid(unsafe_code)]

use clap::{Parser, Subcommand};

mod build;
mod error;

pub use error::CliError;

use build::{BuildArgs, run_build};

const ARG_CELLS: &str = "cells";
const ARG_BOUNDARY: &str = "boundary";
const ARG_RESOLUTION: &str = "resolution";
const ARG_DENY: &str = "deny";
const ARG_MODE: &str = "mode";
const ARG_RADIUS: &str = "radius";
const ARG_CACHE: &str = "cache";
const ARG_OSRM_BASE_URL: &str = "osrm-base-url";
const ARG_OUTPUT: &str = "output";
const ENV_CELLS: &str = "HEXROUTE_CMDS_BUILD_CELLS";

/// Run the hexroute CLI with the current process arguments and environment.
///
/// # Errors
///
/// Returns [`CliError`] when argument parsing, configuration or the selected
/// command fails.
pub fn run() -> Result<(), CliError> {
    let cli = Cli::try_parse().map_err(CliError::ArgumentParsing)?;
    match cli.command {
        Command::Build(args) => run_build(args),
    }
}

#[derive(Debug, Parser)]
#[command(
    name = "hexroute",
    about = "Travel-duration matrices over hexagonal grid cells",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Build a duration matrix for a set of H3 cells.
    Build(BuildArgs),
}

#[cfg(test)]
mod tests;
