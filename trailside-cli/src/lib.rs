//! Command-line interface for the Trailside demo.
#![forbid(unsafe_code)]

use clap::{Parser, Subcommand};

mod error;
mod show;

pub use error::CliError;

use show::{ShowArgs, run_show};

const ARG_METADATA: &str = "metadata";
const ARG_CATALOGUE: &str = "catalogue";
const ARG_SDK_DIR: &str = "sdk-dir";
const ARG_LATITUDE: &str = "latitude";
const ARG_LONGITUDE: &str = "longitude";
const ARG_RADIUS_KM: &str = "radius-km";
const ARG_LIMIT: &str = "limit";
const ARG_NAME: &str = "name";
const ARG_FROM_CACHE: &str = "from-cache";
const ARG_USER_ID: &str = "user-id";
const ARG_ACCESS_TOKEN: &str = "access-token";
const ARG_OUTPUT: &str = "output";
const ENV_METADATA: &str = "TRAILSIDE_CMDS_SHOW_METADATA";
const ENV_CATALOGUE: &str = "TRAILSIDE_CMDS_SHOW_CATALOGUE";

/// Run the Trailside CLI with the current process arguments and environment.
///
/// # Errors
/// Returns the first [`CliError`] raised while parsing arguments or running
/// the selected command.
pub fn run() -> Result<(), CliError> {
    let cli = Cli::try_parse().map_err(CliError::ArgumentParsing)?;
    match cli.command {
        Command::Show(args) => run_show(args),
    }
}

#[derive(Debug, Parser)]
#[command(
    name = "trailside",
    about = "Show offline trail catalogues on a headless map",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Initialize the SDK, search for trails and draw the trail overlay.
    Show(ShowArgs),
}

#[cfg(test)]
mod tests;
