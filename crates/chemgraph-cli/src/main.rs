mod cli;
mod commands;
mod config;
mod error;
mod logging;
mod structure;

use crate::cli::{Cli, Commands};
use crate::error::{CliError, Result};
use clap::Parser;
use tracing::{debug, error, info};

fn main() {
    if let Err(e) = run_app() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run_app() -> Result<()> {
    let cli = Cli::parse();
    logging::setup_logging(cli.verbose, cli.quiet, cli.log_file.clone())?;

    info!("ChemGraph CLI v{} starting up.", env!("CARGO_PKG_VERSION"));
    debug!("Full CLI arguments parsed: {:?}", &cli);

    if let Some(num_threads) = cli.threads {
        info!("Setting Rayon global thread pool to {} threads.", num_threads);
        rayon::ThreadPoolBuilder::new()
            .num_threads(num_threads)
            .build_global()
            .map_err(|e| CliError::Other(anyhow::anyhow!("Failed to build global thread pool: {}", e)))?;
    }

    let result = match cli.command {
        Commands::Rings(args) => {
            info!("Dispatching to 'rings' command.");
            commands::rings::run(args)
        }
        Commands::Formula(args) => {
            info!("Dispatching to 'formula' command.");
            commands::formula::run(args)
        }
    };

    match &result {
        Ok(()) => info!("Command completed successfully."),
        Err(e) => error!("Command failed: {}", e),
    }
    result
}
