use clap::Parser;
use colored::*;
use std::process;
use tracing_subscriber::EnvFilter;

mod cli;

use crate::cli::{Cli, Commands};
use nwalign_core::NwError;

fn main() {
    let cli = Cli::parse();

    // Initialize logging with NWALIGN_LOG environment variable support
    let default_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let log_level = std::env::var("NWALIGN_LOG").unwrap_or_else(|_| default_level.to_string());

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&log_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run(cli) {
        eprintln!("{} {:#}", "Error:".red().bold(), e);

        // Use appropriate exit codes based on error type
        let exit_code = match e.downcast_ref::<NwError>() {
            Some(NwError::InvalidParameter(_)) | Some(NwError::Configuration(_)) => 2,
            Some(NwError::Io(_)) => 3,
            Some(NwError::Parse(_)) => 4,
            _ => 1,
        };
        process::exit(exit_code);
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let settings = cli.settings()?;

    match cli.command {
        Commands::Align(args) => crate::cli::commands::align::run(args, &settings),
        Commands::Rank(args) => crate::cli::commands::rank::run(args, &settings),
        Commands::Matrix(args) => crate::cli::commands::matrix::run(args, &settings),
    }
}
