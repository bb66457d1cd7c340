//! Driveshare CLI Binary
//!
//! Command-line interface for drive hierarchy browsing and subtree ownership
//! transfer.

use anyhow::Context;
use clap::Parser;
use driveshare::config::AppConfig;
use driveshare::logging;
use driveshare::tooling::cli::{Cli, CliContext};
use std::process;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config =
        AppConfig::load(cli.config.as_deref()).context("failed to load configuration")?;
    if let Some(level) = &cli.log_level {
        config.logging.level = level.clone();
    }
    if let Some(format) = &cli.log_format {
        config.logging.format = format.clone();
    }
    if let Some(output) = &cli.log_output {
        config.logging.output = output.clone();
    }
    logging::init_logging(Some(&config.logging)).context("failed to initialize logging")?;

    // Create CLI context
    let context = match CliContext::new(&config) {
        Ok(ctx) => ctx,
        Err(e) => {
            eprintln!("Error initializing context: {}", e);
            process::exit(1);
        }
    };

    // Execute command
    match context.execute(&cli.command).await {
        Ok(output) => {
            println!("{}", output);
            Ok(())
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    }
}
