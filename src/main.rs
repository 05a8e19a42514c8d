//! Main application entry point (CLI binary).
//!
//! A thin wrapper around the `geo_autotag` library: parses options,
//! initializes the logger, and runs the service until Ctrl-C.

use anyhow::{Context, Result};
use clap::Parser;
use std::process;

use geo_autotag::initialization::init_logger_with;
use geo_autotag::{run_service, shutdown_signal, Config};

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::parse();

    let log_level = config.log_level.clone();
    let log_format = config.log_format.clone();
    init_logger_with(log_level.into(), log_format).context("Failed to initialize logger")?;

    if let Err(e) = run_service(config, shutdown_signal()).await {
        eprintln!("geo_autotag error: {:#}", e);
        process::exit(1);
    }
    Ok(())
}
