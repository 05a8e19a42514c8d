//! Process lifecycle: wires the inventory, resolver and service together and
//! runs until the shutdown signal fires.

use std::future::{self, Future};
use std::io;
use std::sync::Arc;

use anyhow::{Context, Result};
use log::{error, info};

use crate::app::{log_outcome_summary, AutoTagService};
use crate::config::Config;
use crate::geoip::HttpGeoResolver;
use crate::initialization::init_client;
use crate::status_server::{start_status_server, ServerState};
use crate::storage::SqliteInventory;

/// Runs the auto-tag service until `shutdown_signal` resolves.
///
/// Opens (and migrates) the SQLite inventory at `config.db_path`, arms the
/// timer with the configured warm-up, and serves the control API when
/// `config.status_port` is set. On shutdown, automatic passes stop and any
/// pass in progress is allowed to finish before this returns.
///
/// # Errors
///
/// Returns an error if the configuration is invalid, the database cannot be
/// opened, or the HTTP client cannot be built.
pub async fn run_service<F>(config: Config, shutdown_signal: F) -> Result<()>
where
    F: Future<Output = ()>,
{
    let scan_config = config.scan_config().context("Invalid configuration")?;

    let inventory = SqliteInventory::open(&config.db_path)
        .await
        .with_context(|| format!("Failed to open inventory {}", config.db_path.display()))?;
    let client =
        init_client(config.timeout_seconds).context("Failed to initialize HTTP client")?;
    let resolver = Arc::new(HttpGeoResolver::new(client));

    let service = AutoTagService::new(Arc::new(inventory), resolver, scan_config)?;
    service.start(config.warmup_delay());

    let server = config.status_port.map(|port| {
        let state = ServerState::new(service.clone());
        tokio::spawn(async move {
            if let Err(e) = start_status_server(port, state).await {
                error!("{:#}", e);
            }
        })
    });

    shutdown_signal.await;

    info!("Shutdown requested, waiting for any running pass to finish");
    service.shutdown();
    service.wait_idle().await;
    if let Some(server) = server {
        server.abort();
    }

    log_outcome_summary(service.stats());
    Ok(())
}

/// Resolves on Ctrl-C. If the signal handler cannot be installed, logs the
/// error and never resolves, so the service keeps running.
pub async fn shutdown_signal() {
    until_signal(tokio::signal::ctrl_c()).await
}

async fn until_signal<F>(signal: F)
where
    F: Future<Output = io::Result<()>>,
{
    if let Err(e) = signal.await {
        error!("Failed to listen for Ctrl-C, running until killed: {}", e);
        future::pending::<()>().await;
    }
}
