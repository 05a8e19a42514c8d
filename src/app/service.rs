//! The auto-tag service.

use std::sync::Arc;
use std::time::Duration;

use log::{info, warn};

use crate::config::{ConfigManager, ConfigPatch, ScanConfig};
use crate::error_handling::{ConfigError, InventoryError, ProcessingStats};
use crate::geoip::GeoResolver;
use crate::inventory::Inventory;
use crate::scan::{PassReport, ScanReport};
use crate::scheduler::{ReconciliationScheduler, SchedulerState};

use super::statistics::StatsSnapshot;

/// Keeps every endpoint's geolocation labels in sync with its address.
///
/// Cheap to clone; clones drive the same scheduler.
#[derive(Clone)]
pub struct AutoTagService {
    scheduler: ReconciliationScheduler,
}

impl AutoTagService {
    /// Builds a service with an unarmed timer.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if `config` fails validation.
    pub fn new(
        inventory: Arc<dyn Inventory>,
        resolver: Arc<dyn GeoResolver>,
        config: ScanConfig,
    ) -> Result<Self, ConfigError> {
        let config = Arc::new(ConfigManager::new(config)?);
        let stats = Arc::new(ProcessingStats::new());
        Ok(AutoTagService {
            scheduler: ReconciliationScheduler::new(inventory, resolver, config, stats),
        })
    }

    /// Arms the periodic timer; the first pass runs after `warmup`.
    pub fn start(&self, warmup: Duration) {
        self.scheduler.start_timer(warmup);
    }

    /// Applies a partial settings update.
    ///
    /// A pass already in progress finishes with the settings it started
    /// with. Changing the interval restarts the timer.
    pub fn update_settings(&self, patch: &ConfigPatch) -> Result<Arc<ScanConfig>, ConfigError> {
        self.scheduler.reconfigure(patch).inspect_err(|e| {
            warn!("Rejected settings update: {}", e);
        })
    }

    /// Scans one collection now. Returns `false` if the collection is
    /// unknown or could not be fetched.
    pub async fn force_scan(&self, collection_id: &str) -> bool {
        match self.scan_collection(collection_id).await {
            Ok(Some(_)) => true,
            Ok(None) => {
                info!("Forced scan requested for unknown collection {}", collection_id);
                false
            }
            Err(e) => {
                warn!("Forced scan of collection {} failed: {}", collection_id, e);
                false
            }
        }
    }

    /// Scans one collection now and returns its counts.
    ///
    /// Does not wait for, or block, a full pass.
    pub async fn scan_collection(
        &self,
        collection_id: &str,
    ) -> Result<Option<ScanReport>, InventoryError> {
        self.scheduler.force_collection(collection_id).await
    }

    /// Runs a full pass now, unless one is already running.
    pub async fn scan_now(&self) -> Option<PassReport> {
        self.scheduler.start().await
    }

    pub fn is_running(&self) -> bool {
        self.scheduler.state() == SchedulerState::Running
    }

    pub fn get_stats(&self) -> StatsSnapshot {
        let config = self.scheduler.config().snapshot();
        let stats = self.scheduler.stats();
        StatsSnapshot {
            enabled: self.scheduler.is_timer_active(),
            update_interval_secs: config.update_interval.as_secs(),
            geo_api_url: config.geo_api_url.clone(),
            tag_prefix: config.tag_prefix.clone(),
            endpoint_concurrency: config.endpoint_concurrency,
            running: self.is_running(),
            passes_completed: stats.passes_completed(),
            passes_skipped: stats.passes_skipped(),
            last_pass: self.scheduler.last_pass(),
            outcomes: stats.snapshot(),
        }
    }

    pub fn stats(&self) -> &Arc<ProcessingStats> {
        self.scheduler.stats()
    }

    /// Stops automatic passes. A pass in progress is not interrupted; use
    /// [`wait_idle`](Self::wait_idle) to wait for it.
    pub fn shutdown(&self) {
        self.scheduler.shutdown();
    }

    pub async fn wait_idle(&self) {
        self.scheduler.wait_idle().await;
    }
}
