//! Reconciliation scheduling.
//!
//! One periodic timer plus on-demand triggers. A full pass holds the
//! fleet-wide Running flag; starting a pass while one is running is a logged
//! no-op. Single-collection scans (`force_collection`) do not take the flag
//! and may overlap a full pass, so two scans can write the same endpoint
//! concurrently; the last write wins.

mod timer;


use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Instant;

use chrono::Utc;
use log::{error, info};
use tokio::sync::watch;

use crate::config::{ConfigManager, ConfigPatch, ScanConfig};
use crate::error_handling::{ConfigError, InventoryError, OutcomeType, ProcessingStats};
use crate::geoip::GeoResolver;
use crate::inventory::Inventory;
use crate::scan::{EndpointScanner, PassReport, ScanReport};

use timer::TimerHandle;

/// Whether a full pass is in progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchedulerState {
    Idle,
    Running,
}

/// Owns the timer and the Running flag, and fans passes out to the scanner.
///
/// Cheap to clone; clones share all state.
#[derive(Clone)]
pub struct ReconciliationScheduler {
    inner: Arc<SchedulerInner>,
}

struct SchedulerInner {
    scanner: EndpointScanner,
    inventory: Arc<dyn Inventory>,
    config: Arc<ConfigManager>,
    stats: Arc<ProcessingStats>,
    running: watch::Sender<bool>,
    last_pass: Mutex<Option<PassReport>>,
    timer: Mutex<Option<TimerHandle>>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    match mutex.lock() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    }
}

/// Clears the Running flag when the pass ends, however it ends.
struct RunningGuard<'a> {
    running: &'a watch::Sender<bool>,
}

impl<'a> RunningGuard<'a> {
    fn acquire(running: &'a watch::Sender<bool>) -> Option<Self> {
        let acquired = running.send_if_modified(|flag| {
            if *flag {
                false
            } else {
                *flag = true;
                true
            }
        });
        acquired.then_some(RunningGuard { running })
    }
}

impl Drop for RunningGuard<'_> {
    fn drop(&mut self) {
        self.running.send_replace(false);
    }
}

impl ReconciliationScheduler {
    pub fn new(
        inventory: Arc<dyn Inventory>,
        resolver: Arc<dyn GeoResolver>,
        config: Arc<ConfigManager>,
        stats: Arc<ProcessingStats>,
    ) -> Self {
        let scanner = EndpointScanner::new(Arc::clone(&inventory), resolver, Arc::clone(&stats));
        let (running, _) = watch::channel(false);
        ReconciliationScheduler {
            inner: Arc::new(SchedulerInner {
                scanner,
                inventory,
                config,
                stats,
                running,
                last_pass: Mutex::new(None),
                timer: Mutex::new(None),
            }),
        }
    }

    pub fn state(&self) -> SchedulerState {
        if *self.inner.running.borrow() {
            SchedulerState::Running
        } else {
            SchedulerState::Idle
        }
    }

    pub fn config(&self) -> &Arc<ConfigManager> {
        &self.inner.config
    }

    pub fn stats(&self) -> &Arc<ProcessingStats> {
        &self.inner.stats
    }

    pub fn last_pass(&self) -> Option<PassReport> {
        lock(&self.inner.last_pass).clone()
    }

    /// Whether the periodic timer is armed.
    pub fn is_timer_active(&self) -> bool {
        lock(&self.inner.timer).is_some()
    }

    /// Runs one full pass over every collection, sequentially.
    ///
    /// Returns `None` without doing anything if a pass is already running.
    /// The pass uses the configuration snapshot current at its start.
    pub async fn start(&self) -> Option<PassReport> {
        let Some(_guard) = RunningGuard::acquire(&self.inner.running) else {
            info!("Reconciliation pass already running, ignoring start request");
            self.inner.stats.record_pass_skipped();
            return None;
        };

        let config = self.inner.config.snapshot();
        let started_at = Utc::now();
        let clock = Instant::now();
        let mut endpoints = ScanReport::default();

        let collections = match self.inner.inventory.list_collections().await {
            Ok(collections) => collections,
            Err(e) => {
                error!("Failed to list collections: {}", e);
                self.inner.stats.increment(OutcomeType::ListingFailed);
                endpoints.record(OutcomeType::ListingFailed);
                Vec::new()
            }
        };

        info!("Starting scan of {} collections", collections.len());

        for collection in &collections {
            let report = self.inner.scanner.scan_collection(&config, collection).await;
            endpoints.absorb(&report);
        }

        let report = PassReport {
            started_at,
            elapsed_seconds: clock.elapsed().as_secs_f64(),
            collections: collections.len(),
            endpoints,
        };
        info!(
            "Scan complete in {:.2}s: {} endpoints, {} tagged, {} no data, {} offline, {} failed",
            report.elapsed_seconds,
            report.endpoints.total,
            report.endpoints.tagged,
            report.endpoints.no_data,
            report.endpoints.skipped,
            report.endpoints.failed
        );

        self.inner.stats.record_pass_completed();
        *lock(&self.inner.last_pass) = Some(report.clone());
        Some(report)
    }

    /// Scans exactly one collection, regardless of the Running flag.
    ///
    /// Returns `Ok(None)` if the inventory does not know the collection.
    pub async fn force_collection(
        &self,
        collection_id: &str,
    ) -> Result<Option<ScanReport>, InventoryError> {
        let Some(collection) = self.inner.inventory.get_collection(collection_id).await? else {
            return Ok(None);
        };
        let config = self.inner.config.snapshot();
        let report = self.inner.scanner.scan_collection(&config, &collection).await;
        info!("Forced scan of collection {} finished", collection_id);
        Ok(Some(report))
    }

    /// Arms the periodic timer. The first automatic pass runs after `warmup`,
    /// then every configured interval. Re-arming replaces the old timer.
    pub fn start_timer(&self, warmup: std::time::Duration) {
        let interval = self.inner.config.snapshot().update_interval;
        let handle = timer::spawn(self.clone(), interval, Some(warmup));
        if let Some(old) = lock(&self.inner.timer).replace(handle) {
            old.cancel();
        }
        info!(
            "Reconciliation timer armed: first pass in {}s, then every {}s",
            warmup.as_secs(),
            interval.as_secs()
        );
    }

    /// Installs a configuration update.
    ///
    /// A running pass keeps the snapshot it started with. If the interval
    /// changed and the timer is armed, the timer restarts with the new
    /// interval; its first tick comes one full interval from now. A warm-up
    /// pass that has not fired yet keeps its original deadline.
    pub fn reconfigure(&self, patch: &ConfigPatch) -> Result<Arc<ScanConfig>, ConfigError> {
        let (previous, next) = self.inner.config.apply(patch)?;
        if previous.update_interval != next.update_interval {
            let mut timer = lock(&self.inner.timer);
            if let Some(old) = timer.take() {
                let warmup = old.remaining_warmup();
                old.cancel();
                *timer = Some(timer::spawn(self.clone(), next.update_interval, warmup));
                info!(
                    "Reconciliation timer restarted with interval {}s",
                    next.update_interval.as_secs()
                );
            }
        }
        Ok(next)
    }

    /// Stops future automatic passes. A pass in progress runs to completion.
    pub fn shutdown(&self) {
        if let Some(timer) = lock(&self.inner.timer).take() {
            timer.cancel();
        }
        info!("Reconciliation scheduler shut down");
    }

    /// Resolves once no full pass is running.
    pub async fn wait_idle(&self) {
        let mut running = self.inner.running.subscribe();
        // The sender lives in `inner`, which we hold, so this cannot fail
        let _ = running.wait_for(|flag| !*flag).await;
    }
}
