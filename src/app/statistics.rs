//! Statistics reporting.

use std::collections::BTreeMap;

use log::info;
use serde::Serialize;
use strum::IntoEnumIterator;

use crate::config::TagPrefixes;
use crate::error_handling::{OutcomeType, ProcessingStats};
use crate::scan::PassReport;

/// Point-in-time view of the service, served as JSON by `GET /stats`.
#[derive(Debug, Clone, Serialize)]
pub struct StatsSnapshot {
    /// Whether the periodic timer is armed
    pub enabled: bool,
    pub update_interval_secs: u64,
    pub geo_api_url: String,
    pub tag_prefix: TagPrefixes,
    pub endpoint_concurrency: usize,
    /// Whether a full pass is in progress
    pub running: bool,
    pub passes_completed: usize,
    pub passes_skipped: usize,
    pub last_pass: Option<PassReport>,
    /// Cumulative endpoint outcomes since startup, keyed by outcome name
    pub outcomes: BTreeMap<&'static str, usize>,
}

/// Logs cumulative outcome counts, one line per non-zero outcome.
pub fn log_outcome_summary(stats: &ProcessingStats) {
    info!(
        "Passes: {} completed, {} skipped",
        stats.passes_completed(),
        stats.passes_skipped()
    );

    let total_failures = stats.total_failures();
    if total_failures > 0 {
        info!("Failures ({} total):", total_failures);
    }
    for outcome in OutcomeType::iter() {
        let count = stats.get_count(outcome);
        if count > 0 {
            info!("   {}: {}", outcome.as_str(), count);
        }
    }
}
