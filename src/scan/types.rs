//! Scan report types.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::error_handling::OutcomeType;

/// Counts for one collection scan (or the sum over a pass).
///
/// `processed` includes both tagged endpoints and those the service had no
/// data for; `skipped` are offline endpoints; `failed` covers lookup and
/// persistence failures.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ScanReport {
    pub total: usize,
    pub skipped: usize,
    pub processed: usize,
    pub failed: usize,
    pub tagged: usize,
    pub no_data: usize,
    /// Collections whose endpoints could not be listed
    pub listing_failures: usize,
}

impl ScanReport {
    /// Counts one endpoint outcome.
    pub fn record(&mut self, outcome: OutcomeType) {
        match outcome {
            OutcomeType::Offline => self.skipped += 1,
            OutcomeType::Tagged => {
                self.processed += 1;
                self.tagged += 1;
            }
            OutcomeType::NoData => {
                self.processed += 1;
                self.no_data += 1;
            }
            OutcomeType::LookupFailed | OutcomeType::PersistFailed => self.failed += 1,
            OutcomeType::ListingFailed => {
                self.listing_failures += 1;
                return;
            }
        }
        self.total += 1;
    }

    /// Adds another report's counts to this one.
    pub fn absorb(&mut self, other: &ScanReport) {
        self.total += other.total;
        self.skipped += other.skipped;
        self.processed += other.processed;
        self.failed += other.failed;
        self.tagged += other.tagged;
        self.no_data += other.no_data;
        self.listing_failures += other.listing_failures;
    }
}

/// Summary of one full pass over every collection.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PassReport {
    pub started_at: DateTime<Utc>,
    pub elapsed_seconds: f64,
    pub collections: usize,
    pub endpoints: ScanReport,
}
