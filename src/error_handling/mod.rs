//! Error handling and processing statistics.
//!
//! This module provides:
//! - Error type definitions (lookup, inventory, configuration, initialization)
//! - Categorization of HTTP client errors
//! - Cumulative outcome counters
//!
//! No per-endpoint failure aborts a pass: lookup and persistence errors are
//! logged, counted as an [`OutcomeType`], and the scan moves on.

mod categorization;
mod stats;
mod types;

// Re-export public API
pub use categorization::categorize_reqwest_error;
pub use stats::ProcessingStats;
pub use types::{ConfigError, InitializationError, InventoryError, LookupError, OutcomeType};

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn test_processing_stats_initialization() {
        let stats = ProcessingStats::new();
        for outcome in OutcomeType::iter() {
            assert_eq!(stats.get_count(outcome), 0);
        }
        assert_eq!(stats.passes_completed(), 0);
        assert_eq!(stats.passes_skipped(), 0);
    }

    #[test]
    fn test_processing_stats_increment() {
        let stats = ProcessingStats::new();
        stats.increment(OutcomeType::Tagged);
        stats.increment(OutcomeType::Tagged);
        stats.increment(OutcomeType::LookupFailed);
        stats.increment(OutcomeType::PersistFailed);

        assert_eq!(stats.get_count(OutcomeType::Tagged), 2);
        assert_eq!(stats.total_failures(), 2);
        assert_eq!(stats.get_count(OutcomeType::NoData), 0);
    }

    #[test]
    fn test_processing_stats_snapshot_names() {
        let stats = ProcessingStats::new();
        stats.increment(OutcomeType::Offline);
        let snapshot = stats.snapshot();
        assert_eq!(snapshot.len(), OutcomeType::iter().count());
        assert_eq!(snapshot["offline"], 1);
        assert_eq!(snapshot["no_data"], 0);
    }

    #[test]
    fn test_outcome_display() {
        assert_eq!(OutcomeType::NoData.to_string(), "no_data");
        assert_eq!(OutcomeType::PersistFailed.to_string(), "persist_failed");
    }

    #[test]
    fn test_lookup_error_messages() {
        let err = LookupError::HttpStatus { status: 429 };
        assert_eq!(err.to_string(), "geolocation service returned HTTP 429");
        let err = LookupError::InvalidAddress("offline".to_string());
        assert!(err.to_string().contains("offline"));
    }

    #[test]
    fn test_inventory_not_found_message() {
        let err = InventoryError::NotFound {
            collection_id: "mesh//a".to_string(),
            endpoint_id: "node//1".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "endpoint node//1 not found in collection mesh//a"
        );
    }
}
