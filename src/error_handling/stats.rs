//! Processing statistics tracking.
//!
//! Thread-safe cumulative counters for endpoint outcomes across every pass
//! and forced scan since the service started.

use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicUsize, Ordering};
use strum::IntoEnumIterator;

use super::types::OutcomeType;

/// Thread-safe outcome counters.
///
/// All outcome types are initialized to zero on creation, so lookups by
/// variant always hit the map.
pub struct ProcessingStats {
    outcomes: HashMap<OutcomeType, AtomicUsize>,
    passes_completed: AtomicUsize,
    passes_skipped: AtomicUsize,
}

impl ProcessingStats {
    pub fn new() -> Self {
        let mut outcomes = HashMap::new();
        for outcome in OutcomeType::iter() {
            outcomes.insert(outcome, AtomicUsize::new(0));
        }

        ProcessingStats {
            outcomes,
            passes_completed: AtomicUsize::new(0),
            passes_skipped: AtomicUsize::new(0),
        }
    }

    /// Increment an outcome counter.
    pub fn increment(&self, outcome: OutcomeType) {
        if let Some(counter) = self.outcomes.get(&outcome) {
            counter.fetch_add(1, Ordering::Relaxed);
        } else {
            log::error!(
                "Attempted to increment counter for {:?} which is not in the map. \
                 This indicates a bug in ProcessingStats initialization.",
                outcome
            );
        }
    }

    /// Get the count for an outcome type.
    pub fn get_count(&self, outcome: OutcomeType) -> usize {
        self.outcomes
            .get(&outcome)
            .map(|c| c.load(Ordering::SeqCst))
            .unwrap_or(0)
    }

    /// Total endpoint-level failures (lookup and persistence).
    pub fn total_failures(&self) -> usize {
        self.get_count(OutcomeType::LookupFailed) + self.get_count(OutcomeType::PersistFailed)
    }

    pub fn record_pass_completed(&self) {
        self.passes_completed.fetch_add(1, Ordering::Relaxed);
    }

    /// A start request that found a pass already running.
    pub fn record_pass_skipped(&self) {
        self.passes_skipped.fetch_add(1, Ordering::Relaxed);
    }

    pub fn passes_completed(&self) -> usize {
        self.passes_completed.load(Ordering::SeqCst)
    }

    pub fn passes_skipped(&self) -> usize {
        self.passes_skipped.load(Ordering::SeqCst)
    }

    /// Snapshot of all counters keyed by outcome name, in a stable order.
    pub fn snapshot(&self) -> BTreeMap<&'static str, usize> {
        OutcomeType::iter()
            .map(|outcome| (outcome.as_str(), self.get_count(outcome)))
            .collect()
    }
}

impl Default for ProcessingStats {
    fn default() -> Self {
        Self::new()
    }
}
