//! Service facade over the scheduler.
//!
//! `AutoTagService` is what the binary and the control server hold: it owns
//! the scheduler and answers settings, scan, and statistics requests.

mod service;
pub mod statistics;

pub use service::AutoTagService;
pub use statistics::{log_outcome_summary, StatsSnapshot};
