//! Control server HTTP handlers.

mod scan;
mod settings;
mod stats;

pub use scan::{scan_collection_handler, scan_handler};
pub use settings::settings_handler;
pub use stats::stats_handler;
