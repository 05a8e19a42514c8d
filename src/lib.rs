//! geo_autotag library: keeps geolocation labels on managed endpoints in sync
//! with their current IP address.
//!
//! A [`ReconciliationScheduler`] periodically walks every collection in an
//! [`Inventory`], resolves each online endpoint's address through a
//! [`GeoResolver`], and rewrites the endpoint's *managed* labels (city, state,
//! country, provider, ISO code) while leaving every other label alone. Each
//! label write is followed by an audit record.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use geo_autotag::{AutoTagService, HttpGeoResolver, ScanConfig, SqliteInventory};
//! use geo_autotag::initialization::init_client;
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let inventory = SqliteInventory::open(std::path::Path::new("fleet.db")).await?;
//! let resolver = HttpGeoResolver::new(init_client(10)?);
//! let service = AutoTagService::new(Arc::new(inventory), Arc::new(resolver), ScanConfig::default())?;
//!
//! if let Some(report) = service.scan_now().await {
//!     println!("{} endpoints tagged", report.endpoints.tagged);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! # Requirements
//!
//! This library requires a Tokio runtime.

pub mod app;
pub mod config;
pub mod error_handling;
pub mod geoip;
pub mod initialization;
pub mod inventory;
mod run;
pub mod scan;
pub mod scheduler;
pub mod status_server;
pub mod storage;
pub mod tags;

// Re-export public API
pub use app::{AutoTagService, StatsSnapshot};
pub use config::{Config, ConfigPatch, LogFormat, LogLevel, ScanConfig, TagPrefixes};
pub use error_handling::{ConfigError, InventoryError, LookupError, OutcomeType};
pub use geoip::{GeoLookup, GeoResolver, GeoResult, HttpGeoResolver};
pub use inventory::{AuditRecord, Collection, Endpoint, Inventory, MemoryInventory};
pub use run::{run_service, shutdown_signal};
pub use scan::{PassReport, ScanReport};
pub use scheduler::{ReconciliationScheduler, SchedulerState};
pub use storage::SqliteInventory;
