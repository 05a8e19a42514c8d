//! Configuration constants.
//!
//! Defaults for the live tunables and for the process options, plus the
//! fixed label prefix used for ISO country codes.

use std::time::Duration;

/// Default reconciliation interval (1 hour)
pub const DEFAULT_UPDATE_INTERVAL: Duration = Duration::from_secs(60 * 60);

/// Default geolocation service base address. The endpoint's IP is appended verbatim.
pub const DEFAULT_GEO_API_URL: &str = "http://ip-api.com/json/";

// Default label prefixes per managed category
pub const DEFAULT_CITY_PREFIX: &str = "Cidade:";
pub const DEFAULT_STATE_PREFIX: &str = "Estado:";
pub const DEFAULT_COUNTRY_PREFIX: &str = "Pais:";
pub const DEFAULT_PROVIDER_PREFIX: &str = "Provedor:";

/// Prefix for the ISO country code label. Not configurable.
pub const ISO_PREFIX: &str = "ISO:";

/// Lookups run one at a time within a collection unless configured otherwise.
/// ip-api.com's free tier allows 45 requests per minute.
pub const DEFAULT_ENDPOINT_CONCURRENCY: usize = 1;

/// Delay before the first automatic pass after startup
pub const DEFAULT_WARMUP_DELAY: Duration = Duration::from_secs(30);

/// Overall per-request timeout for the geolocation call
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 10;
/// TCP connection timeout in seconds
pub const TCP_CONNECT_TIMEOUT_SECS: u64 = 5;

pub const DB_PATH: &str = "./geo_autotag.db";

/// Category written into every audit record produced by this crate.
pub const AUDIT_KIND: &str = "autotag_geo";

pub const DEFAULT_USER_AGENT: &str = concat!("geo_autotag/", env!("CARGO_PKG_VERSION"));
