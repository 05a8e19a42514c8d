//! Configuration types and CLI options.
//!
//! `Config` holds process options parsed from the command line. `ScanConfig`
//! is the live, replaceable set of tunables a reconciliation pass reads, and
//! `ConfigPatch` is a partial update to it.

use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, ValueEnum};
use serde::{Deserialize, Deserializer, Serialize};

use crate::config::constants::*;
use crate::error_handling::ConfigError;

/// Logging level for the application.
#[derive(Clone, Debug, ValueEnum)]
pub enum LogLevel {
    /// Only error messages
    Error,
    /// Error and warning messages
    Warn,
    /// Error, warning, and informational messages
    Info,
    /// All messages except trace
    Debug,
    /// All messages including trace
    Trace,
}

impl From<LogLevel> for log::LevelFilter {
    fn from(l: LogLevel) -> Self {
        match l {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

/// Log output format.
///
/// - `Plain`: Human-readable format with colors (default)
/// - `Json`: One JSON object per line
#[derive(Clone, Debug, ValueEnum)]
pub enum LogFormat {
    /// Human-readable format with colors (default)
    Plain,
    /// Structured JSON format for machine parsing
    Json,
}

/// Process options for the `geo_autotag` binary.
///
/// Only `interval_secs`, `geo_api_url`, the prefixes and `endpoint_concurrency`
/// feed the live [`ScanConfig`]; the rest is fixed for the lifetime of the process.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "geo_autotag",
    version,
    about = "Keeps geolocation tags on managed endpoints in sync with their current IP address"
)]
pub struct Config {
    /// SQLite inventory database
    #[arg(long, env = "GEO_AUTOTAG_DB_PATH", default_value = DB_PATH)]
    pub db_path: PathBuf,

    /// Seconds between automatic passes
    #[arg(long, value_name = "SECONDS", default_value_t = DEFAULT_UPDATE_INTERVAL.as_secs())]
    pub interval_secs: u64,

    /// Geolocation service base address; the IP address is appended to it
    #[arg(long, env = "GEO_AUTOTAG_API_URL", default_value = DEFAULT_GEO_API_URL)]
    pub geo_api_url: String,

    #[arg(long, default_value = DEFAULT_CITY_PREFIX)]
    pub city_prefix: String,

    #[arg(long, default_value = DEFAULT_STATE_PREFIX)]
    pub state_prefix: String,

    #[arg(long, default_value = DEFAULT_COUNTRY_PREFIX)]
    pub country_prefix: String,

    #[arg(long, default_value = DEFAULT_PROVIDER_PREFIX)]
    pub provider_prefix: String,

    /// Maximum lookups in flight within one collection
    #[arg(long, default_value_t = DEFAULT_ENDPOINT_CONCURRENCY)]
    pub endpoint_concurrency: usize,

    /// Seconds to wait after startup before the first automatic pass
    #[arg(long, value_name = "SECONDS", default_value_t = DEFAULT_WARMUP_DELAY.as_secs())]
    pub warmup_secs: u64,

    /// Per-request timeout for the geolocation call
    #[arg(long, default_value_t = DEFAULT_REQUEST_TIMEOUT_SECS)]
    pub timeout_seconds: u64,

    #[arg(long, value_enum, default_value_t = LogLevel::Info)]
    pub log_level: LogLevel,

    #[arg(long, value_enum, default_value_t = LogFormat::Plain)]
    pub log_format: LogFormat,

    /// Serve the control API on 127.0.0.1:<PORT> (disabled by default)
    #[arg(long)]
    pub status_port: Option<u16>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            db_path: PathBuf::from(DB_PATH),
            interval_secs: DEFAULT_UPDATE_INTERVAL.as_secs(),
            geo_api_url: DEFAULT_GEO_API_URL.to_string(),
            city_prefix: DEFAULT_CITY_PREFIX.to_string(),
            state_prefix: DEFAULT_STATE_PREFIX.to_string(),
            country_prefix: DEFAULT_COUNTRY_PREFIX.to_string(),
            provider_prefix: DEFAULT_PROVIDER_PREFIX.to_string(),
            endpoint_concurrency: DEFAULT_ENDPOINT_CONCURRENCY,
            warmup_secs: DEFAULT_WARMUP_DELAY.as_secs(),
            timeout_seconds: DEFAULT_REQUEST_TIMEOUT_SECS,
            log_level: LogLevel::Info,
            log_format: LogFormat::Plain,
            status_port: None,
        }
    }
}

impl Config {
    /// Builds and validates the initial live configuration from the process options.
    pub fn scan_config(&self) -> Result<ScanConfig, ConfigError> {
        let config = ScanConfig {
            update_interval: Duration::from_secs(self.interval_secs),
            geo_api_url: self.geo_api_url.clone(),
            tag_prefix: TagPrefixes {
                city: self.city_prefix.clone(),
                state: self.state_prefix.clone(),
                country: self.country_prefix.clone(),
                provider: self.provider_prefix.clone(),
            },
            endpoint_concurrency: self.endpoint_concurrency,
        };
        config.validate()?;
        Ok(config)
    }

    pub fn warmup_delay(&self) -> Duration {
        Duration::from_secs(self.warmup_secs)
    }
}

/// Label prefix per managed category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagPrefixes {
    pub city: String,
    pub state: String,
    pub country: String,
    pub provider: String,
}

impl Default for TagPrefixes {
    fn default() -> Self {
        Self {
            city: DEFAULT_CITY_PREFIX.to_string(),
            state: DEFAULT_STATE_PREFIX.to_string(),
            country: DEFAULT_COUNTRY_PREFIX.to_string(),
            provider: DEFAULT_PROVIDER_PREFIX.to_string(),
        }
    }
}

impl TagPrefixes {
    /// Every prefix that marks a label as managed, including the fixed ISO prefix.
    pub fn managed(&self) -> [&str; 5] {
        [
            self.city.as_str(),
            self.state.as_str(),
            self.country.as_str(),
            self.provider.as_str(),
            ISO_PREFIX,
        ]
    }

    /// Returns `true` if `label` belongs to one of the managed categories.
    pub fn is_managed(&self, label: &str) -> bool {
        self.managed().iter().any(|prefix| label.starts_with(prefix))
    }
}

/// Live tunables read by every pass.
///
/// Held as an immutable snapshot; a pass keeps the snapshot it captured at its
/// start even if a newer one is installed meanwhile.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanConfig {
    pub update_interval: Duration,
    pub geo_api_url: String,
    pub tag_prefix: TagPrefixes,
    pub endpoint_concurrency: usize,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            update_interval: DEFAULT_UPDATE_INTERVAL,
            geo_api_url: DEFAULT_GEO_API_URL.to_string(),
            tag_prefix: TagPrefixes::default(),
            endpoint_concurrency: DEFAULT_ENDPOINT_CONCURRENCY,
        }
    }
}

impl ScanConfig {
    /// Checks the invariants every installed configuration must satisfy.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.update_interval.is_zero() {
            return Err(ConfigError::ZeroInterval);
        }
        if self.endpoint_concurrency == 0 {
            return Err(ConfigError::ZeroConcurrency);
        }

        let parsed = url::Url::parse(&self.geo_api_url)
            .map_err(|e| ConfigError::InvalidApiUrl(format!("{}: {}", self.geo_api_url, e)))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(ConfigError::InvalidApiUrl(format!(
                "{}: scheme must be http or https",
                self.geo_api_url
            )));
        }

        let prefixes = [
            ("city", &self.tag_prefix.city),
            ("state", &self.tag_prefix.state),
            ("country", &self.tag_prefix.country),
            ("provider", &self.tag_prefix.provider),
        ];
        for (category, prefix) in prefixes {
            if prefix.is_empty() {
                return Err(ConfigError::EmptyPrefix(category));
            }
        }

        // Every label must belong to at most one managed category
        let managed = self.tag_prefix.managed();
        for (i, first) in managed.iter().enumerate() {
            for second in &managed[i + 1..] {
                if first.starts_with(*second) || second.starts_with(*first) {
                    return Err(ConfigError::OverlappingPrefixes {
                        first: first.to_string(),
                        second: second.to_string(),
                    });
                }
            }
        }
        Ok(())
    }

    /// Returns a new configuration with `patch` merged over `self`.
    ///
    /// Prefixes merge key by key. The result is validated; on error `self` is
    /// the configuration that stays in effect.
    pub fn merged(&self, patch: &ConfigPatch) -> Result<ScanConfig, ConfigError> {
        let mut next = self.clone();
        if let Some(interval) = patch.update_interval {
            next.update_interval = interval;
        }
        if let Some(url) = &patch.geo_api_url {
            next.geo_api_url = url.clone();
        }
        if let Some(concurrency) = patch.endpoint_concurrency {
            next.endpoint_concurrency = concurrency;
        }
        if let Some(prefixes) = &patch.tag_prefix {
            if let Some(city) = &prefixes.city {
                next.tag_prefix.city = city.clone();
            }
            if let Some(state) = &prefixes.state {
                next.tag_prefix.state = state.clone();
            }
            if let Some(country) = &prefixes.country {
                next.tag_prefix.country = country.clone();
            }
            if let Some(provider) = &prefixes.provider {
                next.tag_prefix.provider = provider.clone();
            }
        }
        next.validate()?;
        Ok(next)
    }
}

/// Partial update to [`ScanConfig`]. Unset fields keep their current value.
///
/// Deserializes from the settings payload accepted by the control server,
/// with `updateInterval` given in seconds:
///
/// ```json
/// {"updateInterval": 1800, "tagPrefix": {"city": "City:"}}
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ConfigPatch {
    #[serde(default, deserialize_with = "duration_from_secs")]
    pub update_interval: Option<Duration>,
    #[serde(default)]
    pub geo_api_url: Option<String>,
    #[serde(default)]
    pub tag_prefix: Option<TagPrefixPatch>,
    #[serde(default)]
    pub endpoint_concurrency: Option<usize>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TagPrefixPatch {
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default)]
    pub provider: Option<String>,
}

fn duration_from_secs<'de, D>(deserializer: D) -> Result<Option<Duration>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<u64>::deserialize(deserializer)?.map(Duration::from_secs))
}
