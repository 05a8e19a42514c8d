//! Error type definitions.
//!
//! This module defines the error types used throughout the crate and the
//! per-endpoint outcome categories tracked by [`super::ProcessingStats`].

use log::SetLoggerError;
use reqwest::Error as ReqwestError;
use serde::Serialize;
use strum_macros::EnumIter as EnumIterMacro;
use thiserror::Error;

/// Error types for initialization failures.
#[derive(Error, Debug)]
#[allow(clippy::enum_variant_names)] // All variants end with "Error" by convention
pub enum InitializationError {
    /// Error initializing the logger.
    #[error("Logger initialization error: {0}")]
    LoggerError(#[from] SetLoggerError),

    /// Error initializing the HTTP client.
    #[error("HTTP client initialization error: {0}")]
    HttpClientError(#[from] ReqwestError),

    /// Error opening or migrating the inventory database.
    #[error("Database initialization error: {0}")]
    DatabaseError(String),
}

/// Failure to obtain a usable answer from the geolocation service.
///
/// A service that answers with a non-success status is *not* an error; see
/// [`crate::geoip::GeoLookup::NoData`].
#[derive(Error, Debug)]
pub enum LookupError {
    /// Connection refused, DNS failure, reset, and similar.
    #[error("geolocation request failed: {0}")]
    Transport(#[source] ReqwestError),

    /// The request did not complete within the configured timeout.
    #[error("geolocation request timed out")]
    Timeout,

    /// Non-2xx response whose body is not a geolocation payload.
    #[error("geolocation service returned HTTP {status}")]
    HttpStatus { status: u16 },

    /// The body could not be parsed as the expected structure.
    #[error("malformed geolocation response: {0}")]
    Parse(#[from] serde_json::Error),

    /// The endpoint reported an address that is not an IP address.
    #[error("not an IP address: {0:?}")]
    InvalidAddress(String),
}

/// Failure reported by the inventory collaborator.
#[derive(Error, Debug)]
pub enum InventoryError {
    /// SQL execution error.
    #[error("SQL error: {0}")]
    Database(#[from] sqlx::Error),

    /// Stored labels or audit payload could not be (de)serialized.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The referenced endpoint does not exist in the named collection.
    #[error("endpoint {endpoint_id} not found in collection {collection_id}")]
    NotFound {
        collection_id: String,
        endpoint_id: String,
    },

    /// A stored value could not be decoded.
    #[error("corrupt inventory data: {0}")]
    Corrupt(String),

    /// The host's inventory could not serve the request.
    #[error("inventory unavailable: {0}")]
    Unavailable(String),
}

/// Rejected configuration.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    #[error("update interval must be greater than zero")]
    ZeroInterval,

    #[error("endpoint concurrency must be at least 1")]
    ZeroConcurrency,

    #[error("invalid geolocation API URL {0}")]
    InvalidApiUrl(String),

    #[error("tag prefix for {0} must not be empty")]
    EmptyPrefix(&'static str),

    /// Two managed prefixes where one starts with the other, so a label
    /// could belong to both categories.
    #[error("tag prefixes {first:?} and {second:?} overlap")]
    OverlappingPrefixes { first: String, second: String },
}

/// Outcome of handling one endpoint (or one collection listing).
///
/// Counted cumulatively across passes by [`super::ProcessingStats`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, EnumIterMacro)]
#[serde(rename_all = "snake_case")]
pub enum OutcomeType {
    /// Endpoint has no current address; skipped.
    Offline,
    /// Labels projected, written and audited.
    Tagged,
    /// The service had nothing usable; labels left untouched.
    NoData,
    /// Transport or parse failure on the lookup.
    LookupFailed,
    /// Label write or audit append failed.
    PersistFailed,
    /// The collection's endpoints could not be listed.
    ListingFailed,
}

impl std::fmt::Display for OutcomeType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl OutcomeType {
    pub fn as_str(&self) -> &'static str {
        match self {
            OutcomeType::Offline => "offline",
            OutcomeType::Tagged => "tagged",
            OutcomeType::NoData => "no_data",
            OutcomeType::LookupFailed => "lookup_failed",
            OutcomeType::PersistFailed => "persist_failed",
            OutcomeType::ListingFailed => "listing_failed",
        }
    }
}
