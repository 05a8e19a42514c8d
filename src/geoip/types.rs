//! GeoIP data structures.
//!
//! `GeoResult` is what the rest of the crate sees; `IpApiResponse` mirrors the
//! wire payload of ip-api.com compatible services.

use serde::{Deserialize, Serialize};

/// Resolved metadata for one address. Every field may be absent.
///
/// Serialized into audit records using the service's short field names.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GeoResult {
    pub city: Option<String>,
    pub region: Option<String>,
    pub country: Option<String>,
    pub country_code: Option<String>,
    pub isp: Option<String>,
    pub org: Option<String>,
    /// Autonomous system, e.g. `AS15169 Google LLC`
    #[serde(rename = "as")]
    pub asn: Option<String>,
    pub timezone: Option<String>,
    #[serde(rename = "lat")]
    pub latitude: Option<f64>,
    #[serde(rename = "lon")]
    pub longitude: Option<f64>,
}

/// Outcome of a lookup that completed.
#[derive(Debug, Clone, PartialEq)]
pub enum GeoLookup {
    /// The service reported success.
    Found(GeoResult),
    /// The service answered but had nothing usable (private range, quota
    /// exceeded, reserved address...). Carries the service's message if any.
    NoData { message: Option<String> },
}

impl GeoLookup {
    pub fn result(&self) -> Option<&GeoResult> {
        match self {
            GeoLookup::Found(result) => Some(result),
            GeoLookup::NoData { .. } => None,
        }
    }
}

/// Response body of `GET {base}{ip}`.
///
/// `status` is required: a body without it is not a geolocation payload.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct IpApiResponse {
    pub status: String,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub region_name: Option<String>,
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default)]
    pub country_code: Option<String>,
    #[serde(default)]
    pub isp: Option<String>,
    #[serde(default)]
    pub org: Option<String>,
    #[serde(default, rename = "as")]
    pub asn: Option<String>,
    #[serde(default)]
    pub timezone: Option<String>,
    #[serde(default)]
    pub lat: Option<f64>,
    #[serde(default)]
    pub lon: Option<f64>,
}
