//! Geolocation lookups over HTTP.

use std::sync::Arc;

use async_trait::async_trait;
use log::{debug, warn};

use super::extract::{interpret_response, normalize_address};
use super::types::{GeoLookup, IpApiResponse};
use crate::error_handling::LookupError;

/// Resolves a network address to geolocation metadata.
///
/// Implementations hold no per-address state: no caching, no retries. The
/// base address is passed per call so a pass keeps using the configuration it
/// captured at its start.
#[async_trait]
pub trait GeoResolver: Send + Sync {
    /// Looks up `address` against the service rooted at `base_url`.
    ///
    /// Returns `GeoLookup::NoData` when the service answers without usable
    /// data, and `LookupError` when no parseable answer was obtained.
    async fn resolve(&self, base_url: &str, address: &str) -> Result<GeoLookup, LookupError>;
}

/// [`GeoResolver`] backed by an ip-api.com compatible JSON service.
#[derive(Clone)]
pub struct HttpGeoResolver {
    client: Arc<reqwest::Client>,
}

impl HttpGeoResolver {
    /// Wraps an HTTP client. The client's timeouts bound every lookup.
    pub fn new(client: Arc<reqwest::Client>) -> Self {
        HttpGeoResolver { client }
    }
}

/// Builds the lookup URL: the base address with the IP appended verbatim.
pub fn lookup_url(base_url: &str, ip: &std::net::IpAddr) -> String {
    format!("{}{}", base_url, ip)
}

#[async_trait]
impl GeoResolver for HttpGeoResolver {
    async fn resolve(&self, base_url: &str, address: &str) -> Result<GeoLookup, LookupError> {
        let ip = normalize_address(address)?;
        let url = lookup_url(base_url, &ip);
        debug!("Looking up {}", url);

        let response = self.client.get(&url).send().await?;
        let status = response.status();
        let body = response.bytes().await?;

        let payload: IpApiResponse = match serde_json::from_slice(&body) {
            Ok(payload) => payload,
            // A non-2xx without a JSON body says more through its status code
            Err(_) if !status.is_success() => {
                return Err(LookupError::HttpStatus {
                    status: status.as_u16(),
                })
            }
            Err(e) => return Err(LookupError::Parse(e)),
        };

        let lookup = interpret_response(payload);
        if let GeoLookup::NoData { message } = &lookup {
            warn!(
                "Geolocation service returned no data for {}: {}",
                ip,
                message.as_deref().unwrap_or("no message")
            );
        }
        Ok(lookup)
    }
}
