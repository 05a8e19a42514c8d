//! HTTP client initialization.

use std::sync::Arc;
use std::time::Duration;

use reqwest::ClientBuilder;

use crate::config::{DEFAULT_USER_AGENT, TCP_CONNECT_TIMEOUT_SECS};

/// Builds the client shared by every geolocation lookup.
///
/// `timeout_seconds` bounds each request end to end; connecting is bounded
/// separately by `TCP_CONNECT_TIMEOUT_SECS`. An elapsed timeout surfaces as
/// `LookupError::Timeout` for the affected endpoint.
///
/// # Errors
///
/// Returns a `reqwest::Error` if the TLS backend cannot be initialized.
pub fn init_client(timeout_seconds: u64) -> Result<Arc<reqwest::Client>, reqwest::Error> {
    let client = ClientBuilder::new()
        .timeout(Duration::from_secs(timeout_seconds))
        .connect_timeout(Duration::from_secs(TCP_CONNECT_TIMEOUT_SECS))
        .user_agent(DEFAULT_USER_AGENT)
        .build()?;
    Ok(Arc::new(client))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_client_builds() {
        assert!(init_client(10).is_ok());
    }
}
