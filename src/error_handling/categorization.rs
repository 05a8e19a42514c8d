//! Error categorization.
//!
//! Maps transport-level errors onto [`LookupError`] variants.

use super::types::LookupError;

/// Categorizes a `reqwest::Error` raised while calling the geolocation service.
///
/// Timeouts get their own variant so they can be told apart in logs.
/// Body decoding failures never reach here; the resolver maps those itself.
pub fn categorize_reqwest_error(error: reqwest::Error) -> LookupError {
    if error.is_timeout() {
        LookupError::Timeout
    } else if let Some(status) = error.status() {
        LookupError::HttpStatus {
            status: status.as_u16(),
        }
    } else {
        LookupError::Transport(error)
    }
}

impl From<reqwest::Error> for LookupError {
    fn from(error: reqwest::Error) -> Self {
        categorize_reqwest_error(error)
    }
}
