//! Address normalization and payload interpretation.

use std::net::IpAddr;

use super::types::{GeoLookup, GeoResult, IpApiResponse};
use crate::error_handling::LookupError;

/// Status value the service uses for a populated answer.
const STATUS_SUCCESS: &str = "success";

/// Normalizes an endpoint's reported address into the form sent to the service.
///
/// Trims whitespace and IPv6 brackets and reduces IPv4-mapped IPv6 addresses
/// (`::ffff:203.0.113.7`, as reported by dual-stack listeners) to plain IPv4.
pub fn normalize_address(raw: &str) -> Result<IpAddr, LookupError> {
    let trimmed = raw.trim();
    let unbracketed = trimmed
        .strip_prefix('[')
        .and_then(|s| s.strip_suffix(']'))
        .unwrap_or(trimmed);

    let ip: IpAddr = unbracketed
        .parse()
        .map_err(|_| LookupError::InvalidAddress(raw.to_string()))?;

    Ok(match ip {
        IpAddr::V6(v6) => match v6.to_ipv4_mapped() {
            Some(v4) => IpAddr::V4(v4),
            None => IpAddr::V6(v6),
        },
        v4 => v4,
    })
}

/// Empty and whitespace-only strings count as absent.
fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// Interprets a parsed payload: only `status == "success"` yields data.
pub(crate) fn interpret_response(response: IpApiResponse) -> GeoLookup {
    if response.status != STATUS_SUCCESS {
        return GeoLookup::NoData {
            message: non_empty(response.message),
        };
    }

    GeoLookup::Found(GeoResult {
        city: non_empty(response.city),
        region: non_empty(response.region_name),
        country: non_empty(response.country),
        country_code: non_empty(response.country_code),
        isp: non_empty(response.isp),
        org: non_empty(response.org),
        asn: non_empty(response.asn),
        timezone: non_empty(response.timezone),
        latitude: response.lat,
        longitude: response.lon,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_plain_ipv4() {
        let ip = normalize_address("8.8.8.8").unwrap();
        assert_eq!(ip.to_string(), "8.8.8.8");
    }

    #[test]
    fn test_normalize_mapped_ipv4() {
        let ip = normalize_address("::ffff:203.0.113.7").unwrap();
        assert_eq!(ip.to_string(), "203.0.113.7");
    }

    #[test]
    fn test_normalize_bracketed_ipv6() {
        let ip = normalize_address(" [2001:db8::1] ").unwrap();
        assert_eq!(ip.to_string(), "2001:db8::1");
    }

    #[test]
    fn test_normalize_rejects_hostnames() {
        let err = normalize_address("example.com").unwrap_err();
        assert!(matches!(err, LookupError::InvalidAddress(ref raw) if raw == "example.com"));
        assert!(normalize_address("").is_err());
    }

    #[test]
    fn test_interpret_success_payload() {
        let response: IpApiResponse = serde_json::from_str(
            r#"{"status":"success","country":"United States","countryCode":"US","regionName":"California",
                "city":"Mountain View","isp":"Google LLC","org":"Google Public DNS","as":"AS15169 Google LLC",
                "timezone":"America/Los_Angeles","lat":37.4056,"lon":-122.0775,"query":"8.8.8.8"}"#,
        )
        .unwrap();
        let lookup = interpret_response(response);
        let result = lookup.result().expect("success status should yield data");
        assert_eq!(result.city.as_deref(), Some("Mountain View"));
        assert_eq!(result.region.as_deref(), Some("California"));
        assert_eq!(result.country_code.as_deref(), Some("US"));
        assert_eq!(result.asn.as_deref(), Some("AS15169 Google LLC"));
        assert_eq!(result.latitude, Some(37.4056));
    }

    #[test]
    fn test_interpret_fail_payload() {
        let response: IpApiResponse = serde_json::from_str(
            r#"{"status":"fail","message":"private range","query":"10.0.0.1"}"#,
        )
        .unwrap();
        assert_eq!(
            interpret_response(response),
            GeoLookup::NoData {
                message: Some("private range".to_string())
            }
        );
    }

    #[test]
    fn test_interpret_blank_fields_as_absent() {
        let response: IpApiResponse =
            serde_json::from_str(r#"{"status":"success","city":"","regionName":"  ","country":"Brazil"}"#)
                .unwrap();
        let lookup = interpret_response(response);
        let result = lookup.result().unwrap();
        assert!(result.city.is_none());
        assert!(result.region.is_none());
        assert_eq!(result.country.as_deref(), Some("Brazil"));
    }

    #[test]
    fn test_payload_without_status_is_rejected() {
        let parsed: Result<IpApiResponse, _> = serde_json::from_str(r#"{"city":"Recife"}"#);
        assert!(parsed.is_err());
    }
}
