//! GeoIP lookup against an HTTP geolocation service.
//!
//! The resolver sends one `GET {base}{ip}` per lookup and interprets the
//! JSON `status` field: `"success"` yields a [`GeoResult`], anything else is
//! [`GeoLookup::NoData`]. Transport and parse failures surface as
//! [`crate::error_handling::LookupError`].

mod extract;
mod lookup;
mod types;

// Re-export public API
pub use extract::normalize_address;
pub use lookup::{lookup_url, GeoResolver, HttpGeoResolver};
pub use types::{GeoLookup, GeoResult};
