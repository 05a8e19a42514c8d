//! Tag projection: derives an endpoint's new label set from its current
//! labels and a geolocation result.
//!
//! Key functions:
//! - `managed_labels()` - Builds the managed labels for a `GeoResult`
//! - `project()` - Replaces the managed partition of a label set
//!
//! Both are pure. A label is *managed* when it starts with one of the
//! configured category prefixes or with `ISO:`; every other label is
//! *foreign* and is carried through unchanged, in its original order.

use std::collections::HashSet;

use crate::config::{TagPrefixes, ISO_PREFIX};
use crate::geoip::{GeoLookup, GeoResult};

/// Builds the managed labels for `geo`, in fixed category order:
/// city, state, country, provider, ISO country code.
///
/// Absent fields produce no label.
pub fn managed_labels(geo: &GeoResult, prefixes: &TagPrefixes) -> Vec<String> {
    let categories = [
        (prefixes.city.as_str(), &geo.city),
        (prefixes.state.as_str(), &geo.region),
        (prefixes.country.as_str(), &geo.country),
        (prefixes.provider.as_str(), &geo.isp),
        (ISO_PREFIX, &geo.country_code),
    ];

    categories
        .into_iter()
        .filter_map(|(prefix, value)| {
            value
                .as_deref()
                .filter(|v| !v.is_empty())
                .map(|v| format!("{}{}", prefix, v))
        })
        .collect()
}

/// Computes the label set to persist for an endpoint.
///
/// With data: foreign labels first (original order), then the freshly built
/// managed labels, deduplicated keeping the first occurrence. Without data
/// (`GeoLookup::NoData`) the existing labels are returned untouched, so a
/// transient lookup failure never erases earlier results.
pub fn project(existing: &[String], lookup: &GeoLookup, prefixes: &TagPrefixes) -> Vec<String> {
    match lookup {
        GeoLookup::Found(geo) => merge(existing, &managed_labels(geo, prefixes), prefixes),
        GeoLookup::NoData { .. } => existing.to_vec(),
    }
}

/// Drops every managed label from `existing` and appends `managed`.
pub fn merge(existing: &[String], managed: &[String], prefixes: &TagPrefixes) -> Vec<String> {
    let mut seen: HashSet<&str> = HashSet::new();
    let mut merged = Vec::with_capacity(existing.len() + managed.len());
    let foreign = existing.iter().filter(|label| !prefixes.is_managed(label));
    for label in foreign.chain(managed) {
        if seen.insert(label.as_str()) {
            merged.push(label.clone());
        }
    }
    merged
}

#[cfg(test)]
mod tests;
