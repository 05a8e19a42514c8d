// Tag projection tests.

use super::*;

fn labels(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

fn google_dns() -> GeoResult {
    GeoResult {
        city: Some("Mountain View".to_string()),
        region: Some("California".to_string()),
        country: Some("United States".to_string()),
        country_code: Some("US".to_string()),
        isp: Some("Google LLC".to_string()),
        org: Some("Google Public DNS".to_string()),
        asn: Some("AS15169 Google LLC".to_string()),
        timezone: Some("America/Los_Angeles".to_string()),
        latitude: Some(37.4056),
        longitude: Some(-122.0775),
    }
}

#[test]
fn test_project_replaces_stale_city_and_keeps_foreign() {
    let prefixes = TagPrefixes::default();
    let existing = labels(&["Cidade:Oldtown", "env:prod"]);
    let result = project(&existing, &GeoLookup::Found(google_dns()), &prefixes);
    assert_eq!(
        result,
        labels(&[
            "env:prod",
            "Cidade:Mountain View",
            "Estado:California",
            "Pais:United States",
            "Provedor:Google LLC",
            "ISO:US",
        ])
    );
}

#[test]
fn test_project_is_idempotent() {
    let prefixes = TagPrefixes::default();
    let lookup = GeoLookup::Found(google_dns());
    let once = project(&labels(&["rack:7", "ISO:BR"]), &lookup, &prefixes);
    let twice = project(&once, &lookup, &prefixes);
    assert_eq!(once, twice);
}

#[test]
fn test_project_no_data_returns_input_unchanged() {
    let prefixes = TagPrefixes::default();
    // Includes a duplicate to show nothing is normalized on this path
    let existing = labels(&["Cidade:Recife", "env:prod", "env:prod"]);
    let lookup = GeoLookup::NoData {
        message: Some("quota exceeded".to_string()),
    };
    assert_eq!(project(&existing, &lookup, &prefixes), existing);
}

#[test]
fn test_project_preserves_foreign_order() {
    let prefixes = TagPrefixes::default();
    let existing = labels(&["z-last", "Pais:Brasil", "a-first", "Provedor:Old ISP", "m-middle"]);
    let result = project(&existing, &GeoLookup::Found(GeoResult::default()), &prefixes);
    assert_eq!(result, labels(&["z-last", "a-first", "m-middle"]));
}

#[test]
fn test_project_deduplicates_repeated_foreign_labels() {
    // Default-prefixed city label is foreign once the city prefix changes
    let prefixes = TagPrefixes {
        city: "City:".to_string(),
        ..TagPrefixes::default()
    };
    let existing = labels(&["Cidade:Mountain View", "dup", "dup"]);
    let geo = GeoResult {
        city: Some("Mountain View".to_string()),
        ..Default::default()
    };
    let result = project(&existing, &GeoLookup::Found(geo), &prefixes);
    assert_eq!(result, labels(&["Cidade:Mountain View", "dup", "City:Mountain View"]));
}

#[test]
fn test_project_one_label_per_category() {
    let prefixes = TagPrefixes::default();
    let existing = labels(&[
        "Cidade:A",
        "Cidade:B",
        "Estado:X",
        "ISO:BR",
        "ISO:PT",
        "owner:ops",
    ]);
    let result = project(&existing, &GeoLookup::Found(google_dns()), &prefixes);
    for prefix in prefixes.managed() {
        let count = result.iter().filter(|l| l.starts_with(prefix)).count();
        assert!(count <= 1, "prefix {} appears {} times", prefix, count);
    }
    assert!(result.contains(&"owner:ops".to_string()));
}

#[test]
fn test_project_removes_managed_when_fields_absent() {
    // Data arrived but without a city: the stale city label is dropped
    let prefixes = TagPrefixes::default();
    let existing = labels(&["Cidade:Oldtown"]);
    let geo = GeoResult {
        country: Some("Portugal".to_string()),
        country_code: Some("PT".to_string()),
        ..Default::default()
    };
    let result = project(&existing, &GeoLookup::Found(geo), &prefixes);
    assert_eq!(result, labels(&["Pais:Portugal", "ISO:PT"]));
}

#[test]
fn test_managed_labels_fixed_order_and_skip_empty() {
    let prefixes = TagPrefixes::default();
    let geo = GeoResult {
        city: Some(String::new()),
        region: Some("Pernambuco".to_string()),
        isp: Some("Claro".to_string()),
        country_code: Some("BR".to_string()),
        ..Default::default()
    };
    assert_eq!(
        managed_labels(&geo, &prefixes),
        labels(&["Estado:Pernambuco", "Provedor:Claro", "ISO:BR"])
    );
}

#[test]
fn test_managed_labels_ignore_org_asn_timezone() {
    let prefixes = TagPrefixes::default();
    let geo = GeoResult {
        org: Some("Org".to_string()),
        asn: Some("AS1".to_string()),
        timezone: Some("UTC".to_string()),
        ..Default::default()
    };
    assert!(managed_labels(&geo, &prefixes).is_empty());
}

#[test]
fn test_merge_uses_custom_prefixes() {
    let prefixes = TagPrefixes {
        city: "city=".to_string(),
        state: "state=".to_string(),
        country: "country=".to_string(),
        provider: "isp=".to_string(),
    };
    // Old default-prefixed labels are foreign under the new prefixes
    let existing = labels(&["Cidade:Oldtown", "city=Old", "ISO:US"]);
    let result = merge(&existing, &labels(&["city=New"]), &prefixes);
    assert_eq!(result, labels(&["Cidade:Oldtown", "city=New"]));
}
