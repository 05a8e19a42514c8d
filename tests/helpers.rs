// Shared test helpers: ip-api.com style mock responses and seeded inventories.

use std::path::Path;
use std::sync::Arc;

use serde_json::{json, Value};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use geo_autotag::initialization::init_client;
use geo_autotag::{Collection, Endpoint, HttpGeoResolver, SqliteInventory};

/// A successful ip-api.com body.
#[allow(dead_code)]
pub fn success_body(city: &str, region: &str, country: &str, code: &str, isp: &str) -> Value {
    json!({
        "status": "success",
        "country": country,
        "countryCode": code,
        "region": "SP",
        "regionName": region,
        "city": city,
        "zip": "01000",
        "lat": -23.55,
        "lon": -46.63,
        "timezone": "America/Sao_Paulo",
        "isp": isp,
        "org": "Some Org",
        "as": "AS28573 Claro S.A.",
        "query": "0.0.0.0"
    })
}

/// Mounts a 200 answer for `GET /json/{ip}`.
#[allow(dead_code)]
pub async fn mount_lookup(server: &MockServer, ip: &str, body: Value) {
    Mock::given(method("GET"))
        .and(path(format!("/json/{}", ip)))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(server)
        .await;
}

#[allow(dead_code)]
pub fn base_url(server: &MockServer) -> String {
    format!("{}/json/", server.uri())
}

#[allow(dead_code)]
pub fn resolver(timeout_seconds: u64) -> Arc<HttpGeoResolver> {
    Arc::new(HttpGeoResolver::new(
        init_client(timeout_seconds).expect("Failed to build HTTP client"),
    ))
}

/// Opens (creating and migrating) a SQLite inventory and seeds it.
#[allow(dead_code)]
pub async fn seeded_inventory(
    db_path: &Path,
    collections: Vec<(Collection, Vec<Endpoint>)>,
) -> SqliteInventory {
    let inventory = SqliteInventory::open(db_path)
        .await
        .expect("Failed to open inventory");
    for (collection, endpoints) in collections {
        inventory
            .upsert_collection(&collection)
            .await
            .expect("Failed to insert collection");
        for endpoint in endpoints {
            inventory
                .upsert_endpoint(&collection.id, &endpoint)
                .await
                .expect("Failed to insert endpoint");
        }
    }
    inventory
}
