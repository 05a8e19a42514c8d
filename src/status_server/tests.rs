use std::net::SocketAddr;
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::Notify;

use super::*;
use crate::app::AutoTagService;
use crate::config::ScanConfig;
use crate::error_handling::LookupError;
use crate::geoip::{GeoLookup, GeoResolver, GeoResult};
use crate::inventory::{Collection, Endpoint, MemoryInventory};

/// Answers Lisbon for every address, optionally parking first until released.
struct LisbonResolver {
    hold: Option<Arc<Notify>>,
}

#[async_trait]
impl GeoResolver for LisbonResolver {
    async fn resolve(&self, _base_url: &str, _address: &str) -> Result<GeoLookup, LookupError> {
        if let Some(hold) = &self.hold {
            hold.notified().await;
        }
        Ok(GeoLookup::Found(GeoResult {
            city: Some("Lisbon".to_string()),
            country: Some("Portugal".to_string()),
            country_code: Some("PT".to_string()),
            ..Default::default()
        }))
    }
}

fn inventory() -> Arc<MemoryInventory> {
    Arc::new(MemoryInventory::new().with_collection(
        Collection::new("mesh//ops", "Ops"),
        vec![Endpoint::new("node//1", "gw").with_address("203.0.113.5")],
    ))
}

async fn spawn_server(service: AutoTagService) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(serve(listener, ServerState::new(service)));
    addr
}

fn service_with(inventory: Arc<MemoryInventory>, hold: Option<Arc<Notify>>) -> AutoTagService {
    AutoTagService::new(
        inventory,
        Arc::new(LisbonResolver { hold }),
        ScanConfig::default(),
    )
    .unwrap()
}

#[tokio::test]
async fn test_get_stats() {
    let addr = spawn_server(service_with(inventory(), None)).await;

    let response = reqwest::get(format!("http://{}/stats", addr)).await.unwrap();
    assert_eq!(response.status(), 200);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["enabled"], false);
    assert_eq!(body["running"], false);
    assert_eq!(body["update_interval_secs"], 3600);
    assert_eq!(body["tag_prefix"]["country"], "Pais:");
    assert_eq!(body["outcomes"]["tagged"], 0);
}

#[tokio::test]
async fn test_scan_collection_known_and_unknown() {
    let inventory = inventory();
    let addr = spawn_server(service_with(inventory.clone(), None)).await;
    let client = reqwest::Client::new();

    let response = client
        .post(format!("http://{}/scan/mesh%2F%2Fops", addr))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 200);
    let report: Value = response.json().await.unwrap();
    assert_eq!(report["tagged"], 1);
    assert_eq!(
        inventory.endpoint("mesh//ops", "node//1").unwrap().labels,
        vec!["Cidade:Lisbon", "Pais:Portugal", "ISO:PT"]
    );

    let response = client
        .post(format!("http://{}/scan/nope", addr))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 404);
}

#[tokio::test]
async fn test_scan_conflicts_while_running() {
    let hold = Arc::new(Notify::new());
    let service = service_with(inventory(), Some(hold.clone()));
    let addr = spawn_server(service.clone()).await;
    let client = reqwest::Client::new();

    let response = client
        .post(format!("http://{}/scan", addr))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 202);

    // Wait for the background pass to take the Running flag
    while !service.is_running() {
        tokio::task::yield_now().await;
    }

    let response = client
        .post(format!("http://{}/scan", addr))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 409);

    hold.notify_one();
    service.wait_idle().await;
}

#[tokio::test]
async fn test_patch_settings() {
    let service = service_with(inventory(), None);
    let addr = spawn_server(service.clone()).await;
    let client = reqwest::Client::new();

    let response = client
        .patch(format!("http://{}/settings", addr))
        .json(&serde_json::json!({
            "updateInterval": 600,
            "tagPrefix": { "city": "City:" }
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 200);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["update_interval_secs"], 600);
    assert_eq!(body["tag_prefix"]["city"], "City:");
    assert_eq!(body["tag_prefix"]["state"], "Estado:");
}

#[tokio::test]
async fn test_patch_settings_rejects_invalid_values() {
    let service = service_with(inventory(), None);
    let addr = spawn_server(service.clone()).await;
    let client = reqwest::Client::new();

    let response = client
        .patch(format!("http://{}/settings", addr))
        .json(&serde_json::json!({ "updateInterval": 0 }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 400);

    let response = client
        .patch(format!("http://{}/settings", addr))
        .json(&serde_json::json!({ "unknownKnob": true }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 400);

    assert_eq!(service.get_stats().update_interval_secs, 3600);
}
