//! SQLite-backed [`Inventory`].
//!
//! Labels are stored as a JSON array per endpoint; audit records keep their
//! labels and geo snapshot as JSON and the timestamp as RFC 3339 text.

use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use log::warn;
use sqlx::{Pool, Sqlite};

use super::pool::init_db_pool_with_path;
use crate::error_handling::{InitializationError, InventoryError};
use crate::inventory::{AuditRecord, Collection, Endpoint, Inventory};

/// Inventory stored in a local SQLite database.
#[derive(Clone)]
pub struct SqliteInventory {
    pool: Arc<Pool<Sqlite>>,
}

type EndpointRow = (String, String, Option<String>, String);
type AuditRow = (String, String, String, String, String, String);

impl SqliteInventory {
    /// Opens the database at `db_path`, creating and migrating it if needed.
    pub async fn open(db_path: &Path) -> Result<Self, InitializationError> {
        let pool = init_db_pool_with_path(db_path).await?;
        Ok(SqliteInventory { pool })
    }

    /// Wraps an already migrated pool.
    pub fn from_pool(pool: Arc<Pool<Sqlite>>) -> Self {
        SqliteInventory { pool }
    }

    pub fn pool(&self) -> &Pool<Sqlite> {
        &self.pool
    }

    /// Inserts a collection or renames an existing one.
    pub async fn upsert_collection(&self, collection: &Collection) -> Result<(), InventoryError> {
        sqlx::query(
            "INSERT INTO collections (id, name) VALUES (?, ?)
             ON CONFLICT(id) DO UPDATE SET name = excluded.name",
        )
        .bind(&collection.id)
        .bind(&collection.name)
        .execute(&*self.pool)
        .await?;
        Ok(())
    }

    /// Inserts an endpoint or overwrites its name, address and labels.
    pub async fn upsert_endpoint(
        &self,
        collection_id: &str,
        endpoint: &Endpoint,
    ) -> Result<(), InventoryError> {
        let labels = serde_json::to_string(&endpoint.labels)?;
        sqlx::query(
            "INSERT INTO endpoints (collection_id, id, name, address, labels) VALUES (?, ?, ?, ?, ?)
             ON CONFLICT(collection_id, id) DO UPDATE SET
                name = excluded.name,
                address = excluded.address,
                labels = excluded.labels",
        )
        .bind(collection_id)
        .bind(&endpoint.id)
        .bind(&endpoint.name)
        .bind(&endpoint.address)
        .bind(labels)
        .execute(&*self.pool)
        .await?;
        Ok(())
    }

    /// Audit records for one endpoint, oldest first.
    pub async fn audit_records_for(
        &self,
        collection_id: &str,
        endpoint_id: &str,
    ) -> Result<Vec<AuditRecord>, InventoryError> {
        let rows: Vec<AuditRow> = sqlx::query_as(
            "SELECT kind, collection_id, endpoint_id, labels, geo, timestamp
             FROM audit_log WHERE collection_id = ? AND endpoint_id = ? ORDER BY id",
        )
        .bind(collection_id)
        .bind(endpoint_id)
        .fetch_all(&*self.pool)
        .await?;

        rows.into_iter().map(audit_from_row).collect()
    }
}

fn endpoint_from_row((id, name, address, labels): EndpointRow) -> Result<Endpoint, InventoryError> {
    Ok(Endpoint {
        id,
        name,
        address,
        labels: serde_json::from_str(&labels)?,
    })
}

fn audit_from_row(
    (kind, collection_id, endpoint_id, labels, geo, timestamp): AuditRow,
) -> Result<AuditRecord, InventoryError> {
    let timestamp = DateTime::parse_from_rfc3339(&timestamp)
        .map_err(|e| InventoryError::Corrupt(format!("audit timestamp {timestamp:?}: {e}")))?
        .with_timezone(&Utc);
    Ok(AuditRecord {
        kind,
        collection_id,
        endpoint_id,
        labels: serde_json::from_str(&labels)?,
        geo: serde_json::from_str(&geo)?,
        timestamp,
    })
}

#[async_trait]
impl Inventory for SqliteInventory {
    async fn list_collections(&self) -> Result<Vec<Collection>, InventoryError> {
        let rows: Vec<(String, String)> =
            sqlx::query_as("SELECT id, name FROM collections ORDER BY rowid")
                .fetch_all(&*self.pool)
                .await?;
        Ok(rows
            .into_iter()
            .map(|(id, name)| Collection { id, name })
            .collect())
    }

    async fn list_endpoints(&self, collection_id: &str) -> Result<Vec<Endpoint>, InventoryError> {
        let rows: Vec<EndpointRow> = sqlx::query_as(
            "SELECT id, name, address, labels FROM endpoints
             WHERE collection_id = ? ORDER BY rowid",
        )
        .bind(collection_id)
        .fetch_all(&*self.pool)
        .await?;

        // One undecodable row must not hide the rest of the collection
        Ok(rows
            .into_iter()
            .filter_map(|row| {
                let id = row.0.clone();
                match endpoint_from_row(row) {
                    Ok(endpoint) => Some(endpoint),
                    Err(e) => {
                        warn!(
                            "Skipping endpoint {} of collection {}: {}",
                            id, collection_id, e
                        );
                        None
                    }
                }
            })
            .collect())
    }

    async fn get_collection(&self, collection_id: &str) -> Result<Option<Collection>, InventoryError> {
        let row: Option<(String, String)> =
            sqlx::query_as("SELECT id, name FROM collections WHERE id = ?")
                .bind(collection_id)
                .fetch_optional(&*self.pool)
                .await?;
        Ok(row.map(|(id, name)| Collection { id, name }))
    }

    async fn set_endpoint_labels(
        &self,
        collection_id: &str,
        endpoint_id: &str,
        labels: &[String],
    ) -> Result<(), InventoryError> {
        let labels = serde_json::to_string(labels)?;
        let result = sqlx::query("UPDATE endpoints SET labels = ? WHERE collection_id = ? AND id = ?")
            .bind(labels)
            .bind(collection_id)
            .bind(endpoint_id)
            .execute(&*self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(InventoryError::NotFound {
                collection_id: collection_id.to_string(),
                endpoint_id: endpoint_id.to_string(),
            });
        }
        Ok(())
    }

    async fn append_audit_record(&self, record: &AuditRecord) -> Result<(), InventoryError> {
        sqlx::query(
            "INSERT INTO audit_log (kind, collection_id, endpoint_id, labels, geo, timestamp)
             VALUES (?, ?, ?, ?, ?, ?)",
        )
        .bind(&record.kind)
        .bind(&record.collection_id)
        .bind(&record.endpoint_id)
        .bind(serde_json::to_string(&record.labels)?)
        .bind(serde_json::to_string(&record.geo)?)
        .bind(record.timestamp.to_rfc3339())
        .execute(&*self.pool)
        .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geoip::GeoResult;
    use crate::storage::test_helpers::create_test_pool;

    async fn seeded() -> SqliteInventory {
        let inventory = SqliteInventory::from_pool(Arc::new(create_test_pool().await));
        inventory
            .upsert_collection(&Collection::new("mesh//b", "Branch"))
            .await
            .unwrap();
        inventory
            .upsert_collection(&Collection::new("mesh//a", "HQ"))
            .await
            .unwrap();
        inventory
            .upsert_endpoint(
                "mesh//a",
                &Endpoint::new("node//2", "printer").with_labels(["floor:2"]),
            )
            .await
            .unwrap();
        inventory
            .upsert_endpoint(
                "mesh//a",
                &Endpoint::new("node//1", "gateway").with_address("8.8.8.8"),
            )
            .await
            .unwrap();
        inventory
    }

    #[tokio::test]
    async fn test_listing_follows_insertion_order() {
        let inventory = seeded().await;
        let collections = inventory.list_collections().await.unwrap();
        let ids: Vec<_> = collections.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, ["mesh//b", "mesh//a"]);

        let endpoints = inventory.list_endpoints("mesh//a").await.unwrap();
        let ids: Vec<_> = endpoints.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, ["node//2", "node//1"]);
        assert_eq!(endpoints[0].labels, vec!["floor:2".to_string()]);
        assert!(endpoints[0].address.is_none());
        assert_eq!(endpoints[1].address.as_deref(), Some("8.8.8.8"));
    }

    #[tokio::test]
    async fn test_undecodable_labels_skip_only_that_endpoint() {
        let inventory = seeded().await;
        sqlx::query("UPDATE endpoints SET labels = 'not json' WHERE id = ?")
            .bind("node//2")
            .execute(inventory.pool())
            .await
            .unwrap();

        let endpoints = inventory.list_endpoints("mesh//a").await.unwrap();
        let ids: Vec<_> = endpoints.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, ["node//1"]);
    }

    #[tokio::test]
    async fn test_upsert_collection_renames_in_place() {
        let inventory = seeded().await;
        inventory
            .upsert_collection(&Collection::new("mesh//b", "Branch Office"))
            .await
            .unwrap();
        let collections = inventory.list_collections().await.unwrap();
        assert_eq!(collections[0].name, "Branch Office");
        assert_eq!(collections.len(), 2);
    }

    #[tokio::test]
    async fn test_get_collection() {
        let inventory = seeded().await;
        let found = inventory.get_collection("mesh//a").await.unwrap();
        assert_eq!(found, Some(Collection::new("mesh//a", "HQ")));
        assert!(inventory.get_collection("mesh//z").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_set_labels_round_trips() {
        let inventory = seeded().await;
        let labels = vec!["floor:2".to_string(), "ISO:US".to_string()];
        inventory
            .set_endpoint_labels("mesh//a", "node//2", &labels)
            .await
            .unwrap();
        let endpoints = inventory.list_endpoints("mesh//a").await.unwrap();
        assert_eq!(endpoints[0].labels, labels);
    }

    #[tokio::test]
    async fn test_set_labels_unknown_endpoint_is_not_found() {
        let inventory = seeded().await;
        let err = inventory
            .set_endpoint_labels("mesh//a", "node//404", &[])
            .await
            .unwrap_err();
        assert!(matches!(err, InventoryError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_audit_log_append_and_read() {
        let inventory = seeded().await;
        let geo = GeoResult {
            country_code: Some("US".to_string()),
            latitude: Some(37.4),
            ..Default::default()
        };
        let record =
            AuditRecord::tags_applied("mesh//a", "node//1", vec!["ISO:US".to_string()], geo);
        inventory.append_audit_record(&record).await.unwrap();
        inventory.append_audit_record(&record).await.unwrap();

        let records = inventory.audit_records_for("mesh//a", "node//1").await.unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].kind, "autotag_geo");
        assert_eq!(records[0].labels, vec!["ISO:US".to_string()]);
        assert_eq!(records[0].geo.latitude, Some(37.4));
        assert_eq!(records[0].timestamp, record.timestamp);
        assert!(inventory
            .audit_records_for("mesh//a", "node//2")
            .await
            .unwrap()
            .is_empty());
    }
}
