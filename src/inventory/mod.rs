//! The inventory collaborator: the host's view of collections and endpoints.
//!
//! The scanner only ever reads collections and endpoints, replaces an
//! endpoint's labels, and appends audit records. Everything else about the
//! inventory belongs to the host.

mod memory;
mod types;

use async_trait::async_trait;

use crate::error_handling::InventoryError;

pub use memory::MemoryInventory;
pub use types::{AuditRecord, Collection, Endpoint};

/// Narrow interface to the host's endpoint inventory and audit log.
#[async_trait]
pub trait Inventory: Send + Sync {
    /// All collections, in the host's order.
    async fn list_collections(&self) -> Result<Vec<Collection>, InventoryError>;

    /// The endpoints of one collection, in the host's order.
    async fn list_endpoints(&self, collection_id: &str) -> Result<Vec<Endpoint>, InventoryError>;

    async fn get_collection(&self, collection_id: &str) -> Result<Option<Collection>, InventoryError>;

    /// Replaces an endpoint's label set.
    async fn set_endpoint_labels(
        &self,
        collection_id: &str,
        endpoint_id: &str,
        labels: &[String],
    ) -> Result<(), InventoryError>;

    /// Appends one record to the host's audit log.
    async fn append_audit_record(&self, record: &AuditRecord) -> Result<(), InventoryError>;
}
