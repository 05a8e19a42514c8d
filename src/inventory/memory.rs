//! In-memory inventory.
//!
//! Holds collections, endpoints and audit records in process memory. Useful
//! for embedding the scanner in a host that keeps its own state, and in tests.

use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;

use super::types::{AuditRecord, Collection, Endpoint};
use super::Inventory;
use crate::error_handling::InventoryError;

#[derive(Default)]
struct MemoryState {
    collections: Vec<(Collection, Vec<Endpoint>)>,
    audit: Vec<AuditRecord>,
    label_writes: usize,
}

/// [`Inventory`] kept entirely in memory. Insertion order is listing order.
#[derive(Default)]
pub struct MemoryInventory {
    state: Mutex<MemoryState>,
}

impl MemoryInventory {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, MemoryState> {
        match self.state.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    /// Adds a collection with its endpoints, replacing any with the same id.
    pub fn insert_collection(&self, collection: Collection, endpoints: Vec<Endpoint>) {
        let mut state = self.lock();
        if let Some(slot) = state
            .collections
            .iter_mut()
            .find(|(c, _)| c.id == collection.id)
        {
            *slot = (collection, endpoints);
        } else {
            state.collections.push((collection, endpoints));
        }
    }

    /// Builder form of [`Self::insert_collection`].
    pub fn with_collection(self, collection: Collection, endpoints: Vec<Endpoint>) -> Self {
        self.insert_collection(collection, endpoints);
        self
    }

    /// Current state of one endpoint.
    pub fn endpoint(&self, collection_id: &str, endpoint_id: &str) -> Option<Endpoint> {
        let state = self.lock();
        state
            .collections
            .iter()
            .find(|(c, _)| c.id == collection_id)
            .and_then(|(_, endpoints)| endpoints.iter().find(|e| e.id == endpoint_id))
            .cloned()
    }

    /// Changes an endpoint's address (`None` marks it offline).
    pub fn set_address(&self, collection_id: &str, endpoint_id: &str, address: Option<&str>) {
        let mut state = self.lock();
        if let Some(endpoint) = find_endpoint(&mut state, collection_id, endpoint_id) {
            endpoint.address = address.map(str::to_string);
        }
    }

    pub fn audit_records(&self) -> Vec<AuditRecord> {
        self.lock().audit.clone()
    }

    /// Number of successful label writes so far.
    pub fn label_writes(&self) -> usize {
        self.lock().label_writes
    }
}

fn find_endpoint<'a>(
    state: &'a mut MemoryState,
    collection_id: &str,
    endpoint_id: &str,
) -> Option<&'a mut Endpoint> {
    state
        .collections
        .iter_mut()
        .find(|(c, _)| c.id == collection_id)
        .and_then(|(_, endpoints)| endpoints.iter_mut().find(|e| e.id == endpoint_id))
}

#[async_trait]
impl Inventory for MemoryInventory {
    async fn list_collections(&self) -> Result<Vec<Collection>, InventoryError> {
        Ok(self.lock().collections.iter().map(|(c, _)| c.clone()).collect())
    }

    async fn list_endpoints(&self, collection_id: &str) -> Result<Vec<Endpoint>, InventoryError> {
        Ok(self
            .lock()
            .collections
            .iter()
            .find(|(c, _)| c.id == collection_id)
            .map(|(_, endpoints)| endpoints.clone())
            .unwrap_or_default())
    }

    async fn get_collection(&self, collection_id: &str) -> Result<Option<Collection>, InventoryError> {
        Ok(self
            .lock()
            .collections
            .iter()
            .find(|(c, _)| c.id == collection_id)
            .map(|(c, _)| c.clone()))
    }

    async fn set_endpoint_labels(
        &self,
        collection_id: &str,
        endpoint_id: &str,
        labels: &[String],
    ) -> Result<(), InventoryError> {
        let mut state = self.lock();
        let endpoint = find_endpoint(&mut state, collection_id, endpoint_id).ok_or_else(|| {
            InventoryError::NotFound {
                collection_id: collection_id.to_string(),
                endpoint_id: endpoint_id.to_string(),
            }
        })?;
        endpoint.labels = labels.to_vec();
        state.label_writes += 1;
        Ok(())
    }

    async fn append_audit_record(&self, record: &AuditRecord) -> Result<(), InventoryError> {
        self.lock().audit.push(record.clone());
        Ok(())
    }
}
