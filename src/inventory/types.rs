//! Entities read from and written to the inventory.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::config::AUDIT_KIND;
use crate::geoip::GeoResult;

/// A named group of endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Collection {
    pub id: String,
    pub name: String,
}

impl Collection {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Collection {
            id: id.into(),
            name: name.into(),
        }
    }
}

/// A managed device.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Endpoint {
    pub id: String,
    pub name: String,
    /// Current remote address; `None` while the endpoint is disconnected.
    pub address: Option<String>,
    pub labels: Vec<String>,
}

impl Endpoint {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Endpoint {
            id: id.into(),
            name: name.into(),
            address: None,
            labels: Vec::new(),
        }
    }

    pub fn with_address(mut self, address: impl Into<String>) -> Self {
        self.address = Some(address.into());
        self
    }

    pub fn with_labels<I, S>(mut self, labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.labels = labels.into_iter().map(Into::into).collect();
        self
    }

    /// The address to look up, if the endpoint is online.
    pub fn online_address(&self) -> Option<&str> {
        self.address
            .as_deref()
            .map(str::trim)
            .filter(|addr| !addr.is_empty())
    }
}

/// One entry per successful tag application.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditRecord {
    #[serde(rename = "type")]
    pub kind: String,
    pub collection_id: String,
    pub endpoint_id: String,
    /// The managed labels that were applied
    pub labels: Vec<String>,
    pub geo: GeoResult,
    pub timestamp: DateTime<Utc>,
}

impl AuditRecord {
    /// Builds a record stamped with the current time.
    pub fn tags_applied(
        collection_id: &str,
        endpoint_id: &str,
        labels: Vec<String>,
        geo: GeoResult,
    ) -> Self {
        AuditRecord {
            kind: AUDIT_KIND.to_string(),
            collection_id: collection_id.to_string(),
            endpoint_id: endpoint_id.to_string(),
            labels,
            geo,
            timestamp: Utc::now(),
        }
    }
}
