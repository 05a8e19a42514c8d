//! Per-collection endpoint scanning.

use std::sync::Arc;

use futures::stream::{self, StreamExt};
use log::{debug, error, info};

use super::types::ScanReport;
use crate::config::ScanConfig;
use crate::error_handling::{OutcomeType, ProcessingStats};
use crate::geoip::GeoResolver;
use crate::inventory::{AuditRecord, Collection, Endpoint, Inventory};
use crate::tags::{managed_labels, project};

/// Looks up every endpoint of a collection and rewrites its managed labels.
#[derive(Clone)]
pub struct EndpointScanner {
    inventory: Arc<dyn Inventory>,
    resolver: Arc<dyn GeoResolver>,
    stats: Arc<ProcessingStats>,
}

impl EndpointScanner {
    pub fn new(
        inventory: Arc<dyn Inventory>,
        resolver: Arc<dyn GeoResolver>,
        stats: Arc<ProcessingStats>,
    ) -> Self {
        EndpointScanner {
            inventory,
            resolver,
            stats,
        }
    }

    /// Scans one collection using the given configuration snapshot.
    ///
    /// Never fails: every per-endpoint error is logged and counted, and the
    /// scan moves on. Endpoints are handled in inventory order; with
    /// `endpoint_concurrency > 1` several lookups may be in flight at once.
    pub async fn scan_collection(&self, config: &ScanConfig, collection: &Collection) -> ScanReport {
        let mut report = ScanReport::default();

        let endpoints = match self.inventory.list_endpoints(&collection.id).await {
            Ok(endpoints) => endpoints,
            Err(e) => {
                error!("Failed to list endpoints of collection {}: {}", collection.id, e);
                self.stats.increment(OutcomeType::ListingFailed);
                report.record(OutcomeType::ListingFailed);
                return report;
            }
        };

        info!("Collection {}: {} endpoints", collection.name, endpoints.len());

        // Collected before streaming so the pass future stays Send
        let pending: Vec<_> = endpoints
            .iter()
            .map(|endpoint| self.process_endpoint(config, collection, endpoint))
            .collect();
        let outcomes: Vec<OutcomeType> = stream::iter(pending)
            .buffered(config.endpoint_concurrency.max(1))
            .collect()
            .await;

        for outcome in outcomes {
            self.stats.increment(outcome);
            report.record(outcome);
        }
        report
    }

    async fn process_endpoint(
        &self,
        config: &ScanConfig,
        collection: &Collection,
        endpoint: &Endpoint,
    ) -> OutcomeType {
        let Some(address) = endpoint.online_address() else {
            debug!("Endpoint {} offline or without address", endpoint.name);
            return OutcomeType::Offline;
        };

        debug!("Processing endpoint {} ({})", endpoint.name, address);

        let lookup = match self.resolver.resolve(&config.geo_api_url, address).await {
            Ok(lookup) => lookup,
            Err(e) => {
                error!(
                    "Lookup failed for endpoint {} ({}): {}",
                    endpoint.id, address, e
                );
                return OutcomeType::LookupFailed;
            }
        };

        let Some(geo) = lookup.result() else {
            debug!("No geolocation data for endpoint {}, labels left as is", endpoint.name);
            return OutcomeType::NoData;
        };

        let labels = project(&endpoint.labels, &lookup, &config.tag_prefix);
        let applied = managed_labels(geo, &config.tag_prefix);

        if let Err(e) = self
            .inventory
            .set_endpoint_labels(&collection.id, &endpoint.id, &labels)
            .await
        {
            error!("Failed to write labels of endpoint {}: {}", endpoint.id, e);
            return OutcomeType::PersistFailed;
        }

        info!("Tags applied to endpoint {}: {:?}", endpoint.name, applied);

        let record = AuditRecord::tags_applied(&collection.id, &endpoint.id, applied, geo.clone());
        if let Err(e) = self.inventory.append_audit_record(&record).await {
            error!("Failed to append audit record for endpoint {}: {}", endpoint.id, e);
            return OutcomeType::PersistFailed;
        }

        OutcomeType::Tagged
    }
}
