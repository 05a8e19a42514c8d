//! Process-wide holder of the current [`ScanConfig`].

use std::sync::{Arc, RwLock};

use log::info;

use super::types::{ConfigPatch, ScanConfig};
use crate::error_handling::ConfigError;

/// Holds the current configuration as an immutable snapshot.
///
/// Readers clone the `Arc` and keep using it for as long as they need; an
/// update swaps in a whole new snapshot (last write wins). Nothing ever
/// mutates a snapshot after it has been installed.
#[derive(Debug)]
pub struct ConfigManager {
    current: RwLock<Arc<ScanConfig>>,
}

impl ConfigManager {
    /// Creates a manager holding `initial`, which must already be valid.
    pub fn new(initial: ScanConfig) -> Result<Self, ConfigError> {
        initial.validate()?;
        Ok(ConfigManager {
            current: RwLock::new(Arc::new(initial)),
        })
    }

    /// Returns the snapshot currently in effect.
    pub fn snapshot(&self) -> Arc<ScanConfig> {
        match self.current.read() {
            Ok(guard) => Arc::clone(&*guard),
            Err(poisoned) => Arc::clone(&*poisoned.into_inner()),
        }
    }

    /// Merges `patch` over the current snapshot and installs the result.
    ///
    /// Returns `(previous, installed)`. A patch that fails validation leaves
    /// the current snapshot in place.
    pub fn apply(
        &self,
        patch: &ConfigPatch,
    ) -> Result<(Arc<ScanConfig>, Arc<ScanConfig>), ConfigError> {
        let mut guard = match self.current.write() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        let next = Arc::new(guard.merged(patch)?);
        let previous = std::mem::replace(&mut *guard, Arc::clone(&next));
        info!(
            "Configuration updated: interval={}s, api={}, prefixes={:?}, concurrency={}",
            next.update_interval.as_secs(),
            next.geo_api_url,
            next.tag_prefix,
            next.endpoint_concurrency
        );
        Ok((previous, next))
    }

    /// Installs `config` wholesale.
    pub fn replace(&self, config: ScanConfig) -> Result<Arc<ScanConfig>, ConfigError> {
        config.validate()?;
        let next = Arc::new(config);
        let mut guard = match self.current.write() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        Ok(std::mem::replace(&mut *guard, next))
    }
}
