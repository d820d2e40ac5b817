//! Cache of provider-issued configuration.
//!
//! Holds, per owning StorageCluster (keyed by uid), the resources returned by
//! the last successful `GetStorageConfig`.  Entries are replaced wholesale and
//! only ever removed explicitly; nothing expires on its own.

use std::sync::Arc;

use dashmap::DashMap;
use tracing::debug;

use crate::types::ExternalResource;

/// Thread-safe map from owner uid to its latest external resources.
///
/// Shared between concurrently running passes for different owners, and with
/// whatever materializes the resources locally.
#[derive(Debug, Default)]
pub struct ExternalResourceCache {
    entries: DashMap<String, Arc<[ExternalResource]>>,
}

impl ExternalResourceCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the entry for `uid` with `resources`.
    pub fn replace(&self, uid: &str, resources: Vec<ExternalResource>) {
        debug!(%uid, count = resources.len(), "caching external resources");
        self.entries.insert(uid.to_owned(), resources.into());
    }

    /// The resources last cached for `uid`.
    pub fn get(&self, uid: &str) -> Option<Arc<[ExternalResource]>> {
        self.entries.get(uid).map(|entry| Arc::clone(entry.value()))
    }

    /// Drop the entry for `uid`, returning whether one existed.
    pub fn evict(&self, uid: &str) -> bool {
        let existed = self.entries.remove(uid).is_some();
        if existed {
            debug!(%uid, "evicted external resources");
        }
        existed
    }

    pub fn contains(&self, uid: &str) -> bool {
        self.entries.contains_key(uid)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
