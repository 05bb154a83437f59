//! Per-run identity cache in front of the store.
//!
//! Maps `(label, key)` to the handle returned by the first upsert so repeated
//! categorical values (sex, race, diagnosis codes) cost one store round-trip
//! per distinct key rather than one per row. Entries are never evicted.

use std::sync::atomic::{AtomicUsize, Ordering};

use dashmap::DashMap;
use tracing::debug;

use crate::error::StoreResult;
use crate::model::{NodeHandle, NodeLabel};
use crate::store::GraphStore;

pub struct IdentityCache<S> {
    store: S,
    entries: DashMap<(NodeLabel, String), NodeHandle>,
    hits: AtomicUsize,
    misses: AtomicUsize,
}

impl<S: GraphStore> IdentityCache<S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            entries: DashMap::new(),
            hits: AtomicUsize::new(0),
            misses: AtomicUsize::new(0),
        }
    }

    /// Return the cached handle for `(label, key)`, upserting it on first sight.
    ///
    /// Two concurrent misses on the same key both reach the store; the store
    /// upsert is idempotent so they resolve to the same node.
    pub async fn lookup_or_insert(&self, label: NodeLabel, key: &str) -> StoreResult<NodeHandle> {
        let cache_key = (label, key.to_string());
        if let Some(entry) = self.entries.get(&cache_key) {
            self.hits.fetch_add(1, Ordering::Relaxed);
            return Ok(entry.value().clone());
        }

        self.misses.fetch_add(1, Ordering::Relaxed);
        let handle = self.store.get_or_create(label, key).await?;
        debug!(node = %handle, "Cached node");
        self.entries.insert(cache_key, handle.clone());
        Ok(handle)
    }

    /// The store behind the cache, for operations that must not be cached.
    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn hits(&self) -> usize {
        self.hits.load(Ordering::Relaxed)
    }

    pub fn misses(&self) -> usize {
        self.misses.load(Ordering::Relaxed)
    }
}
