//! In-memory reference store.
//!
//! Used by tests and by dry runs. Keeps the same uniqueness guarantees a real
//! store enforces with constraints: one node per `(label, key)` and one edge
//! per `(from, relation, to)`.

use std::collections::{BTreeSet, HashMap};
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;

use crate::error::{StoreError, StoreResult};
use crate::model::{NodeHandle, NodeLabel, Relation};
use super::GraphStore;

#[derive(Debug, Default)]
struct Inner {
    /// Node -> number of create_or_update refreshes after creation.
    nodes: HashMap<NodeHandle, usize>,
    edges: BTreeSet<(NodeHandle, Relation, NodeHandle)>,
}

/// A [`GraphStore`] backed by hash maps.
#[derive(Debug, Default)]
pub struct MemoryStore {
    inner: Mutex<Inner>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> StoreResult<MutexGuard<'_, Inner>> {
        self.inner
            .lock()
            .map_err(|_| StoreError::fatal("memory store lock poisoned"))
    }

    fn snapshot<T>(&self, f: impl FnOnce(&Inner) -> T) -> T {
        let guard = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        f(&guard)
    }

    pub fn node_count(&self) -> usize {
        self.snapshot(|inner| inner.nodes.len())
    }

    pub fn node_count_for(&self, label: NodeLabel) -> usize {
        self.snapshot(|inner| inner.nodes.keys().filter(|n| n.label == label).count())
    }

    pub fn edge_count(&self) -> usize {
        self.snapshot(|inner| inner.edges.len())
    }

    pub fn contains_node(&self, label: NodeLabel, key: &str) -> bool {
        self.snapshot(|inner| inner.nodes.contains_key(&NodeHandle::new(label, key)))
    }

    pub fn contains_edge(&self, from: &NodeHandle, relation: Relation, to: &NodeHandle) -> bool {
        self.snapshot(|inner| inner.edges.contains(&(from.clone(), relation, to.clone())))
    }

    /// Targets of all `relation` edges leaving `from`, in key order.
    pub fn edges_from(&self, from: &NodeHandle, relation: Relation) -> Vec<NodeHandle> {
        self.snapshot(|inner| {
            inner
                .edges
                .iter()
                .filter(|(f, r, _)| f == from && *r == relation)
                .map(|(_, _, to)| to.clone())
                .collect()
        })
    }

    /// How many times an existing node was refreshed by `create_or_update`.
    pub fn update_count(&self, label: NodeLabel, key: &str) -> usize {
        self.snapshot(|inner| {
            inner
                .nodes
                .get(&NodeHandle::new(label, key))
                .copied()
                .unwrap_or(0)
        })
    }
}

#[async_trait]
impl GraphStore for MemoryStore {
    async fn get_or_create(&self, label: NodeLabel, key: &str) -> StoreResult<NodeHandle> {
        let handle = NodeHandle::new(label, key);
        self.lock()?.nodes.entry(handle.clone()).or_insert(0);
        Ok(handle)
    }

    async fn create_or_update(&self, label: NodeLabel, key: &str) -> StoreResult<NodeHandle> {
        let handle = NodeHandle::new(label, key);
        let mut inner = self.lock()?;
        match inner.nodes.get_mut(&handle) {
            Some(updates) => *updates += 1,
            None => {
                inner.nodes.insert(handle.clone(), 0);
            }
        }
        Ok(handle)
    }

    async fn connect(&self, from: &NodeHandle, relation: Relation, to: &NodeHandle) -> StoreResult<()> {
        let mut inner = self.lock()?;
        for node in [from, to] {
            if !inner.nodes.contains_key(node) {
                return Err(StoreError::fatal(format!("cannot connect missing node {}", node)));
            }
        }
        inner.edges.insert((from.clone(), relation, to.clone()));
        Ok(())
    }
}
