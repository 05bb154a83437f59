//! The graph store seam.
//!
//! Ingestion talks to storage only through [`GraphStore`]. Every operation is
//! an idempotent upsert, so calling it again with the same arguments leaves the
//! graph unchanged.

pub mod memory;
pub mod retry;

use async_trait::async_trait;

use crate::error::StoreResult;
use crate::model::{NodeHandle, NodeLabel, Relation};

pub use memory::MemoryStore;
pub use retry::{RetryPolicy, RetryingStore};

/// Key-addressed node/edge store.
#[async_trait]
pub trait GraphStore: Send + Sync {
    /// Return the node with this key, creating it if missing.
    async fn get_or_create(&self, label: NodeLabel, key: &str) -> StoreResult<NodeHandle>;

    /// Like `get_or_create`, but refreshes the node's attributes when it already exists.
    async fn create_or_update(&self, label: NodeLabel, key: &str) -> StoreResult<NodeHandle>;

    /// Create the edge `from -[relation]-> to` unless it already exists.
    async fn connect(&self, from: &NodeHandle, relation: Relation, to: &NodeHandle) -> StoreResult<()>;
}

#[async_trait]
impl<S: GraphStore + ?Sized> GraphStore for std::sync::Arc<S> {
    async fn get_or_create(&self, label: NodeLabel, key: &str) -> StoreResult<NodeHandle> {
        (**self).get_or_create(label, key).await
    }

    async fn create_or_update(&self, label: NodeLabel, key: &str) -> StoreResult<NodeHandle> {
        (**self).create_or_update(label, key).await
    }

    async fn connect(&self, from: &NodeHandle, relation: Relation, to: &NodeHandle) -> StoreResult<()> {
        (**self).connect(from, relation, to).await
    }
}
