//! [`GraphStore`] over Neo4j.
//!
//! Nodes are `MERGE`d on their unique key property and relationships are
//! `MERGE`d between matched endpoints, so every call is an upsert. A
//! relationship whose endpoints do not match is reported, not dropped. Labels and
//! relationship types come from closed enums and are spliced into the Cypher
//! text; keys are always bound as parameters.

use async_trait::async_trait;
use chrono::Utc;
use neo4rs::Query;
use tracing::trace;

use neograph_core::{GraphStore, NodeHandle, NodeLabel, Relation, StoreError, StoreResult};

use crate::GraphClient;

/// Neo4j-backed graph store.
#[derive(Clone)]
pub struct Neo4jStore {
    client: GraphClient,
}

impl Neo4jStore {
    pub fn new(client: GraphClient) -> Self {
        Self { client }
    }
}

pub(crate) fn merge_node_cypher(label: NodeLabel) -> String {
    format!(
        "MERGE (n:{} {{{}: $key}})
         ON CREATE SET n.created_at = $now",
        label.label(),
        label.key_property()
    )
}

pub(crate) fn upsert_node_cypher(label: NodeLabel) -> String {
    format!(
        "MERGE (n:{} {{{}: $key}})
         ON CREATE SET n.created_at = $now
         SET n.updated_at = $now",
        label.label(),
        label.key_property()
    )
}

pub(crate) fn connect_cypher(from: NodeLabel, relation: Relation, to: NodeLabel) -> String {
    format!(
        "MATCH (a:{} {{{}: $from}}), (b:{} {{{}: $to}})
         MERGE (a)-[:{}]->(b)
         RETURN count(*) AS linked",
        from.label(),
        from.key_property(),
        to.label(),
        to.key_property(),
        relation.as_str()
    )
}

/// `MATCH` yields no row when an endpoint is missing, so nothing was merged.
pub(crate) fn ensure_linked(linked: i64, from: &NodeHandle, relation: Relation, to: &NodeHandle) -> StoreResult<()> {
    if linked == 0 {
        return Err(StoreError::fatal(format!("cannot link {} -[{}]-> {}: endpoint not found", from, relation, to)));
    }
    Ok(())
}

#[async_trait]
impl GraphStore for Neo4jStore {
    async fn get_or_create(&self, label: NodeLabel, key: &str) -> StoreResult<NodeHandle> {
        let query = Query::new(merge_node_cypher(label))
            .param("key", key)
            .param("now", Utc::now().to_rfc3339());
        self.client.write(query).await?;
        trace!(label = %label, key, "Merged node");
        Ok(NodeHandle::new(label, key))
    }

    async fn create_or_update(&self, label: NodeLabel, key: &str) -> StoreResult<NodeHandle> {
        let query = Query::new(upsert_node_cypher(label))
            .param("key", key)
            .param("now", Utc::now().to_rfc3339());
        self.client.write(query).await?;
        trace!(label = %label, key, "Upserted node");
        Ok(NodeHandle::new(label, key))
    }

    async fn connect(&self, from: &NodeHandle, relation: Relation, to: &NodeHandle) -> StoreResult<()> {
        let query = Query::new(connect_cypher(from.label, relation, to.label))
            .param("from", from.key.as_str())
            .param("to", to.key.as_str());
        let linked = self.client.count(query, "linked").await?;
        ensure_linked(linked, from, relation, to)?;
        trace!(from = %from, relation = %relation, to = %to, "Merged relationship");
        Ok(())
    }
}
