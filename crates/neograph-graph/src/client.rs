//! Neo4j connection client.
//!
//! Every call goes through [`classify`], so the ingestion retry layer sees the
//! same transient/fatal split no matter which statement failed.

use anyhow::{Context, Result};
use neo4rs::{ConfigBuilder, Graph, Query};
use serde::Deserialize;

use neograph_core::{NodeLabel, StoreError};

/// Configuration for connecting to Neo4j.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GraphConfig {
    pub uri: String,
    pub user: String,
    pub password: String,
    pub database: String,
    pub max_connections: usize,
}

impl Default for GraphConfig {
    fn default() -> Self {
        Self {
            uri: "bolt://localhost:7687".to_string(),
            user: "neo4j".to_string(),
            password: "neo4j".to_string(),
            database: "neo4j".to_string(),
            max_connections: 16,
        }
    }
}

impl GraphConfig {
    fn driver_config(&self) -> Result<neo4rs::Config> {
        ConfigBuilder::default()
            .uri(&self.uri)
            .user(&self.user)
            .password(&self.password)
            .db(self.database.as_str())
            .max_connections(self.max_connections)
            .build()
            .with_context(|| format!("Invalid Neo4j settings for {}", self.uri))
    }
}

/// Shared handle on a Neo4j connection pool.
#[derive(Clone)]
pub struct GraphClient {
    graph: Graph,
}

impl GraphClient {
    /// Open the pool and run one statement, since opening alone never touches the server.
    pub async fn connect(config: &GraphConfig) -> Result<Self> {
        let graph = Graph::connect(config.driver_config()?)
            .await
            .with_context(|| format!("Cannot open a Neo4j pool for {}", config.uri))?;
        let client = Self { graph };
        client
            .count(Query::new("RETURN 1 AS alive".to_string()), "alive")
            .await
            .with_context(|| format!("Neo4j at {} did not answer", config.uri))?;
        Ok(client)
    }

    /// Run a statement whose result rows are not needed.
    pub async fn write(&self, query: Query) -> Result<(), StoreError> {
        self.graph.run(query).await.map_err(classify)
    }

    /// Run a statement and read integer `column` from its first row; no rows counts as 0.
    pub async fn count(&self, query: Query, column: &str) -> Result<i64, StoreError> {
        let mut rows = self.graph.execute(query).await.map_err(classify)?;
        let Some(row) = rows.next().await.map_err(classify)? else {
            return Ok(0);
        };
        row.get::<i64>(column)
            .map_err(|err| StoreError::fatal(format!("column {} is not an integer: {}", column, err)))
    }

    /// Node and relationship totals plus a node count per label.
    pub async fn get_counts(&self) -> Result<GraphCounts> {
        let nodes = self
            .count(Query::new("MATCH (n) RETURN count(n) AS total".to_string()), "total")
            .await
            .context("Counting nodes failed")?;
        let relationships = self
            .count(Query::new("MATCH ()-[r]->() RETURN count(r) AS total".to_string()), "total")
            .await
            .context("Counting relationships failed")?;

        let mut labels = Vec::with_capacity(NodeLabel::ALL.len());
        for label in NodeLabel::ALL {
            let query = Query::new(format!("MATCH (n:{}) RETURN count(n) AS total", label.label()));
            let total = self
                .count(query, "total")
                .await
                .with_context(|| format!("Counting {} nodes failed", label.label()))?;
            labels.push((label.label(), total.max(0) as usize));
        }

        Ok(GraphCounts {
            nodes: nodes.max(0) as usize,
            relationships: relationships.max(0) as usize,
            labels,
        })
    }
}

/// Totals reported by `status`.
#[derive(Debug, Clone)]
pub struct GraphCounts {
    pub nodes: usize,
    pub relationships: usize,
    pub labels: Vec<(&'static str, usize)>,
}

/// Connection and I/O failures are worth retrying; anything else is not.
pub fn classify(err: neo4rs::Error) -> StoreError {
    match err {
        neo4rs::Error::IOError { .. } | neo4rs::Error::ConnectionError => {
            StoreError::transient(err.to_string())
        }
        other => StoreError::fatal(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_connection_errors_are_transient() {
        assert!(classify(neo4rs::Error::ConnectionError).is_transient());
        let io = std::io::Error::new(std::io::ErrorKind::BrokenPipe, "pipe");
        assert!(classify(neo4rs::Error::IOError { detail: io }).is_transient());
    }

    #[test]
    fn test_other_errors_are_fatal() {
        assert!(!classify(neo4rs::Error::AuthenticationError("bad password".to_string())).is_transient());
    }

    #[test]
    fn test_default_config_builds() {
        let config = GraphConfig::default();
        assert!(config.driver_config().is_ok());
    }
}
