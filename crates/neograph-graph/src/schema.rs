//! Neo4j schema initialization.

use anyhow::{Context, Result};
use neo4rs::Query;
use tracing::info;

use neograph_core::NodeLabel;

use crate::GraphClient;

/// One uniqueness constraint per node label on its key property.
///
/// The constraints also back the `MERGE` lookups with an index and stop
/// concurrent upserts from creating duplicate nodes.
pub fn schema_statements() -> Vec<String> {
    NodeLabel::ALL
        .iter()
        .map(|label| {
            format!(
                "CREATE CONSTRAINT {}_{} IF NOT EXISTS FOR (n:{}) REQUIRE n.{} IS UNIQUE",
                label.label().to_lowercase(),
                label.key_property(),
                label.label(),
                label.key_property()
            )
        })
        .collect()
}

/// Initialize Neo4j schema with constraints.
///
/// Safe to run multiple times - uses IF NOT EXISTS clauses.
pub async fn initialize_schema(client: &GraphClient) -> Result<usize> {
    info!("Initializing Neo4j schema...");

    let statements = schema_statements();
    for statement in &statements {
        client
            .write(Query::new(statement.clone()))
            .await
            .with_context(|| format!("Schema statement failed: {}", statement))?;
    }

    info!("Neo4j schema initialized ({} statements)", statements.len());
    Ok(statements.len())
}
