//! # Neograph Graph
//!
//! Neo4j storage for neograph ingestion: connection handling, schema
//! constraints and a [`neograph_core::GraphStore`] implementation.

pub mod client;
pub mod schema;
pub mod store;

pub use client::{GraphClient, GraphConfig, GraphCounts};
pub use store::Neo4jStore;
