//! # Neograph Core
//!
//! Streams a delimited table of clinical visits and their diagnosis flags
//! into a property graph: visit nodes linked to sex, care site, race and age
//! nodes, and to diagnosis nodes arranged in a code-prefix hierarchy.
//!
//! Storage is reached only through the [`GraphStore`] trait.

pub mod cache;
pub mod error;
pub mod header;
pub mod hierarchy;
pub mod ingest;
pub mod model;
pub mod record;
pub mod row;
pub mod store;

pub use cache::IdentityCache;
pub use error::{IngestError, IngestResult, ParseError, SchemaError, StoreError, StoreErrorKind, StoreResult};
pub use header::{Header, RESERVED_COLUMNS};
pub use hierarchy::{build_hierarchy, code_chain};
pub use ingest::{IngestOptions, IngestReport, Ingestor, NoProgress, Progress};
pub use model::{NodeHandle, NodeLabel, Relation};
pub use store::{GraphStore, MemoryStore, RetryPolicy, RetryingStore};
