//! Error taxonomy for ingestion.

use thiserror::Error;

/// Failures of the backing graph store.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{kind} store error: {message}")]
pub struct StoreError {
    pub kind: StoreErrorKind,
    pub message: String,
}

/// Whether a store failure is worth retrying.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreErrorKind {
    Transient,
    Fatal,
}

impl std::fmt::Display for StoreErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StoreErrorKind::Transient => write!(f, "transient"),
            StoreErrorKind::Fatal => write!(f, "fatal"),
        }
    }
}

impl StoreError {
    /// Create a retryable error (connection hiccup, lock timeout).
    pub fn transient(msg: impl Into<String>) -> Self {
        Self { kind: StoreErrorKind::Transient, message: msg.into() }
    }

    /// Create an error that must abort the run.
    pub fn fatal(msg: impl Into<String>) -> Self {
        Self { kind: StoreErrorKind::Fatal, message: msg.into() }
    }

    pub fn is_transient(&self) -> bool {
        self.kind == StoreErrorKind::Transient
    }

    /// Re-raise as fatal, keeping the message.
    pub fn into_fatal(self) -> Self {
        Self { kind: StoreErrorKind::Fatal, ..self }
    }
}

/// A data row that could not be turned into a visit.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("line {line}: {reason} ({content:?})")]
pub struct ParseError {
    pub line: usize,
    pub content: String,
    pub reason: String,
}

/// The header cannot describe a valid diagnosis hierarchy.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SchemaError {
    #[error("Input is empty: no header line found")]
    EmptyInput,

    #[error("Header has {found} columns, at least {required} are required")]
    TooFewColumns { found: usize, required: usize },

    #[error("Diagnosis column {column} is empty after removing dots")]
    EmptyCode { column: usize },
}

/// Errors that end an ingestion run.
#[derive(Error, Debug)]
pub enum IngestError {
    #[error("Schema error: {0}")]
    Schema(#[from] SchemaError),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Result type for ingestion operations.
pub type IngestResult<T> = Result<T, IngestError>;
