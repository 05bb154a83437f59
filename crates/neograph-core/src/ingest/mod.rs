//! Ingestion driver.
//!
//! The first non-blank line is the header; it is parsed and its diagnosis
//! hierarchy is written before any data row is read. Data rows are then
//! parsed in file order and written by up to `workers` concurrent row
//! processors. Malformed rows are skipped and reported. A store failure that
//! survives retries, or a failure of the input stream itself, stops reading,
//! lets in-flight rows finish, and is reported with the lines it affected.

pub mod report;
pub mod source;

use std::path::Path;

use futures::stream::{FuturesUnordered, StreamExt};
use tokio::io::AsyncBufRead;
use tracing::{error, info, warn};

use crate::cache::IdentityCache;
use crate::error::{IngestResult, SchemaError};
use crate::header::{process_header, Header};
use crate::record::is_blank;
use crate::row::{RowProcessor, VisitRow};
use crate::store::{GraphStore, RetryPolicy, RetryingStore};

pub use report::{AbortInfo, IngestReport, RowError, RowErrorKind};
pub use source::{count_lines, LineReader};

/// Tuning for a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IngestOptions {
    /// Concurrent row processors; 1 keeps strict file order.
    pub workers: usize,
    /// How many row errors the report keeps verbatim.
    pub max_reported_errors: usize,
    pub retry: RetryPolicy,
}

impl Default for IngestOptions {
    fn default() -> Self {
        Self {
            workers: 1,
            max_reported_errors: 20,
            retry: RetryPolicy::default(),
        }
    }
}

/// Receives a tick for every data row that reaches a final state.
pub trait Progress: Send + Sync {
    fn row_done(&self, line: usize);
}

/// Progress sink that ignores ticks.
pub struct NoProgress;

impl Progress for NoProgress {
    fn row_done(&self, _line: usize) {}
}

/// Loads visit tables into a [`GraphStore`].
pub struct Ingestor<S> {
    cache: IdentityCache<RetryingStore<S>>,
    options: IngestOptions,
}

impl<S: GraphStore> Ingestor<S> {
    pub fn new(store: S, options: IngestOptions) -> Self {
        Self {
            cache: IdentityCache::new(
                RetryingStore::new(store, options.retry).with_log_limit(options.max_reported_errors),
            ),
            options,
        }
    }

    /// The underlying store.
    pub fn store(&self) -> &S {
        self.cache.store().inner()
    }

    pub fn options(&self) -> &IngestOptions {
        &self.options
    }

    /// Ingest the file at `path`. The file is closed when this returns.
    pub async fn ingest_path(&self, path: &Path, progress: &dyn Progress) -> IngestResult<IngestReport> {
        info!(path = %path.display(), "Opening visit table");
        let reader = source::open(path).await?;
        self.ingest_reader(reader, progress).await
    }

    /// Ingest a header line followed by data rows from `reader`.
    pub async fn ingest_reader<R>(&self, reader: R, progress: &dyn Progress) -> IngestResult<IngestReport>
    where
        R: AsyncBufRead + Unpin,
    {
        let mut lines = LineReader::new(reader);
        let retries_before = self.cache.store().retries();
        self.cache.store().take_transient_errors();
        let hits_before = self.cache.hits();

        let header = loop {
            match lines.next_line().await? {
                Some((_, raw)) if is_blank(&raw) => continue,
                Some((_, raw)) => break Header::from_line(&raw)?,
                None => return Err(SchemaError::EmptyInput.into()),
            }
        };

        let mut report = IngestReport::new(self.options.max_reported_errors);
        report.diagnosis_codes = process_header(&self.cache, &header).await?;

        let processor = RowProcessor::new(&self.cache);
        let workers = self.options.workers.max(1);
        let mut in_flight = FuturesUnordered::new();
        let mut eof = false;

        info!(workers, "Loading visits");
        loop {
            let accepting = !eof && report.abort.is_none();
            if accepting && in_flight.len() < workers {
                let (line, raw) = match lines.next_line().await {
                    Ok(Some(next)) => next,
                    Ok(None) => {
                        eof = true;
                        continue;
                    }
                    Err(err) => {
                        let line = lines.lines_read() + 1;
                        error!(line, error = %err, "Input read failed, stopping ingestion");
                        report.record_read_failure(line, &err);
                        continue;
                    }
                };
                if is_blank(&raw) {
                    continue;
                }
                match VisitRow::parse(line, &raw, &header) {
                    Ok(row) => {
                        let processor = &processor;
                        in_flight.push(async move { (row.line, processor.process(&row).await) });
                    }
                    Err(err) => {
                        warn!(line, reason = %err.reason, "Skipping malformed row");
                        report.record_skipped(err);
                        progress.row_done(line);
                    }
                }
                continue;
            }

            let Some((line, outcome)) = in_flight.next().await else {
                break;
            };
            match outcome {
                Ok(outcome) => report.record_processed(outcome),
                Err(err) => {
                    error!(line, error = %err, "Row failed, stopping ingestion");
                    report.record_failed(line, err);
                }
            }
            progress.row_done(line);
        }

        if let Some(abort) = report.abort.as_mut() {
            if !eof && abort.resume_line.is_none() {
                abort.resume_line = Some(lines.lines_read() + 1);
            }
        }
        report.store_retries = self.cache.store().retries() - retries_before;
        report.transient_errors = self.cache.store().take_transient_errors();
        report.cache_hits = self.cache.hits() - hits_before;

        info!(
            processed = report.rows_processed,
            skipped = report.rows_skipped,
            failed = report.rows_failed,
            dx_links = report.dx_links,
            retries = report.store_retries,
            "Ingestion finished"
        );
        Ok(report)
    }
}
