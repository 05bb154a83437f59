//! Run summary returned by the driver.

use serde::Serialize;

use crate::error::{ParseError, StoreError};
use crate::row::RowOutcome;

/// Why a row did not make it into the graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RowErrorKind {
    Parse,
    Store,
    Read,
}

/// A reported row failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RowError {
    pub line: usize,
    pub kind: RowErrorKind,
    pub message: String,
}

/// Details of a run stopped by a fatal store error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AbortInfo {
    /// Line whose failure stopped the run.
    pub line: usize,
    pub error: String,
    /// Lines that were in progress and failed; includes `line` for store failures.
    pub failed_lines: Vec<usize>,
    /// First line not yet read when the run stopped; `None` once end of input was seen.
    pub resume_line: Option<usize>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct IngestReport {
    pub rows_processed: usize,
    pub rows_skipped: usize,
    pub rows_failed: usize,
    pub diagnosis_codes: usize,
    pub dx_links: usize,
    pub store_retries: usize,
    /// Transient store failures that were retried, first N kept.
    pub transient_errors: Vec<String>,
    pub cache_hits: usize,
    /// The first `max_errors` row failures, in completion order.
    pub errors: Vec<RowError>,
    pub error_count: usize,
    pub abort: Option<AbortInfo>,
    #[serde(skip)]
    max_errors: usize,
}

impl IngestReport {
    pub fn new(max_errors: usize) -> Self {
        Self { max_errors, ..Self::default() }
    }

    /// True when every line was read and no fatal error stopped the run.
    pub fn is_complete(&self) -> bool {
        self.abort.is_none()
    }

    /// Data rows that reached a final state.
    pub fn rows_seen(&self) -> usize {
        self.rows_processed + self.rows_skipped + self.rows_failed
    }

    pub(crate) fn record_processed(&mut self, outcome: RowOutcome) {
        self.rows_processed += 1;
        self.dx_links += outcome.dx_links;
    }

    pub(crate) fn record_skipped(&mut self, err: ParseError) {
        self.rows_skipped += 1;
        self.push_error(RowError {
            line: err.line,
            kind: RowErrorKind::Parse,
            message: err.to_string(),
        });
    }

    /// Record a row lost to a store failure. The first one marks the run aborted.
    pub(crate) fn record_failed(&mut self, line: usize, err: StoreError) {
        self.rows_failed += 1;
        let message = err.to_string();
        match self.abort.as_mut() {
            Some(abort) => abort.failed_lines.push(line),
            None => {
                self.abort = Some(AbortInfo {
                    line,
                    error: message.clone(),
                    failed_lines: vec![line],
                    resume_line: None,
                });
            }
        }
        self.push_error(RowError { line, kind: RowErrorKind::Store, message });
    }

    /// Record that the input stream failed before `line` could be read.
    pub(crate) fn record_read_failure(&mut self, line: usize, err: &std::io::Error) {
        let message = format!("read failed: {}", err);
        if self.abort.is_none() {
            self.abort = Some(AbortInfo {
                line,
                error: message.clone(),
                failed_lines: Vec::new(),
                resume_line: Some(line),
            });
        }
        self.push_error(RowError { line, kind: RowErrorKind::Read, message });
    }

    fn push_error(&mut self, error: RowError) {
        self.error_count += 1;
        if self.errors.len() < self.max_errors {
            self.errors.push(error);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_error(line: usize) -> ParseError {
        ParseError { line, content: "x".to_string(), reason: "bad".to_string() }
    }

    #[test]
    fn test_error_list_is_capped() {
        let mut report = IngestReport::new(2);
        for line in 2..7 {
            report.record_skipped(parse_error(line));
        }
        assert_eq!(report.rows_skipped, 5);
        assert_eq!(report.error_count, 5);
        assert_eq!(report.errors.len(), 2);
        assert_eq!(report.errors[1].line, 3);
        assert!(report.is_complete());
    }

    #[test]
    fn test_first_store_failure_aborts() {
        let mut report = IngestReport::new(10);
        report.record_failed(4, StoreError::fatal("gone"));
        report.record_failed(5, StoreError::fatal("gone"));
        let abort = report.abort.as_ref().unwrap();
        assert_eq!(abort.line, 4);
        assert_eq!(abort.failed_lines, vec![4, 5]);
        assert_eq!(report.rows_failed, 2);
        assert!(!report.is_complete());
    }

    #[test]
    fn test_read_failure_aborts_without_failed_rows() {
        let mut report = IngestReport::new(10);
        report.record_processed(RowOutcome { attributes: 4, dx_links: 1 });
        let err = std::io::Error::new(std::io::ErrorKind::UnexpectedEof, "truncated");
        report.record_read_failure(3, &err);

        let abort = report.abort.as_ref().unwrap();
        assert_eq!(abort.line, 3);
        assert!(abort.failed_lines.is_empty());
        assert_eq!(abort.resume_line, Some(3));
        assert_eq!(report.rows_processed, 1);
        assert_eq!(report.errors[0].kind, RowErrorKind::Read);
    }
}
