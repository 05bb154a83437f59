//! Bounded retry with exponential backoff for transient store failures.

use std::future::Future;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use tracing::warn;

use crate::error::StoreResult;
use crate::model::{NodeHandle, NodeLabel, Relation};
use super::GraphStore;

/// How often and how patiently to retry a transient failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_retries: u32,
    pub base_delay: Duration,
    pub max_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 3,
            base_delay: Duration::from_millis(200),
            max_delay: Duration::from_secs(5),
        }
    }
}

impl RetryPolicy {
    /// A policy that never retries.
    pub fn none() -> Self {
        Self { max_retries: 0, ..Self::default() }
    }

    /// Delay before retry number `attempt` (1-based).
    pub fn delay_for(&self, attempt: u32) -> Duration {
        let factor = 1u32 << attempt.saturating_sub(1).min(20);
        self.base_delay
            .checked_mul(factor)
            .unwrap_or(self.max_delay)
            .min(self.max_delay)
    }
}

/// Messages kept by default for transient failures.
const DEFAULT_LOG_LIMIT: usize = 20;

/// Wraps a store so transient errors are retried and exhausted retries become fatal.
#[derive(Debug)]
pub struct RetryingStore<S> {
    inner: S,
    policy: RetryPolicy,
    retries: AtomicUsize,
    /// The first `log_limit` transient failures, as `op: message`.
    log: Mutex<Vec<String>>,
    log_limit: usize,
}

impl<S: GraphStore> RetryingStore<S> {
    pub fn new(inner: S, policy: RetryPolicy) -> Self {
        Self {
            inner,
            policy,
            retries: AtomicUsize::new(0),
            log: Mutex::new(Vec::new()),
            log_limit: DEFAULT_LOG_LIMIT,
        }
    }

    /// Keep at most `limit` transient failure messages.
    pub fn with_log_limit(mut self, limit: usize) -> Self {
        self.log_limit = limit;
        self
    }

    /// Total retries performed so far.
    pub fn retries(&self) -> usize {
        self.retries.load(Ordering::Relaxed)
    }

    /// Take the transient failure messages collected since the last call.
    pub fn take_transient_errors(&self) -> Vec<String> {
        let mut log = self.log.lock().unwrap_or_else(|e| e.into_inner());
        std::mem::take(&mut *log)
    }

    fn note_transient(&self, op: &str, message: &str) {
        let mut log = self.log.lock().unwrap_or_else(|e| e.into_inner());
        if log.len() < self.log_limit {
            log.push(format!("{}: {}", op, message));
        }
    }

    pub fn inner(&self) -> &S {
        &self.inner
    }

    async fn run<T, F, Fut>(&self, op: &str, call: F) -> StoreResult<T>
    where
        F: Fn() -> Fut + Send + Sync,
        Fut: Future<Output = StoreResult<T>> + Send,
        T: Send,
    {
        let mut attempt = 0;
        loop {
            match call().await {
                Ok(value) => return Ok(value),
                Err(err) if err.is_transient() && attempt < self.policy.max_retries => {
                    attempt += 1;
                    self.retries.fetch_add(1, Ordering::Relaxed);
                    self.note_transient(op, &err.message);
                    let delay = self.policy.delay_for(attempt);
                    warn!(op, attempt, delay_ms = delay.as_millis() as u64, error = %err, "Retrying store call");
                    tokio::time::sleep(delay).await;
                }
                Err(err) => return Err(err.into_fatal()),
            }
        }
    }
}

#[async_trait]
impl<S: GraphStore> GraphStore for RetryingStore<S> {
    async fn get_or_create(&self, label: NodeLabel, key: &str) -> StoreResult<NodeHandle> {
        self.run("get_or_create", || self.inner.get_or_create(label, key)).await
    }

    async fn create_or_update(&self, label: NodeLabel, key: &str) -> StoreResult<NodeHandle> {
        self.run("create_or_update", || self.inner.create_or_update(label, key)).await
    }

    async fn connect(&self, from: &NodeHandle, relation: Relation, to: &NodeHandle) -> StoreResult<()> {
        self.run("connect", || self.inner.connect(from, relation, to)).await
    }
}
