//! Uniform execution wrapper for resource operations
//!
//! Every resource operation in the client goes through [`ServiceExecutor`]:
//! the wrapper establishes a correlation scope at the root of the chain,
//! delegates to instrumented tracking, classifies remote failures, and
//! optionally converts the transport's "not found" signal into an absent
//! value. Centralizing the classification here gives every operation in the
//! system identical, testable null-vs-error semantics for absent resources.

use std::future::Future;
use std::sync::Arc;
use std::time::Instant;

use flock_domain::{ApiError, Result};
use tokio_util::sync::CancellationToken;
use tracing::warn;

use crate::correlation;
use crate::observability::{track, ExecutionMetrics, TrackedScope};

/// Shared execution wrapper for resource operations
#[derive(Debug, Default)]
pub struct ServiceExecutor {
    metrics: Arc<ExecutionMetrics>,
}

impl ServiceExecutor {
    /// Create an executor with its own metrics instance
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an executor recording into a shared metrics instance
    pub fn with_metrics(metrics: Arc<ExecutionMetrics>) -> Self {
        Self { metrics }
    }

    /// Metrics recorded by this executor
    pub fn metrics(&self) -> Arc<ExecutionMetrics> {
        Arc::clone(&self.metrics)
    }

    /// Execute `work` with tracking and failure classification.
    ///
    /// Any failure, including "not found", is logged once at classification,
    /// annotated with the chain's correlation id, and re-raised.
    pub async fn execute<T, F, Fut>(
        &self,
        operation: &str,
        resource_id: Option<&str>,
        ct: &CancellationToken,
        work: F,
    ) -> Result<T>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        match self.run(operation, resource_id, ct, false, work).await? {
            Some(value) => Ok(value),
            None => Err(ApiError::Internal(format!(
                "operation {} completed without a value",
                operation
            ))),
        }
    }

    /// Execute a read where absence is a valid, common outcome.
    ///
    /// A "not found" failure resolves to `Ok(None)` with a warning log; every
    /// other failure propagates exactly as with [`execute`](Self::execute).
    pub async fn execute_get<T, F, Fut>(
        &self,
        operation: &str,
        resource_id: Option<&str>,
        ct: &CancellationToken,
        work: F,
    ) -> Result<Option<T>>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        self.run(operation, resource_id, ct, true, work).await
    }

    /// Open a [`TrackedScope`] for call sites that signal completion manually
    pub fn create_scope(&self, operation: &str, resource_id: Option<&str>) -> TrackedScope {
        TrackedScope::new(operation, resource_id)
    }

    async fn run<T, F, Fut>(
        &self,
        operation: &str,
        resource_id: Option<&str>,
        ct: &CancellationToken,
        allow_not_found: bool,
        work: F,
    ) -> Result<Option<T>>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        // Cooperative cancellation: nothing is attempted once the caller
        // has cancelled, but an in-flight request is never aborted here.
        if ct.is_cancelled() {
            return Err(ApiError::Cancelled);
        }

        let fut = async {
            let correlation_id = correlation::get_or_generate();
            self.metrics.record_started();
            let started = Instant::now();

            let absorbed_id = correlation_id.clone();
            let outcome = track(operation, resource_id, move || async move {
                match work().await {
                    Ok(value) => Ok(Some(value)),
                    Err(err) if allow_not_found && err.is_not_found() => {
                        warn!(
                            operation,
                            correlation_id = %absorbed_id,
                            error = %err,
                            "resource absent; returning none"
                        );
                        Ok(None)
                    }
                    Err(err) => Err(err),
                }
            })
            .await;

            match outcome {
                Ok(Some(value)) => {
                    self.metrics.record_success(started.elapsed());
                    Ok(Some(value))
                }
                Ok(None) => {
                    self.metrics.record_success(started.elapsed());
                    self.metrics.record_not_found_absorbed();
                    Ok(None)
                }
                Err(err) => {
                    self.metrics.record_failure(started.elapsed());
                    Err(err.with_correlation(correlation_id.as_str()))
                }
            }
        };

        // The executor is the root of the chain: open a correlation scope if
        // the caller has not established one already.
        if correlation::in_scope() {
            fut.await
        } else {
            correlation::scope(fut).await
        }
    }
}

/// Fail fast on an empty required string argument, before any network call
pub fn require_non_empty(value: &str, name: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(ApiError::InvalidInput(format!("{} must not be empty", name)));
    }
    Ok(())
}

/// Fail fast on a missing required argument, before any network call
pub fn require_some<T>(value: Option<T>, name: &str) -> Result<T> {
    value.ok_or_else(|| ApiError::InvalidInput(format!("{} is required", name)))
}
