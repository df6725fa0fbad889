//! Timing and structured logging around a unit of work
//!
//! `track` wraps a single async operation; `TrackedScope` is the guard form
//! for call sites that need to signal success or failure manually. Both log
//! the chain's correlation id at every line so nested operations stay
//! joinable across log systems.

use std::fmt;
use std::future::Future;
use std::time::Instant;

use flock_domain::Result;
use tracing::{debug, error, info, warn};

use crate::correlation::{self, CorrelationId};

/// Run `work` with timing and structured logging.
///
/// Emits a debug line before the work starts, an info line with elapsed
/// milliseconds on success, and an error line with elapsed milliseconds and
/// the classified failure kind on error. The error is re-raised unchanged;
/// this function observes, it never swallows.
pub async fn track<T, F, Fut>(operation: &str, resource_id: Option<&str>, work: F) -> Result<T>
where
    F: FnOnce() -> Fut,
    Fut: Future<Output = Result<T>>,
{
    let correlation_id = correlation::get_or_generate();
    debug!(operation, correlation_id = %correlation_id, resource_id, "operation started");

    let started = Instant::now();
    match work().await {
        Ok(value) => {
            let elapsed_ms = elapsed_ms(started);
            info!(operation, correlation_id = %correlation_id, elapsed_ms, "operation completed");
            Ok(value)
        }
        Err(err) => {
            let elapsed_ms = elapsed_ms(started);
            error!(
                operation,
                correlation_id = %correlation_id,
                elapsed_ms,
                kind = %err.kind(),
                error = %err,
                "operation failed"
            );
            Err(err)
        }
    }
}

/// Elapsed whole milliseconds since `started`; monotonic, never negative
fn elapsed_ms(started: Instant) -> u64 {
    u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX)
}

#[derive(Debug)]
enum ScopeOutcome {
    Pending,
    Success,
    Failure(String),
}

/// Guard form of [`track`] for manual success/failure signaling.
///
/// Dropping the scope guarantees exactly one completion log line on every
/// exit path, including unwinds; a scope dropped without a signal is logged
/// as abandoned.
#[derive(Debug)]
pub struct TrackedScope {
    operation: String,
    resource_id: Option<String>,
    correlation_id: CorrelationId,
    started: Instant,
    outcome: ScopeOutcome,
}

impl TrackedScope {
    /// Open a scope, logging the start of the operation
    pub fn new(operation: &str, resource_id: Option<&str>) -> Self {
        let correlation_id = correlation::get_or_generate();
        debug!(operation, correlation_id = %correlation_id, resource_id, "scope opened");

        Self {
            operation: operation.to_string(),
            resource_id: resource_id.map(String::from),
            correlation_id,
            started: Instant::now(),
            outcome: ScopeOutcome::Pending,
        }
    }

    /// The correlation id this scope logs under
    pub fn correlation_id(&self) -> &CorrelationId {
        &self.correlation_id
    }

    /// Mark the scope successful and close it
    pub fn succeed(mut self) {
        self.outcome = ScopeOutcome::Success;
    }

    /// Mark the scope failed and close it
    pub fn fail<E: fmt::Display>(mut self, error: &E) {
        self.outcome = ScopeOutcome::Failure(error.to_string());
    }
}

impl Drop for TrackedScope {
    fn drop(&mut self) {
        let elapsed_ms = elapsed_ms(self.started);
        let operation = self.operation.as_str();
        let resource_id = self.resource_id.as_deref();
        match &self.outcome {
            ScopeOutcome::Success => {
                info!(
                    operation,
                    correlation_id = %self.correlation_id,
                    resource_id,
                    elapsed_ms,
                    "scope completed"
                );
            }
            ScopeOutcome::Failure(error) => {
                error!(
                    operation,
                    correlation_id = %self.correlation_id,
                    resource_id,
                    elapsed_ms,
                    error = %error,
                    "scope failed"
                );
            }
            ScopeOutcome::Pending => {
                warn!(
                    operation,
                    correlation_id = %self.correlation_id,
                    resource_id,
                    elapsed_ms,
                    "scope dropped without an outcome"
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use flock_domain::ApiError;

    use super::*;
    use crate::correlation;

    #[tokio::test]
    async fn test_track_passes_value_through() {
        let result = track("people.get", Some("person-1"), || async { Ok(42) }).await;
        assert_eq!(result.expect("value"), 42);
    }

    #[tokio::test]
    async fn test_track_reraises_unchanged() {
        let result: Result<()> =
            track("people.get", None, || async { Err(ApiError::Server("boom".into())) }).await;
        match result {
            Err(ApiError::Server(msg)) => assert_eq!(msg, "boom"),
            other => panic!("expected server error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_track_uses_chain_correlation_id() {
        correlation::scope(async {
            let id = correlation::get_or_generate();
            track("people.get", None, || async { Ok(()) }).await.expect("ok");
            // The chain id is untouched by tracking
            assert_eq!(correlation::current(), Some(id));
        })
        .await;
    }

    #[tokio::test]
    async fn test_scope_exit_paths() {
        let scope = TrackedScope::new("people.list", None);
        scope.succeed();

        let scope = TrackedScope::new("people.list", Some("person-1"));
        scope.fail(&ApiError::Server("boom".into()));

        // Dropping without a signal logs the scope as abandoned
        let _scope = TrackedScope::new("people.list", None);
    }

    #[tokio::test]
    async fn test_scope_shares_chain_id() {
        correlation::scope(async {
            let id = correlation::get_or_generate();
            let scope = TrackedScope::new("people.list", None);
            assert_eq!(scope.correlation_id(), &id);
            scope.succeed();
        })
        .await;
    }
}
