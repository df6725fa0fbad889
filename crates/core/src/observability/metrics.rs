//! Execution metrics for tracking wrapped-operation outcomes
//!
//! ## Design
//! - **SeqCst ordering** for atomics used in derived metrics (avg elapsed)
//! - **No locking needed** - simple atomic counters
//! - **Microsecond storage** - stores raw durations in us, reporting helpers
//!   convert to ms

use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::time::Duration;

/// Metrics for tracking executed operations
#[derive(Debug, Default)]
pub struct ExecutionMetrics {
    /// Number of operations started
    started: AtomicUsize,
    /// Number of operations that completed successfully
    succeeded: AtomicUsize,
    /// Number of operations that failed
    failed: AtomicUsize,
    /// Number of not-found outcomes absorbed into an absent value
    not_found_absorbed: AtomicUsize,
    /// Total time spent in operations, in microseconds
    total_elapsed_micros: AtomicU64,
    /// Last operation elapsed time, in microseconds
    last_elapsed_micros: AtomicU64,
}

impl ExecutionMetrics {
    /// Create a new metrics instance with all counters at zero
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an operation start
    pub fn record_started(&self) {
        // Relaxed OK: independent counter
        self.started.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a successful completion with its elapsed time
    pub fn record_success(&self, elapsed: Duration) {
        self.succeeded.fetch_add(1, Ordering::Relaxed);
        self.record_elapsed(elapsed);
    }

    /// Record a failed completion with its elapsed time
    pub fn record_failure(&self, elapsed: Duration) {
        self.failed.fetch_add(1, Ordering::Relaxed);
        self.record_elapsed(elapsed);
    }

    /// Record a not-found outcome that was absorbed into an absent value
    pub fn record_not_found_absorbed(&self) {
        self.not_found_absorbed.fetch_add(1, Ordering::Relaxed);
    }

    fn record_elapsed(&self, elapsed: Duration) {
        let micros = u64::try_from(elapsed.as_micros()).unwrap_or(u64::MAX);

        // SeqCst for consistency with avg_elapsed_ms calculation
        self.total_elapsed_micros.fetch_add(micros, Ordering::SeqCst);

        // Relaxed OK: last elapsed is not used in derived metrics
        self.last_elapsed_micros.store(micros, Ordering::Relaxed);
    }

    /// Get the average operation time in milliseconds
    ///
    /// Returns 0.0 if no operations have completed.
    pub fn avg_elapsed_ms(&self) -> f64 {
        // SeqCst for consistent snapshot
        let total = self.total_elapsed_micros.load(Ordering::SeqCst);
        let completed = self.succeeded.load(Ordering::SeqCst) + self.failed.load(Ordering::SeqCst);

        if completed == 0 {
            return 0.0;
        }

        (total as f64 / completed as f64) / 1_000.0
    }

    /// Get the last operation elapsed time in milliseconds
    pub fn last_elapsed_ms(&self) -> u64 {
        self.last_elapsed_micros.load(Ordering::Relaxed) / 1_000
    }

    /// Take a consistent-enough snapshot of the counters
    pub fn snapshot(&self) -> ExecutionStats {
        ExecutionStats {
            started: self.started.load(Ordering::Relaxed),
            succeeded: self.succeeded.load(Ordering::Relaxed),
            failed: self.failed.load(Ordering::Relaxed),
            not_found_absorbed: self.not_found_absorbed.load(Ordering::Relaxed),
            avg_elapsed_ms: self.avg_elapsed_ms(),
        }
    }
}

/// Point-in-time view of [`ExecutionMetrics`]
#[derive(Debug, Clone)]
pub struct ExecutionStats {
    pub started: usize,
    pub succeeded: usize,
    pub failed: usize,
    pub not_found_absorbed: usize,
    pub avg_elapsed_ms: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new() {
        let metrics = ExecutionMetrics::new();
        let stats = metrics.snapshot();
        assert_eq!(stats.started, 0);
        assert_eq!(stats.succeeded, 0);
        assert_eq!(stats.failed, 0);
        assert_eq!(stats.not_found_absorbed, 0);
        assert_eq!(stats.avg_elapsed_ms, 0.0);
        assert_eq!(metrics.last_elapsed_ms(), 0);
    }

    #[test]
    fn test_record_outcomes() {
        let metrics = ExecutionMetrics::new();

        metrics.record_started();
        metrics.record_success(Duration::from_millis(100));
        metrics.record_started();
        metrics.record_failure(Duration::from_millis(300));
        metrics.record_not_found_absorbed();

        let stats = metrics.snapshot();
        assert_eq!(stats.started, 2);
        assert_eq!(stats.succeeded, 1);
        assert_eq!(stats.failed, 1);
        assert_eq!(stats.not_found_absorbed, 1);
    }

    #[test]
    fn test_avg_elapsed_ms() {
        let metrics = ExecutionMetrics::new();
        assert_eq!(metrics.avg_elapsed_ms(), 0.0);

        metrics.record_success(Duration::from_millis(100));
        metrics.record_success(Duration::from_millis(200));
        metrics.record_failure(Duration::from_millis(300));

        assert_eq!(metrics.avg_elapsed_ms(), 200.0);
        assert_eq!(metrics.last_elapsed_ms(), 300);
    }
}
