//! # Flock Core
//!
//! Request-execution and pagination-traversal framework shared by every
//! resource module of the Flock client.
//!
//! This crate contains:
//! - Ambient correlation-id context for cross-cutting tracing
//! - Instrumented execution (timing, structured logging, metrics)
//! - The service executor every resource operation goes through
//! - The paged-response model and its two traversal algorithms
//! - The transport port implemented by `flock-client`
//!
//! ## Architecture Principles
//! - Only depends on `flock-domain`
//! - No HTTP or platform code; all I/O via the [`Transport`] trait
//! - Spawns no background tasks; suspension only at page-fetch boundaries

pub mod correlation;
pub mod executor;
pub mod observability;
pub mod paging;
pub mod ports;

// Re-export specific items to avoid ambiguity
pub use correlation::CorrelationId;
pub use executor::{require_non_empty, require_some, ServiceExecutor};
pub use observability::{track, ExecutionMetrics, ExecutionStats, TrackedScope};
pub use paging::{FetchedPage, Page, PageFetcher, Paginator};
pub use ports::Transport;
