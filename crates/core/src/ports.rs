//! Infrastructure port interfaces
//!
//! The transport boundary the execution framework consumes. Implementations
//! live in `flock-client`; tests substitute in-memory fakes.

use async_trait::async_trait;
use flock_domain::{PageCursor, RawPage, Result};
use serde_json::Value;

/// Abstract connection to the remote JSON:API service.
///
/// Implementations must surface HTTP 404 as [`ApiError::NotFound`] and every
/// other remote failure as its classified [`ApiError`] variant so the
/// executor's classification can branch correctly.
///
/// [`ApiError::NotFound`]: flock_domain::ApiError::NotFound
/// [`ApiError`]: flock_domain::ApiError
#[async_trait]
pub trait Transport: Send + Sync {
    /// Fetch a single resource document
    async fn get(&self, path: &str, query: &[(String, String)]) -> Result<Value>;

    /// Fetch one page of a collection addressed by `cursor`
    async fn get_paged(&self, cursor: &PageCursor) -> Result<RawPage>;

    /// Create a resource
    async fn post(&self, path: &str, body: &Value) -> Result<Value>;

    /// Update a resource
    async fn patch(&self, path: &str, body: &Value) -> Result<Value>;

    /// Delete a resource
    async fn delete(&self, path: &str) -> Result<()>;
}
