//! # Flock Client
//!
//! Infrastructure implementation of the Flock core ports.
//!
//! This crate contains:
//! - The reqwest-based JSON:API transport ([`JsonApiConnection`])
//! - Client configuration with builder and environment loading
//! - The access-token provider boundary
//! - Typed paged endpoints bridging collections onto the core traversals
//!
//! ## Architecture
//! - Implements traits defined in `flock-core`
//! - Contains all "impure" code (HTTP I/O)
//!
//! ## Example
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use flock_client::{ClientConfig, JsonApiConnection, PagedEndpoint, StaticTokenProvider};
//! use flock_core::{ServiceExecutor, Transport};
//! use flock_domain::TraversalOptions;
//! use tokio_util::sync::CancellationToken;
//!
//! # async fn example() -> flock_domain::Result<()> {
//! let config = ClientConfig::builder().base_url("https://api.flockhq.com/v2").build()?;
//! let auth = Arc::new(StaticTokenProvider::new("token"));
//! let connection = Arc::new(JsonApiConnection::new(config, auth)?);
//!
//! let executor = ServiceExecutor::new();
//! let ct = CancellationToken::new();
//!
//! // Absent resources resolve to None instead of an error
//! let person: Option<serde_json::Value> = executor
//!     .execute_get("people.get", Some("123"), &ct, || async {
//!         connection.get("/people/123", &[]).await
//!     })
//!     .await?;
//!
//! // Eagerly materialize a collection, fifty items per page
//! let people: Vec<serde_json::Value> = PagedEndpoint::new(connection.clone(), "/people")
//!     .paginate(TraversalOptions::new().page_size(50))
//!     .collect_all(&ct)
//!     .await?;
//! # let _ = (person, people);
//! # Ok(())
//! # }
//! ```

pub mod auth;
pub mod config;
pub mod paged;
pub mod transport;

// Re-export commonly used items
pub use auth::{AccessTokenProvider, StaticTokenProvider};
pub use config::{ClientConfig, ClientConfigBuilder};
pub use paged::PagedEndpoint;
pub use transport::JsonApiConnection;
