//! Typed paged endpoints
//!
//! Bridges one collection path onto the core's [`PageFetcher`] port. The
//! mapping from wire payloads to domain values is pure serde; everything
//! stateful (cursors, loop guards, cancellation) stays in the core
//! traversals.

use std::marker::PhantomData;
use std::sync::Arc;

use async_trait::async_trait;
use flock_core::{FetchedPage, Page, PageFetcher, Paginator, Transport};
use flock_domain::{ApiError, PageCursor, Result, TraversalOptions};
use serde::de::DeserializeOwned;

/// One paged collection endpoint, typed by its resource
pub struct PagedEndpoint<T> {
    transport: Arc<dyn Transport>,
    path: String,
    query: Vec<(String, String)>,
    _marker: PhantomData<fn() -> T>,
}

impl<T> PagedEndpoint<T>
where
    T: DeserializeOwned + Send + Sync + 'static,
{
    /// Address the collection at `path` (e.g. "/people")
    pub fn new(transport: Arc<dyn Transport>, path: impl Into<String>) -> Self {
        Self { transport, path: path.into(), query: Vec::new(), _marker: PhantomData }
    }

    /// Add a query parameter forwarded with the seed request
    pub fn with_query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }

    /// Turn the endpoint into a traversal with the given options
    pub fn paginate(self, options: TraversalOptions) -> Paginator<T> {
        let cursor = PageCursor::Start {
            path: self.path.clone(),
            query: self.query.clone(),
            per_page: options.page_size,
        };
        Paginator::new(Arc::new(self), cursor, options)
    }

    /// Fetch the first page for manual page-at-a-time navigation
    pub async fn first_page(self, options: TraversalOptions) -> Result<Page<T>> {
        self.paginate(options).first_page().await
    }
}

#[async_trait]
impl<T> PageFetcher<T> for PagedEndpoint<T>
where
    T: DeserializeOwned + Send + Sync + 'static,
{
    async fn fetch_page(&self, cursor: &PageCursor) -> Result<FetchedPage<T>> {
        let raw = self.transport.get_paged(cursor).await?;

        let mut items = Vec::with_capacity(raw.items.len());
        for value in raw.items {
            items.push(
                serde_json::from_value(value)
                    .map_err(|e| ApiError::Client(format!("failed to map resource: {}", e)))?,
            );
        }

        Ok(FetchedPage { items, meta: raw.meta, links: raw.links })
    }
}
