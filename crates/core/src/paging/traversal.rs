//! Pagination traversal algorithms
//!
//! Two cursor-driven traversals over a [`PageFetcher`]: eager
//! [`Paginator::collect_all`] and lazy [`Paginator::stream_all`]. Both follow
//! the server's next link verbatim, fetch pages strictly in sequence, honor
//! cooperative cancellation, and refuse to re-follow a link they just
//! followed so a misbehaving server cannot trap them in a loop.

use std::sync::Arc;

use flock_domain::{ApiError, PageCursor, Result, TraversalOptions};
use futures::stream::{self, Stream};
use tokio_util::sync::CancellationToken;
use tracing::warn;

use super::{Page, PageFetcher};

/// Cursor-driven traversal over a paged collection
pub struct Paginator<T> {
    fetcher: Arc<dyn PageFetcher<T>>,
    start: PageCursor,
    options: TraversalOptions,
}

impl<T: Send + 'static> Paginator<T> {
    /// Create a traversal starting at `start`.
    ///
    /// The seed cursor's page size is overridden by `options.page_size`.
    pub fn new(
        fetcher: Arc<dyn PageFetcher<T>>,
        start: PageCursor,
        options: TraversalOptions,
    ) -> Self {
        let start = start.with_per_page(options.page_size);
        Self { fetcher, start, options }
    }

    /// Fetch the first page, bound for manual page-at-a-time navigation
    pub async fn first_page(&self) -> Result<Page<T>> {
        let fetched = self.fetcher.fetch_page(&self.start).await?;
        Ok(Page::bind(fetched, Arc::clone(&self.fetcher)))
    }

    /// Eagerly materialize the whole collection, in server order.
    ///
    /// Returns after the server-indicated sequence is exhausted or
    /// `max_items` is reached. A fetch failure discards the partial
    /// accumulation. Cancellation surfaces [`ApiError::Cancelled`] unless
    /// `partial_on_cancel` asked for the gathered prefix.
    pub async fn collect_all(&self, ct: &CancellationToken) -> Result<Vec<T>> {
        let mut collected = Vec::new();
        let mut cursor = Some(self.start.clone());
        let mut last_link = None;

        while let Some(current) = cursor.take() {
            if ct.is_cancelled() {
                if self.options.partial_on_cancel {
                    return Ok(collected);
                }
                return Err(ApiError::Cancelled);
            }

            let page = self.fetcher.fetch_page(&current).await?;
            collected.extend(page.items);

            if let Some(max) = self.options.max_items {
                if collected.len() >= max {
                    collected.truncate(max);
                    break;
                }
            }

            cursor = advance(&mut last_link, page.links.next);
        }

        Ok(collected)
    }

    /// Lazily stream the collection, fetching a page only when the consumer
    /// pulls past the buffered one.
    ///
    /// The stream is finite and not restartable; dropping it fetches nothing
    /// further. Cancellation is checked before each page fetch and before
    /// each buffered item is delivered, surfacing [`ApiError::Cancelled`].
    pub fn stream_all(&self, ct: CancellationToken) -> impl Stream<Item = Result<T>> {
        let fetcher = Arc::clone(&self.fetcher);
        let options = self.options.clone();
        let state = StreamState {
            buffered: Vec::new().into_iter(),
            next_cursor: Some(self.start.clone()),
            last_link: None,
            yielded: 0,
        };

        stream::try_unfold(state, move |mut state| {
            let fetcher = Arc::clone(&fetcher);
            let ct = ct.clone();
            let options = options.clone();
            async move {
                loop {
                    if options.max_items.is_some_and(|max| state.yielded >= max) {
                        return Ok(None);
                    }
                    if ct.is_cancelled() {
                        return Err(ApiError::Cancelled);
                    }
                    if let Some(item) = state.buffered.next() {
                        state.yielded += 1;
                        return Ok(Some((item, state)));
                    }

                    let Some(cursor) = state.next_cursor.take() else {
                        return Ok(None);
                    };
                    let page = fetcher.fetch_page(&cursor).await?;
                    state.buffered = page.items.into_iter();
                    state.next_cursor = advance(&mut state.last_link, page.links.next);
                }
            }
        })
    }
}

struct StreamState<T> {
    buffered: std::vec::IntoIter<T>,
    next_cursor: Option<PageCursor>,
    last_link: Option<String>,
    yielded: usize,
}

/// Turn a server-provided next link into the following cursor.
///
/// Refuses a link identical to the one just followed and treats the page as
/// terminal instead, so already-delivered items are not discarded for a
/// server bug.
fn advance(last_link: &mut Option<String>, next: Option<String>) -> Option<PageCursor> {
    let next = next?;
    if last_link.as_deref() == Some(next.as_str()) {
        warn!(link = %next, "server repeated the previous next link; stopping traversal");
        return None;
    }
    *last_link = Some(next.clone());
    Some(PageCursor::Link(next))
}
