//! Paged-response model
//!
//! A [`Page`] is one server-delivered batch of a larger result set, bound to
//! the fetch capability that produced it so traversal can continue without
//! external state. The [`PageFetcher`] port is implemented by the transport
//! layer; the traversal algorithms live in [`traversal`].

mod traversal;

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use flock_domain::{PageCursor, PageLinks, PageMeta, Result};

pub use traversal::Paginator;

/// Capability to fetch one page of a collection
#[async_trait]
pub trait PageFetcher<T>: Send + Sync {
    /// Fetch the page addressed by `cursor`
    async fn fetch_page(&self, cursor: &PageCursor) -> Result<FetchedPage<T>>;
}

/// One fetched page before it is bound to its fetcher
#[derive(Debug)]
pub struct FetchedPage<T> {
    /// Items in server-provided order
    pub items: Vec<T>,
    pub meta: PageMeta,
    pub links: PageLinks,
}

/// One page of a collection, bound to the mechanism that fetched it
pub struct Page<T> {
    items: Vec<T>,
    meta: PageMeta,
    links: PageLinks,
    fetcher: Arc<dyn PageFetcher<T>>,
}

impl<T> Page<T> {
    /// Bind a fetched page to the fetcher that produced it
    pub fn bind(fetched: FetchedPage<T>, fetcher: Arc<dyn PageFetcher<T>>) -> Self {
        Self { items: fetched.items, meta: fetched.meta, links: fetched.links, fetcher }
    }

    /// Items in server-provided order
    pub fn items(&self) -> &[T] {
        &self.items
    }

    /// Consume the page, keeping only its items
    pub fn into_items(self) -> Vec<T> {
        self.items
    }

    /// Counting metadata for this page
    pub fn meta(&self) -> &PageMeta {
        &self.meta
    }

    /// Navigation links for this page
    pub fn links(&self) -> &PageLinks {
        &self.links
    }

    /// True when the server indicates no further pages
    pub fn is_terminal(&self) -> bool {
        self.links.is_terminal()
    }

    /// Fetch the page after this one by following the server's next link.
    ///
    /// Returns `Ok(None)` on a terminal page.
    pub async fn fetch_next(&self) -> Result<Option<Self>> {
        let Some(next) = self.links.next.clone() else {
            return Ok(None);
        };
        let fetched = self.fetcher.fetch_page(&PageCursor::Link(next)).await?;
        Ok(Some(Self::bind(fetched, Arc::clone(&self.fetcher))))
    }
}

impl<T: fmt::Debug> fmt::Debug for Page<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Page")
            .field("items", &self.items)
            .field("meta", &self.meta)
            .field("links", &self.links)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    //! Scripted in-memory fetcher used by the traversal tests

    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    use flock_domain::{ApiError, PageCursor, PageLinks, PageMeta};

    use super::*;

    /// Description of one scripted page: items plus the next link to expose
    pub struct ScriptedPage {
        pub items: Vec<u32>,
        pub next: Option<String>,
    }

    /// Fetcher that serves a fixed page sequence and counts fetch calls.
    ///
    /// The seed cursor serves page 0; a link cursor "page-N" serves page N.
    pub struct ScriptedFetcher {
        pages: Vec<ScriptedPage>,
        pub calls: AtomicUsize,
    }

    impl ScriptedFetcher {
        pub fn new(pages: Vec<ScriptedPage>) -> Arc<Self> {
            Arc::new(Self { pages, calls: AtomicUsize::new(0) })
        }

        /// Conventional link naming for scripted sequences
        pub fn link(index: usize) -> String {
            format!("page-{}", index)
        }

        pub fn call_count(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }

        fn page_index(cursor: &PageCursor) -> Result<usize> {
            match cursor {
                PageCursor::Start { .. } => Ok(0),
                PageCursor::Link(link) => link
                    .strip_prefix("page-")
                    .and_then(|n| n.parse().ok())
                    .ok_or_else(|| ApiError::Client(format!("unknown link: {}", link))),
            }
        }
    }

    #[async_trait]
    impl PageFetcher<u32> for ScriptedFetcher {
        async fn fetch_page(&self, cursor: &PageCursor) -> Result<FetchedPage<u32>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let index = Self::page_index(cursor)?;
            let page = self
                .pages
                .get(index)
                .ok_or_else(|| ApiError::Client(format!("no page at index {}", index)))?;

            Ok(FetchedPage {
                items: page.items.clone(),
                meta: PageMeta::new(
                    self.pages.iter().map(|p| p.items.len()).sum(),
                    page.items.len().max(1),
                    index + 1,
                ),
                links: PageLinks { next: page.next.clone(), ..Default::default() },
            })
        }
    }

    /// The canonical 3-page sequence (sizes 2, 2, 1; five items total)
    pub fn three_pages() -> Arc<ScriptedFetcher> {
        ScriptedFetcher::new(vec![
            ScriptedPage { items: vec![1, 2], next: Some(ScriptedFetcher::link(1)) },
            ScriptedPage { items: vec![3, 4], next: Some(ScriptedFetcher::link(2)) },
            ScriptedPage { items: vec![5], next: None },
        ])
    }
}
