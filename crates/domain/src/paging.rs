//! Paged-response value types
//!
//! One server page is described by its item payloads, counting metadata and
//! navigation links. The cursor type captures how the next fetch is
//! addressed: a seeded first request, or a server-provided next link
//! followed verbatim.

use serde::{Deserialize, Serialize};

/// Default number of items requested per page when the caller does not say
pub const DEFAULT_PAGE_SIZE: usize = 25;

/// Counting metadata for one page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageMeta {
    /// Total number of items the server reports for the whole collection
    pub total_count: usize,
    /// Number of items requested per page
    pub per_page: usize,
    /// 1-based position of this page in the collection
    pub current_page: usize,
}

impl PageMeta {
    /// Create page metadata, clamping `per_page` and `current_page` to their
    /// minimum legal values.
    pub fn new(total_count: usize, per_page: usize, current_page: usize) -> Self {
        Self { total_count, per_page: per_page.max(1), current_page: current_page.max(1) }
    }
}

/// Navigation links for one page
///
/// `next` is present iff the server indicates more data exists beyond this
/// page; a page without `next` is terminal.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageLinks {
    pub next: Option<String>,
    #[serde(alias = "previous")]
    pub prev: Option<String>,
    pub first: Option<String>,
    pub last: Option<String>,
}

impl PageLinks {
    /// True when the server indicates no further pages
    pub fn is_terminal(&self) -> bool {
        self.next.is_none()
    }
}

/// Addressing for a single page fetch
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageCursor {
    /// Seed request for the first page of a collection
    Start {
        /// Resource path relative to the API base URL (e.g. "/people")
        path: String,
        /// Extra query parameters forwarded untouched
        query: Vec<(String, String)>,
        /// Requested page size
        per_page: usize,
    },
    /// Server-provided next link, followed verbatim
    Link(String),
}

impl PageCursor {
    /// Seed cursor for the first page of `path` with default sizing
    pub fn start(path: impl Into<String>) -> Self {
        Self::Start { path: path.into(), query: Vec::new(), per_page: DEFAULT_PAGE_SIZE }
    }

    /// Add a query parameter to a seed cursor; no-op on link cursors
    pub fn with_query(self, key: impl Into<String>, value: impl Into<String>) -> Self {
        match self {
            Self::Start { path, mut query, per_page } => {
                query.push((key.into(), value.into()));
                Self::Start { path, query, per_page }
            }
            link @ Self::Link(_) => link,
        }
    }

    /// Override the requested page size on a seed cursor; no-op on links
    pub fn with_per_page(self, per_page: usize) -> Self {
        match self {
            Self::Start { path, query, .. } => {
                Self::Start { path, query, per_page: per_page.max(1) }
            }
            link @ Self::Link(_) => link,
        }
    }
}

/// A page as delivered by the transport, before typed mapping
#[derive(Debug, Clone)]
pub struct RawPage {
    /// Resource payloads in server order
    pub items: Vec<serde_json::Value>,
    pub meta: PageMeta,
    pub links: PageLinks,
}

/// Immutable per-invocation settings for a pagination traversal
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TraversalOptions {
    /// Page size requested from the server
    pub page_size: usize,
    /// Upper bound on items delivered; unbounded when `None`
    pub max_items: Option<usize>,
    /// When set, a cancelled eager traversal returns the gathered prefix
    /// instead of a cancellation failure
    pub partial_on_cancel: bool,
}

impl Default for TraversalOptions {
    fn default() -> Self {
        Self { page_size: DEFAULT_PAGE_SIZE, max_items: None, partial_on_cancel: false }
    }
}

impl TraversalOptions {
    /// Create options with default sizing
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the per-page size (clamped to at least 1)
    pub fn page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    /// Bound the number of items delivered (clamped to at least 1)
    pub fn max_items(mut self, max_items: usize) -> Self {
        self.max_items = Some(max_items.max(1));
        self
    }

    /// Return gathered items instead of failing when cancelled mid-collect
    pub fn partial_on_cancel(mut self, partial: bool) -> Self {
        self.partial_on_cancel = partial;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_meta_clamps_minimums() {
        let meta = PageMeta::new(10, 0, 0);
        assert_eq!(meta.per_page, 1);
        assert_eq!(meta.current_page, 1);
    }

    #[test]
    fn test_links_terminal() {
        assert!(PageLinks::default().is_terminal());

        let links = PageLinks { next: Some("/people?offset=25".into()), ..Default::default() };
        assert!(!links.is_terminal());
    }

    #[test]
    fn test_links_accept_previous_alias() {
        let links: PageLinks =
            serde_json::from_str(r#"{"previous": "/people?offset=0"}"#).expect("links");
        assert_eq!(links.prev.as_deref(), Some("/people?offset=0"));
    }

    #[test]
    fn test_cursor_builders() {
        let cursor = PageCursor::start("/people")
            .with_query("where[status]", "active")
            .with_per_page(50);

        match cursor {
            PageCursor::Start { path, query, per_page } => {
                assert_eq!(path, "/people");
                assert_eq!(query, vec![("where[status]".to_string(), "active".to_string())]);
                assert_eq!(per_page, 50);
            }
            PageCursor::Link(_) => panic!("expected a seed cursor"),
        }
    }

    #[test]
    fn test_cursor_builders_ignore_links() {
        let cursor = PageCursor::Link("https://api.example.com/people?offset=25".into())
            .with_query("a", "b")
            .with_per_page(10);
        assert!(matches!(cursor, PageCursor::Link(_)));
    }

    #[test]
    fn test_traversal_options_defaults() {
        let options = TraversalOptions::default();
        assert_eq!(options.page_size, DEFAULT_PAGE_SIZE);
        assert_eq!(options.max_items, None);
        assert!(!options.partial_on_cancel);
    }

    #[test]
    fn test_traversal_options_clamp() {
        let options = TraversalOptions::new().page_size(0).max_items(0);
        assert_eq!(options.page_size, 1);
        assert_eq!(options.max_items, Some(1));
    }
}
