//! Ambient correlation-id context
//!
//! Every logical call chain carries one opaque identifier so log lines from
//! arbitrarily deep nesting can be joined back together. The id lives in
//! task-local storage scoped to the chain: it flows through every `await`
//! within the chain, and two concurrent chains never observe each other's
//! value. A plain process global would leak ids across concurrent requests,
//! which is why none is used here.

use std::cell::RefCell;
use std::fmt;
use std::future::Future;

use uuid::Uuid;

tokio::task_local! {
    static CURRENT_CHAIN: RefCell<Option<CorrelationId>>;
}

/// Opaque identifier tagging all log lines of one logical call chain
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CorrelationId(String);

impl CorrelationId {
    /// Synthesize a new globally-unique identifier
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// Wrap an identifier supplied by the caller
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// View the identifier as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CorrelationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Expose the chain's id without generating one.
///
/// Returns `None` when no id has been established yet, or when the caller
/// is running outside any correlation scope.
pub fn current() -> Option<CorrelationId> {
    CURRENT_CHAIN.try_with(|slot| slot.borrow().clone()).ok().flatten()
}

/// Get the chain's id, lazily generating and storing it on first access.
///
/// Inside a scope the first call synthesizes the id and every later call at
/// any depth returns the identical value. Outside any scope there is no
/// ambient slot to pin the id to, so each call returns a fresh one.
pub fn get_or_generate() -> CorrelationId {
    CURRENT_CHAIN
        .try_with(|slot| {
            let mut slot = slot.borrow_mut();
            match slot.as_ref() {
                Some(id) => id.clone(),
                None => {
                    let id = CorrelationId::generate();
                    *slot = Some(id.clone());
                    id
                }
            }
        })
        .unwrap_or_else(|_| CorrelationId::generate())
}

/// True when the caller is running inside a correlation scope
pub fn in_scope() -> bool {
    CURRENT_CHAIN.try_with(|_| ()).is_ok()
}

/// Run `future` inside a fresh, empty correlation scope.
///
/// The id is generated lazily by the first [`get_or_generate`] within the
/// scope and is dropped when the future completes.
pub async fn scope<F>(future: F) -> F::Output
where
    F: Future,
{
    CURRENT_CHAIN.scope(RefCell::new(None), future).await
}

/// Run `future` inside a correlation scope seeded with `id`
pub async fn scope_with<F>(id: CorrelationId, future: F) -> F::Output
where
    F: Future,
{
    CURRENT_CHAIN.scope(RefCell::new(Some(id)), future).await
}
