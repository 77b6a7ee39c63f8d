//! # Shared View State
//!
//! The single shared mutable resource of each aggregator is its in-memory
//! list of enriched rows. Callers never get a mutable reference to it;
//! every mutation goes through [`ViewState::apply`] as a pure transform
//! over the previous value, so concurrent readers always observe a
//! consistent snapshot.
//!
//! Loads are raced against teardown with a generation token: a load
//! captures the generation when it starts, and its commit is dropped if
//! the state was invalidated while the fetches were in flight. A stale
//! response arriving after teardown must not overwrite the current view.

use std::sync::atomic::{AtomicU64, Ordering};

use tokio::sync::RwLock;

/// Token capturing the state generation at load start.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadToken(u64);

/// An owned, functionally-updated list of view rows.
#[derive(Debug, Default)]
pub struct ViewState<T> {
    items:      RwLock<Vec<T>>,
    generation: AtomicU64,
}

impl<T: Clone> ViewState<T> {
    /// Creates an empty view state.
    #[must_use]
    pub fn new() -> Self {
        Self {
            items:      RwLock::new(Vec::new()),
            generation: AtomicU64::new(0),
        }
    }

    /// Returns a snapshot of the current list.
    pub async fn snapshot(&self) -> Vec<T> { self.items.read().await.clone() }

    /// Number of rows currently held.
    pub async fn len(&self) -> usize { self.items.read().await.len() }

    /// Whether the list is currently empty.
    pub async fn is_empty(&self) -> bool { self.items.read().await.is_empty() }

    /// Applies a pure transform over the previous list value.
    pub async fn apply<F>(&self, transform: F)
    where
        F: FnOnce(&[T]) -> Vec<T>,
    {
        let mut guard = self.items.write().await;
        let next = transform(&guard);
        *guard = next;
    }

    /// Captures the current generation at the start of a load.
    pub fn begin_load(&self) -> LoadToken { LoadToken(self.generation.load(Ordering::Acquire)) }

    /// Invalidates in-flight loads (view teardown / reset).
    pub fn invalidate(&self) { self.generation.fetch_add(1, Ordering::AcqRel); }

    /// Commits a finished load unless the state was invalidated since the
    /// token was captured. Returns whether the commit was applied.
    pub async fn commit_if_current(&self, token: LoadToken, items: Vec<T>) -> bool {
        let mut guard = self.items.write().await;
        if self.generation.load(Ordering::Acquire) != token.0 {
            return false;
        }
        *guard = items;
        true
    }
}
