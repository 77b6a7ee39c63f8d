//! # Optimistic Delete / Undo Queue
//!
//! Each pending deletion owns an independent countdown task keyed by a
//! deletion id. The timer's identity is the id, not any caller state, so
//! unrelated churn elsewhere never restarts a countdown. Removal from the
//! entry list is the single linearization point: timeout, undo, and
//! dismiss all race to remove the entry, whoever succeeds acts, and the
//! losers become no-ops.

use std::{future::Future, sync::Arc, time::Duration};

use tokio::{sync::Mutex, task::JoinHandle, time::Instant};
use uuid::Uuid;

/// Default undo window.
pub const DEFAULT_UNDO_WINDOW: Duration = Duration::from_millis(5000);

struct PendingEntry<T> {
    id:         Uuid,
    snapshot:   T,
    index:      usize,
    started_at: Instant,
    duration:   Duration,
    timer:      Option<JoinHandle<()>>,
}

/// Advisory view of one pending deletion, for rendering toasts.
#[derive(Debug, Clone, PartialEq)]
pub struct PendingDeletion {
    /// Deletion id
    pub id:        Uuid,
    /// Fraction of the countdown remaining, in `0.0..=1.0`
    pub remaining: f64,
}

/// Queue of pending deletions with per-entry countdown timers.
pub struct UndoQueue<T> {
    entries:  Arc<Mutex<Vec<PendingEntry<T>>>>,
    duration: Duration,
}

impl<T: Send + 'static> UndoQueue<T> {
    /// Creates a queue with the default 5 second undo window.
    #[must_use]
    pub fn new() -> Self { Self::with_duration(DEFAULT_UNDO_WINDOW) }

    /// Creates a queue with a custom undo window.
    #[must_use]
    pub fn with_duration(duration: Duration) -> Self {
        Self {
            entries: Arc::new(Mutex::new(Vec::new())),
            duration,
        }
    }

    /// Registers a deletion and starts its countdown. When the countdown
    /// elapses and the entry is still pending, `commit` runs exactly once.
    ///
    /// Returns the deletion id used for [`Self::take`] and
    /// [`Self::progress`].
    pub async fn schedule<F>(&self, snapshot: T, index: usize, commit: F) -> Uuid
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let id = Uuid::new_v4();
        let duration = self.duration;

        // Hold the lock across the spawn so the timer cannot observe the
        // list before its own entry is in it.
        let mut guard = self.entries.lock().await;

        let timer = tokio::spawn({
            let entries = Arc::clone(&self.entries);
            async move {
                tokio::time::sleep(duration).await;
                // The entry may already be gone (undo or dismiss won the
                // race); in that case the timeout is a no-op.
                let fired = {
                    let mut guard = entries.lock().await;
                    let position = guard.iter().position(|e| e.id == id);
                    position.map(|p| guard.remove(p)).is_some()
                };
                if fired {
                    commit.await;
                }
            }
        });

        guard.push(PendingEntry {
            id,
            snapshot,
            index,
            started_at: Instant::now(),
            duration,
            timer: Some(timer),
        });

        id
    }

    /// Removes a pending deletion, cancelling its countdown. Returns the
    /// snapshot and original list index, or `None` when the id already
    /// reached a terminal state.
    pub async fn take(&self, id: Uuid) -> Option<(T, usize)> {
        let mut guard = self.entries.lock().await;
        let position = guard.iter().position(|e| e.id == id)?;
        let mut entry = guard.remove(position);
        if let Some(timer) = entry.timer.take() {
            timer.abort();
        }
        Some((entry.snapshot, entry.index))
    }

    /// Remaining-time fraction for a pending deletion, recomputed from
    /// elapsed time since the countdown started.
    pub async fn progress(&self, id: Uuid) -> Option<f64> {
        let guard = self.entries.lock().await;
        let entry = guard.iter().find(|e| e.id == id)?;
        let elapsed = entry.started_at.elapsed().as_secs_f64();
        let total = entry.duration.as_secs_f64();
        Some((1.0 - elapsed / total).max(0.0))
    }

    /// Pending deletions in creation order.
    pub async fn pending(&self) -> Vec<PendingDeletion> {
        let guard = self.entries.lock().await;
        guard
            .iter()
            .map(|entry| {
                let elapsed = entry.started_at.elapsed().as_secs_f64();
                let total = entry.duration.as_secs_f64();
                PendingDeletion {
                    id:        entry.id,
                    remaining: (1.0 - elapsed / total).max(0.0),
                }
            })
            .collect()
    }

    /// Number of pending deletions.
    pub async fn len(&self) -> usize { self.entries.lock().await.len() }

    /// Whether no deletions are pending.
    pub async fn is_empty(&self) -> bool { self.entries.lock().await.is_empty() }
}

impl<T: Send + 'static> Default for UndoQueue<T> {
    fn default() -> Self { Self::new() }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;

    fn counter() -> Arc<AtomicUsize> { Arc::new(AtomicUsize::new(0)) }

    #[tokio::test(start_paused = true)]
    async fn test_timeout_commits_exactly_once() {
        let queue: UndoQueue<&str> = UndoQueue::new();
        let commits = counter();
        let c = Arc::clone(&commits);

        let id = queue
            .schedule("snapshot", 0, async move {
                c.fetch_add(1, Ordering::SeqCst);
            })
            .await;

        tokio::time::sleep(Duration::from_millis(5100)).await;

        assert_eq!(commits.load(Ordering::SeqCst), 1);
        assert!(queue.take(id).await.is_none(), "entry must be gone after timeout");
        assert!(queue.is_empty().await);
    }

    #[tokio::test(start_paused = true)]
    async fn test_undo_before_timeout_suppresses_commit() {
        let queue: UndoQueue<&str> = UndoQueue::new();
        let commits = counter();
        let c = Arc::clone(&commits);

        let id = queue
            .schedule("snapshot", 3, async move {
                c.fetch_add(1, Ordering::SeqCst);
            })
            .await;

        tokio::time::sleep(Duration::from_millis(1000)).await;
        let taken = queue.take(id).await;
        assert_eq!(taken, Some(("snapshot", 3)));

        // Run well past the deadline; the aborted timer must not commit.
        tokio::time::sleep(Duration::from_millis(10_000)).await;
        assert_eq!(commits.load(Ordering::SeqCst), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_take_is_terminal() {
        let queue: UndoQueue<&str> = UndoQueue::new();
        let id = queue.schedule("snapshot", 0, async {}).await;

        assert!(queue.take(id).await.is_some());
        assert!(queue.take(id).await.is_none(), "second take must no-op");
    }

    #[tokio::test(start_paused = true)]
    async fn test_entries_are_independent() {
        let queue: UndoQueue<&str> = UndoQueue::new();
        let commits = counter();

        let c1 = Arc::clone(&commits);
        let first = queue
            .schedule("first", 0, async move {
                c1.fetch_add(1, Ordering::SeqCst);
            })
            .await;

        tokio::time::sleep(Duration::from_millis(2000)).await;

        let c2 = Arc::clone(&commits);
        let second = queue
            .schedule("second", 1, async move {
                c2.fetch_add(10, Ordering::SeqCst);
            })
            .await;

        // Undoing the first must not disturb the second's countdown.
        assert!(queue.take(first).await.is_some());
        let second_progress = queue.progress(second).await.unwrap();
        assert!(second_progress > 0.9, "fresh countdown nearly full");

        tokio::time::sleep(Duration::from_millis(5100)).await;
        assert_eq!(commits.load(Ordering::SeqCst), 10, "only the second entry committed");
    }

    #[tokio::test(start_paused = true)]
    async fn test_progress_decreases_with_elapsed_time() {
        let queue: UndoQueue<&str> = UndoQueue::new();
        let id = queue.schedule("snapshot", 0, async {}).await;

        let start = queue.progress(id).await.unwrap();
        assert!(start > 0.99);

        tokio::time::sleep(Duration::from_millis(2500)).await;
        let halfway = queue.progress(id).await.unwrap();
        assert!((0.45..=0.55).contains(&halfway), "halfway progress, got {}", halfway);
    }

    #[tokio::test(start_paused = true)]
    async fn test_pending_listed_in_creation_order() {
        let queue: UndoQueue<&str> = UndoQueue::new();
        let a = queue.schedule("a", 0, async {}).await;
        let b = queue.schedule("b", 1, async {}).await;

        let pending = queue.pending().await;
        assert_eq!(pending.len(), 2);
        assert_eq!(pending[0].id, a);
        assert_eq!(pending[1].id, b);
    }
}
