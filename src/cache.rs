//! Keyed async memoization with TTL and single-flight computation.
//!
//! [`Cache::wrap`] memoizes the result of an async computation per key. While
//! a computation for a key is in flight, concurrent callers for the same key
//! await the shared result instead of starting their own, so at most one
//! computation per key runs at a time. Expiry is lazy: an expired entry is
//! replaced the next time its key is requested.

use std::future::Future;
use std::sync::Arc;
use std::time::{Duration, Instant};

use dashmap::DashMap;
use tokio::sync::OnceCell;

struct Slot<V> {
    cell: OnceCell<V>,
    created: Instant,
}

impl<V> Slot<V> {
    fn new() -> Self {
        Self {
            cell: OnceCell::new(),
            created: Instant::now(),
        }
    }
}

/// String-keyed memoization cache for values of type `V`.
pub struct Cache<V> {
    ttl: Duration,
    slots: DashMap<String, Arc<Slot<V>>>,
}

impl<V: Clone + Send + Sync + 'static> Cache<V> {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            slots: DashMap::new(),
        }
    }

    /// Return the cached value for `key`, computing (and storing) it with
    /// `compute` if absent or expired.
    pub async fn wrap<F, Fut>(&self, key: &str, compute: F) -> V
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = V>,
    {
        let slot = {
            let mut entry = self
                .slots
                .entry(key.to_string())
                .or_insert_with(|| Arc::new(Slot::new()));
            // Only completed entries expire; an in-flight computation is
            // never abandoned.
            if entry.cell.initialized() && entry.created.elapsed() >= self.ttl {
                *entry.value_mut() = Arc::new(Slot::new());
            }
            entry.value().clone()
        };

        slot.cell.get_or_init(compute).await.clone()
    }

    /// Number of keys currently held (including expired, not-yet-evicted ones).
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[tokio::test]
    async fn caches_computed_value() {
        let cache: Cache<u32> = Cache::new(Duration::from_secs(60));
        let calls = AtomicUsize::new(0);

        let first = cache
            .wrap("k", || async {
                calls.fetch_add(1, Ordering::SeqCst);
                42
            })
            .await;
        let second = cache
            .wrap("k", || async {
                calls.fetch_add(1, Ordering::SeqCst);
                99
            })
            .await;

        assert_eq!(first, 42);
        assert_eq!(second, 42);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn distinct_keys_compute_independently() {
        let cache: Cache<u32> = Cache::new(Duration::from_secs(60));

        let a = cache.wrap("a", || async { 1 }).await;
        let b = cache.wrap("b", || async { 2 }).await;

        assert_eq!((a, b), (1, 2));
        assert_eq!(cache.len(), 2);
    }

    #[tokio::test]
    async fn concurrent_callers_share_one_computation() {
        let cache = Arc::new(Cache::<u32>::new(Duration::from_secs(60)));
        let calls = Arc::new(AtomicUsize::new(0));

        let mut handles = Vec::new();
        for _ in 0..8 {
            let cache = cache.clone();
            let calls = calls.clone();
            handles.push(tokio::spawn(async move {
                cache
                    .wrap("shared", move || async move {
                        calls.fetch_add(1, Ordering::SeqCst);
                        // Hold the computation open long enough for the other
                        // callers to pile up behind it.
                        tokio::time::sleep(Duration::from_millis(50)).await;
                        7
                    })
                    .await
            }));
        }

        for handle in handles {
            assert_eq!(handle.await.unwrap(), 7);
        }
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn expired_entries_are_recomputed() {
        let cache: Cache<u32> = Cache::new(Duration::from_millis(20));

        let first = cache.wrap("k", || async { 1 }).await;
        tokio::time::sleep(Duration::from_millis(40)).await;
        let second = cache.wrap("k", || async { 2 }).await;

        assert_eq!(first, 1);
        assert_eq!(second, 2);
    }
}
