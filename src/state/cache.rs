use log::debug;
use std::collections::HashMap;
use std::fmt::Debug;
use std::future::Future;
use std::hash::Hash;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::sync::Mutex;

/// Read-through cache keyed by external ids. Only successful loads are
/// stored; entries live until invalidated.
#[derive(Debug)]
pub struct LookupCache<K, V> {
    entries: Mutex<HashMap<K, V>>,
    hits: AtomicUsize,
    misses: AtomicUsize,
}

impl<K, V> Default for LookupCache<K, V>
where
    K: Eq + Hash + Clone + Debug,
    V: Clone,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V> LookupCache<K, V>
where
    K: Eq + Hash + Clone + Debug,
    V: Clone,
{
    pub fn new() -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            hits: AtomicUsize::new(0),
            misses: AtomicUsize::new(0),
        }
    }

    /// Cached value for `key`, or the result of `load` (stored on success).
    /// The lock is not held while loading, so two concurrent misses on the
    /// same key may both load; the last one wins.
    pub async fn get_or_load<F, Fut, E>(&self, key: K, load: F) -> Result<V, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<V, E>>,
    {
        if let Some(value) = self.entries.lock().await.get(&key).cloned() {
            self.hits.fetch_add(1, Ordering::Relaxed);
            debug!("cache hit for {key:?}");
            return Ok(value);
        }

        self.misses.fetch_add(1, Ordering::Relaxed);
        let value = load().await?;
        self.entries.lock().await.insert(key, value.clone());
        Ok(value)
    }

    pub async fn invalidate(&self, key: &K) -> Option<V> {
        self.entries.lock().await.remove(key)
    }

    /// (hits, misses)
    pub fn stats(&self) -> (usize, usize) {
        (self.hits.load(Ordering::Relaxed), self.misses.load(Ordering::Relaxed))
    }
}
