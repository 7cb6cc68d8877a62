//! Single-flight keyed cache
//!
//! Values are computed at most once per key. The first caller for a key runs
//! the populate future; callers arriving while it is in flight wait for that
//! same result instead of starting their own.

use std::collections::HashMap;
use std::future::Future;
use std::hash::Hash;
use std::sync::{Arc, Mutex, PoisonError};
use tokio::sync::OnceCell;

/// Keyed lookup-or-populate cache with single-flight semantics
///
/// Entries are never evicted; the cache lives as long as its owner.
#[derive(Debug)]
pub struct SingleFlightCache<K, V> {
    entries: Mutex<HashMap<K, Arc<OnceCell<V>>>>,
}

impl<K, V> SingleFlightCache<K, V>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    pub fn new() -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// Returns the cached value for `key`, populating it on first use
    ///
    /// `populate` is only invoked if no value exists and no other caller is
    /// currently populating the key. If the populating caller is dropped before
    /// finishing, the next waiter takes over the population.
    pub async fn lookup_or_populate<F, Fut>(&self, key: &K, populate: F) -> V
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = V>,
    {
        let cell = {
            let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
            Arc::clone(entries.entry(key.clone()).or_default())
        };

        cell.get_or_init(populate).await.clone()
    }

    /// Returns the value for `key` if it has already been populated
    pub fn get(&self, key: &K) -> Option<V> {
        let entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        entries.get(key).and_then(|cell| cell.get().cloned())
    }

    /// Number of keys with a populated value
    pub fn len(&self) -> usize {
        let entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        entries.values().filter(|cell| cell.initialized()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<K, V> Default for SingleFlightCache<K, V>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    fn default() -> Self {
        Self::new()
    }
}
