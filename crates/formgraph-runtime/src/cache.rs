#![forbid(unsafe_code)]

//! LRU memoization for expensive handlers.
//!
//! Handlers are shared by every pass and may run on several threads, so the
//! cache sits behind a mutex. The lock is never held while a value is
//! computed.
//!
//! # Example
//! ```
//! use formgraph_runtime::cache::{HandlerCache, parents_key};
//! use formgraph_controls::Control;
//!
//! let cache: HandlerCache<u64, String> = HandlerCache::new(16);
//! let a = Control::input("3");
//! let key = parents_key(&[&a]);
//!
//! let first = cache.get_or_insert_with(key, || "computed".to_string());
//! let second = cache.get_or_insert_with(key, || unreachable!());
//! assert_eq!(first, second);
//! assert_eq!(cache.stats().hits, 1);
//! ```

use std::hash::{Hash, Hasher};
use std::num::NonZeroUsize;
use std::sync::{Mutex, MutexGuard};

use formgraph_controls::Control;
use lru::LruCache;
use rustc_hash::FxHasher;

/// Default cache capacity.
pub const DEFAULT_CACHE_CAPACITY: usize = 256;

/// Hit/miss counters of a [`HandlerCache`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    /// Current number of entries.
    pub size: usize,
    pub capacity: usize,
}

impl CacheStats {
    /// Hit rate in `0.0..=1.0`.
    #[must_use]
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}

#[derive(Debug)]
struct Inner<K: Hash + Eq, V> {
    entries: LruCache<K, V>,
    hits: u64,
    misses: u64,
}

/// A thread-safe LRU keyed by a summary of a handler's inputs.
#[derive(Debug)]
pub struct HandlerCache<K: Hash + Eq, V> {
    inner: Mutex<Inner<K, V>>,
}

impl<K: Hash + Eq, V: Clone> HandlerCache<K, V> {
    /// Cache holding up to `capacity` entries (at least one).
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity.max(1)).unwrap_or(NonZeroUsize::MIN);
        Self {
            inner: Mutex::new(Inner {
                entries: LruCache::new(capacity),
                hits: 0,
                misses: 0,
            }),
        }
    }

    #[must_use]
    pub fn with_default_capacity() -> Self {
        Self::new(DEFAULT_CACHE_CAPACITY)
    }

    fn lock(&self) -> MutexGuard<'_, Inner<K, V>> {
        // A panicking handler cannot leave the entries half-written.
        self.inner
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }

    /// Cached value for `key`, computing and storing it on a miss.
    pub fn get_or_insert_with(&self, key: K, compute: impl FnOnce() -> V) -> V {
        match self.try_get_or_insert_with(key, || Ok::<_, std::convert::Infallible>(compute())) {
            Ok(value) => value,
            Err(never) => match never {},
        }
    }

    /// Like [`get_or_insert_with`](Self::get_or_insert_with), but failed
    /// computations are returned and not cached.
    pub fn try_get_or_insert_with<E>(
        &self,
        key: K,
        compute: impl FnOnce() -> Result<V, E>,
    ) -> Result<V, E> {
        {
            let mut inner = self.lock();
            if let Some(value) = inner.entries.get(&key).cloned() {
                inner.hits += 1;
                return Ok(value);
            }
            inner.misses += 1;
        }
        let value = compute()?;
        self.lock().entries.put(key, value.clone());
        Ok(value)
    }

    #[must_use]
    pub fn contains(&self, key: &K) -> bool {
        self.lock().entries.contains(key)
    }

    #[must_use]
    pub fn stats(&self) -> CacheStats {
        let inner = self.lock();
        CacheStats {
            hits: inner.hits,
            misses: inner.misses,
            size: inner.entries.len(),
            capacity: inner.entries.cap().get(),
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.lock().entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drop all entries and reset the counters.
    pub fn clear(&self) {
        let mut inner = self.lock();
        inner.entries.clear();
        inner.hits = 0;
        inner.misses = 0;
    }
}

impl<K: Hash + Eq, V: Clone> Default for HandlerCache<K, V> {
    fn default() -> Self {
        Self::with_default_capacity()
    }
}

/// Order-sensitive key over the current values of `parents`.
#[must_use]
pub fn parents_key(parents: &[&Control]) -> u64 {
    let mut hasher = FxHasher::default();
    parents.len().hash(&mut hasher);
    for parent in parents {
        parent.value().fingerprint().hash(&mut hasher);
    }
    hasher.finish()
}
