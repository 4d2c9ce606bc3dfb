//! Session-lived result cache with read-time TTL expiry
//!
//! Memoizes fetched payloads by quantized coordinate key so repeated or
//! rapid refreshes (resize-triggered re-renders, double submits) avoid
//! redundant upstream calls. Entries live in memory for the session;
//! expiry is evaluated on read, there is no sweeper and no size bound —
//! entries are few and short-lived.

use crate::models::CacheKey;
use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};

struct StoredEntry<V> {
    value: V,
    fetched_at: Instant,
}

/// In-memory TTL cache keyed by quantized coordinates
pub struct ResultCache<V> {
    entries: Mutex<HashMap<CacheKey, StoredEntry<V>>>,
}

impl<V: Clone> Default for ResultCache<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V: Clone> ResultCache<V> {
    /// Create an empty cache
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// Store a value, unconditionally overwriting any entry for the key
    pub fn put(&self, key: CacheKey, value: V) {
        self.put_at(key, value, Instant::now());
    }

    /// Retrieve a value if present and younger than `ttl`
    ///
    /// An entry older than `ttl` is logically absent even while still
    /// resident; the read that observes it removes it.
    pub fn get(&self, key: &CacheKey, ttl: Duration) -> Option<V> {
        self.get_at(key, ttl, Instant::now())
    }

    /// Drop all entries
    pub fn clear(&self) {
        self.entries.lock().unwrap_or_else(|e| e.into_inner()).clear();
    }

    fn put_at(&self, key: CacheKey, value: V, now: Instant) {
        let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        entries.insert(
            key,
            StoredEntry {
                value,
                fetched_at: now,
            },
        );
    }

    fn get_at(&self, key: &CacheKey, ttl: Duration, now: Instant) -> Option<V> {
        let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());

        let fresh = match entries.get(key) {
            Some(entry) if now.duration_since(entry.fetched_at) < ttl => {
                Some(entry.value.clone())
            }
            Some(_) => None,
            None => {
                tracing::debug!(?key, "cache miss");
                return None;
            }
        };

        match fresh {
            Some(value) => {
                tracing::debug!(?key, "cache hit");
                Some(value)
            }
            None => {
                tracing::debug!(?key, "cache entry expired");
                entries.remove(key);
                None
            }
        }
    }
}
