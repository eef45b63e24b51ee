//! Persistent signed URL cache
//!
//! Maps a storage key to the signed URL issued for it and the time it was issued. The whole
//! mapping is written through to the [`LocalStore`] after every mutation and loaded once when
//! the cache is constructed.

mod sweep;

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::local_store::{LocalStore, StorageError, SIGNED_URL_CACHE_NAMESPACE};

pub use sweep::ExpirationSweep;

/// How long a cached signed URL is trusted. Matches the validity requested when signing.
pub const EXPIRATION_WINDOW: Duration = Duration::from_secs(60 * 60);

#[allow(clippy::cast_possible_truncation)]
const EXPIRATION_WINDOW_MS: i64 = EXPIRATION_WINDOW.as_millis() as i64;

/// A signed URL and the time it was issued
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheEntry {
    /// The signed URL
    pub url: String,
    /// Unix epoch milliseconds at which the URL was signed
    pub timestamp: i64,
}

impl CacheEntry {
    /// Creates an entry issued at `timestamp`
    #[must_use]
    pub fn new(url: impl Into<String>, timestamp: i64) -> Self {
        Self {
            url: url.into(),
            timestamp,
        }
    }

    /// Whether the entry has outlived [`EXPIRATION_WINDOW`] at `now` (epoch ms)
    #[must_use]
    pub const fn is_expired(&self, now: i64) -> bool {
        now.saturating_sub(self.timestamp) >= EXPIRATION_WINDOW_MS
    }
}

/// Signed URL cache with write-through persistence
pub struct SignedUrlCache {
    entries: Mutex<HashMap<String, CacheEntry>>,
    store: Arc<dyn LocalStore>,
}

impl SignedUrlCache {
    /// Loads the cache from `store`
    ///
    /// An absent or unreadable record yields an empty cache; the failure is logged.
    #[must_use]
    pub fn load(store: Arc<dyn LocalStore>) -> Self {
        let entries = match store.read(SIGNED_URL_CACHE_NAMESPACE) {
            Ok(Some(raw)) => serde_json::from_str::<HashMap<String, CacheEntry>>(&raw)
                .unwrap_or_else(|e| {
                    warn!("Failed to parse persisted signed URL cache, starting empty: {e}");
                    HashMap::new()
                }),
            Ok(None) => {
                debug!("No persisted signed URL cache found, starting empty");
                HashMap::new()
            }
            Err(e) => {
                warn!("Failed to read persisted signed URL cache, starting empty: {e}");
                HashMap::new()
            }
        };

        debug!("Loaded {} signed URL cache entries", entries.len());

        Self {
            entries: Mutex::new(entries),
            store,
        }
    }

    /// Returns the entry for `key`, fresh or not
    #[must_use]
    pub fn get(&self, key: &str) -> Option<CacheEntry> {
        self.lock().get(key).cloned()
    }

    /// Returns the entry for `key` only while it is still within [`EXPIRATION_WINDOW`]
    #[must_use]
    pub fn get_valid(&self, key: &str, now: i64) -> Option<CacheEntry> {
        self.lock()
            .get(key)
            .filter(|entry| !entry.is_expired(now))
            .cloned()
    }

    /// Whether an entry exists for `key`
    #[must_use]
    pub fn has(&self, key: &str) -> bool {
        self.lock().contains_key(key)
    }

    /// Stores `entry` for `key`, replacing any previous one, and persists the mapping
    ///
    /// The write is synchronous and rewrites the whole mapping while the lock is held, so a load
    /// of `n` uncached images costs `n` full rewrites. Fine for personal galleries; large buckets
    /// would want batched persistence off the async workers.
    pub fn set(&self, key: impl Into<String>, entry: CacheEntry) {
        let mut entries = self.lock();
        entries.insert(key.into(), entry);
        self.persist(&entries);
    }

    /// Removes every entry and the persisted record
    pub fn clear(&self) {
        let mut entries = self.lock();
        entries.clear();
        if let Err(e) = self.store.remove(SIGNED_URL_CACHE_NAMESPACE) {
            warn!("Failed to remove persisted signed URL cache: {e}");
        }
    }

    /// Removes every entry that has expired at `now` and returns how many were removed
    pub fn remove_expired(&self, now: i64) -> usize {
        let mut entries = self.lock();
        let before = entries.len();
        entries.retain(|_, entry| !entry.is_expired(now));
        let removed = before - entries.len();

        if removed > 0 {
            self.persist(&entries);
        }

        removed
    }

    /// Number of cached entries
    #[must_use]
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// Whether the cache holds no entries
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, CacheEntry>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }

    // Persistence failures leave the in-memory state authoritative
    fn persist(&self, entries: &HashMap<String, CacheEntry>) {
        let result = serde_json::to_string(entries)
            .map_err(StorageError::from)
            .and_then(|raw| self.store.write(SIGNED_URL_CACHE_NAMESPACE, &raw));

        if let Err(e) = result {
            warn!("Failed to persist signed URL cache: {e}");
        }
    }
}
