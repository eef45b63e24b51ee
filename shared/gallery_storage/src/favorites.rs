//! Persisted set of favorite storage keys
//!
//! Stored as a JSON array in insertion order. Membership is all that matters to callers, the order
//! is only kept so the persisted record stays stable between writes.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tracing::{debug, warn};

use crate::local_store::{LocalStore, StorageError, FAVORITES_NAMESPACE};

/// Favorites set with write-through persistence
pub struct Favorites {
    keys: Mutex<Vec<String>>,
    store: Arc<dyn LocalStore>,
}

impl Favorites {
    /// Loads the favorites from `store`
    ///
    /// Absent or malformed data yields an empty set; duplicate keys are collapsed.
    #[must_use]
    pub fn load(store: Arc<dyn LocalStore>) -> Self {
        let persisted = match store.read(FAVORITES_NAMESPACE) {
            Ok(Some(raw)) => serde_json::from_str::<Vec<String>>(&raw).unwrap_or_else(|e| {
                warn!("Failed to parse persisted favorites, starting empty: {e}");
                Vec::new()
            }),
            Ok(None) => Vec::new(),
            Err(e) => {
                warn!("Failed to read persisted favorites, starting empty: {e}");
                Vec::new()
            }
        };

        let mut keys: Vec<String> = Vec::with_capacity(persisted.len());
        for key in persisted {
            if !keys.contains(&key) {
                keys.push(key);
            }
        }

        debug!("Loaded {} favorites", keys.len());

        Self {
            keys: Mutex::new(keys),
            store,
        }
    }

    /// Whether `key` is a favorite
    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.lock().iter().any(|k| k == key)
    }

    /// Adds `key` if absent
    pub fn add(&self, key: &str) {
        let mut keys = self.lock();
        if !keys.iter().any(|k| k == key) {
            keys.push(key.to_string());
            self.persist(&keys);
        }
    }

    /// Removes `key` if present
    pub fn remove(&self, key: &str) {
        let mut keys = self.lock();
        if let Some(pos) = keys.iter().position(|k| k == key) {
            keys.remove(pos);
            self.persist(&keys);
        }
    }

    /// Flips membership of `key` and returns whether it is now a favorite
    pub fn toggle(&self, key: &str) -> bool {
        let mut keys = self.lock();
        let now_favorite = if let Some(pos) = keys.iter().position(|k| k == key) {
            keys.remove(pos);
            false
        } else {
            keys.push(key.to_string());
            true
        };
        self.persist(&keys);
        now_favorite
    }

    /// Favorite keys in insertion order
    #[must_use]
    pub fn keys(&self) -> Vec<String> {
        self.lock().clone()
    }

    /// Number of favorites
    #[must_use]
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// Whether there are no favorites
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn lock(&self) -> MutexGuard<'_, Vec<String>> {
        self.keys.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn persist(&self, keys: &[String]) {
        let result = serde_json::to_string(keys)
            .map_err(StorageError::from)
            .and_then(|raw| self.store.write(FAVORITES_NAMESPACE, &raw));

        if let Err(e) = result {
            warn!("Failed to persist favorites: {e}");
        }
    }
}
