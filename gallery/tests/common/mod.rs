#![allow(dead_code)]

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use gallery::object_store::{ObjectStore, ObjectStoreError, ObjectStoreResult, ObjectSummary};
use gallery::GalleryLoader;
use gallery_storage::{MemoryStore, SignedUrlCache};

/// In-memory object store that records signing calls
#[derive(Default)]
pub struct FakeObjectStore {
    objects: Mutex<Vec<ObjectSummary>>,
    failing_keys: Mutex<HashSet<String>>,
    fail_listing: Mutex<bool>,
    sign_calls: Mutex<HashMap<String, usize>>,
    list_calls: AtomicUsize,
    requested_expiry: Mutex<Option<Duration>>,
}

impl FakeObjectStore {
    /// Store holding `(key, last_modified_secs)` objects in listing order
    pub fn with_objects(objects: &[(&str, i64)]) -> Self {
        let store = Self::default();
        store.set_objects(objects);
        store
    }

    pub fn set_objects(&self, objects: &[(&str, i64)]) {
        *self.objects.lock().unwrap() = objects
            .iter()
            .map(|(key, secs)| ObjectSummary::new(*key, timestamp(*secs)))
            .collect();
    }

    pub fn fail_signing(&self, key: &str) {
        self.failing_keys.lock().unwrap().insert(key.to_string());
    }

    pub fn fail_listing(&self) {
        *self.fail_listing.lock().unwrap() = true;
    }

    pub fn sign_calls(&self, key: &str) -> usize {
        self.sign_calls
            .lock()
            .unwrap()
            .get(key)
            .copied()
            .unwrap_or(0)
    }

    pub fn total_sign_calls(&self) -> usize {
        self.sign_calls.lock().unwrap().values().sum()
    }

    pub fn list_calls(&self) -> usize {
        self.list_calls.load(Ordering::SeqCst)
    }

    pub fn requested_expiry(&self) -> Option<Duration> {
        *self.requested_expiry.lock().unwrap()
    }
}

#[async_trait]
impl ObjectStore for FakeObjectStore {
    async fn list_objects(&self) -> ObjectStoreResult<Vec<ObjectSummary>> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        if *self.fail_listing.lock().unwrap() {
            return Err(ObjectStoreError::ListError("access denied".to_string()));
        }
        Ok(self.objects.lock().unwrap().clone())
    }

    async fn presign_get(&self, key: &str, expires_in: Duration) -> ObjectStoreResult<String> {
        *self.sign_calls.lock().unwrap().entry(key.to_string()).or_default() += 1;
        *self.requested_expiry.lock().unwrap() = Some(expires_in);

        // Yield so concurrent resolutions interleave
        tokio::task::yield_now().await;

        if self.failing_keys.lock().unwrap().contains(key) {
            return Err(ObjectStoreError::PresignError(format!("{key}: signature failure")));
        }

        let calls = self.sign_calls(key);
        Ok(format!("https://signed.example/{key}?sig={calls}"))
    }
}

pub fn timestamp(secs: i64) -> DateTime<Utc> {
    DateTime::from_timestamp(secs, 0).unwrap()
}

pub struct TestContext {
    pub object_store: Arc<FakeObjectStore>,
    pub cache: Arc<SignedUrlCache>,
    pub loader: GalleryLoader,
}

impl TestContext {
    pub fn new(objects: &[(&str, i64)]) -> Self {
        let object_store = Arc::new(FakeObjectStore::with_objects(objects));
        let cache = Arc::new(SignedUrlCache::load(Arc::new(MemoryStore::new())));
        let loader = GalleryLoader::new(object_store.clone(), cache.clone());

        Self {
            object_store,
            cache,
            loader,
        }
    }

    pub fn ids(records: &[gallery::ImageRecord]) -> Vec<&str> {
        records.iter().map(|r| r.id.as_str()).collect()
    }
}
