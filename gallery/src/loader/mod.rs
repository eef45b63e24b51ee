//! Gallery loading pipeline
//!
//! One load lists the bucket, resolves every key concurrently and sorts the survivors newest
//! first. Nothing here retries and nothing escapes as an error: a failed signing drops that
//! image from this load, a failed listing yields an empty gallery.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use futures::future::join_all;
use gallery_storage::{now_millis, CacheEntry, SignedUrlCache};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info};

use crate::object_store::ObjectStore;

/// Validity requested for every signed URL; equal to the cache's expiration window
pub const SIGNED_URL_EXPIRY: Duration = Duration::from_secs(3600);

/// A displayable image
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageRecord {
    /// Storage key
    pub id: String,
    /// Signed URL
    pub url: String,
    /// Last modification time of the object
    pub last_modified: DateTime<Utc>,
}

/// Resolves bucket contents into [`ImageRecord`]s
pub struct GalleryLoader {
    object_store: Arc<dyn ObjectStore>,
    cache: Arc<SignedUrlCache>,
}

impl GalleryLoader {
    /// Creates a loader
    ///
    /// # Arguments
    ///
    /// * `object_store` - Store to list and sign against
    /// * `cache` - Shared signed URL cache
    #[must_use]
    pub const fn new(object_store: Arc<dyn ObjectStore>, cache: Arc<SignedUrlCache>) -> Self {
        Self {
            object_store,
            cache,
        }
    }

    /// Returns a displayable URL for `key`
    ///
    /// A cached URL younger than the expiration window is returned without contacting the store.
    /// Otherwise a new URL is signed and cached. Returns `None` when signing fails.
    pub async fn resolve_url(&self, key: &str) -> Option<String> {
        let now = now_millis();
        if let Some(entry) = self.cache.get_valid(key, now) {
            debug!("Signed URL cache hit for {key}");
            return Some(entry.url);
        }

        debug!("Signed URL cache miss for {key}");

        match self.object_store.presign_get(key, SIGNED_URL_EXPIRY).await {
            Ok(url) => {
                self.cache.set(key, CacheEntry::new(url.clone(), now));
                Some(url)
            }
            Err(e) => {
                error!("Failed to sign URL for {key}: {e}");
                None
            }
        }
    }

    /// Lists the bucket and returns every resolvable image, newest first
    pub async fn load_all(&self) -> Vec<ImageRecord> {
        let objects = match self.object_store.list_objects().await {
            Ok(objects) => objects,
            Err(e) => {
                error!("Failed to list gallery objects: {e}");
                return Vec::new();
            }
        };

        let listed = objects.len();
        let urls = join_all(objects.iter().map(|object| self.resolve_url(&object.key))).await;

        let mut images: Vec<ImageRecord> = objects
            .into_iter()
            .zip(urls)
            .filter_map(|(object, url)| {
                url.map(|url| ImageRecord {
                    id: object.key,
                    url,
                    last_modified: object.last_modified,
                })
            })
            .collect();

        images.sort_by(|a, b| b.last_modified.cmp(&a.last_modified));

        info!("Loaded {} of {listed} gallery images", images.len());

        images
    }
}
