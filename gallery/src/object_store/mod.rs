//! Object storage seam
//!
//! The gallery only needs to list one bucket and sign GET URLs; [`ObjectStore`] captures that so
//! the loader can run against S3-compatible storage or an in-memory double.

mod error;
mod s3;

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

pub use error::{ObjectStoreError, ObjectStoreResult};
pub use s3::S3ObjectStore;

/// An object listed in the bucket
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectSummary {
    /// Storage key
    pub key: String,
    /// Last modification time; the Unix epoch when the store did not report one
    pub last_modified: DateTime<Utc>,
}

impl ObjectSummary {
    /// Creates a summary for `key`
    #[must_use]
    pub fn new(key: impl Into<String>, last_modified: DateTime<Utc>) -> Self {
        Self {
            key: key.into(),
            last_modified,
        }
    }
}

/// The operations the gallery needs from an S3-compatible object store
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Lists every object in the configured bucket
    ///
    /// # Errors
    ///
    /// Returns `ObjectStoreError` if the listing request fails
    async fn list_objects(&self) -> ObjectStoreResult<Vec<ObjectSummary>>;

    /// Generates a signed GET URL for `key`, valid for `expires_in`
    ///
    /// # Errors
    ///
    /// Returns `ObjectStoreError` if the URL cannot be signed
    async fn presign_get(&self, key: &str, expires_in: Duration) -> ObjectStoreResult<String>;
}
