//! S3-compatible object store backed by `aws-sdk-s3`

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use aws_sdk_s3::{presigning::PresigningConfig, Client as S3Client};
use chrono::{DateTime, Utc};
use tracing::{debug, warn};

use super::{ObjectStore, ObjectStoreError, ObjectStoreResult, ObjectSummary};

/// Object store client for a single bucket
pub struct S3ObjectStore {
    s3_client: Arc<S3Client>,
    bucket_name: String,
}

impl S3ObjectStore {
    /// Creates a new object store client
    ///
    /// # Arguments
    ///
    /// * `s3_client` - Pre-configured S3 client
    /// * `bucket_name` - Bucket holding the gallery images
    #[must_use]
    pub const fn new(s3_client: Arc<S3Client>, bucket_name: String) -> Self {
        Self {
            s3_client,
            bucket_name,
        }
    }

    /// Bucket this client lists and signs against
    #[must_use]
    pub fn bucket_name(&self) -> &str {
        &self.bucket_name
    }
}

fn to_chrono(timestamp: Option<&aws_sdk_s3::primitives::DateTime>) -> DateTime<Utc> {
    timestamp
        .and_then(|ts| DateTime::from_timestamp(ts.secs(), ts.subsec_nanos()))
        .unwrap_or(DateTime::UNIX_EPOCH)
}

#[async_trait]
impl ObjectStore for S3ObjectStore {
    /// Follows continuation tokens until the listing is exhausted
    async fn list_objects(&self) -> ObjectStoreResult<Vec<ObjectSummary>> {
        let mut pages = self
            .s3_client
            .list_objects_v2()
            .bucket(&self.bucket_name)
            .into_paginator()
            .send();

        let mut objects = Vec::new();
        while let Some(page) = pages.next().await {
            let page = page.map_err(ObjectStoreError::from)?;
            for object in page.contents() {
                let Some(key) = object.key() else {
                    warn!("Skipping listed object without a key");
                    continue;
                };
                objects.push(ObjectSummary::new(key, to_chrono(object.last_modified())));
            }
        }

        debug!(
            "Listed {} objects in bucket {}",
            objects.len(),
            self.bucket_name
        );

        Ok(objects)
    }

    async fn presign_get(&self, key: &str, expires_in: Duration) -> ObjectStoreResult<String> {
        let presigning_config = PresigningConfig::expires_in(expires_in).map_err(|e| {
            ObjectStoreError::ConfigError(format!("Failed to create presigning config: {e}"))
        })?;

        let presigned_request = self
            .s3_client
            .get_object()
            .bucket(&self.bucket_name)
            .key(key)
            .presigned(presigning_config)
            .await
            .map_err(|e| ObjectStoreError::PresignError(format!("{key}: {e}")))?;

        Ok(presigned_request.uri().to_string())
    }
}
