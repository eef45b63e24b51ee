//! Error types for object storage operations

use aws_sdk_s3::{error::SdkError, operation::list_objects_v2::ListObjectsV2Error};
use thiserror::Error;

/// Result type for object storage operations
pub type ObjectStoreResult<T> = Result<T, ObjectStoreError>;

/// Errors that can occur during object storage operations
#[derive(Error, Debug)]
pub enum ObjectStoreError {
    /// Listing the bucket failed
    #[error("Failed to list objects: {0}")]
    ListError(String),

    /// Signing a URL failed
    #[error("Failed to generate presigned URL: {0}")]
    PresignError(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Upstream service error (5xx from the object store)
    #[error("Upstream service error: {0}")]
    UpstreamError(String),
}

impl From<SdkError<ListObjectsV2Error>> for ObjectStoreError {
    fn from(error: SdkError<ListObjectsV2Error>) -> Self {
        match error {
            SdkError::ServiceError(service_err) if service_err.raw().status().as_u16() >= 500 => {
                Self::UpstreamError(format!("{:?}", service_err.err()))
            }
            SdkError::ServiceError(service_err) => {
                Self::ListError(format!("{:?}", service_err.err()))
            }
            _ => Self::ListError(error.to_string()),
        }
    }
}
