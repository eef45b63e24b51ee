//! Environment configuration for different deployment stages

use std::env;
use std::path::PathBuf;
use std::time::Duration;

use aws_config::{retry::RetryConfig, timeout::TimeoutConfig, BehaviorVersion, Region};
use aws_sdk_s3::config::Credentials;
use tracing::Level;

use crate::object_store::{ObjectStoreError, ObjectStoreResult};

const LOCALSTACK_ENDPOINT: &str = "http://localhost:4566";
const DEFAULT_DEV_BUCKET: &str = "pixellens-photos";
const DEFAULT_STORAGE_DIR: &str = ".pixellens";

/// Application environment configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    /// Production environment (Cloudflare R2)
    Production,
    /// Development environment (uses `LocalStack` unless overridden)
    Development,
}

fn required_var(name: &str) -> ObjectStoreResult<String> {
    env::var(name)
        .ok()
        .filter(|value| !value.trim().is_empty())
        .ok_or_else(|| ObjectStoreError::ConfigError(format!("{name} environment variable not set")))
}

impl Environment {
    /// Creates an Environment from the `APP_ENV` environment variable
    ///
    /// # Panics
    ///
    /// Panics if `APP_ENV` contains an invalid value
    #[must_use]
    pub fn from_env() -> Self {
        let env = env::var("APP_ENV")
            .unwrap_or_else(|_| "development".to_string())
            .trim()
            .to_lowercase();

        match env.as_str() {
            "production" => Self::Production,
            "development" => Self::Development,
            _ => panic!("Invalid environment: {env}"),
        }
    }

    /// Returns the bucket holding the gallery images
    ///
    /// # Errors
    ///
    /// Returns `ObjectStoreError::ConfigError` in production when `R2_BUCKET_NAME` is not set
    pub fn bucket_name(&self) -> ObjectStoreResult<String> {
        match self {
            Self::Production => required_var("R2_BUCKET_NAME"),
            Self::Development => {
                Ok(required_var("R2_BUCKET_NAME").unwrap_or_else(|_| DEFAULT_DEV_BUCKET.to_string()))
            }
        }
    }

    /// Returns the object store endpoint
    ///
    /// `S3_ENDPOINT_URL` wins when set, then the R2 endpoint derived from `R2_ACCOUNT_ID`.
    /// Without either, development points at `LocalStack`.
    ///
    /// # Errors
    ///
    /// Returns `ObjectStoreError::ConfigError` in production when neither variable is set
    pub fn endpoint_url(&self) -> ObjectStoreResult<String> {
        if let Ok(endpoint) = required_var("S3_ENDPOINT_URL") {
            return Ok(endpoint);
        }

        match (self, required_var("R2_ACCOUNT_ID")) {
            (_, Ok(account_id)) => Ok(format!("https://{account_id}.r2.cloudflarestorage.com")),
            (Self::Production, Err(e)) => Err(e),
            (Self::Development, Err(_)) => Ok(LOCALSTACK_ENDPOINT.to_string()),
        }
    }

    /// Whether requests fall back to the `LocalStack` endpoint
    #[must_use]
    pub fn uses_localstack(&self) -> bool {
        matches!(self, Self::Development)
            && required_var("S3_ENDPOINT_URL").is_err()
            && required_var("R2_ACCOUNT_ID").is_err()
    }

    /// Returns the static access credentials
    ///
    /// # Errors
    ///
    /// Returns `ObjectStoreError::ConfigError` in production when the key pair is not set
    pub fn credentials(&self) -> ObjectStoreResult<Credentials> {
        let (access_key_id, secret_access_key) = match self {
            Self::Production => (
                required_var("R2_ACCESS_KEY_ID")?,
                required_var("R2_SECRET_ACCESS_KEY")?,
            ),
            Self::Development => (
                required_var("R2_ACCESS_KEY_ID").unwrap_or_else(|_| "test".to_string()),
                required_var("R2_SECRET_ACCESS_KEY").unwrap_or_else(|_| "test".to_string()),
            ),
        };

        Ok(Credentials::new(
            access_key_id,
            secret_access_key,
            None,
            None,
            "pixellens-environment",
        ))
    }

    /// Directory for the durable local store
    #[must_use]
    pub fn storage_dir(&self) -> PathBuf {
        env::var("PIXELLENS_STORAGE_DIR")
            .map_or_else(|_| PathBuf::from(DEFAULT_STORAGE_DIR), PathBuf::from)
    }

    /// AWS configuration with timeout settings and no automatic retries
    ///
    /// # Errors
    ///
    /// Returns `ObjectStoreError::ConfigError` if the endpoint or credentials are missing
    pub async fn aws_config(&self) -> ObjectStoreResult<aws_config::SdkConfig> {
        let retry_config = RetryConfig::standard().with_max_attempts(1);

        let timeout_config = TimeoutConfig::builder()
            .operation_timeout(Duration::from_secs(30))
            .build();

        let config = aws_config::defaults(BehaviorVersion::latest())
            .region(Region::new("auto"))
            .credentials_provider(self.credentials()?)
            .endpoint_url(self.endpoint_url()?)
            .retry_config(retry_config)
            .timeout_config(timeout_config)
            .load()
            .await;

        Ok(config)
    }

    /// S3 service configuration
    ///
    /// # Errors
    ///
    /// Returns `ObjectStoreError::ConfigError` if the endpoint or credentials are missing
    pub async fn s3_client_config(&self) -> ObjectStoreResult<aws_sdk_s3::Config> {
        let aws_config = self.aws_config().await?;
        let s3_config: aws_sdk_s3::Config = (&aws_config).into();
        let mut builder = s3_config.to_builder();

        // Override "force path style" to true for compatibility with LocalStack
        // https://github.com/awslabs/aws-sdk-rust/discussions/874
        if self.uses_localstack() {
            builder.set_force_path_style(Some(true));
        }

        Ok(builder.build())
    }

    /// Log level, overridable with `TRACING_LEVEL`
    #[must_use]
    pub fn tracing_level(&self) -> Level {
        env::var("TRACING_LEVEL")
            .ok()
            .and_then(|val| val.parse::<Level>().ok())
            .unwrap_or(match self {
                Self::Production => Level::INFO,
                Self::Development => Level::DEBUG,
            })
    }
}
