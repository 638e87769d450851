//! S3 implementation of the object store interface

use super::{ObjectStore, StoreError, StoreResult};
use async_trait::async_trait;
use aws_config::meta::region::RegionProviderChain;
use aws_config::BehaviorVersion;
use aws_sdk_s3::config::Region;
use aws_sdk_s3::Client as AwsS3Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tokio::io::AsyncRead;

/// Default per-operation timeout (seconds)
const DEFAULT_TIMEOUT_SECONDS: u64 = 300;

/// S3 client configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct S3StoreConfig {
    /// AWS profile name (None = ambient credential chain)
    pub profile: Option<String>,

    /// AWS region override (None = default region resolution)
    pub region: Option<String>,

    /// Request timeout in seconds
    pub timeout_seconds: u64,
}

impl Default for S3StoreConfig {
    fn default() -> Self {
        Self {
            profile: None,
            region: None,
            timeout_seconds: DEFAULT_TIMEOUT_SECONDS,
        }
    }
}

/// S3-backed object store using the official AWS SDK
#[derive(Clone)]
pub struct S3Store {
    client: AwsS3Client,
}

impl S3Store {
    /// Create a new store with the given configuration
    pub async fn new(config: S3StoreConfig) -> StoreResult<Self> {
        if config.timeout_seconds == 0 {
            return Err(StoreError::InvalidConfig(
                "timeout_seconds must be >= 1".to_string(),
            ));
        }

        let client = Self::build_aws_client(&config).await;
        Ok(Self { client })
    }

    /// Build the AWS SDK S3 client from configuration
    async fn build_aws_client(config: &S3StoreConfig) -> AwsS3Client {
        let mut aws_config_loader = aws_config::defaults(BehaviorVersion::latest());

        let region_provider = if let Some(region_str) = &config.region {
            RegionProviderChain::first_try(Region::new(region_str.clone()))
        } else {
            RegionProviderChain::default_provider()
        };
        aws_config_loader = aws_config_loader.region(region_provider);

        if let Some(profile) = &config.profile {
            aws_config_loader = aws_config_loader.profile_name(profile);
        }

        let aws_config = aws_config_loader.load().await;

        let timeout_config = aws_sdk_s3::config::timeout::TimeoutConfig::builder()
            .operation_timeout(Duration::from_secs(config.timeout_seconds))
            .build();
        let s3_config = aws_sdk_s3::config::Builder::from(&aws_config)
            .timeout_config(timeout_config)
            .build();

        AwsS3Client::from_conf(s3_config)
    }

    /// Get a reference to the underlying AWS S3 client
    pub fn aws_client(&self) -> &AwsS3Client {
        &self.client
    }
}

#[async_trait]
impl ObjectStore for S3Store {
    async fn object_size(&self, bucket: &str, key: &str) -> StoreResult<u64> {
        let response = self
            .client
            .head_object()
            .bucket(bucket)
            .key(key)
            .send()
            .await
            .map_err(|e| {
                if e.to_string().contains("404") || e.to_string().contains("NotFound") {
                    StoreError::NotFound {
                        bucket: bucket.to_string(),
                        key: key.to_string(),
                    }
                } else if e.to_string().contains("403") || e.to_string().contains("AccessDenied") {
                    StoreError::AccessDenied(format!("Cannot access object: {}/{}", bucket, key))
                } else {
                    StoreError::from(e)
                }
            })?;

        response
            .content_length()
            .map(|len| len as u64)
            .ok_or_else(|| {
                StoreError::Sdk(format!("Missing content length for {}/{}", bucket, key))
            })
    }

    async fn reader(
        &self,
        bucket: &str,
        key: &str,
    ) -> StoreResult<Box<dyn AsyncRead + Unpin + Send>> {
        let response = self
            .client
            .get_object()
            .bucket(bucket)
            .key(key)
            .send()
            .await
            .map_err(|e| {
                if e.to_string().contains("404") || e.to_string().contains("NoSuchKey") {
                    StoreError::NotFound {
                        bucket: bucket.to_string(),
                        key: key.to_string(),
                    }
                } else if e.to_string().contains("403") || e.to_string().contains("AccessDenied") {
                    StoreError::AccessDenied(format!("Cannot access object: {}/{}", bucket, key))
                } else {
                    StoreError::from(e)
                }
            })?;

        Ok(Box::new(response.body.into_async_read()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_defaults() {
        let config = S3StoreConfig::default();
        assert_eq!(config.profile, None);
        assert_eq!(config.region, None);
        assert_eq!(config.timeout_seconds, DEFAULT_TIMEOUT_SECONDS);
    }

    #[tokio::test]
    async fn test_store_creation() {
        let result = S3Store::new(S3StoreConfig::default()).await;
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_store_creation_with_region() {
        let config = S3StoreConfig {
            region: Some("eu-west-1".to_string()),
            ..Default::default()
        };
        assert!(S3Store::new(config).await.is_ok());
    }

    #[tokio::test]
    async fn test_store_rejects_zero_timeout() {
        let config = S3StoreConfig {
            timeout_seconds: 0,
            ..Default::default()
        };
        assert!(S3Store::new(config).await.is_err());
    }
}
