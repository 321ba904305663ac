//! Document-store collaborator contract and the S3 implementation.
//!
//! Two operations only: persist rendered bytes under a key and mint a
//! time-limited retrieval URL for them. Keys are fresh UUIDs per
//! generation, so an overwrite (last-write-wins) never happens in practice
//! and needs no guard. No deletion, listing or versioning.

use async_trait::async_trait;
use aws_config::timeout::TimeoutConfig;
use aws_config::BehaviorVersion;
use aws_sdk_s3::presigning::PresigningConfig;
use aws_sdk_s3::primitives::ByteStream;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to store object '{key}': {message}")]
    Put { key: String, message: String },
    #[error("failed to presign retrieval URL for '{key}': {message}")]
    Presign { key: String, message: String },
}

#[async_trait]
pub trait DocumentStore: Send + Sync {
    async fn put(
        &self,
        key: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<(), StoreError>;

    /// A signed GET URL for a stored object, valid for the configured
    /// window only. Not renewable; callers re-generate instead.
    async fn presign_get(&self, key: &str) -> Result<String, StoreError>;
}

pub struct S3DocumentStore {
    client: aws_sdk_s3::Client,
    bucket: String,
    url_ttl: Duration,
}

impl S3DocumentStore {
    /// Builds the S3 client with a short connection budget and a larger
    /// whole-operation budget so the file transfer itself is not cut off
    /// by the control-plane timeout.
    pub async fn connect(
        bucket: String,
        url_ttl: Duration,
        connect_timeout: Duration,
        operation_timeout: Duration,
    ) -> Self {
        let timeouts = TimeoutConfig::builder()
            .connect_timeout(connect_timeout)
            .operation_timeout(operation_timeout)
            .build();
        let aws_config = aws_config::defaults(BehaviorVersion::latest())
            .timeout_config(timeouts)
            .load()
            .await;

        Self {
            client: aws_sdk_s3::Client::new(&aws_config),
            bucket,
            url_ttl,
        }
    }
}

#[async_trait]
impl DocumentStore for S3DocumentStore {
    async fn put(
        &self,
        key: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<(), StoreError> {
        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .body(ByteStream::from(bytes))
            .content_type(content_type)
            .content_disposition("inline")
            .send()
            .await
            .map_err(|e| StoreError::Put {
                key: key.to_string(),
                message: e.into_service_error().to_string(),
            })?;
        Ok(())
    }

    async fn presign_get(&self, key: &str) -> Result<String, StoreError> {
        let presign_config = PresigningConfig::builder()
            .expires_in(self.url_ttl)
            .build()
            .map_err(|e| StoreError::Presign {
                key: key.to_string(),
                message: e.to_string(),
            })?;

        let presigned = self
            .client
            .get_object()
            .bucket(&self.bucket)
            .key(key)
            .presigned(presign_config)
            .await
            .map_err(|e| StoreError::Presign {
                key: key.to_string(),
                message: e.to_string(),
            })?;

        Ok(presigned.uri().to_string())
    }
}
