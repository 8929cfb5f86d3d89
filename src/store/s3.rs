use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use s3::error::S3Error;

use super::{ObjectStore, PutOptions, StoreError};
use crate::config::S3Config;
use crate::submission::key::StorageKey;

/// SigV4 presigned URLs cannot outlive seven days.
pub const MAX_PRESIGN_EXPIRY_SECS: u64 = 604_800;

/// S3-compatible backend (AWS S3, MinIO, Cloudflare R2, ...).
pub struct S3Store {
    bucket: s3::Bucket,
}

impl S3Store {
    pub fn new(bucket: s3::Bucket) -> Self {
        Self { bucket }
    }

    pub fn from_config(config: &S3Config) -> Result<Self, StoreError> {
        let region = match &config.endpoint {
            Some(endpoint) => s3::Region::Custom {
                region: config.region.clone(),
                endpoint: endpoint.clone(),
            },
            None => config
                .region
                .parse()
                .map_err(|e| StoreError::Config(format!("invalid region '{}': {e}", config.region)))?,
        };

        let credentials = match (&config.access_key, &config.secret_key) {
            (Some(access_key), Some(secret_key)) => s3::creds::Credentials::new(
                Some(access_key.as_str()),
                Some(secret_key.as_str()),
                None,
                None,
                None,
            ),
            (None, None) => s3::creds::Credentials::default(),
            _ => {
                return Err(StoreError::Config(
                    "access key and secret key must be set together".to_string(),
                ));
            }
        }
        .map_err(|e| StoreError::Config(format!("failed to load credentials: {e}")))?;

        let mut bucket = s3::Bucket::new(&config.bucket, region, credentials)
            .map_err(|e| StoreError::Config(format!("failed to open bucket: {e}")))?;

        // Self-hosted endpoints rarely resolve virtual-host style names.
        if config.endpoint.is_some() {
            bucket = bucket.with_path_style();
        }

        tracing::info!(
            bucket = %config.bucket,
            region = %config.region,
            endpoint = config.endpoint.as_deref().unwrap_or("aws"),
            "S3 store configured"
        );

        Ok(Self::new(*bucket))
    }
}

#[async_trait]
impl ObjectStore for S3Store {
    fn name(&self) -> &str {
        "s3"
    }

    async fn exists(&self, key: &StorageKey) -> Result<bool, StoreError> {
        match self.bucket.head_object(key.as_str()).await {
            Ok((_, status)) if (200..300).contains(&status) => Ok(true),
            Ok((_, 404)) => Ok(false),
            Ok((_, status)) => Err(StoreError::Backend(format!(
                "HEAD {key} returned HTTP {status}"
            ))),
            Err(S3Error::HttpFailWithBody(404, _)) => Ok(false),
            Err(e) => Err(StoreError::Backend(format!("HEAD {key} failed: {e}"))),
        }
    }

    async fn put(
        &self,
        key: &StorageKey,
        body: Bytes,
        options: &PutOptions,
    ) -> Result<(), StoreError> {
        let mut bucket = self.bucket.clone();
        if options.public {
            bucket.add_header("x-amz-acl", "public-read");
        }
        if options.if_absent {
            bucket.add_header("if-none-match", "*");
        }

        let status = match bucket
            .put_object_with_content_type(key.as_str(), &body, options.content_type)
            .await
        {
            Ok(response) => response.status_code(),
            Err(S3Error::HttpFailWithBody(status, _)) => status,
            Err(e) => return Err(StoreError::Backend(format!("PUT {key} failed: {e}"))),
        };

        match status {
            200..=299 => Ok(()),
            412 => Err(StoreError::AlreadyExists(key.to_string())),
            other => Err(StoreError::Backend(format!(
                "PUT {key} returned HTTP {other}"
            ))),
        }
    }

    async fn signed_read_url(
        &self,
        key: &StorageKey,
        expiry: Duration,
    ) -> Result<String, StoreError> {
        let secs = expiry.as_secs();
        if secs == 0 || secs > MAX_PRESIGN_EXPIRY_SECS {
            return Err(StoreError::Signing(format!(
                "expiry of {secs}s is outside 1..={MAX_PRESIGN_EXPIRY_SECS}s"
            )));
        }

        self.bucket
            .presign_get(key.as_str(), secs as u32, None)
            .await
            .map_err(|e| StoreError::Signing(format!("presign GET {key}: {e}")))
    }
}
