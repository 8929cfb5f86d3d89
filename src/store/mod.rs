pub mod memory;
pub mod s3;

pub use memory::MemoryStore;
pub use s3::S3Store;

use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;

use crate::submission::key::StorageKey;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// A write with `if_absent` found an object already at the key.
    #[error("object already exists at {0}")]
    AlreadyExists(String),
    #[error("storage backend error: {0}")]
    Backend(String),
    #[error("failed to sign read URL: {0}")]
    Signing(String),
    #[error("invalid storage configuration: {0}")]
    Config(String),
}

/// Options applied to a single `put`.
#[derive(Debug, Clone)]
pub struct PutOptions {
    /// Make the object readable without credentials.
    pub public: bool,
    pub content_type: &'static str,
    /// Refuse the write if anything already exists at the key.
    pub if_absent: bool,
}

impl PutOptions {
    /// Public, `application/json`, create-only.
    pub fn public_json() -> Self {
        Self {
            public: true,
            content_type: "application/json",
            if_absent: true,
        }
    }
}

/// What the submission pipeline needs from a backend: an existence check, a
/// conditional write and a signed read link.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Short backend name for logs.
    fn name(&self) -> &str;

    async fn exists(&self, key: &StorageKey) -> Result<bool, StoreError>;

    async fn put(
        &self,
        key: &StorageKey,
        body: Bytes,
        options: &PutOptions,
    ) -> Result<(), StoreError>;

    /// Credentialed GET link for `key`, valid for `expiry`.
    async fn signed_read_url(
        &self,
        key: &StorageKey,
        expiry: Duration,
    ) -> Result<String, StoreError>;
}
