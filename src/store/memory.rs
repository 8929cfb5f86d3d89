use std::time::{Duration, SystemTime, UNIX_EPOCH};

use async_trait::async_trait;
use bytes::Bytes;
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;

use super::{ObjectStore, PutOptions, StoreError};
use crate::submission::key::StorageKey;

/// An object held by [`MemoryStore`].
#[derive(Debug, Clone)]
pub struct StoredObject {
    pub body: Bytes,
    pub content_type: String,
    pub public: bool,
}

/// Process-local object store. Nothing survives a restart.
pub struct MemoryStore {
    bucket: String,
    objects: DashMap<String, StoredObject>,
}

impl MemoryStore {
    pub fn new(bucket: impl Into<String>) -> Self {
        Self {
            bucket: bucket.into(),
            objects: DashMap::new(),
        }
    }

    /// Snapshot of the object at `key`, if any.
    pub fn get(&self, key: &str) -> Option<StoredObject> {
        self.objects.get(key).map(|entry| entry.value().clone())
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new("formvault")
    }
}

#[async_trait]
impl ObjectStore for MemoryStore {
    fn name(&self) -> &str {
        "memory"
    }

    async fn exists(&self, key: &StorageKey) -> Result<bool, StoreError> {
        Ok(self.objects.contains_key(key.as_str()))
    }

    async fn put(
        &self,
        key: &StorageKey,
        body: Bytes,
        options: &PutOptions,
    ) -> Result<(), StoreError> {
        let object = StoredObject {
            body,
            content_type: options.content_type.to_string(),
            public: options.public,
        };

        // Entry holds the shard lock, so check and insert are one step.
        match self.objects.entry(key.as_str().to_string()) {
            Entry::Occupied(_) if options.if_absent => {
                Err(StoreError::AlreadyExists(key.to_string()))
            }
            Entry::Occupied(mut occupied) => {
                occupied.insert(object);
                Ok(())
            }
            Entry::Vacant(vacant) => {
                vacant.insert(object);
                Ok(())
            }
        }
    }

    async fn signed_read_url(
        &self,
        key: &StorageKey,
        expiry: Duration,
    ) -> Result<String, StoreError> {
        if !self.objects.contains_key(key.as_str()) {
            return Err(StoreError::Signing(format!("no object at {key}")));
        }

        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_err(|e| StoreError::Signing(format!("clock error: {e}")))?;
        let expires = now.saturating_add(expiry).as_secs();

        Ok(format!(
            "memory://{}/{}?expires={expires}",
            self.bucket,
            key.as_str()
        ))
    }
}
