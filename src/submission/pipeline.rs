use std::sync::Arc;
use std::time::Duration;

use bytes::Bytes;

use crate::models::{Outcome, SubmissionRecord};
use crate::store::{ObjectStore, PutOptions, StoreError};

use super::key::{KeyMode, StorageKey};

/// Write-once persistence of submissions, one object per email address.
///
/// Each call to [`SubmissionStore::submit`] runs check, write and link
/// derivation in sequence and always ends in a single [`Outcome`]. Store
/// errors never escape.
pub struct SubmissionStore {
    backend: Arc<dyn ObjectStore>,
    key_prefix: String,
    key_mode: KeyMode,
    url_expiry: Duration,
}

impl SubmissionStore {
    pub fn new(
        backend: Arc<dyn ObjectStore>,
        key_prefix: impl Into<String>,
        key_mode: KeyMode,
        url_expiry: Duration,
    ) -> Self {
        Self {
            backend,
            key_prefix: key_prefix.into(),
            key_mode,
            url_expiry,
        }
    }

    pub fn key_for(&self, email: &str) -> Result<StorageKey, super::key::KeyError> {
        StorageKey::derive(&self.key_prefix, email, self.key_mode)
    }

    pub async fn submit(&self, record: SubmissionRecord) -> Outcome {
        let email = record.email_address.as_str();

        let key = match self.key_for(email) {
            Ok(key) => key,
            Err(e) => {
                tracing::info!(email, "Rejected submission: {e}");
                return Outcome::invalid_email(e);
            }
        };

        match self.backend.exists(&key).await {
            Ok(false) => {}
            Ok(true) => {
                tracing::info!(%key, "Rejected duplicate submission");
                return Outcome::duplicate(email);
            }
            Err(e) => {
                tracing::error!(%key, backend = self.backend.name(), "Existence check failed: {e}");
                return Outcome::check_failed(email);
            }
        }

        let body = match record.to_json_bytes() {
            Ok(bytes) => Bytes::from(bytes),
            Err(e) => {
                tracing::error!(%key, "Failed to serialize submission: {e}");
                return Outcome::write_failed();
            }
        };

        match self.backend.put(&key, body, &PutOptions::public_json()).await {
            Ok(()) => {}
            // Another request created the key after our existence check.
            Err(StoreError::AlreadyExists(_)) => {
                tracing::info!(%key, "Rejected duplicate submission at write");
                return Outcome::duplicate(email);
            }
            Err(e) => {
                tracing::error!(%key, backend = self.backend.name(), "Write failed: {e}");
                return Outcome::write_failed();
            }
        }

        match self.backend.signed_read_url(&key, self.url_expiry).await {
            Ok(url) => {
                tracing::info!(%key, "Stored submission");
                Outcome::stored(url)
            }
            Err(e) => {
                tracing::warn!(%key, "Stored submission without a read link: {e}");
                Outcome::stored_without_link()
            }
        }
    }
}
