mod common;

use formvault::config::{S3Config, StorageConfig};
use formvault::store::StoreError;

fn s3_config(access_key: Option<&str>, secret_key: Option<&str>) -> S3Config {
    S3Config {
        bucket: "submissions".to_string(),
        region: "us-east-1".to_string(),
        endpoint: Some("http://127.0.0.1:9000".to_string()),
        access_key: access_key.map(str::to_string),
        secret_key: secret_key.map(str::to_string),
    }
}

// ── Link expiry ─────────────────────────────────────────────────

#[test]
fn memory_storage_accepts_long_expiry() {
    let mut config = common::test_config();
    config.signed_url_expiry_secs = 30 * 24 * 3600;
    assert!(config.validate().is_ok());
}

#[test]
fn s3_storage_accepts_seven_days() {
    let mut config = common::test_config();
    config.storage = StorageConfig::S3(s3_config(Some("AKIA"), Some("secret")));
    config.signed_url_expiry_secs = 604_800;
    assert!(config.validate().is_ok());
}

#[test]
fn s3_storage_rejects_expiry_past_seven_days() {
    let mut config = common::test_config();
    config.storage = StorageConfig::S3(s3_config(Some("AKIA"), Some("secret")));
    config.signed_url_expiry_secs = 604_801;

    let err = config.validate().unwrap_err();
    assert!(err.contains("FORMVAULT_SIGNED_URL_EXPIRY_SECS"), "{err}");
}

#[test]
fn zero_expiry_is_rejected() {
    let mut config = common::test_config();
    config.signed_url_expiry_secs = 0;
    assert!(config.validate().is_err());
}

#[test]
fn build_store_refuses_invalid_s3_expiry() {
    let mut config = common::test_config();
    config.storage = StorageConfig::S3(s3_config(Some("AKIA"), Some("secret")));
    config.signed_url_expiry_secs = 604_801;

    assert!(matches!(
        formvault::build_store(&config),
        Err(StoreError::Config(_))
    ));
}

// ── Credentials ─────────────────────────────────────────────────

#[test]
fn half_configured_credentials_are_rejected() {
    let mut config = common::test_config();
    config.storage = StorageConfig::S3(s3_config(Some("AKIA"), None));
    assert!(config.validate().is_err());

    config.storage = StorageConfig::S3(s3_config(None, Some("secret")));
    assert!(matches!(
        formvault::build_store(&config),
        Err(StoreError::Config(_))
    ));
}

#[test]
fn secret_key_is_redacted_in_debug_output() {
    let rendered = format!("{:?}", s3_config(Some("AKIA"), Some("hunter2")));
    assert!(rendered.contains("AKIA"));
    assert!(!rendered.contains("hunter2"));
}
