use std::net::IpAddr;

use ipnet::IpNet;

use crate::store::s3::MAX_PRESIGN_EXPIRY_SECS;
use crate::submission::KeyMode;

#[derive(Debug, Clone)]
pub struct Config {
    pub host: IpAddr,
    pub port: u16,
    pub max_body_size: usize,
    pub trusted_proxies: Vec<IpNet>,
    pub cors_origins: Vec<String>,
    pub allowed_redirect_hosts: Vec<String>,
    pub key_prefix: String,
    pub key_mode: KeyMode,
    pub signed_url_expiry_secs: u64,
    pub log_level: String,
    pub storage: StorageConfig,
}

#[derive(Debug, Clone, PartialEq)]
pub enum StorageConfig {
    Memory,
    S3(S3Config),
}

#[derive(Clone, PartialEq)]
pub struct S3Config {
    pub bucket: String,
    pub region: String,
    pub endpoint: Option<String>,
    pub access_key: Option<String>,
    pub secret_key: Option<String>,
}

// Keep the secret out of logs.
impl std::fmt::Debug for S3Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("S3Config")
            .field("bucket", &self.bucket)
            .field("region", &self.region)
            .field("endpoint", &self.endpoint)
            .field("access_key", &self.access_key)
            .field("secret_key", &self.secret_key.as_ref().map(|_| "***"))
            .finish()
    }
}

impl Config {
    pub fn from_env() -> Result<Self, String> {
        let host: IpAddr = env_or("FORMVAULT_HOST", "0.0.0.0")
            .parse()
            .map_err(|e| format!("Invalid FORMVAULT_HOST: {e}"))?;

        let port: u16 = env_or("FORMVAULT_PORT", "3000")
            .parse()
            .map_err(|e| format!("Invalid FORMVAULT_PORT: {e}"))?;

        let max_body_size: usize = env_or("FORMVAULT_MAX_BODY_SIZE", "1048576")
            .parse()
            .map_err(|e| format!("Invalid FORMVAULT_MAX_BODY_SIZE: {e}"))?;

        // Hosted function runtimes always sit behind the platform proxy.
        let trusted_proxies: Vec<IpNet> = env_list("FORMVAULT_TRUSTED_PROXIES", "0.0.0.0/0,::/0")
            .iter()
            .map(|s| {
                s.parse()
                    .map_err(|e| format!("Invalid FORMVAULT_TRUSTED_PROXIES entry '{s}': {e}"))
            })
            .collect::<Result<Vec<_>, _>>()?;

        let cors_origins = env_list("FORMVAULT_CORS_ORIGINS", "");
        let allowed_redirect_hosts = env_list("FORMVAULT_ALLOWED_REDIRECT_HOSTS", "");

        let key_prefix = env_or("FORMVAULT_KEY_PREFIX", "processedData");
        let key_mode: KeyMode = env_or("FORMVAULT_KEY_MODE", "verbatim")
            .parse()
            .map_err(|e| format!("Invalid FORMVAULT_KEY_MODE: {e}"))?;

        let signed_url_expiry_secs: u64 = env_or("FORMVAULT_SIGNED_URL_EXPIRY_SECS", "604800")
            .parse()
            .map_err(|e| format!("Invalid FORMVAULT_SIGNED_URL_EXPIRY_SECS: {e}"))?;

        let log_level = env_or("FORMVAULT_LOG_LEVEL", "info");

        let storage = match env_or("FORMVAULT_STORAGE", "s3").as_str() {
            "memory" => StorageConfig::Memory,
            "s3" => StorageConfig::S3(S3Config {
                bucket: env_required("FORMVAULT_S3_BUCKET")?,
                region: env_or("FORMVAULT_S3_REGION", "us-east-1"),
                endpoint: env_optional("FORMVAULT_S3_ENDPOINT"),
                access_key: env_optional("FORMVAULT_S3_ACCESS_KEY"),
                secret_key: env_optional("FORMVAULT_S3_SECRET_KEY"),
            }),
            other => return Err(format!("Invalid FORMVAULT_STORAGE: '{other}'")),
        };

        let config = Config {
            host,
            port,
            max_body_size,
            trusted_proxies,
            cors_origins,
            allowed_redirect_hosts,
            key_prefix,
            key_mode,
            signed_url_expiry_secs,
            log_level,
            storage,
        };
        config.validate()?;

        Ok(config)
    }

    /// Reject settings the selected backend cannot honor.
    pub fn validate(&self) -> Result<(), String> {
        if self.signed_url_expiry_secs == 0 {
            return Err("Invalid FORMVAULT_SIGNED_URL_EXPIRY_SECS: must be at least 1".to_string());
        }

        if let StorageConfig::S3(s3) = &self.storage {
            if self.signed_url_expiry_secs > MAX_PRESIGN_EXPIRY_SECS {
                return Err(format!(
                    "Invalid FORMVAULT_SIGNED_URL_EXPIRY_SECS: S3 presigned URLs are limited to {MAX_PRESIGN_EXPIRY_SECS}s, got {}",
                    self.signed_url_expiry_secs
                ));
            }
            if s3.access_key.is_some() != s3.secret_key.is_some() {
                return Err(
                    "FORMVAULT_S3_ACCESS_KEY and FORMVAULT_S3_SECRET_KEY must be set together"
                        .to_string(),
                );
            }
        }

        Ok(())
    }
}

fn env_required(key: &str) -> Result<String, String> {
    std::env::var(key).map_err(|_| format!("Missing required environment variable: {key}"))
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

fn env_optional(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn env_list(key: &str, default: &str) -> Vec<String> {
    env_or(key, default)
        .split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}
