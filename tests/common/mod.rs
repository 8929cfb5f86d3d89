#![allow(dead_code)]

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use reqwest::Client;

use formvault::config::{Config, StorageConfig};
use formvault::store::{MemoryStore, ObjectStore, PutOptions, StoreError};
use formvault::submission::{KeyMode, StorageKey};

/// A running test server backed by an inspectable store.
pub struct TestApp {
    pub addr: SocketAddr,
    pub client: Client,
}

impl TestApp {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    pub fn submit_url(&self, redirect_to: &str, user_agent: Option<&str>) -> String {
        let mut query = form_urlencoded::Serializer::new(String::new());
        if let Some(ua) = user_agent {
            query.append_pair("userAgent", ua);
        }
        query.append_pair("redirectTo", redirect_to);
        format!("{}?{}", self.url("/submit"), query.finish())
    }

    /// Submit a urlencoded form, return (status, Location header).
    pub async fn submit_form(
        &self,
        redirect_to: &str,
        data: &[(&str, &str)],
    ) -> (reqwest::StatusCode, Option<String>) {
        let resp = self
            .client
            .post(self.submit_url(redirect_to, Some("test-agent/1.0")))
            .form(data)
            .send()
            .await
            .expect("submit form failed");
        (resp.status(), location(&resp))
    }
}

pub fn location(resp: &reqwest::Response) -> Option<String> {
    resp.headers()
        .get("location")
        .and_then(|v| v.to_str().ok())
        .map(|s| s.to_string())
}

/// Query parameters of a redirect `Location`.
pub fn query_of(location: &str) -> HashMap<String, String> {
    let url = url::Url::parse(location).expect("location is not a URL");
    url.query_pairs()
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect()
}

pub fn test_config() -> Config {
    Config {
        host: "127.0.0.1".parse().unwrap(),
        port: 0, // unused, we bind to random port
        max_body_size: 64 * 1024,
        trusted_proxies: vec!["127.0.0.0/8".parse().unwrap()],
        cors_origins: vec![],
        allowed_redirect_hosts: vec![],
        key_prefix: "processedData".to_string(),
        key_mode: KeyMode::Verbatim,
        signed_url_expiry_secs: 3600,
        log_level: "warn".to_string(),
        storage: StorageConfig::Memory,
    }
}

pub async fn spawn_app(backend: Arc<dyn ObjectStore>) -> TestApp {
    spawn_app_with(test_config(), backend).await
}

pub async fn spawn_app_with(config: Config, backend: Arc<dyn ObjectStore>) -> TestApp {
    let app = formvault::build_app(config, backend);

    // Bind to random port
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind to random port");
    let addr = listener.local_addr().unwrap();

    // Spawn server in background
    tokio::spawn(async move {
        axum::serve(
            listener,
            app.into_make_service_with_connect_info::<SocketAddr>(),
        )
        .await
        .expect("Server failed");
    });

    let client = Client::builder()
        .redirect(reqwest::redirect::Policy::none())
        .build()
        .unwrap();

    TestApp { addr, client }
}

pub fn key(email: &str) -> StorageKey {
    StorageKey::derive("processedData", email, KeyMode::Verbatim).unwrap()
}

/// Wraps a [`MemoryStore`], counts calls and injects failures.
#[derive(Default)]
pub struct FaultyStore {
    pub inner: MemoryStore,
    pub fail_exists: bool,
    pub fail_put: bool,
    pub fail_sign: bool,
    /// Report every key as absent, as a racing request would see it.
    pub blind_exists: bool,
    pub exists_calls: AtomicUsize,
    pub put_calls: AtomicUsize,
    pub sign_calls: AtomicUsize,
}

impl FaultyStore {
    pub fn puts(&self) -> usize {
        self.put_calls.load(Ordering::SeqCst)
    }

    pub fn signs(&self) -> usize {
        self.sign_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ObjectStore for FaultyStore {
    fn name(&self) -> &str {
        "faulty"
    }

    async fn exists(&self, key: &StorageKey) -> Result<bool, StoreError> {
        self.exists_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_exists {
            return Err(StoreError::Backend("connection reset".to_string()));
        }
        if self.blind_exists {
            // Give a concurrent submission time to pass its own check.
            tokio::time::sleep(Duration::from_millis(20)).await;
            return Ok(false);
        }
        self.inner.exists(key).await
    }

    async fn put(
        &self,
        key: &StorageKey,
        body: Bytes,
        options: &PutOptions,
    ) -> Result<(), StoreError> {
        self.put_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_put {
            return Err(StoreError::Backend("quota exceeded".to_string()));
        }
        self.inner.put(key, body, options).await
    }

    async fn signed_read_url(
        &self,
        key: &StorageKey,
        expiry: Duration,
    ) -> Result<String, StoreError> {
        self.sign_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_sign {
            return Err(StoreError::Signing("no signing key".to_string()));
        }
        self.inner.signed_read_url(key, expiry).await
    }
}
