pub mod config;
pub mod error;
pub mod models;
pub mod routes;
pub mod state;
pub mod store;
pub mod submission;

use std::sync::Arc;
use std::time::Duration;

use axum::extract::DefaultBodyLimit;
use axum::http::{header, HeaderName, HeaderValue, Method};
use axum::Router;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::set_header::SetResponseHeaderLayer;
use tower_http::trace::TraceLayer;

use crate::config::{Config, StorageConfig};
use crate::state::{AppState, SharedState};
use crate::store::{MemoryStore, ObjectStore, S3Store, StoreError};
use crate::submission::SubmissionStore;

/// Build the configured object store backend. Called once at startup.
pub fn build_store(config: &Config) -> Result<Arc<dyn ObjectStore>, StoreError> {
    config.validate().map_err(StoreError::Config)?;

    match &config.storage {
        StorageConfig::Memory => {
            tracing::warn!("Using in-memory storage, submissions will not survive a restart");
            Ok(Arc::new(MemoryStore::default()))
        }
        StorageConfig::S3(s3) => Ok(Arc::new(S3Store::from_config(s3)?)),
    }
}

pub fn build_app(config: Config, backend: Arc<dyn ObjectStore>) -> Router {
    let submissions = SubmissionStore::new(
        backend,
        config.key_prefix.clone(),
        config.key_mode,
        Duration::from_secs(config.signed_url_expiry_secs),
    );

    let cors = cors_layer(&config.cors_origins);
    let max_body_size = config.max_body_size;

    let state: SharedState = Arc::new(AppState {
        config,
        submissions,
    });

    Router::new()
        .merge(routes::submission_routes())
        .route("/health", axum::routing::get(health))
        .layer(DefaultBodyLimit::disable())
        .layer(RequestBodyLimitLayer::new(max_body_size))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        // Security headers
        .layer(SetResponseHeaderLayer::overriding(
            HeaderName::from_static("x-content-type-options"),
            HeaderValue::from_static("nosniff"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            HeaderName::from_static("x-frame-options"),
            HeaderValue::from_static("DENY"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            HeaderName::from_static("referrer-policy"),
            HeaderValue::from_static("strict-origin-when-cross-origin"),
        ))
        .with_state(state)
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let allow_origin = if origins.is_empty() {
        AllowOrigin::from(Any)
    } else {
        let values: Vec<HeaderValue> = origins
            .iter()
            .filter_map(|origin| match origin.parse() {
                Ok(value) => Some(value),
                Err(_) => {
                    tracing::warn!("Ignoring invalid CORS origin '{origin}'");
                    None
                }
            })
            .collect();
        AllowOrigin::list(values)
    };

    CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods([Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE])
        .max_age(Duration::from_secs(86400))
}

async fn health() -> &'static str {
    "ok"
}
