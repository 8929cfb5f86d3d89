use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

use crate::submission::redirect::RedirectError;

/// Errors answered with a JSON body instead of a redirect, used only when
/// there is no valid place to redirect to.
#[derive(Debug)]
pub enum AppError {
    BadRequest(String),
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AppError::BadRequest(msg) => write!(f, "Bad Request: {msg}"),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            AppError::BadRequest(msg) => {
                tracing::debug!("Bad request: {msg}");
                (StatusCode::BAD_REQUEST, msg.clone())
            }
        };

        let body = json!({ "error": message });
        (status, axum::Json(body)).into_response()
    }
}

impl From<RedirectError> for AppError {
    fn from(err: RedirectError) -> Self {
        AppError::BadRequest(err.to_string())
    }
}
