use std::net::{IpAddr, SocketAddr};

use axum::body::Bytes;
use axum::extract::{ConnectInfo, Query, State};
use axum::http::HeaderMap;
use axum::response::{IntoResponse, Redirect, Response};
use serde::Deserialize;

use crate::error::AppError;
use crate::models::Outcome;
use crate::state::SharedState;
use crate::submission::fields::SubmissionForm;
use crate::submission::{metadata, parser, redirect};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitParams {
    pub user_agent: Option<String>,
    pub redirect_to: Option<String>,
}

/// `POST /submit?userAgent=..&redirectTo=..`
///
/// Every outcome, including a body that cannot be parsed, is reported by
/// redirecting to `redirectTo`. Only a missing or unacceptable `redirectTo`
/// gets a direct error response.
pub async fn submit(
    State(state): State<SharedState>,
    Query(params): Query<SubmitParams>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Response, AppError> {
    let target = redirect::parse_target(
        params.redirect_to.as_deref(),
        &state.config.allowed_redirect_hosts,
    )?;

    let content_type = headers
        .get("content-type")
        .and_then(|v| v.to_str().ok());

    let is_multipart = content_type
        .is_some_and(|ct| ct.to_ascii_lowercase().contains("multipart/form-data"));

    let parsed = if is_multipart {
        parser::parse_multipart(&headers, body).await
    } else {
        parser::parse_body(content_type, &body)
    };

    let outcome = match parsed {
        Ok(raw) => {
            let peer_ip: Option<IpAddr> = Some(addr.ip());
            let meta = metadata::extract(
                &headers,
                peer_ip,
                &state.config.trusted_proxies,
                params.user_agent.as_deref(),
            );
            let record = SubmissionForm::from_value(&raw).into_record(meta);
            state.submissions.submit(record).await
        }
        Err(e) => {
            tracing::debug!("Unreadable submission body: {e}");
            Outcome::malformed(e)
        }
    };

    Ok(Redirect::to(&redirect::outcome_location(&target, &outcome)).into_response())
}
