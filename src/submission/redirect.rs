use url::Url;

use crate::models::Outcome;

/// Why a `redirectTo` value was refused.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RedirectError {
    Missing,
    Invalid(String),
    UnsupportedScheme(String),
    HostNotAllowed(String),
}

impl std::fmt::Display for RedirectError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RedirectError::Missing => write!(f, "redirectTo is required"),
            RedirectError::Invalid(e) => write!(f, "redirectTo is not a valid URL: {e}"),
            RedirectError::UnsupportedScheme(s) => {
                write!(f, "redirectTo must use http or https, got '{s}'")
            }
            RedirectError::HostNotAllowed(h) => write!(f, "redirectTo host '{h}' is not allowed"),
        }
    }
}

/// Validate the caller-supplied redirect target.
///
/// An empty `allowed_hosts` accepts any host.
pub fn parse_target(raw: Option<&str>, allowed_hosts: &[String]) -> Result<Url, RedirectError> {
    let raw = raw
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or(RedirectError::Missing)?;

    let url = Url::parse(raw).map_err(|e| RedirectError::Invalid(e.to_string()))?;

    if !matches!(url.scheme(), "http" | "https") {
        return Err(RedirectError::UnsupportedScheme(url.scheme().to_string()));
    }

    let host = url.host_str().unwrap_or_default();
    if !allowed_hosts.is_empty() && !allowed_hosts.iter().any(|h| h.eq_ignore_ascii_case(host)) {
        return Err(RedirectError::HostNotAllowed(host.to_string()));
    }

    Ok(url)
}

/// Append `success`, `publicUrl` (when present) and `msg` to the target.
pub fn outcome_location(target: &Url, outcome: &Outcome) -> String {
    let mut url = target.clone();
    {
        let mut query = url.query_pairs_mut();
        query.append_pair("success", if outcome.is_success() { "true" } else { "false" });
        if let Some(read_url) = outcome.read_url() {
            query.append_pair("publicUrl", read_url);
        }
        query.append_pair("msg", outcome.message());
    }
    url.into()
}
