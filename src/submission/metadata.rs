use std::net::IpAddr;

use axum::http::HeaderMap;
use ipnet::IpNet;

/// Caller details recorded alongside the form fields.
#[derive(Debug, Clone, Default)]
pub struct ClientMetadata {
    pub user_agent: Option<String>,
    pub ip_address: Option<String>,
}

/// Collect the user agent and client address for a submission.
///
/// An explicit `userAgent` query value wins over the `User-Agent` header.
pub fn extract(
    headers: &HeaderMap,
    peer_addr: Option<IpAddr>,
    trusted_proxies: &[IpNet],
    user_agent_param: Option<&str>,
) -> ClientMetadata {
    let user_agent = user_agent_param
        .filter(|ua| !ua.is_empty())
        .map(|ua| ua.to_string())
        .or_else(|| {
            headers
                .get("user-agent")
                .and_then(|v| v.to_str().ok())
                .filter(|ua| !ua.is_empty())
                .map(|ua| ua.to_string())
        });

    ClientMetadata {
        user_agent,
        ip_address: client_ip(headers, peer_addr, trusted_proxies).map(|ip| ip.to_string()),
    }
}

/// Resolve the originating client address.
///
/// `X-Forwarded-For` is only consulted when the direct peer is a trusted
/// proxy. The chain is walked right to left and the first untrusted hop is
/// the client; if every hop is trusted the leftmost one is used.
pub fn client_ip(
    headers: &HeaderMap,
    peer_addr: Option<IpAddr>,
    trusted_proxies: &[IpNet],
) -> Option<IpAddr> {
    let is_trusted = |ip: &IpAddr| trusted_proxies.iter().any(|net| net.contains(ip));

    let peer = peer_addr?;
    if !is_trusted(&peer) {
        return Some(peer);
    }

    let Some(xff) = headers.get("x-forwarded-for").and_then(|v| v.to_str().ok()) else {
        return Some(peer);
    };

    let hops: Vec<IpAddr> = xff
        .split(',')
        .filter_map(|s| s.trim().parse::<IpAddr>().ok())
        .collect();

    hops.iter()
        .rev()
        .find(|ip| !is_trusted(ip))
        .or_else(|| hops.first())
        .copied()
        .or(Some(peer))
}
