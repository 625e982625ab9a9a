//! Header handling for the passthrough.
//!
//! # Responsibilities
//! - Strip hop-by-hop headers in both directions
//! - Drop the inbound `Host` so the client sets the upstream's (change-origin)
//! - Force SSE-friendly response headers so intermediaries neither buffer
//!   nor close the stream

use axum::http::header::{self, HeaderMap, HeaderName, HeaderValue};

pub static NO_CACHE: HeaderValue = HeaderValue::from_static("no-cache");
pub static KEEP_ALIVE: HeaderValue = HeaderValue::from_static("keep-alive");

/// Connection-scoped headers that must not be forwarded.
const HOP_BY_HOP: [HeaderName; 8] = [
    header::CONNECTION,
    HeaderName::from_static("keep-alive"),
    header::PROXY_AUTHENTICATE,
    header::PROXY_AUTHORIZATION,
    header::TE,
    header::TRAILER,
    header::TRANSFER_ENCODING,
    header::UPGRADE,
];

fn strip_hop_by_hop(headers: &mut HeaderMap) {
    // Headers named in `Connection` are hop-by-hop too.
    let listed: Vec<HeaderName> = headers
        .get_all(header::CONNECTION)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(','))
        .filter_map(|name| HeaderName::from_bytes(name.trim().as_bytes()).ok())
        .collect();

    for name in listed.iter().chain(HOP_BY_HOP.iter()) {
        headers.remove(name);
    }
}

/// Headers to send upstream for an inbound request.
pub fn upstream_request_headers(inbound: &HeaderMap) -> HeaderMap {
    let mut headers = inbound.clone();
    strip_hop_by_hop(&mut headers);
    headers.remove(header::HOST);
    headers
}

/// Normalize upstream response headers before they go to the client.
pub fn normalize_response_headers(headers: &mut HeaderMap) {
    strip_hop_by_hop(headers);
    headers.insert(header::CACHE_CONTROL, NO_CACHE.clone());
    headers.insert(header::CONNECTION, KEEP_ALIVE.clone());
}
