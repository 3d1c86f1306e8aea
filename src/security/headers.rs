//! Hop-by-hop header stripping.
//!
//! # Responsibilities
//! - Remove connection-management and proxy-negotiation fields
//! - Remove every field nominated by a `Connection` header
//!
//! # Design Decisions
//! - Runs on every outgoing hop request and on the terminal response
//! - Intermediate redirect responses are never sanitized; their headers are
//!   discarded once `Location` has been read
//! - Unknown or absent fields are ignored, so the function cannot fail

use axum::http::header::{self, HeaderMap, HeaderName};

/// Fields that are only meaningful between adjacent connection endpoints.
pub const HOP_BY_HOP: &[&str] = &[
    "connection",
    "proxy-connection",
    "keep-alive",
    "proxy-authenticate",
    "proxy-authorization",
    "te",
    "trailers",
    "transfer-encoding",
    "upgrade",
];

/// Strip hop-by-hop headers in place.
///
/// The `Connection` tokens are collected before the denylist pass, since that
/// pass removes the `Connection` header itself.
pub fn sanitize(headers: &mut HeaderMap) {
    let nominated = connection_tokens(headers);

    for name in HOP_BY_HOP {
        headers.remove(*name);
    }
    for name in nominated {
        headers.remove(name);
    }
}

/// Field names listed across all `Connection` header values.
fn connection_tokens(headers: &HeaderMap) -> Vec<HeaderName> {
    headers
        .get_all(header::CONNECTION)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(','))
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .filter_map(|token| HeaderName::from_bytes(token.as_bytes()).ok())
        .collect()
}
