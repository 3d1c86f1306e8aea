//! Redirect policy.
//!
//! # Responsibilities
//! - Build the first hop URL from the inbound path and query, byte for byte
//! - Classify upstream statuses (terminal vs. redirect)
//! - Decide when the method and body are dropped
//! - Resolve `Location` against the current hop URL
//!
//! # Design Decisions
//! - Only 302 and 303 downgrade to GET; 301, 307 and 308 keep method and body
//! - The first hop is never normalized: dot segments and query escapes reach
//!   the origin exactly as the client sent them
//! - The resolved URL is pinned back onto `https://{target}`: only its path
//!   and query survive, so every hop speaks HTTPS to the configured origin

use axum::http::{uri::InvalidUri, StatusCode, Uri};
use url::Url;

/// Why a `Location` could not become the next hop.
#[derive(Debug, thiserror::Error)]
pub enum ResolveError {
    #[error("Location is not visible ASCII")]
    NotAscii,
    #[error("invalid URL reference: {0}")]
    Parse(#[from] url::ParseError),
    #[error("resolved URL is not a valid request target: {0}")]
    Uri(#[from] InvalidUri),
}

/// Build `https://{target_host}{path}?{query}` without touching path or query.
pub fn origin_uri(target_host: &str, path: &str, query: Option<&str>) -> Result<Uri, InvalidUri> {
    match query.filter(|q| !q.is_empty()) {
        Some(query) => format!("https://{target_host}{path}?{query}").parse(),
        None => format!("https://{target_host}{path}").parse(),
    }
}

/// True for the whole 3xx class.
pub fn is_redirect(status: StatusCode) -> bool {
    status.is_redirection()
}

/// True when the next hop must be a GET without a body.
pub fn downgrades_to_get(status: StatusCode) -> bool {
    status == StatusCode::FOUND || status == StatusCode::SEE_OTHER
}

/// Resolve a raw `Location` value against the URL that produced it.
pub fn resolve(current: &Uri, location: &[u8], target_host: &str) -> Result<Uri, ResolveError> {
    let location = std::str::from_utf8(location)
        .ok()
        .filter(|loc| loc.bytes().all(|b| b == b'\t' || (b' '..=b'~').contains(&b)))
        .ok_or(ResolveError::NotAscii)?;

    let base = Url::parse(&current.to_string())?;
    let joined = base.join(location)?;
    Ok(origin_uri(target_host, joined.path(), joined.query())?)
}
