//! Redirect-following relay subsystem.
//!
//! # Data Flow
//! ```text
//! InboundRequest (body already buffered)
//!     → engine.rs (bounded hop loop)
//!         → security::headers (sanitize hop request)
//!         → net::Transport (one upstream call per hop, per-hop timeout)
//!         → redirect.rs (terminal? resolve Location, downgrade method)
//!     → terminal Response (sanitized, body streaming) | RelayError
//! ```
//!
//! # Design Decisions
//! - Hops are strictly sequential; no prefetch of redirect targets
//! - Each hop gets the full timeout (a chain may take max_hops × timeout)
//! - No retries at this layer

pub mod engine;
pub mod error;
pub mod redirect;

use axum::body::Bytes;
use axum::http::{request::Parts, HeaderMap, Method};

pub use engine::Relay;
pub use error::RelayError;

/// An inbound request with its body fully materialized.
///
/// The body is replayed on every hop until a 302/303 drops it.
#[derive(Debug, Clone)]
pub struct InboundRequest {
    pub method: Method,
    pub path: String,
    pub query: Option<String>,
    pub headers: HeaderMap,
    pub body: Bytes,
}

impl InboundRequest {
    pub fn from_parts(parts: Parts, body: Bytes) -> Self {
        Self {
            method: parts.method,
            path: parts.uri.path().to_string(),
            query: parts
                .uri
                .query()
                .filter(|q| !q.is_empty())
                .map(str::to_string),
            headers: parts.headers,
            body,
        }
    }
}
