//! Relay failures.
//!
//! Every variant reaches the client as the same opaque 502; the variants
//! exist for the log line.

use std::time::Duration;

use axum::http::Uri;

use crate::net::TransportError;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[derive(Debug, thiserror::Error)]
pub enum RelayError {
    /// DNS, TCP, TLS or connection failure on a hop.
    #[error("upstream request to {url} failed: {source}")]
    Transport {
        url: Uri,
        #[source]
        source: TransportError,
    },

    /// No response headers within the per-hop timeout.
    #[error("upstream request to {url} timed out after {timeout:?}")]
    Timeout { url: Uri, timeout: Duration },

    /// Every allowed hop answered with a followable redirect.
    #[error("stopped after {max_hops} upstream calls, next redirect was {url}")]
    RedirectLimit { url: Uri, max_hops: usize },

    /// The hop request could not be assembled.
    #[error("cannot build upstream request for {target}: {source}")]
    InvalidRequest {
        target: String,
        #[source]
        source: BoxError,
    },
}

impl RelayError {
    /// Short label for structured logs.
    pub fn kind(&self) -> &'static str {
        match self {
            RelayError::Transport { .. } => "transport",
            RelayError::Timeout { .. } => "timeout",
            RelayError::RedirectLimit { .. } => "redirect_limit",
            RelayError::InvalidRequest { .. } => "invalid_request",
        }
    }

    pub(crate) fn invalid(target: impl Into<String>, source: impl Into<BoxError>) -> Self {
        RelayError::InvalidRequest {
            target: target.into(),
            source: source.into(),
        }
    }
}
