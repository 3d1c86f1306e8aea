//! Inbound request buffering.
//!
//! # Responsibilities
//! - Read the whole inbound body into memory before the first hop
//! - Enforce the configured body size limit
//! - Hand the relay an owned `InboundRequest`
//!
//! # Design Decisions
//! - The body must be replayable across redirect hops, so it cannot stay a stream
//! - Over-limit bodies get 413; any other read failure gets 400

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::response::{IntoResponse, Response};
use http_body_util::LengthLimitError;

use crate::relay::InboundRequest;

/// Failure while reading the inbound body.
#[derive(Debug, thiserror::Error)]
pub enum BodyError {
    #[error("request body exceeds {limit} bytes")]
    TooLarge { limit: usize },
    #[error("failed to read request body: {0}")]
    Read(#[source] axum::Error),
}

impl IntoResponse for BodyError {
    fn into_response(self) -> Response {
        match self {
            BodyError::TooLarge { .. } => {
                (StatusCode::PAYLOAD_TOO_LARGE, "Payload Too Large").into_response()
            }
            BodyError::Read(_) => (StatusCode::BAD_REQUEST, "Bad Request").into_response(),
        }
    }
}

/// Buffer `request` into an `InboundRequest`.
pub async fn buffer_inbound(request: Request<Body>, limit: usize) -> Result<InboundRequest, BodyError> {
    let (parts, body) = request.into_parts();
    let body = axum::body::to_bytes(body, limit).await.map_err(|e| {
        if is_length_limit(&e) {
            BodyError::TooLarge { limit }
        } else {
            BodyError::Read(e)
        }
    })?;
    Ok(InboundRequest::from_parts(parts, body))
}

fn is_length_limit(err: &axum::Error) -> bool {
    let mut source: Option<&(dyn std::error::Error + 'static)> = Some(err);
    while let Some(e) = source {
        if e.is::<LengthLimitError>() {
            return true;
        }
        source = e.source();
    }
    false
}
