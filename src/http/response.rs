//! Client-facing error responses.
//!
//! Relay failures of every kind collapse into one static 502. The cause is
//! logged, never sent.

use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};

pub const BAD_GATEWAY_BODY: &str = "Bad Gateway";

pub fn bad_gateway() -> Response {
    (
        StatusCode::BAD_GATEWAY,
        [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
        BAD_GATEWAY_BODY,
    )
        .into_response()
}
