//! The redirect-following loop.
//!
//! ```text
//! InboundRequest
//!     → hop 1: https://{target}{path}?{query}
//!     → 3xx + Location? ── no ──▶ sanitize, return terminal response
//!           │ yes
//!           ▼
//!       drop body, resolve Location against the current hop URL
//!       302/303 → GET with empty body from here on
//!     → hop 2 ... up to max_hops, then RedirectLimit
//! ```

use std::sync::Arc;
use std::time::Duration;

use axum::body::{Body, Bytes};
use axum::http::{
    header::{CONTENT_LENGTH, HOST, LOCATION},
    HeaderMap, HeaderValue, Method, Request, Response, Uri,
};
use crate::config::UpstreamConfig;
use crate::net::Transport;
use crate::relay::error::RelayError;
use crate::relay::redirect;
use crate::relay::InboundRequest;
use crate::security::headers::sanitize;

/// Follows upstream redirects for one inbound request at a time.
///
/// Holds no per-request state; one instance is shared by every handler.
pub struct Relay {
    transport: Arc<dyn Transport>,
    target_host: String,
    max_hops: usize,
    hop_timeout: Duration,
}

impl Relay {
    pub fn new(transport: Arc<dyn Transport>, upstream: &UpstreamConfig) -> Self {
        Self {
            transport,
            target_host: upstream.target_host.clone(),
            max_hops: upstream.max_redirects,
            hop_timeout: upstream.hop_timeout(),
        }
    }

    pub fn target_host(&self) -> &str {
        &self.target_host
    }

    /// Relay `inbound` to the origin, chasing redirects.
    ///
    /// The returned response has hop-by-hop headers removed and its body still
    /// streaming from the origin.
    pub async fn relay(&self, inbound: InboundRequest) -> Result<Response<Body>, RelayError> {
        let InboundRequest {
            mut method,
            path,
            query,
            headers,
            mut body,
        } = inbound;

        let host = HeaderValue::from_str(&self.target_host)
            .map_err(|e| RelayError::invalid(&self.target_host, e))?;
        let mut url = redirect::origin_uri(&self.target_host, &path, query.as_deref())
            .map_err(|e| RelayError::invalid(&self.target_host, e))?;

        for hop in 1..=self.max_hops {
            let request = hop_request(&url, &method, &headers, &host, body.clone());

            let sent = tokio::time::timeout(self.hop_timeout, self.transport.send(request)).await;
            let mut response = match sent {
                Ok(Ok(response)) => response,
                Ok(Err(source)) => return Err(RelayError::Transport { url, source }),
                Err(_) => {
                    return Err(RelayError::Timeout {
                        url,
                        timeout: self.hop_timeout,
                    })
                }
            };

            let status = response.status();
            if !redirect::is_redirect(status) {
                sanitize(response.headers_mut());
                return Ok(response);
            }

            let location = response
                .headers()
                .get(LOCATION)
                .filter(|value| !value.is_empty())
                .cloned();
            let Some(location) = location else {
                sanitize(response.headers_mut());
                return Ok(response);
            };

            let resolved = redirect::resolve(&url, location.as_bytes(), &self.target_host);
            let next = match resolved {
                Ok(next) => next,
                Err(error) => {
                    tracing::warn!(
                        hop,
                        location = %String::from_utf8_lossy(location.as_bytes()),
                        error = %error,
                        "invalid redirect URL"
                    );
                    sanitize(response.headers_mut());
                    return Ok(response);
                }
            };

            // The redirect body carries nothing the caller needs.
            drop(response);

            tracing::info!(hop, status = status.as_u16(), url = %next, "redirect hop");

            if redirect::downgrades_to_get(status) {
                method = Method::GET;
                body = Bytes::new();
            }
            url = next;
        }

        Err(RelayError::RedirectLimit {
            url,
            max_hops: self.max_hops,
        })
    }
}

/// Assemble one upstream request.
///
/// Framing is recomputed from the buffered body, so the inbound
/// `Content-Length` is never carried over.
fn hop_request(
    uri: &Uri,
    method: &Method,
    inbound: &HeaderMap,
    host: &HeaderValue,
    body: Bytes,
) -> Request<Body> {
    let mut headers = inbound.clone();
    sanitize(&mut headers);
    headers.insert(HOST, host.clone());
    headers.remove(CONTENT_LENGTH);

    let mut request = Request::new(Body::from(body));
    *request.method_mut() = method.clone();
    *request.uri_mut() = uri.clone();
    *request.headers_mut() = headers;
    request
}
