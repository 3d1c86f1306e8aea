//! Upstream HTTPS transport.
//!
//! # Responsibilities
//! - Own the shared, internally synchronized connection pool
//! - Speak HTTPS (HTTP/1.1 or HTTP/2 via ALPN) to the origin
//! - Never follow redirects; the relay does that hop by hop
//!
//! # Pool Policy
//! - Persistent connections reused across hops and requests
//! - Bounded idle connections per host, with idle expiry
//! - TCP connect timeout and keepalive from `UpstreamConfig`
//! - TLS handshake time is bounded by the relay's per-hop timeout

use std::time::Duration;

use axum::body::Body;
use axum::http::{Request, Response};
use futures_util::future::BoxFuture;
use hyper::body::Incoming;
use hyper_rustls::{HttpsConnector, HttpsConnectorBuilder};
use hyper_util::{
    client::legacy::{connect::HttpConnector, Client},
    rt::TokioExecutor,
};

use crate::config::UpstreamConfig;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Failure below HTTP: DNS, TCP, TLS, or a broken connection.
#[derive(Debug, thiserror::Error)]
#[error("{source}")]
pub struct TransportError {
    #[source]
    source: BoxError,
}

impl TransportError {
    pub fn new(source: impl Into<BoxError>) -> Self {
        Self {
            source: source.into(),
        }
    }
}

/// Executes one upstream request and yields the response once headers arrive.
///
/// Implementations must not follow redirects.
pub trait Transport: Send + Sync + 'static {
    fn send(&self, request: Request<Body>) -> BoxFuture<'_, Result<Response<Body>, TransportError>>;
}

pub type UpstreamClient = Client<HttpsConnector<HttpConnector>, Body>;

/// Pooled hyper client speaking HTTPS only.
#[derive(Clone)]
pub struct HyperTransport {
    client: UpstreamClient,
}

impl HyperTransport {
    /// Build the client from the upstream pool settings.
    pub fn new(config: &UpstreamConfig) -> Result<Self, TransportError> {
        let mut http = HttpConnector::new();
        http.enforce_http(false);
        http.set_connect_timeout(Some(Duration::from_secs(config.connect_timeout_secs)));
        http.set_keepalive(Some(Duration::from_secs(config.keepalive_secs)));

        let https = HttpsConnectorBuilder::new()
            .with_provider_and_native_roots(rustls::crypto::ring::default_provider())
            .map_err(TransportError::new)?
            .https_only()
            .enable_http1()
            .enable_http2()
            .wrap_connector(http);

        let client = Client::builder(TokioExecutor::new())
            .pool_idle_timeout(Duration::from_secs(config.pool_idle_timeout_secs))
            .pool_max_idle_per_host(config.pool_max_idle_per_host)
            .build(https);

        tracing::debug!(
            connect_timeout_secs = config.connect_timeout_secs,
            pool_max_idle_per_host = config.pool_max_idle_per_host,
            "Upstream client ready"
        );

        Ok(Self { client })
    }
}

impl Transport for HyperTransport {
    fn send(&self, request: Request<Body>) -> BoxFuture<'_, Result<Response<Body>, TransportError>> {
        Box::pin(async move {
            let response: Response<Incoming> = self
                .client
                .request(request)
                .await
                .map_err(TransportError::new)?;
            Ok(response.map(Body::new))
        })
    }
}
