//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create the Axum Router with the catch-all proxy handler
//! - Wire up middleware (tracing, inbound body read timeout)
//! - Bind server to listener with graceful shutdown
//! - Buffer each inbound request and hand it to the relay
//! - Map relay failures to an opaque 502

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::{
    body::Body,
    extract::{ConnectInfo, State},
    http::Request,
    response::{IntoResponse, Response},
    Router,
};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower::ServiceBuilder;
use tower_http::{timeout::RequestBodyTimeoutLayer, trace::TraceLayer};

use crate::config::ProxyConfig;
use crate::http::request::buffer_inbound;
use crate::http::response::bad_gateway;
use crate::net::{HyperTransport, Transport, TransportError};
use crate::relay::Relay;

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub relay: Arc<Relay>,
    pub max_body_bytes: usize,
}

/// HTTP server for the proxy.
pub struct HttpServer {
    router: Router,
    config: Arc<ProxyConfig>,
}

impl HttpServer {
    /// Create a server talking to the origin through the pooled HTTPS client.
    pub fn new(config: ProxyConfig) -> Result<Self, TransportError> {
        let transport = HyperTransport::new(&config.upstream)?;
        Ok(Self::with_transport(config, Arc::new(transport)))
    }

    /// Create a server over an arbitrary transport.
    pub fn with_transport(config: ProxyConfig, transport: Arc<dyn Transport>) -> Self {
        let relay = Arc::new(Relay::new(transport, &config.upstream));
        let state = AppState {
            relay,
            max_body_bytes: config.listener.max_body_bytes,
        };

        let router = Self::build_router(&config, state);
        Self {
            router,
            config: Arc::new(config),
        }
    }

    /// Build the Axum router with all middleware layers.
    fn build_router(config: &ProxyConfig, state: AppState) -> Router {
        Router::new()
            .fallback(proxy_handler)
            .with_state(state)
            .layer(
                ServiceBuilder::new()
                    .layer(TraceLayer::new_for_http())
                    .layer(RequestBodyTimeoutLayer::new(Duration::from_secs(
                        config.listener.body_read_timeout_secs,
                    ))),
            )
    }

    /// The router without a listener, for driving requests in-process.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Run the server, accepting connections on the given listener until
    /// `shutdown` fires.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            target = %self.config.upstream.target_host,
            max_redirects = self.config.upstream.max_redirects,
            "HTTP server starting"
        );

        let app = self.router.into_make_service_with_connect_info::<SocketAddr>();

        axum::serve(listener, app)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

/// Catch-all proxy handler.
async fn proxy_handler(State(state): State<AppState>, request: Request<Body>) -> Response {
    let remote = request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.to_string())
        .unwrap_or_else(|| "-".to_string());
    let uri = request
        .uri()
        .path_and_query()
        .map(|pq| pq.as_str().to_string())
        .unwrap_or_else(|| "/".to_string());

    tracing::info!(remote = %remote, method = %request.method(), uri = %uri, "inbound request");

    let inbound = match buffer_inbound(request, state.max_body_bytes).await {
        Ok(inbound) => inbound,
        Err(e) => {
            tracing::warn!(remote = %remote, uri = %uri, error = %e, "failed to buffer request body");
            return e.into_response();
        }
    };

    match state.relay.relay(inbound).await {
        Ok(response) => response,
        Err(e) => {
            tracing::error!(
                remote = %remote,
                uri = %uri,
                kind = e.kind(),
                error = %e,
                "proxy error"
            );
            bad_gateway()
        }
    }
}
