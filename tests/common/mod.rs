//! Shared utilities for relay and server integration tests.
#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::body::{Body, Bytes};
use axum::http::{HeaderMap, Method, Request, Response, StatusCode};
use futures_util::future::BoxFuture;
use redirect_proxy::config::{ProxyConfig, UpstreamConfig};
use redirect_proxy::net::{Transport, TransportError};
use redirect_proxy::{HttpServer, InboundRequest, Shutdown};
use tokio::net::TcpListener;

pub const TARGET: &str = "origin.test";

/// One upstream request as the origin saw it.
#[derive(Debug, Clone)]
pub struct Hop {
    pub method: Method,
    pub uri: String,
    pub headers: HeaderMap,
    pub body: Bytes,
}

/// What the fake origin does with a hop.
pub enum Reply {
    Respond(Response<Body>),
    Delay(Duration, Response<Body>),
    Fail(&'static str),
}

type Script = dyn Fn(usize, &Hop) -> Reply + Send + Sync;

/// A programmable origin. The script receives the 1-based hop number.
pub struct ScriptedTransport {
    script: Box<Script>,
    hops: Mutex<Vec<Hop>>,
}

impl ScriptedTransport {
    pub fn new<F>(script: F) -> Arc<Self>
    where
        F: Fn(usize, &Hop) -> Reply + Send + Sync + 'static,
    {
        Arc::new(Self {
            script: Box::new(script),
            hops: Mutex::new(Vec::new()),
        })
    }

    pub fn hops(&self) -> Vec<Hop> {
        self.hops.lock().unwrap().clone()
    }

    pub fn calls(&self) -> usize {
        self.hops.lock().unwrap().len()
    }
}

impl Transport for ScriptedTransport {
    fn send(&self, request: Request<Body>) -> BoxFuture<'_, Result<Response<Body>, TransportError>> {
        Box::pin(async move {
            let (parts, body) = request.into_parts();
            let body = axum::body::to_bytes(body, usize::MAX)
                .await
                .map_err(TransportError::new)?;
            let hop = Hop {
                method: parts.method,
                uri: parts.uri.to_string(),
                headers: parts.headers,
                body,
            };

            let reply = {
                let mut hops = self.hops.lock().unwrap();
                hops.push(hop.clone());
                (self.script)(hops.len(), &hop)
            };

            match reply {
                Reply::Respond(response) => Ok(response),
                Reply::Delay(delay, response) => {
                    tokio::time::sleep(delay).await;
                    Ok(response)
                }
                Reply::Fail(reason) => Err(TransportError::new(std::io::Error::new(
                    std::io::ErrorKind::ConnectionRefused,
                    reason,
                ))),
            }
        })
    }
}

/// Build an origin response.
pub fn respond(status: u16, headers: &[(&str, &str)], body: &'static str) -> Response<Body> {
    let mut builder = Response::builder().status(StatusCode::from_u16(status).unwrap());
    for (name, value) in headers {
        builder = builder.header(*name, *value);
    }
    builder.body(Body::from(body)).unwrap()
}

/// Build a redirect response pointing at `location`.
pub fn redirect(status: u16, location: &str) -> Response<Body> {
    Response::builder()
        .status(StatusCode::from_u16(status).unwrap())
        .header("location", location)
        .body(Body::from("redirecting"))
        .unwrap()
}

pub fn upstream(max_redirects: usize, timeout_ms: u64) -> UpstreamConfig {
    UpstreamConfig {
        target_host: TARGET.to_string(),
        max_redirects,
        timeout_ms,
        ..UpstreamConfig::default()
    }
}

/// Build an inbound request the way the server hands it to the relay.
pub fn inbound(method: Method, uri: &str, headers: &[(&str, &str)], body: &'static str) -> InboundRequest {
    let mut builder = Request::builder().method(method).uri(uri);
    for (name, value) in headers {
        builder = builder.header(*name, *value);
    }
    let (parts, ()) = builder.body(()).unwrap().into_parts();
    InboundRequest::from_parts(parts, Bytes::from_static(body.as_bytes()))
}

pub async fn body_text(response: Response<Body>) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

/// Start a real proxy server on an ephemeral port over `transport`.
pub async fn start_proxy(transport: Arc<dyn Transport>, max_redirects: usize) -> (SocketAddr, Shutdown) {
    let mut config = ProxyConfig::default();
    config.listener.bind_address = "127.0.0.1:0".into();
    config.upstream = upstream(max_redirects, 2_000);

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    let server = HttpServer::with_transport(config, transport);
    tokio::spawn(async move {
        let _ = server.run(listener, server_shutdown).await;
    });

    (addr, shutdown)
}

/// A client that never follows redirects itself.
pub fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .no_proxy()
        .redirect(reqwest::redirect::Policy::none())
        .build()
        .unwrap()
}
