//! redirect-proxy
//!
//! A reverse proxy to one fixed HTTPS origin that chases 3xx responses on
//! the client's behalf.
//!
//! # Architecture Overview
//!
//! ```text
//!                      ┌──────────────────────────────────────────────────┐
//!                      │                  REDIRECT PROXY                   │
//!   Client Request     │  ┌─────────┐   ┌──────────┐   ┌──────────────┐   │
//!   ───────────────────┼─▶│  http   │──▶│  relay   │──▶│     net      │───┼──▶ Origin
//!                      │  │ server  │   │ hop loop │   │  transport   │   │   (HTTPS)
//!                      │  └─────────┘   └────┬─────┘   └──────────────┘   │
//!   Client Response    │       ▲             │  3xx + Location: next hop  │
//!   ◀──────────────────┼───────┘◀────────────┘  otherwise: terminal       │
//!                      │                                                   │
//!                      │  security::headers strips hop-by-hop fields on    │
//!                      │  every hop request and on the terminal response   │
//!                      └──────────────────────────────────────────────────┘
//! ```

use clap::Parser;
use tokio::net::TcpListener;

use redirect_proxy::config::Cli;
use redirect_proxy::lifecycle::{signals, Shutdown};
use redirect_proxy::observability::logging;
use redirect_proxy::HttpServer;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = Cli::parse().into_config()?;
    logging::init(&config.observability);

    tracing::info!(
        listen = %config.listener.bind_address,
        target = %config.upstream.target_host,
        timeout_ms = config.upstream.timeout_ms,
        max_redirects = config.upstream.max_redirects,
        "Proxy started"
    );

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    let server = HttpServer::new(config)?;

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    let mut server_task = tokio::spawn(async move { server.run(listener, server_shutdown).await });

    tokio::select! {
        result = &mut server_task => result??,
        _ = signals::wait() => {
            shutdown.trigger();
            server_task.await??;
        }
    }

    tracing::info!("Shutdown complete");
    Ok(())
}
