//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, catch-all handler)
//!     → request.rs (buffer body into InboundRequest)
//!     → relay (redirect-following hop loop)
//!     → terminal response streamed to the client
//!       or response.rs (opaque 502)
//! ```

pub mod request;
pub mod response;
pub mod server;

pub use server::{AppState, HttpServer};
