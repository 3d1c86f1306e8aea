//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! http::server  → one line per inbound request (remote, method, URI)
//! relay::engine → one line per redirect hop (hop index, resolved URL)
//!               → warning per malformed Location
//! http::server  → one error line per failed relay (kind, cause)
//!     → logging.rs (fmt subscriber on stdout)
//! ```

pub mod logging;
