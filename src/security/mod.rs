//! Security subsystem.
//!
//! # Data Flow
//! ```text
//! Inbound headers
//!     → headers.rs (strip hop-by-hop) → upstream hop request
//!
//! Terminal upstream response
//!     → headers.rs (strip hop-by-hop) → client
//! ```

pub mod headers;

pub use headers::sanitize;
