//! Network layer subsystem.
//!
//! # Data Flow
//! ```text
//! Relay hop request
//!     → client.rs (Transport trait)
//!     → HyperTransport (pooled HTTPS client)
//!     → Origin
//! ```
//!
//! # Design Decisions
//! - The transport sits behind a trait so the relay runs against a fake in tests
//! - The pool is the only state shared between concurrent requests

pub mod client;

pub use client::{HyperTransport, Transport, TransportError};
