//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Check the origin host forms a valid `https://` authority
//! - Validate value ranges (timeouts > 0, body limit > 0)
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: ProxyConfig → Result<(), Vec<ValidationError>>
//! - `max_redirects = 0` is accepted; every request then fails with 502

use std::net::SocketAddr;

use url::{Host, Url};

use crate::config::schema::ProxyConfig;

/// A single semantic problem in the configuration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("upstream.target_host is empty")]
    EmptyTargetHost,
    #[error("upstream.target_host {0:?} is not a host[:port]")]
    InvalidTargetHost(String),
    #[error("listener.bind_address {0:?} is not a host:port")]
    InvalidBindAddress(String),
    #[error("upstream.timeout_ms must be greater than zero")]
    ZeroTimeout,
    #[error("listener.max_body_bytes must be greater than zero")]
    ZeroBodyLimit,
}

pub fn validate_config(config: &ProxyConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    let target = config.upstream.target_host.as_str();
    if target.trim().is_empty() {
        errors.push(ValidationError::EmptyTargetHost);
    } else if target.trim() != target || !is_bare_authority(target) {
        errors.push(ValidationError::InvalidTargetHost(target.to_string()));
    }

    if !is_bind_address(&config.listener.bind_address) {
        errors.push(ValidationError::InvalidBindAddress(
            config.listener.bind_address.clone(),
        ));
    }

    if config.upstream.timeout_ms == 0 {
        errors.push(ValidationError::ZeroTimeout);
    }

    if config.listener.max_body_bytes == 0 {
        errors.push(ValidationError::ZeroBodyLimit);
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// True for `ip:port` or `hostname:port`. Names are not resolved here; the
/// listener bind does that.
fn is_bind_address(addr: &str) -> bool {
    if addr.parse::<SocketAddr>().is_ok() {
        return true;
    }
    match addr.rsplit_once(':') {
        Some((host, port)) => port.parse::<u16>().is_ok() && Host::parse(host).is_ok(),
        None => false,
    }
}

/// True for `host` or `host:port` with nothing else attached.
fn is_bare_authority(host: &str) -> bool {
    match Url::parse(&format!("https://{host}")) {
        Ok(url) => {
            url.host_str().is_some()
                && url.username().is_empty()
                && url.password().is_none()
                && url.path() == "/"
                && url.query().is_none()
                && url.fragment().is_none()
                && !host.ends_with('/')
        }
        Err(_) => false,
    }
}
