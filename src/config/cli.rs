//! Command line flags.
//!
//! Precedence: flags, then the optional `--config` file, then defaults.
//! The merged result is validated once.

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;

use crate::config::loader::{read_config, ConfigError};
use crate::config::schema::ProxyConfig;
use crate::config::validation::validate_config;

/// Reverse proxy to a single HTTPS origin that follows redirects itself.
#[derive(Debug, Parser)]
#[command(name = "redirect-proxy", version)]
pub struct Cli {
    /// TOML configuration file.
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Origin host to proxy to.
    #[arg(short, long)]
    pub target: Option<String>,

    /// Address to listen on (":9999" binds every interface).
    #[arg(short, long)]
    pub listen: Option<String>,

    /// Timeout for each origin request (e.g. "30s", "500ms").
    #[arg(long, value_parser = humantime::parse_duration)]
    pub timeout: Option<Duration>,

    /// Maximum redirects to follow per request.
    #[arg(long = "max-redirects", alias = "maxredir")]
    pub max_redirects: Option<usize>,

    /// Timestamps and targets in log lines.
    #[arg(short, long, value_name = "BOOL")]
    pub verbose: Option<bool>,
}

impl Cli {
    /// Merge flags over the file (if any) and defaults, then validate.
    pub fn into_config(self) -> Result<ProxyConfig, ConfigError> {
        let mut config = match &self.config {
            Some(path) => read_config(path)?,
            None => ProxyConfig::default(),
        };

        if let Some(target) = self.target {
            config.upstream.target_host = target;
        }
        if let Some(listen) = self.listen {
            config.listener.bind_address = normalize_listen(&listen);
        }
        if let Some(timeout) = self.timeout {
            config.upstream.timeout_ms = u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX);
        }
        if let Some(max) = self.max_redirects {
            config.upstream.max_redirects = max;
        }
        if let Some(verbose) = self.verbose {
            config.observability.verbose = verbose;
        }

        validate_config(&config).map_err(ConfigError::Validation)?;
        Ok(config)
    }
}

/// Expand the port-only form into a wildcard bind address.
fn normalize_listen(listen: &str) -> String {
    match listen.strip_prefix(':') {
        Some(port) => format!("0.0.0.0:{port}"),
        None => listen.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_flags_gives_defaults() {
        let cli = Cli::parse_from(["redirect-proxy"]);
        assert_eq!(cli.into_config().unwrap(), ProxyConfig::default());
    }

    #[test]
    fn test_flags_override_defaults() {
        let cli = Cli::parse_from([
            "redirect-proxy",
            "--target",
            "origin.example.com",
            "--listen",
            ":8080",
            "--timeout",
            "2s 500ms",
            "--max-redirects",
            "4",
            "--verbose",
            "false",
        ]);

        let config = cli.into_config().unwrap();
        assert_eq!(config.upstream.target_host, "origin.example.com");
        assert_eq!(config.listener.bind_address, "0.0.0.0:8080");
        assert_eq!(config.upstream.timeout_ms, 2500);
        assert_eq!(config.upstream.max_redirects, 4);
        assert!(!config.observability.verbose);
    }

    #[test]
    fn test_flags_override_file() {
        use std::io::Write;

        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            "[upstream]\ntarget_host = \"file.example.com\"\nmax_redirects = 2\n"
        )
        .unwrap();

        let args: Vec<std::ffi::OsString> = vec![
            "redirect-proxy".into(),
            "--config".into(),
            file.path().as_os_str().to_owned(),
            "--max-redirects".into(),
            "7".into(),
        ];
        let cli = Cli::parse_from(args);

        let config = cli.into_config().unwrap();
        assert_eq!(config.upstream.target_host, "file.example.com");
        assert_eq!(config.upstream.max_redirects, 7);
    }

    #[test]
    fn test_invalid_merge_is_rejected() {
        let cli = Cli::parse_from(["redirect-proxy", "--target", "bad host"]);
        assert!(matches!(cli.into_config(), Err(ConfigError::Validation(_))));
    }

    #[test]
    fn test_normalize_listen() {
        assert_eq!(normalize_listen(":9999"), "0.0.0.0:9999");
        assert_eq!(normalize_listen("127.0.0.1:9999"), "127.0.0.1:9999");
    }
}
