//! Configuration sections.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use strongcontract_server::{
    RegisterOptions, ServerConfig, DEFAULT_HTTP_ADDR, DEFAULT_MAX_BODY_SIZE,
    DEFAULT_REQUEST_TIMEOUT_SECS, DEFAULT_SHUTDOWN_TIMEOUT_SECS,
};

/// `[server]` section.
///
/// # Example
///
/// ```
/// use strongcontract_config::ServerSection;
///
/// let section = ServerSection {
///     http_addr: "127.0.0.1:3000".to_string(),
///     ..ServerSection::default()
/// };
/// assert_eq!(section.to_server_config().http_addr(), "127.0.0.1:3000");
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct ServerSection {
    /// Bind address (e.g. "0.0.0.0:8080").
    #[serde(default = "default_http_addr")]
    pub http_addr: String,

    /// Graceful shutdown timeout in seconds.
    #[serde(default = "default_shutdown_timeout")]
    pub shutdown_timeout_secs: u64,

    /// Request timeout in milliseconds.
    #[serde(default = "default_request_timeout")]
    pub request_timeout_ms: u64,

    /// Largest request body the server buffers, in bytes.
    #[serde(default = "default_max_body_size")]
    pub max_body_size: usize,

    /// HTTP/1.1 keep-alive.
    #[serde(default = "default_true")]
    pub keep_alive: bool,
}

impl Default for ServerSection {
    fn default() -> Self {
        Self {
            http_addr: default_http_addr(),
            shutdown_timeout_secs: default_shutdown_timeout(),
            request_timeout_ms: default_request_timeout(),
            max_body_size: default_max_body_size(),
            keep_alive: true,
        }
    }
}

impl ServerSection {
    /// Converts the section into the server's runtime configuration.
    #[must_use]
    pub fn to_server_config(&self) -> ServerConfig {
        ServerConfig::builder()
            .http_addr(self.http_addr.clone())
            .shutdown_timeout(Duration::from_secs(self.shutdown_timeout_secs))
            .request_timeout(Duration::from_millis(self.request_timeout_ms))
            .max_body_size(self.max_body_size)
            .keep_alive(self.keep_alive)
            .build()
    }
}

fn default_http_addr() -> String {
    DEFAULT_HTTP_ADDR.to_string()
}

fn default_shutdown_timeout() -> u64 {
    DEFAULT_SHUTDOWN_TIMEOUT_SECS
}

fn default_request_timeout() -> u64 {
    DEFAULT_REQUEST_TIMEOUT_SECS * 1000
}

fn default_max_body_size() -> usize {
    DEFAULT_MAX_BODY_SIZE
}

fn default_true() -> bool {
    true
}

/// `[dispatch]` section: options applied to every route registration.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct DispatchSection {
    /// Log resolved path segments and each request at `info`.
    #[serde(default)]
    pub verbose: bool,
}

impl DispatchSection {
    /// Registration options for `strongcontract_server::register`.
    #[must_use]
    pub const fn register_options(&self) -> RegisterOptions {
        RegisterOptions {
            verbose: self.verbose,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_server_section_default() {
        let section = ServerSection::default();
        assert_eq!(section.http_addr, "0.0.0.0:8080");
        assert_eq!(section.shutdown_timeout_secs, 30);
        assert_eq!(section.request_timeout_ms, 30_000);
        assert_eq!(section.max_body_size, 50 * 1024 * 1024);
        assert!(section.keep_alive);
    }

    #[test]
    fn test_default_section_matches_server_default() {
        assert_eq!(
            ServerSection::default().to_server_config(),
            ServerConfig::default()
        );
    }

    #[test]
    fn test_server_section_deserialize() {
        let toml = r#"
            http_addr = "127.0.0.1:3000"
            request_timeout_ms = 1500
        "#;
        let section: ServerSection = toml::from_str(toml).unwrap();
        assert_eq!(section.http_addr, "127.0.0.1:3000");
        assert_eq!(section.request_timeout_ms, 1500);
        // Defaults applied
        assert_eq!(section.shutdown_timeout_secs, 30);

        let config = section.to_server_config();
        assert_eq!(config.request_timeout(), Duration::from_millis(1500));
    }

    #[test]
    fn test_server_section_unknown_field_rejected() {
        let toml = r#"
            http_addr = "127.0.0.1:3000"
            max_connections = 10
        "#;
        let result: Result<ServerSection, _> = toml::from_str(toml);
        assert!(result.is_err());
    }

    #[test]
    fn test_dispatch_section() {
        let section: DispatchSection = toml::from_str("verbose = true").unwrap();
        assert!(section.register_options().verbose);
        assert_eq!(
            DispatchSection::default().register_options(),
            RegisterOptions::default()
        );
    }
}
