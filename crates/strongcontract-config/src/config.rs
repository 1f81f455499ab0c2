//! The top-level [`StrongContractConfig`].

use std::net::SocketAddr;

use serde::{Deserialize, Serialize};
use strongcontract_server::{RegisterOptions, ServerConfig};
use strongcontract_telemetry::{create_env_filter, LogConfig};

use crate::{ConfigError, DispatchSection, ServerSection};

/// Complete service configuration.
///
/// Use [`ConfigLoader`](crate::ConfigLoader) to layer files and environment
/// variables over the defaults.
///
/// # Example
///
/// ```
/// use strongcontract_config::StrongContractConfig;
///
/// let config = StrongContractConfig::default();
/// assert_eq!(config.server.http_addr, "0.0.0.0:8080");
/// assert!(!config.dispatch.verbose);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(deny_unknown_fields)]
pub struct StrongContractConfig {
    /// HTTP server settings.
    #[serde(default)]
    pub server: ServerSection,

    /// Route registration settings.
    #[serde(default)]
    pub dispatch: DispatchSection,

    /// Logging settings.
    #[serde(default)]
    pub logging: LogConfig,
}

impl StrongContractConfig {
    /// Verbose dispatch, debug logging, pretty output, bound to localhost.
    #[must_use]
    pub fn development() -> Self {
        Self {
            server: ServerSection {
                http_addr: "127.0.0.1:8080".to_string(),
                shutdown_timeout_secs: 5,
                ..ServerSection::default()
            },
            dispatch: DispatchSection { verbose: true },
            logging: LogConfig::development(),
        }
    }

    /// Quiet dispatch, JSON logs at `info`.
    #[must_use]
    pub fn production() -> Self {
        Self {
            logging: LogConfig::production(),
            ..Self::default()
        }
    }

    /// Runtime configuration for `strongcontract_server::Server`.
    #[must_use]
    pub fn server_config(&self) -> ServerConfig {
        self.server.to_server_config()
    }

    /// Options to pass to every route registration.
    #[must_use]
    pub const fn register_options(&self) -> RegisterOptions {
        self.dispatch.register_options()
    }

    /// Checks values that deserialize fine but cannot be used.
    ///
    /// # Errors
    ///
    /// - `server.http_addr` is not a socket address
    /// - `server.request_timeout_ms` or `server.max_body_size` is zero
    /// - `logging.level` is not a valid filter directive
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.server.http_addr.parse::<SocketAddr>().is_err() {
            return Err(ConfigError::invalid_value(
                "server.http_addr",
                format!("invalid socket address: {}", self.server.http_addr),
            ));
        }

        if self.server.request_timeout_ms == 0 {
            return Err(ConfigError::invalid_value(
                "server.request_timeout_ms",
                "must be greater than zero",
            ));
        }

        if self.server.max_body_size == 0 {
            return Err(ConfigError::invalid_value(
                "server.max_body_size",
                "must be greater than zero",
            ));
        }

        if self.logging.enabled {
            if let Err(e) = create_env_filter(&self.logging.level) {
                return Err(ConfigError::invalid_value("logging.level", e.to_string()));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use strongcontract_telemetry::LogFormat;

    #[test]
    fn test_default_is_valid() {
        assert!(StrongContractConfig::default().validate().is_ok());
        assert!(StrongContractConfig::development().validate().is_ok());
        assert!(StrongContractConfig::production().validate().is_ok());
    }

    #[test]
    fn test_development_preset() {
        let config = StrongContractConfig::development();
        assert!(config.register_options().verbose);
        assert_eq!(config.logging.format, LogFormat::Pretty);
        assert_eq!(config.server_config().shutdown_timeout(), Duration::from_secs(5));
    }

    #[test]
    fn test_production_preset() {
        let config = StrongContractConfig::production();
        assert!(!config.register_options().verbose);
        assert_eq!(config.logging.format, LogFormat::Json);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_invalid_addr() {
        let mut config = StrongContractConfig::default();
        config.server.http_addr = "localhost".to_string();
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidValue { ref field, .. }) if field == "server.http_addr"
        ));
    }

    #[test]
    fn test_zero_body_size() {
        let mut config = StrongContractConfig::default();
        config.server.max_body_size = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_invalid_log_level() {
        let mut config = StrongContractConfig::default();
        config.logging.level = "strongcontract=loud".to_string();
        assert!(config.validate().is_err());

        config.logging.enabled = false;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_unknown_section_rejected() {
        let result: Result<StrongContractConfig, _> = toml::from_str("[telemetry]\nenabled = true");
        assert!(result.is_err());
    }
}
