//! Typed configuration for StrongContract services.
//!
//! - TOML and JSON configuration files
//! - Environment variable overrides
//! - Strict parsing (unknown fields are errors)
//! - Layered loading (defaults → file → env)
//!
//! [`StrongContractConfig`] has three sections:
//!
//! - [`ServerSection`]: bind address, timeouts, body cap, keep-alive
//! - [`DispatchSection`]: verbose route logging
//! - [`LogConfig`]: subscriber setup for `strongcontract-telemetry`
//!
//! # Example
//!
//! ```no_run
//! use strongcontract_config::ConfigLoader;
//!
//! # fn main() -> Result<(), strongcontract_config::ConfigError> {
//! let config = ConfigLoader::new()
//!     .with_optional_file("strongcontract.toml")?
//!     .with_env_prefix("STRONGCONTRACT")
//!     .load()?;
//!
//! let server_config = config.server_config();
//! let options = config.register_options();
//! # let _ = (server_config, options);
//! # Ok(())
//! # }
//! ```
//!
//! # File format
//!
//! ```toml
//! [server]
//! http_addr = "0.0.0.0:8080"
//! shutdown_timeout_secs = 30
//! request_timeout_ms = 30000
//! max_body_size = 52428800
//! keep_alive = true
//!
//! [dispatch]
//! verbose = false
//!
//! [logging]
//! level = "info,strongcontract_server=debug"
//! format = "json"
//! ```
//!
//! # Environment overrides
//!
//! `PREFIX__SECTION__KEY`, e.g. `STRONGCONTRACT__SERVER__MAX_BODY_SIZE=1048576`
//! or `STRONGCONTRACT__LOGGING__FORMAT=pretty`. Unknown keys are ignored.

#![doc(html_root_url = "https://docs.rs/strongcontract-config/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod config;
mod error;
mod loader;
mod schema;

pub use config::StrongContractConfig;
pub use error::ConfigError;
pub use loader::ConfigLoader;
pub use schema::{DispatchSection, ServerSection};
pub use strongcontract_telemetry::{LogConfig, LogFormat};
