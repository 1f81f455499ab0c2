//! Logging setup for StrongContract services.
//!
//! Everything in the workspace logs through `tracing`. This crate installs
//! the subscriber: an [`EnvFilter`](tracing_subscriber::EnvFilter) built
//! from [`LogConfig::level`] and a JSON, pretty or compact formatter.
//!
//! | Event | Level | Fields |
//! |-------|-------|--------|
//! | route registered | `info` when verbose, else `debug` | `route`, `segments`, `payload` |
//! | request handled | `info` when verbose, else `trace` | `route`, `request` |
//! | payload rejected | `debug` | `route`, `error` |
//! | encode or handler failure | `error` | `route`, `error` |

#![doc(html_root_url = "https://docs.rs/strongcontract-telemetry/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod error;
mod logging;

pub use error::TelemetryError;
pub use logging::{create_env_filter, init_logging, LogConfig, LogFormat};

/// Result alias for telemetry setup.
pub type TelemetryResult<T> = Result<T, TelemetryError>;
