//! Telemetry error types.

use thiserror::Error;

/// Errors raised while setting up logging.
#[derive(Debug, Error)]
pub enum TelemetryError {
    /// The level or filter directive could not be parsed.
    #[error("Invalid log filter '{filter}': {message}")]
    InvalidFilter {
        /// The rejected directive.
        filter: String,
        /// Parser message.
        message: String,
    },

    /// A global subscriber was already installed, or installation failed.
    #[error("Failed to initialize logging: {0}")]
    LoggingInit(String),
}
