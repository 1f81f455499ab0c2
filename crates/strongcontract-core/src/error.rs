//! Error types for StrongContract.
//!
//! [`ContractError`] is the single error taxonomy shared by registration,
//! payload extraction and response encoding. Every variant maps to an HTTP
//! status code and a machine-readable code so the server can render it as a
//! JSON error envelope:
//!
//! | Variant | Status | Code |
//! |---|---|---|
//! | `Configuration` | 500 | `CONFIGURATION_ERROR` |
//! | `MissingField` | 400 | `MISSING_FIELD` |
//! | `DecodeFailure` | 400 | `DECODE_FAILURE` |
//! | `EncodeFailure` | 500 | `ENCODE_FAILURE` |
//! | `BodyAbsent` | 400 | `BODY_ABSENT` |
//! | `PayloadTooLarge` | 413 | `PAYLOAD_TOO_LARGE` |

use http::StatusCode;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias using [`ContractError`].
pub type ContractResult<T> = Result<T, ContractError>;

/// Errors raised while registering, extracting or encoding a contract.
///
/// # Example
///
/// ```
/// use strongcontract_core::ContractError;
/// use http::StatusCode;
///
/// let error = ContractError::missing_field("metaData");
/// assert_eq!(error.reason(), "Missing 'metaData' in form-data");
/// assert_eq!(error.status_code(), StatusCode::BAD_REQUEST);
/// ```
#[derive(Error, Debug)]
pub enum ContractError {
    /// The contract cannot be registered as declared.
    ///
    /// Raised at registration time, never per request.
    #[error("Configuration error: {message}")]
    Configuration {
        /// Human-readable error message.
        message: String,
    },

    /// A required multipart field is not present in the body.
    #[error("Missing '{name}' in form-data")]
    MissingField {
        /// The name of the missing field.
        name: String,
    },

    /// Structured decoding of a body or of a multipart field failed.
    #[error("Failed to decode {subject}: {source}")]
    DecodeFailure {
        /// What was being decoded (`body`, `metaData`, ...).
        subject: &'static str,
        /// The underlying decoder error.
        #[source]
        source: serde_json::Error,
    },

    /// Encoding the response value failed.
    #[error("Failed to encode response: {source}")]
    EncodeFailure {
        /// The underlying encoder error.
        #[source]
        source: serde_json::Error,
    },

    /// The route requires a body but none was sent.
    #[error("Request body is required but was absent")]
    BodyAbsent,

    /// The body exceeds the configured limit.
    #[error("Payload too large: {actual} bytes exceeds limit of {max} bytes")]
    PayloadTooLarge {
        /// Maximum number of bytes accepted.
        max: usize,
        /// Number of bytes received.
        actual: usize,
    },
}

impl ContractError {
    /// Creates a configuration error.
    #[must_use]
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Creates a missing field error.
    #[must_use]
    pub fn missing_field(name: impl Into<String>) -> Self {
        Self::MissingField { name: name.into() }
    }

    /// Creates a decode failure for the given subject.
    #[must_use]
    pub fn decode(subject: &'static str, source: serde_json::Error) -> Self {
        Self::DecodeFailure { subject, source }
    }

    /// Creates an encode failure.
    #[must_use]
    pub fn encode(source: serde_json::Error) -> Self {
        Self::EncodeFailure { source }
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        match self {
            Self::Configuration { .. } | Self::EncodeFailure { .. } => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            Self::MissingField { .. } | Self::DecodeFailure { .. } | Self::BodyAbsent => {
                StatusCode::BAD_REQUEST
            }
            Self::PayloadTooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
        }
    }

    /// Returns a machine-readable error code.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::Configuration { .. } => "CONFIGURATION_ERROR",
            Self::MissingField { .. } => "MISSING_FIELD",
            Self::DecodeFailure { .. } => "DECODE_FAILURE",
            Self::EncodeFailure { .. } => "ENCODE_FAILURE",
            Self::BodyAbsent => "BODY_ABSENT",
            Self::PayloadTooLarge { .. } => "PAYLOAD_TOO_LARGE",
        }
    }

    /// Returns the human-readable reason sent to the client.
    #[must_use]
    pub fn reason(&self) -> String {
        self.to_string()
    }

    /// Returns `true` if the failure is attributable to the client.
    #[must_use]
    pub fn is_client_error(&self) -> bool {
        self.status_code().is_client_error()
    }

    /// Converts this error to a serializable error envelope.
    #[must_use]
    pub fn to_envelope(&self) -> ErrorEnvelope {
        ErrorEnvelope::new(self.error_code(), self.reason())
    }
}

/// Serializable error envelope for HTTP responses.
///
/// Rendered as `{"error":{"code":"..","message":".."}}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorEnvelope {
    /// The error details.
    pub error: ErrorDetail,
}

impl ErrorEnvelope {
    /// Creates an envelope from a code and a message.
    #[must_use]
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            error: ErrorDetail {
                code: code.into(),
                message: message.into(),
            },
        }
    }
}

/// Error detail within an envelope.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorDetail {
    /// Machine-readable error code.
    pub code: String,
    /// Human-readable error message.
    pub message: String,
}
