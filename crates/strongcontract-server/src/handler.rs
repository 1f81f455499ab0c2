//! Handler errors, handler outputs and the type-erased handler stored in
//! the routing table.
//!
//! A contract handler is an async function of the payload and the request:
//!
//! ```rust,ignore
//! async fn upload(
//!     payload: MultiFormPayload<ImageMeta>,
//!     request: RawRequest,
//! ) -> Result<ResponseAdaptor<Stored>, HandlerError>;
//! ```
//!
//! Registration wraps it, together with its payload extractor, into an
//! [`ErasedHandler`] that takes a [`RawRequest`] and always produces a
//! [`ResponseEnvelope`]. Every failure on the way is rendered as a JSON
//! error envelope, so an erased handler never fails and never panics.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use http::StatusCode;
use strongcontract_core::{ContractError, ContractResponse, ErrorEnvelope, RawBytes};
use strongcontract_extract::{RawRequest, ResponseAdaptor, ResponseEnvelope};

/// Future returned by an [`ErasedHandler`].
pub type BoxedResponse = Pin<Box<dyn Future<Output = ResponseEnvelope> + Send>>;

/// A registered route handler with its extraction and encoding baked in.
pub type ErasedHandler = Arc<dyn Fn(RawRequest) -> BoxedResponse + Send + Sync>;

/// Errors a handler can return.
#[derive(Debug, thiserror::Error)]
pub enum HandlerError {
    /// A contract-level failure, reported with its own status.
    #[error(transparent)]
    Contract(#[from] ContractError),

    /// A failure with a handler-chosen status, such as 404 or 409.
    #[error("{message}")]
    Status {
        /// Status sent to the client.
        status: StatusCode,
        /// Message sent to the client.
        message: String,
    },

    /// Any other failure; reported as 500.
    #[error("Handler error: {0}")]
    Custom(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl HandlerError {
    /// Creates an error with an explicit status.
    pub fn status(status: StatusCode, message: impl Into<String>) -> Self {
        Self::Status {
            status,
            message: message.into(),
        }
    }

    /// Shorthand for a 404.
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::status(StatusCode::NOT_FOUND, message)
    }

    /// Shorthand for a 400.
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::status(StatusCode::BAD_REQUEST, message)
    }

    /// Wraps an arbitrary error.
    pub fn custom(error: impl Into<Box<dyn std::error::Error + Send + Sync>>) -> Self {
        Self::Custom(error.into())
    }

    /// Returns the HTTP status for this error.
    #[must_use]
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Contract(e) => e.status_code(),
            Self::Status { status, .. } => *status,
            Self::Custom(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Returns the machine-readable error code.
    #[must_use]
    pub fn error_code(&self) -> String {
        match self {
            Self::Contract(e) => e.error_code().to_string(),
            Self::Status { status, .. } => status
                .canonical_reason()
                .unwrap_or("ERROR")
                .to_ascii_uppercase()
                .replace([' ', '-'], "_"),
            Self::Custom(_) => "INTERNAL_ERROR".to_string(),
        }
    }

    /// Renders the error as a JSON error response.
    #[must_use]
    pub fn to_response(&self) -> ResponseEnvelope {
        let message = match self {
            Self::Custom(_) => "Internal server error".to_string(),
            other => other.to_string(),
        };
        ResponseEnvelope::error(
            self.status_code(),
            &ErrorEnvelope::new(self.error_code(), message),
        )
    }
}

/// Values a handler may resolve to.
///
/// `Response` ties the output to the contract's declared response type, so
/// a contract can only be registered with a handler that produces it.
pub trait HandlerOutput: Send + 'static {
    /// The contract response type this output encodes.
    type Response;

    /// Encodes the output.
    fn into_response_envelope(self) -> Result<ResponseEnvelope, ContractError>;
}

impl<R> HandlerOutput for ResponseAdaptor<R>
where
    R: ContractResponse + Send + 'static,
{
    type Response = R;

    fn into_response_envelope(self) -> Result<ResponseEnvelope, ContractError> {
        self.into_envelope()
    }
}

/// A prebuilt envelope, for binary downloads that set their own headers.
impl HandlerOutput for ResponseEnvelope {
    type Response = RawBytes;

    fn into_response_envelope(self) -> Result<ResponseEnvelope, ContractError> {
        Ok(self)
    }
}
