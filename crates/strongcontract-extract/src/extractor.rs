//! Payload extraction strategies.
//!
//! A route picks one [`PayloadExtractor`] at registration time. The
//! extractor turns the buffered [`RawRequest`] into the contract's payload
//! type, or fails with a [`ContractError`] that is reported to the client.
//!
//! | Strategy | Payload | Body handling |
//! |----------|---------|---------------|
//! | [`EmptyPayload`] | [`Empty`] | never read |
//! | [`RawPayload`] | [`RawBytes`] | passed through, empty when absent |
//! | [`JsonPayload<T>`] | `T` | decoded as JSON |
//! | [`OptionalJsonPayload<T>`] | `Option<T>` | `None` when absent, JSON otherwise |
//! | [`MultipartPayload<M>`] | [`MultiFormPayload<M>`] | `metaData` and `file` fields |

use std::fmt;
use std::marker::PhantomData;

use bytes::Bytes;
use mime::Mime;
use serde::de::DeserializeOwned;
use strongcontract_core::{ContractError, Empty, HasFormat, MultiFormPayload, RawBytes};

use crate::multipart::{
    boundary_from_content_type, extract_field, extract_field_exact, FILE_FIELD, META_DATA_FIELD,
};
use crate::RawRequest;

/// Default maximum body size for JSON payloads (1 MiB).
pub const DEFAULT_JSON_LIMIT: usize = 1024 * 1024;

/// Default maximum body size for multipart payloads (50 MiB).
pub const DEFAULT_MULTIPART_LIMIT: usize = 50 * 1024 * 1024;

/// The payload family a strategy produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PayloadKind {
    /// No payload; the body is ignored.
    Empty,
    /// A JSON-decoded payload.
    Json,
    /// Metadata plus bytes from a multipart body.
    Multipart,
    /// The body bytes, untouched.
    Raw,
}

impl fmt::Display for PayloadKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Empty => "empty",
            Self::Json => "json",
            Self::Multipart => "multipart",
            Self::Raw => "raw",
        })
    }
}

/// Turns a request into a typed payload.
///
/// Extraction is a pure read of the request. It is never retried.
pub trait PayloadExtractor: Send + Sync + 'static {
    /// The payload handed to the handler.
    type Payload: Send + 'static;

    /// The payload family, used for logging and bodiless-verb checks.
    fn kind(&self) -> PayloadKind;

    /// Extracts the payload.
    fn extract(&self, request: &RawRequest) -> Result<Self::Payload, ContractError>;
}

/// How a declared `Content-Type` is treated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BodyFormat {
    /// `application/json`, `*/*+json`, or no content type at all.
    Json,
    /// `multipart/*`, with its boundary if one was declared.
    Multipart {
        /// The `boundary` parameter.
        boundary: Option<String>,
    },
    /// Anything else.
    Other(String),
}

impl BodyFormat {
    /// Classifies the request's declared content type.
    #[must_use]
    pub fn of(request: &RawRequest) -> Self {
        let Some(content_type) = request.content_type() else {
            return Self::Json;
        };
        match content_type.parse::<Mime>() {
            Ok(mime) if mime.type_() == mime::MULTIPART => Self::Multipart {
                boundary: boundary_from_content_type(content_type),
            },
            Ok(mime) if mime.subtype() == mime::JSON || mime.suffix() == Some(mime::JSON) => {
                Self::Json
            }
            _ => Self::Other(content_type.to_string()),
        }
    }
}

fn required_body(request: &RawRequest, limit: usize) -> Result<&Bytes, ContractError> {
    let body = request.body().ok_or(ContractError::BodyAbsent)?;
    if body.len() > limit {
        return Err(ContractError::PayloadTooLarge {
            max: limit,
            actual: body.len(),
        });
    }
    Ok(body)
}

fn decode_json<T: DeserializeOwned>(
    request: &RawRequest,
    limit: usize,
) -> Result<T, ContractError> {
    let body = required_body(request, limit)?;
    serde_json::from_slice(body).map_err(|e| ContractError::decode("body", e))
}

/// Strategy for contracts without a payload.
#[derive(Debug, Clone, Copy, Default)]
pub struct EmptyPayload;

impl PayloadExtractor for EmptyPayload {
    type Payload = Empty;

    fn kind(&self) -> PayloadKind {
        PayloadKind::Empty
    }

    fn extract(&self, _request: &RawRequest) -> Result<Empty, ContractError> {
        Ok(Empty {})
    }
}

/// Strategy that hands the body bytes to the handler untouched.
///
/// An absent body yields empty bytes rather than an error.
#[derive(Debug, Clone, Copy, Default)]
pub struct RawPayload;

impl PayloadExtractor for RawPayload {
    type Payload = RawBytes;

    fn kind(&self) -> PayloadKind {
        PayloadKind::Raw
    }

    fn extract(&self, request: &RawRequest) -> Result<RawBytes, ContractError> {
        Ok(RawBytes(request.body().cloned().unwrap_or_default()))
    }
}

/// Strategy that decodes the whole body as JSON.
///
/// The declared content type is not checked, so a JSON body sent as
/// `application/x-www-form-urlencoded` still decodes.
///
/// ```rust
/// use strongcontract_extract::{JsonPayload, PayloadExtractor, RawRequest};
/// use http::Method;
///
/// #[derive(serde::Deserialize)]
/// struct Greeting {
///     message: String,
/// }
///
/// let request = RawRequest::builder()
///     .method(Method::POST)
///     .header("content-type", "application/json")
///     .body(r#"{"message":"hi"}"#)
///     .build();
///
/// let greeting = JsonPayload::<Greeting>::new().extract(&request).unwrap();
/// assert_eq!(greeting.message, "hi");
/// ```
pub struct JsonPayload<T> {
    max_body_size: usize,
    _payload: PhantomData<fn() -> T>,
}

impl<T> JsonPayload<T> {
    /// Creates the strategy with the default 1 MiB limit.
    #[must_use]
    pub fn new() -> Self {
        Self::with_limit(DEFAULT_JSON_LIMIT)
    }

    /// Creates the strategy with a custom body limit.
    #[must_use]
    pub fn with_limit(max_body_size: usize) -> Self {
        Self {
            max_body_size,
            _payload: PhantomData,
        }
    }

    /// Returns the body limit.
    #[must_use]
    pub fn max_body_size(&self) -> usize {
        self.max_body_size
    }
}

impl<T> Default for JsonPayload<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Clone for JsonPayload<T> {
    fn clone(&self) -> Self {
        Self::with_limit(self.max_body_size)
    }
}

impl<T> fmt::Debug for JsonPayload<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JsonPayload")
            .field("max_body_size", &self.max_body_size)
            .finish()
    }
}

impl<T: DeserializeOwned + Send + 'static> PayloadExtractor for JsonPayload<T> {
    type Payload = T;

    fn kind(&self) -> PayloadKind {
        PayloadKind::Json
    }

    fn extract(&self, request: &RawRequest) -> Result<T, ContractError> {
        decode_json(request, self.max_body_size)
    }
}

/// Strategy that decodes a JSON body when one is sent.
///
/// Used by download routes, whose payload is optional.
pub struct OptionalJsonPayload<T> {
    inner: JsonPayload<T>,
}

impl<T> OptionalJsonPayload<T> {
    /// Creates the strategy with the default 1 MiB limit.
    #[must_use]
    pub fn new() -> Self {
        Self {
            inner: JsonPayload::new(),
        }
    }

    /// Creates the strategy with a custom body limit.
    #[must_use]
    pub fn with_limit(max_body_size: usize) -> Self {
        Self {
            inner: JsonPayload::with_limit(max_body_size),
        }
    }
}

impl<T> Default for OptionalJsonPayload<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> fmt::Debug for OptionalJsonPayload<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OptionalJsonPayload")
            .field("max_body_size", &self.inner.max_body_size)
            .finish()
    }
}

impl<T: DeserializeOwned + Send + 'static> PayloadExtractor for OptionalJsonPayload<T> {
    type Payload = Option<T>;

    fn kind(&self) -> PayloadKind {
        PayloadKind::Json
    }

    fn extract(&self, request: &RawRequest) -> Result<Option<T>, ContractError> {
        if request.has_body() {
            self.inner.extract(request).map(Some)
        } else {
            Ok(None)
        }
    }
}

/// Strategy for uploads: JSON metadata plus a byte blob.
///
/// For `multipart/*` bodies the metadata is read from the `metaData` field
/// and the bytes from the `file` field. Any other body is decoded as JSON
/// into the metadata alone, with empty bytes.
pub struct MultipartPayload<M> {
    max_body_size: usize,
    _meta: PhantomData<fn() -> M>,
}

impl<M> MultipartPayload<M> {
    /// Creates the strategy with the default 50 MiB limit.
    #[must_use]
    pub fn new() -> Self {
        Self::with_limit(DEFAULT_MULTIPART_LIMIT)
    }

    /// Creates the strategy with a custom body limit.
    #[must_use]
    pub fn with_limit(max_body_size: usize) -> Self {
        Self {
            max_body_size,
            _meta: PhantomData,
        }
    }
}

impl<M> Default for MultipartPayload<M> {
    fn default() -> Self {
        Self::new()
    }
}

impl<M> fmt::Debug for MultipartPayload<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MultipartPayload")
            .field("max_body_size", &self.max_body_size)
            .finish()
    }
}

impl<M> PayloadExtractor for MultipartPayload<M>
where
    M: DeserializeOwned + HasFormat + Send + 'static,
{
    type Payload = MultiFormPayload<M>;

    fn kind(&self) -> PayloadKind {
        PayloadKind::Multipart
    }

    fn extract(&self, request: &RawRequest) -> Result<MultiFormPayload<M>, ContractError> {
        let body = required_body(request, self.max_body_size)?;

        let BodyFormat::Multipart { boundary } = BodyFormat::of(request) else {
            let meta_data =
                serde_json::from_slice(body).map_err(|e| ContractError::decode("body", e))?;
            return Ok(MultiFormPayload::new(meta_data, Bytes::new()));
        };

        let meta = extract_field(body, boundary.as_deref(), META_DATA_FIELD)
            .ok_or_else(|| ContractError::missing_field(META_DATA_FIELD))?;
        let meta_data =
            serde_json::from_slice(meta).map_err(|e| ContractError::decode(META_DATA_FIELD, e))?;

        let file = extract_field_exact(body, boundary.as_deref(), FILE_FIELD)
            .ok_or_else(|| ContractError::missing_field(FILE_FIELD))?;

        Ok(MultiFormPayload::new(meta_data, body.slice_ref(file)))
    }
}
