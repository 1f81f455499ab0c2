//! Response adaptation.
//!
//! A handler returns a [`ResponseAdaptor`]: the typed response value plus
//! the status, HTTP version and headers to send it with. Turning it into a
//! [`ResponseEnvelope`] encodes the value:
//!
//! - structured values go through `serde_json`;
//! - [`RawBytes`](strongcontract_core::RawBytes) is written as-is, never
//!   wrapped or escaped.
//!
//! `Content-Length` is set last, from the final body, whatever headers the
//! handler supplied.
//!
//! # Example
//!
//! ```rust
//! use strongcontract_extract::ResponseAdaptor;
//! use http::{header, StatusCode};
//!
//! #[derive(serde::Serialize)]
//! struct Greeting {
//!     message: String,
//! }
//! impl strongcontract_core::ContractResponse for Greeting {}
//!
//! let envelope = ResponseAdaptor::new(Greeting { message: "hi".into() })
//!     .status(StatusCode::CREATED)
//!     .into_envelope()
//!     .unwrap();
//!
//! assert_eq!(envelope.status(), StatusCode::CREATED);
//! assert_eq!(envelope.body().as_ref(), br#"{"message":"hi"}"#);
//! assert_eq!(envelope.headers()[header::CONTENT_LENGTH], "16");
//! ```

use bytes::Bytes;
use http::header::{self, HeaderMap, HeaderName, HeaderValue};
use http::{Response, StatusCode, Version};
use strongcontract_core::{ContractError, ContractResponse, ErrorEnvelope, ResponseKind};

/// Returns `Content-Type: application/json`.
#[must_use]
pub fn default_json_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static("application/json"),
    );
    headers
}

/// A typed response value with its status, version and headers.
#[derive(Debug, Clone)]
pub struct ResponseAdaptor<R> {
    value: R,
    status: StatusCode,
    version: Version,
    headers: HeaderMap,
    pretty: bool,
}

impl<R> ResponseAdaptor<R> {
    /// Wraps a value with `200 OK`, HTTP/1.1 and a JSON content type.
    #[must_use]
    pub fn new(value: R) -> Self {
        Self {
            value,
            status: StatusCode::OK,
            version: Version::HTTP_11,
            headers: default_json_headers(),
            pretty: false,
        }
    }

    /// Wraps binary content with `Content-Type: application/octet-stream`.
    #[must_use]
    pub fn binary(value: R) -> Self {
        Self::new(value).header(
            header::CONTENT_TYPE,
            HeaderValue::from_static("application/octet-stream"),
        )
    }

    /// Sets the status code.
    #[must_use]
    pub fn status(mut self, status: StatusCode) -> Self {
        self.status = status;
        self
    }

    /// Sets the HTTP version.
    #[must_use]
    pub fn version(mut self, version: Version) -> Self {
        self.version = version;
        self
    }

    /// Replaces the whole header set.
    #[must_use]
    pub fn headers(mut self, headers: HeaderMap) -> Self {
        self.headers = headers;
        self
    }

    /// Sets one header, replacing any previous value.
    #[must_use]
    pub fn header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }

    /// Encodes structured values as indented JSON.
    #[must_use]
    pub fn pretty(mut self) -> Self {
        self.pretty = true;
        self
    }

    /// Returns the wrapped value.
    #[must_use]
    pub fn value(&self) -> &R {
        &self.value
    }

    /// Returns the status code.
    #[must_use]
    pub fn status_code(&self) -> StatusCode {
        self.status
    }
}

impl<R: ContractResponse> ResponseAdaptor<R> {
    /// Encodes the value into a wire-ready envelope.
    ///
    /// Fails with [`ContractError::EncodeFailure`] when the encoder rejects
    /// the value; the encoder error stays reachable through `source()`.
    pub fn into_envelope(self) -> Result<ResponseEnvelope, ContractError> {
        let body = match self.value.into_kind() {
            ResponseKind::RawBytes(bytes) => bytes,
            ResponseKind::Structured(value) => {
                let encoded = if self.pretty {
                    serde_json::to_vec_pretty(&value)
                } else {
                    serde_json::to_vec(&value)
                };
                Bytes::from(encoded.map_err(ContractError::encode)?)
            }
        };
        Ok(ResponseEnvelope::new(
            self.status,
            self.version,
            self.headers,
            body,
        ))
    }
}

/// A fully resolved response: status, version, headers and body.
///
/// The `Content-Length` header always equals the body length.
#[derive(Debug, Clone)]
pub struct ResponseEnvelope {
    status: StatusCode,
    version: Version,
    headers: HeaderMap,
    body: Bytes,
    suppress_body: bool,
}

impl ResponseEnvelope {
    /// Builds an envelope, setting `Content-Length` from `body`.
    #[must_use]
    pub fn new(status: StatusCode, version: Version, headers: HeaderMap, body: Bytes) -> Self {
        let mut envelope = Self {
            status,
            version,
            headers,
            body,
            suppress_body: false,
        };
        envelope.finalize();
        envelope
    }

    /// Builds an HTTP/1.1 envelope with JSON headers.
    #[must_use]
    pub fn json(status: StatusCode, body: impl Into<Bytes>) -> Self {
        Self::new(status, Version::HTTP_11, default_json_headers(), body.into())
    }

    /// Renders an error as `{"error":{"code":..,"message":..}}`.
    #[must_use]
    pub fn from_error(error: &ContractError) -> Self {
        Self::error(error.status_code(), &error.to_envelope())
    }

    /// Renders an error envelope with the given status.
    #[must_use]
    pub fn error(status: StatusCode, envelope: &ErrorEnvelope) -> Self {
        let body = serde_json::to_vec(envelope).map_or_else(
            |_| Bytes::from_static(br#"{"error":{"code":"INTERNAL_ERROR","message":"error"}}"#),
            Bytes::from,
        );
        Self::json(status, body)
    }

    fn finalize(&mut self) {
        self.headers
            .insert(header::CONTENT_LENGTH, HeaderValue::from(self.body.len()));
    }

    /// Returns the status code.
    #[must_use]
    pub fn status(&self) -> StatusCode {
        self.status
    }

    /// Returns the HTTP version.
    #[must_use]
    pub fn version(&self) -> Version {
        self.version
    }

    /// Returns the headers, `Content-Length` included.
    #[must_use]
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Returns the body.
    #[must_use]
    pub fn body(&self) -> &Bytes {
        &self.body
    }

    /// Returns the `Content-Length` header as a number.
    #[must_use]
    pub fn content_length(&self) -> Option<usize> {
        self.headers
            .get(header::CONTENT_LENGTH)?
            .to_str()
            .ok()?
            .parse()
            .ok()
    }

    /// Sets a header. `Content-Length` cannot be overridden.
    #[must_use]
    pub fn with_header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.insert(name, value);
        self.finalize();
        self
    }

    /// Marks the body as not to be sent, as for `HEAD`.
    ///
    /// Status and headers, `Content-Length` included, are unchanged.
    #[must_use]
    pub fn without_body(mut self) -> Self {
        self.suppress_body = true;
        self
    }

    /// Returns `true` if the body will not be written.
    #[must_use]
    pub fn is_body_suppressed(&self) -> bool {
        self.suppress_body
    }

    /// Converts into an [`http::Response`].
    #[must_use]
    pub fn into_http(self) -> Response<Bytes> {
        let body = if self.suppress_body {
            Bytes::new()
        } else {
            self.body
        };
        let mut response = Response::new(body);
        *response.status_mut() = self.status;
        *response.version_mut() = self.version;
        *response.headers_mut() = self.headers;
        response
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::{Serialize, Serializer};
    use std::error::Error as _;
    use strongcontract_core::{Empty, RawBytes};

    #[derive(Serialize)]
    struct Greeting {
        message: String,
    }

    impl ContractResponse for Greeting {}

    struct AlwaysFails;

    impl Serialize for AlwaysFails {
        fn serialize<S: Serializer>(&self, _serializer: S) -> Result<S::Ok, S::Error> {
            Err(serde::ser::Error::custom("refusing to encode"))
        }
    }

    impl ContractResponse for AlwaysFails {}

    #[test]
    fn test_defaults() {
        let envelope = ResponseAdaptor::new(Empty {}).into_envelope().unwrap();
        assert_eq!(envelope.status(), StatusCode::OK);
        assert_eq!(envelope.version(), Version::HTTP_11);
        assert_eq!(envelope.headers()[header::CONTENT_TYPE], "application/json");
        assert_eq!(envelope.body().as_ref(), b"{}");
        assert_eq!(envelope.content_length(), Some(2));
    }

    #[test]
    fn test_structured_encoding() {
        let envelope = ResponseAdaptor::new(Greeting {
            message: "hi".into(),
        })
        .into_envelope()
        .unwrap();
        assert_eq!(envelope.body().as_ref(), br#"{"message":"hi"}"#);
        assert_eq!(envelope.content_length(), Some(envelope.body().len()));
    }

    #[test]
    fn test_raw_bytes_bypass_encoder() {
        let bytes = vec![0u8, 159, 146, 150, b'"'];
        let envelope = ResponseAdaptor::new(RawBytes::from(bytes.clone()))
            .into_envelope()
            .unwrap();
        assert_eq!(envelope.body().as_ref(), bytes.as_slice());
        assert_eq!(envelope.content_length(), Some(5));
    }

    #[test]
    fn test_binary_constructor_sets_octet_stream() {
        let envelope = ResponseAdaptor::binary(RawBytes::from(vec![1u8]))
            .into_envelope()
            .unwrap();
        assert_eq!(
            envelope.headers()[header::CONTENT_TYPE],
            "application/octet-stream"
        );
    }

    #[test]
    fn test_encode_failure_propagates_cause() {
        let err = ResponseAdaptor::new(AlwaysFails).into_envelope().unwrap_err();
        assert!(matches!(err, ContractError::EncodeFailure { .. }));
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        let cause = err.source().unwrap();
        assert!(cause.to_string().contains("refusing to encode"));
    }

    #[test]
    fn test_stale_content_length_is_overwritten() {
        let envelope = ResponseAdaptor::new("abc".to_string())
            .header(header::CONTENT_LENGTH, HeaderValue::from_static("999"))
            .into_envelope()
            .unwrap();
        assert_eq!(envelope.content_length(), Some(5));
        assert_eq!(envelope.headers().get_all(header::CONTENT_LENGTH).iter().count(), 1);
    }

    #[test]
    fn test_with_header_keeps_content_length() {
        let envelope = ResponseEnvelope::json(StatusCode::OK, "{}")
            .with_header(header::CONTENT_LENGTH, HeaderValue::from_static("0"))
            .with_header(header::ETAG, HeaderValue::from_static("\"v1\""));
        assert_eq!(envelope.content_length(), Some(2));
        assert_eq!(envelope.headers()[header::ETAG], "\"v1\"");
    }

    #[test]
    fn test_custom_status_version_headers() {
        let mut headers = HeaderMap::new();
        headers.insert("x-trace", HeaderValue::from_static("t-1"));
        let envelope = ResponseAdaptor::new(true)
            .status(StatusCode::ACCEPTED)
            .version(Version::HTTP_2)
            .headers(headers)
            .into_envelope()
            .unwrap();
        assert_eq!(envelope.status(), StatusCode::ACCEPTED);
        assert_eq!(envelope.version(), Version::HTTP_2);
        assert_eq!(envelope.headers()["x-trace"], "t-1");
        assert!(envelope.headers().get(header::CONTENT_TYPE).is_none());
    }

    #[test]
    fn test_pretty_encoding() {
        let envelope = ResponseAdaptor::new(Greeting {
            message: "hi".into(),
        })
        .pretty()
        .into_envelope()
        .unwrap();
        let text = std::str::from_utf8(envelope.body()).unwrap();
        assert!(text.contains('\n'));
        assert_eq!(envelope.content_length(), Some(text.len()));
    }

    #[test]
    fn test_without_body_keeps_headers() {
        let envelope = ResponseEnvelope::json(StatusCode::OK, r#"{"a":1}"#).without_body();
        assert!(envelope.is_body_suppressed());
        let response = envelope.into_http();
        assert_eq!(response.headers()[header::CONTENT_LENGTH], "7");
        assert!(response.body().is_empty());
    }

    #[test]
    fn test_into_http() {
        let response = ResponseEnvelope::json(StatusCode::CREATED, "[]").into_http();
        assert_eq!(response.status(), StatusCode::CREATED);
        assert_eq!(response.version(), Version::HTTP_11);
        assert_eq!(response.body().as_ref(), b"[]");
    }

    #[test]
    fn test_from_error() {
        let envelope = ResponseEnvelope::from_error(&ContractError::missing_field("metaData"));
        assert_eq!(envelope.status(), StatusCode::BAD_REQUEST);
        let json: serde_json::Value = serde_json::from_slice(envelope.body()).unwrap();
        assert_eq!(json["error"]["code"], "MISSING_FIELD");
        assert_eq!(json["error"]["message"], "Missing 'metaData' in form-data");
    }
}
