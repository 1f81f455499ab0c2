//! The request view handed to extractors and handlers.
//!
//! [`RawRequest`] is a fully-buffered, read-only snapshot of an inbound
//! request. Extraction borrows it and never mutates it.

use bytes::Bytes;
use http::{header, HeaderMap, HeaderName, HeaderValue, Method, Uri};
use strongcontract_router::Params;

/// A buffered inbound request.
///
/// The body is `None` when the request carried no bytes; an empty body is
/// normalised to `None` at construction.
///
/// # Example
///
/// ```rust
/// use strongcontract_extract::RawRequest;
/// use http::Method;
///
/// let request = RawRequest::builder()
///     .method(Method::POST)
///     .uri("/v1/echo?loud=true")
///     .header("content-type", "application/json")
///     .body(r#"{"message":"hi"}"#)
///     .build();
///
/// assert_eq!(request.path(), "/v1/echo");
/// assert_eq!(request.content_type(), Some("application/json"));
/// assert!(request.has_body());
/// ```
#[derive(Debug, Clone)]
pub struct RawRequest {
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Option<Bytes>,
    path_params: Params,
}

impl RawRequest {
    /// Creates a request view.
    #[must_use]
    pub fn new(method: Method, uri: Uri, headers: HeaderMap, body: Option<Bytes>) -> Self {
        Self {
            method,
            uri,
            headers,
            body: body.filter(|b| !b.is_empty()),
            path_params: Params::new(),
        }
    }

    /// Returns a builder, defaulting to `GET /`.
    #[must_use]
    pub fn builder() -> RawRequestBuilder {
        RawRequestBuilder::default()
    }

    /// Returns the HTTP method.
    #[must_use]
    pub fn method(&self) -> &Method {
        &self.method
    }

    /// Returns the request URI.
    #[must_use]
    pub fn uri(&self) -> &Uri {
        &self.uri
    }

    /// Returns the path portion of the URI.
    #[must_use]
    pub fn path(&self) -> &str {
        self.uri.path()
    }

    /// Returns the request headers.
    #[must_use]
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Returns a header value as a string, if present and visible ASCII.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    /// Returns the declared `Content-Type`.
    #[must_use]
    pub fn content_type(&self) -> Option<&str> {
        self.header(header::CONTENT_TYPE.as_str())
    }

    /// Returns the body bytes, if any were sent.
    #[must_use]
    pub fn body(&self) -> Option<&Bytes> {
        self.body.as_ref()
    }

    /// Returns `true` if the request carried a body.
    #[must_use]
    pub fn has_body(&self) -> bool {
        self.body.is_some()
    }

    /// Returns the body length in bytes.
    #[must_use]
    pub fn body_len(&self) -> usize {
        self.body.as_ref().map_or(0, Bytes::len)
    }

    /// Returns the parameters captured from the path.
    #[must_use]
    pub fn path_params(&self) -> &Params {
        &self.path_params
    }

    /// Returns a single path parameter.
    #[must_use]
    pub fn param(&self, name: &str) -> Option<&str> {
        self.path_params.get(name)
    }

    /// Replaces the captured path parameters.
    #[must_use]
    pub fn with_path_params(mut self, params: Params) -> Self {
        self.path_params = params;
        self
    }

    /// A one-line description used in request logs.
    #[must_use]
    pub fn summary(&self) -> String {
        format!(
            "{} {} content-type={} body={}B",
            self.method,
            self.uri,
            self.content_type().unwrap_or("-"),
            self.body_len()
        )
    }
}

/// Builder for [`RawRequest`], mostly for tests and in-process dispatch.
#[derive(Debug)]
pub struct RawRequestBuilder {
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Option<Bytes>,
    path_params: Params,
}

impl Default for RawRequestBuilder {
    fn default() -> Self {
        Self {
            method: Method::GET,
            uri: Uri::from_static("/"),
            headers: HeaderMap::new(),
            body: None,
            path_params: Params::new(),
        }
    }
}

impl RawRequestBuilder {
    /// Sets the HTTP method.
    #[must_use]
    pub fn method(mut self, method: Method) -> Self {
        self.method = method;
        self
    }

    /// Sets the URI. Unparseable URIs leave the current one in place.
    #[must_use]
    pub fn uri(mut self, uri: &str) -> Self {
        if let Ok(uri) = uri.parse() {
            self.uri = uri;
        }
        self
    }

    /// Adds a header. Invalid names or values are skipped.
    #[must_use]
    pub fn header(mut self, name: &str, value: &str) -> Self {
        if let (Ok(name), Ok(value)) = (
            HeaderName::from_bytes(name.as_bytes()),
            HeaderValue::from_str(value),
        ) {
            self.headers.append(name, value);
        }
        self
    }

    /// Replaces all headers.
    #[must_use]
    pub fn headers(mut self, headers: HeaderMap) -> Self {
        self.headers = headers;
        self
    }

    /// Sets the body.
    #[must_use]
    pub fn body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = Some(body.into());
        self
    }

    /// Adds a path parameter.
    #[must_use]
    pub fn path_param(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.path_params.push(name, value);
        self
    }

    /// Builds the request.
    #[must_use]
    pub fn build(self) -> RawRequest {
        RawRequest::new(self.method, self.uri, self.headers, self.body)
            .with_path_params(self.path_params)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_defaults() {
        let request = RawRequest::builder().build();
        assert_eq!(request.method(), &Method::GET);
        assert_eq!(request.path(), "/");
        assert!(!request.has_body());
        assert_eq!(request.content_type(), None);
    }

    #[test]
    fn test_empty_body_is_absent() {
        let request = RawRequest::builder().body(Bytes::new()).build();
        assert!(request.body().is_none());
        assert_eq!(request.body_len(), 0);
    }

    #[test]
    fn test_header_access() {
        let request = RawRequest::builder()
            .header("Content-Type", "multipart/form-data; boundary=abc")
            .header("x-request-id", "abc-123")
            .header("bad header", "ignored")
            .build();

        assert_eq!(
            request.content_type(),
            Some("multipart/form-data; boundary=abc")
        );
        assert_eq!(request.header("x-request-id"), Some("abc-123"));
        assert_eq!(request.headers().len(), 2);
    }

    #[test]
    fn test_path_params() {
        let request = RawRequest::builder()
            .uri("/users/42")
            .path_param("id", "42")
            .build();
        assert_eq!(request.param("id"), Some("42"));
        assert_eq!(request.path_params().len(), 1);
    }

    #[test]
    fn test_summary() {
        let request = RawRequest::builder()
            .method(Method::PUT)
            .uri("/files")
            .body("abcd")
            .build();
        assert_eq!(request.summary(), "PUT /files content-type=- body=4B");
    }
}
