//! # StrongContract Extract
//!
//! The request and response halves of the contract adaptation layer.
//!
//! - [`RawRequest`] - the buffered request view handed to extractors and handlers
//! - [`PayloadExtractor`] - one strategy per payload family ([`JsonPayload`],
//!   [`MultipartPayload`], [`RawPayload`], [`EmptyPayload`], [`OptionalJsonPayload`])
//! - [`multipart`] - byte-level lookup of the `metaData` and `file` form fields
//! - [`ResponseAdaptor`] / [`ResponseEnvelope`] - typed response in, wire bytes out
//!
//! ## Example
//!
//! ```rust
//! use strongcontract_core::{HasFormat, RawBytes};
//! use strongcontract_extract::{MultipartPayload, PayloadExtractor, RawRequest, ResponseAdaptor};
//! use http::Method;
//!
//! #[derive(serde::Deserialize)]
//! struct ImageMeta {
//!     format: String,
//! }
//!
//! impl HasFormat for ImageMeta {
//!     fn format(&self) -> &str {
//!         &self.format
//!     }
//! }
//!
//! let request = RawRequest::builder()
//!     .method(Method::POST)
//!     .header("content-type", "multipart/form-data; boundary=abc")
//!     .body(&b"--abc\r\n\
//! Content-Disposition: form-data; name=\"metaData\"\r\n\r\n{\"format\":\"jpg\"}\r\n\
//! --abc\r\n\
//! Content-Disposition: form-data; name=\"file\"\r\n\r\nhello\r\n\
//! --abc--\r\n"[..])
//!     .build();
//!
//! let upload = MultipartPayload::<ImageMeta>::new().extract(&request).unwrap();
//! assert_eq!(upload.format(), "jpg");
//!
//! let envelope = ResponseAdaptor::new(RawBytes(upload.data)).into_envelope().unwrap();
//! assert_eq!(envelope.body().as_ref(), b"hello");
//! ```

#![doc(html_root_url = "https://docs.rs/strongcontract-extract/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod context;
mod extractor;
pub mod multipart;
pub mod response;

pub use context::{RawRequest, RawRequestBuilder};
pub use extractor::{
    BodyFormat, EmptyPayload, JsonPayload, MultipartPayload, OptionalJsonPayload,
    PayloadExtractor, PayloadKind, RawPayload, DEFAULT_JSON_LIMIT, DEFAULT_MULTIPART_LIMIT,
};
pub use response::{default_json_headers, ResponseAdaptor, ResponseEnvelope};

pub use strongcontract_router::Params;
