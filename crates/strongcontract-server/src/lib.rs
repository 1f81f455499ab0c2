//! # StrongContract Server
//!
//! Route registration driven by contract descriptors, plus the HTTP server
//! that serves the resulting routes.
//!
//! - [`register`] and the `register_*` helpers turn a contract and a handler
//!   into a route per verb
//! - [`Routes`] is the routing table, dispatchable in-process
//! - [`Server`] serves a [`Routes`] table over HTTP/1.1 with graceful
//!   shutdown
//!
//! ## Example
//!
//! ```rust
//! use serde::{Deserialize, Serialize};
//! use strongcontract_core::{ContractDescriptor, ContractResponse};
//! use strongcontract_extract::{RawRequest, ResponseAdaptor};
//! use strongcontract_server::{register_json, HandlerError, RegisterOptions, Routes};
//!
//! #[derive(Deserialize)]
//! struct Greet {
//!     name: String,
//! }
//!
//! #[derive(Serialize)]
//! struct Greeting {
//!     text: String,
//! }
//!
//! impl ContractResponse for Greeting {}
//!
//! async fn greet(
//!     payload: Greet,
//!     _request: RawRequest,
//! ) -> Result<ResponseAdaptor<Greeting>, HandlerError> {
//!     Ok(ResponseAdaptor::new(Greeting {
//!         text: format!("Hello, {}!", payload.name),
//!     }))
//! }
//!
//! # tokio_test::block_on(async {
//! let mut routes = Routes::new();
//! register_json(
//!     &mut routes,
//!     &ContractDescriptor::<Greet, Greeting>::post("/greet"),
//!     greet,
//!     RegisterOptions::default(),
//! )
//! .unwrap();
//!
//! let request = RawRequest::builder()
//!     .method(http::Method::POST)
//!     .uri("/greet")
//!     .body(r#"{"name":"Ada"}"#)
//!     .build();
//!
//! let response = routes.dispatch(request).await;
//! assert_eq!(response.body().as_ref(), br#"{"text":"Hello, Ada!"}"#);
//! # });
//! ```

#![doc(html_root_url = "https://docs.rs/strongcontract-server/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod config;
mod dispatch;
mod handler;
mod routes;
mod server;
mod shutdown;

pub use config::{
    ServerConfig, ServerConfigBuilder, DEFAULT_HTTP_ADDR, DEFAULT_MAX_BODY_SIZE,
    DEFAULT_REQUEST_TIMEOUT_SECS, DEFAULT_SHUTDOWN_TIMEOUT_SECS,
};
pub use dispatch::{
    register, register_download, register_empty, register_json, register_multipart,
    register_raw, RegisterOptions,
};
pub use handler::{BoxedResponse, ErasedHandler, HandlerError, HandlerOutput};
pub use routes::{Routes, RoutesBuilder};
pub use server::{Server, ServerBuilder, ServerError};
pub use shutdown::{ConnectionToken, ConnectionTracker, ShutdownSignal};
