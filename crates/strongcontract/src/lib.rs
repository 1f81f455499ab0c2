//! # StrongContract
//!
//! **Contract-driven HTTP routes with typed payloads and responses.**
//!
//! A contract names a verb, a path and a Payload/Response type pair. Register
//! one with a handler and StrongContract:
//!
//! - rejects a body-carrying payload on GET or HEAD when the route is
//!   registered, not when it is first called
//! - extracts the payload from JSON, from a `multipart/form-data` body
//!   (`metaData` + `file`) or as raw bytes
//! - encodes the response as JSON, or passes [`RawBytes`](core::RawBytes)
//!   through untouched, always with an exact `Content-Length`
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use serde::{Deserialize, Serialize};
//! use strongcontract::prelude::*;
//!
//! #[derive(Deserialize)]
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
//! #[derive(Serialize)]
//! struct Stored {
//!     format: String,
//!     size: usize,
//! }
//!
//! impl ContractResponse for Stored {}
//!
//! async fn upload(
//!     payload: MultiFormPayload<ImageMeta>,
//!     _request: RawRequest,
//! ) -> Result<ResponseAdaptor<Stored>, HandlerError> {
//!     Ok(ResponseAdaptor::new(Stored {
//!         format: payload.format().to_string(),
//!         size: payload.data.len(),
//!     }))
//! }
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = ConfigLoader::new()
//!         .with_optional_file("strongcontract.toml")?
//!         .with_env_prefix("STRONGCONTRACT")
//!         .load()?;
//!     init_logging(&config.logging)?;
//!
//!     let mut routes = Routes::new();
//!     register_multipart(
//!         &mut routes,
//!         &ContractDescriptor::<MultiFormPayload<ImageMeta>, Stored>::put("/v1/images"),
//!         upload,
//!         config.register_options(),
//!     )?;
//!
//!     Server::new(config.server_config(), routes).run().await?;
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! Request → Routes (verb + path) → PayloadExtractor → handler
//!                                                        ↓
//! Response ← Content-Length ← ResponseAdaptor ←──────────┘
//! ```

#![doc(html_root_url = "https://docs.rs/strongcontract/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

// Contract descriptors, payload shapes and errors
pub use strongcontract_core as core;

// Routing table
pub use strongcontract_router as router;

// Request view, payload extraction and response encoding
pub use strongcontract_extract as extract;

// Route registration and the HTTP server
pub use strongcontract_server as server;

// Logging setup
pub use strongcontract_telemetry as telemetry;

// Layered configuration
pub use strongcontract_config as config;

/// Prelude module for convenient imports.
///
/// # Example
///
/// ```rust
/// use strongcontract::prelude::*;
///
/// let contract = ContractDescriptor::<Empty, bool>::get("/health");
/// assert_eq!(contract.verb(), Verb::Get);
/// ```
pub mod prelude {
    pub use strongcontract_core::{
        Contract, ContractDescriptor, ContractError, ContractResponse, Empty, ErrorEnvelope,
        HasFormat, MultiFormPayload, RawBytes, Verb,
    };

    pub use strongcontract_extract::{
        EmptyPayload, JsonPayload, MultipartPayload, OptionalJsonPayload, PayloadExtractor,
        PayloadKind, RawPayload, RawRequest, ResponseAdaptor, ResponseEnvelope,
    };

    pub use strongcontract_server::{
        register, register_download, register_empty, register_json, register_multipart,
        register_raw, HandlerError, RegisterOptions, Routes, RoutesBuilder, Server,
        ServerConfig, ShutdownSignal,
    };

    pub use strongcontract_config::{ConfigLoader, StrongContractConfig};

    pub use strongcontract_telemetry::{init_logging, LogConfig};
}
