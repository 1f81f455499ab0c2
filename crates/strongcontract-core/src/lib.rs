//! # StrongContract Core
//!
//! Core types shared by every StrongContract crate.
//!
//! A *contract* is a declarative description of one endpoint: the HTTP verb,
//! the path template, the payload type the client sends and the response type
//! the server answers with. Everything the server does on the wire (body
//! decoding, content-type branching, response encoding) is derived from it.
//!
//! - [`ContractDescriptor`] / [`Contract`] - The endpoint descriptor
//! - [`Verb`] - The six verbs a contract may declare
//! - [`Empty`], [`RawBytes`], [`MultiFormPayload`] - Built-in payload shapes
//! - [`ResponseKind`] / [`ContractResponse`] - How a response value is encoded
//! - [`ContractError`] - The error taxonomy surfaced to callers

#![doc(html_root_url = "https://docs.rs/strongcontract-core/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod contract;
mod error;
mod payload;
mod response;

pub use contract::{Contract, ContractDescriptor, Verb};
pub use error::{ContractError, ContractResult, ErrorDetail, ErrorEnvelope};
pub use payload::{Empty, HasFormat, MultiFormPayload, RawBytes};
pub use response::{ContractResponse, ResponseKind};
