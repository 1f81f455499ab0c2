//! Contract-driven route registration.
//!
//! [`register`] is the one registration routine. It takes a contract, the
//! payload extraction strategy for it, and the handler, and installs an
//! [`ErasedHandler`] that runs extraction, the handler and response
//! encoding in order. The `register_*` functions pick the strategy for
//! you.
//!
//! | Function | Payload | Strategy |
//! |----------|---------|----------|
//! | [`register_json`] | `T: DeserializeOwned` | [`JsonPayload`] |
//! | [`register_multipart`] | [`MultiFormPayload<M>`] | [`MultipartPayload`] |
//! | [`register_raw`] | [`RawBytes`] | [`RawPayload`] |
//! | [`register_empty`] | [`Empty`] | [`EmptyPayload`] |
//! | [`register_download`] | `Option<T>` | [`OptionalJsonPayload`] |
//!
//! GET and HEAD contracts must use an empty payload; anything else is
//! rejected at registration. A GET contract also answers HEAD on the same
//! path, sending the GET handler's status and headers without the body.
//!
//! # Example
//!
//! ```rust
//! use serde::{Deserialize, Serialize};
//! use strongcontract_core::{ContractDescriptor, ContractResponse};
//! use strongcontract_extract::{RawRequest, ResponseAdaptor};
//! use strongcontract_server::{register_json, HandlerError, RegisterOptions, Routes};
//!
//! #[derive(Deserialize)]
//! struct Echo {
//!     message: String,
//! }
//!
//! #[derive(Serialize)]
//! struct Echoed {
//!     message: String,
//! }
//!
//! impl ContractResponse for Echoed {}
//!
//! let mut routes = Routes::new();
//! let contract = ContractDescriptor::<Echo, Echoed>::post("/v1/echo");
//!
//! register_json(
//!     &mut routes,
//!     &contract,
//!     |payload: Echo, _request: RawRequest| async move {
//!         Ok::<_, HandlerError>(ResponseAdaptor::new(Echoed { message: payload.message }))
//!     },
//!     RegisterOptions::default(),
//! )
//! .unwrap();
//!
//! assert_eq!(routes.len(), 1);
//! ```

use std::future::Future;
use std::sync::Arc;

use serde::de::DeserializeOwned;
use strongcontract_core::{
    Contract, ContractError, ContractResponse, Empty, HasFormat, MultiFormPayload, RawBytes, Verb,
};
use strongcontract_extract::{
    EmptyPayload, JsonPayload, MultipartPayload, OptionalJsonPayload, PayloadExtractor,
    PayloadKind, RawPayload, RawRequest, ResponseAdaptor, ResponseEnvelope,
};

use crate::handler::{BoxedResponse, ErasedHandler, HandlerError, HandlerOutput};
use crate::routes::RoutesBuilder;

/// Per-registration options.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RegisterOptions {
    /// Log route segments and every request at `info` instead of `debug`.
    pub verbose: bool,
}

impl RegisterOptions {
    /// Options with verbose logging on.
    #[must_use]
    pub const fn verbose() -> Self {
        Self { verbose: true }
    }
}

/// Registers a contract with an explicit extraction strategy.
///
/// The extractor's payload must be the contract's payload and the handler's
/// output must encode the contract's response, so a mismatched registration
/// does not compile.
///
/// # Errors
///
/// Returns [`ContractError::Configuration`] if a GET or HEAD contract
/// declares a payload, or if the router rejects the path.
pub fn register<B, C, E, F, Fut, O>(
    builder: &mut B,
    contract: &C,
    extractor: E,
    handler: F,
    options: RegisterOptions,
) -> Result<(), ContractError>
where
    B: RoutesBuilder + ?Sized,
    C: Contract<Payload = E::Payload>,
    E: PayloadExtractor,
    F: Fn(E::Payload, RawRequest) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<O, HandlerError>> + Send + 'static,
    O: HandlerOutput<Response = C::Response>,
{
    let verb = contract.verb();
    let kind = extractor.kind();
    if verb.is_bodiless() && kind != PayloadKind::Empty {
        return Err(ContractError::configuration(format!(
            "{verb} {} cannot declare a {kind} payload",
            contract.path()
        )));
    }

    let segments = contract.path_segments();
    let route = format!("{verb} /{}", segments.join("/"));
    if options.verbose {
        tracing::info!(route = %route, segments = ?segments, payload = %kind, "registering route");
    } else {
        tracing::debug!(route = %route, segments = ?segments, payload = %kind, "registering route");
    }

    let endpoint = Arc::new(Endpoint {
        route,
        extractor,
        handler,
        verbose: options.verbose,
    });

    builder.add_route(verb, &segments, erase(Arc::clone(&endpoint), verb == Verb::Head))?;
    if verb == Verb::Get {
        builder.add_route(Verb::Head, &segments, erase(endpoint, true))?;
    }
    Ok(())
}

/// Registers a contract whose payload is decoded from a JSON body.
///
/// For GET and HEAD contracts use [`register_empty`].
pub fn register_json<B, C, P, R, F, Fut>(
    builder: &mut B,
    contract: &C,
    handler: F,
    options: RegisterOptions,
) -> Result<(), ContractError>
where
    B: RoutesBuilder + ?Sized,
    C: Contract<Payload = P, Response = R>,
    P: DeserializeOwned + Send + 'static,
    R: ContractResponse + Send + 'static,
    F: Fn(P, RawRequest) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<ResponseAdaptor<R>, HandlerError>> + Send + 'static,
{
    register(builder, contract, JsonPayload::<P>::new(), handler, options)
}

/// Registers a contract whose payload is a `metaData` + `file` upload.
pub fn register_multipart<B, C, M, R, F, Fut>(
    builder: &mut B,
    contract: &C,
    handler: F,
    options: RegisterOptions,
) -> Result<(), ContractError>
where
    B: RoutesBuilder + ?Sized,
    C: Contract<Payload = MultiFormPayload<M>, Response = R>,
    M: DeserializeOwned + HasFormat + Send + 'static,
    R: ContractResponse + Send + 'static,
    F: Fn(MultiFormPayload<M>, RawRequest) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<ResponseAdaptor<R>, HandlerError>> + Send + 'static,
{
    register(builder, contract, MultipartPayload::<M>::new(), handler, options)
}

/// Registers a contract that receives the body bytes untouched.
pub fn register_raw<B, C, R, F, Fut>(
    builder: &mut B,
    contract: &C,
    handler: F,
    options: RegisterOptions,
) -> Result<(), ContractError>
where
    B: RoutesBuilder + ?Sized,
    C: Contract<Payload = RawBytes, Response = R>,
    R: ContractResponse + Send + 'static,
    F: Fn(RawBytes, RawRequest) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<ResponseAdaptor<R>, HandlerError>> + Send + 'static,
{
    register(builder, contract, RawPayload, handler, options)
}

/// Registers a contract without a payload. Any request body is ignored.
pub fn register_empty<B, C, R, F, Fut>(
    builder: &mut B,
    contract: &C,
    handler: F,
    options: RegisterOptions,
) -> Result<(), ContractError>
where
    B: RoutesBuilder + ?Sized,
    C: Contract<Payload = Empty, Response = R>,
    R: ContractResponse + Send + 'static,
    F: Fn(Empty, RawRequest) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<ResponseAdaptor<R>, HandlerError>> + Send + 'static,
{
    register(builder, contract, EmptyPayload, handler, options)
}

/// Registers a binary download.
///
/// The handler builds the whole [`ResponseEnvelope`] itself, typically to
/// set `Content-Type` and `Content-Disposition` for a file. The payload is
/// `None` when the request has no body.
pub fn register_download<B, C, P, F, Fut>(
    builder: &mut B,
    contract: &C,
    handler: F,
    options: RegisterOptions,
) -> Result<(), ContractError>
where
    B: RoutesBuilder + ?Sized,
    C: Contract<Payload = Option<P>, Response = RawBytes>,
    P: DeserializeOwned + Send + 'static,
    F: Fn(Option<P>, RawRequest) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<ResponseEnvelope, HandlerError>> + Send + 'static,
{
    register(
        builder,
        contract,
        OptionalJsonPayload::<P>::new(),
        handler,
        options,
    )
}

struct Endpoint<E, F> {
    route: String,
    extractor: E,
    handler: F,
    verbose: bool,
}

impl<E: PayloadExtractor, F> Endpoint<E, F> {
    async fn call<Fut, O>(&self, request: RawRequest) -> ResponseEnvelope
    where
        F: Fn(E::Payload, RawRequest) -> Fut,
        Fut: Future<Output = Result<O, HandlerError>>,
        O: HandlerOutput,
    {
        if self.verbose {
            tracing::info!(route = %self.route, request = %request.summary(), "handling request");
        } else {
            tracing::trace!(route = %self.route, request = %request.summary(), "handling request");
        }

        let payload = match self.extractor.extract(&request) {
            Ok(payload) => payload,
            Err(e) => {
                tracing::debug!(route = %self.route, error = %e, "payload rejected");
                return ResponseEnvelope::from_error(&e);
            }
        };

        let output = match (self.handler)(payload, request).await {
            Ok(output) => output,
            Err(e) => {
                if e.status_code().is_server_error() {
                    tracing::error!(route = %self.route, error = %e, "handler failed");
                } else {
                    tracing::debug!(route = %self.route, error = %e, "handler rejected request");
                }
                return e.to_response();
            }
        };

        match output.into_response_envelope() {
            Ok(envelope) => envelope,
            Err(e) => {
                tracing::error!(route = %self.route, error = %e, "failed to encode response");
                ResponseEnvelope::from_error(&e)
            }
        }
    }
}

fn erase<E, F, Fut, O>(endpoint: Arc<Endpoint<E, F>>, head: bool) -> ErasedHandler
where
    E: PayloadExtractor,
    F: Fn(E::Payload, RawRequest) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<O, HandlerError>> + Send + 'static,
    O: HandlerOutput,
{
    Arc::new(move |request: RawRequest| -> BoxedResponse {
        let endpoint = Arc::clone(&endpoint);
        Box::pin(async move {
            let envelope = endpoint.call::<Fut, O>(request).await;
            if head {
                envelope.without_body()
            } else {
                envelope
            }
        })
    })
}
