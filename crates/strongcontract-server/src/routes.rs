//! The routing table that registration writes into.
//!
//! [`RoutesBuilder`] is the only thing the dispatcher needs from a router.
//! [`Routes`] implements it over [`strongcontract_router::Router`] and can
//! dispatch a [`RawRequest`] in-process, which is what the HTTP server and
//! the tests both do.

use http::{header, HeaderValue, StatusCode};
use strongcontract_core::{ContractError, ErrorEnvelope, Verb};
use strongcontract_extract::{RawRequest, ResponseEnvelope};
use strongcontract_router::Router;

use crate::handler::ErasedHandler;

/// Something routes can be registered with.
pub trait RoutesBuilder {
    /// Registers `handler` for `verb` at the given path segments.
    ///
    /// Fails when the router rejects the path, for example a catch-all
    /// segment that is not last.
    fn add_route(
        &mut self,
        verb: Verb,
        segments: &[String],
        handler: ErasedHandler,
    ) -> Result<(), ContractError>;
}

/// A routing table of erased contract handlers.
#[derive(Default)]
pub struct Routes {
    router: Router<ErasedHandler>,
}

impl Routes {
    /// Creates an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of registered (verb, path) routes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.router.len()
    }

    /// Returns `true` if nothing is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.router.is_empty()
    }

    /// Routes a request and runs its handler.
    ///
    /// Unknown paths get 404. A known path without a handler for the
    /// request's method gets 405 with an `Allow` header.
    pub async fn dispatch(&self, request: RawRequest) -> ResponseEnvelope {
        let Some((methods, params)) = self.router.match_path(request.path()) else {
            tracing::debug!(method = %request.method(), path = %request.path(), "no route");
            return not_found(request.path());
        };

        let Some(handler) = methods.handler(request.method()) else {
            tracing::debug!(
                method = %request.method(),
                path = %request.path(),
                "method not allowed"
            );
            let allow = methods.allow_header();
            let response = ResponseEnvelope::error(
                StatusCode::METHOD_NOT_ALLOWED,
                &ErrorEnvelope::new(
                    "METHOD_NOT_ALLOWED",
                    format!("{} is not allowed on {}", request.method(), request.path()),
                ),
            );
            return match HeaderValue::from_str(&allow) {
                Ok(value) => response.with_header(header::ALLOW, value),
                Err(_) => response,
            };
        };

        let handler = ErasedHandler::clone(handler);
        handler(request.with_path_params(params)).await
    }
}

impl RoutesBuilder for Routes {
    fn add_route(
        &mut self,
        verb: Verb,
        segments: &[String],
        handler: ErasedHandler,
    ) -> Result<(), ContractError> {
        let replaced = self
            .router
            .insert(&verb.to_method(), segments, handler)
            .map_err(|e| ContractError::configuration(e.to_string()))?;
        if replaced.is_some() {
            tracing::warn!(
                verb = %verb,
                path = %format!("/{}", segments.join("/")),
                "route registered twice, keeping the latest handler"
            );
        }
        Ok(())
    }
}

impl std::fmt::Debug for Routes {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Routes")
            .field("routes", &self.router.len())
            .finish()
    }
}

fn not_found(path: &str) -> ResponseEnvelope {
    ResponseEnvelope::error(
        StatusCode::NOT_FOUND,
        &ErrorEnvelope::new("NOT_FOUND", format!("No route for {path}")),
    )
}
