//! The HTTP/1.1 server.
//!
//! Accepts connections with Tokio, serves them with Hyper, buffers each
//! request body (bounded by the configured size and timeout), turns it into
//! a [`RawRequest`] and hands it to [`Routes::dispatch`].
//!
//! # Example
//!
//! ```rust,no_run
//! use strongcontract_core::{ContractDescriptor, Empty};
//! use strongcontract_extract::{RawRequest, ResponseAdaptor};
//! use strongcontract_server::{register_empty, HandlerError, RegisterOptions, Routes, Server};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut routes = Routes::new();
//!     register_empty(
//!         &mut routes,
//!         &ContractDescriptor::<Empty, bool>::get("/health"),
//!         |_: Empty, _: RawRequest| async { Ok::<_, HandlerError>(ResponseAdaptor::new(true)) },
//!         RegisterOptions::default(),
//!     )?;
//!
//!     Server::builder()
//!         .http_addr("127.0.0.1:8080")
//!         .routes(routes)
//!         .build()
//!         .run()
//!         .await?;
//!     Ok(())
//! }
//! ```

use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use bytes::Bytes;
use http::{Request, Response, StatusCode};
use http_body_util::{BodyExt, Full, LengthLimitError, Limited};
use hyper::body::Incoming;
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper_util::rt::TokioIo;
use strongcontract_core::ErrorEnvelope;
use strongcontract_extract::{RawRequest, ResponseEnvelope};
use tokio::net::{TcpListener, TcpStream};

use crate::config::{ServerConfig, ServerConfigBuilder};
use crate::routes::Routes;
use crate::shutdown::{ConnectionTracker, ShutdownSignal};

/// Errors that stop the server.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    /// The configured address is not a socket address.
    #[error("Invalid address '{addr}': {source}")]
    InvalidAddress {
        /// The configured address.
        addr: String,
        /// Parse failure.
        #[source]
        source: std::net::AddrParseError,
    },

    /// Binding the listener failed.
    #[error("Failed to bind to {addr}: {source}")]
    Bind {
        /// The address that could not be bound.
        addr: SocketAddr,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Any other I/O failure.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

struct Shared {
    routes: Routes,
    request_timeout: Duration,
    max_body_size: usize,
}

/// A contract server.
pub struct Server {
    config: ServerConfig,
    shared: Arc<Shared>,
}

impl Server {
    /// Creates a server for the given routes.
    #[must_use]
    pub fn new(config: ServerConfig, routes: Routes) -> Self {
        let shared = Arc::new(Shared {
            routes,
            request_timeout: config.request_timeout(),
            max_body_size: config.max_body_size(),
        });
        Self { config, shared }
    }

    /// Returns a builder.
    #[must_use]
    pub fn builder() -> ServerBuilder {
        ServerBuilder::default()
    }

    /// Returns the configuration.
    #[must_use]
    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    /// Returns the routing table.
    #[must_use]
    pub fn routes(&self) -> &Routes {
        &self.shared.routes
    }

    /// Serves until SIGTERM or SIGINT.
    pub async fn run(self) -> Result<(), ServerError> {
        let shutdown = ShutdownSignal::with_os_signals();
        self.run_with_shutdown(shutdown).await
    }

    /// Binds the configured address and serves until `shutdown` fires.
    pub async fn run_with_shutdown(self, shutdown: ShutdownSignal) -> Result<(), ServerError> {
        let addr = self
            .config
            .socket_addr()
            .map_err(|source| ServerError::InvalidAddress {
                addr: self.config.http_addr().to_string(),
                source,
            })?;
        let listener = TcpListener::bind(addr)
            .await
            .map_err(|source| ServerError::Bind { addr, source })?;
        self.serve(listener, shutdown).await
    }

    /// Serves connections from an already bound listener.
    pub async fn serve(
        self,
        listener: TcpListener,
        shutdown: ShutdownSignal,
    ) -> Result<(), ServerError> {
        let local_addr = listener.local_addr()?;
        tracing::info!(addr = %local_addr, routes = self.shared.routes.len(), "server listening");

        let tracker = ConnectionTracker::new();
        let keep_alive = self.config.keep_alive();

        loop {
            tokio::select! {
                accepted = listener.accept() => match accepted {
                    Ok((stream, remote)) => {
                        let shared = Arc::clone(&self.shared);
                        let shutdown = shutdown.clone();
                        let token = tracker.acquire();
                        tokio::spawn(async move {
                            let served =
                                serve_connection(shared, stream, keep_alive, shutdown).await;
                            if let Err(e) = served {
                                tracing::debug!(remote = %remote, error = %e, "connection error");
                            }
                            drop(token);
                        });
                    }
                    Err(e) => tracing::error!(error = %e, "failed to accept connection"),
                },
                () = shutdown.recv() => {
                    tracing::info!("shutdown signal received, no longer accepting connections");
                    break;
                }
            }
        }

        let timeout = self.config.shutdown_timeout();
        tracing::info!(
            open = tracker.active_connections(),
            timeout = ?timeout,
            "waiting for connections to close"
        );
        if tokio::time::timeout(timeout, tracker.wait_for_drain())
            .await
            .is_err()
        {
            tracing::warn!(
                open = tracker.active_connections(),
                "shutdown timeout reached with connections still open"
            );
        }

        tracing::info!("server stopped");
        Ok(())
    }
}

impl std::fmt::Debug for Server {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Server")
            .field("config", &self.config)
            .field("routes", &self.shared.routes)
            .finish()
    }
}

/// Builder for [`Server`].
#[derive(Debug, Default)]
pub struct ServerBuilder {
    config: ServerConfigBuilder,
    routes: Routes,
}

impl ServerBuilder {
    /// Replaces the whole configuration.
    #[must_use]
    pub fn config(mut self, config: ServerConfig) -> Self {
        self.config = ServerConfigBuilder::new()
            .http_addr(config.http_addr())
            .shutdown_timeout(config.shutdown_timeout())
            .request_timeout(config.request_timeout())
            .max_body_size(config.max_body_size())
            .keep_alive(config.keep_alive());
        self
    }

    /// Sets the bind address.
    #[must_use]
    pub fn http_addr(mut self, addr: impl Into<String>) -> Self {
        self.config = self.config.http_addr(addr);
        self
    }

    /// Sets the graceful shutdown timeout.
    #[must_use]
    pub fn shutdown_timeout(mut self, timeout: Duration) -> Self {
        self.config = self.config.shutdown_timeout(timeout);
        self
    }

    /// Sets the request timeout.
    #[must_use]
    pub fn request_timeout(mut self, timeout: Duration) -> Self {
        self.config = self.config.request_timeout(timeout);
        self
    }

    /// Sets the request body cap.
    #[must_use]
    pub fn max_body_size(mut self, bytes: usize) -> Self {
        self.config = self.config.max_body_size(bytes);
        self
    }

    /// Sets the routing table.
    #[must_use]
    pub fn routes(mut self, routes: Routes) -> Self {
        self.routes = routes;
        self
    }

    /// Builds the server.
    #[must_use]
    pub fn build(self) -> Server {
        Server::new(self.config.build(), self.routes)
    }
}

async fn serve_connection(
    shared: Arc<Shared>,
    stream: TcpStream,
    keep_alive: bool,
    shutdown: ShutdownSignal,
) -> Result<(), hyper::Error> {
    let service = service_fn(move |request: Request<Incoming>| {
        let shared = Arc::clone(&shared);
        async move { Ok::<_, Infallible>(handle(&shared, request).await) }
    });

    let connection = http1::Builder::new()
        .keep_alive(keep_alive)
        .serve_connection(TokioIo::new(stream), service);
    tokio::pin!(connection);

    tokio::select! {
        result = connection.as_mut() => result,
        () = shutdown.recv() => {
            connection.as_mut().graceful_shutdown();
            connection.await
        }
    }
}

async fn handle(shared: &Shared, request: Request<Incoming>) -> Response<Full<Bytes>> {
    let (parts, body) = request.into_parts();

    let collected = tokio::time::timeout(
        shared.request_timeout,
        Limited::new(body, shared.max_body_size).collect(),
    )
    .await;

    let body = match collected {
        Ok(Ok(collected)) => collected.to_bytes(),
        Ok(Err(e)) if e.downcast_ref::<LengthLimitError>().is_some() => {
            tracing::debug!(method = %parts.method, uri = %parts.uri, "request body too large");
            return failure(
                StatusCode::PAYLOAD_TOO_LARGE,
                "PAYLOAD_TOO_LARGE",
                format!("Request body exceeds {} bytes", shared.max_body_size),
            );
        }
        Ok(Err(e)) => {
            tracing::debug!(
                method = %parts.method,
                uri = %parts.uri,
                error = %e,
                "failed to read request body"
            );
            return failure(
                StatusCode::BAD_REQUEST,
                "BODY_READ_ERROR",
                format!("Failed to read request body: {e}"),
            );
        }
        Err(_) => {
            tracing::warn!(
                method = %parts.method,
                uri = %parts.uri,
                "timed out reading request body"
            );
            return failure(
                StatusCode::REQUEST_TIMEOUT,
                "REQUEST_TIMEOUT",
                "Timed out reading request body".to_string(),
            );
        }
    };

    let method = parts.method.clone();
    let uri = parts.uri.clone();
    let request = RawRequest::new(parts.method, parts.uri, parts.headers, Some(body));

    let dispatched =
        tokio::time::timeout(shared.request_timeout, shared.routes.dispatch(request)).await;
    let envelope = match dispatched {
        Ok(envelope) => envelope,
        Err(_) => {
            tracing::warn!(method = %method, uri = %uri, "handler timed out");
            return failure(
                StatusCode::GATEWAY_TIMEOUT,
                "HANDLER_TIMEOUT",
                "Handler execution timed out".to_string(),
            );
        }
    };

    tracing::debug!(
        method = %method,
        uri = %uri,
        status = envelope.status().as_u16(),
        "request completed"
    );
    envelope.into_http().map(Full::new)
}

fn failure(status: StatusCode, code: &str, message: String) -> Response<Full<Bytes>> {
    ResponseEnvelope::error(status, &ErrorEnvelope::new(code, message))
        .into_http()
        .map(Full::new)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_applies_config() {
        let server = Server::builder()
            .http_addr("127.0.0.1:0")
            .shutdown_timeout(Duration::from_secs(1))
            .request_timeout(Duration::from_secs(2))
            .max_body_size(16)
            .build();

        assert_eq!(server.config().http_addr(), "127.0.0.1:0");
        assert_eq!(server.config().shutdown_timeout(), Duration::from_secs(1));
        assert_eq!(server.config().max_body_size(), 16);
        assert!(server.routes().is_empty());
    }

    #[test]
    fn test_builder_from_config() {
        let config = ServerConfig::builder()
            .http_addr("127.0.0.1:4000")
            .keep_alive(false)
            .build();
        let server = Server::builder().config(config.clone()).build();
        assert_eq!(server.config(), &config);
    }

    #[tokio::test]
    async fn test_invalid_address() {
        let server = Server::builder().http_addr("nowhere").build();
        let err = server
            .run_with_shutdown(ShutdownSignal::new())
            .await
            .unwrap_err();
        assert!(matches!(err, ServerError::InvalidAddress { .. }));
    }

    #[tokio::test]
    async fn test_stops_on_shutdown() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let shutdown = ShutdownSignal::new();
        let server = Server::builder().build();

        let handle = tokio::spawn(server.serve(listener, shutdown.clone()));
        shutdown.trigger();

        let result = tokio::time::timeout(Duration::from_secs(2), handle)
            .await
            .unwrap()
            .unwrap();
        assert!(result.is_ok());
    }

    #[test]
    fn test_failure_response() {
        let response = failure(
            StatusCode::PAYLOAD_TOO_LARGE,
            "PAYLOAD_TOO_LARGE",
            "too big".to_string(),
        );
        assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
        assert!(response.headers().contains_key(http::header::CONTENT_LENGTH));
    }
}
