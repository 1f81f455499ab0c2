//! Radix tree routing table for StrongContract.
//!
//! The router maps `(method, path)` pairs to an arbitrary handler type `T`.
//! Paths are stored as segments, the same shape contract descriptors use, so
//! registering a contract never has to re-join and re-split its path.
//!
//! Segment syntax:
//!
//! - `users` matches literally
//! - `:id` or `{id}` captures one segment as a parameter
//! - `*path` (or `**`) captures the rest of the path, must come last
//!
//! # Example
//!
//! ```rust
//! use strongcontract_router::Router;
//! use http::Method;
//!
//! let mut router = Router::new();
//! router.insert(&Method::GET, &["files", "*path"], "serveFile").unwrap();
//!
//! let found = router.match_route(&Method::GET, "/files/images/logo.png").unwrap();
//! assert_eq!(*found.handler, "serveFile");
//! assert_eq!(found.params.get("path"), Some("images/logo.png"));
//! ```

mod method_router;
mod node;
mod params;
mod router;

pub use method_router::MethodRouter;
pub use node::{Node, SegmentKind};
pub use params::Params;
pub use router::Router;

use http::Method;
use thiserror::Error;

/// A matched route: the handler and the captured parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteMatch<'a, T> {
    /// The handler registered for the route
    pub handler: &'a T,
    /// Captured path parameters
    pub params: Params,
}

impl<'a, T> RouteMatch<'a, T> {
    /// Creates a new route match.
    #[must_use]
    pub fn new(handler: &'a T, params: Params) -> Self {
        Self { handler, params }
    }
}

/// Errors raised while building the routing table.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RouteError {
    /// The method has no slot in the table.
    #[error("unsupported method: {0}")]
    UnsupportedMethod(Method),

    /// A catch-all segment is followed by more segments.
    #[error("wildcard must be the last segment in {path}")]
    WildcardNotLast {
        /// The offending path.
        path: String,
    },

    /// Two routes name the same parameter position differently.
    #[error("parameter {new} in {path} conflicts with existing {existing}")]
    ConflictingParam {
        /// The offending path.
        path: String,
        /// The segment already registered at this position.
        existing: String,
        /// The segment being registered.
        new: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_routing() {
        let mut router = Router::new();
        router.route(&Method::GET, "/users", "listUsers").unwrap();
        router.route(&Method::GET, "/users/:id", "getUser").unwrap();

        let m = router.match_route(&Method::GET, "/users").unwrap();
        assert_eq!(*m.handler, "listUsers");
        assert!(m.params.is_empty());

        let m = router.match_route(&Method::GET, "/users/123").unwrap();
        assert_eq!(*m.handler, "getUser");
        assert_eq!(m.params.get("id"), Some("123"));
    }

    #[test]
    fn test_method_routing() {
        let mut router = Router::new();
        router.route(&Method::GET, "/users", "listUsers").unwrap();
        router.route(&Method::POST, "/users", "createUser").unwrap();

        assert_eq!(
            router.match_route(&Method::POST, "/users").map(|m| *m.handler),
            Some("createUser")
        );
        assert!(router.match_route(&Method::DELETE, "/users").is_none());
    }

    #[test]
    fn test_route_error_display() {
        let err = RouteError::UnsupportedMethod(Method::OPTIONS);
        assert_eq!(err.to_string(), "unsupported method: OPTIONS");
    }
}
