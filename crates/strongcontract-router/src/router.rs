//! High-level router API.

use http::Method;

use crate::method_router::MethodRouter;
use crate::node::Node;
use crate::params::Params;
use crate::{RouteError, RouteMatch};

/// A radix tree router generic over the stored handler.
///
/// Routes are keyed by path segments and method. Matching prefers static
/// segments, then parameters, then catch-alls, so `/users/me` wins over
/// `/users/:id` for the path `/users/me`.
///
/// # Example
///
/// ```rust
/// use strongcontract_router::Router;
/// use http::Method;
///
/// let mut router = Router::new();
/// router.route(&Method::GET, "/users/:id", "getUser").unwrap();
/// router.route(&Method::PUT, "/users/:id", "updateUser").unwrap();
///
/// let found = router.match_route(&Method::GET, "/users/123").unwrap();
/// assert_eq!(*found.handler, "getUser");
/// assert_eq!(found.params.get("id"), Some("123"));
/// ```
#[derive(Debug, Clone)]
pub struct Router<T> {
    root: Node<T>,
    route_count: usize,
}

impl<T> Default for Router<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Router<T> {
    /// Creates a new empty router.
    #[must_use]
    pub fn new() -> Self {
        Self {
            root: Node::root(),
            route_count: 0,
        }
    }

    /// Registers `handler` for `method` at the given path segments.
    ///
    /// Returns the handler previously registered for the same method and
    /// path, if any.
    pub fn insert<S: AsRef<str>>(
        &mut self,
        method: &Method,
        segments: &[S],
        handler: T,
    ) -> Result<Option<T>, RouteError> {
        let replaced = self.root.insert(segments, method, handler)?;
        if replaced.is_none() {
            self.route_count += 1;
        }
        Ok(replaced)
    }

    /// Registers `handler` for `method` at a `/`-separated path.
    pub fn route(
        &mut self,
        method: &Method,
        path: &str,
        handler: T,
    ) -> Result<Option<T>, RouteError> {
        let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
        self.insert(method, &segments, handler)
    }

    /// Matches a method and path.
    #[must_use]
    pub fn match_route(&self, method: &Method, path: &str) -> Option<RouteMatch<'_, T>> {
        let (methods, params) = self.root.match_path(path)?;
        let handler = methods.handler(method)?;
        Some(RouteMatch::new(handler, params))
    }

    /// Matches a path regardless of method.
    ///
    /// Used to tell a missing route (404) from a missing method (405).
    #[must_use]
    pub fn match_path(&self, path: &str) -> Option<(&MethodRouter<T>, Params)> {
        self.root.match_path(path)
    }

    /// Returns the number of (method, path) routes registered.
    #[must_use]
    pub fn len(&self) -> usize {
        self.route_count
    }

    /// Returns true if no routes are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.route_count == 0
    }
}
