//! Per-path method table.
//!
//! [`MethodRouter`] maps the six contract verbs to the handler registered for
//! them at a single path.

use http::Method;

use crate::RouteError;

/// Maps HTTP methods to handlers for a single route.
///
/// # Example
///
/// ```rust
/// use strongcontract_router::MethodRouter;
/// use http::Method;
///
/// let router = MethodRouter::new().get("listUsers").post("createUser");
///
/// assert_eq!(router.handler(&Method::GET), Some(&"listUsers"));
/// assert_eq!(router.handler(&Method::POST), Some(&"createUser"));
/// assert_eq!(router.handler(&Method::DELETE), None);
/// ```
#[derive(Debug, Clone)]
pub struct MethodRouter<T> {
    get: Option<T>,
    head: Option<T>,
    post: Option<T>,
    put: Option<T>,
    delete: Option<T>,
    patch: Option<T>,
}

impl<T> Default for MethodRouter<T> {
    fn default() -> Self {
        Self {
            get: None,
            head: None,
            post: None,
            put: None,
            delete: None,
            patch: None,
        }
    }
}

impl<T> MethodRouter<T> {
    /// Creates a new empty method router.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a GET handler.
    #[must_use]
    pub fn get(mut self, handler: T) -> Self {
        self.get = Some(handler);
        self
    }

    /// Registers a HEAD handler.
    #[must_use]
    pub fn head(mut self, handler: T) -> Self {
        self.head = Some(handler);
        self
    }

    /// Registers a POST handler.
    #[must_use]
    pub fn post(mut self, handler: T) -> Self {
        self.post = Some(handler);
        self
    }

    /// Registers a PUT handler.
    #[must_use]
    pub fn put(mut self, handler: T) -> Self {
        self.put = Some(handler);
        self
    }

    /// Registers a DELETE handler.
    #[must_use]
    pub fn delete(mut self, handler: T) -> Self {
        self.delete = Some(handler);
        self
    }

    /// Registers a PATCH handler.
    #[must_use]
    pub fn patch(mut self, handler: T) -> Self {
        self.patch = Some(handler);
        self
    }

    fn slot_mut(&mut self, method: &Method) -> Option<&mut Option<T>> {
        match *method {
            Method::GET => Some(&mut self.get),
            Method::HEAD => Some(&mut self.head),
            Method::POST => Some(&mut self.post),
            Method::PUT => Some(&mut self.put),
            Method::DELETE => Some(&mut self.delete),
            Method::PATCH => Some(&mut self.patch),
            _ => None,
        }
    }

    /// Sets the handler for `method`, returning the one it replaces.
    pub fn set(&mut self, method: &Method, handler: T) -> Result<Option<T>, RouteError> {
        let slot = self
            .slot_mut(method)
            .ok_or_else(|| RouteError::UnsupportedMethod(method.clone()))?;
        Ok(slot.replace(handler))
    }

    /// Returns the handler registered for `method`.
    #[must_use]
    pub fn handler(&self, method: &Method) -> Option<&T> {
        match *method {
            Method::GET => self.get.as_ref(),
            Method::HEAD => self.head.as_ref(),
            Method::POST => self.post.as_ref(),
            Method::PUT => self.put.as_ref(),
            Method::DELETE => self.delete.as_ref(),
            Method::PATCH => self.patch.as_ref(),
            _ => None,
        }
    }

    /// Returns the methods that have a handler, in a stable order.
    #[must_use]
    pub fn allowed_methods(&self) -> Vec<Method> {
        [
            (Method::GET, self.get.is_some()),
            (Method::HEAD, self.head.is_some()),
            (Method::POST, self.post.is_some()),
            (Method::PUT, self.put.is_some()),
            (Method::DELETE, self.delete.is_some()),
            (Method::PATCH, self.patch.is_some()),
        ]
        .into_iter()
        .filter_map(|(method, present)| present.then_some(method))
        .collect()
    }

    /// Returns the `Allow` header value for this route.
    #[must_use]
    pub fn allow_header(&self) -> String {
        self.allowed_methods()
            .iter()
            .map(Method::as_str)
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// Returns `true` if no handler is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.allowed_methods().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder() {
        let router = MethodRouter::new().get(1).head(2).post(3).put(4).delete(5).patch(6);
        assert_eq!(router.handler(&Method::GET), Some(&1));
        assert_eq!(router.handler(&Method::HEAD), Some(&2));
        assert_eq!(router.handler(&Method::POST), Some(&3));
        assert_eq!(router.handler(&Method::PUT), Some(&4));
        assert_eq!(router.handler(&Method::DELETE), Some(&5));
        assert_eq!(router.handler(&Method::PATCH), Some(&6));
        assert_eq!(router.handler(&Method::OPTIONS), None);
    }

    #[test]
    fn test_set_returns_previous() {
        let mut router = MethodRouter::new();
        assert_eq!(router.set(&Method::POST, "a").unwrap(), None);
        assert_eq!(router.set(&Method::POST, "b").unwrap(), Some("a"));
        assert_eq!(router.handler(&Method::POST), Some(&"b"));
    }

    #[test]
    fn test_set_unsupported_method() {
        let mut router = MethodRouter::new();
        let err = router.set(&Method::OPTIONS, "a").unwrap_err();
        assert!(matches!(err, RouteError::UnsupportedMethod(m) if m == Method::OPTIONS));
    }

    #[test]
    fn test_allowed_methods() {
        let router = MethodRouter::new().patch(()).get(()).head(());
        assert_eq!(
            router.allowed_methods(),
            vec![Method::GET, Method::HEAD, Method::PATCH]
        );
        assert_eq!(router.allow_header(), "GET, HEAD, PATCH");
        assert!(!router.is_empty());
        assert!(MethodRouter::<()>::new().is_empty());
    }
}
