//! Radix tree node implementation.
//!
//! Each node owns one path segment. Children are split by kind so that
//! matching can try static segments first, then the parameter child, then
//! the catch-all.

use http::Method;

use crate::method_router::MethodRouter;
use crate::params::Params;
use crate::RouteError;

/// Type of path segment in the radix tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SegmentKind {
    /// Static path segment (e.g., `users`)
    Static,
    /// Named parameter (`:id` or `{id}`)
    Param(String),
    /// Catch-all (`*path`, `**`), must be the last segment
    Wildcard(String),
}

impl SegmentKind {
    /// Classifies a single path segment.
    #[must_use]
    pub fn parse(segment: &str) -> Self {
        if let Some(name) = segment
            .strip_prefix('{')
            .and_then(|s| s.strip_suffix('}'))
            .or_else(|| segment.strip_prefix(':'))
        {
            Self::Param(name.to_string())
        } else if segment.starts_with('*') {
            let name = segment.trim_start_matches('*');
            Self::Wildcard(if name.is_empty() { "*" } else { name }.to_string())
        } else {
            Self::Static
        }
    }
}

/// A node in the radix tree.
#[derive(Debug, Clone)]
pub struct Node<T> {
    /// The path segment this node represents
    pub segment: String,

    /// The kind of segment
    pub kind: SegmentKind,

    /// Handlers for this node, if a route ends here
    pub methods: Option<MethodRouter<T>>,

    /// Static children, sorted by segment for binary search
    pub static_children: Vec<Node<T>>,

    /// Parameter child (at most one per node)
    pub param_child: Option<Box<Node<T>>>,

    /// Wildcard child (at most one per node, always a leaf)
    pub wildcard_child: Option<Box<Node<T>>>,
}

impl<T> Node<T> {
    fn with_kind(segment: &str, kind: SegmentKind) -> Self {
        Self {
            segment: segment.to_string(),
            kind,
            methods: None,
            static_children: Vec::new(),
            param_child: None,
            wildcard_child: None,
        }
    }

    /// Creates a root node for the tree.
    #[must_use]
    pub fn root() -> Self {
        Self::with_kind("", SegmentKind::Static)
    }

    /// Inserts one handler under `segments`, returning the handler it replaces.
    pub fn insert<S: AsRef<str>>(
        &mut self,
        segments: &[S],
        method: &Method,
        handler: T,
    ) -> Result<Option<T>, RouteError> {
        let target = self.descend(segments, segments)?;
        target
            .methods
            .get_or_insert_with(MethodRouter::new)
            .set(method, handler)
    }

    /// Walks to the node for `segments`, creating nodes on the way.
    fn descend<S: AsRef<str>>(
        &mut self,
        segments: &[S],
        full: &[S],
    ) -> Result<&mut Self, RouteError> {
        let Some((first, remaining)) = segments.split_first() else {
            return Ok(self);
        };
        let segment = first.as_ref();

        match SegmentKind::parse(segment) {
            SegmentKind::Static => {
                let index = match self
                    .static_children
                    .binary_search_by(|c| c.segment.as_str().cmp(segment))
                {
                    Ok(index) => index,
                    Err(index) => {
                        self.static_children
                            .insert(index, Self::with_kind(segment, SegmentKind::Static));
                        index
                    }
                };
                self.static_children[index].descend(remaining, full)
            }
            SegmentKind::Param(name) => {
                let child = self.param_child.get_or_insert_with(|| {
                    Box::new(Self::with_kind(segment, SegmentKind::Param(name.clone())))
                });
                if child.kind != SegmentKind::Param(name.clone()) {
                    return Err(RouteError::ConflictingParam {
                        path: join(full),
                        existing: child.segment.clone(),
                        new: segment.to_string(),
                    });
                }
                child.descend(remaining, full)
            }
            SegmentKind::Wildcard(name) => {
                if !remaining.is_empty() {
                    return Err(RouteError::WildcardNotLast { path: join(full) });
                }
                let child = self.wildcard_child.get_or_insert_with(|| {
                    Box::new(Self::with_kind(segment, SegmentKind::Wildcard(name)))
                });
                Ok(child.as_mut())
            }
        }
    }

    /// Matches a request path against the tree.
    ///
    /// Returns the method table and the extracted parameters.
    #[must_use]
    pub fn match_path(&self, path: &str) -> Option<(&MethodRouter<T>, Params)> {
        let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
        let mut params = Params::new();
        let methods = self.match_segments(&segments, &mut params)?;
        Some((methods, params))
    }

    fn match_segments(&self, segments: &[&str], params: &mut Params) -> Option<&MethodRouter<T>> {
        let Some((&segment, remaining)) = segments.split_first() else {
            return self
                .methods
                .as_ref()
                .or_else(|| self.wildcard_methods(segments, params));
        };

        if let Some(child) = self.find_static_child(segment) {
            if let Some(found) = child.match_segments(remaining, params) {
                return Some(found);
            }
        }

        if let Some(child) = &self.param_child {
            if let SegmentKind::Param(name) = &child.kind {
                let mark = params.len();
                params.push(name.clone(), segment);
                if let Some(found) = child.match_segments(remaining, params) {
                    return Some(found);
                }
                params.truncate(mark);
            }
        }

        self.wildcard_methods(segments, params)
    }

    fn wildcard_methods(&self, segments: &[&str], params: &mut Params) -> Option<&MethodRouter<T>> {
        let child = self.wildcard_child.as_ref()?;
        let methods = child.methods.as_ref()?;
        if let SegmentKind::Wildcard(name) = &child.kind {
            params.push(name.clone(), segments.join("/"));
        }
        Some(methods)
    }

    fn find_static_child(&self, segment: &str) -> Option<&Self> {
        self.static_children
            .binary_search_by(|c| c.segment.as_str().cmp(segment))
            .ok()
            .map(|i| &self.static_children[i])
    }
}

fn join<S: AsRef<str>>(segments: &[S]) -> String {
    let parts: Vec<&str> = segments.iter().map(AsRef::as_ref).collect();
    format!("/{}", parts.join("/"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn insert(root: &mut Node<&'static str>, path: &str, method: &Method, handler: &'static str) {
        let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
        root.insert(&segments, method, handler).unwrap();
    }

    #[test]
    fn test_segment_kind_parse() {
        assert_eq!(SegmentKind::parse("users"), SegmentKind::Static);
        assert_eq!(SegmentKind::parse(":id"), SegmentKind::Param("id".into()));
        assert_eq!(SegmentKind::parse("{id}"), SegmentKind::Param("id".into()));
        assert_eq!(SegmentKind::parse("*path"), SegmentKind::Wildcard("path".into()));
        assert_eq!(SegmentKind::parse("**"), SegmentKind::Wildcard("*".into()));
    }

    #[test]
    fn test_insert_and_match_static() {
        let mut root = Node::root();
        insert(&mut root, "/users", &Method::GET, "listUsers");

        let (methods, params) = root.match_path("/users").unwrap();
        assert_eq!(methods.handler(&Method::GET), Some(&"listUsers"));
        assert!(params.is_empty());
    }

    #[test]
    fn test_insert_and_match_param() {
        let mut root = Node::root();
        insert(&mut root, "/users/:id", &Method::GET, "getUser");

        let (methods, params) = root.match_path("/users/123").unwrap();
        assert_eq!(methods.handler(&Method::GET), Some(&"getUser"));
        assert_eq!(params.get("id"), Some("123"));
    }

    #[test]
    fn test_insert_and_match_wildcard() {
        let mut root = Node::root();
        insert(&mut root, "/files/*path", &Method::GET, "serveFile");

        let (methods, params) = root.match_path("/files/images/logo.png").unwrap();
        assert_eq!(methods.handler(&Method::GET), Some(&"serveFile"));
        assert_eq!(params.get("path"), Some("images/logo.png"));
    }

    #[test]
    fn test_static_priority_over_param() {
        let mut root = Node::root();
        insert(&mut root, "/users/me", &Method::GET, "getCurrentUser");
        insert(&mut root, "/users/:id", &Method::GET, "getUser");

        let (methods, _) = root.match_path("/users/me").unwrap();
        assert_eq!(methods.handler(&Method::GET), Some(&"getCurrentUser"));

        let (methods, params) = root.match_path("/users/123").unwrap();
        assert_eq!(methods.handler(&Method::GET), Some(&"getUser"));
        assert_eq!(params.get("id"), Some("123"));
    }

    #[test]
    fn test_param_backtrack_discards_binding() {
        let mut root = Node::root();
        insert(&mut root, "/a/:x/b", &Method::GET, "param");
        insert(&mut root, "/a/*rest", &Method::GET, "wildcard");

        let (methods, params) = root.match_path("/a/1/c").unwrap();
        assert_eq!(methods.handler(&Method::GET), Some(&"wildcard"));
        assert_eq!(params.get("x"), None);
        assert_eq!(params.get("rest"), Some("1/c"));
    }

    #[test]
    fn test_same_path_accumulates_methods() {
        let mut root = Node::root();
        insert(&mut root, "/items", &Method::GET, "list");
        insert(&mut root, "/items", &Method::POST, "create");

        let (methods, _) = root.match_path("/items").unwrap();
        assert_eq!(methods.allowed_methods(), vec![Method::GET, Method::POST]);
    }

    #[test]
    fn test_wildcard_must_be_last() {
        let mut root: Node<()> = Node::root();
        let err = root.insert(&["files", "*path", "x"], &Method::GET, ()).unwrap_err();
        assert!(matches!(err, RouteError::WildcardNotLast { .. }));
    }

    #[test]
    fn test_conflicting_param_names() {
        let mut root: Node<()> = Node::root();
        root.insert(&["users", ":id"], &Method::GET, ()).unwrap();
        let err = root
            .insert(&["users", ":name"], &Method::PUT, ())
            .unwrap_err();
        assert!(matches!(err, RouteError::ConflictingParam { .. }));
    }

    #[test]
    fn test_no_match() {
        let mut root = Node::root();
        insert(&mut root, "/users", &Method::GET, "listUsers");
        assert!(root.match_path("/posts").is_none());
        assert!(root.match_path("/users/1").is_none());
    }

    #[test]
    fn test_nested_routes() {
        let mut root = Node::root();
        insert(&mut root, "/api/v1/users", &Method::GET, "listUsers");
        insert(&mut root, "/api/v1/users/:id", &Method::GET, "getUser");
        insert(&mut root, "/api/v1/users/:id", &Method::DELETE, "deleteUser");
        insert(&mut root, "/api/v1/posts", &Method::GET, "listPosts");

        let (methods, params) = root.match_path("/api/v1/users/123").unwrap();
        assert_eq!(methods.handler(&Method::GET), Some(&"getUser"));
        assert_eq!(methods.handler(&Method::DELETE), Some(&"deleteUser"));
        assert_eq!(params.get("id"), Some("123"));

        let (methods, _) = root.match_path("/api/v1/posts").unwrap();
        assert_eq!(methods.handler(&Method::GET), Some(&"listPosts"));
    }
}
