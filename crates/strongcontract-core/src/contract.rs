//! Contract descriptors.
//!
//! A contract pairs an HTTP verb and a path template with the payload type a
//! client sends and the response type the server returns. The types are
//! carried at the type level only, so a descriptor is cheap to clone and can
//! be shared between the client and server halves of an application.
//!
//! # Example
//!
//! ```
//! use strongcontract_core::contract::{Contract, ContractDescriptor, Verb};
//! use strongcontract_core::Empty;
//!
//! #[derive(serde::Serialize, serde::Deserialize)]
//! struct Greeting {
//!     message: String,
//! }
//!
//! let greet: ContractDescriptor<Greeting, Greeting> = ContractDescriptor::post("/v1/greet/");
//! assert_eq!(greet.verb(), Verb::Post);
//! assert_eq!(greet.path_segments(), vec!["v1", "greet"]);
//!
//! let health: ContractDescriptor<Empty, Empty> = ContractDescriptor::get("health");
//! assert!(health.verb().is_bodiless());
//! ```

use crate::ContractError;
use http::Method;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::marker::PhantomData;
use std::str::FromStr;

/// The HTTP verbs a contract may declare.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Verb {
    /// `GET`
    Get,
    /// `HEAD`
    Head,
    /// `POST`
    Post,
    /// `PUT`
    Put,
    /// `DELETE`
    Delete,
    /// `PATCH`
    Patch,
}

impl Verb {
    /// All supported verbs.
    pub const ALL: [Self; 6] = [
        Self::Get,
        Self::Head,
        Self::Post,
        Self::Put,
        Self::Delete,
        Self::Patch,
    ];

    /// Returns `true` for verbs that never carry a request body.
    #[must_use]
    pub const fn is_bodiless(self) -> bool {
        matches!(self, Self::Get | Self::Head)
    }

    /// Returns the canonical upper-case name of the verb.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Head => "HEAD",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Delete => "DELETE",
            Self::Patch => "PATCH",
        }
    }

    /// Returns the matching [`http::Method`].
    #[must_use]
    pub fn to_method(self) -> Method {
        match self {
            Self::Get => Method::GET,
            Self::Head => Method::HEAD,
            Self::Post => Method::POST,
            Self::Put => Method::PUT,
            Self::Delete => Method::DELETE,
            Self::Patch => Method::PATCH,
        }
    }
}

impl fmt::Display for Verb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&Method> for Verb {
    type Error = ContractError;

    fn try_from(method: &Method) -> Result<Self, Self::Error> {
        match *method {
            Method::GET => Ok(Self::Get),
            Method::HEAD => Ok(Self::Head),
            Method::POST => Ok(Self::Post),
            Method::PUT => Ok(Self::Put),
            Method::DELETE => Ok(Self::Delete),
            Method::PATCH => Ok(Self::Patch),
            _ => Err(ContractError::configuration(format!(
                "unsupported HTTP method: {method}"
            ))),
        }
    }
}

impl From<Verb> for Method {
    fn from(verb: Verb) -> Self {
        verb.to_method()
    }
}

impl FromStr for Verb {
    type Err = ContractError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|verb| verb.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| ContractError::configuration(format!("unsupported HTTP method: {s}")))
    }
}

/// Splits a path template into its non-empty segments, preserving order.
#[must_use]
pub fn split_path(path: &str) -> Vec<String> {
    path.split('/')
        .filter(|segment| !segment.is_empty())
        .map(ToString::to_string)
        .collect()
}

/// A declared endpoint.
///
/// Implemented by [`ContractDescriptor`]; applications with their own
/// descriptor types can implement it directly.
pub trait Contract: Send + Sync + 'static {
    /// The decoded request body type.
    type Payload;
    /// The response body type.
    type Response;

    /// The verb the endpoint answers to.
    fn verb(&self) -> Verb;

    /// The path template, e.g. `/v1/users/:id`.
    fn path(&self) -> &str;

    /// The non-empty path segments, in order.
    fn path_segments(&self) -> Vec<String> {
        split_path(self.path())
    }
}

/// A contract descriptor carrying its payload and response types as phantoms.
pub struct ContractDescriptor<P, R> {
    verb: Verb,
    path: String,
    _types: PhantomData<fn(P) -> R>,
}

impl<P, R> ContractDescriptor<P, R> {
    /// Creates a descriptor for `verb` at `path`.
    #[must_use]
    pub fn new(verb: Verb, path: impl Into<String>) -> Self {
        Self {
            verb,
            path: path.into(),
            _types: PhantomData,
        }
    }

    /// Creates a `GET` descriptor.
    #[must_use]
    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Verb::Get, path)
    }

    /// Creates a `HEAD` descriptor.
    #[must_use]
    pub fn head(path: impl Into<String>) -> Self {
        Self::new(Verb::Head, path)
    }

    /// Creates a `POST` descriptor.
    #[must_use]
    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Verb::Post, path)
    }

    /// Creates a `PUT` descriptor.
    #[must_use]
    pub fn put(path: impl Into<String>) -> Self {
        Self::new(Verb::Put, path)
    }

    /// Creates a `DELETE` descriptor.
    #[must_use]
    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Verb::Delete, path)
    }

    /// Creates a `PATCH` descriptor.
    #[must_use]
    pub fn patch(path: impl Into<String>) -> Self {
        Self::new(Verb::Patch, path)
    }

    /// Returns the declared verb.
    #[must_use]
    pub const fn verb(&self) -> Verb {
        self.verb
    }

    /// Returns the declared verb as an [`http::Method`].
    #[must_use]
    pub fn method(&self) -> Method {
        self.verb.to_method()
    }

    /// Returns the path template.
    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Returns the non-empty path segments, in order.
    #[must_use]
    pub fn path_segments(&self) -> Vec<String> {
        split_path(&self.path)
    }
}

impl<P, R> Clone for ContractDescriptor<P, R> {
    fn clone(&self) -> Self {
        Self {
            verb: self.verb,
            path: self.path.clone(),
            _types: PhantomData,
        }
    }
}

impl<P, R> fmt::Debug for ContractDescriptor<P, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ContractDescriptor")
            .field("verb", &self.verb)
            .field("path", &self.path)
            .field("payload", &std::any::type_name::<P>())
            .field("response", &std::any::type_name::<R>())
            .finish()
    }
}

impl<P: 'static, R: 'static> Contract for ContractDescriptor<P, R> {
    type Payload = P;
    type Response = R;

    fn verb(&self) -> Verb {
        self.verb
    }

    fn path(&self) -> &str {
        &self.path
    }
}
