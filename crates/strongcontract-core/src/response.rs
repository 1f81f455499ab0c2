//! Response encoding kinds.
//!
//! Every response type declares how it reaches the wire through
//! [`ContractResponse::into_kind`]. Structured values go through the JSON
//! encoder; [`RawBytes`] overrides the default and is written verbatim.

use crate::{Empty, RawBytes};
use bytes::Bytes;
use serde::Serialize;

/// How a response value is encoded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResponseKind<T> {
    /// Run the structured encoder over the value.
    Structured(T),
    /// Emit the bytes unchanged.
    RawBytes(Bytes),
}

/// A type that can be returned from a contract handler.
///
/// The default implementation selects [`ResponseKind::Structured`]. Only
/// raw binary responses override it.
///
/// ```
/// use strongcontract_core::{ContractResponse, ResponseKind};
///
/// #[derive(serde::Serialize)]
/// struct Reply {
///     message: String,
/// }
///
/// impl ContractResponse for Reply {}
///
/// let kind = Reply { message: "hi".into() }.into_kind();
/// assert!(matches!(kind, ResponseKind::Structured(_)));
/// ```
pub trait ContractResponse: Serialize + Sized {
    /// Selects the encoding for this value.
    fn into_kind(self) -> ResponseKind<Self> {
        ResponseKind::Structured(self)
    }
}

impl ContractResponse for RawBytes {
    fn into_kind(self) -> ResponseKind<Self> {
        ResponseKind::RawBytes(self.0)
    }
}

impl ContractResponse for Empty {}
impl ContractResponse for () {}
impl ContractResponse for bool {}
impl ContractResponse for String {}
impl ContractResponse for i64 {}
impl ContractResponse for u64 {}
impl ContractResponse for f64 {}
impl ContractResponse for serde_json::Value {}
impl<T: Serialize> ContractResponse for Vec<T> {}
impl<T: Serialize> ContractResponse for Option<T> {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_raw_bytes_selects_raw_kind() {
        let kind = RawBytes::from(vec![1u8, 2, 3]).into_kind();
        assert_eq!(kind, ResponseKind::RawBytes(Bytes::from_static(&[1, 2, 3])));
    }

    #[test]
    fn test_byte_vectors_stay_structured() {
        let kind = vec![1u8, 2, 3].into_kind();
        assert_eq!(kind, ResponseKind::Structured(vec![1, 2, 3]));
    }

    #[test]
    fn test_empty_is_structured() {
        assert_eq!(Empty {}.into_kind(), ResponseKind::Structured(Empty {}));
    }
}
