//! Built-in payload shapes.

use bytes::Bytes;
use serde::{Deserialize, Serialize};
use std::ops::Deref;

/// The empty payload and response.
///
/// Serialises as `{}` and accepts any JSON object when decoded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Empty {}

/// Raw binary content, passed through without any encoding.
///
/// As a payload it receives the request body verbatim. As a response it is
/// written to the wire unchanged, bypassing the JSON encoder.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct RawBytes(pub Bytes);

impl RawBytes {
    /// Creates raw content from anything convertible to [`Bytes`].
    #[must_use]
    pub fn new(bytes: impl Into<Bytes>) -> Self {
        Self(bytes.into())
    }

    /// Returns the underlying bytes.
    #[must_use]
    pub fn into_inner(self) -> Bytes {
        self.0
    }
}

impl Deref for RawBytes {
    type Target = [u8];

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl AsRef<[u8]> for RawBytes {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl From<Bytes> for RawBytes {
    fn from(bytes: Bytes) -> Self {
        Self(bytes)
    }
}

impl From<Vec<u8>> for RawBytes {
    fn from(bytes: Vec<u8>) -> Self {
        Self(Bytes::from(bytes))
    }
}

impl From<&'static [u8]> for RawBytes {
    fn from(bytes: &'static [u8]) -> Self {
        Self(Bytes::from_static(bytes))
    }
}

impl From<RawBytes> for Bytes {
    fn from(raw: RawBytes) -> Self {
        raw.0
    }
}

impl Serialize for RawBytes {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_bytes(&self.0)
    }
}

/// Metadata that names the format of an accompanying upload.
pub trait HasFormat {
    /// The format of the uploaded data, e.g. `jpg`.
    fn format(&self) -> &str;
}

/// A multipart upload: structured metadata plus an opaque byte blob.
///
/// On the wire the metadata travels in the `metaData` form field as JSON and
/// the blob in the `file` field.
#[derive(Debug, Clone, PartialEq)]
pub struct MultiFormPayload<M> {
    /// The decoded `metaData` field.
    pub meta_data: M,
    /// The contents of the `file` field.
    pub data: Bytes,
}

impl<M> MultiFormPayload<M> {
    /// Creates a payload from its parts.
    #[must_use]
    pub fn new(meta_data: M, data: impl Into<Bytes>) -> Self {
        Self {
            meta_data,
            data: data.into(),
        }
    }

    /// Returns the decoded metadata.
    #[must_use]
    pub const fn meta_data(&self) -> &M {
        &self.meta_data
    }

    /// Returns the uploaded bytes.
    #[must_use]
    pub const fn data(&self) -> &Bytes {
        &self.data
    }

    /// Splits the payload into metadata and bytes.
    #[must_use]
    pub fn into_parts(self) -> (M, Bytes) {
        (self.meta_data, self.data)
    }
}

impl<M: HasFormat> MultiFormPayload<M> {
    /// Returns the format declared by the metadata.
    #[must_use]
    pub fn format(&self) -> &str {
        self.meta_data.format()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Meta {
        format: String,
    }

    impl HasFormat for Meta {
        fn format(&self) -> &str {
            &self.format
        }
    }

    #[test]
    fn test_empty_serializes_as_object() {
        assert_eq!(serde_json::to_string(&Empty {}).unwrap(), "{}");
        let empty: Empty = serde_json::from_str(r#"{"ignored": 1}"#).unwrap();
        assert_eq!(empty, Empty {});
    }

    #[test]
    fn test_raw_bytes_conversions() {
        let raw = RawBytes::from(vec![0u8, 159, 146, 150]);
        assert_eq!(&*raw, &[0u8, 159, 146, 150]);
        assert_eq!(raw.len(), 4);
        let bytes: Bytes = raw.into();
        assert_eq!(bytes.len(), 4);
        assert_eq!(RawBytes::from(&b"abc"[..]).into_inner(), Bytes::from_static(b"abc"));
    }

    #[test]
    fn test_multi_form_payload_format() {
        let payload = MultiFormPayload::new(
            Meta {
                format: "jpg".into(),
            },
            "hello",
        );
        assert_eq!(payload.format(), "jpg");
        assert_eq!(payload.data(), &Bytes::from_static(b"hello"));
        let (meta, data) = payload.into_parts();
        assert_eq!(meta.format, "jpg");
        assert_eq!(data, "hello");
    }
}
