//! Named-field lookup in `multipart/form-data` bodies.
//!
//! This is not a MIME parser. It scans the raw body bytes for part
//! delimiters and returns the value of the first part whose headers carry
//! `Content-Disposition: form-data; name="<key>"`. Nothing is decoded as
//! text, so binary uploads come back byte-for-byte.
//!
//! The delimiter is `--<boundary>` when the `Content-Type` header declares a
//! boundary, and a bare `--` otherwise. A value runs from the blank line that
//! closes its part headers up to the next delimiter.
//!
//! # Example
//!
//! ```rust
//! use strongcontract_extract::multipart::{extract_field, extract_field_exact};
//!
//! let body = b"--abc\r\n\
//! Content-Disposition: form-data; name=\"metaData\"\r\n\r\n\
//! {\"format\":\"jpg\"}\r\n\
//! --abc\r\n\
//! Content-Disposition: form-data; name=\"file\"\r\n\r\n\
//! hello\r\n\
//! --abc--\r\n";
//!
//! assert_eq!(extract_field(body, Some("abc"), "metaData"), Some(&b"{\"format\":\"jpg\"}"[..]));
//! assert_eq!(extract_field_exact(body, Some("abc"), "file"), Some(&b"hello"[..]));
//! assert_eq!(extract_field(body, Some("abc"), "fileName"), None);
//! ```

use mime::Mime;

/// Form field carrying the JSON metadata of an upload.
pub const META_DATA_FIELD: &str = "metaData";

/// Form field carrying the uploaded bytes.
pub const FILE_FIELD: &str = "file";

/// Returns `true` if the content type is `multipart/*`.
#[must_use]
pub fn is_multipart(content_type: &str) -> bool {
    content_type
        .parse::<Mime>()
        .is_ok_and(|mime| mime.type_() == mime::MULTIPART)
}

/// Reads the `boundary` parameter from a `multipart/*` content type.
#[must_use]
pub fn boundary_from_content_type(content_type: &str) -> Option<String> {
    let mime: Mime = content_type.parse().ok()?;
    if mime.type_() != mime::MULTIPART {
        return None;
    }
    mime.get_param(mime::BOUNDARY)
        .map(|boundary| boundary.as_str().to_string())
        .filter(|boundary| !boundary.is_empty())
}

/// Returns the whitespace-trimmed value of the first field named `key`.
#[must_use]
pub fn extract_field<'a>(body: &'a [u8], boundary: Option<&str>, key: &str) -> Option<&'a [u8]> {
    find_value(body, boundary, key).map(trim)
}

/// Returns the value of the first field named `key` with only the line
/// break before the next delimiter removed.
///
/// Use this for uploaded content, where leading or trailing whitespace is
/// part of the data.
#[must_use]
pub fn extract_field_exact<'a>(
    body: &'a [u8],
    boundary: Option<&str>,
    key: &str,
) -> Option<&'a [u8]> {
    find_value(body, boundary, key).map(strip_line_break)
}

fn find_value<'a>(body: &'a [u8], boundary: Option<&str>, key: &str) -> Option<&'a [u8]> {
    let delimiter = match boundary {
        Some(boundary) => format!("--{boundary}"),
        None => "--".to_string(),
    };
    let disposition = format!("Content-Disposition: form-data; name=\"{key}\"");

    Parts::new(body, delimiter.as_bytes()).find_map(|part| {
        let (headers, value) = split_headers(part);
        find(headers, disposition.as_bytes(), 0).map(|_| value)
    })
}

/// Splits a part at the first blank line. A part without one is all headers.
fn split_headers(part: &[u8]) -> (&[u8], &[u8]) {
    let crlf = find(part, b"\r\n\r\n", 0).map(|at| (at, 4));
    let lf = find(part, b"\n\n", 0).map(|at| (at, 2));
    let blank = match (crlf, lf) {
        (Some(a), Some(b)) => Some(if a.0 <= b.0 { a } else { b }),
        (a, b) => a.or(b),
    };
    match blank {
        Some((at, len)) => (&part[..at], &part[at + len..]),
        None => (part, &[]),
    }
}

fn trim(value: &[u8]) -> &[u8] {
    let start = value
        .iter()
        .position(|b| !b.is_ascii_whitespace())
        .unwrap_or(value.len());
    let end = value
        .iter()
        .rposition(|b| !b.is_ascii_whitespace())
        .map_or(start, |at| at + 1);
    &value[start..end]
}

fn strip_line_break(value: &[u8]) -> &[u8] {
    value
        .strip_suffix(b"\r\n")
        .or_else(|| value.strip_suffix(b"\n"))
        .unwrap_or(value)
}

fn find(haystack: &[u8], needle: &[u8], from: usize) -> Option<usize> {
    if needle.is_empty() || from > haystack.len() {
        return None;
    }
    haystack[from..]
        .windows(needle.len())
        .position(|window| window == needle)
        .map(|at| at + from)
}

/// Iterator over the byte ranges between consecutive delimiters.
struct Parts<'a, 'd> {
    body: &'a [u8],
    delimiter: &'d [u8],
    cursor: Option<usize>,
}

impl<'a, 'd> Parts<'a, 'd> {
    fn new(body: &'a [u8], delimiter: &'d [u8]) -> Self {
        Self {
            body,
            delimiter,
            cursor: Some(0),
        }
    }
}

impl<'a> Iterator for Parts<'a, '_> {
    type Item = &'a [u8];

    fn next(&mut self) -> Option<Self::Item> {
        let start = self.cursor?;
        match find(self.body, self.delimiter, start) {
            Some(at) => {
                self.cursor = Some(at + self.delimiter.len());
                Some(&self.body[start..at])
            }
            None => {
                self.cursor = None;
                Some(&self.body[start..])
            }
        }
    }
}
