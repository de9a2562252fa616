//! Response head parsing.
//!
//! # Responsibilities
//! - Locate the header terminator in raw bytes
//! - Split off the status line and parse the header fields with `httparse`
//! - Expose the fields the engine needs (content type/length, location)
//!
//! # Design Decisions
//! - Header names are matched ASCII case-insensitively
//! - Duplicate headers: the first occurrence wins
//! - The status line is kept raw and parsed on demand so a PNG body can be
//!   classified before the status line is validated
//! - Header values are decoded lossily; non-UTF-8 values never abort parsing

use std::collections::HashMap;

use crate::error::{ClientError, Result};

/// The `\r\n\r\n` sequence ending a header block.
pub const HEADER_TERMINATOR: &[u8] = b"\r\n\r\n";

/// Most header fields accepted in one response.
pub const MAX_HEADERS: usize = 64;

pub const CONTENT_TYPE: &str = "content-type";
pub const CONTENT_LENGTH: &str = "content-length";
pub const LOCATION: &str = "location";

/// Offset just past the header terminator, if present.
pub fn find_header_end(buf: &[u8]) -> Option<usize> {
    buf.windows(HEADER_TERMINATOR.len())
        .position(|w| w == HEADER_TERMINATOR)
        .map(|pos| pos + HEADER_TERMINATOR.len())
}

/// Parsed view of a response head.
#[derive(Debug, Clone)]
pub struct ResponseHeaders {
    status_line: String,
    fields: HashMap<String, String>,
    head_len: usize,
}

impl ResponseHeaders {
    /// Parse a header block. `head` must include the terminator; its length
    /// is kept as the body offset.
    pub fn parse(head: &[u8]) -> Result<Self> {
        let line_end = head
            .windows(2)
            .position(|w| w == b"\r\n")
            .ok_or(ClientError::IncompleteHeaders { received: head.len() })?;
        let status_line = String::from_utf8_lossy(&head[..line_end]).into_owned();

        let mut raw = [httparse::EMPTY_HEADER; MAX_HEADERS];
        let parsed = match httparse::parse_headers(&head[line_end + 2..], &mut raw)? {
            httparse::Status::Complete((_, parsed)) => parsed,
            httparse::Status::Partial => {
                return Err(ClientError::IncompleteHeaders { received: head.len() })
            }
        };

        let mut fields = HashMap::with_capacity(parsed.len());
        for header in parsed {
            fields
                .entry(header.name.to_ascii_lowercase())
                .or_insert_with(|| String::from_utf8_lossy(header.value).trim().to_string());
        }

        Ok(Self {
            status_line,
            fields,
            head_len: head.len(),
        })
    }

    /// Numeric status from `HTTP/<version> <code>`.
    pub fn status_code(&self) -> Result<u16> {
        let mut parts = self.status_line.split_whitespace();
        let version = parts.next().unwrap_or_default();
        let code = parts.next().unwrap_or_default();

        if !version.starts_with("HTTP/") || code.len() != 3 {
            return Err(ClientError::MalformedStatusLine(self.status_line.clone()));
        }
        code.parse()
            .map_err(|_| ClientError::MalformedStatusLine(self.status_line.clone()))
    }

    pub fn status_line(&self) -> &str {
        &self.status_line
    }

    /// Case-insensitive header lookup.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.fields.get(&name.to_ascii_lowercase()).map(String::as_str)
    }

    pub fn content_type(&self) -> Option<&str> {
        self.get(CONTENT_TYPE)
    }

    /// `Content-Length`, if present and numeric.
    pub fn content_length(&self) -> Option<u64> {
        let raw = self.get(CONTENT_LENGTH)?;
        match raw.parse() {
            Ok(len) => Some(len),
            Err(_) => {
                tracing::warn!(value = raw, "Ignoring unparsable Content-Length");
                None
            }
        }
    }

    pub fn location(&self) -> Option<&str> {
        self.get(LOCATION).filter(|loc| !loc.is_empty())
    }

    /// True when the body is a PNG image.
    pub fn is_png(&self) -> bool {
        self.content_type()
            .map(|ct| ct.to_ascii_lowercase().contains("image/png"))
            .unwrap_or(false)
    }

    /// Length of the head in bytes, terminator included.
    pub fn head_len(&self) -> usize {
        self.head_len
    }
}

/// True for 3xx status codes.
pub fn is_redirect(status: u16) -> bool {
    (300..400).contains(&status)
}
