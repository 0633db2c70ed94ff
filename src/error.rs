use memchr::memchr_iter;

use crate::constants::MAX_ERROR_LEN;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    MalformedJson,
    MissingFile,
    UnresolvedReference,
    UnknownType,
    InvalidColor,
    FactoryError,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Location {
    pub offset: usize,
    pub line: usize,
    pub column: usize,
}

impl Location {
    /// Resolves a byte offset into 1-based line and column numbers.
    pub fn from_offset(input: &[u8], offset: usize) -> Self {
        let offset = offset.min(input.len());
        let head = &input[..offset];
        let mut line = 1;
        let mut line_start = 0;
        for idx in memchr_iter(b'\n', head) {
            line += 1;
            line_start = idx + 1;
        }
        Self {
            offset,
            line,
            column: offset - line_start + 1,
        }
    }
}

#[derive(Debug, Clone, thiserror::Error)]
#[error("{message}")]
pub struct Error {
    pub kind: ErrorKind,
    pub message: String,
    /// The offending identifier, path or input fragment.
    pub detail: String,
    pub location: Option<Location>,
}

impl Error {
    pub fn new(kind: ErrorKind, prefix: &str, detail: impl Into<String>) -> Self {
        let detail = detail.into();
        Self {
            kind,
            message: compose_message(prefix, &detail),
            detail,
            location: None,
        }
    }

    pub fn malformed_json(input: &[u8], offset: usize) -> Self {
        let location = Location::from_offset(input, offset);
        let rest = &input[location.offset..];
        let mut end = rest.len().min(MAX_ERROR_LEN);
        while end > 0 && end < rest.len() && is_continuation(rest[end]) {
            end -= 1;
        }
        let rest = String::from_utf8_lossy(&rest[..end]);
        let prefix = format!(
            "Invalid JSON at line {}, column {}: ",
            location.line, location.column
        );
        Self::new(ErrorKind::MalformedJson, &prefix, rest).with_location(location)
    }

    pub fn missing_file(path: impl Into<String>) -> Self {
        Self::new(
            ErrorKind::MissingFile,
            "Unable to read skeleton file: ",
            path,
        )
    }

    pub fn unresolved(prefix: &str, name: impl Into<String>) -> Self {
        Self::new(ErrorKind::UnresolvedReference, prefix, name)
    }

    pub fn unknown_type(prefix: &str, name: impl Into<String>) -> Self {
        Self::new(ErrorKind::UnknownType, prefix, name)
    }

    pub fn invalid_color(value: impl Into<String>) -> Self {
        Self::new(ErrorKind::InvalidColor, "Invalid color: ", value)
    }

    pub fn factory(prefix: &str, detail: impl Into<String>) -> Self {
        Self::new(ErrorKind::FactoryError, prefix, detail)
    }

    pub fn with_location(mut self, location: Location) -> Self {
        self.location = Some(location);
        self
    }

    /// Rewrites the message prefix, keeping kind, detail and location.
    pub fn with_prefix(mut self, prefix: &str) -> Self {
        self.message = compose_message(prefix, &self.detail);
        self
    }
}

fn is_continuation(byte: u8) -> bool {
    byte & 0xC0 == 0x80
}

fn compose_message(prefix: &str, detail: &str) -> String {
    let mut message = String::with_capacity((prefix.len() + detail.len()).min(MAX_ERROR_LEN));
    message.push_str(prefix);
    message.push_str(detail);
    if message.len() > MAX_ERROR_LEN {
        let mut end = MAX_ERROR_LEN;
        while !message.is_char_boundary(end) {
            end -= 1;
        }
        message.truncate(end);
    }
    message
}
