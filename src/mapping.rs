//! Mapping file lines and namespaced keys.

use crate::errors::MapError;
use std::fmt;
use std::fmt::Display;

/// Prefix used when none is given on the command line.
pub const DEFAULT_NAMESPACE: &str = "foomap:";

/// A single `source target` pair from a mapping file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MappingEntry {
    /// Key, before namespacing
    pub source: String,
    /// Value stored for the key
    pub target: String,
}

impl Display for MappingEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "source: {} target: {}", self.source, self.target)
    }
}

/// Is this line skipped entirely by the importer?
///
/// Blank lines and lines whose first character is `#` are ignored.
pub fn is_ignored(line: &str) -> bool {
    line.trim().is_empty() || line.starts_with('#')
}

/// Parse one line of a mapping file.
///
/// Returns `Ok(None)` for lines that should be ignored, and a
/// [`MapError::MalformedLine`] when the line isn't exactly two tokens.
pub fn parse_line(line_number: usize, line: &str) -> Result<Option<MappingEntry>, MapError> {
    if is_ignored(line) {
        return Ok(None);
    }

    let tokens: Vec<&str> = line.split_whitespace().collect();
    match tokens.as_slice() {
        [source, target] => Ok(Some(MappingEntry {
            source: (*source).to_owned(),
            target: (*target).to_owned(),
        })),
        _ => Err(MapError::MalformedLine {
            line_number,
            tokens: tokens.len(),
        }),
    }
}

/// Prefix isolating our keys from everything else in the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Namespace(String);

impl Namespace {
    #[allow(missing_docs)]
    pub fn new(prefix: impl Into<String>) -> Namespace {
        Namespace(prefix.into())
    }

    /// The key under which `source` is stored.
    pub fn key(&self, source: &str) -> String {
        [self.0.as_str(), source].concat()
    }

    #[allow(missing_docs)]
    pub fn prefix(&self) -> &str {
        &self.0
    }
}

impl Default for Namespace {
    fn default() -> Self {
        Namespace::new(DEFAULT_NAMESPACE)
    }
}

impl Display for Namespace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl slog::Value for Namespace {
    fn serialize(
        &self,
        _rec: &slog::Record,
        key: slog::Key,
        serializer: &mut dyn slog::Serializer,
    ) -> slog::Result {
        serializer.emit_str(key, &self.0)
    }
}
