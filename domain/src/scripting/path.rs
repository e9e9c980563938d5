//! Dotted variable paths (`"config.server.port"`).
//!
//! A path names a global with its first segment and then descends into
//! nested table fields, one segment at a time. Paths are validated up front:
//! empty strings and empty segments (leading, trailing or doubled `.`) are
//! rejected before the interpreter is ever touched.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Segment delimiter.
pub const PATH_DELIMITER: char = '.';

/// Dotted path validation errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PathError {
    #[error("path is empty")]
    Empty,

    #[error("path '{path}' has an empty segment at position {position}")]
    EmptySegment { path: String, position: usize },
}

/// A validated, non-empty sequence of non-empty path segments.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct DottedPath {
    raw: String,
    segments: Vec<String>,
}

impl DottedPath {
    pub fn parse(raw: &str) -> Result<Self, PathError> {
        if raw.is_empty() {
            return Err(PathError::Empty);
        }

        let segments: Vec<String> = raw.split(PATH_DELIMITER).map(str::to_string).collect();
        if let Some(position) = segments.iter().position(String::is_empty) {
            return Err(PathError::EmptySegment {
                path: raw.to_string(),
                position,
            });
        }

        Ok(Self {
            raw: raw.to_string(),
            segments,
        })
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// The final segment (the field being addressed).
    pub fn leaf(&self) -> &str {
        &self.segments[self.segments.len() - 1]
    }

    /// Every segment before the leaf.
    pub fn parents(&self) -> &[String] {
        &self.segments[..self.segments.len() - 1]
    }

    /// Whether the path names a global directly.
    pub fn is_global(&self) -> bool {
        self.segments.len() == 1
    }
}

impl std::str::FromStr for DottedPath {
    type Err = PathError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for DottedPath {
    type Error = PathError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<DottedPath> for String {
    fn from(path: DottedPath) -> Self {
        path.raw
    }
}

impl std::fmt::Display for DottedPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.raw)
    }
}
