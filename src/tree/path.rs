//! Nesting path type.

use std::fmt;

/// NestingPath names the chain of nested groups a batch is folded into.
///
/// The empty path is the root group.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct NestingPath {
    segments: Vec<String>,
}

impl NestingPath {
    /// Creates a new empty path.
    pub fn new() -> Self {
        NestingPath {
            segments: Vec::new(),
        }
    }

    /// Creates a path from a vector of group names.
    pub fn from_segments(segments: Vec<String>) -> Self {
        NestingPath { segments }
    }

    /// Returns the number of segments in the path.
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    /// Returns true if the path is empty.
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Returns an iterator over the segments.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.segments.iter().map(String::as_str)
    }

    /// Appends a segment.
    pub fn push(&mut self, name: impl Into<String>) {
        self.segments.push(name.into());
    }

    /// Removes and returns the last segment.
    pub fn pop(&mut self) -> Option<String> {
        self.segments.pop()
    }

    /// Returns the last segment.
    pub fn last(&self) -> Option<&str> {
        self.segments.last().map(String::as_str)
    }

    /// Creates a new path with the given segment appended.
    pub fn with(&self, name: impl Into<String>) -> Self {
        let mut new_path = self.clone();
        new_path.push(name);
        new_path
    }

    /// Returns a slice of the segments.
    pub fn as_slice(&self) -> &[String] {
        &self.segments
    }
}

impl<S: Into<String>> FromIterator<S> for NestingPath {
    fn from_iter<T: IntoIterator<Item = S>>(iter: T) -> Self {
        NestingPath {
            segments: iter.into_iter().map(Into::into).collect(),
        }
    }
}

impl IntoIterator for NestingPath {
    type Item = String;
    type IntoIter = std::vec::IntoIter<String>;

    fn into_iter(self) -> Self::IntoIter {
        self.segments.into_iter()
    }
}

impl fmt::Display for NestingPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.segments.is_empty() {
            return write!(f, "<root>");
        }
        write!(f, "{}", self.segments.join("."))
    }
}
