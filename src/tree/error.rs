//! Merge errors.

use super::NestingPath;
use thiserror::Error;

/// MergeError reports an invalid nesting path.
///
/// A path is only ever built from groups previously established on the same
/// tree, so this error means the caller's path and the tree have diverged.
/// It is not recoverable for that tree.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MergeError {
    #[error("invalid nesting path {path}: no group named {segment:?} at depth {depth}")]
    MissingGroup {
        path: NestingPath,
        segment: String,
        depth: usize,
    },

    #[error("invalid nesting path {path}: {segment:?} at depth {depth} is a scalar, not a group")]
    NotAGroup {
        path: NestingPath,
        segment: String,
        depth: usize,
    },
}

impl MergeError {
    /// Creates a missing group error for the segment at `depth`.
    pub fn missing_group(path: &NestingPath, depth: usize) -> Self {
        MergeError::MissingGroup {
            path: path.clone(),
            segment: segment_at(path, depth),
            depth,
        }
    }

    /// Creates a not-a-group error for the segment at `depth`.
    pub fn not_a_group(path: &NestingPath, depth: usize) -> Self {
        MergeError::NotAGroup {
            path: path.clone(),
            segment: segment_at(path, depth),
            depth,
        }
    }

    /// Returns the full path that failed to resolve.
    pub fn path(&self) -> &NestingPath {
        match self {
            MergeError::MissingGroup { path, .. } | MergeError::NotAGroup { path, .. } => path,
        }
    }
}

fn segment_at(path: &NestingPath, depth: usize) -> String {
    path.as_slice().get(depth).cloned().unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let path: NestingPath = ["alice", "bob"].into_iter().collect();
        let err = MergeError::not_a_group(&path, 1);
        assert_eq!(
            err.to_string(),
            r#"invalid nesting path alice.bob: "bob" at depth 1 is a scalar, not a group"#
        );
        assert_eq!(err.path(), &path);
    }
}
