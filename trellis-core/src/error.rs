//! Error Types
//!
//! Two conditions are hard errors in trellis: a path literal that cannot
//! be parsed, and a write whose path requires one collection kind where
//! the tree already holds the other.
//!
//! Everything else is deliberately not an error. Reading a path that does
//! not exist resolves to a caller-supplied default, and dispatching an
//! action with an unrecognized kind leaves the tree untouched. Both are
//! normal outcomes of normal use.
//!
//! Errors fail fast and leave the store unchanged: the root is only
//! swapped after an entire replacement tree has been built.

use thiserror::Error;

use crate::tree::{NodeKind, Path};

/// Errors produced by path parsing and tree writes.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum StateError {
    /// A dotted path literal could not be parsed into segments.
    ///
    /// Raised at the call site, before any store state is consulted.
    #[error("invalid path `{text}`: {reason}")]
    InvalidPath {
        /// The literal that failed to parse.
        text: String,
        /// What was wrong with it.
        reason: &'static str,
    },

    /// A write descended into a node whose kind conflicts with the path.
    ///
    /// A key segment requires a keyed node and an index segment requires
    /// an indexed node. Absent and leaf positions are coerced to the
    /// required kind, but a collection of the wrong kind is refused so
    /// that a typo'd path cannot silently discard existing children.
    #[error("structural mismatch at `{path}`: path requires a {expected} node, found {found}")]
    StructuralMismatch {
        /// Path of the node the write could not descend through.
        path: Path,
        /// Node kind the path segment requires.
        expected: NodeKind,
        /// Node kind actually found in the tree.
        found: NodeKind,
    },
}

impl StateError {
    /// Shorthand constructor used by the path parser.
    pub(crate) fn invalid_path(text: impl Into<String>, reason: &'static str) -> Self {
        StateError::InvalidPath {
            text: text.into(),
            reason,
        }
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::path;

    #[test]
    fn invalid_path_display() {
        let err = StateError::invalid_path("a..b", "empty segment");
        assert_eq!(err.to_string(), "invalid path `a..b`: empty segment");
    }

    #[test]
    fn structural_mismatch_display() {
        let err = StateError::StructuralMismatch {
            path: path!["user", "tags"],
            expected: NodeKind::Keyed,
            found: NodeKind::Indexed,
        };
        assert_eq!(
            err.to_string(),
            "structural mismatch at `user.tags`: path requires a keyed node, found indexed"
        );
    }
}
