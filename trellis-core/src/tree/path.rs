//! Path Representation
//!
//! A [`Path`] names a location in the state tree as a sequence of
//! segments. Each segment is either a string key into a keyed node or a
//! numeric index into an indexed node.
//!
//! # Building Paths
//!
//! Three forms are accepted, and all normalize to the same `Path`:
//!
//! 1. The [`path!`](crate::path) macro: `path!["user", "name"]` or
//!    `path!["todos", 0, "title"]`. Bare integers become index segments.
//!
//! 2. Typed construction: `Path::root().key("user").key("name")`, or
//!    collecting an iterator of [`PathSegment`]s.
//!
//! 3. A dotted string via [`Path::parse`]: `"user.name"`. Every token in
//!    the dotted form is a string key, so `"todos.0"` addresses the key
//!    `"0"`, not index zero. The dotted form cannot express indices.
//!
//! The empty path addresses the root of the tree.
//!
//! # Ordering of Recorded Paths
//!
//! Paths are hashable and comparable so that dependency sets can key on
//! them while preserving the order in which reads occurred.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::error::StateError;

/// Most paths in practice are shallow; keep up to four segments inline.
const INLINE_SEGMENTS: usize = 4;

/// One step of a path: a map key or a sequence index.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PathSegment {
    /// A string key into a keyed node.
    Key(String),
    /// A position into an indexed node.
    Index(usize),
}

impl fmt::Display for PathSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathSegment::Key(key) => f.write_str(key),
            PathSegment::Index(index) => write!(f, "{index}"),
        }
    }
}

impl From<&str> for PathSegment {
    fn from(key: &str) -> Self {
        PathSegment::Key(key.to_string())
    }
}

impl From<String> for PathSegment {
    fn from(key: String) -> Self {
        PathSegment::Key(key)
    }
}

impl From<usize> for PathSegment {
    fn from(index: usize) -> Self {
        PathSegment::Index(index)
    }
}

/// A location in the state tree.
///
/// # Example
///
/// ```rust,ignore
/// let by_macro = path!["todos", 0, "title"];
/// let by_builder = Path::root().key("todos").index(0).key("title");
/// assert_eq!(by_macro, by_builder);
///
/// // Dotted form: keys only.
/// let dotted = Path::parse("user.name")?;
/// assert_eq!(dotted, path!["user", "name"]);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Path {
    segments: SmallVec<[PathSegment; INLINE_SEGMENTS]>,
}

impl Path {
    /// The empty path, addressing the root of the tree.
    pub fn root() -> Self {
        Path {
            segments: SmallVec::new(),
        }
    }

    /// Parse a dotted string into a path of key segments.
    ///
    /// Every dot-separated token becomes a [`PathSegment::Key`]; this
    /// form cannot express index segments. Empty input and empty tokens
    /// (`""`, `"a..b"`, `".a"`) are rejected.
    pub fn parse(text: &str) -> Result<Self, StateError> {
        if text.is_empty() {
            return Err(StateError::invalid_path(text, "empty path"));
        }
        let mut segments = SmallVec::new();
        for token in text.split('.') {
            if token.is_empty() {
                return Err(StateError::invalid_path(text, "empty segment"));
            }
            segments.push(PathSegment::Key(token.to_string()));
        }
        Ok(Path { segments })
    }

    /// Append a key segment, returning the extended path.
    pub fn key(mut self, key: impl Into<String>) -> Self {
        self.segments.push(PathSegment::Key(key.into()));
        self
    }

    /// Append an index segment, returning the extended path.
    pub fn index(mut self, index: usize) -> Self {
        self.segments.push(PathSegment::Index(index));
        self
    }

    /// Append a segment in place.
    pub fn push(&mut self, segment: PathSegment) {
        self.segments.push(segment);
    }

    /// The segments of this path, in order.
    pub fn segments(&self) -> &[PathSegment] {
        &self.segments
    }

    /// Number of segments.
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    /// Whether this path addresses the root of the tree.
    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    /// Whether this path has no segments.
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// The first `len` segments as a new path.
    ///
    /// Used to report where in the tree a write went wrong.
    pub fn prefix(&self, len: usize) -> Path {
        Path {
            segments: self.segments.iter().take(len).cloned().collect(),
        }
    }

    /// Iterate over the segments.
    pub fn iter(&self) -> std::slice::Iter<'_, PathSegment> {
        self.segments.iter()
    }
}

/// Renders segments joined by dots, for diagnostics and logging.
///
/// Index segments render as bare digits, so the output of a path that
/// contains indices does not re-parse to the same path.
impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (position, segment) in self.segments.iter().enumerate() {
            if position > 0 {
                f.write_str(".")?;
            }
            write!(f, "{segment}")?;
        }
        Ok(())
    }
}

impl FromStr for Path {
    type Err = StateError;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        Path::parse(text)
    }
}

impl FromIterator<PathSegment> for Path {
    fn from_iter<I: IntoIterator<Item = PathSegment>>(iter: I) -> Self {
        Path {
            segments: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a Path {
    type Item = &'a PathSegment;
    type IntoIter = std::slice::Iter<'a, PathSegment>;

    fn into_iter(self) -> Self::IntoIter {
        self.segments.iter()
    }
}

impl From<PathSegment> for Path {
    fn from(segment: PathSegment) -> Self {
        Path {
            segments: smallvec::smallvec![segment],
        }
    }
}

impl From<&Path> for Path {
    fn from(path: &Path) -> Self {
        path.clone()
    }
}

impl From<Vec<PathSegment>> for Path {
    fn from(segments: Vec<PathSegment>) -> Self {
        segments.into_iter().collect()
    }
}

impl<const N: usize> From<[PathSegment; N]> for Path {
    fn from(segments: [PathSegment; N]) -> Self {
        segments.into_iter().collect()
    }
}

impl<const N: usize> From<[&str; N]> for Path {
    fn from(keys: [&str; N]) -> Self {
        keys.into_iter().map(PathSegment::from).collect()
    }
}

/// Build a [`Path`] from a comma-separated list of segments.
///
/// String expressions become key segments and integer expressions become
/// index segments. `path![]` is the root path.
///
/// ```rust,ignore
/// let title = path!["todos", 0, "title"];
/// ```
#[macro_export]
macro_rules! path {
    () => {
        $crate::tree::Path::root()
    };
    ($($segment:expr),+ $(,)?) => {{
        let mut path = $crate::tree::Path::root();
        $(
            path.push($crate::tree::PathSegment::from($segment));
        )+
        path
    }};
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------
