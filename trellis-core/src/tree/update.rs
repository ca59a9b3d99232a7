//! Persistent Tree Updates
//!
//! [`set_in`] is the single write primitive for the state tree. It never
//! mutates a node in place: it walks the written path, rebuilding one
//! node per level, and returns a new root. Every child off the written
//! path is carried over by reference, so the old and new trees share all
//! untouched branches.
//!
//! # How a Write Proceeds
//!
//! 1. At the end of the path, the written value is converted into a
//!    fresh subtree that replaces whatever was there.
//!
//! 2. At a key segment, the current node must be keyed. An absent or
//!    leaf position is coerced to an empty keyed node first; an indexed
//!    node is a structural mismatch and aborts the write.
//!
//! 3. At an index segment, the current node must be indexed, with the
//!    mirror-image coercion rule. Writing past the end pads the gap
//!    with null leaves so the target index exists.
//!
//! A failed write returns the error before any root swap happens, so
//! the caller's tree is left exactly as it was.

use std::sync::Arc;

use indexmap::IndexMap;
use serde_json::Value;

use crate::error::StateError;
use crate::tree::{Node, NodeKind, Path, PathSegment};

/// Walk `path` down from `root`, returning the node it addresses.
///
/// Returns `None` as soon as a segment is absent or the node at hand is
/// the wrong kind for the segment. Resolution never allocates.
pub fn resolve<'a>(root: &'a Arc<Node>, path: &Path) -> Option<&'a Arc<Node>> {
    let mut current = root;
    for segment in path.segments() {
        current = match segment {
            PathSegment::Key(key) => current.get_key(key)?,
            PathSegment::Index(index) => current.get_index(*index)?,
        };
    }
    Some(current)
}

/// Build a new tree equal to `root` except that `path` now holds `value`.
///
/// The empty path replaces the entire tree. Intermediate nodes are
/// created as needed; see the module docs for the coercion rules.
pub fn set_in(root: &Arc<Node>, path: &Path, value: &Value) -> Result<Arc<Node>, StateError> {
    rebuild(Some(root), path.segments(), value, path, 0)
}

/// Rebuild the spine one level at a time.
///
/// `existing` is the node currently at this position, if any; `depth`
/// is how many segments of `full` have already been consumed, used to
/// report the location of a structural mismatch.
fn rebuild(
    existing: Option<&Arc<Node>>,
    remaining: &[PathSegment],
    value: &Value,
    full: &Path,
    depth: usize,
) -> Result<Arc<Node>, StateError> {
    let Some((segment, rest)) = remaining.split_first() else {
        return Ok(Arc::new(Node::from_value(value)));
    };

    match segment {
        PathSegment::Key(key) => {
            let mut entries = match existing.map(Arc::as_ref) {
                Some(Node::Keyed(entries)) => entries.clone(),
                Some(Node::Indexed(_)) => {
                    return Err(StateError::StructuralMismatch {
                        path: full.prefix(depth),
                        expected: NodeKind::Keyed,
                        found: NodeKind::Indexed,
                    });
                }
                Some(Node::Leaf(_)) | None => IndexMap::new(),
            };
            let prior = entries.get(key.as_str()).cloned();
            let child = rebuild(prior.as_ref(), rest, value, full, depth + 1)?;
            entries.insert(key.clone(), child);
            Ok(Arc::new(Node::Keyed(entries)))
        }
        PathSegment::Index(index) => {
            let mut items = match existing.map(Arc::as_ref) {
                Some(Node::Indexed(items)) => items.clone(),
                Some(Node::Keyed(_)) => {
                    return Err(StateError::StructuralMismatch {
                        path: full.prefix(depth),
                        expected: NodeKind::Indexed,
                        found: NodeKind::Keyed,
                    });
                }
                Some(Node::Leaf(_)) | None => Vec::new(),
            };
            while items.len() < *index {
                items.push(Arc::new(Node::Leaf(Value::Null)));
            }
            let prior = items.get(*index).cloned();
            let child = rebuild(prior.as_ref(), rest, value, full, depth + 1)?;
            if *index < items.len() {
                items[*index] = child;
            } else {
                items.push(child);
            }
            Ok(Arc::new(Node::Indexed(items)))
        }
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------
