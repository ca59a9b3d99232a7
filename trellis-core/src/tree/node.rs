//! Tree Nodes
//!
//! The state tree is built from three node kinds: keyed nodes (string
//! keys, like a JSON object), indexed nodes (dense positions, like a
//! JSON array), and leaves holding an opaque scalar value.
//!
//! # Structural Sharing
//!
//! Children are held behind [`Arc`], so a write that replaces one branch
//! produces a new tree whose untouched branches are the same allocations
//! as before. Two consequences fall out of that:
//!
//! 1. Reading never copies the tree; converting a subtree back to a
//!    value copies only that subtree.
//!
//! 2. `Arc::ptr_eq` on a child is a cheap "definitely unchanged" check,
//!    while equality of converted values is the authoritative one.
//!
//! Nodes are immutable once built. All mutation goes through
//! [`set_in`](crate::tree::set_in), which builds replacement nodes along
//! the written path.

use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;
use serde_json::Value;

/// The three shapes a tree node can take.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    /// String-keyed children.
    Keyed,
    /// Position-indexed children.
    Indexed,
    /// A terminal scalar value.
    Leaf,
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            NodeKind::Keyed => "keyed",
            NodeKind::Indexed => "indexed",
            NodeKind::Leaf => "leaf",
        };
        f.write_str(name)
    }
}

/// One node of the immutable state tree.
///
/// Keyed children preserve insertion order for iteration, though order
/// never affects equality.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    /// A map of string keys to children.
    Keyed(IndexMap<String, Arc<Node>>),
    /// A dense sequence of children.
    Indexed(Vec<Arc<Node>>),
    /// A terminal value.
    Leaf(Value),
}

impl Node {
    /// An empty keyed node.
    pub fn keyed() -> Self {
        Node::Keyed(IndexMap::new())
    }

    /// An empty indexed node.
    pub fn indexed() -> Self {
        Node::Indexed(Vec::new())
    }

    /// A leaf holding `value`.
    pub fn leaf(value: Value) -> Self {
        Node::Leaf(value)
    }

    /// Which of the three shapes this node is.
    pub fn kind(&self) -> NodeKind {
        match self {
            Node::Keyed(_) => NodeKind::Keyed,
            Node::Indexed(_) => NodeKind::Indexed,
            Node::Leaf(_) => NodeKind::Leaf,
        }
    }

    /// Build a tree from a plain value.
    ///
    /// Objects become keyed nodes, arrays become indexed nodes, and
    /// everything else becomes a leaf. The conversion recurses, so a
    /// nested composite value becomes a subtree rather than a composite
    /// leaf.
    pub fn from_value(value: &Value) -> Node {
        match value {
            Value::Object(entries) => Node::Keyed(
                entries
                    .iter()
                    .map(|(key, child)| (key.clone(), Arc::new(Node::from_value(child))))
                    .collect(),
            ),
            Value::Array(items) => Node::Indexed(
                items
                    .iter()
                    .map(|child| Arc::new(Node::from_value(child)))
                    .collect(),
            ),
            scalar => Node::Leaf(scalar.clone()),
        }
    }

    /// Convert this subtree back into a plain value.
    ///
    /// Copies exactly the subtree rooted here and nothing above it.
    pub fn to_value(&self) -> Value {
        match self {
            Node::Keyed(entries) => Value::Object(
                entries
                    .iter()
                    .map(|(key, child)| (key.clone(), child.to_value()))
                    .collect(),
            ),
            Node::Indexed(items) => Value::Array(items.iter().map(|child| child.to_value()).collect()),
            Node::Leaf(value) => value.clone(),
        }
    }

    /// Child under `key`, if this is a keyed node that contains it.
    pub fn get_key(&self, key: &str) -> Option<&Arc<Node>> {
        match self {
            Node::Keyed(entries) => entries.get(key),
            _ => None,
        }
    }

    /// Child at `index`, if this is an indexed node that reaches it.
    pub fn get_index(&self, index: usize) -> Option<&Arc<Node>> {
        match self {
            Node::Indexed(items) => items.get(index),
            _ => None,
        }
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn from_value_classifies_shapes() {
        assert_eq!(Node::from_value(&json!({"a": 1})).kind(), NodeKind::Keyed);
        assert_eq!(Node::from_value(&json!([1, 2])).kind(), NodeKind::Indexed);
        assert_eq!(Node::from_value(&json!("text")).kind(), NodeKind::Leaf);
        assert_eq!(Node::from_value(&json!(null)).kind(), NodeKind::Leaf);
    }

    #[test]
    fn nested_composites_become_subtrees() {
        let node = Node::from_value(&json!({"user": {"tags": ["a", "b"]}}));

        let user = node.get_key("user").unwrap();
        assert_eq!(user.kind(), NodeKind::Keyed);

        let tags = user.get_key("tags").unwrap();
        assert_eq!(tags.kind(), NodeKind::Indexed);
        assert_eq!(tags.get_index(1).unwrap().to_value(), json!("b"));
    }

    #[test]
    fn to_value_inverts_from_value() {
        let value = json!({
            "user": {"name": "ada", "age": 36},
            "todos": [{"title": "write", "done": false}],
            "count": 0,
        });
        assert_eq!(Node::from_value(&value).to_value(), value);
    }

    #[test]
    fn keyed_equality_ignores_insertion_order() {
        let mut forward = IndexMap::new();
        forward.insert("a".to_string(), Arc::new(Node::leaf(json!(1))));
        forward.insert("b".to_string(), Arc::new(Node::leaf(json!(2))));

        let mut reverse = IndexMap::new();
        reverse.insert("b".to_string(), Arc::new(Node::leaf(json!(2))));
        reverse.insert("a".to_string(), Arc::new(Node::leaf(json!(1))));

        assert_eq!(Node::Keyed(forward), Node::Keyed(reverse));
    }

    #[test]
    fn child_accessors_respect_kind() {
        let keyed = Node::from_value(&json!({"a": 1}));
        assert!(keyed.get_key("a").is_some());
        assert!(keyed.get_index(0).is_none());

        let indexed = Node::from_value(&json!([1]));
        assert!(indexed.get_index(0).is_some());
        assert!(indexed.get_key("0").is_none());
    }
}
