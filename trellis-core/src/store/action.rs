//! Actions and the Reducer Table
//!
//! Every state change is described by an [`Action`]: a kind tag naming
//! the transition, the path it applies to, and a value payload. Actions
//! are plain data and serialize cleanly, which keeps them loggable and
//! replayable.
//!
//! The [`ReducerTable`] maps action kinds to reducers. It is open:
//! callers register reducers for their own kinds at runtime, and a
//! dispatch whose kind has no entry falls back to the identity
//! transition instead of failing. The table starts with one built-in
//! entry, the [`SET`] reducer, which writes the payload at the action's
//! path.

use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::StateError;
use crate::tree::{set_in, Node, Path};

/// Kind tag of the built-in write action.
pub const SET: &str = "set";

/// A description of one state transition.
///
/// # Example
///
/// ```rust,ignore
/// // The common case, a plain write:
/// store.dispatch(Action::set(path!["user", "name"], json!("ada")))?;
///
/// // A custom kind, handled by a registered reducer:
/// store.dispatch(Action::new("todo/toggle", path!["todos", 0], json!(null)))?;
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Action {
    kind: String,
    path: Path,
    value: Value,
}

impl Action {
    /// Build an action with an arbitrary kind.
    pub fn new(kind: impl Into<String>, path: impl Into<Path>, value: Value) -> Self {
        Action {
            kind: kind.into(),
            path: path.into(),
            value,
        }
    }

    /// Build a [`SET`] action writing `value` at `path`.
    pub fn set(path: impl Into<Path>, value: Value) -> Self {
        Action::new(SET, path, value)
    }

    /// The kind tag naming this transition.
    pub fn kind(&self) -> &str {
        &self.kind
    }

    /// The path this action applies to.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The value payload.
    pub fn value(&self) -> &Value {
        &self.value
    }
}

/// A reducer derives the next tree from the current one and an action.
///
/// Reducers must be pure with respect to the store: they receive the
/// current root and return a replacement, and must not dispatch.
pub type Reducer = Arc<dyn Fn(&Arc<Node>, &Action) -> Result<Arc<Node>, StateError> + Send + Sync>;

/// Maps action kinds to reducers, in registration order.
pub struct ReducerTable {
    entries: IndexMap<String, Reducer>,
}

impl ReducerTable {
    /// A table with the built-in [`SET`] reducer registered.
    pub fn new() -> Self {
        let mut table = ReducerTable {
            entries: IndexMap::new(),
        };
        table.register(SET, |root: &Arc<Node>, action: &Action| {
            set_in(root, action.path(), action.value())
        });
        table
    }

    /// Register `reduce` for `kind`.
    ///
    /// Registering the same kind again replaces the earlier reducer, so
    /// even the built-in [`SET`] behavior can be overridden.
    pub fn register<F>(&mut self, kind: impl Into<String>, reduce: F)
    where
        F: Fn(&Arc<Node>, &Action) -> Result<Arc<Node>, StateError> + Send + Sync + 'static,
    {
        self.entries.insert(kind.into(), Arc::new(reduce));
    }

    /// The reducer registered for `kind`, if any.
    pub fn get(&self, kind: &str) -> Option<Reducer> {
        self.entries.get(kind).cloned()
    }

    /// Whether a reducer is registered for `kind`.
    pub fn contains(&self, kind: &str) -> bool {
        self.entries.contains_key(kind)
    }

    /// Registered kinds, in registration order.
    pub fn kinds(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Number of registered kinds.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the table has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for ReducerTable {
    fn default() -> Self {
        ReducerTable::new()
    }
}

impl fmt::Debug for ReducerTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReducerTable")
            .field("kinds", &self.entries.keys().collect::<Vec<_>>())
            .finish()
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------
