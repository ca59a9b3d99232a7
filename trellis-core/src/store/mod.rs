//! The State Store
//!
//! A [`Store`] owns the current state tree and is the only way to change
//! it. State flows one way:
//!
//! 1. A caller dispatches an [`Action`] describing a transition.
//!
//! 2. The reducer registered for the action's kind derives a replacement
//!    tree from the current one. An unrecognized kind keeps the current
//!    tree.
//!
//! 3. The store swaps its root to the replacement in one atomic step.
//!    Readers always see either the old tree or the new one, never a
//!    partial write.
//!
//! 4. Every subscriber is notified, in subscription order, with no
//!    payload.
//!
//! A reducer error aborts the dispatch before the swap, so failed
//! transitions leave no trace in the tree and trigger no notification.
//!
//! # Handles
//!
//! `Store` is a cheap handle: clones share the same tree, reducer table,
//! and subscribers. Hand clones to whatever parts of the application
//! need access; there is one logical store behind them.
//!
//! The crate itself holds no global. Callers who want process-wide
//! semantics pin a handle in a `OnceLock`:
//!
//! ```rust,ignore
//! static STORE: OnceLock<Store> = OnceLock::new();
//!
//! fn store() -> &'static Store {
//!     STORE.get_or_init(Store::new)
//! }
//! ```

mod action;
mod subscriber;

pub use action::{Action, Reducer, ReducerTable, SET};
pub use subscriber::{SubscriberId, Subscription};

use std::fmt;
use std::sync::{Arc, RwLock};

use serde_json::Value;
use tracing::{debug, trace};

use crate::error::StateError;
use crate::store::subscriber::SubscriberRegistry;
use crate::tree::{resolve, Node, Path};

/// Shared handle to one logical state store.
///
/// # Example
///
/// ```rust,ignore
/// let store = Store::new();
/// store.write(path!["user", "name"], json!("ada"))?;
///
/// let name = store.read(&path!["user", "name"], json!(null));
/// assert_eq!(name, json!("ada"));
/// ```
pub struct Store {
    /// Current root of the state tree. Swapped wholesale on dispatch.
    root: Arc<RwLock<Arc<Node>>>,

    /// Reducers by action kind.
    reducers: Arc<RwLock<ReducerTable>>,

    /// Change-notification callbacks.
    subscribers: Arc<SubscriberRegistry>,
}

impl Store {
    /// A store holding an empty keyed root.
    pub fn new() -> Self {
        Store::with_root(Value::Object(serde_json::Map::new()))
    }

    /// A store whose initial tree is built from `initial`.
    pub fn with_root(initial: Value) -> Self {
        Store::with_reducers(initial, ReducerTable::new())
    }

    /// A store with `initial` as its tree and a caller-built reducer
    /// table.
    ///
    /// Use this to install a full set of reducers before the first
    /// handle is shared. A table built with [`ReducerTable::new`]
    /// still carries the built-in [`SET`] reducer, so `write` keeps
    /// working unless the caller replaced that kind.
    pub fn with_reducers(initial: Value, reducers: ReducerTable) -> Self {
        Store {
            root: Arc::new(RwLock::new(Arc::new(Node::from_value(&initial)))),
            reducers: Arc::new(RwLock::new(reducers)),
            subscribers: Arc::new(SubscriberRegistry::new()),
        }
    }

    /// Snapshot of the current root.
    ///
    /// The returned tree is immutable; later dispatches replace the
    /// store's root but never touch trees already handed out.
    pub fn root(&self) -> Arc<Node> {
        Arc::clone(&self.root.read().expect("root lock poisoned"))
    }

    /// The whole current tree as a plain value.
    pub fn snapshot(&self) -> Value {
        self.root().to_value()
    }

    /// Value at `path`, or `default` if the path does not resolve.
    ///
    /// Absence is not an error: a missing key, an out-of-range index,
    /// or a path that descends through a leaf all yield `default`.
    pub fn read(&self, path: &Path, default: Value) -> Value {
        self.try_read(path).unwrap_or(default)
    }

    /// Value at `path`, or `None` if the path does not resolve.
    ///
    /// Distinguishes an absent path from one holding null.
    pub fn try_read(&self, path: &Path) -> Option<Value> {
        let root = self.root();
        resolve(&root, path).map(|node| node.to_value())
    }

    /// Write `value` at `path` by dispatching a [`SET`] action.
    pub fn write(&self, path: impl Into<Path>, value: Value) -> Result<(), StateError> {
        self.dispatch(Action::set(path, value))
    }

    /// Run `action` through the reducer table and publish the result.
    ///
    /// On success the root is replaced and all subscribers are notified
    /// synchronously before this returns, even when the transition was
    /// the identity. On error the store is left untouched and nobody is
    /// notified.
    pub fn dispatch(&self, action: Action) -> Result<(), StateError> {
        let reducer = self
            .reducers
            .read()
            .expect("reducer table lock poisoned")
            .get(action.kind());

        let current = self.root();
        let next = match reducer {
            Some(reduce) => reduce(&current, &action)?,
            None => {
                trace!(kind = action.kind(), "no reducer for kind, keeping state");
                Arc::clone(&current)
            }
        };

        *self.root.write().expect("root lock poisoned") = next;
        trace!(kind = action.kind(), path = %action.path(), "action applied");

        self.subscribers.notify_all();
        Ok(())
    }

    /// Register `reduce` for action kind `kind`.
    ///
    /// Takes effect for every subsequent dispatch through any handle to
    /// this store. Registering an existing kind replaces its reducer.
    pub fn register_reducer<F>(&self, kind: impl Into<String>, reduce: F)
    where
        F: Fn(&Arc<Node>, &Action) -> Result<Arc<Node>, StateError> + Send + Sync + 'static,
    {
        let kind = kind.into();
        debug!(kind = kind.as_str(), "reducer registered");
        self.reducers
            .write()
            .expect("reducer table lock poisoned")
            .register(kind, reduce);
    }

    /// Attach a change-notification callback.
    ///
    /// The callback runs synchronously after every successful dispatch.
    /// It receives no payload; pair it with an
    /// [`Observer`](crate::reactive::Observer) to decide whether the
    /// change matters. The callback stays attached until the returned
    /// guard is dropped.
    ///
    /// Callbacks must not dispatch back into the store from within the
    /// notification; that would start a second delivery cycle inside
    /// the current one.
    pub fn subscribe<F>(&self, callback: F) -> Subscription
    where
        F: Fn() + Send + Sync + 'static,
    {
        let id = self.subscribers.register(Arc::new(callback));
        trace!(subscriber = id.raw(), "subscriber attached");
        Subscription::new(Arc::downgrade(&self.subscribers), id)
    }

    /// Number of attached subscribers.
    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }
}

impl Default for Store {
    fn default() -> Self {
        Store::new()
    }
}

impl Clone for Store {
    fn clone(&self) -> Self {
        Store {
            root: Arc::clone(&self.root),
            reducers: Arc::clone(&self.reducers),
            subscribers: Arc::clone(&self.subscribers),
        }
    }
}

impl fmt::Debug for Store {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Store")
            .field("root_kind", &self.root().kind())
            .field("subscriber_count", &self.subscriber_count())
            .finish()
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::path;
    use crate::tree::set_in;
    use serde_json::json;
    use std::sync::atomic::{AtomicI32, Ordering};
    use std::sync::Mutex;

    #[test]
    fn new_store_is_an_empty_tree() {
        let store = Store::new();
        assert_eq!(store.snapshot(), json!({}));
    }

    #[test]
    fn write_then_read() {
        let store = Store::new();
        store.write(path!["user", "name"], json!("ada")).unwrap();

        assert_eq!(store.read(&path!["user", "name"], json!(null)), json!("ada"));
        assert_eq!(store.snapshot(), json!({"user": {"name": "ada"}}));
    }

    #[test]
    fn absent_paths_read_as_the_default() {
        let store = Store::with_root(json!({"present": null}));

        assert_eq!(store.read(&path!["missing"], json!("fallback")), json!("fallback"));
        assert_eq!(store.try_read(&path!["missing"]), None);

        // A stored null is present, not absent.
        assert_eq!(store.read(&path!["present"], json!("fallback")), json!(null));
        assert_eq!(store.try_read(&path!["present"]), Some(json!(null)));
    }

    #[test]
    fn clones_share_one_store() {
        let store = Store::new();
        let other = store.clone();

        other.write(path!["count"], json!(1)).unwrap();
        assert_eq!(store.read(&path!["count"], json!(0)), json!(1));
    }

    #[test]
    fn dispatch_notifies_in_subscription_order() {
        let store = Store::new();
        let order = Arc::new(Mutex::new(Vec::new()));

        let mut guards = Vec::new();
        for tag in ["first", "second", "third"] {
            let order = Arc::clone(&order);
            guards.push(store.subscribe(move || {
                order.lock().unwrap().push(tag);
            }));
        }

        store.write(path!["x"], json!(1)).unwrap();
        assert_eq!(*order.lock().unwrap(), vec!["first", "second", "third"]);
    }

    #[test]
    fn unknown_kind_is_identity_but_still_notifies() {
        let store = Store::with_root(json!({"count": 1}));
        let notified = Arc::new(AtomicI32::new(0));

        let notified_clone = Arc::clone(&notified);
        let _guard = store.subscribe(move || {
            notified_clone.fetch_add(1, Ordering::SeqCst);
        });

        store
            .dispatch(Action::new("unregistered", path!["count"], json!(99)))
            .unwrap();

        assert_eq!(store.snapshot(), json!({"count": 1}));
        assert_eq!(notified.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn custom_reducers_handle_their_kind() {
        let store = Store::with_root(json!({"count": 1}));
        store.register_reducer("counter/increment", |root, action| {
            let current = resolve(root, action.path())
                .map(|node| node.to_value())
                .and_then(|value| value.as_i64())
                .unwrap_or(0);
            set_in(root, action.path(), &json!(current + 1))
        });

        store
            .dispatch(Action::new("counter/increment", path!["count"], json!(null)))
            .unwrap();
        store
            .dispatch(Action::new("counter/increment", path!["count"], json!(null)))
            .unwrap();

        assert_eq!(store.read(&path!["count"], json!(0)), json!(3));
    }

    #[test]
    fn with_reducers_installs_a_prebuilt_table() {
        let mut table = ReducerTable::new();
        table.register("counter/increment", |root, action| {
            let current = resolve(root, action.path())
                .map(|node| node.to_value())
                .and_then(|value| value.as_i64())
                .unwrap_or(0);
            set_in(root, action.path(), &json!(current + 1))
        });

        let store = Store::with_reducers(json!({"count": 41}), table);
        store
            .dispatch(Action::new("counter/increment", path!["count"], json!(null)))
            .unwrap();
        assert_eq!(store.read(&path!["count"], json!(0)), json!(42));

        // The table came from new(), so the set reducer rode along.
        store.write(path!["name"], json!("ada")).unwrap();
        assert_eq!(store.read(&path!["name"], json!(null)), json!("ada"));
    }

    #[test]
    fn failed_dispatch_changes_nothing_and_notifies_nobody() {
        let store = Store::with_root(json!({"tags": ["a"]}));
        let notified = Arc::new(AtomicI32::new(0));

        let notified_clone = Arc::clone(&notified);
        let _guard = store.subscribe(move || {
            notified_clone.fetch_add(1, Ordering::SeqCst);
        });

        let err = store.write(path!["tags", "name"], json!(1)).unwrap_err();
        assert!(matches!(err, StateError::StructuralMismatch { .. }));

        assert_eq!(store.snapshot(), json!({"tags": ["a"]}));
        assert_eq!(notified.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn dropping_a_subscription_stops_notifications() {
        let store = Store::new();
        let count = Arc::new(AtomicI32::new(0));

        let count_clone = Arc::clone(&count);
        let guard = store.subscribe(move || {
            count_clone.fetch_add(1, Ordering::SeqCst);
        });

        store.write(path!["a"], json!(1)).unwrap();
        assert_eq!(count.load(Ordering::SeqCst), 1);
        assert_eq!(store.subscriber_count(), 1);

        drop(guard);
        assert_eq!(store.subscriber_count(), 0);

        store.write(path!["a"], json!(2)).unwrap();
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn root_snapshots_are_immutable() {
        let store = Store::with_root(json!({"count": 1}));
        let before = store.root();

        store.write(path!["count"], json!(2)).unwrap();

        assert_eq!(before.to_value(), json!({"count": 1}));
        assert_eq!(store.snapshot(), json!({"count": 2}));
    }

    #[test]
    fn writing_the_root_path_replaces_everything() {
        let store = Store::with_root(json!({"old": true}));
        store
            .write(Path::root(), json!({"fresh": {"tree": true}}))
            .unwrap();
        assert_eq!(store.snapshot(), json!({"fresh": {"tree": true}}));
    }

    #[test]
    fn overriding_the_set_reducer_takes_effect() {
        let store = Store::new();
        store.register_reducer(SET, |root, _| Ok(Arc::clone(root)));

        store.write(path!["a"], json!(1)).unwrap();
        assert_eq!(store.snapshot(), json!({}));
    }
}
