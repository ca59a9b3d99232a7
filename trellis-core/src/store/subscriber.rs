//! Store Subscribers
//!
//! Subscribers are change-notification callbacks attached to a store.
//! Notification carries no payload: a callback learns that some dispatch
//! completed, and is expected to consult its own dependency information
//! to decide whether anything it cares about actually changed.
//!
//! # Delivery
//!
//! Callbacks run synchronously at the end of every dispatch, in the
//! order they subscribed. The registry snapshots its callback list
//! before invoking anything, so a callback may subscribe or unsubscribe
//! without deadlocking; additions made during delivery are picked up by
//! the next dispatch.
//!
//! # Lifetime
//!
//! [`subscribe`](crate::store::Store::subscribe) returns a
//! [`Subscription`] guard. Dropping the guard detaches the callback, so
//! the owner of a subscription cannot forget to clean it up.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock, Weak};

use tracing::trace;

/// Counter for generating unique subscriber IDs.
static SUBSCRIBER_ID_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Unique identity of one subscription to a store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriberId(u64);

impl SubscriberId {
    /// Allocate a fresh ID.
    pub fn new() -> Self {
        SubscriberId(SUBSCRIBER_ID_COUNTER.fetch_add(1, Ordering::Relaxed))
    }

    /// The raw numeric value, for logging.
    pub fn raw(&self) -> u64 {
        self.0
    }
}

impl Default for SubscriberId {
    fn default() -> Self {
        SubscriberId::new()
    }
}

impl fmt::Display for SubscriberId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "subscriber-{}", self.0)
    }
}

type Callback = Arc<dyn Fn() + Send + Sync>;

/// Ordered collection of live subscriber callbacks.
pub(crate) struct SubscriberRegistry {
    entries: RwLock<Vec<(SubscriberId, Callback)>>,
}

impl SubscriberRegistry {
    pub(crate) fn new() -> Self {
        SubscriberRegistry {
            entries: RwLock::new(Vec::new()),
        }
    }

    /// Attach a callback, returning its ID.
    pub(crate) fn register(&self, callback: Callback) -> SubscriberId {
        let id = SubscriberId::new();
        self.entries
            .write()
            .expect("subscriber lock poisoned")
            .push((id, callback));
        id
    }

    /// Detach the callback with `id`, if it is still attached.
    pub(crate) fn remove(&self, id: SubscriberId) {
        self.entries
            .write()
            .expect("subscriber lock poisoned")
            .retain(|(entry_id, _)| *entry_id != id);
    }

    /// Invoke every callback, in subscription order.
    ///
    /// The list is snapshotted first and each callback runs outside the
    /// lock.
    pub(crate) fn notify_all(&self) {
        let snapshot: Vec<Callback> = {
            let entries = self.entries.read().expect("subscriber lock poisoned");
            entries
                .iter()
                .map(|(_, callback)| Arc::clone(callback))
                .collect()
        };
        trace!(subscribers = snapshot.len(), "notifying subscribers");
        for callback in snapshot {
            callback();
        }
    }

    /// Number of attached callbacks.
    pub(crate) fn len(&self) -> usize {
        self.entries.read().expect("subscriber lock poisoned").len()
    }
}

/// Guard for one attached callback.
///
/// Dropping the guard detaches the callback from the store. Outliving
/// the store is fine; in that case dropping is a no-op.
#[must_use = "dropping a Subscription detaches its callback"]
pub struct Subscription {
    registry: Weak<SubscriberRegistry>,
    id: SubscriberId,
}

impl Subscription {
    pub(crate) fn new(registry: Weak<SubscriberRegistry>, id: SubscriberId) -> Self {
        Subscription { registry, id }
    }

    /// The ID of the attached callback.
    pub fn id(&self) -> SubscriberId {
        self.id
    }

    /// Detach explicitly. Equivalent to dropping the guard.
    pub fn unsubscribe(self) {}
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(registry) = self.registry.upgrade() {
            registry.remove(self.id);
            trace!(subscriber = self.id.raw(), "subscriber detached");
        }
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("id", &self.id)
            .field("attached", &(self.registry.strong_count() > 0))
            .finish()
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------
