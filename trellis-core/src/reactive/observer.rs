//! Observers
//!
//! An [`Observer`] stands for one consumer of store state, typically a
//! view or component that recomputes some output from the tree. It
//! discovers its own dependencies by running: reads made between
//! [`begin_tracking`](Observer::begin_tracking) and
//! [`end_tracking`](Observer::end_tracking) are recorded, and the
//! committed record is what later staleness checks consult.
//!
//! # The Recompute Loop
//!
//! The intended cycle, driven by a store subscription:
//!
//! 1. `begin_tracking`, run the computation reading through
//!    [`read`](Observer::read), then `end_tracking`. The dependency set
//!    now mirrors exactly what this run touched.
//!
//! 2. When the store notifies, ask [`is_stale`](Observer::is_stale).
//!    Fresh means every recorded value is unchanged and the output
//!    would come out identical, so skip the recompute.
//!
//! 3. Stale means run again under a fresh window, which also re-commits
//!    the dependency set. Dependencies therefore follow the data: a run
//!    that branches differently records a different set.
//!
//! Each observer is self-contained state. Two observers never share a
//! window, and tracking one computation does not require any global
//! current-observer cell, so independent observers can run on separate
//! threads without coordination.
//!
//! # External Input
//!
//! Observers whose output also depends on data arriving from outside
//! the store (component props, request parameters) can record that
//! input and fold it into staleness via
//! [`is_stale_with_input`](Observer::is_stale_with_input).

use serde_json::Value;
use tracing::trace;

use crate::reactive::{DependencySet, TrackerState};
use crate::store::Store;
use crate::tree::Path;

/// Dependency bookkeeping for one consumer of store state.
#[derive(Debug, Clone, Default)]
pub struct Observer {
    /// Dependency set committed by the last completed window.
    committed: DependencySet,

    /// Window currently being recorded, if one is open.
    working: Option<DependencySet>,

    /// Last external input this observer rendered with, if recorded.
    input: Option<Value>,
}

impl Observer {
    /// An idle observer with no recorded dependencies.
    pub fn new() -> Self {
        Observer {
            committed: DependencySet::new(),
            working: None,
            input: None,
        }
    }

    /// Current phase of the tracking window.
    pub fn state(&self) -> TrackerState {
        if self.working.is_some() {
            TrackerState::Tracking
        } else {
            TrackerState::Idle
        }
    }

    /// Whether a tracking window is open.
    pub fn is_tracking(&self) -> bool {
        self.working.is_some()
    }

    /// Open a tracking window.
    ///
    /// If a window is already open its recordings are discarded and a
    /// fresh window starts. The committed set is untouched until
    /// [`end_tracking`](Observer::end_tracking).
    pub fn begin_tracking(&mut self) {
        if self.working.is_some() {
            trace!("tracking window restarted, discarding partial recordings");
        }
        self.working = Some(DependencySet::new());
    }

    /// Close the window and commit its recordings.
    ///
    /// The committed set is replaced, not merged: paths read in earlier
    /// windows but not in this one are dropped. Calling while idle
    /// changes nothing.
    pub fn end_tracking(&mut self) -> &DependencySet {
        if let Some(working) = self.working.take() {
            trace!(dependencies = working.len(), "tracking window committed");
            self.committed = working;
        }
        &self.committed
    }

    /// Read `path` from `store`, or `default` if it does not resolve.
    ///
    /// Inside a tracking window the observation is recorded before the
    /// default is substituted, so depending on an absent path is
    /// remembered as such. Outside a window this is a plain read.
    pub fn read(&mut self, store: &Store, path: &Path, default: Value) -> Value {
        self.try_read(store, path).unwrap_or(default)
    }

    /// Read `path` from `store`, recording the observation if tracking.
    pub fn try_read(&mut self, store: &Store, path: &Path) -> Option<Value> {
        let observed = store.try_read(path);
        if let Some(working) = self.working.as_mut() {
            working.record(path.clone(), observed.clone());
        }
        observed
    }

    /// The dependency set committed by the last completed window.
    pub fn dependencies(&self) -> &DependencySet {
        &self.committed
    }

    /// Whether any committed observation no longer matches `store`.
    ///
    /// An observer that never committed a window has an empty set and
    /// is never stale by this check alone.
    pub fn is_stale(&self, store: &Store) -> bool {
        self.committed.is_stale(store)
    }

    /// Staleness folding in an external input.
    ///
    /// Stale when `input` differs from the recorded input, or when the
    /// dependency check fires. An observer that never recorded an input
    /// treats any offered input as changed.
    pub fn is_stale_with_input(&self, store: &Store, input: &Value) -> bool {
        let input_changed = match &self.input {
            Some(previous) => previous != input,
            None => true,
        };
        input_changed || self.is_stale(store)
    }

    /// Record the external input the current output was computed from.
    pub fn set_input(&mut self, input: Value) {
        self.input = Some(input);
    }

    /// The recorded external input, if any.
    pub fn input(&self) -> Option<&Value> {
        self.input.as_ref()
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------
