//! Dependency Sets and Staleness
//!
//! A [`DependencySet`] is the record of one tracking window: every path
//! an observer read, paired with the value it observed there at the
//! time. "Observed absent" is part of the record, kept distinct from
//! "observed null", so a default that later gains a real value is
//! detected as a change.
//!
//! # Staleness
//!
//! A set is stale against a tree when any recorded path now resolves to
//! a different value than was observed, where "different" means deep
//! value inequality after converting the subtree. Root pointer identity
//! never enters into it: a dispatch that rebuilds the spine without
//! changing any recorded value leaves the set fresh, and an empty set
//! is never stale.
//!
//! All recorded paths are checked against a single root snapshot, so
//! one staleness query sees one consistent tree.

use std::sync::Arc;

use indexmap::IndexMap;
use serde_json::Value;

use crate::store::Store;
use crate::tree::{resolve, Node, Path};

/// Phase of an observer's tracking window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackerState {
    /// No window open; reads pass through unrecorded.
    Idle,
    /// A window is open; reads are recorded.
    Tracking,
}

/// Paths an observer read, each with the value observed at read time.
///
/// Entries keep first-read order. Reading the same path again replaces
/// the recorded observation with the latest one.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DependencySet {
    entries: IndexMap<Path, Option<Value>>,
}

impl DependencySet {
    /// An empty set.
    pub fn new() -> Self {
        DependencySet {
            entries: IndexMap::new(),
        }
    }

    /// Record that `path` was read and `observed` came back.
    ///
    /// `None` records that the path did not resolve. That is a real
    /// observation: the path later coming into existence counts as a
    /// change.
    pub fn record(&mut self, path: Path, observed: Option<Value>) {
        self.entries.insert(path, observed);
    }

    /// The observation recorded for `path`.
    ///
    /// Outer `None` means the path was never recorded; inner `None`
    /// means it was recorded as absent.
    pub fn observed(&self, path: &Path) -> Option<&Option<Value>> {
        self.entries.get(path)
    }

    /// Whether `path` was recorded.
    pub fn contains(&self, path: &Path) -> bool {
        self.entries.contains_key(path)
    }

    /// Recorded paths, in first-read order.
    pub fn paths(&self) -> impl Iterator<Item = &Path> {
        self.entries.keys()
    }

    /// Recorded entries, in first-read order.
    pub fn iter(&self) -> impl Iterator<Item = (&Path, &Option<Value>)> {
        self.entries.iter()
    }

    /// Number of recorded paths.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing was recorded.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Whether any recorded observation no longer matches `store`.
    pub fn is_stale(&self, store: &Store) -> bool {
        self.is_stale_against(&store.root())
    }

    /// Whether any recorded observation no longer matches `root`.
    pub fn is_stale_against(&self, root: &Arc<Node>) -> bool {
        self.entries.iter().any(|(path, recorded)| {
            let current = resolve(root, path).map(|node| node.to_value());
            current != *recorded
        })
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------
