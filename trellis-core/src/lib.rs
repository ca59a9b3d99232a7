//! Trellis Core
//!
//! This crate provides the state layer for the Trellis reactive UI
//! framework. It implements:
//!
//! - A persistent, structurally shared state tree addressed by paths
//! - A dispatch loop with an open, caller-extensible reducer table
//! - Broadcast change notification, with per-observer dependency
//!   tracking to decide who actually needs to recompute
//!
//! # Architecture
//!
//! The crate is organized into several modules:
//!
//! - `tree`: the immutable state tree, paths, and the persistent write
//!   primitive
//! - `store`: the store handle, actions, reducers, and subscriptions
//! - `reactive`: observers, dependency sets, and staleness
//! - `error`: what can go wrong, and what deliberately cannot
//!
//! # Example
//!
//! ```rust,ignore
//! use serde_json::json;
//! use trellis_core::path;
//! use trellis_core::reactive::Observer;
//! use trellis_core::store::Store;
//!
//! let store = Store::new();
//! store.write(path!["user", "name"], json!("ada"))?;
//!
//! // A consumer tracks what it reads...
//! let mut observer = Observer::new();
//! observer.begin_tracking();
//! let name = observer.read(&store, &path!["user", "name"], json!(null));
//! observer.end_tracking();
//!
//! // ...and later asks whether any of it changed.
//! store.write(path!["user", "age"], json!(36))?;
//! assert!(!observer.is_stale(&store));
//!
//! store.write(path!["user", "name"], json!("grace"))?;
//! assert!(observer.is_stale(&store));
//! ```

pub mod error;
pub mod reactive;
pub mod store;
pub mod tree;
