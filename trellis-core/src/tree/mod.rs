//! Immutable State Tree
//!
//! The tree is the value half of trellis: a persistent, structurally
//! shared representation of the whole application state. Stores hold an
//! `Arc` to the current root and replace it wholesale on every accepted
//! write.
//!
//! # Components
//!
//! - [`Node`]: the tree itself. Keyed and indexed interior nodes, scalar
//!   leaves, children behind `Arc`.
//!
//! - [`Path`] / [`PathSegment`]: typed addresses into the tree, plus the
//!   [`path!`](crate::path) macro and a dotted-string parser.
//!
//! - [`set_in`] / [`resolve`]: the write and read primitives. Writes
//!   rebuild the spine and share every untouched branch; reads walk
//!   without allocating.
//!
//! # Equality Model
//!
//! Staleness decisions elsewhere in the crate compare converted values,
//! not node pointers. Pointer identity (`Arc::ptr_eq`) only ever serves
//! as a fast path meaning "definitely unchanged", never as evidence of
//! change.

mod node;
mod path;
mod update;

pub use node::{Node, NodeKind};
pub use path::{Path, PathSegment};
pub use update::{resolve, set_in};
