//! Reactive Layer
//!
//! The store broadcasts "something changed" with no payload. This
//! module supplies the other half of the contract: deciding, per
//! consumer, whether the change matters.
//!
//! # Concepts
//!
//! ## Observers
//!
//! An [`Observer`] holds the dependency bookkeeping for one consumer of
//! store state. It opens a tracking window around a computation,
//! records every path the computation reads together with the value
//! observed there, and answers staleness questions afterwards.
//!
//! ## Dependency Sets
//!
//! A [`DependencySet`] is the committed record of one window. Its
//! staleness check re-resolves each recorded path and compares values
//! deeply, so rebuilt-but-equal state does not count as a change.
//!
//! # Implementation Notes
//!
//! Tracking is explicit and local. A computation reads through its own
//! observer, so there is no ambient current-observer cell and nested or
//! concurrent computations cannot contaminate each other's dependency
//! sets. The cost is that dependency tracking is visible at the read
//! site; the gain is that observers are plain values that can live
//! anywhere, including on separate threads.

mod observer;
mod tracker;

pub use observer::Observer;
pub use tracker::{DependencySet, TrackerState};
