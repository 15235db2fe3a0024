//! Tree module - Ordered attribute trees with copy-on-write snapshots.
//!
//! A [`Group`] is merged into only while exclusively owned. Once published as
//! a [`Snapshot`] it is read-only; further updates go through clone-then-merge.

mod error;
mod group;
mod path;
mod snapshot;


pub use error::*;
pub use group::*;
pub use path::*;
pub use snapshot::*;
