//! Published, immutable attribute trees.

use super::{Group, MergeError, NestingPath};
use crate::attr::Attr;
use std::sync::Arc;

/// Snapshot is a published group.
///
/// A snapshot is never mutated. Updates clone the group, merge into the
/// clone, and publish the result as a new snapshot, so any number of
/// holders (including other threads) may keep rendering the old one.
#[derive(Debug, Clone, Default)]
pub struct Snapshot {
    root: Arc<Group>,
}

impl Snapshot {
    /// Creates an empty snapshot.
    pub fn new() -> Self {
        Snapshot::default()
    }

    /// Publishes an exclusively owned group.
    pub fn publish(group: Group) -> Self {
        Snapshot {
            root: Arc::new(group),
        }
    }

    /// Returns the published group.
    pub fn group(&self) -> &Group {
        &self.root
    }

    /// Returns an independent copy of the published group for merging into.
    pub fn to_group(&self) -> Group {
        Group::clone(&self.root)
    }

    /// Renders the snapshot as an ordered attribute sequence.
    pub fn render(&self) -> Vec<Attr> {
        self.root.render()
    }

    /// Clones, merges `attrs` under `path`, and publishes the result.
    ///
    /// The receiver is left untouched. An empty batch returns a snapshot
    /// sharing the receiver's tree.
    pub fn merge(&self, path: &NestingPath, attrs: &[Attr]) -> Result<Snapshot, MergeError> {
        if attrs.is_empty() {
            return Ok(self.clone());
        }
        let mut group = self.to_group();
        group.merge(path, attrs)?;
        Ok(Snapshot::publish(group))
    }

    /// Returns true if both snapshots share the same published tree.
    pub fn ptr_eq(&self, other: &Snapshot) -> bool {
        Arc::ptr_eq(&self.root, &other.root)
    }
}

impl PartialEq for Snapshot {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other) || self.root == other.root
    }
}

impl Eq for Snapshot {}

impl From<Group> for Snapshot {
    fn from(group: Group) -> Self {
        Snapshot::publish(group)
    }
}
