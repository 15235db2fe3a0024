//! Ordered attribute tree and its merge.

use super::{MergeError, NestingPath};
use crate::attr::{Attr, AttrValue};
use crate::value::Value;
use std::sync::Arc;

/// Group is an ordered sequence of uniquely named entries.
///
/// Entry order is first-insertion order. Cloning a group copies every nested
/// group and shares the scalar payloads, so a clone can be merged into without
/// affecting the source.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Group {
    entries: Vec<Entry>,
}

/// Entry is a named slot inside a group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    name: String,
    slot: Slot,
}

/// Slot holds either a scalar payload or an owned sub-group, never both.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Slot {
    Scalar(Arc<Value>),
    Group(Group),
}

impl Entry {
    /// Returns the entry's name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the entry's slot.
    pub fn slot(&self) -> &Slot {
        &self.slot
    }

    /// Returns the sub-group if this is a group entry.
    pub fn as_group(&self) -> Option<&Group> {
        match &self.slot {
            Slot::Group(group) => Some(group),
            Slot::Scalar(_) => None,
        }
    }

    /// Returns the scalar payload if this is a scalar entry.
    pub fn as_scalar(&self) -> Option<&Value> {
        match &self.slot {
            Slot::Scalar(value) => Some(value),
            Slot::Group(_) => None,
        }
    }

    fn render(&self) -> Attr {
        match &self.slot {
            Slot::Scalar(value) => Attr::shared(self.name.clone(), Arc::clone(value)),
            Slot::Group(group) => Attr::group(self.name.clone(), group.render()),
        }
    }
}

impl Slot {
    fn from_attr_value(value: &AttrValue) -> Self {
        match value {
            AttrValue::Scalar(value) => Slot::Scalar(Arc::clone(value)),
            AttrValue::Group(attrs) => Slot::Group(Group::from_attrs(attrs)),
        }
    }
}

impl Group {
    /// Creates a new empty group.
    pub fn new() -> Self {
        Group {
            entries: Vec::new(),
        }
    }

    fn from_attrs(attrs: &[Attr]) -> Self {
        let mut group = Group::new();
        group.fold_all(attrs);
        group
    }

    /// Returns the number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if the group has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns an iterator over the entries in order.
    pub fn entries(&self) -> impl Iterator<Item = &Entry> {
        self.entries.iter()
    }

    /// Returns the entry with the given name.
    pub fn get(&self, name: &str) -> Option<&Entry> {
        self.position(name).map(|i| &self.entries[i])
    }

    /// Renders the group as an ordered attribute sequence.
    ///
    /// Group entries render as group attributes holding their own render.
    /// Scalar payloads are shared with the tree, not copied.
    pub fn render(&self) -> Vec<Attr> {
        self.entries.iter().map(Entry::render).collect()
    }

    /// Folds `attrs` into the group found by following `path`.
    ///
    /// Must only be called on a group nobody else is reading, typically a fresh
    /// clone of a published snapshot. The path is resolved before anything is
    /// folded, so on error the group is left unchanged.
    ///
    /// Attributes are applied in order: an unknown name is appended, a known
    /// name keeps its position. A scalar replaces whatever was there. A group
    /// is merged field by field into the existing sub-group, replacing a scalar
    /// first if needed.
    pub fn merge(&mut self, path: &NestingPath, attrs: &[Attr]) -> Result<(), MergeError> {
        let target = self.resolve_mut(path)?;
        target.fold_all(attrs);
        Ok(())
    }

    /// Returns the group at the end of `path`.
    pub fn resolve(&self, path: &NestingPath) -> Result<&Group, MergeError> {
        let mut current = self;
        for (depth, segment) in path.iter().enumerate() {
            let entry = current
                .get(segment)
                .ok_or_else(|| MergeError::missing_group(path, depth))?;
            current = entry
                .as_group()
                .ok_or_else(|| MergeError::not_a_group(path, depth))?;
        }
        Ok(current)
    }

    fn resolve_mut(&mut self, path: &NestingPath) -> Result<&mut Group, MergeError> {
        let mut current = self;
        for (depth, segment) in path.iter().enumerate() {
            let Some(entry) = current.entries.iter_mut().find(|e| e.name == segment) else {
                tracing::error!(%path, depth, "nesting path does not resolve to a group");
                return Err(MergeError::missing_group(path, depth));
            };
            current = match &mut entry.slot {
                Slot::Group(group) => group,
                Slot::Scalar(_) => {
                    tracing::error!(%path, depth, "nesting path crosses a scalar entry");
                    return Err(MergeError::not_a_group(path, depth));
                }
            };
        }
        Ok(current)
    }

    fn fold_all(&mut self, attrs: &[Attr]) {
        for attr in attrs {
            self.fold(attr);
        }
    }

    fn fold(&mut self, attr: &Attr) {
        let Some(index) = self.position(&attr.key) else {
            self.entries.push(Entry {
                name: attr.key.clone(),
                slot: Slot::from_attr_value(&attr.value),
            });
            return;
        };

        let entry = &mut self.entries[index];
        match &attr.value {
            AttrValue::Scalar(value) => {
                if let Slot::Group(_) = entry.slot {
                    tracing::trace!(key = %entry.name, "replacing group entry with scalar");
                }
                entry.slot = Slot::Scalar(Arc::clone(value));
            }
            AttrValue::Group(attrs) => {
                if let Slot::Group(group) = &mut entry.slot {
                    group.fold_all(attrs);
                } else {
                    tracing::trace!(key = %entry.name, "replacing scalar entry with group");
                    entry.slot = Slot::Group(Group::from_attrs(attrs));
                }
            }
        }
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.entries.iter().position(|e| e.name == name)
    }
}
