//! The melding handler.

use super::{Level, Record, Sink, SinkError};
use crate::attr::Attr;
use crate::tree::{MergeError, NestingPath, Snapshot};
use std::fmt;
use std::sync::Arc;
use thiserror::Error;

/// HandleError represents a failure while handling a record.
#[derive(Debug, Error)]
pub enum HandleError {
    #[error(transparent)]
    Merge(#[from] MergeError),

    #[error(transparent)]
    Sink(#[from] SinkError),
}

/// Meld joins older attributes with newer updates before records reach a sink.
///
/// Attributes added first appear first; replacing an attribute keeps its
/// position. Groups are merged field by field rather than repeated.
///
/// A handler is never updated in place. `with_attrs` and `with_group` return
/// new handlers built on a fresh snapshot, and the receiver keeps working
/// unchanged, so handlers can be shared across threads freely.
#[derive(Clone)]
pub struct Meld {
    next: Arc<dyn Sink>,
    path: NestingPath,
    root: Snapshot,
}

impl Meld {
    /// Creates a handler with no attributes, forwarding to `next`.
    pub fn new(next: Arc<dyn Sink>) -> Self {
        Meld {
            next,
            path: NestingPath::new(),
            root: Snapshot::new(),
        }
    }

    /// Returns the current nesting path.
    pub fn path(&self) -> &NestingPath {
        &self.path
    }

    /// Returns the handler's attribute snapshot.
    pub fn snapshot(&self) -> &Snapshot {
        &self.root
    }

    /// Returns the sink records are forwarded to.
    pub fn sink(&self) -> &Arc<dyn Sink> {
        &self.next
    }

    /// Reports whether the sink handles records at `level`.
    pub fn enabled(&self, level: Level) -> bool {
        self.next.enabled(level)
    }

    /// Returns a handler whose attributes include `attrs`, merged under the
    /// current group.
    pub fn with_attrs(&self, attrs: &[Attr]) -> Result<Meld, MergeError> {
        let root = self.root.merge(&self.path, attrs)?;
        tracing::debug!(path = %self.path, count = attrs.len(), "derived handler with attributes");
        Ok(Meld {
            next: Arc::clone(&self.next),
            path: self.path.clone(),
            root,
        })
    }

    /// Returns a handler that nests subsequent attributes under the group `name`.
    ///
    /// The group is established immediately. An existing group of that name is
    /// reused; an existing scalar is replaced. An empty name returns an
    /// equivalent handler.
    pub fn with_group(&self, name: &str) -> Result<Meld, MergeError> {
        if name.is_empty() {
            return Ok(self.clone());
        }
        let root = self.root.merge(&self.path, &[Attr::empty_group(name)])?;
        let path = self.path.with(name);
        tracing::debug!(%path, "derived handler with group");
        Ok(Meld {
            next: Arc::clone(&self.next),
            path,
            root,
        })
    }

    /// Merges the record's attributes into a copy of the handler's tree and
    /// forwards the rendered result.
    pub fn handle(&self, record: &Record) -> Result<(), HandleError> {
        let attrs = if record.attrs.is_empty() {
            self.root.render()
        } else {
            let mut group = self.root.to_group();
            group.merge(&self.path, &record.attrs)?;
            group.render()
        };

        let out = Record {
            level: record.level,
            message: record.message.clone(),
            attrs,
        };
        self.next.handle(&out)?;
        Ok(())
    }

    /// Builds a record at `level` and handles it if the sink is enabled for it.
    pub fn log(&self, level: Level, message: &str, attrs: Vec<Attr>) -> Result<(), HandleError> {
        if !self.enabled(level) {
            return Ok(());
        }
        self.handle(&Record::new(level, message).with_attrs(attrs))
    }
}

impl fmt::Debug for Meld {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Meld")
            .field("path", &self.path)
            .field("root", &self.root)
            .finish_non_exhaustive()
    }
}
