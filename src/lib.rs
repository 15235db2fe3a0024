//! # Attr Meld
//!
//! Ordered, copy-on-write merging of nested structured log attributes.
//!
//! Attributes attached progressively to a logger are folded into a tree:
//! same-named scalars are replaced in place, same-named groups are merged
//! field by field, and first-insertion order is kept at every depth. Every
//! update produces a new snapshot; earlier snapshots stay valid and unchanged.
//!
//! ## Modules
//!
//! - [`value`] - Opaque scalar payloads
//! - [`attr`] - Named attributes, scalar or grouped, and their YAML/JSON loading
//! - [`tree`] - The ordered attribute tree: clone, merge and render
//! - [`handler`] - A log handler that melds attributes before they reach a sink
//! - [`config`] - Output configuration
//! - [`logging`] - Diagnostics subscriber setup

pub mod attr;
pub mod config;
pub mod handler;
pub mod logging;
pub mod tree;
pub mod value;

pub use attr::{Attr, AttrValue};
pub use config::{MeldConfig, OutputFormat};
pub use handler::{HandleError, JsonSink, Level, Meld, Record, Sink, SinkError, TextSink};
pub use tree::{Group, MergeError, NestingPath, Snapshot};
pub use value::Value;
