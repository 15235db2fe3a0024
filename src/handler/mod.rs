//! Handler module - Feeds log records through an attribute tree.
//!
//! [`Meld`] decides when the tree is cloned and merged: once per derived
//! handler and once per record carrying its own attributes. Sinks encode the
//! rendered result as text or JSON lines.

mod meld;
mod record;
mod sink;

#[cfg(test)]
mod handler_test;

pub use meld::*;
pub use record::*;
pub use sink::*;
