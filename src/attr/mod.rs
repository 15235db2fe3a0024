//! Attr module - Named attributes, scalar or grouped.
//!
//! Attributes are both the input to a merge and the output of a render.

mod attr;
mod parse;

pub use attr::*;
pub use parse::*;
