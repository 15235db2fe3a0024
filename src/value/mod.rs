//! Value module - Scalar payloads carried by attributes.
//!
//! The merge engine treats these as opaque blobs.

mod value;

pub use value::*;
