//! Value module - In-memory representation of YAML/JSON documents.
//!
//! Parsed documents implement [`Diffable`](crate::Diffable) and can be compared
//! like any typed object graph.

mod value;

pub use value::*;
