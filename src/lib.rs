//! # Object Diff
//!
//! Structural comparison of two in-memory object graphs.
//!
//! Comparing a left and a right value walks both graphs in lockstep and records
//! every path at which they differ, classified as a value, size, type or
//! nullness mismatch. Sequences can be aligned by a per-element-type key instead
//! of by position, and paths can be excluded with regular expressions.
//!
//! ```
//! use object_diff::{impl_record, ObjectDiff};
//!
//! #[derive(Debug)]
//! struct Item { id: i64, name: String }
//! impl_record!(Item { id, name });
//!
//! let left = vec![Item { id: 1, name: "a".into() }, Item { id: 2, name: "b".into() }];
//! let right = vec![Item { id: 2, name: "b".into() }, Item { id: 1, name: "x".into() }];
//!
//! let engine = ObjectDiff::builder()
//!     .identity("memberSrl", "AAA")
//!     .alignment_key::<Item, _, _>(|item| item.id)
//!     .build()
//!     .unwrap();
//! let result = engine.compare(&left, &right);
//! assert_eq!(result.differences().paths().collect::<Vec<_>>(), vec!["/1/name"]);
//! ```
//!
//! ## Modules
//!
//! - [`introspect`] - Value classification, record fields and per-type registries
//! - [`diff`] - The comparison engine, paths, differences and results
//! - [`format`] - Human-readable rendering of comparison results
//! - [`value`] - Dynamic YAML/JSON documents that can be compared like typed values
//! - [`config`] - File-based engine configuration

pub mod config;
pub mod diff;
pub mod format;
pub mod introspect;
pub mod value;

pub use config::{ConfigError, DiffConfig};
pub use diff::{
    compare, AlignmentFault, ComparisonResult, DiffError, Difference, DifferenceKind, Identities,
    ObjectDiff, ObjectDiffBuilder, Path, PathElement,
};
pub use format::ResultFormatter;
pub use introspect::{
    AccessError, Diffable, FieldEntry, FieldSet, Lineage, Ordered, Record, Shape, Terminal,
    TypeKey, TypeRegistry,
};
pub use value::Value;
