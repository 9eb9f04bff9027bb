//! A single localized mismatch.

use std::any::TypeId;
use std::fmt;

use crate::introspect::Diffable;

/// DifferenceKind classifies a mismatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DifferenceKind {
    /// Terminal or ordered values are not equal.
    ValueMismatch,
    /// Containers hold a different number of entries.
    SizeMismatch,
    /// Left is a container or record and right does not have the same shape.
    TypeMismatch,
    /// One side is absent (or an empty container) and the other is not.
    NullnessMismatch,
}

impl DifferenceKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            DifferenceKind::ValueMismatch => "VALUE_MISMATCH",
            DifferenceKind::SizeMismatch => "SIZE_MISMATCH",
            DifferenceKind::TypeMismatch => "TYPE_MISMATCH",
            DifferenceKind::NullnessMismatch => "NULLNESS_MISMATCH",
        }
    }
}

impl fmt::Display for DifferenceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Difference describes one mismatch found at `path`.
///
/// Values borrow from the compared roots; an absent side is `None`.
#[derive(Debug, Clone)]
pub struct Difference<'a> {
    path: String,
    kind: DifferenceKind,
    summary: Option<String>,
    left: Option<&'a dyn Diffable>,
    right: Option<&'a dyn Diffable>,
}

impl<'a> Difference<'a> {
    /// Creates a new difference.
    pub fn new(
        path: impl Into<String>,
        kind: DifferenceKind,
        left: Option<&'a dyn Diffable>,
        right: Option<&'a dyn Diffable>,
    ) -> Self {
        Difference {
            path: path.into(),
            kind,
            summary: None,
            left,
            right,
        }
    }

    /// Attaches a summary.
    pub fn with_summary(mut self, summary: impl Into<String>) -> Self {
        self.summary = Some(summary.into());
        self
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn kind(&self) -> DifferenceKind {
        self.kind
    }

    pub fn summary(&self) -> Option<&str> {
        self.summary.as_deref()
    }

    pub fn left(&self) -> Option<&'a dyn Diffable> {
        self.left
    }

    pub fn right(&self) -> Option<&'a dyn Diffable> {
        self.right
    }

    /// Downcasts the left value to `T`, or to one of its lineage types.
    pub fn left_as<T: 'static>(&self) -> Option<&'a T> {
        self.left.and_then(view::<T>)
    }

    /// Downcasts the right value to `T`, or to one of its lineage types.
    pub fn right_as<T: 'static>(&self) -> Option<&'a T> {
        self.right.and_then(view::<T>)
    }
}

fn view<T: 'static>(value: &dyn Diffable) -> Option<&T> {
    value
        .view_as(TypeId::of::<T>())
        .and_then(|any| any.downcast_ref::<T>())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_display() {
        assert_eq!(DifferenceKind::SizeMismatch.to_string(), "SIZE_MISMATCH");
        assert_eq!(DifferenceKind::NullnessMismatch.as_str(), "NULLNESS_MISMATCH");
    }

    #[test]
    fn test_typed_access() {
        let left = 1000_i64;
        let right = Some(2000_i64);
        let diff = Difference::new("/id", DifferenceKind::ValueMismatch, Some(&left), Some(&right));
        assert_eq!(diff.path(), "/id");
        assert_eq!(diff.left_as::<i64>(), Some(&1000));
        assert_eq!(diff.right_as::<i64>(), Some(&2000));
        assert_eq!(diff.left_as::<String>(), None);
        assert!(diff.summary().is_none());
    }

    #[test]
    fn test_summary_and_absent_side() {
        let left = vec![1_i32, 2];
        let diff = Difference::new("", DifferenceKind::SizeMismatch, Some(&left), None)
            .with_summary("2 : 0");
        assert_eq!(diff.summary(), Some("2 : 0"));
        assert!(diff.right().is_none());
        assert_eq!(diff.left_as::<Vec<i32>>().map(Vec::len), Some(2));
    }
}
