//! Comparison result types.

use std::collections::HashMap;
use std::fmt;

use super::difference::{Difference, DifferenceKind};
use crate::introspect::Diffable;

/// Differences is an insertion-ordered map from path to [`Difference`].
///
/// Recording a second difference at an existing path replaces the first in place.
#[derive(Debug, Clone, Default)]
pub struct Differences<'a> {
    members: Vec<Difference<'a>>,
    index: HashMap<String, usize>,
}

impl<'a> Differences<'a> {
    /// Creates a new empty map.
    pub fn new() -> Self {
        Differences::default()
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Inserts a difference keyed by its path.
    /// If the path already exists, the difference is replaced.
    pub fn insert(&mut self, difference: Difference<'a>) {
        match self.index.get(difference.path()) {
            Some(&idx) => self.members[idx] = difference,
            None => {
                self.index
                    .insert(difference.path().to_string(), self.members.len());
                self.members.push(difference);
            }
        }
    }

    /// Gets the difference recorded at the given path.
    pub fn get(&self, path: &str) -> Option<&Difference<'a>> {
        self.index.get(path).map(|&idx| &self.members[idx])
    }

    pub fn contains(&self, path: &str) -> bool {
        self.index.contains_key(path)
    }

    /// Returns an iterator over the differences in traversal order.
    pub fn iter(&self) -> impl Iterator<Item = &Difference<'a>> {
        self.members.iter()
    }

    /// Returns an iterator over the recorded paths in traversal order.
    pub fn paths(&self) -> impl Iterator<Item = &str> {
        self.members.iter().map(Difference::path)
    }
}

impl<'a, 'b> IntoIterator for &'b Differences<'a> {
    type Item = &'b Difference<'a>;
    type IntoIter = std::slice::Iter<'b, Difference<'a>>;

    fn into_iter(self) -> Self::IntoIter {
        self.members.iter()
    }
}

/// Identities are caller-supplied labels attached to a result for reporting.
///
/// Insertion order is kept; setting an existing key replaces its value in place.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Identities {
    entries: Vec<(String, String)>,
}

impl Identities {
    pub fn new() -> Self {
        Identities::default()
    }

    /// Sets a label.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((key, value)),
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Identities {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        let mut identities = Identities::new();
        for (k, v) in iter {
            identities.insert(k, v);
        }
        identities
    }
}

impl fmt::Display for Identities {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (key, value)) in self.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{} = {}", key, value)?;
        }
        Ok(())
    }
}

/// ComparisonResult holds the outcome of one comparison run.
///
/// If there are no differences and [`is_complete`](Self::is_complete) is true,
/// the two roots are equal.
#[derive(Debug, Clone)]
pub struct ComparisonResult<'a> {
    identities: Identities,
    left: &'a dyn Diffable,
    right: &'a dyn Diffable,
    differences: Differences<'a>,
    fault: Option<String>,
}

impl<'a> ComparisonResult<'a> {
    /// Creates a new empty result for the given roots.
    pub fn new(identities: Identities, left: &'a dyn Diffable, right: &'a dyn Diffable) -> Self {
        ComparisonResult {
            identities,
            left,
            right,
            differences: Differences::new(),
            fault: None,
        }
    }

    pub(crate) fn record(&mut self, difference: Difference<'a>) {
        self.differences.insert(difference);
    }

    /// Drops everything recorded so far and marks the run as faulted.
    pub(crate) fn abort(&mut self, message: String) {
        self.differences = Differences::new();
        self.fault = Some(message);
    }

    pub fn identities(&self) -> &Identities {
        &self.identities
    }

    pub fn left(&self) -> &'a dyn Diffable {
        self.left
    }

    pub fn right(&self) -> &'a dyn Diffable {
        self.right
    }

    pub fn differences(&self) -> &Differences<'a> {
        &self.differences
    }

    /// Returns true if any difference was recorded.
    pub fn has_difference(&self) -> bool {
        !self.differences.is_empty()
    }

    /// Gets the difference recorded at the given path.
    pub fn get(&self, path: &str) -> Option<&Difference<'a>> {
        self.differences.get(path)
    }

    pub fn len(&self) -> usize {
        self.differences.len()
    }

    pub fn is_empty(&self) -> bool {
        self.differences.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Difference<'a>> {
        self.differences.iter()
    }

    /// Returns the message of the fault that aborted traversal, if any.
    pub fn fault(&self) -> Option<&str> {
        self.fault.as_deref()
    }

    /// Returns false when traversal was aborted and the result is not trustworthy.
    pub fn is_complete(&self) -> bool {
        self.fault.is_none()
    }

    /// Counts the differences of one kind.
    pub fn count(&self, kind: DifferenceKind) -> usize {
        self.differences.iter().filter(|d| d.kind() == kind).count()
    }
}
