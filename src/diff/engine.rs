//! The recursive comparison engine.

use once_cell::sync::Lazy;
use std::cmp::Ordering;
use std::collections::HashMap;
use std::fmt::Display;
use std::panic::{self, AssertUnwindSafe};
use tracing::{debug, error, trace, warn};

use super::alignment::{index_by_key, AlignmentKeys};
use super::difference::{Difference, DifferenceKind};
use super::error::{panic_message, DiffError};
use super::ignore::IgnoreFilter;
use super::path::{Path, PathElement};
use super::result::{ComparisonResult, Identities};
use crate::introspect::{same_instance, Diffable, Record, Shape, ABSENT};

static DEFAULT_ENGINE: Lazy<ObjectDiff> = Lazy::new(ObjectDiff::default);

/// Compares two values with an unconfigured engine.
pub fn compare<'a>(left: &'a dyn Diffable, right: &'a dyn Diffable) -> ComparisonResult<'a> {
    DEFAULT_ENGINE.compare(left, right)
}

type Entries<'a> = Vec<(String, &'a dyn Diffable)>;

/// ObjectDiffBuilder is a builder for creating an ObjectDiff.
#[derive(Debug, Default)]
pub struct ObjectDiffBuilder {
    identities: Identities,
    ignore_paths: Vec<String>,
    keys: AlignmentKeys,
}

impl ObjectDiffBuilder {
    /// Creates a new ObjectDiffBuilder.
    pub fn new() -> Self {
        ObjectDiffBuilder::default()
    }

    /// Adds an identity label copied into every result.
    pub fn identity(mut self, key: impl Into<String>, value: impl Display) -> Self {
        self.identities.insert(key, value.to_string());
        self
    }

    /// Adds several identity labels.
    pub fn identities<I, K, V>(mut self, identities: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Display,
    {
        for (key, value) in identities {
            self.identities.insert(key, value.to_string());
        }
        self
    }

    /// Adds a regular expression; paths fully matching it are not compared.
    pub fn ignore_path(mut self, pattern: impl Into<String>) -> Self {
        self.ignore_paths.push(pattern.into());
        self
    }

    /// Adds several ignore patterns.
    pub fn ignore_paths<I, S>(mut self, patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.ignore_paths.extend(patterns.into_iter().map(Into::into));
        self
    }

    /// Aligns sequences whose elements are (or compose) a `T` by the given key
    /// instead of by position.
    pub fn alignment_key<T, K, F>(mut self, key: F) -> Self
    where
        T: Diffable,
        K: Display,
        F: Fn(&T) -> K + Send + Sync + 'static,
    {
        self.keys.insert::<T, K, F>(key);
        self
    }

    /// Like [`alignment_key`](Self::alignment_key), for keys that can fail.
    /// A failure makes the sequence fall back to positional comparison.
    pub fn fallible_alignment_key<T, K, E, F>(mut self, key: F) -> Self
    where
        T: Diffable,
        K: Display,
        E: Display,
        F: Fn(&T) -> Result<K, E> + Send + Sync + 'static,
    {
        self.keys.insert_fallible::<T, K, E, F>(key);
        self
    }

    /// Builds the ObjectDiff, compiling the ignore patterns.
    pub fn build(self) -> Result<ObjectDiff, DiffError> {
        Ok(ObjectDiff {
            identities: self.identities,
            ignore: IgnoreFilter::new(self.ignore_paths)?,
            keys: self.keys,
        })
    }
}

/// ObjectDiff computes path-addressed differences between two values.
///
/// Configuration is frozen at [`ObjectDiffBuilder::build`]; one engine can serve
/// any number of comparisons, from any number of threads.
#[derive(Debug, Clone, Default)]
pub struct ObjectDiff {
    identities: Identities,
    ignore: IgnoreFilter,
    keys: AlignmentKeys,
}

impl ObjectDiff {
    /// Creates a new ObjectDiffBuilder.
    pub fn builder() -> ObjectDiffBuilder {
        ObjectDiffBuilder::new()
    }

    pub fn identities(&self) -> &Identities {
        &self.identities
    }

    pub fn ignore_filter(&self) -> &IgnoreFilter {
        &self.ignore
    }

    pub fn alignment_keys(&self) -> &AlignmentKeys {
        &self.keys
    }

    /// Compares `left` against `right`.
    ///
    /// Never fails. If traversal panics, the result holds no differences and
    /// reports the fault through [`ComparisonResult::fault`].
    pub fn compare<'a>(
        &self,
        left: &'a dyn Diffable,
        right: &'a dyn Diffable,
    ) -> ComparisonResult<'a> {
        let mut result = ComparisonResult::new(self.identities.clone(), left, right);
        let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
            self.visit(&mut result, &Path::root(), left, right)
        }));
        match outcome {
            Ok(()) => debug!(differences = result.len(), "comparison finished"),
            Err(payload) => {
                let message = panic_message(payload);
                error!(
                    left = left.lineage().name(),
                    right = right.lineage().name(),
                    error = %message,
                    "comparison aborted"
                );
                result.abort(message);
            }
        }
        result
    }

    /// Compares `left` against `right`, turning an aborted traversal into an error.
    pub fn try_compare<'a>(
        &self,
        left: &'a dyn Diffable,
        right: &'a dyn Diffable,
    ) -> Result<ComparisonResult<'a>, DiffError> {
        let result = self.compare(left, right);
        match result.fault() {
            Some(message) => Err(DiffError::traversal(message)),
            None => Ok(result),
        }
    }

    fn visit<'a>(
        &self,
        result: &mut ComparisonResult<'a>,
        path: &Path,
        left: &'a dyn Diffable,
        right: &'a dyn Diffable,
    ) {
        let rendered = path.to_string();
        if self.ignore.is_ignored(&rendered) {
            trace!(path = %rendered, "path ignored");
            return;
        }
        if same_instance(left, right) || left.unordered_eq(right.as_any()) == Some(true) {
            return;
        }

        let left_shape = left.shape();
        let right_shape = right.shape();
        match (left_shape.is_absent(), right_shape.is_absent()) {
            (true, true) => return,
            (true, false) => {
                result.record(Difference::new(
                    rendered,
                    DifferenceKind::NullnessMismatch,
                    None,
                    Some(right),
                ));
                return;
            }
            (false, true) => {
                result.record(Difference::new(
                    rendered,
                    DifferenceKind::NullnessMismatch,
                    Some(left),
                    None,
                ));
                return;
            }
            (false, false) => {}
        }

        match left_shape {
            Shape::Map(entries) => {
                let Some(others) =
                    self.same_shape(result, &rendered, left, right, right_shape, map_entries)
                else {
                    return;
                };
                self.visit_entries(result, path, rendered, left, right, entries, others);
            }
            Shape::Sequence(items) => {
                let Some(others) =
                    self.same_shape(result, &rendered, left, right, right_shape, sequence_items)
                else {
                    return;
                };
                self.visit_sequence(result, path, rendered, left, right, items, others);
            }
            Shape::Array(items) => {
                let Some(others) =
                    self.same_shape(result, &rendered, left, right, right_shape, array_items)
                else {
                    return;
                };
                if items.len() != others.len() {
                    record_size(result, rendered, left, right, items.len(), others.len());
                    return;
                }
                self.visit_positional(result, path, items, others);
            }
            Shape::Terminal(terminal) => {
                if !terminal.terminal_eq(right.as_any()) {
                    record_value(result, rendered, left, right);
                }
            }
            Shape::Ordered(ordered) => {
                if ordered.ordered_cmp(right.as_any()) != Some(Ordering::Equal) {
                    record_value(result, rendered, left, right);
                }
            }
            Shape::Record(record) => {
                let Some(other) =
                    self.same_shape(result, &rendered, left, right, right_shape, record_of)
                else {
                    return;
                };
                self.visit_record(result, path, &rendered, record, other);
            }
            Shape::Absent => {}
        }
    }

    /// Extracts the right side's payload when it has the left side's shape,
    /// otherwise records a TYPE_MISMATCH.
    fn same_shape<'a, T>(
        &self,
        result: &mut ComparisonResult<'a>,
        rendered: &str,
        left: &'a dyn Diffable,
        right: &'a dyn Diffable,
        right_shape: Shape<'a>,
        extract: impl FnOnce(Shape<'a>) -> Option<T>,
    ) -> Option<T> {
        let right_kind = right_shape.kind();
        let payload = extract(right_shape);
        if payload.is_none() {
            debug!(
                path = %rendered,
                left = left.lineage().name(),
                right = right_kind,
                "shape mismatch"
            );
            result.record(Difference::new(
                rendered,
                DifferenceKind::TypeMismatch,
                Some(left),
                Some(right),
            ));
        }
        payload
    }

    #[allow(clippy::too_many_arguments)]
    fn visit_sequence<'a>(
        &self,
        result: &mut ComparisonResult<'a>,
        path: &Path,
        rendered: String,
        left: &'a dyn Diffable,
        right: &'a dyn Diffable,
        items: Vec<&'a dyn Diffable>,
        others: Vec<&'a dyn Diffable>,
    ) {
        if items.is_empty() || others.is_empty() {
            if items.is_empty() != others.is_empty() {
                record_emptiness(result, rendered, left, right);
            }
            return;
        }
        if items.len() != others.len() {
            record_size(result, rendered, left, right, items.len(), others.len());
            return;
        }
        match self.align(&rendered, &items, &others) {
            Some((entries, other_entries)) => {
                self.visit_entries(result, path, rendered, left, right, entries, other_entries)
            }
            None => self.visit_positional(result, path, items, others),
        }
    }

    /// Keys both sides with the function registered for the first left element.
    fn align<'a>(
        &self,
        rendered: &str,
        items: &[&'a dyn Diffable],
        others: &[&'a dyn Diffable],
    ) -> Option<(Entries<'a>, Entries<'a>)> {
        let lineage = items.first().map(|item| item.lineage()).unwrap_or_default();
        let (registered, key_fn) = self.keys.lookup(&lineage)?;
        let keyed = index_by_key(key_fn, items)
            .and_then(|entries| index_by_key(key_fn, others).map(|other| (entries, other)));
        match keyed {
            Ok(pair) => Some(pair),
            Err(fault) => {
                warn!(
                    path = %rendered,
                    key_type = %registered,
                    error = %fault,
                    "failed to align collection by key, comparing by position"
                );
                None
            }
        }
    }

    fn visit_positional<'a>(
        &self,
        result: &mut ComparisonResult<'a>,
        path: &Path,
        items: Vec<&'a dyn Diffable>,
        others: Vec<&'a dyn Diffable>,
    ) {
        for (i, (item, other)) in items.into_iter().zip(others).enumerate() {
            self.visit(result, &path.with(PathElement::index(i)), item, other);
        }
    }

    /// Compares keyed entries. Only keys present on the left are visited; a key
    /// missing on the right is compared against absence.
    #[allow(clippy::too_many_arguments)]
    fn visit_entries<'a>(
        &self,
        result: &mut ComparisonResult<'a>,
        path: &Path,
        rendered: String,
        left: &'a dyn Diffable,
        right: &'a dyn Diffable,
        entries: Entries<'a>,
        others: Entries<'a>,
    ) {
        if entries.is_empty() || others.is_empty() {
            if entries.is_empty() != others.is_empty() {
                record_emptiness(result, rendered, left, right);
            }
            return;
        }
        if entries.len() != others.len() {
            record_size(result, rendered, left, right, entries.len(), others.len());
            return;
        }

        let lookup: HashMap<&str, &'a dyn Diffable> =
            others.iter().map(|(key, value)| (key.as_str(), *value)).collect();
        for (key, value) in &entries {
            let other = lookup
                .get(key.as_str())
                .copied()
                .unwrap_or(&ABSENT as &dyn Diffable);
            self.visit(result, &path.with(PathElement::key(key.as_str())), *value, other);
        }
    }

    /// Compares the fields both records have, in the left record's order.
    fn visit_record<'a>(
        &self,
        result: &mut ComparisonResult<'a>,
        path: &Path,
        rendered: &str,
        record: &'a dyn Record,
        other: &'a dyn Record,
    ) {
        let fields = record.fields();
        let other_fields = other.fields();
        for entry in fields.iter() {
            let Some(other_entry) = other_fields.get(entry.name()) else {
                debug!(path = %rendered, field = entry.name(), "field missing on right, skipped");
                continue;
            };
            match (entry.value(), other_entry.value()) {
                (Ok(value), Ok(other_value)) => {
                    self.visit(
                        result,
                        &path.with(PathElement::field(entry.name())),
                        value,
                        other_value,
                    );
                }
                (Err(err), _) | (_, Err(err)) => {
                    debug!(path = %rendered, error = %err, "field not readable, skipped");
                }
            }
        }
    }
}

fn map_entries(shape: Shape<'_>) -> Option<Entries<'_>> {
    match shape {
        Shape::Map(entries) => Some(entries),
        _ => None,
    }
}

fn sequence_items(shape: Shape<'_>) -> Option<Vec<&dyn Diffable>> {
    match shape {
        Shape::Sequence(items) => Some(items),
        _ => None,
    }
}

fn array_items(shape: Shape<'_>) -> Option<Vec<&dyn Diffable>> {
    match shape {
        Shape::Array(items) => Some(items),
        _ => None,
    }
}

fn record_of(shape: Shape<'_>) -> Option<&dyn Record> {
    match shape {
        Shape::Record(record) => Some(record),
        _ => None,
    }
}

fn record_value<'a>(
    result: &mut ComparisonResult<'a>,
    path: String,
    left: &'a dyn Diffable,
    right: &'a dyn Diffable,
) {
    result.record(Difference::new(
        path,
        DifferenceKind::ValueMismatch,
        Some(left),
        Some(right),
    ));
}

fn record_size<'a>(
    result: &mut ComparisonResult<'a>,
    path: String,
    left: &'a dyn Diffable,
    right: &'a dyn Diffable,
    left_len: usize,
    right_len: usize,
) {
    result.record(
        Difference::new(path, DifferenceKind::SizeMismatch, Some(left), Some(right))
            .with_summary(format!("{} : {}", left_len, right_len)),
    );
}

/// An empty container against a non-empty one counts as a nullness mismatch.
fn record_emptiness<'a>(
    result: &mut ComparisonResult<'a>,
    path: String,
    left: &'a dyn Diffable,
    right: &'a dyn Diffable,
) {
    result.record(Difference::new(
        path,
        DifferenceKind::NullnessMismatch,
        Some(left),
        Some(right),
    ));
}
