//! Text rendering of comparison results.

use std::any::{Any, TypeId};
use std::fmt;
use std::sync::Arc;

use crate::diff::{ComparisonResult, Difference};
use crate::introspect::{Diffable, Shape, TypeRegistry};

const NO_IDENTITIES: &str = "no-identities";
const ABSENT: &str = "{}";

type RenderFn = Arc<dyn Fn(&dyn Diffable) -> Option<String> + Send + Sync>;

/// ResultFormatter renders a [`ComparisonResult`] as text.
///
/// The first line lists the identities, followed by one block per difference:
///
/// ```text
/// memberSrl = AAA
/// [/id] VALUE_MISMATCH -
///  [L] 1000
///  [R] 2000
/// ```
#[derive(Clone, Default)]
pub struct ResultFormatter {
    renderers: TypeRegistry<RenderFn>,
}

impl ResultFormatter {
    /// Creates a new formatter that renders values with [`Diffable::describe`].
    pub fn new() -> Self {
        ResultFormatter::default()
    }

    /// Registers how values of type `T`, or of types composing a `T`, are rendered.
    pub fn renderer<T, F>(mut self, render: F) -> Self
    where
        T: Any,
        F: Fn(&T) -> String + Send + Sync + 'static,
    {
        let erased = move |value: &dyn Diffable| {
            value
                .view_as(TypeId::of::<T>())
                .and_then(|any| any.downcast_ref::<T>())
                .map(&render)
        };
        self.renderers.insert::<T>(Arc::new(erased));
        self
    }

    /// Renders the whole result, or returns `None` if it holds no differences.
    pub fn format(&self, result: &ComparisonResult<'_>) -> Option<String> {
        if !result.has_difference() {
            return None;
        }
        let mut out = self.format_identities(result);
        out.push('\n');
        out.push_str(&self.format_differences(result));
        Some(out)
    }

    /// Renders the identities as `key = value, key = value`.
    pub fn format_identities(&self, result: &ComparisonResult<'_>) -> String {
        let identities = result.identities();
        if identities.is_empty() {
            NO_IDENTITIES.to_string()
        } else {
            identities.to_string()
        }
    }

    /// Renders every difference in traversal order, each followed by a newline.
    pub fn format_differences(&self, result: &ComparisonResult<'_>) -> String {
        result
            .iter()
            .map(|difference| {
                let mut block = self.format_difference(difference);
                block.push('\n');
                block
            })
            .collect()
    }

    /// Renders one difference as a summary line and two detail lines.
    pub fn format_difference(&self, difference: &Difference<'_>) -> String {
        format!(
            "[{}] {} - {}\n [L] {}\n [R] {}",
            difference.path(),
            difference.kind(),
            difference.summary().unwrap_or_default(),
            self.render(difference.left()),
            self.render(difference.right()),
        )
    }

    /// Renders one value. Absent values render as `{}` and empty containers as
    /// the empty string.
    pub fn render(&self, value: Option<&dyn Diffable>) -> String {
        let Some(value) = value else {
            return ABSENT.to_string();
        };
        match value.shape() {
            Shape::Absent => ABSENT.to_string(),
            Shape::Map(entries) => {
                let Some((_, first)) = entries.first() else {
                    return String::new();
                };
                let renderer = self.lookup(*first);
                let body = entries
                    .iter()
                    .map(|(key, element)| {
                        format!("{}={}", key, self.render_element(renderer, *element))
                    })
                    .collect::<Vec<_>>()
                    .join(", ");
                format!("{{{}}}", body)
            }
            Shape::Sequence(items) | Shape::Array(items) => {
                let Some(first) = items.first() else {
                    return String::new();
                };
                let renderer = self.lookup(*first);
                let body = items
                    .iter()
                    .map(|element| self.render_element(renderer, *element))
                    .collect::<Vec<_>>()
                    .join(", ");
                format!("[{}]", body)
            }
            _ => self.render_element(self.lookup(value), value),
        }
    }

    fn lookup(&self, value: &dyn Diffable) -> Option<&RenderFn> {
        self.renderers
            .lookup(&value.lineage())
            .map(|(_, renderer)| renderer)
    }

    fn render_element(&self, renderer: Option<&RenderFn>, element: &dyn Diffable) -> String {
        if element.shape().is_absent() {
            return ABSENT.to_string();
        }
        renderer
            .and_then(|render| render(element))
            .unwrap_or_else(|| element.describe())
    }
}

impl fmt::Debug for ResultFormatter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResultFormatter")
            .field("renderers", &self.renderers)
            .finish()
    }
}
