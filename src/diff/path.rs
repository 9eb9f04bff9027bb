//! Path element and path types.

use std::fmt;

/// PathElement represents one level of navigation from the comparison root.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PathElement {
    /// Record field name.
    Field(String),
    /// Stringified map key or collection alignment key.
    Key(String),
    /// Zero-based position in a sequence or array.
    Index(usize),
}

impl PathElement {
    /// Creates a new field path element.
    pub fn field(name: impl Into<String>) -> Self {
        PathElement::Field(name.into())
    }

    /// Creates a new key path element.
    pub fn key(key: impl Into<String>) -> Self {
        PathElement::Key(key.into())
    }

    /// Creates a new index path element.
    pub fn index(i: usize) -> Self {
        PathElement::Index(i)
    }
}

impl fmt::Display for PathElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathElement::Field(name) => write!(f, "/{}", name),
            PathElement::Key(key) => write!(f, "/{}", key),
            PathElement::Index(i) => write!(f, "/{}", i),
        }
    }
}

/// Path addresses a location below the comparison root.
///
/// Renders as `/`-delimited segments; the root renders as the empty string.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Path {
    elements: Vec<PathElement>,
}

impl Path {
    /// Creates the root path.
    pub fn root() -> Self {
        Path::default()
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    /// Returns true for the root path.
    pub fn is_root(&self) -> bool {
        self.elements.is_empty()
    }

    /// Creates a new path with the given element appended.
    pub fn with(&self, element: PathElement) -> Self {
        let mut elements = Vec::with_capacity(self.elements.len() + 1);
        elements.extend_from_slice(&self.elements);
        elements.push(element);
        Path { elements }
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for element in &self.elements {
            write!(f, "{}", element)?;
        }
        Ok(())
    }
}
