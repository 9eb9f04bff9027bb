//! Engine errors and recoverable faults.

use std::any::Any;
use thiserror::Error;

/// DiffError is returned by engine construction and by [`ObjectDiff::try_compare`].
///
/// [`ObjectDiff::try_compare`]: crate::ObjectDiff::try_compare
#[derive(Debug, Error)]
pub enum DiffError {
    #[error("invalid ignore pattern `{pattern}`")]
    InvalidIgnorePattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("comparison aborted: {message}")]
    Traversal { message: String },
}

impl DiffError {
    /// Creates an invalid ignore pattern error.
    pub fn invalid_ignore_pattern(pattern: impl Into<String>, source: regex::Error) -> Self {
        DiffError::InvalidIgnorePattern {
            pattern: pattern.into(),
            source,
        }
    }

    /// Creates a traversal error.
    pub fn traversal(message: impl Into<String>) -> Self {
        DiffError::Traversal {
            message: message.into(),
        }
    }
}

/// AlignmentFault explains why a collection fell back to positional comparison.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AlignmentFault {
    #[error("alignment key for {expected} cannot read element of type {found}")]
    UnexpectedElement { expected: String, found: String },

    #[error("alignment key function failed: {message}")]
    KeyFunction { message: String },

    #[error("duplicate alignment key: {key}")]
    DuplicateKey { key: String },

    #[error("alignment key function panicked: {message}")]
    Panicked { message: String },
}

impl AlignmentFault {
    /// Creates an unexpected element fault.
    pub fn unexpected_element(expected: impl Into<String>, found: impl Into<String>) -> Self {
        AlignmentFault::UnexpectedElement {
            expected: expected.into(),
            found: found.into(),
        }
    }

    /// Creates a key function fault.
    pub fn key_function(message: impl Into<String>) -> Self {
        AlignmentFault::KeyFunction {
            message: message.into(),
        }
    }

    /// Creates a duplicate key fault.
    pub fn duplicate_key(key: impl Into<String>) -> Self {
        AlignmentFault::DuplicateKey { key: key.into() }
    }

    /// Creates a panicked fault.
    pub fn panicked(message: impl Into<String>) -> Self {
        AlignmentFault::Panicked {
            message: message.into(),
        }
    }
}

/// Extracts the message carried by a panic payload.
pub(crate) fn panic_message(payload: Box<dyn Any + Send>) -> String {
    if let Some(s) = payload.downcast_ref::<&'static str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic payload".to_string()
    }
}
