//! Collection alignment keys.

use std::any::{type_name, Any, TypeId};
use std::collections::HashSet;
use std::fmt::Display;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use super::error::{panic_message, AlignmentFault};
use crate::introspect::{Diffable, Lineage, TypeKey, TypeRegistry};

/// Type-erased key extractor for one element type.
pub type KeyFn = Arc<dyn Fn(&dyn Diffable) -> Result<String, AlignmentFault> + Send + Sync>;

/// AlignmentKeys maps element types to the function that extracts their key.
///
/// Lookup walks the element's lineage, so a key registered for a base record
/// also aligns collections of records composing it.
#[derive(Debug, Clone, Default)]
pub struct AlignmentKeys {
    registry: TypeRegistry<KeyFn>,
}

impl AlignmentKeys {
    pub fn new() -> Self {
        AlignmentKeys::default()
    }

    /// Registers an infallible key function for elements of type `T`.
    pub fn insert<T, K, F>(&mut self, key: F)
    where
        T: Any,
        K: Display,
        F: Fn(&T) -> K + Send + Sync + 'static,
    {
        self.insert_fallible::<T, K, std::convert::Infallible, _>(move |item: &T| Ok(key(item)));
    }

    /// Registers a key function for elements of type `T` that may reject an element.
    pub fn insert_fallible<T, K, E, F>(&mut self, key: F)
    where
        T: Any,
        K: Display,
        E: Display,
        F: Fn(&T) -> Result<K, E> + Send + Sync + 'static,
    {
        let erased = move |element: &dyn Diffable| -> Result<String, AlignmentFault> {
            let item = element
                .view_as(TypeId::of::<T>())
                .and_then(|any| any.downcast_ref::<T>())
                .ok_or_else(|| {
                    AlignmentFault::unexpected_element(type_name::<T>(), element.lineage().name())
                })?;
            key(item)
                .map(|k| k.to_string())
                .map_err(|e| AlignmentFault::key_function(e.to_string()))
        };
        self.registry.insert::<T>(Arc::new(erased));
    }

    /// Finds the key function for an element lineage, most specific type first.
    pub fn lookup(&self, lineage: &Lineage) -> Option<(&TypeKey, &KeyFn)> {
        self.registry.lookup(lineage)
    }

    pub fn len(&self) -> usize {
        self.registry.len()
    }

    pub fn is_empty(&self) -> bool {
        self.registry.is_empty()
    }
}

/// Keys every element of a collection, keeping the collection's order.
///
/// Fails on the first element the function cannot key, on a panicking key
/// function, and on a key produced twice.
pub fn index_by_key<'a>(
    key_fn: &KeyFn,
    elements: &[&'a dyn Diffable],
) -> Result<Vec<(String, &'a dyn Diffable)>, AlignmentFault> {
    let mut seen = HashSet::with_capacity(elements.len());
    let mut keyed = Vec::with_capacity(elements.len());
    for &element in elements {
        let key = panic::catch_unwind(AssertUnwindSafe(|| key_fn(element)))
            .map_err(|payload| AlignmentFault::panicked(panic_message(payload)))??;
        if !seen.insert(key.clone()) {
            return Err(AlignmentFault::duplicate_key(key));
        }
        keyed.push((key, element));
    }
    Ok(keyed)
}
