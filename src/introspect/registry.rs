//! Type-keyed registry with lineage lookup.

use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::fmt;

use super::shape::{Lineage, TypeKey};

/// TypeRegistry maps types to payloads and resolves them along a lineage.
///
/// Used for collection alignment keys and for formatter renderers.
#[derive(Clone)]
pub struct TypeRegistry<F> {
    entries: HashMap<TypeId, (TypeKey, F)>,
}

impl<F> Default for TypeRegistry<F> {
    fn default() -> Self {
        TypeRegistry {
            entries: HashMap::new(),
        }
    }
}

impl<F> TypeRegistry<F> {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a payload for `T`, replacing any previous one.
    pub fn insert<T: ?Sized + Any>(&mut self, payload: F) {
        let key = TypeKey::of::<T>();
        self.entries.insert(key.id(), (key, payload));
    }

    /// Returns the payload registered for exactly this type.
    pub fn get(&self, key: &TypeKey) -> Option<&F> {
        self.entries.get(&key.id()).map(|(_, payload)| payload)
    }

    /// Walks the lineage from the most specific type upwards and returns the
    /// first registered payload together with the type it was registered for.
    pub fn lookup(&self, lineage: &Lineage) -> Option<(&TypeKey, &F)> {
        if self.entries.is_empty() {
            return None;
        }
        lineage
            .iter()
            .find_map(|key| self.entries.get(&key.id()).map(|(k, payload)| (k, payload)))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<F> fmt::Debug for TypeRegistry<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set()
            .entries(self.entries.values().map(|(key, _)| key.name()))
            .finish()
    }
}
