//! Record field enumeration.

use once_cell::sync::OnceCell;
use std::collections::HashMap;
use thiserror::Error;

use super::shape::Diffable;

/// Record is implemented by decomposable values compared field by field.
///
/// Usually generated with [`impl_record!`](crate::impl_record).
pub trait Record {
    /// Enumerates the comparable fields in declaration order.
    fn fields(&self) -> FieldSet<'_>;
}

/// AccessError reports a field whose value could not be read.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("cannot access field `{field}`: {reason}")]
pub struct AccessError {
    pub field: String,
    pub reason: String,
}

impl AccessError {
    /// Creates a new access error.
    pub fn new(field: impl Into<String>, reason: impl Into<String>) -> Self {
        AccessError {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

/// FieldEntry is one named field of a record.
#[derive(Debug)]
pub struct FieldEntry<'a> {
    name: &'static str,
    access: Result<&'a dyn Diffable, AccessError>,
}

impl<'a> FieldEntry<'a> {
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Reads the field value.
    pub fn value(&self) -> Result<&'a dyn Diffable, &AccessError> {
        self.access.as_ref().copied()
    }
}

/// FieldSet is an ordered, name-deduplicated list of record fields.
///
/// The first entry pushed under a name wins, so a type's own fields take
/// precedence over those inherited from a composed base record.
#[derive(Debug, Default)]
pub struct FieldSet<'a> {
    entries: Vec<FieldEntry<'a>>,
    index: OnceCell<HashMap<&'static str, usize>>,
}

impl<'a> FieldSet<'a> {
    /// Creates an empty field set.
    pub fn new() -> Self {
        FieldSet {
            entries: Vec::new(),
            index: OnceCell::new(),
        }
    }

    /// Adds a readable field.
    pub fn push(&mut self, name: &'static str, value: &'a dyn Diffable) {
        self.insert(FieldEntry {
            name,
            access: Ok(value),
        });
    }

    /// Adds a field that cannot be read.
    pub fn push_inaccessible(&mut self, name: &'static str, reason: impl Into<String>) {
        self.insert(FieldEntry {
            name,
            access: Err(AccessError::new(name, reason)),
        });
    }

    /// Appends the fields of a base record that are not shadowed here.
    pub fn inherit(&mut self, base: FieldSet<'a>) {
        for entry in base.entries {
            self.insert(entry);
        }
    }

    fn insert(&mut self, entry: FieldEntry<'a>) {
        if self.entries.iter().any(|e| e.name == entry.name) {
            return;
        }
        self.entries.push(entry);
        self.index = OnceCell::new();
    }

    /// Looks up a field by name.
    pub fn get(&self, name: &str) -> Option<&FieldEntry<'a>> {
        let index = self.index.get_or_init(|| {
            self.entries
                .iter()
                .enumerate()
                .map(|(i, e)| (e.name, i))
                .collect()
        });
        index.get(name).map(|&i| &self.entries[i])
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates the fields in order.
    pub fn iter(&self) -> impl Iterator<Item = &FieldEntry<'a>> {
        self.entries.iter()
    }

    /// Iterates the field names in order.
    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.entries.iter().map(|e| e.name)
    }
}

/// Implements [`Diffable`] and [`Record`] for a struct by listing its comparable fields.
///
/// ```
/// use object_diff::impl_record;
///
/// #[derive(Debug)]
/// struct Employee { id: u64, name: String }
/// impl_record!(Employee { id, name });
///
/// #[derive(Debug)]
/// struct Manager { base: Employee, reports: Vec<u64> }
/// impl_record!(Manager : base { reports });
/// ```
///
/// The second form composes a base record stored in the named field: the base's
/// fields are appended after the type's own, and the base type joins the lineage.
#[macro_export]
macro_rules! impl_record {
    ($ty:ty { $($field:ident),* $(,)? }) => {
        impl $crate::Diffable for $ty {
            fn shape(&self) -> $crate::Shape<'_> {
                $crate::Shape::Record(self)
            }

            fn as_any(&self) -> &dyn ::std::any::Any {
                self
            }

            fn lineage(&self) -> $crate::Lineage {
                $crate::Lineage::of::<$ty>()
            }
        }

        impl $crate::Record for $ty {
            fn fields(&self) -> $crate::FieldSet<'_> {
                #[allow(unused_mut)]
                let mut fields = $crate::FieldSet::new();
                $( fields.push(stringify!($field), &self.$field); )*
                fields
            }
        }
    };
    ($ty:ty : $base:ident { $($field:ident),* $(,)? }) => {
        impl $crate::Diffable for $ty {
            fn shape(&self) -> $crate::Shape<'_> {
                $crate::Shape::Record(self)
            }

            fn as_any(&self) -> &dyn ::std::any::Any {
                self
            }

            fn lineage(&self) -> $crate::Lineage {
                $crate::Lineage::of::<$ty>()
                    .extended($crate::Diffable::lineage(&self.$base))
            }

            fn view_as(&self, ty: ::std::any::TypeId) -> Option<&dyn ::std::any::Any> {
                if ty == ::std::any::TypeId::of::<$ty>() {
                    Some(self as &dyn ::std::any::Any)
                } else {
                    $crate::Diffable::view_as(&self.$base, ty)
                }
            }
        }

        impl $crate::Record for $ty {
            fn fields(&self) -> $crate::FieldSet<'_> {
                let mut fields = $crate::FieldSet::new();
                $( fields.push(stringify!($field), &self.$field); )*
                fields.inherit($crate::Record::fields(&self.$base));
                fields
            }
        }
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::introspect::{Diffable, Lineage, Shape};
    use std::any::TypeId;

    #[derive(Debug)]
    struct Person {
        id: u64,
        name: String,
    }
    crate::impl_record!(Person { id, name });

    #[derive(Debug)]
    struct Employee {
        person: Person,
        name: String,
        team: String,
    }
    crate::impl_record!(Employee : person { name, team });

    fn employee() -> Employee {
        Employee {
            person: Person {
                id: 7,
                name: "base".into(),
            },
            name: "derived".into(),
            team: "core".into(),
        }
    }

    #[test]
    fn test_fields_in_declaration_order() {
        let p = Person {
            id: 1,
            name: "a".into(),
        };
        let fields = p.fields();
        assert_eq!(fields.names().collect::<Vec<_>>(), vec!["id", "name"]);
        assert!(matches!(p.shape(), Shape::Record(_)));
    }

    #[test]
    fn test_inherited_fields_most_derived_first() {
        let e = employee();
        let fields = e.fields();
        assert_eq!(fields.names().collect::<Vec<_>>(), vec!["name", "team", "id"]);

        let name = fields.get("name").unwrap().value().unwrap();
        assert_eq!(name.as_any().downcast_ref::<String>().unwrap(), "derived");
        assert!(fields.get("person").is_none());
    }

    #[test]
    fn test_lineage_and_view_as_reach_base() {
        let e = employee();
        assert_eq!(
            e.lineage(),
            Lineage::of::<Employee>().extended(Lineage::of::<Person>())
        );
        let base = e.view_as(TypeId::of::<Person>()).unwrap();
        assert_eq!(base.downcast_ref::<Person>().unwrap().id, 7);
        assert!(e.view_as(TypeId::of::<String>()).is_none());
    }

    #[test]
    fn test_inaccessible_field() {
        let mut fields = FieldSet::new();
        fields.push_inaccessible("secret", "redacted");
        let entry = fields.get("secret").unwrap();
        let err = entry.value().unwrap_err();
        assert_eq!(err.field, "secret");
        assert!(err.to_string().contains("redacted"));
    }

    #[test]
    fn test_duplicate_push_keeps_first() {
        let a = 1_i32;
        let b = 2_i32;
        let mut fields = FieldSet::new();
        fields.push("x", &a);
        assert!(fields.get("x").is_some());
        fields.push("x", &b);
        assert_eq!(fields.len(), 1);
        let x = fields.get("x").unwrap().value().unwrap();
        assert_eq!(x.as_any().downcast_ref::<i32>(), Some(&1));
    }
}
