//! Shape classification and type lineage.

use std::any::{Any, TypeId};
use std::cmp::Ordering;
use std::fmt;

use super::record::Record;

/// Diffable is implemented by every value the engine can walk.
///
/// Implementations classify themselves once per visit through [`Diffable::shape`];
/// the engine never performs further dynamic type tests on a value.
pub trait Diffable: Any + fmt::Debug {
    /// Classifies the value and exposes its children, if any.
    fn shape(&self) -> Shape<'_>;

    /// Returns the value as `Any`, looking through transparent wrappers.
    fn as_any(&self) -> &dyn Any;

    /// Returns the value's type followed by its declared ancestors.
    fn lineage(&self) -> Lineage;

    /// Views the value as one of the types in its lineage.
    fn view_as(&self, ty: TypeId) -> Option<&dyn Any> {
        let any = self.as_any();
        if any.type_id() == ty {
            Some(any)
        } else {
            None
        }
    }

    /// Natural string form used when no renderer is registered.
    fn describe(&self) -> String {
        format!("{:?}", self)
    }

    /// Equality that does not depend on iteration order, for containers whose
    /// order is not part of their value. `None` when the type has none.
    fn unordered_eq(&self, _other: &dyn Any) -> Option<bool> {
        None
    }
}

/// Shape is the closed classification of a value.
pub enum Shape<'a> {
    /// The explicit absence value (`None`, `Value::Null`).
    Absent,
    /// Associative container: stringified key and value, in iteration order.
    Map(Vec<(String, &'a dyn Diffable)>),
    /// Sequential container; supports alignment keys.
    Sequence(Vec<&'a dyn Diffable>),
    /// Fixed-size array; always compared positionally.
    Array(Vec<&'a dyn Diffable>),
    /// Atomic value compared with its natural equality.
    Terminal(&'a dyn Terminal),
    /// Non-terminal value with a total order.
    Ordered(&'a dyn Ordered),
    /// Decomposable record compared field by field.
    Record(&'a dyn Record),
}

impl<'a> Shape<'a> {
    /// Returns true for [`Shape::Absent`].
    pub fn is_absent(&self) -> bool {
        matches!(self, Shape::Absent)
    }

    /// Short name of the variant, used in log events.
    pub fn kind(&self) -> &'static str {
        match self {
            Shape::Absent => "absent",
            Shape::Map(_) => "map",
            Shape::Sequence(_) => "sequence",
            Shape::Array(_) => "array",
            Shape::Terminal(_) => "terminal",
            Shape::Ordered(_) => "ordered",
            Shape::Record(_) => "record",
        }
    }
}

impl fmt::Debug for Shape<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Shape::Map(entries) => write!(f, "Map(len={})", entries.len()),
            Shape::Sequence(items) => write!(f, "Sequence(len={})", items.len()),
            Shape::Array(items) => write!(f, "Array(len={})", items.len()),
            other => f.write_str(other.kind()),
        }
    }
}

/// Terminal values compare with `PartialEq` against a right side of the same type.
///
/// Two NaN floats are equal, so every value equals a copy of itself.
pub trait Terminal {
    fn terminal_eq(&self, other: &dyn Any) -> bool;
}

impl<T: PartialEq + Any> Terminal for T {
    fn terminal_eq(&self, other: &dyn Any) -> bool {
        let Some(right) = other.downcast_ref::<T>() else {
            return false;
        };
        self == right || both_nan(self, other)
    }
}

fn both_nan(left: &dyn Any, right: &dyn Any) -> bool {
    if let (Some(l), Some(r)) = (left.downcast_ref::<f64>(), right.downcast_ref::<f64>()) {
        return l.is_nan() && r.is_nan();
    }
    if let (Some(l), Some(r)) = (left.downcast_ref::<f32>(), right.downcast_ref::<f32>()) {
        return l.is_nan() && r.is_nan();
    }
    false
}

/// Ordered values compare with `Ord` against a right side of the same type.
pub trait Ordered {
    fn ordered_cmp(&self, other: &dyn Any) -> Option<Ordering>;
}

impl<T: Ord + Any> Ordered for T {
    fn ordered_cmp(&self, other: &dyn Any) -> Option<Ordering> {
        other.downcast_ref::<T>().map(|other| self.cmp(other))
    }
}

/// TypeKey identifies one concrete type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TypeKey {
    id: TypeId,
    name: &'static str,
}

impl TypeKey {
    /// Creates the key for `T`.
    pub fn of<T: ?Sized + Any>() -> Self {
        TypeKey {
            id: TypeId::of::<T>(),
            name: std::any::type_name::<T>(),
        }
    }

    pub fn id(&self) -> TypeId {
        self.id
    }

    pub fn name(&self) -> &'static str {
        self.name
    }
}

impl fmt::Display for TypeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

/// Lineage lists a value's type followed by its ancestors, most specific first.
///
/// An empty lineage means the type is unknown (an absent element, for instance).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Lineage {
    chain: Vec<TypeKey>,
}

impl Lineage {
    /// The unknown lineage.
    pub fn unknown() -> Self {
        Lineage { chain: Vec::new() }
    }

    /// Lineage holding only `T`.
    pub fn of<T: ?Sized + Any>() -> Self {
        Lineage {
            chain: vec![TypeKey::of::<T>()],
        }
    }

    /// Appends the ancestors of a composed base type.
    pub fn extended(mut self, ancestors: Lineage) -> Self {
        for key in ancestors.chain {
            if !self.chain.contains(&key) {
                self.chain.push(key);
            }
        }
        self
    }

    pub fn is_unknown(&self) -> bool {
        self.chain.is_empty()
    }

    /// Returns the most specific type, if known.
    pub fn most_specific(&self) -> Option<&TypeKey> {
        self.chain.first()
    }

    /// Name of the most specific type, or `"unknown"`.
    pub fn name(&self) -> &'static str {
        self.most_specific().map_or("unknown", TypeKey::name)
    }

    pub fn len(&self) -> usize {
        self.chain.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chain.is_empty()
    }

    /// Iterates from the most specific type up through its ancestors.
    pub fn iter(&self) -> impl Iterator<Item = &TypeKey> {
        self.chain.iter()
    }
}

/// Returns true when both sides are the very same instance of the same type.
///
/// Address equality alone is not enough: a struct and its first field share an address.
pub(crate) fn same_instance(left: &dyn Diffable, right: &dyn Diffable) -> bool {
    let left = left.as_any();
    let right = right.as_any();
    left.type_id() == right.type_id()
        && std::ptr::eq(
            left as *const dyn Any as *const (),
            right as *const dyn Any as *const (),
        )
}
