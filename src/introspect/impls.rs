//! Diffable implementations for standard library and chrono types.

use std::any::{Any, TypeId};
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet, LinkedList, VecDeque};
use std::fmt::Display;
use std::hash::{BuildHasher, Hash};
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};
use std::rc::Rc;
use std::sync::Arc;
use std::time::{Duration, SystemTime};

use super::shape::{Diffable, Lineage, Shape};

macro_rules! terminal {
    (display: $($ty:ty),* $(,)?) => {
        $(
            impl Diffable for $ty {
                fn shape(&self) -> Shape<'_> {
                    Shape::Terminal(self)
                }

                fn as_any(&self) -> &dyn Any {
                    self
                }

                fn lineage(&self) -> Lineage {
                    Lineage::of::<$ty>()
                }

                fn describe(&self) -> String {
                    self.to_string()
                }
            }
        )*
    };
    (debug: $($ty:ty),* $(,)?) => {
        $(
            impl Diffable for $ty {
                fn shape(&self) -> Shape<'_> {
                    Shape::Terminal(self)
                }

                fn as_any(&self) -> &dyn Any {
                    self
                }

                fn lineage(&self) -> Lineage {
                    Lineage::of::<$ty>()
                }
            }
        )*
    };
}

terminal!(display:
    i8, i16, i32, i64, i128, isize,
    u8, u16, u32, u64, u128, usize,
    f32, f64, bool, char, String, &'static str,
);

terminal!(debug: Duration, SystemTime);

terminal!(display:
    chrono::NaiveDate,
    chrono::NaiveTime,
    chrono::NaiveDateTime,
    chrono::DateTime<chrono::Utc>,
    chrono::DateTime<chrono::FixedOffset>,
    chrono::DateTime<chrono::Local>,
);

/// Implements [`Diffable`] for types compared as opaque ordered values.
///
/// The type must implement `Ord`, `Display` and `Debug`. Two values differ when
/// `Ord::cmp` is not `Equal`.
#[macro_export]
macro_rules! impl_ordered {
    ($($ty:ty),* $(,)?) => {
        $(
            impl $crate::Diffable for $ty {
                fn shape(&self) -> $crate::Shape<'_> {
                    $crate::Shape::Ordered(self)
                }

                fn as_any(&self) -> &dyn ::std::any::Any {
                    self
                }

                fn lineage(&self) -> $crate::Lineage {
                    $crate::Lineage::of::<$ty>()
                }

                fn describe(&self) -> String {
                    self.to_string()
                }
            }
        )*
    };
}

crate::impl_ordered!(IpAddr, Ipv4Addr, Ipv6Addr);

fn items<'a, T: Diffable>(iter: impl Iterator<Item = &'a T>) -> Vec<&'a dyn Diffable> {
    iter.map(|item| item as &dyn Diffable).collect()
}

macro_rules! sequence {
    ($($ty:ident),*) => {
        $(
            impl<T: Diffable> Diffable for $ty<T> {
                fn shape(&self) -> Shape<'_> {
                    Shape::Sequence(items(self.iter()))
                }

                fn as_any(&self) -> &dyn Any {
                    self
                }

                fn lineage(&self) -> Lineage {
                    Lineage::of::<Self>()
                }
            }
        )*
    };
}

sequence!(Vec, VecDeque, LinkedList, BTreeSet);

/// Hash sets iterate in hasher order, so elements are listed sorted by their
/// natural string form and equal sets short-circuit through `unordered_eq`.
impl<T, S> Diffable for HashSet<T, S>
where
    T: Diffable + Eq + Hash,
    S: BuildHasher + 'static,
{
    fn shape(&self) -> Shape<'_> {
        let mut elements = items(self.iter());
        elements.sort_by_cached_key(|element| element.describe());
        Shape::Sequence(elements)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn lineage(&self) -> Lineage {
        Lineage::of::<Self>()
    }

    fn unordered_eq(&self, other: &dyn Any) -> Option<bool> {
        other.downcast_ref::<Self>().map(|other| self == other)
    }
}

impl<T: Diffable, const N: usize> Diffable for [T; N] {
    fn shape(&self) -> Shape<'_> {
        Shape::Array(items(self.iter()))
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn lineage(&self) -> Lineage {
        Lineage::of::<Self>()
    }
}

impl<K, V, S> Diffable for HashMap<K, V, S>
where
    K: Display + Eq + Hash + std::fmt::Debug + 'static,
    V: Diffable,
    S: BuildHasher + 'static,
{
    fn shape(&self) -> Shape<'_> {
        Shape::Map(
            self.iter()
                .map(|(k, v)| (k.to_string(), v as &dyn Diffable))
                .collect(),
        )
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn lineage(&self) -> Lineage {
        Lineage::of::<Self>()
    }
}

impl<K, V> Diffable for BTreeMap<K, V>
where
    K: Display + Ord + std::fmt::Debug + 'static,
    V: Diffable,
{
    fn shape(&self) -> Shape<'_> {
        Shape::Map(
            self.iter()
                .map(|(k, v)| (k.to_string(), v as &dyn Diffable))
                .collect(),
        )
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn lineage(&self) -> Lineage {
        Lineage::of::<Self>()
    }
}

impl<T: Diffable> Diffable for Option<T> {
    fn shape(&self) -> Shape<'_> {
        match self {
            Some(value) => value.shape(),
            None => Shape::Absent,
        }
    }

    fn as_any(&self) -> &dyn Any {
        match self {
            Some(value) => value.as_any(),
            None => self,
        }
    }

    fn lineage(&self) -> Lineage {
        match self {
            Some(value) => value.lineage(),
            None => Lineage::unknown(),
        }
    }

    fn view_as(&self, ty: TypeId) -> Option<&dyn Any> {
        self.as_ref().and_then(|value| value.view_as(ty))
    }

    fn describe(&self) -> String {
        match self {
            Some(value) => value.describe(),
            None => "None".to_string(),
        }
    }

    fn unordered_eq(&self, other: &dyn Any) -> Option<bool> {
        self.as_ref().and_then(|value| value.unordered_eq(other))
    }
}

macro_rules! transparent {
    ($($ptr:ident),*) => {
        $(
            impl<T: Diffable + ?Sized> Diffable for $ptr<T> {
                fn shape(&self) -> Shape<'_> {
                    (**self).shape()
                }

                fn as_any(&self) -> &dyn Any {
                    (**self).as_any()
                }

                fn lineage(&self) -> Lineage {
                    (**self).lineage()
                }

                fn view_as(&self, ty: TypeId) -> Option<&dyn Any> {
                    (**self).view_as(ty)
                }

                fn describe(&self) -> String {
                    (**self).describe()
                }

                fn unordered_eq(&self, other: &dyn Any) -> Option<bool> {
                    (**self).unordered_eq(other)
                }
            }
        )*
    };
}

transparent!(Box, Rc, Arc);

/// Stand-in for the missing side of a map or keyed-collection entry.
#[derive(Debug)]
pub(crate) struct Absent;

pub(crate) static ABSENT: Absent = Absent;

impl Diffable for Absent {
    fn shape(&self) -> Shape<'_> {
        Shape::Absent
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn lineage(&self) -> Lineage {
        Lineage::unknown()
    }
}
