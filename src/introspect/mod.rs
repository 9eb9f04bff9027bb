//! Introspect module - Classifies values and enumerates record fields.
//!
//! Every comparable value implements [`Diffable`], which reports a [`Shape`]
//! (absent, map, sequence, array, terminal, ordered or record) and a
//! [`Lineage`] used to resolve per-type functions in a [`TypeRegistry`].

mod impls;
mod record;
mod registry;
mod shape;

pub(crate) use impls::ABSENT;
pub(crate) use shape::same_instance;

pub use record::*;
pub use registry::*;
pub use shape::{Diffable, Lineage, Ordered, Shape, Terminal, TypeKey};
