//! Diff module - Path-addressed structural comparison.
//!
//! [`ObjectDiff`] walks two values in parallel and records a [`Difference`] for
//! every localized mismatch in a [`ComparisonResult`]. Sequences can be aligned
//! by a per-type key instead of by position.

mod alignment;
mod difference;
mod engine;
mod error;
mod ignore;
mod path;
mod result;


pub use alignment::*;
pub use difference::*;
pub use engine::*;
pub use error::{AlignmentFault, DiffError};
pub use ignore::*;
pub use path::*;
pub use result::*;
