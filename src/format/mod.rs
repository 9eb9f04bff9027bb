//! Format module - Human-readable rendering of comparison results.

mod formatter;

pub use formatter::*;
