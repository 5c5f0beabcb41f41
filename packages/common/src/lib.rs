//! Tree traversal and text statistics shared by the Folio crates.

pub mod stats;
pub mod visitor;

pub use stats::*;
pub use visitor::*;
