//! # Folio Model
//!
//! Typed content tree and persisted payload types for Folio documents.
//!
//! The content tree is a closed tagged union (`ContentNode`). Ownership is
//! strictly tree-shaped: every node is owned by exactly one parent vector,
//! so acyclicity and single-parenthood hold by construction. The remaining
//! structural rules (which node may contain which) live in [`schema`] and are
//! checked by [`validate_tree`].

pub mod document;
pub mod error;
pub mod id_generator;
pub mod node;
pub mod schema;
pub mod validate;

pub use document::*;
pub use error::{ValidationError, ValidationResult};
pub use id_generator::{get_document_id, IDGenerator};
pub use node::{ContentNode, Mark, NodeKind, TextRun};
pub use validate::validate_tree;

/// Path from the top-level content sequence down to a node.
pub type Path = Vec<usize>;
