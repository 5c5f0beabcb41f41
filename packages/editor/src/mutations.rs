//! # Content Mutations
//!
//! Serializable, intent-preserving edits on the content tree.
//!
//! ## Design Principles
//!
//! 1. **Intent-preserving**: each mutation names one editing operation, so a
//!    sequence of them can be recorded, replayed or transmitted
//! 2. **Validated**: cheap argument checks run before the edit starts
//! 3. **Atomic**: the edit runs on a scratch copy that is normalized and
//!    validated before it replaces the live tree
//!
//! ## Mutation Semantics
//!
//! ### Wrap / Unwrap
//! - Wrapping moves the spanned sibling blocks into one new container
//! - Unwrapping lifts only the children intersecting the location; the rest
//!   stay in copies of the original container
//!
//! ### ToggleMark
//! - A mark counts as active only when every touched run carries it
//! - Mixed selections toggle on
//!
//! ### Remove
//! - Removes the node and all descendants
//! - Containers left empty are healed or dropped by normalization

use folio_model::{ContentNode, IDGenerator, Mark, Path, ValidationError};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::transforms::{self, BlockFormat, ContainerKind, FormatPatch, Location, Point, Range};

/// Semantic edits on a document's content
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "op", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum Mutation {
    /// Convert every text block in `at` to another block type
    SetNodeType { at: Location, format: BlockFormat },

    /// Move the spanned blocks into a new container
    Wrap { at: Location, container: ContainerKind },

    /// Lift the spanned blocks out of the nearest matching container
    Unwrap { at: Location, container: ContainerKind },

    ToggleWrap { at: Location, container: ContainerKind },

    /// Insert a node; inline nodes split the run under the caret
    Insert { at: Location, node: ContentNode },

    /// Insert a `rows × cols` table of empty cells
    InsertTable { at: Location, rows: usize, cols: usize },

    /// Split the text block (and list item) under the caret
    Split { at: Point },

    /// Merge a node into its previous sibling
    Merge { path: Path },

    /// Remove a node and its descendants
    Remove { path: Path },

    ToggleMark { range: Range, mark: Mark },

    /// Overwrite scalar run attributes over a range
    SetFormat { range: Range, patch: FormatPatch },

    /// Replace `length` characters at `offset` in one text run
    ReplaceText {
        path: Path,
        offset: usize,
        length: usize,
        text: String,
    },

    /// Type text at a caret
    InsertText { at: Point, text: String },
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum MutationError {
    #[error("Node not found: {0:?}")]
    NodeNotFound(Path),

    #[error("Parent not found: {0:?}")]
    ParentNotFound(Path),

    #[error("Invalid structure: {0}")]
    InvalidStructure(String),

    #[error("Node is not text: {0:?}")]
    NotText(Path),

    #[error("Offset {offset} is out of bounds at {path:?}")]
    OutOfBounds { path: Path, offset: usize },

    #[error("Edit would leave an invalid tree: {0}")]
    Validation(#[from] ValidationError),
}

/// Result of applying a mutation to a document
#[derive(Debug, Clone, PartialEq)]
pub struct MutationResult {
    /// Document version after the edit
    pub version: u64,
}

impl Mutation {
    /// Apply the mutation to `content` as one atomic edit
    pub fn apply(&self, content: &mut Vec<ContentNode>, ids: &mut IDGenerator) -> Result<(), MutationError> {
        // Validate first
        self.validate()?;

        transforms::atomically(content, |scratch| self.apply_unchecked(scratch, ids))
    }

    /// Dispatch without the scratch copy; used for batches already running
    /// inside [`transforms::atomically`]
    pub(crate) fn apply_unchecked(
        &self,
        content: &mut Vec<ContentNode>,
        ids: &mut IDGenerator,
    ) -> Result<(), MutationError> {
        match self {
            Mutation::SetNodeType { at, format } => transforms::set_node_type(content, ids, at, format),
            Mutation::Wrap { at, container } => transforms::wrap(content, at, *container),
            Mutation::Unwrap { at, container } => transforms::unwrap(content, at, *container),
            Mutation::ToggleWrap { at, container } => transforms::toggle_wrap(content, at, *container),
            Mutation::Insert { at, node } => transforms::insert(content, ids, at, node.clone()),
            Mutation::InsertTable { at, rows, cols } => {
                transforms::insert(content, ids, at, ContentNode::table(*rows, *cols))
            }
            Mutation::Split { at } => transforms::split(content, ids, at),
            Mutation::Merge { path } => transforms::merge(content, path),
            Mutation::Remove { path } => transforms::remove(content, path),
            Mutation::ToggleMark { range, mark } => transforms::toggle_mark(content, range, *mark),
            Mutation::SetFormat { range, patch } => transforms::set_format(content, range, patch),
            Mutation::ReplaceText {
                path,
                offset,
                length,
                text,
            } => transforms::replace_text(content, path, *offset, *length, text),
            Mutation::InsertText { at, text } => {
                let point = transforms::location::resolve_point(content, at)?;
                transforms::replace_text(content, &point.path, point.offset, 0, text)
            }
        }
    }

    /// Argument checks that need no tree access
    pub fn validate(&self) -> Result<(), MutationError> {
        match self {
            Mutation::SetNodeType {
                format: BlockFormat::Heading { level },
                ..
            } if !(1..=6).contains(level) => Err(MutationError::InvalidStructure(format!(
                "heading level {level} is outside 1..=6"
            ))),

            Mutation::InsertTable { rows, cols, .. } if *rows == 0 || *cols == 0 => Err(
                MutationError::InvalidStructure("a table needs at least one row and one column".to_string()),
            ),

            Mutation::Insert { node, .. } if node.kind() == folio_model::NodeKind::ListItem => Err(
                MutationError::InvalidStructure("list items are inserted through wrap or split".to_string()),
            ),

            Mutation::Merge { path } | Mutation::Remove { path } if path.is_empty() => {
                Err(MutationError::NodeNotFound(path.clone()))
            }

            _ => Ok(()),
        }
    }

    /// Short operation name for logs
    pub fn name(&self) -> &'static str {
        match self {
            Mutation::SetNodeType { .. } => "setNodeType",
            Mutation::Wrap { .. } => "wrap",
            Mutation::Unwrap { .. } => "unwrap",
            Mutation::ToggleWrap { .. } => "toggleWrap",
            Mutation::Insert { .. } => "insert",
            Mutation::InsertTable { .. } => "insertTable",
            Mutation::Split { .. } => "split",
            Mutation::Merge { .. } => "merge",
            Mutation::Remove { .. } => "remove",
            Mutation::ToggleMark { .. } => "toggleMark",
            Mutation::SetFormat { .. } => "setFormat",
            Mutation::ReplaceText { .. } => "replaceText",
            Mutation::InsertText { .. } => "insertText",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids() -> IDGenerator {
        IDGenerator::new("mutations")
    }

    #[test]
    fn test_insert_table_rejects_zero_rows() {
        let mut content = vec![ContentNode::paragraph("x")];
        let mutation = Mutation::InsertTable {
            at: Location::Path(vec![1]),
            rows: 0,
            cols: 3,
        };
        assert!(mutation.apply(&mut content, &mut ids()).is_err());
        assert_eq!(content.len(), 1);
    }

    #[test]
    fn test_insert_text_at_block_point() {
        let mut content = vec![ContentNode::paragraph("Hello")];
        let mutation = Mutation::InsertText {
            at: Point::new(vec![0], 5),
            text: ", world".to_string(),
        };
        mutation.apply(&mut content, &mut ids()).unwrap();
        assert_eq!(content[0].text_content(), "Hello, world");
    }

    #[test]
    fn test_invalid_path_leaves_tree_untouched() {
        let mut content = vec![ContentNode::paragraph("a"), ContentNode::paragraph("b")];
        let before = content.clone();
        let mutation = Mutation::Merge { path: vec![7] };
        assert!(matches!(
            mutation.apply(&mut content, &mut ids()),
            Err(MutationError::NodeNotFound(_))
        ));
        assert_eq!(content, before);
    }

    #[test]
    fn test_serialized_form() {
        let mutation = Mutation::ToggleMark {
            range: Range::within(vec![0, 0], 0, 2),
            mark: Mark::Bold,
        };
        let json = serde_json::to_value(&mutation).unwrap();
        assert_eq!(json["op"], "toggleMark");
        assert_eq!(json["mark"], "bold");

        let parsed: Mutation = serde_json::from_value(json).unwrap();
        assert_eq!(parsed, mutation);
    }
}
