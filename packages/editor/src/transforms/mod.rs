//! Structural edits over the content tree.
//!
//! The functions here mutate the tree they are handed and may leave it
//! half-edited on error. Callers go through [`atomically`] (as
//! [`Mutation::apply`](crate::mutations::Mutation::apply) does), which runs the
//! edit on a scratch copy, heals it with [`normalize`] and only commits a copy
//! that passes `validate_tree`.

pub mod location;
pub mod marks;
pub mod nodes;
pub mod normalize;
pub mod text;

use folio_model::{validate_tree, ContentNode};

use crate::mutations::MutationError;

pub use location::{Location, Point, Range};
pub use marks::{is_mark_active, set_format, toggle_mark, FormatPatch};
pub use nodes::{
    insert, is_wrapped, merge, remove, set_node_type, split, toggle_wrap, unwrap, wrap, BlockFormat,
    ContainerKind,
};
pub use normalize::normalize;
pub use text::replace_text;

/// Run `edit` against a copy of `content` and commit it only if the healed
/// result is valid.
pub fn atomically<F>(content: &mut Vec<ContentNode>, edit: F) -> Result<(), MutationError>
where
    F: FnOnce(&mut Vec<ContentNode>) -> Result<(), MutationError>,
{
    let mut scratch = content.clone();
    edit(&mut scratch)?;
    normalize(&mut scratch);
    validate_tree(&scratch)?;
    *content = scratch;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_failed_edit_leaves_content_untouched() {
        let mut content = vec![ContentNode::paragraph("keep")];
        let before = content.clone();

        let result = atomically(&mut content, |scratch| {
            scratch.push(ContentNode::text("stray"));
            Err(MutationError::InvalidStructure("abort".to_string()))
        });
        assert!(result.is_err());
        assert_eq!(content, before);
    }

    #[test]
    fn test_invalid_result_is_rejected() {
        let mut content = vec![ContentNode::paragraph("keep")];
        let result = atomically(&mut content, |scratch| {
            scratch.push(ContentNode::variable("inline-at-root"));
            Ok(())
        });
        assert!(matches!(result, Err(MutationError::Validation(_))));
        assert_eq!(content.len(), 1);
    }

    #[test]
    fn test_remove_last_item_heals_list() {
        let mut content = vec![ContentNode::bulleted_list(vec![ContentNode::list_item(vec![
            ContentNode::paragraph("only"),
        ])])];
        atomically(&mut content, |scratch| remove(scratch, &vec![0, 0])).unwrap();
        assert!(content.is_empty());
    }
}
