//! Character-level edits inside a single text run.

use folio_model::node::node_at_mut;
use folio_model::{ContentNode, Path};

use crate::mutations::MutationError;

/// Replace `length` characters at `offset` in the run at `path`
pub fn replace_text(
    content: &mut [ContentNode],
    path: &Path,
    offset: usize,
    length: usize,
    text: &str,
) -> Result<(), MutationError> {
    let run = node_at_mut(content, path)
        .ok_or_else(|| MutationError::NodeNotFound(path.clone()))?
        .as_text_run_mut()
        .ok_or_else(|| MutationError::NotText(path.clone()))?;

    let len = run.char_len();
    if offset > len || offset + length > len {
        return Err(MutationError::OutOfBounds {
            path: path.clone(),
            offset: offset + length,
        });
    }

    let mut next: String = run.text.chars().take(offset).collect();
    next.push_str(text);
    next.extend(run.text.chars().skip(offset + length));
    run.text = next;
    Ok(())
}
