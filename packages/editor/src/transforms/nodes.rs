//! Block-level structural edits: retyping, wrapping, inserting, splitting
//! and merging nodes.

use folio_model::node::{children_at_mut, node_at, node_at_mut};
use folio_model::{ContentNode, IDGenerator, NodeKind, Path};
use serde::{Deserialize, Serialize};

use super::location::{
    enclosing_text_block, find_ancestor, offset_in_block, parent_of, resolve_point,
    text_blocks_in, Location, Point,
};
use crate::mutations::MutationError;

/// Target type for [`set_node_type`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case", rename_all_fields = "camelCase")]
pub enum BlockFormat {
    Paragraph {
        #[serde(default)]
        style_id: Option<String>,
    },
    Heading {
        level: u8,
    },
    CodeBlock {
        #[serde(default)]
        language: Option<String>,
    },
}

/// Containers that [`wrap`] and [`unwrap`] manage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ContainerKind {
    BulletedList,
    NumberedList,
    BlockQuote,
}

impl ContainerKind {
    pub fn node_kind(self) -> NodeKind {
        match self {
            ContainerKind::BulletedList => NodeKind::BulletedList,
            ContainerKind::NumberedList => NodeKind::NumberedList,
            ContainerKind::BlockQuote => NodeKind::BlockQuote,
        }
    }

    fn is_list(self) -> bool {
        self != ContainerKind::BlockQuote
    }

    fn build(self, blocks: Vec<ContentNode>) -> ContentNode {
        match self {
            ContainerKind::BlockQuote => ContentNode::block_quote(blocks),
            list => {
                let items = blocks
                    .into_iter()
                    .map(|block| ContentNode::list_item(vec![block]))
                    .collect();
                if list == ContainerKind::BulletedList {
                    ContentNode::bulleted_list(items)
                } else {
                    ContentNode::numbered_list(items)
                }
            }
        }
    }
}

/// Retype every text block intersecting `at`, keeping its inline children
pub fn set_node_type(
    content: &mut Vec<ContentNode>,
    ids: &mut IDGenerator,
    at: &Location,
    format: &BlockFormat,
) -> Result<(), MutationError> {
    if let BlockFormat::Heading { level } = format {
        if !(1..=6).contains(level) {
            return Err(MutationError::InvalidStructure(format!(
                "heading level {level} is outside 1..=6"
            )));
        }
    }

    let (start, end) = at.span();
    for path in text_blocks_in(content, &start, &end) {
        let node = node_at_mut(content, &path).ok_or_else(|| MutationError::NodeNotFound(path.clone()))?;
        let existing_id = match &*node {
            ContentNode::Heading { id, .. } => Some(id.clone()),
            _ => None,
        };
        let children = node.children_mut().map(std::mem::take).unwrap_or_default();

        *node = match format {
            BlockFormat::Paragraph { style_id } => ContentNode::Paragraph {
                style_id: style_id.clone(),
                children,
            },
            BlockFormat::Heading { level } => ContentNode::Heading {
                level: *level,
                id: existing_id.unwrap_or_else(|| ids.new_id()),
                style_id: None,
                children,
            },
            BlockFormat::CodeBlock { language } => ContentNode::CodeBlock {
                language: language.clone(),
                children,
            },
        };
    }
    Ok(())
}

/// Siblings spanned by `at`: the parent path and the inclusive index range.
///
/// Climbs out of tables, rows and lists so the returned siblings are always
/// blocks.
fn spanned_siblings(content: &[ContentNode], at: &Location) -> Option<(Path, usize, usize)> {
    let (start, end) = at.span();
    let blocks = text_blocks_in(content, &start, &end);
    let first = blocks.first()?;
    let last = blocks.last()?;

    let common = first
        .iter()
        .zip(last.iter())
        .take_while(|(a, b)| a == b)
        .count()
        .min(first.len() - 1)
        .min(last.len() - 1);

    let mut parent = first[..common].to_vec();
    let mut from = first[common];
    let mut to = last[common];

    while let Some(node) = node_at(content, &parent) {
        if !node.kind().is_structural() {
            break;
        }
        let (grand, index) = parent_of(&parent)?;
        let grand = grand.to_vec();
        from = index;
        to = index;
        parent = grand;
    }
    Some((parent, from, to))
}

/// Move the blocks spanned by `at` into a new container
pub fn wrap(content: &mut Vec<ContentNode>, at: &Location, container: ContainerKind) -> Result<(), MutationError> {
    let Some((parent, from, to)) = spanned_siblings(content, at) else {
        return Ok(());
    };
    let siblings = children_at_mut(content, &parent).ok_or_else(|| MutationError::ParentNotFound(parent.clone()))?;
    let blocks: Vec<ContentNode> = siblings.drain(from..=to).collect();
    siblings.insert(from, container.build(blocks));
    Ok(())
}

/// Whether the start of `at` sits inside a container of the given kind
pub fn is_wrapped(content: &[ContentNode], at: &Location, container: ContainerKind) -> bool {
    let (start, _) = at.span();
    find_ancestor(content, &start, |kind| kind == container.node_kind()).is_some()
}

/// Remove one level of the nearest matching container around `at`.
///
/// Only the container's children intersecting `at` are lifted into the
/// grandparent; children before and after stay wrapped in copies of the
/// original container.
pub fn unwrap(content: &mut Vec<ContentNode>, at: &Location, container: ContainerKind) -> Result<(), MutationError> {
    let (start, end) = at.span();
    let Some(target) = find_ancestor(content, &start, |kind| kind == container.node_kind()) else {
        return Ok(());
    };

    let node = node_at(content, &target).ok_or_else(|| MutationError::NodeNotFound(target.clone()))?;
    let child_count = node.children().map(<[ContentNode]>::len).unwrap_or(0);

    let depth = target.len();
    let inner: Vec<usize> = text_blocks_in(content, &start, &end)
        .into_iter()
        .filter(|block| block.len() > depth && block.starts_with(&target))
        .map(|block| block[depth])
        .collect();
    let (from, to) = match (inner.iter().min(), inner.iter().max()) {
        (Some(from), Some(to)) => (*from, *to),
        _ => (0, child_count.saturating_sub(1)),
    };

    let (parent, index) = parent_of(&target).ok_or_else(|| MutationError::NodeNotFound(target.clone()))?;
    let parent = parent.to_vec();
    let siblings = children_at_mut(content, &parent).ok_or_else(|| MutationError::ParentNotFound(parent.clone()))?;
    let original = siblings.remove(index);
    let mut children = original.children().map(<[ContentNode]>::to_vec).unwrap_or_default();

    let after: Vec<ContentNode> = children.split_off((to + 1).min(children.len()));
    let middle: Vec<ContentNode> = children.split_off(from.min(children.len()));
    let before = children;

    let lifted: Vec<ContentNode> = if container.is_list() {
        middle
            .into_iter()
            .flat_map(|item| item.children().map(<[ContentNode]>::to_vec).unwrap_or_default())
            .collect()
    } else {
        middle
    };

    let mut replacement = Vec::new();
    if !before.is_empty() {
        replacement.push(original.with_children(before));
    }
    replacement.extend(lifted);
    if !after.is_empty() {
        replacement.push(original.with_children(after));
    }
    siblings.splice(index..index, replacement);
    Ok(())
}

/// Unwrap when already inside `container`, wrap otherwise
pub fn toggle_wrap(content: &mut Vec<ContentNode>, at: &Location, container: ContainerKind) -> Result<(), MutationError> {
    if is_wrapped(content, at, container) {
        unwrap(content, at, container)
    } else {
        wrap(content, at, container)
    }
}

/// Insert `node` at `at`.
///
/// Inline nodes split the text run under the caret. Block nodes go next to
/// the enclosing text block, splitting it when the caret is mid-block. A path
/// location inserts at exactly that index.
pub fn insert(
    content: &mut Vec<ContentNode>,
    ids: &mut IDGenerator,
    at: &Location,
    mut node: ContentNode,
) -> Result<(), MutationError> {
    if let ContentNode::Heading { id, .. } = &mut node {
        if id.is_empty() {
            *id = ids.new_id();
        }
    }

    let point = match at {
        Location::Path(path) => {
            let (parent, index) = parent_of(path).ok_or_else(|| MutationError::NodeNotFound(path.clone()))?;
            let siblings = children_at_mut(content, parent).ok_or_else(|| MutationError::ParentNotFound(parent.to_vec()))?;
            if index > siblings.len() {
                return Err(MutationError::NodeNotFound(path.clone()));
            }
            siblings.insert(index, node);
            return Ok(());
        }
        other => match other.start_point() {
            Some(point) => resolve_point(content, &point)?,
            None => return Ok(()),
        },
    };

    if node.kind().is_inline() {
        return insert_inline(content, &point, node);
    }

    let block = enclosing_text_block(content, &point.path).ok_or_else(|| MutationError::NotText(point.path.clone()))?;
    let block_len = node_at(content, &block).map(|b| b.text_content().chars().count()).unwrap_or(0);
    let offset = offset_in_block(content, &block, &point);
    let (parent, index) = parent_of(&block).ok_or_else(|| MutationError::NodeNotFound(block.clone()))?;
    let parent = parent.to_vec();

    let insert_at = if offset == 0 && block_len > 0 {
        index
    } else if offset >= block_len {
        index + 1
    } else {
        split_block(content, ids, &block, &point)?;
        index + 1
    };

    let siblings = children_at_mut(content, &parent).ok_or_else(|| MutationError::ParentNotFound(parent.clone()))?;
    siblings.insert(insert_at, node);
    Ok(())
}

fn insert_inline(content: &mut [ContentNode], point: &Point, node: ContentNode) -> Result<(), MutationError> {
    let (parent, index) = parent_of(&point.path).ok_or_else(|| MutationError::NodeNotFound(point.path.clone()))?;
    let parent_node = node_at_mut(content, parent).ok_or_else(|| MutationError::ParentNotFound(parent.to_vec()))?;
    let siblings = parent_node
        .children_mut()
        .ok_or_else(|| MutationError::ParentNotFound(parent.to_vec()))?;

    let run = siblings
        .get(index)
        .and_then(ContentNode::as_text_run)
        .ok_or_else(|| MutationError::NotText(point.path.clone()))?;
    let (before, after) = run.split_at(point.offset);

    let mut pieces = Vec::with_capacity(3);
    if !before.text.is_empty() {
        pieces.push(ContentNode::TextRun(before));
    }
    pieces.push(node);
    if !after.text.is_empty() {
        pieces.push(ContentNode::TextRun(after));
    }
    siblings.splice(index..=index, pieces);
    Ok(())
}

/// Split inline children at a path relative to their container
fn split_inline(
    children: Vec<ContentNode>,
    relative: &[usize],
    offset: usize,
) -> Result<(Vec<ContentNode>, Vec<ContentNode>), MutationError> {
    let (index, rest) = relative
        .split_first()
        .ok_or_else(|| MutationError::InvalidStructure("empty split path".to_string()))?;
    let mut left = children;
    if *index >= left.len() {
        return Err(MutationError::NodeNotFound(relative.to_vec()));
    }
    let mut right = left.split_off(*index + 1);
    let target = left.pop().ok_or_else(|| MutationError::NodeNotFound(relative.to_vec()))?;

    if rest.is_empty() {
        let run = target
            .as_text_run()
            .ok_or_else(|| MutationError::NotText(relative.to_vec()))?;
        let (before, after) = run.split_at(offset);
        left.push(ContentNode::TextRun(before));
        right.insert(0, ContentNode::TextRun(after));
    } else {
        let inner = target.children().map(<[ContentNode]>::to_vec).unwrap_or_default();
        let (inner_left, inner_right) = split_inline(inner, rest, offset)?;
        left.push(target.with_children(inner_left));
        right.insert(0, target.with_children(inner_right));
    }
    Ok((left, right))
}

/// Split the text block at `block` into two siblings at a run-addressed point
fn split_block(
    content: &mut Vec<ContentNode>,
    ids: &mut IDGenerator,
    block: &[usize],
    point: &Point,
) -> Result<(), MutationError> {
    let node = node_at(content, block).ok_or_else(|| MutationError::NodeNotFound(block.to_vec()))?;
    let children = node.children().map(<[ContentNode]>::to_vec).unwrap_or_default();
    let (left, right) = split_inline(children, &point.path[block.len()..], point.offset)?;

    let first = node.with_children(left);
    let mut second = node.with_children(right);
    if let ContentNode::Heading { id, .. } = &mut second {
        *id = ids.new_id();
    }

    let (parent, index) = parent_of(block).ok_or_else(|| MutationError::NodeNotFound(block.to_vec()))?;
    let siblings = children_at_mut(content, parent).ok_or_else(|| MutationError::ParentNotFound(parent.to_vec()))?;
    siblings.splice(index..=index, [first, second]);
    Ok(())
}

/// Split the text block under `point`; inside a list item the item splits too
pub fn split(content: &mut Vec<ContentNode>, ids: &mut IDGenerator, point: &Point) -> Result<(), MutationError> {
    let point = resolve_point(content, point)?;
    let block = enclosing_text_block(content, &point.path).ok_or_else(|| MutationError::NotText(point.path.clone()))?;
    split_block(content, ids, &block, &point)?;

    let (item_path, index_in_item) = parent_of(&block).ok_or_else(|| MutationError::NodeNotFound(block.clone()))?;
    let is_list_item = node_at(content, item_path)
        .map(|node| node.kind() == NodeKind::ListItem)
        .unwrap_or(false);
    if !is_list_item {
        return Ok(());
    }

    let item_path = item_path.to_vec();
    let (list_path, item_index) = parent_of(&item_path).ok_or_else(|| MutationError::NodeNotFound(item_path.clone()))?;
    let list_path = list_path.to_vec();
    let items = children_at_mut(content, &list_path).ok_or_else(|| MutationError::ParentNotFound(list_path.clone()))?;
    let item = items.remove(item_index);
    let mut head = item.children().map(<[ContentNode]>::to_vec).unwrap_or_default();
    let tail = head.split_off(index_in_item + 1);
    items.splice(item_index..item_index, [item.with_children(head), item.with_children(tail)]);
    Ok(())
}

/// Merge the node at `path` into its previous sibling
pub fn merge(content: &mut Vec<ContentNode>, path: &Path) -> Result<(), MutationError> {
    let (parent, index) = parent_of(path).ok_or_else(|| MutationError::NodeNotFound(path.clone()))?;
    if index == 0 {
        return Err(MutationError::InvalidStructure("nothing to merge into".to_string()));
    }
    let parent = parent.to_vec();
    let siblings = children_at_mut(content, &parent).ok_or_else(|| MutationError::ParentNotFound(parent.clone()))?;
    if index >= siblings.len() {
        return Err(MutationError::NodeNotFound(path.clone()));
    }

    let (prev_kind, kind) = (siblings[index - 1].kind(), siblings[index].kind());
    let compatible = (prev_kind.is_text_block() && kind.is_text_block())
        || (prev_kind == NodeKind::ListItem && kind == NodeKind::ListItem)
        || (prev_kind.is_list() && prev_kind == kind);
    if !compatible {
        return Err(MutationError::InvalidStructure(format!("cannot merge {kind} into {prev_kind}")));
    }

    let mut removed = siblings.remove(index);
    let moved = removed.children_mut().map(std::mem::take).unwrap_or_default();
    if let Some(target) = siblings[index - 1].children_mut() {
        target.extend(moved);
    }
    Ok(())
}

/// Remove the node at `path`
pub fn remove(content: &mut Vec<ContentNode>, path: &Path) -> Result<(), MutationError> {
    let (parent, index) = parent_of(path).ok_or_else(|| MutationError::NodeNotFound(path.clone()))?;
    let siblings = children_at_mut(content, parent).ok_or_else(|| MutationError::ParentNotFound(parent.to_vec()))?;
    if index >= siblings.len() {
        return Err(MutationError::NodeNotFound(path.clone()));
    }
    siblings.remove(index);
    Ok(())
}
