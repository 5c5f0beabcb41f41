//! Self-healing pass run after every structural edit.

use folio_model::{ContentNode, NodeKind};

/// Restore the container invariants after an edit:
///
/// - adjacent text runs with identical formatting are merged, and empty runs
///   dropped while another run remains
/// - text-bearing containers without a text run get an empty one
/// - empty cells, list items, quotes and anchored frames get an empty paragraph
/// - tables, rows and lists left without children are removed
pub fn normalize(content: &mut Vec<ContentNode>) {
    for node in content.iter_mut() {
        normalize_node(node);
    }
    content.retain(|node| !is_degenerate(node));
}

fn normalize_node(node: &mut ContentNode) {
    let kind = node.kind();
    let Some(children) = node.children_mut() else {
        return;
    };

    for child in children.iter_mut() {
        normalize_node(child);
    }
    children.retain(|child| !is_degenerate(child));
    if kind.is_text_bearing() {
        coalesce_runs(children);
    }

    if kind.is_text_bearing() && !children.iter().any(|c| c.kind() == NodeKind::TextRun) {
        children.push(ContentNode::text(""));
    } else if kind.is_block_container() && children.is_empty() {
        children.push(ContentNode::empty_paragraph());
    }
}

fn coalesce_runs(children: &mut Vec<ContentNode>) {
    let mut merged: Vec<ContentNode> = Vec::with_capacity(children.len());
    for child in children.drain(..) {
        if let (Some(ContentNode::TextRun(prev)), ContentNode::TextRun(run)) = (merged.last_mut(), &child) {
            if prev.same_format(run) || prev.text.is_empty() {
                if prev.text.is_empty() {
                    *prev = run.clone();
                } else {
                    prev.text.push_str(&run.text);
                }
                continue;
            }
            if run.text.is_empty() {
                continue;
            }
        }
        merged.push(child);
    }
    *children = merged;
}

fn is_degenerate(node: &ContentNode) -> bool {
    node.kind().is_structural() && node.children().map(|c| c.is_empty()).unwrap_or(false)
}
