use folio_model::{ContentNode, TextRun};

/// Visitor pattern for traversing content trees immutably
///
/// Default implementations walk the whole tree in document order. Every
/// callback receives the node's path from the top-level sequence. Override
/// specific visit_* methods to act on the nodes you care about.
pub trait Visitor: Sized {
    fn visit_content(&mut self, nodes: &[ContentNode]) {
        walk_content(self, nodes);
    }

    fn visit_node(&mut self, node: &ContentNode, path: &[usize]) {
        walk_node(self, node, path);
    }

    fn visit_heading(&mut self, node: &ContentNode, path: &[usize]) {
        walk_children(self, node, path);
    }

    fn visit_text_block(&mut self, node: &ContentNode, path: &[usize]) {
        walk_children(self, node, path);
    }

    fn visit_conditional(&mut self, _condition: &str, node: &ContentNode, path: &[usize]) {
        walk_children(self, node, path);
    }

    fn visit_container(&mut self, node: &ContentNode, path: &[usize]) {
        walk_children(self, node, path);
    }

    fn visit_text_run(&mut self, _run: &TextRun, _path: &[usize]) {
        // Leaf node, no children to walk
    }

    fn visit_void(&mut self, _node: &ContentNode, _path: &[usize]) {
        // Leaf node, no children to walk
    }
}

// Default walk implementations for immutable visitor

pub fn walk_content<V: Visitor>(visitor: &mut V, nodes: &[ContentNode]) {
    for (index, node) in nodes.iter().enumerate() {
        visitor.visit_node(node, &[index]);
    }
}

pub fn walk_node<V: Visitor>(visitor: &mut V, node: &ContentNode, path: &[usize]) {
    match node {
        ContentNode::TextRun(run) => visitor.visit_text_run(run, path),
        ContentNode::Image { .. }
        | ContentNode::CrossReference { .. }
        | ContentNode::Variable { .. }
        | ContentNode::IndexMarker { .. } => visitor.visit_void(node, path),
        ContentNode::Heading { .. } => visitor.visit_heading(node, path),
        ContentNode::Paragraph { .. } | ContentNode::CodeBlock { .. } => {
            visitor.visit_text_block(node, path)
        }
        ContentNode::ConditionalText { condition, .. } => {
            visitor.visit_conditional(condition, node, path)
        }
        ContentNode::Table { .. }
        | ContentNode::TableRow { .. }
        | ContentNode::TableCell { .. }
        | ContentNode::AnchoredFrame { .. }
        | ContentNode::BulletedList { .. }
        | ContentNode::NumberedList { .. }
        | ContentNode::ListItem { .. }
        | ContentNode::BlockQuote { .. } => visitor.visit_container(node, path),
    }
}

pub fn walk_children<V: Visitor>(visitor: &mut V, node: &ContentNode, path: &[usize]) {
    let Some(children) = node.children() else {
        return;
    };
    let mut child_path = path.to_vec();
    child_path.push(0);
    for (index, child) in children.iter().enumerate() {
        if let Some(last) = child_path.last_mut() {
            *last = index;
        }
        visitor.visit_node(child, &child_path);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct RunPaths(Vec<Vec<usize>>);

    impl Visitor for RunPaths {
        fn visit_text_run(&mut self, _run: &TextRun, path: &[usize]) {
            self.0.push(path.to_vec());
        }
    }

    #[test]
    fn test_paths_in_document_order() {
        let content = vec![
            ContentNode::paragraph("a"),
            ContentNode::block_quote(vec![ContentNode::paragraph("b"), ContentNode::paragraph("c")]),
        ];
        let mut visitor = RunPaths(Vec::new());
        visitor.visit_content(&content);
        assert_eq!(visitor.0, vec![vec![0, 0], vec![1, 0, 0], vec![1, 1, 0]]);
    }
}
