use crate::error::{ValidationError, ValidationResult};
use crate::node::{ContentNode, NodeKind};
use crate::schema::{allowed_at_root, allows_child};

/// Check a top-level content sequence against the nesting rules.
///
/// Ownership already rules out cycles and shared nodes; this checks the
/// remaining structural invariants and reports the first violation found in
/// document order.
pub fn validate_tree(content: &[ContentNode]) -> ValidationResult<()> {
    let mut path = Vec::new();
    for (index, node) in content.iter().enumerate() {
        path.push(index);
        if !allowed_at_root(node.kind()) {
            return Err(ValidationError::disallowed("document", node.kind().name(), &path));
        }
        validate_node(node, &mut path)?;
        path.pop();
    }
    Ok(())
}

fn validate_node(node: &ContentNode, path: &mut Vec<usize>) -> ValidationResult<()> {
    let kind = node.kind();

    if let ContentNode::Heading { level, .. } = node {
        if !(1..=6).contains(level) {
            return Err(ValidationError::InvalidHeadingLevel {
                level: *level,
                path: path.clone(),
            });
        }
    }

    let Some(children) = node.children() else {
        return Ok(());
    };

    if kind.is_text_bearing() && !children.iter().any(|c| c.kind() == NodeKind::TextRun) {
        return Err(ValidationError::missing_text(kind.name(), path));
    }
    if (kind.is_block_container() || kind.is_structural()) && children.is_empty() {
        return Err(ValidationError::empty(kind.name(), path));
    }

    for (index, child) in children.iter().enumerate() {
        path.push(index);
        if !allows_child(kind, child.kind()) {
            return Err(ValidationError::disallowed(kind.name(), child.kind().name(), path));
        }
        validate_node(child, path)?;
        path.pop();
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_document() {
        let content = vec![
            ContentNode::heading(1, "h1", "Title"),
            ContentNode::paragraph("Body"),
            ContentNode::table(2, 2),
            ContentNode::bulleted_list(vec![ContentNode::list_item(vec![ContentNode::paragraph("x")])]),
        ];
        assert!(validate_tree(&content).is_ok());
    }

    #[test]
    fn test_rejects_cell_outside_row() {
        let content = vec![ContentNode::Table {
            children: vec![ContentNode::TableCell {
                children: vec![ContentNode::empty_paragraph()],
            }],
        }];
        let err = validate_tree(&content).unwrap_err();
        assert!(matches!(err, ValidationError::DisallowedChild { .. }));
    }

    #[test]
    fn test_rejects_childless_paragraph() {
        let content = vec![ContentNode::Paragraph {
            style_id: None,
            children: vec![],
        }];
        assert_eq!(
            validate_tree(&content),
            Err(ValidationError::missing_text("paragraph", &[0]))
        );
    }

    #[test]
    fn test_rejects_bad_heading_level() {
        let content = vec![ContentNode::heading(7, "h", "Too deep")];
        assert!(matches!(
            validate_tree(&content),
            Err(ValidationError::InvalidHeadingLevel { level: 7, .. })
        ));
    }

    #[test]
    fn test_rejects_inline_at_root() {
        let content = vec![ContentNode::text("loose")];
        assert!(validate_tree(&content).is_err());
    }
}
