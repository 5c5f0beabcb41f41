//! Nesting rules for the content tree.

use crate::node::NodeKind;

impl NodeKind {
    /// May appear in a block context (top level, cells, list items, quotes)
    pub fn is_block(self) -> bool {
        matches!(
            self,
            NodeKind::Paragraph
                | NodeKind::Heading
                | NodeKind::Table
                | NodeKind::BulletedList
                | NodeKind::NumberedList
                | NodeKind::BlockQuote
                | NodeKind::CodeBlock
                | NodeKind::AnchoredFrame
                | NodeKind::Image
        )
    }

    /// May appear inside a text-bearing container
    pub fn is_inline(self) -> bool {
        matches!(
            self,
            NodeKind::TextRun
                | NodeKind::CrossReference
                | NodeKind::Variable
                | NodeKind::IndexMarker
                | NodeKind::ConditionalText
        )
    }

    /// Blocks whose children are inline content
    pub fn is_text_block(self) -> bool {
        matches!(self, NodeKind::Paragraph | NodeKind::Heading | NodeKind::CodeBlock)
    }

    /// Containers that must always hold at least one text run
    pub fn is_text_bearing(self) -> bool {
        self.is_text_block() || self == NodeKind::ConditionalText
    }

    /// Containers of blocks that must never be empty
    pub fn is_block_container(self) -> bool {
        matches!(
            self,
            NodeKind::TableCell | NodeKind::ListItem | NodeKind::BlockQuote | NodeKind::AnchoredFrame
        )
    }

    /// Containers with a single allowed child kind
    pub fn is_structural(self) -> bool {
        matches!(
            self,
            NodeKind::Table | NodeKind::TableRow | NodeKind::BulletedList | NodeKind::NumberedList
        )
    }

    pub fn is_list(self) -> bool {
        matches!(self, NodeKind::BulletedList | NodeKind::NumberedList)
    }

    /// Atomic leaves carrying payload instead of editable text
    pub fn is_void(self) -> bool {
        matches!(
            self,
            NodeKind::Image | NodeKind::CrossReference | NodeKind::Variable | NodeKind::IndexMarker
        )
    }
}

/// Whether `child` may be a direct child of `parent`
pub fn allows_child(parent: NodeKind, child: NodeKind) -> bool {
    match parent {
        NodeKind::Table => child == NodeKind::TableRow,
        NodeKind::TableRow => child == NodeKind::TableCell,
        NodeKind::BulletedList | NodeKind::NumberedList => child == NodeKind::ListItem,
        p if p.is_text_bearing() => child.is_inline(),
        p if p.is_block_container() => child.is_block(),
        _ => false,
    }
}

/// Whether `kind` may sit in the top-level content sequence
pub fn allowed_at_root(kind: NodeKind) -> bool {
    kind.is_block()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::ContentNode;

    #[test]
    fn test_table_nesting_is_strict() {
        assert!(allows_child(NodeKind::Table, NodeKind::TableRow));
        assert!(!allows_child(NodeKind::Table, NodeKind::TableCell));
        assert!(allows_child(NodeKind::TableRow, NodeKind::TableCell));
        assert!(!allows_child(NodeKind::TableRow, NodeKind::Paragraph));
        assert!(!allows_child(NodeKind::BlockQuote, NodeKind::TableCell));
        assert!(!allowed_at_root(NodeKind::TableRow));
    }

    #[test]
    fn test_inline_rules() {
        assert!(allows_child(NodeKind::Paragraph, NodeKind::Variable));
        assert!(allows_child(NodeKind::ConditionalText, NodeKind::TextRun));
        assert!(!allows_child(NodeKind::Paragraph, NodeKind::Paragraph));
        assert!(!allows_child(NodeKind::Variable, NodeKind::TextRun));
        assert!(!allows_child(NodeKind::TextRun, NodeKind::TextRun));
    }

    #[test]
    fn test_void_kinds() {
        assert!(NodeKind::Variable.is_void());
        assert!(NodeKind::Image.is_void());
        assert!(!NodeKind::ConditionalText.is_void());
        assert!(!ContentNode::code_block(Some("rust".into()), "fn main() {}").kind().is_void());
    }
}
