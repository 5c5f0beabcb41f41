use serde::{Deserialize, Serialize};

/// A node of the document content tree
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case", rename_all_fields = "camelCase")]
pub enum ContentNode {
    Paragraph {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        style_id: Option<String>,
        children: Vec<ContentNode>,
    },

    /// Heading; `id` is the stable anchor used by cross-references
    Heading {
        level: u8,
        id: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        style_id: Option<String>,
        children: Vec<ContentNode>,
    },

    Table {
        children: Vec<ContentNode>,
    },

    TableRow {
        children: Vec<ContentNode>,
    },

    TableCell {
        children: Vec<ContentNode>,
    },

    Image {
        url: String,
        #[serde(default)]
        alt: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        caption: Option<String>,
    },

    /// Block anchoring a layout frame inside the text flow
    AnchoredFrame {
        frame_id: String,
        children: Vec<ContentNode>,
    },

    CrossReference {
        target_id: String,
        #[serde(default)]
        format: String,
    },

    Variable {
        name: String,
    },

    /// Index marker; `terms` go from primary to most specific
    IndexMarker {
        terms: Vec<String>,
    },

    /// Inline text shown only while its condition tag is visible
    ConditionalText {
        condition: String,
        children: Vec<ContentNode>,
    },

    BulletedList {
        children: Vec<ContentNode>,
    },

    NumberedList {
        #[serde(default = "default_list_start")]
        start: u32,
        children: Vec<ContentNode>,
    },

    ListItem {
        children: Vec<ContentNode>,
    },

    BlockQuote {
        children: Vec<ContentNode>,
    },

    CodeBlock {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        language: Option<String>,
        children: Vec<ContentNode>,
    },

    TextRun(TextRun),
}

fn default_list_start() -> u32 {
    1
}

/// Discriminant of [`ContentNode`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum NodeKind {
    Paragraph,
    Heading,
    Table,
    TableRow,
    TableCell,
    Image,
    AnchoredFrame,
    CrossReference,
    Variable,
    IndexMarker,
    ConditionalText,
    BulletedList,
    NumberedList,
    ListItem,
    BlockQuote,
    CodeBlock,
    TextRun,
}

impl NodeKind {
    pub fn name(self) -> &'static str {
        match self {
            NodeKind::Paragraph => "paragraph",
            NodeKind::Heading => "heading",
            NodeKind::Table => "table",
            NodeKind::TableRow => "table-row",
            NodeKind::TableCell => "table-cell",
            NodeKind::Image => "image",
            NodeKind::AnchoredFrame => "anchored-frame",
            NodeKind::CrossReference => "cross-reference",
            NodeKind::Variable => "variable",
            NodeKind::IndexMarker => "index-marker",
            NodeKind::ConditionalText => "conditional-text",
            NodeKind::BulletedList => "bulleted-list",
            NodeKind::NumberedList => "numbered-list",
            NodeKind::ListItem => "list-item",
            NodeKind::BlockQuote => "block-quote",
            NodeKind::CodeBlock => "code-block",
            NodeKind::TextRun => "text-run",
        }
    }
}

impl std::fmt::Display for NodeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Boolean text formatting attribute
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Mark {
    Bold,
    Italic,
    Underline,
    Strikethrough,
    Superscript,
    Subscript,
    Code,
}

/// Leaf run of text sharing one set of format attributes
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextRun {
    pub text: String,
    #[serde(default, skip_serializing_if = "is_false")]
    pub bold: bool,
    #[serde(default, skip_serializing_if = "is_false")]
    pub italic: bool,
    #[serde(default, skip_serializing_if = "is_false")]
    pub underline: bool,
    #[serde(default, skip_serializing_if = "is_false")]
    pub strikethrough: bool,
    #[serde(default, skip_serializing_if = "is_false")]
    pub superscript: bool,
    #[serde(default, skip_serializing_if = "is_false")]
    pub subscript: bool,
    #[serde(default, skip_serializing_if = "is_false")]
    pub code: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background_color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_size: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_family: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub character_style_id: Option<String>,
}

fn is_false(value: &bool) -> bool {
    !*value
}

impl TextRun {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Default::default()
        }
    }

    /// Same run attributes with different text
    pub fn with_text(&self, text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..self.clone()
        }
    }

    pub fn has_mark(&self, mark: Mark) -> bool {
        match mark {
            Mark::Bold => self.bold,
            Mark::Italic => self.italic,
            Mark::Underline => self.underline,
            Mark::Strikethrough => self.strikethrough,
            Mark::Superscript => self.superscript,
            Mark::Subscript => self.subscript,
            Mark::Code => self.code,
        }
    }

    /// Set a mark. Superscript and subscript exclude each other: the one
    /// applied last wins.
    pub fn set_mark(&mut self, mark: Mark, value: bool) {
        match mark {
            Mark::Bold => self.bold = value,
            Mark::Italic => self.italic = value,
            Mark::Underline => self.underline = value,
            Mark::Strikethrough => self.strikethrough = value,
            Mark::Superscript => {
                self.superscript = value;
                if value {
                    self.subscript = false;
                }
            }
            Mark::Subscript => {
                self.subscript = value;
                if value {
                    self.superscript = false;
                }
            }
            Mark::Code => self.code = value,
        }
    }

    /// True when both runs carry identical formatting
    pub fn same_format(&self, other: &TextRun) -> bool {
        self.with_text("") == other.with_text("")
    }

    pub fn char_len(&self) -> usize {
        self.text.chars().count()
    }

    /// Split at a character offset, returning the text before and after
    pub fn split_at(&self, offset: usize) -> (TextRun, TextRun) {
        let byte = char_to_byte(&self.text, offset);
        let (before, after) = self.text.split_at(byte);
        (self.with_text(before), self.with_text(after))
    }
}

/// Convert a character offset into a byte offset, clamped to the end
pub fn char_to_byte(text: &str, offset: usize) -> usize {
    text.char_indices()
        .nth(offset)
        .map(|(byte, _)| byte)
        .unwrap_or(text.len())
}

impl ContentNode {
    pub fn kind(&self) -> NodeKind {
        match self {
            ContentNode::Paragraph { .. } => NodeKind::Paragraph,
            ContentNode::Heading { .. } => NodeKind::Heading,
            ContentNode::Table { .. } => NodeKind::Table,
            ContentNode::TableRow { .. } => NodeKind::TableRow,
            ContentNode::TableCell { .. } => NodeKind::TableCell,
            ContentNode::Image { .. } => NodeKind::Image,
            ContentNode::AnchoredFrame { .. } => NodeKind::AnchoredFrame,
            ContentNode::CrossReference { .. } => NodeKind::CrossReference,
            ContentNode::Variable { .. } => NodeKind::Variable,
            ContentNode::IndexMarker { .. } => NodeKind::IndexMarker,
            ContentNode::ConditionalText { .. } => NodeKind::ConditionalText,
            ContentNode::BulletedList { .. } => NodeKind::BulletedList,
            ContentNode::NumberedList { .. } => NodeKind::NumberedList,
            ContentNode::ListItem { .. } => NodeKind::ListItem,
            ContentNode::BlockQuote { .. } => NodeKind::BlockQuote,
            ContentNode::CodeBlock { .. } => NodeKind::CodeBlock,
            ContentNode::TextRun(_) => NodeKind::TextRun,
        }
    }

    pub fn children(&self) -> Option<&[ContentNode]> {
        match self {
            ContentNode::Paragraph { children, .. }
            | ContentNode::Heading { children, .. }
            | ContentNode::Table { children }
            | ContentNode::TableRow { children }
            | ContentNode::TableCell { children }
            | ContentNode::AnchoredFrame { children, .. }
            | ContentNode::ConditionalText { children, .. }
            | ContentNode::BulletedList { children }
            | ContentNode::NumberedList { children, .. }
            | ContentNode::ListItem { children }
            | ContentNode::BlockQuote { children }
            | ContentNode::CodeBlock { children, .. } => Some(children),
            ContentNode::Image { .. }
            | ContentNode::CrossReference { .. }
            | ContentNode::Variable { .. }
            | ContentNode::IndexMarker { .. }
            | ContentNode::TextRun(_) => None,
        }
    }

    pub fn children_mut(&mut self) -> Option<&mut Vec<ContentNode>> {
        match self {
            ContentNode::Paragraph { children, .. }
            | ContentNode::Heading { children, .. }
            | ContentNode::Table { children }
            | ContentNode::TableRow { children }
            | ContentNode::TableCell { children }
            | ContentNode::AnchoredFrame { children, .. }
            | ContentNode::ConditionalText { children, .. }
            | ContentNode::BulletedList { children }
            | ContentNode::NumberedList { children, .. }
            | ContentNode::ListItem { children }
            | ContentNode::BlockQuote { children }
            | ContentNode::CodeBlock { children, .. } => Some(children),
            ContentNode::Image { .. }
            | ContentNode::CrossReference { .. }
            | ContentNode::Variable { .. }
            | ContentNode::IndexMarker { .. }
            | ContentNode::TextRun(_) => None,
        }
    }

    /// Copy of this node's own attributes around a different child list.
    /// Leaves are returned unchanged.
    pub fn with_children(&self, new_children: Vec<ContentNode>) -> ContentNode {
        let mut shell = match self {
            ContentNode::Paragraph { style_id, .. } => ContentNode::Paragraph {
                style_id: style_id.clone(),
                children: Vec::new(),
            },
            ContentNode::Heading {
                level, id, style_id, ..
            } => ContentNode::Heading {
                level: *level,
                id: id.clone(),
                style_id: style_id.clone(),
                children: Vec::new(),
            },
            ContentNode::AnchoredFrame { frame_id, .. } => ContentNode::AnchoredFrame {
                frame_id: frame_id.clone(),
                children: Vec::new(),
            },
            ContentNode::ConditionalText { condition, .. } => ContentNode::ConditionalText {
                condition: condition.clone(),
                children: Vec::new(),
            },
            ContentNode::NumberedList { start, .. } => ContentNode::NumberedList {
                start: *start,
                children: Vec::new(),
            },
            ContentNode::CodeBlock { language, .. } => ContentNode::CodeBlock {
                language: language.clone(),
                children: Vec::new(),
            },
            ContentNode::Table { .. } => ContentNode::Table { children: Vec::new() },
            ContentNode::TableRow { .. } => ContentNode::TableRow { children: Vec::new() },
            ContentNode::TableCell { .. } => ContentNode::TableCell { children: Vec::new() },
            ContentNode::BulletedList { .. } => ContentNode::BulletedList { children: Vec::new() },
            ContentNode::ListItem { .. } => ContentNode::ListItem { children: Vec::new() },
            ContentNode::BlockQuote { .. } => ContentNode::BlockQuote { children: Vec::new() },
            leaf => return leaf.clone(),
        };
        if let Some(children) = shell.children_mut() {
            *children = new_children;
        }
        shell
    }

    pub fn as_text_run(&self) -> Option<&TextRun> {
        match self {
            ContentNode::TextRun(run) => Some(run),
            _ => None,
        }
    }

    pub fn as_text_run_mut(&mut self) -> Option<&mut TextRun> {
        match self {
            ContentNode::TextRun(run) => Some(run),
            _ => None,
        }
    }

    /// Concatenated text of all descendant runs
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        collect_text(self, &mut out);
        out
    }

    // Constructors

    pub fn text(text: impl Into<String>) -> Self {
        ContentNode::TextRun(TextRun::new(text))
    }

    pub fn paragraph(text: impl Into<String>) -> Self {
        ContentNode::Paragraph {
            style_id: None,
            children: vec![ContentNode::text(text)],
        }
    }

    pub fn empty_paragraph() -> Self {
        Self::paragraph("")
    }

    pub fn heading(level: u8, id: impl Into<String>, text: impl Into<String>) -> Self {
        ContentNode::Heading {
            level,
            id: id.into(),
            style_id: None,
            children: vec![ContentNode::text(text)],
        }
    }

    pub fn code_block(language: Option<String>, text: impl Into<String>) -> Self {
        ContentNode::CodeBlock {
            language,
            children: vec![ContentNode::text(text)],
        }
    }

    /// Table skeleton: `rows × cols` cells, each holding one empty paragraph
    pub fn table(rows: usize, cols: usize) -> Self {
        let rows = (0..rows)
            .map(|_| ContentNode::TableRow {
                children: (0..cols)
                    .map(|_| ContentNode::TableCell {
                        children: vec![ContentNode::empty_paragraph()],
                    })
                    .collect(),
            })
            .collect();
        ContentNode::Table { children: rows }
    }

    pub fn list_item(children: Vec<ContentNode>) -> Self {
        ContentNode::ListItem { children }
    }

    pub fn bulleted_list(items: Vec<ContentNode>) -> Self {
        ContentNode::BulletedList { children: items }
    }

    pub fn numbered_list(items: Vec<ContentNode>) -> Self {
        ContentNode::NumberedList {
            start: 1,
            children: items,
        }
    }

    pub fn block_quote(children: Vec<ContentNode>) -> Self {
        ContentNode::BlockQuote { children }
    }

    pub fn image(url: impl Into<String>, alt: impl Into<String>) -> Self {
        ContentNode::Image {
            url: url.into(),
            alt: alt.into(),
            caption: None,
        }
    }

    pub fn variable(name: impl Into<String>) -> Self {
        ContentNode::Variable { name: name.into() }
    }

    pub fn cross_reference(target_id: impl Into<String>, format: impl Into<String>) -> Self {
        ContentNode::CrossReference {
            target_id: target_id.into(),
            format: format.into(),
        }
    }

    pub fn index_marker(terms: Vec<String>) -> Self {
        ContentNode::IndexMarker { terms }
    }

    pub fn conditional(condition: impl Into<String>, text: impl Into<String>) -> Self {
        ContentNode::ConditionalText {
            condition: condition.into(),
            children: vec![ContentNode::text(text)],
        }
    }
}

fn collect_text(node: &ContentNode, out: &mut String) {
    match node {
        ContentNode::TextRun(run) => out.push_str(&run.text),
        other => {
            for child in other.children().unwrap_or_default() {
                collect_text(child, out);
            }
        }
    }
}

/// Node at `path` below a top-level sequence
pub fn node_at<'a>(nodes: &'a [ContentNode], path: &[usize]) -> Option<&'a ContentNode> {
    let (first, rest) = path.split_first()?;
    let mut node = nodes.get(*first)?;
    for index in rest {
        node = node.children()?.get(*index)?;
    }
    Some(node)
}

pub fn node_at_mut<'a>(nodes: &'a mut [ContentNode], path: &[usize]) -> Option<&'a mut ContentNode> {
    let (first, rest) = path.split_first()?;
    let mut node = nodes.get_mut(*first)?;
    for index in rest {
        node = node.children_mut()?.get_mut(*index)?;
    }
    Some(node)
}

/// Child vector addressed by `parent`; the empty path is the top level
pub fn children_at_mut<'a>(
    nodes: &'a mut Vec<ContentNode>,
    parent: &[usize],
) -> Option<&'a mut Vec<ContentNode>> {
    if parent.is_empty() {
        return Some(nodes);
    }
    node_at_mut(nodes, parent)?.children_mut()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_skeleton_shape() {
        let table = ContentNode::table(3, 3);
        let rows = table.children().unwrap();
        assert_eq!(rows.len(), 3);

        let mut cells = 0;
        for row in rows {
            for cell in row.children().unwrap() {
                cells += 1;
                let inner = cell.children().unwrap();
                assert_eq!(inner.len(), 1);
                assert_eq!(inner[0].kind(), NodeKind::Paragraph);
                assert_eq!(inner[0].text_content(), "");
            }
        }
        assert_eq!(cells, 9);
    }

    #[test]
    fn test_superscript_clears_subscript() {
        let mut run = TextRun::new("x");
        run.set_mark(Mark::Subscript, true);
        run.set_mark(Mark::Superscript, true);
        assert!(run.superscript);
        assert!(!run.subscript);
    }

    #[test]
    fn test_split_at_char_offset() {
        let run = TextRun {
            bold: true,
            ..TextRun::new("héllo")
        };
        let (a, b) = run.split_at(2);
        assert_eq!(a.text, "hé");
        assert_eq!(b.text, "llo");
        assert!(a.bold && b.bold);
    }

    #[test]
    fn test_node_serialization_shape() {
        let node = ContentNode::heading(2, "h-1", "Intro");
        let json = serde_json::to_value(&node).unwrap();
        assert_eq!(json["type"], "heading");
        assert_eq!(json["level"], 2);
        assert_eq!(json["children"][0]["type"], "text-run");

        let back: ContentNode = serde_json::from_value(json).unwrap();
        assert_eq!(back, node);
    }

    #[test]
    fn test_node_at_paths() {
        let content = vec![
            ContentNode::paragraph("a"),
            ContentNode::bulleted_list(vec![ContentNode::list_item(vec![ContentNode::paragraph("b")])]),
        ];
        assert_eq!(node_at(&content, &[1, 0, 0, 0]).unwrap().as_text_run().unwrap().text, "b");
        assert!(node_at(&content, &[0, 0, 0]).is_none());
        assert!(node_at(&content, &[]).is_none());
    }
}
