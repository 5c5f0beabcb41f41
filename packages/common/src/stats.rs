//! Text statistics over a content tree.

use std::collections::HashSet;

use folio_model::{ContentNode, TextRun};

use crate::visitor::{walk_children, Visitor};

/// Collects the plain text of a tree, one line per text block.
///
/// Conditional text whose condition is listed in `hidden` is skipped.
#[derive(Debug, Default)]
pub struct PlainText {
    hidden: HashSet<String>,
    out: String,
}

impl PlainText {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn hiding(hidden: impl IntoIterator<Item = String>) -> Self {
        Self {
            hidden: hidden.into_iter().collect(),
            out: String::new(),
        }
    }

    pub fn finish(self) -> String {
        self.out
    }

    fn end_block(&mut self) {
        if !self.out.is_empty() && !self.out.ends_with('\n') {
            self.out.push('\n');
        }
    }
}

impl Visitor for PlainText {
    fn visit_heading(&mut self, node: &ContentNode, path: &[usize]) {
        walk_children(self, node, path);
        self.end_block();
    }

    fn visit_text_block(&mut self, node: &ContentNode, path: &[usize]) {
        walk_children(self, node, path);
        self.end_block();
    }

    fn visit_conditional(&mut self, condition: &str, node: &ContentNode, path: &[usize]) {
        if !self.hidden.contains(condition) {
            walk_children(self, node, path);
        }
    }

    fn visit_text_run(&mut self, run: &TextRun, _path: &[usize]) {
        self.out.push_str(&run.text);
    }
}

/// Plain text of a whole tree
pub fn plain_text(content: &[ContentNode]) -> String {
    let mut visitor = PlainText::new();
    visitor.visit_content(content);
    visitor.finish()
}

/// Word, character and block counts
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TextStats {
    pub words: usize,
    pub characters: usize,
    pub blocks: usize,
}

impl TextStats {
    pub fn of(content: &[ContentNode]) -> Self {
        let text = plain_text(content);
        Self {
            words: text.split_whitespace().count(),
            characters: text.chars().filter(|c| *c != '\n').count(),
            blocks: text.lines().count(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_word_count_spans_runs() {
        let content = vec![
            ContentNode::Paragraph {
                style_id: None,
                children: vec![
                    ContentNode::text("Fol"),
                    ContentNode::TextRun(TextRun {
                        bold: true,
                        ..TextRun::new("io is")
                    }),
                    ContentNode::text(" fast"),
                ],
            },
            ContentNode::heading(1, "h", "Next part"),
        ];
        let stats = TextStats::of(&content);
        assert_eq!(stats.words, 5);
        assert_eq!(stats.blocks, 2);
        assert_eq!(plain_text(&content), "Folio is fast\nNext part\n");
    }

    #[test]
    fn test_hidden_condition_is_skipped() {
        let content = vec![ContentNode::Paragraph {
            style_id: None,
            children: vec![
                ContentNode::text("Ship"),
                ContentNode::conditional("Draft", " soon"),
            ],
        }];
        let mut visitor = PlainText::hiding(vec!["Draft".to_string()]);
        visitor.visit_content(&content);
        assert_eq!(visitor.finish(), "Ship\n");
    }
}
