//! Heading outline derived from the content tree.

use folio_common::{walk_children, Visitor};
use folio_model::ContentNode;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutlineEntry {
    pub id: String,
    pub title: String,
    pub level: u8,
    pub children: Vec<OutlineEntry>,
}

impl OutlineEntry {
    /// Number of entries in this subtree, self included
    pub fn entry_count(&self) -> usize {
        1 + self.children.iter().map(OutlineEntry::entry_count).sum::<usize>()
    }
}

#[derive(Default)]
struct HeadingCollector {
    headings: Vec<(u8, String, String)>,
}

impl Visitor for HeadingCollector {
    fn visit_heading(&mut self, node: &ContentNode, path: &[usize]) {
        if let ContentNode::Heading { level, id, .. } = node {
            self.headings.push((*level, id.clone(), node.text_content()));
        }
        walk_children(self, node, path);
    }
}

/// `(level, id, title)` for every heading in document order
pub fn headings(content: &[ContentNode]) -> Vec<(u8, String, String)> {
    let mut collector = HeadingCollector::default();
    collector.visit_content(content);
    collector.headings
}

/// Build the outline tree.
///
/// A heading closes every open entry at its level or deeper and attaches to
/// the nearest remaining one; skipped levels flatten onto that ancestor.
pub fn build_outline(content: &[ContentNode]) -> Vec<OutlineEntry> {
    let mut roots: Vec<OutlineEntry> = Vec::new();
    // Open entries, outermost first
    let mut stack: Vec<OutlineEntry> = Vec::new();

    for (level, id, title) in headings(content) {
        while stack.last().map(|open| open.level >= level).unwrap_or(false) {
            close_top(&mut stack, &mut roots);
        }
        stack.push(OutlineEntry {
            id,
            title,
            level,
            children: Vec::new(),
        });
    }
    while !stack.is_empty() {
        close_top(&mut stack, &mut roots);
    }
    roots
}

fn close_top(stack: &mut Vec<OutlineEntry>, roots: &mut Vec<OutlineEntry>) {
    if let Some(entry) = stack.pop() {
        match stack.last_mut() {
            Some(parent) => parent.children.push(entry),
            None => roots.push(entry),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn shape(entries: &[OutlineEntry]) -> Vec<(String, Vec<String>)> {
        entries
            .iter()
            .map(|e| (e.title.clone(), e.children.iter().map(|c| c.title.clone()).collect()))
            .collect()
    }

    #[test]
    fn test_nested_outline() {
        let content = vec![
            ContentNode::heading(1, "a", "A"),
            ContentNode::paragraph("body"),
            ContentNode::heading(2, "b", "B"),
            ContentNode::heading(2, "c", "C"),
        ];
        let outline = build_outline(&content);
        assert_eq!(shape(&outline), vec![("A".to_string(), vec!["B".to_string(), "C".to_string()])]);
    }

    #[test]
    fn test_level_jump_flattens() {
        let content = vec![
            ContentNode::heading(1, "a", "A"),
            ContentNode::heading(3, "b", "B"),
            ContentNode::heading(2, "c", "C"),
            ContentNode::heading(1, "d", "D"),
        ];
        let outline = build_outline(&content);
        assert_eq!(outline.len(), 2);
        assert_eq!(
            shape(&outline)[0],
            ("A".to_string(), vec!["B".to_string(), "C".to_string()])
        );
        assert_eq!(outline[0].entry_count(), 3);
    }

    #[test]
    fn test_headings_inside_quotes_are_found() {
        let content = vec![ContentNode::block_quote(vec![ContentNode::heading(2, "q", "Quoted")])];
        let outline = build_outline(&content);
        assert_eq!(outline[0].id, "q");
        assert_eq!(outline[0].level, 2);
    }
}
