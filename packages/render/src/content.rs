//! Turns runs and document trees into a flat stream of styled words.
//!
//! A word is the unit of line breaking. Text with no whitespace between two
//! differently formatted runs stays one word made of several pieces.

use std::collections::HashSet;

use folio_common::{walk_children, Visitor};
use folio_editor::Document;
use folio_model::{CharacterStyle, ContentNode, ParagraphStyle, TextRun};

use crate::measure::{FontSpec, DEFAULT_FONT_FAMILY};

const DEFAULT_COLOR: &str = "#000000";
const MONOSPACE_FAMILY: &str = "Courier";

/// Identically styled slice of a word
#[derive(Debug, Clone, PartialEq)]
pub struct Piece {
    pub text: String,
    pub font: FontSpec,
    pub color: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Word {
    pub pieces: Vec<Piece>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum FlowItem {
    Word(Word),
    /// End of a block or hard line break; `size` sizes an empty line
    Break { size: f64 },
}

/// Base style of the enclosing block
#[derive(Debug, Clone)]
struct BlockStyle {
    font: FontSpec,
    color: String,
}

impl Default for BlockStyle {
    fn default() -> Self {
        Self {
            font: FontSpec::default(),
            color: DEFAULT_COLOR.to_string(),
        }
    }
}

impl From<ParagraphStyle> for BlockStyle {
    fn from(style: ParagraphStyle) -> Self {
        Self {
            font: FontSpec {
                family: style.font_family,
                size: f64::from(style.font_size),
                bold: style.bold,
                italic: style.italic,
            },
            color: style.color,
        }
    }
}

/// Accumulates flow items, gluing pieces that touch without whitespace
#[derive(Debug, Default)]
struct FlowBuilder {
    items: Vec<FlowItem>,
    glue: bool,
}

impl FlowBuilder {
    fn push_text(&mut self, text: &str, font: &FontSpec, color: &str) {
        for (i, line) in text.split('\n').enumerate() {
            if i > 0 {
                self.push_break(font.size);
            }
            let leading_space = line.starts_with(char::is_whitespace);
            for (j, word) in line.split_whitespace().enumerate() {
                let piece = Piece {
                    text: word.to_string(),
                    font: font.clone(),
                    color: color.to_string(),
                };
                if j == 0 && self.glue && !leading_space {
                    if let Some(FlowItem::Word(last)) = self.items.last_mut() {
                        last.pieces.push(piece);
                        continue;
                    }
                }
                self.items.push(FlowItem::Word(Word { pieces: vec![piece] }));
            }
            if line.chars().any(|c| !c.is_whitespace()) {
                self.glue = !line.ends_with(char::is_whitespace);
            } else if !line.is_empty() {
                self.glue = false;
            }
        }
    }

    fn push_break(&mut self, size: f64) {
        self.items.push(FlowItem::Break { size });
        self.glue = false;
    }
}

fn run_font(base: &BlockStyle, style: Option<&CharacterStyle>, run: &TextRun) -> (FontSpec, String) {
    let mut font = base.font.clone();
    let mut color = base.color.clone();
    if let Some(style) = style {
        if let Some(family) = &style.font_family {
            font.family = family.clone();
        }
        if let Some(size) = style.font_size {
            font.size = f64::from(size);
        }
        font.bold = style.bold.unwrap_or(font.bold);
        font.italic = style.italic.unwrap_or(font.italic);
        if let Some(c) = &style.color {
            color = c.clone();
        }
    }
    if let Some(family) = &run.font_family {
        font.family = family.clone();
    }
    if let Some(size) = run.font_size {
        font.size = f64::from(size);
    }
    if run.code {
        font.family = MONOSPACE_FAMILY.to_string();
    }
    font.bold |= run.bold;
    font.italic |= run.italic;
    if let Some(c) = &run.color {
        color = c.clone();
    }
    (font, color)
}

/// Flow items for a text frame's local runs
pub fn from_runs(runs: &[TextRun]) -> Vec<FlowItem> {
    let base = BlockStyle::default();
    let mut builder = FlowBuilder::default();
    for run in runs {
        let (font, color) = run_font(&base, None, run);
        builder.push_text(&run.text, &font, &color);
    }
    builder.items
}

/// Flow items for plain text in a single font
pub fn from_text(text: &str, font: &FontSpec, color: &str) -> Vec<FlowItem> {
    let mut builder = FlowBuilder::default();
    builder.push_text(text, font, color);
    builder.items
}

/// Flow items for a document's main content. Hidden conditional text is
/// dropped, variables and cross-references are resolved to display text.
pub fn from_document(document: &Document) -> Vec<FlowItem> {
    let mut collector = DocumentFlow {
        document,
        hidden: document.hidden_conditions().into_iter().collect(),
        headings: document.headings(),
        styles: vec![BlockStyle::default()],
        builder: FlowBuilder::default(),
    };
    collector.visit_content(document.content());
    collector.builder.items
}

/// Relative size of heading text against its paragraph style
fn heading_scale(level: u8) -> f64 {
    match level {
        1 => 2.0,
        2 => 1.5,
        3 => 1.25,
        _ => 1.0,
    }
}

struct DocumentFlow<'a> {
    document: &'a Document,
    hidden: HashSet<String>,
    headings: Vec<(u8, String, String)>,
    styles: Vec<BlockStyle>,
    builder: FlowBuilder,
}

impl DocumentFlow<'_> {
    fn style(&self) -> BlockStyle {
        self.styles.last().cloned().unwrap_or_default()
    }

    fn block(&mut self, style: BlockStyle, node: &ContentNode, path: &[usize]) {
        let size = style.font.size;
        self.styles.push(style);
        walk_children(self, node, path);
        self.styles.pop();
        self.builder.push_break(size);
    }

    fn inline_text(&mut self, text: &str) {
        let style = self.style();
        self.builder.push_text(text, &style.font, &style.color);
    }
}

impl Visitor for DocumentFlow<'_> {
    fn visit_heading(&mut self, node: &ContentNode, path: &[usize]) {
        let ContentNode::Heading { level, style_id, .. } = node else {
            return;
        };
        let mut style = BlockStyle::from(self.document.paragraph_style_for(style_id.as_deref()));
        style.font.size *= heading_scale(*level);
        style.font.bold = true;
        self.block(style, node, path);
    }

    fn visit_text_block(&mut self, node: &ContentNode, path: &[usize]) {
        let style = match node {
            ContentNode::Paragraph { style_id, .. } => {
                BlockStyle::from(self.document.paragraph_style_for(style_id.as_deref()))
            }
            _ => {
                let mut style = BlockStyle::from(self.document.paragraph_style_for(None));
                style.font.family = MONOSPACE_FAMILY.to_string();
                style
            }
        };
        self.block(style, node, path);
    }

    fn visit_conditional(&mut self, condition: &str, node: &ContentNode, path: &[usize]) {
        if !self.hidden.contains(condition) {
            walk_children(self, node, path);
        }
    }

    fn visit_text_run(&mut self, run: &TextRun, _path: &[usize]) {
        let base = self.style();
        let character = run
            .character_style_id
            .as_deref()
            .map(|id| self.document.character_style_for(Some(id)));
        let (font, color) = run_font(&base, character.as_ref(), run);
        self.builder.push_text(&run.text, &font, &color);
    }

    fn visit_void(&mut self, node: &ContentNode, _path: &[usize]) {
        match node {
            ContentNode::Variable { name } => {
                let value = self.document.resolve_variable(name).unwrap_or(name.as_str()).to_string();
                self.inline_text(&value);
            }
            ContentNode::CrossReference { target_id, .. } => {
                let title = self
                    .headings
                    .iter()
                    .find(|(_, id, _)| id == target_id)
                    .map_or_else(|| target_id.clone(), |(_, _, title)| title.clone());
                self.inline_text(&title);
            }
            ContentNode::Image { alt, .. } if !alt.is_empty() => {
                let style = self.style();
                let alt = format!("[{alt}]");
                self.builder.push_text(&alt, &style.font, &style.color);
                self.builder.push_break(style.font.size);
            }
            _ => {}
        }
    }
}

/// Font used for table cell text
pub fn cell_font(header: bool) -> FontSpec {
    FontSpec {
        family: DEFAULT_FONT_FAMILY.to_string(),
        bold: header,
        ..FontSpec::default()
    }
}
