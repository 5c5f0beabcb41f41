//! Frames: positioned boxes on a page with a type-specific payload.

use folio_model::TextRun;
use serde::{Deserialize, Serialize};

use crate::geometry::{rotate_point, Rect};

/// Distance between an original and its duplicate
pub const DUPLICATE_OFFSET: f64 = 10.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FrameKind {
    Text,
    Graphic,
    Table,
    Unanchored,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Insets {
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub left: f64,
}

impl Insets {
    pub fn uniform(value: f64) -> Self {
        Self {
            top: value,
            right: value,
            bottom: value,
            left: value,
        }
    }
}

impl Default for Insets {
    fn default() -> Self {
        Self::uniform(6.0)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Border {
    pub color: String,
    pub width: f64,
}

/// How an image fills its graphic frame
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FitMode {
    #[default]
    Contain,
    Cover,
    Fill,
    None,
}

/// Text frame payload.
///
/// The chain links are only written by the store, which keeps
/// `a.next == b` and `b.prev == a` in step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TextFrame {
    pub runs: Vec<TextRun>,
    pub columns: u32,
    pub column_gap: f64,
    pub insets: Insets,
    /// Flow the document's main content instead of `runs`
    pub flow_document: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) next_frame_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) prev_frame_id: Option<String>,
    pub(crate) overflow: bool,
}

impl Default for TextFrame {
    fn default() -> Self {
        Self {
            runs: Vec::new(),
            columns: 1,
            column_gap: 12.0,
            insets: Insets::default(),
            flow_document: false,
            next_frame_id: None,
            prev_frame_id: None,
            overflow: false,
        }
    }
}

impl TextFrame {
    pub fn next_frame_id(&self) -> Option<&str> {
        self.next_frame_id.as_deref()
    }

    pub fn prev_frame_id(&self) -> Option<&str> {
        self.prev_frame_id.as_deref()
    }

    /// Set by the last pagination pass when text did not fit the chain
    pub fn overflow(&self) -> bool {
        self.overflow
    }

    pub fn text(&self) -> String {
        self.runs.iter().map(|run| run.text.as_str()).collect()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphicFrame {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_ref: Option<String>,
    #[serde(default)]
    pub fit: FitMode,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub border: Option<Border>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TableCellSpec {
    pub row: usize,
    pub col: usize,
    #[serde(default)]
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub border: Option<Border>,
}

/// Explicit cell grid
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TableFrame {
    pub column_widths: Vec<f64>,
    pub row_heights: Vec<f64>,
    #[serde(default)]
    pub cells: Vec<TableCellSpec>,
    #[serde(default)]
    pub header_rows: usize,
}

impl TableFrame {
    /// Evenly divided `rows × cols` grid filling `rect`, with empty cells
    pub fn grid(rect: &Rect, rows: usize, cols: usize) -> Self {
        let rows = rows.max(1);
        let cols = cols.max(1);
        let cells = (0..rows)
            .flat_map(|row| {
                (0..cols).map(move |col| TableCellSpec {
                    row,
                    col,
                    text: String::new(),
                    background: None,
                    border: None,
                })
            })
            .collect();
        Self {
            column_widths: vec![rect.width / cols as f64; cols],
            row_heights: vec![rect.height / rows as f64; rows],
            cells,
            header_rows: 0,
        }
    }

    pub fn cell(&self, row: usize, col: usize) -> Option<&TableCellSpec> {
        self.cells.iter().find(|cell| cell.row == row && cell.col == col)
    }

    /// Cell box relative to the frame origin
    pub fn cell_rect(&self, row: usize, col: usize) -> Option<Rect> {
        let width = *self.column_widths.get(col)?;
        let height = *self.row_heights.get(row)?;
        let x = self.column_widths[..col].iter().sum();
        let y = self.row_heights[..row].iter().sum();
        Some(Rect::new(x, y, width, height))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UnanchoredFrame {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub border: Option<Border>,
}

/// Type-specific frame payload, tagged by `type`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum FrameContent {
    Text(TextFrame),
    Graphic(GraphicFrame),
    Table(TableFrame),
    Unanchored(UnanchoredFrame),
}

impl FrameContent {
    pub fn empty(kind: FrameKind, rect: &Rect) -> Self {
        match kind {
            FrameKind::Text => FrameContent::Text(TextFrame::default()),
            FrameKind::Graphic => FrameContent::Graphic(GraphicFrame::default()),
            FrameKind::Table => FrameContent::Table(TableFrame::grid(rect, 2, 2)),
            FrameKind::Unanchored => FrameContent::Unanchored(UnanchoredFrame::default()),
        }
    }

    pub fn kind(&self) -> FrameKind {
        match self {
            FrameContent::Text(_) => FrameKind::Text,
            FrameContent::Graphic(_) => FrameKind::Graphic,
            FrameContent::Table(_) => FrameKind::Table,
            FrameContent::Unanchored(_) => FrameKind::Unanchored,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Frame {
    pub id: String,
    #[serde(default)]
    pub name: String,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    #[serde(default)]
    pub rotation: f64,
    #[serde(default)]
    pub z_index: i32,
    #[serde(default)]
    pub locked: bool,
    #[serde(default = "visible_default")]
    pub visible: bool,
    #[serde(flatten)]
    pub content: FrameContent,
}

fn visible_default() -> bool {
    true
}

impl Frame {
    pub fn new(id: impl Into<String>, kind: FrameKind, rect: Rect) -> Self {
        let id = id.into();
        Self {
            name: format!("{kind:?} frame"),
            id,
            x: rect.x,
            y: rect.y,
            width: rect.width,
            height: rect.height,
            rotation: 0.0,
            z_index: 0,
            locked: false,
            visible: true,
            content: FrameContent::empty(kind, &rect),
        }
    }

    pub fn kind(&self) -> FrameKind {
        self.content.kind()
    }

    pub fn rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.width, self.height)
    }

    /// Page point expressed in the frame's unrotated coordinates
    pub fn local_point(&self, x: f64, y: f64) -> (f64, f64) {
        if self.rotation == 0.0 {
            return (x, y);
        }
        rotate_point((x, y), self.rect().center(), -self.rotation)
    }

    /// Whether the page point falls inside the frame as painted
    pub fn hit(&self, x: f64, y: f64) -> bool {
        let (lx, ly) = self.local_point(x, y);
        self.rect().contains(lx, ly)
    }

    pub(crate) fn set_rect(&mut self, rect: Rect) {
        self.x = rect.x;
        self.y = rect.y;
        self.width = rect.width;
        self.height = rect.height;
    }

    pub fn as_text(&self) -> Option<&TextFrame> {
        match &self.content {
            FrameContent::Text(text) => Some(text),
            _ => None,
        }
    }

    pub(crate) fn as_text_mut(&mut self) -> Option<&mut TextFrame> {
        match &mut self.content {
            FrameContent::Text(text) => Some(text),
            _ => None,
        }
    }

    pub fn next_frame_id(&self) -> Option<&str> {
        self.as_text().and_then(TextFrame::next_frame_id)
    }

    pub fn prev_frame_id(&self) -> Option<&str> {
        self.as_text().and_then(TextFrame::prev_frame_id)
    }

    /// Structural copy under a new id, offset down and right, unlinked
    pub fn duplicate(&self, new_id: impl Into<String>) -> Frame {
        let mut copy = self.clone();
        copy.id = new_id.into();
        copy.name = format!("{} copy", self.name);
        copy.x += DUPLICATE_OFFSET;
        copy.y += DUPLICATE_OFFSET;
        if let Some(text) = copy.as_text_mut() {
            text.next_frame_id = None;
            text.prev_frame_id = None;
            text.overflow = false;
        }
        copy
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frame_serializes_flat() {
        let frame = Frame::new("f-1", FrameKind::Graphic, Rect::new(10.0, 20.0, 100.0, 50.0));
        let json = serde_json::to_value(&frame).unwrap();
        assert_eq!(json["type"], "graphic");
        assert_eq!(json["zIndex"], 0);
        assert_eq!(json["fit"], "contain");

        let parsed: Frame = serde_json::from_value(json).unwrap();
        assert_eq!(parsed, frame);
    }

    #[test]
    fn test_duplicate_clears_links() {
        let mut frame = Frame::new("a", FrameKind::Text, Rect::new(0.0, 0.0, 100.0, 100.0));
        if let Some(text) = frame.as_text_mut() {
            text.next_frame_id = Some("b".to_string());
            text.prev_frame_id = Some("z".to_string());
        }
        let copy = frame.duplicate("c");
        assert_eq!(copy.id, "c");
        assert_eq!(copy.x, DUPLICATE_OFFSET);
        assert_eq!(copy.next_frame_id(), None);
        assert_eq!(copy.prev_frame_id(), None);
        assert_eq!(frame.next_frame_id(), Some("b"));
    }

    #[test]
    fn test_table_cell_rects() {
        let table = TableFrame::grid(&Rect::new(0.0, 0.0, 200.0, 100.0), 2, 4);
        assert_eq!(table.cells.len(), 8);
        assert_eq!(table.cell_rect(1, 2), Some(Rect::new(100.0, 50.0, 50.0, 50.0)));
        assert_eq!(table.cell_rect(2, 0), None);
    }
}
