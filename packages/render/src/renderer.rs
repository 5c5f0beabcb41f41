use std::collections::HashMap;

use folio_editor::Document;
use folio_layout::{
    Border, Frame, FrameContent, GraphicFrame, LayoutStore, Page, Rect, TableFrame, UnanchoredFrame,
};
use tracing::{debug, instrument};

use crate::content::{cell_font, from_document, from_runs, from_text, FlowItem};
use crate::flow::{flow_box, flow_chain, Line};
use crate::measure::{AssetResolver, TextMeasurer};
use crate::paint::{PaintOp, RasterPage, RenderOutput};

const PLACEHOLDER_FILL: &str = "#e5e5e5";
const PLACEHOLDER_STROKE: &str = "#999999";
const CELL_PADDING: f64 = 4.0;
const CELL_TEXT_COLOR: &str = "#000000";

/// Paints a layout store into per-page display lists
pub struct Renderer<'a> {
    measurer: &'a dyn TextMeasurer,
    assets: &'a dyn AssetResolver,
}

impl<'a> Renderer<'a> {
    pub fn new(measurer: &'a dyn TextMeasurer, assets: &'a dyn AssetResolver) -> Self {
        Self { measurer, assets }
    }

    /// Flow every text chain, then paint every page.
    ///
    /// `document` feeds frames with `flowDocument` set; without it they
    /// fall back to their local runs.
    #[instrument(skip(self, store, document), fields(pages = store.pages().len(), revision = store.revision()))]
    pub fn render(&self, store: &LayoutStore, document: Option<&Document>) -> RenderOutput {
        let document_items = document.map(from_document);
        let mut lines: HashMap<String, Vec<Line>> = HashMap::new();
        let mut overflowed = Vec::new();

        for head in store.chain_heads() {
            let Some(text) = head.as_text() else {
                continue;
            };
            let local;
            let items: &[FlowItem] = match (&document_items, text.flow_document) {
                (Some(items), true) => items,
                _ => {
                    local = from_runs(&text.runs);
                    &local
                }
            };

            let chain = store.chain_from(&head.id);
            let layout = flow_chain(&chain, items, self.measurer);
            if layout.overflow {
                if let Some(last) = layout.last_frame_id() {
                    debug!(head = %head.id, frame_id = %last, "Text chain overflowed");
                    overflowed.push(last.to_string());
                }
            }
            for frame in layout.frames {
                lines.insert(frame.frame_id, frame.lines);
            }
        }

        let pages = store
            .pages()
            .iter()
            .map(|page| self.paint_page(page, &lines))
            .collect();

        RenderOutput { pages, overflowed }
    }

    /// Render and record each text frame's overflow flag in the store
    pub fn paginate(&self, store: &mut LayoutStore, document: Option<&Document>) -> RenderOutput {
        let output = self.render(store, document);
        let text_ids: Vec<String> = store
            .pages()
            .iter()
            .flat_map(|page| page.frames.iter())
            .filter(|frame| frame.as_text().is_some())
            .map(|frame| frame.id.clone())
            .collect();
        for id in text_ids {
            let overflow = output.overflowed.contains(&id);
            store.set_overflow(&id, overflow);
        }
        output
    }

    fn paint_page(&self, page: &Page, lines: &HashMap<String, Vec<Line>>) -> RasterPage {
        let mut ops = Vec::new();
        for frame in page.paint_order() {
            if !frame.visible {
                continue;
            }
            let rotated = frame.rotation.rem_euclid(360.0) != 0.0;
            if rotated {
                let (cx, cy) = frame.rect().center();
                ops.push(PaintOp::PushTransform {
                    degrees: frame.rotation,
                    cx,
                    cy,
                });
            }
            match &frame.content {
                FrameContent::Text(_) => {
                    paint_text(frame, lines.get(&frame.id).map(Vec::as_slice).unwrap_or(&[]), &mut ops)
                }
                FrameContent::Graphic(graphic) => self.paint_graphic(frame, graphic, &mut ops),
                FrameContent::Table(table) => self.paint_table(frame, table, &mut ops),
                FrameContent::Unanchored(boxed) => paint_box(frame, boxed, &mut ops),
            }
            if rotated {
                ops.push(PaintOp::PopTransform);
            }
        }

        RasterPage {
            page_id: page.id.clone(),
            page_number: page.page_number,
            width: page.width,
            height: page.height,
            ops,
        }
    }

    fn paint_graphic(&self, frame: &Frame, graphic: &GraphicFrame, ops: &mut Vec<PaintOp>) {
        let rect = frame.rect();
        if let Some(color) = &graphic.background {
            ops.push(PaintOp::FillRect {
                rect,
                color: color.clone(),
            });
        }

        let asset = graphic.image_ref.as_deref().and_then(|r| self.assets.resolve(r));
        match asset {
            Some(asset) => ops.push(PaintOp::Image {
                rect,
                href: asset.href,
                fit: graphic.fit,
            }),
            None => {
                if let Some(reference) = &graphic.image_ref {
                    debug!(frame_id = %frame.id, image_ref = %reference, "Unresolved image, painting placeholder");
                }
                ops.push(PaintOp::FillRect {
                    rect,
                    color: PLACEHOLDER_FILL.to_string(),
                });
                ops.push(PaintOp::StrokeRect {
                    rect,
                    color: PLACEHOLDER_STROKE.to_string(),
                    width: 1.0,
                });
            }
        }
        stroke(rect, graphic.border.as_ref(), ops);
    }

    fn paint_table(&self, frame: &Frame, table: &TableFrame, ops: &mut Vec<PaintOp>) {
        let mut cells: Vec<_> = table.cells.iter().collect();
        cells.sort_by_key(|cell| (cell.row, cell.col));

        for cell in cells {
            let Some(local) = table.cell_rect(cell.row, cell.col) else {
                continue;
            };
            let rect = local.translate(frame.x, frame.y);
            if let Some(color) = &cell.background {
                ops.push(PaintOp::FillRect {
                    rect,
                    color: color.clone(),
                });
            }
            stroke(rect, cell.border.as_ref(), ops);

            if !cell.text.is_empty() {
                let font = cell_font(cell.row < table.header_rows);
                let items = from_text(&cell.text, &font, CELL_TEXT_COLOR);
                let inner = rect.inset(CELL_PADDING, CELL_PADDING, CELL_PADDING, CELL_PADDING);
                let lines = flow_box(inner, &items, self.measurer);
                ops.push(PaintOp::PushClip { rect });
                push_lines(&lines, ops);
                ops.push(PaintOp::PopClip);
            }
        }
    }
}

fn paint_text(frame: &Frame, lines: &[Line], ops: &mut Vec<PaintOp>) {
    if lines.is_empty() {
        return;
    }
    ops.push(PaintOp::PushClip { rect: frame.rect() });
    push_lines(lines, ops);
    ops.push(PaintOp::PopClip);
}

/// One text op per fragment, on the line's baseline
fn push_lines(lines: &[Line], ops: &mut Vec<PaintOp>) {
    for line in lines {
        for fragment in &line.fragments {
            ops.push(PaintOp::Text {
                x: fragment.x,
                y: line.y + fragment.font.size,
                text: fragment.text.clone(),
                font: fragment.font.clone(),
                color: fragment.color.clone(),
            });
        }
    }
}

fn paint_box(frame: &Frame, boxed: &UnanchoredFrame, ops: &mut Vec<PaintOp>) {
    let rect = frame.rect();
    if let Some(color) = &boxed.background {
        ops.push(PaintOp::FillRect {
            rect,
            color: color.clone(),
        });
    }
    stroke(rect, boxed.border.as_ref(), ops);
}

fn stroke(rect: Rect, border: Option<&Border>, ops: &mut Vec<PaintOp>) {
    if let Some(border) = border.filter(|b| b.width > 0.0) {
        ops.push(PaintOp::StrokeRect {
            rect,
            color: border.color.clone(),
            width: border.width,
        });
    }
}
