//! # Text Flow
//!
//! Greedy line breaking of a word stream through the columns of a chain of
//! linked text frames.
//!
//! ## Design
//!
//! ```text
//!  frame A                  frame B (next link)
//! ┌──────────┬──────────┐  ┌──────────┐
//! │ col 1    │ col 2    │  │ col 1    │   slots are filled in this order;
//! │ ──────── │ ──────── │─►│ ──────── │   words left over when the last slot
//! │ ──────── │ ──────── │  │ ──────── │   is full mark the chain overflowed
//! └──────────┴──────────┘  └──────────┘
//! ```
//!
//! Each line advances the cursor by its largest font size × 1.5. A word
//! that is wider than an empty column is placed anyway and clipped at paint
//! time.

use folio_layout::{Frame, Rect};

use crate::content::{FlowItem, Word};
use crate::measure::{FontSpec, TextMeasurer};

/// Styled text at a horizontal position on a line
#[derive(Debug, Clone, PartialEq)]
pub struct Fragment {
    pub x: f64,
    pub text: String,
    pub font: FontSpec,
    pub color: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Line {
    /// Top of the line box
    pub y: f64,
    pub height: f64,
    pub fragments: Vec<Fragment>,
}

impl Line {
    pub fn text(&self) -> String {
        self.fragments
            .iter()
            .map(|f| f.text.as_str())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FrameLines {
    pub frame_id: String,
    pub lines: Vec<Line>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChainLayout {
    pub frames: Vec<FrameLines>,
    /// Content was left over after the last frame
    pub overflow: bool,
}

impl ChainLayout {
    /// Frame that reports the overflow
    pub fn last_frame_id(&self) -> Option<&str> {
        self.frames.last().map(|f| f.frame_id.as_str())
    }
}

/// Column boxes of a text frame in page coordinates, left to right.
///
/// Column width is `(width - left - right - gap * (n - 1)) / n`.
pub fn column_rects(frame: &Frame) -> Vec<Rect> {
    let Some(text) = frame.as_text() else {
        return Vec::new();
    };
    let insets = text.insets;
    let inner = frame.rect().inset(insets.top, insets.right, insets.bottom, insets.left);
    let count = text.columns.max(1);
    let gap = text.column_gap.max(0.0);
    let width = ((inner.width - gap * f64::from(count - 1)) / f64::from(count)).max(0.0);

    (0..count)
        .map(|i| Rect::new(inner.x + f64::from(i) * (width + gap), inner.y, width, inner.height))
        .collect()
}

struct Slot {
    frame: usize,
    rect: Rect,
}

struct Flow<'a> {
    measurer: &'a dyn TextMeasurer,
    slots: Vec<Slot>,
    slot: usize,
    cursor: f64,
    out: Vec<FrameLines>,
    pending: Vec<&'a Word>,
    pending_width: f64,
    overflow: bool,
}

impl<'a> Flow<'a> {
    fn word_width(&self, word: &Word) -> f64 {
        word.pieces
            .iter()
            .map(|p| self.measurer.measure(&p.text, &p.font))
            .sum()
    }

    fn space_width(&self, word: &Word) -> f64 {
        word.pieces
            .first()
            .map_or(0.0, |p| self.measurer.measure(" ", &p.font))
    }

    fn column_width(&self) -> f64 {
        self.slots.get(self.slot).map_or(0.0, |s| s.rect.width)
    }

    fn push_word(&mut self, word: &'a Word) {
        let width = self.word_width(word);
        if !self.pending.is_empty() {
            let needed = self.pending_width + self.space_width(word) + width;
            if needed > self.column_width() {
                self.commit(None);
                if self.overflow {
                    return;
                }
            } else {
                self.pending_width = needed;
                self.pending.push(word);
                return;
            }
        }
        self.pending_width = width;
        self.pending.push(word);
    }

    /// Place the pending words as one line; `empty_size` sizes a blank line
    fn commit(&mut self, empty_size: Option<f64>) {
        let words = std::mem::take(&mut self.pending);
        self.pending_width = 0.0;

        let size = words
            .iter()
            .flat_map(|w| w.pieces.iter())
            .map(|p| p.font.size)
            .fold(None, |max: Option<f64>, s| Some(max.map_or(s, |m| m.max(s))))
            .or(empty_size);
        let Some(size) = size else {
            return;
        };
        let height = FontSpec::sized(size).line_height();

        loop {
            let Some(slot) = self.slots.get(self.slot) else {
                self.overflow = true;
                return;
            };
            if self.cursor + height <= slot.rect.bottom() {
                break;
            }
            self.slot += 1;
            if let Some(next) = self.slots.get(self.slot) {
                self.cursor = next.rect.y;
            }
        }

        let slot = &self.slots[self.slot];
        let fragments = self.fragments(&words, slot.rect.x);
        self.out[slot.frame].lines.push(Line {
            y: self.cursor,
            height,
            fragments,
        });
        self.cursor += height;
    }

    /// Merge consecutive same-style pieces into fragments
    fn fragments(&self, words: &[&Word], x: f64) -> Vec<Fragment> {
        let mut fragments: Vec<Fragment> = Vec::new();
        let mut pen = x;
        for (i, word) in words.iter().enumerate() {
            for (j, piece) in word.pieces.iter().enumerate() {
                let space = if i > 0 && j == 0 { " " } else { "" };
                let advance = self.measurer.measure(space, &piece.font) + self.measurer.measure(&piece.text, &piece.font);
                match fragments.last_mut() {
                    Some(last) if last.font == piece.font && last.color == piece.color => {
                        last.text.push_str(space);
                        last.text.push_str(&piece.text);
                    }
                    _ => fragments.push(Fragment {
                        x: pen + self.measurer.measure(space, &piece.font),
                        text: piece.text.clone(),
                        font: piece.font.clone(),
                        color: piece.color.clone(),
                    }),
                }
                pen += advance;
            }
        }
        fragments
    }

    fn run(measurer: &'a dyn TextMeasurer, slots: Vec<Slot>, out: Vec<FrameLines>, items: &'a [FlowItem]) -> Self {
        let mut flow = Flow {
            measurer,
            cursor: slots.first().map_or(0.0, |s| s.rect.y),
            slots,
            slot: 0,
            out,
            pending: Vec::new(),
            pending_width: 0.0,
            overflow: false,
        };

        // A break right after another break (or at the start) is an empty line.
        let mut after_break = true;
        for item in items {
            if flow.overflow {
                break;
            }
            match item {
                FlowItem::Word(word) => {
                    flow.push_word(word);
                    after_break = false;
                }
                FlowItem::Break { size } => {
                    let blank = after_break.then_some(*size);
                    flow.commit(blank);
                    after_break = true;
                }
            }
        }
        if !flow.overflow && !flow.pending.is_empty() {
            flow.commit(None);
        }
        flow
    }
}

/// Flow `items` through the columns of `chain`, head first
pub fn flow_chain(chain: &[&Frame], items: &[FlowItem], measurer: &dyn TextMeasurer) -> ChainLayout {
    let slots: Vec<Slot> = chain
        .iter()
        .enumerate()
        .flat_map(|(frame, f)| column_rects(f).into_iter().map(move |rect| Slot { frame, rect }))
        .collect();
    let out = chain
        .iter()
        .map(|f| FrameLines {
            frame_id: f.id.clone(),
            lines: Vec::new(),
        })
        .collect();

    let flow = Flow::run(measurer, slots, out, items);
    ChainLayout {
        frames: flow.out,
        overflow: flow.overflow,
    }
}

/// Flow `items` into a single box. Lines that do not fit are dropped.
pub fn flow_box(rect: Rect, items: &[FlowItem], measurer: &dyn TextMeasurer) -> Vec<Line> {
    let out = vec![FrameLines {
        frame_id: String::new(),
        lines: Vec::new(),
    }];
    let flow = Flow::run(measurer, vec![Slot { frame: 0, rect }], out, items);
    flow.out.into_iter().flat_map(|frame| frame.lines).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::from_runs;
    use crate::measure::MonospaceMeasurer;
    use folio_layout::{FrameKind, Insets, TextFrame};
    use folio_model::TextRun;

    fn text_frame(id: &str, width: f64, height: f64) -> Frame {
        Frame::new(id, FrameKind::Text, Rect::new(0.0, 0.0, width, height))
    }

    fn six_words() -> Vec<FlowItem> {
        from_runs(&[TextRun::new(
            "aaaaaaaaaa bbbbbbbbbb cccccccccc dddddddddd eeeeeeeeee ffffffffff",
        )])
    }

    #[test]
    fn test_two_words_per_line() {
        let frame = text_frame("t", 200.0, 100.0);
        let layout = flow_chain(&[&frame], &six_words(), &MonospaceMeasurer::new(0.5));

        let lines = &layout.frames[0].lines;
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0].text(), "aaaaaaaaaa bbbbbbbbbb");
        assert_eq!(lines[1].y, 24.0);
        assert!(!layout.overflow);
    }

    #[test]
    fn test_short_frame_overflows() {
        let frame = text_frame("t", 200.0, 40.0);
        let layout = flow_chain(&[&frame], &six_words(), &MonospaceMeasurer::new(0.5));
        assert_eq!(layout.frames[0].lines.len(), 1);
        assert!(layout.overflow);
        assert_eq!(layout.last_frame_id(), Some("t"));
    }

    #[test]
    fn test_flow_continues_into_next_frame() {
        let first = text_frame("a", 200.0, 40.0);
        let second = text_frame("b", 200.0, 100.0);
        let layout = flow_chain(&[&first, &second], &six_words(), &MonospaceMeasurer::new(0.5));
        assert_eq!(layout.frames[0].lines.len(), 1);
        assert_eq!(layout.frames[1].lines.len(), 2);
        assert_eq!(layout.frames[1].lines[0].text(), "cccccccccc dddddddddd");
        assert!(!layout.overflow);
    }

    #[test]
    fn test_column_geometry() {
        let mut frame = text_frame("t", 212.0, 100.0);
        let mut text = TextFrame::default();
        text.columns = 2;
        text.column_gap = 10.0;
        text.insets = Insets::uniform(6.0);
        frame.content = folio_layout::FrameContent::Text(text);
        let cols = column_rects(&frame);
        assert_eq!(cols.len(), 2);
        assert_eq!(cols[0], Rect::new(6.0, 6.0, 95.0, 88.0));
        assert_eq!(cols[1].x, 111.0);
    }

    #[test]
    fn test_empty_paragraph_takes_a_line() {
        let items = vec![
            FlowItem::Break { size: 12.0 },
            FlowItem::Word(Word {
                pieces: vec![crate::content::Piece {
                    text: "x".to_string(),
                    font: FontSpec::default(),
                    color: "#000000".to_string(),
                }],
            }),
        ];
        let frame = text_frame("t", 200.0, 100.0);
        let layout = flow_chain(&[&frame], &items, &MonospaceMeasurer::default());
        let lines = &layout.frames[0].lines;
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[1].y, 24.0);
    }

    #[test]
    fn test_box_drops_lines_past_bottom() {
        let lines = flow_box(Rect::new(4.0, 4.0, 92.0, 52.0), &six_words(), &MonospaceMeasurer::new(0.5));
        let texts: Vec<String> = lines.iter().map(Line::text).collect();
        assert_eq!(texts, vec!["aaaaaaaaaa", "bbbbbbbbbb"]);
        assert_eq!(lines[1].y, 22.0);
    }
}
