//! Display list produced by a render pass.

use folio_layout::{FitMode, Rect};
use serde::{Deserialize, Serialize};

use crate::measure::FontSpec;

/// One drawing instruction. Push/pop pairs nest.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum PaintOp {
    /// Rotate subsequent ops by `degrees` about `(cx, cy)`
    PushTransform { degrees: f64, cx: f64, cy: f64 },
    PopTransform,
    PushClip { rect: Rect },
    PopClip,
    FillRect { rect: Rect, color: String },
    StrokeRect { rect: Rect, color: String, width: f64 },
    /// `y` is the baseline
    Text {
        x: f64,
        y: f64,
        text: String,
        font: FontSpec,
        color: String,
    },
    Image { rect: Rect, href: String, fit: FitMode },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RasterPage {
    pub page_id: String,
    pub page_number: u32,
    pub width: f64,
    pub height: f64,
    pub ops: Vec<PaintOp>,
}

impl RasterPage {
    /// Concatenated text of every text op, in paint order
    pub fn text(&self) -> Vec<&str> {
        self.ops
            .iter()
            .filter_map(|op| match op {
                PaintOp::Text { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderOutput {
    pub pages: Vec<RasterPage>,
    /// Last frame of every chain whose content did not fit
    pub overflowed: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ops_serialize_tagged() {
        let op = PaintOp::StrokeRect {
            rect: Rect::new(0.0, 0.0, 10.0, 10.0),
            color: "#000000".to_string(),
            width: 0.5,
        };
        let json = serde_json::to_value(&op).unwrap();
        assert_eq!(json["op"], "strokeRect");
        assert_eq!(json["rect"]["width"], 10.0);

        let output = RenderOutput {
            pages: Vec::new(),
            overflowed: vec!["f-1".to_string()],
        };
        let json = serde_json::to_string(&output).unwrap();
        assert_eq!(json, r#"{"pages":[],"overflowed":["f-1"]}"#);
    }
}
