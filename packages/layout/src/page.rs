use serde::{Deserialize, Serialize};

use crate::frame::Frame;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page {
    pub id: String,
    /// 1-based, kept contiguous by the store
    pub page_number: u32,
    pub width: f64,
    pub height: f64,
    /// Creation order; see [`Page::paint_order`] for stacking
    #[serde(default)]
    pub frames: Vec<Frame>,
}

impl Page {
    pub fn new(id: impl Into<String>, page_number: u32, width: f64, height: f64) -> Self {
        Self {
            id: id.into(),
            page_number,
            width,
            height,
            frames: Vec::new(),
        }
    }

    /// Frames bottom to top; ties keep creation order
    pub fn paint_order(&self) -> Vec<&Frame> {
        let mut frames: Vec<&Frame> = self.frames.iter().collect();
        frames.sort_by_key(|frame| frame.z_index);
        frames
    }

    /// Topmost visible frame under the point
    pub fn frame_at(&self, x: f64, y: f64) -> Option<&Frame> {
        self.paint_order()
            .into_iter()
            .rev()
            .find(|frame| frame.visible && frame.hit(x, y))
    }

    pub fn max_z(&self) -> Option<i32> {
        self.frames.iter().map(|f| f.z_index).max()
    }

    pub fn min_z(&self) -> Option<i32> {
        self.frames.iter().map(|f| f.z_index).min()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frame::FrameKind;
    use crate::geometry::Rect;

    #[test]
    fn test_paint_order_is_stable() {
        let mut page = Page::new("p", 1, 612.0, 792.0);
        for (id, z) in [("a", 1), ("b", 0), ("c", 1), ("d", 0)] {
            let mut frame = Frame::new(id, FrameKind::Unanchored, Rect::new(0.0, 0.0, 50.0, 50.0));
            frame.z_index = z;
            page.frames.push(frame);
        }
        let order: Vec<&str> = page.paint_order().iter().map(|f| f.id.as_str()).collect();
        assert_eq!(order, vec!["b", "d", "a", "c"]);
        assert_eq!(page.frame_at(10.0, 10.0).map(|f| f.id.as_str()), Some("c"));
    }
}
