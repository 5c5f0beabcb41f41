//! Pointer-driven placement tool.
//!
//! One [`Gesture`] is active at a time; pointer events are routed through
//! the store so every step goes through the same snapping and locking
//! rules as direct calls.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::frame::FrameKind;
use crate::geometry::Rect;
use crate::store::LayoutStore;

/// Drawn boxes must exceed this in both dimensions to become a frame
pub const MIN_DRAW_SIZE: f64 = 20.0;

/// Half-size of the square grab area around each corner
const HANDLE_RADIUS: f64 = 4.0;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Tool {
    #[default]
    Select,
    DrawText,
    DrawGraphic,
    DrawUnanchored,
    Pan,
}

impl Tool {
    fn draws(self) -> Option<FrameKind> {
        match self {
            Tool::DrawText => Some(FrameKind::Text),
            Tool::DrawGraphic => Some(FrameKind::Graphic),
            Tool::DrawUnanchored => Some(FrameKind::Unanchored),
            Tool::Select | Tool::Pan => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Handle {
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
}

impl Handle {
    const ALL: [Handle; 4] = [Handle::TopLeft, Handle::TopRight, Handle::BottomLeft, Handle::BottomRight];

    fn corner(self, rect: &Rect) -> (f64, f64) {
        match self {
            Handle::TopLeft => (rect.x, rect.y),
            Handle::TopRight => (rect.right(), rect.y),
            Handle::BottomLeft => (rect.x, rect.bottom()),
            Handle::BottomRight => (rect.right(), rect.bottom()),
        }
    }

    fn opposite(self) -> Handle {
        match self {
            Handle::TopLeft => Handle::BottomRight,
            Handle::TopRight => Handle::BottomLeft,
            Handle::BottomLeft => Handle::TopRight,
            Handle::BottomRight => Handle::TopLeft,
        }
    }

    /// Handle of `rect` under the point, if any
    pub fn at(rect: &Rect, x: f64, y: f64) -> Option<Handle> {
        Handle::ALL.into_iter().find(|handle| {
            let (cx, cy) = handle.corner(rect);
            (x - cx).abs() <= HANDLE_RADIUS && (y - cy).abs() <= HANDLE_RADIUS
        })
    }

    /// `original` with this corner dragged by the delta, opposite corner fixed
    pub fn drag(self, original: &Rect, dx: f64, dy: f64) -> Rect {
        let (mx, my) = self.corner(original);
        Rect::from_points(self.opposite().corner(original), (mx + dx, my + dy))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Gesture {
    Idle,
    Drawing {
        origin: (f64, f64),
        current: (f64, f64),
    },
    Moving {
        frame_id: String,
        start: (f64, f64),
        original: Rect,
    },
    Resizing {
        frame_id: String,
        handle: Handle,
        start: (f64, f64),
        original: Rect,
    },
    Panning {
        last: (f64, f64),
    },
}

impl Gesture {
    pub fn frame_id(&self) -> Option<&str> {
        match self {
            Gesture::Moving { frame_id, .. } | Gesture::Resizing { frame_id, .. } => Some(frame_id),
            _ => None,
        }
    }

    /// Rectangle being drawn
    pub fn draft(&self) -> Option<Rect> {
        match self {
            Gesture::Drawing { origin, current } => Some(Rect::from_points(*origin, *current)),
            _ => None,
        }
    }
}

impl LayoutStore {
    /// Switching tools abandons the active gesture
    pub fn set_tool(&mut self, tool: Tool) {
        self.cancel_gesture();
        self.tool = tool;
    }

    pub fn pointer_down(&mut self, x: f64, y: f64) {
        if !matches!(self.gesture, Gesture::Idle) {
            return;
        }
        let point = (x, y);

        self.gesture = match self.tool {
            Tool::Pan => Gesture::Panning { last: point },
            tool if tool.draws().is_some() => Gesture::Drawing {
                origin: point,
                current: point,
            },
            _ => self.select_at(x, y),
        };
    }

    fn select_at(&mut self, x: f64, y: f64) -> Gesture {
        let point = (x, y);
        if let Some(selected) = self.selected_frame().filter(|f| !f.locked) {
            let original = selected.rect();
            let (lx, ly) = selected.local_point(x, y);
            if let Some(handle) = Handle::at(&original, lx, ly) {
                return Gesture::Resizing {
                    frame_id: selected.id.clone(),
                    handle,
                    start: point,
                    original,
                };
            }
        }

        let hit = self.current_page().frame_at(x, y).map(|f| (f.id.clone(), f.rect(), f.locked));
        match hit {
            Some((frame_id, original, locked)) => {
                self.select_frame(Some(&frame_id));
                if locked {
                    Gesture::Idle
                } else {
                    Gesture::Moving {
                        frame_id,
                        start: point,
                        original,
                    }
                }
            }
            None => {
                self.select_frame(None);
                Gesture::Idle
            }
        }
    }

    pub fn pointer_move(&mut self, x: f64, y: f64) {
        match &mut self.gesture {
            Gesture::Idle => {}
            Gesture::Drawing { current, .. } => *current = (x, y),
            Gesture::Panning { last } => {
                let (dx, dy) = (x - last.0, y - last.1);
                *last = (x, y);
                self.viewport.x += dx;
                self.viewport.y += dy;
            }
            Gesture::Moving {
                frame_id,
                start,
                original,
            } => {
                let rect = original.translate(x - start.0, y - start.1);
                let id = frame_id.clone();
                self.set_frame_rect(&id, rect);
            }
            Gesture::Resizing {
                frame_id,
                handle,
                start,
                original,
            } => {
                let rect = handle.drag(original, x - start.0, y - start.1);
                let id = frame_id.clone();
                self.set_frame_rect(&id, rect);
            }
        }
    }

    /// Finish the gesture. Returns the id of a newly drawn frame.
    pub fn pointer_up(&mut self, x: f64, y: f64) -> Option<String> {
        self.pointer_move(x, y);
        let gesture = std::mem::replace(&mut self.gesture, Gesture::Idle);

        let Gesture::Drawing { origin, current } = gesture else {
            return None;
        };
        let kind = self.tool.draws()?;
        self.tool = Tool::Select;

        let rect = Rect::from_points(origin, current);
        if rect.width <= MIN_DRAW_SIZE || rect.height <= MIN_DRAW_SIZE {
            debug!(width = rect.width, height = rect.height, "Drawn box too small, discarded");
            return None;
        }
        let page_id = self.current_page().id.clone();
        let id = self.add_frame(&page_id, kind, rect)?;
        self.select_frame(Some(&id));
        Some(id)
    }

    /// Pointer left the canvas: abandon the gesture
    pub fn pointer_leave(&mut self) {
        self.cancel_gesture();
    }

    /// Drop the active gesture and put any dragged frame back
    pub(crate) fn cancel_gesture(&mut self) {
        match std::mem::replace(&mut self.gesture, Gesture::Idle) {
            Gesture::Moving { frame_id, original, .. } | Gesture::Resizing { frame_id, original, .. } => {
                self.restore_frame_rect(&frame_id, original);
            }
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::LayoutSettings;

    #[test]
    fn test_handle_drag_keeps_opposite_corner() {
        let original = Rect::new(10.0, 10.0, 100.0, 50.0);
        let dragged = Handle::TopLeft.drag(&original, -10.0, 5.0);
        assert_eq!(dragged, Rect::new(0.0, 15.0, 110.0, 45.0));
    }

    #[test]
    fn test_handle_hit_test() {
        let rect = Rect::new(10.0, 10.0, 100.0, 50.0);
        assert_eq!(Handle::at(&rect, 111.0, 58.0), Some(Handle::BottomRight));
        assert_eq!(Handle::at(&rect, 60.0, 30.0), None);
    }

    #[test]
    fn test_draw_commits_and_reverts_tool() {
        let mut store = LayoutStore::new(LayoutSettings::default());
        store.set_tool(Tool::DrawGraphic);
        store.pointer_down(100.0, 100.0);
        store.pointer_move(40.0, 60.0);
        let id = store.pointer_up(30.0, 50.0).unwrap();

        let frame = store.frame(&id).unwrap();
        assert_eq!(frame.kind(), FrameKind::Graphic);
        assert_eq!(frame.rect(), Rect::new(30.0, 50.0, 70.0, 50.0));
        assert_eq!(store.tool(), Tool::Select);
        assert_eq!(store.selected_frame().map(|f| f.id.as_str()), Some(id.as_str()));
    }

    #[test]
    fn test_pan_moves_viewport() {
        let mut store = LayoutStore::default();
        store.set_tool(Tool::Pan);
        store.pointer_down(0.0, 0.0);
        store.pointer_move(15.0, -5.0);
        store.pointer_up(20.0, -5.0);
        assert_eq!(store.viewport().x, 20.0);
        assert_eq!(store.viewport().y, -5.0);
        assert_eq!(store.tool(), Tool::Pan);
    }
}
