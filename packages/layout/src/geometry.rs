use serde::{Deserialize, Serialize};

/// Axis-aligned box in page units (72 per inch)
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self { x, y, width, height }
    }

    /// Box spanned by two corners given in any order
    pub fn from_points(a: (f64, f64), b: (f64, f64)) -> Self {
        Self {
            x: a.0.min(b.0),
            y: a.1.min(b.1),
            width: (a.0 - b.0).abs(),
            height: (a.1 - b.1).abs(),
        }
    }

    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    pub fn center(&self) -> (f64, f64) {
        (self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    pub fn contains(&self, x: f64, y: f64) -> bool {
        x >= self.x && x <= self.right() && y >= self.y && y <= self.bottom()
    }

    pub fn translate(&self, dx: f64, dy: f64) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
            ..*self
        }
    }

    /// Shrink by the given edge distances, never below zero size
    pub fn inset(&self, top: f64, right: f64, bottom: f64, left: f64) -> Self {
        Self {
            x: self.x + left,
            y: self.y + top,
            width: (self.width - left - right).max(0.0),
            height: (self.height - top - bottom).max(0.0),
        }
    }
}

/// Round to the nearest multiple of `grid`; a non-positive grid disables
/// snapping
pub fn snap(value: f64, grid: f64) -> f64 {
    if grid <= 0.0 {
        return value;
    }
    (value / grid).round() * grid
}

/// Snap a rectangle: positions clamp to non-negative, sizes to at least one
/// grid unit (or one unit when snapping is off)
pub fn snap_rect(rect: Rect, grid: Option<f64>) -> Rect {
    match grid {
        Some(grid) if grid > 0.0 => Rect {
            x: snap(rect.x, grid).max(0.0),
            y: snap(rect.y, grid).max(0.0),
            width: snap(rect.width, grid).max(grid),
            height: snap(rect.height, grid).max(grid),
        },
        _ => Rect {
            x: rect.x.max(0.0),
            y: rect.y.max(0.0),
            width: rect.width.max(1.0),
            height: rect.height.max(1.0),
        },
    }
}

/// Rotate `point` by `degrees` about `center`, clockwise on a y-down page
pub fn rotate_point(point: (f64, f64), center: (f64, f64), degrees: f64) -> (f64, f64) {
    let (sin, cos) = degrees.to_radians().sin_cos();
    let (dx, dy) = (point.0 - center.0, point.1 - center.1);
    (center.0 + dx * cos - dy * sin, center.1 + dx * sin + dy * cos)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_points_normalizes() {
        let rect = Rect::from_points((120.0, 80.0), (20.0, 30.0));
        assert_eq!(rect, Rect::new(20.0, 30.0, 100.0, 50.0));
    }

    #[test]
    fn test_snap_rounds_to_grid() {
        assert_eq!(snap(14.0, 10.0), 10.0);
        assert_eq!(snap(15.0, 10.0), 20.0);
        assert_eq!(snap(7.3, 0.0), 7.3);
    }

    #[test]
    fn test_snap_rect_clamps() {
        let snapped = snap_rect(Rect::new(-12.0, 33.0, 2.0, 47.0), Some(10.0));
        assert_eq!(snapped, Rect::new(0.0, 30.0, 10.0, 50.0));

        let free = snap_rect(Rect::new(-1.0, 2.5, 0.0, 3.5), None);
        assert_eq!(free, Rect::new(0.0, 2.5, 1.0, 3.5));
    }

    #[test]
    fn test_rotate_point_quarter_turn() {
        let (x, y) = rotate_point((60.0, 50.0), (50.0, 50.0), 90.0);
        assert!((x - 50.0).abs() < 1e-9);
        assert!((y - 60.0).abs() < 1e-9);
    }
}
