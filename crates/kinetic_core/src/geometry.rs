//! Points and element bounding boxes

use serde::{Deserialize, Serialize};

/// A point in client (viewport) or screen coordinates
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// An element's bounding box, in the same coordinate space as client points
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub left: f32,
    pub top: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub const fn new(left: f32, top: f32, width: f32, height: f32) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    pub fn right(&self) -> f32 {
        self.left + self.width
    }

    pub fn bottom(&self) -> f32 {
        self.top + self.height
    }

    /// Half-open containment: left/top edges inside, right/bottom edges outside
    pub fn contains(&self, point: Point) -> bool {
        point.x >= self.left
            && point.x < self.right()
            && point.y >= self.top
            && point.y < self.bottom()
    }

    /// Containment used by the traversal fallback
    ///
    /// The offset from the top-left corner must be strictly positive and at
    /// most the box size, so the left/top edges are outside and the
    /// right/bottom edges inside.
    pub fn contains_from_origin(&self, point: Point) -> bool {
        let adj_x = point.x - self.left;
        let adj_y = point.y - self.top;
        adj_x > 0.0 && adj_y > 0.0 && adj_x <= self.width && adj_y <= self.height
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contains_half_open() {
        let rect = Rect::new(10.0, 10.0, 100.0, 50.0);
        assert!(rect.contains(Point::new(10.0, 10.0)));
        assert!(rect.contains(Point::new(109.0, 59.0)));
        assert!(!rect.contains(Point::new(110.0, 30.0)));
        assert!(!rect.contains(Point::new(50.0, 60.0)));
    }

    #[test]
    fn test_contains_from_origin_edges() {
        let rect = Rect::new(10.0, 10.0, 100.0, 50.0);
        // top-left corner is excluded, bottom-right corner is included
        assert!(!rect.contains_from_origin(Point::new(10.0, 30.0)));
        assert!(!rect.contains_from_origin(Point::new(30.0, 10.0)));
        assert!(rect.contains_from_origin(Point::new(110.0, 60.0)));
        assert!(!rect.contains_from_origin(Point::new(110.5, 30.0)));
    }
}
