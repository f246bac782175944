//! Core geometry types shared across the engine.
//!
//! `Point` is used for both world (image-pixel) and screen coordinates,
//! depending on context. `BBox` is always an axis-aligned rectangle in
//! integer image-pixel coordinates, clamped to the image at every mutation.

use serde::{Deserialize, Serialize};

/// A 2D point (world or screen space, f64).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// An axis-aligned bounding box in image-pixel coordinates.
///
/// Invariant (maintained by all constructors and mutators that know the
/// image size): `x + w <= image.width` and `y + h <= image.height`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BBox {
    pub x: u32,
    pub y: u32,
    pub w: u32,
    pub h: u32,
}

impl BBox {
    pub fn new(x: u32, y: u32, w: u32, h: u32) -> Self {
        Self { x, y, w, h }
    }

    /// Build a bbox from two opposite world-space corners, normalized and
    /// clamped to the image bounds. Returns None for a degenerate result
    /// (entirely outside the image, or zero-size after clamping).
    pub fn from_world_corners(a: Point, b: Point, image_w: u32, image_h: u32) -> Option<Self> {
        let x0 = a.x.min(b.x).max(0.0);
        let y0 = a.y.min(b.y).max(0.0);
        let x1 = a.x.max(b.x).min(f64::from(image_w));
        let y1 = a.y.max(b.y).min(f64::from(image_h));

        if x1 <= x0 || y1 <= y0 {
            return None;
        }

        let x = x0.round() as u32;
        let y = y0.round() as u32;
        let w = (x1.round() as u32).saturating_sub(x);
        let h = (y1.round() as u32).saturating_sub(y);
        if w == 0 || h == 0 {
            return None;
        }
        Some(Self { x, y, w, h })
    }

    /// Translate by a world-space delta, clamped so the box stays within
    /// the image bounds. Size is preserved.
    pub fn translated(&self, dx: f64, dy: f64, image_w: u32, image_h: u32) -> Self {
        let max_x = f64::from(image_w.saturating_sub(self.w));
        let max_y = f64::from(image_h.saturating_sub(self.h));
        let nx = (f64::from(self.x) + dx).clamp(0.0, max_x);
        let ny = (f64::from(self.y) + dy).clamp(0.0, max_y);
        Self {
            x: nx.round() as u32,
            y: ny.round() as u32,
            w: self.w,
            h: self.h,
        }
    }

    /// Clamp the box to the image bounds, shrinking if necessary.
    pub fn clamped(&self, image_w: u32, image_h: u32) -> Self {
        let x = self.x.min(image_w);
        let y = self.y.min(image_h);
        Self {
            x,
            y,
            w: self.w.min(image_w - x),
            h: self.h.min(image_h - y),
        }
    }

    /// Check if a world-space point is inside the box.
    pub fn contains(&self, p: Point) -> bool {
        p.x >= f64::from(self.x)
            && p.x <= f64::from(self.x + self.w)
            && p.y >= f64::from(self.y)
            && p.y <= f64::from(self.y + self.h)
    }

    /// Area in pixels.
    pub fn area(&self) -> u64 {
        u64::from(self.w) * u64::from(self.h)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_world_corners_normalizes() {
        let b = BBox::from_world_corners(
            Point::new(50.0, 80.0),
            Point::new(10.0, 20.0),
            100,
            100,
        )
        .unwrap();
        assert_eq!(b, BBox::new(10, 20, 40, 60));
    }

    #[test]
    fn test_from_world_corners_clamps_to_image() {
        let b = BBox::from_world_corners(
            Point::new(-20.0, -20.0),
            Point::new(150.0, 150.0),
            100,
            100,
        )
        .unwrap();
        assert_eq!(b, BBox::new(0, 0, 100, 100));
    }

    #[test]
    fn test_from_world_corners_outside_image() {
        let b = BBox::from_world_corners(
            Point::new(200.0, 200.0),
            Point::new(300.0, 300.0),
            100,
            100,
        );
        assert!(b.is_none());
    }

    #[test]
    fn test_translated_clamps_to_bounds() {
        // Moving a 50x50 box in a 100x100 image by (+1000, +1000) pins it
        // to the bottom-right corner.
        let b = BBox::new(0, 0, 50, 50);
        let moved = b.translated(1000.0, 1000.0, 100, 100);
        assert_eq!(moved, BBox::new(50, 50, 50, 50));
    }

    #[test]
    fn test_translated_negative_clamps_to_origin() {
        let b = BBox::new(30, 30, 50, 50);
        let moved = b.translated(-1000.0, -1000.0, 100, 100);
        assert_eq!(moved, BBox::new(0, 0, 50, 50));
    }

    #[test]
    fn test_translated_preserves_size() {
        let b = BBox::new(10, 10, 30, 40);
        let moved = b.translated(5.5, -3.25, 200, 200);
        assert_eq!(moved.w, 30);
        assert_eq!(moved.h, 40);
    }

    #[test]
    fn test_contains() {
        let b = BBox::new(10, 10, 100, 100);
        assert!(b.contains(Point::new(50.0, 50.0)));
        assert!(b.contains(Point::new(10.0, 10.0))); // Edge
        assert!(!b.contains(Point::new(5.0, 50.0)));
    }
}
