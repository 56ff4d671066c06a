//! Geometry primitives

use std::ops::{Add, Sub};

/// 2D vector used for positions and sizes
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    pub const ZERO: Vec2 = Vec2 { x: 0.0, y: 0.0 };

    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

impl Add for Vec2 {
    type Output = Vec2;

    fn add(self, rhs: Vec2) -> Vec2 {
        Vec2::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Vec2 {
    type Output = Vec2;

    fn sub(self, rhs: Vec2) -> Vec2 {
        Vec2::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl From<(f32, f32)> for Vec2 {
    fn from((x, y): (f32, f32)) -> Self {
        Self::new(x, y)
    }
}

/// Axis-aligned rectangle (x, y, width, height)
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Bounds {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Bounds {
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self { x, y, width, height }
    }

    /// Create bounds from a position and a size
    pub fn from_pos_size(position: Vec2, size: Vec2) -> Self {
        Self::new(position.x, position.y, size.x, size.y)
    }

    pub fn position(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }

    pub fn size(&self) -> Vec2 {
        Vec2::new(self.width, self.height)
    }

    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    /// True when the rectangle covers no area
    pub fn is_empty(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }

    /// Check if a point is inside the rectangle
    pub fn contains(&self, px: f32, py: f32) -> bool {
        px >= self.x && px < self.right() && py >= self.y && py < self.bottom()
    }

    /// Intersect with another rectangle.
    ///
    /// Disjoint rectangles produce a zero-sized rectangle anchored at the
    /// clamped origin, so the result can always be used as a clip region.
    pub fn intersect(&self, other: &Bounds) -> Bounds {
        let x1 = self.x.max(other.x);
        let y1 = self.y.max(other.y);
        let x2 = self.right().min(other.right());
        let y2 = self.bottom().min(other.bottom());

        Bounds::new(x1, y1, (x2 - x1).max(0.0), (y2 - y1).max(0.0))
    }

    /// Edge-inclusive overlap test
    pub fn overlaps(&self, other: &Bounds) -> bool {
        !(self.x > other.right()
            || self.right() < other.x
            || self.y > other.bottom()
            || self.bottom() < other.y)
    }

    /// Shrink by padding on all four sides
    pub fn inset(&self, padding: &Padding) -> Bounds {
        Bounds::new(
            self.x + padding.left,
            self.y + padding.top,
            self.width - padding.left - padding.right,
            self.height - padding.top - padding.bottom,
        )
    }
}

/// Padding (left, top, right, bottom)
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Padding {
    pub left: f32,
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
}

impl Padding {
    pub const fn new(left: f32, top: f32, right: f32, bottom: f32) -> Self {
        Self { left, top, right, bottom }
    }

    /// Same padding on every side
    pub const fn uniform(value: f32) -> Self {
        Self::new(value, value, value, value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bounds_intersect() {
        let a = Bounds::new(0.0, 0.0, 100.0, 100.0);
        let b = Bounds::new(50.0, 50.0, 100.0, 100.0);

        let c = a.intersect(&b);
        assert_eq!(c, Bounds::new(50.0, 50.0, 50.0, 50.0));
    }

    #[test]
    fn test_bounds_intersect_disjoint_is_empty() {
        let a = Bounds::new(0.0, 0.0, 10.0, 10.0);
        let b = Bounds::new(20.0, 20.0, 10.0, 10.0);

        let c = a.intersect(&b);
        assert!(c.is_empty());
        assert_eq!(c.width, 0.0);
        assert_eq!(c.height, 0.0);
    }

    #[test]
    fn test_bounds_overlap_touching_edges() {
        let a = Bounds::new(0.0, 0.0, 10.0, 10.0);
        let b = Bounds::new(10.0, 0.0, 10.0, 10.0);
        let c = Bounds::new(10.5, 0.0, 10.0, 10.0);

        assert!(a.overlaps(&b));
        assert!(!a.overlaps(&c));
    }

    #[test]
    fn test_bounds_inset() {
        let b = Bounds::new(10.0, 10.0, 100.0, 40.0);
        let inner = b.inset(&Padding::new(1.0, 2.0, 3.0, 4.0));
        assert_eq!(inner, Bounds::new(11.0, 12.0, 96.0, 34.0));
    }

    #[test]
    fn test_vec2_ops() {
        let a = Vec2::new(1.0, 2.0) + Vec2::new(3.0, 4.0);
        assert_eq!(a, Vec2::new(4.0, 6.0));
        assert_eq!(a - Vec2::new(4.0, 6.0), Vec2::ZERO);
    }
}
