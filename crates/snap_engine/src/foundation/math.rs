//! Math utilities and types
//!
//! Provides the 2D vector and rectangle types shared by physics, picking and
//! rendering. All coordinates are in buffer pixels, y pointing down.

pub use nalgebra::Vector2;
use serde::{Deserialize, Serialize};

/// 2D vector type
pub type Vec2 = Vector2<f64>;

/// Axis-aligned rectangle, the canonical bounding shape of every entity
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    /// Left edge
    pub x: f64,
    /// Top edge
    pub y: f64,
    /// Width
    pub width: f64,
    /// Height
    pub height: f64,
}

impl Rect {
    /// Create a rectangle from its top-left corner and size
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self { x, y, width, height }
    }

    /// Create a rectangle anchored at the origin
    pub const fn from_size(width: f64, height: f64) -> Self {
        Self::new(0.0, 0.0, width, height)
    }

    /// Top-left corner
    pub fn position(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }

    /// Width and height as a vector
    pub fn size(&self) -> Vec2 {
        Vec2::new(self.width, self.height)
    }

    /// Center point
    pub fn center(&self) -> Vec2 {
        Vec2::new(self.x + self.width * 0.5, self.y + self.height * 0.5)
    }

    /// Right edge
    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    /// Bottom edge
    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    /// Same rectangle moved to a new top-left corner
    pub fn with_position(&self, position: Vec2) -> Self {
        Self::new(position.x, position.y, self.width, self.height)
    }

    /// Whether the point lies inside (left/top edges inclusive)
    pub fn contains_point(&self, x: f64, y: f64) -> bool {
        x >= self.x && y >= self.y && x < self.right() && y < self.bottom()
    }

    /// Whether `other` lies fully inside this rectangle
    pub fn contains_rect(&self, other: &Self) -> bool {
        other.x >= self.x
            && other.y >= self.y
            && other.right() <= self.right()
            && other.bottom() <= self.bottom()
    }

    /// Whether the two rectangles overlap
    pub fn intersects(&self, other: &Self) -> bool {
        self.x < other.right()
            && other.x < self.right()
            && self.y < other.bottom()
            && other.y < self.bottom()
    }
}

/// Clamp a value to `[-limit, limit]` the way the integrator does it.
///
/// Values whose magnitude exceeds `limit` collapse to `signum(value)`, not to
/// `±limit`. With `limit >= 1.0` the result always lies inside the range.
#[inline]
pub fn sign_clamp(value: f64, limit: f64) -> f64 {
    if value.abs() > limit {
        value.signum()
    } else {
        value
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rect_contains() {
        let area = Rect::from_size(320.0, 240.0);
        assert!(area.contains_rect(&Rect::new(10.0, 10.0, 16.0, 16.0)));
        assert!(!area.contains_rect(&Rect::new(-5.0, 10.0, 16.0, 16.0)));
        assert!(!area.contains_rect(&Rect::new(310.0, 10.0, 16.0, 16.0)));
        assert!(area.contains_point(0.0, 0.0));
        assert!(!area.contains_point(320.0, 10.0));
    }

    #[test]
    fn test_rect_center_and_intersection() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        let b = Rect::new(5.0, 5.0, 10.0, 10.0);
        let c = Rect::new(20.0, 20.0, 2.0, 2.0);
        assert_eq!(a.center(), Vec2::new(5.0, 5.0));
        assert!(a.intersects(&b));
        assert!(!a.intersects(&c));
    }

    #[test]
    fn test_sign_clamp_collapses_to_sign() {
        assert_eq!(sign_clamp(0.5, 1.0), 0.5);
        assert_eq!(sign_clamp(3.0, 1.0), 1.0);
        assert_eq!(sign_clamp(-7.0, 4.0), -1.0);
        assert_eq!(sign_clamp(-4.0, 4.0), -4.0);
    }
}
