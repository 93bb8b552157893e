//! Axis-aligned rectangle geometry for falling objects and the cup
//!
//! Screen space: origin at the top-left, `y` grows downward.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// An axis-aligned rectangle given by its top-left corner and size
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    /// Top-left corner
    pub pos: Vec2,
    /// Width and height
    pub size: Vec2,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            pos: Vec2::new(x, y),
            size: Vec2::new(width, height),
        }
    }

    #[inline]
    pub fn left(&self) -> f32 {
        self.pos.x
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.pos.x + self.size.x
    }

    #[inline]
    pub fn top(&self) -> f32 {
        self.pos.y
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.pos.y + self.size.y
    }

    /// True when every coordinate is a finite number and the size is not negative
    pub fn is_valid(&self) -> bool {
        self.pos.is_finite() && self.size.is_finite() && self.size.x >= 0.0 && self.size.y >= 0.0
    }

    /// Closed-interval overlap: rectangles sharing only an edge still touch
    pub fn touches(&self, other: &Rect) -> bool {
        self.left() <= other.right()
            && self.right() >= other.left()
            && self.top() <= other.bottom()
            && self.bottom() >= other.top()
    }

    /// Open-interval overlap: at least some area is shared on both axes
    pub fn overlaps(&self, other: &Rect) -> bool {
        self.left() < other.right()
            && self.right() > other.left()
            && self.top() < other.bottom()
            && self.bottom() > other.top()
    }

    /// Horizontally centered band hanging from the top edge
    pub fn top_band(&self, width_fraction: f32, height_fraction: f32) -> Rect {
        let width = self.size.x * width_fraction;
        let height = self.size.y * height_fraction;
        Rect {
            pos: Vec2::new(self.pos.x + (self.size.x - width) * 0.5, self.pos.y),
            size: Vec2::new(width, height),
        }
    }
}
