//! Point and rectangle helpers
//!
//! Arena coordinates: origin at top-left, y grows downward.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// A position in arena coordinates
pub type Point = Vec2;

/// Euclidean distance between two points
#[inline]
pub fn distance(p1: Point, p2: Point) -> f32 {
    let dx = p2.x - p1.x;
    let dy = p2.y - p1.y;
    (dx * dx + dy * dy).sqrt()
}

/// Absolute horizontal distance between two points
#[inline]
pub fn horizontal_distance(p1: Point, p2: Point) -> f32 {
    (p2.x - p1.x).abs()
}

/// Absolute vertical distance between two points
#[inline]
pub fn vertical_distance(p1: Point, p2: Point) -> f32 {
    (p2.y - p1.y).abs()
}

/// Axis-aligned rectangle with normalized edges (top <= bottom, left <= right)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub top: f32,
    pub bottom: f32,
    pub left: f32,
    pub right: f32,
}

impl Rect {
    /// Build a rectangle from two opposite corners given in any orientation
    pub fn from_corners(p1: Point, p2: Point) -> Self {
        Self {
            top: p1.y.min(p2.y),
            bottom: p1.y.max(p2.y),
            left: p1.x.min(p2.x),
            right: p1.x.max(p2.x),
        }
    }

    #[inline]
    pub fn width(&self) -> f32 {
        self.right - self.left
    }

    #[inline]
    pub fn height(&self) -> f32 {
        self.bottom - self.top
    }

    /// The four corners, clockwise from top-left
    pub fn corners(&self) -> [Point; 4] {
        [
            Vec2::new(self.left, self.top),
            Vec2::new(self.right, self.top),
            Vec2::new(self.right, self.bottom),
            Vec2::new(self.left, self.bottom),
        ]
    }

    /// Inclusive point containment
    #[inline]
    pub fn contains(&self, x: f32, y: f32) -> bool {
        x >= self.left && x <= self.right && y >= self.top && y <= self.bottom
    }
}

/// Normalize two arbitrary corners into `(top, bottom, left, right)`
pub fn rectangle_bounds(p1: Point, p2: Point) -> (f32, f32, f32, f32) {
    let b = Rect::from_corners(p1, p2);
    (b.top, b.bottom, b.left, b.right)
}
