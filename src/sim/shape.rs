//! Arena shapes: circular targets and rectangular obstacles
//!
//! A target is destroyed on any contact. An obstacle carries a layer count
//! (its grade, 1-3) used for drawing and, when layered durability is on,
//! for how many breaking hits it can take.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::geometry::{Point, Rect, distance};
use crate::consts::{MAX_LAYERS, MIN_LAYERS};

/// A circle in arena coordinates
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Circle {
    pub center: Point,
    pub radius: f32,
}

impl Circle {
    pub fn new(center: Point, radius: f32) -> Self {
        Self { center, radius }
    }

    /// Inclusive point containment
    #[inline]
    pub fn contains(&self, x: f32, y: f32) -> bool {
        distance(Vec2::new(x, y), self.center) <= self.radius
    }

    /// Axis-aligned square enclosing the circle
    pub fn bounding_rect(&self) -> Rect {
        Rect {
            top: self.center.y - self.radius,
            bottom: self.center.y + self.radius,
            left: self.center.x - self.radius,
            right: self.center.x + self.radius,
        }
    }
}

/// A scoring circle
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Target {
    pub circle: Circle,
}

impl Target {
    pub fn new(x: f32, y: f32, radius: f32) -> Self {
        Self {
            circle: Circle::new(Vec2::new(x, y), radius),
        }
    }
}

/// A destructible wall
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Obstacle {
    pub rect: Rect,
    /// Remaining layers (grade), always in 1..=3 while the obstacle exists
    pub layers: u8,
}

impl Obstacle {
    pub fn new(p1: Point, p2: Point, layers: u8) -> Self {
        Self {
            rect: Rect::from_corners(p1, p2),
            layers: layers.clamp(MIN_LAYERS, MAX_LAYERS),
        }
    }

    /// Strip one layer. Returns true when nothing is left.
    pub fn strip_layer(&mut self) -> bool {
        self.layers = self.layers.saturating_sub(1);
        self.layers == 0
    }
}

/// Any collidable shape
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Shape {
    Target(Circle),
    Obstacle(Rect),
}

impl Shape {
    /// Inclusive point containment, dispatched by variant
    #[inline]
    pub fn contains(&self, x: f32, y: f32) -> bool {
        match self {
            Shape::Target(circle) => circle.contains(x, y),
            Shape::Obstacle(rect) => rect.contains(x, y),
        }
    }
}

impl From<&Target> for Shape {
    fn from(t: &Target) -> Self {
        Shape::Target(t.circle)
    }
}

impl From<&Obstacle> for Shape {
    fn from(o: &Obstacle) -> Self {
        Shape::Obstacle(o.rect)
    }
}
