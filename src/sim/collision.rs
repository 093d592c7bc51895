//! Point collision queries against the arena
//!
//! Targets are scanned first in insertion order, so a scoring shape always
//! wins over an obstacle at the same spot. Obstacles are scanned newest
//! first, matching the drawing stack where later walls sit on top.

use super::geometry::Rect;
use super::shape::{Circle, Obstacle, Shape, Target};
use super::state::{Arena, ShapeId, Slots};

/// Which collection a struck shape lives in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShapeKey {
    Target(ShapeId),
    Obstacle(ShapeId),
}

/// The first shape found at a query point
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Contact {
    pub key: ShapeKey,
    pub shape: Shape,
}

impl Contact {
    pub fn is_target(&self) -> bool {
        matches!(self.key, ShapeKey::Target(_))
    }
}

/// True if (x, y) lies inside or on the circle
#[inline]
pub fn point_in_circle(x: f32, y: f32, circle: &Circle) -> bool {
    circle.contains(x, y)
}

/// True if (x, y) lies inside or on the rectangle
#[inline]
pub fn point_in_rectangle(x: f32, y: f32, rect: &Rect) -> bool {
    rect.contains(x, y)
}

/// Find the shape struck at (x, y), if any
pub fn find_collision(
    x: f32,
    y: f32,
    obstacles: &Slots<Obstacle>,
    targets: &Slots<Target>,
) -> Option<Contact> {
    let target_hit = targets
        .iter()
        .find(|(_, t)| point_in_circle(x, y, &t.circle))
        .map(|(id, t)| Contact {
            key: ShapeKey::Target(id),
            shape: Shape::from(t),
        });
    if target_hit.is_some() {
        return target_hit;
    }

    obstacles
        .iter_rev()
        .find(|(_, o)| point_in_rectangle(x, y, &o.rect))
        .map(|(id, o)| Contact {
            key: ShapeKey::Obstacle(id),
            shape: Shape::from(o),
        })
}

/// Convenience wrapper over the arena's collections
#[inline]
pub fn find_arena_collision(x: f32, y: f32, arena: &Arena) -> Option<Contact> {
    find_collision(x, y, &arena.obstacles, &arena.targets)
}
