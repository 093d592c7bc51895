//! Rendering collaborator interface
//!
//! The simulation never draws. It asks a `Renderer` to draw and remove
//! shapes in named slots and to present a frame once per tick.

pub mod recording;

pub use recording::{RecordingRenderer, RenderCall};

use glam::Vec2;

use crate::consts::{ARROW_TAIL_Y, ARROW_TIP_Y};
use crate::sim::{Arena, Circle, Point, Rect, ShapeId};

/// Slot a drawable occupies; drawing into a slot replaces what was there
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum DrawId {
    Projectile,
    Crosshair,
    Target(ShapeId),
    Obstacle(ShapeId),
}

/// Something the renderer can put on screen
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Drawable {
    /// The projectile itself
    Ball(Circle),
    /// Indicator for a projectile above the arena (tip at `tip`)
    Arrow { tail: Point, tip: Point },
    /// Aim marker at the release point
    Crosshair(Point),
    Target(Circle),
    /// Wall with its layer count (drawn as graded shades)
    Obstacle { rect: Rect, layers: u8 },
}

/// Drawing backend supplied by the host
pub trait Renderer {
    fn arena_width(&self) -> f32;
    fn arena_height(&self) -> f32;
    fn draw_shape(&mut self, id: DrawId, shape: Drawable);
    fn remove_shape(&mut self, id: DrawId);
    fn present_frame(&mut self);
}

/// The visual for a projectile at `pos`: a ball in view, or an arrow pinned
/// to the top edge while it is above the arena
pub fn projectile_visual(pos: Point, radius: f32) -> Drawable {
    if pos.y < 0.0 {
        Drawable::Arrow {
            tail: Vec2::new(pos.x, ARROW_TAIL_Y),
            tip: Vec2::new(pos.x, ARROW_TIP_Y),
        }
    } else {
        Drawable::Ball(Circle::new(pos, radius))
    }
}

/// Draw every shape in the arena in insertion order
pub fn draw_arena<R: Renderer + ?Sized>(renderer: &mut R, arena: &Arena) {
    for (id, obstacle) in arena.obstacles.iter() {
        renderer.draw_shape(
            DrawId::Obstacle(id),
            Drawable::Obstacle {
                rect: obstacle.rect,
                layers: obstacle.layers,
            },
        );
    }
    for (id, target) in arena.targets.iter() {
        renderer.draw_shape(DrawId::Target(id), Drawable::Target(target.circle));
    }
    renderer.present_frame();
}
