//! Arena and projectile state
//!
//! The arena owns the target and obstacle collections. Shapes live in slot
//! vectors addressed by stable `ShapeId` handles: removal tombstones the slot,
//! so insertion order (which the collision scan depends on) never changes.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::geometry::{Point, horizontal_distance, vertical_distance};
use super::shape::{Obstacle, Target};
use crate::settings::PhysicsConstants;

/// Stable handle to a shape inside its owning collection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ShapeId(pub u32);

/// Insertion-ordered collection with O(1) removal by handle
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Slots<T> {
    slots: Vec<Option<T>>,
    live: usize,
}

impl<T> Default for Slots<T> {
    fn default() -> Self {
        Self {
            slots: Vec::new(),
            live: 0,
        }
    }
}

impl<T> Slots<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an item, returning its handle
    pub fn push(&mut self, item: T) -> ShapeId {
        let id = ShapeId(self.slots.len() as u32);
        self.slots.push(Some(item));
        self.live += 1;
        id
    }

    pub fn get(&self, id: ShapeId) -> Option<&T> {
        self.slots.get(id.0 as usize).and_then(Option::as_ref)
    }

    pub fn get_mut(&mut self, id: ShapeId) -> Option<&mut T> {
        self.slots.get_mut(id.0 as usize).and_then(Option::as_mut)
    }

    /// Remove an item. Removing an already removed handle is a no-op.
    pub fn remove(&mut self, id: ShapeId) -> Option<T> {
        let removed = self.slots.get_mut(id.0 as usize).and_then(Option::take);
        if removed.is_some() {
            self.live -= 1;
        }
        removed
    }

    /// Number of live items
    pub fn len(&self) -> usize {
        self.live
    }

    pub fn is_empty(&self) -> bool {
        self.live == 0
    }

    /// Live items in insertion order
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = (ShapeId, &T)> {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(i, s)| s.as_ref().map(|item| (ShapeId(i as u32), item)))
    }

    /// Live items, most recently added first
    pub fn iter_rev(&self) -> impl Iterator<Item = (ShapeId, &T)> {
        self.iter().rev()
    }
}

impl<T> FromIterator<T> for Slots<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut slots = Self::new();
        for item in iter {
            slots.push(item);
        }
        slots
    }
}

/// The playing field and everything placed on it
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Arena {
    pub width: f32,
    pub height: f32,
    pub targets: Slots<Target>,
    pub obstacles: Slots<Obstacle>,
}

impl Arena {
    /// Create an empty arena
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width,
            height,
            targets: Slots::new(),
            obstacles: Slots::new(),
        }
    }

    /// Create an arena populated with the given shapes (in draw order)
    pub fn with_shapes(
        width: f32,
        height: f32,
        targets: impl IntoIterator<Item = Target>,
        obstacles: impl IntoIterator<Item = Obstacle>,
    ) -> Self {
        Self {
            width,
            height,
            targets: targets.into_iter().collect(),
            obstacles: obstacles.into_iter().collect(),
        }
    }

    pub fn size(&self) -> Vec2 {
        Vec2::new(self.width, self.height)
    }

    /// Left, right and bottom edges end a throw. Above the top is still in play.
    #[inline]
    pub fn out_of_bounds(&self, pos: Point) -> bool {
        pos.x <= 0.0 || pos.x >= self.width || pos.y >= self.height
    }

    pub fn targets_remaining(&self) -> usize {
        self.targets.len()
    }

    /// All targets destroyed
    pub fn is_cleared(&self) -> bool {
        self.targets.is_empty()
    }
}

/// Lifecycle of a single throw
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ThrowPhase {
    /// Integrating along the current arc
    Flying,
    /// Left the arena through the left, right or bottom edge
    OutOfBounds,
    /// Came to rest after a low-speed contact
    AtRest,
}

impl ThrowPhase {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, ThrowPhase::Flying)
    }
}

/// A projectile in flight
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Projectile {
    /// Last committed position
    pub pos: Point,
    /// Velocity at the start of the current arc (x right, y up)
    pub vel: Vec2,
    /// Whole ticks since the current arc began
    pub t: u32,
    /// Where the current arc began
    pub origin: Point,
    /// May still destroy an obstacle during this throw
    pub can_break: bool,
    pub phase: ThrowPhase,
    /// Contacts so far in this throw
    pub impacts: u32,
}

impl Projectile {
    /// Launch from the catapult toward a drag-release point.
    ///
    /// Horizontal speed is always rightward. Vertical speed points up unless
    /// the release point is above the catapult, in which case it points down.
    pub fn launch(start: Point, release: Point, physics: &PhysicsConstants) -> Self {
        let scale = physics.effective_velocity_scale();
        let ux = horizontal_distance(start, release) * scale;
        let mut uy = vertical_distance(start, release) * scale;
        if release.y < start.y {
            uy = -uy;
        }

        Self {
            pos: start,
            vel: Vec2::new(ux, uy),
            t: 0,
            origin: start,
            can_break: true,
            phase: ThrowPhase::Flying,
            impacts: 0,
        }
    }

    /// Closed-form position `t` ticks into the current arc
    pub fn position_at(&self, t: u32, gravity: f32) -> Point {
        let t = t as f32;
        let sx = self.vel.x * t;
        let sy = self.vel.y * t - 0.5 * gravity * t * t;
        // Screen y grows downward
        Vec2::new(self.origin.x + sx, self.origin.y - sy)
    }
}
