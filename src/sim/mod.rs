//! Deterministic simulation module
//!
//! All physics and arena logic lives here. This module must be pure and
//! deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (by insertion handle)
//! - No rendering or wall-clock dependencies (time is injected)

pub mod collision;
pub mod geometry;
pub mod layout;
pub mod shape;
pub mod state;
pub mod tick;

pub use collision::{Contact, ShapeKey, find_arena_collision, find_collision, point_in_circle, point_in_rectangle};
pub use geometry::{Point, Rect, distance, horizontal_distance, rectangle_bounds, vertical_distance};
pub use layout::{LayoutGenerator, fixed_arena, generate_arena};
pub use shape::{Circle, Obstacle, Shape, Target};
pub use state::{Arena, Projectile, ShapeId, Slots, ThrowPhase};
pub use tick::{Impact, ImpactEffect, TickEvent, tick};
