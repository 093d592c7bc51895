//! Arena layout generation
//!
//! Two sources of shapes: a hand-made fixed arena, and rejection sampling of
//! random obstacles and targets. Random placement runs against a wall-clock
//! budget per batch. When the budget runs out the whole batch is discarded
//! and an empty `Vec` comes back, so an empty result always means "failed",
//! never "nothing requested".

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::geometry::{Rect, distance};
use super::shape::{Circle, Obstacle, Target};
use super::state::Arena;
use crate::consts::{MAX_LAYERS, MIN_LAYERS};
use crate::platform::Clock;
use crate::settings::{LayoutMode, LayoutSettings, Settings};

/// Fixed targets: (x, y, radius)
const FIXED_TARGETS: [(f32, f32, f32); 2] = [(600.0, 350.0, 30.0), (800.0, 200.0, 30.0)];

/// Fixed walls: ([y1, y2, x1, x2], grade)
const FIXED_WALLS: [([f32; 4], u8); 4] = [
    ([100.0, 150.0, 750.0, 400.0], 1),
    ([300.0, 400.0, 550.0, 400.0], 2),
    ([500.0, 400.0, 750.0, 350.0], 3),
    ([500.0, 100.0, 1000.0, 1030.0], 3),
];

/// The hand-made targets
pub fn fixed_targets() -> Vec<Target> {
    FIXED_TARGETS
        .iter()
        .map(|&(x, y, r)| Target::new(x, y, r))
        .collect()
}

/// The hand-made walls, in draw order
pub fn fixed_obstacles() -> Vec<Obstacle> {
    FIXED_WALLS
        .iter()
        .map(|&([y1, y2, x1, x2], grade)| {
            Obstacle::new(Vec2::new(x1, y1), Vec2::new(x2, y2), grade)
        })
        .collect()
}

/// An arena holding the fixed layout
pub fn fixed_arena(width: f32, height: f32) -> Arena {
    Arena::with_shapes(width, height, fixed_targets(), fixed_obstacles())
}

/// Approximate circle/rectangle overlap: the circle is treated as its
/// enclosing square
pub fn circle_overlaps_rect(circle: &Circle, rect: &Rect) -> bool {
    let b = circle.bounding_rect();
    b.left <= rect.right && b.right >= rect.left && b.top <= rect.bottom && b.bottom >= rect.top
}

/// Exact circle/circle overlap (touching counts)
pub fn circles_overlap(a: &Circle, b: &Circle) -> bool {
    distance(a.center, b.center) <= a.radius + b.radius
}

/// Rectangle overlap by corners and edge straddling.
///
/// A hit is any corner of one rectangle inside the other, or an edge of one
/// lying within the other's span while crossing it completely on the other
/// axis (the "plus sign" arrangement where no corner is inside).
pub fn rects_overlap(candidate: &Rect, existing: &Rect) -> bool {
    let corner_inside = |a: &Rect, b: &Rect| a.corners().iter().any(|c| b.contains(c.x, c.y));
    if corner_inside(candidate, existing) || corner_inside(existing, candidate) {
        return true;
    }
    straddles(candidate, existing) || straddles(existing, candidate)
}

/// `a` has a horizontal edge inside `b`'s vertical span and spans `b`
/// horizontally, or the same with axes swapped
fn straddles(a: &Rect, b: &Rect) -> bool {
    let within = |v: f32, lo: f32, hi: f32| v >= lo && v <= hi;
    let horizontal_edge = (within(a.top, b.top, b.bottom) || within(a.bottom, b.top, b.bottom))
        && a.left <= b.left
        && a.right >= b.right;
    let vertical_edge = (within(a.left, b.left, b.right) || within(a.right, b.left, b.right))
        && a.top <= b.top
        && a.bottom >= b.bottom;
    horizontal_edge || vertical_edge
}

#[inline]
fn sample<R: Rng>(rng: &mut R, lo: f32, hi: f32) -> f32 {
    if hi > lo { rng.random_range(lo..=hi) } else { lo }
}

/// Region shapes may be placed in: the arena minus its edge margin
pub fn placement_area(width: f32, height: f32, margin: f32) -> Rect {
    Rect::from_corners(
        Vec2::new(margin, margin),
        Vec2::new(width - margin, height - margin),
    )
}

/// Rejection sampler over a placement area
pub struct LayoutGenerator<'a, R: Rng, C: Clock> {
    rng: &'a mut R,
    clock: &'a C,
    area: Rect,
    settings: &'a LayoutSettings,
}

impl<'a, R: Rng, C: Clock> LayoutGenerator<'a, R, C> {
    pub fn new(rng: &'a mut R, clock: &'a C, area: Rect, settings: &'a LayoutSettings) -> Self {
        Self {
            rng,
            clock,
            area,
            settings,
        }
    }

    fn reserved(&self) -> Option<&Rect> {
        self.settings.launch_zone.as_ref()
    }

    fn inside_area(&self, rect: &Rect) -> bool {
        rect.left >= self.area.left
            && rect.right <= self.area.right
            && rect.top >= self.area.top
            && rect.bottom <= self.area.bottom
    }

    fn candidate_obstacle(&mut self) -> Obstacle {
        let s = self.settings;
        let short = sample(&mut *self.rng, s.short_side_min, s.short_side_max);
        let long = sample(&mut *self.rng, s.long_side_min, s.long_side_max);
        let (w, h) = if self.rng.random_bool(0.5) {
            (short, long)
        } else {
            (long, short)
        };
        let left = sample(&mut *self.rng, self.area.left, self.area.right - w);
        let top = sample(&mut *self.rng, self.area.top, self.area.bottom - h);
        let layers = self.rng.random_range(MIN_LAYERS..=MAX_LAYERS);
        Obstacle::new(Vec2::new(left, top), Vec2::new(left + w, top + h), layers)
    }

    fn candidate_target(&mut self) -> Target {
        let s = self.settings;
        let r = sample(&mut *self.rng, s.target_radius_min, s.target_radius_max);
        let x = sample(&mut *self.rng, self.area.left + r, self.area.right - r);
        let y = sample(&mut *self.rng, self.area.top + r, self.area.bottom - r);
        Target::new(x, y, r)
    }

    /// Place `count` obstacles clear of `obstacles`, `targets` and each other.
    ///
    /// Returns an empty `Vec` if the batch runs out of time.
    pub fn obstacles(
        &mut self,
        count: usize,
        obstacles: &[Obstacle],
        targets: &[Target],
    ) -> Vec<Obstacle> {
        let deadline = self.clock.now() + self.settings.timeout();
        let mut placed: Vec<Obstacle> = Vec::with_capacity(count);
        let mut attempts = 0u64;

        while placed.len() < count {
            if self.clock.now() >= deadline {
                log::warn!(
                    "Obstacle generation timed out after {} attempts ({}/{} placed)",
                    attempts,
                    placed.len(),
                    count
                );
                return Vec::new();
            }
            attempts += 1;

            let candidate = self.candidate_obstacle();
            let rect = candidate.rect;
            let blocked = !self.inside_area(&rect)
                || self.reserved().is_some_and(|z| rects_overlap(&rect, z))
                || obstacles
                    .iter()
                    .chain(placed.iter())
                    .any(|o| rects_overlap(&rect, &o.rect))
                || targets.iter().any(|t| circle_overlaps_rect(&t.circle, &rect));
            if !blocked {
                placed.push(candidate);
            }
        }

        log::debug!("Placed {} obstacles in {} attempts", count, attempts);
        placed
    }

    /// Place `count` targets clear of `obstacles`, `targets` and each other.
    ///
    /// Returns an empty `Vec` if the batch runs out of time.
    pub fn targets(
        &mut self,
        count: usize,
        obstacles: &[Obstacle],
        targets: &[Target],
    ) -> Vec<Target> {
        let deadline = self.clock.now() + self.settings.timeout();
        let mut placed: Vec<Target> = Vec::with_capacity(count);
        let mut attempts = 0u64;

        while placed.len() < count {
            if self.clock.now() >= deadline {
                log::warn!(
                    "Target generation timed out after {} attempts ({}/{} placed)",
                    attempts,
                    placed.len(),
                    count
                );
                return Vec::new();
            }
            attempts += 1;

            let candidate = self.candidate_target();
            let circle = candidate.circle;
            let blocked = !self.inside_area(&circle.bounding_rect())
                || self.reserved().is_some_and(|z| circle_overlaps_rect(&circle, z))
                || obstacles.iter().any(|o| circle_overlaps_rect(&circle, &o.rect))
                || targets
                    .iter()
                    .chain(placed.iter())
                    .any(|t| circles_overlap(&circle, &t.circle));
            if !blocked {
                placed.push(candidate);
            }
        }

        log::debug!("Placed {} targets in {} attempts", count, attempts);
        placed
    }
}

/// Build the arena described by `settings`.
///
/// Random layouts place obstacles first, then targets around them. A batch
/// that times out falls back to the fixed layout.
pub fn generate_arena<C: Clock>(settings: &Settings, clock: &C) -> Arena {
    let (width, height) = (settings.arena_width, settings.arena_height);
    let layout = &settings.layout;

    if layout.mode == LayoutMode::Fixed {
        log::info!("Using fixed layout");
        return fixed_arena(width, height);
    }

    let mut rng = Pcg32::seed_from_u64(layout.seed);
    let area = placement_area(width, height, layout.margin);
    let mut generator = LayoutGenerator::new(&mut rng, clock, area, layout);

    let obstacles = generator.obstacles(layout.obstacle_count, &[], &[]);
    if obstacles.is_empty() && layout.obstacle_count > 0 {
        log::warn!("Random obstacles failed, falling back to fixed layout");
        return fixed_arena(width, height);
    }

    let targets = generator.targets(layout.target_count, &obstacles, &[]);
    if targets.is_empty() && layout.target_count > 0 {
        log::warn!("Random targets failed, falling back to fixed layout");
        return fixed_arena(width, height);
    }

    log::info!(
        "Random layout (seed {}): {} obstacles, {} targets",
        layout.seed,
        obstacles.len(),
        targets.len()
    );
    Arena::with_shapes(width, height, targets, obstacles)
}
