//! Per-throw loop
//!
//! Runs one throw from release to termination: tick the integrator, mirror
//! arena changes to the renderer, present, then pace. `run_throw` blocks and
//! sleeps between ticks, checking a cancel token once per tick. Hosts that
//! own their frame loop drive a `ThrowSession` with frame times instead.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use glam::Vec2;

use crate::platform::{Clock, FixedStep, Pacer};
use crate::renderer::{DrawId, Drawable, Renderer, projectile_visual};
use crate::settings::{PhysicsConstants, Settings};
use crate::sim::{Arena, Impact, ImpactEffect, Point, Projectile, ShapeKey, TickEvent, tick};

/// How a throw ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThrowOutcome {
    OutOfBounds,
    AtRest,
    /// Stopped from outside between ticks
    Cancelled,
}

/// Summary of a finished throw
#[derive(Debug, Clone, PartialEq)]
pub struct ThrowReport {
    pub outcome: ThrowOutcome,
    pub ticks: u64,
    pub impacts: u32,
    pub targets_destroyed: u32,
    pub obstacles_destroyed: u32,
    /// Last committed projectile position
    pub final_pos: Point,
}

/// Shared stop flag for an in-flight throw
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Release);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}

/// Mirror a contact's arena change on screen
fn render_impact<R: Renderer + ?Sized>(renderer: &mut R, arena: &Arena, impact: &Impact) {
    match (impact.key, impact.effect) {
        (ShapeKey::Target(id), _) => renderer.remove_shape(DrawId::Target(id)),
        (ShapeKey::Obstacle(id), ImpactEffect::ObstacleDestroyed) => {
            renderer.remove_shape(DrawId::Obstacle(id))
        }
        (ShapeKey::Obstacle(id), ImpactEffect::ObstacleDamaged { .. }) => {
            if let Some(obstacle) = arena.obstacles.get(id) {
                renderer.draw_shape(
                    DrawId::Obstacle(id),
                    Drawable::Obstacle {
                        rect: obstacle.rect,
                        layers: obstacle.layers,
                    },
                );
            }
        }
        (ShapeKey::Obstacle(_), _) => {}
    }
}

/// Where a throw stands after one tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TickStep {
    Running,
    Settled,
    OutOfBounds,
}

/// A throw in progress
#[derive(Debug)]
pub struct ThrowSession {
    projectile: Projectile,
    physics: PhysicsConstants,
    radius: f32,
    report: ThrowReport,
    stepper: FixedStep,
    /// Hold left after settling (frame-driven mode)
    grace: Option<Duration>,
    finished: bool,
}

impl ThrowSession {
    /// Launch from `start` (catapult) toward `release` and draw the aim.
    ///
    /// The renderer owns the arena size; `arena` is resized to match it.
    pub fn launch<R: Renderer + ?Sized>(
        arena: &mut Arena,
        start: Point,
        release: Point,
        settings: &Settings,
        renderer: &mut R,
    ) -> Self {
        let size = Vec2::new(renderer.arena_width(), renderer.arena_height());
        if arena.size() != size {
            log::debug!(
                "Arena {}x{} resized to renderer {}x{}",
                arena.width,
                arena.height,
                size.x,
                size.y
            );
            arena.width = size.x;
            arena.height = size.y;
        }

        let physics = settings.physics.clone();
        let projectile = Projectile::launch(start, release, &physics);
        log::info!(
            "Launch from ({:.1}, {:.1}) with velocity ({:.3}, {:.3})",
            start.x,
            start.y,
            projectile.vel.x,
            projectile.vel.y
        );

        let radius = settings.projectile_radius;
        renderer.draw_shape(DrawId::Crosshair, Drawable::Crosshair(release));
        renderer.draw_shape(DrawId::Projectile, projectile_visual(start, radius));
        renderer.present_frame();

        Self {
            projectile,
            stepper: FixedStep::new(physics.tick_length()),
            physics,
            radius,
            report: ThrowReport {
                outcome: ThrowOutcome::Cancelled,
                ticks: 0,
                impacts: 0,
                targets_destroyed: 0,
                obstacles_destroyed: 0,
                final_pos: start,
            },
            grace: None,
            finished: false,
        }
    }

    /// Progress so far (final once the throw has ended)
    pub fn report(&self) -> &ThrowReport {
        &self.report
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Feed one frame's elapsed time and run the ticks it covers.
    ///
    /// Returns the report on the frame the throw ends, `None` otherwise.
    pub fn advance<R: Renderer + ?Sized>(
        &mut self,
        frame: Duration,
        arena: &mut Arena,
        renderer: &mut R,
    ) -> Option<ThrowReport> {
        if self.finished {
            return None;
        }
        if let Some(remaining) = self.grace {
            let left = remaining.saturating_sub(frame);
            if left.is_zero() {
                return Some(self.finish(ThrowOutcome::AtRest, renderer));
            }
            self.grace = Some(left);
            return None;
        }

        for _ in 0..self.stepper.advance(frame) {
            match self.step(arena, renderer) {
                TickStep::Running => {}
                TickStep::Settled => {
                    self.stepper.clear();
                    let grace = self.physics.rest_grace_duration();
                    if grace.is_zero() {
                        return Some(self.finish(ThrowOutcome::AtRest, renderer));
                    }
                    self.grace = Some(grace);
                    return None;
                }
                TickStep::OutOfBounds => {
                    return Some(self.finish(ThrowOutcome::OutOfBounds, renderer));
                }
            }
        }
        None
    }

    /// Stop the throw between ticks
    pub fn cancel<R: Renderer + ?Sized>(&mut self, renderer: &mut R) -> Option<ThrowReport> {
        if self.finished {
            return None;
        }
        log::info!("Throw cancelled after {} ticks", self.report.ticks);
        Some(self.finish(ThrowOutcome::Cancelled, renderer))
    }

    /// Run one tick and mirror it on screen
    fn step<R: Renderer + ?Sized>(&mut self, arena: &mut Arena, renderer: &mut R) -> TickStep {
        let event = tick(&mut self.projectile, arena, &self.physics);
        self.report.ticks += 1;

        let (pos, impact) = match event {
            TickEvent::Moved { pos } => (pos, None),
            TickEvent::Bounced { pos, impact } | TickEvent::Settled { pos, impact } => {
                (pos, Some(impact))
            }
            TickEvent::OutOfBounds { .. } | TickEvent::Finished(_) => {
                return TickStep::OutOfBounds;
            }
        };

        if let Some(impact) = impact {
            self.report.impacts += 1;
            match impact.effect {
                ImpactEffect::TargetDestroyed => self.report.targets_destroyed += 1,
                ImpactEffect::ObstacleDestroyed => self.report.obstacles_destroyed += 1,
                _ => {}
            }
            render_impact(renderer, arena, &impact);
        }

        self.report.final_pos = pos;
        renderer.remove_shape(DrawId::Projectile);
        renderer.draw_shape(DrawId::Projectile, projectile_visual(pos, self.radius));
        renderer.present_frame();

        if matches!(event, TickEvent::Settled { .. }) {
            TickStep::Settled
        } else {
            TickStep::Running
        }
    }

    fn finish<R: Renderer + ?Sized>(&mut self, outcome: ThrowOutcome, renderer: &mut R) -> ThrowReport {
        self.finished = true;
        self.grace = None;
        self.report.outcome = outcome;

        renderer.remove_shape(DrawId::Projectile);
        renderer.remove_shape(DrawId::Crosshair);
        renderer.present_frame();

        log::info!(
            "Throw ended {:?}: {} ticks, {} impacts, {} targets, {} obstacles destroyed",
            outcome,
            self.report.ticks,
            self.report.impacts,
            self.report.targets_destroyed,
            self.report.obstacles_destroyed
        );
        self.report.clone()
    }
}

/// Run a throw from `start` (catapult) toward `release` until it ends,
/// sleeping out each tick on `pacer`
pub fn run_throw<R, C>(
    arena: &mut Arena,
    start: Point,
    release: Point,
    settings: &Settings,
    renderer: &mut R,
    pacer: &mut Pacer<C>,
    cancel: &CancelToken,
) -> ThrowReport
where
    R: Renderer + ?Sized,
    C: Clock,
{
    let mut session = ThrowSession::launch(arena, start, release, settings, renderer);
    pacer.reset();

    loop {
        if cancel.is_cancelled() {
            log::info!("Throw cancelled after {} ticks", session.report.ticks);
            return session.finish(ThrowOutcome::Cancelled, renderer);
        }

        match session.step(arena, renderer) {
            TickStep::Running => {
                pacer.wait();
            }
            TickStep::Settled => {
                pacer.hold(session.physics.rest_grace_duration());
                return session.finish(ThrowOutcome::AtRest, renderer);
            }
            TickStep::OutOfBounds => {
                return session.finish(ThrowOutcome::OutOfBounds, renderer);
            }
        }
    }
}
