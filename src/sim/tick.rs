//! Fixed timestep projectile integration
//!
//! Each tick advances the projectile along its current arc using closed-form
//! kinematics, then resolves at most one contact. A contact reflects or damps
//! each axis independently, mutates the arena, and either settles the
//! projectile or restarts the arc from the last free position.

use glam::Vec2;

use super::collision::{Contact, ShapeKey, find_arena_collision};
use super::geometry::Point;
use super::state::{Arena, Projectile, ThrowPhase};
use crate::settings::{ObstacleDurability, PhysicsConstants};

/// What a contact did to the struck shape
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImpactEffect {
    TargetDestroyed,
    ObstacleDestroyed,
    /// A layer came off; the obstacle survives with this many left
    ObstacleDamaged { layers_left: u8 },
    /// The obstacle took the hit without damage
    Absorbed,
}

impl ImpactEffect {
    /// The struck shape left the arena
    pub fn removed(&self) -> bool {
        matches!(
            self,
            ImpactEffect::TargetDestroyed | ImpactEffect::ObstacleDestroyed
        )
    }
}

/// A resolved contact
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Impact {
    pub key: ShapeKey,
    /// The x movement caused the penetration
    pub side: bool,
    /// The y movement caused the penetration
    pub vertical: bool,
    pub effect: ImpactEffect,
    /// Velocity after the response (x right, y up)
    pub velocity: Vec2,
}

/// Result of a single tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TickEvent {
    /// Free flight to `pos`
    Moved { pos: Point },
    /// Contact resolved; a new arc starts from `pos`
    Bounced { pos: Point, impact: Impact },
    /// Contact resolved and the projectile is now at rest at `pos`
    Settled { pos: Point, impact: Impact },
    /// The projectile was outside the arena at the start of the tick
    OutOfBounds { pos: Point },
    /// The throw had already ended; nothing changed
    Finished(ThrowPhase),
}

/// Decide which axes caused a penetration.
///
/// Each axis is tested by moving only the other one: if the point with the
/// old x and new y is clear of the shape, the x movement did the damage.
/// When neither test clears (a clipped corner, or starting inside a shape)
/// the contact counts as a side impact.
pub fn classify_impact(prev: Point, next: Point, contact: &Contact) -> (bool, bool) {
    let side = !contact.shape.contains(prev.x, next.y);
    let vertical = !contact.shape.contains(next.x, prev.y);
    if side || vertical {
        (side, vertical)
    } else {
        (true, false)
    }
}

/// Velocity response to a contact at arc time `t` (already advanced)
pub fn respond(vel: Vec2, t: u32, side: bool, vertical: bool, physics: &PhysicsConstants) -> Vec2 {
    let keep = 1.0 - physics.friction;
    let ux = if side {
        -vel.x * physics.elasticity
    } else {
        vel.x * keep
    };
    // Closed-form flight never updates uy, so fold in the gravity gained so far
    let uy = vel.y - physics.effective_gravity() * t as f32;
    let uy = if vertical {
        -uy * physics.elasticity
    } else {
        uy * keep
    };
    Vec2::new(ux, uy)
}

/// Apply a contact to the arena. Removal happens here, inside the tick, so
/// the next collision query never sees a half-removed shape.
fn strike(
    arena: &mut Arena,
    key: ShapeKey,
    can_break: bool,
    durability: ObstacleDurability,
) -> ImpactEffect {
    match key {
        ShapeKey::Target(id) => {
            arena.targets.remove(id);
            ImpactEffect::TargetDestroyed
        }
        ShapeKey::Obstacle(_) if !can_break => ImpactEffect::Absorbed,
        ShapeKey::Obstacle(id) => match durability {
            ObstacleDurability::Single => {
                arena.obstacles.remove(id);
                ImpactEffect::ObstacleDestroyed
            }
            ObstacleDurability::Layered => {
                let Some(obstacle) = arena.obstacles.get_mut(id) else {
                    return ImpactEffect::Absorbed;
                };
                if obstacle.strip_layer() {
                    arena.obstacles.remove(id);
                    ImpactEffect::ObstacleDestroyed
                } else {
                    ImpactEffect::ObstacleDamaged {
                        layers_left: obstacle.layers,
                    }
                }
            }
        },
    }
}

/// Advance the projectile by one tick
pub fn tick(projectile: &mut Projectile, arena: &mut Arena, physics: &PhysicsConstants) -> TickEvent {
    if projectile.phase.is_terminal() {
        return TickEvent::Finished(projectile.phase);
    }

    let prev = projectile.pos;
    if arena.out_of_bounds(prev) {
        projectile.phase = ThrowPhase::OutOfBounds;
        log::info!("Projectile left the arena at ({:.1}, {:.1})", prev.x, prev.y);
        return TickEvent::OutOfBounds { pos: prev };
    }

    let next = projectile.position_at(projectile.t, physics.effective_gravity());
    projectile.t += 1;

    let Some(contact) = find_arena_collision(next.x, next.y, arena) else {
        projectile.pos = next;
        return TickEvent::Moved { pos: next };
    };

    let (side, vertical) = classify_impact(prev, next, &contact);
    let velocity = respond(projectile.vel, projectile.t, side, vertical, physics);
    let effect = strike(
        arena,
        contact.key,
        projectile.can_break,
        physics.obstacle_durability,
    );

    projectile.impacts += 1;
    projectile.vel = velocity;
    projectile.pos = prev;
    projectile.can_break = false;

    let impact = Impact {
        key: contact.key,
        side,
        vertical,
        effect,
        velocity,
    };
    log::debug!(
        "Impact #{} with {:?}: side={} vertical={} {:?} -> vel ({:.3}, {:.3})",
        projectile.impacts,
        contact.key,
        side,
        vertical,
        effect,
        velocity.x,
        velocity.y
    );

    let threshold = physics.rest_threshold;
    if velocity.x * velocity.x < threshold && velocity.y * velocity.y < threshold {
        projectile.phase = ThrowPhase::AtRest;
        log::info!(
            "Projectile at rest at ({:.1}, {:.1}) after {} impacts",
            prev.x,
            prev.y,
            projectile.impacts
        );
        return TickEvent::Settled { pos: prev, impact };
    }

    // New arc from the last free position
    projectile.origin = prev;
    projectile.t = 1;
    TickEvent::Bounced { pos: prev, impact }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::shape::{Obstacle, Target};
    use crate::sim::state::ShapeId;

    /// Unit-scaled physics so positions are easy to compute by hand
    fn physics(gravity: f32, elasticity: f32, friction: f32) -> PhysicsConstants {
        PhysicsConstants {
            velocity_scale: 1.0,
            time_metric: 1.0,
            gravity,
            elasticity,
            friction,
            rest_threshold: 1.0,
            ..Default::default()
        }
    }

    fn run_to_end(p: &mut Projectile, arena: &mut Arena, physics: &PhysicsConstants) -> Vec<TickEvent> {
        let mut events = Vec::new();
        for _ in 0..100_000 {
            let event = tick(p, arena, physics);
            if matches!(event, TickEvent::Finished(_)) {
                return events;
            }
            events.push(event);
        }
        panic!("throw never ended");
    }

    #[test]
    fn test_suvat_first_ticks() {
        let physics = physics(0.5, 0.5, 0.3);
        let mut arena = Arena::new(1000.0, 1000.0);
        let start = Vec2::new(100.0, 500.0);
        let mut p = Projectile::launch(start, Vec2::new(80.0, 520.0), &physics);
        assert_eq!(p.vel, Vec2::new(20.0, 20.0));

        // Tick at t = 0 stays on the catapult
        assert_eq!(tick(&mut p, &mut arena, &physics), TickEvent::Moved { pos: start });

        for t in 1..=5u32 {
            let tf = t as f32;
            let expected = Vec2::new(100.0 + 20.0 * tf, 500.0 - (20.0 * tf - 0.25 * tf * tf));
            match tick(&mut p, &mut arena, &physics) {
                TickEvent::Moved { pos } => {
                    assert!((pos - expected).length() < 1e-3, "t={t}: {pos} vs {expected}")
                }
                other => panic!("unexpected {other:?}"),
            }
        }
        // t=5: (200, 406.25)
        assert!((p.pos - Vec2::new(200.0, 406.25)).length() < 1e-3);
        assert_eq!(p.t, 6);
    }

    #[test]
    fn test_straight_up_moves_up_first() {
        let physics = physics(0.5, 0.5, 0.3);
        let mut arena = Arena::new(1000.0, 1000.0);
        // Pull straight down from the catapult
        let mut p = Projectile::launch(Vec2::new(300.0, 500.0), Vec2::new(300.0, 560.0), &physics);
        assert_eq!(p.vel.x, 0.0);
        assert!(p.vel.y > 0.0);

        tick(&mut p, &mut arena, &physics);
        let mut last_y = p.pos.y;
        for _ in 0..5 {
            tick(&mut p, &mut arena, &physics);
            assert_eq!(p.pos.x, 300.0);
            assert!(p.pos.y < last_y);
            last_y = p.pos.y;
        }
    }

    #[test]
    fn test_above_arena_is_not_out_of_bounds() {
        let physics = physics(0.5, 0.5, 0.3);
        let mut arena = Arena::new(1000.0, 600.0);
        let mut p = Projectile::launch(Vec2::new(300.0, 100.0), Vec2::new(300.0, 300.0), &physics);
        for _ in 0..5 {
            tick(&mut p, &mut arena, &physics);
        }
        assert!(p.pos.y < 0.0);
        assert_eq!(p.phase, ThrowPhase::Flying);
    }

    #[test]
    fn test_out_of_bounds_checked_before_moving() {
        let physics = physics(0.5, 0.5, 0.3);
        let mut arena = Arena::new(1000.0, 600.0);
        let mut p = Projectile::launch(Vec2::new(0.0, 300.0), Vec2::new(-20.0, 300.0), &physics);
        let event = tick(&mut p, &mut arena, &physics);
        assert_eq!(event, TickEvent::OutOfBounds { pos: Vec2::new(0.0, 300.0) });
        assert_eq!(p.phase, ThrowPhase::OutOfBounds);
        assert_eq!(p.t, 0);
        assert_eq!(tick(&mut p, &mut arena, &physics), TickEvent::Finished(ThrowPhase::OutOfBounds));
    }

    #[test]
    fn test_vertical_impact_reflects_with_gravity_impulse() {
        let physics = physics(1.0, 0.8, 0.3);
        let floor = Obstacle::new(Vec2::new(0.0, 110.0), Vec2::new(1000.0, 200.0), 1);
        let mut arena = Arena::with_shapes(1000.0, 600.0, [], [floor]);
        let start = Vec2::new(100.0, 100.0);
        let mut p = Projectile::launch(start, start, &physics);

        // y: 100, 100.5, 102, 104.5, 108, then 112.5 is inside the floor
        let mut event = tick(&mut p, &mut arena, &physics);
        for _ in 0..5 {
            event = tick(&mut p, &mut arena, &physics);
        }
        let TickEvent::Bounced { pos, impact } = event else {
            panic!("expected bounce, got {event:?}");
        };
        assert_eq!(pos, Vec2::new(100.0, 108.0));
        assert!(!impact.side);
        assert!(impact.vertical);
        assert_eq!(impact.effect, ImpactEffect::ObstacleDestroyed);
        // uy before = 0 - 1 * 6, reflected and scaled by 0.8
        assert!((impact.velocity.y - 4.8).abs() < 1e-4);
        assert_eq!(impact.velocity.x, 0.0);
        assert_eq!(p.t, 1);
        assert_eq!(p.origin, Vec2::new(100.0, 108.0));
        assert!(!p.can_break);
        assert!(arena.obstacles.is_empty());

        // New arc starts from the bounce point
        tick(&mut p, &mut arena, &physics);
        assert!((p.pos.y - (108.0 - (4.8 - 0.5))).abs() < 1e-4);
    }

    #[test]
    fn test_side_impact_damps_vertical() {
        let physics = physics(0.0, 0.5, 0.25);
        let wall = Obstacle::new(Vec2::new(200.0, 0.0), Vec2::new(220.0, 600.0), 1);
        let mut arena = Arena::with_shapes(1000.0, 600.0, [], [wall]);
        let mut p = Projectile::launch(Vec2::new(100.0, 300.0), Vec2::new(80.0, 290.0), &physics);
        assert_eq!(p.vel, Vec2::new(20.0, -10.0));

        // x reaches the wall at t = 5
        let events = (0..6).map(|_| tick(&mut p, &mut arena, &physics)).collect::<Vec<_>>();
        let TickEvent::Bounced { impact, .. } = events[5] else {
            panic!("expected bounce, got {:?}", events[5]);
        };
        assert!(impact.side);
        assert!(!impact.vertical);
        assert_eq!(impact.velocity, Vec2::new(-10.0, -7.5));
    }

    #[test]
    fn test_start_inside_shape_falls_back_to_side_impact() {
        let physics = physics(0.0, 0.5, 0.0);
        let block = Obstacle::new(Vec2::new(100.0, 100.0), Vec2::new(200.0, 200.0), 1);
        let mut arena = Arena::with_shapes(1000.0, 600.0, [], [block]);
        let mut p = Projectile::launch(Vec2::new(150.0, 150.0), Vec2::new(130.0, 150.0), &physics);

        let TickEvent::Bounced { impact, .. } = tick(&mut p, &mut arena, &physics) else {
            panic!("expected bounce");
        };
        assert!(impact.side);
        assert!(!impact.vertical);
        assert_eq!(impact.velocity.x, -10.0);
    }

    #[test]
    fn test_diagonal_corner_hit_reflects_both_axes() {
        let physics = physics(0.0, 0.5, 0.3);
        let block = Obstacle::new(Vec2::new(115.0, 115.0), Vec2::new(300.0, 300.0), 1);
        let mut arena = Arena::with_shapes(1000.0, 600.0, [], [block]);
        let mut p = Projectile::launch(Vec2::new(100.0, 100.0), Vec2::new(90.0, 90.0), &physics);
        assert_eq!(p.vel, Vec2::new(10.0, -10.0));

        // (100, 100) -> (110, 110) -> (120, 120) lands past the corner
        let events = (0..3).map(|_| tick(&mut p, &mut arena, &physics)).collect::<Vec<_>>();
        let TickEvent::Bounced { pos, impact } = events[2] else {
            panic!("expected bounce, got {:?}", events[2]);
        };
        assert_eq!(pos, Vec2::new(110.0, 110.0));
        assert!(impact.side);
        assert!(impact.vertical);
        assert_eq!(impact.velocity, Vec2::new(-5.0, 5.0));
    }

    #[test]
    fn test_circle_clip_falls_back_to_side_impact() {
        let mut physics = physics(0.0, 0.5, 0.0);
        physics.rest_threshold = 1e-4;
        let mut arena = Arena::with_shapes(1000.0, 600.0, [Target::new(300.0, 300.0, 10.0)], []);
        let start = Vec2::new(292.8, 292.8);
        let mut p = Projectile::launch(start, Vec2::new(292.4, 292.4), &physics);

        // Moving either axis alone still lands inside the circle
        let contact = Contact {
            key: ShapeKey::Target(ShapeId(0)),
            shape: crate::sim::shape::Shape::from(&Target::new(300.0, 300.0, 10.0)),
        };
        assert_eq!(
            classify_impact(start, Vec2::new(293.2, 293.2), &contact),
            (true, false)
        );

        assert_eq!(tick(&mut p, &mut arena, &physics), TickEvent::Moved { pos: start });
        let TickEvent::Bounced { impact, .. } = tick(&mut p, &mut arena, &physics) else {
            panic!("expected bounce");
        };
        assert!(impact.side);
        assert!(!impact.vertical);
        assert_eq!(impact.effect, ImpactEffect::TargetDestroyed);
        assert!((impact.velocity.x + 0.2).abs() < 1e-4);
        assert!((impact.velocity.y + 0.4).abs() < 1e-4);
    }

    #[test]
    fn test_only_one_obstacle_breaks_per_throw() {
        let physics = physics(0.5, 1.0, 0.0);
        let left = Obstacle::new(Vec2::new(20.0, 0.0), Vec2::new(40.0, 2000.0), 1);
        let right_a = Obstacle::new(Vec2::new(400.0, 0.0), Vec2::new(420.0, 2000.0), 1);
        let right_b = Obstacle::new(Vec2::new(400.0, 0.0), Vec2::new(420.0, 2000.0), 1);
        let mut arena = Arena::with_shapes(1000.0, 2000.0, [], [left, right_a, right_b]);
        let mut p = Projectile::launch(Vec2::new(100.0, 300.0), Vec2::new(80.0, 300.0), &physics);

        let events = run_to_end(&mut p, &mut arena, &physics);
        let bounces = events
            .iter()
            .filter(|e| matches!(e, TickEvent::Bounced { .. }))
            .count();
        assert!(bounces >= 3, "expected several bounces, got {bounces}");
        assert_eq!(p.phase, ThrowPhase::OutOfBounds);
        assert_eq!(arena.obstacles.len(), 2);
        // The newest wall on top was the one broken
        assert!(arena.obstacles.get(ShapeId(2)).is_none());
    }

    #[test]
    fn test_target_hit_uses_up_breaking() {
        let physics = physics(0.0, 0.5, 0.0);
        let target = Target::new(300.0, 300.0, 10.0);
        let left = Obstacle::new(Vec2::new(20.0, 0.0), Vec2::new(40.0, 600.0), 1);
        let right = Obstacle::new(Vec2::new(500.0, 0.0), Vec2::new(520.0, 600.0), 1);
        let mut arena = Arena::with_shapes(1000.0, 600.0, [target], [left, right]);
        let mut p = Projectile::launch(Vec2::new(100.0, 300.0), Vec2::new(80.0, 300.0), &physics);

        let events = run_to_end(&mut p, &mut arena, &physics);
        let first_impact = events.iter().find_map(|e| match e {
            TickEvent::Bounced { impact, .. } => Some(*impact),
            _ => None,
        });
        assert_eq!(first_impact.map(|i| i.effect), Some(ImpactEffect::TargetDestroyed));
        assert!(arena.is_cleared());
        assert_eq!(arena.obstacles.len(), 2);
        assert_eq!(p.phase, ThrowPhase::AtRest);
        assert!(events[..events.len() - 1]
            .iter()
            .all(|e| !matches!(e, TickEvent::Settled { .. })));
    }

    #[test]
    fn test_settles_on_slow_contact_and_stops() {
        let physics = physics(1.0, 0.1, 0.5);
        let floor = Obstacle::new(Vec2::new(0.0, 110.0), Vec2::new(1000.0, 200.0), 1);
        let mut arena = Arena::with_shapes(1000.0, 600.0, [], [floor]);
        let mut p = Projectile::launch(Vec2::new(100.0, 100.0), Vec2::new(99.5, 100.0), &physics);

        let events = run_to_end(&mut p, &mut arena, &physics);
        let last = *events.last().unwrap();
        let TickEvent::Settled { pos, impact } = last else {
            panic!("expected settle, got {last:?}");
        };
        assert!((pos - Vec2::new(102.0, 108.0)).length() < 1e-4);
        assert!((impact.velocity.x - 0.25).abs() < 1e-5);
        assert!((impact.velocity.y - 0.6).abs() < 1e-5);
        assert_eq!(p.phase, ThrowPhase::AtRest);

        let before = p.pos;
        assert_eq!(tick(&mut p, &mut arena, &physics), TickEvent::Finished(ThrowPhase::AtRest));
        assert_eq!(p.pos, before);
    }

    #[test]
    fn test_layered_obstacle_loses_one_layer() {
        let mut physics = physics(0.0, 0.5, 0.0);
        physics.obstacle_durability = ObstacleDurability::Layered;
        let wall = Obstacle::new(Vec2::new(200.0, 0.0), Vec2::new(220.0, 600.0), 3);
        let mut arena = Arena::with_shapes(1000.0, 600.0, [], [wall]);
        let mut p = Projectile::launch(Vec2::new(100.0, 300.0), Vec2::new(80.0, 300.0), &physics);

        let event = (0..10)
            .map(|_| tick(&mut p, &mut arena, &physics))
            .find(|e| matches!(e, TickEvent::Bounced { .. }))
            .unwrap();
        let TickEvent::Bounced { impact, .. } = event else { unreachable!() };
        assert_eq!(impact.effect, ImpactEffect::ObstacleDamaged { layers_left: 2 });
        assert_eq!(arena.obstacles.get(ShapeId(0)).map(|o| o.layers), Some(2));
    }

    #[test]
    fn test_absorbed_hit_leaves_obstacle() {
        let physics = physics(0.0, 0.5, 0.0);
        let mut arena = Arena::with_shapes(
            1000.0,
            600.0,
            [],
            [Obstacle::new(Vec2::new(200.0, 0.0), Vec2::new(220.0, 600.0), 1)],
        );
        let mut p = Projectile::launch(Vec2::new(100.0, 300.0), Vec2::new(80.0, 300.0), &physics);
        p.can_break = false;

        let hit = (0..10)
            .map(|_| tick(&mut p, &mut arena, &physics))
            .find_map(|e| match e {
                TickEvent::Bounced { impact, .. } => Some(impact),
                _ => None,
            })
            .unwrap();
        assert_eq!(hit.effect, ImpactEffect::Absorbed);
        assert!(!hit.effect.removed());
        assert_eq!(arena.obstacles.len(), 1);
    }
}
