//! Catapult entry point
//!
//! Headless native driver: loads settings, builds the arena and plays a few
//! demo throws through a recording renderer. Drawing and real input belong to
//! the host application; run with `RUST_LOG=debug` to watch each impact.

use glam::Vec2;

use catapult::platform::{Pacer, SystemClock};
use catapult::renderer::{RecordingRenderer, Renderer, draw_arena};
use catapult::sim::generate_arena;
use catapult::{CancelToken, Settings, ThrowOutcome, run_throw};

/// Drag offsets (release minus catapult) for the demo throws
const DEMO_DRAGS: [(f32, f32); 3] = [(-120.0, 90.0), (-200.0, 40.0), (-60.0, 160.0)];

fn main() {
    env_logger::init();
    log::info!("Catapult (native) starting...");

    let settings = match std::env::args().nth(1) {
        Some(path) => Settings::load_or_default(path),
        None => Settings::default(),
    };

    let clock = SystemClock::new();
    let mut arena = generate_arena(&settings, &clock);
    let mut renderer = RecordingRenderer::new(settings.arena_width, settings.arena_height);
    draw_arena(&mut renderer, &arena);
    log::info!(
        "Arena {}x{}: {} targets, {} obstacles",
        renderer.arena_width(),
        renderer.arena_height(),
        arena.targets_remaining(),
        arena.obstacles.len()
    );

    let mut pacer = Pacer::new(clock, settings.physics.tick_length());
    let cancel = CancelToken::new();
    let start = settings.launch_point;

    for (i, &(dx, dy)) in DEMO_DRAGS.iter().enumerate() {
        if arena.is_cleared() {
            break;
        }
        let release = start + Vec2::new(dx, dy);
        let report = run_throw(
            &mut arena,
            start,
            release,
            &settings,
            &mut renderer,
            &mut pacer,
            &cancel,
        );
        log::info!(
            "Throw {}: {:?} after {} ticks, {} targets left",
            i + 1,
            report.outcome,
            report.ticks,
            arena.targets_remaining()
        );
        if report.outcome == ThrowOutcome::Cancelled {
            break;
        }
        renderer.clear_calls();
    }

    if arena.is_cleared() {
        log::info!("All targets destroyed");
    }
    log::info!("Rendered {} frames", renderer.frames());
}
