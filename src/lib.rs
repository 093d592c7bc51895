//! Catapult - projectile simulation against destructible obstacles and targets
//!
//! Core modules:
//! - `sim`: Deterministic simulation (kinematics, collisions, arena layout)
//! - `platform`: Time source and tick pacing
//! - `renderer`: Rendering collaborator interface
//! - `throw`: Per-throw loop (blocking or frame-driven)
//! - `settings`: Physics and layout configuration

pub mod platform;
pub mod renderer;
pub mod settings;
pub mod sim;
pub mod throw;

pub use settings::{LayoutMode, LayoutSettings, ObstacleDurability, PhysicsConstants, Settings};
pub use throw::{CancelToken, ThrowOutcome, ThrowReport, ThrowSession, run_throw};

/// Simulation configuration defaults
pub mod consts {
    /// Ticks per second
    pub const TICK_RATE: u32 = 60;
    /// Drag distance to launch speed factor (before time metric)
    pub const VELOCITY_SCALE: f32 = 10.0;
    /// Fraction of speed lost along a non-impact axis on contact
    pub const FRICTION: f32 = 0.3;
    /// Fraction of speed kept along an impact axis on bounce
    pub const ELASTICITY: f32 = 0.6;
    /// Gravitational acceleration (before time metric)
    pub const GRAVITY: f32 = 9.8;
    /// Calibration applied to gravity and velocity scale
    pub const TIME_METRIC: f32 = 0.01;
    /// Squared per-axis speed below which a projectile is at rest
    pub const REST_THRESHOLD: f32 = 1.0;
    /// Seconds a resting projectile stays visible
    pub const REST_GRACE_SECS: f32 = 0.5;

    /// Arena dimensions
    pub const ARENA_WIDTH: f32 = 1100.0;
    pub const ARENA_HEIGHT: f32 = 700.0;

    /// Catapult position
    pub const LAUNCH_X: f32 = 100.0;
    pub const LAUNCH_Y: f32 = 500.0;

    /// Projectile visual radius
    pub const PROJECTILE_RADIUS: f32 = 5.0;
    /// Arrow indicator shown while the projectile is above the arena
    pub const ARROW_TAIL_Y: f32 = 10.0;
    pub const ARROW_TIP_Y: f32 = 2.0;

    /// Random layout budget in seconds
    pub const GENERATION_TIMEOUT_SECS: f32 = 30.0;
    /// Upper bound for configured waits (grace hold, layout budget)
    pub const MAX_WAIT_SECS: f32 = 3600.0;
    /// Obstacle layers range (grade)
    pub const MIN_LAYERS: u8 = 1;
    pub const MAX_LAYERS: u8 = 3;
}
