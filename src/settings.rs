//! Simulation settings
//!
//! Physics constants and arena layout parameters. Everything here is fixed
//! for the duration of a throw. Settings round-trip through JSON so a run can
//! be reproduced from a file.

use std::fs;
use std::path::Path;
use std::time::Duration;

use glam::Vec2;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::*;
use crate::sim::geometry::Rect;

/// Errors from loading or validating settings
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to read settings: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse settings: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("setting '{name}' = {value} is outside {range}")]
    OutOfRange {
        name: &'static str,
        value: f32,
        range: &'static str,
    },
}

/// How a breaking hit treats a layered obstacle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ObstacleDurability {
    /// Any breaking hit removes the whole obstacle
    #[default]
    Single,
    /// A breaking hit strips one layer; the obstacle goes when none are left
    Layered,
}

/// Physics constants for a throw
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsConstants {
    /// Ticks per second
    pub tick_rate: u32,
    /// Drag distance to launch speed factor
    pub velocity_scale: f32,
    /// Speed lost along a non-impact axis on contact (0-1)
    pub friction: f32,
    /// Speed kept along an impact axis on bounce (0-1)
    pub elasticity: f32,
    /// Downward acceleration
    pub gravity: f32,
    /// Calibration multiplier for gravity and velocity scale
    pub time_metric: f32,
    /// Squared per-axis speed below which the projectile settles
    pub rest_threshold: f32,
    /// Seconds a settled projectile stays on screen
    pub rest_grace: f32,
    pub obstacle_durability: ObstacleDurability,
}

impl Default for PhysicsConstants {
    fn default() -> Self {
        Self {
            tick_rate: TICK_RATE,
            velocity_scale: VELOCITY_SCALE,
            friction: FRICTION,
            elasticity: ELASTICITY,
            gravity: GRAVITY,
            time_metric: TIME_METRIC,
            rest_threshold: REST_THRESHOLD,
            rest_grace: REST_GRACE_SECS,
            obstacle_durability: ObstacleDurability::Single,
        }
    }
}

impl PhysicsConstants {
    /// Gravity in arena units per tick squared
    #[inline]
    pub fn effective_gravity(&self) -> f32 {
        self.gravity * self.time_metric
    }

    /// Launch speed per unit of drag distance
    #[inline]
    pub fn effective_velocity_scale(&self) -> f32 {
        self.velocity_scale * self.time_metric
    }

    /// Wall-clock length of one tick
    pub fn tick_length(&self) -> Duration {
        Duration::from_nanos(1_000_000_000 / u64::from(self.tick_rate.max(1)))
    }

    pub fn rest_grace_duration(&self) -> Duration {
        seconds(self.rest_grace)
    }

    pub fn validate(&self) -> Result<(), SettingsError> {
        if self.tick_rate == 0 {
            return Err(SettingsError::OutOfRange {
                name: "tick_rate",
                value: 0.0,
                range: "[1, ∞)",
            });
        }
        check_unit("friction", self.friction)?;
        check_unit("elasticity", self.elasticity)?;
        check_positive("gravity", self.gravity)?;
        check_positive("velocity_scale", self.velocity_scale)?;
        check_positive("time_metric", self.time_metric)?;
        check_non_negative("rest_threshold", self.rest_threshold)?;
        check_seconds("rest_grace", self.rest_grace)?;
        Ok(())
    }
}

/// Fixed hand-made arena or a random one
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum LayoutMode {
    #[default]
    Fixed,
    Random,
}

/// Parameters for arena generation
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutSettings {
    pub mode: LayoutMode,
    /// RNG seed for random layouts
    pub seed: u64,
    pub target_count: usize,
    pub target_radius_min: f32,
    pub target_radius_max: f32,
    pub obstacle_count: usize,
    pub short_side_min: f32,
    pub short_side_max: f32,
    pub long_side_min: f32,
    pub long_side_max: f32,
    /// Wall-clock budget (seconds) for a whole batch
    pub generation_timeout: f32,
    /// Keep-out band along the arena edges
    pub margin: f32,
    /// Region random shapes must stay clear of (usually around the catapult)
    pub launch_zone: Option<Rect>,
}

impl Default for LayoutSettings {
    fn default() -> Self {
        Self {
            mode: LayoutMode::Fixed,
            seed: 0,
            target_count: 3,
            target_radius_min: 20.0,
            target_radius_max: 35.0,
            obstacle_count: 5,
            short_side_min: 20.0,
            short_side_max: 50.0,
            long_side_min: 100.0,
            long_side_max: 300.0,
            generation_timeout: GENERATION_TIMEOUT_SECS,
            margin: 10.0,
            launch_zone: Some(Rect::from_corners(
                Vec2::new(0.0, LAUNCH_Y - 150.0),
                Vec2::new(LAUNCH_X + 100.0, ARENA_HEIGHT),
            )),
        }
    }
}

impl LayoutSettings {
    pub fn timeout(&self) -> Duration {
        seconds(self.generation_timeout)
    }

    pub fn validate(&self) -> Result<(), SettingsError> {
        check_positive("target_radius_min", self.target_radius_min)?;
        check_ordered("target_radius_max", self.target_radius_min, self.target_radius_max)?;
        check_positive("short_side_min", self.short_side_min)?;
        check_ordered("short_side_max", self.short_side_min, self.short_side_max)?;
        check_positive("long_side_min", self.long_side_min)?;
        check_ordered("long_side_max", self.long_side_min, self.long_side_max)?;
        check_seconds("generation_timeout", self.generation_timeout)?;
        check_non_negative("margin", self.margin)?;
        Ok(())
    }
}

/// Top-level settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub arena_width: f32,
    pub arena_height: f32,
    /// Catapult position
    pub launch_point: Vec2,
    pub projectile_radius: f32,
    pub physics: PhysicsConstants,
    pub layout: LayoutSettings,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            arena_width: ARENA_WIDTH,
            arena_height: ARENA_HEIGHT,
            launch_point: Vec2::new(LAUNCH_X, LAUNCH_Y),
            projectile_radius: PROJECTILE_RADIUS,
            physics: PhysicsConstants::default(),
            layout: LayoutSettings::default(),
        }
    }
}

impl Settings {
    /// Read and validate settings from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let json = fs::read_to_string(path)?;
        let settings: Settings = serde_json::from_str(&json)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Load settings, falling back to defaults on any error
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        match Self::load(path) {
            Ok(settings) => {
                log::info!("Loaded settings from {}", path.display());
                settings
            }
            Err(e) => {
                log::warn!("Using default settings ({})", e);
                Self::default()
            }
        }
    }

    /// Write settings as pretty JSON
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), SettingsError> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }

    pub fn validate(&self) -> Result<(), SettingsError> {
        check_positive("arena_width", self.arena_width)?;
        check_positive("arena_height", self.arena_height)?;
        check_positive("projectile_radius", self.projectile_radius)?;
        self.physics.validate()?;
        self.layout.validate()
    }
}

/// Seconds to a `Duration`, clamped to `[0, MAX_WAIT_SECS]`; NaN reads as zero
fn seconds(secs: f32) -> Duration {
    Duration::try_from_secs_f32(secs.clamp(0.0, MAX_WAIT_SECS)).unwrap_or_default()
}

fn check_seconds(name: &'static str, value: f32) -> Result<(), SettingsError> {
    if (0.0..=MAX_WAIT_SECS).contains(&value) {
        Ok(())
    } else {
        Err(SettingsError::OutOfRange {
            name,
            value,
            range: "[0, 3600]",
        })
    }
}

fn check_unit(name: &'static str, value: f32) -> Result<(), SettingsError> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(SettingsError::OutOfRange {
            name,
            value,
            range: "[0, 1]",
        })
    }
}

fn check_positive(name: &'static str, value: f32) -> Result<(), SettingsError> {
    if value > 0.0 {
        Ok(())
    } else {
        Err(SettingsError::OutOfRange {
            name,
            value,
            range: "(0, ∞)",
        })
    }
}

fn check_non_negative(name: &'static str, value: f32) -> Result<(), SettingsError> {
    if value >= 0.0 {
        Ok(())
    } else {
        Err(SettingsError::OutOfRange {
            name,
            value,
            range: "[0, ∞)",
        })
    }
}

fn check_ordered(name: &'static str, min: f32, max: f32) -> Result<(), SettingsError> {
    if max >= min {
        Ok(())
    } else {
        Err(SettingsError::OutOfRange {
            name,
            value: max,
            range: "[min, ∞)",
        })
    }
}
