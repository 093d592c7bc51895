//! Tick pacing
//!
//! `Pacer` mirrors a blocking loop: compute, render, then sleep out whatever
//! is left of the tick. A slow tick simply runs late; there is no catch-up.
//! `FixedStep` is the frame-driven alternative for hosts that own their own
//! loop: feed it frame time and run the number of ticks it returns.

use std::time::Duration;

use super::time::Clock;

/// Maximum ticks run for a single frame to prevent a spiral of death
pub const MAX_SUBSTEPS: u32 = 8;

/// Sleeps the remainder of each tick against an injected clock
#[derive(Debug)]
pub struct Pacer<C: Clock> {
    clock: C,
    tick_length: Duration,
    boundary: Duration,
}

impl<C: Clock> Pacer<C> {
    pub fn new(clock: C, tick_length: Duration) -> Self {
        let boundary = clock.now();
        Self {
            clock,
            tick_length,
            boundary,
        }
    }

    pub fn tick_length(&self) -> Duration {
        self.tick_length
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    /// Start a new tick boundary now
    pub fn reset(&mut self) {
        self.boundary = self.clock.now();
    }

    /// Finish the current tick, sleeping if it ran short.
    ///
    /// Returns the compute time measured for the tick.
    pub fn wait(&mut self) -> Duration {
        let elapsed = self.clock.now().saturating_sub(self.boundary);
        log::trace!("tick compute {:?}", elapsed);
        if elapsed < self.tick_length {
            self.clock.sleep(self.tick_length - elapsed);
        }
        self.boundary = self.clock.now();
        elapsed
    }

    /// Suspend for a fixed hold (outside tick accounting)
    pub fn hold(&mut self, duration: Duration) {
        self.clock.sleep(duration);
        self.boundary = self.clock.now();
    }
}

/// Fixed-timestep accumulator
#[derive(Debug, Clone)]
pub struct FixedStep {
    dt: Duration,
    accumulator: Duration,
    max_substeps: u32,
    max_frame: Duration,
}

impl FixedStep {
    pub fn new(dt: Duration) -> Self {
        Self {
            dt,
            accumulator: Duration::ZERO,
            max_substeps: MAX_SUBSTEPS,
            max_frame: Duration::from_millis(100),
        }
    }

    pub fn with_max_substeps(mut self, max_substeps: u32) -> Self {
        self.max_substeps = max_substeps;
        self
    }

    /// Add a frame's elapsed time and return how many ticks to run
    pub fn advance(&mut self, frame: Duration) -> u32 {
        if self.dt.is_zero() {
            return 0;
        }
        self.accumulator += frame.min(self.max_frame);

        let mut steps = 0;
        while self.accumulator >= self.dt && steps < self.max_substeps {
            self.accumulator -= self.dt;
            steps += 1;
        }
        steps
    }

    /// Leftover time as a fraction of a tick (for interpolation)
    pub fn alpha(&self) -> f32 {
        if self.dt.is_zero() {
            return 0.0;
        }
        self.accumulator.as_secs_f32() / self.dt.as_secs_f32()
    }

    pub fn clear(&mut self) {
        self.accumulator = Duration::ZERO;
    }
}
