//! Platform abstraction layer
//!
//! Time is injected so the simulation never reads the wall clock directly:
//! - `time`: monotonic clock trait with real and manual implementations
//! - `pacing`: per-tick sleep pacing and a fixed-timestep accumulator

pub mod pacing;
pub mod time;

pub use pacing::{FixedStep, Pacer};
pub use time::{Clock, ManualClock, SystemClock};
