//! Platform abstraction layer
//!
//! Handles the native side of running the simulation:
//! - Time/ticks (fixed-step pacing over a swappable clock)
//! - Input events (scripted replays)

pub mod input;
pub mod time;

pub use input::{InputScript, ScriptError};
pub use time::{Clock, FixedStep, SystemClock};
