//! Figjam - a tile-based 2D action platformer
//!
//! Core modules:
//! - `sim`: Deterministic simulation (swept collision, entities, world state)
//! - `level`: Level file parsing into walls, ladders, connectors and spawns
//! - `game`: Level loading driver wrapped around the simulation
//! - `platform`: Native tick pacing and scripted input
//! - `settings`: JSON configuration
//! - `tuning`: Gameplay constants

pub mod game;
pub mod level;
pub mod platform;
pub mod settings;
pub mod sim;
pub mod tuning;

pub use game::Game;
pub use level::{LevelLayout, LevelLoadError, LevelSource};
pub use settings::{EntryPolicy, InputPreset, Settings};

/// Game configuration constants
pub mod consts {
    /// Edge length of one map tile in pixels
    pub const TILE_SIZE: f32 = 8.0;
    /// Screen size in tiles
    pub const FIELD_W_TILES: usize = 40;
    pub const FIELD_H_TILES: usize = 30;
    /// Screen size in pixels
    pub const FIELD_W: f32 = 320.0;
    pub const FIELD_H: f32 = 240.0;

    /// Fixed simulation timestep (100 Hz)
    pub const TICK_SECONDS: f64 = 0.01;

    /// Collision tolerance: sqrt(f32::EPSILON) * 100
    pub const PHYS_EPSILON: f32 = 0.034_526_698;

    /// Numbered edge connectors per room
    pub const ROOM_CONNECTION_MAX: usize = 9;

    /// Raw joystick axis value beyond which an axis binding counts as held
    pub const JOY_THRESHOLD: i32 = 6553;
}

/// Move `current` toward `target` by at most `step`, landing exactly on it.
#[inline]
pub fn fapproach(current: f32, target: f32, step: f32) -> f32 {
    if (current - target).abs() < step {
        target
    } else if current > target {
        current - step
    } else {
        current + step
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_fapproach_reaches_target_and_stays() {
        let mut v = 5.0;
        for _ in 0..5 {
            v = fapproach(v, 0.0, 1.0);
        }
        assert_eq!(v, 0.0);
        assert_eq!(fapproach(v, 0.0, 1.0), 0.0);
    }

    #[test]
    fn test_fapproach_snaps_without_overshoot() {
        let steps: Vec<f32> = std::iter::successors(Some(0.0), |&v| Some(fapproach(v, 5.0, 2.0)))
            .skip(1)
            .take(4)
            .collect();
        assert_eq!(steps, vec![2.0, 4.0, 5.0, 5.0]);
    }

    #[test]
    fn test_epsilon_matches_machine_epsilon() {
        let derived = f32::EPSILON.sqrt() * 100.0;
        assert!((derived - consts::PHYS_EPSILON).abs() < 1e-6);
    }

    proptest! {
        #[test]
        fn fapproach_never_overshoots(
            start in -100.0f32..100.0,
            target in -100.0f32..100.0,
            step in 0.01f32..10.0,
        ) {
            let next = fapproach(start, target, step);
            let before = (start - target).abs();
            let after = (next - target).abs();
            prop_assert!(after <= before);
            prop_assert!((next - start).abs() <= step + 1e-4);
        }
    }
}
