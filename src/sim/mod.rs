//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (pool slot order)
//! - No file, clock or platform dependencies

pub mod boss;
pub mod collision;
pub mod effects;
pub mod enemies;
pub mod geometry;
pub mod input;
pub mod motion;
pub mod pickups;
pub mod player;
pub mod pool;
pub mod projectiles;
pub mod room;
pub mod state;
pub mod tick;

pub use boss::{Boss, BossState};
pub use collision::{Contact, sweep};
pub use effects::{Effect, GameEvent, Particle, Sound};
pub use enemies::{Boulder, Drone, Seeker, Sentry, Walker};
pub use geometry::Rect;
pub use input::{Action, Binding, ControlState, Controls, InputEvent, keycode};
pub use motion::{Motion, WallId, WallSet};
pub use pickups::Item;
pub use player::Player;
pub use pool::{Pool, PoolFull};
pub use projectiles::{Laser, PlayerShot, Rocket};
pub use room::{Camera, Connector, Ladder, Room};
pub use state::{Entry, LevelRequest, World};

#[cfg(test)]
pub(crate) mod test_support {
    use glam::Vec2;

    use super::geometry::Rect;
    use super::player::Player;
    use super::state::World;
    use crate::settings::Settings;

    /// One screen, no walls, camera parked at the origin, player mid-screen
    pub fn open_world() -> World {
        let mut world = World::new(&Settings::default());
        world.room.bounds = Rect::new(0.0, 0.0, 320.0, 240.0);
        world.camera.bounds = Rect::default();
        world.camera.position = Vec2::ZERO;
        world.player = Player::spawn(Vec2::new(160.0, 120.0));
        world.player.hurt_timer = 0;
        world
    }

    /// [`open_world`] with a floor at y = 200 and the player standing on it
    pub fn floor_world() -> World {
        let mut world = open_world();
        if let Err(err) = world.walls.add(Rect::new(0.0, 200.0, 320.0, 40.0)) {
            panic!("floor: {err}");
        }
        world.player.position = Vec2::new(160.0, 193.0);
        world.player.velocity = Vec2::ZERO;
        world
    }
}
