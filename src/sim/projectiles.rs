//! Player shots, sentry lasers and boss rockets

use glam::Vec2;

use super::effects::{Effect, Feedback, Sound};
use super::geometry::Rect;
use super::pool::Pool;
use super::state::World;
use crate::consts::FIELD_W;
use crate::tuning::{laser, rocket, shot};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlayerShot {
    pub position: Vec2,
    pub velocity: Vec2,
    /// Already hit something; removed on the next step
    pub spent: bool,
}

impl PlayerShot {
    pub fn bounds(&self) -> Rect {
        Rect::centered(self.position, shot::SIZE, shot::SIZE)
    }
}

/// First live shot overlapping `target`. The shot is marked spent and its
/// velocity returned.
pub fn take_shot(shots: &mut Pool<PlayerShot>, target: &Rect) -> Option<Vec2> {
    let hit = shots
        .iter_mut()
        .find(|s| !s.spent && s.bounds().overlaps(target))?;
    hit.spent = true;
    Some(hit.velocity)
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Laser {
    pub position: Vec2,
    pub hspeed: f32,
}

impl Laser {
    pub fn bounds(&self) -> Rect {
        Rect::centered(self.position, laser::WIDTH, laser::HEIGHT)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rocket {
    pub position: Vec2,
    pub velocity: Vec2,
}

impl Rocket {
    pub fn bounds(&self) -> Rect {
        Rect::centered(self.position, rocket::SIZE, rocket::SIZE)
    }
}

pub(crate) fn fire_laser(lasers: &mut Pool<Laser>, fx: &mut Feedback, at: Vec2, hspeed: f32) {
    match lasers.push(Laser {
        position: at,
        hspeed,
    }) {
        Ok(_) => fx.sound(Sound::SentryShoot),
        Err(err) => log::trace!("laser not fired: {err}"),
    }
}

pub(crate) fn fire_rocket(rockets: &mut Pool<Rocket>, at: Vec2, velocity: Vec2) {
    if let Err(err) = rockets.push(Rocket {
        position: at,
        velocity,
    }) {
        log::trace!("rocket not fired: {err}");
    }
}

impl World {
    pub(crate) fn fire_shot(&mut self, at: Vec2, hspeed: f32) {
        let shot = PlayerShot {
            position: at,
            velocity: Vec2::new(hspeed, 0.0),
            spent: false,
        };
        match self.shots.push(shot) {
            Ok(_) => self.fx.sound(Sound::PlayerShoot),
            Err(err) => log::trace!("shot not fired: {err}"),
        }
    }

    /// Advance shots, dropping spent ones and those outside the camera's span
    pub(crate) fn step_shots(&mut self) {
        let left = self.camera.position.x;
        let right = left + FIELD_W;
        let mut i = 0;
        while i < self.shots.len() {
            let shot = &mut self.shots[i];
            shot.position += shot.velocity;
            if shot.spent || shot.position.x < left || shot.position.x > right {
                self.shots.swap_remove(i);
                continue;
            }
            i += 1;
        }
    }

    pub(crate) fn tick_lasers(&mut self) {
        let World {
            lasers,
            player,
            walls,
            room,
            fx,
            ..
        } = self;
        let mut i = 0;
        while i < lasers.len() {
            let laser = &mut lasers[i];
            let bounds = laser.bounds();
            if bounds.overlaps(&player.bounds()) {
                player.hurt(
                    Vec2::new(laser.hspeed, laser::KNOCKBACK_Y),
                    laser::DAMAGE,
                    walls,
                    fx,
                );
                fx.sound(Sound::SentryHit);
                fx.effect(Effect::Explosion, laser.position);
                lasers.swap_remove(i);
                continue;
            }
            laser.position.x += laser.hspeed;
            // Culled on the bounds it had before moving
            if !bounds.overlaps(&room.bounds) {
                lasers.swap_remove(i);
                continue;
            }
            i += 1;
        }
    }

    pub(crate) fn tick_rockets(&mut self) {
        let World {
            rockets,
            player,
            walls,
            room,
            fx,
            ..
        } = self;
        let mut i = 0;
        while i < rockets.len() {
            let rocket = &mut rockets[i];
            let bounds = rocket.bounds();
            if bounds.overlaps(&player.bounds()) {
                player.hurt(
                    Vec2::new(rocket.velocity.x, rocket::KNOCKBACK_Y),
                    rocket::DAMAGE,
                    walls,
                    fx,
                );
                fx.effect(Effect::Explosion, rocket.position);
                rockets.swap_remove(i);
                continue;
            }
            rocket.position += rocket.velocity;
            if !bounds.overlaps(&room.bounds) {
                rockets.swap_remove(i);
                continue;
            }
            i += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::test_support::open_world;

    #[test]
    fn test_shot_leaves_camera_span() {
        let mut world = open_world();
        world.fire_shot(Vec2::new(318.0, 100.0), 2.5);
        world.step_shots();
        assert_eq!(world.shots.len(), 0);
    }

    #[test]
    fn test_spent_shot_is_removed_next_step() {
        let mut world = open_world();
        world.fire_shot(Vec2::new(100.0, 100.0), 2.5);
        let target = Rect::new(98.0, 98.0, 4.0, 4.0);
        assert_eq!(take_shot(&mut world.shots, &target), Some(Vec2::new(2.5, 0.0)));
        // Can't hit twice
        assert_eq!(take_shot(&mut world.shots, &target), None);
        world.step_shots();
        assert!(world.shots.is_empty());
    }

    #[test]
    fn test_shot_capacity_drops_extra() {
        let mut world = open_world();
        for _ in 0..5 {
            world.fire_shot(Vec2::new(100.0, 100.0), 2.5);
        }
        assert_eq!(world.shots.len(), 3);
    }

    #[test]
    fn test_laser_hits_player_once() {
        let mut world = open_world();
        world.player.position = Vec2::new(100.0, 100.0);
        fire_laser(&mut world.lasers, &mut world.fx, Vec2::new(92.0, 100.0), 4.0);
        world.tick_lasers();
        assert!(world.lasers.is_empty());
        assert_eq!(world.player.hitpoints, 80);
        assert_eq!(world.player.velocity, Vec2::new(4.0, -1.0));
    }

    #[test]
    fn test_rocket_culled_outside_room() {
        let mut world = open_world();
        fire_rocket(&mut world.rockets, Vec2::new(-10.0, 50.0), Vec2::new(-3.0, 0.0));
        world.tick_rockets();
        assert!(world.rockets.is_empty());
    }
}
