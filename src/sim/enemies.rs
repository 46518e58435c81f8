//! Small enemies and the breakable boulder
//!
//! Every enemy only thinks while it is on screen. Each tick it moves, then
//! checks its pre-move box against player shots and the player.

use glam::Vec2;

use super::effects::{Effect, Feedback, Sound};
use super::geometry::Rect;
use super::motion::{WallId, WallSet};
use super::pickups::random_drop;
use super::projectiles::{fire_laser, take_shot};
use super::state::World;
use crate::consts::PHYS_EPSILON;
use crate::fapproach;
use crate::tuning::{boulder, contact, drone, seeker, sentry, walker};

/// Horizontal sign of a facing; `flip` means facing left
fn facing(flip: bool) -> f32 {
    if flip { -1.0 } else { 1.0 }
}

/// Knockback for touching an enemy that faces `flip`. Being run into from
/// behind hurts less than being charged.
fn contact_knockback(player_x: f32, x: f32, flip: bool) -> Vec2 {
    let kx = if player_x > x {
        if flip {
            contact::KNOCKBACK_X_NEAR
        } else {
            contact::KNOCKBACK_X_FAR
        }
    } else if !flip {
        -contact::KNOCKBACK_X_NEAR
    } else {
        -contact::KNOCKBACK_X_FAR
    };
    Vec2::new(kx, contact::KNOCKBACK_Y)
}

/// Knockback from enemies without a facing
fn push_away(player_x: f32, x: f32) -> Vec2 {
    let kx = if player_x > x {
        contact::KNOCKBACK_X_NEAR
    } else {
        -contact::KNOCKBACK_X_NEAR
    };
    Vec2::new(kx, contact::KNOCKBACK_Y)
}

/// Puff left where a small enemy was destroyed
fn destroyed(fx: &mut Feedback, at: Vec2) {
    fx.effect(Effect::Puff, at);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stride {
    Advancing,
    /// Braking before turning round
    Turning { timer: i32 },
}

/// Ground patroller that turns at walls and ledges. Shielded from the front.
#[derive(Debug, Clone, PartialEq)]
pub struct Walker {
    pub position: Vec2,
    pub velocity: Vec2,
    pub flip: bool,
    pub hitpoints: i32,
    pub stride: Stride,
    pub active: bool,
}

impl Walker {
    pub fn spawn(position: Vec2, flip: bool) -> Self {
        Self {
            position,
            velocity: Vec2::ZERO,
            flip,
            hitpoints: walker::HITPOINTS,
            stride: Stride::Advancing,
            active: false,
        }
    }

    pub fn bounds(&self) -> Rect {
        Rect::centered(self.position, walker::WIDTH, walker::HEIGHT)
    }

    fn slide(&mut self, bounds: &Rect, walls: &WallSet) -> Vec2 {
        let motion = walls.move_and_slide(bounds, self.velocity);
        self.velocity = motion.velocity;
        self.position += motion.displacement;
        motion.displacement
    }

    fn step(&mut self, bounds: &Rect, walls: &WallSet) {
        match self.stride {
            Stride::Turning { timer } => {
                let timer = timer - 1;
                if timer < 1 {
                    self.stride = Stride::Advancing;
                    self.flip = !self.flip;
                } else {
                    self.stride = Stride::Turning { timer };
                }
                self.velocity.x = fapproach(self.velocity.x, 0.0, walker::ACCEL);
                self.slide(bounds, walls);
            }
            Stride::Advancing => {
                let dir = facing(self.flip);
                self.velocity.x = fapproach(self.velocity.x, dir * walker::SPEED, walker::ACCEL);
                let sensor = Rect::new(
                    self.position.x - walker::SENSOR_WIDTH / 2.0 + dir * walker::SENSOR_REACH,
                    self.position.y,
                    walker::SENSOR_WIDTH,
                    walker::SENSOR_HEIGHT,
                );
                let moved = self.slide(bounds, walls);
                if moved.x.abs() <= PHYS_EPSILON || !walls.intersects(&sensor) {
                    self.stride = Stride::Turning {
                        timer: walker::TURN_TICKS,
                    };
                }
            }
        }
    }

    /// Only shots travelling the way it faces get through
    fn shot_by(&mut self, shot_velocity: Vec2, fx: &mut Feedback) {
        let from_behind = if self.flip {
            shot_velocity.x < 0.0
        } else {
            shot_velocity.x > 0.0
        };
        if from_behind {
            self.hitpoints -= 1;
            fx.sound(Sound::Hit);
        } else {
            fx.sound(Sound::Reflect);
        }
    }
}

/// Flier that cruises horizontally and bobs around its spawn height
#[derive(Debug, Clone, PartialEq)]
pub struct Drone {
    pub position: Vec2,
    pub velocity: Vec2,
    /// Height it bobs around
    pub altitude: f32,
    pub flip: bool,
    pub turning: bool,
    pub hitpoints: i32,
    pub active: bool,
}

impl Drone {
    pub fn spawn(position: Vec2, flip: bool) -> Self {
        Self {
            position,
            velocity: Vec2::new(0.0, drone::INITIAL_VERTICAL_SPEED),
            altitude: position.y,
            flip,
            turning: false,
            hitpoints: drone::HITPOINTS,
            active: false,
        }
    }

    pub fn bounds(&self) -> Rect {
        Rect::centered(self.position, drone::SIZE, drone::SIZE)
    }

    fn step(&mut self, bounds: &Rect, walls: &WallSet) {
        if self.turning {
            self.velocity.x = fapproach(self.velocity.x, 0.0, drone::TURN_DECEL);
            if self.velocity.x == 0.0 {
                self.turning = false;
                self.flip = !self.flip;
            }
        } else {
            let dir = facing(self.flip);
            self.velocity.x = fapproach(self.velocity.x, dir * drone::SPEED, drone::ACCEL);
            let sensor = bounds.translate(Vec2::new(dir * drone::SENSOR_REACH, 0.0));
            if walls.intersects(&sensor) {
                self.turning = true;
            }
        }
        if self.position.y < self.altitude {
            self.velocity.y += drone::BOB_ACCEL;
        } else {
            self.velocity.y -= drone::BOB_ACCEL;
        }
        let motion = walls.move_and_slide(bounds, self.velocity);
        self.velocity = motion.velocity;
        self.position += motion.displacement;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeekPhase {
    /// Re-aiming at the player
    Track,
    /// Dashing along the last aim
    Commit,
    Reset,
}

impl SeekPhase {
    pub fn at(timer: u32) -> Self {
        if timer < seeker::TRACK_TICKS {
            SeekPhase::Track
        } else if timer < seeker::COMMIT_END_TICKS {
            SeekPhase::Commit
        } else {
            SeekPhase::Reset
        }
    }
}

/// Hovering mine that aims at the player and then dashes. Ignores walls.
#[derive(Debug, Clone, PartialEq)]
pub struct Seeker {
    pub position: Vec2,
    /// Unit heading locked in by the last tracking tick
    pub heading: Vec2,
    pub timer: u32,
    pub hitpoints: i32,
    pub active: bool,
}

impl Seeker {
    pub fn spawn(position: Vec2) -> Self {
        Self {
            position,
            heading: Vec2::ZERO,
            timer: 0,
            hitpoints: seeker::HITPOINTS,
            active: false,
        }
    }

    pub fn bounds(&self) -> Rect {
        Rect::centered(self.position, seeker::WIDTH, seeker::HEIGHT)
    }

    pub fn phase(&self) -> SeekPhase {
        SeekPhase::at(self.timer)
    }

    fn step(&mut self, target: Vec2) {
        self.timer += 1;
        match self.phase() {
            SeekPhase::Track => self.heading = (target - self.position).normalize_or_zero(),
            SeekPhase::Commit => self.position += self.heading,
            SeekPhase::Reset => self.timer = 0,
        }
    }
}

/// Ledge crawler that fires a laser when the player crosses its sight line
#[derive(Debug, Clone, PartialEq)]
pub struct Sentry {
    pub position: Vec2,
    pub flip: bool,
    pub shot_timer: u32,
    pub hitpoints: i32,
    pub active: bool,
}

impl Sentry {
    pub fn spawn(position: Vec2, flip: bool) -> Self {
        Self {
            position,
            flip,
            shot_timer: 0,
            hitpoints: sentry::HITPOINTS,
            active: false,
        }
    }

    pub fn bounds(&self) -> Rect {
        Rect::centered(self.position, sentry::SIZE, sentry::SIZE)
    }

    /// Horizontal strip it watches for the player
    pub fn sight(&self) -> Rect {
        let x = if self.flip {
            self.position.x - sentry::RANGE
        } else {
            self.position.x
        };
        Rect::new(x, self.position.y, sentry::RANGE, sentry::SIGHT_HEIGHT)
    }
}

/// Breakable rock backed by a wall
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Boulder {
    pub wall: WallId,
    pub hitpoints: i32,
}

impl World {
    /// Place a boulder whose solid half sits below `at`
    pub(crate) fn spawn_boulder(&mut self, at: Vec2) {
        if self.boulders.is_full() {
            log::trace!("boulder at {at} skipped: pool full");
            return;
        }
        let bounds = Rect::new(
            at.x,
            at.y + boulder::WALL_OFFSET_Y,
            boulder::WIDTH,
            boulder::HEIGHT,
        );
        let wall = match self.walls.add(bounds) {
            Ok(id) => id,
            Err(err) => {
                log::warn!("boulder at {at} has no wall: {err}");
                return;
            }
        };
        if let Err(err) = self.boulders.push(Boulder {
            wall,
            hitpoints: boulder::HITPOINTS,
        }) {
            log::warn!("boulder at {at} dropped: {err}");
        }
    }

    pub(crate) fn tick_boulders(&mut self) {
        let World {
            boulders,
            walls,
            shots,
            items,
            rng,
            fx,
            ..
        } = self;
        let mut i = 0;
        while i < boulders.len() {
            let rock = &mut boulders[i];
            let Some(wall) = walls.get(rock.wall).copied() else {
                log::warn!("boulder lost its wall");
                boulders.swap_remove(i);
                continue;
            };
            if take_shot(shots, &wall.bounds).is_some() {
                fx.sound(Sound::Hit);
                rock.hitpoints -= 1;
            }
            if rock.hitpoints < 1 {
                walls.deactivate(rock.wall);
                let at = wall.bounds.position() + Vec2::new(boulder::WIDTH / 2.0, 0.0);
                fx.effect(Effect::LargeExplosion, at);
                fx.sound(Sound::RockBreak);
                random_drop(rng, items, at);
                boulders.swap_remove(i);
                continue;
            }
            i += 1;
        }
    }

    pub(crate) fn tick_walkers(&mut self) {
        let World {
            walkers,
            shots,
            player,
            walls,
            camera,
            items,
            rng,
            fx,
            ..
        } = self;
        let mut i = 0;
        while i < walkers.len() {
            let w = &mut walkers[i];
            if w.hitpoints < 1 {
                let at = w.position;
                destroyed(fx, at);
                random_drop(rng, items, at);
                walkers.swap_remove(i);
                continue;
            }
            let bounds = w.bounds();
            w.active = camera.sees(&bounds);
            if w.active {
                w.step(&bounds, walls);
                if let Some(v) = take_shot(shots, &bounds) {
                    w.shot_by(v, fx);
                }
                if bounds.overlaps(&player.bounds()) {
                    let knockback = contact_knockback(player.position.x, w.position.x, w.flip);
                    player.hurt(knockback, contact::DAMAGE, walls, fx);
                }
            }
            i += 1;
        }
    }

    pub(crate) fn tick_drones(&mut self) {
        let World {
            drones,
            shots,
            player,
            walls,
            camera,
            items,
            rng,
            fx,
            ..
        } = self;
        let mut i = 0;
        while i < drones.len() {
            let d = &mut drones[i];
            if d.hitpoints < 1 {
                let at = d.position;
                destroyed(fx, at);
                random_drop(rng, items, at);
                drones.swap_remove(i);
                continue;
            }
            let bounds = d.bounds();
            d.active = camera.sees(&bounds);
            if d.active {
                d.step(&bounds, walls);
                if take_shot(shots, &bounds).is_some() {
                    fx.sound(Sound::Hit);
                    d.hitpoints -= 1;
                }
                if bounds.overlaps(&player.bounds()) {
                    let knockback = contact_knockback(player.position.x, d.position.x, d.flip);
                    player.hurt(knockback, contact::DAMAGE, walls, fx);
                }
            }
            i += 1;
        }
    }

    pub(crate) fn tick_seekers(&mut self) {
        let World {
            seekers,
            shots,
            player,
            walls,
            camera,
            items,
            rng,
            fx,
            ..
        } = self;
        let mut i = 0;
        while i < seekers.len() {
            let s = &mut seekers[i];
            if s.hitpoints < 1 {
                let at = s.position;
                destroyed(fx, at);
                random_drop(rng, items, at);
                seekers.swap_remove(i);
                continue;
            }
            let bounds = s.bounds();
            s.active = camera.sees(&bounds);
            if s.active {
                s.step(player.position);
                if take_shot(shots, &bounds).is_some() {
                    fx.sound(Sound::Hit);
                    s.hitpoints -= 1;
                }
                if bounds.overlaps(&player.bounds()) {
                    let knockback = push_away(player.position.x, s.position.x);
                    player.hurt(knockback, contact::DAMAGE, walls, fx);
                }
            }
            i += 1;
        }
    }

    pub(crate) fn tick_sentries(&mut self) {
        let World {
            sentries,
            lasers,
            shots,
            player,
            walls,
            camera,
            items,
            rng,
            fx,
            ..
        } = self;
        let mut i = 0;
        while i < sentries.len() {
            let s = &mut sentries[i];
            if s.hitpoints < 1 {
                let at = s.position;
                destroyed(fx, at);
                random_drop(rng, items, at);
                sentries.swap_remove(i);
                continue;
            }
            let bounds = s.bounds();
            s.active = camera.sees(&bounds);
            if !s.active {
                i += 1;
                continue;
            }
            if s.shot_timer > 0 {
                s.shot_timer -= 1;
            } else {
                let dir = facing(s.flip);
                let sensor = Rect::new(
                    s.position.x - sentry::SENSOR_WIDTH / 2.0 + dir * sentry::SENSOR_REACH,
                    s.position.y,
                    sentry::SENSOR_WIDTH,
                    sentry::SENSOR_HEIGHT,
                );
                let sight = s.sight();
                let moved = walls
                    .move_and_slide(&bounds, Vec2::new(dir * sentry::CREEP_SPEED, 0.0))
                    .displacement;
                s.position += moved;
                if sight.overlaps(&player.bounds()) {
                    s.shot_timer = sentry::COOLDOWN_TICKS;
                    fire_laser(lasers, fx, s.position, dir * sentry::LASER_SPEED);
                } else if moved.x.abs() <= PHYS_EPSILON || !walls.intersects(&sensor) {
                    s.flip = !s.flip;
                }
            }
            if take_shot(shots, &bounds).is_some() {
                fx.sound(Sound::Hit);
                s.hitpoints -= 1;
            }
            if bounds.overlaps(&player.bounds()) {
                let knockback = push_away(player.position.x, s.position.x);
                player.hurt(knockback, contact::DAMAGE, walls, fx);
            }
            i += 1;
        }
    }
}
