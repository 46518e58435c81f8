//! The end boss: a jet-propelled gunship
//!
//! It idles until first hit, then alternates between flying above the
//! player and either landing for a shotgun volley or climbing out of view
//! for a bombing run.

use glam::Vec2;
use rand::Rng;

use super::effects::{Effect, Sound};
use super::geometry::Rect;
use super::projectiles::{fire_rocket, take_shot};
use super::state::World;
use crate::fapproach;
use crate::tuning::boss;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BossState {
    /// Waiting on the ground for the first hit
    Entry,
    Taunt,
    Fly,
    /// Reserved attack; holds position without thinking
    Dive,
    FindLand,
    Shotgun,
    Takeoff,
    Rise,
    /// Off screen while bombs fall
    Bomb,
}

/// Sprite strip to draw for a state
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Animation {
    pub first: u8,
    pub count: u8,
    /// Frames advanced per tick
    pub rate: f32,
}

impl Animation {
    const fn still(frame: u8) -> Self {
        Self {
            first: frame,
            count: 1,
            rate: 0.0,
        }
    }

    const fn jets(rate: f32) -> Self {
        Self {
            first: 4,
            count: 4,
            rate,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Boss {
    pub position: Vec2,
    pub velocity: Vec2,
    pub state: BossState,
    pub timer: u32,
    pub hurt_timer: u32,
    pub hitpoints: i32,
    /// Facing left, towards the player
    pub flip: bool,
    /// Horizontal point it steers towards while airborne
    pub orbit: f32,
}

impl Boss {
    pub fn spawn(position: Vec2) -> Self {
        Self {
            position,
            velocity: Vec2::ZERO,
            state: BossState::Entry,
            timer: 0,
            hurt_timer: 0,
            hitpoints: boss::HITPOINTS,
            flip: false,
            orbit: 0.0,
        }
    }

    pub fn bounds(&self) -> Rect {
        Rect::new(self.position.x - 8.0, self.position.y - 8.0, 16.0, 24.0)
    }

    /// What to draw, or `None` while it is away bombing
    pub fn animation(&self) -> Option<Animation> {
        match self.state {
            BossState::Entry => Some(Animation::still(0)),
            BossState::Taunt => Some(Animation::still(1)),
            BossState::Fly => Some(Animation::jets(0.2)),
            BossState::Dive => Some(Animation::jets(0.1)),
            BossState::FindLand => Some(Animation::still(4)),
            BossState::Shotgun => Some(Animation::still(3)),
            BossState::Takeoff | BossState::Rise => Some(Animation::jets(0.6)),
            BossState::Bomb => None,
        }
    }

    fn enter(&mut self, state: BossState) {
        log::debug!("boss {:?} -> {:?}", self.state, state);
        self.state = state;
    }

    fn steer_to_orbit(&mut self) {
        let target = if self.position.x > self.orbit {
            -boss::FLY_SPEED
        } else {
            boss::FLY_SPEED
        };
        self.velocity.x = fapproach(self.velocity.x, target, boss::FLY_ACCEL);
    }

    fn climb(&mut self) {
        self.velocity.y = fapproach(self.velocity.y, -boss::FLY_SPEED, boss::FLY_ACCEL);
    }
}

/// Ticks of flight before the next attack
fn flight_time(rng: &mut impl Rng) -> u32 {
    boss::FLY_TICKS_BASE + rng.random_range(0..boss::FLY_TICKS_SPREAD)
}

impl World {
    pub(crate) fn tick_boss(&mut self) {
        let World {
            boss: slot,
            player,
            walls,
            shots,
            rockets,
            camera,
            rng,
            fx,
            frame,
            ..
        } = self;
        let Some(b) = slot.as_mut() else {
            return;
        };

        let bounds = b.bounds();
        b.flip = player.position.x < b.position.x;

        if player.bounds().overlaps(&bounds) {
            let kx = if b.flip {
                -boss::KNOCKBACK_X
            } else {
                boss::KNOCKBACK_X
            };
            player.hurt(
                Vec2::new(kx, boss::KNOCKBACK_Y),
                boss::CONTACT_DAMAGE,
                walls,
                fx,
            );
        }

        if b.hurt_timer == 0 {
            if take_shot(shots, &bounds).is_some() {
                b.hitpoints = (b.hitpoints - boss::SHOT_DAMAGE).max(0);
                b.hurt_timer = boss::HIT_STUN_TICKS;
            }
            if b.hitpoints == 0 {
                fx.sound(Sound::BossDie);
                fx.effect(Effect::LargeExplosion, b.position);
                log::info!("boss destroyed");
                *slot = None;
                return;
            }
        } else {
            b.hurt_timer -= 1;
        }

        if b.timer > 0 {
            b.timer -= 1;
        }

        let target = player.position;
        match b.state {
            BossState::Entry => {
                b.velocity.y += boss::GRAVITY;
                if b.hitpoints < boss::HITPOINTS {
                    b.enter(BossState::Taunt);
                    b.timer = boss::TAUNT_TICKS;
                }
            }
            BossState::Taunt => {
                b.velocity.y += boss::GRAVITY;
                if b.timer == 0 {
                    fx.sound(Sound::BossEngine);
                    b.enter(BossState::Takeoff);
                    b.orbit = b.position.x - boss::TAKEOFF_ORBIT_SHIFT;
                }
            }
            BossState::Fly => {
                b.orbit = if (*frame / boss::ORBIT_PERIOD) % 2 == 1 {
                    target.x - boss::ORBIT_OFFSET
                } else {
                    target.x + boss::ORBIT_OFFSET
                };
                b.steer_to_orbit();
                let vy = if b.position.y > target.y - boss::HOVER {
                    -boss::FLY_SPEED
                } else {
                    boss::FLY_SPEED
                };
                b.velocity.y = fapproach(b.velocity.y, vy, boss::FLY_ACCEL);
                if b.timer == 0 {
                    if rng.random_range(0..100) < boss::RISE_CHANCE {
                        b.enter(BossState::Rise);
                        fx.sound(Sound::BossEngine);
                    } else {
                        b.enter(BossState::FindLand);
                    }
                }
            }
            BossState::Dive => {}
            BossState::FindLand => {
                b.velocity.y += boss::GRAVITY;
                if walls.on_ground(&bounds) {
                    b.velocity.x = 0.0;
                    b.enter(BossState::Shotgun);
                    b.timer = boss::SHOTGUN_TICKS;
                    fx.sound(Sound::BossShotgun);
                    let dir = if b.flip { -1.0 } else { 1.0 };
                    let muzzle = b.position + Vec2::new(dir * boss::SHOTGUN_MUZZLE_X, 0.0);
                    for vy in boss::SHOTGUN_SPREAD_Y {
                        fire_rocket(rockets, muzzle, Vec2::new(dir * boss::SHOTGUN_SPEED_X, vy));
                    }
                }
            }
            BossState::Shotgun => {
                if b.timer == 0 {
                    b.timer = boss::SHOTGUN_RECOVER_TICKS;
                    b.enter(BossState::Taunt);
                }
            }
            BossState::Takeoff => {
                if b.position.y < target.y - boss::HOVER {
                    b.enter(BossState::Fly);
                    b.timer = flight_time(rng);
                }
                b.steer_to_orbit();
                b.climb();
            }
            BossState::Rise => {
                if b.position.y < target.y - 2.0 * boss::HOVER {
                    b.enter(BossState::Bomb);
                    b.timer = boss::BOMB_TICKS;
                    let launch_y = camera.position.y - boss::BOMB_DROP_HEIGHT;
                    let end = target.x + boss::BOMB_HALF_SPAN;
                    let mut x = target.x - boss::BOMB_HALF_SPAN;
                    while x < end {
                        let drift = boss::BOMB_DRIFT[rng.random_range(0..boss::BOMB_DRIFT.len())];
                        fire_rocket(
                            rockets,
                            Vec2::new(x, launch_y),
                            Vec2::new(drift, boss::BOMB_FALL_SPEED),
                        );
                        x += boss::BOMB_SPACING;
                    }
                }
                b.velocity.x = 0.0;
                b.climb();
            }
            BossState::Bomb => {
                if b.timer == 0 {
                    b.enter(BossState::Fly);
                    b.timer = flight_time(rng);
                }
            }
        }

        let motion = walls.move_and_slide(&bounds, b.velocity);
        b.velocity = motion.velocity;
        b.position += motion.displacement;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::effects::GameEvent;
    use crate::sim::projectiles::PlayerShot;
    use crate::sim::test_support::floor_world;

    fn boss_world() -> World {
        let mut world = floor_world();
        world.player.position.x = 40.0;
        world.boss = Some(Boss::spawn(Vec2::new(240.0, 184.0)));
        world
    }

    fn hit_boss(world: &mut World) {
        let at = world.boss.as_ref().map_or(Vec2::ZERO, |b| b.position);
        world
            .shots
            .push(PlayerShot {
                position: at,
                velocity: Vec2::new(2.5, 0.0),
                spent: false,
            })
            .unwrap();
    }

    fn state(world: &World) -> Option<BossState> {
        world.boss.as_ref().map(|b| b.state)
    }

    #[test]
    fn test_boss_waits_for_first_hit() {
        let mut world = boss_world();
        for _ in 0..100 {
            world.tick_boss();
        }
        assert_eq!(state(&world), Some(BossState::Entry));

        hit_boss(&mut world);
        world.tick_boss();
        let b = world.boss.as_ref().unwrap();
        assert_eq!(b.state, BossState::Taunt);
        assert_eq!(b.hitpoints, boss::HITPOINTS - boss::SHOT_DAMAGE);
        assert_eq!(b.hurt_timer, boss::HIT_STUN_TICKS);
        assert!(b.flip);
    }

    #[test]
    fn test_hit_stun_ignores_shots() {
        let mut world = boss_world();
        hit_boss(&mut world);
        world.tick_boss();
        world.step_shots();
        hit_boss(&mut world);
        world.tick_boss();
        assert_eq!(
            world.boss.as_ref().map(|b| b.hitpoints),
            Some(boss::HITPOINTS - boss::SHOT_DAMAGE)
        );
        // The shot was not consumed
        assert!(!world.shots[0].spent);
    }

    #[test]
    fn test_taunt_then_takeoff() {
        let mut world = boss_world();
        hit_boss(&mut world);
        world.tick_boss();
        for _ in 0..boss::TAUNT_TICKS {
            world.tick_boss();
        }
        assert_eq!(state(&world), Some(BossState::Takeoff));
        assert!(world.fx.events().contains(&GameEvent::Sound(Sound::BossEngine)));
        let b = world.boss.as_ref().unwrap();
        assert_eq!(b.orbit, b.position.x - boss::TAKEOFF_ORBIT_SHIFT);
    }

    #[test]
    fn test_landing_fires_shotgun_towards_player() {
        let mut world = boss_world();
        if let Some(b) = world.boss.as_mut() {
            b.state = BossState::FindLand;
            b.position.y = 150.0;
        }
        for _ in 0..200 {
            world.tick_boss();
            if state(&world) == Some(BossState::Shotgun) {
                break;
            }
        }
        assert_eq!(state(&world), Some(BossState::Shotgun));
        assert_eq!(world.rockets.len(), 3);
        assert!(world.rockets.iter().all(|r| r.velocity.x == -boss::SHOTGUN_SPEED_X));
        let ys: Vec<f32> = world.rockets.iter().map(|r| r.velocity.y).collect();
        assert_eq!(ys, vec![-1.0, 0.0, 1.0]);
    }

    #[test]
    fn test_rise_launches_bombing_run() {
        let mut world = boss_world();
        let target = world.player.position;
        if let Some(b) = world.boss.as_mut() {
            b.state = BossState::Rise;
            b.position.y = target.y - 2.0 * boss::HOVER - 1.0;
        }
        world.tick_boss();
        assert_eq!(state(&world), Some(BossState::Bomb));
        // -300..300 in steps of 32
        assert_eq!(world.rockets.len(), 19);
        assert!(world.rockets.iter().all(|r| r.velocity.y == boss::BOMB_FALL_SPEED));
        assert!(world.rockets.iter().all(|r| r.position.y == -boss::BOMB_DROP_HEIGHT));
        assert_eq!(world.boss.as_ref().and_then(Boss::animation), None);
    }

    /// Put the boss in the air over the floor in `state`
    fn airborne(world: &mut World, state: BossState, timer: u32) {
        if let Some(b) = world.boss.as_mut() {
            b.state = state;
            b.timer = timer;
            b.position = Vec2::new(240.0, 40.0);
            b.velocity = Vec2::ZERO;
        }
    }

    #[test]
    fn test_takeoff_levels_out_into_flight() {
        let mut world = boss_world();
        let target = world.player.position;
        airborne(&mut world, BossState::Takeoff, 0);
        if let Some(b) = world.boss.as_mut() {
            b.position.y = target.y - boss::HOVER + 10.0;
        }
        world.tick_boss();
        assert_eq!(state(&world), Some(BossState::Takeoff));

        if let Some(b) = world.boss.as_mut() {
            b.position.y = target.y - boss::HOVER - 1.0;
        }
        world.tick_boss();
        let b = world.boss.as_ref().unwrap();
        assert_eq!(b.state, BossState::Fly);
        let flight = boss::FLY_TICKS_BASE..boss::FLY_TICKS_BASE + boss::FLY_TICKS_SPREAD;
        assert!(flight.contains(&b.timer));
    }

    #[test]
    fn test_flight_ends_in_rise_or_landing() {
        let mut world = boss_world();
        let (mut rises, mut landings) = (0, 0);
        for _ in 0..1000 {
            airborne(&mut world, BossState::Fly, 1);
            world.tick_boss();
            match state(&world) {
                Some(BossState::Rise) => rises += 1,
                Some(BossState::FindLand) => landings += 1,
                other => panic!("unexpected state {other:?}"),
            }
        }
        assert_eq!(rises + landings, 1000);
        assert!((250..350).contains(&rises), "{rises} rises");
    }

    #[test]
    fn test_orbit_switches_sides() {
        let mut world = boss_world();
        let x = world.player.position.x;
        airborne(&mut world, BossState::Fly, 600);
        world.frame = boss::ORBIT_PERIOD - 1;
        world.tick_boss();
        assert_eq!(world.boss.as_ref().map(|b| b.orbit), Some(x + boss::ORBIT_OFFSET));

        world.frame = boss::ORBIT_PERIOD;
        world.tick_boss();
        assert_eq!(world.boss.as_ref().map(|b| b.orbit), Some(x - boss::ORBIT_OFFSET));

        world.frame = 2 * boss::ORBIT_PERIOD;
        world.tick_boss();
        assert_eq!(world.boss.as_ref().map(|b| b.orbit), Some(x + boss::ORBIT_OFFSET));
        assert_eq!(state(&world), Some(BossState::Fly));
    }

    #[test]
    fn test_bombing_run_returns_to_flight() {
        let mut world = boss_world();
        airborne(&mut world, BossState::Bomb, boss::BOMB_TICKS);
        for _ in 0..boss::BOMB_TICKS - 1 {
            world.tick_boss();
        }
        assert_eq!(state(&world), Some(BossState::Bomb));
        world.tick_boss();
        let b = world.boss.as_ref().unwrap();
        assert_eq!(b.state, BossState::Fly);
        assert!(b.timer >= boss::FLY_TICKS_BASE);
    }

    #[test]
    fn test_boss_dies_at_zero() {
        let mut world = boss_world();
        if let Some(b) = world.boss.as_mut() {
            b.hitpoints = boss::SHOT_DAMAGE;
        }
        hit_boss(&mut world);
        world.tick_boss();
        assert!(world.boss.is_none());
        assert!(world.fx.events().contains(&GameEvent::Sound(Sound::BossDie)));
    }

    #[test]
    fn test_contact_hurts_player() {
        let mut world = boss_world();
        world.player.position.x = 236.0;
        world.tick_boss();
        assert_eq!(world.player.hitpoints, 100 - boss::CONTACT_DAMAGE);
        assert_eq!(world.player.velocity, Vec2::new(-2.0, -4.0));
    }
}
