//! Data-driven game balance
//!
//! Speeds are in pixels per tick, timers in ticks (100 per second).
//! These values define how the game feels; change them together.

pub mod player {
    pub const WIDTH: f32 = 14.0;
    pub const HEIGHT: f32 = 14.0;
    pub const MAX_HITPOINTS: i32 = 100;
    /// Horizontal velocity a freshly spawned player starts with
    pub const SPAWN_VELOCITY_X: f32 = 2.0;

    pub const ACCEL: f32 = 0.1;
    pub const WALK_SPEED: f32 = 1.5;
    pub const GRAVITY: f32 = 0.09;
    pub const JUMP_SPEED: f32 = 4.5;
    /// Jump is accepted while the jump binding has been held fewer frames than this
    pub const JUMP_GRACE_FRAMES: u32 = 20;
    /// Upward velocity kept when jump is released mid-ascent
    pub const JUMP_RELEASE_FACTOR: f32 = 0.3;
    /// Fraction of a full jump applied when jumping off a ladder
    pub const LADDER_JUMP_FACTOR: f32 = 0.5;
    /// Ladder centering and climbing speed
    pub const LADDER_STEP: f32 = 1.0;
    pub const SHOT_SPEED: f32 = 2.5;

    /// Hurt timer value set by a hit
    pub const HURT_TICKS: u32 = 200;
    /// Above this the player is in knockback and ignores input
    pub const HURT_THRESHOLD: u32 = 180;
    /// Delay between death and respawn
    pub const DEATH_TICKS: u32 = 300;
}

pub mod shot {
    pub const SIZE: f32 = 4.0;
}

/// Damage and knockback shared by ground and air patrol enemies
pub mod contact {
    pub const DAMAGE: i32 = 10;
    /// Knockback when the player is hit from the side the enemy faces away from
    pub const KNOCKBACK_X_NEAR: f32 = 1.0;
    /// Knockback when the enemy is facing the player
    pub const KNOCKBACK_X_FAR: f32 = 2.0;
    pub const KNOCKBACK_Y: f32 = -1.0;
}

pub mod walker {
    pub const WIDTH: f32 = 8.0;
    pub const HEIGHT: f32 = 12.0;
    pub const HITPOINTS: i32 = 2;
    pub const SPEED: f32 = 1.0;
    pub const ACCEL: f32 = 0.1;
    pub const TURN_TICKS: i32 = 50;
    /// Ground sensor offset ahead of the walker's centre
    pub const SENSOR_REACH: f32 = 16.0;
    pub const SENSOR_WIDTH: f32 = 4.0;
    pub const SENSOR_HEIGHT: f32 = 9.0;
}

pub mod drone {
    pub const SIZE: f32 = 8.0;
    pub const HITPOINTS: i32 = 2;
    pub const SPEED: f32 = 2.0;
    pub const ACCEL: f32 = 0.01;
    pub const TURN_DECEL: f32 = 0.04;
    /// Horizontal shift of the wall look-ahead box
    pub const SENSOR_REACH: f32 = 64.0;
    pub const BOB_ACCEL: f32 = 0.01;
    pub const INITIAL_VERTICAL_SPEED: f32 = 0.6;
}

pub mod seeker {
    pub const WIDTH: f32 = 12.0;
    pub const HEIGHT: f32 = 8.0;
    pub const HITPOINTS: i32 = 4;
    /// Ticks spent re-aiming at the player
    pub const TRACK_TICKS: u32 = 75;
    /// Tick at which a committed dash ends
    pub const COMMIT_END_TICKS: u32 = 150;
}

pub mod sentry {
    pub const SIZE: f32 = 12.0;
    pub const HITPOINTS: i32 = 3;
    pub const RANGE: f32 = 100.0;
    pub const SIGHT_HEIGHT: f32 = 4.0;
    pub const CREEP_SPEED: f32 = 0.15;
    pub const COOLDOWN_TICKS: u32 = 50;
    pub const LASER_SPEED: f32 = 4.0;
    pub const SENSOR_REACH: f32 = 16.0;
    pub const SENSOR_WIDTH: f32 = 4.0;
    pub const SENSOR_HEIGHT: f32 = 12.0;
}

pub mod laser {
    pub const WIDTH: f32 = 12.0;
    pub const HEIGHT: f32 = 4.0;
    pub const DAMAGE: i32 = 20;
    pub const KNOCKBACK_Y: f32 = -1.0;
}

pub mod rocket {
    pub const SIZE: f32 = 8.0;
    pub const DAMAGE: i32 = 20;
    pub const KNOCKBACK_Y: f32 = -2.0;
}

pub mod boulder {
    pub const WIDTH: f32 = 64.0;
    pub const HEIGHT: f32 = 32.0;
    /// The solid part sits this far below the spawn point
    pub const WALL_OFFSET_Y: f32 = 32.0;
    pub const HITPOINTS: i32 = 20;
}

pub mod item {
    pub const WIDTH: f32 = 8.0;
    pub const HEIGHT: f32 = 16.0;
    pub const FALL_SPEED: f32 = 4.0;
    pub const LIFETIME_TICKS: u32 = 600;
    /// Expiring items blink once their timer drops to this
    pub const BLINK_TICKS: u32 = 100;
    pub const SMALL_HEAL: i32 = 10;
    pub const LARGE_HEAL: i32 = 40;
    pub const SMALL_FRAMES: [u8; 2] = [12, 13];
    pub const LARGE_FRAMES: [u8; 2] = [14, 15];
    /// A drop happens when a roll in `0..DROP_DIE` lands below `DROP_BELOW`
    pub const DROP_DIE: u32 = 64;
    pub const DROP_BELOW: u32 = 8;
}

pub mod boss {
    pub const HITPOINTS: i32 = 100;
    pub const SHOT_DAMAGE: i32 = 5;
    pub const HIT_STUN_TICKS: u32 = 20;
    pub const CONTACT_DAMAGE: i32 = 30;
    pub const KNOCKBACK_X: f32 = 2.0;
    pub const KNOCKBACK_Y: f32 = -4.0;

    pub const GRAVITY: f32 = 0.05;
    /// Cruising height above the player
    pub const HOVER: f32 = 150.0;
    pub const FLY_SPEED: f32 = 1.0;
    pub const FLY_ACCEL: f32 = 0.01;
    /// Horizontal distance of the orbit point from the player
    pub const ORBIT_OFFSET: f32 = 100.0;
    /// Frames between orbit side switches
    pub const ORBIT_PERIOD: u64 = 1000;
    /// Takeoff orbit relative to the boss's own position
    pub const TAKEOFF_ORBIT_SHIFT: f32 = 4.0;

    pub const TAUNT_TICKS: u32 = 30;
    pub const SHOTGUN_TICKS: u32 = 20;
    pub const SHOTGUN_RECOVER_TICKS: u32 = 50;
    pub const BOMB_TICKS: u32 = 20;
    /// Fly duration is `FLY_TICKS_BASE + rand(FLY_TICKS_SPREAD)`
    pub const FLY_TICKS_BASE: u32 = 500;
    pub const FLY_TICKS_SPREAD: u32 = 1000;
    /// Percent chance to climb for a bombing run instead of landing
    pub const RISE_CHANCE: u32 = 30;

    pub const SHOTGUN_MUZZLE_X: f32 = 16.0;
    pub const SHOTGUN_SPEED_X: f32 = 3.0;
    pub const SHOTGUN_SPREAD_Y: [f32; 3] = [-1.0, 0.0, 1.0];

    /// Bombing run covers `player.x +/- BOMB_HALF_SPAN` every `BOMB_SPACING`
    pub const BOMB_HALF_SPAN: f32 = 300.0;
    pub const BOMB_SPACING: f32 = 32.0;
    /// Bombs start this far above the top of the camera
    pub const BOMB_DROP_HEIGHT: f32 = 16.0;
    pub const BOMB_DRIFT: [f32; 3] = [-0.1, 0.0, 0.1];
    pub const BOMB_FALL_SPEED: f32 = 2.0;
}
