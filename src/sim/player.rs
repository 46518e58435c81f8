//! Player controller
//!
//! One hurt timer drives three phases: above [`player::HURT_THRESHOLD`] the
//! player is being knocked back and ignores input; below it control returns
//! with the blink of invulnerability; after death it counts down to respawn.

use glam::Vec2;

use super::effects::{Effect, Feedback, Sound};
use super::geometry::Rect;
use super::input::{Action, ControlState};
use super::motion::WallSet;
use super::state::World;
use crate::fapproach;
use crate::tuning::player;

#[derive(Debug, Clone, PartialEq)]
pub struct Player {
    /// Centre of the collision box
    pub position: Vec2,
    pub velocity: Vec2,
    pub width: f32,
    pub height: f32,
    /// Facing left
    pub flip: bool,
    pub hitpoints: i32,
    pub alive: bool,
    pub jumping: bool,
    pub on_ladder: bool,
    /// Latched by up/down until a ladder is touched
    pub accept_ladder: bool,
    pub hurt_timer: u32,
}

impl Player {
    pub fn spawn(position: Vec2) -> Self {
        Self {
            position,
            velocity: Vec2::new(player::SPAWN_VELOCITY_X, 0.0),
            width: player::WIDTH,
            height: player::HEIGHT,
            flip: false,
            hitpoints: player::MAX_HITPOINTS,
            alive: true,
            jumping: false,
            on_ladder: false,
            accept_ladder: false,
            hurt_timer: 0,
        }
    }

    pub fn bounds(&self) -> Rect {
        Rect::centered(self.position, self.width, self.height)
    }

    /// Knockback phase of the hurt timer
    pub fn in_knockback(&self) -> bool {
        self.hurt_timer > player::HURT_THRESHOLD
    }

    /// Apply damage and knockback unless still invulnerable from the last
    /// hit. Returns whether the hit landed.
    pub fn hurt(
        &mut self,
        knockback: Vec2,
        amount: i32,
        walls: &WallSet,
        fx: &mut Feedback,
    ) -> bool {
        if self.hurt_timer != 0 {
            return false;
        }
        fx.sound(Sound::PlayerHit);
        self.hitpoints = (self.hitpoints - amount).max(0);
        self.velocity = knockback;
        self.hurt_timer = player::HURT_TICKS;
        // Stay on the ladder if knocked while inside a wall-ladder
        if !walls.intersects(&self.bounds()) {
            self.on_ladder = false;
        }
        true
    }

    pub fn heal(&mut self, amount: i32, fx: &mut Feedback) {
        fx.sound(Sound::PlayerHeal);
        self.hitpoints = (self.hitpoints + amount).min(player::MAX_HITPOINTS);
    }

    fn slide(&mut self, walls: &WallSet) {
        let motion = walls.move_and_slide(&self.bounds(), self.velocity);
        self.velocity = motion.velocity;
        self.position += motion.displacement;
    }
}

/// Snapshot of the controls the player reads in one tick
struct Intent {
    left: ControlState,
    right: ControlState,
    up: ControlState,
    down: ControlState,
    jump: ControlState,
    fire: ControlState,
}

impl World {
    /// Advance the player one tick. Returns true once a respawn is due.
    pub(crate) fn tick_player(&mut self) -> bool {
        let mut respawn = false;
        if self.player.alive {
            let p = &mut self.player;
            if p.hurt_timer > 0 {
                p.hurt_timer -= 1;
            }
            if p.in_knockback() {
                if self.walls.on_ground(&p.bounds()) {
                    p.velocity.x = fapproach(p.velocity.x, 0.0, player::ACCEL);
                }
                if !p.on_ladder {
                    p.velocity.y += player::GRAVITY;
                    p.slide(&self.walls);
                }
            } else if p.hitpoints == 0 {
                p.alive = false;
                p.hurt_timer = player::DEATH_TICKS;
                self.fx.sound(Sound::PlayerDie);
                self.fx.effect(Effect::LargeExplosion, p.position);
                log::info!("player died in {}", self.room.name);
            } else {
                self.steer_player();
            }
        } else if self.player.hurt_timer > 0 {
            self.player.hurt_timer -= 1;
        } else {
            respawn = true;
        }
        self.camera.focus(self.player.position);
        respawn
    }

    fn steer_player(&mut self) {
        let intent = Intent {
            left: self.controls.state(Action::Left),
            right: self.controls.state(Action::Right),
            up: self.controls.state(Action::Up),
            down: self.controls.state(Action::Down),
            jump: self.controls.state(Action::Jump),
            fire: self.controls.state(Action::Fire),
        };

        if intent.fire.pressed {
            let speed = if intent.left.held {
                -player::SHOT_SPEED
            } else if intent.right.held {
                player::SHOT_SPEED
            } else if self.player.flip {
                -player::SHOT_SPEED
            } else {
                player::SHOT_SPEED
            };
            self.fire_shot(self.player.position, speed);
        }

        if self.player.on_ladder {
            self.climb(&intent);
        } else {
            self.run(&intent);
        }
    }

    fn climb(&mut self, intent: &Intent) {
        let World {
            player: p,
            walls,
            ladders,
            ..
        } = self;
        let bounds = p.bounds();
        let Some(ladder) = ladders.iter().find(|l| l.bounds.overlaps(&bounds)) else {
            p.on_ladder = false;
            p.velocity = Vec2::ZERO;
            return;
        };

        let centre = ladder.bounds.x + ladder.bounds.w * 0.5;
        p.position.x = fapproach(p.position.x, centre, player::LADDER_STEP);
        if intent.up.held {
            p.position.y -= player::LADDER_STEP;
        } else if intent.down.held {
            p.position.y += player::LADDER_STEP;
        }
        if intent.jump.pressed && !walls.intersects(&p.bounds()) {
            p.on_ladder = false;
            p.velocity = Vec2::new(0.0, -player::JUMP_SPEED * player::LADDER_JUMP_FACTOR);
        }
    }

    fn run(&mut self, intent: &Intent) {
        let World {
            player: p,
            walls,
            ladders,
            fx,
            ..
        } = self;

        let target = if intent.left.held {
            -player::WALK_SPEED
        } else if intent.right.held {
            player::WALK_SPEED
        } else {
            0.0
        };
        p.velocity.x = fapproach(p.velocity.x, target, player::ACCEL);

        if intent.jump.held
            && intent.jump.frames < player::JUMP_GRACE_FRAMES
            && walls.on_ground(&p.bounds())
        {
            p.velocity.y = -player::JUMP_SPEED;
            p.jumping = true;
            fx.sound(Sound::PlayerJump);
        }
        if p.jumping {
            if intent.jump.released && p.velocity.y < 0.0 {
                p.jumping = false;
                p.velocity.y *= player::JUMP_RELEASE_FACTOR;
            } else if p.velocity.y >= 0.0 {
                p.jumping = false;
            }
        }

        p.velocity.y += player::GRAVITY;
        p.slide(walls);

        if !p.accept_ladder {
            p.accept_ladder = intent.up.pressed
                || intent.down.pressed
                || (intent.up.held && intent.jump.pressed);
        } else if intent.up.released || intent.down.released {
            p.accept_ladder = false;
        }
        if p.accept_ladder {
            let bounds = p.bounds();
            if ladders.iter().any(|l| l.bounds.overlaps(&bounds)) {
                p.accept_ladder = false;
                p.on_ladder = true;
            }
        }

        if p.velocity.x > 0.0 {
            p.flip = false;
        } else if p.velocity.x < 0.0 {
            p.flip = true;
        }
    }
}
