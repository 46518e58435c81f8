//! Sounds and visual effects announced by the simulation
//!
//! The simulation never plays audio or draws. It records [`GameEvent`]s for
//! the host to drain after each tick and keeps a small pool of cosmetic
//! particles so hosts can draw explosions without re-deriving them.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::pool::Pool;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Sound {
    Hit,
    Reflect,
    RockBreak,
    PlayerDie,
    PlayerHit,
    PlayerJump,
    PlayerShoot,
    PlayerHeal,
    SentryHit,
    SentryShoot,
    BossEngine,
    BossShotgun,
    BossDie,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Effect {
    /// Single puff left by a destroyed small enemy
    Puff,
    /// Ring of eight sparks
    Explosion,
    /// Slow ring plus three faster rings
    LargeExplosion,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    Sound(Sound),
    Effect { kind: Effect, at: Vec2 },
}

/// One animated sprite of an effect
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Particle {
    pub position: Vec2,
    pub velocity: Vec2,
    pub timer: u32,
    pub lifetime: u32,
    pub first_frame: u8,
    pub last_frame: u8,
}

impl Particle {
    fn new(position: Vec2, velocity: Vec2, frames: (u8, u8), lifetime: u32) -> Self {
        Self {
            position,
            velocity,
            timer: lifetime,
            lifetime,
            first_frame: frames.0,
            last_frame: frames.1,
        }
    }

    /// Sprite frame interpolated over the particle's life
    pub fn frame(&self) -> u8 {
        let t = (self.lifetime - self.timer) as f32 / self.lifetime.max(1) as f32;
        let start = f32::from(self.first_frame) + 0.5;
        let end = f32::from(self.last_frame) + 0.5;
        (start * (1.0 - t) + end * t).floor() as u8
    }
}

/// Rotate `(x, y)` by `angle` in screen orientation
fn rotated(x: f32, y: f32, angle: f32) -> Vec2 {
    let (sin, cos) = angle.sin_cos();
    Vec2::new(cos * x + sin * y, cos * y - sin * x)
}

impl Effect {
    /// Particles making up this effect when spawned at `at`
    pub fn particles(self, at: Vec2) -> Vec<Particle> {
        let step = std::f32::consts::FRAC_PI_4;
        let ring = |speed: f32, frames: (u8, u8), lifetime: u32| {
            (0..8).map(move |i| {
                let angle = step * i as f32;
                Particle::new(
                    at + rotated(4.0, 0.0, angle),
                    rotated(0.0, speed, angle),
                    frames,
                    lifetime,
                )
            })
        };
        match self {
            Effect::Puff => vec![Particle::new(at, Vec2::ZERO, (4, 6), 10)],
            Effect::Explosion => ring(1.3, (4, 6), 20).collect(),
            Effect::LargeExplosion => {
                let mut out: Vec<Particle> = ring(0.1, (12, 15), 100).collect();
                for j in 0..3u32 {
                    out.extend(ring(0.3 + 0.3 * j as f32, (4, 6), 60 - 20 * j));
                }
                out
            }
        }
    }
}

/// Per-tick event log plus live particles
#[derive(Debug, Clone)]
pub struct Feedback {
    events: Vec<GameEvent>,
    particles: Pool<Particle>,
}

impl Feedback {
    pub fn new(particle_capacity: usize) -> Self {
        Self {
            events: Vec::new(),
            particles: Pool::with_capacity(particle_capacity),
        }
    }

    pub fn sound(&mut self, sound: Sound) {
        self.events.push(GameEvent::Sound(sound));
    }

    pub fn effect(&mut self, kind: Effect, at: Vec2) {
        self.events.push(GameEvent::Effect { kind, at });
        for particle in kind.particles(at) {
            if self.particles.push(particle).is_err() {
                break;
            }
        }
    }

    /// Age particles, dropping expired ones
    pub fn step(&mut self) {
        let mut i = 0;
        while i < self.particles.len() {
            let p = &mut self.particles[i];
            if p.timer == 0 {
                self.particles.swap_remove(i);
                continue;
            }
            p.timer -= 1;
            p.position += p.velocity;
            i += 1;
        }
    }

    /// Forget the previous tick's events
    pub fn begin_tick(&mut self) {
        self.events.clear();
    }

    /// Events recorded since the tick began
    pub fn events(&self) -> &[GameEvent] {
        &self.events
    }

    pub fn drain(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn clear_particles(&mut self) {
        self.particles.clear();
    }
}
