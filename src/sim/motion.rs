//! Static walls and the move-and-slide resolver
//!
//! Every moving thing in the game goes through [`WallSet::move_and_slide`]:
//! sweep against all active walls, advance to the earliest contact, zero the
//! blocked axis and retry with what is left of the step.

use glam::Vec2;

use super::collision::{Contact, sweep};
use super::geometry::Rect;
use super::pool::{Pool, PoolFull};
use crate::consts::PHYS_EPSILON;

/// Default number of collide-and-slide passes per move
pub const SLIDE_ITERATIONS: usize = 2;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Wall {
    pub bounds: Rect,
    /// Inactive walls stay in place but no longer collide
    pub active: bool,
}

/// Handle to a wall that stays valid until the wall set is cleared
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct WallId {
    index: usize,
    generation: u32,
}

/// Result of a resolved move
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Motion {
    /// Requested velocity with blocked axes zeroed
    pub velocity: Vec2,
    /// Distance actually travelled this step
    pub displacement: Vec2,
}

#[derive(Debug, Clone)]
pub struct WallSet {
    walls: Pool<Wall>,
    /// Bumped on clear so stale handles stop resolving
    generation: u32,
    slide_iterations: usize,
}

impl WallSet {
    pub fn new(capacity: usize, slide_iterations: usize) -> Self {
        Self {
            walls: Pool::with_capacity(capacity),
            generation: 0,
            slide_iterations,
        }
    }

    pub fn add(&mut self, bounds: Rect) -> Result<WallId, PoolFull> {
        let index = self.walls.push(Wall {
            bounds,
            active: true,
        })?;
        Ok(WallId {
            index,
            generation: self.generation,
        })
    }

    pub fn get(&self, id: WallId) -> Option<&Wall> {
        if id.generation != self.generation {
            return None;
        }
        self.walls.get(id.index)
    }

    /// Make a wall passable. Returns false for a stale handle.
    pub fn deactivate(&mut self, id: WallId) -> bool {
        if id.generation != self.generation {
            return false;
        }
        match self.walls.get_mut(id.index) {
            Some(wall) => {
                wall.active = false;
                true
            }
            None => false,
        }
    }

    pub fn clear(&mut self) {
        self.walls.clear();
        self.generation = self.generation.wrapping_add(1);
    }

    pub fn walls(&self) -> &[Wall] {
        &self.walls
    }

    pub fn len(&self) -> usize {
        self.walls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.walls.is_empty()
    }

    fn active(&self) -> impl Iterator<Item = &Wall> {
        self.walls.iter().filter(|w| w.active)
    }

    /// Whether `rect` touches any active wall
    pub fn intersects(&self, rect: &Rect) -> bool {
        self.active().any(|w| rect.overlaps(&w.bounds))
    }

    /// Whether there is an active wall directly beneath `rect`
    pub fn on_ground(&self, rect: &Rect) -> bool {
        let probe = rect.expand(-0.5).translate(Vec2::new(0.0, 1.0));
        self.intersects(&probe)
    }

    /// Earliest contact of `rect` moving by `velocity` across all active
    /// walls. Ties go to the wall added first.
    pub fn sweep(&self, rect: &Rect, velocity: Vec2) -> Option<Contact> {
        let mut best: Option<Contact> = None;
        for wall in self.active() {
            if let Some(contact) = sweep(rect, velocity, &wall.bounds, Vec2::ZERO) {
                if contact.time < best.map_or(1.0, |b| b.time) {
                    best = Some(contact);
                }
            }
        }
        best
    }

    /// Resolve `rect` moving by `velocity` for one step
    pub fn move_and_slide(&self, rect: &Rect, velocity: Vec2) -> Motion {
        let mut bounds = *rect;
        let mut out_velocity = velocity;
        let mut remaining = velocity;
        let mut displacement = Vec2::ZERO;

        for _ in 0..self.slide_iterations {
            let Some(contact) = self.sweep(&bounds, remaining) else {
                displacement += remaining;
                break;
            };
            let travelled = remaining * contact.time;
            displacement += travelled;
            remaining *= 1.0 - contact.time;
            bounds = bounds.translate(travelled);
            if contact.normal.x.abs() > PHYS_EPSILON {
                out_velocity.x = 0.0;
                remaining.x = 0.0;
            }
            if contact.normal.y.abs() > PHYS_EPSILON {
                out_velocity.y = 0.0;
                remaining.y = 0.0;
            }
        }

        Motion {
            velocity: out_velocity,
            displacement,
        }
    }
}
