//! World state
//!
//! Everything the simulation touches lives in [`World`]: the room, the wall
//! set, one fixed-capacity pool per kind of thing, the controls and the
//! seeded RNG. Level loading replays a [`LevelLayout`] into it.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;

use super::boss::Boss;
use super::effects::Feedback;
use super::enemies::{Boulder, Drone, Seeker, Sentry, Walker};
use super::input::Controls;
use super::motion::WallSet;
use super::pickups::Item;
use super::player::Player;
use super::pool::Pool;
use super::projectiles::{Laser, PlayerShot, Rocket};
use super::room::{Camera, Connector, Ladder, Room};
use crate::level::{LevelLayout, Placement, Spawn};
use crate::settings::Settings;

/// How the player enters a freshly loaded room
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Entry {
    /// Start of the game or a restart: the level's `@` places the player
    Fresh,
    /// Walked in through this connector; keeps the player and its offset
    Connector(usize),
}

/// Level change asked for by a tick, applied once the tick is over
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LevelRequest {
    /// Reload the start room (reset pressed or respawn due)
    Restart,
    /// The player left through `connector`, which leads to `target`
    Transition { connector: usize, target: String },
}

#[derive(Debug, Clone)]
pub struct World {
    /// Ticks since the world was created
    pub frame: u64,
    pub room: Room,
    pub camera: Camera,
    pub controls: Controls,
    pub player: Player,
    pub walls: WallSet,
    pub ladders: Pool<Ladder>,
    pub shots: Pool<PlayerShot>,
    pub lasers: Pool<Laser>,
    pub rockets: Pool<Rocket>,
    pub walkers: Pool<Walker>,
    pub drones: Pool<Drone>,
    pub seekers: Pool<Seeker>,
    pub sentries: Pool<Sentry>,
    pub boulders: Pool<Boulder>,
    pub items: Pool<Item>,
    pub boss: Option<Boss>,
    pub fx: Feedback,
    pub(crate) rng: Pcg32,
}

impl World {
    /// Empty world sized and bound from `settings`
    pub fn new(settings: &Settings) -> Self {
        let caps = &settings.capacities;
        let mut controls = Controls::new(caps.controls);
        for (action, binding) in settings.bindings() {
            if let Err(err) = controls.bind(action, binding) {
                log::warn!("{action:?} left unbound: {err}");
            }
        }
        Self {
            frame: 0,
            room: Room::default(),
            camera: Camera::default(),
            controls,
            player: Player::spawn(Vec2::ZERO),
            walls: WallSet::new(caps.walls, settings.slide_iterations),
            ladders: Pool::with_capacity(caps.ladders),
            shots: Pool::with_capacity(caps.shots),
            lasers: Pool::with_capacity(caps.lasers),
            rockets: Pool::with_capacity(caps.rockets),
            walkers: Pool::with_capacity(caps.walkers),
            drones: Pool::with_capacity(caps.drones),
            seekers: Pool::with_capacity(caps.seekers),
            sentries: Pool::with_capacity(caps.sentries),
            boulders: Pool::with_capacity(caps.boulders),
            items: Pool::with_capacity(caps.items),
            boss: None,
            fx: Feedback::new(caps.effects),
            rng: Pcg32::seed_from_u64(settings.seed),
        }
    }

    /// Drop everything that belongs to the current room
    fn clear_room(&mut self) {
        self.walls.clear();
        self.ladders.clear();
        self.shots.clear();
        self.lasers.clear();
        self.rockets.clear();
        self.walkers.clear();
        self.drones.clear();
        self.seekers.clear();
        self.sentries.clear();
        self.boulders.clear();
        self.items.clear();
        self.boss = None;
        self.fx.clear_particles();
    }

    /// Replace the room with `layout`. On a [`Entry::Connector`] entry the
    /// player keeps its state and is moved to that connector plus the
    /// recorded transition offset.
    pub fn load_level(&mut self, name: &str, layout: &LevelLayout, entry: Entry) {
        self.clear_room();
        self.room = Room {
            name: name.to_string(),
            bounds: layout.bounds(),
            filenames: layout.filenames.clone(),
            transition_offset: self.room.transition_offset,
            ..Room::default()
        };
        self.camera.bounds = layout.camera_bounds();

        let mut entered = matches!(entry, Entry::Fresh);
        for placement in &layout.placements {
            match *placement {
                Placement::Wall(bounds) => {
                    if let Err(err) = self.walls.add(bounds) {
                        log::warn!("{name}: wall dropped: {err}");
                    }
                }
                Placement::Ladder(bounds) => {
                    if let Err(err) = self.ladders.push(Ladder { bounds }) {
                        log::warn!("{name}: ladder dropped: {err}");
                    }
                }
                Placement::Connector { index, bounds } => {
                    let Some(slot) = self.room.connections.get_mut(index) else {
                        log::warn!("{name}: connector {} out of range", index + 1);
                        continue;
                    };
                    *slot = Some(Connector { bounds });
                    if entry == Entry::Connector(index) {
                        self.player.position = bounds.position() + self.room.transition_offset;
                        entered = true;
                    }
                }
                Placement::Spawn { kind, at } => self.spawn(kind, at, entry),
            }
        }
        if !entered {
            log::warn!("{name}: no connector to enter by, player left in place");
        }

        self.camera.focus(self.player.position);
        log::info!(
            "loaded {name}: {} walls, {} ladders, {} enemies",
            self.walls.len(),
            self.ladders.len(),
            self.enemy_count()
        );
    }

    fn spawn(&mut self, kind: Spawn, at: Vec2, entry: Entry) {
        let placed = match kind {
            Spawn::Player => {
                if entry == Entry::Fresh {
                    self.player = Player::spawn(at);
                }
                Ok(())
            }
            Spawn::Seeker => self.seekers.push(Seeker::spawn(at)).map(drop),
            Spawn::Item { large: false } => self.items.push(Item::small(at, None)).map(drop),
            Spawn::Item { large: true } => self.items.push(Item::large(at, None)).map(drop),
            Spawn::Drone { flip } => self.drones.push(Drone::spawn(at, flip)).map(drop),
            Spawn::Walker { flip } => self.walkers.push(Walker::spawn(at, flip)).map(drop),
            Spawn::Sentry { flip } => self.sentries.push(Sentry::spawn(at, flip)).map(drop),
            Spawn::Boss => {
                self.boss = Some(Boss::spawn(at));
                Ok(())
            }
            Spawn::Boulder => {
                self.spawn_boulder(at);
                Ok(())
            }
        };
        if let Err(err) = placed {
            log::trace!("{kind:?} at {at} not spawned: {err}");
        }
    }

    /// Live enemies, the boss included
    pub fn enemy_count(&self) -> usize {
        self.walkers.len()
            + self.drones.len()
            + self.seekers.len()
            + self.sentries.len()
            + self.boulders.len()
            + usize::from(self.boss.is_some())
    }
}
