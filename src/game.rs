//! Game driver
//!
//! Owns the [`World`] and the level source. Ticks never load levels
//! themselves; the request a tick returns is applied here once the tick is
//! over, and a level that fails to load leaves the current room running.

use crate::level::{LevelLayout, LevelLoadError, LevelSource};
use crate::settings::{EntryPolicy, Settings};
use crate::sim::{Entry, GameEvent, InputEvent, LevelRequest, World};

pub struct Game<S: LevelSource> {
    pub world: World,
    source: S,
    settings: Settings,
}

impl<S: LevelSource> Game<S> {
    /// Build the world and load the start room
    pub fn new(settings: Settings, source: S) -> Result<Self, LevelLoadError> {
        let mut game = Self {
            world: World::new(&settings),
            source,
            settings,
        };
        game.restart()?;
        Ok(game)
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Run one tick, apply any level change it asked for, and hand back the
    /// events it produced
    pub fn step(&mut self, input: &[InputEvent]) -> Vec<GameEvent> {
        if let Some(request) = self.world.tick(input) {
            if let Err(err) = self.apply(request) {
                log::warn!("level change failed, staying in {}: {err}", self.world.room.name);
            }
        }
        self.world.fx.drain()
    }

    /// Perform a level change. The new level is parsed in full before the
    /// world is touched.
    pub fn apply(&mut self, request: LevelRequest) -> Result<(), LevelLoadError> {
        match request {
            LevelRequest::Restart => self.restart(),
            LevelRequest::Transition { connector, target } => self.enter(connector, &target),
        }
    }

    /// Reload the start room with a fresh player
    pub fn restart(&mut self) -> Result<(), LevelLoadError> {
        let name = self.settings.start_room.clone();
        let layout = self.source.layout(&name)?;
        if layout.player_spawn().is_none() {
            return Err(LevelLoadError::MissingPlayerSpawn { name });
        }
        self.world.load_level(&name, &layout, Entry::Fresh);
        Ok(())
    }

    fn enter(&mut self, connector: usize, target: &str) -> Result<(), LevelLoadError> {
        let layout = self.source.layout(target)?;
        let index = self.entry_index(&layout, connector);
        log::debug!(
            "{} -> {target} through connector {}, entering at {}",
            self.world.room.name,
            connector + 1,
            index + 1
        );
        self.world.load_level(target, &layout, Entry::Connector(index));
        Ok(())
    }

    /// Connector of the new room the player comes out of
    fn entry_index(&self, layout: &LevelLayout, connector: usize) -> usize {
        match self.settings.entry_policy {
            EntryPolicy::SameIndex => connector,
            EntryPolicy::BackLink => layout
                .filenames
                .iter()
                .rposition(|name| *name == self.world.room.name)
                .unwrap_or(connector),
        }
    }
}
