//! Fixed timestep simulation tick
//!
//! One call advances the world by one step in a fixed order: controls,
//! player, player shots, boulders, walkers, drones, seekers, lasers,
//! rockets, sentries, items, boss, particles, then the room exit check.

use super::input::{Action, InputEvent};
use super::state::{LevelRequest, World};

impl World {
    /// Advance one tick with the raw input events gathered since the last.
    ///
    /// Level changes are never made here; they are returned for the caller
    /// to apply between ticks. A restart wins over a transition. Events in
    /// `fx` cover this tick only; read or drain them before the next call.
    pub fn tick(&mut self, input: &[InputEvent]) -> Option<LevelRequest> {
        self.fx.begin_tick();
        self.controls.begin_tick();
        for event in input {
            self.controls.dispatch(event);
        }

        let respawn = self.tick_player();
        self.step_shots();
        self.tick_boulders();
        self.tick_walkers();
        self.tick_drones();
        self.tick_seekers();
        self.tick_lasers();
        self.tick_rockets();
        self.tick_sentries();
        self.tick_items();
        self.tick_boss();
        self.fx.step();

        let exit = self.room_exit();
        self.frame += 1;

        if self.controls.state(Action::Reset).pressed {
            log::info!("restart requested");
            return Some(LevelRequest::Restart);
        }
        if respawn {
            log::info!("respawning");
            return Some(LevelRequest::Restart);
        }
        exit
    }

    /// Transition for a player outside the room standing in a connector.
    /// Records the offset into the connector for placement in the next room.
    pub fn room_exit(&mut self) -> Option<LevelRequest> {
        let at = self.player.position;
        if self.room.bounds.contains(at) {
            return None;
        }
        let connector = self.room.connector_at(at)?;
        let bounds = self.room.connections[connector].as_ref()?.bounds;
        self.room.transition_offset = at - bounds.position();
        match self.room.filename(connector) {
            Some(target) => Some(LevelRequest::Transition {
                connector,
                target: target.to_string(),
            }),
            None => {
                log::warn!(
                    "{}: connector {} leads nowhere",
                    self.room.name,
                    connector + 1
                );
                None
            }
        }
    }
}
