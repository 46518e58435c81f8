//! Scripted input
//!
//! A replay is a JSON list of the raw events to feed on given ticks:
//!
//! ```json
//! [
//!   {"tick": 0, "events": [{"type": "key_down", "code": 1073741903}]},
//!   {"tick": 30, "events": [{"type": "key_up", "code": 1073741903}]}
//! ]
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::sim::InputEvent;

#[derive(Debug, Error)]
pub enum ScriptError {
    #[error("failed to read input script: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed input script: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct ScriptEntry {
    tick: u64,
    events: Vec<InputEvent>,
}

/// Input events keyed by the tick they arrive on
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InputScript {
    entries: Vec<ScriptEntry>,
}

impl InputScript {
    pub fn from_json(json: &str) -> Result<Self, ScriptError> {
        let mut entries: Vec<ScriptEntry> = serde_json::from_str(json)?;
        entries.sort_by_key(|e| e.tick);
        Ok(Self { entries })
    }

    pub fn load(path: &Path) -> Result<Self, ScriptError> {
        let script = Self::from_json(&std::fs::read_to_string(path)?)?;
        log::info!(
            "Loaded {} scripted ticks from {}",
            script.entries.len(),
            path.display()
        );
        Ok(script)
    }

    /// Events for `tick`, in script order
    pub fn events_for(&self, tick: u64) -> Vec<InputEvent> {
        self.entries
            .iter()
            .filter(|e| e.tick == tick)
            .flat_map(|e| e.events.iter().copied())
            .collect()
    }

    /// Last tick with scripted input
    pub fn last_tick(&self) -> Option<u64> {
        self.entries.last().map(|e| e.tick)
    }
}
