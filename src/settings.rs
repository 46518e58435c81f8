//! Runtime settings
//!
//! Loaded from a JSON file. Every field has a default, so a partial file
//! only overrides what it names.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts::TICK_SECONDS;
use crate::sim::input::{Action, Binding, keycode};
use crate::sim::motion::SLIDE_ITERATIONS;

/// Accepted tick lengths in seconds
const MIN_TICK_SECONDS: f64 = 0.001;
const MAX_TICK_SECONDS: f64 = 1.0;

/// Built-in control layouts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum InputPreset {
    #[default]
    Keyboard,
    Joystick,
}

impl InputPreset {
    pub fn as_str(&self) -> &'static str {
        match self {
            InputPreset::Keyboard => "Keyboard",
            InputPreset::Joystick => "Joystick",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "keyboard" | "keys" => Some(InputPreset::Keyboard),
            "joystick" | "joy" | "gamepad" => Some(InputPreset::Joystick),
            _ => None,
        }
    }

    pub fn bindings(&self) -> Vec<(Action, Binding)> {
        match self {
            InputPreset::Keyboard => vec![
                (Action::Left, Binding::key(keycode::LEFT)),
                (Action::Right, Binding::key(keycode::RIGHT)),
                (Action::Up, Binding::key(keycode::UP)),
                (Action::Down, Binding::key(keycode::DOWN)),
                (Action::Jump, Binding::key(keycode::D)),
                (Action::Fire, Binding::key(keycode::F)),
                (Action::Reset, Binding::key(keycode::BACKSPACE)),
            ],
            InputPreset::Joystick => vec![
                (Action::Left, Binding::axis(0, -1)),
                (Action::Right, Binding::axis(0, 1)),
                (Action::Up, Binding::axis(1, -1)),
                (Action::Down, Binding::axis(1, 1)),
                (Action::Jump, Binding::button(0)),
                (Action::Fire, Binding::button(2)),
                (Action::Reset, Binding::button(8)),
            ],
        }
    }
}

/// Where the player appears after walking through a connector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum EntryPolicy {
    /// The connector with the same digit in the new room
    #[default]
    SameIndex,
    /// The connector in the new room that leads back to the old one, falling
    /// back to the same digit
    BackLink,
}

impl EntryPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            EntryPolicy::SameIndex => "SameIndex",
            EntryPolicy::BackLink => "BackLink",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().replace(['-', '_'], "").as_str() {
            "sameindex" | "index" => Some(EntryPolicy::SameIndex),
            "backlink" | "back" => Some(EntryPolicy::BackLink),
            _ => None,
        }
    }
}

/// Pool sizes for everything the world stores
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Capacities {
    pub controls: usize,
    pub walls: usize,
    pub ladders: usize,
    /// Live particles
    pub effects: usize,
    pub shots: usize,
    pub walkers: usize,
    pub drones: usize,
    pub seekers: usize,
    pub sentries: usize,
    pub lasers: usize,
    pub rockets: usize,
    pub items: usize,
    pub boulders: usize,
}

impl Default for Capacities {
    fn default() -> Self {
        Self {
            controls: 16,
            walls: 512,
            ladders: 64,
            effects: 32,
            shots: 3,
            walkers: 16,
            drones: 16,
            seekers: 16,
            sentries: 16,
            lasers: 32,
            rockets: 32,
            items: 8,
            boulders: 1,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Seconds per simulation tick
    pub tick_seconds: f64,
    /// Level file loaded at start and on restart
    pub start_room: String,
    /// Seed for item drops and boss decisions
    pub seed: u64,
    pub input_preset: InputPreset,
    /// Replaces the preset's bindings when set
    pub bindings: Option<Vec<(Action, Binding)>>,
    pub capacities: Capacities,
    pub slide_iterations: usize,
    pub entry_policy: EntryPolicy,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            tick_seconds: TICK_SECONDS,
            start_room: "startroom.txt".to_string(),
            seed: 0,
            input_preset: InputPreset::Keyboard,
            bindings: None,
            capacities: Capacities::default(),
            slide_iterations: SLIDE_ITERATIONS,
            entry_policy: EntryPolicy::SameIndex,
        }
    }
}

impl Settings {
    /// Create settings using a control preset
    pub fn from_preset(preset: InputPreset) -> Self {
        Self {
            input_preset: preset,
            ..Self::default()
        }
    }

    /// Bindings in effect: the explicit list if present, else the preset's
    pub fn bindings(&self) -> Vec<(Action, Binding)> {
        match &self.bindings {
            Some(list) => list.clone(),
            None => self.input_preset.bindings(),
        }
    }

    /// Parse settings, pulling out-of-range values back into range
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str::<Self>(json).map(Self::clamped)
    }

    fn clamped(mut self) -> Self {
        if !(MIN_TICK_SECONDS..=MAX_TICK_SECONDS).contains(&self.tick_seconds) {
            let clamped = if self.tick_seconds.is_nan() {
                TICK_SECONDS
            } else {
                self.tick_seconds.clamp(MIN_TICK_SECONDS, MAX_TICK_SECONDS)
            };
            log::warn!("tick_seconds {} out of range, using {clamped}", self.tick_seconds);
            self.tick_seconds = clamped;
        }
        if self.slide_iterations == 0 {
            log::warn!("slide_iterations must be at least 1, using {SLIDE_ITERATIONS}");
            self.slide_iterations = SLIDE_ITERATIONS;
        }
        self
    }

    /// Load settings from `path`, falling back to defaults if the file is
    /// missing or malformed
    pub fn load(path: &Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(json) => match Self::from_json(&json) {
                Ok(settings) => {
                    log::info!("Loaded settings from {}", path.display());
                    settings
                }
                Err(err) => {
                    log::warn!("Ignoring malformed settings {}: {err}", path.display());
                    Self::default()
                }
            },
            Err(err) => {
                log::info!("Using default settings ({}: {err})", path.display());
                Self::default()
            }
        }
    }

    pub fn save(&self, path: &Path) -> std::io::Result<()> {
        let json = serde_json::to_string_pretty(self).map_err(std::io::Error::other)?;
        std::fs::write(path, json)?;
        log::info!("Settings saved to {}", path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_json_keeps_defaults() {
        let settings =
            Settings::from_json(r#"{"seed": 42, "capacities": {"shots": 5}}"#).unwrap();
        assert_eq!(settings.seed, 42);
        assert_eq!(settings.capacities.shots, 5);
        assert_eq!(settings.capacities.walls, 512);
        assert_eq!(settings.start_room, "startroom.txt");
        assert_eq!(settings.slide_iterations, 2);
    }

    #[test]
    fn test_explicit_bindings_override_preset() {
        let json = r#"{
            "input_preset": "Joystick",
            "bindings": [["jump", {"kind": "key", "code": 32}]]
        }"#;
        let settings = Settings::from_json(json).unwrap();
        assert_eq!(settings.bindings(), vec![(Action::Jump, Binding::key(32))]);

        let preset = Settings::from_preset(InputPreset::Joystick);
        assert_eq!(preset.bindings().len(), Action::ALL.len());
        assert!(preset.bindings().contains(&(Action::Left, Binding::axis(0, -1))));
    }

    #[test]
    fn test_preset_names() {
        assert_eq!(InputPreset::from_str("JOY"), Some(InputPreset::Joystick));
        assert_eq!(InputPreset::from_str("mouse"), None);
        assert_eq!(EntryPolicy::from_str("back-link"), Some(EntryPolicy::BackLink));
        for policy in [EntryPolicy::SameIndex, EntryPolicy::BackLink] {
            assert_eq!(EntryPolicy::from_str(policy.as_str()), Some(policy));
        }
    }

    #[test]
    fn test_out_of_range_values_are_clamped() {
        let settings =
            Settings::from_json(r#"{"tick_seconds": 1e300, "slide_iterations": 0}"#).unwrap();
        assert_eq!(settings.tick_seconds, MAX_TICK_SECONDS);
        assert_eq!(settings.slide_iterations, SLIDE_ITERATIONS);

        let settings = Settings::from_json(r#"{"tick_seconds": -2.0}"#).unwrap();
        assert_eq!(settings.tick_seconds, MIN_TICK_SECONDS);
        let settings = Settings::from_json(r#"{"tick_seconds": 0.02, "slide_iterations": 4}"#)
            .unwrap();
        assert_eq!(settings.tick_seconds, 0.02);
        assert_eq!(settings.slide_iterations, 4);
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let settings = Settings::load(Path::new("/nonexistent/figjam.json"));
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn test_save_round_trip() {
        let name = format!("figjam-settings-{}.json", std::process::id());
        let path = std::env::temp_dir().join(name);
        let mut settings = Settings::from_preset(InputPreset::Joystick);
        settings.entry_policy = EntryPolicy::BackLink;
        settings.save(&path).unwrap();
        assert_eq!(Settings::load(&path), settings);
        let _ = std::fs::remove_file(&path);
    }
}
