//! Device-independent controls
//!
//! Each control is bound to a key, a joystick button or one side of a
//! joystick axis. Raw events are folded into a per-tick
//! pressed/held/released/frames-held state that gameplay code reads.

use serde::{Deserialize, Serialize};

use super::pool::{Pool, PoolFull};
use crate::consts::JOY_THRESHOLD;

/// Key codes for the default keyboard layout (SDL keycode numbering)
pub mod keycode {
    pub const BACKSPACE: u32 = 8;
    pub const D: u32 = b'd' as u32;
    pub const F: u32 = b'f' as u32;
    pub const RIGHT: u32 = 0x4000_004F;
    pub const LEFT: u32 = 0x4000_0050;
    pub const DOWN: u32 = 0x4000_0051;
    pub const UP: u32 = 0x4000_0052;
}

/// Physical input a control listens to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Binding {
    Key { code: u32 },
    Button { index: u8 },
    /// One direction of an analog axis; `sign` is -1 or 1
    Axis { axis: u8, sign: i8 },
}

impl Binding {
    pub fn key(code: u32) -> Self {
        Binding::Key { code }
    }

    pub fn button(index: u8) -> Self {
        Binding::Button { index }
    }

    pub fn axis(axis: u8, side: i8) -> Self {
        Binding::Axis {
            axis,
            sign: if side > 0 { 1 } else { -1 },
        }
    }

    /// New held state this event implies, or `None` if it is unrelated
    fn apply(&self, event: &InputEvent) -> Option<bool> {
        match (*self, *event) {
            (Binding::Key { code }, InputEvent::KeyDown { code: c }) if c == code => Some(true),
            (Binding::Key { code }, InputEvent::KeyUp { code: c }) if c == code => Some(false),
            (Binding::Button { index }, InputEvent::ButtonDown { button }) if button == index => {
                Some(true)
            }
            (Binding::Button { index }, InputEvent::ButtonUp { button }) if button == index => {
                Some(false)
            }
            (Binding::Axis { axis, sign }, InputEvent::AxisMotion { axis: a, value })
                if a == axis =>
            {
                Some(value.saturating_mul(i32::from(sign)) > JOY_THRESHOLD)
            }
            _ => None,
        }
    }
}

/// Raw device event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum InputEvent {
    KeyDown { code: u32 },
    KeyUp { code: u32 },
    ButtonDown { button: u8 },
    ButtonUp { button: u8 },
    AxisMotion { axis: u8, value: i32 },
}

/// Per-tick state of one control
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ControlState {
    /// Went down this tick
    pub pressed: bool,
    pub held: bool,
    /// Went up this tick
    pub released: bool,
    /// Ticks since the last change of `held`
    pub frames: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Control {
    pub binding: Binding,
    pub state: ControlState,
}

impl Control {
    fn begin_tick(&mut self) {
        self.state.pressed = false;
        self.state.released = false;
        self.state.frames = self.state.frames.saturating_add(1);
    }

    fn dispatch(&mut self, event: &InputEvent) {
        match self.binding.apply(event) {
            Some(true) if !self.state.held => {
                self.state.held = true;
                self.state.pressed = true;
                self.state.frames = 0;
            }
            Some(false) if self.state.held => {
                self.state.held = false;
                self.state.released = true;
                self.state.frames = 0;
            }
            _ => {}
        }
    }
}

const ACTION_COUNT: usize = 7;

/// Gameplay actions read by the simulation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    Left,
    Right,
    Up,
    Down,
    Jump,
    Fire,
    Reset,
}

impl Action {
    pub const ALL: [Action; ACTION_COUNT] = [
        Action::Left,
        Action::Right,
        Action::Up,
        Action::Down,
        Action::Jump,
        Action::Fire,
        Action::Reset,
    ];

    fn slot(self) -> usize {
        self as usize
    }
}

/// All bound controls plus the action each one drives
#[derive(Debug, Clone)]
pub struct Controls {
    controls: Pool<Control>,
    actions: [Option<usize>; ACTION_COUNT],
}

impl Controls {
    pub fn new(capacity: usize) -> Self {
        Self {
            controls: Pool::with_capacity(capacity),
            actions: [None; ACTION_COUNT],
        }
    }

    /// Bind `action` to a new control. Rebinding an action replaces which
    /// control it reads; the old control keeps receiving events.
    pub fn bind(&mut self, action: Action, binding: Binding) -> Result<usize, PoolFull> {
        let index = self.controls.push(Control {
            binding,
            state: ControlState::default(),
        })?;
        self.actions[action.slot()] = Some(index);
        Ok(index)
    }

    /// Clear one-tick pulses and age every control
    pub fn begin_tick(&mut self) {
        for control in self.controls.iter_mut() {
            control.begin_tick();
        }
    }

    /// Offer a raw event to every control
    pub fn dispatch(&mut self, event: &InputEvent) {
        for control in self.controls.iter_mut() {
            control.dispatch(event);
        }
    }

    /// State of the control bound to `action`; unbound actions read as idle
    pub fn state(&self, action: Action) -> ControlState {
        self.actions[action.slot()]
            .and_then(|i| self.controls.get(i))
            .map(|c| c.state)
            .unwrap_or_default()
    }

    pub fn controls(&self) -> &[Control] {
        &self.controls
    }
}
