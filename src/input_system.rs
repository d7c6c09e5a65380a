// Input handling - translates raw SDL2 keyboard state into the boolean
// queries the simulation consumes. The core only ever sees InputState, so
// tests can drive the player without a window.

use crate::game::types::Direction;
use sdl2::keyboard::{KeyboardState, Scancode};

/// Snapshot of the held inputs for one tick
#[derive(Debug, Clone, Copy, Default)]
pub struct InputState {
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
    pub pump: bool,
}

impl InputState {
    /// Single active movement direction. When several keys are held the
    /// priority order is up, down, left, right.
    pub fn direction(&self) -> Direction {
        if self.up {
            Direction::Up
        } else if self.down {
            Direction::Down
        } else if self.left {
            Direction::Left
        } else if self.right {
            Direction::Right
        } else {
            Direction::None
        }
    }
}

/// Read the held keys for this frame (arrows + WASD, space to pump)
pub fn read_input(keyboard: &KeyboardState) -> InputState {
    let held = |sc: Scancode| keyboard.is_scancode_pressed(sc);

    InputState {
        up: held(Scancode::Up) || held(Scancode::W),
        down: held(Scancode::Down) || held(Scancode::S),
        left: held(Scancode::Left) || held(Scancode::A),
        right: held(Scancode::Right) || held(Scancode::D),
        pump: held(Scancode::Space),
    }
}
