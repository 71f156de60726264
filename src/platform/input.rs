//! Input polling
//!
//! Key and joystick events only update this state; the frame loop reads one
//! direction from it per frame. Screen up is world -z.

use glam::Vec2;

use crate::sanitize_direction;
use crate::sim::TickInput;

/// Arrow keys / WASD currently held
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct KeyboardState {
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
}

impl KeyboardState {
    /// Update from a key event. Returns false for keys we don't track.
    pub fn handle_key(&mut self, key: &str, pressed: bool) -> bool {
        let slot = match key {
            "ArrowUp" | "w" | "W" => &mut self.up,
            "ArrowDown" | "s" | "S" => &mut self.down,
            "ArrowLeft" | "a" | "A" => &mut self.left,
            "ArrowRight" | "d" | "D" => &mut self.right,
            _ => return false,
        };
        *slot = pressed;
        true
    }

    pub fn release_all(&mut self) {
        *self = Self::default();
    }

    /// Held keys as a direction; diagonals are scaled to unit length
    pub fn direction(&self) -> Vec2 {
        let axis = |neg: bool, pos: bool| (pos as i8 - neg as i8) as f32;
        let x = axis(self.left, self.right);
        let y = axis(self.up, self.down);
        if x != 0.0 && y != 0.0 {
            Vec2::new(x, y) * std::f32::consts::FRAC_1_SQRT_2
        } else {
            Vec2::new(x, y)
        }
    }
}

/// Everything that can steer the player
#[derive(Debug, Clone, Default)]
pub struct InputState {
    pub keyboard: KeyboardState,
    /// Virtual joystick vector while the stick is held
    joystick: Option<Vec2>,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn key_down(&mut self, key: &str) -> bool {
        self.keyboard.handle_key(key, true)
    }

    pub fn key_up(&mut self, key: &str) -> bool {
        self.keyboard.handle_key(key, false)
    }

    /// `None` or a zero vector releases the stick
    pub fn set_joystick(&mut self, dir: Option<Vec2>) {
        self.joystick = dir.map(sanitize_direction).filter(|d| *d != Vec2::ZERO);
    }

    /// Window lost focus: key-up events won't arrive, so drop everything
    pub fn blur(&mut self) {
        self.keyboard.release_all();
        self.joystick = None;
    }

    /// Current direction; the joystick wins while held
    pub fn direction(&self) -> Vec2 {
        self.joystick
            .unwrap_or_else(|| sanitize_direction(self.keyboard.direction()))
    }

    pub fn tick_input(&self) -> TickInput {
        TickInput {
            move_dir: self.direction(),
        }
    }
}
