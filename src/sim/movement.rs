//! Movement integration
//!
//! Direct position integration with manual bounds clamping. No forces, no
//! velocity: each frame an actor moves `step` units along its input
//! direction and is clamped back into the arena.

use glam::Vec2;

use super::state::Actor;
use crate::{clamp_to_arena, facing_angle, sanitize_direction};

/// New position after moving `step` units along `dir`.
///
/// `dir` is clamped to the unit circle first; a zero vector means no input.
#[inline]
pub fn integrate(pos: Vec2, dir: Vec2, step: f32, bound: f32) -> Vec2 {
    clamp_to_arena(pos + sanitize_direction(dir) * step, bound)
}

impl Actor {
    /// Move along `dir` and turn to face it.
    ///
    /// Facing only changes when the input clears `deadzone`, so noisy input
    /// near zero doesn't make the actor twitch.
    pub fn steer(&mut self, dir: Vec2, step: f32, bound: f32, deadzone: f32) {
        let dir = sanitize_direction(dir);
        self.pos = integrate(self.pos, dir, step, bound);
        if let Some(angle) = facing_angle(dir, deadzone) {
            self.facing = angle;
        }
    }

    /// Teleport, no integration
    pub fn snap_to(&mut self, pos: Vec2) {
        self.pos = pos;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::*;

    #[test]
    fn test_integrate_moves_along_direction() {
        let p = integrate(Vec2::ZERO, Vec2::new(1.0, 0.0), PLAYER_SPEED, ARENA_BOUND);
        assert!((p.x - PLAYER_SPEED).abs() < 1e-6);
        assert_eq!(p.y, 0.0);

        // y input drives world z
        let p = integrate(Vec2::ZERO, Vec2::new(0.0, -1.0), 0.5, ARENA_BOUND);
        assert_eq!(p, Vec2::new(0.0, -0.5));
    }

    #[test]
    fn test_integrate_clamps_at_bound() {
        let p = integrate(Vec2::new(13.99, -13.99), Vec2::new(1.0, -1.0), 1.0, ARENA_BOUND);
        assert_eq!(p, Vec2::new(14.0, -14.0));
    }

    #[test]
    fn test_oversized_input_is_clamped() {
        let p = integrate(Vec2::ZERO, Vec2::new(10.0, 0.0), 0.1, ARENA_BOUND);
        assert!((p.x - 0.1).abs() < 1e-6);
    }

    #[test]
    fn test_zero_input_keeps_facing() {
        let mut actor = Actor::at(0.0, 0.0);
        actor.steer(Vec2::new(1.0, 0.0), 0.1, ARENA_BOUND, FACING_DEADZONE);
        let facing = actor.facing;
        assert!((facing - std::f32::consts::FRAC_PI_2).abs() < 1e-6);

        actor.steer(Vec2::ZERO, 0.1, ARENA_BOUND, FACING_DEADZONE);
        assert_eq!(actor.facing, facing);

        // Below the deadzone: moves a hair but doesn't turn
        actor.steer(Vec2::new(0.0, 0.05), 0.1, ARENA_BOUND, FACING_DEADZONE);
        assert_eq!(actor.facing, facing);
    }
}
