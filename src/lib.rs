//! Rabbit Chase - catch the rabbit before the clock runs out
//!
//! Core modules:
//! - `sim`: Frame simulation (movement, rabbit AI, pickups, session state)
//! - `events`: Side-channel for audio/UI reactions to simulation events
//! - `platform`: Browser/native platform abstraction (time, input, storage)
//! - `ranking`: Local leaderboards
//! - `settings`: Persisted player preferences
//! - `tuning`: Data-driven game balance

#[cfg(target_arch = "wasm32")]
pub mod audio;
pub mod error;
pub mod events;
pub mod platform;
pub mod ranking;
pub mod settings;
pub mod sim;
pub mod tuning;

pub use error::Error;
pub use ranking::Rankings;
pub use settings::Settings;
pub use tuning::Tuning;

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Actors are clamped to this half-width (walls sit at `WALL_DISTANCE`)
    pub const ARENA_BOUND: f32 = 14.0;
    pub const WALL_DISTANCE: f32 = 15.0;

    /// Countdown budget at the start of a round
    pub const START_TIME_SECS: u32 = 60;
    /// Seconds granted per collected dropping
    pub const BONUS_SECS: u32 = 2;

    /// Speeds are world units per reference frame
    pub const REFERENCE_FPS: f32 = 60.0;
    pub const PLAYER_SPEED: f32 = 0.075;
    pub const RABBIT_WANDER_SPEED: f32 = 0.07;
    /// Faster than the player on purpose
    pub const RABBIT_ESCAPE_SPEED: f32 = 0.12;

    /// Rabbit starts fleeing inside this distance
    pub const FLEE_RADIUS: f32 = 5.0;
    /// How far ahead of itself a fleeing rabbit aims
    pub const FLEE_DISTANCE: f32 = 10.0;
    /// Fleeing stops once the player is this far away
    pub const CALM_RADIUS: f32 = 8.0;
    /// Wander target is re-rolled after this long
    pub const WANDER_INTERVAL_SECS: f32 = 3.0;
    /// Random wander targets stay inside this half-width
    pub const WANDER_MARGIN: f32 = 13.0;

    /// A dropping is left behind this often while a round is active
    pub const SPAWN_INTERVAL_SECS: f32 = 5.0;

    pub const COLLECT_RADIUS: f32 = 1.0;
    pub const CATCH_RADIUS: f32 = 1.5;

    /// Facing only turns when input exceeds this magnitude
    pub const FACING_DEADZONE: f32 = 0.1;

    /// Camera rides above and behind the player
    pub const CAMERA_HEIGHT: f32 = 5.0;
    pub const CAMERA_DISTANCE: f32 = 8.0;

    pub const PLAYER_START: (f32, f32) = (0.0, 0.0);
    pub const RABBIT_START: (f32, f32) = (10.0, 10.0);
    /// Droppings placed at round start so the arena isn't empty
    pub const STARTER_DROPPINGS: [(f32, f32); 3] = [(5.0, 5.0), (-5.0, 5.0), (0.0, -5.0)];

    pub const MAX_NAME_CHARS: usize = 10;
    pub const MAX_RANKING_ENTRIES: usize = 5;
}

/// Clamp a ground position into the square arena
#[inline]
pub fn clamp_to_arena(pos: Vec2, bound: f32) -> Vec2 {
    Vec2::new(pos.x.clamp(-bound, bound), pos.y.clamp(-bound, bound))
}

/// Yaw for a ground direction, with +z as forward.
///
/// Returns `None` inside the deadzone so callers keep their previous facing.
#[inline]
pub fn facing_angle(dir: Vec2, deadzone: f32) -> Option<f32> {
    if dir.length() > deadzone {
        Some(dir.x.atan2(dir.y))
    } else {
        None
    }
}

/// Clamp an input direction to the unit circle; non-finite input means "no input"
#[inline]
pub fn sanitize_direction(dir: Vec2) -> Vec2 {
    if !dir.is_finite() {
        return Vec2::ZERO;
    }
    dir.clamp_length_max(1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clamp_to_arena() {
        let p = clamp_to_arena(Vec2::new(20.0, -30.0), consts::ARENA_BOUND);
        assert_eq!(p, Vec2::new(14.0, -14.0));

        let inside = Vec2::new(3.0, -2.5);
        assert_eq!(clamp_to_arena(inside, consts::ARENA_BOUND), inside);
    }

    #[test]
    fn test_facing_angle_deadzone() {
        assert!(facing_angle(Vec2::new(0.05, 0.05), 0.1).is_none());

        // +z is forward, +x is a quarter turn
        let forward = facing_angle(Vec2::new(0.0, 1.0), 0.1).unwrap();
        assert!(forward.abs() < 1e-6);
        let right = facing_angle(Vec2::new(1.0, 0.0), 0.1).unwrap();
        assert!((right - std::f32::consts::FRAC_PI_2).abs() < 1e-6);
    }

    #[test]
    fn test_sanitize_direction() {
        let d = sanitize_direction(Vec2::new(3.0, 4.0));
        assert!((d.length() - 1.0).abs() < 1e-6);
        assert_eq!(sanitize_direction(Vec2::new(f32::NAN, 0.0)), Vec2::ZERO);
        assert_eq!(sanitize_direction(Vec2::new(0.5, 0.0)), Vec2::new(0.5, 0.0));
    }
}
