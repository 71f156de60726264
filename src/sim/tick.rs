//! Per-frame simulation step
//!
//! The host calls [`tick`] once per rendered frame with that frame's delta.
//! Order within a frame is fixed so proximity always sees post-movement
//! positions:
//!
//! player move -> rabbit AI + move -> dropping spawn -> proximity -> countdown

use glam::Vec2;

use super::collision::resolve_proximity;
use super::state::{GameEvent, GamePhase, GameState};

/// Longest frame the simulation will integrate in one go
pub const MAX_FRAME_DT: f32 = 0.25;

/// Input snapshot for a single frame
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TickInput {
    /// Player direction, x = world x, y = world z. Clamped to the unit circle.
    pub move_dir: Vec2,
}

impl TickInput {
    pub fn moving(x: f32, z: f32) -> Self {
        Self {
            move_dir: Vec2::new(x, z),
        }
    }
}

/// Advance the game by one frame of `dt` seconds
pub fn tick(state: &mut GameState, input: &TickInput, dt: f32) {
    let dt = if dt.is_finite() {
        dt.clamp(0.0, MAX_FRAME_DT)
    } else {
        0.0
    };

    match state.session.phase {
        GamePhase::Idle => return,
        GamePhase::Ended => {
            // Player walks back to the middle for the game-over screen
            state.player.snap_to(Vec2::ZERO);
            return;
        }
        GamePhase::Active => {}
    }

    state.time_ticks += 1;
    // Speeds are tuned per 60 Hz frame
    let frames = dt * state.tuning.reference_fps;

    // --- PLAYER ---
    state.player.steer(
        input.move_dir,
        state.tuning.player_speed * frames,
        state.tuning.arena_bound,
        state.tuning.facing_deadzone,
    );

    // --- RABBIT ---
    state.rabbit_ai.update(
        &mut state.rabbit,
        state.player.pos,
        dt,
        frames,
        &state.tuning,
        &mut state.rng,
    );

    // --- DROPPINGS ---
    if let Some(id) = state
        .droppings
        .tick(dt, state.rabbit.pos, state.tuning.spawn_interval_secs)
    {
        state.events.push(GameEvent::DroppingSpawned { id });
    }

    // --- PROXIMITY ---
    resolve_proximity(state);

    // --- CLOCK ---
    if state.session.tick(dt) {
        state.events.push(GameEvent::TimeUp);
    }
}
