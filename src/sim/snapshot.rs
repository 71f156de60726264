//! Read-only view of a frame for the renderer and HUD
//!
//! Serialized to JSON and handed to the page every frame. Positions are
//! flattened to `x`/`z` so the host can feed them straight into its scene.

use serde::Serialize;

use super::camera::{CameraPose, follow};
use super::state::{Actor, GamePhase, GameState};

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ActorView {
    pub x: f32,
    pub z: f32,
    pub facing: f32,
}

impl From<&Actor> for ActorView {
    fn from(actor: &Actor) -> Self {
        Self {
            x: actor.pos.x,
            z: actor.pos.y,
            facing: actor.facing,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DroppingView {
    pub id: u32,
    pub x: f32,
    pub z: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FrameSnapshot {
    pub phase: GamePhase,
    pub is_victory: bool,
    pub time_remaining: u32,
    pub droppings_collected: u32,
    pub player: ActorView,
    pub rabbit: ActorView,
    pub rabbit_escaping: bool,
    pub droppings: Vec<DroppingView>,
    pub camera: CameraPose,
}

impl FrameSnapshot {
    pub fn capture(state: &GameState) -> Self {
        Self {
            phase: state.session.phase,
            is_victory: state.session.is_victory,
            time_remaining: state.session.time_remaining,
            droppings_collected: state.session.droppings_collected,
            player: ActorView::from(&state.player),
            rabbit: ActorView::from(&state.rabbit),
            rabbit_escaping: state.rabbit_ai.is_escaping,
            droppings: state
                .droppings
                .list_active()
                .iter()
                .map(|c| DroppingView {
                    id: c.id,
                    x: c.pos.x,
                    z: c.pos.y,
                })
                .collect(),
            camera: follow(
                state.player.pos,
                state.tuning.camera_height,
                state.tuning.camera_distance,
            ),
        }
    }

    pub fn to_json(&self) -> Result<String, crate::Error> {
        Ok(serde_json::to_string(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capture_flattens_positions() {
        let mut state = GameState::new(5);
        state.start_game(0.0);
        state.set_player_position(1.0, 2.0);

        let snap = FrameSnapshot::capture(&state);
        assert_eq!(snap.phase, GamePhase::Active);
        assert_eq!(snap.player.x, 1.0);
        assert_eq!(snap.player.z, 2.0);
        assert_eq!(snap.rabbit.x, 10.0);
        assert_eq!(snap.droppings.len(), 3);
        assert_eq!(snap.camera.look_at.z, 2.0);

        let json = snap.to_json().unwrap();
        assert!(json.contains("\"phase\":\"Active\""));
        assert!(json.contains("\"time_remaining\":60"));
    }
}
