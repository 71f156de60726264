//! Game state and core simulation types
//!
//! One `GameState` per running game. It owns the session, both actors, the
//! rabbit's brain, the droppings on the floor and the RNG that drives
//! wandering. Only commands on `GameState` and [`super::tick`] mutate it.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::droppings::DroppingField;
use super::rabbit::RabbitAi;
use super::session::Session;
use crate::clamp_to_arena;
use crate::consts::{PLAYER_START, RABBIT_START};
use crate::tuning::Tuning;

/// Current phase of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum GamePhase {
    /// Waiting for the player to start a round
    #[default]
    Idle,
    /// Clock is running, actors move
    Active,
    /// Rabbit caught or time ran out
    Ended,
}

/// A moving entity on the ground plane.
///
/// `pos.x` is world x, `pos.y` is world z; height is fixed.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Actor {
    pub pos: Vec2,
    /// Yaw in radians, 0 = facing +z
    pub facing: f32,
}

impl Actor {
    pub fn at(x: f32, z: f32) -> Self {
        Self {
            pos: Vec2::new(x, z),
            facing: 0.0,
        }
    }

    pub fn player_start() -> Self {
        Self::at(PLAYER_START.0, PLAYER_START.1)
    }

    pub fn rabbit_start() -> Self {
        Self::at(RABBIT_START.0, RABBIT_START.1)
    }
}

/// A dropping left by the rabbit. Picking one up buys bonus time.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Collectible {
    /// Monotonic, never reused within a `GameState`
    pub id: u32,
    pub pos: Vec2,
}

/// Discrete things that happened during a command or a tick.
///
/// Listeners (audio, HUD) react to these; the simulation never calls them.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    Started,
    DroppingSpawned { id: u32 },
    Collected { id: u32 },
    Victory,
    TimeUp,
    Reset,
}

/// Complete game state
#[derive(Debug, Clone)]
pub struct GameState {
    /// Seed the wander RNG was created from
    pub seed: u64,
    pub tuning: Tuning,
    pub session: Session,
    pub player: Actor,
    pub rabbit: Actor,
    pub rabbit_ai: RabbitAi,
    pub droppings: DroppingField,
    /// Frames simulated while active
    pub time_ticks: u64,
    pub(crate) rng: Pcg32,
    /// Events produced since the last `drain_events`
    pub(crate) events: Vec<GameEvent>,
}

impl GameState {
    /// Create a new idle game with default tuning
    pub fn new(seed: u64) -> Self {
        Self::with_tuning(seed, Tuning::default())
    }

    pub fn with_tuning(seed: u64, tuning: Tuning) -> Self {
        Self {
            seed,
            session: Session::new(tuning.start_time_secs),
            tuning,
            player: Actor::player_start(),
            rabbit: Actor::rabbit_start(),
            rabbit_ai: RabbitAi::new(),
            droppings: DroppingField::new(),
            time_ticks: 0,
            rng: Pcg32::seed_from_u64(seed),
            events: Vec::new(),
        }
    }

    pub fn phase(&self) -> GamePhase {
        self.session.phase
    }

    /// Begin (or re-arm) a round. Valid from any phase.
    pub fn start_game(&mut self, now_ms: f64) {
        self.session.start(now_ms);
        self.rabbit_ai = RabbitAi::new();
        self.droppings.clear();
        if self.tuning.seed_starter_droppings {
            self.droppings.seed_starters();
        }
        self.time_ticks = 0;
        self.events.push(GameEvent::Started);
        log::info!(
            "Round started: {}s on the clock, {} droppings on the floor",
            self.session.time_remaining,
            self.droppings.len()
        );
    }

    /// End the round. Ignored unless active.
    pub fn end_game(&mut self, victory: bool) {
        if self.session.end(victory) {
            self.events.push(if victory {
                GameEvent::Victory
            } else {
                GameEvent::TimeUp
            });
        }
    }

    /// Back to the initial idle snapshot. `Reset` is only announced when
    /// leaving a round, so resetting an idle game changes nothing.
    pub fn reset_game(&mut self) {
        let was_idle = self.phase() == GamePhase::Idle;
        self.session.reset();
        self.player = Actor::player_start();
        self.rabbit = Actor::rabbit_start();
        self.rabbit_ai = RabbitAi::new();
        self.droppings.clear();
        self.time_ticks = 0;
        if !was_idle {
            self.events.push(GameEvent::Reset);
        }
    }

    /// Add seconds to the clock. Ignored unless active.
    pub fn add_bonus_time(&mut self, seconds: u32) {
        self.session.add_bonus_time(seconds);
    }

    pub fn set_player_position(&mut self, x: f32, z: f32) {
        self.player.pos = clamp_to_arena(Vec2::new(x, z), self.tuning.arena_bound);
    }

    pub fn set_rabbit_position(&mut self, x: f32, z: f32) {
        self.rabbit.pos = clamp_to_arena(Vec2::new(x, z), self.tuning.arena_bound);
    }

    /// Whole seconds since the round started (wall clock)
    pub fn elapsed_secs(&self, now_ms: f64) -> u64 {
        self.session.elapsed_secs(now_ms)
    }

    /// Take all events produced since the last call
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Events produced since the last drain, without taking them
    pub fn pending_events(&self) -> &[GameEvent] {
        &self.events
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_state_is_idle() {
        let state = GameState::new(1);
        assert_eq!(state.phase(), GamePhase::Idle);
        assert_eq!(state.player.pos, Vec2::ZERO);
        assert_eq!(state.rabbit.pos, Vec2::new(10.0, 10.0));
        assert!(state.droppings.is_empty());
        assert!(state.pending_events().is_empty());
    }

    #[test]
    fn test_start_seeds_starter_droppings() {
        let mut state = GameState::new(1);
        state.start_game(1_000.0);
        assert_eq!(state.phase(), GamePhase::Active);
        assert_eq!(state.droppings.len(), 3);
        assert_eq!(state.drain_events(), vec![GameEvent::Started]);
        assert!(state.pending_events().is_empty());
    }

    #[test]
    fn test_start_without_starters() {
        let tuning = Tuning {
            seed_starter_droppings: false,
            ..Tuning::default()
        };
        let mut state = GameState::with_tuning(1, tuning);
        state.start_game(0.0);
        assert!(state.droppings.is_empty());
    }

    #[test]
    fn test_end_game_emits_once() {
        let mut state = GameState::new(1);
        state.end_game(true); // idle: ignored
        assert_eq!(state.phase(), GamePhase::Idle);

        state.start_game(0.0);
        state.drain_events();
        state.end_game(true);
        state.end_game(false); // already ended: ignored
        assert_eq!(state.phase(), GamePhase::Ended);
        assert!(state.session.is_victory);
        assert_eq!(state.drain_events(), vec![GameEvent::Victory]);
    }

    #[test]
    fn test_reset_restores_positions() {
        let mut state = GameState::new(1);
        state.start_game(0.0);
        state.set_player_position(3.0, -4.0);
        state.set_rabbit_position(-2.0, 1.0);
        state.reset_game();
        assert_eq!(state.phase(), GamePhase::Idle);
        assert_eq!(state.player, Actor::player_start());
        assert_eq!(state.rabbit, Actor::rabbit_start());
        assert!(state.droppings.is_empty());
    }

    #[test]
    fn test_second_reset_adds_no_event() {
        let mut state = GameState::new(1);
        state.start_game(0.0);
        state.drain_events();

        state.reset_game();
        assert_eq!(state.pending_events(), &[GameEvent::Reset]);
        state.reset_game();
        assert_eq!(state.pending_events(), &[GameEvent::Reset]);

        let mut fresh = GameState::new(2);
        fresh.reset_game();
        assert!(fresh.pending_events().is_empty());
    }

    #[test]
    fn test_position_commands_clamp() {
        let mut state = GameState::new(1);
        state.set_player_position(99.0, -99.0);
        assert_eq!(state.player.pos, Vec2::new(14.0, -14.0));
    }
}
