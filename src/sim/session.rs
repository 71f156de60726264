//! Session state machine
//!
//! `Idle -> Active -> Ended -> (reset) -> Idle`. `start` may re-arm a round
//! from any phase. Transitions that don't apply are ignored rather than
//! treated as errors: a collect and the end of the round can land on the
//! same frame, and that must not break the loop.

use serde::{Deserialize, Serialize};

use super::state::GamePhase;
use crate::consts::MAX_NAME_CHARS;

/// Slack for float error when summing frame deltas into whole seconds
const COUNTDOWN_EPSILON: f64 = 1e-4;

/// Trim a player name and cut it to the allowed length
pub fn sanitize_player_name(name: &str) -> String {
    name.trim().chars().take(MAX_NAME_CHARS).collect()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub phase: GamePhase,
    /// Meaningful only once `phase == Ended`
    pub is_victory: bool,
    /// Whole seconds left on the clock
    pub time_remaining: u32,
    pub droppings_collected: u32,
    pub rabbits_caught: u32,
    /// Fraction of a second accumulated toward the next countdown step
    countdown: f64,
    /// Wall-clock start of the round, used for the victory time
    started_at_ms: Option<f64>,
    start_time_secs: u32,
    player_name: String,
}

impl Session {
    pub fn new(start_time_secs: u32) -> Self {
        Self {
            phase: GamePhase::Idle,
            is_victory: false,
            time_remaining: start_time_secs,
            droppings_collected: 0,
            rabbits_caught: 0,
            countdown: 0.0,
            started_at_ms: None,
            start_time_secs,
            player_name: String::new(),
        }
    }

    pub fn is_active(&self) -> bool {
        self.phase == GamePhase::Active
    }

    pub fn start(&mut self, now_ms: f64) {
        self.phase = GamePhase::Active;
        self.is_victory = false;
        self.time_remaining = self.start_time_secs;
        self.droppings_collected = 0;
        self.rabbits_caught = 0;
        self.countdown = 0.0;
        self.started_at_ms = Some(now_ms);
    }

    /// Returns true if this call ended the round
    pub fn end(&mut self, victory: bool) -> bool {
        if !self.is_active() {
            return false;
        }
        self.phase = GamePhase::Ended;
        self.is_victory = victory;
        log::info!(
            "Round over: {} ({} droppings, {}s left)",
            if victory { "rabbit caught" } else { "time up" },
            self.droppings_collected,
            self.time_remaining
        );
        true
    }

    /// Run the countdown. Returns true if the clock ran out during this call.
    pub fn tick(&mut self, dt: f32) -> bool {
        if !self.is_active() || !dt.is_finite() || dt <= 0.0 {
            return false;
        }
        // f64 so long rounds don't drift; 1/60 as f32 still sums to a hair off 1.0
        self.countdown += f64::from(dt);
        while self.countdown >= 1.0 - COUNTDOWN_EPSILON && self.time_remaining > 0 {
            self.countdown -= 1.0;
            self.time_remaining -= 1;
        }
        if self.time_remaining == 0 {
            return self.end(false);
        }
        false
    }

    pub fn add_bonus_time(&mut self, seconds: u32) {
        if self.is_active() {
            self.time_remaining = self.time_remaining.saturating_add(seconds);
        }
    }

    /// Count a pickup and grant its bonus. Ignored unless active.
    pub fn collect_dropping(&mut self, bonus_secs: u32) {
        if self.is_active() {
            self.droppings_collected += 1;
            self.add_bonus_time(bonus_secs);
        }
    }

    pub fn record_catch(&mut self) {
        if self.is_active() {
            self.rabbits_caught += 1;
        }
    }

    /// Back to the idle snapshot. The player name survives.
    pub fn reset(&mut self) {
        let player_name = std::mem::take(&mut self.player_name);
        *self = Self::new(self.start_time_secs);
        self.player_name = player_name;
    }

    /// `floor((now - start) / 1000)`, or 0 if never started
    pub fn elapsed_secs(&self, now_ms: f64) -> u64 {
        match self.started_at_ms {
            Some(start) if now_ms > start => ((now_ms - start) / 1000.0).floor() as u64,
            _ => 0,
        }
    }

    pub fn player_name(&self) -> &str {
        &self.player_name
    }

    pub fn set_player_name(&mut self, name: &str) {
        self.player_name = sanitize_player_name(name);
    }
}
