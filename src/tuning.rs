//! Data-driven game balance
//!
//! Every gameplay constant lives here so a round can be re-tuned from JSON
//! without recompiling. Defaults come from [`crate::consts`].

use serde::{Deserialize, Serialize};

use crate::Error;
use crate::consts::*;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Arena ===
    pub arena_bound: f32,

    // === Session ===
    pub start_time_secs: u32,
    pub bonus_secs: u32,

    // === Movement (units per reference frame) ===
    pub reference_fps: f32,
    pub player_speed: f32,
    pub rabbit_wander_speed: f32,
    pub rabbit_escape_speed: f32,
    pub facing_deadzone: f32,

    // === Rabbit AI ===
    pub flee_radius: f32,
    pub flee_distance: f32,
    pub calm_radius: f32,
    pub wander_interval_secs: f32,
    pub wander_margin: f32,

    // === Droppings ===
    pub spawn_interval_secs: f32,
    pub seed_starter_droppings: bool,

    // === Proximity ===
    pub collect_radius: f32,
    pub catch_radius: f32,

    // === Camera ===
    pub camera_height: f32,
    pub camera_distance: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            arena_bound: ARENA_BOUND,

            start_time_secs: START_TIME_SECS,
            bonus_secs: BONUS_SECS,

            reference_fps: REFERENCE_FPS,
            player_speed: PLAYER_SPEED,
            rabbit_wander_speed: RABBIT_WANDER_SPEED,
            rabbit_escape_speed: RABBIT_ESCAPE_SPEED,
            facing_deadzone: FACING_DEADZONE,

            flee_radius: FLEE_RADIUS,
            flee_distance: FLEE_DISTANCE,
            calm_radius: CALM_RADIUS,
            wander_interval_secs: WANDER_INTERVAL_SECS,
            wander_margin: WANDER_MARGIN,

            spawn_interval_secs: SPAWN_INTERVAL_SECS,
            seed_starter_droppings: true,

            collect_radius: COLLECT_RADIUS,
            catch_radius: CATCH_RADIUS,

            camera_height: CAMERA_HEIGHT,
            camera_distance: CAMERA_DISTANCE,
        }
    }
}

impl Tuning {
    /// Parse tuning from JSON. Missing fields fall back to defaults.
    pub fn from_json(json: &str) -> Result<Self, Error> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Reject values the simulation can't run with
    pub fn validate(&self) -> Result<(), Error> {
        let positive = [
            ("arena_bound", self.arena_bound),
            ("reference_fps", self.reference_fps),
            ("player_speed", self.player_speed),
            ("rabbit_wander_speed", self.rabbit_wander_speed),
            ("rabbit_escape_speed", self.rabbit_escape_speed),
            ("flee_radius", self.flee_radius),
            ("flee_distance", self.flee_distance),
            ("wander_interval_secs", self.wander_interval_secs),
            ("spawn_interval_secs", self.spawn_interval_secs),
            ("collect_radius", self.collect_radius),
            ("catch_radius", self.catch_radius),
        ];
        for (name, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                return Err(Error::InvalidTuning(format!("{name} must be > 0, got {value}")));
            }
        }

        if self.start_time_secs == 0 {
            return Err(Error::InvalidTuning("start_time_secs must be > 0".into()));
        }
        if !(0.0..=self.arena_bound).contains(&self.wander_margin) {
            return Err(Error::InvalidTuning(format!(
                "wander_margin {} outside arena bound {}",
                self.wander_margin, self.arena_bound
            )));
        }
        if self.calm_radius < self.flee_radius {
            return Err(Error::InvalidTuning(format!(
                "calm_radius {} below flee_radius {}",
                self.calm_radius, self.flee_radius
            )));
        }
        Ok(())
    }
}
