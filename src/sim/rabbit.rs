//! Rabbit AI
//!
//! Two modes re-evaluated every frame:
//! - Wander: steer toward a random arena point, re-rolled every few seconds
//! - Flee: when the player gets close, run directly away from them
//!
//! The rabbit escapes faster than the player can run but wanders slower,
//! so the player closes distance during calm stretches.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::state::Actor;
use crate::tuning::Tuning;

/// Closer than this to the target counts as arrived
const ARRIVE_EPSILON: f32 = 1e-4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RabbitMode {
    Wander,
    Flee,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RabbitAi {
    /// Point the rabbit is currently steering toward
    pub target: Vec2,
    /// Seconds since the target was last chosen
    pub wander_timer: f32,
    pub is_escaping: bool,
}

impl Default for RabbitAi {
    fn default() -> Self {
        Self::new()
    }
}

impl RabbitAi {
    /// Fresh brain aimed at the arena center
    pub fn new() -> Self {
        Self {
            target: Vec2::ZERO,
            wander_timer: 0.0,
            is_escaping: false,
        }
    }

    pub fn mode(&self) -> RabbitMode {
        if self.is_escaping {
            RabbitMode::Flee
        } else {
            RabbitMode::Wander
        }
    }

    /// Current speed in units per reference frame
    pub fn speed(&self, tuning: &Tuning) -> f32 {
        if self.is_escaping {
            tuning.rabbit_escape_speed
        } else {
            tuning.rabbit_wander_speed
        }
    }

    /// Pick a target for this frame. Doesn't move the rabbit.
    pub fn evaluate<R: Rng + ?Sized>(
        &mut self,
        rabbit_pos: Vec2,
        player_pos: Vec2,
        dt: f32,
        tuning: &Tuning,
        rng: &mut R,
    ) {
        self.wander_timer += dt;
        let dist_to_player = rabbit_pos.distance(player_pos);

        // Bored of the current target, or safely away from the player
        if self.wander_timer > tuning.wander_interval_secs
            || (self.is_escaping && dist_to_player > tuning.calm_radius)
        {
            self.start_wander(tuning, rng);
        }

        // Checked second so a close player always wins the frame
        if !self.is_escaping && dist_to_player < tuning.flee_radius {
            self.start_flee(rabbit_pos, player_pos, tuning, rng);
        }
    }

    /// Move the rabbit one step toward its target and face the way it's going
    pub fn steer<R: Rng + ?Sized>(
        &mut self,
        rabbit: &mut Actor,
        frames: f32,
        tuning: &Tuning,
        rng: &mut R,
    ) {
        let mut to_target = self.target - rabbit.pos;
        if to_target.length() < ARRIVE_EPSILON {
            // Arrived (or degenerate target): choose somewhere new right away
            self.start_wander(tuning, rng);
            to_target = self.target - rabbit.pos;
        }

        let dist = to_target.length();
        let dir = to_target.normalize_or_zero();
        // Land on the target instead of overshooting and jittering around it
        let step = (self.speed(tuning) * frames).min(dist);
        rabbit.steer(dir, step, tuning.arena_bound, tuning.facing_deadzone);
    }

    /// `evaluate` then `steer`
    pub fn update<R: Rng + ?Sized>(
        &mut self,
        rabbit: &mut Actor,
        player_pos: Vec2,
        dt: f32,
        frames: f32,
        tuning: &Tuning,
        rng: &mut R,
    ) {
        self.evaluate(rabbit.pos, player_pos, dt, tuning, rng);
        self.steer(rabbit, frames, tuning, rng);
    }

    fn start_wander<R: Rng + ?Sized>(&mut self, tuning: &Tuning, rng: &mut R) {
        let m = tuning.wander_margin;
        self.target = Vec2::new(rng.random_range(-m..=m), rng.random_range(-m..=m));
        self.wander_timer = 0.0;
        self.is_escaping = false;
    }

    fn start_flee<R: Rng + ?Sized>(
        &mut self,
        rabbit_pos: Vec2,
        player_pos: Vec2,
        tuning: &Tuning,
        rng: &mut R,
    ) {
        let away = match (rabbit_pos - player_pos).try_normalize() {
            Some(dir) => dir,
            // Standing on each other: any direction is away
            None => Vec2::from_angle(rng.random_range(0.0..std::f32::consts::TAU)),
        };
        self.target = rabbit_pos + away * tuning.flee_distance;
        self.is_escaping = true;
        self.wander_timer = 0.0;
        log::debug!(
            "Rabbit fleeing from ({:.1}, {:.1}) toward ({:.1}, {:.1})",
            rabbit_pos.x,
            rabbit_pos.y,
            self.target.x,
            self.target.y
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn rng() -> Pcg32 {
        Pcg32::seed_from_u64(7)
    }

    #[test]
    fn test_close_player_triggers_flee() {
        let tuning = Tuning::default();
        let mut ai = RabbitAi::new();
        ai.evaluate(Vec2::ZERO, Vec2::new(3.0, 0.0), 1.0 / 60.0, &tuning, &mut rng());

        assert!(ai.is_escaping);
        assert_eq!(ai.mode(), RabbitMode::Flee);
        assert_eq!(ai.wander_timer, 0.0);
        // Directly away from the player, flee distance out
        assert!((ai.target - Vec2::new(-10.0, 0.0)).length() < 1e-5);
    }

    #[test]
    fn test_far_player_keeps_wandering() {
        let tuning = Tuning::default();
        let mut ai = RabbitAi::new();
        ai.evaluate(Vec2::ZERO, Vec2::new(6.0, 0.0), 0.5, &tuning, &mut rng());
        assert!(!ai.is_escaping);
        assert_eq!(ai.target, Vec2::ZERO);
        assert_eq!(ai.wander_timer, 0.5);
    }

    #[test]
    fn test_calms_down_when_player_far() {
        let tuning = Tuning::default();
        let mut rng = rng();
        let mut ai = RabbitAi::new();
        ai.evaluate(Vec2::ZERO, Vec2::new(3.0, 0.0), 0.1, &tuning, &mut rng);
        assert!(ai.is_escaping);

        // Still within calm radius: keeps fleeing
        ai.evaluate(Vec2::new(-4.0, 0.0), Vec2::new(3.0, 0.0), 0.1, &tuning, &mut rng);
        assert!(ai.is_escaping);

        // Beyond calm radius: back to wandering with a fresh target
        ai.evaluate(Vec2::new(-6.0, 0.0), Vec2::new(3.0, 0.0), 0.1, &tuning, &mut rng);
        assert!(!ai.is_escaping);
        assert!(ai.target.x.abs() <= tuning.wander_margin);
        assert!(ai.target.y.abs() <= tuning.wander_margin);
    }

    #[test]
    fn test_wander_target_rerolled_after_interval() {
        let tuning = Tuning::default();
        let mut rng = rng();
        let mut ai = RabbitAi::new();
        let far = Vec2::new(12.0, 12.0);
        ai.evaluate(Vec2::ZERO, far, 3.0, &tuning, &mut rng);
        assert_eq!(ai.target, Vec2::ZERO, "not past the interval yet");

        ai.evaluate(Vec2::ZERO, far, 0.1, &tuning, &mut rng);
        assert_eq!(ai.wander_timer, 0.0);
        assert!(ai.target.abs().max_element() <= tuning.wander_margin);
    }

    #[test]
    fn test_flee_overrides_reroll_on_same_frame() {
        let tuning = Tuning::default();
        let mut ai = RabbitAi::new();
        ai.wander_timer = 10.0;
        ai.evaluate(Vec2::ZERO, Vec2::new(0.0, 2.0), 0.1, &tuning, &mut rng());
        assert!(ai.is_escaping);
        assert!((ai.target - Vec2::new(0.0, -10.0)).length() < 1e-5);
    }

    #[test]
    fn test_steer_uses_mode_speed() {
        let tuning = Tuning::default();
        let mut rng = rng();

        let mut ai = RabbitAi::new();
        ai.target = Vec2::new(5.0, 0.0);
        let mut rabbit = Actor::at(0.0, 0.0);
        ai.steer(&mut rabbit, 1.0, &tuning, &mut rng);
        assert!((rabbit.pos.x - tuning.rabbit_wander_speed).abs() < 1e-6);

        ai.is_escaping = true;
        let mut rabbit = Actor::at(0.0, 0.0);
        ai.steer(&mut rabbit, 1.0, &tuning, &mut rng);
        assert!((rabbit.pos.x - tuning.rabbit_escape_speed).abs() < 1e-6);
        assert!(tuning.rabbit_escape_speed > tuning.player_speed);
        assert!(tuning.rabbit_wander_speed < tuning.player_speed);
    }

    #[test]
    fn test_degenerate_target_picks_new_one() {
        let tuning = Tuning::default();
        let mut ai = RabbitAi::new();
        let mut rabbit = Actor::at(0.0, 0.0); // sitting on the default target
        ai.steer(&mut rabbit, 1.0, &tuning, &mut rng());
        assert_ne!(ai.target, Vec2::ZERO);
        assert!(rabbit.pos.length() > 0.0);
        assert!(rabbit.pos.is_finite());
    }

    #[test]
    fn test_flee_when_overlapping_player() {
        let tuning = Tuning::default();
        let mut ai = RabbitAi::new();
        ai.evaluate(Vec2::ONE, Vec2::ONE, 0.1, &tuning, &mut rng());
        assert!(ai.is_escaping);
        assert!(ai.target.is_finite());
        assert!(((ai.target - Vec2::ONE).length() - tuning.flee_distance).abs() < 1e-4);
    }

    #[test]
    fn test_steer_lands_on_close_target() {
        let tuning = Tuning::default();
        let mut ai = RabbitAi::new();
        ai.target = Vec2::new(0.03, 0.0);
        let mut rabbit = Actor::at(0.0, 0.0);
        ai.steer(&mut rabbit, 1.0, &tuning, &mut rng());
        assert_eq!(rabbit.pos, ai.target);
    }
}
