//! Proximity checks
//!
//! Plain distance thresholds on the ground plane: the player picks up any
//! dropping closer than the collect radius and catches the rabbit inside
//! the catch radius. Both checks run every active frame and both may fire
//! on the same frame.

use glam::Vec2;

use super::state::{GameEvent, GameState};

/// Strictly inside `radius`
#[inline]
pub fn within(a: Vec2, b: Vec2, radius: f32) -> bool {
    a.distance_squared(b) < radius * radius
}

/// What the player touched this frame
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProximityReport {
    /// Ids of droppings picked up, in id order
    pub collected: Vec<u32>,
    pub caught: bool,
}

/// Check the player against droppings and the rabbit and apply the results.
///
/// Pickups are applied before the catch so their counters and bonus time
/// land before the round ends. Does nothing unless the round is active.
pub fn resolve_proximity(state: &mut GameState) -> ProximityReport {
    let mut report = ProximityReport::default();
    if !state.session.is_active() {
        return report;
    }

    let player = state.player.pos;
    let collect_radius = state.tuning.collect_radius;
    report.collected = state
        .droppings
        .list_active()
        .iter()
        .filter(|c| within(player, c.pos, collect_radius))
        .map(|c| c.id)
        .collect();

    for &id in &report.collected {
        // Removed first so it can't be counted twice
        if state.droppings.remove(id).is_some() {
            state.session.collect_dropping(state.tuning.bonus_secs);
            state.events.push(GameEvent::Collected { id });
        }
    }

    if within(player, state.rabbit.pos, state.tuning.catch_radius) {
        report.caught = true;
        state.session.record_catch();
        state.end_game(true);
    }

    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::GamePhase;

    fn active_state() -> GameState {
        let mut state = GameState::new(3);
        state.start_game(0.0);
        state.drain_events();
        state
    }

    #[test]
    fn test_within_is_strict() {
        assert!(within(Vec2::ZERO, Vec2::new(0.99, 0.0), 1.0));
        assert!(!within(Vec2::ZERO, Vec2::new(1.0, 0.0), 1.0));
    }

    #[test]
    fn test_collect_nearby_dropping() {
        let mut state = active_state();
        // Starter dropping at (5, 5)
        state.set_player_position(5.5, 5.0);

        let report = resolve_proximity(&mut state);
        assert_eq!(report.collected.len(), 1);
        assert!(!report.caught);
        assert_eq!(state.session.droppings_collected, 1);
        assert_eq!(state.session.time_remaining, 62);
        assert_eq!(state.droppings.len(), 2);

        // Same spot again: already gone
        let report = resolve_proximity(&mut state);
        assert!(report.collected.is_empty());
        assert_eq!(state.session.droppings_collected, 1);
    }

    #[test]
    fn test_catch_ends_in_victory() {
        let mut state = active_state();
        state.set_rabbit_position(1.0, 1.0);
        state.set_player_position(0.0, 0.0);

        let report = resolve_proximity(&mut state);
        assert!(report.caught);
        assert_eq!(state.phase(), GamePhase::Ended);
        assert!(state.session.is_victory);
        assert_eq!(state.session.rabbits_caught, 1);
        assert_eq!(state.drain_events(), vec![GameEvent::Victory]);
    }

    #[test]
    fn test_collect_and_catch_same_frame() {
        let mut state = active_state();
        state.set_player_position(-5.0, 5.0);
        state.set_rabbit_position(-5.0, 6.0);

        let report = resolve_proximity(&mut state);
        assert!(report.caught);
        assert_eq!(report.collected.len(), 1);
        assert_eq!(state.session.droppings_collected, 1);
        assert_eq!(state.session.time_remaining, 62);
        assert!(state.session.is_victory);

        let events = state.drain_events();
        assert!(matches!(events[0], GameEvent::Collected { .. }));
        assert_eq!(events[1], GameEvent::Victory);
    }

    #[test]
    fn test_inactive_does_nothing() {
        let mut state = GameState::new(3);
        state.set_rabbit_position(0.0, 0.5);
        let report = resolve_proximity(&mut state);
        assert_eq!(report, ProximityReport::default());
        assert_eq!(state.phase(), GamePhase::Idle);
    }
}
