//! Dropping spawner
//!
//! While a round is active the rabbit leaves a dropping behind every few
//! seconds. Live droppings are kept sorted by id (ids are monotonic, so
//! pushing keeps the order).

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::state::Collectible;
use crate::consts::STARTER_DROPPINGS;

/// Slack for float error when summing frame deltas
const SPAWN_EPSILON: f64 = 1e-4;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DroppingField {
    items: Vec<Collectible>,
    next_id: u32,
    /// Seconds since the last spawn
    since_spawn: f64,
}

impl Default for DroppingField {
    fn default() -> Self {
        Self::new()
    }
}

impl DroppingField {
    pub fn new() -> Self {
        Self {
            items: Vec::new(),
            next_id: 1,
            since_spawn: 0.0,
        }
    }

    /// Drop one at `pos` and return its id
    pub fn spawn_at(&mut self, pos: Vec2) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        self.items.push(Collectible { id, pos });
        id
    }

    /// Fixed starter positions so the arena isn't empty at t=0
    pub fn seed_starters(&mut self) {
        for (x, z) in STARTER_DROPPINGS {
            self.spawn_at(Vec2::new(x, z));
        }
    }

    /// Advance the spawn timer; returns the id of a dropping left at
    /// `rabbit_pos` if one was due
    pub fn tick(&mut self, dt: f32, rabbit_pos: Vec2, interval: f32) -> Option<u32> {
        self.since_spawn += f64::from(dt);
        if self.since_spawn < f64::from(interval) - SPAWN_EPSILON {
            return None;
        }
        self.since_spawn = 0.0;
        let id = self.spawn_at(rabbit_pos);
        log::debug!(
            "Dropping {} at ({:.1}, {:.1}), {} on the floor",
            id,
            rabbit_pos.x,
            rabbit_pos.y,
            self.items.len()
        );
        Some(id)
    }

    pub fn list_active(&self) -> &[Collectible] {
        &self.items
    }

    pub fn get(&self, id: u32) -> Option<&Collectible> {
        self.items
            .binary_search_by_key(&id, |c| c.id)
            .ok()
            .map(|i| &self.items[i])
    }

    pub fn remove(&mut self, id: u32) -> Option<Collectible> {
        let index = self.items.binary_search_by_key(&id, |c| c.id).ok()?;
        Some(self.items.remove(index))
    }

    /// Drop everything and restart the spawn timer. Ids keep counting.
    pub fn clear(&mut self) {
        self.items.clear();
        self.since_spawn = 0.0;
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spawns_every_interval() {
        let mut field = DroppingField::new();
        let rabbit = Vec2::new(2.0, -3.0);

        assert_eq!(field.tick(4.9, rabbit, 5.0), None);
        let id = field.tick(0.1, rabbit, 5.0).unwrap();
        assert_eq!(field.get(id).unwrap().pos, rabbit);

        // Timer was reset, not carried over
        assert_eq!(field.tick(4.0, rabbit, 5.0), None);
        assert!(field.tick(1.0, rabbit, 5.0).is_some());
        assert_eq!(field.len(), 2);
    }

    #[test]
    fn test_spawn_lands_on_frame_300_at_60hz() {
        let mut field = DroppingField::new();
        for _ in 0..299 {
            assert_eq!(field.tick(1.0 / 60.0, Vec2::ZERO, 5.0), None);
        }
        assert!(field.tick(1.0 / 60.0, Vec2::ZERO, 5.0).is_some());
    }

    #[test]
    fn test_ids_never_reused() {
        let mut field = DroppingField::new();
        field.seed_starters();
        let ids: Vec<u32> = field.list_active().iter().map(|c| c.id).collect();
        assert_eq!(ids, vec![1, 2, 3]);

        assert!(field.remove(2).is_some());
        assert!(field.remove(2).is_none());
        field.clear();
        assert_eq!(field.spawn_at(Vec2::ZERO), 4);
    }

    #[test]
    fn test_remove_keeps_order() {
        let mut field = DroppingField::new();
        for i in 0..5 {
            field.spawn_at(Vec2::splat(i as f32));
        }
        field.remove(3);
        let ids: Vec<u32> = field.list_active().iter().map(|c| c.id).collect();
        assert_eq!(ids, vec![1, 2, 4, 5]);
        assert_eq!(field.get(4).unwrap().pos, Vec2::splat(3.0));
    }
}
