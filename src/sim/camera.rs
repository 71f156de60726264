//! Chase camera: above and behind the player, looking at their feet

use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CameraPose {
    pub position: Vec3,
    pub look_at: Vec3,
}

pub fn follow(player: Vec2, height: f32, distance: f32) -> CameraPose {
    CameraPose {
        position: Vec3::new(player.x, height, player.y + distance),
        look_at: Vec3::new(player.x, 0.0, player.y),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_follow_offsets_behind_player() {
        let pose = follow(Vec2::new(2.0, -3.0), 5.0, 8.0);
        assert_eq!(pose.position, Vec3::new(2.0, 5.0, 5.0));
        assert_eq!(pose.look_at, Vec3::new(2.0, 0.0, -3.0));
    }
}
