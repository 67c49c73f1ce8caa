//! Horizontal follow camera

use super::entity::Entity;
use crate::tuning::Tuning;

/// Scroll offset that puts the player left of center, clamped to the world
pub fn camera_target(player: &Entity, tuning: &Tuning) -> f32 {
    let max_x = (tuning.world.width - tuning.world.viewport_width).max(0.0);
    let target = player.pos.x - tuning.world.viewport_width * tuning.camera.lead_fraction;
    target.clamp(0.0, max_x)
}

/// Ease the camera toward its target by a fixed fraction per tick
pub fn follow_camera(camera_x: f32, player: &Entity, tuning: &Tuning) -> f32 {
    let max_x = (tuning.world.width - tuning.world.viewport_width).max(0.0);
    let target = camera_target(player, tuning);
    let next = camera_x + (target - camera_x) * tuning.camera.lerp;
    next.clamp(0.0, max_x)
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec2;

    #[test]
    fn test_camera_converges_and_clamps_at_world_end() {
        let tuning = Tuning::default();
        let world = tuning.world.width;
        let player = Entity::player(1, Vec2::new(world - 5.0, 600.0), 100.0, 60.0, 90.0);
        let limit = world - tuning.world.viewport_width;

        let mut cam = 0.0;
        for _ in 0..500 {
            cam = follow_camera(cam, &player, &tuning);
            assert!(cam <= limit);
        }
        assert!((cam - limit).abs() < 0.01);
    }

    #[test]
    fn test_camera_never_negative() {
        let tuning = Tuning::default();
        let player = Entity::player(1, Vec2::new(10.0, 600.0), 100.0, 60.0, 90.0);
        let mut cam = 300.0;
        for _ in 0..200 {
            cam = follow_camera(cam, &player, &tuning);
            assert!(cam >= 0.0);
        }
        assert!(cam < 0.01);
    }

    #[test]
    fn test_camera_is_smoothed() {
        let tuning = Tuning::default();
        let player = Entity::player(1, Vec2::new(1200.0, 600.0), 100.0, 60.0, 90.0);
        let target = camera_target(&player, &tuning);
        let cam = follow_camera(0.0, &player, &tuning);
        assert!(cam > 0.0 && cam < target);
    }
}
