//! Per-entity movement integration
//!
//! Velocities are in world units per tick. Lateral and depth speeds are
//! capped separately, so depth movement is slower than lateral movement.

use glam::{Vec2, Vec3};

use super::entity::{Entity, EntityState, Facing};
use super::input::TickInput;
use crate::snap_to_zero;
use crate::tuning::{PhysicsTuning, WorldTuning};

/// Accelerate toward `dir` with air control, speed boost and speed caps
pub fn accelerate(entity: &mut Entity, dir: Vec2, physics: &PhysicsTuning) {
    if dir.x != 0.0 {
        entity.facing = if dir.x > 0.0 { Facing::Right } else { Facing::Left };
    }

    let boost = if entity.is_boosted() {
        physics.speed_multiplier
    } else {
        1.0
    };
    let accel = if entity.is_grounded() {
        physics.acceleration
    } else {
        physics.acceleration * physics.air_control
    } * boost;

    entity.vel.x += dir.x * accel;
    entity.vel.y += dir.y * accel;
    clamp_planar_speed(entity, physics, boost);
}

/// Decay planar velocity; friction is weaker while airborne
pub fn apply_friction(entity: &mut Entity, physics: &PhysicsTuning) {
    let friction = if entity.is_grounded() {
        physics.friction
    } else {
        physics.air_friction
    };
    entity.vel.x = snap_to_zero(entity.vel.x * friction, physics.velocity_epsilon);
    entity.vel.y = snap_to_zero(entity.vel.y * friction, physics.velocity_epsilon);
}

fn clamp_planar_speed(entity: &mut Entity, physics: &PhysicsTuning, boost: f32) {
    let max_x = physics.walk_speed * boost;
    let max_y = physics.walk_speed_y * boost;
    entity.vel.x = snap_to_zero(entity.vel.x.clamp(-max_x, max_x), physics.velocity_epsilon);
    entity.vel.y = snap_to_zero(entity.vel.y.clamp(-max_y, max_y), physics.velocity_epsilon);
}

/// Start a jump if standing on the ground and not mid-attack
pub fn try_jump(entity: &mut Entity, physics: &PhysicsTuning) -> bool {
    if entity.is_grounded() && !entity.state.is_busy() {
        entity.vel.z = physics.jump_force;
        true
    } else {
        false
    }
}

/// Movement part of the player's turn (attacks are resolved by the caller).
///
/// Returns true when the player is actively walking this tick.
pub fn apply_player_input(player: &mut Entity, input: &TickInput, physics: &PhysicsTuning) -> bool {
    if player.state.is_busy() {
        apply_friction(player, physics);
        return false;
    }

    if input.jump && try_jump(player, physics) {
        return false;
    }

    if input.has_movement() {
        player.state = EntityState::Walk;
        accelerate(player, input.direction, physics);
        true
    } else {
        if player.is_grounded() && player.state == EntityState::Walk {
            player.state = EntityState::Idle;
        }
        apply_friction(player, physics);
        false
    }
}

/// Integrate position and gravity; characters land without bouncing
pub fn integrate(entity: &mut Entity, gravity: f32) {
    if !entity.vel.is_finite() {
        log::warn!("Entity {} had non-finite velocity, zeroed", entity.id);
        entity.vel = Vec3::ZERO;
    }

    entity.vel.z -= gravity;
    entity.pos += entity.vel;
    if entity.pos.z < 0.0 {
        entity.pos.z = 0.0;
        entity.vel.z = 0.0;
    }
}

/// Keep an entity inside the world edges and the walkable depth band
pub fn clamp_to_world(entity: &mut Entity, world: &WorldTuning) {
    let half = entity.width / 2.0;
    entity.pos.x = entity.pos.x.clamp(half, (world.width - half).max(half));
    entity.pos.y = entity.pos.y.clamp(world.horizon_y, world.max_y);
}

/// Count down power-up timers
pub fn tick_status_timers(entity: &mut Entity) {
    entity.speed_boost_ticks = entity.speed_boost_ticks.saturating_sub(1);
    entity.invincibility_ticks = entity.invincibility_ticks.saturating_sub(1);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tuning::Tuning;

    fn hero() -> Entity {
        Entity::player(1, Vec2::new(300.0, 600.0), 100.0, 60.0, 90.0)
    }

    #[test]
    fn test_speed_caps_are_anisotropic() {
        let tuning = Tuning::default();
        let mut e = hero();
        for _ in 0..50 {
            accelerate(&mut e, Vec2::new(1.0, 1.0).normalize(), &tuning.physics);
        }
        assert_eq!(e.vel.x, tuning.physics.walk_speed);
        assert_eq!(e.vel.y, tuning.physics.walk_speed_y);
    }

    #[test]
    fn test_speed_boost_raises_cap() {
        let tuning = Tuning::default();
        let mut e = hero();
        e.speed_boost_ticks = 10;
        for _ in 0..50 {
            accelerate(&mut e, Vec2::X, &tuning.physics);
        }
        let expected = tuning.physics.walk_speed * tuning.physics.speed_multiplier;
        assert!((e.vel.x - expected).abs() < 1e-4);
    }

    #[test]
    fn test_air_control_is_reduced() {
        let tuning = Tuning::default();
        let mut ground = hero();
        let mut air = hero();
        air.pos.z = 10.0;
        accelerate(&mut ground, Vec2::X, &tuning.physics);
        accelerate(&mut air, Vec2::X, &tuning.physics);
        assert!(air.vel.x > 0.0);
        assert!(air.vel.x < ground.vel.x);
    }

    #[test]
    fn test_friction_snaps_to_zero() {
        let tuning = Tuning::default();
        let mut e = hero();
        e.vel = Vec3::new(4.0, 2.0, 0.0);
        for _ in 0..30 {
            apply_friction(&mut e, &tuning.physics);
        }
        assert_eq!(e.vel.x, 0.0);
        assert_eq!(e.vel.y, 0.0);
    }

    #[test]
    fn test_air_friction_is_weaker() {
        let tuning = Tuning::default();
        let mut ground = hero();
        let mut air = hero();
        ground.vel.x = 4.0;
        air.vel.x = 4.0;
        air.pos.z = 20.0;
        apply_friction(&mut ground, &tuning.physics);
        apply_friction(&mut air, &tuning.physics);
        assert!(air.vel.x > ground.vel.x);
    }

    #[test]
    fn test_jump_lands_without_bounce() {
        let tuning = Tuning::default();
        let mut e = hero();
        assert!(try_jump(&mut e, &tuning.physics));
        let mut peak: f32 = 0.0;
        for _ in 0..200 {
            integrate(&mut e, tuning.physics.gravity);
            peak = peak.max(e.pos.z);
        }
        assert!(peak > 100.0);
        assert_eq!(e.pos.z, 0.0);
        assert_eq!(e.vel.z, 0.0);
    }

    #[test]
    fn test_no_jump_while_airborne_or_attacking() {
        let tuning = Tuning::default();
        let mut e = hero();
        e.pos.z = 5.0;
        assert!(!try_jump(&mut e, &tuning.physics));
        e.pos.z = 0.0;
        e.set_timed_state(EntityState::Attack, 5);
        assert!(!try_jump(&mut e, &tuning.physics));
        e.set_timed_state(EntityState::Hurt, 5);
        assert!(!try_jump(&mut e, &tuning.physics));
        e.state = EntityState::Action;
        assert!(try_jump(&mut e, &tuning.physics));
    }

    #[test]
    fn test_clamp_to_world_edges() {
        let tuning = Tuning::default();
        let mut e = hero();
        e.pos.x = tuning.world.width + 100.0;
        e.pos.y = 0.0;
        clamp_to_world(&mut e, &tuning.world);
        assert_eq!(e.pos.x, tuning.world.width - e.width / 2.0);
        assert_eq!(e.pos.y, tuning.world.horizon_y);
    }

    #[test]
    fn test_nan_velocity_is_discarded() {
        let mut e = hero();
        e.vel = Vec3::new(f32::NAN, 0.0, 0.0);
        integrate(&mut e, 0.65);
        assert!(e.pos.is_finite());
    }

    #[test]
    fn test_status_timers_count_down() {
        let mut e = hero();
        e.speed_boost_ticks = 1;
        tick_status_timers(&mut e);
        assert!(!e.is_boosted());
        tick_status_timers(&mut e);
        assert_eq!(e.speed_boost_ticks, 0);
    }
}
