//! Enemy decision making
//!
//! Evaluated once per tick for every enemy that is not busy (winding up,
//! attacking, hurt or down). Priority: chase and attack the player when in
//! aggro range, otherwise walk to a capture point and lower it, otherwise
//! stand still. Archetypes only differ through their stat block.

use glam::Vec2;
use rand::Rng;

use super::entity::{Entity, EntityState, Facing, Objective};
use crate::tuning::{ObjectivePreference, Tuning};

/// Depth gap below which a pursuing enemy stops adjusting its lane
const LANE_TOLERANCE: f32 = 5.0;

/// What an enemy decided this tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AiOutcome {
    /// Broke off lowering a pole to go after the player
    pub alerted: bool,
    pub walking: bool,
    /// Started a telegraphed attack
    pub wound_up: bool,
}

/// Pick the capture point an objective-seeking enemy should head for
pub fn choose_objective<'a>(
    from: Vec2,
    objectives: &'a [Objective],
    preference: ObjectivePreference,
) -> Option<&'a Objective> {
    let nearest = |candidates: &mut dyn Iterator<Item = &'a Objective>| {
        candidates.min_by(|a, b| {
            a.pos
                .distance_squared(from)
                .total_cmp(&b.pos.distance_squared(from))
        })
    };

    match preference {
        ObjectivePreference::None => None,
        ObjectivePreference::Nearest => {
            nearest(&mut objectives.iter().filter(|o| o.raise_level > 0.0))
                .or_else(|| nearest(&mut objectives.iter()))
        }
        ObjectivePreference::MostRaised => {
            let top = objectives
                .iter()
                .map(|o| o.raise_level)
                .fold(0.0_f32, f32::max);
            nearest(&mut objectives.iter().filter(|o| o.raise_level >= top))
        }
    }
}

/// Run one AI decision for an idle, walking or working enemy
pub fn think(
    enemy: &mut Entity,
    player: &Entity,
    objectives: &[Objective],
    tuning: &Tuning,
    rng: &mut impl Rng,
) -> AiOutcome {
    let mut outcome = AiOutcome::default();
    let Some(archetype) = enemy.archetype() else {
        return outcome;
    };
    if enemy.state.is_busy() {
        return outcome;
    }

    let stats = tuning.archetypes.get(archetype);
    let walk = tuning.physics.walk_speed;
    let dx = (player.pos.x - enemy.pos.x).abs();
    let dy = (player.pos.y - enemy.pos.y).abs();

    if player.is_alive() && dx < stats.aggro_range_x && dy < stats.aggro_range_y {
        if enemy.state == EntityState::Action {
            outcome.alerted = true;
        }
        enemy.facing = Facing::toward(enemy.pos.x, player.pos.x);

        enemy.vel.y = if dy > LANE_TOLERANCE {
            (player.pos.y - enemy.pos.y).signum() * walk * stats.speed_y
        } else {
            0.0
        };

        if dx > stats.stop_distance {
            enemy.vel.x = enemy.facing.sign() * walk * stats.speed_x;
            enemy.state = EntityState::Walk;
            outcome.walking = true;
        } else {
            enemy.vel.x = 0.0;
            enemy.state = EntityState::Idle;
            if rng.random_bool(stats.attack_chance) {
                enemy.vel.y = 0.0;
                enemy.set_timed_state(EntityState::PreAttack, stats.windup_ticks);
                outcome.wound_up = true;
            }
        }
        return outcome;
    }

    let Some(objective) = choose_objective(enemy.ground_pos(), objectives, stats.objective) else {
        enemy.vel.x = 0.0;
        enemy.vel.y = 0.0;
        enemy.state = EntityState::Idle;
        return outcome;
    };

    enemy.target_id = Some(objective.id);
    let to_target = objective.pos - enemy.ground_pos();
    let arrival = tuning.objectives.arrival_radius;

    if to_target.x.abs() < arrival && to_target.y.abs() < arrival {
        enemy.vel.x = 0.0;
        enemy.vel.y = 0.0;
        enemy.state = EntityState::Action;
    } else {
        let v = to_target.normalize_or_zero() * walk * stats.speed_x;
        enemy.vel.x = v.x;
        enemy.vel.y = v.y;
        if v.x != 0.0 {
            enemy.facing = if v.x > 0.0 { Facing::Right } else { Facing::Left };
        }
        enemy.state = EntityState::Walk;
        outcome.walking = true;
    }
    outcome
}
