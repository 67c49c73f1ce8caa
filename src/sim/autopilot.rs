//! Demo mode - a simple bot that plays the player character
//!
//! Used by the headless runner and for attract-mode style soak tests. It only
//! reads the state and produces the same `TickInput` a human would.

use glam::Vec2;

use super::entity::{Entity, Facing};
use super::input::TickInput;
use super::state::GameState;

/// Enemies closer than this (laterally) are dealt with before anything else
const THREAT_RANGE: f32 = 250.0;
/// Pickups worth a detour
const PICKUP_RANGE: f32 = 300.0;
/// Close enough to a waypoint to stop walking
const ARRIVAL: f32 = 20.0;

/// Choose this tick's input for the player character
pub fn demo_input(state: &GameState) -> TickInput {
    let player = &state.player;
    if state.is_over() || !player.is_alive() {
        return TickInput::default();
    }
    let here = player.ground_pos();

    // Fight the closest enemy in reach
    let threat = state
        .active_enemies()
        .filter(|e| (e.pos.x - player.pos.x).abs() < THREAT_RANGE)
        .min_by(|a, b| {
            a.ground_pos()
                .distance_squared(here)
                .total_cmp(&b.ground_pos().distance_squared(here))
        });
    if let Some(enemy) = threat {
        return engage(state, player, enemy);
    }

    // Grab nearby loot
    let pickup = state
        .pickups
        .iter()
        .map(|p| Vec2::new(p.pos.x, p.pos.y))
        .filter(|p| (p.x - here.x).abs() < PICKUP_RANGE)
        .min_by(|a, b| a.distance_squared(here).total_cmp(&b.distance_squared(here)));
    if let Some(target) = pickup {
        return TickInput::with_direction(steer(here, target));
    }

    // Otherwise work on the nearest pole that still needs raising
    let pole = state
        .objectives
        .iter()
        .filter(|o| !o.is_fully_raised())
        .min_by(|a, b| {
            a.pos
                .distance_squared(here)
                .total_cmp(&b.pos.distance_squared(here))
        });
    match pole {
        Some(pole) => TickInput::with_direction(steer(here, pole.pos)),
        None => TickInput::default(),
    }
}

fn engage(state: &GameState, player: &Entity, enemy: &Entity) -> TickInput {
    let combat = &state.tuning.combat;
    let dx = enemy.pos.x - player.pos.x;
    let dy = enemy.pos.y - player.pos.y;
    let facing_enemy = Facing::toward(player.pos.x, enemy.pos.x) == player.facing;

    if dx.abs() < combat.hit_range_x * 0.8 && dy.abs() < combat.hit_range_y * 0.6 {
        if facing_enemy {
            return TickInput {
                attack: true,
                ..Default::default()
            };
        }
        // Turn around with a light tap toward the enemy
        return TickInput::with_direction(Vec2::new(dx.signum() * 0.2, 0.0));
    }

    // Line up beside the enemy, in the same lane
    let spot = Vec2::new(
        enemy.pos.x - dx.signum() * combat.hit_range_x * 0.5,
        enemy.pos.y,
    );
    TickInput::with_direction(steer(player.ground_pos(), spot))
}

fn steer(from: Vec2, to: Vec2) -> Vec2 {
    let delta = to - from;
    if delta.length() < ARRIVAL {
        Vec2::ZERO
    } else {
        delta.normalize_or_zero()
    }
}
