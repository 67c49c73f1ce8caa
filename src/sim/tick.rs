//! Fixed timestep simulation tick
//!
//! Core game loop that advances simulation deterministically. Order within a
//! tick: player, camera, pickups, spawner, enemies, capture points, effects,
//! end-of-run checks.

use glam::Vec3;

use super::ai::think;
use super::camera::follow_camera;
use super::combat::perform_attack;
use super::entity::{EntityState, colors};
use super::input::{TickInput, normalize_direction};
use super::physics::{apply_friction, apply_player_input, clamp_to_world, integrate, tick_status_timers};
use super::state::{GameEvent, GamePhase, GameState};

/// Ticks between dust puffs under a walking character
const DUST_INTERVAL: u64 = 15;

/// Advance the game state by one fixed timestep
pub fn tick(state: &mut GameState, input: &TickInput) {
    if state.is_over() {
        return;
    }

    state.events.clear();
    state.time_ticks += 1;

    // Decay screen shake
    state.camera_shake *= state.tuning.camera.shake_decay;
    if state.camera_shake < 0.01 {
        state.camera_shake = 0.0;
    }

    let mut input = input.clone();
    input.direction = normalize_direction(input.direction);

    update_player(state, &input);
    state.camera_x = follow_camera(state.camera_x, &state.player, &state.tuning);
    state.collect_pickups();

    state.maybe_spawn();
    update_enemies(state);

    state.update_objectives();
    state.update_particles();
    state.update_pickups();
    state.remove_dead();

    check_game_over(state);
    check_wave_advance(state);

    state.normalize_order();
    state.debug_check_invariants();
}

fn update_player(state: &mut GameState, input: &TickInput) {
    if input.attack && !state.player.state.is_busy() {
        let now = state.time_ticks;
        if let Some(report) = perform_attack(&mut state.player, &mut state.enemies, &state.tuning, now) {
            let slowdown = state.tuning.combat.attack_slowdown;
            state.player.vel.x *= slowdown;
            state.player.vel.y *= slowdown;
            state.apply_attack_report(&report);
        }
    } else {
        apply_player_input(&mut state.player, input, &state.tuning.physics);
    }

    if state.player.state == EntityState::Walk
        && state.player.is_grounded()
        && state.time_ticks % DUST_INTERVAL == 0
    {
        let pos = state.player.pos;
        state.spawn_dust(pos);
    }

    integrate(&mut state.player, state.tuning.physics.gravity);
    clamp_to_world(&mut state.player, &state.tuning.world);
    state.player.advance_state_timer();
    tick_status_timers(&mut state.player);

    // Standing still at a pole shows the raising pose
    let o = &state.tuning.objectives;
    let at_pole = state
        .objectives
        .iter()
        .any(|p| p.contains(state.player.ground_pos(), o.capture_range_x, o.capture_range_y));
    let current = state.player.state;
    match current {
        EntityState::Idle if at_pole && state.player.is_grounded() && !input.has_movement() => {
            state.player.state = EntityState::Action;
        }
        EntityState::Action if !at_pole => state.player.state = EntityState::Idle,
        _ => {}
    }
}

fn update_enemies(state: &mut GameState) {
    let now = state.time_ticks;
    let gravity = state.tuning.physics.gravity;

    for idx in 0..state.enemies.len() {
        let enemy = &mut state.enemies[idx];
        integrate(enemy, gravity);
        clamp_to_world(enemy, &state.tuning.world);

        // Timed states run to completion without any decision making
        if enemy.state.is_busy() {
            apply_friction(enemy, &state.tuning.physics);
            if enemy.advance_state_timer() == Some(EntityState::PreAttack) {
                let report = perform_attack(
                    &mut state.enemies[idx],
                    std::slice::from_mut(&mut state.player),
                    &state.tuning,
                    now,
                );
                if let Some(report) = report {
                    state.apply_attack_report(&report);
                }
            }
            continue;
        }

        let outcome = think(
            &mut state.enemies[idx],
            &state.player,
            &state.objectives,
            &state.tuning,
            &mut state.rng,
        );

        let enemy = &state.enemies[idx];
        let (id, pos, height, grounded) = (enemy.id, enemy.pos, enemy.height, enemy.is_grounded());
        if outcome.alerted {
            state.spawn_particle(pos + Vec3::Z * (height + 10.0), colors::HIT, Some("Oi!"));
        }
        if outcome.walking && grounded && (now + u64::from(id)) % DUST_INTERVAL == 0 {
            state.spawn_dust(pos);
        }
    }
}

fn check_game_over(state: &mut GameState) {
    let won = if state.player.health <= 0.0 {
        false
    } else if state.all_objectives_raised() {
        true
    } else {
        return;
    };

    state.phase = GamePhase::GameOver { won };
    state.events.push(GameEvent::GameOver { won });
    log::info!(
        "Game over ({}): score={} wave={} ticks={}",
        if won { "victory" } else { "defeat" },
        state.score,
        state.wave,
        state.time_ticks
    );
}

fn check_wave_advance(state: &mut GameState) {
    if state.is_over() {
        return;
    }
    let threshold = u64::from(state.wave) * state.tuning.spawn.score_per_wave;
    if state.score <= threshold {
        return;
    }

    state.wave += 1;
    state.player.heal(state.tuning.spawn.wave_heal);
    state.events.push(GameEvent::WaveAdvanced { wave: state.wave });
    log::info!("Wave {} reached at score {}", state.wave, state.score);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::entity::{Archetype, Entity, Facing};
    use crate::tuning::Tuning;
    use glam::Vec2;

    fn enemy_near_player(state: &mut GameState, archetype: Archetype, offset_x: f32) -> u32 {
        let id = state.next_entity_id();
        let pos = state.player.ground_pos() + Vec2::new(offset_x, 0.0);
        let stats = state.tuning.archetypes.get(archetype);
        let mut enemy = Entity::enemy(id, archetype, stats, state.wave, pos);
        enemy.facing = Facing::toward(pos.x, state.player.pos.x);
        state.enemies.push(enemy);
        id
    }

    fn enemy_mut(state: &mut GameState, id: u32) -> &mut Entity {
        state.enemies.iter_mut().find(|e| e.id == id).unwrap()
    }

    #[test]
    fn test_enemy_windup_lands_and_hurt_expires() {
        let mut state = GameState::new(42, Tuning::default());
        let id = enemy_near_player(&mut state, Archetype::Flagger, 40.0);
        enemy_mut(&mut state, id).set_timed_state(EntityState::PreAttack, 1);

        tick(&mut state, &TickInput::default());
        assert_eq!(state.player.health, 75.0);
        assert_eq!(state.player.state, EntityState::Hurt);
        assert!(state.player.is_hit);
        assert!(state.events.iter().any(|e| matches!(e, GameEvent::Hit { target: 1, .. })));
        assert!(state.camera_shake > 0.0);

        let hurt = state.tuning.combat.hurt_duration;
        for _ in 0..hurt - 1 {
            tick(&mut state, &TickInput::default());
            assert_eq!(state.player.state, EntityState::Hurt);
        }
        tick(&mut state, &TickInput::default());
        assert_eq!(state.player.state, EntityState::Idle);
        assert!(!state.player.is_hit);
    }

    #[test]
    fn test_invincible_player_blocks_windup() {
        let mut state = GameState::new(42, Tuning::default());
        state.player.invincibility_ticks = 50;
        let id = enemy_near_player(&mut state, Archetype::Flagger, 40.0);
        enemy_mut(&mut state, id).set_timed_state(EntityState::PreAttack, 1);

        tick(&mut state, &TickInput::default());
        assert_eq!(state.player.health, state.player.max_health);
        assert!(!state.player.is_hit);
        assert_ne!(state.player.state, EntityState::Hurt);
        assert!(state.events.contains(&GameEvent::Blocked { target: 1 }));
        assert!(!state.events.iter().any(|e| matches!(e, GameEvent::Hit { .. })));
        assert!(state.particles.iter().any(|p| p.text.as_deref() == Some("BLOCKED!")));
    }

    #[test]
    fn test_player_kill_scores() {
        let mut state = GameState::new(42, Tuning::default());
        let id = enemy_near_player(&mut state, Archetype::Flagger, 50.0);
        enemy_mut(&mut state, id).health = 1.0;
        let value = enemy_mut(&mut state, id).score_value;

        let attack = TickInput {
            attack: true,
            ..Default::default()
        };
        tick(&mut state, &attack);
        assert_eq!(state.score, value);
        assert_eq!(state.player.state, EntityState::Attack);
        assert_eq!(enemy_mut(&mut state, id).state, EntityState::Dying);
        assert!(state
            .events
            .iter()
            .any(|e| matches!(e, GameEvent::Killed { id: killed, .. } if *killed == id)));
    }

    #[test]
    fn test_dying_enemy_gets_no_ai_and_is_removed() {
        let mut state = GameState::new(42, Tuning::default());
        let id = enemy_near_player(&mut state, Archetype::Hooligan, 200.0);
        let death = state.tuning.combat.death_duration;
        {
            let enemy = enemy_mut(&mut state, id);
            enemy.health = 0.0;
            enemy.set_timed_state(EntityState::Dying, death);
        }

        for _ in 0..death - 1 {
            tick(&mut state, &TickInput::default());
            let enemy = enemy_mut(&mut state, id);
            assert_eq!(enemy.state, EntityState::Dying);
            assert_eq!(enemy.vel.x, 0.0);
        }
        tick(&mut state, &TickInput::default());
        assert!(state.enemies.iter().all(|e| e.id != id));
    }

    #[test]
    fn test_player_clamped_at_world_edge() {
        let mut state = GameState::new(42, Tuning::default());
        state.player.pos.x = state.tuning.world.width;
        let right = TickInput::with_direction(Vec2::X);
        for _ in 0..30 {
            tick(&mut state, &right);
        }
        let limit = state.tuning.world.width - state.player.width / 2.0;
        assert_eq!(state.player.pos.x, limit);
        assert!(state.camera_x <= state.tuning.world.width - state.tuning.world.viewport_width);
    }

    #[test]
    fn test_oversized_direction_is_normalized() {
        let mut a = GameState::new(42, Tuning::default());
        let mut b = GameState::new(42, Tuning::default());
        for _ in 0..10 {
            tick(&mut a, &TickInput { direction: Vec2::new(5.0, 5.0), ..Default::default() });
            tick(&mut b, &TickInput::with_direction(Vec2::new(1.0, 1.0)));
        }
        assert_eq!(a.player.pos, b.player.pos);
    }

    #[test]
    fn test_player_death_ends_run() {
        let mut state = GameState::new(42, Tuning::default());
        state.player.health = 1.0;
        let id = enemy_near_player(&mut state, Archetype::Flagger, 40.0);
        enemy_mut(&mut state, id).set_timed_state(EntityState::PreAttack, 1);

        tick(&mut state, &TickInput::default());
        assert_eq!(state.phase, GamePhase::GameOver { won: false });
        assert!(state.events.contains(&GameEvent::GameOver { won: false }));

        let ticks = state.time_ticks;
        tick(&mut state, &TickInput::default());
        assert_eq!(state.time_ticks, ticks);
    }

    #[test]
    fn test_raising_last_pole_wins() {
        let mut state = GameState::new(42, Tuning::default());
        let last = state.objectives.len() - 1;
        for o in &mut state.objectives {
            o.raise_level = 100.0;
        }
        state.objectives[last].raise_level = 99.9;
        let pole = state.objectives[last].pos;
        state.player.pos = Vec3::new(pole.x, pole.y, 0.0);

        tick(&mut state, &TickInput::default());
        assert!(state.is_won());
        assert_eq!(state.sovereignty(), 100.0);
    }

    #[test]
    fn test_idle_player_at_pole_raises_it() {
        let mut state = GameState::new(42, Tuning::default());
        let pole = state.objectives[0].pos;
        state.player.pos = Vec3::new(pole.x, pole.y, 0.0);
        for _ in 0..10 {
            tick(&mut state, &TickInput::default());
        }
        assert_eq!(state.player.state, EntityState::Action);
        assert!(state.objectives[0].raise_level > 0.0);

        tick(&mut state, &TickInput::with_direction(Vec2::NEG_X));
        assert_eq!(state.player.state, EntityState::Walk);
    }

    #[test]
    fn test_wave_advances_with_score() {
        let mut state = GameState::new(42, Tuning::default());
        state.player.health = 50.0;
        state.score = state.tuning.spawn.score_per_wave + 1;
        tick(&mut state, &TickInput::default());
        assert_eq!(state.wave, 2);
        assert_eq!(state.player.health, 50.0 + state.tuning.spawn.wave_heal);
        assert!(state.events.contains(&GameEvent::WaveAdvanced { wave: 2 }));
    }

    #[test]
    fn test_spawner_populates_world() {
        let mut state = GameState::new(42, Tuning::default());
        let interval = state.tuning.spawn.spawn_rate;
        for _ in 0..interval {
            tick(&mut state, &TickInput::default());
        }
        assert_eq!(state.enemies.len(), 1);
        assert!(state.enemies.iter().all(|e| e.id > 1));
    }

    #[test]
    fn test_determinism() {
        // Two states with same seed should produce identical results
        let mut state1 = GameState::new(99999, Tuning::default());
        let mut state2 = GameState::new(99999, Tuning::default());

        let inputs = [
            TickInput::with_direction(Vec2::new(1.0, 0.3)),
            TickInput {
                attack: true,
                ..Default::default()
            },
            TickInput::with_direction(Vec2::new(-0.5, -1.0)),
            TickInput {
                jump: true,
                ..Default::default()
            },
        ];

        for i in 0..1500 {
            let input = &inputs[(i / 40) % inputs.len()];
            tick(&mut state1, input);
            tick(&mut state2, input);
        }

        assert_eq!(state1.time_ticks, state2.time_ticks);
        assert_eq!(state1.enemies.len(), state2.enemies.len());
        assert_eq!(state1.score, state2.score);
        assert_eq!(state1.player.pos, state2.player.pos);
        for (a, b) in state1.enemies.iter().zip(&state2.enemies) {
            assert_eq!(a.id, b.id);
            assert_eq!(a.pos, b.pos);
        }
    }
}
