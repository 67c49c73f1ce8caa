//! Enemy spawning: pacing, population cap and archetype selection

use glam::Vec2;
use rand::Rng;
use rand::seq::IndexedRandom;

use super::entity::{Archetype, Entity};
use super::state::{GameEvent, GameState};
use crate::tuning::{ArchetypeTable, Tuning};

/// Ticks between spawn attempts; shrinks every other wave
pub fn spawn_interval(wave: u32, spawn_rate: u64) -> u64 {
    let divisor = u64::from(wave.max(1).div_ceil(2));
    (spawn_rate / divisor).max(1)
}

/// Maximum number of living enemies for a wave
pub fn enemy_cap(wave: u32, base_cap: usize) -> usize {
    base_cap + wave as usize
}

/// Weighted archetype pick among those unlocked at `wave`
pub fn roll_archetype(rng: &mut impl Rng, table: &ArchetypeTable, wave: u32) -> Archetype {
    let unlocked: Vec<Archetype> = Archetype::ALL
        .iter()
        .copied()
        .filter(|a| table.get(*a).min_wave <= wave)
        .collect();
    unlocked
        .choose_weighted(rng, |a| table.get(*a).spawn_weight)
        .copied()
        .unwrap_or(Archetype::Flagger)
}

/// Build an enemy just off screen, on a random side, somewhere in the depth band
pub fn build_enemy(
    id: u32,
    archetype: Archetype,
    wave: u32,
    camera_x: f32,
    tuning: &Tuning,
    rng: &mut impl Rng,
) -> Entity {
    let world = &tuning.world;
    let margin = tuning.spawn.spawn_margin;
    let x = if rng.random_bool(0.5) {
        camera_x + world.viewport_width + margin
    } else {
        camera_x - margin
    };
    let y = world.horizon_y + rng.random::<f32>() * (world.max_y - world.horizon_y);
    let mut enemy = Entity::enemy(id, archetype, tuning.archetypes.get(archetype), wave, Vec2::new(x, y));
    enemy.facing = super::entity::Facing::toward(x, camera_x + world.viewport_width * 0.5);
    enemy
}

impl GameState {
    /// Spawn one enemy when the interval elapses and the cap allows it.
    ///
    /// Returns the new enemy's id.
    pub fn maybe_spawn(&mut self) -> Option<u32> {
        let spawn = &self.tuning.spawn;
        if self.time_ticks % spawn_interval(self.wave, spawn.spawn_rate) != 0 {
            return None;
        }
        if self.active_enemies().count() >= enemy_cap(self.wave, spawn.base_enemy_cap) {
            return None;
        }

        let archetype = roll_archetype(&mut self.rng, &self.tuning.archetypes, self.wave);
        let id = self.next_entity_id();
        let enemy = build_enemy(id, archetype, self.wave, self.camera_x, &self.tuning, &mut self.rng);
        log::debug!(
            "Spawned {:?} #{} at ({:.0}, {:.0}) wave={}",
            archetype,
            id,
            enemy.pos.x,
            enemy.pos.y,
            self.wave
        );
        self.enemies.push(enemy);
        self.events.push(GameEvent::EnemySpawned { id, archetype });
        Some(id)
    }
}
