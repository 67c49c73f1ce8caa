//! Game state and core simulation types
//!
//! `GameState` is rebuilt from scratch for every session so nothing leaks in
//! from a previous run.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::entity::{Archetype, Entity, EntityKind, EntityState, Objective, Particle, Pickup, PickupKind};
use crate::tuning::Tuning;

/// Current phase of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Active gameplay
    Playing,
    /// Run ended; `won` is true when every pole was raised
    GameOver { won: bool },
}

/// Things that happened during a tick, for HUD, audio and logging
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    EnemySpawned { id: u32, archetype: Archetype },
    Hit { attacker: u32, target: u32, damage: f32 },
    /// Attack negated by invincibility
    Blocked { target: u32 },
    Killed { id: u32, kind: EntityKind, score: u64 },
    PickupDropped { id: u32, kind: PickupKind },
    PickupCollected { kind: PickupKind },
    ObjectiveRaised { id: u32 },
    ObjectiveLost { id: u32 },
    WaveAdvanced { wave: u32 },
    GameOver { won: bool },
}

/// Complete state of one session
#[derive(Debug, Clone)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    pub tuning: Tuning,
    /// Session random source; every roll in the simulation draws from it
    pub(crate) rng: Pcg32,
    /// Simulation tick counter
    pub time_ticks: u64,
    pub phase: GamePhase,
    /// Difficulty tier (1-based)
    pub wave: u32,
    pub score: u64,
    /// The one player character; reset with the session, never removed
    pub player: Entity,
    /// Enemies (sorted by id for determinism)
    pub enemies: Vec<Entity>,
    pub pickups: Vec<Pickup>,
    /// Capture points, created once per session
    pub objectives: Vec<Objective>,
    /// Visual particles (not gameplay-affecting)
    pub particles: Vec<Particle>,
    /// Smoothed horizontal scroll offset
    pub camera_x: f32,
    /// Decaying shake intensity for the renderer
    pub camera_shake: f32,
    /// Events emitted by the most recent tick
    pub events: Vec<GameEvent>,
    next_id: u32,
}

impl GameState {
    /// Create a new session with the given seed
    pub fn new(seed: u64, tuning: Tuning) -> Self {
        let combat = &tuning.combat;
        let player = Entity::player(
            1,
            tuning.world.player_start,
            combat.player_max_health,
            combat.player_width,
            combat.player_height,
        );

        let mut state = Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            time_ticks: 0,
            phase: GamePhase::Playing,
            wave: 1,
            score: 0,
            player,
            enemies: Vec::new(),
            pickups: Vec::new(),
            objectives: Vec::new(),
            particles: Vec::new(),
            camera_x: 0.0,
            camera_shake: 0.0,
            events: Vec::new(),
            next_id: 2,
            tuning,
        };

        let positions: Vec<Vec2> = state.tuning.objectives.positions.clone();
        for pos in positions {
            let id = state.next_entity_id();
            state.objectives.push(Objective::new(id, pos));
        }
        state.camera_x = super::camera::camera_target(&state.player, &state.tuning);

        log::info!(
            "New session: seed={} objectives={}",
            seed,
            state.objectives.len()
        );
        state
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Mean raise level across all capture points
    pub fn sovereignty(&self) -> f32 {
        if self.objectives.is_empty() {
            return 0.0;
        }
        let total: f32 = self.objectives.iter().map(|o| o.raise_level).sum();
        total / self.objectives.len() as f32
    }

    #[inline]
    pub fn is_over(&self) -> bool {
        matches!(self.phase, GamePhase::GameOver { .. })
    }

    #[inline]
    pub fn is_won(&self) -> bool {
        self.phase == GamePhase::GameOver { won: true }
    }

    /// Enemies that are neither dying nor dead
    pub fn active_enemies(&self) -> impl Iterator<Item = &Entity> {
        self.enemies.iter().filter(|e| !e.state.is_down())
    }

    /// Take the events accumulated since the last drain
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Ensure entities are sorted by ID for deterministic iteration
    pub fn normalize_order(&mut self) {
        self.enemies.sort_by_key(|e| e.id);
        self.pickups.sort_by_key(|p| p.id);
    }

    /// Drop enemies whose death animation has finished
    pub(crate) fn remove_dead(&mut self) {
        self.enemies.retain(|e| e.state != EntityState::Dead);
        debug_assert!(self.enemies.iter().all(|e| e.state != EntityState::Dead));
    }

    /// Debug-build invariant checks run at the end of every tick
    pub(crate) fn debug_check_invariants(&self) {
        debug_assert!(
            std::iter::once(&self.player)
                .chain(self.enemies.iter())
                .all(|e| (0.0..=e.max_health).contains(&e.health)),
            "health left [0, max_health]"
        );
        debug_assert!(
            self.objectives
                .iter()
                .all(|o| (0.0..=100.0).contains(&o.raise_level)),
            "raise level left [0, 100]"
        );
        debug_assert!(self.player.pos.is_finite(), "player position is not finite");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_session() {
        let state = GameState::new(7, Tuning::default());
        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(state.wave, 1);
        assert_eq!(state.score, 0);
        assert!(state.enemies.is_empty());
        assert_eq!(state.objectives.len(), state.tuning.objectives.positions.len());
        assert_eq!(state.sovereignty(), 0.0);
        assert_eq!(state.player.health, state.player.max_health);
    }

    #[test]
    fn test_ids_unique() {
        let mut state = GameState::new(7, Tuning::default());
        let a = state.next_entity_id();
        let b = state.next_entity_id();
        assert_ne!(a, b);
        assert!(state.objectives.iter().all(|o| o.id != a && o.id != b));
        assert!(state.objectives.iter().all(|o| o.id != state.player.id));
    }

    #[test]
    fn test_sovereignty_is_mean() {
        let mut state = GameState::new(7, Tuning::default());
        let n = state.objectives.len() as f32;
        state.objectives[0].raise_level = 100.0;
        assert!((state.sovereignty() - 100.0 / n).abs() < 1e-4);
    }
}
