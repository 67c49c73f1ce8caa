//! Capture point (flag pole) occupancy
//!
//! Runs after the AI so only enemies still lowering a pole this tick count
//! against it.

use super::entity::EntityState;
use super::state::{GameEvent, GameState};

impl GameState {
    /// Raise, lower or freeze every pole based on who stands at it
    pub fn update_objectives(&mut self) {
        let o = &self.tuning.objectives;
        let (range_x, range_y) = (o.capture_range_x, o.capture_range_y);
        let (raise_rate, lower_rate) = (o.raise_rate, o.lower_rate);

        let player_pos = self.player.ground_pos();
        let player_alive = self.player.is_alive();

        for objective in &mut self.objectives {
            let player_present = player_alive && objective.contains(player_pos, range_x, range_y);

            let mut enemies_present = 0usize;
            let mut lowering = 0usize;
            for enemy in self.enemies.iter().filter(|e| !e.state.is_down()) {
                if !objective.contains(enemy.ground_pos(), range_x, range_y) {
                    continue;
                }
                enemies_present += 1;
                if enemy.state == EntityState::Action && enemy.target_id == Some(objective.id) {
                    lowering += 1;
                }
            }

            objective.is_contested = player_present && enemies_present > 0;
            let was_raised = objective.is_fully_raised();
            let was_up = objective.raise_level > 0.0;

            if objective.is_contested {
                // Frozen while both sides hold ground
            } else if player_present {
                objective.raise_level += raise_rate;
            } else if lowering > 0 {
                objective.raise_level -= lower_rate * lowering as f32;
            }
            objective.raise_level = objective.raise_level.clamp(0.0, 100.0);

            if !was_raised && objective.is_fully_raised() {
                log::info!("Objective {} fully raised", objective.id);
                self.events.push(GameEvent::ObjectiveRaised { id: objective.id });
            } else if was_up && objective.raise_level <= 0.0 {
                log::info!("Objective {} lowered", objective.id);
                self.events.push(GameEvent::ObjectiveLost { id: objective.id });
            }
        }
    }

    /// True once every pole is fully raised
    pub fn all_objectives_raised(&self) -> bool {
        !self.objectives.is_empty() && self.objectives.iter().all(|o| o.is_fully_raised())
    }
}

#[cfg(test)]
mod tests {
    use crate::sim::entity::{Archetype, Entity, EntityState};
    use crate::sim::state::{GameEvent, GameState};
    use crate::tuning::Tuning;
    use glam::Vec3;

    fn state_with_player_at_first_pole() -> GameState {
        let mut state = GameState::new(5, Tuning::default());
        let pole = state.objectives[0].pos;
        state.player.pos = Vec3::new(pole.x, pole.y, 0.0);
        state
    }

    fn lowering_enemy(state: &mut GameState, objective: usize) -> Entity {
        let id = state.next_entity_id();
        let pole = state.objectives[objective].clone();
        let stats = state.tuning.archetypes.get(Archetype::Flagger);
        let mut enemy = Entity::enemy(id, Archetype::Flagger, stats, 1, pole.pos);
        enemy.state = EntityState::Action;
        enemy.target_id = Some(pole.id);
        enemy
    }

    #[test]
    fn test_player_alone_raises() {
        let mut state = state_with_player_at_first_pole();
        state.update_objectives();
        assert!((state.objectives[0].raise_level - state.tuning.objectives.raise_rate).abs() < 1e-6);
        assert_eq!(state.objectives[1].raise_level, 0.0);
    }

    #[test]
    fn test_raise_clamps_and_reports_once() {
        let mut state = state_with_player_at_first_pole();
        state.objectives[0].raise_level = 99.9;
        state.update_objectives();
        state.update_objectives();
        assert_eq!(state.objectives[0].raise_level, 100.0);
        let raised = state
            .events
            .iter()
            .filter(|e| matches!(e, GameEvent::ObjectiveRaised { .. }))
            .count();
        assert_eq!(raised, 1);
    }

    #[test]
    fn test_contested_freezes() {
        let mut state = state_with_player_at_first_pole();
        state.objectives[0].raise_level = 50.0;
        let enemy = lowering_enemy(&mut state, 0);
        state.enemies.push(enemy);
        state.update_objectives();
        assert!(state.objectives[0].is_contested);
        assert_eq!(state.objectives[0].raise_level, 50.0);
    }

    #[test]
    fn test_enemies_lower_proportionally() {
        let mut state = GameState::new(5, Tuning::default());
        state.objectives[1].raise_level = 50.0;
        for _ in 0..3 {
            let enemy = lowering_enemy(&mut state, 1);
            state.enemies.push(enemy);
        }
        state.update_objectives();
        let expected = 50.0 - 3.0 * state.tuning.objectives.lower_rate;
        assert!((state.objectives[1].raise_level - expected).abs() < 1e-4);
        assert!(!state.objectives[1].is_contested);
    }

    #[test]
    fn test_lowering_floors_at_zero() {
        let mut state = GameState::new(5, Tuning::default());
        state.objectives[1].raise_level = 0.1;
        let enemy = lowering_enemy(&mut state, 1);
        state.enemies.push(enemy);
        state.update_objectives();
        assert_eq!(state.objectives[1].raise_level, 0.0);
        assert!(state.events.contains(&GameEvent::ObjectiveLost {
            id: state.objectives[1].id
        }));
    }

    #[test]
    fn test_all_raised() {
        let mut state = GameState::new(5, Tuning::default());
        assert!(!state.all_objectives_raised());
        for o in &mut state.objectives {
            o.raise_level = 100.0;
        }
        assert!(state.all_objectives_raised());
    }
}
