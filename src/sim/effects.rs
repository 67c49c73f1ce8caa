//! Pickups and particles: spawn on an event, decay per tick, removed at zero

use glam::Vec3;
use rand::Rng;

use super::entity::{MAX_PARTICLES, Particle, Pickup, PickupKind, colors};
use super::state::{GameEvent, GameState};

impl GameState {
    /// Spawn a cosmetic particle; text particles float longer
    pub fn spawn_particle(&mut self, pos: Vec3, color: u32, text: Option<&str>) {
        if self.particles.len() >= MAX_PARTICLES {
            return;
        }
        let vel = Vec3::new(
            (self.rng.random::<f32>() - 0.5) * 4.0,
            (self.rng.random::<f32>() - 0.5) * 2.0,
            if text.is_some() {
                2.0
            } else {
                self.rng.random::<f32>() * 3.0 + 1.0
            },
        );
        self.particles.push(Particle {
            pos,
            vel,
            life: if text.is_some() { 40 } else { 20 },
            color,
            text: text.map(str::to_owned),
        });
    }

    /// Drop a pickup at a world position
    pub fn spawn_pickup(&mut self, kind: PickupKind, pos: Vec3) {
        let id = self.next_entity_id();
        self.pickups.push(Pickup {
            id,
            kind,
            pos,
            life: self.tuning.loot.pickup_life,
        });
        self.events.push(GameEvent::PickupDropped { id, kind });
        log::debug!("Dropped {:?} at ({:.0}, {:.0})", kind, pos.x, pos.y);
    }

    /// Collect every pickup inside the player's collection box
    pub fn collect_pickups(&mut self) {
        if !self.player.is_alive() {
            return;
        }
        let [rx, ry, rz] = self.tuning.loot.collect_range;
        let p = self.player.pos;
        let (taken, kept): (Vec<Pickup>, Vec<Pickup>) =
            std::mem::take(&mut self.pickups).into_iter().partition(|pickup| {
                (p.x - pickup.pos.x).abs() < rx
                    && (p.y - pickup.pos.y).abs() < ry
                    && (p.z - pickup.pos.z).abs() < rz
            });
        self.pickups = kept;

        for pickup in taken {
            self.apply_pickup(pickup.kind);
        }
    }

    fn apply_pickup(&mut self, kind: PickupKind) {
        let loot = &self.tuning.loot;
        let (color, label) = match kind {
            PickupKind::Tea => {
                self.player.heal(loot.heal_amount);
                (colors::HEALTH, "HEALTH!")
            }
            PickupKind::Crumpet => {
                self.score += loot.bonus_score;
                (colors::BONUS, "BONUS!")
            }
            PickupKind::Speed => {
                self.player.speed_boost_ticks = loot.speed_boost_duration;
                (colors::SPEED, "SPEED!")
            }
            PickupKind::Invincibility => {
                self.player.invincibility_ticks = loot.invincibility_duration;
                (colors::POWER, "POWER!")
            }
        };
        let pos = self.player.pos + Vec3::Z * self.player.height;
        self.spawn_particle(pos, color, Some(label));
        self.events.push(GameEvent::PickupCollected { kind });
        log::debug!("Collected {:?}", kind);
    }

    /// Age pickups and remove expired ones
    pub fn update_pickups(&mut self) {
        for pickup in &mut self.pickups {
            pickup.life = pickup.life.saturating_sub(1);
        }
        self.pickups.retain(|p| p.life > 0);
    }

    /// Move particles; they bounce with restitution and fade out
    pub fn update_particles(&mut self) {
        let gravity = self.tuning.physics.gravity;
        let restitution = self.tuning.physics.particle_restitution;
        for particle in &mut self.particles {
            particle.pos += particle.vel;
            particle.vel.z -= gravity;
            particle.life = particle.life.saturating_sub(1);
            if particle.pos.z < 0.0 {
                particle.pos.z = 0.0;
                particle.vel.z *= -restitution;
                particle.vel.x *= 0.8;
                particle.vel.y *= 0.8;
            }
        }
        self.particles.retain(|p| p.life > 0);
    }

    /// Dust puff under a walking character
    pub(crate) fn spawn_dust(&mut self, pos: Vec3) {
        self.spawn_particle(Vec3::new(pos.x, pos.y, 0.0), colors::DUST, None);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tuning::Tuning;

    #[test]
    fn test_pickup_expires() {
        let mut state = GameState::new(1, Tuning::default());
        state.tuning.loot.pickup_life = 3;
        state.spawn_pickup(PickupKind::Tea, Vec3::new(2000.0, 600.0, 0.0));
        for _ in 0..2 {
            state.update_pickups();
        }
        assert_eq!(state.pickups.len(), 1);
        state.update_pickups();
        assert!(state.pickups.is_empty());
    }

    #[test]
    fn test_collect_health_clamps() {
        let mut state = GameState::new(1, Tuning::default());
        state.player.health = 95.0;
        let pos = state.player.pos;
        state.spawn_pickup(PickupKind::Tea, pos);
        state.collect_pickups();
        assert!(state.pickups.is_empty());
        assert_eq!(state.player.health, state.player.max_health);
        assert!(state
            .events
            .contains(&GameEvent::PickupCollected { kind: PickupKind::Tea }));
    }

    #[test]
    fn test_collect_power_ups() {
        let mut state = GameState::new(1, Tuning::default());
        let pos = state.player.pos;
        state.spawn_pickup(PickupKind::Speed, pos);
        state.spawn_pickup(PickupKind::Invincibility, pos);
        state.spawn_pickup(PickupKind::Crumpet, pos);
        state.collect_pickups();
        assert_eq!(state.player.speed_boost_ticks, state.tuning.loot.speed_boost_duration);
        assert_eq!(
            state.player.invincibility_ticks,
            state.tuning.loot.invincibility_duration
        );
        assert_eq!(state.score, state.tuning.loot.bonus_score);
    }

    #[test]
    fn test_far_pickup_not_collected() {
        let mut state = GameState::new(1, Tuning::default());
        let pos = state.player.pos + Vec3::new(100.0, 0.0, 0.0);
        state.spawn_pickup(PickupKind::Crumpet, pos);
        state.collect_pickups();
        assert_eq!(state.pickups.len(), 1);
        assert_eq!(state.score, 0);
    }

    #[test]
    fn test_particles_decay_and_cap() {
        let mut state = GameState::new(1, Tuning::default());
        for _ in 0..(MAX_PARTICLES + 10) {
            state.spawn_particle(Vec3::new(10.0, 500.0, 0.0), colors::DUST, None);
        }
        assert_eq!(state.particles.len(), MAX_PARTICLES);
        for _ in 0..20 {
            state.update_particles();
        }
        assert!(state.particles.is_empty());
        assert!(state.particles.iter().all(|p| p.pos.z >= 0.0));
    }
}
