//! Melee attack resolution
//!
//! `perform_attack` is a pure function of the attacker and its candidate
//! targets: it mutates health, state and knockback and returns a report.
//! Score, loot and cosmetic effects are applied afterwards by
//! `GameState::apply_attack_report`, which owns the random source.

use glam::Vec3;
use rand::Rng;
use rand::seq::IndexedRandom;

use super::entity::{Entity, EntityState, Facing, PickupKind, colors};
use super::state::{GameEvent, GameState};
use crate::tuning::{LootTuning, Tuning};

/// One target struck by an attack
#[derive(Debug, Clone, PartialEq)]
pub struct Hit {
    pub target_id: u32,
    pub damage: f32,
    /// Target position after knockback was applied
    pub pos: Vec3,
    pub target_height: f32,
    pub killed: bool,
    pub target_is_player: bool,
    pub score_value: u64,
}

/// Outcome of one resolved attack
#[derive(Debug, Clone, PartialEq)]
pub struct AttackReport {
    pub attacker_id: u32,
    pub attacker_is_player: bool,
    pub origin: Vec3,
    pub facing: Facing,
    /// Player combo tier used for this swing
    pub combo_stage: Option<u8>,
    pub hits: Vec<Hit>,
    /// Targets whose invincibility negated the attack
    pub blocked: Vec<(u32, Vec3)>,
}

/// Whether `target` is inside `attacker`'s reach and in front of it
pub fn hit_test(attacker: &Entity, target: &Entity, tuning: &Tuning) -> bool {
    let c = &tuning.combat;
    let dx = target.pos.x - attacker.pos.x;
    let dy = (target.pos.y - attacker.pos.y).abs();
    let dz = (target.pos.z - attacker.pos.z).abs();

    let in_front = match attacker.facing {
        Facing::Right => dx > 0.0,
        Facing::Left => dx < 0.0,
    };

    dx.abs() < c.hit_range_x && dy < c.hit_range_y && dz < c.hit_range_z && in_front
}

/// Damage and knockback for the attacker's next swing, advancing the combo
fn swing_strength(attacker: &mut Entity, tuning: &Tuning, now: u64) -> (f32, f32, Option<u8>) {
    match attacker.archetype() {
        None => {
            let c = &tuning.combat;
            let in_window = attacker
                .last_attack_tick
                .is_some_and(|last| now.saturating_sub(last) < c.combo_window);
            attacker.combo_stage = if in_window {
                (attacker.combo_stage + 1) % c.combo_stages.len() as u8
            } else {
                0
            };
            attacker.last_attack_tick = Some(now);

            let stage = c.combo_stages[attacker.combo_stage as usize];
            (stage.damage, stage.knockback, Some(attacker.combo_stage))
        }
        Some(archetype) => {
            let stats = tuning.archetypes.get(archetype);
            (stats.damage, stats.knockback, None)
        }
    }
}

/// Start an attack and resolve it against `targets`.
///
/// Returns `None` without touching anything when the attacker is already
/// attacking, hurt or down; a second trigger in the same tick is a no-op.
pub fn perform_attack(
    attacker: &mut Entity,
    targets: &mut [Entity],
    tuning: &Tuning,
    now: u64,
) -> Option<AttackReport> {
    if matches!(attacker.state, EntityState::Attack | EntityState::Hurt) || attacker.state.is_down() {
        return None;
    }

    attacker.set_timed_state(EntityState::Attack, tuning.combat.attack_duration);
    let (damage, knockback, combo_stage) = swing_strength(attacker, tuning, now);

    let mut report = AttackReport {
        attacker_id: attacker.id,
        attacker_is_player: attacker.is_player(),
        origin: attacker.pos,
        facing: attacker.facing,
        combo_stage,
        hits: Vec::new(),
        blocked: Vec::new(),
    };

    for target in targets.iter_mut() {
        if target.id == attacker.id || target.state.is_down() {
            continue;
        }

        if target.is_player() && target.is_invincible() {
            report.blocked.push((target.id, target.pos));
            continue;
        }

        if !hit_test(attacker, target, tuning) {
            continue;
        }

        target.take_damage(damage);
        target.set_timed_state(EntityState::Hurt, tuning.combat.hurt_duration);
        target.is_hit = true;

        let resistance = target
            .archetype()
            .map_or(1.0, |a| tuning.archetypes.get(a).knockback_taken);
        target.vel.x = attacker.facing.sign() * knockback * resistance;
        target.vel.z = tuning.combat.hurt_pop;

        let killed = target.health <= 0.0;
        if killed {
            target.set_timed_state(EntityState::Dying, tuning.combat.death_duration);
        }

        report.hits.push(Hit {
            target_id: target.id,
            damage,
            pos: target.pos,
            target_height: target.height,
            killed,
            target_is_player: target.is_player(),
            score_value: target.score_value,
        });
    }

    Some(report)
}

/// Weighted pick over the pickup kinds
pub fn roll_pickup_kind(rng: &mut impl Rng, loot: &LootTuning) -> PickupKind {
    PickupKind::ALL
        .choose_weighted(rng, |k| loot.weight(*k))
        .copied()
        .unwrap_or(PickupKind::Crumpet)
}

impl GameState {
    /// Apply score, loot, events and cosmetic effects of a resolved attack
    pub fn apply_attack_report(&mut self, report: &AttackReport) {
        if let Some(stage) = report.combo_stage {
            let label = self.tuning.combat.combo_stages[stage as usize].label;
            let text_pos = report.origin + Vec3::new(report.facing.sign() * 60.0, 0.0, 45.0);
            self.spawn_particle(text_pos, colors::COMBO, Some(label));
        }

        for &(target, pos) in &report.blocked {
            self.spawn_particle(pos + Vec3::Z * 45.0, colors::BLOCK, Some("BLOCKED!"));
            self.events.push(GameEvent::Blocked { target });
        }

        for hit in &report.hits {
            self.spawn_particle(
                hit.pos + Vec3::Z * hit.target_height,
                colors::HIT,
                Some(format!("-{}", hit.damage.round()).as_str()),
            );
            self.events.push(GameEvent::Hit {
                attacker: report.attacker_id,
                target: hit.target_id,
                damage: hit.damage,
            });

            if hit.target_is_player {
                self.camera_shake = (self.camera_shake + self.tuning.camera.shake_on_hit).min(1.0);
            }

            if !hit.killed {
                continue;
            }

            let kind = if hit.target_is_player {
                self.player.kind
            } else {
                self.enemies
                    .iter()
                    .find(|e| e.id == hit.target_id)
                    .map_or(self.player.kind, |e| e.kind)
            };
            let score = if hit.target_is_player { 0 } else { hit.score_value };
            self.score += score;
            self.events.push(GameEvent::Killed {
                id: hit.target_id,
                kind,
                score,
            });
            log::debug!("Entity {} killed ({:?}), +{}", hit.target_id, kind, score);

            if !hit.target_is_player && self.rng.random_bool(self.tuning.loot.drop_chance) {
                let kind = roll_pickup_kind(&mut self.rng, &self.tuning.loot);
                self.spawn_pickup(kind, hit.pos);
            }
        }
    }
}
