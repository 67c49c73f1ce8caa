//! Data-driven game balance
//!
//! Every number the simulation consults lives here, grouped by subsystem.
//! Defaults mirror `crate::consts`; a JSON file may override any subset.

use std::fs;
use std::path::Path;

use glam::Vec2;
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;

use crate::consts::*;
use crate::sim::entity::{Archetype, PickupKind};

/// Errors raised while loading a tuning file
#[derive(Debug, Error)]
pub enum TuningError {
    #[error("failed to read tuning file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse tuning file: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid tuning value `{field}`: {reason}")]
    Invalid { field: &'static str, reason: String },
}

fn invalid(field: &'static str, reason: impl Into<String>) -> TuningError {
    TuningError::Invalid {
        field,
        reason: reason.into(),
    }
}

/// World and viewport geometry
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldTuning {
    pub width: f32,
    pub viewport_width: f32,
    pub horizon_y: f32,
    pub max_y: f32,
    pub player_start: Vec2,
}

impl Default for WorldTuning {
    fn default() -> Self {
        Self {
            width: WORLD_WIDTH,
            viewport_width: VIEWPORT_WIDTH,
            horizon_y: GROUND_Y_HORIZON,
            max_y: GROUND_Y_MAX,
            player_start: Vec2::new(100.0, 600.0),
        }
    }
}

/// Character movement
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsTuning {
    pub gravity: f32,
    pub friction: f32,
    pub air_friction: f32,
    pub acceleration: f32,
    /// Fraction of acceleration available while airborne
    pub air_control: f32,
    pub walk_speed: f32,
    pub walk_speed_y: f32,
    pub jump_force: f32,
    pub velocity_epsilon: f32,
    pub speed_multiplier: f32,
    /// Particle bounce restitution (characters never bounce)
    pub particle_restitution: f32,
}

impl Default for PhysicsTuning {
    fn default() -> Self {
        Self {
            gravity: GRAVITY,
            friction: FRICTION,
            air_friction: AIR_FRICTION,
            acceleration: ACCELERATION,
            air_control: AIR_CONTROL,
            walk_speed: WALK_SPEED,
            walk_speed_y: WALK_SPEED_Y,
            jump_force: JUMP_FORCE,
            velocity_epsilon: VELOCITY_EPSILON,
            speed_multiplier: SPEED_MULTIPLIER,
            particle_restitution: 0.5,
        }
    }
}

/// Damage and knockback of one player combo stage
#[derive(Debug, Clone, Copy)]
pub struct ComboStage {
    pub damage: f32,
    pub knockback: f32,
    pub label: &'static str,
}

/// Attack resolution
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CombatTuning {
    pub attack_duration: u32,
    pub hurt_duration: u32,
    pub death_duration: u32,
    pub combo_window: u64,
    #[serde(skip, default = "default_combo_stages")]
    pub combo_stages: [ComboStage; 3],
    pub hit_range_x: f32,
    pub hit_range_y: f32,
    pub hit_range_z: f32,
    /// Upward velocity given to anything that gets hit
    pub hurt_pop: f32,
    /// Planar velocity multiplier when an attack starts
    pub attack_slowdown: f32,
    pub player_max_health: f32,
    pub player_width: f32,
    pub player_height: f32,
}

fn default_combo_stages() -> [ComboStage; 3] {
    [
        ComboStage {
            damage: 25.0,
            knockback: 10.0,
            label: "JAB!",
        },
        ComboStage {
            damage: 35.0,
            knockback: 15.0,
            label: "HOOK!",
        },
        ComboStage {
            damage: 50.0,
            knockback: 25.0,
            label: "SMASH!",
        },
    ]
}

impl Default for CombatTuning {
    fn default() -> Self {
        Self {
            attack_duration: ATTACK_DURATION,
            hurt_duration: HURT_DURATION,
            death_duration: DEATH_DURATION,
            combo_window: COMBO_WINDOW,
            combo_stages: default_combo_stages(),
            hit_range_x: HIT_BOX_RANGE_X,
            hit_range_y: HIT_BOX_RANGE_Y,
            hit_range_z: HIT_BOX_RANGE_Z,
            hurt_pop: 5.0,
            attack_slowdown: 0.6,
            player_max_health: HERO_MAX_HEALTH,
            player_width: HERO_WIDTH,
            player_height: HERO_HEIGHT,
        }
    }
}

/// Loot drops and pickup effects
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LootTuning {
    pub drop_chance: f64,
    pub weight_tea: u32,
    pub weight_crumpet: u32,
    pub weight_speed: u32,
    pub weight_invincibility: u32,
    pub pickup_life: u32,
    pub collect_range: [f32; 3],
    pub heal_amount: f32,
    pub bonus_score: u64,
    pub speed_boost_duration: u32,
    pub invincibility_duration: u32,
}

impl LootTuning {
    /// Relative weight of a pickup kind in the drop roll
    pub fn weight(&self, kind: PickupKind) -> u32 {
        match kind {
            PickupKind::Tea => self.weight_tea,
            PickupKind::Crumpet => self.weight_crumpet,
            PickupKind::Speed => self.weight_speed,
            PickupKind::Invincibility => self.weight_invincibility,
        }
    }
}

impl Default for LootTuning {
    fn default() -> Self {
        Self {
            drop_chance: 0.25,
            weight_tea: 30,
            weight_crumpet: 50,
            weight_speed: 10,
            weight_invincibility: 10,
            pickup_life: 800, // ~13 seconds
            collect_range: [40.0, 20.0, 40.0],
            heal_amount: 20.0,
            bonus_score: 500,
            speed_boost_duration: SPEED_BOOST_DURATION,
            invincibility_duration: INVINCIBILITY_DURATION,
        }
    }
}

/// Follow camera
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraTuning {
    /// Player sits this fraction of the viewport from the left edge
    pub lead_fraction: f32,
    pub lerp: f32,
    pub shake_on_hit: f32,
    pub shake_decay: f32,
}

impl Default for CameraTuning {
    fn default() -> Self {
        Self {
            lead_fraction: 0.35,
            lerp: 0.1,
            shake_on_hit: 1.0,
            shake_decay: 0.9,
        }
    }
}

/// Enemy spawning and wave progression
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SpawnTuning {
    pub spawn_rate: u64,
    pub base_enemy_cap: usize,
    /// Distance outside the viewport edge where enemies appear
    pub spawn_margin: f32,
    pub score_per_wave: u64,
    pub wave_heal: f32,
}

impl Default for SpawnTuning {
    fn default() -> Self {
        Self {
            spawn_rate: SPAWN_RATE,
            base_enemy_cap: 4,
            spawn_margin: 50.0,
            score_per_wave: 1500,
            wave_heal: 30.0,
        }
    }
}

/// Capture points
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ObjectiveTuning {
    pub positions: Vec<Vec2>,
    pub capture_range_x: f32,
    pub capture_range_y: f32,
    /// Distance at which a seeking enemy stops and starts lowering
    pub arrival_radius: f32,
    pub raise_rate: f32,
    /// Fall per tick for each enemy lowering the pole
    pub lower_rate: f32,
}

impl Default for ObjectiveTuning {
    fn default() -> Self {
        Self {
            positions: vec![
                Vec2::new(500.0, 560.0),
                Vec2::new(1100.0, 500.0),
                Vec2::new(1700.0, 650.0),
                Vec2::new(2200.0, 600.0),
            ],
            capture_range_x: 60.0,
            capture_range_y: 40.0,
            arrival_radius: 15.0,
            raise_rate: 0.3,
            lower_rate: 0.15,
        }
    }
}

/// How an archetype chooses a pole when the player is out of reach
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ObjectivePreference {
    /// Closest pole that still has something left to lower
    Nearest,
    /// Pole with the highest raise level
    MostRaised,
    /// Never seeks objectives, idles when the player is out of range
    None,
}

/// Per-archetype stat block
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArchetypeStats {
    pub width: f32,
    pub height: f32,
    pub base_health: f32,
    pub health_per_wave: f32,
    pub score_value: u64,
    pub score_per_wave: u64,
    pub size_per_wave: f32,
    pub aggro_range_x: f32,
    pub aggro_range_y: f32,
    pub stop_distance: f32,
    /// Fractions of the base walk speed
    pub speed_x: f32,
    pub speed_y: f32,
    pub attack_chance: f64,
    pub windup_ticks: u32,
    pub damage: f32,
    pub knockback: f32,
    /// Multiplier on incoming knockback (1.0 = no resistance)
    pub knockback_taken: f32,
    pub objective: ObjectivePreference,
    pub min_wave: u32,
    pub spawn_weight: u32,
}

/// Stat table keyed by archetype.
///
/// Each block may be given partially; missing fields keep that archetype's
/// defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ArchetypeTable {
    #[serde(deserialize_with = "flagger_stats")]
    pub flagger: ArchetypeStats,
    #[serde(deserialize_with = "painter_stats")]
    pub painter: ArchetypeStats,
    #[serde(deserialize_with = "hooligan_stats")]
    pub hooligan: ArchetypeStats,
    #[serde(deserialize_with = "tank_stats")]
    pub tank: ArchetypeStats,
}

impl ArchetypeTable {
    pub fn get(&self, archetype: Archetype) -> &ArchetypeStats {
        match archetype {
            Archetype::Flagger => &self.flagger,
            Archetype::Painter => &self.painter,
            Archetype::Hooligan => &self.hooligan,
            Archetype::Tank => &self.tank,
        }
    }
}

impl Default for ArchetypeTable {
    fn default() -> Self {
        Self {
            flagger: ArchetypeStats::flagger(),
            painter: ArchetypeStats::painter(),
            hooligan: ArchetypeStats::hooligan(),
            tank: ArchetypeStats::tank(),
        }
    }
}

impl ArchetypeStats {
    pub fn flagger() -> Self {
        Self {
            width: 50.0,
            height: 85.0,
            base_health: 40.0,
            health_per_wave: 10.0,
            score_value: 100,
            score_per_wave: 10,
            size_per_wave: 0.5,
            aggro_range_x: 150.0,
            aggro_range_y: 50.0,
            stop_distance: 40.0,
            speed_x: 0.4,
            speed_y: 0.25,
            attack_chance: 0.02,
            windup_ticks: 25,
            damage: 25.0,
            knockback: 10.0,
            knockback_taken: 1.0,
            objective: ObjectivePreference::Nearest,
            min_wave: 1,
            spawn_weight: 40,
        }
    }

    pub fn painter() -> Self {
        Self {
            width: 50.0,
            height: 85.0,
            base_health: 40.0,
            health_per_wave: 10.0,
            score_value: 100,
            score_per_wave: 10,
            size_per_wave: 0.5,
            aggro_range_x: 120.0,
            aggro_range_y: 50.0,
            stop_distance: 40.0,
            speed_x: 0.4,
            speed_y: 0.25,
            attack_chance: 0.02,
            windup_ticks: 25,
            damage: 25.0,
            knockback: 10.0,
            knockback_taken: 1.0,
            objective: ObjectivePreference::MostRaised,
            min_wave: 1,
            spawn_weight: 40,
        }
    }

    pub fn hooligan() -> Self {
        Self {
            width: 45.0,
            height: 85.0,
            base_health: 30.0,
            health_per_wave: 5.0,
            score_value: 200,
            score_per_wave: 20,
            size_per_wave: 0.5,
            aggro_range_x: 600.0,
            aggro_range_y: 150.0,
            stop_distance: 30.0,
            speed_x: 0.7,
            speed_y: 0.4,
            attack_chance: 0.04,
            windup_ticks: 10,
            damage: 15.0,
            knockback: 5.0,
            knockback_taken: 1.0,
            objective: ObjectivePreference::None,
            min_wave: 2,
            spawn_weight: 20,
        }
    }

    pub fn tank() -> Self {
        Self {
            width: 80.0,
            height: 95.0,
            base_health: 120.0,
            health_per_wave: 20.0,
            score_value: 500,
            score_per_wave: 50,
            size_per_wave: 1.0,
            aggro_range_x: 600.0,
            aggro_range_y: 150.0,
            stop_distance: 40.0,
            speed_x: 0.2,
            speed_y: 0.15,
            attack_chance: 0.02,
            windup_ticks: 30,
            damage: 40.0,
            knockback: 15.0,
            knockback_taken: 0.2,
            objective: ObjectivePreference::None,
            min_wave: 4,
            spawn_weight: 15,
        }
    }
}

/// Overlay a partial JSON object onto an archetype's default stats
fn merge_stats<'de, D>(deserializer: D, base: ArchetypeStats) -> Result<ArchetypeStats, D::Error>
where
    D: Deserializer<'de>,
{
    let overrides = match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::Object(map) => map,
        _ => return Err(D::Error::custom("archetype stats must be an object")),
    };
    let mut merged = serde_json::to_value(base).map_err(D::Error::custom)?;
    if let serde_json::Value::Object(fields) = &mut merged {
        fields.extend(overrides);
    }
    serde_json::from_value(merged).map_err(D::Error::custom)
}

fn flagger_stats<'de, D: Deserializer<'de>>(d: D) -> Result<ArchetypeStats, D::Error> {
    merge_stats(d, ArchetypeStats::flagger())
}

fn painter_stats<'de, D: Deserializer<'de>>(d: D) -> Result<ArchetypeStats, D::Error> {
    merge_stats(d, ArchetypeStats::painter())
}

fn hooligan_stats<'de, D: Deserializer<'de>>(d: D) -> Result<ArchetypeStats, D::Error> {
    merge_stats(d, ArchetypeStats::hooligan())
}

fn tank_stats<'de, D: Deserializer<'de>>(d: D) -> Result<ArchetypeStats, D::Error> {
    merge_stats(d, ArchetypeStats::tank())
}

/// Complete balance sheet for one session
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    pub world: WorldTuning,
    pub physics: PhysicsTuning,
    pub combat: CombatTuning,
    pub loot: LootTuning,
    pub camera: CameraTuning,
    pub spawn: SpawnTuning,
    pub objectives: ObjectiveTuning,
    pub archetypes: ArchetypeTable,
}

impl Tuning {
    /// Parse and validate a JSON tuning document; missing fields keep defaults
    pub fn from_json(json: &str) -> Result<Self, TuningError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Load a JSON tuning file from disk
    pub fn load(path: impl AsRef<Path>) -> Result<Self, TuningError> {
        let json = fs::read_to_string(path.as_ref())?;
        let tuning = Self::from_json(&json)?;
        log::info!("Loaded tuning from {}", path.as_ref().display());
        Ok(tuning)
    }

    /// Reject values the simulation cannot run with
    pub fn validate(&self) -> Result<(), TuningError> {
        let w = &self.world;
        if !(w.width > 0.0) {
            return Err(invalid("world.width", "must be positive"));
        }
        if !(w.viewport_width > 0.0) || w.viewport_width > w.width {
            return Err(invalid(
                "world.viewport_width",
                format!("must be in (0, {}]", w.width),
            ));
        }
        if !(w.horizon_y < w.max_y) {
            return Err(invalid("world.horizon_y", "must be above max_y"));
        }

        let p = &self.physics;
        if !(0.0..=1.0).contains(&p.friction) || !(0.0..=1.0).contains(&p.air_friction) {
            return Err(invalid("physics.friction", "must be within [0, 1]"));
        }
        if !(p.speed_multiplier >= 1.0) {
            return Err(invalid("physics.speed_multiplier", "must be at least 1"));
        }

        let c = &self.combat;
        if c.attack_duration == 0 || c.hurt_duration == 0 || c.death_duration == 0 {
            return Err(invalid("combat", "state durations must be at least one tick"));
        }
        if !(c.player_max_health > 0.0) {
            return Err(invalid("combat.player_max_health", "must be positive"));
        }

        if !(0.0..=1.0).contains(&self.loot.drop_chance) {
            return Err(invalid("loot.drop_chance", "must be within [0, 1]"));
        }
        if PickupKind::ALL.iter().all(|k| self.loot.weight(*k) == 0) {
            return Err(invalid("loot", "at least one pickup weight must be non-zero"));
        }

        if self.spawn.spawn_rate == 0 {
            return Err(invalid("spawn.spawn_rate", "must be at least one tick"));
        }

        let o = &self.objectives;
        if o.positions.is_empty() {
            return Err(invalid("objectives.positions", "at least one capture point is required"));
        }
        if let Some(pos) = o
            .positions
            .iter()
            .find(|p| p.x < 0.0 || p.x > w.width || p.y < w.horizon_y || p.y > w.max_y)
        {
            return Err(invalid(
                "objectives.positions",
                format!("({}, {}) lies outside the walkable world", pos.x, pos.y),
            ));
        }

        for archetype in Archetype::ALL {
            let stats = self.archetypes.get(archetype);
            if !(0.0..=1.0).contains(&stats.attack_chance) {
                return Err(invalid("archetypes.attack_chance", "must be within [0, 1]"));
            }
            if !(stats.base_health > 0.0) {
                return Err(invalid("archetypes.base_health", "must be positive"));
            }
        }

        Ok(())
    }
}
