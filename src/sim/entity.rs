//! Entity model: characters, pickups, particles and capture points
//!
//! Coordinates: `x` is world-lateral, `y` is ground depth, `z` is height
//! above the ground.

use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};

use crate::tuning::ArchetypeStats;

/// Enemy archetypes; numeric differences live in `tuning::ArchetypeTable`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Archetype {
    /// Walks to the nearest pole and lowers it
    Flagger,
    /// Goes after whichever pole is most raised
    Painter,
    /// Fast, fragile, hunts the player from far away
    Hooligan,
    /// Slow heavy hitter that shrugs off knockback
    Tank,
}

impl Archetype {
    pub const ALL: [Archetype; 4] = [
        Archetype::Flagger,
        Archetype::Painter,
        Archetype::Hooligan,
        Archetype::Tank,
    ];
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EntityKind {
    Player,
    Enemy(Archetype),
}

/// Facing direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Facing {
    Left,
    Right,
}

impl Facing {
    /// -1 for left, +1 for right
    #[inline]
    pub fn sign(self) -> f32 {
        match self {
            Facing::Left => -1.0,
            Facing::Right => 1.0,
        }
    }

    /// Facing that points from `from` toward `to` along x
    #[inline]
    pub fn toward(from: f32, to: f32) -> Self {
        if to > from { Facing::Right } else { Facing::Left }
    }
}

/// Character state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EntityState {
    Idle,
    Walk,
    /// Enemy wind-up; the attack resolves when the timer runs out
    PreAttack,
    Attack,
    Hurt,
    Dying,
    /// Terminal; filtered out of the enemy list every tick
    Dead,
    /// Raising or lowering a capture point
    Action,
}

impl EntityState {
    /// States that suppress movement input and AI decisions
    #[inline]
    pub fn is_busy(self) -> bool {
        matches!(
            self,
            EntityState::PreAttack
                | EntityState::Attack
                | EntityState::Hurt
                | EntityState::Dying
                | EntityState::Dead
        )
    }

    #[inline]
    pub fn is_down(self) -> bool {
        matches!(self, EntityState::Dying | EntityState::Dead)
    }
}

/// A player or enemy character
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Entity {
    pub id: u32,
    pub kind: EntityKind,
    pub pos: Vec3,
    pub vel: Vec3,
    pub width: f32,
    pub height: f32,
    pub facing: Facing,
    pub state: EntityState,
    /// Ticks left in the current timed state
    pub state_timer: u32,
    pub health: f32,
    pub max_health: f32,
    pub score_value: u64,
    /// Player combo tier (0 = jab, 1 = hook, 2 = smash)
    pub combo_stage: u8,
    /// Tick of the most recent attack attempt
    pub last_attack_tick: Option<u64>,
    /// Hit flash, cleared when the hurt state ends
    pub is_hit: bool,
    pub speed_boost_ticks: u32,
    pub invincibility_ticks: u32,
    /// Capture point this enemy is heading for
    pub target_id: Option<u32>,
}

impl Entity {
    /// The player character at a starting location
    pub fn player(id: u32, start: Vec2, max_health: f32, width: f32, height: f32) -> Self {
        Self {
            id,
            kind: EntityKind::Player,
            pos: Vec3::new(start.x, start.y, 0.0),
            vel: Vec3::ZERO,
            width,
            height,
            facing: Facing::Right,
            state: EntityState::Idle,
            state_timer: 0,
            health: max_health,
            max_health,
            score_value: 0,
            combo_stage: 0,
            last_attack_tick: None,
            is_hit: false,
            speed_boost_ticks: 0,
            invincibility_ticks: 0,
            target_id: None,
        }
    }

    /// An enemy whose stat block is scaled additively by wave
    pub fn enemy(id: u32, archetype: Archetype, stats: &ArchetypeStats, wave: u32, pos: Vec2) -> Self {
        let wave_f = wave as f32;
        let health = stats.base_health + stats.health_per_wave * wave_f;
        Self {
            id,
            kind: EntityKind::Enemy(archetype),
            pos: Vec3::new(pos.x, pos.y, 0.0),
            vel: Vec3::ZERO,
            width: stats.width + stats.size_per_wave * wave_f,
            height: stats.height + stats.size_per_wave * wave_f,
            facing: Facing::Right,
            state: EntityState::Walk,
            state_timer: 0,
            health,
            max_health: health,
            score_value: stats.score_value + stats.score_per_wave * wave as u64,
            combo_stage: 0,
            last_attack_tick: None,
            is_hit: false,
            speed_boost_ticks: 0,
            invincibility_ticks: 0,
            target_id: None,
        }
    }

    #[inline]
    pub fn is_player(&self) -> bool {
        self.kind == EntityKind::Player
    }

    pub fn archetype(&self) -> Option<Archetype> {
        match self.kind {
            EntityKind::Enemy(a) => Some(a),
            EntityKind::Player => None,
        }
    }

    #[inline]
    pub fn is_grounded(&self) -> bool {
        self.pos.z <= 0.0
    }

    #[inline]
    pub fn is_alive(&self) -> bool {
        self.health > 0.0 && !self.state.is_down()
    }

    #[inline]
    pub fn is_invincible(&self) -> bool {
        self.invincibility_ticks > 0
    }

    #[inline]
    pub fn is_boosted(&self) -> bool {
        self.speed_boost_ticks > 0
    }

    /// Ground-plane position (x, depth)
    #[inline]
    pub fn ground_pos(&self) -> Vec2 {
        Vec2::new(self.pos.x, self.pos.y)
    }

    /// Enter a timed state
    pub fn set_timed_state(&mut self, state: EntityState, ticks: u32) {
        self.state = state;
        self.state_timer = ticks;
    }

    /// Count down the current timed state and apply its exit transition.
    ///
    /// Returns the state that just expired, if any. `PreAttack` expiry leaves
    /// the state untouched: the caller resolves the attack, which moves the
    /// entity into `Attack`.
    pub fn advance_state_timer(&mut self) -> Option<EntityState> {
        let timed = matches!(
            self.state,
            EntityState::PreAttack | EntityState::Attack | EntityState::Hurt | EntityState::Dying
        );
        if !timed {
            return None;
        }

        self.state_timer = self.state_timer.saturating_sub(1);
        if self.state_timer > 0 {
            return None;
        }

        let expired = self.state;
        match expired {
            EntityState::Attack => self.state = EntityState::Idle,
            EntityState::Hurt => {
                self.state = EntityState::Idle;
                self.is_hit = false;
            }
            EntityState::Dying => self.state = EntityState::Dead,
            _ => {}
        }
        Some(expired)
    }

    /// Subtract damage, clamping health to `[0, max_health]`
    pub fn take_damage(&mut self, amount: f32) {
        self.health = (self.health - amount.max(0.0)).clamp(0.0, self.max_health);
    }

    pub fn heal(&mut self, amount: f32) {
        self.health = (self.health + amount.max(0.0)).clamp(0.0, self.max_health);
    }
}

/// Pickup kinds dropped by defeated enemies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PickupKind {
    /// Restores health
    Tea,
    /// Score bonus
    Crumpet,
    Speed,
    Invincibility,
}

impl PickupKind {
    pub const ALL: [PickupKind; 4] = [
        PickupKind::Tea,
        PickupKind::Crumpet,
        PickupKind::Speed,
        PickupKind::Invincibility,
    ];
}

/// A pickup lying in the world
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Pickup {
    pub id: u32,
    pub kind: PickupKind,
    pub pos: Vec3,
    /// Ticks until it disappears
    pub life: u32,
}

/// Cosmetic particle (dust puff or floating text)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Particle {
    pub pos: Vec3,
    pub vel: Vec3,
    pub life: u32,
    pub color: u32,
    pub text: Option<String>,
}

/// Maximum particles
pub const MAX_PARTICLES: usize = 256;

/// Particle colors (0xRRGGBB)
pub mod colors {
    pub const DUST: u32 = 0xcfd8dc;
    pub const HIT: u32 = 0xffea00;
    pub const COMBO: u32 = 0x81d4fa;
    pub const BLOCK: u32 = 0xffffff;
    pub const HEALTH: u32 = 0x4caf50;
    pub const BONUS: u32 = 0xffeb3b;
    pub const SPEED: u32 = 0x00b0ff;
    pub const POWER: u32 = 0xffd700;
}

/// A flag pole capture point
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Objective {
    pub id: u32,
    /// Ground-plane base of the pole
    pub pos: Vec2,
    /// 0 = lowered, 100 = fully raised
    pub raise_level: f32,
    /// Player and enemies both inside the capture box this tick
    pub is_contested: bool,
}

impl Objective {
    pub fn new(id: u32, pos: Vec2) -> Self {
        Self {
            id,
            pos,
            raise_level: 0.0,
            is_contested: false,
        }
    }

    #[inline]
    pub fn is_fully_raised(&self) -> bool {
        self.raise_level >= 100.0
    }

    /// Independent X/Y box test, matching the hitbox convention
    #[inline]
    pub fn contains(&self, p: Vec2, range_x: f32, range_y: f32) -> bool {
        (p.x - self.pos.x).abs() < range_x && (p.y - self.pos.y).abs() < range_y
    }
}
