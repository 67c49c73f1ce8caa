//! Banner Brawl - a side-scrolling arcade brawler
//!
//! Core modules:
//! - `sim`: Seeded simulation (movement, combat, enemy AI, capture points)
//! - `session`: Fixed-timestep loop driver that owns the game state
//! - `tuning`: Data-driven game balance

pub mod session;
pub mod sim;
pub mod tuning;

pub use session::{HudNotification, HudSink, Presenter, Session};
pub use tuning::{Tuning, TuningError};

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep in seconds (60 Hz; all velocities are per tick)
    pub const SIM_DT: f64 = 1.0 / 60.0;
    /// Accumulator cap in seconds to prevent spiral of death
    pub const MAX_ACCUMULATOR: f64 = 0.2;

    /// Display surface and world dimensions
    pub const VIEWPORT_WIDTH: f32 = 600.0;
    pub const WORLD_WIDTH: f32 = 2400.0;
    /// Depth band walkable by characters
    pub const GROUND_Y_HORIZON: f32 = 480.0;
    pub const GROUND_Y_MAX: f32 = 730.0;

    /// Movement
    pub const GRAVITY: f32 = 0.65;
    pub const FRICTION: f32 = 0.65; // Snappy stops (lower = more friction)
    pub const AIR_FRICTION: f32 = 0.9;
    pub const ACCELERATION: f32 = 1.0;
    pub const AIR_CONTROL: f32 = 0.3;
    pub const WALK_SPEED: f32 = 4.2;
    pub const WALK_SPEED_Y: f32 = 2.8;
    pub const JUMP_FORCE: f32 = 15.0;
    pub const VELOCITY_EPSILON: f32 = 0.1;
    pub const SPEED_MULTIPLIER: f32 = 1.6;

    /// Player body
    pub const HERO_WIDTH: f32 = 60.0;
    pub const HERO_HEIGHT: f32 = 90.0;
    pub const HERO_MAX_HEALTH: f32 = 100.0;

    /// Combat timing (ticks)
    pub const ATTACK_DURATION: u32 = 15;
    pub const HURT_DURATION: u32 = 20;
    pub const DEATH_DURATION: u32 = 30;
    pub const COMBO_WINDOW: u64 = 30;

    /// Hitbox reach
    pub const HIT_BOX_RANGE_X: f32 = 80.0;
    pub const HIT_BOX_RANGE_Y: f32 = 30.0;
    pub const HIT_BOX_RANGE_Z: f32 = 20.0;

    /// Power-up durations (ticks)
    pub const SPEED_BOOST_DURATION: u32 = 600; // ~10 seconds
    pub const INVINCIBILITY_DURATION: u32 = 400; // ~6.5 seconds

    /// Base ticks between spawns at wave 1
    pub const SPAWN_RATE: u64 = 350;
}

/// Scale `v` down to unit length if it is longer; zero for non-finite input
#[inline]
pub fn clamp_to_unit(v: Vec2) -> Vec2 {
    if !v.is_finite() {
        return Vec2::ZERO;
    }
    let len = v.length();
    if len > 1.0 { v / len } else { v }
}

/// Snap tiny magnitudes to exactly zero
#[inline]
pub fn snap_to_zero(v: f32, epsilon: f32) -> f32 {
    if v.abs() < epsilon { 0.0 } else { v }
}
