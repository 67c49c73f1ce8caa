//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (by entity ID)
//! - No rendering or platform dependencies

pub mod ai;
pub mod autopilot;
pub mod camera;
pub mod combat;
pub mod effects;
pub mod entity;
pub mod input;
pub mod objective;
pub mod physics;
pub mod spawner;
pub mod state;
pub mod tick;

pub use ai::{AiOutcome, choose_objective, think};
pub use autopilot::demo_input;
pub use camera::{camera_target, follow_camera};
pub use combat::{AttackReport, Hit, hit_test, perform_attack, roll_pickup_kind};
pub use entity::{
    Archetype, Entity, EntityKind, EntityState, Facing, MAX_PARTICLES, Objective, Particle, Pickup,
    PickupKind,
};
pub use input::{DigitalAxes, TickInput, normalize_direction, resolve_direction};
pub use physics::{apply_friction, apply_player_input, clamp_to_world, integrate, tick_status_timers};
pub use spawner::{build_enemy, enemy_cap, roll_archetype, spawn_interval};
pub use state::{GameEvent, GamePhase, GameState};
pub use tick::tick;
