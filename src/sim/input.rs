//! Per-tick input commands
//!
//! Direction comes in continuously from an analog stick or digital keys;
//! attack and jump are edge-triggered and cleared by the loop driver after
//! every simulation step.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::clamp_to_unit;

/// Analog deflection below this is treated as released
pub const ANALOG_DEADZONE: f32 = 0.1;

/// Input commands for a single tick
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TickInput {
    /// Movement direction, magnitude <= 1 (x = lateral, y = depth)
    pub direction: Vec2,
    /// Attack pressed since the last step
    pub attack: bool,
    /// Jump pressed since the last step
    pub jump: bool,
}

impl TickInput {
    pub fn with_direction(direction: Vec2) -> Self {
        Self {
            direction: normalize_direction(direction),
            ..Default::default()
        }
    }

    /// Clear one-shot triggers after a step consumed them
    pub fn clear_triggers(&mut self) {
        self.attack = false;
        self.jump = false;
    }

    #[inline]
    pub fn has_movement(&self) -> bool {
        self.direction.x.abs() > 0.01 || self.direction.y.abs() > 0.01
    }
}

/// Clamp a direction so diagonal speed never exceeds single-axis speed
#[inline]
pub fn normalize_direction(v: Vec2) -> Vec2 {
    clamp_to_unit(v)
}

/// Four independent digital keys
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DigitalAxes {
    pub left: bool,
    pub right: bool,
    pub up: bool,
    pub down: bool,
}

impl DigitalAxes {
    /// Combine keys into a unit-bounded direction (up = toward the horizon)
    pub fn to_vector(self) -> Vec2 {
        let mut v = Vec2::ZERO;
        if self.left {
            v.x -= 1.0;
        }
        if self.right {
            v.x += 1.0;
        }
        if self.up {
            v.y -= 1.0;
        }
        if self.down {
            v.y += 1.0;
        }
        normalize_direction(v)
    }
}

/// Analog stick wins when deflected past the deadzone, otherwise keys
pub fn resolve_direction(analog: Vec2, keys: DigitalAxes) -> Vec2 {
    if analog.x.abs() > ANALOG_DEADZONE || analog.y.abs() > ANALOG_DEADZONE {
        normalize_direction(analog)
    } else {
        keys.to_vector()
    }
}
