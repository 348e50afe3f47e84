//! Movement descriptors.
//!
//! A pattern is immutable data. Everything that changes tick to tick lives in
//! `MovementState`, owned by the entity, so one pattern value can drive any number
//! of entities (and a boss can swap patterns without losing its phase).

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MovementPattern {
    Stationary,
    /// Constant heading at the entity's speed.
    Straight { direction: [f32; 2] },
    /// Fall at speed while x swings around the spawn column.
    Sine { amplitude: f32, period: f32 },
    /// Lateral direction flips every `interval` seconds and at the side walls.
    Zigzag { interval: f32, forward_factor: f32 },
    /// Ellipse around the anchor.
    Circle { radius: f32, vertical_radius: f32, angular_speed: f32 },
    /// Side-to-side sway around the anchor at a fixed height.
    Hover { distance: f32, angular_speed: f32 },
    /// Constant-speed sweep between `anchor.x ± amplitude`.
    Strafe { amplitude: f32, angular_speed: f32 },
    /// Track the target's x with capped lateral speed while advancing.
    Follow { lateral_factor: f32, forward_factor: f32 },
    /// Rush straight at the target.
    Charge { speed_factor: f32 },
}

impl MovementPattern {
    pub fn straight_down() -> Self {
        Self::Straight { direction: [0.0, 1.0] }
    }
}

/// Per-entity progress through a pattern.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MovementState {
    pub timer: f32,
    pub phase: f32,
    pub direction: f32,
    pub anchor: Vec2,
}

impl MovementState {
    pub fn at(anchor: Vec2) -> Self {
        Self { timer: 0.0, phase: 0.0, direction: 1.0, anchor }
    }
}
