//! Firing-pattern descriptors.
//!
//! Angles are in degrees in playfield space: 0 points along +x and 90 points
//! down the screen (+y).

use serde::{Deserialize, Serialize};

pub const DOWN: f32 = 90.0;
pub const UP: f32 = -90.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PatternKind {
    /// Parallel lanes along one heading.
    Straight,
    /// Fan centred on the base angle.
    Spread,
    /// Evenly spaced ring.
    Circle,
    /// Fan starting at the emitter's phase angle, which then rotates.
    Spiral,
    /// Fan centred on the bearing to the target.
    Aimed,
    /// Dense ring, used by the charged special.
    Barrage,
    /// Random headings from a jittered origin.
    Scatter,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TargetingMode {
    #[default]
    Fixed,
    /// Base angle becomes the bearing to the nearest opponent.
    Aimed,
    /// Shots lock onto the nearest opponent and steer in flight.
    Homing,
}

fn default_start_angle() -> f32 {
    DOWN
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FiringPatternDescriptor {
    pub kind: PatternKind,
    pub bullet_count: u32,
    #[serde(default)]
    pub angle_step: f32,
    #[serde(default = "default_start_angle")]
    pub start_angle: f32,
    /// Spiral only: how far the phase angle advances per volley.
    #[serde(default)]
    pub rotation_step: f32,
    /// Lane gap for `Straight`; origin jitter radius for `Scatter`.
    #[serde(default)]
    pub spacing: f32,
    #[serde(default)]
    pub targeting: TargetingMode,
}

impl FiringPatternDescriptor {
    fn base(kind: PatternKind, bullet_count: u32) -> Self {
        Self {
            kind,
            bullet_count,
            angle_step: 0.0,
            start_angle: DOWN,
            rotation_step: 0.0,
            spacing: 0.0,
            targeting: TargetingMode::Fixed,
        }
    }

    pub fn straight(count: u32, spacing: f32, angle: f32) -> Self {
        Self { spacing, start_angle: angle, ..Self::base(PatternKind::Straight, count) }
    }

    pub fn spread(count: u32, step: f32, base_angle: f32) -> Self {
        Self { angle_step: step, start_angle: base_angle, ..Self::base(PatternKind::Spread, count) }
    }

    pub fn circle(count: u32) -> Self {
        Self::base(PatternKind::Circle, count)
    }

    pub fn spiral(count: u32, step: f32, rotation: f32) -> Self {
        Self { angle_step: step, rotation_step: rotation, ..Self::base(PatternKind::Spiral, count) }
    }

    pub fn aimed(count: u32, step: f32) -> Self {
        Self { angle_step: step, targeting: TargetingMode::Aimed, ..Self::base(PatternKind::Aimed, count) }
    }

    pub fn barrage(count: u32) -> Self {
        Self::base(PatternKind::Barrage, count)
    }

    pub fn scatter(count: u32, jitter: f32) -> Self {
        Self { spacing: jitter, ..Self::base(PatternKind::Scatter, count) }
    }

    pub fn homing(mut self) -> Self {
        self.targeting = TargetingMode::Homing;
        self
    }
}

/// A volley: every descriptor fires together. Composite patterns are concatenations.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FiringPattern(pub Vec<FiringPatternDescriptor>);

impl FiringPattern {
    pub fn single(descriptor: FiringPatternDescriptor) -> Self {
        Self(vec![descriptor])
    }

    pub fn with(mut self, descriptor: FiringPatternDescriptor) -> Self {
        self.0.push(descriptor);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.0.iter().all(|d| d.bullet_count == 0)
    }

    pub fn descriptors(&self) -> &[FiringPatternDescriptor] {
        &self.0
    }
}
