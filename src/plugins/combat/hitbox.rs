//! Overlap tests for the two hitbox shapes.
//!
//! Touching counts as overlapping.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Component, Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "shape", rename_all = "snake_case")]
pub enum Hitbox {
    Circle { radius: f32 },
    Aabb { half_width: f32, half_height: f32 },
}

impl Hitbox {
    pub const fn circle(radius: f32) -> Self {
        Self::Circle { radius }
    }

    pub const fn aabb(half_width: f32, half_height: f32) -> Self {
        Self::Aabb { half_width, half_height }
    }

    /// Half-size of the bounding box.
    pub fn half_extents(self) -> Vec2 {
        match self {
            Hitbox::Circle { radius } => Vec2::splat(radius),
            Hitbox::Aabb { half_width, half_height } => Vec2::new(half_width, half_height),
        }
    }

    pub fn overlaps(self, at: Vec2, other: Hitbox, other_at: Vec2) -> bool {
        match (self, other) {
            (Hitbox::Circle { radius: a }, Hitbox::Circle { radius: b }) => {
                at.distance_squared(other_at) <= (a + b) * (a + b)
            }
            (Hitbox::Aabb { half_width: aw, half_height: ah }, Hitbox::Aabb { half_width: bw, half_height: bh }) => {
                let d = (at - other_at).abs();
                d.x <= aw + bw && d.y <= ah + bh
            }
            (Hitbox::Circle { radius }, Hitbox::Aabb { half_width, half_height }) => {
                circle_vs_aabb(at, radius, other_at, Vec2::new(half_width, half_height))
            }
            (Hitbox::Aabb { half_width, half_height }, Hitbox::Circle { radius }) => {
                circle_vs_aabb(other_at, radius, at, Vec2::new(half_width, half_height))
            }
        }
    }
}

#[inline]
fn circle_vs_aabb(centre: Vec2, radius: f32, box_centre: Vec2, half: Vec2) -> bool {
    let closest = centre.clamp(box_centre - half, box_centre + half);
    centre.distance_squared(closest) <= radius * radius
}
