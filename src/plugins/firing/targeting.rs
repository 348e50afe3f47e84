//! Target selection and fire gating.
//!
//! Candidate lists are kept sorted by id, and `nearest` only replaces the current
//! best on a strictly smaller distance, so ties go to the older entity.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::plugins::registry::{EntityId, Kind, Team};

/// Nearest candidate to `origin`. `candidates` must be in insertion order.
pub fn nearest(origin: Vec2, candidates: &[(EntityId, Vec2)]) -> Option<(EntityId, Vec2)> {
    let mut best: Option<(EntityId, Vec2, f32)> = None;
    for &(id, pos) in candidates {
        let d = origin.distance_squared(pos);
        match best {
            Some((_, _, best_d)) if d >= best_d => {}
            _ => best = Some((id, pos, d)),
        }
    }
    best.map(|(id, pos, _)| (id, pos))
}

/// Active players and enemies, gathered once per system run.
#[derive(Debug, Default)]
pub struct Candidates {
    pub players: Vec<(EntityId, Vec2)>,
    pub enemies: Vec<(EntityId, Vec2)>,
}

impl Candidates {
    pub fn collect(items: impl IntoIterator<Item = (EntityId, Kind, Vec2)>) -> Self {
        let mut out = Self::default();
        for (id, kind, pos) in items {
            match kind {
                Kind::Player => out.players.push((id, pos)),
                Kind::Enemy => out.enemies.push((id, pos)),
                Kind::Projectile | Kind::Pickup => {}
            }
        }
        out.players.sort_by_key(|(id, _)| *id);
        out.enemies.sort_by_key(|(id, _)| *id);
        out
    }

    pub fn opponents_of(&self, team: Team) -> &[(EntityId, Vec2)] {
        match team.opponent() {
            Some(Kind::Player) => &self.players,
            Some(Kind::Enemy) => &self.enemies,
            _ => &[],
        }
    }

    pub fn nearest_opponent(&self, team: Team, origin: Vec2) -> Option<(EntityId, Vec2)> {
        nearest(origin, self.opponents_of(team))
    }

    /// Any opponent in front of `origin` and within `half_width` of its column.
    /// Player fire travels up the screen, enemy fire down.
    pub fn opponent_ahead(&self, team: Team, origin: Vec2, half_width: f32) -> bool {
        let forward = if team == Team::Player { -1.0 } else { 1.0 };
        self.opponents_of(team)
            .iter()
            .any(|(_, p)| (p.x - origin.x).abs() <= half_width && (p.y - origin.y) * forward > 0.0)
    }
}

/// When an emitter is allowed to fire.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FireGate {
    #[default]
    Always,
    /// Hold fire until an opponent is ahead in the emitter's lane.
    LaneAhead { half_width: f32 },
}

impl FireGate {
    pub fn is_open(self, candidates: &Candidates, team: Team, origin: Vec2) -> bool {
        match self {
            Self::Always => true,
            Self::LaneAhead { half_width } => candidates.opponent_ahead(team, origin, half_width),
        }
    }
}
