//! Buffered spawn requests.
//!
//! Emitters never touch the pools. They write `SpawnProjectileRequest` messages and
//! the allocator is the single writer that pops free entities. This keeps pool
//! mutation in one place and lets any number of producers run before it.

use bevy::prelude::*;

use crate::common::tunables::ProjectileProfile;
use crate::plugins::combat::hitbox::Hitbox;
use crate::plugins::firing::ProjectileSpec;
use crate::plugins::registry::{EntityId, Team};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BulletKind {
    Player,
    Enemy,
}

impl BulletKind {
    pub fn for_team(team: Team) -> Option<Self> {
        match team {
            Team::Player => Some(Self::Player),
            Team::Enemy => Some(Self::Enemy),
            Team::Neutral => None,
        }
    }

    pub fn team(self) -> Team {
        match self {
            Self::Player => Team::Player,
            Self::Enemy => Team::Enemy,
        }
    }
}

/// A homing projectile's target, fixed at fire time.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HomingLock {
    pub target: EntityId,
    /// Max heading change per tick, radians.
    pub tracking_rate: f32,
}

#[derive(Message, Clone, Copy, Debug)]
pub struct SpawnProjectileRequest {
    pub kind: BulletKind,
    pub pos: Vec2,
    pub vel: Vec2,
    pub damage: i32,
    pub owner: Option<EntityId>,
    pub penetrating: bool,
    pub hitbox: Hitbox,
    pub homing: Option<HomingLock>,
}

impl SpawnProjectileRequest {
    pub fn from_shot(
        kind: BulletKind,
        owner: Option<EntityId>,
        shot: &ProjectileSpec,
        profile: &ProjectileProfile,
        lock: Option<EntityId>,
    ) -> Self {
        let homing = match (shot.homing, lock) {
            (true, Some(target)) => Some(HomingLock { target, tracking_rate: profile.tracking_rate }),
            _ => None,
        };
        Self {
            kind,
            pos: shot.origin,
            vel: shot.direction * profile.speed,
            damage: profile.damage,
            owner,
            penetrating: profile.penetrating,
            hitbox: profile.hitbox,
            homing,
        }
    }
}
