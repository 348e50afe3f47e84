use bevy::prelude::*;

use crate::plugins::registry::EntityId;

use super::messages::{BulletKind, HomingLock};

/// Marker: this entity belongs to a projectile pool and is recycled, never despawned.
#[derive(Component, Debug, Clone, Copy)]
pub struct PooledProjectile(pub BulletKind);

#[derive(Component, Debug, Clone, Default)]
pub struct Projectile {
    pub owner: Option<EntityId>,
    pub penetrating: bool,
    /// Seconds left before the projectile expires.
    pub lifespan: f32,
    /// Targets a penetrating projectile already damaged; each is hit at most once.
    pub already_hit: Vec<EntityId>,
    pub homing: Option<HomingLock>,
}

impl Projectile {
    #[inline]
    pub fn reset_for_fire(&mut self, owner: Option<EntityId>, penetrating: bool, lifespan: f32, homing: Option<HomingLock>) {
        self.owner = owner;
        self.penetrating = penetrating;
        self.lifespan = lifespan;
        self.already_hit.clear();
        self.homing = homing;
    }

    #[inline]
    pub fn has_hit(&self, target: EntityId) -> bool {
        self.already_hit.contains(&target)
    }
}
