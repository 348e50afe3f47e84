//! Return commit: recycle projectiles back into their pool.
//!
//! This system owns the *Inactive invariants*. An inactive projectile has:
//! - velocity = 0
//! - collision filters empty
//! - no id in the registry
//!
//! Centralizing these writes here prevents inconsistencies.

use avian2d::prelude::*;
use bevy::prelude::*;

use crate::plugins::registry::{EntityRegistry, Lifecycle, SimId};

use super::components::{PooledProjectile, Projectile};
use super::pool::{inactive_layers, ProjectilePools};

pub fn return_to_pool_commit(
    mut pools: ResMut<ProjectilePools>,
    mut registry: ResMut<EntityRegistry>,
    mut q: Query<(
        Entity,
        &PooledProjectile,
        &SimId,
        &mut Lifecycle,
        &mut Projectile,
        &mut LinearVelocity,
        &mut CollisionLayers,
    )>,
) {
    for (e, pooled, id, mut life, mut projectile, mut vel, mut layers) in &mut q {
        if *life != Lifecycle::PendingRemoval {
            continue;
        }

        *life = Lifecycle::Inactive;
        vel.0 = Vec2::ZERO;
        *layers = inactive_layers(pooled.0);
        projectile.already_hit.clear();
        projectile.homing = None;
        registry.forget(id.0);

        pools.get_mut(pooled.0).push_free(e);
    }
}
