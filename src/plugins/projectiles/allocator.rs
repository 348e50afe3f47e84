//! Spawn consumer: activate projectiles from the pools.
//!
//! An empty free list is a capacity decision: the request is dropped and the tick
//! goes on. A free-list entry that fails the slot query means the pool was
//! corrupted; it is logged and discarded rather than reused.

use avian2d::prelude::*;
use bevy::ecs::message::MessageReader;
use bevy::prelude::*;

use crate::common::tunables::Tunables;
use crate::plugins::combat::hitbox::Hitbox;
use crate::plugins::registry::{AttackPower, EntityId, EntityRegistry, Lifecycle, SimId};

use super::components::{PooledProjectile, Projectile};
use super::messages::SpawnProjectileRequest;
use super::pool::{active_layers, ProjectilePools};

/// Everything the allocator rewrites on a pooled slot.
pub type SlotData = (
    &'static mut Lifecycle,
    &'static mut SimId,
    &'static mut Projectile,
    &'static mut AttackPower,
    &'static mut Hitbox,
    &'static mut Transform,
    &'static mut LinearVelocity,
    &'static mut CollisionLayers,
);

/// Activate one pooled slot for `req`. `None` when that team's pool is exhausted.
pub fn allocate_one(
    pools: &mut ProjectilePools,
    registry: &mut EntityRegistry,
    lifespan: f32,
    q: &mut Query<SlotData, With<PooledProjectile>>,
    req: &SpawnProjectileRequest,
) -> Option<EntityId> {
    let e = pools.get_mut(req.kind).pop_free()?;

    let Ok((mut life, mut sim_id, mut projectile, mut attack, mut hitbox, mut tf, mut vel, mut layers)) = q.get_mut(e)
    else {
        error!("projectile pool held {e:?} without slot components; discarding it");
        return None;
    };

    *life = Lifecycle::Active;
    projectile.reset_for_fire(req.owner, req.penetrating, lifespan, req.homing);
    attack.0 = req.damage;
    *hitbox = req.hitbox;
    tf.translation = req.pos.extend(2.0);
    vel.0 = req.vel;
    *layers = active_layers(req.kind);

    let id = registry.issue(e);
    *sim_id = SimId(id);
    Some(id)
}

pub fn allocate_projectiles_from_pool(
    tunables: Res<Tunables>,
    mut pools: ResMut<ProjectilePools>,
    mut registry: ResMut<EntityRegistry>,
    mut reader: MessageReader<SpawnProjectileRequest>,
    mut q: Query<SlotData, With<PooledProjectile>>,
) {
    let lifespan = tunables.projectiles.lifespan_secs;
    let mut dropped = 0usize;

    for req in reader.read() {
        if allocate_one(&mut pools, &mut registry, lifespan, &mut q, req).is_none() {
            dropped += 1;
        }
    }

    if dropped > 0 {
        debug!(dropped, "projectile pool exhausted; spawn requests dropped");
    }
}
