//! Projectiles plugin: message-based producer → consumer spawning over fixed pools.
//!
//! # Data flow (one fixed tick)
//! ```text
//! ┌────────────────────────────────────────────────────────────────────────────┐
//! │  SimSet::Fire      producers (fire_weapons, player special)                │
//! │                    - write: SpawnProjectileRequest messages                │
//! │                                                                            │
//! │  SimSet::Allocate  consumer: allocate_projectiles_from_pool                │
//! │                    - pops ProjectilePools free list (per team)             │
//! │                    - issues a fresh EntityId for each activation           │
//! │                    - drops requests when the pool is empty                 │
//! │                                                                            │
//! │  SimSet::Project   advance_projectiles (lifespan, homing, integrate)       │
//! │                    world::cull_out_of_bounds                               │
//! │                                                                            │
//! │  SimSet::Collide   combat resolver marks hits PendingRemoval               │
//! │                                                                            │
//! │  SimSet::Cleanup   return_to_pool_commit                                   │
//! │                    - writes the Inactive invariants                        │
//! │                    - pushes the entity back on the free list               │
//! └────────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Producers never borrow `ResMut<ProjectilePools>`. The allocator is the single
//! writer that pops, the commit is the single writer that pushes. Pooled entities
//! are never despawned, so their component layout never changes.

pub mod allocator;
pub mod commit;
pub mod components;
pub mod flight;
pub mod messages;
pub mod pool;

use bevy::ecs::message::Messages;
use bevy::prelude::*;

use crate::common::state::in_game;
use crate::common::tunables::Tunables;
use crate::plugins::SimSet;

pub struct ProjectilesPlugin;

/// Messages are double-buffered; `update()` advances buffers once per tick.
fn update_spawn_messages(mut msgs: ResMut<Messages<messages::SpawnProjectileRequest>>) {
    msgs.update();
}

impl Plugin for ProjectilesPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<Tunables>();
        let pools = pool::ProjectilePools::from_tunables(&app.world().resource::<Tunables>().projectiles);

        app.insert_resource(pools)
            .add_systems(Startup, pool::init_projectile_pools);

        app.init_resource::<Messages<messages::SpawnProjectileRequest>>();

        app.add_systems(
            FixedUpdate,
            allocator::allocate_projectiles_from_pool
                .in_set(SimSet::Allocate)
                .run_if(in_game),
        )
        .add_systems(
            FixedUpdate,
            flight::advance_projectiles.in_set(SimSet::Project).run_if(in_game),
        )
        .add_systems(
            FixedUpdate,
            (commit::return_to_pool_commit, update_spawn_messages)
                .chain()
                .in_set(SimSet::Cleanup),
        );
    }
}

#[cfg(test)]
mod tests;
