//! Entity registry: stable ids, shared gameplay components, and the removal sweep.
//!
//! Bevy `Entity` handles are recycled; hosts and events need ids that never repeat.
//! Every simulated thing carries a `SimId` issued here from a monotonic counter, and
//! iteration that must be deterministic sorts by it (spawn order).
//!
//! Removal is two-step. Rules only flip `Lifecycle` to `PendingRemoval`; the sweep at
//! the end of the tick despawns (or, for pooled projectiles, the pool commit recycles).
//! Until then the entity stays queryable, so snapshots taken between ticks never see
//! half-removed state.

use bevy::platform::collections::{HashMap, HashSet};
use bevy::prelude::*;
use bevy::ecs::world::EntityRef;
use serde::{Deserialize, Serialize};

use crate::plugins::SimSet;
use crate::plugins::projectiles::components::PooledProjectile;

// -----------------------------------------------------------------------------
// Ids
// -----------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EntityId(pub u64);

/// Stable id of a simulated entity. Overwritten when a pooled projectile is reused.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
pub struct SimId(pub EntityId);

#[derive(Resource, Debug, Default)]
pub struct EntityRegistry {
    next: u64,
    index: HashMap<EntityId, Entity>,
}

impl EntityRegistry {
    /// Issue a fresh id for `entity`. Ids start at 1 and are never reused.
    pub fn issue(&mut self, entity: Entity) -> EntityId {
        self.next += 1;
        let id = EntityId(self.next);
        self.index.insert(id, entity);
        id
    }

    #[inline]
    pub fn resolve(&self, id: EntityId) -> Option<Entity> {
        self.index.get(&id).copied()
    }

    #[inline]
    pub fn forget(&mut self, id: EntityId) -> Option<Entity> {
        self.index.remove(&id)
    }
}

// -----------------------------------------------------------------------------
// Shared components
// -----------------------------------------------------------------------------

#[derive(Component, Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Kind {
    Player,
    Enemy,
    Projectile,
    Pickup,
}

#[derive(Component, Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Team {
    Player,
    Enemy,
    Neutral,
}

impl Team {
    pub fn opponent(self) -> Option<Kind> {
        match self {
            Team::Player => Some(Kind::Enemy),
            Team::Enemy => Some(Kind::Player),
            Team::Neutral => None,
        }
    }
}

#[derive(Component, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Lifecycle {
    #[default]
    Inactive,
    Active,
    PendingRemoval,
}

impl Lifecycle {
    #[inline]
    pub fn is_active(self) -> bool {
        self == Lifecycle::Active
    }
}

/// Clamped hit points. `current` never leaves `0..=max`.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
pub struct Health {
    current: i32,
    max: i32,
}

impl Health {
    pub fn full(max: i32) -> Self {
        let max = max.max(1);
        Self { current: max, max }
    }

    pub fn new(current: i32, max: i32) -> Self {
        let max = max.max(1);
        Self { current: current.clamp(0, max), max }
    }

    #[inline]
    pub fn current(&self) -> i32 {
        self.current
    }

    #[inline]
    pub fn max(&self) -> i32 {
        self.max
    }

    #[inline]
    pub fn fraction(&self) -> f32 {
        self.current as f32 / self.max as f32
    }

    #[inline]
    pub fn is_depleted(&self) -> bool {
        self.current == 0
    }

    /// Apply damage. Returns true only on the hit that takes health to zero.
    pub fn apply_damage(&mut self, amount: i32) -> bool {
        if self.current == 0 {
            return false;
        }
        self.current = (self.current - amount.max(0)).clamp(0, self.max);
        self.current == 0
    }

    pub fn heal(&mut self, amount: i32) {
        self.current = (self.current + amount.max(0)).clamp(0, self.max);
    }
}

/// Damage dealt on hit (projectiles) or carried into spawned projectiles (emitters).
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
pub struct AttackPower(pub i32);

#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct Speed(pub f32);

#[derive(Component, Debug, Clone, Default)]
pub struct Tags(pub HashSet<String>);

impl Tags {
    pub fn from_slice(tags: &[&str]) -> Self {
        Self(tags.iter().map(|t| (*t).to_string()).collect())
    }
}

// -----------------------------------------------------------------------------
// Spawn / despawn / iteration
// -----------------------------------------------------------------------------

/// Spawn a non-pooled entity and register it. Returns the new id.
pub fn spawn_tracked(commands: &mut Commands, registry: &mut EntityRegistry, bundle: impl Bundle) -> EntityId {
    let entity = commands.spawn(bundle).id();
    let id = registry.issue(entity);
    commands.entity(entity).insert((SimId(id), Lifecycle::Active));
    id
}

/// World-side twin of [`spawn_tracked`] for hosts outside a system.
pub fn spawn_tracked_in_world(world: &mut World, bundle: impl Bundle) -> EntityId {
    let entity = world.spawn(bundle).id();
    let id = world.resource_mut::<EntityRegistry>().issue(entity);
    world.entity_mut(entity).insert((SimId(id), Lifecycle::Active));
    id
}

/// Mark an entity for removal at the end of the tick. Unknown ids are ignored.
pub fn mark_for_removal(world: &mut World, id: EntityId) -> bool {
    let Some(entity) = world.resource::<EntityRegistry>().resolve(id) else {
        return false;
    };
    let Some(mut life) = world.get_mut::<Lifecycle>(entity) else {
        return false;
    };
    if *life == Lifecycle::Active {
        *life = Lifecycle::PendingRemoval;
    }
    true
}

/// Active entities of `kind`, oldest first.
pub fn active_in_order(world: &mut World, kind: Kind) -> Vec<(EntityId, Entity)> {
    let mut q = world.query::<(Entity, &SimId, &Kind, &Lifecycle)>();
    let mut out: Vec<(EntityId, Entity)> = q
        .iter(world)
        .filter(|(_, _, k, life)| **k == kind && life.is_active())
        .map(|(e, id, _, _)| (id.0, e))
        .collect();
    out.sort_by_key(|(id, _)| *id);
    out
}

/// Visit every active entity of `kind`, oldest first.
pub fn for_each_active(world: &mut World, kind: Kind, mut f: impl FnMut(EntityId, EntityRef<'_>)) {
    for (id, entity) in active_in_order(world, kind) {
        if let Ok(entity_ref) = world.get_entity(entity) {
            f(id, entity_ref);
        }
    }
}

/// Despawn every non-pooled entity marked `PendingRemoval` and drop its id.
pub fn despawn_removed(
    mut commands: Commands,
    mut registry: ResMut<EntityRegistry>,
    q: Query<(Entity, &SimId, &Lifecycle), Without<PooledProjectile>>,
) {
    for (e, id, life) in &q {
        if *life != Lifecycle::PendingRemoval {
            continue;
        }
        registry.forget(id.0);
        commands.entity(e).despawn();
    }
}

pub fn plugin(app: &mut App) {
    app.init_resource::<EntityRegistry>();
    app.add_systems(FixedUpdate, despawn_removed.in_set(SimSet::Cleanup));
}
