use avian2d::prelude::*;
use bevy::prelude::*;

use crate::common::layers::Layer;
use crate::common::tunables::ProjectileTunables;
use crate::plugins::combat::hitbox::Hitbox;
use crate::plugins::registry::{AttackPower, EntityId, Kind, Lifecycle, SimId};

use super::components::{PooledProjectile, Projectile};
use super::messages::BulletKind;

/// Fixed-capacity free list of pre-spawned projectile entities.
#[derive(Debug)]
pub struct BulletPool {
    pub free: Vec<Entity>,
    pub capacity: usize,
}

impl BulletPool {
    pub fn new(capacity: usize) -> Self {
        Self {
            free: Vec::with_capacity(capacity),
            capacity,
        }
    }

    #[inline]
    pub fn pop_free(&mut self) -> Option<Entity> {
        self.free.pop()
    }

    #[inline]
    pub fn push_free(&mut self, e: Entity) {
        self.free.push(e);
    }

    #[inline]
    pub fn active_count(&self) -> usize {
        self.capacity - self.free.len()
    }
}

/// One pool per team; they never share entities.
#[derive(Resource, Debug)]
pub struct ProjectilePools {
    pub player: BulletPool,
    pub enemy: BulletPool,
}

impl ProjectilePools {
    pub fn new(player_capacity: usize, enemy_capacity: usize) -> Self {
        Self {
            player: BulletPool::new(player_capacity),
            enemy: BulletPool::new(enemy_capacity),
        }
    }

    pub fn from_tunables(t: &ProjectileTunables) -> Self {
        Self::new(t.player_pool, t.enemy_pool)
    }

    pub fn get(&self, kind: BulletKind) -> &BulletPool {
        match kind {
            BulletKind::Player => &self.player,
            BulletKind::Enemy => &self.enemy,
        }
    }

    pub fn get_mut(&mut self, kind: BulletKind) -> &mut BulletPool {
        match kind {
            BulletKind::Player => &mut self.player,
            BulletKind::Enemy => &mut self.enemy,
        }
    }
}

#[inline]
pub fn active_layers(kind: BulletKind) -> CollisionLayers {
    match kind {
        BulletKind::Player => CollisionLayers::new(Layer::PlayerBullet, [Layer::Enemy]),
        BulletKind::Enemy => CollisionLayers::new(Layer::EnemyBullet, [Layer::Player]),
    }
}

/// Inactive projectiles keep their membership but filter nothing, so they hit nothing.
#[inline]
pub fn inactive_layers(kind: BulletKind) -> CollisionLayers {
    let membership = match kind {
        BulletKind::Player => Layer::PlayerBullet,
        BulletKind::Enemy => Layer::EnemyBullet,
    };
    CollisionLayers::new(membership, [] as [Layer; 0])
}

/// Pre-spawn both pools (inactive). Slots carry `EntityId(0)` until first activation;
/// the registry never issues 0.
pub fn init_projectile_pools(mut commands: Commands, mut pools: ResMut<ProjectilePools>) {
    for kind in [BulletKind::Player, BulletKind::Enemy] {
        let pool = pools.get_mut(kind);
        pool.free.clear();
        let cap = pool.capacity;
        pool.free.reserve(cap);

        for _ in 0..cap {
            let e = commands
                .spawn((
                    Name::new(format!("{kind:?}Projectile(Pooled)")),
                    PooledProjectile(kind),
                    Kind::Projectile,
                    kind.team(),
                    Lifecycle::Inactive,
                    SimId(EntityId(0)),
                    Projectile::default(),
                    AttackPower(0),
                    Hitbox::circle(0.0),
                    Transform::from_xyz(0.0, 0.0, 2.0),
                    LinearVelocity::ZERO,
                    inactive_layers(kind),
                ))
                .id();

            pool.push_free(e);
        }
    }
}
