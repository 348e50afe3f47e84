//! Projectile pool tests.
//!
//! These drive the allocator and commit systems directly with injected spawn
//! requests; no schedule is built.

use approx::assert_relative_eq;
use avian2d::prelude::*;
use bevy::ecs::message::Messages;
use bevy::prelude::*;

use super::components::{PooledProjectile, Projectile};
use super::messages::{BulletKind, HomingLock, SpawnProjectileRequest};
use super::{allocator, commit, flight, pool};
use crate::common::layers::Layer;
use crate::common::test_utils::{run_system_once, sim_world};
use crate::plugins::combat::hitbox::Hitbox;
use crate::plugins::registry::{spawn_tracked_in_world, EntityId, EntityRegistry, Kind, Lifecycle, SimId};

fn world_with_pools(player: usize, enemy: usize) -> World {
    let mut world = sim_world(1.0 / 60.0);
    world.insert_resource(pool::ProjectilePools::new(player, enemy));
    run_system_once(&mut world, pool::init_projectile_pools);
    world
}

fn request(kind: BulletKind, pos: Vec2, vel: Vec2) -> SpawnProjectileRequest {
    SpawnProjectileRequest {
        kind,
        pos,
        vel,
        damage: 1,
        owner: None,
        penetrating: false,
        hitbox: Hitbox::circle(5.0),
        homing: None,
    }
}

fn write(world: &mut World, req: SpawnProjectileRequest) {
    world.resource_mut::<Messages<SpawnProjectileRequest>>().write(req);
}

fn active_ids(world: &mut World) -> Vec<EntityId> {
    let mut q = world.query_filtered::<(&SimId, &Lifecycle), With<PooledProjectile>>();
    let mut ids: Vec<EntityId> = q.iter(world).filter(|(_, l)| l.is_active()).map(|(id, _)| id.0).collect();
    ids.sort();
    ids
}

#[test]
fn pools_prespawn_inactive_slots() {
    let mut world = world_with_pools(4, 6);
    let pools = world.resource::<pool::ProjectilePools>();
    assert_eq!(pools.player.free.len(), 4);
    assert_eq!(pools.enemy.free.len(), 6);
    assert_eq!(pools.enemy.active_count(), 0);

    let mut q = world.query::<(&PooledProjectile, &Lifecycle, &CollisionLayers)>();
    for (_, life, layers) in q.iter(&world) {
        assert_eq!(*life, Lifecycle::Inactive);
        assert_eq!(layers.filters, LayerMask::NONE);
    }
}

#[test]
fn exhausted_pool_drops_requests_without_failing() {
    let mut world = world_with_pools(3, 1);
    for i in 0..5 {
        write(&mut world, request(BulletKind::Player, Vec2::new(i as f32, 0.0), Vec2::NEG_Y));
    }
    run_system_once(&mut world, allocator::allocate_projectiles_from_pool);

    let ids = active_ids(&mut world);
    assert_eq!(ids.len(), 3);
    assert_eq!(world.resource::<pool::ProjectilePools>().player.free.len(), 0);
    // Enemy pool untouched.
    assert_eq!(world.resource::<pool::ProjectilePools>().enemy.free.len(), 1);
}

#[test]
fn activation_sets_team_layers_and_fresh_ids() {
    let mut world = world_with_pools(2, 2);
    write(&mut world, request(BulletKind::Enemy, Vec2::new(10.0, 20.0), Vec2::new(0.0, 300.0)));
    run_system_once(&mut world, allocator::allocate_projectiles_from_pool);

    let mut q = world.query::<(&SimId, &Lifecycle, &CollisionLayers, &Transform, &LinearVelocity, &PooledProjectile)>();
    let (id, _, layers, tf, vel, _) = q.iter(&world).find(|(_, l, ..)| l.is_active()).unwrap();
    assert_ne!(id.0, EntityId(0));
    assert!(layers.memberships.has_all(Layer::EnemyBullet));
    assert!(layers.filters.has_all(Layer::Player));
    assert!(!layers.filters.has_all(Layer::Enemy));
    assert_eq!(tf.translation.truncate(), Vec2::new(10.0, 20.0));
    assert_eq!(vel.0, Vec2::new(0.0, 300.0));
}

#[test]
fn commit_recycles_and_reuse_gets_a_new_id() {
    let mut world = world_with_pools(1, 1);
    write(&mut world, request(BulletKind::Player, Vec2::ZERO, Vec2::NEG_Y));
    run_system_once(&mut world, allocator::allocate_projectiles_from_pool);
    let first = active_ids(&mut world)[0];

    let e = world.resource::<EntityRegistry>().resolve(first).unwrap();
    *world.get_mut::<Lifecycle>(e).unwrap() = Lifecycle::PendingRemoval;
    run_system_once(&mut world, commit::return_to_pool_commit);

    assert_eq!(world.get::<Lifecycle>(e), Some(&Lifecycle::Inactive));
    assert_eq!(world.get::<LinearVelocity>(e).unwrap().0, Vec2::ZERO);
    assert!(world.resource::<EntityRegistry>().resolve(first).is_none());
    assert_eq!(world.resource::<pool::ProjectilePools>().player.free, vec![e]);

    world.resource_mut::<Messages<SpawnProjectileRequest>>().clear();
    write(&mut world, request(BulletKind::Player, Vec2::ZERO, Vec2::NEG_Y));
    run_system_once(&mut world, allocator::allocate_projectiles_from_pool);
    let second = active_ids(&mut world)[0];
    assert!(second > first);
    assert_eq!(world.resource::<EntityRegistry>().resolve(second), Some(e));
}

#[test]
fn lifespan_expiry_marks_for_return() {
    let mut world = world_with_pools(1, 1);
    write(&mut world, request(BulletKind::Player, Vec2::ZERO, Vec2::new(60.0, 0.0)));
    run_system_once(&mut world, allocator::allocate_projectiles_from_pool);
    assert!(world.resource::<pool::ProjectilePools>().player.free.is_empty());

    run_system_once(&mut world, flight::advance_projectiles);
    let mut q = world.query::<(&Transform, &Lifecycle, &PooledProjectile)>();
    let (tf, life, _) = q.iter(&world).find(|(_, _, p)| p.0 == BulletKind::Player).unwrap();
    assert!(life.is_active());
    assert_relative_eq!(tf.translation.x, 1.0, epsilon = 1e-4);

    let mut q = world.query_filtered::<&mut Projectile, With<PooledProjectile>>();
    for mut p in q.iter_mut(&mut world) {
        if p.lifespan > 0.0 {
            p.lifespan = 0.001;
        }
    }
    run_system_once(&mut world, flight::advance_projectiles);
    assert!(active_ids(&mut world).is_empty());
}

#[test]
fn homing_turns_toward_its_lock_and_drops_it_when_the_target_dies() {
    let mut world = world_with_pools(1, 1);
    let target = spawn_tracked_in_world(&mut world, (Kind::Enemy, Transform::from_xyz(100.0, -100.0, 0.0)));

    let mut req = request(BulletKind::Player, Vec2::ZERO, Vec2::new(0.0, -350.0));
    req.homing = Some(HomingLock { target, tracking_rate: 0.05 });
    write(&mut world, req);
    run_system_once(&mut world, allocator::allocate_projectiles_from_pool);
    run_system_once(&mut world, flight::advance_projectiles);

    let mut q = world.query_filtered::<(&LinearVelocity, &Projectile), With<PooledProjectile>>();
    let (vel, projectile) = q.iter(&world).find(|(_, p)| p.homing.is_some()).unwrap();
    assert_relative_eq!(Vec2::new(0.0, -1.0).angle_to(vel.0), 0.05, epsilon = 1e-4);
    assert_relative_eq!(vel.0.length(), 350.0, epsilon = 1e-2);
    assert_eq!(projectile.homing.map(|h| h.target), Some(target));

    let e = world.resource::<EntityRegistry>().resolve(target).unwrap();
    *world.get_mut::<Lifecycle>(e).unwrap() = Lifecycle::PendingRemoval;
    run_system_once(&mut world, flight::advance_projectiles);
    let mut q = world.query_filtered::<(&Lifecycle, &Projectile), With<PooledProjectile>>();
    assert!(q.iter(&world).filter(|(l, _)| l.is_active()).all(|(_, p)| p.homing.is_none()));
}
