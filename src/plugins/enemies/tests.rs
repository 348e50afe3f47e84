//! Unit tests for enemy spawning and hit feedback.

use bevy::ecs::system::RunSystemOnce;
use bevy::prelude::*;

use super::*;
use crate::common::rng::SimRng;
use crate::common::test_utils::{fixed_time_with_delta, run_system_once, sim_world};
use crate::plugins::firing::targeting::FireGate;
use crate::plugins::movement::pattern::MovementPattern;
use crate::plugins::registry::{Lifecycle, SimId};

fn spawn(world: &mut World, archetype: EnemyArchetype, pos: Vec2) -> EntityId {
    let tunables = world.resource::<Tunables>().clone();
    let id = world.resource_scope(|world, mut registry: Mut<EntityRegistry>| {
        let mut commands = world.commands();
        spawn_enemy(&mut commands, &mut registry, &tunables, archetype, pos)
    });
    world.flush();
    id
}

#[test]
fn archetype_stats_come_from_tunables() {
    let mut world = sim_world(1.0 / 60.0);
    let expected = [
        (EnemyArchetype::Basic, 2, 150.0, 100),
        (EnemyArchetype::Fast, 1, 250.0, 150),
        (EnemyArchetype::Tank, 5, 100.0, 200),
        (EnemyArchetype::MiniBoss, 30, 80.0, 1000),
        (EnemyArchetype::Boss, 100, 60.0, 5000),
    ];
    for (archetype, hp, speed, score) in expected {
        let id = spawn(&mut world, archetype, Vec2::new(100.0, 100.0));
        let e = world.resource::<EntityRegistry>().resolve(id).unwrap();
        let entity = world.entity(e);
        assert_eq!(entity.get::<Health>().unwrap().max(), hp);
        assert_eq!(entity.get::<Speed>().unwrap().0, speed);
        assert_eq!(entity.get::<Enemy>().unwrap().score, score);
        assert_eq!(entity.get::<SimId>().unwrap().0, id);
        assert_eq!(entity.get::<Lifecycle>(), Some(&Lifecycle::Active));
        let is_elite = matches!(archetype, EnemyArchetype::MiniBoss | EnemyArchetype::Boss);
        assert_eq!(entity.contains::<Boss>(), is_elite);
    }
}

#[test]
fn elites_start_on_phase_zero_patterns() {
    let mut world = sim_world(1.0 / 60.0);
    let id = spawn(&mut world, EnemyArchetype::Boss, Vec2::new(400.0, 150.0));
    let e = world.resource::<EntityRegistry>().resolve(id).unwrap();
    let phases = world.resource::<Tunables>().archetypes.boss.phases.clone();

    let motion = world.get::<Motion>(e).unwrap();
    assert_eq!(motion.pattern, phases[0].movement);
    assert_eq!(motion.state.anchor, Vec2::new(400.0, 150.0));
    assert!(matches!(motion.pattern, MovementPattern::Hover { .. }));
    assert_eq!(world.get::<Weapon>(e).unwrap().pattern, phases[0].firing);
    assert_eq!(world.get::<Boss>(e).unwrap().current, 0);
}

#[test]
fn archetype_fire_gate_reaches_the_weapon() {
    let mut world = sim_world(1.0 / 60.0);
    let gate = FireGate::LaneAhead { half_width: 25.0 };
    world.resource_mut::<Tunables>().archetypes.tank.fire_gate = gate;

    let tank = spawn(&mut world, EnemyArchetype::Tank, Vec2::new(200.0, 100.0));
    let basic = spawn(&mut world, EnemyArchetype::Basic, Vec2::new(300.0, 100.0));
    let registry = world.resource::<EntityRegistry>();
    let (tank, basic) = (registry.resolve(tank).unwrap(), registry.resolve(basic).unwrap());

    assert_eq!(world.get::<Weapon>(tank).unwrap().gate, gate);
    assert_eq!(world.get::<Weapon>(basic).unwrap().gate, FireGate::Always);
}

#[test]
fn flash_decay_rate_comes_from_tunables() {
    let mut world = sim_world(0.05);
    world.resource_mut::<Tunables>().presentation.hit_flash_decay_per_sec = 2.0;
    let e = world.spawn(HitFlash::default()).id();
    world.get_mut::<HitFlash>(e).unwrap().trigger();

    run_system_once(&mut world, decay_hit_flash);
    assert!((world.get::<HitFlash>(e).unwrap().0.get() - 0.9).abs() < 1e-5);
}

#[test]
fn hit_flash_decays_to_zero() {
    let mut world = sim_world(0.05);
    let e = world.spawn(HitFlash::default()).id();
    world.get_mut::<HitFlash>(e).unwrap().trigger();

    run_system_once(&mut world, decay_hit_flash);
    let v = world.get::<HitFlash>(e).unwrap().0.get();
    assert!((v - 0.6).abs() < 1e-5);

    world.insert_resource(fixed_time_with_delta(1.0));
    world.run_system_once(decay_hit_flash).unwrap();
    assert!(!world.get::<HitFlash>(e).unwrap().0.is_active());
}

#[test]
fn hit_flash_decay_is_consistent_over_step_splitting() {
    let rate = Tunables::default().presentation.hit_flash_decay_per_sec;
    let mut rng = SimRng::seeded(0xDEAD_BEEF);
    for _ in 0..2000 {
        let dt = rng.range(0.0, 0.2);
        let mut once = HitFlash::default();
        once.trigger();
        once.0.decay_to_zero(rate, dt);

        let mut split = HitFlash::default();
        split.trigger();
        split.0.decay_to_zero(rate, dt * 0.5);
        split.0.decay_to_zero(rate, dt * 0.5);

        assert!((once.0.get() - split.0.get()).abs() < 1e-5);
    }
}
