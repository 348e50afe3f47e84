use bevy::prelude::*;

use super::*;
use crate::common::test_utils::{run_system_once, sim_world};
use crate::common::tunables::Tunables;
use crate::plugins::enemies::{spawn_enemy, EnemyArchetype};
use crate::plugins::firing::pattern::PatternKind;
use crate::plugins::registry::{EntityId, EntityRegistry};

fn spawn_boss(world: &mut World, archetype: EnemyArchetype) -> (EntityId, Entity) {
    let tunables = world.resource::<Tunables>().clone();
    let id = world.resource_scope(|world, mut registry: Mut<EntityRegistry>| {
        let mut commands = world.commands();
        spawn_enemy(&mut commands, &mut registry, &tunables, archetype, Vec2::new(400.0, 150.0))
    });
    world.flush();
    let e = world.resource::<EntityRegistry>().resolve(id).unwrap();
    (id, e)
}

fn set_health(world: &mut World, e: Entity, current: i32) {
    let max = world.get::<Health>(e).unwrap().max();
    *world.get_mut::<Health>(e).unwrap() = Health::new(current, max);
}

fn drain(world: &mut World) -> Vec<CombatEvent> {
    world.resource_mut::<CombatEvents>().drain().collect()
}

#[test]
fn phase_for_is_monotonic_and_inclusive() {
    let boss = Boss::new(Tunables::default().archetypes.boss.phases);
    assert_eq!(boss.phase_for(1.0), 0);
    assert_eq!(boss.phase_for(0.71), 0);
    assert_eq!(boss.phase_for(0.7), 1);
    assert_eq!(boss.phase_for(0.35), 2);
    assert_eq!(boss.phase_for(0.0), 3);

    let mut later = boss.clone();
    later.current = 3;
    // Healing never regresses.
    assert_eq!(later.phase_for(1.0), 3);
}

#[test]
fn crossing_two_thresholds_lands_on_the_deeper_phase() {
    let mut world = sim_world(1.0 / 60.0);
    let (id, e) = spawn_boss(&mut world, EnemyArchetype::Boss);

    set_health(&mut world, e, 75);
    run_system_once(&mut world, advance_boss_phases);
    assert_eq!(world.get::<Boss>(e).unwrap().current, 0);
    assert!(drain(&mut world).is_empty());

    set_health(&mut world, e, 35);
    run_system_once(&mut world, advance_boss_phases);

    let boss = world.get::<Boss>(e).unwrap().clone();
    assert_eq!(boss.current, 2);
    let weapon = world.get::<Weapon>(e).unwrap();
    assert_eq!(weapon.pattern, boss.phases[2].firing);
    assert_eq!(weapon.pattern.descriptors()[0].kind, PatternKind::Spiral);
    assert_eq!(weapon.rate_multiplier, boss.phases[2].firing_rate_multiplier);
    assert_eq!(world.get::<Motion>(e).unwrap().pattern, boss.phases[2].movement);

    assert_eq!(drain(&mut world), vec![CombatEvent::BossPhaseChanged { boss: id, phase: 2 }]);

    // Stable afterwards.
    run_system_once(&mut world, advance_boss_phases);
    assert!(drain(&mut world).is_empty());
}

#[test]
fn new_phase_resets_the_spiral_accumulator_and_keeps_the_anchor() {
    let mut world = sim_world(1.0 / 60.0);
    let (_, e) = spawn_boss(&mut world, EnemyArchetype::MiniBoss);
    world.get_mut::<Weapon>(e).unwrap().phase_angle = 135.0;
    world.get_mut::<Motion>(e).unwrap().state.phase = 2.0;

    set_health(&mut world, e, 15);
    run_system_once(&mut world, advance_boss_phases);

    assert_eq!(world.get::<Boss>(e).unwrap().current, 1);
    assert_eq!(world.get::<Weapon>(e).unwrap().phase_angle, 0.0);
    assert_eq!(world.get::<Motion>(e).unwrap().state.phase, 2.0);
}

#[test]
fn destroyed_boss_does_not_change_phase() {
    let mut world = sim_world(1.0 / 60.0);
    let (_, e) = spawn_boss(&mut world, EnemyArchetype::Boss);
    set_health(&mut world, e, 0);
    run_system_once(&mut world, advance_boss_phases);
    assert_eq!(world.get::<Boss>(e).unwrap().current, 0);
    assert!(drain(&mut world).is_empty());
}
