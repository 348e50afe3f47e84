mod common;

use std::time::Duration;

use arcade_combat::common::state::GameState;
use arcade_combat::game::configure_headless;
use arcade_combat::plugins::player::PlayerIntent;
use arcade_combat::plugins::registry::Kind;
use bevy::prelude::*;

#[test]
fn boots_and_ticks_as_a_bevy_app() {
    let mut app = App::new();
    app.add_plugins(MinimalPlugins);
    configure_headless(&mut app);

    for _ in 0..5 {
        app.update();
    }
    assert_eq!(*app.world().resource::<GameState>(), GameState::InGame);
}

#[test]
fn simulation_runs_a_minute_of_play() {
    let mut sim = common::sim(11);
    let intent = PlayerIntent { move_axis: Vec2::X, fire: true, ..default() };
    let mut snapshots = 0;
    for _ in 0..3600 {
        sim.tick(common::DT, intent).for_each(drop);
        snapshots += sim.snapshot().len();
    }
    assert!(snapshots > 0);
    assert!(sim.wave().wave >= 1);
}

#[test]
fn enemies_appear_on_schedule() {
    let mut sim = common::sim(5);
    // Default cadence is 2 s.
    common::run(&mut sim, 110, common::idle());
    assert_eq!(sim.active_count(Kind::Enemy), 0);
    common::run(&mut sim, 20, common::idle());
    assert_eq!(sim.active_count(Kind::Enemy), 1);
}

#[test]
fn zero_dt_is_a_no_op_tick() {
    let mut sim = common::sim(5);
    let before = sim.snapshot();
    let events: Vec<_> = sim.tick(Duration::ZERO, PlayerIntent::default()).collect();
    assert!(events.is_empty());
    assert_eq!(sim.snapshot(), before);
}
