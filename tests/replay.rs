mod common;

use arcade_combat::common::events::CombatEvent;
use arcade_combat::game::{EntityView, Simulation};
use arcade_combat::plugins::player::PlayerIntent;
use bevy::prelude::*;

/// A scripted pilot: weave, shoot, and use both specials at fixed ticks.
fn script(tick: usize) -> PlayerIntent {
    let t = tick as f32 / 60.0;
    PlayerIntent {
        move_axis: Vec2::new((t * 1.3).sin(), (t * 0.7).cos() * 0.3),
        fire: true,
        bomb: tick == 900,
        special: tick % 600 == 0,
    }
}

fn play(seed: u64, ticks: usize) -> (Vec<CombatEvent>, Vec<EntityView>, u64) {
    let mut sim = common::sim_with(seed, |t| {
        t.waves.boss_countdown_secs = 20.0;
        t.pickups.spawn_interval = 5.0;
    });
    let mut events = Vec::new();
    for tick in 0..ticks {
        events.extend(sim.tick(common::DT, script(tick)));
    }
    let snapshot = sim.snapshot();
    (events, snapshot, sim.score())
}

#[test]
fn same_seed_same_run() {
    let (events_a, snapshot_a, score_a) = play(42, 2400);
    let (events_b, snapshot_b, score_b) = play(42, 2400);

    assert!(!events_a.is_empty());
    assert_eq!(events_a, events_b);
    assert_eq!(snapshot_a, snapshot_b);
    assert_eq!(score_a, score_b);
}

#[test]
fn events_are_handed_out_once() {
    let mut sim: Simulation = common::sim(3);
    let intent = PlayerIntent { bomb: true, ..default() };
    let first: Vec<_> = sim.tick(common::DT, intent).collect();
    assert_eq!(first, vec![CombatEvent::BombUsed { bombs_remaining: 1 }]);
    let second: Vec<_> = sim.tick(common::DT, PlayerIntent::default()).collect();
    assert!(second.is_empty());
}
