//! Integration test harness.
//!
//! Tests drive the crate the way a host does: through `Simulation`, one fixed `dt`
//! and one `PlayerIntent` per tick.

#![allow(dead_code)]

use std::time::Duration;

use arcade_combat::common::events::CombatEvent;
use arcade_combat::common::tunables::Tunables;
use arcade_combat::game::Simulation;
use arcade_combat::plugins::player::PlayerIntent;
use arcade_combat::plugins::registry::{EntityId, Health, Kind};
use bevy::prelude::*;

pub const DT: Duration = Duration::from_nanos(16_666_667);

pub fn sim(seed: u64) -> Simulation {
    Simulation::new(Tunables::default(), seed).expect("default tunables are valid")
}

pub fn sim_with(seed: u64, edit: impl FnOnce(&mut Tunables)) -> Simulation {
    let mut tunables = Tunables::default();
    edit(&mut tunables);
    Simulation::new(tunables, seed).expect("test tunables are valid")
}

/// Run `ticks` ticks with the same intent and collect every event.
pub fn run(sim: &mut Simulation, ticks: usize, intent: PlayerIntent) -> Vec<CombatEvent> {
    (0..ticks).flat_map(|_| sim.tick(DT, intent)).collect()
}

pub fn idle() -> PlayerIntent {
    PlayerIntent::default()
}

pub fn entity(sim: &Simulation, id: EntityId) -> Option<Entity> {
    sim.world().resource::<arcade_combat::plugins::registry::EntityRegistry>().resolve(id)
}

pub fn health(sim: &Simulation, id: EntityId) -> Option<i32> {
    entity(sim, id).and_then(|e| sim.world().get::<Health>(e)).map(|h| h.current())
}

pub fn position(sim: &mut Simulation, kind: Kind, id: EntityId) -> Option<Vec2> {
    sim.snapshot().into_iter().find(|v| v.kind == kind && v.id == id).map(|v| v.position)
}
