//! Test helpers.
//!
//! Bevy provides `World::run_system_once` (via the `RunSystemOnce` trait) for quickly
//! executing a system without building a full schedule. Systems that use `Commands`
//! only enqueue structural changes, so we `flush()` before returning.

use std::time::Duration;

use bevy::ecs::message::Messages;
use bevy::ecs::system::{IntoSystem, RunSystemOnce};
use bevy::prelude::*;
use bevy::time::Fixed;

use crate::common::events::{CombatEvents, Scoreboard};
use crate::common::rng::SimRng;
use crate::common::state::GameState;
use crate::common::tunables::Tunables;
use crate::plugins::projectiles::messages::SpawnProjectileRequest;
use crate::plugins::registry::EntityRegistry;
use crate::plugins::world::Playfield;

/// Run a system once on the given world, then flush deferred commands.
/// Returns the system output.
pub fn run_system_once<T, Out, Marker>(world: &mut World, system: T) -> Out
where
    T: IntoSystem<(), Out, Marker>,
{
    let out = world.run_system_once(system).expect("system run failed");
    world.flush();
    out
}

/// `Time<Fixed>` that reports `dt` as the last step.
pub fn fixed_time_with_delta(dt: f32) -> Time<Fixed> {
    let mut t = Time::<Fixed>::default();
    t.advance_by(Duration::from_secs_f32(dt));
    t
}

/// A world holding every shared resource systems expect, with default tunables.
pub fn sim_world(dt: f32) -> World {
    let tunables = Tunables::default();
    let mut world = World::new();
    world.insert_resource(Playfield::from_tunables(&tunables.playfield));
    world.insert_resource(tunables);
    world.insert_resource(fixed_time_with_delta(dt));
    world.insert_resource(GameState::InGame);
    world.insert_resource(SimRng::seeded(1));
    world.init_resource::<EntityRegistry>();
    world.init_resource::<CombatEvents>();
    world.init_resource::<Scoreboard>();
    world.init_resource::<Messages<SpawnProjectileRequest>>();
    world
}
