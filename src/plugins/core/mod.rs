//! Core plugin: shared resources and the tick contract.
//!
//! Inserts every shared resource with its default unless the host already provided
//! one (a `Simulation` inserts its own `Tunables` and seeded `SimRng` first), chains
//! the `SimSet`s and pins `FixedUpdate` to the single-threaded executor so system
//! order is the only order.

use bevy::ecs::schedule::ExecutorKind;
use bevy::prelude::*;
use bevy::time::Fixed;

use crate::common::events::{CombatEvents, Scoreboard};
use crate::common::rng::SimRng;
use crate::common::state::GameState;
use crate::common::tunables::Tunables;
use crate::plugins::SimSet;

pub fn plugin(app: &mut App) {
    app.init_resource::<Tunables>()
        .init_resource::<GameState>()
        .init_resource::<SimRng>()
        .init_resource::<CombatEvents>()
        .init_resource::<Scoreboard>()
        .init_resource::<Time<Fixed>>();

    app.configure_sets(
        FixedUpdate,
        (
            SimSet::Input,
            SimSet::Spawn,
            SimSet::Move,
            SimSet::Fire,
            SimSet::Allocate,
            SimSet::Project,
            SimSet::Collide,
            SimSet::Phase,
            SimSet::Cleanup,
        )
            .chain(),
    );

    app.edit_schedule(FixedUpdate, |schedule| {
        schedule.set_executor_kind(ExecutorKind::SingleThreaded);
    });
}
