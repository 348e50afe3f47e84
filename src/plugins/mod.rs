//! Feature plugins.
//!
//! Every gameplay system runs in `FixedUpdate`, inside one of the chained `SimSet`s.
//! The chain is the tick contract: input, spawn, move, fire, allocate projectiles,
//! advance projectiles, collide, boss phases, cleanup.

use bevy::prelude::*;

use crate::plugins::projectiles::ProjectilesPlugin;

pub mod boss;
pub mod combat;
pub mod core;
pub mod enemies;
pub mod firing;
pub mod movement;
pub mod pickups;
pub mod player;
pub mod projectiles;
pub mod registry;
pub mod spawner;
pub mod world;

#[derive(SystemSet, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SimSet {
    Input,
    Spawn,
    Move,
    Fire,
    Allocate,
    Project,
    Collide,
    Phase,
    Cleanup,
}

/// Register gameplay plugins. Everything here runs headless.
pub fn register_gameplay(app: &mut App) {
    core::plugin(app);
    registry::plugin(app);
    world::plugin(app);
    player::plugin(app);
    spawner::plugin(app);
    movement::plugin(app);
    firing::plugin(app);
    enemies::plugin(app);
    combat::plugin(app);
    boss::plugin(app);
    pickups::plugin(app);
    app.add_plugins(ProjectilesPlugin);
}
