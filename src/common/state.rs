//! Global run state.
//!
//! Kept as a plain resource rather than Bevy `States`: the fixed-step schedule is driven
//! by hand from `Simulation::tick`, and the transition to `GameOver` has to be visible
//! to the very next system in the same tick.

use bevy::prelude::*;

#[derive(Resource, Debug, Clone, Copy, Eq, PartialEq, Hash, Default)]
pub enum GameState {
    #[default]
    InGame,
    GameOver,
}

/// Run condition: gameplay systems only run while the player is alive.
pub fn in_game(state: Res<GameState>) -> bool {
    *state == GameState::InGame
}
