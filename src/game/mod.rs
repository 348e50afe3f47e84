//! Game composition root.
//!
//! Provides two public entry points:
//! - `run`: headless 60 Hz loop for `cargo run`, flown by a scripted autopilot,
//!   logging every combat event.
//! - `configure_headless`: gameplay plugins only. `Simulation` and the integration
//!   tests build on it.

pub mod simulation;

use std::time::Duration;

use bevy::app::{AppExit, ScheduleRunnerPlugin};
use bevy::ecs::message::MessageWriter;
use bevy::log::LogPlugin;
use bevy::prelude::*;
use bevy::time::Fixed;

use crate::common::events::{CombatEvent, CombatEvents};
use crate::common::state::GameState;
use crate::plugins::{self, SimSet};
use crate::plugins::player::PlayerIntent;

pub use simulation::{EntitySpec, EntityView, Simulation, VisualState};

const TICK_HZ: f64 = 60.0;

/// Stop the demo run after this much simulated time even if the player survives.
#[derive(Resource, Debug, Clone, Copy)]
struct RunLimit {
    secs: f32,
}

impl Default for RunLimit {
    fn default() -> Self {
        Self { secs: 300.0 }
    }
}

pub fn run() {
    App::new()
        .add_plugins((
            MinimalPlugins.set(ScheduleRunnerPlugin::run_loop(Duration::from_secs_f64(1.0 / TICK_HZ))),
            LogPlugin::default(),
        ))
        .insert_resource(Time::<Fixed>::from_hz(TICK_HZ))
        .add_plugins(configure_headless)
        .init_resource::<RunLimit>()
        .add_systems(FixedUpdate, autopilot.before(SimSet::Input))
        .add_systems(FixedUpdate, report_events.after(SimSet::Cleanup))
        .run();
}

/// Headless configuration: gameplay plugins, no window, no renderer.
pub fn configure_headless(app: &mut App) {
    plugins::register_gameplay(app);
}

/// Sweep side to side, keep the trigger down, use the special whenever it charges
/// and drop a bomb every 45 s.
fn autopilot(time: Res<Time<Fixed>>, mut intent: ResMut<PlayerIntent>) {
    let t = time.elapsed_secs();
    let bomb_period = 45.0;
    *intent = PlayerIntent {
        move_axis: Vec2::new((t * 0.8).sin(), 0.0),
        fire: true,
        bomb: t > 0.0 && (t % bomb_period) < time.delta_secs(),
        special: true,
    };
}

fn report_events(
    time: Res<Time<Fixed>>,
    limit: Res<RunLimit>,
    state: Res<GameState>,
    mut events: ResMut<CombatEvents>,
    mut exit: MessageWriter<AppExit>,
) {
    for event in events.drain() {
        match event {
            CombatEvent::GameOver { score } => info!(score, "game over"),
            CombatEvent::WaveCleared { wave } => info!(wave, "wave cleared"),
            CombatEvent::BossPhaseChanged { boss, phase } => info!(boss = boss.0, phase, "boss phase"),
            other => debug!(?other, "combat event"),
        }
    }

    if *state == GameState::GameOver || time.elapsed_secs() >= limit.secs {
        exit.write(AppExit::Success);
    }
}
