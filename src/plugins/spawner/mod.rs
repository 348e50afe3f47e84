//! Spawner / wave scheduler.
//!
//! One state machine per run:
//!
//! ```text
//! Leveling --boss countdown--> BossWarning --warning--> BossFight --boss dead--> Leveling (wave + 1)
//!                                                                  \--last wave--> Cleared
//! ```
//!
//! Regular spawns only happen while `Leveling`. Every timer is a countdown field on
//! `WaveState` and is reset to its interval when it fires, whether or not the spawn
//! it guards went through. Periodic pickups run on their own timer in every phase
//! but `Cleared`.

use bevy::prelude::*;
use bevy::time::Fixed;

use crate::common::events::{CombatEvent, CombatEvents, Scoreboard};
use crate::common::rng::SimRng;
use crate::common::state::in_game;
use crate::common::tunables::Tunables;
use crate::plugins::SimSet;
use crate::plugins::enemies::{spawn_enemy, EnemyArchetype};
use crate::plugins::pickups::{spawn_pickup, Pickup};
use crate::plugins::registry::{EntityId, EntityRegistry, Lifecycle};
use crate::plugins::world::Playfield;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WavePhase {
    #[default]
    Leveling,
    BossWarning,
    BossFight,
    Cleared,
}

#[derive(Resource, Debug, Clone, PartialEq)]
pub struct WaveState {
    /// 1-based.
    pub wave: u32,
    pub phase: WavePhase,
    /// Seconds since this wave started, boss warning and fight included.
    pub elapsed_in_wave: f32,
    /// Current regular-spawn cadence; shrinks after every cleared wave.
    pub spawn_interval: f32,
    pub spawn_timer: f32,
    pub boss_timer: f32,
    pub warning_timer: f32,
    pub pickup_timer: f32,
    pub boss: Option<EntityId>,
}

impl WaveState {
    pub fn from_tunables(tunables: &Tunables) -> Self {
        let w = &tunables.waves;
        Self {
            wave: 1,
            phase: WavePhase::Leveling,
            elapsed_in_wave: 0.0,
            spawn_interval: w.spawn_interval,
            spawn_timer: w.spawn_interval,
            boss_timer: w.boss_countdown_secs,
            warning_timer: 0.0,
            pickup_timer: tunables.pickups.spawn_interval,
            boss: None,
        }
    }

    #[inline]
    pub fn boss_active(&self) -> bool {
        matches!(self.phase, WavePhase::BossWarning | WavePhase::BossFight)
    }

    /// Next wave: shorter cadence (down to the floor) and fresh timers.
    fn start_next_wave(&mut self, tunables: &Tunables) {
        let w = &tunables.waves;
        self.wave += 1;
        self.phase = WavePhase::Leveling;
        self.elapsed_in_wave = 0.0;
        self.spawn_interval = (self.spawn_interval * w.interval_factor).max(w.min_spawn_interval);
        self.spawn_timer = self.spawn_interval;
        self.boss_timer = w.boss_countdown_secs;
        self.boss = None;
    }
}

/// Where an enemy of `archetype` enters the playfield. Elites use the fixed boss spot.
fn entry_point(rng: &mut SimRng, tunables: &Tunables, playfield: &Playfield, archetype: EnemyArchetype) -> Vec2 {
    let w = &tunables.waves;
    if !tunables.archetypes.get(archetype).phases.is_empty() {
        return Vec2::from(w.boss_spawn);
    }
    Vec2::new(rng.range(w.spawn_margin, playfield.width - w.spawn_margin), w.spawn_y)
}

#[allow(clippy::too_many_arguments)]
pub fn advance_waves(
    mut commands: Commands,
    time: Res<Time<Fixed>>,
    tunables: Res<Tunables>,
    playfield: Res<Playfield>,
    mut rng: ResMut<SimRng>,
    mut registry: ResMut<EntityRegistry>,
    mut events: ResMut<CombatEvents>,
    mut scoreboard: ResMut<Scoreboard>,
    mut state: ResMut<WaveState>,
    q_lifecycle: Query<&Lifecycle>,
    q_pickups: Query<&Lifecycle, With<Pickup>>,
) {
    if state.phase == WavePhase::Cleared {
        return;
    }
    let dt = time.delta_secs();
    let w = &tunables.waves;
    state.elapsed_in_wave += dt;

    state.pickup_timer -= dt;
    if state.pickup_timer <= 0.0 {
        state.pickup_timer = tunables.pickups.spawn_interval;
        let active = q_pickups.iter().filter(|life| life.is_active()).count();
        if active < tunables.pickups.max_active {
            if let Some(kind) = rng.pick_weighted(&tunables.pickups.periodic.table()) {
                let x = rng.range(w.spawn_margin, playfield.width - w.spawn_margin);
                let pos = Vec2::new(x, tunables.pickups.spawn_y);
                spawn_pickup(&mut commands, &mut registry, &tunables, kind, pos);
            }
        }
    }

    match state.phase {
        WavePhase::Leveling => {
            state.spawn_timer -= dt;
            if state.spawn_timer <= 0.0 {
                state.spawn_timer = state.spawn_interval;
                if let Some(archetype) = rng.pick_weighted(&w.weights_for(state.wave).table()) {
                    let pos = entry_point(&mut rng, &tunables, &playfield, archetype);
                    spawn_enemy(&mut commands, &mut registry, &tunables, archetype, pos);
                }
            }

            state.boss_timer -= dt;
            if state.boss_timer <= 0.0 {
                state.phase = WavePhase::BossWarning;
                state.warning_timer = w.boss_warning_secs;
                events.push(CombatEvent::BossWarning { wave: state.wave });
                info!(wave = state.wave, "boss incoming");
            }
        }
        WavePhase::BossWarning => {
            state.warning_timer -= dt;
            if state.warning_timer <= 0.0 {
                let id = spawn_enemy(&mut commands, &mut registry, &tunables, EnemyArchetype::Boss, Vec2::from(w.boss_spawn));
                state.phase = WavePhase::BossFight;
                state.boss = Some(id);
                events.push(CombatEvent::BossSpawned { id });
            }
        }
        WavePhase::BossFight => {
            let alive = state
                .boss
                .and_then(|id| registry.resolve(id))
                .and_then(|e| q_lifecycle.get(e).ok())
                .is_some_and(|life| life.is_active());
            if alive {
                return;
            }

            let wave = state.wave;
            scoreboard.add(w.clear_bonus);
            events.push(CombatEvent::WaveCleared { wave });

            if w.max_waves.is_some_and(|max| wave >= max) {
                state.phase = WavePhase::Cleared;
                state.boss = None;
                info!(wave, score = scoreboard.score, "all waves cleared");
            } else {
                state.start_next_wave(&tunables);
                info!(wave = state.wave, interval = state.spawn_interval, "wave started");
            }
        }
        WavePhase::Cleared => {}
    }
}

pub fn plugin(app: &mut App) {
    let state = app
        .world()
        .get_resource::<Tunables>()
        .map(WaveState::from_tunables)
        .unwrap_or_else(|| WaveState::from_tunables(&Tunables::default()));
    app.insert_resource(state);
    app.add_systems(FixedUpdate, advance_waves.in_set(SimSet::Spawn).run_if(in_game));
}
