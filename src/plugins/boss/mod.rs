//! Boss phase state machine.
//!
//! Phases are entered by health fraction, evaluated once per tick after damage.
//! The index only moves forward. When one tick's damage crosses several thresholds
//! the boss lands directly on the deepest phase reached and a single
//! `BossPhaseChanged` is emitted for it. A destroyed boss never changes phase.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::common::events::{CombatEvent, CombatEvents};
use crate::common::state::in_game;
use crate::plugins::SimSet;
use crate::plugins::firing::Weapon;
use crate::plugins::firing::pattern::FiringPattern;
use crate::plugins::movement::Motion;
use crate::plugins::movement::pattern::MovementPattern;
use crate::plugins::registry::{Health, Lifecycle, SimId};

/// One phase. Entered once health fraction is at or below `health_threshold`;
/// phase 0 uses 1.0.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BossPhase {
    pub health_threshold: f32,
    pub movement: MovementPattern,
    pub firing: FiringPattern,
    /// Scales the archetype's base fire interval while this phase is active.
    pub firing_rate_multiplier: f32,
}

#[derive(Component, Debug, Clone)]
pub struct Boss {
    pub phases: Vec<BossPhase>,
    pub current: usize,
}

impl Boss {
    pub fn new(phases: Vec<BossPhase>) -> Self {
        Self { phases, current: 0 }
    }

    /// Deepest phase reachable at `fraction`, never behind the current one.
    pub fn phase_for(&self, fraction: f32) -> usize {
        let mut index = self.current;
        while index + 1 < self.phases.len() && fraction <= self.phases[index + 1].health_threshold {
            index += 1;
        }
        index
    }

    pub fn current_phase(&self) -> Option<&BossPhase> {
        self.phases.get(self.current)
    }
}

pub fn advance_boss_phases(
    mut events: ResMut<CombatEvents>,
    mut q: Query<(&SimId, &Health, &Lifecycle, &mut Boss, &mut Motion, &mut Weapon)>,
) {
    let mut bosses: Vec<_> = q.iter_mut().collect();
    bosses.sort_by_key(|(id, ..)| id.0);

    for (id, health, life, mut boss, mut motion, mut weapon) in bosses {
        if !life.is_active() || health.is_depleted() {
            continue;
        }
        let next = boss.phase_for(health.fraction());
        if next <= boss.current {
            continue;
        }

        boss.current = next;
        let phase = &boss.phases[next];
        motion.pattern = phase.movement.clone();
        weapon.pattern = phase.firing.clone();
        weapon.rate_multiplier = phase.firing_rate_multiplier;
        weapon.phase_angle = 0.0;

        info!(boss = id.0.0, phase = next, health = health.current(), "boss phase changed");
        events.push(CombatEvent::BossPhaseChanged { boss: id.0, phase: next });
    }
}

pub fn plugin(app: &mut App) {
    app.add_systems(FixedUpdate, advance_boss_phases.in_set(SimSet::Phase).run_if(in_game));
}

#[cfg(test)]
mod tests;
