//! Outbound combat events and the running score.
//!
//! Systems push events as they happen; the host drains the queue once per tick.
//! Order inside a tick follows system order, then entity insertion order.

use bevy::prelude::*;

use crate::plugins::enemies::EnemyArchetype;
use crate::plugins::pickups::PickupKind;
use crate::plugins::registry::EntityId;

#[derive(Debug, Clone, PartialEq)]
pub enum CombatEvent {
    EnemyDestroyed {
        id: EntityId,
        archetype: EnemyArchetype,
        score: u32,
        position: Vec2,
    },
    PlayerHit {
        lives_remaining: u32,
    },
    WaveCleared {
        wave: u32,
    },
    BossWarning {
        wave: u32,
    },
    BossSpawned {
        id: EntityId,
    },
    BossPhaseChanged {
        boss: EntityId,
        phase: usize,
    },
    PowerUpCollected {
        kind: PickupKind,
    },
    BombUsed {
        bombs_remaining: u32,
    },
    GameOver {
        score: u64,
    },
}

#[derive(Resource, Debug, Default)]
pub struct CombatEvents {
    buffer: Vec<CombatEvent>,
}

impl CombatEvents {
    #[inline]
    pub fn push(&mut self, event: CombatEvent) {
        self.buffer.push(event);
    }

    /// Take everything queued so far, oldest first.
    pub fn drain(&mut self) -> std::vec::IntoIter<CombatEvent> {
        std::mem::take(&mut self.buffer).into_iter()
    }

    pub fn pending(&self) -> &[CombatEvent] {
        &self.buffer
    }
}

#[derive(Resource, Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Scoreboard {
    pub score: u64,
}

impl Scoreboard {
    #[inline]
    pub fn add(&mut self, points: u32) {
        self.score = self.score.saturating_add(u64::from(points));
    }
}
