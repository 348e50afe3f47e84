//! Damage application and kill settlement shared by every combat system.

use bevy::prelude::*;

use crate::common::events::{CombatEvent, CombatEvents, Scoreboard};
use crate::common::rng::SimRng;
use crate::common::tunables::Tunables;
use crate::plugins::enemies::{Enemy, HitFlash};
use crate::plugins::pickups::{roll_drop, spawn_pickup};
use crate::plugins::registry::{EntityId, EntityRegistry, Health, Lifecycle};

/// An enemy that reached zero health this tick.
#[derive(Debug, Clone, Copy)]
pub struct Kill {
    pub id: EntityId,
    pub enemy: Enemy,
    pub position: Vec2,
}

/// Damage an enemy and flash it. Returns a `Kill` only on the hit that destroys it.
pub fn damage_enemy(
    id: EntityId,
    enemy: &Enemy,
    position: Vec2,
    health: &mut Health,
    life: &mut Lifecycle,
    flash: Option<&mut HitFlash>,
    amount: i32,
) -> Option<Kill> {
    if !life.is_active() {
        return None;
    }
    if let Some(flash) = flash {
        flash.trigger();
    }
    if !health.apply_damage(amount) {
        return None;
    }
    *life = Lifecycle::PendingRemoval;
    Some(Kill { id, enemy: *enemy, position })
}

/// Everything a kill needs to pay out: score, event and drop.
pub struct Payout<'a, 'w, 's> {
    pub commands: &'a mut Commands<'w, 's>,
    pub registry: &'a mut EntityRegistry,
    pub tunables: &'a Tunables,
    pub rng: &'a mut SimRng,
    pub events: &'a mut CombatEvents,
    pub scoreboard: &'a mut Scoreboard,
    /// Active pickups right now; drops stop at the configured cap.
    pub active_pickups: usize,
}

impl Payout<'_, '_, '_> {
    /// Settle kills in the order they happened. The drop roll is drawn even when
    /// the pickup cap is reached, so the random stream doesn't depend on it.
    pub fn settle(&mut self, kills: &[Kill]) {
        for kill in kills {
            self.scoreboard.add(kill.enemy.score);
            self.events.push(CombatEvent::EnemyDestroyed {
                id: kill.id,
                archetype: kill.enemy.archetype,
                score: kill.enemy.score,
                position: kill.position,
            });
            debug!(id = kill.id.0, archetype = ?kill.enemy.archetype, "enemy destroyed");

            let Some(kind) = roll_drop(self.rng, self.tunables, kill.enemy.drop_chance) else {
                continue;
            };
            if self.active_pickups < self.tunables.pickups.max_active {
                spawn_pickup(self.commands, self.registry, self.tunables, kind, kill.position);
                self.active_pickups += 1;
            }
        }
    }
}
