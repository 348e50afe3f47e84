//! Enemies plugin: archetype spawning and hit feedback.
//!
//! An archetype is pure configuration (`Tunables::archetypes`). Spawning turns one
//! into a bundle of shared components: the movement resolver, firing engine and
//! combat resolver then treat every enemy the same way. Elites (archetypes with
//! phases) additionally get a `Boss` component and start on phase 0.
//!
//! Presentation is derived from facts: `HitFlash` is bumped by the combat resolver
//! and only decays here. Hosts read it through the snapshot.

use avian2d::prelude::*;
use bevy::prelude::*;
use bevy::time::Fixed;
use serde::{Deserialize, Serialize};

use crate::common::layers::enemy_layers;
use crate::common::tunables::Tunables;
use crate::common::units::UnitF32;
use crate::plugins::SimSet;
use crate::plugins::boss::Boss;
use crate::plugins::firing::Weapon;
use crate::plugins::movement::Motion;
use crate::plugins::registry::{spawn_tracked, AttackPower, EntityId, EntityRegistry, Health, Kind, Speed, Tags, Team};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EnemyArchetype {
    Basic,
    Fast,
    Tank,
    MiniBoss,
    Boss,
}

impl EnemyArchetype {
    pub fn tag(self) -> &'static str {
        match self {
            Self::Basic => "basic",
            Self::Fast => "fast",
            Self::Tank => "tank",
            Self::MiniBoss => "mini_boss",
            Self::Boss => "boss",
        }
    }
}

#[derive(Component, Debug, Clone, Copy)]
pub struct Enemy {
    pub archetype: EnemyArchetype,
    pub score: u32,
    pub drop_chance: f32,
}

/// Flash intensity after a hit, decaying to zero.
#[derive(Component, Debug, Clone, Copy, Default)]
pub struct HitFlash(pub UnitF32);

impl HitFlash {
    #[inline]
    pub fn trigger(&mut self) {
        self.0 = UnitF32::ONE;
    }
}

/// Spawn an enemy of `archetype` at `pos` and register it.
pub fn spawn_enemy(
    commands: &mut Commands,
    registry: &mut EntityRegistry,
    tunables: &Tunables,
    archetype: EnemyArchetype,
    pos: Vec2,
) -> EntityId {
    let a = tunables.archetypes.get(archetype);

    let (movement, firing, rate) = match a.phases.first() {
        Some(p) => (p.movement.clone(), p.firing.clone(), p.firing_rate_multiplier),
        None => (a.movement.clone(), a.firing.clone(), 1.0),
    };
    let mut weapon = Weapon::new(firing, a.projectile.clone(), a.fire_interval).gated(a.fire_gate);
    weapon.rate_multiplier = rate;
    weapon.cooldown = weapon.effective_interval();

    let mut tags = Tags::from_slice(&[archetype.tag()]);
    if !a.phases.is_empty() {
        tags.0.insert("elite".to_string());
    }

    let id = spawn_tracked(
        commands,
        registry,
        (
            (
                Name::new(format!("Enemy({})", archetype.tag())),
                Kind::Enemy,
                Team::Enemy,
                Enemy { archetype, score: a.score, drop_chance: a.drop_chance },
                Health::full(a.health),
                AttackPower(a.projectile.damage),
                Speed(a.speed),
                a.hitbox,
                tags,
            ),
            (
                Motion::new(movement, pos),
                weapon,
                HitFlash::default(),
                Transform::from_translation(pos.extend(1.0)),
                LinearVelocity::ZERO,
                enemy_layers(),
            ),
        ),
    );

    if !a.phases.is_empty() {
        if let Some(e) = registry.resolve(id) {
            commands.entity(e).insert(Boss::new(a.phases.clone()));
        }
    }

    debug!(?archetype, id = id.0, x = pos.x, y = pos.y, "enemy spawned");
    id
}

fn decay_hit_flash(time: Res<Time<Fixed>>, tunables: Res<Tunables>, mut q: Query<&mut HitFlash>) {
    let dt = time.delta_secs();
    let rate = tunables.presentation.hit_flash_decay_per_sec;
    for mut flash in &mut q {
        if flash.0.is_active() {
            flash.0.decay_to_zero(rate, dt);
        }
    }
}

pub fn plugin(app: &mut App) {
    app.add_systems(FixedUpdate, decay_hit_flash.in_set(SimSet::Move));
}

#[cfg(test)]
mod tests;
