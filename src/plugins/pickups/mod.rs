//! Pickups: falling power-ups, their spawn helpers and their effects on the player.

use avian2d::prelude::*;
use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::common::events::{CombatEvent, CombatEvents};
use crate::common::layers::pickup_layers;
use crate::common::rng::SimRng;
use crate::common::state::in_game;
use crate::common::tunables::Tunables;
use crate::plugins::SimSet;
use crate::plugins::combat::hitbox::Hitbox;
use crate::plugins::movement::Motion;
use crate::plugins::movement::pattern::MovementPattern;
use crate::plugins::player::Player;
use crate::plugins::registry::{spawn_tracked, EntityId, EntityRegistry, Health, Kind, Lifecycle, SimId, Speed, Tags, Team};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PickupKind {
    Weapon,
    Shield,
    Speed,
    Bomb,
    Life,
}

impl PickupKind {
    pub fn tag(self) -> &'static str {
        match self {
            Self::Weapon => "weapon",
            Self::Shield => "shield",
            Self::Speed => "speed",
            Self::Bomb => "bomb",
            Self::Life => "life",
        }
    }
}

#[derive(Component, Debug, Clone, Copy)]
pub struct Pickup {
    pub kind: PickupKind,
}

pub fn spawn_pickup(
    commands: &mut Commands,
    registry: &mut EntityRegistry,
    tunables: &Tunables,
    kind: PickupKind,
    pos: Vec2,
) -> EntityId {
    let p = &tunables.pickups;
    let id = spawn_tracked(
        commands,
        registry,
        (
            Name::new(format!("Pickup({})", kind.tag())),
            Kind::Pickup,
            Team::Neutral,
            Pickup { kind },
            Speed(p.fall_speed),
            Motion::new(MovementPattern::straight_down(), pos),
            p.hitbox,
            Tags::from_slice(&[kind.tag()]),
            Transform::from_translation(pos.extend(1.0)),
            LinearVelocity::ZERO,
            pickup_layers(),
        ),
    );
    debug!(kind = kind.tag(), id = id.0, "pickup spawned");
    id
}

/// Roll an enemy's drop once. Always consumes one draw for the chance, and one more
/// for the kind only when the chance succeeds.
pub fn roll_drop(rng: &mut SimRng, tunables: &Tunables, drop_chance: f32) -> Option<PickupKind> {
    if rng.roll() >= drop_chance {
        return None;
    }
    rng.pick_weighted(&tunables.pickups.drops.table())
}

/// Apply a collected pickup to the player.
pub fn apply_pickup(player: &mut Player, lives: &mut Health, tunables: &Tunables, kind: PickupKind) {
    let secs = tunables.player.power_up_secs;
    match kind {
        PickupKind::Weapon => player.upgrade_weapon(&tunables.weapons),
        PickupKind::Shield => player.shield.set_max(secs),
        PickupKind::Speed => player.speed_boost.set_max(secs),
        PickupKind::Bomb => player.bombs += 1,
        PickupKind::Life => lives.heal(1),
    }
}

/// Player touches pickups. Works through invulnerability; oldest pickup first.
pub fn collect_pickups(
    tunables: Res<Tunables>,
    mut events: ResMut<CombatEvents>,
    mut q_player: Query<(&Transform, &Hitbox, &CollisionLayers, &Lifecycle, &mut Player, &mut Health), Without<Pickup>>,
    mut q_pickups: Query<(&SimId, &Pickup, &Transform, &Hitbox, &CollisionLayers, &mut Lifecycle), Without<Player>>,
) {
    let Ok((p_tf, p_hitbox, p_layers, p_life, mut player, mut lives)) = q_player.single_mut() else {
        return;
    };
    if !p_life.is_active() {
        return;
    }
    let p_pos = p_tf.translation.truncate();

    let mut pickups: Vec<_> = q_pickups.iter_mut().collect();
    pickups.sort_by_key(|(id, ..)| id.0);

    for (_, pickup, tf, hitbox, layers, mut life) in pickups {
        if !life.is_active() || !p_layers.interacts_with(*layers) {
            continue;
        }
        if !p_hitbox.overlaps(p_pos, *hitbox, tf.translation.truncate()) {
            continue;
        }
        apply_pickup(&mut player, &mut lives, &tunables, pickup.kind);
        *life = Lifecycle::PendingRemoval;
        events.push(CombatEvent::PowerUpCollected { kind: pickup.kind });
        debug!(kind = pickup.kind.tag(), "pickup collected");
    }
}

pub fn plugin(app: &mut App) {
    app.add_systems(
        FixedUpdate,
        collect_pickups
            .after(crate::plugins::combat::resolve_contact_damage)
            .in_set(SimSet::Collide)
            .run_if(in_game),
    );
}
