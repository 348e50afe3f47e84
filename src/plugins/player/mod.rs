//! Player plugin.
//!
//! Pipeline (all in `FixedUpdate`):
//! - Input: read the host's `PlayerIntent`, tick timed effects, move and clamp, load the
//!   current weapon and pull its trigger
//! - Fire: the shared firing system fires the primary weapon; `fire_special` adds the
//!   barrage while the special runs
//!
//! Lives are the player's `Health`. Every hit costs exactly one life, whatever dealt it.

use avian2d::prelude::*;
use bevy::ecs::message::MessageWriter;
use bevy::prelude::*;
use bevy::time::Fixed;
use serde::{Deserialize, Serialize};

use crate::common::events::{CombatEvent, CombatEvents, Scoreboard};
use crate::common::layers::player_layers;
use crate::common::rng::SimRng;
use crate::common::state::{in_game, GameState};
use crate::common::tunables::{Tunables, WeaponTunables};
use crate::common::units::Countdown;
use crate::plugins::SimSet;
use crate::plugins::combat::hitbox::Hitbox;
use crate::plugins::firing::{fire_all, fire_weapons, request_volley, Weapon};
use crate::plugins::projectiles::messages::{BulletKind, SpawnProjectileRequest};
use crate::plugins::registry::{spawn_tracked, EntityId, EntityRegistry, Health, Kind, Lifecycle, SimId, Speed, Team};
use crate::plugins::world::Playfield;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WeaponType {
    #[default]
    Basic,
    Spread,
    Laser,
    Homing,
}

impl WeaponType {
    /// Weapon pickups at max level rotate through the types in this order.
    pub fn next(self) -> Self {
        match self {
            Self::Basic => Self::Spread,
            Self::Spread => Self::Laser,
            Self::Laser => Self::Homing,
            Self::Homing => Self::Basic,
        }
    }
}

#[derive(Component, Debug, Clone)]
pub struct Player {
    pub bombs: u32,
    pub weapon: WeaponType,
    /// 1-based.
    pub weapon_level: u32,
    pub invulnerable: Countdown,
    pub shield: Countdown,
    pub speed_boost: Countdown,
    pub special_energy: f32,
    pub special_active: Countdown,
    pub special_cooldown: f32,
}

impl Player {
    pub fn from_tunables(tunables: &Tunables) -> Self {
        let p = &tunables.player;
        Self {
            bombs: p.starting_bombs,
            weapon: p.starting_weapon,
            weapon_level: 1,
            invulnerable: Countdown::default(),
            shield: Countdown::default(),
            speed_boost: Countdown::default(),
            special_energy: p.special.max_energy,
            special_active: Countdown::default(),
            special_cooldown: 0.0,
        }
    }

    /// Hits are ignored while either the post-hit window or a shield runs.
    #[inline]
    pub fn is_protected(&self) -> bool {
        self.invulnerable.is_positive() || self.shield.is_positive()
    }

    pub fn upgrade_weapon(&mut self, weapons: &WeaponTunables) {
        if self.weapon_level < weapons.get(self.weapon).max_level() {
            self.weapon_level += 1;
        } else {
            self.weapon = self.weapon.next();
            self.weapon_level = 1;
        }
    }
}

/// Per-tick input snapshot supplied by the host. Read-only to the simulation.
#[derive(Resource, Debug, Clone, Copy, Default, PartialEq)]
pub struct PlayerIntent {
    pub move_axis: Vec2,
    pub fire: bool,
    pub bomb: bool,
    pub special: bool,
}

/// Take one life unless protected. Returns whether the hit landed.
///
/// The last life flips the run to `GameOver` and queues the player for removal.
pub fn hit_player(
    player: &mut Player,
    lives: &mut Health,
    life: &mut Lifecycle,
    tunables: &Tunables,
    events: &mut CombatEvents,
    scoreboard: &Scoreboard,
    state: &mut GameState,
) -> bool {
    if player.is_protected() || !life.is_active() {
        return false;
    }
    let died = lives.apply_damage(1);
    player.invulnerable.set_max(tunables.player.invulnerability_secs);
    events.push(CombatEvent::PlayerHit { lives_remaining: lives.current() as u32 });

    if died {
        *life = Lifecycle::PendingRemoval;
        *state = GameState::GameOver;
        events.push(CombatEvent::GameOver { score: scoreboard.score });
        info!(score = scoreboard.score, "player destroyed, game over");
    } else {
        debug!(lives = lives.current(), "player hit");
    }
    true
}

/// Spawn and register the player at the configured start position.
pub fn spawn_player_entity(commands: &mut Commands, registry: &mut EntityRegistry, tunables: &Tunables) -> EntityId {
    let p = &tunables.player;
    let spec = tunables.weapons.get(p.starting_weapon);
    let mut weapon = Weapon::new(spec.pattern_for(1).clone(), spec.projectile.clone(), spec.fire_interval).hot();
    weapon.armed = false;
    let pos = Vec2::from(p.spawn);

    spawn_tracked(
        commands,
        registry,
        (
            Name::new("Player"),
            Kind::Player,
            Team::Player,
            Player::from_tunables(tunables),
            Health::new(p.starting_lives as i32, p.max_lives as i32),
            Speed(p.speed),
            p.hitbox,
            weapon,
            Transform::from_translation(pos.extend(1.0)),
            LinearVelocity::ZERO,
            player_layers(),
        ),
    )
}

fn spawn_player(mut commands: Commands, mut registry: ResMut<EntityRegistry>, tunables: Res<Tunables>) {
    let id = spawn_player_entity(&mut commands, &mut registry, &tunables);
    debug!(id = id.0, "player spawned");
}

/// Tick timed effects, then move, then load the weapon the intent asks for.
pub fn apply_intent(
    time: Res<Time<Fixed>>,
    tunables: Res<Tunables>,
    playfield: Res<Playfield>,
    intent: Res<PlayerIntent>,
    mut q_player: Query<(&Lifecycle, &Speed, &Hitbox, &mut Player, &mut Weapon, &mut Transform, &mut LinearVelocity)>,
) {
    let Ok((life, speed, hitbox, mut player, mut weapon, mut tf, mut vel)) = q_player.single_mut() else {
        return;
    };
    if !life.is_active() {
        return;
    }
    let dt = time.delta_secs();
    let special = &tunables.player.special;

    player.invulnerable.tick_down(dt);
    player.shield.tick_down(dt);
    player.speed_boost.tick_down(dt);
    player.special_active.tick_down(dt);

    if player.special_active.is_positive() {
        player.special_cooldown = (player.special_cooldown - dt).max(0.0);
    } else if intent.special && player.special_energy >= special.activation_cost {
        player.special_energy -= special.activation_cost;
        player.special_active = Countdown::new(special.duration_secs);
        player.special_cooldown = 0.0;
        debug!(energy = player.special_energy, "special activated");
    } else {
        player.special_energy = (player.special_energy + special.recharge_per_sec * dt).min(special.max_energy);
    }

    let boost = if player.speed_boost.is_positive() { tunables.player.speed_boost } else { 1.0 };
    vel.0 = intent.move_axis.clamp_length_max(1.0) * speed.0 * boost;
    let next = tf.translation.truncate() + vel.0 * dt;
    tf.translation = playfield.clamp_inside(next, hitbox.half_extents()).extend(tf.translation.z);

    let spec = tunables.weapons.get(player.weapon);
    let pattern = spec.pattern_for(player.weapon_level);
    if weapon.pattern != *pattern || weapon.projectile != spec.projectile {
        weapon.pattern = pattern.clone();
        weapon.projectile = spec.projectile.clone();
        weapon.interval = spec.fire_interval;
        weapon.cooldown = weapon.cooldown.min(spec.fire_interval);
    }
    weapon.armed = intent.fire;
}

/// While the special runs, add a barrage volley on its own cadence.
pub fn fire_special(
    tunables: Res<Tunables>,
    mut rng: ResMut<SimRng>,
    mut writer: MessageWriter<SpawnProjectileRequest>,
    mut q_player: Query<(&SimId, &Transform, &Lifecycle, &mut Player)>,
) {
    let Ok((id, tf, life, mut player)) = q_player.single_mut() else {
        return;
    };
    if !life.is_active() || !player.special_active.is_positive() || player.special_cooldown > 0.0 {
        return;
    }
    let special = &tunables.player.special;
    player.special_cooldown = special.fire_interval;

    let mut phase = 0.0;
    let shots = fire_all(&special.pattern, tf.translation.truncate(), None, &mut phase, rng.stream());
    request_volley(&mut writer, BulletKind::Player, *id, &shots, &special.projectile, None);
}

pub fn plugin(app: &mut App) {
    app.init_resource::<PlayerIntent>()
        .add_systems(Startup, spawn_player)
        .add_systems(FixedUpdate, apply_intent.in_set(SimSet::Input).run_if(in_game))
        .add_systems(
            FixedUpdate,
            fire_special.after(fire_weapons).in_set(SimSet::Fire).run_if(in_game),
        );
}
