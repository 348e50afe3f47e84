//! Host-facing simulation handle.
//!
//! `Simulation` owns one headless `App`. The host feeds it a `dt` and a
//! `PlayerIntent` per frame and gets back that tick's events; between ticks it can
//! read a snapshot for drawing, spawn or despawn entities, and inspect wave, score
//! and player state. Nothing here reads a clock or a device.

use std::fmt;
use std::time::Duration;

use bevy::ecs::system::RunSystemOnce;
use bevy::prelude::*;
use bevy::time::Fixed;

use crate::common::error::ConfigError;
use crate::common::events::{CombatEvent, CombatEvents, Scoreboard};
use crate::common::rng::SimRng;
use crate::common::state::GameState;
use crate::common::tunables::Tunables;
use crate::game::configure_headless;
use crate::plugins::boss::Boss;
use crate::plugins::combat::hitbox::Hitbox;
use crate::plugins::enemies::{spawn_enemy, EnemyArchetype, HitFlash};
use crate::plugins::pickups::{spawn_pickup, PickupKind};
use crate::plugins::player::{Player, PlayerIntent, WeaponType};
use crate::plugins::projectiles::allocator::{allocate_one, SlotData};
use crate::plugins::projectiles::components::PooledProjectile;
use crate::plugins::projectiles::messages::{BulletKind, SpawnProjectileRequest};
use crate::plugins::projectiles::pool::ProjectilePools;
use crate::plugins::registry::{self, EntityId, EntityRegistry, Health, Kind, Lifecycle, SimId, Tags};
use crate::plugins::spawner::WaveState;

/// Presentation tag for one entity. Derived from simulation facts every snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VisualState {
    Normal,
    Flashing,
    InvulnerableBlink,
    Shielded,
    Phase(usize),
}

impl fmt::Display for VisualState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Normal => f.write_str("normal"),
            Self::Flashing => f.write_str("flashing"),
            Self::InvulnerableBlink => f.write_str("invulnerable-blink"),
            Self::Shielded => f.write_str("shielded"),
            Self::Phase(n) => write!(f, "phase{n}"),
        }
    }
}

/// What the renderer gets for every active entity.
#[derive(Debug, Clone, PartialEq)]
pub struct EntityView {
    pub id: EntityId,
    pub kind: Kind,
    pub position: Vec2,
    /// Heading in radians, from velocity. Zero when not moving.
    pub rotation: f32,
    pub visual_state: VisualState,
    /// Archetype or pickup tags, sorted. Hosts pick sprites from these.
    pub tags: Vec<String>,
}

/// Host-side spawn request.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EntitySpec {
    Enemy {
        archetype: EnemyArchetype,
        position: Vec2,
    },
    Pickup {
        kind: PickupKind,
        position: Vec2,
    },
    Projectile {
        kind: BulletKind,
        position: Vec2,
        velocity: Vec2,
        damage: i32,
        penetrating: bool,
        hitbox: Hitbox,
    },
}

/// Player summary for HUDs.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlayerStatus {
    pub id: EntityId,
    pub position: Vec2,
    pub lives: u32,
    pub bombs: u32,
    pub weapon: WeaponType,
    pub weapon_level: u32,
    pub special_energy: f32,
    pub special_active: bool,
}

pub struct Simulation {
    app: App,
}

impl Simulation {
    /// Validate `tunables` and build a fresh run seeded with `seed`.
    pub fn new(tunables: Tunables, seed: u64) -> Result<Self, ConfigError> {
        tunables.validate()?;

        let mut app = App::new();
        app.insert_resource(tunables).insert_resource(SimRng::seeded(seed));
        configure_headless(&mut app);
        app.finish();
        app.cleanup();

        if let Err(err) = app.world_mut().try_run_schedule(Startup) {
            warn!(?err, "startup schedule missing");
        }
        debug!(seed, "simulation ready");
        Ok(Self { app })
    }

    pub fn from_json(json: &str, seed: u64) -> Result<Self, ConfigError> {
        Self::new(Tunables::from_json_str(json)?, seed)
    }

    /// Advance one tick of `dt` with `intent` and hand out the tick's events.
    pub fn tick(&mut self, dt: Duration, intent: PlayerIntent) -> std::vec::IntoIter<CombatEvent> {
        let world = self.app.world_mut();
        world.insert_resource(intent);
        world.resource_mut::<Time<Fixed>>().advance_by(dt);
        if let Err(err) = world.try_run_schedule(FixedUpdate) {
            warn!(?err, "fixed schedule missing");
        }
        world.resource_mut::<CombatEvents>().drain()
    }

    /// Every active entity, oldest first.
    pub fn snapshot(&mut self) -> Vec<EntityView> {
        let world = self.app.world_mut();
        let mut q = world.query::<(
            &SimId,
            &Kind,
            &Lifecycle,
            &Transform,
            Option<&avian2d::prelude::LinearVelocity>,
            Option<&HitFlash>,
            Option<&Player>,
            Option<&Boss>,
            Option<&Tags>,
        )>();

        let mut views: Vec<EntityView> = q
            .iter(world)
            .filter(|(_, _, life, ..)| life.is_active())
            .map(|(id, kind, _, tf, vel, flash, player, boss, tags)| {
                let velocity = vel.map(|v| v.0).unwrap_or(Vec2::ZERO);
                let rotation = if velocity.length_squared() > f32::EPSILON { velocity.to_angle() } else { 0.0 };
                EntityView {
                    id: id.0,
                    kind: *kind,
                    position: tf.translation.truncate(),
                    rotation,
                    visual_state: visual_state(flash, player, boss),
                    tags: sorted_tags(tags),
                }
            })
            .collect();
        views.sort_by_key(|v| v.id);
        views
    }

    /// Spawn from outside the tick. `None` when a projectile pool is exhausted.
    pub fn spawn(&mut self, spec: EntitySpec) -> Option<EntityId> {
        let tunables = self.app.world().resource::<Tunables>().clone();
        let world = self.app.world_mut();

        let id = match spec {
            EntitySpec::Enemy { archetype, position } => {
                world.resource_scope(|world, mut registry: Mut<EntityRegistry>| {
                    let mut commands = world.commands();
                    Some(spawn_enemy(&mut commands, &mut registry, &tunables, archetype, position))
                })
            }
            EntitySpec::Pickup { kind, position } => world.resource_scope(|world, mut registry: Mut<EntityRegistry>| {
                let mut commands = world.commands();
                Some(spawn_pickup(&mut commands, &mut registry, &tunables, kind, position))
            }),
            EntitySpec::Projectile { kind, position, velocity, damage, penetrating, hitbox } => {
                let req = SpawnProjectileRequest {
                    kind,
                    pos: position,
                    vel: velocity,
                    damage,
                    owner: None,
                    penetrating,
                    hitbox,
                    homing: None,
                };
                let lifespan = tunables.projectiles.lifespan_secs;
                world
                    .run_system_once(
                        move |mut pools: ResMut<ProjectilePools>,
                              mut registry: ResMut<EntityRegistry>,
                              mut q: Query<SlotData, With<PooledProjectile>>| {
                            allocate_one(&mut pools, &mut registry, lifespan, &mut q, &req)
                        },
                    )
                    .ok()
                    .flatten()
            }
        };
        world.flush();
        id
    }

    /// Queue `id` for removal at the end of the next tick. False for unknown ids.
    pub fn despawn(&mut self, id: EntityId) -> bool {
        registry::mark_for_removal(self.app.world_mut(), id)
    }

    /// Visit every active entity of `kind`, oldest first.
    pub fn for_each_active(&mut self, kind: Kind, f: impl FnMut(EntityId, EntityRef<'_>)) {
        registry::for_each_active(self.app.world_mut(), kind, f);
    }

    pub fn active_count(&mut self, kind: Kind) -> usize {
        registry::active_in_order(self.app.world_mut(), kind).len()
    }

    pub fn wave(&self) -> &WaveState {
        self.app.world().resource::<WaveState>()
    }

    pub fn score(&self) -> u64 {
        self.app.world().resource::<Scoreboard>().score
    }

    pub fn state(&self) -> GameState {
        *self.app.world().resource::<GameState>()
    }

    pub fn tunables(&self) -> &Tunables {
        self.app.world().resource::<Tunables>()
    }

    pub fn player(&mut self) -> Option<PlayerStatus> {
        let world = self.app.world_mut();
        let mut q = world.query::<(&SimId, &Lifecycle, &Transform, &Health, &Player)>();
        q.iter(world)
            .find(|(_, life, ..)| life.is_active())
            .map(|(id, _, tf, lives, player)| PlayerStatus {
                id: id.0,
                position: tf.translation.truncate(),
                lives: lives.current().max(0) as u32,
                bombs: player.bombs,
                weapon: player.weapon,
                weapon_level: player.weapon_level,
                special_energy: player.special_energy,
                special_active: player.special_active.is_positive(),
            })
    }

    /// Direct world access for hosts that need more than the façade offers.
    pub fn world(&self) -> &World {
        self.app.world()
    }

    pub fn world_mut(&mut self) -> &mut World {
        self.app.world_mut()
    }
}

fn sorted_tags(tags: Option<&Tags>) -> Vec<String> {
    let mut out: Vec<String> = tags.map(|t| t.0.iter().cloned().collect()).unwrap_or_default();
    out.sort();
    out
}

fn visual_state(flash: Option<&HitFlash>, player: Option<&Player>, boss: Option<&Boss>) -> VisualState {
    if let Some(player) = player {
        return if player.shield.is_positive() {
            VisualState::Shielded
        } else if player.invulnerable.is_positive() {
            VisualState::InvulnerableBlink
        } else {
            VisualState::Normal
        };
    }
    if flash.is_some_and(|f| f.0.is_active()) {
        return VisualState::Flashing;
    }
    match boss {
        Some(boss) => VisualState::Phase(boss.current),
        None => VisualState::Normal,
    }
}
