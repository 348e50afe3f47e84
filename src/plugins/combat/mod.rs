//! Collision & damage resolver.
//!
//! Runs in `SimSet::Collide`, after every projectile moved:
//! 1. `detonate_bomb`: player bomb clears enemy fire and damages every enemy
//! 2. `resolve_projectile_hits`: projectile vs opposing entities
//! 3. `resolve_contact_damage`: player body vs enemy bodies
//!
//! Overlap is tested with `Hitbox`; "opposing" means the `CollisionLayers` interact.
//! Projectiles and targets are both walked in `EntityId` order, so simultaneous hits
//! resolve the same way on every run.

pub mod damage;
pub mod hitbox;

use avian2d::prelude::*;
use bevy::prelude::*;

use crate::common::events::{CombatEvent, CombatEvents, Scoreboard};
use crate::common::layers::{is_in_layer, Layer};
use crate::common::rng::SimRng;
use crate::common::state::{in_game, GameState};
use crate::common::tunables::Tunables;
use crate::plugins::SimSet;
use crate::plugins::boss::Boss;
use crate::plugins::enemies::{Enemy, HitFlash};
use crate::plugins::pickups::Pickup;
use crate::plugins::player::{hit_player, Player, PlayerIntent};
use crate::plugins::projectiles::components::{PooledProjectile, Projectile};
use crate::plugins::registry::{AttackPower, EntityId, EntityRegistry, Health, Lifecycle, SimId};

use damage::{damage_enemy, Kill, Payout};
use hitbox::Hitbox;

fn count_active<'a>(lives: impl IntoIterator<Item = &'a Lifecycle>) -> usize {
    lives.into_iter().filter(|life| life.is_active()).count()
}

/// Spend a bomb: every enemy bullet disappears, regular enemies die outright and
/// bosses take a fixed chunk.
#[allow(clippy::too_many_arguments)]
pub fn detonate_bomb(
    mut commands: Commands,
    tunables: Res<Tunables>,
    intent: Res<PlayerIntent>,
    mut rng: ResMut<SimRng>,
    mut registry: ResMut<EntityRegistry>,
    mut events: ResMut<CombatEvents>,
    mut scoreboard: ResMut<Scoreboard>,
    mut q_player: Query<(&Lifecycle, &mut Player)>,
    mut q_bullets: Query<(&CollisionLayers, &mut Lifecycle), (With<PooledProjectile>, Without<Player>)>,
    mut q_enemies: Query<
        (&SimId, &Enemy, &Transform, &mut Health, &mut Lifecycle, &mut HitFlash, Has<Boss>),
        (Without<PooledProjectile>, Without<Player>),
    >,
    q_pickups: Query<&Lifecycle, (With<Pickup>, Without<Player>, Without<Enemy>, Without<PooledProjectile>)>,
) {
    if !intent.bomb {
        return;
    }
    let Ok((life, mut player)) = q_player.single_mut() else {
        return;
    };
    if !life.is_active() || player.bombs == 0 {
        return;
    }
    player.bombs -= 1;
    events.push(CombatEvent::BombUsed { bombs_remaining: player.bombs });

    let mut cleared = 0usize;
    for (layers, mut bullet_life) in &mut q_bullets {
        if bullet_life.is_active() && is_in_layer(layers, Layer::EnemyBullet) {
            *bullet_life = Lifecycle::PendingRemoval;
            cleared += 1;
        }
    }

    let mut targets: Vec<_> = q_enemies.iter_mut().collect();
    targets.sort_by_key(|(id, ..)| id.0);

    let mut kills = Vec::new();
    for (id, enemy, tf, mut health, mut life, mut flash, is_boss) in targets {
        let amount = if is_boss { tunables.player.bomb_boss_damage } else { health.current() };
        let position = tf.translation.truncate();
        kills.extend(damage_enemy(id.0, enemy, position, &mut health, &mut life, Some(&mut *flash), amount));
    }
    info!(bombs_remaining = player.bombs, cleared, destroyed = kills.len(), "bomb detonated");

    Payout {
        commands: &mut commands,
        registry: &mut registry,
        tunables: &tunables,
        rng: &mut rng,
        events: &mut events,
        scoreboard: &mut scoreboard,
        active_pickups: count_active(&q_pickups),
    }
    .settle(&kills);
}

/// Hit-test every active projectile against every active opposing entity.
///
/// A regular projectile stops at its first target. A penetrating one keeps going and
/// remembers whom it hit so each target takes its damage once.
#[allow(clippy::too_many_arguments)]
pub fn resolve_projectile_hits(
    mut commands: Commands,
    tunables: Res<Tunables>,
    mut rng: ResMut<SimRng>,
    mut registry: ResMut<EntityRegistry>,
    mut events: ResMut<CombatEvents>,
    mut scoreboard: ResMut<Scoreboard>,
    mut state: ResMut<GameState>,
    mut q_projectiles: Query<
        (&SimId, &Transform, &Hitbox, &CollisionLayers, &AttackPower, &mut Projectile, &mut Lifecycle),
        With<PooledProjectile>,
    >,
    mut q_targets: Query<
        (
            &Transform,
            &Hitbox,
            &mut Health,
            &mut Lifecycle,
            Option<&Enemy>,
            Option<&mut Player>,
            Option<&mut HitFlash>,
        ),
        (Without<PooledProjectile>, Without<Pickup>),
    >,
    q_target_ids: Query<(Entity, &SimId, &CollisionLayers), (Without<PooledProjectile>, Without<Pickup>)>,
    q_pickups: Query<&Lifecycle, (With<Pickup>, Without<PooledProjectile>)>,
) {
    let mut targets: Vec<(EntityId, Entity, CollisionLayers)> =
        q_target_ids.iter().map(|(e, id, layers)| (id.0, e, *layers)).collect();
    targets.sort_by_key(|(id, ..)| *id);

    let mut projectiles: Vec<_> = q_projectiles.iter_mut().filter(|(.., life)| life.is_active()).collect();
    projectiles.sort_by_key(|(id, ..)| id.0);

    let mut kills: Vec<Kill> = Vec::new();

    for (_, p_tf, p_hitbox, p_layers, attack, mut projectile, mut p_life) in projectiles {
        let p_pos = p_tf.translation.truncate();

        for &(target_id, entity, t_layers) in &targets {
            if !p_layers.interacts_with(t_layers) || projectile.has_hit(target_id) {
                continue;
            }
            let Ok((t_tf, t_hitbox, mut health, mut life, enemy, player, flash)) = q_targets.get_mut(entity) else {
                continue;
            };
            let t_pos = t_tf.translation.truncate();
            if !life.is_active() || !p_hitbox.overlaps(p_pos, *t_hitbox, t_pos) {
                continue;
            }

            if let Some(mut player) = player {
                let landed =
                    hit_player(&mut player, &mut health, &mut life, &tunables, &mut events, &scoreboard, &mut state);
                if !landed {
                    continue;
                }
            } else if let Some(enemy) = enemy {
                kills.extend(damage_enemy(
                    target_id,
                    enemy,
                    t_pos,
                    &mut health,
                    &mut life,
                    flash.map(|f| f.into_inner()),
                    attack.0,
                ));
            } else {
                continue;
            }

            if projectile.penetrating {
                projectile.already_hit.push(target_id);
            } else {
                *p_life = Lifecycle::PendingRemoval;
                break;
            }
        }
    }

    if kills.is_empty() {
        return;
    }
    Payout {
        commands: &mut commands,
        registry: &mut registry,
        tunables: &tunables,
        rng: &mut rng,
        events: &mut events,
        scoreboard: &mut scoreboard,
        active_pickups: count_active(&q_pickups),
    }
    .settle(&kills);
}

/// Player body against enemy bodies. Both sides are evaluated on their own: the
/// enemy always takes ram damage, the player only when not protected.
#[allow(clippy::too_many_arguments)]
pub fn resolve_contact_damage(
    mut commands: Commands,
    tunables: Res<Tunables>,
    mut rng: ResMut<SimRng>,
    mut registry: ResMut<EntityRegistry>,
    mut events: ResMut<CombatEvents>,
    mut scoreboard: ResMut<Scoreboard>,
    mut state: ResMut<GameState>,
    mut q_player: Query<(&Transform, &Hitbox, &CollisionLayers, &mut Health, &mut Lifecycle, &mut Player), Without<Enemy>>,
    mut q_enemies: Query<
        (&SimId, &Enemy, &Transform, &Hitbox, &CollisionLayers, &mut Health, &mut Lifecycle, &mut HitFlash),
        Without<Player>,
    >,
    q_pickups: Query<&Lifecycle, (With<Pickup>, Without<Player>, Without<Enemy>)>,
) {
    let Ok((p_tf, p_hitbox, p_layers, mut lives, mut p_life, mut player)) = q_player.single_mut() else {
        return;
    };
    let p_pos = p_tf.translation.truncate();

    let mut enemies: Vec<_> = q_enemies.iter_mut().collect();
    enemies.sort_by_key(|(id, ..)| id.0);

    let mut kills = Vec::new();
    for (id, enemy, tf, hitbox, layers, mut health, mut life, mut flash) in enemies {
        if !p_life.is_active() {
            break;
        }
        let pos = tf.translation.truncate();
        if !life.is_active() || !p_layers.interacts_with(*layers) || !p_hitbox.overlaps(p_pos, *hitbox, pos) {
            continue;
        }
        hit_player(&mut player, &mut lives, &mut p_life, &tunables, &mut events, &scoreboard, &mut state);
        kills.extend(damage_enemy(
            id.0,
            enemy,
            pos,
            &mut health,
            &mut life,
            Some(&mut *flash),
            tunables.player.ram_damage,
        ));
    }

    if kills.is_empty() {
        return;
    }
    Payout {
        commands: &mut commands,
        registry: &mut registry,
        tunables: &tunables,
        rng: &mut rng,
        events: &mut events,
        scoreboard: &mut scoreboard,
        active_pickups: count_active(&q_pickups),
    }
    .settle(&kills);
}

pub fn plugin(app: &mut App) {
    app.add_systems(
        FixedUpdate,
        (detonate_bomb, resolve_projectile_hits, resolve_contact_damage)
            .chain()
            .in_set(SimSet::Collide)
            .run_if(in_game),
    );
}
