//! Firing-pattern engine.
//!
//! `fire` turns one descriptor into projectile specs. It is pure apart from the
//! emitter's spiral phase (passed in by `&mut`) and the random stream used by
//! scatter volleys. `fire_weapons` runs it for every emitter whose cooldown elapsed
//! and hands the results to the projectile allocator as spawn requests.

pub mod pattern;
pub mod targeting;

use bevy::ecs::message::MessageWriter;
use bevy::prelude::*;
use bevy::time::Fixed;
use rand::Rng;

use crate::common::rng::SimRng;
use crate::common::state::in_game;
use crate::common::tunables::ProjectileProfile;
use crate::plugins::SimSet;
use crate::plugins::projectiles::components::PooledProjectile;
use crate::plugins::projectiles::messages::{BulletKind, SpawnProjectileRequest};
use crate::plugins::registry::{EntityId, Kind, Lifecycle, SimId, Team};

use pattern::{FiringPattern, FiringPatternDescriptor, PatternKind, TargetingMode};
use targeting::{Candidates, FireGate};

/// One projectile a volley wants to create.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProjectileSpec {
    pub origin: Vec2,
    pub direction: Vec2,
    pub angle_degrees: f32,
    pub homing: bool,
}

impl ProjectileSpec {
    fn new(origin: Vec2, angle_degrees: f32, homing: bool) -> Self {
        Self {
            origin,
            direction: Vec2::from_angle(angle_degrees.to_radians()),
            angle_degrees,
            homing,
        }
    }
}

/// Heading the volley is built around.
fn base_angle(d: &FiringPatternDescriptor, origin: Vec2, target: Option<Vec2>) -> f32 {
    let aim = d.kind == PatternKind::Aimed || d.targeting == TargetingMode::Aimed;
    match target {
        Some(t) if aim && origin.distance_squared(t) > f32::EPSILON => (t - origin).to_angle().to_degrees(),
        _ => d.start_angle,
    }
}

/// Angles of an `n`-shot fan centred on `centre`. Mirror-symmetric around it.
fn fan(centre: f32, n: usize, step: f32) -> impl Iterator<Item = f32> {
    let half = (n as f32 - 1.0) / 2.0;
    (0..n).map(move |i| centre + (i as f32 - half) * step)
}

/// Expand one descriptor into projectile specs.
pub fn fire<R: Rng + ?Sized>(
    d: &FiringPatternDescriptor,
    origin: Vec2,
    target: Option<Vec2>,
    phase_angle: &mut f32,
    rng: &mut R,
) -> Vec<ProjectileSpec> {
    let n = d.bullet_count as usize;
    let homing = d.targeting == TargetingMode::Homing;

    match d.kind {
        PatternKind::Straight => {
            let angle = base_angle(d, origin, target);
            let lateral = Vec2::from_angle(angle.to_radians()).perp();
            let half = (n as f32 - 1.0) / 2.0;
            (0..n)
                .map(|i| ProjectileSpec::new(origin + lateral * (i as f32 - half) * d.spacing, angle, homing))
                .collect()
        }
        PatternKind::Spread | PatternKind::Aimed => fan(base_angle(d, origin, target), n, d.angle_step)
            .map(|a| ProjectileSpec::new(origin, a, homing))
            .collect(),
        PatternKind::Circle | PatternKind::Barrage => {
            let step = 360.0 / n.max(1) as f32;
            (0..n)
                .map(|i| ProjectileSpec::new(origin, d.start_angle + i as f32 * step, homing))
                .collect()
        }
        PatternKind::Spiral => {
            let start = *phase_angle;
            *phase_angle = (*phase_angle + d.rotation_step).rem_euclid(360.0);
            (0..n)
                .map(|i| ProjectileSpec::new(origin, start + i as f32 * d.angle_step, homing))
                .collect()
        }
        PatternKind::Scatter => {
            let r = d.spacing.abs();
            (0..n)
                .map(|_| {
                    let angle = rng.random_range(0.0f32..360.0);
                    let jitter = Vec2::new(rng.random_range(-r..=r), rng.random_range(-r..=r));
                    ProjectileSpec::new(origin + jitter, angle, homing)
                })
                .collect()
        }
    }
}

/// Fire every descriptor of a composite pattern, in order.
pub fn fire_all<R: Rng + ?Sized>(
    pattern: &FiringPattern,
    origin: Vec2,
    target: Option<Vec2>,
    phase_angle: &mut f32,
    rng: &mut R,
) -> Vec<ProjectileSpec> {
    pattern
        .descriptors()
        .iter()
        .flat_map(|d| fire(d, origin, target, phase_angle, rng))
        .collect()
}

/// An emitter: what it fires, how often, and its running state.
#[derive(Component, Debug, Clone)]
pub struct Weapon {
    pub pattern: FiringPattern,
    pub projectile: ProjectileProfile,
    /// Base seconds between volleys.
    pub interval: f32,
    pub cooldown: f32,
    /// Scales `interval`; boss phases lower it to fire faster.
    pub rate_multiplier: f32,
    pub phase_angle: f32,
    /// Enemies are always armed; the player's trigger follows input.
    pub armed: bool,
    pub gate: FireGate,
}

impl Weapon {
    /// First volley comes one full interval after spawn.
    pub fn new(pattern: FiringPattern, projectile: ProjectileProfile, interval: f32) -> Self {
        Self {
            pattern,
            projectile,
            interval,
            cooldown: interval,
            rate_multiplier: 1.0,
            phase_angle: 0.0,
            armed: true,
            gate: FireGate::Always,
        }
    }

    /// Ready on the first trigger pull.
    pub fn hot(mut self) -> Self {
        self.cooldown = 0.0;
        self
    }

    pub fn gated(mut self, gate: FireGate) -> Self {
        self.gate = gate;
        self
    }

    #[inline]
    pub fn effective_interval(&self) -> f32 {
        self.interval * self.rate_multiplier
    }

    /// Count down; true when a volley should go out this tick. While the gate is
    /// closed a ready weapon stays ready.
    pub fn tick(&mut self, dt: f32, gate_open: bool) -> bool {
        self.cooldown = (self.cooldown - dt).max(0.0);
        if self.armed && gate_open && self.cooldown <= 0.0 {
            self.cooldown = self.effective_interval();
            true
        } else {
            false
        }
    }
}

/// Turn a volley into spawn requests for the allocator.
pub fn request_volley(
    writer: &mut MessageWriter<SpawnProjectileRequest>,
    kind: BulletKind,
    owner: SimId,
    shots: &[ProjectileSpec],
    profile: &ProjectileProfile,
    lock: Option<EntityId>,
) {
    for shot in shots {
        writer.write(SpawnProjectileRequest::from_shot(kind, Some(owner.0), shot, profile, lock));
    }
}

/// Fire every active emitter whose cooldown elapsed, oldest first.
pub fn fire_weapons(
    time: Res<Time<Fixed>>,
    mut rng: ResMut<SimRng>,
    mut writer: MessageWriter<SpawnProjectileRequest>,
    mut q_emitters: Query<(&SimId, &Team, &Transform, &Lifecycle, &mut Weapon), Without<PooledProjectile>>,
    q_targets: Query<(&SimId, &Kind, &Transform, &Lifecycle), Without<PooledProjectile>>,
) {
    let dt = time.delta_secs();
    let candidates = Candidates::collect(
        q_targets
            .iter()
            .filter(|(_, _, _, life)| life.is_active())
            .map(|(id, kind, tf, _)| (id.0, *kind, tf.translation.truncate())),
    );

    let mut emitters: Vec<_> = q_emitters.iter_mut().collect();
    emitters.sort_by_key(|(id, ..)| id.0);

    for (id, team, tf, life, mut weapon) in emitters {
        if !life.is_active() {
            continue;
        }
        let Some(kind) = BulletKind::for_team(*team) else {
            continue;
        };
        let origin = tf.translation.truncate();
        let open = weapon.gate.is_open(&candidates, *team, origin);
        if !weapon.tick(dt, open) {
            continue;
        }

        let target = candidates.nearest_opponent(*team, origin);
        let w = &mut *weapon;
        let shots = fire_all(&w.pattern, origin, target.map(|(_, p)| p), &mut w.phase_angle, rng.stream());
        request_volley(&mut writer, kind, *id, &shots, &w.projectile, target.map(|(t, _)| t));
    }
}

pub fn plugin(app: &mut App) {
    app.add_systems(FixedUpdate, fire_weapons.in_set(SimSet::Fire).run_if(in_game));
}
