//! In-flight update: lifespan, homing, integration.

use avian2d::prelude::*;
use bevy::prelude::*;
use bevy::time::Fixed;

use crate::plugins::movement::steer_towards;
use crate::plugins::registry::{EntityRegistry, Lifecycle};

use super::components::{PooledProjectile, Projectile};

pub fn advance_projectiles(
    time: Res<Time<Fixed>>,
    registry: Res<EntityRegistry>,
    mut q: Query<(&mut Lifecycle, &mut Projectile, &mut Transform, &mut LinearVelocity), With<PooledProjectile>>,
    q_targets: Query<(&Transform, &Lifecycle), Without<PooledProjectile>>,
) {
    let dt = time.delta_secs();

    for (mut life, mut projectile, mut tf, mut vel) in &mut q {
        if !life.is_active() {
            continue;
        }

        projectile.lifespan -= dt;
        if projectile.lifespan <= 0.0 {
            *life = Lifecycle::PendingRemoval;
            continue;
        }

        let position = tf.translation.truncate();
        if let Some(lock) = projectile.homing {
            let target = registry
                .resolve(lock.target)
                .and_then(|e| q_targets.get(e).ok())
                .filter(|(_, target_life)| target_life.is_active())
                .map(|(target_tf, _)| target_tf.translation.truncate());
            match target {
                Some(t) => vel.0 = steer_towards(vel.0, t - position, lock.tracking_rate),
                // Target gone: fly straight from here on.
                None => projectile.homing = None,
            }
        }

        tf.translation = (position + vel.0 * dt).extend(tf.translation.z);
    }
}
